//! Literal syntax of shell arguments.
//!
//! Arguments are parsed into [`Arg`] with these rules:
//! 1. `'...'` is taken verbatim (only `\'` and `\\` are escapes)
//! 2. `"..."` understands `\xNN`, octal `\NNN`, `\n`, `\t`, `\r`, `\\`, `\"`;
//!    a result that is not UTF-8 becomes `Arg::Bytes`
//! 3. `-?[0-9]+` that fits an i64 is an `Arg::Int`
//! 4. `true`, `false` and `nil` are keywords
//! 5. `[a, b]` is a list, `{K => v, ...}` a dictionary
//! 6. A bare word starting with an uppercase letter evaluates to its own
//!    name, so `{COLUMN => 'x'}` and `{'COLUMN' => 'x'}` are equivalent

use colshell_executor::{Arg, OptionMap};

/// Cursor over one line of input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Lexer at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace.
    pub fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Whether only whitespace or a `#` comment is left.
    pub fn at_end(&mut self) -> bool {
        self.skip_ws();
        matches!(self.peek(), None | Some('#'))
    }

    /// Consume `c` if it comes next, after whitespace.
    pub fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), String> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn unexpected(&self, wanted: &str) -> String {
        match self.peek() {
            Some(c) => format!("expected {} at column {}, found '{}'", wanted, self.pos + 1, c),
            None => format!("expected {} at end of line", wanted),
        }
    }

    /// A bare word: letters, digits, `_`, `.`.
    pub fn word(&mut self) -> &'a str {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    /// Parse one argument.
    pub fn arg(&mut self) -> Result<Arg, String> {
        self.skip_ws();
        match self.peek() {
            Some('\'') => self.single_quoted(),
            Some('"') => self.double_quoted(),
            Some('[') => self.list(),
            Some('{') => self.dict(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.integer(),
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.word();
                match word {
                    "true" => Ok(Arg::Bool(true)),
                    "false" => Ok(Arg::Bool(false)),
                    "nil" => Ok(Arg::Nil),
                    w if w.starts_with(|c: char| c.is_ascii_uppercase()) => Ok(Arg::from(w)),
                    w => Err(format!("undefined name '{}'", w)),
                }
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    /// Comma separated arguments up to the end of the line.
    pub fn args(&mut self) -> Result<Vec<Arg>, String> {
        let mut args = Vec::new();
        if self.at_end() {
            return Ok(args);
        }
        loop {
            args.push(self.arg()?);
            if self.at_end() {
                return Ok(args);
            }
            self.expect(',')?;
        }
    }

    fn single_quoted(&mut self) -> Result<Arg, String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(Arg::Str(out)),
                Some('\\') if matches!(self.peek(), Some('\'') | Some('\\')) => {
                    out.extend(self.bump());
                }
                Some(c) => out.push(c),
                None => return Err("unterminated string literal".to_string()),
            }
        }
    }

    fn double_quoted(&mut self) -> Result<Arg, String> {
        self.bump();
        let mut out: Vec<u8> = Vec::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => self.escape(&mut out)?,
                Some(c) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                None => return Err("unterminated string literal".to_string()),
            }
        }
        Ok(match String::from_utf8(out) {
            Ok(s) => Arg::Str(s),
            Err(e) => Arg::Bytes(e.into_bytes()),
        })
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), String> {
        match self.bump() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('r') => out.push(b'\r'),
            Some('x') => {
                let digits = self.take_while_max(2, |c| c.is_ascii_hexdigit());
                let byte = u8::from_str_radix(digits, 16)
                    .map_err(|_| "invalid \\x escape".to_string())?;
                out.push(byte);
            }
            Some(c) if c.is_digit(8) => {
                let start = self.pos - 1;
                self.take_while_max(2, |c| c.is_digit(8));
                let byte = u32::from_str_radix(&self.input[start..self.pos], 8)
                    .ok()
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| "octal escape out of range".to_string())?;
                out.push(byte);
            }
            Some(c) => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            None => return Err("unterminated string literal".to_string()),
        }
        Ok(())
    }

    fn take_while_max(&mut self, max: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        for _ in 0..max {
            match self.peek() {
                Some(c) if pred(c) => {
                    self.bump();
                }
                _ => break,
            }
        }
        &self.input[start..self.pos]
    }

    fn integer(&mut self) -> Result<Arg, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        self.take_while_max(usize::MAX, |c| c.is_ascii_digit() || c == '_');
        let text: String = self.input[start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if self.peek().is_some_and(|c| c == '.' || c.is_ascii_alphabetic()) {
            return Err(format!("unsupported number literal starting '{}'", text));
        }
        text.parse::<i64>()
            .map(Arg::Int)
            .map_err(|_| format!("invalid integer '{}'", text))
    }

    fn list(&mut self) -> Result<Arg, String> {
        self.bump();
        let mut items = Vec::new();
        if self.eat(']') {
            return Ok(Arg::List(items));
        }
        loop {
            items.push(self.arg()?);
            if self.eat(']') {
                return Ok(Arg::List(items));
            }
            self.expect(',')?;
        }
    }

    fn dict(&mut self) -> Result<Arg, String> {
        self.bump();
        let mut map = OptionMap::new();
        if self.eat('}') {
            return Ok(Arg::Dict(map));
        }
        loop {
            let key = match self.arg()? {
                Arg::Str(key) => key,
                other => return Err(format!("dictionary keys must be strings, got {}", other)),
            };
            self.skip_ws();
            if !self.rest().starts_with("=>") {
                return Err(self.unexpected("'=>'"));
            }
            self.pos += 2;
            let value = self.arg()?;
            map.insert(key, value);
            if self.eat('}') {
                return Ok(Arg::Dict(map));
            }
            self.expect(',')?;
        }
    }
}
