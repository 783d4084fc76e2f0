//! Byte string helpers for rendering row keys, qualifiers and values.

/// Render bytes for display: printable ASCII is kept, everything else is
/// written as `\xNN`.
///
/// The output can be pasted back into a double-quoted shell literal to
/// address the same bytes.
pub fn to_string_binary(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (b' '..=b'~').contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{:02X}", b));
        }
    }
    out
}

/// Truncate a string to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii_is_kept() {
        assert_eq!(to_string_binary(b"row-1:{a}"), "row-1:{a}");
    }

    #[test]
    fn test_non_printable_is_escaped() {
        assert_eq!(to_string_binary(&[b'k', 0x03, 0xff]), "k\\x03\\xFF");
        assert_eq!(to_string_binary(b"a\nb"), "a\\x0Ab");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("timestamp=1, value=abc", 9), "timestamp");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 0), "");
    }
}
