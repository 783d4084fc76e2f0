//! Clap definition of the process flags.
//!
//! Shell commands themselves are not clap subcommands: they are typed at the
//! prompt (or piped in) and go through the line parser and the dispatcher.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::format::OutputMode;

/// Build the process command line.
pub fn build_cli() -> Command {
    Command::new("colshell")
        .about("Interactive admin shell for column-family data stores")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format (default: console)")
                .value_parser(["console", "json"])
                .default_value("console"),
        )
        .arg(
            Arg::new("format-width")
                .long("format-width")
                .help("Width of table output in characters (default: from config, 110)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Log at DEBUG level and print error details")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: $HOME/.colshell.toml)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("script")
                .help("Script of shell commands to run before the prompt")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

/// Flags after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    /// Output format
    pub mode: OutputMode,
    /// `--format-width`, overriding the config file
    pub format_width: Option<usize>,
    /// `-d/--debug`
    pub debug: bool,
    /// `--config`
    pub config: Option<PathBuf>,
    /// Script path
    pub script: Option<PathBuf>,
}

impl Flags {
    /// Read flags out of clap matches.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mode = match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => OutputMode::Json,
            _ => OutputMode::Console,
        };
        Self {
            mode,
            format_width: matches.get_one::<usize>("format-width").copied(),
            debug: matches.get_flag("debug"),
            config: matches.get_one::<PathBuf>("config").cloned(),
            script: matches.get_one::<PathBuf>("script").cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Flags {
        let matches = build_cli().try_get_matches_from(args).unwrap();
        Flags::from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let flags = parse(&["colshell"]);
        assert_eq!(flags.mode, OutputMode::Console);
        assert_eq!(flags.format_width, None);
        assert!(!flags.debug);
        assert!(flags.script.is_none());
    }

    #[test]
    fn test_all_flags() {
        let flags = parse(&[
            "colshell",
            "--format",
            "json",
            "--format-width",
            "80",
            "-d",
            "--config",
            "/tmp/c.toml",
            "setup.cs",
        ]);
        assert_eq!(flags.mode, OutputMode::Json);
        assert_eq!(flags.format_width, Some(80));
        assert!(flags.debug);
        assert_eq!(flags.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(flags.script, Some(PathBuf::from("setup.cs")));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(build_cli()
            .try_get_matches_from(["colshell", "--format", "xml"])
            .is_err());
    }
}
