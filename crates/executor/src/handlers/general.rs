//! Session and cluster commands.

use colshell_core::{Arg, Error, Result};

use crate::admin::StatusLevel;
use crate::command::{Args, CommandContext, CommandGroup, ShellCommand};
use crate::output::Output;
use crate::registry::CommandRegistry;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(Box::new(Exit));
    registry.register(Box::new(Help));
    registry.register(Box::new(Status));
    registry.register(Box::new(Tools));
    registry.register(Box::new(Version));
}

const SYNTAX_NOTES: &[&str] = &[
    "",
    "ARGUMENTS:",
    "  Quote table names, rows, columns and values: 't1', \"r\\x001\".",
    "  Dictionaries are written {KEY => value, ...}; upper-case keys need no quotes.",
    "  Columns are 'family:qualifier'; 'family' or 'family:' means the whole family.",
    "  Lists are written ['a', 'b']. Literals true, false and nil are recognised.",
];

struct Help;

impl ShellCommand for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::General
    }

    fn help(&self) -> &'static str {
        "List every command, or show the usage of one:\n\n  help\n  help 'scan'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 0, Some(1))?;
        if let Some(name) = args.opt_string(0, "command name")? {
            let command = ctx
                .registry
                .get(&name)
                .ok_or(Error::UnknownCommand { name })?;
            return Ok(Output::Text(
                command.help().lines().map(str::to_string).collect(),
            ));
        }

        let mut lines = vec![format!(
            "colshell {}; type 'help \"COMMAND\"' for the usage of one command.",
            env!("CARGO_PKG_VERSION")
        )];
        for group in CommandGroup::ALL {
            lines.push(String::new());
            lines.push(format!("COMMAND GROUP: {}", group.title()));
            for command in ctx.registry.in_group(group) {
                let summary = command.help().lines().next().unwrap_or_default();
                lines.push(format!("  {:<15}{}", command.name(), summary));
            }
        }
        lines.extend(SYNTAX_NOTES.iter().map(|l| l.to_string()));
        Ok(Output::Text(lines))
    }
}

struct Tools;

impl ShellCommand for Tools {
    fn name(&self) -> &'static str {
        "tools"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::General
    }

    fn help(&self) -> &'static str {
        "List the region surgery tools"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        Args::new(self.name(), args, 0, Some(0))?;
        let mut lines = vec!["REGION SURGERY TOOLS:".to_string()];
        for command in ctx.registry.in_group(CommandGroup::Tools) {
            let mut help = command.help().lines();
            lines.push(format!(
                "  {:<15}{}",
                command.name(),
                help.next().unwrap_or_default()
            ));
            for rest in help {
                lines.push(format!("  {:<15}{}", "", rest));
            }
        }
        lines.push(String::new());
        lines.push("These commands are for experts only; misuse can damage an install.".into());
        Ok(Output::Text(lines))
    }
}

struct Status;

impl ShellCommand for Status {
    fn name(&self) -> &'static str {
        "status"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::General
    }

    fn help(&self) -> &'static str {
        "Show cluster status at level 'summary' (default), 'simple' or 'detailed':\n\n  \
         status\n  status 'simple'\n  status 'detailed'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 0, Some(1))?;
        let level = match args.opt_string(0, "status level")? {
            Some(level) => StatusLevel::parse(&level)?,
            None => StatusLevel::default(),
        };
        let lines = ctx.session.admin()?.status(level)?;
        Ok(Output::Text(lines))
    }
}

struct Version;

impl ShellCommand for Version {
    fn name(&self) -> &'static str {
        "version"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::General
    }

    fn help(&self) -> &'static str {
        "Show the shell and store client versions"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        Args::new(self.name(), args, 0, Some(0))?;
        Ok(Output::Text(vec![format!(
            "Version: {}, store: {}",
            env!("CARGO_PKG_VERSION"),
            ctx.session.client().version()
        )]))
    }
}

struct Exit;

impl ShellCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::General
    }

    fn help(&self) -> &'static str {
        "Leave the shell, optionally with an exit code:\n\n  exit\n  exit 2"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 0, Some(1))?;
        let code = match args.opt_int(0, "exit code")? {
            Some(code) => i32::try_from(code)
                .map_err(|_| Error::invalid_type("exit code", "a 32-bit Int", code.to_string()))?,
            None => 0,
        };
        Ok(Output::Exit(code))
    }
}
