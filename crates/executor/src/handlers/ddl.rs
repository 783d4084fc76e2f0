//! Schema and table lifecycle commands.

use colshell_core::{Arg, Error, Result};

use crate::command::{Args, CommandContext, CommandGroup, ShellCommand};
use crate::options::{AlterOptions, CreateOptions};
use crate::output::Output;
use crate::registry::CommandRegistry;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(Box::new(Alter));
    registry.register(Box::new(Create));
    registry.register(Box::new(Describe));
    registry.register(Box::new(Disable));
    registry.register(Box::new(DropTable));
    registry.register(Box::new(Enable));
    registry.register(Box::new(Exists));
    registry.register(Box::new(List));
    registry.register(Box::new(Truncate));
}

struct Alter;

impl ShellCommand for Alter {
    fn name(&self) -> &'static str {
        "alter"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Change a table schema; pass the table name and a dictionary.\n\
         \n\
         Add column family 'f1', or change it if it exists, to keep 5 versions:\n  \
         alter 't1', {NAME => 'f1', VERSIONS => 5}\n\
         \n\
         Remove column family 'f1':\n  \
         alter 't1', {NAME => 'f1', METHOD => 'delete'}\n\
         \n\
         Change table attributes MAX_FILESIZE, READONLY, MEMSTORE_FLUSHSIZE or\n\
         DEFERRED_LOG_FLUSH:\n  \
         alter 't1', {METHOD => 'table_att', MAX_FILESIZE => '134217728'}"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 2, Some(2))?;
        let table = args.string(0, "table name")?;
        let map = args
            .opt_dict(1)?
            .ok_or_else(|| Error::invalid_type("alter specification", "Dictionary", "nil"))?;
        let options = AlterOptions::from_dict(map)?;
        ctx.session.admin()?.alter(&table, &options)?;
        Ok(Output::Done)
    }
}

struct Create;

impl ShellCommand for Create {
    fn name(&self) -> &'static str {
        "create"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Create a table; pass the table name and one or more column families,\n\
         each a name or a dictionary of family attributes.\n\
         \n  \
         create 't1', {NAME => 'f1', VERSIONS => 5}\n  \
         create 't1', {NAME => 'f1'}, {NAME => 'f2'}\n  \
         create 't1', 'f1', 'f2', 'f3'\n  \
         create 't1', {NAME => 'f1', VERSIONS => 1, TTL => 2592000, BLOCKCACHE => true}\n\
         \n\
         Family attributes: NAME, VERSIONS, COMPRESSION, IN_MEMORY, BLOCKCACHE,\n\
         BLOCKSIZE, TTL, BLOOMFILTER, REPLICATION_SCOPE."
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, None)?;
        let table = args.string(0, "table name")?;
        let options = CreateOptions::from_args(&table, args.rest(1))?;
        ctx.session.admin()?.create(&table, &options)?;
        Ok(Output::Done)
    }
}

struct Describe;

impl ShellCommand for Describe {
    fn name(&self) -> &'static str {
        "describe"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Show the schema of a table and whether it is enabled:\n\n  describe 't1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(1))?;
        let table = args.string(0, "table name")?;
        let (descriptor, enabled) = ctx.session.admin()?.describe(&table)?;
        Ok(Output::Table {
            columns: vec!["DESCRIPTION".into(), "ENABLED".into()],
            widths: vec![64],
            rows: vec![vec![descriptor.to_string(), enabled.to_string()]],
        })
    }
}

struct Enable;

impl ShellCommand for Enable {
    fn name(&self) -> &'static str {
        "enable"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Enable a table:\n\n  enable 't1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(1))?;
        let table = args.string(0, "table name")?;
        ctx.session.admin()?.enable(&table)?;
        Ok(Output::Done)
    }
}

struct Disable;

impl ShellCommand for Disable {
    fn name(&self) -> &'static str {
        "disable"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Disable a table:\n\n  disable 't1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(1))?;
        let table = args.string(0, "table name")?;
        ctx.session.admin()?.disable(&table)?;
        Ok(Output::Done)
    }
}

struct DropTable;

impl ShellCommand for DropTable {
    fn name(&self) -> &'static str {
        "drop"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Delete a table and its data. The table must be disabled first:\n\n  \
         disable 't1'\n  drop 't1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(1))?;
        let table = args.string(0, "table name")?;
        ctx.session.admin()?.drop(&table)?;
        Ok(Output::Done)
    }
}

struct Exists;

impl ShellCommand for Exists {
    fn name(&self) -> &'static str {
        "exists"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Check whether a table exists:\n\n  exists 't1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(1))?;
        let table = args.string(0, "table name")?;
        let exists = ctx.session.admin()?.exists(&table)?;
        Ok(Output::list([exists.to_string()]))
    }
}

struct List;

impl ShellCommand for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "List all user tables"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        Args::new(self.name(), args, 0, Some(0))?;
        let tables = ctx.session.admin()?.list()?;
        Ok(Output::list(tables))
    }
}

struct Truncate;

impl ShellCommand for Truncate {
    fn name(&self) -> &'static str {
        "truncate"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ddl
    }

    fn help(&self) -> &'static str {
        "Disable, drop and recreate a table with the same schema:\n\n  truncate 't1'\n\n\
         Not atomic: if recreation fails the table stays dropped."
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(1))?;
        let table = args.string(0, "table name")?;
        let CommandContext { session, out, .. } = ctx;
        out.header(&[], &[]);
        session.admin()?.truncate(&table, |step| out.line(step))?;
        Ok(Output::Streamed { row_count: 0 })
    }
}
