//! Region surgery commands.
//!
//! Table-or-region commands accept either a table name or a full region
//! name (`table,startkey,id`).

use colshell_core::{Arg, Result};

use crate::admin::Admin;
use crate::command::{Args, CommandContext, CommandGroup, ShellCommand};
use crate::output::Output;
use crate::registry::CommandRegistry;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(Box::new(CloseRegion));
    registry.register(Box::new(RegionOnline {
        name: "enable_region",
        online: true,
    }));
    registry.register(Box::new(RegionOnline {
        name: "disable_region",
        online: false,
    }));
    registry.register(Box::new(TableOrRegion {
        name: "flush",
        help: "Flush the memstores of every region of a table, or of one region:\n\n  \
               flush 'TABLENAME'\n  flush 'REGIONNAME'",
        run: Admin::flush,
    }));
    registry.register(Box::new(TableOrRegion {
        name: "compact",
        help: "Run a minor compaction on every region of a table, or on one region:\n\n  \
               compact 'TABLENAME'\n  compact 'REGIONNAME'",
        run: Admin::compact,
    }));
    registry.register(Box::new(TableOrRegion {
        name: "major_compact",
        help: "Run a major compaction on every region of a table, or on one region:\n\n  \
               major_compact 'TABLENAME'\n  major_compact 'REGIONNAME'",
        run: Admin::major_compact,
    }));
    registry.register(Box::new(TableOrRegion {
        name: "split",
        help: "Split every region of a table, or one region, at its middle row:\n\n  \
               split 'TABLENAME'\n  split 'REGIONNAME'",
        run: Admin::split,
    }));
}

/// Admin operation addressed to a table or a region.
struct TableOrRegion {
    name: &'static str,
    help: &'static str,
    run: fn(&Admin, &str) -> Result<()>,
}

impl ShellCommand for TableOrRegion {
    fn name(&self) -> &'static str {
        self.name
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Tools
    }

    fn help(&self) -> &'static str {
        self.help
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name, args, 1, Some(1))?;
        let target = args.string(0, "table or region name")?;
        (self.run)(ctx.session.admin()?, &target)?;
        Ok(Output::Done)
    }
}

struct RegionOnline {
    name: &'static str,
    online: bool,
}

impl ShellCommand for RegionOnline {
    fn name(&self) -> &'static str {
        self.name
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Tools
    }

    fn help(&self) -> &'static str {
        if self.online {
            "Bring an offline region back online:\n\n  enable_region 'REGIONNAME'"
        } else {
            "Take a region offline:\n\n  disable_region 'REGIONNAME'"
        }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name, args, 1, Some(1))?;
        let region = args.string(0, "region name")?;
        let admin = ctx.session.admin()?;
        if self.online {
            admin.enable_region(&region)?;
        } else {
            admin.disable_region(&region)?;
        }
        Ok(Output::Done)
    }
}

struct CloseRegion;

impl ShellCommand for CloseRegion {
    fn name(&self) -> &'static str {
        "close_region"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Tools
    }

    fn help(&self) -> &'static str {
        "Close a region, optionally naming the server expected to host it:\n\n  \
         close_region 'REGIONNAME'\n  close_region 'REGIONNAME', 'HOST:PORT'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(2))?;
        let region = args.string(0, "region name")?;
        let server = args.opt_string(1, "region server")?;
        ctx.session
            .admin()?
            .close_region(&region, server.as_deref())?;
        Ok(Output::Done)
    }
}
