//! Data read and write commands.

use colshell_core::{to_string_binary, Arg, Error, OptionMap, Result};

use crate::command::{Args, CommandContext, CommandGroup, ShellCommand};
use crate::options::{keys, GetOptions, ScanOptions};
use crate::output::Output;
use crate::registry::CommandRegistry;
use crate::table::DEFAULT_COUNT_INTERVAL;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(Box::new(Count));
    registry.register(Box::new(Delete));
    registry.register(Box::new(DeleteAll));
    registry.register(Box::new(Get));
    registry.register(Box::new(Incr));
    registry.register(Box::new(Put));
    registry.register(Box::new(Scan));
}

struct Count;

impl ShellCommand for Count {
    fn name(&self) -> &'static str {
        "count"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Count the rows of a table; this may take a long time on large tables.\n\
         The running count is shown every 1000 rows unless another interval is given:\n\n  \
         count 't1'\n  count 't1', 100000"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(2))?;
        let name = args.string(0, "table name")?;
        let interval = match args.opt_int(1, "count interval")? {
            Some(n) if n < 1 => {
                return Err(Error::invalid_type(
                    "count interval",
                    "a positive Int",
                    n.to_string(),
                ))
            }
            Some(n) => n as u64,
            None => DEFAULT_COUNT_INTERVAL,
        };
        let table = ctx.session.table(&name)?;
        let out = &mut *ctx.out;
        out.header(&[], &[]);
        let count = table.count(interval, |n, row| {
            out.row(&[format!("Current count: {}, row: {}", n, to_string_binary(row))]);
        })?;
        Ok(Output::Streamed { row_count: count })
    }
}

struct Delete;

impl ShellCommand for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Delete the newest version of a cell, or the version at the given timestamp.\n\
         A bare family deletes every column of that family in the row:\n\n  \
         delete 't1', 'r1', 'c1:q'\n  delete 't1', 'r1', 'c1:q', ts1\n  delete 't1', 'r1', 'c1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 3, Some(4))?;
        let name = args.string(0, "table name")?;
        let row = args.bytes(1, "row")?;
        let column = args.column(2)?;
        let timestamp = args.opt_timestamp(3)?;
        ctx.session.table(&name)?.delete(&row, &column, timestamp)?;
        Ok(Output::Done)
    }
}

struct DeleteAll;

impl ShellCommand for DeleteAll {
    fn name(&self) -> &'static str {
        "deleteall"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Delete all cells of a row, optionally only of one column or family and\n\
         only up to a timestamp:\n\n  \
         deleteall 't1', 'r1'\n  deleteall 't1', 'r1', 'c1'\n  deleteall 't1', 'r1', 'c1:q', ts1"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 2, Some(4))?;
        let name = args.string(0, "table name")?;
        let row = args.bytes(1, "row")?;
        let column = args.opt_column(2)?;
        let timestamp = args.opt_timestamp(3)?;
        ctx.session
            .table(&name)?
            .deleteall(&row, column.as_ref(), timestamp)?;
        Ok(Output::Done)
    }
}

struct Get;

impl ShellCommand for Get {
    fn name(&self) -> &'static str {
        "get"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Read a row or some of its cells; pass the table name, the row and\n\
         optionally a dictionary of COLUMN(S), TIMESTAMP, VERSIONS and MAXLENGTH:\n\n  \
         get 't1', 'r1'\n  \
         get 't1', 'r1', {COLUMN => 'c1'}\n  \
         get 't1', 'r1', {COLUMN => ['c1', 'c2', 'c3']}\n  \
         get 't1', 'r1', {COLUMN => 'c1', TIMESTAMP => ts1}\n  \
         get 't1', 'r1', {COLUMN => 'c1', TIMESTAMP => ts1, VERSIONS => 4}\n  \
         get 't1', 'r1', 'c1'"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 2, Some(3))?;
        let name = args.string(0, "table name")?;
        let row = args.bytes(1, "row")?;
        let shorthand: OptionMap;
        let map = match args.rest(2).first() {
            Some(columns @ (Arg::Str(_) | Arg::Bytes(_) | Arg::List(_))) => {
                shorthand = [(keys::COLUMN.to_string(), columns.clone())].into();
                Some(&shorthand)
            }
            _ => args.opt_dict(2)?,
        };
        let options = GetOptions::from_options(map)?;

        let table = ctx.session.table(&name)?;
        let cells = table.get(&row, &options)?;
        Ok(Output::Table {
            columns: vec!["COLUMN".into(), "CELL".into()],
            widths: Vec::new(),
            rows: cells
                .iter()
                .map(|cell| vec![cell.column(), table.render_cell(cell, options.max_length)])
                .collect(),
        })
    }
}

struct Incr;

impl ShellCommand for Incr {
    fn name(&self) -> &'static str {
        "incr"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Add to a counter cell (by 1 unless another amount is given) and show the\n\
         new value:\n\n  incr 't1', 'r1', 'c1'\n  incr 't1', 'r1', 'c1', 10"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 3, Some(4))?;
        let name = args.string(0, "table name")?;
        let row = args.bytes(1, "row")?;
        let column = args.column(2)?;
        let delta = args.opt_int(3, "increment")?.unwrap_or(1);
        let value = ctx.session.table(&name)?.incr(&row, &column, delta)?;
        Ok(Output::Counter(value))
    }
}

struct Put;

impl ShellCommand for Put {
    fn name(&self) -> &'static str {
        "put"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Write a cell value, optionally at an explicit timestamp:\n\n  \
         put 't1', 'r1', 'c1', 'value'\n  put 't1', 'r1', 'c1', 'value', ts1"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 4, Some(5))?;
        let name = args.string(0, "table name")?;
        let row = args.bytes(1, "row")?;
        let column = args.column(2)?;
        let value = args.value(3)?;
        let timestamp = args.opt_timestamp(4)?;
        ctx.session
            .table(&name)?
            .put(&row, &column, value, timestamp)?;
        Ok(Output::Done)
    }
}

struct Scan;

impl ShellCommand for Scan {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Dml
    }

    fn help(&self) -> &'static str {
        "Scan a table; pass the table name and optionally a dictionary of\n\
         COLUMNS, STARTROW, STOPROW, TIMESTAMP, VERSIONS, LIMIT, CACHE_BLOCKS,\n\
         FILTER and MAXLENGTH. Without COLUMNS every family is scanned:\n\n  \
         scan '.META.'\n  \
         scan '.META.', {COLUMNS => 'info:regioninfo'}\n  \
         scan 't1', {COLUMNS => ['c1', 'c2'], LIMIT => 10, STARTROW => 'xyz'}\n  \
         scan 't1', {FILTER => \"PrefixFilter('row')\"}\n  \
         scan 't1', {COLUMNS => 'c1', CACHE_BLOCKS => false}"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output> {
        let args = Args::new(self.name(), args, 1, Some(2))?;
        let name = args.string(0, "table name")?;
        let options = ScanOptions::from_options(args.opt_dict(1)?)?;

        let table = ctx.session.table(&name)?;
        let out = &mut *ctx.out;
        out.header(&["ROW", "COLUMN+CELL"], &[]);
        let rows = table.scan_each(&options, |row| {
            let key = to_string_binary(&row.row);
            for cell in &row.cells {
                out.row(&[
                    key.clone(),
                    format!(
                        "column={}, {}",
                        cell.column(),
                        table.render_cell(cell, options.max_length)
                    ),
                ]);
            }
            Ok(())
        })?;
        Ok(Output::Streamed { row_count: rows })
    }
}
