//! Built-in commands, grouped as they appear in `help`.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `general` | exit, help, status, tools, version |
//! | `ddl` | alter, create, describe, disable, drop, enable, exists, list, truncate |
//! | `dml` | count, delete, deleteall, get, incr, put, scan |
//! | `tools` | close_region, compact, disable_region, enable_region, flush, major_compact, split |

mod ddl;
mod dml;
mod general;
mod tools;

use crate::registry::CommandRegistry;

/// Register every built-in command.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    general::register(registry);
    ddl::register(registry);
    dml::register(registry);
    tools::register(registry);
}
