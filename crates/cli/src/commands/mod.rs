//! One module per subcommand. Each `cmd` writes its report to `out` so the
//! commands can be driven against an in-memory store in tests.

pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
