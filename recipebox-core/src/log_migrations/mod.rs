//! Event log schema migrations
//!
//! SQL files are embedded with `include_str!` and applied in the order
//! listed. `000_migrations.sql` bootstraps the bookkeeping table and is
//! always applied first.

/// (file name, SQL) pairs. Append new files here with the next NNN prefix.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
