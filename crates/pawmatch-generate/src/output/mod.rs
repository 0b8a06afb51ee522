//! Persistence of generated tables.

pub mod csv;

pub use self::csv::{TableDigest, read_table_csv, write_table_csv};
