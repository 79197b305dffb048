//! SQLite backend for the restaurant engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
