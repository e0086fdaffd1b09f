//! Concrete persistence backends.

pub mod simple_db;

pub use simple_db::SimpleDB;
