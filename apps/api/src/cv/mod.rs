// Document model and editing: fixed records, repeatable sections, keyword matching, CSV import.
// Everything here except `handlers` is synchronous and free of I/O.

pub mod collection;
pub mod handlers;
pub mod import;
pub mod keywords;
pub mod models;
