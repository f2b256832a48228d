//! Input guards applied before identifiers reach the database.

pub mod resource;
