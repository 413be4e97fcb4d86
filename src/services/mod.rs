//! External service adapters.

pub mod object_store;
