//! Storage façade tests
//!
//! Operations are grouped by façade method, with end-to-end scenarios and
//! the fail-quiet policy tested separately.

mod get_operations;
mod remove_operations;
mod scenarios;
