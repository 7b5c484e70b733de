//! Mutation operation implementations.
//!
//! Each operation validates against the input graph and then derives the
//! result with the graph's raw primitives.

mod add;
mod remove;
mod replace;

pub use add::execute_add;
pub use remove::execute_remove;
pub use replace::execute_replace;
