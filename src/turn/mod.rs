//! Turn engine module
//!
//! Runs the provider-driven pipeline (bootstrap, yearly advance, offer
//! refresh) and the character lifecycle around it.

mod engine;
mod outcome;
pub mod prompts;

pub use engine::*;
pub use outcome::*;
