//! Character state records
//!
//! Plain data owned by the store. The turn engine reads these, builds a
//! change set, and hands it back to the store in one commit.

mod character;
mod records;

pub use character::*;
pub use records::*;
