//! Read-side views for the Python host
//!
//! `LifeView` holds one character's record in Rust memory and hands pages
//! of history to Python on demand; the board functions build the dashboard
//! and leaderboard listings, and the report classes wrap engine outcomes.

mod board;
mod life;
mod report;

pub use board::*;
pub use life::*;
pub use report::*;
