//! NybbleLife engine internals and public API.

mod board;
mod engine;
mod error;
pub mod kernel;
mod sync;

pub use board::{Board, Dimensions};
pub use engine::{NybbleLife, NybbleLifeConfig, Schedule, advance};
pub use error::LifeError;
