//! Fixed-grid Conway's Game of Life (B3/S23) with a nybble-packed kernel.

pub mod nybblelife;
pub mod reference;
pub use nybblelife::{Board, Dimensions, LifeError, NybbleLife, NybbleLifeConfig, Schedule, advance};
pub use reference::ReferenceLife;
