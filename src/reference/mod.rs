//! Naive double-buffered reference simulator.
//!
//! One `bool` per cell, the textbook rule, two full grids swapped each
//! generation. Used to check the packed engine cell by cell.

mod engine;

pub use engine::ReferenceLife;
