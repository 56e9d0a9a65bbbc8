// src/lib.rs
//! Parses GNT handwriting-sample files into an indexed, sampleable corpus.

pub mod core;
pub mod error;
pub mod loader;
pub mod persistence;
pub mod sampling;
pub use crate::core::reader::GntReader;
pub use crate::error::{GntError, Result};
