//! # PartBin Record Store
//!
//! Process-local component storage behind the HTTP service. Records live in
//! memory for the lifetime of the process.

pub mod repositories;

pub use repositories::*;
