//! # PartBin Core Domain Models
//!
//! Domain models shared by the import engine, the record store and the HTTP
//! service.
//!
//! ## Key Models
//!
//! - **Category**: the closed set of part categories
//! - **ComponentRecord**: a normalized record produced by an import
//! - **Component**: a record held by the store, with id and timestamps
//! - **Specifications**: per-category structured attributes

pub mod component;
pub mod specifications;

pub use component::*;
pub use specifications::*;
