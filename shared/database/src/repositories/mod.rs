//! Repository module for component storage

pub mod component;

pub use component::{
    ComponentFilter, ComponentRepository, ImportFailure, ImportOutcome, InventoryStats, MergeOutcome,
    ALL_CATEGORIES,
};
