pub mod components;
pub mod health;
pub mod import;

pub use components::*;
pub use health::*;
pub use import::*;
