//! # Kitchen Rules
//!
//! The "recipe bible" crate - ingredients, cooking methods, the discovery
//! catalog and the recipe rule tables. This crate is the single source of
//! truth for what exists and what combines into what; it performs no I/O and
//! contains no generative logic.

pub mod catalog;
pub mod error;
pub mod items;
pub mod methods;
pub mod recipes;

pub use catalog::*;
pub use error::*;
pub use items::*;
pub use methods::*;
pub use recipes::*;
