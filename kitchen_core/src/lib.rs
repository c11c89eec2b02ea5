//! # Kitchen Core
//!
//! The workbench of Gourmet Lab. This crate takes the ingredients a player
//! stages, resolves them against the recipe tables from `kitchen_rules`, and
//! falls back to a generative text service when no recipe applies.
//!
//! ## Core Components
//!
//! - **engine**: the resolution state machine (`Idle -> Resolving -> Idle/Failure`)
//! - **fallback**: the contract for, and HTTP adapter to, the generative service
//! - **history**: the append-only discovery log
//! - **storage**: blob-store persistence of catalog, history and ledger
//! - **session**: owns all of the above and saves after every mutation
//!
//! ## Design Philosophy
//!
//! - **Rules First**: the generative service is only asked when no recipe matches
//! - **Always Converges**: every failure is soft and the engine returns to idle
//! - **Storage-Free Engine**: the engine never touches storage; the session does

pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod history;
pub mod session;
pub mod storage;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use fallback::*;
pub use history::*;
pub use session::*;
pub use storage::*;
