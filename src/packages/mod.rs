//! # Package Manager Implementations
//!
//! - **Homebrew** (`brew.rs`): the system backend, formulae/casks/taps,
//!   bootstraps Homebrew itself when missing
//! - **Node** (`node.rs`): the language backend, global packages through
//!   npm, yarn, pnpm or bun
//!
//! Commands never name a concrete manager; they ask the
//! [`BackendRegistry`] for a `Box<dyn PackageManager>` by [`Backend`].
//!
//! [`Backend`]: crate::core::types::Backend

pub mod brew;
pub mod node;
pub mod registry;
pub mod traits;

pub use registry::{BackendOptions, BackendRegistry};
pub use traits::PackageManager;
