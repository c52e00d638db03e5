//! Companion spec discovery.
//!
//! Maps a changed source file to the spec file that most plausibly exercises
//! it, without configuration. Candidate generation (`locations`) is pure and
//! filesystem-agnostic; the search (`search`) prunes it through a [`SpecFs`].

pub mod conventions;
pub mod locations;
pub mod memory;
pub mod search;
pub mod traits;

pub use conventions::*;
pub use locations::*;
pub use memory::*;
pub use search::*;
pub use traits::*;
