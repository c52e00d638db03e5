pub mod config;
pub mod doctor;
pub mod engine;
pub mod error;
pub mod util;

pub use config::*;
pub use doctor::*;
pub use engine::*;
pub use error::*;
pub use util::*;
