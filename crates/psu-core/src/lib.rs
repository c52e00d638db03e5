pub mod model;
pub mod summary;
pub mod types;

pub use model::*;
pub use summary::*;
pub use types::*;
