pub mod error;
pub mod junit;
pub mod parser;

pub use error::*;
pub use junit::*;
pub use parser::*;
