//! Typed models

mod node;
mod result;
mod term;

pub use node::*;
pub use result::*;
pub use term::*;
