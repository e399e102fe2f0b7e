//! Pages and the navigation structure derived from them.

mod metadata;
mod page;
mod tree;
mod nav;

pub use metadata::*;
pub use page::*;
pub use tree::*;
pub use nav::*;
