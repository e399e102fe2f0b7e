//! Scanning rendered HTML for headings.

mod heading;
mod toc;

pub use heading::*;
pub use toc::*;
