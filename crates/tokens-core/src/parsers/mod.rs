//! Leaf parsers (C1-C3). Each turns a source-specific literal into a typed
//! value or `None` ("no-value"); none of them ever panics on malformed
//! input.

pub mod color;
pub mod dimension;
pub mod shadow;

pub use color::parse_color;
pub use dimension::{parse_border_radius, parse_dimension};
pub use shadow::parse_shadow;
