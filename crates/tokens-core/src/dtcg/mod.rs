//! DTCG-source pipeline: validate (C4) → flatten (C5) → normalize (C6).

pub mod flatten;
pub mod normalize;
pub mod validator;

pub use flatten::{flatten, FlattenedToken};
pub use normalize::normalize;
pub use validator::{validate, ValidationResult};
