//! # Application Layer
//!
//! Store interfaces and the use cases that coordinate them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
