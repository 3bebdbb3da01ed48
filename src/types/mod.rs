//! User-facing parameter types

pub mod swap;

pub use swap::*;
