//! Contract bindings for the swap pipeline

pub mod erc20;
pub mod router;

pub use erc20::*;
pub use router::*;
