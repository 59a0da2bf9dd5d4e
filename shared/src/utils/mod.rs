//! Common utility functions

pub mod verifiable;

pub use verifiable::*;
