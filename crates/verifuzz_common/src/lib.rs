//! Shared foundational types for the Verifuzz differential fuzzer.
//!
//! This crate provides the common result/error types used across the
//! workspace and the seeded random number generator wrapper that every
//! generator draw goes through.

#![warn(missing_docs)]

pub mod result;
pub mod rng;

pub use result::{FuzzResult, InternalError};
pub use rng::FuzzRng;
