#![forbid(unsafe_code)]
#![doc = "Common types and error codes for asnkit."]

pub mod error;

pub use error::*;
