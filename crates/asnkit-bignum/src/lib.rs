#![forbid(unsafe_code)]
#![doc = "Arbitrary-precision unsigned integer arithmetic for asnkit."]

mod bignum;
mod ops;

pub use bignum::BigNum;
