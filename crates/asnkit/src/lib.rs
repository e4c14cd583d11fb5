#![forbid(unsafe_code)]
#![doc = "Lazy ASN.1 decoding utilities for asnkit: DER/BER reader, Base64, PEM."]

#[cfg(feature = "asn1")]
pub mod asn1;

#[cfg(feature = "base64")]
pub mod base64;

#[cfg(feature = "pem")]
pub mod pem;
