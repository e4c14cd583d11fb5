//! Error types shared by every asnkit crate.

/// The broad category of a decoding failure.
///
/// Callers that need to distinguish "the bytes are not valid ASN.1" from
/// "the bytes disagree with the structure I asked for" from "the encoding
/// uses a feature this decoder deliberately does not implement" can match
/// on [`AsnError::kind`] instead of inspecting individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The buffer is not valid ASN.1 under the requested encoding rule.
    MalformedInput,
    /// The element present does not match the tag the caller asked to read.
    SchemaMismatch,
    /// The encoding uses a feature this decoder deliberately rejects.
    Unsupported,
}

/// ASN.1 decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AsnError {
    // Malformed input
    #[error("insufficient bytes for ASN.1 contents: need {need}, got {got}")]
    InsufficientBytes { need: usize, got: usize },
    #[error("reserved length-of-length encoding")]
    ReservedLengthOfLength,
    #[error("declared length overflows the platform word")]
    LengthOverflow,
    #[error("invalid universal tag number: 0x{0:02x}")]
    InvalidUniversalTag(u8),
    #[error("indefinite length is not valid in DER")]
    IndefiniteLengthInDer,
    #[error("indefinite length on a primitive element")]
    IndefiniteLengthPrimitive,
    #[error("missing end-of-contents octets")]
    MissingEndOfContents,
    #[error("NULL contents must be empty")]
    InvalidNull,
    #[error("BOOLEAN length invalid: {0}")]
    BooleanLength(usize),
    #[error("BOOLEAN encoding invalid: 0x{0:02x}")]
    BooleanEncoding(u8),
    #[error("empty OBJECT IDENTIFIER")]
    EmptyObjectIdentifier,
    #[error("truncated OBJECT IDENTIFIER arc")]
    TruncatedObjectIdentifier,
    #[error("OBJECT IDENTIFIER arc overflow")]
    OidArcOverflow,
    #[error("invalid BIT STRING encoding")]
    InvalidBitString,
    #[error("character string is not valid utf-8")]
    InvalidUtf8,
    #[error("invalid time encoding")]
    InvalidTime,
    #[error("invalid base64 input")]
    InvalidBase64,
    #[error("invalid decimal digit")]
    InvalidDecimal,

    // Schema mismatch
    #[error("expected tag 0x{expected:02x}, got 0x{actual:02x}")]
    UnexpectedTag { expected: u8, actual: u8 },

    // Unsupported features
    #[error("high tag number form is not supported")]
    HighTagNumberForm,
    #[error("negative INTEGER values are not supported")]
    NegativeInteger,
}

impl AsnError {
    /// Map this error onto its broad category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AsnError::InsufficientBytes { .. }
            | AsnError::ReservedLengthOfLength
            | AsnError::LengthOverflow
            | AsnError::InvalidUniversalTag(_)
            | AsnError::IndefiniteLengthInDer
            | AsnError::IndefiniteLengthPrimitive
            | AsnError::MissingEndOfContents
            | AsnError::InvalidNull
            | AsnError::BooleanLength(_)
            | AsnError::BooleanEncoding(_)
            | AsnError::EmptyObjectIdentifier
            | AsnError::TruncatedObjectIdentifier
            | AsnError::OidArcOverflow
            | AsnError::InvalidBitString
            | AsnError::InvalidUtf8
            | AsnError::InvalidTime
            | AsnError::InvalidBase64
            | AsnError::InvalidDecimal => ErrorKind::MalformedInput,
            AsnError::UnexpectedTag { .. } => ErrorKind::SchemaMismatch,
            AsnError::HighTagNumberForm | AsnError::NegativeInteger => ErrorKind::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            AsnError::InsufficientBytes { need: 4, got: 1 }.kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            AsnError::UnexpectedTag {
                expected: 0x30,
                actual: 0x06
            }
            .kind(),
            ErrorKind::SchemaMismatch
        );
        assert_eq!(AsnError::NegativeInteger.kind(), ErrorKind::Unsupported);
        assert_eq!(AsnError::HighTagNumberForm.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_display() {
        let err = AsnError::UnexpectedTag {
            expected: 0x30,
            actual: 0x06,
        };
        assert_eq!(err.to_string(), "expected tag 0x30, got 0x06");
        assert_eq!(
            AsnError::InvalidUniversalTag(0xA0).to_string(),
            "invalid universal tag number: 0xa0"
        );
    }
}
