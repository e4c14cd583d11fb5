//! PEM armor stripping.
//!
//! A pure text-to-bytes boundary: delimiter lines are discarded, the rest is
//! base64-decoded. No certificate or PKCS structure is validated here.

use asnkit_types::AsnError;

/// Decode PEM-armored text into its binary payload.
///
/// Every line starting with `-----` (the `BEGIN`/`END` delimiters) is
/// dropped; the remaining lines are joined and base64-decoded.
pub fn decode(text: &str) -> Result<Vec<u8>, AsnError> {
    let body = text
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect::<Vec<_>>()
        .join("\n");
    crate::base64::decode(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
-----BEGIN PKCS7-----
MBIGCSqGSIb3DQEHAqAFMAMCAQE=
-----END PKCS7-----
";

    #[test]
    fn test_decode_strips_armor() {
        let der = decode(FIXTURE).unwrap();
        // SEQUENCE { OID 1.2.840.113549.1.7.2, [0] { SEQUENCE { INTEGER 1 } } }
        assert_eq!(
            der,
            [
                0x30, 0x12, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02,
                0xA0, 0x05, 0x30, 0x03, 0x02, 0x01, 0x01
            ]
        );
    }

    #[test]
    fn test_decode_without_trailing_newline() {
        let text = "-----BEGIN X-----\nAQID\n-----END X-----";
        assert_eq!(decode(text).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_invalid_body() {
        let text = "-----BEGIN X-----\nnot base64!\n-----END X-----\n";
        assert_eq!(decode(text).unwrap_err(), AsnError::InvalidBase64);
    }

    #[test]
    #[cfg(feature = "asn1")]
    fn test_decode_then_read() {
        use crate::asn1::{EncodingRule, Reader, Tag, TagClass};

        let der = decode(FIXTURE).unwrap();
        let mut root = Reader::new(&der, EncodingRule::Der);
        let mut content_info = root.read_sequence().unwrap();
        assert_eq!(
            content_info.read_object_identifier().unwrap(),
            "1.2.840.113549.1.7.2"
        );
        let mut content = content_info
            .read_sequence_with_tag(Tag::from_parts(TagClass::ContextSpecific, 0, true))
            .unwrap();
        let mut inner = content.read_sequence().unwrap();
        assert_eq!(
            inner.read_integer().unwrap(),
            asnkit_bignum::BigNum::from(1u64)
        );
    }
}
