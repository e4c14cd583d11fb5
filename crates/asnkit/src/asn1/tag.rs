//! Tag construction, validation, and the packed single-byte form.

use super::{Tag, TagClass, UniversalTag};
use asnkit_types::AsnError;

impl TagClass {
    /// Class from the top two bits of a tag byte.
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            3 => TagClass::Private,
            _ => unreachable!(),
        }
    }

    pub(crate) fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0,
            TagClass::Application => 1,
            TagClass::ContextSpecific => 2,
            TagClass::Private => 3,
        }
    }
}

impl Tag {
    /// Build a universal-class tag from a raw tag number.
    ///
    /// Fails unless the number is one of the recognized [`UniversalTag`]
    /// codes — an unrecognized universal number means the buffer is not
    /// valid ASN.1 for this decoder, not that the caller asked for the
    /// wrong structure.
    pub fn universal(number: u8, constructed: bool) -> Result<Self, AsnError> {
        if UniversalTag::from_number(number).is_none() {
            return Err(AsnError::InvalidUniversalTag(number));
        }
        Ok(Self {
            class: TagClass::Universal,
            number,
            constructed,
        })
    }

    /// Build a tag from a known-valid universal tag.
    pub fn from_universal(tag: UniversalTag, constructed: bool) -> Self {
        Self {
            class: TagClass::Universal,
            number: tag.number(),
            constructed,
        }
    }

    /// Build a non-universal tag and require it to equal `expected`.
    ///
    /// A mismatch is a schema error: the bytes were self-consistent, the
    /// caller's assumed structure was not.
    pub fn specified(
        class: TagClass,
        number: u8,
        expected: Tag,
        constructed: bool,
    ) -> Result<Self, AsnError> {
        let tag = Self {
            class,
            number,
            constructed,
        };
        if tag != expected {
            return Err(AsnError::UnexpectedTag {
                expected: expected.encoded(),
                actual: tag.encoded(),
            });
        }
        Ok(tag)
    }

    /// Build a tag from its three logical fields.
    ///
    /// Used by callers to express the tag they expect to see next (for
    /// example a context-specific `[0]`) without knowing the raw byte.
    /// The number is masked to the 5-bit field; no universal validation is
    /// applied, since non-universal numbers are protocol-defined.
    pub fn from_parts(class: TagClass, number: u8, constructed: bool) -> Self {
        Self {
            class,
            number: number & 0x1F,
            constructed,
        }
    }

    /// The packed single-byte encoding:
    /// `class << 6 | constructed << 5 | number`.
    pub fn encoded(&self) -> u8 {
        (self.class.bits() << 6) | ((self.constructed as u8) << 5) | self.number
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }
}

/// Split a raw tag byte into (class, constructed, number bits).
pub(crate) fn split_tag_byte(byte: u8) -> (TagClass, bool, u8) {
    (
        TagClass::from_bits(byte >> 6),
        byte & 0x20 != 0,
        byte & 0x1F,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universal_known_numbers() {
        let tag = Tag::universal(0x10, true).unwrap();
        assert_eq!(tag.class(), TagClass::Universal);
        assert_eq!(tag.number(), 0x10);
        assert!(tag.is_constructed());
        assert_eq!(tag.encoded(), 0x30);
    }

    #[test]
    fn test_universal_rejects_unknown_number() {
        assert_eq!(
            Tag::universal(0x0F, false),
            Err(AsnError::InvalidUniversalTag(0x0F))
        );
    }

    #[test]
    fn test_specified_requires_equality() {
        let expected = Tag::from_parts(TagClass::ContextSpecific, 0, true);
        assert!(Tag::specified(TagClass::ContextSpecific, 0, expected, true).is_ok());

        // Wrong number
        let err = Tag::specified(TagClass::ContextSpecific, 1, expected, true).unwrap_err();
        assert_eq!(
            err,
            AsnError::UnexpectedTag {
                expected: 0xA0,
                actual: 0xA1
            }
        );

        // Wrong class
        let err = Tag::specified(TagClass::Application, 0, expected, true).unwrap_err();
        assert_eq!(
            err,
            AsnError::UnexpectedTag {
                expected: 0xA0,
                actual: 0x60
            }
        );

        // Wrong constructed flag
        assert!(Tag::specified(TagClass::ContextSpecific, 0, expected, false).is_err());
    }

    #[test]
    fn test_from_parts_roundtrip() {
        for class in [
            TagClass::Application,
            TagClass::ContextSpecific,
            TagClass::Private,
        ] {
            for number in 0..=30u8 {
                for constructed in [false, true] {
                    let tag = Tag::from_parts(class, number, constructed);
                    let (c, pc, n) = split_tag_byte(tag.encoded());
                    assert_eq!((c, pc, n), (class, constructed, number));
                }
            }
        }
    }

    #[test]
    fn test_context_zero_is_0xa0() {
        let tag = Tag::from_parts(TagClass::ContextSpecific, 0, true);
        assert_eq!(tag.encoded(), 0xA0);
    }
}
