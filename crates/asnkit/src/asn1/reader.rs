//! The cursor/decoder over a byte window.

use super::tag::split_tag_byte;
use super::{BitString, EncodingRule, Tag, TagClass, UniversalTag};
use asnkit_bignum::BigNum;
use asnkit_types::AsnError;

/// A navigable view over one region of an ASN.1 byte buffer.
///
/// The root reader (from [`Reader::new`]) is a bare window over the whole
/// caller-supplied buffer and carries no tag of its own; every reader
/// produced by a `read_*` call describes one decoded TLV element whose
/// contents are exactly `length` bytes of the original buffer, never copied.
///
/// Reading a field and advancing past it are the same operation: a `read_*`
/// call decodes the next element at this reader's internal cursor and, on
/// success, moves the cursor past the element's total encoded length. There
/// is no rewind. A failed read aborts the parse of that branch; the cursor
/// position after a failure is unspecified.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    tag: Option<Tag>,
    length: usize,
    header_length: usize,
    trailer_length: usize,
    contents: &'a [u8],
    offset: usize,
    rule: EncodingRule,
}

enum Length {
    Definite(usize),
    Indefinite,
}

impl<'a> Reader<'a> {
    /// Create a root reader over a caller-supplied buffer.
    ///
    /// No header is decoded here; the first `read_*` call decodes and
    /// validates the outermost element.
    pub fn new(bytes: &'a [u8], rule: EncodingRule) -> Self {
        Reader {
            tag: None,
            length: bytes.len(),
            header_length: 0,
            trailer_length: 0,
            contents: bytes,
            offset: 0,
            rule,
        }
    }

    /// The decoded tag, or `None` for the root window.
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// Content length in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bytes consumed by the tag and length fields.
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    /// Total bytes this element consumed from its parent: header plus
    /// contents plus, for indefinite-length elements, the two
    /// end-of-contents octets.
    pub fn total_length(&self) -> usize {
        self.header_length + self.length + self.trailer_length
    }

    /// The content window.
    pub fn contents(&self) -> &'a [u8] {
        self.contents
    }

    /// The not-yet-consumed tail of the content window.
    pub fn remaining(&self) -> &'a [u8] {
        &self.contents[self.offset..]
    }

    /// Returns true if there are unconsumed content bytes.
    pub fn has_remaining(&self) -> bool {
        self.offset < self.contents.len()
    }

    /// The encoding rule this reader tree was constructed with.
    pub fn encoding_rule(&self) -> EncodingRule {
        self.rule
    }

    /// Descend into the next element, which must be a universal SEQUENCE.
    pub fn read_sequence(&mut self) -> Result<Reader<'a>, AsnError> {
        self.read_expected(Tag::from_universal(UniversalTag::Sequence, true))
    }

    /// Descend into the next element, which must be a universal SET.
    pub fn read_set_of(&mut self) -> Result<Reader<'a>, AsnError> {
        self.read_expected(Tag::from_universal(UniversalTag::Set, true))
    }

    /// Descend into the next element, validating it against an arbitrary
    /// caller-supplied tag (typically a context-specific tag built with
    /// [`Tag::from_parts`], e.g. a `[0] EXPLICIT` wrapper).
    pub fn read_sequence_with_tag(&mut self, expected: Tag) -> Result<Reader<'a>, AsnError> {
        self.read_expected(expected)
    }

    /// Read an OBJECT IDENTIFIER as its dotted decimal string.
    pub fn read_object_identifier(&mut self) -> Result<String, AsnError> {
        let element = self.read_primitive(UniversalTag::ObjectIdentifier)?;
        decode_oid(element.contents)
    }

    /// Read an INTEGER as an arbitrary-precision value.
    ///
    /// Negative values (two's-complement sign bit set) are deliberately
    /// rejected as unsupported.
    pub fn read_integer(&mut self) -> Result<BigNum, AsnError> {
        let element = self.read_primitive(UniversalTag::Integer)?;
        if let Some(&first) = element.contents.first() {
            if first & 0x80 != 0 {
                return Err(AsnError::NegativeInteger);
            }
        }
        Ok(BigNum::from_bytes_be(element.contents))
    }

    /// Read a NULL element. The contents must be empty.
    pub fn read_null(&mut self) -> Result<(), AsnError> {
        let element = self.read_primitive(UniversalTag::Null)?;
        if !element.contents.is_empty() {
            return Err(AsnError::InvalidNull);
        }
        Ok(())
    }

    /// Read a character string with the given universal tag (UTF8String,
    /// PrintableString, IA5String).
    ///
    /// The contents are interpreted as UTF-8. PrintableString's restricted
    /// character subset is not validated.
    pub fn read_character_string(&mut self, expected: UniversalTag) -> Result<String, AsnError> {
        let element = self.read_primitive(expected)?;
        String::from_utf8(element.contents.to_vec()).map_err(|_| AsnError::InvalidUtf8)
    }

    /// Read a UTCTime value as a UNIX timestamp (seconds, UTC).
    ///
    /// Only the fixed 13-character `YYMMDDHHMMSSZ` form is accepted.
    pub fn read_utc_time(&mut self) -> Result<i64, AsnError> {
        let element = self.read_primitive(UniversalTag::UtcTime)?;
        let s = std::str::from_utf8(element.contents).map_err(|_| AsnError::InvalidTime)?;
        parse_utc_time(s)
    }

    /// Read a GeneralizedTime value as a UNIX timestamp (seconds, UTC).
    ///
    /// Only the fixed 15-character `YYYYMMDDHHMMSSZ` form is accepted.
    pub fn read_generalized_time(&mut self) -> Result<i64, AsnError> {
        let element = self.read_primitive(UniversalTag::GeneralizedTime)?;
        let s = std::str::from_utf8(element.contents).map_err(|_| AsnError::InvalidTime)?;
        parse_generalized_time(s)
    }

    /// Read a BOOLEAN value.
    ///
    /// DER admits exactly 0x00 and 0xFF; BER treats any nonzero byte as
    /// true.
    pub fn read_boolean(&mut self) -> Result<bool, AsnError> {
        let element = self.read_primitive(UniversalTag::Boolean)?;
        if element.contents.len() != 1 {
            return Err(AsnError::BooleanLength(element.contents.len()));
        }
        let value = element.contents[0];
        match self.rule {
            EncodingRule::Der => match value {
                0x00 => Ok(false),
                0xFF => Ok(true),
                other => Err(AsnError::BooleanEncoding(other)),
            },
            EncodingRule::Ber => Ok(value != 0x00),
        }
    }

    /// Read an OCTET STRING, returning its raw content window.
    pub fn read_octet_string(&mut self) -> Result<&'a [u8], AsnError> {
        let element = self.read_primitive(UniversalTag::OctetString)?;
        Ok(element.contents)
    }

    /// Read a BIT STRING: the first content byte is the unused-bit count,
    /// the remainder is the payload.
    pub fn read_bit_string(&mut self) -> Result<BitString, AsnError> {
        let element = self.read_primitive(UniversalTag::BitString)?;
        let contents = element.contents;
        if contents.is_empty() {
            return Err(AsnError::InvalidBitString);
        }
        let unused_bits = contents[0];
        if unused_bits > 7 {
            return Err(AsnError::InvalidBitString);
        }
        Ok(BitString {
            bytes: contents[1..].to_vec(),
            unused_bits,
        })
    }

    fn read_primitive(&mut self, tag: UniversalTag) -> Result<Reader<'a>, AsnError> {
        self.read_expected(Tag::from_universal(tag, false))
    }

    /// Decode the next element at the cursor, require its tag to equal
    /// `expected`, and advance the cursor past it.
    fn read_expected(&mut self, expected: Tag) -> Result<Reader<'a>, AsnError> {
        let window = &self.contents[self.offset..];
        let (tag, element) = Self::decode_element(window, self.rule, expected)?;
        if tag != expected {
            return Err(AsnError::UnexpectedTag {
                expected: expected.encoded(),
                actual: tag.encoded(),
            });
        }
        self.offset += element.total_length();
        Ok(element)
    }

    /// Decode one TLV header at the start of `window` and build the reader
    /// for its contents. A reader whose buffer is shorter than the declared
    /// length is never constructed; the failure happens here instead.
    fn decode_element(
        window: &'a [u8],
        rule: EncodingRule,
        expected: Tag,
    ) -> Result<(Tag, Reader<'a>), AsnError> {
        if window.is_empty() {
            return Err(AsnError::InsufficientBytes { need: 1, got: 0 });
        }
        let (class, constructed, number) = split_tag_byte(window[0]);
        if number == 0x1F {
            return Err(AsnError::HighTagNumberForm);
        }

        let tag = if expected.class() != TagClass::Universal {
            Tag::specified(class, number, expected, constructed)?
        } else {
            if class != TagClass::Universal {
                return Err(AsnError::InvalidUniversalTag(window[0]));
            }
            Tag::universal(number, constructed)?
        };

        let (form, length_bytes) = decode_length(&window[1..])?;
        let header_length = 1 + length_bytes;
        let rest = &window[header_length..];

        let (contents, trailer_length) = match form {
            Length::Definite(len) => {
                if rest.len() < len {
                    return Err(AsnError::InsufficientBytes {
                        need: len,
                        got: rest.len(),
                    });
                }
                (&rest[..len], 0)
            }
            Length::Indefinite => {
                if rule == EncodingRule::Der {
                    return Err(AsnError::IndefiniteLengthInDer);
                }
                if !tag.is_constructed() {
                    return Err(AsnError::IndefiniteLengthPrimitive);
                }
                let len = indefinite_content_len(rest)?;
                (&rest[..len], 2)
            }
        };

        let element = Reader {
            tag: Some(tag),
            length: contents.len(),
            header_length,
            trailer_length,
            contents,
            offset: 0,
            rule,
        };
        Ok((tag, element))
    }
}

/// Decode a length field: short form, long form, or indefinite.
fn decode_length(window: &[u8]) -> Result<(Length, usize), AsnError> {
    if window.is_empty() {
        return Err(AsnError::InsufficientBytes { need: 1, got: 0 });
    }

    let first = window[0];
    if first & 0x80 == 0 {
        return Ok((Length::Definite(first as usize), 1));
    }
    if first == 0x80 {
        return Ok((Length::Indefinite, 1));
    }

    let count = (first & 0x7F) as usize;
    if count == 0x7F {
        return Err(AsnError::ReservedLengthOfLength);
    }
    if window.len() < 1 + count {
        return Err(AsnError::InsufficientBytes {
            need: 1 + count,
            got: window.len(),
        });
    }

    let mut length: usize = 0;
    for &byte in &window[1..1 + count] {
        length = length
            .checked_mul(256)
            .and_then(|l| l.checked_add(byte as usize))
            .ok_or(AsnError::LengthOverflow)?;
    }
    Ok((Length::Definite(length), 1 + count))
}

/// Scan an indefinite-length content region for its end-of-contents marker,
/// skipping whole nested elements so that an EOC inside a nested element is
/// never mistaken for this depth's terminator. Returns the content length,
/// excluding the marker itself.
fn indefinite_content_len(window: &[u8]) -> Result<usize, AsnError> {
    let mut pos = 0;
    loop {
        if window.len() - pos < 2 {
            return Err(AsnError::MissingEndOfContents);
        }
        if window[pos] == 0x00 && window[pos + 1] == 0x00 {
            return Ok(pos);
        }
        pos += skip_element(&window[pos..])?;
    }
}

/// Total encoded size of the element at the start of `window`, descending
/// through nested indefinite-length elements as needed. Only framing is
/// parsed here; tag numbers inside skipped elements are validated when the
/// caller actually walks them.
fn skip_element(window: &[u8]) -> Result<usize, AsnError> {
    let (_, constructed, number) = split_tag_byte(window[0]);
    if number == 0x1F {
        return Err(AsnError::HighTagNumberForm);
    }

    let (form, length_bytes) = decode_length(&window[1..])?;
    let header_length = 1 + length_bytes;
    match form {
        Length::Definite(len) => {
            let total = header_length
                .checked_add(len)
                .ok_or(AsnError::LengthOverflow)?;
            if window.len() < total {
                return Err(AsnError::InsufficientBytes {
                    need: total,
                    got: window.len(),
                });
            }
            Ok(total)
        }
        Length::Indefinite => {
            if !constructed {
                return Err(AsnError::IndefiniteLengthPrimitive);
            }
            let inner = indefinite_content_len(&window[header_length..])?;
            Ok(header_length + inner + 2)
        }
    }
}

/// Decode OBJECT IDENTIFIER contents to the dotted decimal string.
///
/// The first byte folds the first two arcs together (X.690: `b0 / 40` and
/// `b0 % 40`); every following arc is a base-128 big-endian varint whose
/// final byte has the high bit clear.
fn decode_oid(bytes: &[u8]) -> Result<String, AsnError> {
    if bytes.is_empty() {
        return Err(AsnError::EmptyObjectIdentifier);
    }

    let first = bytes[0];
    let mut arcs: Vec<u64> = vec![(first / 40) as u64, (first % 40) as u64];

    let mut value: u64 = 0;
    let mut mid_arc = false;
    for &byte in &bytes[1..] {
        value = value
            .checked_mul(128)
            .and_then(|v| v.checked_add((byte & 0x7F) as u64))
            .ok_or(AsnError::OidArcOverflow)?;
        if byte & 0x80 != 0 {
            mid_arc = true;
        } else {
            arcs.push(value);
            value = 0;
            mid_arc = false;
        }
    }
    if mid_arc {
        return Err(AsnError::TruncatedObjectIdentifier);
    }

    Ok(arcs
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("."))
}

/// Parse UTCTime "YYMMDDHHMMSSZ" to a UNIX timestamp.
/// X.690 pivot: 50-99 map to 1950-1999, 00-49 to 2000-2049.
fn parse_utc_time(s: &str) -> Result<i64, AsnError> {
    let bytes = s.as_bytes();
    if bytes.len() != 13 || bytes[12] != b'Z' || !bytes[..12].iter().all(u8::is_ascii_digit) {
        return Err(AsnError::InvalidTime);
    }
    let yy: u32 = s[0..2].parse().map_err(|_| AsnError::InvalidTime)?;
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    let month: u32 = s[2..4].parse().map_err(|_| AsnError::InvalidTime)?;
    let day: u32 = s[4..6].parse().map_err(|_| AsnError::InvalidTime)?;
    let hour: u32 = s[6..8].parse().map_err(|_| AsnError::InvalidTime)?;
    let min: u32 = s[8..10].parse().map_err(|_| AsnError::InvalidTime)?;
    let sec: u32 = s[10..12].parse().map_err(|_| AsnError::InvalidTime)?;
    datetime_to_unix(year, month, day, hour, min, sec)
}

/// Parse GeneralizedTime "YYYYMMDDHHMMSSZ" to a UNIX timestamp.
fn parse_generalized_time(s: &str) -> Result<i64, AsnError> {
    let bytes = s.as_bytes();
    if bytes.len() != 15 || bytes[14] != b'Z' || !bytes[..14].iter().all(u8::is_ascii_digit) {
        return Err(AsnError::InvalidTime);
    }
    let year: u32 = s[0..4].parse().map_err(|_| AsnError::InvalidTime)?;
    let month: u32 = s[4..6].parse().map_err(|_| AsnError::InvalidTime)?;
    let day: u32 = s[6..8].parse().map_err(|_| AsnError::InvalidTime)?;
    let hour: u32 = s[8..10].parse().map_err(|_| AsnError::InvalidTime)?;
    let min: u32 = s[10..12].parse().map_err(|_| AsnError::InvalidTime)?;
    let sec: u32 = s[12..14].parse().map_err(|_| AsnError::InvalidTime)?;
    datetime_to_unix(year, month, day, hour, min, sec)
}

/// Convert a date-time to a UNIX timestamp (seconds since
/// 1970-01-01 00:00:00 UTC).
fn datetime_to_unix(
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> Result<i64, AsnError> {
    if year == 0
        || !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || hour > 23
        || min > 59
        || sec > 59
    {
        return Err(AsnError::InvalidTime);
    }
    // Days from year 0 to the start of the given year (Gregorian)
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };
    let days = 365 * y as i64 + y as i64 / 4 - y as i64 / 100
        + y as i64 / 400
        + (m as i64 * 306 + 5) / 10
        + (day as i64 - 1)
        - 719468; // offset so epoch = 1970-01-01
    Ok(days * 86400 + hour as i64 * 3600 + min as i64 * 60 + sec as i64)
}
