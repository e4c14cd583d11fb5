//! Base64 decoding.

use asnkit_types::AsnError;

/// Decode a Base64 string to bytes.
///
/// Standard RFC 4648 alphabet, whitespace tolerated anywhere, padding
/// required (input length must be a multiple of four after whitespace is
/// stripped).
pub fn decode(input: &str) -> Result<Vec<u8>, AsnError> {
    let filtered: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if filtered.is_empty() {
        return Ok(Vec::new());
    }

    if filtered.len() % 4 != 0 {
        return Err(AsnError::InvalidBase64);
    }

    let mut output = Vec::with_capacity((filtered.len() / 4) * 3);

    for chunk in filtered.chunks(4) {
        let a = decode_char(chunk[0])?;
        let b = decode_char(chunk[1])?;

        let triple = if chunk[2] == b'=' {
            let val = (a << 18) | (b << 12);
            output.push((val >> 16) as u8);
            continue;
        } else {
            let c = decode_char(chunk[2])?;
            if chunk[3] == b'=' {
                let val = (a << 18) | (b << 12) | (c << 6);
                output.push((val >> 16) as u8);
                output.push((val >> 8) as u8);
                continue;
            } else {
                let d = decode_char(chunk[3])?;
                (a << 18) | (b << 12) | (c << 6) | d
            }
        };

        output.push((triple >> 16) as u8);
        output.push((triple >> 8) as u8);
        output.push(triple as u8);
    }

    Ok(output)
}

fn decode_char(c: u8) -> Result<u32, AsnError> {
    match c {
        b'A'..=b'Z' => Ok((c - b'A') as u32),
        b'a'..=b'z' => Ok((c - b'a' + 26) as u32),
        b'0'..=b'9' => Ok((c - b'0' + 52) as u32),
        b'+' => Ok(62),
        b'/' => Ok(63),
        _ => Err(AsnError::InvalidBase64),
    }
}
