//! Small-operand arithmetic and decimal conversion.

use crate::bignum::{BigNum, Limb};
use asnkit_types::AsnError;

/// Largest power of ten that fits a limb, used to chunk decimal output.
const DEC_CHUNK: Limb = 10_000_000_000_000_000_000;
const DEC_CHUNK_DIGITS: usize = 19;

impl BigNum {
    /// Compute `self * mul + add` in place.
    pub(crate) fn mul_small_add(&mut self, mul: Limb, add: Limb) {
        let mut carry = add as u128;
        for limb in self.limbs_mut() {
            let v = (*limb as u128) * (mul as u128) + carry;
            *limb = v as u64;
            carry = v >> 64;
        }
        if carry != 0 {
            self.limbs_mut().push(carry as u64);
        }
    }

    /// Divide by a single limb, returning quotient and remainder.
    pub(crate) fn div_rem_small(&self, divisor: Limb) -> (BigNum, Limb) {
        let limbs = self.limbs();
        let mut quotient = vec![0u64; limbs.len()];
        let mut rem: u128 = 0;
        for i in (0..limbs.len()).rev() {
            let cur = (rem << 64) | limbs[i] as u128;
            quotient[i] = (cur / divisor as u128) as u64;
            rem = cur % divisor as u128;
        }
        (BigNum::from_limbs(quotient), rem as u64)
    }

    /// Parse a decimal string into a BigNum.
    pub fn from_dec_str(s: &str) -> Result<Self, AsnError> {
        if s.is_empty() {
            return Err(AsnError::InvalidDecimal);
        }
        let mut n = BigNum::zero();
        for c in s.bytes() {
            match c {
                b'0'..=b'9' => n.mul_small_add(10, (c - b'0') as u64),
                _ => return Err(AsnError::InvalidDecimal),
            }
        }
        Ok(n)
    }
}

impl std::fmt::Display for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        // Peel off 19 decimal digits per division pass.
        let mut chunks = Vec::new();
        let mut n = self.clone();
        while !n.is_zero() {
            let (q, r) = n.div_rem_small(DEC_CHUNK);
            chunks.push(r);
            n = q;
        }

        write!(f, "{}", chunks[chunks.len() - 1])?;
        for chunk in chunks.iter().rev().skip(1) {
            write!(f, "{chunk:0width$}", width = DEC_CHUNK_DIGITS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_small() {
        assert_eq!(BigNum::zero().to_string(), "0");
        assert_eq!(BigNum::from_u64(42).to_string(), "42");
        assert_eq!(
            BigNum::from_u64(u64::MAX).to_string(),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_from_dec_str() {
        assert_eq!(BigNum::from_dec_str("0").unwrap(), BigNum::zero());
        assert_eq!(BigNum::from_dec_str("42").unwrap(), BigNum::from_u64(42));
        assert_eq!(
            BigNum::from_dec_str("18446744073709551616").unwrap(),
            BigNum::from_bytes_be(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0])
        );
        assert!(BigNum::from_dec_str("").is_err());
        assert!(BigNum::from_dec_str("12a4").is_err());
    }

    #[test]
    fn test_decimal_roundtrip_large() {
        // 0x57c0866126b355aeb829332610a6ff69
        let n = BigNum::from_bytes_be(&[
            0x57, 0xC0, 0x86, 0x61, 0x26, 0xB3, 0x55, 0xAE, 0xB8, 0x29, 0x33, 0x26, 0x10, 0xA6,
            0xFF, 0x69,
        ]);
        assert_eq!(n.to_string(), "116642482170122253773863463039760007017");
        assert_eq!(
            BigNum::from_dec_str("116642482170122253773863463039760007017").unwrap(),
            n
        );
    }

    #[test]
    fn test_decimal_chunk_boundary() {
        // Exactly one chunk worth of digits, then one past it.
        let n = BigNum::from_dec_str("10000000000000000000").unwrap();
        assert_eq!(n.to_string(), "10000000000000000000");
        let n = BigNum::from_dec_str("100000000000000000000000000000000000001").unwrap();
        assert_eq!(n.to_string(), "100000000000000000000000000000000000001");
    }

    #[test]
    fn test_div_rem_small() {
        let n = BigNum::from_dec_str("12345678901234567890123456789").unwrap();
        let (q, r) = n.div_rem_small(10);
        assert_eq!(r, 9);
        assert_eq!(q.to_string(), "1234567890123456789012345678");
    }
}
