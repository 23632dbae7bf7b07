//! CRC-7 used by the ENS210 to protect the `T_VAL` and `H_VAL` registers.
//!
//! The check code covers the 17 low bits of a measurement word (16 data bits
//! and the valid bit). It is computed by long division, most significant bit
//! first, with the generator `x^7 + x^3 + 1` and an initial vector of all
//! ones appended below the payload.

/// Generator polynomial `x^7 + x^3 + 1`, all eight coefficients.
pub const CRC7_POLY: u32 = 0x89;
/// Initial vector, seven bits high.
pub const CRC7_IVEC: u32 = 0x7f;
/// Width of the check code.
pub const CRC7_WIDTH: u32 = 7;
/// Width of the protected payload (data and valid bit).
pub const PAYLOAD_WIDTH: u32 = 17;
/// Mask selecting the protected payload.
pub const PAYLOAD_MASK: u32 = (1 << PAYLOAD_WIDTH) - 1;

/// Computes the 7-bit check code of a 17-bit payload.
///
/// Bits above [`PAYLOAD_MASK`] are ignored.
pub const fn crc7(payload: u32) -> u8 {
    // align the polynomial's leading term with the payload MSB, leaving room for the code
    let mut pol = CRC7_POLY << (PAYLOAD_WIDTH - 1);
    let mut bit = 1 << (PAYLOAD_WIDTH - 1 + CRC7_WIDTH);
    let mut val = ((payload & PAYLOAD_MASK) << CRC7_WIDTH) | CRC7_IVEC;
    while bit & (PAYLOAD_MASK << CRC7_WIDTH) != 0 {
        if bit & val != 0 {
            val ^= pol;
        }
        bit >>= 1;
        pol >>= 1;
    }
    (val & CRC7_IVEC) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        // data 17920 (280 K), valid
        assert_eq!(crc7(0x1_4600), 0x07);
        // data 17920, not valid
        assert_eq!(crc7(0x0_4600), 0x28);
        assert_eq!(crc7(0x0_0000), 0x7f);
        assert_eq!(crc7(0x1_0000), 0x50);
        assert_eq!(crc7(0x1_ffff), 0x35);
        assert_eq!(crc7(0x1_4a6c), 0x49);
    }

    #[test]
    fn ignores_bits_above_payload() {
        assert_eq!(crc7(0xff_0000 | 0x1_4600), crc7(0x1_4600));
    }

    #[test]
    fn single_bit_flips_are_detected() {
        for payload in [0x0_0000, 0x1_4600, 0x1_ffff, 0x0_8001, 0x1_2345] {
            let code = crc7(payload);
            for bit in 0..PAYLOAD_WIDTH {
                assert_ne!(
                    crc7(payload ^ (1 << bit)),
                    code,
                    "flip of bit {bit} in {payload:#x} not detected"
                );
            }
        }
    }

    #[test]
    fn fits_in_seven_bits() {
        for payload in (0..=PAYLOAD_MASK).step_by(97) {
            assert!(crc7(payload) <= 0x7f);
        }
    }
}
