use crate::common::BitDepth;

/// Reinterprets the low `bits` bits of `value` as a two's-complement
/// signed integer.
///
/// Widths of 8, 16 and 32 bits map onto the native signed types. Any
/// other width takes the generic sign-extension path: values at or above
/// `2^(bits - 1)` wrap around to the negative range.
#[inline]
pub fn to_signed(value: u64, bits: BitDepth) -> i64 {
    match bits {
        8 => value as u8 as i8 as i64,
        16 => value as u16 as i16 as i64,
        32 => value as u32 as i32 as i64,
        _ if bits >= 64 => value as i64,
        _ => {
            let msb = 1u64 << (bits - 1);
            if value >= msb {
                (value as i128 - (1i128 << bits)) as i64
            } else {
                value as i64
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::quickcheck;

    quickcheck! {
        fn matches_native_i8(value: u8) -> bool {
            to_signed(value as u64, 8) == value as i8 as i64
        }

        fn matches_native_i16(value: u16) -> bool {
            to_signed(value as u64, 16) == value as i16 as i64
        }

        fn matches_native_i32(value: u32) -> bool {
            to_signed(value as u64, 32) == value as i32 as i64
        }
    }

    #[test]
    fn native_width_edges() {
        assert_eq!(to_signed(0xFF, 8), -1);
        assert_eq!(to_signed(0x8000, 16), -32768);
        assert_eq!(to_signed(0x7FFF_FFFF, 32), 2_147_483_647);
        assert_eq!(to_signed(0x8000_0000, 32), -2_147_483_648);
    }

    #[test]
    fn generic_width_12() {
        assert_eq!(to_signed(0, 12), 0);
        assert_eq!(to_signed(2047, 12), 2047);
        assert_eq!(to_signed(2048, 12), -2048);
        assert_eq!(to_signed(4095, 12), -1);
    }

    #[test]
    fn generic_width_24() {
        assert_eq!(to_signed(0x7F_FFFF, 24), 8_388_607);
        assert_eq!(to_signed(0x80_0000, 24), -8_388_608);
        assert_eq!(to_signed(0xFF_FFFF, 24), -1);
    }
}
