//! # FlexNet CRC-16
//!
//! Table-driven, non-reflected CRC-16 used by FlexNet for KISS data frames.
//!
//! **Initial Value**: 0xFFFF
//!
//! The same accumulator is used when building outbound frames and when
//! validating inbound ones. The CRC is always computed over unescaped bytes.

use super::protocol::CRC_SEED;

/// FlexNet CRC lookup table
const CRC_FLEX_TABLE: [u16; 256] = [
    0x0F87, 0x1E0E, 0x2C95, 0x3D1C, 0x49A3, 0x582A, 0x6AB1, 0x7B38,
    0x83CF, 0x9246, 0xA0DD, 0xB154, 0xC5EB, 0xD462, 0xE6F9, 0xF770,
    0x1F06, 0x0E8F, 0x3C14, 0x2D9D, 0x5922, 0x48AB, 0x7A30, 0x6BB9,
    0x934E, 0x82C7, 0xB05C, 0xA1D5, 0xD56A, 0xC4E3, 0xF678, 0xE7F1,
    0x2E85, 0x3F0C, 0x0D97, 0x1C1E, 0x68A1, 0x7928, 0x4BB3, 0x5A3A,
    0xA2CD, 0xB344, 0x81DF, 0x9056, 0xE4E9, 0xF560, 0xC7FB, 0xD672,
    0x3E04, 0x2F8D, 0x1D16, 0x0C9F, 0x7820, 0x69A9, 0x5B32, 0x4ABB,
    0xB24C, 0xA3C5, 0x915E, 0x80D7, 0xF468, 0xE5E1, 0xD77A, 0xC6F3,
    0x4D83, 0x5C0A, 0x6E91, 0x7F18, 0x0BA7, 0x1A2E, 0x28B5, 0x393C,
    0xC1CB, 0xD042, 0xE2D9, 0xF350, 0x87EF, 0x9666, 0xA4FD, 0xB574,
    0x5D02, 0x4C8B, 0x7E10, 0x6F99, 0x1B26, 0x0AAF, 0x3834, 0x29BD,
    0xD14A, 0xC0C3, 0xF258, 0xE3D1, 0x976E, 0x86E7, 0xB47C, 0xA5F5,
    0x6C81, 0x7D08, 0x4F93, 0x5E1A, 0x2AA5, 0x3B2C, 0x09B7, 0x183E,
    0xE0C9, 0xF140, 0xC3DB, 0xD252, 0xA6ED, 0xB764, 0x85FF, 0x9476,
    0x7C00, 0x6D89, 0x5F12, 0x4E9B, 0x3A24, 0x2BAD, 0x1936, 0x08BF,
    0xF048, 0xE1C1, 0xD35A, 0xC2D3, 0xB66C, 0xA7E5, 0x957E, 0x84F7,
    0x8B8F, 0x9A06, 0xA89D, 0xB914, 0xCDAB, 0xDC22, 0xEEB9, 0xFF30,
    0x07C7, 0x164E, 0x24D5, 0x355C, 0x41E3, 0x506A, 0x62F1, 0x7378,
    0x9B0E, 0x8A87, 0xB81C, 0xA995, 0xDD2A, 0xCCA3, 0xFE38, 0xEFB1,
    0x1746, 0x06CF, 0x3454, 0x25DD, 0x5162, 0x40EB, 0x7270, 0x63F9,
    0xAA8D, 0xBB04, 0x899F, 0x9816, 0xECA9, 0xFD20, 0xCFBB, 0xDE32,
    0x26C5, 0x374C, 0x05D7, 0x145E, 0x60E1, 0x7168, 0x43F3, 0x527A,
    0xBA0C, 0xAB85, 0x991E, 0x8897, 0xFC28, 0xEDA1, 0xDF3A, 0xCEB3,
    0x3644, 0x27CD, 0x1556, 0x04DF, 0x7060, 0x61E9, 0x5372, 0x42FB,
    0xC98B, 0xD802, 0xEA99, 0xFB10, 0x8FAF, 0x9E26, 0xACBD, 0xBD34,
    0x45C3, 0x544A, 0x66D1, 0x7758, 0x03E7, 0x126E, 0x20F5, 0x317C,
    0xD90A, 0xC883, 0xFA18, 0xEB91, 0x9F2E, 0x8EA7, 0xBC3C, 0xADB5,
    0x5542, 0x44CB, 0x7650, 0x67D9, 0x1366, 0x02EF, 0x3074, 0x21FD,
    0xE889, 0xF900, 0xCB9B, 0xDA12, 0xAEAD, 0xBF24, 0x8DBF, 0x9C36,
    0x64C1, 0x7548, 0x47D3, 0x565A, 0x22E5, 0x336C, 0x01F7, 0x107E,
    0xF808, 0xE981, 0xDB1A, 0xCA93, 0xBE2C, 0xAFA5, 0x9D3E, 0x8CB7,
    0x7440, 0x65C9, 0x5752, 0x46DB, 0x3264, 0x23ED, 0x1176, 0x00FF,
];

/// Fold `data` into a running FlexNet CRC accumulator
///
/// Calling this on a split span with the accumulator carried over yields the
/// same value as a single call over the whole span.
///
/// # Arguments
///
/// * `data` - Unescaped bytes, in stream order
/// * `crc` - Accumulator; start each frame at [`CRC_SEED`]
///
/// # Examples
///
/// ```
/// use kiss_bridge::kiss::crc::update_crc_flex;
///
/// let mut crc = 0xFFFF;
/// update_crc_flex(&[0x20], &mut crc);
/// update_crc_flex(b"HI", &mut crc);
/// assert_eq!(crc, 0xDAD9);
/// ```
pub fn update_crc_flex(data: &[u8], crc: &mut u16) {
    for &byte in data {
        let index = ((*crc >> 8) ^ byte as u16) & 0xFF;
        *crc = (*crc << 8) ^ CRC_FLEX_TABLE[index as usize];
    }
}

/// FlexNet CRC of `data` starting from the standard seed
pub fn crc_flex(data: &[u8]) -> u16 {
    let mut crc = CRC_SEED;
    update_crc_flex(data, &mut crc);
    crc
}
