//! Unicode transformation formats: UTF-8, UTF-16, UTF-32.
//!
//! The plain `UTF-16`/`UTF-32` forms sniff a byte-order mark on decode
//! (defaulting to big-endian) and write a big-endian mark before the first
//! encoded character.

use super::DecodeStep;

const BOM: char = '\u{FEFF}';

/// Byte order of a multi-byte code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Big => u16::from_be_bytes(bytes),
            Self::Little => u16::from_le_bytes(bytes),
        }
    }

    fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Big => u32::from_be_bytes(bytes),
            Self::Little => u32::from_le_bytes(bytes),
        }
    }

    fn write_u16(self, unit: u16, out: &mut Vec<u8>) {
        match self {
            Self::Big => out.extend_from_slice(&unit.to_be_bytes()),
            Self::Little => out.extend_from_slice(&unit.to_le_bytes()),
        }
    }

    fn write_u32(self, unit: u32, out: &mut Vec<u8>) {
        match self {
            Self::Big => out.extend_from_slice(&unit.to_be_bytes()),
            Self::Little => out.extend_from_slice(&unit.to_le_bytes()),
        }
    }
}

/// Decodes one UTF-8 scalar value.
///
/// Overlong forms, surrogates and values above U+10FFFF are rejected at the
/// first byte that makes them impossible, so a truncated tail is reported as
/// [`DecodeStep::NeedMoreInput`] only when it could still complete validly.
pub fn decode_utf8(input: &[u8]) -> DecodeStep {
    let Some(&lead) = input.first() else {
        return DecodeStep::NeedMoreInput;
    };
    if lead < 0x80 {
        return DecodeStep::Char {
            ch: char::from(lead),
            consumed: 1,
        };
    }
    let (width, initial) = match lead {
        0xC2..=0xDF => (2, lead & 0x1F),
        0xE0..=0xEF => (3, lead & 0x0F),
        0xF0..=0xF4 => (4, lead & 0x07),
        _ => return DecodeStep::Invalid,
    };

    let mut cp = u32::from(initial);
    for i in 1..width {
        let Some(&b) = input.get(i) else {
            return DecodeStep::NeedMoreInput;
        };
        let allowed = if i == 1 {
            second_byte_range(lead)
        } else {
            0x80..=0xBF
        };
        if !allowed.contains(&b) {
            return DecodeStep::Invalid;
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }
    char::from_u32(cp).map_or(DecodeStep::Invalid, |ch| DecodeStep::Char {
        ch,
        consumed: width,
    })
}

fn second_byte_range(lead: u8) -> std::ops::RangeInclusive<u8> {
    match lead {
        0xE0 => 0xA0..=0xBF,
        0xED => 0x80..=0x9F,
        0xF0 => 0x90..=0xBF,
        0xF4 => 0x80..=0x8F,
        _ => 0x80..=0xBF,
    }
}

/// UTF-16 decoder. `endian` is `None` until a byte-order mark (or the lack
/// of one) fixes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf16Decoder {
    endian: Option<Endian>,
}

impl Utf16Decoder {
    #[must_use]
    pub const fn new(endian: Endian) -> Self {
        Self {
            endian: Some(endian),
        }
    }

    #[must_use]
    pub const fn detecting() -> Self {
        Self { endian: None }
    }

    pub fn decode_next(&mut self, input: &[u8]) -> DecodeStep {
        if input.len() < 2 {
            return DecodeStep::NeedMoreInput;
        }
        let endian = match self.endian {
            Some(endian) => endian,
            None => {
                let sniffed = match (input[0], input[1]) {
                    (0xFE, 0xFF) => Some(Endian::Big),
                    (0xFF, 0xFE) => Some(Endian::Little),
                    _ => None,
                };
                self.endian = Some(sniffed.unwrap_or(Endian::Big));
                if sniffed.is_some() {
                    return DecodeStep::Control { consumed: 2 };
                }
                Endian::Big
            }
        };

        let unit = endian.read_u16([input[0], input[1]]);
        match unit {
            0xD800..=0xDBFF => {
                if input.len() < 4 {
                    return DecodeStep::NeedMoreInput;
                }
                let low = endian.read_u16([input[2], input[3]]);
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return DecodeStep::Invalid;
                }
                let cp = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(cp)
                    .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 4 })
            }
            0xDC00..=0xDFFF => DecodeStep::Invalid,
            _ => char::from_u32(u32::from(unit))
                .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 2 }),
        }
    }
}

/// UTF-16 encoder. `bom_pending` is set until the mark has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf16Encoder {
    endian: Endian,
    bom_pending: bool,
}

impl Utf16Encoder {
    #[must_use]
    pub const fn new(endian: Endian) -> Self {
        Self {
            endian,
            bom_pending: false,
        }
    }

    #[must_use]
    pub const fn with_bom(endian: Endian) -> Self {
        Self {
            endian,
            bom_pending: true,
        }
    }

    pub fn encode_next(&mut self, ch: char, out: &mut Vec<u8>) {
        if self.bom_pending {
            self.bom_pending = false;
            self.endian.write_u16(BOM as u16, out);
        }
        let mut units = [0u16; 2];
        for &unit in ch.encode_utf16(&mut units).iter() {
            self.endian.write_u16(unit, out);
        }
    }
}

/// UTF-32 decoder, same byte-order handling as [`Utf16Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf32Decoder {
    endian: Option<Endian>,
}

impl Utf32Decoder {
    #[must_use]
    pub const fn new(endian: Endian) -> Self {
        Self {
            endian: Some(endian),
        }
    }

    #[must_use]
    pub const fn detecting() -> Self {
        Self { endian: None }
    }

    pub fn decode_next(&mut self, input: &[u8]) -> DecodeStep {
        if input.len() < 4 {
            return DecodeStep::NeedMoreInput;
        }
        let bytes = [input[0], input[1], input[2], input[3]];
        let endian = match self.endian {
            Some(endian) => endian,
            None => {
                let sniffed = match bytes {
                    [0x00, 0x00, 0xFE, 0xFF] => Some(Endian::Big),
                    [0xFF, 0xFE, 0x00, 0x00] => Some(Endian::Little),
                    _ => None,
                };
                self.endian = Some(sniffed.unwrap_or(Endian::Big));
                if sniffed.is_some() {
                    return DecodeStep::Control { consumed: 4 };
                }
                Endian::Big
            }
        };
        char::from_u32(endian.read_u32(bytes))
            .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 4 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf32Encoder {
    endian: Endian,
    bom_pending: bool,
}

impl Utf32Encoder {
    #[must_use]
    pub const fn new(endian: Endian) -> Self {
        Self {
            endian,
            bom_pending: false,
        }
    }

    #[must_use]
    pub const fn with_bom(endian: Endian) -> Self {
        Self {
            endian,
            bom_pending: true,
        }
    }

    pub fn encode_next(&mut self, ch: char, out: &mut Vec<u8>) {
        if self.bom_pending {
            self.bom_pending = false;
            self.endian.write_u32(u32::from(BOM), out);
        }
        self.endian.write_u32(u32::from(ch), out);
    }
}
