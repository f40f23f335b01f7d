//! Japanese codecs built on JIS X 0201, JIS X 0208 and JIS X 0212.
//!
//! - EUC-JP: JIS X 0208 in `[A1-FE][A1-FE]`, half-width katakana in
//!   `8E [A1-DF]`, JIS X 0212 in `8F [A1-FE][A1-FE]`. The encoder prefers
//!   JIS X 0208 and falls back to JIS X 0212.
//! - Shift_JIS / Windows-31J: the WHATWG `jis0208` index including the
//!   NEC and IBM extension rows, plus the user-defined area mapped to
//!   U+E000..U+E757.
//! - ISO-2022-JP: 7-bit, stateful. Designations switch between ASCII,
//!   JIS X 0201 Roman, JIS X 0201 katakana and JIS X 0208; the encoder only
//!   returns to ASCII on an ASCII character or at
//!   [`Iso2022JpEncoder::finish`].
//!
//! Index pointers come from `encoding-index-japanese`, which reports
//! unmapped entries as `0xFFFF`.

use encoding_index_japanese::{jis0208, jis0212};

use super::{DecodeStep, Unrepresentable};

const UNMAPPED: u32 = 0xFFFF;
const UNMAPPED_POINTER: u16 = 0xFFFF;

/// Pointers addressable by a 94x94 double-byte set.
const JIS0208_CELLS: u16 = 94 * 94;

/// Shift_JIS user-defined area.
const SJIS_PUA_FIRST_POINTER: u16 = 8836;
const SJIS_PUA_LAST_POINTER: u16 = 10715;
const PUA_FIRST: u32 = 0xE000;

const ESC: u8 = 0x1B;

fn halfwidth_katakana(offset: u8) -> char {
    char::from_u32(0xFF61 + u32::from(offset)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn is_halfwidth_katakana(cp: u32) -> bool {
    (0xFF61..=0xFF9F).contains(&cp)
}

fn jis0208_char(pointer: u16) -> Option<char> {
    match jis0208::forward(pointer) {
        UNMAPPED => None,
        cp => char::from_u32(cp),
    }
}

fn grid_cell(pointer: u16) -> Option<u16> {
    (pointer < JIS0208_CELLS).then_some(pointer)
}

/// JIS X 0208 pointer for `ch` inside the 94x94 grid.
fn jis0208_cell(ch: char) -> Option<u16> {
    grid_cell(jis0208::backward(u32::from(ch)))
}

fn jis0212_cell(ch: char) -> Option<u16> {
    grid_cell(jis0212::backward(u32::from(ch)))
}

fn double_byte_row_col(input: &[u8], range: std::ops::RangeInclusive<u8>) -> Option<DecodeStep> {
    match input.get(1) {
        None => Some(DecodeStep::NeedMoreInput),
        Some(trail) if !range.contains(trail) => Some(DecodeStep::Invalid),
        Some(_) => None,
    }
}

// ---------------------------------------------------------------------------
// EUC-JP
// ---------------------------------------------------------------------------

pub fn decode_euc_jp(input: &[u8]) -> DecodeStep {
    let Some(&lead) = input.first() else {
        return DecodeStep::NeedMoreInput;
    };
    match lead {
        0x00..=0x7F => DecodeStep::Char {
            ch: char::from(lead),
            consumed: 1,
        },
        0x8E => match input.get(1) {
            None => DecodeStep::NeedMoreInput,
            Some(&trail @ 0xA1..=0xDF) => DecodeStep::Char {
                ch: halfwidth_katakana(trail - 0xA1),
                consumed: 2,
            },
            Some(_) => DecodeStep::Invalid,
        },
        0x8F => {
            if let Some(step) = double_byte_row_col(input, 0xA1..=0xFE) {
                return step;
            }
            let Some(&trail) = input.get(2) else {
                return DecodeStep::NeedMoreInput;
            };
            if !(0xA1..=0xFE).contains(&trail) {
                return DecodeStep::Invalid;
            }
            let pointer = u16::from(input[1] - 0xA1) * 94 + u16::from(trail - 0xA1);
            match jis0212::forward(pointer) {
                UNMAPPED => DecodeStep::Invalid,
                cp => char::from_u32(cp)
                    .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 3 }),
            }
        }
        0xA1..=0xFE => {
            if let Some(step) = double_byte_row_col(input, 0xA1..=0xFE) {
                return step;
            }
            let pointer = u16::from(lead - 0xA1) * 94 + u16::from(input[1] - 0xA1);
            jis0208_char(pointer)
                .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 2 })
        }
        _ => DecodeStep::Invalid,
    }
}

pub fn encode_euc_jp(ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
    let cp = u32::from(ch);
    if cp < 0x80 {
        out.push(cp as u8);
        return Ok(());
    }
    if is_halfwidth_katakana(cp) {
        out.extend_from_slice(&[0x8E, (cp - 0xFF61) as u8 + 0xA1]);
        return Ok(());
    }
    if let Some(pointer) = jis0208_cell(ch) {
        out.extend_from_slice(&[(pointer / 94) as u8 + 0xA1, (pointer % 94) as u8 + 0xA1]);
        return Ok(());
    }
    let pointer = jis0212_cell(ch).ok_or(Unrepresentable)?;
    out.extend_from_slice(&[
        0x8F,
        (pointer / 94) as u8 + 0xA1,
        (pointer % 94) as u8 + 0xA1,
    ]);
    Ok(())
}

// ---------------------------------------------------------------------------
// Shift_JIS / Windows-31J
// ---------------------------------------------------------------------------

pub fn decode_shift_jis(input: &[u8]) -> DecodeStep {
    let Some(&lead) = input.first() else {
        return DecodeStep::NeedMoreInput;
    };
    match lead {
        0x00..=0x7F => DecodeStep::Char {
            ch: char::from(lead),
            consumed: 1,
        },
        0xA1..=0xDF => DecodeStep::Char {
            ch: halfwidth_katakana(lead - 0xA1),
            consumed: 1,
        },
        0x81..=0x9F | 0xE0..=0xFC => {
            let Some(&trail) = input.get(1) else {
                return DecodeStep::NeedMoreInput;
            };
            if !matches!(trail, 0x40..=0x7E | 0x80..=0xFC) {
                return DecodeStep::Invalid;
            }
            let lead_offset = if lead < 0xA0 { 0x81 } else { 0xC1 };
            let trail_offset = if trail < 0x7F { 0x40 } else { 0x41 };
            let pointer = u16::from(lead - lead_offset) * 188 + u16::from(trail - trail_offset);
            let decoded = if (SJIS_PUA_FIRST_POINTER..=SJIS_PUA_LAST_POINTER).contains(&pointer) {
                char::from_u32(PUA_FIRST + u32::from(pointer - SJIS_PUA_FIRST_POINTER))
            } else {
                jis0208_char(pointer)
            };
            decoded.map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 2 })
        }
        _ => DecodeStep::Invalid,
    }
}

/// Shift_JIS pointer for `ch`. Characters duplicated in the NEC-selected
/// rows are written with their IBM extension pointer, as Windows does.
fn shift_jis_pointer(ch: char) -> Option<u16> {
    let cp = u32::from(ch);
    let pua_last = PUA_FIRST + u32::from(SJIS_PUA_LAST_POINTER - SJIS_PUA_FIRST_POINTER);
    if (PUA_FIRST..=pua_last).contains(&cp) {
        return Some(SJIS_PUA_FIRST_POINTER + (cp - PUA_FIRST) as u16);
    }
    match jis0208::backward_remapped(cp) {
        UNMAPPED_POINTER => None,
        pointer => Some(pointer),
    }
}

pub fn encode_shift_jis(ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
    let cp = u32::from(ch);
    if cp < 0x80 {
        out.push(cp as u8);
        return Ok(());
    }
    if is_halfwidth_katakana(cp) {
        out.push((cp - 0xFF61) as u8 + 0xA1);
        return Ok(());
    }
    let pointer = shift_jis_pointer(ch).ok_or(Unrepresentable)?;
    let lead = pointer / 188;
    let trail = pointer % 188;
    let lead_offset = if lead < 0x1F { 0x81 } else { 0xC1 };
    let trail_offset = if trail < 0x3F { 0x40 } else { 0x41 };
    out.extend_from_slice(&[(lead + lead_offset) as u8, (trail + trail_offset) as u8]);
    Ok(())
}

// ---------------------------------------------------------------------------
// ISO-2022-JP
// ---------------------------------------------------------------------------

/// Graphic set currently designated into G0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Iso2022JpSet {
    #[default]
    Ascii,
    Roman,
    Jis0208,
    Katakana,
}

impl Iso2022JpSet {
    /// Escape sequence designating this set.
    #[must_use]
    pub const fn designation(self) -> &'static [u8; 3] {
        match self {
            Self::Ascii => b"\x1b(B",
            Self::Roman => b"\x1b(J",
            Self::Jis0208 => b"\x1b$B",
            Self::Katakana => b"\x1b(I",
        }
    }
}

const DESIGNATIONS: [([u8; 3], Iso2022JpSet); 5] = [
    (*b"\x1b(B", Iso2022JpSet::Ascii),
    (*b"\x1b(J", Iso2022JpSet::Roman),
    (*b"\x1b$@", Iso2022JpSet::Jis0208),
    (*b"\x1b$B", Iso2022JpSet::Jis0208),
    (*b"\x1b(I", Iso2022JpSet::Katakana),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Iso2022JpDecoder {
    set: Iso2022JpSet,
}

impl Iso2022JpDecoder {
    #[must_use]
    pub const fn set(&self) -> Iso2022JpSet {
        self.set
    }

    pub fn decode_next(&mut self, input: &[u8]) -> DecodeStep {
        let Some(&b) = input.first() else {
            return DecodeStep::NeedMoreInput;
        };
        if b == ESC {
            return self.decode_escape(input);
        }
        // 8-bit bytes and locking shifts never appear in ISO-2022-JP.
        if b >= 0x80 || b == 0x0E || b == 0x0F {
            return DecodeStep::Invalid;
        }
        // C0 controls pass through in every set.
        if b < 0x21 {
            return DecodeStep::Char {
                ch: char::from(b),
                consumed: 1,
            };
        }
        let ch = match self.set {
            Iso2022JpSet::Ascii => char::from(b),
            Iso2022JpSet::Roman => match b {
                0x5C => '\u{00A5}',
                0x7E => '\u{203E}',
                _ => char::from(b),
            },
            Iso2022JpSet::Katakana => match b {
                0x21..=0x5F => halfwidth_katakana(b - 0x21),
                _ => return DecodeStep::Invalid,
            },
            Iso2022JpSet::Jis0208 => {
                if b == 0x7F {
                    return DecodeStep::Invalid;
                }
                if let Some(step) = double_byte_row_col(input, 0x21..=0x7E) {
                    return step;
                }
                let pointer = u16::from(b - 0x21) * 94 + u16::from(input[1] - 0x21);
                return jis0208_char(pointer)
                    .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 2 });
            }
        };
        DecodeStep::Char { ch, consumed: 1 }
    }

    fn decode_escape(&mut self, input: &[u8]) -> DecodeStep {
        let available = input.len().min(3);
        for (sequence, set) in DESIGNATIONS {
            if input[..available] != sequence[..available] {
                continue;
            }
            if available < 3 {
                return DecodeStep::NeedMoreInput;
            }
            self.set = set;
            return DecodeStep::Control { consumed: 3 };
        }
        DecodeStep::Invalid
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Iso2022JpEncoder {
    set: Iso2022JpSet,
}

impl Iso2022JpEncoder {
    #[must_use]
    pub const fn set(&self) -> Iso2022JpSet {
        self.set
    }

    pub fn encode_next(&mut self, ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
        let cp = u32::from(ch);
        let (set, bytes, len): (Iso2022JpSet, [u8; 2], usize) = if cp < 0x80 {
            (Iso2022JpSet::Ascii, [cp as u8, 0], 1)
        } else if ch == '\u{00A5}' {
            (Iso2022JpSet::Roman, [0x5C, 0], 1)
        } else if ch == '\u{203E}' {
            (Iso2022JpSet::Roman, [0x7E, 0], 1)
        } else if is_halfwidth_katakana(cp) {
            (Iso2022JpSet::Katakana, [(cp - 0xFF61) as u8 + 0x21, 0], 1)
        } else {
            let pointer = jis0208_cell(ch).ok_or(Unrepresentable)?;
            (
                Iso2022JpSet::Jis0208,
                [(pointer / 94) as u8 + 0x21, (pointer % 94) as u8 + 0x21],
                2,
            )
        };
        if self.set != set {
            out.extend_from_slice(set.designation());
            self.set = set;
        }
        out.extend_from_slice(&bytes[..len]);
        Ok(())
    }

    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if self.set != Iso2022JpSet::Ascii {
            out.extend_from_slice(Iso2022JpSet::Ascii.designation());
            self.set = Iso2022JpSet::Ascii;
        }
    }
}
