//! Single-byte codecs: US-ASCII, ISO-8859-1, Windows-1252.

use super::{DecodeStep, Unrepresentable};

/// Windows-1252 mappings for 0x80..=0x9F. `0` marks an undefined byte.
const WINDOWS_1252_HIGH: [u16; 32] = [
    0x20AC, 0x0000, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, // 0x80
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x0000, 0x017D, 0x0000, // 0x88
    0x0000, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 0x90
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x0000, 0x017E, 0x0178, // 0x98
];

pub fn decode_ascii(input: &[u8]) -> DecodeStep {
    match input.first() {
        None => DecodeStep::NeedMoreInput,
        Some(&b) if b < 0x80 => DecodeStep::Char {
            ch: char::from(b),
            consumed: 1,
        },
        Some(_) => DecodeStep::Invalid,
    }
}

pub fn decode_latin1(input: &[u8]) -> DecodeStep {
    match input.first() {
        None => DecodeStep::NeedMoreInput,
        Some(&b) => DecodeStep::Char {
            ch: char::from(b),
            consumed: 1,
        },
    }
}

pub fn decode_windows1252(input: &[u8]) -> DecodeStep {
    let Some(&b) = input.first() else {
        return DecodeStep::NeedMoreInput;
    };
    if !(0x80..=0x9F).contains(&b) {
        return DecodeStep::Char {
            ch: char::from(b),
            consumed: 1,
        };
    }
    match WINDOWS_1252_HIGH[usize::from(b - 0x80)] {
        0 => DecodeStep::Invalid,
        cp => char::from_u32(u32::from(cp))
            .map_or(DecodeStep::Invalid, |ch| DecodeStep::Char { ch, consumed: 1 }),
    }
}

pub fn encode_ascii(ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
    if ch.is_ascii() {
        out.push(ch as u8);
        Ok(())
    } else {
        Err(Unrepresentable)
    }
}

pub fn encode_latin1(ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
    let byte = u8::try_from(u32::from(ch)).map_err(|_| Unrepresentable)?;
    out.push(byte);
    Ok(())
}

pub fn encode_windows1252(ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
    let cp = u32::from(ch);
    if cp < 0x80 || (0xA0..=0xFF).contains(&cp) {
        out.push(cp as u8);
        return Ok(());
    }
    let index = WINDOWS_1252_HIGH
        .iter()
        .position(|&mapped| mapped != 0 && u32::from(mapped) == cp)
        .ok_or(Unrepresentable)?;
    out.push(0x80 + index as u8);
    Ok(())
}
