//! Codec contract and the closed set of supported codecs.
//!
//! Every charset resolves to a [`Charset`] tag. A tag hands out a fresh
//! [`Decoder`] (bytes → codepoints) and a fresh [`Encoder`]
//! (codepoints → bytes). Both are small `Clone` state values: the engine
//! snapshots them at the start of a call and commits them only when the call
//! succeeds, so codecs never need to undo their own state changes.
//!
//! Adding a charset means adding a tag, its decoder/encoder variants, and a
//! registry row. The engine never changes.

pub mod japanese;
pub mod registry;
pub mod single_byte;
pub mod unicode;

pub use registry::{Registry, RegistryEntry};

use japanese::{Iso2022JpDecoder, Iso2022JpEncoder};
use unicode::{Endian, Utf16Decoder, Utf16Encoder, Utf32Decoder, Utf32Encoder};

/// Outcome of a single decoder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// One codepoint decoded from the first `consumed` bytes.
    Char { ch: char, consumed: usize },
    /// `consumed` bytes changed decoder state without producing a codepoint
    /// (escape sequences, byte-order marks).
    Control { consumed: usize },
    /// The remaining bytes are a valid but truncated sequence.
    NeedMoreInput,
    /// The bytes at the cursor cannot start a valid sequence.
    Invalid,
}

/// The codepoint has no representation in the target charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unrepresentable;

/// Supported charset families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Ascii,
    Latin1,
    Windows1252,
    Utf8,
    /// UTF-16 with byte-order mark handling (big-endian when absent).
    Utf16,
    Utf16Be,
    Utf16Le,
    /// UTF-32 with byte-order mark handling (big-endian when absent).
    Utf32,
    Utf32Be,
    Utf32Le,
    EucJp,
    ShiftJis,
    /// Windows-31J. Shares the Shift_JIS codec; kept distinct so the
    /// descriptor reports the name the caller asked for.
    Cp932,
    Iso2022Jp,
}

impl Charset {
    /// Every supported charset, in registry order.
    pub const ALL: [Charset; 14] = [
        Charset::Ascii,
        Charset::Latin1,
        Charset::Windows1252,
        Charset::Utf8,
        Charset::Utf16,
        Charset::Utf16Be,
        Charset::Utf16Le,
        Charset::Utf32,
        Charset::Utf32Be,
        Charset::Utf32Le,
        Charset::EucJp,
        Charset::ShiftJis,
        Charset::Cp932,
        Charset::Iso2022Jp,
    ];

    /// Canonical (IANA-style) name.
    #[must_use]
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
            Self::Windows1252 => "WINDOWS-1252",
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf32 => "UTF-32",
            Self::Utf32Be => "UTF-32BE",
            Self::Utf32Le => "UTF-32LE",
            Self::EucJp => "EUC-JP",
            Self::ShiftJis => "SHIFT_JIS",
            Self::Cp932 => "CP932",
            Self::Iso2022Jp => "ISO-2022-JP",
        }
    }

    /// Returns true if the encoder carries shift state that must be closed
    /// by [`Encoder::finish`].
    #[must_use]
    pub const fn is_stateful(self) -> bool {
        matches!(self, Self::Iso2022Jp)
    }

    /// Decoder in its initial state.
    #[must_use]
    pub fn decoder(self) -> Decoder {
        match self {
            Self::Ascii => Decoder::Ascii,
            Self::Latin1 => Decoder::Latin1,
            Self::Windows1252 => Decoder::Windows1252,
            Self::Utf8 => Decoder::Utf8,
            Self::Utf16 => Decoder::Utf16(Utf16Decoder::detecting()),
            Self::Utf16Be => Decoder::Utf16(Utf16Decoder::new(Endian::Big)),
            Self::Utf16Le => Decoder::Utf16(Utf16Decoder::new(Endian::Little)),
            Self::Utf32 => Decoder::Utf32(Utf32Decoder::detecting()),
            Self::Utf32Be => Decoder::Utf32(Utf32Decoder::new(Endian::Big)),
            Self::Utf32Le => Decoder::Utf32(Utf32Decoder::new(Endian::Little)),
            Self::EucJp => Decoder::EucJp,
            Self::ShiftJis | Self::Cp932 => Decoder::ShiftJis,
            Self::Iso2022Jp => Decoder::Iso2022Jp(Iso2022JpDecoder::default()),
        }
    }

    /// Encoder in its initial state.
    #[must_use]
    pub fn encoder(self) -> Encoder {
        match self {
            Self::Ascii => Encoder::Ascii,
            Self::Latin1 => Encoder::Latin1,
            Self::Windows1252 => Encoder::Windows1252,
            Self::Utf8 => Encoder::Utf8,
            Self::Utf16 => Encoder::Utf16(Utf16Encoder::with_bom(Endian::Big)),
            Self::Utf16Be => Encoder::Utf16(Utf16Encoder::new(Endian::Big)),
            Self::Utf16Le => Encoder::Utf16(Utf16Encoder::new(Endian::Little)),
            Self::Utf32 => Encoder::Utf32(Utf32Encoder::with_bom(Endian::Big)),
            Self::Utf32Be => Encoder::Utf32(Utf32Encoder::new(Endian::Big)),
            Self::Utf32Le => Encoder::Utf32(Utf32Encoder::new(Endian::Little)),
            Self::EucJp => Encoder::EucJp,
            Self::ShiftJis | Self::Cp932 => Encoder::ShiftJis,
            Self::Iso2022Jp => Encoder::Iso2022Jp(Iso2022JpEncoder::default()),
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Decoder state for one conversion direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoder {
    Ascii,
    Latin1,
    Windows1252,
    Utf8,
    Utf16(Utf16Decoder),
    Utf32(Utf32Decoder),
    EucJp,
    ShiftJis,
    Iso2022Jp(Iso2022JpDecoder),
}

impl Decoder {
    /// Decodes the next unit at the start of `input`.
    ///
    /// Empty input reports [`DecodeStep::NeedMoreInput`]. Every `Char` and
    /// `Control` step consumes at least one byte.
    pub fn decode_next(&mut self, input: &[u8]) -> DecodeStep {
        match self {
            Self::Ascii => single_byte::decode_ascii(input),
            Self::Latin1 => single_byte::decode_latin1(input),
            Self::Windows1252 => single_byte::decode_windows1252(input),
            Self::Utf8 => unicode::decode_utf8(input),
            Self::Utf16(state) => state.decode_next(input),
            Self::Utf32(state) => state.decode_next(input),
            Self::EucJp => japanese::decode_euc_jp(input),
            Self::ShiftJis => japanese::decode_shift_jis(input),
            Self::Iso2022Jp(state) => state.decode_next(input),
        }
    }
}

/// Encoder state for one conversion direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoder {
    Ascii,
    Latin1,
    Windows1252,
    Utf8,
    Utf16(Utf16Encoder),
    Utf32(Utf32Encoder),
    EucJp,
    ShiftJis,
    Iso2022Jp(Iso2022JpEncoder),
}

impl Encoder {
    /// Appends the encoding of `ch` to `out`, prefixed by any designation
    /// escape the current shift state requires.
    ///
    /// On `Err(Unrepresentable)` neither `out` nor the encoder state change.
    pub fn encode_next(&mut self, ch: char, out: &mut Vec<u8>) -> Result<(), Unrepresentable> {
        match self {
            Self::Ascii => single_byte::encode_ascii(ch, out),
            Self::Latin1 => single_byte::encode_latin1(ch, out),
            Self::Windows1252 => single_byte::encode_windows1252(ch, out),
            Self::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                Ok(())
            }
            Self::Utf16(state) => {
                state.encode_next(ch, out);
                Ok(())
            }
            Self::Utf32(state) => {
                state.encode_next(ch, out);
                Ok(())
            }
            Self::EucJp => japanese::encode_euc_jp(ch, out),
            Self::ShiftJis => japanese::encode_shift_jis(ch, out),
            Self::Iso2022Jp(state) => state.encode_next(ch, out),
        }
    }

    /// Appends the sequence returning the encoder to its initial shift
    /// state. Stateless encoders write nothing.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if let Self::Iso2022Jp(state) = self {
            state.finish(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_charset_has_distinct_canonical_name() {
        let mut names: Vec<&str> = Charset::ALL.iter().map(|c| c.canonical_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Charset::ALL.len());
    }

    #[test]
    fn only_iso2022jp_is_stateful() {
        for charset in Charset::ALL {
            assert_eq!(charset.is_stateful(), charset == Charset::Iso2022Jp, "{charset}");
        }
    }

    #[test]
    fn empty_input_needs_more() {
        for charset in Charset::ALL {
            let mut decoder = charset.decoder();
            assert_eq!(decoder.decode_next(&[]), DecodeStep::NeedMoreInput, "{charset}");
        }
    }

    #[test]
    fn ascii_letter_encodes_identically_in_ascii_compatible_targets() {
        for charset in [
            Charset::Ascii,
            Charset::Latin1,
            Charset::Windows1252,
            Charset::Utf8,
            Charset::EucJp,
            Charset::ShiftJis,
            Charset::Iso2022Jp,
        ] {
            let mut encoder = charset.encoder();
            let mut out = Vec::new();
            encoder.encode_next('A', &mut out).unwrap();
            assert_eq!(out, b"A", "{charset}");
        }
    }

    #[test]
    fn stateless_finish_writes_nothing() {
        let mut encoder = Charset::Utf16.encoder();
        let mut out = Vec::new();
        encoder.finish(&mut out);
        assert!(out.is_empty());
    }
}
