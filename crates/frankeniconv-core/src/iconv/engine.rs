//! The conversion engine.
//!
//! Each call decodes the input lazily into codepoints ([`Codepoints`]) and
//! feeds them to the encoder. Work happens on a copy of the descriptor's
//! shift state:
//! - success commits the copy;
//! - a truncated tail commits the copy up to the last whole sequence and
//!   returns the output produced so far inside
//!   [`IconvError::IncompleteSequence`];
//! - any other failure discards the copy, leaving the descriptor exactly as
//!   it was before the call.
//!
//! Undecoded bytes are never buffered across calls.

use crate::codec::{DecodeStep, Decoder, Encoder};
use crate::config::{FallbackPolicy, REPLACEMENT_MARKER};
use crate::error::IconvError;

use super::IconvDescriptor;

/// Output of one convert call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    /// Encoded bytes.
    pub output: Vec<u8>,
    /// Characters substituted or dropped because the target charset cannot
    /// represent them.
    pub non_reversible: usize,
}

/// Why a [`Codepoints`] sequence stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFault {
    /// Malformed bytes start at `offset`.
    Invalid { offset: usize },
    /// The input ends inside a sequence; `consumed` bytes were decoded.
    Truncated { consumed: usize },
}

/// Lazy codepoint sequence over one input buffer.
///
/// Yields `(offset, codepoint)` pairs where `offset` is the position of the
/// codepoint's first byte. Stops after the first fault.
#[derive(Debug)]
pub struct Codepoints<'a> {
    decoder: &'a mut Decoder,
    input: &'a [u8],
    pos: usize,
    stopped: bool,
}

impl<'a> Codepoints<'a> {
    pub fn new(decoder: &'a mut Decoder, input: &'a [u8]) -> Self {
        Self {
            decoder,
            input,
            pos: 0,
            stopped: false,
        }
    }

    /// Bytes consumed so far, including control sequences.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Codepoints<'_> {
    type Item = Result<(usize, char), DecodeFault>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.stopped && self.pos < self.input.len() {
            let offset = self.pos;
            match self.decoder.decode_next(&self.input[offset..]) {
                DecodeStep::Char { ch, consumed } => {
                    debug_assert!(consumed > 0);
                    self.pos += consumed;
                    return Some(Ok((offset, ch)));
                }
                DecodeStep::Control { consumed } => {
                    debug_assert!(consumed > 0);
                    self.pos += consumed;
                }
                DecodeStep::NeedMoreInput => {
                    self.stopped = true;
                    return Some(Err(DecodeFault::Truncated { consumed: offset }));
                }
                DecodeStep::Invalid => {
                    self.stopped = true;
                    return Some(Err(DecodeFault::Invalid { offset }));
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Codepoints<'_> {}

/// Converts `input` through the descriptor.
///
/// Zero-length input returns an empty result and leaves the state alone.
/// The return-to-initial escape of stateful targets is never written here;
/// see [`finalize`].
pub fn convert(cd: &mut IconvDescriptor, input: &[u8]) -> Result<ConversionResult, IconvError> {
    let fallback = cd.fallback();
    let state = cd.state_mut()?;
    if input.is_empty() {
        return Ok(ConversionResult::default());
    }

    let mut work = state.clone();
    let mut result = ConversionResult {
        output: Vec::with_capacity(input.len()),
        non_reversible: 0,
    };
    let mut truncated_at = None;

    for step in Codepoints::new(&mut work.decoder, input) {
        match step {
            Ok((offset, ch)) => encode_with_fallback(&mut work.encoder, ch, offset, fallback, &mut result)?,
            Err(DecodeFault::Invalid { offset }) => {
                return Err(IconvError::InvalidSequence { offset });
            }
            Err(DecodeFault::Truncated { consumed }) => {
                truncated_at = Some(consumed);
                break;
            }
        }
    }

    *state = work;
    match truncated_at {
        Some(consumed) => Err(IconvError::IncompleteSequence {
            consumed,
            partial: result,
        }),
        None => Ok(result),
    }
}

fn encode_with_fallback(
    encoder: &mut Encoder,
    ch: char,
    offset: usize,
    fallback: FallbackPolicy,
    result: &mut ConversionResult,
) -> Result<(), IconvError> {
    if encoder.encode_next(ch, &mut result.output).is_ok() {
        return Ok(());
    }
    match fallback {
        FallbackPolicy::Strict => return Err(IconvError::InvalidSequence { offset }),
        FallbackPolicy::Ignore => {}
        FallbackPolicy::Substitute => encoder
            .encode_next(REPLACEMENT_MARKER, &mut result.output)
            .map_err(|_| IconvError::InvalidSequence { offset })?,
    }
    result.non_reversible += 1;
    Ok(())
}

/// Returns the bytes that bring the target back to its initial shift state
/// and resets both directions, as POSIX `iconv(cd, NULL, NULL, &out, &n)`
/// does. Stateless targets return an empty vector.
pub fn finalize(cd: &mut IconvDescriptor) -> Result<Vec<u8>, IconvError> {
    let source = cd.source();
    let state = cd.state_mut()?;
    let mut trailing = Vec::new();
    state.encoder.finish(&mut trailing);
    state.decoder = source.decoder();
    Ok(trailing)
}
