//! Character set conversion.
//!
//! Implements the `<iconv.h>` lifecycle over owned descriptors:
//! [`open`] → [`convert`]* → [`close`], plus the one-shot [`conv`] and the
//! scoped [`with_descriptor`].

pub mod descriptor;
pub mod engine;
pub mod scoped;

pub use descriptor::IconvDescriptor;
pub use engine::{Codepoints, ConversionResult, DecodeFault};
pub use scoped::{conv, conv_detailed, with_descriptor};

use crate::codec::Registry;
use crate::error::IconvError;

/// Opens a conversion descriptor from `from_charset` to `to_charset`.
///
/// Equivalent to C `iconv_open`. Fails with
/// [`IconvError::UnsupportedCharset`] if either name is unknown.
pub fn open(to_charset: &str, from_charset: &str) -> Result<IconvDescriptor, IconvError> {
    IconvDescriptor::open(to_charset, from_charset)
}

/// Converts one chunk of input.
///
/// Equivalent to C `iconv` with an unbounded output buffer.
pub fn convert(cd: &mut IconvDescriptor, input: &[u8]) -> Result<ConversionResult, IconvError> {
    engine::convert(cd, input)
}

/// Returns the bytes that end the current shift state.
pub fn finalize(cd: &mut IconvDescriptor) -> Result<Vec<u8>, IconvError> {
    engine::finalize(cd)
}

/// Closes a conversion descriptor, returning its finalize bytes.
///
/// Equivalent to C `iconv_close`; a second close fails with
/// [`IconvError::DescriptorClosed`].
pub fn close(cd: &mut IconvDescriptor) -> Result<Vec<u8>, IconvError> {
    cd.close()
}

/// Canonical names of every charset the standard registry resolves.
pub fn supported_charsets() -> impl Iterator<Item = &'static str> {
    Registry::standard().canonical_names()
}
