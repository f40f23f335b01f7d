//! Conversion descriptor: the owned per-stream state.

use crate::charset::CharsetName;
use crate::codec::{Charset, Decoder, Encoder, Registry};
use crate::config::{self, FallbackPolicy};
use crate::error::IconvError;

use super::engine;
use super::ConversionResult;

/// Decoder and encoder state carried between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShiftState {
    pub(crate) decoder: Decoder,
    pub(crate) encoder: Encoder,
}

impl ShiftState {
    fn initial(source: Charset, target: Charset) -> Self {
        Self {
            decoder: source.decoder(),
            encoder: target.encoder(),
        }
    }
}

/// One source→target conversion stream.
///
/// Created by [`IconvDescriptor::open`], advanced by
/// [`IconvDescriptor::convert`], ended by [`IconvDescriptor::close`].
/// After close every operation fails with
/// [`IconvError::DescriptorClosed`]. Descriptors share nothing, so
/// independent descriptors may be driven from different threads.
#[derive(Debug)]
pub struct IconvDescriptor {
    source: Charset,
    target: Charset,
    fallback: FallbackPolicy,
    state: Option<ShiftState>,
}

impl IconvDescriptor {
    /// Opens a descriptor converting `from_charset` to `to_charset` using
    /// the standard registry.
    pub fn open(to_charset: &str, from_charset: &str) -> Result<Self, IconvError> {
        Self::open_with(Registry::standard(), to_charset, from_charset)
    }

    /// Opens a descriptor against an explicit registry.
    ///
    /// The target name is resolved first; the error names whichever argument
    /// failed. A `//TRANSLIT` or `//IGNORE` suffix on the target overrides
    /// the process default fallback policy.
    pub fn open_with(
        registry: &Registry,
        to_charset: &str,
        from_charset: &str,
    ) -> Result<Self, IconvError> {
        let to = CharsetName::parse(to_charset)?;
        let target = registry
            .lookup(&to)
            .ok_or_else(|| IconvError::UnsupportedCharset {
                name: to_charset.to_string(),
            })?;
        let from = CharsetName::parse(from_charset)?;
        let source = registry
            .lookup(&from)
            .ok_or_else(|| IconvError::UnsupportedCharset {
                name: from_charset.to_string(),
            })?;

        Ok(Self {
            source,
            target,
            fallback: to.fallback().unwrap_or_else(config::default_fallback),
            state: Some(ShiftState::initial(source, target)),
        })
    }

    /// Replaces the fallback policy chosen at open time.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub const fn source(&self) -> Charset {
        self.source
    }

    #[must_use]
    pub const fn target(&self) -> Charset {
        self.target
    }

    #[must_use]
    pub const fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.state.is_none()
    }

    /// Converts one chunk. See [`engine::convert`].
    pub fn convert(&mut self, input: &[u8]) -> Result<ConversionResult, IconvError> {
        engine::convert(self, input)
    }

    /// Emits the return-to-initial sequence and resets both directions.
    /// See [`engine::finalize`].
    pub fn finalize(&mut self) -> Result<Vec<u8>, IconvError> {
        engine::finalize(self)
    }

    /// Returns both directions to their initial state without emitting the
    /// return sequence.
    pub fn reset(&mut self) -> Result<(), IconvError> {
        let (source, target) = (self.source, self.target);
        *self.state_mut()? = ShiftState::initial(source, target);
        Ok(())
    }

    /// Finalizes and invalidates the descriptor, returning the finalize
    /// bytes.
    pub fn close(&mut self) -> Result<Vec<u8>, IconvError> {
        let trailing = self.finalize()?;
        self.state = None;
        Ok(trailing)
    }

    pub(crate) fn state_mut(&mut self) -> Result<&mut ShiftState, IconvError> {
        self.state.as_mut().ok_or(IconvError::DescriptorClosed)
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> Option<&ShiftState> {
        self.state.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_resolves_both_names() {
        let cd = IconvDescriptor::open("ISO-2022-JP", "euc-jp").unwrap();
        assert_eq!(cd.target(), Charset::Iso2022Jp);
        assert_eq!(cd.source(), Charset::EucJp);
        assert!(!cd.is_closed());
    }

    #[test]
    fn open_reports_unknown_target_first() {
        let err = IconvDescriptor::open("NOPE-1", "NOPE-2").unwrap_err();
        assert_eq!(
            err,
            IconvError::UnsupportedCharset {
                name: "NOPE-1".to_string()
            }
        );
        let err = IconvDescriptor::open("UTF-8", "NOPE-2").unwrap_err();
        assert_eq!(
            err,
            IconvError::UnsupportedCharset {
                name: "NOPE-2".to_string()
            }
        );
    }

    #[test]
    fn suffix_overrides_default_fallback() {
        let cd = IconvDescriptor::open("ASCII//IGNORE", "UTF-8").unwrap();
        assert_eq!(cd.fallback(), FallbackPolicy::Ignore);
        let cd = IconvDescriptor::open("ASCII//TRANSLIT", "UTF-8").unwrap();
        assert_eq!(cd.fallback(), FallbackPolicy::Substitute);
        let cd = cd.with_fallback(FallbackPolicy::Strict);
        assert_eq!(cd.fallback(), FallbackPolicy::Strict);
    }

    #[test]
    fn close_invalidates_every_operation() {
        let mut cd = IconvDescriptor::open("UTF-16LE", "UTF-8").unwrap();
        assert_eq!(cd.close().unwrap(), Vec::<u8>::new());
        assert!(cd.is_closed());
        assert_eq!(cd.convert(b"A"), Err(IconvError::DescriptorClosed));
        assert_eq!(cd.finalize(), Err(IconvError::DescriptorClosed));
        assert_eq!(cd.reset(), Err(IconvError::DescriptorClosed));
        assert_eq!(cd.close(), Err(IconvError::DescriptorClosed));
    }

    #[test]
    fn reset_discards_pending_shift_state() {
        let mut cd = IconvDescriptor::open("ISO-2022-JP", "UTF-8").unwrap();
        let initial = cd.state().cloned();
        cd.convert("漢".as_bytes()).unwrap();
        assert_ne!(cd.state().cloned(), initial);
        cd.reset().unwrap();
        assert_eq!(cd.state().cloned(), initial);
        assert!(cd.close().unwrap().is_empty());
    }

    #[test]
    fn descriptor_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<IconvDescriptor>();
    }
}
