//! One-shot and scoped conversion helpers.

use crate::error::IconvError;

use super::{ConversionResult, IconvDescriptor};

/// Converts a complete buffer: open, convert, finalize, close.
///
/// All-or-nothing: any failure, including a truncated trailing sequence,
/// returns the error and no output.
pub fn conv(to_charset: &str, from_charset: &str, input: &[u8]) -> Result<Vec<u8>, IconvError> {
    conv_detailed(to_charset, from_charset, input).map(|result| result.output)
}

/// Like [`conv`], also reporting the non-reversible conversion count.
pub fn conv_detailed(
    to_charset: &str,
    from_charset: &str,
    input: &[u8],
) -> Result<ConversionResult, IconvError> {
    let (mut result, trailing) = with_descriptor(to_charset, from_charset, |cd| {
        cd.convert(input).map_err(|err| match err {
            // No continuation can arrive; drop the partial output.
            IconvError::IncompleteSequence { consumed, .. } => IconvError::IncompleteSequence {
                consumed,
                partial: ConversionResult::default(),
            },
            other => other,
        })
    })?;
    result.output.extend_from_slice(&trailing);
    Ok(result)
}

/// Opens a descriptor, runs `body` with it, and closes it on every exit
/// path.
///
/// Returns the body's value together with the close (finalize) bytes. If
/// the body fails, the descriptor is still closed and the body's error is
/// returned. A body that closes the descriptor itself yields empty trailing
/// bytes.
pub fn with_descriptor<T, E, F>(
    to_charset: &str,
    from_charset: &str,
    body: F,
) -> Result<(T, Vec<u8>), E>
where
    F: FnOnce(&mut IconvDescriptor) -> Result<T, E>,
    E: From<IconvError>,
{
    let mut cd = IconvDescriptor::open(to_charset, from_charset)?;
    let outcome = body(&mut cd);
    let trailing = if cd.is_closed() {
        Ok(Vec::new())
    } else {
        cd.close()
    };
    let value = outcome?;
    Ok((value, trailing?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conv_appends_finalize_bytes() {
        let out = conv("ISO-2022-JP", "EUC-JP", &[0xB4, 0xC1]).unwrap();
        assert_eq!(out, b"\x1b$B4A\x1b(B");
    }

    #[test]
    fn conv_treats_truncation_as_hard_error() {
        let err = conv("UTF-8", "EUC-JP", &[0xB4, 0xC1, 0xB4]).unwrap_err();
        assert_eq!(
            err,
            IconvError::IncompleteSequence {
                consumed: 2,
                partial: ConversionResult::default()
            }
        );
    }

    #[test]
    fn conv_detailed_reports_count() {
        let result = conv_detailed("ASCII//TRANSLIT", "UTF-8", "naïve".as_bytes()).unwrap();
        assert_eq!(result.output, b"na?ve");
        assert_eq!(result.non_reversible, 1);
    }

    #[test]
    fn conv_unknown_charset() {
        assert!(matches!(
            conv("UTF-8", "EBCDIC-XYZ", b"x"),
            Err(IconvError::UnsupportedCharset { name }) if name == "EBCDIC-XYZ"
        ));
    }

    #[test]
    fn scoped_block_returns_value_and_trailing() {
        let (chunks, trailing) = with_descriptor("ISO-2022-JP", "EUC-JP", |cd| {
            let a = cd.convert(b"\xb4\xc1")?.output;
            let b = cd.convert(b"\xbb\xfa")?.output;
            Ok::<_, IconvError>((a, b))
        })
        .unwrap();
        assert_eq!(chunks.0, b"\x1b$B4A");
        assert_eq!(chunks.1, b";z");
        assert_eq!(trailing, b"\x1b(B");
    }

    #[test]
    fn scoped_block_reraises_body_error() {
        let mut seen = None;
        let err = with_descriptor("UTF-8", "UTF-8", |cd| {
            seen = Some(cd.target());
            cd.convert(&[0xFF]).map(|_| ())
        })
        .unwrap_err();
        assert_eq!(err, IconvError::InvalidSequence { offset: 0 });
        assert!(seen.is_some());
    }

    #[derive(Debug, PartialEq)]
    enum AppError {
        Iconv(IconvError),
        Aborted,
    }

    impl From<IconvError> for AppError {
        fn from(err: IconvError) -> Self {
            Self::Iconv(err)
        }
    }

    #[test]
    fn scoped_block_accepts_caller_error_type() {
        let err = with_descriptor("UTF-8", "CP932", |_cd| Err::<(), _>(AppError::Aborted)).unwrap_err();
        assert_eq!(err, AppError::Aborted);

        let err = with_descriptor("UTF-8", "NOPE", |_cd| Ok::<_, AppError>(())).unwrap_err();
        assert!(matches!(err, AppError::Iconv(IconvError::UnsupportedCharset { .. })));
    }

    #[test]
    fn scoped_block_tolerates_body_close() {
        let (early, trailing) = with_descriptor("ISO-2022-JP", "UTF-8", |cd| {
            cd.convert("漢".as_bytes())?;
            cd.close()
        })
        .unwrap();
        assert_eq!(early, b"\x1b(B");
        assert!(trailing.is_empty());
    }
}
