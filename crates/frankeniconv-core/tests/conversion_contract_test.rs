use frankeniconv_core::errno;
use frankeniconv_core::{
    Charset, ConversionResult, FallbackPolicy, IconvDescriptor, IconvError, conv, open,
    supported_charsets,
};

const JAPANESE_TEXT: &str = "Aこんにちは、漢字とカタカナ。\r\n";
const LATIN_TEXT: &str = "café au lait, s'il vous plaît";

const JAPANESE_CHARSETS: &[&str] = &[
    "UTF-8",
    "UTF-16",
    "UTF-16BE",
    "UTF-16LE",
    "UTF-32",
    "UTF-32BE",
    "UTF-32LE",
    "EUC-JP",
    "SHIFT_JIS",
    "CP932",
    "ISO-2022-JP",
];

const LATIN_CHARSETS: &[&str] = &[
    "UTF-8",
    "UTF-16LE",
    "UTF-32BE",
    "ISO-8859-1",
    "WINDOWS-1252",
];

/// Converts `input` in two calls split at `split`, resubmitting the
/// unconsumed tail of an incomplete first call.
fn convert_split(to: &str, from: &str, input: &[u8], split: usize) -> Vec<u8> {
    let mut cd = open(to, from).unwrap();
    let mut out = Vec::new();
    let resume = match cd.convert(&input[..split]) {
        Ok(result) => {
            out.extend(result.output);
            split
        }
        Err(IconvError::IncompleteSequence { consumed, partial }) => {
            out.extend(partial.output);
            consumed
        }
        Err(err) => panic!("{from}->{to} split at {split}: unexpected {err:?}"),
    };
    out.extend(cd.convert(&input[resume..]).unwrap().output);
    out.extend(cd.close().unwrap());
    out
}

#[test]
fn cp932_pairs_decode_to_utf8() {
    let out = conv("UTF-8", "cp932", &[0x82, 0xb1, 0x82, 0xf1, 0x82, 0xf1]).unwrap();
    assert_eq!(out, "こんん".as_bytes());
}

#[test]
fn cp932_greeting_decodes_to_utf8() {
    let input = [
        0x82, 0xb1, 0x82, 0xf1, 0x82, 0xc9, 0x82, 0xbf, 0x82, 0xed, 0x90, 0xa2, 0x8a, 0x45,
    ];
    let out = conv("UTF-8", "cp932", &input).unwrap();
    assert_eq!(out, "こんにちわ世界".as_bytes());
}

#[test]
fn euc_jp_to_iso2022jp_escapes_only_on_close() {
    let mut cd = open("ISO-2022-JP", "EUC-JP").unwrap();
    let body = cd.convert(&[0xb4, 0xc1]).unwrap();
    assert_eq!(body.output, [0x1b, 0x24, 0x42, 0x34, 0x41]);
    assert_eq!(cd.close().unwrap(), [0x1b, 0x28, 0x42]);
}

#[test]
fn euc_jp_kanji_to_cp932() {
    let out = conv("CP932", "EUC-JP", &[0xbb, 0xfa]).unwrap();
    assert_eq!(out, [0x8e, 0x9a]);
}

#[test]
fn cp932_prefers_ibm_row_for_nec_selected_kanji() {
    assert_eq!(conv("CP932", "UTF-8", "纊".as_bytes()).unwrap(), [0xfa, 0x5c]);
    // NEC-selected row 89 decodes to the same character.
    assert_eq!(conv("UTF-8", "CP932", &[0xed, 0x40]).unwrap(), "纊".as_bytes());
    assert_eq!(conv("CP932", "CP932", &[0xed, 0x40]).unwrap(), [0xfa, 0x5c]);
}

#[test]
fn stray_continuation_byte_is_invalid_at_offset_zero() {
    let mut cd = open("UTF-16", "UTF-8").unwrap();
    let err = cd.convert(&[0x80]).unwrap_err();
    assert_eq!(err, IconvError::InvalidSequence { offset: 0 });
    assert_eq!(err.errno(), errno::EILSEQ);
}

#[test]
fn unknown_charset_fails_open_with_einval() {
    let err = open("UTF-8", "KOI8-XYZ").unwrap_err();
    assert_eq!(
        err,
        IconvError::UnsupportedCharset {
            name: "KOI8-XYZ".to_string()
        }
    );
    assert_eq!(err.errno(), errno::EINVAL);
}

#[test]
fn aliases_resolve_case_and_punctuation_insensitively() {
    for (alias, charset) in [
        ("utf8", Charset::Utf8),
        ("Shift-JIS", Charset::ShiftJis),
        ("sjis", Charset::ShiftJis),
        ("windows-31j", Charset::Cp932),
        ("eucjp", Charset::EucJp),
        ("latin1", Charset::Latin1),
        ("iso_2022_jp", Charset::Iso2022Jp),
    ] {
        let cd = IconvDescriptor::open("UTF-8", alias).unwrap();
        assert_eq!(cd.source(), charset, "alias {alias}");
    }
}

#[test]
fn supported_charsets_lists_every_family() {
    let names: Vec<&str> = supported_charsets().collect();
    assert_eq!(names.len(), Charset::ALL.len());
    for charset in Charset::ALL {
        assert!(names.contains(&charset.canonical_name()));
    }
}

#[test]
fn split_at_every_boundary_matches_whole_buffer() {
    for &from in JAPANESE_CHARSETS {
        let input = conv(from, "UTF-8", JAPANESE_TEXT.as_bytes()).unwrap();
        for &to in JAPANESE_CHARSETS {
            let whole = conv(to, from, &input).unwrap();
            for split in 0..=input.len() {
                assert_eq!(
                    convert_split(to, from, &input, split),
                    whole,
                    "{from}->{to} split at {split}"
                );
            }
        }
    }
}

#[test]
fn round_trip_through_japanese_charsets() {
    for &via in JAPANESE_CHARSETS {
        let encoded = conv(via, "UTF-8", JAPANESE_TEXT.as_bytes()).unwrap();
        let decoded = conv("UTF-8", via, &encoded).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            JAPANESE_TEXT,
            "via {via}"
        );
    }
}

#[test]
fn euc_jp_supplementary_kanji_survive_round_trip() {
    // JIS X 0212 kanji and accented Latin, then half-width katakana.
    let input = [0x8f, 0xb0, 0xa1, 0x8f, 0xab, 0xb1, 0x8e, 0xb1, 0xb4, 0xc1];
    let decoded = conv("UTF-8", "EUC-JP", &input).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "丂éｱ漢");

    let mut cd = open("EUC-JP", "EUC-JP")
        .unwrap()
        .with_fallback(FallbackPolicy::Strict);
    assert_eq!(
        cd.convert(&input).unwrap(),
        ConversionResult {
            output: input.to_vec(),
            non_reversible: 0
        }
    );
}

#[test]
fn halfwidth_katakana_round_trip_through_japanese_charsets() {
    let text = "ｱｲｳ A ｶﾞｰ漢";
    for &via in JAPANESE_CHARSETS {
        let mut cd = open(via, "UTF-8")
            .unwrap()
            .with_fallback(FallbackPolicy::Strict);
        let mut encoded = cd.convert(text.as_bytes()).unwrap().output;
        encoded.extend(cd.close().unwrap());
        let decoded = conv("UTF-8", via, &encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), text, "via {via}");
    }
}

#[test]
fn iso2022jp_katakana_designation_is_kept() {
    let input = b"\x1b(I1\x1b(B";
    let mut cd = open("ISO-2022-JP", "ISO-2022-JP").unwrap();
    let result = cd.convert(input).unwrap();
    assert_eq!(result.output, b"\x1b(I1");
    assert_eq!(result.non_reversible, 0);
    assert_eq!(cd.close().unwrap(), b"\x1b(B");
}

#[test]
fn round_trip_through_latin_charsets() {
    for &via in LATIN_CHARSETS {
        let encoded = conv(via, "UTF-8", LATIN_TEXT.as_bytes()).unwrap();
        let decoded = conv("UTF-8", via, &encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), LATIN_TEXT, "via {via}");
    }
}

#[test]
fn utf16_bom_written_once_per_descriptor() {
    let mut cd = open("UTF-16", "UTF-8").unwrap();
    assert_eq!(cd.convert(b"A").unwrap().output, [0xfe, 0xff, 0x00, 0x41]);
    assert_eq!(cd.convert(b"B").unwrap().output, [0x00, 0x42]);
    cd.reset().unwrap();
    assert_eq!(cd.convert(b"C").unwrap().output, [0xfe, 0xff, 0x00, 0x43]);
}

#[test]
fn fallback_policies_on_unrepresentable_input() {
    let input = "x漢y".as_bytes();

    let mut cd = open("ISO-8859-1", "UTF-8")
        .unwrap()
        .with_fallback(FallbackPolicy::Substitute);
    assert_eq!(
        cd.convert(input).unwrap(),
        ConversionResult {
            output: b"x?y".to_vec(),
            non_reversible: 1
        }
    );

    let mut cd = open("ISO-8859-1//IGNORE", "UTF-8").unwrap();
    assert_eq!(cd.convert(input).unwrap().output, b"xy");

    let mut cd = open("ISO-8859-1", "UTF-8")
        .unwrap()
        .with_fallback(FallbackPolicy::Strict);
    assert_eq!(
        cd.convert(input),
        Err(IconvError::InvalidSequence { offset: 1 })
    );
}

#[test]
fn independent_descriptors_run_in_parallel() {
    let input = conv("EUC-JP", "UTF-8", JAPANESE_TEXT.repeat(64).as_bytes()).unwrap();
    let expected = conv("ISO-2022-JP", "EUC-JP", &input).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=8)
            .map(|chunk| {
                let input = &input;
                scope.spawn(move || {
                    let mut cd = open("ISO-2022-JP", "EUC-JP").unwrap();
                    let mut out = Vec::new();
                    let mut pending: Vec<u8> = Vec::new();
                    for piece in input.chunks(chunk) {
                        pending.extend_from_slice(piece);
                        match cd.convert(&pending) {
                            Ok(result) => {
                                out.extend(result.output);
                                pending.clear();
                            }
                            Err(IconvError::IncompleteSequence { consumed, partial }) => {
                                out.extend(partial.output);
                                pending.drain(..consumed);
                            }
                            Err(err) => panic!("chunk size {chunk}: {err:?}"),
                        }
                    }
                    assert!(pending.is_empty());
                    out.extend(cd.close().unwrap());
                    out
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
