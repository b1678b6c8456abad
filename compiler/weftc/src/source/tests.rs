use pretty_assertions::assert_eq;

use super::*;

#[test]
fn utf8_is_the_default() {
    let (text, encoding) = decode("s = 'é'\n".as_bytes().to_vec()).unwrap();
    assert_eq!(text, "s = 'é'\n");
    assert_eq!(encoding, Encoding::Utf8);
}

#[test]
fn coding_comment_on_first_or_second_line() {
    assert_eq!(declared_encoding(b"# -*- coding: Latin_1 -*-\nx = 1\n").as_deref(), Some("latin-1"));
    assert_eq!(declared_encoding(b"#!/usr/bin/env python\n# vim: set fileencoding=utf-8 :\n").as_deref(), Some("utf-8"));
    assert_eq!(declared_encoding(b"x = 1\n# coding: latin-1\n"), None);
    assert_eq!(declared_encoding(b"\n\n# coding: latin-1\n"), None);
}

#[test]
fn latin1_source_decodes_and_round_trips() {
    let bytes = b"# coding: latin-1\ns = '\xe9t\xe9'\n".to_vec();
    let (text, encoding) = decode(bytes.clone()).unwrap();
    assert_eq!(text, "# coding: latin-1\ns = 'été'\n");
    assert_eq!(encoding, Encoding::Latin1);
    assert_eq!(encode(&text, encoding).unwrap(), bytes);
}

#[test]
fn undeclared_non_utf8_is_an_error() {
    let err = decode(b"s = '\xe9'\n".to_vec()).unwrap_err();
    assert_eq!(
        err,
        EncodingError::Invalid {
            encoding: "utf-8",
            offset: 5
        }
    );
}

#[test]
fn unknown_declared_encoding_is_unsupported() {
    let err = decode(b"# coding: shift_jis\nx = 1\n".to_vec()).unwrap_err();
    assert_eq!(err, EncodingError::Unsupported("shift-jis".to_owned()));
}

#[test]
fn latin1_cannot_hold_wide_characters() {
    assert_eq!(encode("├", Encoding::Latin1), Err(EncodingError::Unencodable('├')));
}
