//! Header cards through cfitsio.
//!
//! `fitsio` reads single keys by name but cannot list a header, so the cards
//! are walked with the raw cfitsio calls it re-exports. cfitsio splits each
//! record into keyword, value and comment; only the value string is typed here.

use std::ffi::{CString, c_char, c_int};
use std::path::Path;
use std::ptr;

use fitsio::FitsFile;
use fitsio::errors::check_status;
use fitsio::sys;

use crate::fringe_pipeline::common::error::{FringeError, Result};
use crate::fringe_pipeline::fits::fits_error;
use crate::fringe_pipeline::fits::header::{FitsHeader, HeaderCard, HeaderValue};

// FLEN_KEYWORD, FLEN_VALUE and FLEN_COMMENT in fitsio.h
const KEYWORD_LEN: usize = 75;
const VALUE_LEN: usize = 71;
const COMMENT_LEN: usize = 73;

/// Significant digits for float values (negative selects `%G` formatting).
const FLOAT_DIGITS: c_int = -15;

const COMMENTARY_KEYWORDS: &[&str] = &["COMMENT", "HISTORY", ""];

/// Keywords cfitsio derives from the image itself.
///
/// `BZERO`, `BSCALE` and `BLANK` describe integer storage only, and written
/// images are always floating point.
pub fn is_structural(keyword: &str) -> bool {
    matches!(
        keyword,
        "SIMPLE" | "BITPIX" | "EXTEND" | "BZERO" | "BSCALE" | "BLANK" | "PCOUNT" | "GCOUNT"
            | "END" | "CONTINUE"
    ) || keyword.starts_with("NAXIS")
}

fn check(status: c_int, path: &Path) -> Result<()> {
    check_status(status).map_err(fits_error(path))
}

fn c_string(text: &str) -> Result<CString> {
    CString::new(text)
        .map_err(|_| FringeError::InvalidFits(format!("header text contains a NUL byte: {text:?}")))
}

fn buffer_text(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Reads every card of the current HDU, in order.
///
/// `CONTINUE` records are folded into the long string they extend.
pub fn read_header(fptr: &mut FitsFile, path: &Path) -> Result<FitsHeader> {
    let raw = unsafe { fptr.as_raw() };
    let mut status: c_int = 0;
    let mut count: c_int = 0;
    let mut more: c_int = 0;
    unsafe { sys::ffghsp(raw, &mut count, &mut more, &mut status) };
    check(status, path)?;

    let mut header = FitsHeader::new();
    for index in 1..=count {
        let mut keyword = [0 as c_char; KEYWORD_LEN];
        let mut value = [0 as c_char; VALUE_LEN];
        let mut comment = [0 as c_char; COMMENT_LEN];
        unsafe {
            sys::ffgkyn(
                raw,
                index,
                keyword.as_mut_ptr(),
                value.as_mut_ptr(),
                comment.as_mut_ptr(),
                &mut status,
            )
        };
        check(status, path)?;

        let keyword = buffer_text(&keyword);
        let value = buffer_text(&value);
        let comment = buffer_text(&comment);

        if keyword == "CONTINUE" {
            let field = if value.trim_start().starts_with('\'') { &value } else { &comment };
            append_continuation(&mut header, field);
            continue;
        }

        let card = if value.trim().is_empty() {
            if COMMENTARY_KEYWORDS.contains(&keyword.as_str()) {
                HeaderCard::new(&keyword, HeaderValue::Commentary(comment))
            } else {
                with_comment(HeaderCard::new(&keyword, HeaderValue::Undefined), comment)
            }
        } else {
            with_comment(HeaderCard::new(&keyword, parse_value(&value)), comment)
        };
        header.push(card);
    }
    Ok(header)
}

fn with_comment(card: HeaderCard, comment: String) -> HeaderCard {
    if comment.trim().is_empty() {
        card
    } else {
        card.with_comment(comment.trim())
    }
}

/// Types a value string as cfitsio returns it (strings still quoted).
fn parse_value(value: &str) -> HeaderValue {
    let value = value.trim();
    if let Some(quoted) = value.strip_prefix('\'') {
        let text = quoted.strip_suffix('\'').unwrap_or(quoted);
        return HeaderValue::Text(text.replace("''", "'").trim_end().to_string());
    }
    match value {
        "T" => HeaderValue::Logical(true),
        "F" => HeaderValue::Logical(false),
        other => {
            if let Ok(number) = other.parse::<i64>() {
                HeaderValue::Integer(number)
            } else if let Ok(number) = other.replace(['D', 'd'], "E").parse::<f64>() {
                HeaderValue::Float(number)
            } else {
                HeaderValue::Text(other.to_string())
            }
        }
    }
}

/// Quoted text at the start of `field`, with doubled quotes collapsed.
fn quoted_text(field: &str) -> Option<String> {
    let rest = field.trim_start().strip_prefix('\'')?;
    let mut text = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                text.push('\'');
                chars.next();
                continue;
            }
            return Some(text.trim_end().to_string());
        }
        text.push(c);
    }
    None
}

// A long string ends each segment with '&'; the next CONTINUE record carries the rest.
fn append_continuation(header: &mut FitsHeader, field: &str) {
    let Some(segment) = quoted_text(field) else {
        return;
    };
    if let Some(HeaderCard {
        value: HeaderValue::Text(text),
        ..
    }) = header.last_mut()
    {
        if text.ends_with('&') {
            text.pop();
            text.push_str(&segment);
        }
    }
}

/// Appends the non-structural cards of `header` to the current HDU.
///
/// Text longer than one card is written with the `CONTINUE` convention.
/// Commentary cards already present (the standard notice cfitsio adds to a
/// new primary HDU) are not repeated.
pub fn write_header(fptr: &mut FitsFile, path: &Path, header: &FitsHeader) -> Result<()> {
    let existing = read_header(fptr, path)?;
    let raw = unsafe { fptr.as_raw() };
    let mut status: c_int = 0;

    for card in header.iter() {
        if is_structural(&card.keyword)
            || (card.is_commentary() && existing.cards().contains(card))
        {
            continue;
        }

        let keyword = c_string(&card.keyword)?;
        let comment = card.comment.as_deref().map(c_string).transpose()?;
        let comment = comment.as_ref().map_or(ptr::null(), |comment| comment.as_ptr());

        match &card.value {
            HeaderValue::Logical(flag) => unsafe {
                sys::ffpkyl(raw, keyword.as_ptr(), c_int::from(*flag), comment, &mut status)
            },
            HeaderValue::Integer(number) => unsafe {
                sys::ffpkyj(raw, keyword.as_ptr(), *number, comment, &mut status)
            },
            HeaderValue::Float(number) if number.is_finite() => unsafe {
                sys::ffpkyd(raw, keyword.as_ptr(), *number, FLOAT_DIGITS, comment, &mut status)
            },
            HeaderValue::Float(_) | HeaderValue::Undefined => unsafe {
                sys::ffpkyu(raw, keyword.as_ptr(), comment, &mut status)
            },
            HeaderValue::Text(text) => {
                let text = c_string(text)?;
                unsafe { sys::ffpkls(raw, keyword.as_ptr(), text.as_ptr(), comment, &mut status) }
            }
            HeaderValue::Commentary(text) => match card.keyword.as_str() {
                "COMMENT" => {
                    let text = c_string(text)?;
                    unsafe { sys::ffpcom(raw, text.as_ptr(), &mut status) }
                }
                "HISTORY" => {
                    let text = c_string(text)?;
                    unsafe { sys::ffphis(raw, text.as_ptr(), &mut status) }
                }
                _ => {
                    let record: String = card.to_string().chars().take(80).collect();
                    let record = c_string(&record)?;
                    unsafe { sys::ffprec(raw, record.as_ptr(), &mut status) }
                }
            },
        };
        check(status, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("                 -32"), HeaderValue::Integer(-32));
        assert_eq!(parse_value("1.5D2"), HeaderValue::Float(150.0));
        assert_eq!(parse_value("300."), HeaderValue::Float(300.0));
        assert_eq!(parse_value("T"), HeaderValue::Logical(true));
        assert_eq!(
            parse_value("'O''Brien / M42   '"),
            HeaderValue::Text("O'Brien / M42".to_string())
        );
        assert_eq!(parse_value("(1, 2)"), HeaderValue::Text("(1, 2)".to_string()));
    }

    #[test]
    fn test_continuation_joins_long_string() {
        let mut header = FitsHeader::new();
        header.push(HeaderCard::new("NOTES", HeaderValue::Text("first part &".to_string())));
        append_continuation(&mut header, "  'second part&'");
        append_continuation(&mut header, "  'end' / trailing comment");
        assert_eq!(header.get_text("NOTES"), Some("first part second partend"));
    }

    #[test]
    fn test_continuation_without_open_string_is_ignored() {
        let mut header = FitsHeader::new();
        header.push(HeaderCard::new("OBJECT", HeaderValue::Text("M42".to_string())));
        append_continuation(&mut header, "  'stray'");
        assert_eq!(header.get_text("OBJECT"), Some("M42"));
    }

    #[test]
    fn test_structural_keywords() {
        for keyword in ["SIMPLE", "BITPIX", "NAXIS", "NAXIS2", "EXTEND", "BZERO", "CONTINUE"] {
            assert!(is_structural(keyword), "{keyword}");
        }
        for keyword in ["OBJECT", "EXPTIME", "FRNGCORR", "HISTORY"] {
            assert!(!is_structural(keyword), "{keyword}");
        }
    }
}
