//! Tokenizing one logical line into its level/xref/tag/value parts.
//!
//! The line grammar:
//!
//! ```text
//! line  := level WS [ xref WS ] tag [ WS value ]
//! level := 1*2 DIGIT                ; 0-99
//! xref  := '@' 1*CHAR '@'          ; no '@' or space inside
//! tag   := 1*TAGCHAR               ; A-Z, 0-9, or leading '_'
//! value := any chars to end of line
//! ```
//!
//! A missing or out-of-range level and a missing tag are fatal; everything
//! else is tolerated with a recorded error or warning. `CONT`/`CONC`
//! continuation folding happens later, in the interpreter.

use crate::diagnostics::Diagnostic;
use crate::error::{GedcomError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Strict xref form: `@` + at least one character that is neither `@` nor a
/// space + `@`.
pub(crate) static XREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[^@ ]+@$").expect("xref pattern"));

/// Loose xref form used to tell a pointer value apart from inline text.
pub(crate) static XREF_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@.+@$").expect("xref value pattern"));

/// Standard tag shape: uppercase alphanumeric, or `_`-prefixed custom.
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z0-9]+|_[A-Za-z0-9_]+)$").expect("tag pattern"));

/// One tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomLine {
    /// Nesting depth, 0-99.
    pub level: u8,
    /// Cross-reference id defined by this line (level-0 records only, in
    /// well-formed files).
    pub xref: Option<String>,
    /// The tag naming the line's role.
    pub tag: String,
    /// Everything after the tag, if anything.
    pub value: Option<String>,
}

impl GedcomLine {
    /// Whether the value is a cross-reference pointer rather than inline
    /// text.
    #[must_use]
    pub fn value_is_pointer(&self) -> bool {
        self.value
            .as_deref()
            .is_some_and(|v| XREF_VALUE_RE.is_match(v))
    }
}

/// Tokenize every logical line in order.
///
/// # Errors
///
/// Returns the first fatal tokenizer error; recoverable problems land in
/// `errors`/`warnings` and do not stop the pass.
pub(crate) fn tokenize_lines<S: AsRef<str>>(
    lines: &[S],
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Vec<GedcomLine>> {
    let mut parsed = Vec::with_capacity(lines.len());
    for (index, raw) in lines.iter().enumerate() {
        parsed.push(tokenize(raw.as_ref(), index + 1, errors, warnings)?);
    }
    Ok(parsed)
}

/// Tokenize one logical line.
///
/// # Errors
///
/// Returns [`GedcomError::MalformedLine`] when the level is missing or not
/// in 0-99, or when no tag follows it.
pub(crate) fn tokenize(
    line: &str,
    line_num: usize,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) -> Result<GedcomLine> {
    let mut rest = line;

    let trimmed = rest.trim_start();
    if trimmed.len() != rest.len() {
        warnings.push(Diagnostic::message(format!(
            "line {line_num} has leading whitespace before its level"
        )));
        rest = trimmed;
    }

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return Err(GedcomError::MalformedLine {
            line_num,
            message: format!("line does not begin with a level number: {line:?}"),
        });
    }
    if digits > 2 {
        return Err(GedcomError::MalformedLine {
            line_num,
            message: format!("level {} is not in 0-99", &rest[..digits]),
        });
    }
    // Two digits max, so this cannot overflow u8.
    let level: u8 = rest[..digits].parse().expect("1-2 ascii digits");
    rest = &rest[digits..];

    if !rest.starts_with(' ') {
        return Err(GedcomError::MalformedLine {
            line_num,
            message: format!("expected a space after the level number: {line:?}"),
        });
    }
    rest = rest.trim_start_matches(' ');

    let mut xref = None;
    if rest.starts_with('@') {
        let token_end = rest.find(' ').unwrap_or(rest.len());
        let token = &rest[..token_end];
        if !XREF_RE.is_match(token) {
            errors.push(Diagnostic::message(format!(
                "line {line_num} has a malformed xref: {token:?}"
            )));
        }
        xref = Some(token.to_string());
        rest = rest[token_end..].trim_start_matches(' ');
    }

    let tag_end = rest.find(' ').unwrap_or(rest.len());
    let tag = &rest[..tag_end];
    if tag.is_empty() {
        return Err(GedcomError::MalformedLine {
            line_num,
            message: format!("no tag after the level: {line:?}"),
        });
    }
    if !TAG_RE.is_match(tag) {
        warnings.push(Diagnostic::message(format!(
            "line {line_num} has a non-standard tag: {tag:?}"
        )));
    }

    // One space separates tag from value; further spaces belong to the
    // value itself.
    let value = if tag_end < rest.len() {
        Some(rest[tag_end + 1..].to_string())
    } else {
        None
    };

    Ok(GedcomLine {
        level,
        xref,
        tag: tag.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str) -> GedcomLine {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        tokenize(line, 1, &mut errors, &mut warnings).unwrap()
    }

    #[test]
    fn test_plain_line() {
        let line = ok("1 NAME John /Doe/");
        assert_eq!(line.level, 1);
        assert_eq!(line.xref, None);
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value.as_deref(), Some("John /Doe/"));
    }

    #[test]
    fn test_record_line_with_xref() {
        let line = ok("0 @I1@ INDI");
        assert_eq!(line.level, 0);
        assert_eq!(line.xref.as_deref(), Some("@I1@"));
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_pointer_value() {
        let line = ok("1 FAMS @F1@");
        assert_eq!(line.value.as_deref(), Some("@F1@"));
        assert!(line.value_is_pointer());

        let line = ok("1 NOTE not a pointer");
        assert!(!line.value_is_pointer());
    }

    #[test]
    fn test_two_digit_level() {
        let line = ok("99 DEEP value");
        assert_eq!(line.level, 99);
    }

    #[test]
    fn test_three_digit_level_is_fatal() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let err = tokenize("100 TAG", 7, &mut errors, &mut warnings).unwrap_err();
        assert!(matches!(
            err,
            GedcomError::MalformedLine { line_num: 7, .. }
        ));
        assert!(err.to_string().contains("not in 0-99"));
    }

    #[test]
    fn test_missing_level_is_fatal() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let err = tokenize("NAME John", 3, &mut errors, &mut warnings).unwrap_err();
        assert!(err.to_string().contains("level number"));
    }

    #[test]
    fn test_missing_tag_is_fatal() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let err = tokenize("1 ", 4, &mut errors, &mut warnings).unwrap_err();
        assert!(err.to_string().contains("no tag"));
    }

    #[test]
    fn test_leading_whitespace_warns() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let line = tokenize("  1 SEX M", 2, &mut errors, &mut warnings).unwrap();
        assert_eq!(line.level, 1);
        assert_eq!(line.tag, "SEX");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("leading whitespace"));
    }

    #[test]
    fn test_malformed_xref_recorded_not_fatal() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let line = tokenize("0 @A B@ INDI", 5, &mut errors, &mut warnings).unwrap();
        // "@A" up to the space fails the strict pattern.
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("malformed xref"));
        assert_eq!(line.xref.as_deref(), Some("@A"));
    }

    #[test]
    fn test_custom_tag_accepted() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let line = tokenize("1 _UID 12345", 1, &mut errors, &mut warnings).unwrap();
        assert_eq!(line.tag, "_UID");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_lowercase_tag_warns() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let line = tokenize("1 name John", 1, &mut errors, &mut warnings).unwrap();
        assert_eq!(line.tag, "name");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_empty_value_after_trailing_space() {
        let line = ok("1 NOTE ");
        assert_eq!(line.value.as_deref(), Some(""));
        let line = ok("1 NOTE");
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_conc_value_preserves_leading_spaces() {
        let line = ok("2 CONC  leading space kept");
        assert_eq!(line.value.as_deref(), Some(" leading space kept"));
    }
}
