//! Folding the tokenized line sequence into a tree of tag nodes.
//!
//! Levels drive the nesting: a line at level `L` becomes a child of the most
//! recent line at level `L - 1`. A skipped level (a jump of more than one)
//! is a recorded error and the line is adopted at the deepest open level, so
//! one bad line cannot detach an entire subtree.
//!
//! The builder also enforces the file frame: the first record must be
//! `0 HEAD` and the last `0 TRLR`. Anything after the trailer is ignored
//! with a warning.

use crate::diagnostics::Diagnostic;
use crate::error::{GedcomError, Result};
use crate::line::GedcomLine;

/// One node of the raw tag tree: a tokenized line and its children in input
/// order. Every child's level is exactly this node's level plus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    /// The tokenized line.
    pub line: GedcomLine,
    /// Child nodes, in input order.
    pub children: Vec<TagNode>,
}

impl TagNode {
    fn new(line: GedcomLine) -> Self {
        TagNode {
            line,
            children: Vec::new(),
        }
    }

    /// The node's tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.line.tag
    }

    /// The node's value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.line.value.as_deref()
    }
}

/// Build the level-0 record trees from tokenized lines.
///
/// # Errors
///
/// Returns [`GedcomError::MissingHeader`] / [`GedcomError::MissingTrailer`]
/// when the file frame is broken.
pub(crate) fn build_tree(
    lines: Vec<GedcomLine>,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) -> Result<Vec<TagNode>> {
    if lines.is_empty() {
        return Err(GedcomError::MissingHeader(
            "the file contains no lines".to_string(),
        ));
    }
    if lines[0].level != 0 || lines[0].tag != "HEAD" {
        return Err(GedcomError::MissingHeader(format!(
            "the file must begin with \"0 HEAD\", found \"{} {}\"",
            lines[0].level, lines[0].tag
        )));
    }

    let mut roots: Vec<TagNode> = Vec::new();
    // Open nodes; stack[i] is at level i, so stack.len() is the deepest
    // level a new child may take.
    let mut stack: Vec<TagNode> = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line_num = index + 1;

        if line.level > 0 && line.xref.is_some() {
            warnings.push(
                Diagnostic::at_tag(
                    format!("line {line_num} defines an xref below level 0; ignored"),
                    line.level,
                    line.tag.clone(),
                )
                .with_xref(line.xref.clone().unwrap_or_default()),
            );
        }

        let mut level = usize::from(line.level);
        if level > stack.len() {
            errors.push(Diagnostic::at_tag(
                format!(
                    "line {line_num} skipped from level {} to {}; treated as level {}",
                    stack.len().saturating_sub(1),
                    line.level,
                    stack.len()
                ),
                line.level,
                line.tag.clone(),
            ));
            level = stack.len();
        }

        while stack.len() > level {
            close_top(&mut stack, &mut roots);
        }
        stack.push(TagNode::new(line));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    enforce_trailer(&mut roots, warnings)?;
    Ok(roots)
}

fn close_top(stack: &mut Vec<TagNode>, roots: &mut Vec<TagNode>) {
    let node = stack.pop().expect("caller checks non-empty");
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// The last record must be `0 TRLR`; records after it are dropped with a
/// warning.
fn enforce_trailer(roots: &mut Vec<TagNode>, warnings: &mut Vec<Diagnostic>) -> Result<()> {
    let trailer_at = roots.iter().position(|n| n.tag() == "TRLR");
    match trailer_at {
        None => Err(GedcomError::MissingTrailer(
            "the file does not end with \"0 TRLR\"".to_string(),
        )),
        Some(at) => {
            if at + 1 < roots.len() {
                warnings.push(Diagnostic::message(format!(
                    "{} record(s) after the trailer were ignored",
                    roots.len() - at - 1
                )));
                roots.truncate(at + 1);
            }
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::build_from_text;
    use super::*;

    fn build(lines: &[&str]) -> (Vec<TagNode>, Vec<Diagnostic>, Vec<Diagnostic>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let roots = build_from_text(lines, &mut errors, &mut warnings).unwrap();
        (roots, errors, warnings)
    }

    #[test]
    fn test_simple_nesting() {
        let (roots, errors, _) = build(&[
            "0 HEAD",
            "1 SOUR TEST",
            "2 VERS 1.0",
            "1 GEDC",
            "2 VERS 5.5.1",
            "0 TRLR",
        ]);
        assert!(errors.is_empty());
        assert_eq!(roots.len(), 2);
        let head = &roots[0];
        assert_eq!(head.tag(), "HEAD");
        assert_eq!(head.children.len(), 2);
        assert_eq!(head.children[0].tag(), "SOUR");
        assert_eq!(head.children[0].children[0].tag(), "VERS");
        assert_eq!(head.children[1].children[0].value(), Some("5.5.1"));
    }

    #[test]
    fn test_child_levels_are_parent_plus_one() {
        let (roots, _, _) = build(&[
            "0 HEAD",
            "0 @I1@ INDI",
            "1 NAME X",
            "2 GIVN X",
            "1 SEX M",
            "0 TRLR",
        ]);
        fn check(node: &TagNode) {
            for child in &node.children {
                assert_eq!(child.line.level, node.line.level + 1);
                check(child);
            }
        }
        for root in &roots {
            check(root);
        }
    }

    #[test]
    fn test_empty_file_is_missing_header() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let err = build_tree(Vec::new(), &mut errors, &mut warnings).unwrap_err();
        assert!(matches!(err, GedcomError::MissingHeader(_)));
    }

    #[test]
    fn test_first_record_must_be_head() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let err =
            build_from_text(&["0 @X@ INDI", "0 TRLR"], &mut errors, &mut warnings).unwrap_err();
        assert!(matches!(err, GedcomError::MissingHeader(_)));
    }

    #[test]
    fn test_missing_trailer_is_fatal() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let err = build_from_text(&["0 HEAD", "1 GEDC"], &mut errors, &mut warnings).unwrap_err();
        assert!(matches!(err, GedcomError::MissingTrailer(_)));
    }

    #[test]
    fn test_level_skip_recovers() {
        let (roots, errors, _) = build(&["0 HEAD", "2 VERS 5.5.1", "0 TRLR"]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("skipped"));
        // The line was adopted at level 1.
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].tag(), "VERS");
    }

    #[test]
    fn test_content_after_trailer_warns() {
        let (roots, _, warnings) = build(&["0 HEAD", "0 TRLR", "0 @I1@ INDI", "1 SEX M"]);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots.last().unwrap().tag(), "TRLR");
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("after the trailer")));
    }

    #[test]
    fn test_xref_below_level_zero_warns() {
        let (_, _, warnings) = build(&["0 HEAD", "1 @N1@ NOTE x", "0 TRLR"]);
        assert!(warnings.iter().any(|w| w.message.contains("below level 0")));
    }

    #[test]
    fn test_sibling_then_pop_back() {
        let (roots, errors, _) = build(&[
            "0 HEAD",
            "0 @F1@ FAM",
            "1 HUSB @I1@",
            "1 CHIL @I3@",
            "1 CHIL @I4@",
            "0 TRLR",
        ]);
        assert!(errors.is_empty());
        let fam = &roots[1];
        assert_eq!(fam.children.len(), 3);
        assert_eq!(fam.children[1].value(), Some("@I3@"));
        assert_eq!(fam.children[2].value(), Some("@I4@"));
    }

    #[test]
    fn test_max_level_99_accepted() {
        // Build a chain reaching level 99; the tokenizer rejects 100+.
        let mut lines: Vec<String> = vec!["0 HEAD".to_string()];
        for level in 1..=99 {
            lines.push(format!("{level} _N{level}"));
        }
        lines.push("0 TRLR".to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (roots, errors, _) = build(&refs);
        assert!(errors.is_empty());
        let mut node = &roots[0];
        let mut depth = 0;
        while let Some(child) = node.children.first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, 99);
    }
}
