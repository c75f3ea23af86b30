//! Static Validator
//!
//! Pattern checks over raw source text for mistakes generated UI code is known
//! to make. Nothing here parses or executes the input; every check is a regex
//! or token test, so any text is accepted.
//!
//! Check order is fixed: attribute naming, markup, list keys, accessibility,
//! utility classes. Messages are deduplicated by exact text, first one wins.

#[cfg(feature = "napi")]
use napi_derive::napi;
use lazy_static::lazy_static;
use log::debug;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::class_rules::check_class_attribute;

// ═══════════════════════════════════════════════════════════════════════════════
// PATTERNS
// ═══════════════════════════════════════════════════════════════════════════════

/// Attributes with a camel-cased equivalent: (pattern, message).
const ATTRIBUTE_RENAMES: &[(&str, &str)] = &[
    (
        r#"class\s*=\s*["']"#,
        "⚠️ Found 'class' attribute. In React, use 'className'.",
    ),
    (
        r#"for\s*=\s*["']"#,
        "⚠️ Found 'for' attribute. In React, use 'htmlFor'.",
    ),
    (
        r#"tabindex\s*=\s*["']"#,
        "⚠️ Found 'tabindex'. In React, use 'tabIndex'.",
    ),
    (
        r#"autoplay\s*=\s*["']"#,
        "⚠️ Found 'autoplay'. In React, use 'autoPlay'.",
    ),
];

const LOWERCASE_EVENTS: &[&str] = &[
    "onclick",
    "onchange",
    "onmouseover",
    "onmouseout",
    "onkeydown",
    "onkeyup",
    "onsubmit",
];

lazy_static! {
    static ref ATTRIBUTE_RENAME_RES: Vec<(Regex, &'static str)> = ATTRIBUTE_RENAMES
        .iter()
        .map(|(pattern, message)| (Regex::new(pattern).unwrap(), *message))
        .collect();

    static ref LOWERCASE_EVENT_RES: Vec<(Regex, &'static str)> = LOWERCASE_EVENTS
        .iter()
        .map(|event| (Regex::new(&format!(r#"{}\s*=\s*["'{{]"#, event)).unwrap(), *event))
        .collect();

    static ref HTML_COMMENT_RE: Regex = Regex::new(r"<!--").unwrap();
    static ref STRING_STYLE_RE: Regex = Regex::new(r#"style\s*=\s*["']"#).unwrap();
    static ref SCRIPT_TAG_RE: Regex = Regex::new(r"<script").unwrap();

    static ref MAP_CALL_RE: Regex = Regex::new(r"\.map\s*\(").unwrap();
    static ref KEY_PROP_RE: Regex = Regex::new(r#"key\s*=\s*[\{"]"#).unwrap();

    static ref IMG_TAG_RE: Regex = Regex::new(r"<img[^>]*>").unwrap();
    static ref ALT_ATTR_RE: Regex = Regex::new(r"\balt=").unwrap();
    static ref EMPTY_HREF_RE: Regex =
        Regex::new(r#"<a\s+(?:[^>]*?\s+)?href=["'](?:#|)["']"#).unwrap();
    static ref ANCHOR_TAG_RE: Regex = Regex::new(r"<a\s+[^>]*>").unwrap();
    static ref BLANK_TARGET_RE: Regex = Regex::new(r#"target=["']_blank["']"#).unwrap();
    static ref NOREFERRER_REL_RE: Regex =
        Regex::new(r#"rel=["'][^"']*noreferrer[^"']*["']"#).unwrap();

    static ref CLASS_NAME_RE: Regex =
        Regex::new(r#"className\s*=\s*["'`]((?:[^"'`\\]|\\.)*)["'`]"#).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
pub struct ValidationReport {
    /// True iff `messages` is empty
    pub valid: bool,
    pub messages: Vec<String>,
}

/// Insertion-ordered set of messages.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    seen: HashSet<String>,
    messages: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.seen.insert(message.clone()) {
            self.messages.push(message);
        }
    }

    #[cfg(test)]
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.clone()
    }

    fn into_report(self) -> ValidationReport {
        ValidationReport {
            valid: self.messages.is_empty(),
            messages: self.messages,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINTS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn validate(source: &str) -> ValidationReport {
    let mut diagnostics = Diagnostics::default();

    check_attribute_naming(source, &mut diagnostics);
    check_markup(source, &mut diagnostics);
    check_list_keys(source, &mut diagnostics);
    check_accessibility(source, &mut diagnostics);
    check_utility_classes(source, &mut diagnostics);

    let report = diagnostics.into_report();
    debug!("validation produced {} message(s)", report.messages.len());
    report
}

/// Validate many sources in parallel. Reports come back in input order.
pub fn validate_batch<S: AsRef<str> + Sync>(sources: &[S]) -> Vec<ValidationReport> {
    sources
        .par_iter()
        .map(|source| validate(source.as_ref()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

fn check_attribute_naming(source: &str, out: &mut Diagnostics) {
    for (re, message) in ATTRIBUTE_RENAME_RES.iter() {
        if re.is_match(source) {
            out.push(*message);
        }
    }

    for (re, event) in LOWERCASE_EVENT_RES.iter() {
        if re.is_match(source) {
            out.push(format!(
                "⚠️ Found '{}'. In React, use '{}'.",
                event,
                camel_case_event(event)
            ));
        }
    }
}

/// `onclick` -> `onClick`: uppercase the third character.
fn camel_case_event(event: &str) -> String {
    let mut chars = event.chars();
    let prefix: String = chars.by_ref().take(2).collect();
    match chars.next() {
        Some(third) => format!("{}{}{}", prefix, third.to_ascii_uppercase(), chars.as_str()),
        None => prefix,
    }
}

fn check_markup(source: &str, out: &mut Diagnostics) {
    if HTML_COMMENT_RE.is_match(source) {
        out.push("⚠️ Found HTML comment '<!--'. Use '{/* */}' for JSX comments.");
    }
    if STRING_STYLE_RE.is_match(source) {
        out.push("⚠️ Inline styles should be objects (style={{...}}), not strings.");
    }
    if SCRIPT_TAG_RE.is_match(source) {
        out.push("⚠️ Script tags are generally unsafe in React components.");
    }
}

/// Whole-file heuristic: any `.map(` and no `key=` anywhere.
fn check_list_keys(source: &str, out: &mut Diagnostics) {
    if MAP_CALL_RE.is_match(source) && !KEY_PROP_RE.is_match(source) {
        out.push(
            "⚠️ `.map()` loop detected but no 'key' prop found. Ensure lists have unique keys.",
        );
    }
}

fn check_accessibility(source: &str, out: &mut Diagnostics) {
    if IMG_TAG_RE
        .find_iter(source)
        .any(|tag| !ALT_ATTR_RE.is_match(tag.as_str()))
    {
        out.push("⚠️ <img> tag missing 'alt' attribute.");
    }

    if EMPTY_HREF_RE.is_match(source) {
        out.push("⚠️ <a> tag has empty or '#' href. Ensure valid navigation or use <button>.");
    }

    if ANCHOR_TAG_RE.find_iter(source).any(|tag| {
        let tag = tag.as_str();
        BLANK_TARGET_RE.is_match(tag) && !NOREFERRER_REL_RE.is_match(tag)
    }) {
        out.push("⚠️ target='_blank' links should have rel='noopener noreferrer'.");
    }
}

fn check_utility_classes(source: &str, out: &mut Diagnostics) {
    for cap in CLASS_NAME_RE.captures_iter(source) {
        if let Some(class_string) = cap.get(1) {
            check_class_attribute(class_string.as_str(), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_event() {
        assert_eq!(camel_case_event("onclick"), "onClick");
        assert_eq!(camel_case_event("onmouseover"), "onMouseover");
        assert_eq!(camel_case_event("on"), "on");
    }

    #[test]
    fn test_diagnostics_dedup_keeps_first_order() {
        let mut d = Diagnostics::default();
        d.push("b");
        d.push("a");
        d.push("b");
        let report = d.into_report();
        assert_eq!(report.messages, vec!["b", "a"]);
        assert!(!report.valid);
    }

    #[test]
    fn test_clean_source_is_valid() {
        let report = validate(
            r#"export default function App() {
                return <div className="flex items-center gap-4 p-4">Hello</div>;
            }"#,
        );
        assert!(report.valid, "unexpected messages: {:?}", report.messages);
        assert!(report.messages.is_empty());
    }
}
