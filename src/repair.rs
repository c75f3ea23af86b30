//! Repair round-trip helpers.
//!
//! Generated sources arrive wrapped in markdown fences, and findings go back
//! to the generator verbatim as a repair request.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationReport;

lazy_static! {
    static ref LEADING_FENCE_RE: Regex =
        Regex::new(r"^```(tsx|typescript|javascript|jsx)?\n").unwrap();
    static ref TRAILING_FENCE_RE: Regex = Regex::new(r"\n```$").unwrap();
}

/// Remove markdown code fences around (and inside) generated source.
pub fn strip_code_fences(text: &str) -> String {
    let text = LEADING_FENCE_RE.replace(text, "");
    let text = TRAILING_FENCE_RE.replace(&text, "");
    text.replace("```", "")
}

const REPAIR_RULES: &[&str] = &[
    "Fix ONLY the errors listed above.",
    "Do NOT change logical functionality or layout structure unless required by the fix.",
    "Ensure all Tailwind classes are valid v4.",
    "Maintain existing imports (lucide-react, recharts).",
    "Return ONLY the fully corrected JSX code. No markdown.",
];

/// What gets sent back to the generator when validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    pub source: String,
    pub messages: Vec<String>,
}

impl RepairRequest {
    /// `None` when there is nothing to repair.
    pub fn from_report(source: &str, report: &ValidationReport) -> Option<Self> {
        if report.valid {
            return None;
        }
        Some(RepairRequest {
            source: source.to_string(),
            messages: report.messages.clone(),
        })
    }

    pub fn to_prompt(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str("You are a senior React Debugger.\n\n");
        prompt.push_str(
            "TASK: Fix the specific validation errors listed below in the provided React component.\n\n",
        );
        prompt.push_str("ERRORS TO FIX:\n");
        for message in &self.messages {
            prompt.push_str(&format!("- {}\n", message));
        }
        prompt.push_str("\nSTRICT RULES:\n");
        for (i, rule) in REPAIR_RULES.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, rule));
        }
        prompt.push_str("\nSOURCE CODE:\n");
        prompt.push_str(&self.source);
        prompt.push('\n');
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```tsx\nexport default App;\n```"),
            "export default App;"
        );
        assert_eq!(strip_code_fences("```\nconst a = 1;\n```"), "const a = 1;");
        assert_eq!(strip_code_fences("const a = 1;"), "const a = 1;");
        assert_eq!(strip_code_fences("a ``` b"), "a  b");
    }

    #[test]
    fn test_valid_report_needs_no_repair() {
        let report = validate("const a = 1;");
        assert!(RepairRequest::from_report("const a = 1;", &report).is_none());
    }

    #[test]
    fn test_prompt_lists_messages_verbatim() {
        let source = r#"<div class="p-4" />"#;
        let report = validate(source);
        let request = RepairRequest::from_report(source, &report).unwrap();
        let prompt = request.to_prompt();

        assert!(prompt.contains("ERRORS TO FIX:\n- ⚠️ Found 'class' attribute. In React, use 'className'.\n"));
        assert!(prompt.contains("1. Fix ONLY the errors listed above.\n"));
        assert!(prompt.ends_with("SOURCE CODE:\n<div class=\"p-4\" />\n"));
    }
}
