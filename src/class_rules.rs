//! Utility-class hygiene rules.
//!
//! Every rule looks at one token of one class attribute. The only context a
//! rule gets is the set of sibling tokens in the same attribute, used to decide
//! whether a flex or grid container is established.

use lazy_static::lazy_static;
use regex::Regex;

use crate::validate::Diagnostics;

/// Invented shorthands and what to write instead.
const NONSTANDARD_UTILITIES: &[(&str, &str)] = &[
    ("flex-center", "flex items-center justify-center"),
    ("flex-middle", "flex items-center justify-center"),
    ("flex-between", "flex justify-between"),
    ("text-body", "text-base' or 'text-gray-XXX"),
    ("align-center", "items-center' or 'text-center"),
];

/// Legacy grid-framework classes: (class, message).
const LEGACY_FRAMEWORK_CLASSES: &[(&str, &str)] = &[
    (
        "container-fluid",
        "⚠️ 'container-fluid' is Bootstrap. Use 'w-full px-4' or just 'container'.",
    ),
    ("d-flex", "⚠️ 'd-flex' is Bootstrap. Use 'flex'."),
];

/// Hybrid names that are simply wrong: (class, correct class).
const INVALID_HYBRIDS: &[(&str, &str)] = &[
    ("width-full", "w-full"),
    ("height-full", "h-full"),
    ("bg-white-500", "bg-white"),
    ("text-black-500", "text-black"),
];

const MODERN_COLUMN_PREFIXES: &[&str] = &["col-span-", "col-start-", "col-end-"];

const FLEX_CHILD_UTILITIES: &[&str] = &["flex-col", "flex-row", "flex-wrap"];

const SAFE_COLORS: &[&str] = &["white", "black", "transparent", "current", "inherit", "auto"];

/// Palette families that always take a numeric shade.
const SHADED_COLORS: &[&str] = &[
    "slate", "gray", "zinc", "neutral", "stone", "red", "orange", "amber", "yellow", "lime",
    "green", "emerald", "teal", "cyan", "sky", "blue", "indigo", "violet", "purple", "fuchsia",
    "pink", "rose",
];

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref FIXED_PIXEL_RE: Regex = Regex::new(r"^[whmp][trblxy]?-\[\d+px\]").unwrap();
    static ref VIEWPORT_HEIGHT_RE: Regex = Regex::new(r"-\[\d+vh\]").unwrap();
    static ref BARE_COLOR_RE: Regex =
        Regex::new(r"^(bg|text|border|ring|fill|stroke)-([a-z]+)$").unwrap();
}

/// Layout context derived from one attribute's tokens.
#[derive(Debug, Clone, Copy, Default)]
struct Container {
    flex: bool,
    grid: bool,
}

impl Container {
    fn of(tokens: &[&str]) -> Self {
        let mut container = Container::default();
        for token in tokens {
            match strip_variants(token) {
                "flex" | "inline-flex" => container.flex = true,
                "grid" | "inline-grid" => container.grid = true,
                _ => {}
            }
        }
        container
    }
}

/// `md:hover:flex` -> `flex`
fn strip_variants(token: &str) -> &str {
    token.rsplit(':').next().unwrap_or(token)
}

/// Run every token rule over one class attribute string.
pub(crate) fn check_class_attribute(class_string: &str, out: &mut Diagnostics) {
    let tokens: Vec<&str> = WHITESPACE_RE
        .split(class_string)
        .filter(|t| !t.is_empty())
        .collect();
    let container = Container::of(&tokens);

    for cls in &tokens {
        if cls.contains("${") || cls.contains('}') {
            continue;
        }
        check_token(cls, container, out);
    }
}

fn check_token(cls: &str, container: Container, out: &mut Diagnostics) {
    // Invented shorthands
    if let Some((_, fix)) = NONSTANDARD_UTILITIES.iter().find(|(name, _)| *name == cls) {
        out.push(format!("⚠️ '{}' is not standard. Use '{}'.", cls, fix));
    }

    // Legacy grid framework
    if let Some((_, message)) = LEGACY_FRAMEWORK_CLASSES
        .iter()
        .find(|(name, _)| *name == cls)
    {
        out.push(*message);
    }
    if cls.starts_with("col-") && !MODERN_COLUMN_PREFIXES.iter().any(|p| cls.starts_with(p)) {
        out.push(format!(
            "⚠️ '{}' looks like Bootstrap. Use 'grid-cols-*' or 'col-span-*'.",
            cls
        ));
    }

    // Structural dependencies
    if FLEX_CHILD_UTILITIES.contains(&cls) && !container.flex {
        out.push(format!(
            "⚠️ '{}' has no effect without 'flex' or 'inline-flex'.",
            cls
        ));
    }
    if (cls.starts_with("justify-") || cls.starts_with("items-"))
        && !cls.contains("self")
        && !container.flex
        && !container.grid
    {
        out.push(format!(
            "⚠️ '{}' usually needs a 'flex' or 'grid' parent.",
            cls
        ));
    }
    if cls.starts_with("gap-") && !container.flex && !container.grid {
        out.push(format!("⚠️ '{}' works best with 'flex' or 'grid'.", cls));
    }

    // Sizing
    if FIXED_PIXEL_RE.is_match(cls) {
        out.push(format!(
            "⚠️ Avoid fixed pixels '{}'. Use Tailwind utilities (e.g. w-4) or percentages.",
            cls
        ));
    }
    if VIEWPORT_HEIGHT_RE.is_match(cls) {
        out.push(format!(
            "⚠️ Avoid 'vh' for mobile '{}'. Use 'dvh' or 'min-h-screen' to avoid address bar jumping.",
            cls
        ));
    }

    if let Some((_, fixed)) = INVALID_HYBRIDS.iter().find(|(name, _)| *name == cls) {
        out.push(format!("⚠️ '{}' is invalid. Use '{}'.", cls, fixed));
    }

    // Color shade
    if let Some(cap) = BARE_COLOR_RE.captures(cls) {
        let color = &cap[2];
        if SHADED_COLORS.contains(&color) && !SAFE_COLORS.contains(&color) {
            out.push(format!(
                "⚠️ '{}' might be missing a shade (e.g., {}-500).",
                cls, cls
            ));
        }
    }
}
