//! Preamble synthesis: binds injected library globals to the names user code imported.

use std::collections::HashSet;

use crate::options::{LibraryBinding, PreviewOptions};
use crate::rewrite::ImportBinding;

/// Render the preamble for all tracked libraries, icons before charts.
///
/// A library with no collected bindings contributes nothing.
pub fn synthesize_preamble(bindings: &[ImportBinding], options: &PreviewOptions) -> String {
    let mut preamble = String::new();
    for library in options.libraries() {
        preamble.push_str(&library_preamble(bindings, library));
    }
    preamble
}

fn library_preamble(bindings: &[ImportBinding], library: &LibraryBinding) -> String {
    let mut seen = HashSet::new();
    let mut named = Vec::new();
    let mut alias: Option<&str> = None;

    for binding in bindings.iter().filter(|b| b.source_module == library.module) {
        if binding.is_default_or_namespace {
            // Last alias wins.
            alias = Some(&binding.local_name);
        } else if let Some(entry) = binding.destructure_entry() {
            if seen.insert(entry.clone()) {
                named.push(entry);
            }
        }
    }

    let mut out = String::new();
    if !named.is_empty() {
        out.push_str(&format!(
            "const {{ {} }} = window.{};\n",
            named.join(", "),
            library.global
        ));
    }
    if let Some(alias) = alias {
        out.push_str(&format!("const {} = window.{};\n", alias, library.global));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(module: &str, imported: &str, local: &str) -> ImportBinding {
        ImportBinding {
            source_module: module.to_string(),
            imported_name: Some(imported.to_string()),
            local_name: local.to_string(),
            is_default_or_namespace: false,
            is_type_only: false,
        }
    }

    fn namespace(module: &str, local: &str) -> ImportBinding {
        ImportBinding {
            source_module: module.to_string(),
            imported_name: None,
            local_name: local.to_string(),
            is_default_or_namespace: true,
            is_type_only: false,
        }
    }

    #[test]
    fn test_empty_bindings_emit_nothing() {
        assert_eq!(synthesize_preamble(&[], &PreviewOptions::default()), "");
    }

    #[test]
    fn test_icons_before_charts_and_named_before_alias() {
        let bindings = vec![
            namespace("recharts", "RC"),
            named("recharts", "LineChart", "LineChart"),
            named("lucide-react", "Home", "Home"),
            named("lucide-react", "Bell", "Alarm"),
        ];
        let preamble = synthesize_preamble(&bindings, &PreviewOptions::default());
        assert_eq!(
            preamble,
            "const { Home, Bell: Alarm } = window.Lucide;\n\
             const { LineChart } = window.Recharts;\n\
             const RC = window.Recharts;\n"
        );
    }

    #[test]
    fn test_duplicates_and_type_only_are_skipped() {
        let mut type_only = named("lucide-react", "LucideIcon", "LucideIcon");
        type_only.is_type_only = true;
        let bindings = vec![
            named("lucide-react", "Home", "Home"),
            named("lucide-react", "Home", "Home"),
            type_only,
        ];
        let preamble = synthesize_preamble(&bindings, &PreviewOptions::default());
        assert_eq!(preamble, "const { Home } = window.Lucide;\n");
    }

    #[test]
    fn test_last_alias_wins() {
        let bindings = vec![namespace("lucide-react", "A"), namespace("lucide-react", "B")];
        let preamble = synthesize_preamble(&bindings, &PreviewOptions::default());
        assert_eq!(preamble, "const B = window.Lucide;\n");
    }
}
