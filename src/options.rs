//! Preview Options
//!
//! Everything the assembled document needs to know about its host: the entry
//! symbol, the mount node, where the injected libraries come from and which
//! module names map onto them. Defaults reproduce the stock preview page.

use oxc_syntax::identifier::is_identifier_name;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

// ═══════════════════════════════════════════════════════════════════════════════
// LIBRARY BINDINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// An external module whose imports are rewritten to reads from an injected global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBinding {
    /// Module specifier as written in user code (`lucide-react`)
    pub module: String,
    /// Name of the global object installed before user code runs (`Lucide`)
    pub global: String,
    /// ES module URL the document imports the library from
    pub url: String,
}

impl LibraryBinding {
    pub fn new(module: &str, global: &str, url: &str) -> Self {
        Self {
            module: module.to_string(),
            global: global.to_string(),
            url: url.to_string(),
        }
    }

    pub fn icons() -> Self {
        Self::new("lucide-react", "Lucide", "https://esm.sh/lucide-react@0.300.0")
    }

    pub fn charts() -> Self {
        Self::new("recharts", "Recharts", "https://esm.sh/recharts@2.12.0")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeUrls {
    pub react_url: String,
    pub react_dom_url: String,
}

impl Default for RuntimeUrls {
    fn default() -> Self {
        Self {
            react_url: "https://esm.sh/react@18.2.0".to_string(),
            react_dom_url: "https://esm.sh/react-dom@18.2.0/client".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Styling {
    pub utility_css_url: String,
    pub font_family: String,
    pub font_url: String,
    pub primary_color: String,
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            utility_css_url: "https://cdn.tailwindcss.com".to_string(),
            font_family: "Sarabun".to_string(),
            font_url: "https://fonts.googleapis.com/css2?family=Sarabun:wght@300;400;500;600;700&display=swap".to_string(),
            primary_color: "#2563eb".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREVIEW OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewOptions {
    /// Global the default export is bound to (`window.App`)
    pub entry_symbol: String,
    pub mount_node_id: String,
    pub icon_library: LibraryBinding,
    pub chart_library: LibraryBinding,
    pub runtime: RuntimeUrls,
    /// Modules the document already provides; their imports are deleted
    pub ambient_modules: Vec<String>,
    pub styling: Styling,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            entry_symbol: "App".to_string(),
            mount_node_id: "root".to_string(),
            icon_library: LibraryBinding::icons(),
            chart_library: LibraryBinding::charts(),
            runtime: RuntimeUrls::default(),
            ambient_modules: vec!["react".to_string(), "react-dom".to_string()],
            styling: Styling::default(),
        }
    }
}

impl PreviewOptions {
    /// Load options from JSON. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Tracked libraries in preamble order: icons first, then charts.
    pub fn libraries(&self) -> [&LibraryBinding; 2] {
        [&self.icon_library, &self.chart_library]
    }

    pub fn is_ambient_module(&self, module: &str) -> bool {
        self.ambient_modules.iter().any(|m| m == module)
    }

    /// `window.App`
    pub fn entry_global(&self) -> String {
        format!("window.{}", self.entry_symbol)
    }

    /// The runtime message raised when no default export was bound.
    pub fn missing_entry_message(&self) -> String {
        format!(
            "No default export found ({} is undefined)",
            self.entry_global()
        )
    }

    pub fn check(&self) -> Result<(), BuildError> {
        if !is_identifier_name(&self.entry_symbol) {
            return Err(BuildError::invalid_options(format!(
                "entry symbol '{}' is not a valid identifier",
                self.entry_symbol
            )));
        }
        for library in self.libraries() {
            if !is_identifier_name(&library.global) {
                return Err(BuildError::invalid_options(format!(
                    "global '{}' for module '{}' is not a valid identifier",
                    library.global, library.module
                )));
            }
        }
        if self.icon_library.module == self.chart_library.module {
            return Err(BuildError::invalid_options(format!(
                "module '{}' is bound to two globals",
                self.icon_library.module
            )));
        }
        if self.mount_node_id.trim().is_empty() {
            return Err(BuildError::invalid_options("mount node id is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_check() {
        let options = PreviewOptions::default();
        assert!(options.check().is_ok());
        assert_eq!(options.entry_global(), "window.App");
        assert_eq!(
            options.missing_entry_message(),
            "No default export found (window.App is undefined)"
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            PreviewOptions::from_json_str(r#"{ "entrySymbol": "Main", "mountNodeId": "app" }"#)
                .unwrap();
        assert_eq!(options.entry_symbol, "Main");
        assert_eq!(options.mount_node_id, "app");
        assert_eq!(options.icon_library, LibraryBinding::icons());
        assert!(options.is_ambient_module("react-dom"));
    }

    #[test]
    fn test_invalid_entry_symbol_rejected() {
        let options = PreviewOptions {
            entry_symbol: "my-app".to_string(),
            ..PreviewOptions::default()
        };
        assert!(matches!(
            options.check(),
            Err(BuildError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn test_shared_module_rejected() {
        let mut options = PreviewOptions::default();
        options.chart_library.module = "lucide-react".to_string();
        assert!(options.check().is_err());
    }
}
