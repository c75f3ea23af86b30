//! Module Rewriter
//!
//! One read-only pass over the parsed module that:
//! - records every binding imported from a tracked library module,
//! - deletes imports the preview document already provides (framework roots,
//!   tracked libraries, `import type`),
//! - turns the default export into an assignment to the entry global.
//!
//! The pass never mutates the AST. It produces span-addressed [`TextEdit`]s
//! which are applied back-to-front on the original text.

use oxc_ast::ast::{
    ExportDefaultDeclaration, ExportDefaultDeclarationKind, ImportDeclaration,
    ImportDeclarationSpecifier, ModuleExportName,
};
use oxc_ast_visit::Visit;
use oxc_span::GetSpan;
use serde::{Deserialize, Serialize};

use crate::options::PreviewOptions;

// ═══════════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// A binding imported from one of the tracked library modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBinding {
    pub source_module: String,
    /// `None` for default and namespace imports
    pub imported_name: Option<String>,
    pub local_name: String,
    pub is_default_or_namespace: bool,
    pub is_type_only: bool,
}

impl ImportBinding {
    /// Destructuring entry for a named binding: `Foo` or `Foo: Bar`.
    pub fn destructure_entry(&self) -> Option<String> {
        if self.is_default_or_namespace || self.is_type_only {
            return None;
        }
        let imported = self.imported_name.as_deref()?;
        if imported == self.local_name {
            Some(imported.to_string())
        } else {
            Some(format!("{}: {}", imported, self.local_name))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: u32,
    pub end: u32,
    pub replacement: String,
}

impl TextEdit {
    fn delete(start: u32, end: u32) -> Self {
        Self::replace(start, end, String::new())
    }

    fn insert(at: u32, text: String) -> Self {
        Self::replace(at, at, text)
    }

    fn replace(start: u32, end: u32, replacement: String) -> Self {
        TextEdit {
            start,
            end,
            replacement,
        }
    }
}

/// Result of the rewrite pass.
#[derive(Debug, Default)]
pub struct ModuleRewrite {
    pub bindings: Vec<ImportBinding>,
    pub edits: Vec<TextEdit>,
    /// Number of default exports bound to the entry global
    pub entry_exports: usize,
}

impl ModuleRewrite {
    /// Apply the collected edits to `source`.
    pub fn apply(&self, source: &str) -> String {
        let mut edits: Vec<(usize, &TextEdit)> = self.edits.iter().enumerate().collect();
        // Back-to-front keeps earlier offsets valid. Edits sharing an offset are
        // applied latest-first so they land in the text in the order they were pushed.
        edits.sort_by(|(ia, a), (ib, b)| b.start.cmp(&a.start).then(ib.cmp(ia)));

        let mut result = source.to_string();
        for (_, edit) in edits {
            result.replace_range(
                (edit.start as usize)..(edit.end as usize),
                &edit.replacement,
            );
        }
        result
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VISITOR
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ModuleRewriter<'o> {
    options: &'o PreviewOptions,
    entry_global: String,
    source_text: &'o str,
    pub rewrite: ModuleRewrite,
}

impl<'o> ModuleRewriter<'o> {
    pub fn new(options: &'o PreviewOptions, source_text: &'o str) -> Self {
        ModuleRewriter {
            options,
            entry_global: options.entry_global(),
            source_text,
            rewrite: ModuleRewrite::default(),
        }
    }

    pub fn finish(self) -> ModuleRewrite {
        self.rewrite
    }

    fn slice(&self, start: u32, end: u32) -> &'o str {
        &self.source_text[start as usize..end as usize]
    }

    fn is_tracked(&self, module: &str) -> bool {
        self.options
            .libraries()
            .iter()
            .any(|library| library.module == module)
    }

    fn collect_specifiers(&mut self, module: &str, decl: &ImportDeclaration<'_>) {
        let Some(specifiers) = &decl.specifiers else {
            return;
        };

        for specifier in specifiers {
            let binding = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    let imported_name = match &s.imported {
                        ModuleExportName::IdentifierName(id) => id.name.to_string(),
                        ModuleExportName::IdentifierReference(id) => id.name.to_string(),
                        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
                    };
                    ImportBinding {
                        source_module: module.to_string(),
                        imported_name: Some(imported_name),
                        local_name: s.local.name.to_string(),
                        is_default_or_namespace: false,
                        is_type_only: s.import_kind.is_type(),
                    }
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportBinding {
                    source_module: module.to_string(),
                    imported_name: None,
                    local_name: s.local.name.to_string(),
                    is_default_or_namespace: true,
                    is_type_only: false,
                },
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportBinding {
                    source_module: module.to_string(),
                    imported_name: None,
                    local_name: s.local.name.to_string(),
                    is_default_or_namespace: true,
                    is_type_only: false,
                },
            };
            self.rewrite.bindings.push(binding);
        }
    }
}

impl<'a> Visit<'a> for ModuleRewriter<'_> {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        let module = decl.source.value.as_str();

        if decl.import_kind.is_type() {
            self.rewrite
                .edits
                .push(TextEdit::delete(decl.span.start, decl.span.end));
            return;
        }

        if self.options.is_ambient_module(module) {
            self.rewrite
                .edits
                .push(TextEdit::delete(decl.span.start, decl.span.end));
            return;
        }

        if self.is_tracked(module) {
            self.collect_specifiers(module, decl);
            self.rewrite
                .edits
                .push(TextEdit::delete(decl.span.start, decl.span.end));
        }
        // Anything else stays where it is.
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        let stmt = decl.span;

        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                let body = func.span;
                match &func.id {
                    Some(id) => {
                        // function App() {}  +  window.App = App;
                        self.rewrite
                            .edits
                            .push(TextEdit::delete(stmt.start, body.start));
                        self.rewrite.edits.push(TextEdit::insert(
                            body.end,
                            format!("\n{} = {};", self.entry_global, id.name),
                        ));
                    }
                    None => {
                        self.rewrite.edits.push(TextEdit::replace(
                            stmt.start,
                            stmt.end,
                            format!(
                                "{} = {};",
                                self.entry_global,
                                self.slice(body.start, body.end)
                            ),
                        ));
                    }
                }
                self.rewrite.entry_exports += 1;
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                let body = class.span;
                match &class.id {
                    Some(id) => {
                        self.rewrite
                            .edits
                            .push(TextEdit::delete(stmt.start, body.start));
                        self.rewrite.edits.push(TextEdit::insert(
                            body.end,
                            format!("\n{} = {};", self.entry_global, id.name),
                        ));
                    }
                    None => {
                        self.rewrite.edits.push(TextEdit::replace(
                            stmt.start,
                            stmt.end,
                            format!(
                                "{} = {};",
                                self.entry_global,
                                self.slice(body.start, body.end)
                            ),
                        ));
                    }
                }
                self.rewrite.entry_exports += 1;
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => {
                // Types vanish during lowering; only the export keyword has to go.
                self.rewrite
                    .edits
                    .push(TextEdit::delete(stmt.start, interface.span.start));
            }
            kind => {
                if let Some(expr) = kind.as_expression() {
                    let span = expr.span();
                    self.rewrite.edits.push(TextEdit::replace(
                        stmt.start,
                        stmt.end,
                        format!(
                            "{} = {};",
                            self.entry_global,
                            self.slice(span.start, span.end)
                        ),
                    ));
                    self.rewrite.entry_exports += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn rewrite(source: &str) -> (ModuleRewrite, String) {
        let options = PreviewOptions::default();
        let allocator = Allocator::default();
        let source_type = SourceType::default()
            .with_module(true)
            .with_typescript(true)
            .with_jsx(true);
        let ret = Parser::new(&allocator, source, source_type).parse();
        assert!(ret.errors.is_empty(), "fixture must parse");

        let mut rewriter = ModuleRewriter::new(&options, source);
        rewriter.visit_program(&ret.program);
        let rewrite = rewriter.finish();
        let text = rewrite.apply(source);
        (rewrite, text)
    }

    #[test]
    fn test_named_function_export_keeps_declaration() {
        let (rewrite, text) = rewrite("export default function App() { return 1; }");
        assert_eq!(rewrite.entry_exports, 1);
        assert_eq!(text, "function App() { return 1; }\nwindow.App = App;");
    }

    #[test]
    fn test_anonymous_function_becomes_assignment() {
        let (_, text) = rewrite("export default function () { return 1; }");
        assert_eq!(text, "window.App = function () { return 1; };");
    }

    #[test]
    fn test_identifier_export_becomes_assignment() {
        let (_, text) = rewrite("const Page = () => null;\nexport default Page;");
        assert!(text.starts_with("const Page = () => null;\n"));
        assert!(text.contains("window.App = Page;"));
        assert!(!text.contains("export"));
    }

    #[test]
    fn test_tracked_imports_are_collected_and_removed() {
        let (rewrite, text) = rewrite(
            "import { Home, Bell as Alarm, type LucideIcon } from 'lucide-react';\nimport * as Charts from 'recharts';\nconst x = 1;",
        );
        assert!(!text.contains("import"));
        assert_eq!(rewrite.bindings.len(), 4);

        let alarm = &rewrite.bindings[1];
        assert_eq!(alarm.imported_name.as_deref(), Some("Bell"));
        assert_eq!(alarm.local_name, "Alarm");
        assert_eq!(alarm.destructure_entry().as_deref(), Some("Bell: Alarm"));

        assert!(rewrite.bindings[2].is_type_only);
        assert_eq!(rewrite.bindings[2].destructure_entry(), None);

        let charts = &rewrite.bindings[3];
        assert!(charts.is_default_or_namespace);
        assert_eq!(charts.source_module, "recharts");
    }

    #[test]
    fn test_same_offset_edits_keep_push_order() {
        let rewrite = ModuleRewrite {
            edits: vec![
                TextEdit::insert(3, "a".to_string()),
                TextEdit::insert(3, "b".to_string()),
                TextEdit::delete(0, 1),
                TextEdit::insert(6, "!".to_string()),
            ],
            ..ModuleRewrite::default()
        };
        assert_eq!(rewrite.apply("foobar"), "ooabbar!");
    }

    #[test]
    fn test_other_imports_stay_in_place() {
        let (rewrite, text) =
            rewrite("import React from 'react';\nimport { clsx } from 'clsx';\n");
        assert!(rewrite.bindings.is_empty());
        assert!(!text.contains("from 'react'"));
        assert!(text.contains("import { clsx } from 'clsx';"));
    }
}
