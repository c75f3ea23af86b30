//! Source Transformer
//!
//! `source text -> preview document`. The pipeline:
//!
//! 1. parse (module + TypeScript + JSX),
//! 2. collect tracked-library imports and normalize the default export
//!    ([`ModuleRewriter`]), applying its edits to the text,
//! 3. lower the rewritten text: strip types, JSX to `React.createElement`,
//! 4. prepend the preamble, append the entry invocation,
//! 5. wrap everything in the page template.
//!
//! [`compile`] reports failures as [`BuildError`]. [`transform`] never fails:
//! a broken source yields a document that displays the build error.

use std::path::Path;

use log::{debug, warn};
use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{JsxOptions, JsxRuntime, TransformOptions, Transformer};

use crate::cache::fingerprint;
use crate::document::{entry_invocation, render_document, render_error_document};
use crate::error::BuildError;
use crate::options::PreviewOptions;
use crate::preamble::synthesize_preamble;
use crate::rewrite::{ImportBinding, ModuleRewriter};

/// File name handed to the lowering pass; only its extension matters.
const VIRTUAL_FILE: &str = "component.tsx";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// The executable script, before it is wrapped in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    pub preamble: String,
    /// Lowered user code with imports resolved and the default export bound
    pub body: String,
    pub imports: Vec<ImportBinding>,
    /// Number of default exports bound to the entry global
    pub entry_exports: usize,
    entry: String,
}

impl CompiledModule {
    /// `preamble + body + entry invocation`
    pub fn script(&self) -> String {
        let mut script =
            String::with_capacity(self.preamble.len() + self.body.len() + self.entry.len() + 2);
        script.push_str(&self.preamble);
        script.push_str(&self.body);
        if !self.body.is_empty() && !self.body.ends_with('\n') {
            script.push('\n');
        }
        script.push_str(&self.entry);
        script.push('\n');
        script
    }
}

/// A complete preview page, built fresh for every source and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub document: String,
    pub imports: Vec<ImportBinding>,
    /// Whether a default export was bound to the entry global
    pub has_entry: bool,
    /// SHA-256 of the source text
    pub fingerprint: String,
    /// Set when `document` is the build-error page
    pub error: Option<BuildError>,
}

impl BuildArtifact {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn failed(source: &str, error: BuildError) -> Self {
        BuildArtifact {
            document: render_error_document(&error.to_string()),
            imports: Vec::new(),
            has_entry: false,
            fingerprint: fingerprint(source),
            error: Some(error),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════════

/// Transform with default options. Never fails.
pub fn transform(source: &str) -> BuildArtifact {
    transform_with_options(source, &PreviewOptions::default())
}

/// Transform; any failure becomes the build-error page.
pub fn transform_with_options(source: &str, options: &PreviewOptions) -> BuildArtifact {
    match compile(source, options) {
        Ok(artifact) => artifact,
        Err(err) => {
            warn!("preview build failed: {}", err);
            BuildArtifact::failed(source, err)
        }
    }
}

/// Build the preview page, reporting failures to the caller.
pub fn compile(source: &str, options: &PreviewOptions) -> Result<BuildArtifact, BuildError> {
    let module = compile_module(source, options)?;
    let document = render_document(&module.script(), options);

    Ok(BuildArtifact {
        document,
        has_entry: module.entry_exports > 0,
        imports: module.imports,
        fingerprint: fingerprint(source),
        error: None,
    })
}

/// Rewrite and lower `source` without wrapping it in the page.
pub fn compile_module(source: &str, options: &PreviewOptions) -> Result<CompiledModule, BuildError> {
    options.check()?;

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, module_source_type()).parse();
    if !ret.errors.is_empty() {
        return Err(BuildError::parse(ret.errors.as_slice()));
    }

    let mut rewriter = ModuleRewriter::new(options, source);
    rewriter.visit_program(&ret.program);
    let rewrite = rewriter.finish();
    debug!(
        "collected {} library binding(s), {} edit(s), {} entry export(s)",
        rewrite.bindings.len(),
        rewrite.edits.len(),
        rewrite.entry_exports
    );

    let rewritten = rewrite.apply(source);
    let body = lower(&rewritten)?;
    let preamble = synthesize_preamble(&rewrite.bindings, options);

    Ok(CompiledModule {
        preamble,
        body,
        imports: rewrite.bindings,
        entry_exports: rewrite.entry_exports,
        entry: entry_invocation(options),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERING
// ═══════════════════════════════════════════════════════════════════════════════

fn module_source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

fn lowering_options() -> TransformOptions {
    TransformOptions {
        jsx: JsxOptions {
            jsx_plugin: true,
            runtime: JsxRuntime::Classic,
            development: false,
            ..JsxOptions::default()
        },
        ..TransformOptions::default()
    }
}

/// Strip TypeScript and lower JSX to classic `React.createElement` calls.
fn lower(source: &str) -> Result<String, BuildError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, module_source_type()).parse();
    if !ret.errors.is_empty() {
        return Err(BuildError::parse(ret.errors.as_slice()));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let options = lowering_options();
    let ret = Transformer::new(&allocator, Path::new(VIRTUAL_FILE), &options)
        .build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(BuildError::lowering(ret.errors.as_slice()));
    }

    Ok(Codegen::new().build(&program).code)
}
