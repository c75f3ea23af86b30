//! # Preview Native
//!
//! Turns freshly generated UI component source into a sandboxed, runnable
//! preview page, and flags non-idiomatic output with a static pattern checker.
//! The two halves share no state.
//!
//! ## Transformer Invariants
//!
//! 1. **Never throws**: [`transform`] always returns a renderable document. A
//!    source that cannot be parsed or lowered yields the build-error page.
//! 2. **Entry binding**: the default export, whatever its shape, ends up bound
//!    to `window.App`. A source without one still builds and fails at run time
//!    with `No default export found (window.App is undefined)`.
//! 3. **Library imports**: imports from `lucide-react` and `recharts` become
//!    destructuring reads from `window.Lucide` / `window.Recharts`, aliases
//!    preserved (`Foo: Bar`). Imports of `react` / `react-dom` are deleted.
//!    Everything else is left in place.
//! 4. **Deterministic**: identical input gives a byte-identical document.
//!
//! ## Validator Invariants
//!
//! 1. Pure text checks, no parsing, never fails.
//! 2. `valid == messages.is_empty()`; messages are unique, in first-seen order.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod cache;
mod class_rules;
pub mod discovery;
pub mod document;
pub mod error;
pub mod options;
mod preamble;
pub mod repair;
pub mod rewrite;
pub mod transform;
pub mod validate;


pub use cache::{fingerprint, ArtifactCache, PreviewFrame, PreviewSession};
pub use error::BuildError;
pub use options::{LibraryBinding, PreviewOptions};
pub use repair::{strip_code_fences, RepairRequest};
pub use rewrite::ImportBinding;
pub use transform::{
    compile, compile_module, transform, transform_with_options, BuildArtifact, CompiledModule,
};
pub use validate::{validate, validate_batch, ValidationReport};

#[cfg(feature = "napi")]
#[napi]
pub fn transform_native(source: String) -> String {
    transform(&source).document
}

#[cfg(feature = "napi")]
#[napi]
pub fn validate_native(source: String) -> ValidationReport {
    validate(&source)
}
