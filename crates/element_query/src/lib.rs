//! Element queries for CSS.
//!
//! A stylesheet may scope a rule to an element's rendering context (rather
//! than the global viewport) with the non-standard `:media()` clause:
//!
//! ```css
//! .sidebar:media(max-available-width: 30em) { display: none; }
//! ```
//!
//! [`parse_style_text`] rewrites such rules into plain CSS driven by
//! generated class names and reports the discovered queries;
//! [`QueryEngine::evaluate_all`] re-tests every query against the live
//! document and keeps the generated classes in sync. The rewritten text is
//! meant to be appended to the page's active styles, never substituted for
//! them: rules the rewrite grammar does not recognize (declaration-only
//! at-rules, for example) are absent from the output.
//!
//! Host specifics (element selection, box measurement, class mutation) sit
//! behind the [`DocumentAdapter`] trait, so the engine itself never touches
//! a concrete DOM.

#![forbid(unsafe_code)]

pub mod adapter;
pub mod config;
pub mod engine;
pub mod matchers;
pub mod parser;
pub mod scan;
pub mod types;
pub mod units;

// Re-exports for ergonomic access from other crates.
pub use adapter::DocumentAdapter;
pub use config::EngineConfig;
pub use engine::{QueryEngine, QueryRegistry};
pub use matchers::{ConditionMatcher, MatcherTable};
pub use parser::{RewriteOutput, parse_style_text};
pub use scan::{SheetLoader, SheetSource, scan_style_sheets};
pub use types::{ConditionRule, QueryRegistration, class_name_for_rules};
pub use units::{LengthContext, Unit, Viewport, to_pixels};
