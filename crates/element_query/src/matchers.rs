//! Condition vocabulary: matchers that test one condition kind against a
//! live element.
//!
//! The table keyed by property name is the system's sole extension surface:
//! new condition vocabulary is added by inserting entries, never by touching
//! the parser grammar. Exactly two matchers ship built in,
//! `max-available-width` and `min-available-width`.

use crate::adapter::DocumentAdapter;
use crate::config::EngineConfig;
use crate::units::{LengthContext, Unit, to_pixels};
use std::collections::HashMap;

/// One condition kind, testable against an element.
pub trait ConditionMatcher<A: DocumentAdapter> {
    /// Whether the element currently satisfies `value`/`unit` for this
    /// condition kind.
    fn test(&self, document: &A, element: A::Handle, value: f32, unit: Unit) -> bool;
}

/// Named table of condition matchers.
pub struct MatcherTable<A: DocumentAdapter> {
    entries: HashMap<String, Box<dyn ConditionMatcher<A>>>,
}

impl<A: DocumentAdapter> MatcherTable<A> {
    /// A table with no entries. Every condition evaluates as vacuously
    /// satisfied until matchers are inserted.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The built-in table: the two available-width matchers, carrying the
    /// configured fallback em size.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut table = Self::empty();
        table.insert(
            "max-available-width",
            Box::new(MaxAvailableWidth {
                fallback_em_px: config.fallback_em_px,
            }),
        );
        table.insert(
            "min-available-width",
            Box::new(MinAvailableWidth {
                fallback_em_px: config.fallback_em_px,
            }),
        );
        table
    }

    /// Insert (or replace) the matcher for a condition property.
    pub fn insert(&mut self, property: impl Into<String>, matcher: Box<dyn ConditionMatcher<A>>) {
        self.entries.insert(property.into(), matcher);
    }

    pub fn get(&self, property: &str) -> Option<&dyn ConditionMatcher<A>> {
        self.entries.get(property).map(|matcher| &**matcher)
    }
}

impl<A: DocumentAdapter> Default for MatcherTable<A> {
    fn default() -> Self {
        Self::with_config(&EngineConfig::default())
    }
}

/// Measurement snapshot for a condition tested relative to `element`: em
/// resolves against the element's computed font size, rem against the root.
fn measure_context<A: DocumentAdapter>(
    document: &A,
    element: A::Handle,
    fallback_em_px: f32,
) -> LengthContext {
    LengthContext {
        em_size_px: document.font_size_px(Some(element)).unwrap_or(fallback_em_px),
        root_em_size_px: document.font_size_px(None).unwrap_or(fallback_em_px),
        viewport: document.viewport(),
    }
}

/// Parent's box width must be at most the converted threshold. Inclusive;
/// an element with no parent never matches, nor does a zero threshold.
struct MaxAvailableWidth {
    fallback_em_px: f32,
}

impl<A: DocumentAdapter> ConditionMatcher<A> for MaxAvailableWidth {
    fn test(&self, document: &A, element: A::Handle, value: f32, unit: Unit) -> bool {
        let Some(parent) = document.parent(element) else {
            return false;
        };
        if value == 0.0 {
            return false;
        }
        let context = measure_context(document, parent, self.fallback_em_px);
        document.box_width_px(parent) <= to_pixels(value, unit, &context)
    }
}

/// Parent's box width must be at least the converted threshold.
struct MinAvailableWidth {
    fallback_em_px: f32,
}

impl<A: DocumentAdapter> ConditionMatcher<A> for MinAvailableWidth {
    fn test(&self, document: &A, element: A::Handle, value: f32, unit: Unit) -> bool {
        let Some(parent) = document.parent(element) else {
            return false;
        };
        if value == 0.0 {
            return false;
        }
        let context = measure_context(document, parent, self.fallback_em_px);
        document.box_width_px(parent) >= to_pixels(value, unit, &context)
    }
}
