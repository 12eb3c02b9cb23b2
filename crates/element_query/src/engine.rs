//! Query registry and evaluation engine.

use crate::adapter::DocumentAdapter;
use crate::config::EngineConfig;
use crate::matchers::MatcherTable;
use crate::types::{ConditionRule, QueryRegistration};
use log::trace;

/// Ordered, append-only collection of every query registration discovered
/// so far. Insertion order is preserved and duplicates are kept: evaluating
/// a registration twice is harmless because class toggling is idempotent.
/// There is no removal — a registration whose elements have left the
/// document simply matches nothing.
#[derive(Clone, Debug, Default)]
pub struct QueryRegistry {
    queries: Vec<QueryRegistration>,
}

impl QueryRegistry {
    /// Append registrations in order. No deduplication, no validation.
    pub fn register(&mut self, queries: impl IntoIterator<Item = QueryRegistration>) {
        self.queries.extend(queries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryRegistration> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// The evaluator: owns the cumulative registry and the condition-matcher
/// table, and synchronizes generated classes on demand.
pub struct QueryEngine<A: DocumentAdapter> {
    registry: QueryRegistry,
    matchers: MatcherTable<A>,
}

impl<A: DocumentAdapter> QueryEngine<A> {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self::with_matchers(MatcherTable::with_config(config))
    }

    /// Build an engine around a custom matcher table.
    pub fn with_matchers(matchers: MatcherTable<A>) -> Self {
        Self {
            registry: QueryRegistry::default(),
            matchers,
        }
    }

    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    /// The matcher table — the extension surface for new condition
    /// vocabulary.
    pub fn matchers_mut(&mut self) -> &mut MatcherTable<A> {
        &mut self.matchers
    }

    /// Append discovered registrations to the registry.
    pub fn register(&mut self, queries: impl IntoIterator<Item = QueryRegistration>) {
        self.registry.register(queries);
    }

    /// Re-test every registration against every currently matching element
    /// and synchronize its generated class.
    ///
    /// A single synchronous pass in registry order with no suspension
    /// points: each matched element gets the class added when all rules
    /// pass (or the rule list is empty) and removed otherwise, so the pass
    /// is idempotent and self-correcting — no state is cached beyond the
    /// class sets themselves. An empty registry degenerates to a no-op, and
    /// a selector matching nothing skips silently. Debouncing belongs to
    /// the caller.
    pub fn evaluate_all(&self, document: &mut A) {
        for registration in self.registry.iter() {
            let elements = document.select(&registration.selector);
            for element in elements {
                if self.element_matches(document, element, &registration.rules) {
                    document.add_class(element, &registration.class_name);
                } else {
                    document.remove_class(element, &registration.class_name);
                }
            }
        }
        trace!("evaluated {} query registrations", self.registry.len());
    }

    /// Rules are tested in reverse declared order, short-circuiting on the
    /// first failure; a property with no matcher in the table is vacuously
    /// satisfied and never blocks a match.
    fn element_matches(&self, document: &A, element: A::Handle, rules: &[ConditionRule]) -> bool {
        for rule in rules.iter().rev() {
            if let Some(matcher) = self.matchers.get(&rule.property) {
                if !matcher.test(document, element, rule.value, rule.unit) {
                    return false;
                }
            }
        }
        true
    }
}

impl<A: DocumentAdapter> Default for QueryEngine<A> {
    fn default() -> Self {
        Self::new()
    }
}
