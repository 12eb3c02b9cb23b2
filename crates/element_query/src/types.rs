//! Data model shared by the parser and the evaluation engine.

use crate::units::Unit;

/// One atomic test inside an element-query clause, e.g.
/// `max-available-width: 30em`. Immutable once parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionRule {
    /// Condition property name, looked up against the matcher table at
    /// evaluation time. Unknown properties are inert, not errors.
    pub property: String,
    pub value: f32,
    pub unit: Unit,
}

/// The parsed, rewritten form of one element query: the querying selector,
/// the generated class name substituted for the clause, and the ordered
/// condition rules.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRegistration {
    /// Selector fragment preceding the clause, with any earlier clauses in
    /// the same chain already replaced by their class names.
    pub selector: String,
    pub class_name: String,
    pub rules: Vec<ConditionRule>,
}

/// Derive the CSS class name a rule sequence is rewritten to.
///
/// `query` followed by `_{property}_{value}{unit}` for every rule in declared
/// order. Deterministic: byte-identical rule sequences always produce the
/// same name, and stylesheets may already encode these names, so the format
/// is load-bearing. Reordering rules changes the name.
pub fn class_name_for_rules(rules: &[ConditionRule]) -> String {
    let mut name = String::from("query");
    for rule in rules {
        name.push('_');
        name.push_str(&rule.property);
        name.push('_');
        name.push_str(&format_scalar(rule.value));
        name.push_str(rule.unit.as_str());
    }
    name
}

/// Render a condition value the way the class-name format expects: integral
/// values without a fractional tail (`30`, not `30.0`).
fn format_scalar(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
