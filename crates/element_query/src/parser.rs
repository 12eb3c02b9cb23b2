//! Stylesheet rewriting: locate `:media()` clauses in raw CSS text and
//! replace them with generated class selectors.
//!
//! The scanner leans on `cssparser` for block structure only — token
//! positions delimit raw text slices, and declaration blocks are carried
//! through byte-for-byte, never reparsed. Rules the grammar does not
//! recognize (declaration-only at-rules such as `@import`, or block-shaped
//! ones such as `@font-face`) are dropped from the rewritten text, which is
//! why callers append the output to the page's active styles instead of
//! replacing them.

use crate::types::{ConditionRule, QueryRegistration, class_name_for_rules};
use crate::units::Unit;
use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};
use log::debug;

/// Result of rewriting one stylesheet: the CSS text to append, plus every
/// query discovered, in document order.
#[derive(Clone, Debug, Default)]
pub struct RewriteOutput {
    pub css: String,
    pub queries: Vec<QueryRegistration>,
}

/// Parse the raw text of a stylesheet for element queries.
///
/// Comments are stripped first; `@media` blocks are rewritten recursively
/// and re-emitted after the plain rules of their nesting level (dropped
/// entirely when nothing inside them survives the rewrite); every other
/// at-rule is dropped. Rule ordering relative to rules lifted out of
/// at-rules is not preserved.
pub fn parse_style_text(source: &str) -> RewriteOutput {
    let stripped = strip_comments(source);
    let output = rewrite_block(&stripped);
    debug!("discovered {} element queries", output.queries.len());
    output
}

/// Remove `/* ... */` comments, non-greedy across lines. An unterminated
/// comment never matches and is left in place.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(open) = rest.find("/*") {
        let after = &rest[open + 2..];
        match after.find("*/") {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after[close + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Rewrite one comment-free block of rules. Recurses into `@media` bodies.
fn rewrite_block(text: &str) -> RewriteOutput {
    let mut parser_input = ParserInput::new(text);
    let mut input = Parser::new(&mut parser_input);
    let mut plain_rules = String::new();
    let mut lifted_rules = String::new();
    let mut queries = Vec::new();

    loop {
        input.skip_whitespace();
        if input.is_exhausted() {
            break;
        }
        let rule_start = input.position();
        let first = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match first {
            Token::AtKeyword(name) => {
                consume_at_rule(&mut input, rule_start, &name, &mut lifted_rules, &mut queries);
            }
            Token::CurlyBracketBlock => {
                // The rule grammar requires a non-empty selector.
                skip_block(&mut input);
            }
            _ => {
                if !scan_to_block(&mut input) {
                    // Trailing text with no declaration block.
                    break;
                }
                let selector_list = input.slice_from(rule_start).trim_end_matches('{').trim();
                let body = consume_raw_block(&mut input);
                let rewritten = rewrite_selector_list(selector_list, &mut queries);
                plain_rules.push_str(&rewritten);
                plain_rules.push('{');
                plain_rules.push_str(&body);
                plain_rules.push_str("}\n");
            }
        }
    }

    RewriteOutput {
        css: format!("{plain_rules}\n{lifted_rules}"),
        queries,
    }
}

/// Consume an at-rule whose `@keyword` token has already been taken.
///
/// `@media` bodies are rewritten recursively and appended to the lifted
/// rules unless the rewritten body is whitespace-only. Every other at-rule —
/// terminated by a semicolon or carrying a block — is dropped.
fn consume_at_rule<'input>(
    input: &mut Parser<'input, '_>,
    rule_start: SourcePosition,
    name: &str,
    lifted_rules: &mut String,
    queries: &mut Vec<QueryRegistration>,
) {
    loop {
        match input.next() {
            Err(_) => return,
            Ok(Token::Semicolon) => return,
            Ok(Token::CurlyBracketBlock) => {
                let prelude = input.slice_from(rule_start).trim_end_matches('{');
                let body = consume_raw_block(input);
                if name.eq_ignore_ascii_case("media") {
                    let inner = rewrite_block(&body);
                    queries.extend(inner.queries);
                    if !inner.css.trim().is_empty() {
                        lifted_rules.push_str(prelude);
                        lifted_rules.push_str("{\n");
                        lifted_rules.push_str(&inner.css);
                        lifted_rules.push_str("\n}\n");
                    }
                }
                return;
            }
            Ok(_) => {}
        }
    }
}

/// Advance past prelude tokens until the opening `{` of a declaration block.
fn scan_to_block(input: &mut Parser<'_, '_>) -> bool {
    loop {
        match input.next() {
            Ok(Token::CurlyBracketBlock) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

/// Capture the raw text of the block the parser is positioned at.
fn consume_raw_block<'input>(input: &mut Parser<'input, '_>) -> String {
    let parsed: Result<String, ParseError<'input, ()>> = input.parse_nested_block(|block| {
        let start = block.position();
        while block.next_including_whitespace_and_comments().is_ok() {}
        Ok(block.slice_from(start).to_owned())
    });
    parsed.unwrap_or_default()
}

/// Consume and discard the block the parser is positioned at.
fn skip_block<'input>(input: &mut Parser<'input, '_>) {
    let skipped: Result<(), ParseError<'input, ()>> = input.parse_nested_block(|block| {
        while block.next_including_whitespace_and_comments().is_ok() {}
        Ok(())
    });
    if skipped.is_err() {
        debug!("unterminated block at end of stylesheet");
    }
}

/// Rewrite a full selector list, splitting on top-level commas so that a
/// multi-condition clause is never torn apart.
fn rewrite_selector_list(selector_list: &str, queries: &mut Vec<QueryRegistration>) -> String {
    let fragments: Vec<String> = split_top_level_commas(selector_list)
        .into_iter()
        .map(|selector| rewrite_single_selector(selector, queries))
        .collect();
    fragments.join(",")
}

fn split_top_level_commas(selector_list: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0_usize;
    let mut fragment_start = 0;
    for (index, character) in selector_list.char_indices() {
        match character {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                fragments.push(&selector_list[fragment_start..index]);
                fragment_start = index + 1;
            }
            _ => {}
        }
    }
    fragments.push(&selector_list[fragment_start..]);
    fragments
}

/// Rewrite one comma-free selector, recording a registration per `:media()`
/// clause. The registration's selector is everything before the clause with
/// earlier clauses already replaced, so chained clauses compose via
/// successive class requirements.
fn rewrite_single_selector(selector: &str, queries: &mut Vec<QueryRegistration>) -> String {
    let mut new_selector = String::new();
    let mut consumed = 0;
    let mut search_from = 0;
    while let Some(clause) = find_clause(selector, search_from) {
        new_selector.push_str(&selector[consumed..clause.start]);
        let rules = parse_condition_list(clause.conditions);
        let class_name = class_name_for_rules(&rules);
        queries.push(QueryRegistration {
            selector: new_selector.clone(),
            class_name: class_name.clone(),
            rules,
        });
        new_selector.push('.');
        new_selector.push_str(&class_name);
        consumed = clause.end;
        search_from = clause.end;
    }
    new_selector.push_str(&selector[consumed..]);
    new_selector
}

struct Clause<'text> {
    start: usize,
    end: usize,
    conditions: &'text str,
}

/// Locate the next `:media( ... )` occurrence at or after `from`.
fn find_clause(selector: &str, from: usize) -> Option<Clause<'_>> {
    let bytes = selector.as_bytes();
    let mut search_from = from;
    while let Some(found) = selector[search_from..].find(":media") {
        let start = search_from + found;
        let mut cursor = start + ":media".len();
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if bytes.get(cursor) == Some(&b'(') {
            let conditions_start = cursor + 1;
            if let Some(close) = selector[conditions_start..].find(')') {
                let conditions_end = conditions_start + close;
                return Some(Clause {
                    start,
                    end: conditions_end + 1,
                    conditions: &selector[conditions_start..conditions_end],
                });
            }
        }
        search_from = start + 1;
    }
    None
}

// Unit suffixes in match order; anchored matching, no word boundary.
const UNIT_SUFFIXES: [(&str, Unit); 7] = [
    ("px", Unit::Px),
    ("em", Unit::Em),
    ("rem", Unit::Rem),
    ("vw", Unit::Vw),
    ("vh", Unit::Vh),
    ("vmin", Unit::Vmin),
    ("vmax", Unit::Vmax),
];

/// Tokenize a clause's condition list into rules.
///
/// Repeatedly matches `property: numberunit`, each condition optionally
/// wrapped in its own parentheses; text that does not match is skipped. A
/// list that fails to tokenize entirely yields no rules — the clause is
/// still replaced by the bare `query` class.
fn parse_condition_list(conditions: &str) -> Vec<ConditionRule> {
    let mut rules = Vec::new();
    let mut pos = 0;
    while pos < conditions.len() {
        if let Some((rule, end)) = match_condition_at(conditions, pos) {
            rules.push(rule);
            pos = end;
        } else {
            pos += 1;
            while pos < conditions.len() && !conditions.is_char_boundary(pos) {
                pos += 1;
            }
        }
    }
    rules
}

/// Try to match one `property: numberunit` condition starting at `pos`.
/// Returns the rule and the byte offset just past the match.
fn match_condition_at(conditions: &str, pos: usize) -> Option<(ConditionRule, usize)> {
    let bytes = conditions.as_bytes();
    let mut cursor = pos;
    if bytes.get(cursor) == Some(&b'(') {
        cursor += 1;
    }
    let property_start = cursor;
    while cursor < bytes.len() && bytes[cursor] != b':' && !bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if cursor == property_start || bytes.get(cursor) != Some(&b':') {
        return None;
    }
    let property = &conditions[property_start..cursor];
    cursor += 1;
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    let number_start = cursor;
    while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
        cursor += 1;
    }
    if cursor == number_start {
        return None;
    }
    if bytes.get(cursor) == Some(&b'.') && bytes.get(cursor + 1).is_some_and(u8::is_ascii_digit) {
        cursor += 2;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
    }
    let value = conditions[number_start..cursor].parse::<f32>().unwrap_or(0.0);
    let (suffix, unit) = *UNIT_SUFFIXES
        .iter()
        .find(|(candidate, _)| conditions[cursor..].starts_with(*candidate))?;
    cursor += suffix.len();
    if bytes.get(cursor) == Some(&b')') {
        cursor += 1;
    }
    Some((
        ConditionRule {
            property: property.to_owned(),
            value,
            unit,
        },
        cursor,
    ))
}

#[cfg(test)]
mod tests {
    use super::{parse_condition_list, split_top_level_commas, strip_comments};
    use crate::units::Unit;

    #[test]
    fn comments_are_stripped_non_greedily() {
        assert_eq!(strip_comments("/* a */x/* b */y"), "xy");
        assert_eq!(strip_comments("a /* { } */ b"), "a  b");
    }

    #[test]
    fn unterminated_comment_is_left_in_place() {
        assert_eq!(strip_comments("x /* never closed"), "x /* never closed");
    }

    #[test]
    fn commas_inside_parentheses_do_not_split() {
        let fragments = split_top_level_commas(".a:media(x: 1px, y: 2px), .b");
        assert_eq!(fragments, vec![".a:media(x: 1px, y: 2px)", " .b"]);
    }

    #[test]
    fn condition_tokenizer_skips_unmatched_text() {
        let rules = parse_condition_list("junk (min-available-width: 10.5em) junk");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].property, "min-available-width");
        assert_eq!(rules[0].value, 10.5);
        assert_eq!(rules[0].unit, Unit::Em);
    }

    #[test]
    fn condition_without_a_known_unit_does_not_tokenize() {
        assert!(parse_condition_list("max-available-width: 30").is_empty());
        assert!(parse_condition_list("max-available-width: 30pt").is_empty());
    }
}
