// 🔢 Number Rules - Series clauses → NumberRule list
// Turns the text after " - " into rules, in source order

use crate::error::RuleParseError;
use crate::grammar::{self, Clause, RangeItem, Vocabulary};
use crate::model::NumberRule;

// ============================================================================
// RULE PARSER
// ============================================================================

pub struct NumberRuleParser {
    vocabulary: &'static Vocabulary,
}

impl NumberRuleParser {
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        NumberRuleParser { vocabulary }
    }

    /// Parse a number specification such as `even no. 28-50, odd no.`
    ///
    /// A keyword without numbers yields one rule over the default range of
    /// that series. Any grammar error rejects the whole specification.
    pub fn parse_rules(&self, specification: &str) -> Result<Vec<NumberRule>, RuleParseError> {
        let clauses = grammar::parse(specification.trim(), self.vocabulary)?;
        Ok(clauses.iter().flat_map(clause_rules).collect())
    }
}

fn clause_rules(clause: &Clause) -> Vec<NumberRule> {
    let series_type = clause.series_type;

    if clause.items.is_empty() {
        return vec![NumberRule::series(series_type)];
    }

    clause
        .items
        .iter()
        .map(|item| match *item {
            RangeItem::Span { from, to } => NumberRule::range(from, to, series_type),
            RangeItem::OpenFrom(from) => NumberRule::open_from(from, series_type),
            RangeItem::Single(number) => NumberRule::single(number, series_type),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
