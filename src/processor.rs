// 🔄 Line Processor - Validity lines → corrected text, notes, rules, points
//
// Per line: skip comments/blank → normalize → validate → resolve street →
// parse numbers → collect points. Every failure becomes a note, so one bad
// line never aborts a document.

use crate::config::AppConfig;
use crate::grammar::Locale;
use crate::model::{GeoPoint, LineOutcome, NumberRule, ResolutionOutcome, TextConversion};
use crate::normalizer::normalize;
use crate::registry::Registry;
use crate::resolver::StreetResolver;
use crate::rules::NumberRuleParser;
use crate::validator::{FormatValidator, FORMAT_ERROR_NOTE};
use std::sync::Arc;
use tracing::debug;

pub const STREET_CORRECTED_NOTE: &str = "We suggest to change street name";

const NOTE_SEPARATOR: &str = "; ";

pub fn street_not_found_note(street: &str) -> String {
    format!("We had trouble finding street {}", street)
}

pub struct LineProcessor {
    registry: Arc<dyn Registry>,
    resolver: StreetResolver,
    validator: FormatValidator,
    rule_parser: NumberRuleParser,
    comment_marker: char,
}

impl LineProcessor {
    pub fn new(registry: Arc<dyn Registry>, locale: Locale) -> Self {
        let vocabulary = locale.vocabulary();
        LineProcessor {
            registry,
            resolver: StreetResolver::new(),
            validator: FormatValidator::new(vocabulary),
            rule_parser: NumberRuleParser::new(vocabulary),
            comment_marker: '!',
        }
    }

    pub fn from_config(registry: Arc<dyn Registry>, config: &AppConfig) -> Self {
        Self::new(registry, config.locale).with_comment_marker(config.comment_marker)
    }

    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    pub fn with_resolver(mut self, resolver: StreetResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn registry(&self) -> &dyn Registry {
        self.registry.as_ref()
    }

    /// Parse a bare number specification (text after " - ")
    pub fn parse_rules(&self, specification: &str) -> Option<Vec<NumberRule>> {
        self.rule_parser.parse_rules(specification).ok()
    }

    // ========================================================================
    // SINGLE LINE
    // ========================================================================

    /// Run one validity line through the pipeline
    ///
    /// Points are only collected when `extract_points` is set and the street
    /// name matched the registry exactly. They are not filtered by the rules.
    pub fn process_line(&self, city_code: u32, line: &str, extract_points: bool) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() || line.starts_with(self.comment_marker) {
            return LineOutcome {
                corrected: line.to_string(),
                ..LineOutcome::default()
            };
        }

        let mut notes: Vec<String> = Vec::new();
        let normalized = normalize(line);
        if let Some(note) = normalized.note() {
            notes.push(note.to_string());
        }
        let text = normalized.text.as_str();

        let validated = match self.validator.validate(text) {
            Ok(validated) => validated,
            Err(err) => {
                debug!(line = text, error = %err, "line rejected");
                notes.push(FORMAT_ERROR_NOTE.to_string());
                return LineOutcome {
                    corrected: text.to_string(),
                    note: notes.join(NOTE_SEPARATOR),
                    ..LineOutcome::default()
                };
            }
        };

        let resolution =
            self.resolver
                .suggest_street(self.registry.as_ref(), city_code, validated.street);

        let corrected = match &resolution {
            ResolutionOutcome::ExactMatch(_) => text.to_string(),
            ResolutionOutcome::CorrectedMatch(street) => {
                notes.push(STREET_CORRECTED_NOTE.to_string());
                format!("{}{}", street.name, &text[validated.street.len()..])
            }
            ResolutionOutcome::NotFound => {
                notes.push(street_not_found_note(validated.street));
                text.to_string()
            }
        };

        let rules = match (validated.numbers, resolution.street()) {
            (Some(numbers), Some(_)) => self
                .rule_parser
                .parse_rules(numbers)
                .unwrap_or_else(|err| {
                    debug!(numbers, error = %err, "no rules for line");
                    Vec::new()
                }),
            _ => Vec::new(),
        };

        // TODO: filter points by `rules` once the intended semantics of
        // conscription vs orientation numbers are confirmed
        let points = match &resolution {
            ResolutionOutcome::ExactMatch(street) if extract_points => {
                self.registry.data_points_for_street(street.code)
            }
            _ => Vec::new(),
        };

        debug!(
            city_code,
            street = validated.street,
            rules = rules.len(),
            points = points.len(),
            "line processed"
        );

        LineOutcome {
            corrected,
            note: notes.join(NOTE_SEPARATOR),
            rules,
            points,
        }
    }

    // ========================================================================
    // DOCUMENTS
    // ========================================================================

    /// Check a whole document; output and notes keep one line per input line
    pub fn process_document(&self, city_code: u32, text: &str) -> TextConversion {
        let mut output = Vec::new();
        let mut notes = Vec::new();

        for line in text.split('\n') {
            let outcome = self.process_line(city_code, line, false);
            output.push(outcome.corrected);
            notes.push(outcome.note);
        }

        TextConversion {
            input: text.to_string(),
            output: output.join("\n"),
            notes: notes.join("\n"),
        }
    }

    /// Address points of a document, one group per marker-delimited area
    pub fn group_points_by_marker(&self, city_code: u32, text: &str) -> Vec<Vec<GeoPoint>> {
        let mut groups = Vec::new();
        let mut current: Vec<GeoPoint> = Vec::new();

        for line in text.split('\n') {
            if line.trim_start().starts_with(self.comment_marker) && !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current.extend(self.process_line(city_code, line, true).points);
        }

        if !current.is_empty() {
            groups.push(current);
        }

        debug!(city_code, groups = groups.len(), "points grouped");
        groups
    }
}

// ============================================================================
// TESTS
// ============================================================================
