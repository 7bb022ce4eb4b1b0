// 🏙️ Address Model - Cities, streets, address points and number rules
// Value types shared by the registry, the resolver and the line pipeline

use serde::{Deserialize, Serialize, Serializer};
use std::hash::{Hash, Hasher};

// ============================================================================
// REGISTRY ENTITIES
// ============================================================================

/// Municipality from the address registry, keyed by `code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub code: u32,
    pub name: String,
    pub slug: String,
}

/// Street of one city
///
/// Identity is the registry code. Two rows with the same code are the same
/// street even when their names differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Street {
    pub code: u32,
    pub name: String,
    pub slug: String,
}

impl PartialEq for Street {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Street {}

impl Hash for Street {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Street:{}:{}", self.code, self.name)
    }
}

/// Geocoded address point. Treated as an opaque value by the line pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub orientation_number: i32,
    pub descriptive_number: i32,
}

// ============================================================================
// NUMBER RULES
// ============================================================================

/// Which house numbers of a street a rule talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeriesType {
    Odd,
    Even,
    #[default]
    All,
    /// Building registration numbers ("č. p."), parallel to orientation numbers
    ConscriptionNumber,
}

/// Lowest number a rule can start at
pub const MIN_FROM: u32 = 0;

/// Practical "no upper bound" sentinel.
///
/// Rules keep an open bound as [`UpperBound::Open`] and only turn it into this
/// value when read through [`NumberRule::to`] or serialized.
pub const MAX_TO: u32 = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    Open,
    At(u32),
}

impl UpperBound {
    pub fn value(&self) -> u32 {
        match self {
            UpperBound::Open => MAX_TO,
            UpperBound::At(n) => *n,
        }
    }
}

/// "All numbers in [from, to] belonging to `series_type`"
///
/// Equality compares `from`, the resolved `to` and the series, so an open rule
/// equals an explicit `0-10000` rule of the same series.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NumberRule {
    pub from: u32,
    #[serde(rename = "to", serialize_with = "serialize_upper")]
    pub upper: UpperBound,
    pub series_type: SeriesType,
}

fn serialize_upper<S: Serializer>(upper: &UpperBound, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u32(upper.value())
}

impl NumberRule {
    /// Whole default range of a series (bare keyword)
    pub const fn series(series_type: SeriesType) -> Self {
        NumberRule {
            from: MIN_FROM,
            upper: UpperBound::Open,
            series_type,
        }
    }

    pub const fn range(from: u32, to: u32, series_type: SeriesType) -> Self {
        NumberRule {
            from,
            upper: UpperBound::At(to),
            series_type,
        }
    }

    pub const fn single(number: u32, series_type: SeriesType) -> Self {
        Self::range(number, number, series_type)
    }

    /// "N and above"
    pub const fn open_from(from: u32, series_type: SeriesType) -> Self {
        NumberRule {
            from,
            upper: UpperBound::Open,
            series_type,
        }
    }

    pub fn to(&self) -> u32 {
        self.upper.value()
    }

    pub fn is_open(&self) -> bool {
        self.upper == UpperBound::Open
    }
}

/// Every number of every series
pub const ANY_NUMBER: NumberRule = NumberRule::series(SeriesType::All);

impl Default for NumberRule {
    fn default() -> Self {
        ANY_NUMBER
    }
}

impl PartialEq for NumberRule {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to() == other.to() && self.series_type == other.series_type
    }
}

impl Eq for NumberRule {}

impl Hash for NumberRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to().hash(state);
        self.series_type.hash(state);
    }
}

// ============================================================================
// PIPELINE RESULTS
// ============================================================================

/// Result of looking a street name up in one city
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    ExactMatch(Street),
    CorrectedMatch(Street),
    NotFound,
}

impl ResolutionOutcome {
    pub fn street(&self) -> Option<&Street> {
        match self {
            ResolutionOutcome::ExactMatch(street) | ResolutionOutcome::CorrectedMatch(street) => {
                Some(street)
            }
            ResolutionOutcome::NotFound => None,
        }
    }
}

/// What one input line turned into
#[derive(Debug, Clone, Default, Serialize)]
pub struct LineOutcome {
    pub corrected: String,
    pub note: String,
    pub rules: Vec<NumberRule>,
    pub points: Vec<GeoPoint>,
}

/// Document-shaped result: one output and one note line per input line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextConversion {
    pub input: String,
    pub output: String,
    pub notes: String,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn street(code: u32, name: &str) -> Street {
        Street {
            code,
            name: name.to_string(),
            slug: name.to_lowercase(),
        }
    }

    #[test]
    fn test_street_identity_is_code() {
        let a = street(7, "Main Street");
        let b = street(7, "Main St");
        let c = street(8, "Main Street");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Street> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_default_rule_covers_everything() {
        let rule = NumberRule::default();
        assert_eq!(rule.from, 0);
        assert_eq!(rule.to(), 10000);
        assert_eq!(rule.series_type, SeriesType::All);
        assert!(rule.is_open());
    }

    #[test]
    fn test_open_rule_equals_explicit_sentinel() {
        let open = NumberRule::open_from(28, SeriesType::Even);
        let explicit = NumberRule::range(28, MAX_TO, SeriesType::Even);
        assert_eq!(open, explicit);
        assert_ne!(open, NumberRule::open_from(28, SeriesType::Odd));
    }

    #[test]
    fn test_rule_serializes_sentinel() {
        let json = serde_json::to_value(NumberRule::open_from(7, SeriesType::Odd)).unwrap();
        assert_eq!(json["from"], 7);
        assert_eq!(json["to"], 10000);
        assert_eq!(json["series_type"], "Odd");
    }

    #[test]
    fn test_resolution_outcome_street() {
        let s = street(1, "Main Street");
        assert_eq!(ResolutionOutcome::ExactMatch(s.clone()).street(), Some(&s));
        assert_eq!(ResolutionOutcome::CorrectedMatch(s.clone()).street(), Some(&s));
        assert_eq!(ResolutionOutcome::NotFound.street(), None);
    }
}
