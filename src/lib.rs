// Address Validity - Core Library
// Street validity lines → resolved street names + house-number rules.
// Used by the CLI, the API server and tests.

pub mod config;
pub mod error;
pub mod grammar;
pub mod ingest;
pub mod model;
pub mod normalizer;
pub mod processor;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod slug;
pub mod validator;

// Re-export commonly used types
pub use config::{AppConfig, ServerConfig};
pub use error::{FormatError, IngestError, RuleParseError};
pub use grammar::{Locale, Vocabulary};
pub use ingest::{
    load_address_points, load_file, load_registry, Geographic, IngestReport, Projection,
    SourceEncoding,
};
pub use model::{
    City, GeoPoint, LineOutcome, NumberRule, ResolutionOutcome, SeriesType, Street,
    TextConversion, UpperBound, MAX_TO, MIN_FROM,
};
pub use normalizer::{normalize, Normalized};
pub use processor::LineProcessor;
pub use registry::{AddressRegistry, Registry};
pub use resolver::{
    EmbankmentSuffix, ExactName, MatchTier, SlugMatch, StreetMatcher, StreetResolver,
};
pub use rules::NumberRuleParser;
pub use slug::slugify;
pub use validator::{FormatValidator, ValidatedLine};
