// ✅ Format Validator - Whole-line syntax check
// `<street>( - <number specification>)?`, street names never contain '-'

use crate::error::FormatError;
use crate::grammar::{self, Vocabulary};

/// Note emitted for lines that fail validation
pub const FORMAT_ERROR_NOTE: &str = "Format of the input is incorrect";

/// A line that passed validation, split at the first " - "
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedLine<'a> {
    pub street: &'a str,
    pub numbers: Option<&'a str>,
}

pub struct FormatValidator {
    vocabulary: &'static Vocabulary,
}

impl FormatValidator {
    pub fn new(vocabulary: &'static Vocabulary) -> Self {
        FormatValidator { vocabulary }
    }

    /// Check a normalized line
    pub fn validate<'a>(&self, line: &'a str) -> Result<ValidatedLine<'a>, FormatError> {
        let Some(dash) = line.find('-') else {
            if line.trim().is_empty() {
                return Err(FormatError::EmptyStreet);
            }
            return Ok(ValidatedLine {
                street: line,
                numbers: None,
            });
        };

        // The first '-' must be the " - " marker
        let street = line[..dash]
            .strip_suffix(' ')
            .ok_or(FormatError::MisplacedDash { position: dash })?;
        let numbers = line[dash + 1..]
            .strip_prefix(' ')
            .ok_or(FormatError::MisplacedDash { position: dash })?;

        if street.trim().is_empty() {
            return Err(FormatError::EmptyStreet);
        }

        grammar::parse(numbers, self.vocabulary)?;

        Ok(ValidatedLine {
            street,
            numbers: Some(numbers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleParseError;
    use crate::grammar::{CZECH, ENGLISH};

    fn validator() -> FormatValidator {
        FormatValidator::new(&ENGLISH)
    }

    #[test]
    fn test_street_only_line() {
        let v = validator().validate("Golden Lane").unwrap();
        assert_eq!(v.street, "Golden Lane");
        assert_eq!(v.numbers, None);
    }

    #[test]
    fn test_street_with_numbers() {
        let v = validator()
            .validate("Main Street - even no. 28-50, odd no. 7 and above")
            .unwrap();
        assert_eq!(v.street, "Main Street");
        assert_eq!(v.numbers, Some("even no. 28-50, odd no. 7 and above"));
    }

    #[test]
    fn test_bare_number_rejected() {
        let err = validator().validate("Main Street - 123").unwrap_err();
        assert!(matches!(err, FormatError::Numbers(RuleParseError::Expected { .. })));
    }

    #[test]
    fn test_dash_inside_street_rejected() {
        assert_eq!(
            validator().validate("Main-Street"),
            Err(FormatError::MisplacedDash { position: 4 })
        );
        assert!(validator().validate("Main Street -").is_err());
        assert!(validator().validate("Main Street -no. 5").is_err());
    }

    #[test]
    fn test_empty_street_rejected() {
        assert_eq!(
            validator().validate(" - no. 5"),
            Err(FormatError::EmptyStreet)
        );
    }

    #[test]
    fn test_marker_without_numbers_rejected() {
        assert!(validator().validate("Main Street - ").is_err());
    }

    #[test]
    fn test_glued_words_and_loose_commas_rejected() {
        for line in [
            "Main Street - odd no. 7and above",
            "Main Street - even no. from 28upward",
            "Main Street - no. 5and 6",
            "Main Street - no. 5 ,6",
        ] {
            assert!(
                matches!(validator().validate(line), Err(FormatError::Numbers(_))),
                "{} should be rejected",
                line
            );
        }
        assert!(validator().validate("Main Street - no. 5,6 and 8").is_ok());
    }

    #[test]
    fn test_czech_vocabulary() {
        let v = FormatValidator::new(&CZECH);
        assert!(v.validate("Zlatá ulička u Daliborky - sudá č. 28-50").is_ok());
        assert!(v.validate("Zlatá ulička u Daliborky - even no. 28-50").is_err());
    }
}
