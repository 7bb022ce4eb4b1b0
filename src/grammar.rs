// 📜 Number Specification Grammar - Tokenizer + recursive descent
//
//   spec   := clause (sep clause)*
//   clause := KEYWORD (item (sep item)*)?
//   item   := NUMBER DASH NUMBER
//           | FROM? NUMBER CONJ? ABOVE
//           | NUMBER
//   sep    := COMMA | CONJ
//
// The keyword literals and words come from a [`Vocabulary`], so the same
// parser reads English ("even no. 28-50") and Czech ("sudá č. 28-50") lines.

use crate::error::RuleParseError;
use crate::model::SeriesType;
use serde::{Deserialize, Serialize};

// ============================================================================
// VOCABULARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Czech,
}

impl Locale {
    pub fn vocabulary(&self) -> &'static Vocabulary {
        match self {
            Locale::English => &ENGLISH,
            Locale::Czech => &CZECH,
        }
    }
}

/// Literals of one language
#[derive(Debug)]
pub struct Vocabulary {
    /// Longer literals first: "no. p." must win over "no."
    keywords: [(&'static str, SeriesType); 4],
    conjunction: &'static str,
    from: &'static str,
    above: &'static [&'static str],
}

pub static ENGLISH: Vocabulary = Vocabulary {
    keywords: [
        ("even no.", SeriesType::Even),
        ("odd no.", SeriesType::Odd),
        ("no. p.", SeriesType::ConscriptionNumber),
        ("no.", SeriesType::All),
    ],
    conjunction: "and",
    from: "from",
    above: &["upward", "above"],
};

pub static CZECH: Vocabulary = Vocabulary {
    keywords: [
        ("lichá č.", SeriesType::Odd),
        ("sudá č.", SeriesType::Even),
        ("č. p.", SeriesType::ConscriptionNumber),
        ("č.", SeriesType::All),
    ],
    conjunction: "a",
    from: "od",
    above: &["výše"],
};

impl Vocabulary {
    /// Keyword at the start of `text`, matched as a whole token
    fn keyword_at(&self, text: &str) -> Option<(&'static str, SeriesType)> {
        self.keywords.iter().copied().find(|(literal, _)| {
            text.strip_prefix(*literal)
                .map(|after| after.is_empty() || after.starts_with(' ') || after.starts_with(','))
                .unwrap_or(false)
        })
    }

    fn word(&self, word: &str) -> Option<TokenKind> {
        if word == self.conjunction {
            Some(TokenKind::Conjunction)
        } else if word == self.from {
            Some(TokenKind::From)
        } else if self.above.contains(&word) {
            Some(TokenKind::Above)
        } else {
            None
        }
    }
}

// ============================================================================
// TOKENIZER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(SeriesType),
    Number(u32),
    Dash,
    Comma,
    Conjunction,
    From,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset in the specification
    pub position: usize,
}

pub fn tokenize(input: &str, vocabulary: &Vocabulary) -> Result<Vec<Token>, RuleParseError> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while let Some(c) = input[position..].chars().next() {
        let rest = &input[position..];

        if c == ' ' {
            position += 1;
            continue;
        }

        if let Some((literal, series_type)) = vocabulary.keyword_at(rest) {
            tokens.push(Token {
                kind: TokenKind::Keyword(series_type),
                position,
            });
            position += literal.len();
            continue;
        }

        if c == ',' && input[..position].ends_with(' ') {
            return Err(RuleParseError::UnexpectedText {
                position: position - 1,
                found: " ,".to_string(),
            });
        }

        let (kind, len) = if c.is_ascii_digit() {
            let len = rest.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(rest.len());
            let digits = &rest[..len];
            let number = digits
                .parse::<u32>()
                .map_err(|_| RuleParseError::NumberOutOfRange {
                    text: digits.to_string(),
                })?;
            (TokenKind::Number(number), len)
        } else if c == '-' || c == '\u{2013}' {
            (TokenKind::Dash, c.len_utf8())
        } else if c == ',' {
            (TokenKind::Comma, 1)
        } else if c.is_alphabetic() {
            let len = rest.find(|ch: char| !ch.is_alphabetic()).unwrap_or(rest.len());
            let word = &rest[..len];
            let kind = vocabulary
                .word(word)
                .ok_or_else(|| RuleParseError::UnexpectedText {
                    position,
                    found: word.to_string(),
                })?;
            (kind, len)
        } else {
            return Err(RuleParseError::UnexpectedText {
                position,
                found: c.to_string(),
            });
        };

        if let Some(next) = rest[len..].chars().next() {
            if !follows_token(kind, next) {
                let tail = &rest[len..];
                let end = tail.find([' ', ',']).unwrap_or(tail.len());
                return Err(RuleParseError::UnexpectedText {
                    position: position + len,
                    found: tail[..end].to_string(),
                });
            }
        }

        tokens.push(Token { kind, position });
        position += len;
    }

    Ok(tokens)
}

/// Numbers and words end at a space or comma, numbers also at a dash
fn follows_token(kind: TokenKind, next: char) -> bool {
    match kind {
        TokenKind::Number(_) => matches!(next, ' ' | ',' | '-' | '\u{2013}'),
        TokenKind::Conjunction | TokenKind::From | TokenKind::Above => matches!(next, ' ' | ','),
        _ => true,
    }
}

// ============================================================================
// PARSER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeItem {
    /// `N-M`
    Span { from: u32, to: u32 },
    /// `from N upward`, `N and above`
    OpenFrom(u32),
    /// `N`
    Single(u32),
}

/// One series keyword with the items that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub series_type: SeriesType,
    pub items: Vec<RangeItem>,
}

/// Parse a whole number specification (the text after " - ")
pub fn parse(input: &str, vocabulary: &Vocabulary) -> Result<Vec<Clause>, RuleParseError> {
    let tokens = tokenize(input, vocabulary)?;
    Parser {
        tokens: &tokens,
        pos: 0,
        end: input.len(),
    }
    .parse_spec()
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    end: usize,
}

impl<'t> Parser<'t> {
    fn parse_spec(&mut self) -> Result<Vec<Clause>, RuleParseError> {
        if self.tokens.is_empty() {
            return Err(RuleParseError::Empty);
        }

        let mut clauses = vec![self.parse_clause()?];
        while self.peek(0).is_some() {
            self.expect_separator()?;
            clauses.push(self.parse_clause()?);
        }
        Ok(clauses)
    }

    fn parse_clause(&mut self) -> Result<Clause, RuleParseError> {
        let series_type = match self.peek(0) {
            Some(TokenKind::Keyword(series_type)) => {
                self.pos += 1;
                series_type
            }
            _ => return Err(self.expected("a series keyword")),
        };

        let mut items = Vec::new();
        if self.item_starts_at(0) {
            items.push(self.parse_item()?);
            while self.is_separator(0) && self.item_starts_at(1) {
                self.pos += 1;
                items.push(self.parse_item()?);
            }
        }

        Ok(Clause { series_type, items })
    }

    fn parse_item(&mut self) -> Result<RangeItem, RuleParseError> {
        let has_from = self.peek(0) == Some(TokenKind::From);
        if has_from {
            self.pos += 1;
        }
        let from = self.expect_number()?;

        match (self.peek(0), self.peek(1)) {
            (Some(TokenKind::Dash), _) if !has_from => {
                self.pos += 1;
                let to = self.expect_number()?;
                Ok(RangeItem::Span { from, to })
            }
            (Some(TokenKind::Above), _) => {
                self.pos += 1;
                Ok(RangeItem::OpenFrom(from))
            }
            (Some(TokenKind::Conjunction), Some(TokenKind::Above)) => {
                self.pos += 2;
                Ok(RangeItem::OpenFrom(from))
            }
            _ if has_from => Err(self.expected("an open range terminator")),
            _ => Ok(RangeItem::Single(from)),
        }
    }

    fn expect_number(&mut self) -> Result<u32, RuleParseError> {
        match self.peek(0) {
            Some(TokenKind::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.expected("a number")),
        }
    }

    fn expect_separator(&mut self) -> Result<(), RuleParseError> {
        if self.is_separator(0) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.expected("a separator"))
        }
    }

    fn item_starts_at(&self, offset: usize) -> bool {
        matches!(
            self.peek(offset),
            Some(TokenKind::Number(_)) | Some(TokenKind::From)
        )
    }

    fn is_separator(&self, offset: usize) -> bool {
        matches!(
            self.peek(offset),
            Some(TokenKind::Comma) | Some(TokenKind::Conjunction)
        )
    }

    fn peek(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn expected(&self, expected: &'static str) -> RuleParseError {
        let position = self
            .tokens
            .get(self.pos)
            .map(|t| t.position)
            .unwrap_or(self.end);
        RuleParseError::Expected { expected, position }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, &ENGLISH)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_prefers_longer_keyword() {
        assert_eq!(
            kinds("no. p. 255"),
            vec![
                TokenKind::Keyword(SeriesType::ConscriptionNumber),
                TokenKind::Number(255)
            ]
        );
        assert_eq!(
            kinds("no. 5"),
            vec![TokenKind::Keyword(SeriesType::All), TokenKind::Number(5)]
        );
    }

    #[test]
    fn test_tokenize_words_and_separators() {
        assert_eq!(
            kinds("odd no. 7 and above, 1-3"),
            vec![
                TokenKind::Keyword(SeriesType::Odd),
                TokenKind::Number(7),
                TokenKind::Conjunction,
                TokenKind::Above,
                TokenKind::Comma,
                TokenKind::Number(1),
                TokenKind::Dash,
                TokenKind::Number(3),
            ]
        );
    }

    #[test]
    fn test_tokenize_rejects_unknown_word() {
        let err = tokenize("no. 5 or 6", &ENGLISH).unwrap_err();
        assert_eq!(
            err,
            RuleParseError::UnexpectedText {
                position: 6,
                found: "or".to_string()
            }
        );
    }

    #[test]
    fn test_tokenize_keyword_needs_boundary() {
        assert!(tokenize("no.5", &ENGLISH).is_err());
    }

    #[test]
    fn test_tokenize_words_need_boundary() {
        assert_eq!(
            tokenize("odd no. 7and above", &ENGLISH).unwrap_err(),
            RuleParseError::UnexpectedText {
                position: 9,
                found: "and".to_string()
            }
        );
        assert!(tokenize("no. from28 upward", &ENGLISH).is_err());
        assert!(tokenize("no. 28upward", &ENGLISH).is_err());
    }

    #[test]
    fn test_tokenize_space_before_comma() {
        assert_eq!(
            tokenize("no. 5 ,6", &ENGLISH).unwrap_err(),
            RuleParseError::UnexpectedText {
                position: 5,
                found: " ,".to_string()
            }
        );
        assert!(tokenize("no. 5,6", &ENGLISH).is_ok());
        assert!(tokenize("no. 5, 6", &ENGLISH).is_ok());
    }

    #[test]
    fn test_tokenize_number_overflow() {
        let err = tokenize("no. 99999999999", &ENGLISH).unwrap_err();
        assert!(matches!(err, RuleParseError::NumberOutOfRange { .. }));
    }

    #[test]
    fn test_parse_clause_items() {
        let clauses = parse("no. 28-50, 58, 60 - 62", &ENGLISH).unwrap();
        assert_eq!(
            clauses,
            vec![Clause {
                series_type: SeriesType::All,
                items: vec![
                    RangeItem::Span { from: 28, to: 50 },
                    RangeItem::Single(58),
                    RangeItem::Span { from: 60, to: 62 },
                ],
            }]
        );
    }

    #[test]
    fn test_parse_conjunction_between_clauses() {
        let clauses = parse("even no. 2 and odd no.", &ENGLISH).unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].items, vec![RangeItem::Single(2)]);
        assert_eq!(clauses[1].series_type, SeriesType::Odd);
        assert!(clauses[1].items.is_empty());
    }

    #[test]
    fn test_parse_conjunction_between_items() {
        let clauses = parse("no. 4 and 8", &ENGLISH).unwrap();
        assert_eq!(
            clauses[0].items,
            vec![RangeItem::Single(4), RangeItem::Single(8)]
        );
    }

    #[test]
    fn test_parse_open_ranges() {
        let clauses = parse("even no. from 28 upward, odd no. 7 and above, no. 9 above", &ENGLISH).unwrap();
        let items: Vec<RangeItem> = clauses.into_iter().flat_map(|c| c.items).collect();
        assert_eq!(
            items,
            vec![
                RangeItem::OpenFrom(28),
                RangeItem::OpenFrom(7),
                RangeItem::OpenFrom(9)
            ]
        );
    }

    #[test]
    fn test_parse_czech() {
        let clauses = parse("sudá č. od 28 výše, lichá č. 7 a výše, č. p. 700 výše", &CZECH).unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].series_type, SeriesType::Even);
        assert_eq!(clauses[1].items, vec![RangeItem::OpenFrom(7)]);
        assert_eq!(clauses[2].series_type, SeriesType::ConscriptionNumber);
    }

    #[test]
    fn test_parse_requires_leading_keyword() {
        assert_eq!(
            parse("123", &ENGLISH).unwrap_err(),
            RuleParseError::Expected {
                expected: "a series keyword",
                position: 0
            }
        );
    }

    #[test]
    fn test_parse_rejects_trailing_separator() {
        assert!(parse("no. 5,", &ENGLISH).is_err());
    }

    #[test]
    fn test_parse_from_needs_terminator() {
        assert!(parse("no. from 5", &ENGLISH).is_err());
        assert!(parse("no. from 5-7", &ENGLISH).is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("  ", &ENGLISH).unwrap_err(), RuleParseError::Empty);
    }
}
