use std::str::FromStr;

use vigil_core::{AppError, AppResult};

use crate::AnonymizationField;

/// Matching rule for the `field` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPattern {
    /// Field name must be equal to the value.
    Exact(String),
    /// Field name must match the value where `*` matches any run of characters.
    Wildcard(String),
}

impl FieldPattern {
    /// Returns whether the field name satisfies the pattern.
    #[must_use]
    pub fn matches(&self, field: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == field,
            Self::Wildcard(pattern) => wildcard_matches(pattern.as_bytes(), field.as_bytes()),
        }
    }
}

/// One `key:value` condition of a filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// Record identifier equality.
    Id(String),
    /// Field name match.
    Field(FieldPattern),
    /// `allowed` flag equality.
    Allowed(bool),
    /// `anonymized` flag equality.
    Anonymized(bool),
}

impl FilterClause {
    fn matches(&self, record: &AnonymizationField) -> bool {
        match self {
            Self::Id(id) => record.id().as_str() == id,
            Self::Field(pattern) => pattern.matches(record.field().as_str()),
            Self::Allowed(expected) => record.allowed() == *expected,
            Self::Anonymized(expected) => record.anonymized() == *expected,
        }
    }
}

/// Parsed selector over anonymization fields.
///
/// The query language is a conjunction of `key:value` clauses joined with
/// `and`, for example `field:user.* and anonymized:true`. Values may be
/// double-quoted; quoted `field` values are matched literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizationFieldFilter {
    clauses: Vec<FilterClause>,
}

impl AnonymizationFieldFilter {
    /// Parses a filter query.
    pub fn parse(query: &str) -> AppResult<Self> {
        let tokens = tokenize(query)?;
        if tokens.is_empty() {
            return Err(AppError::Validation(
                "filter query must not be empty".to_owned(),
            ));
        }

        let mut clauses = Vec::new();
        let mut tokens = tokens.into_iter().peekable();

        loop {
            let key = match tokens.next() {
                Some(Token::Word(key)) => key,
                Some(other) => {
                    return Err(AppError::Validation(format!(
                        "filter query expected a key but found {}",
                        other.describe()
                    )));
                }
                None => {
                    return Err(AppError::Validation(
                        "filter query ends after 'and'".to_owned(),
                    ));
                }
            };

            if tokens.next() != Some(Token::Colon) {
                return Err(AppError::Validation(format!(
                    "filter query expected ':' after key '{key}'"
                )));
            }

            let value = match tokens.next() {
                Some(Token::Word(value)) => ClauseValue::Bare(value),
                Some(Token::Quoted(value)) => ClauseValue::Quoted(value),
                Some(Token::Colon) | None => {
                    return Err(AppError::Validation(format!(
                        "filter query is missing a value for key '{key}'"
                    )));
                }
            };

            clauses.push(build_clause(key.as_str(), value)?);

            match tokens.next() {
                None => break,
                Some(Token::Word(word)) if word.eq_ignore_ascii_case("and") => {
                    if tokens.peek().is_none() {
                        return Err(AppError::Validation(
                            "filter query ends after 'and'".to_owned(),
                        ));
                    }
                }
                Some(other) => {
                    return Err(AppError::Validation(format!(
                        "filter query expected 'and' but found {}",
                        other.describe()
                    )));
                }
            }
        }

        Ok(Self { clauses })
    }

    /// Returns the parsed clauses in query order.
    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Returns whether a record satisfies every clause.
    #[must_use]
    pub fn matches(&self, record: &AnonymizationField) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

impl FromStr for AnonymizationFieldFilter {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Colon,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Word(word) => format!("'{word}'"),
            Self::Quoted(value) => format!("\"{value}\""),
            Self::Colon => "':'".to_owned(),
        }
    }
}

enum ClauseValue {
    Bare(String),
    Quoted(String),
}

impl ClauseValue {
    fn text(&self) -> &str {
        match self {
            Self::Bare(value) | Self::Quoted(value) => value.as_str(),
        }
    }
}

fn tokenize(query: &str) -> AppResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut characters = query.chars().peekable();

    while let Some(&character) = characters.peek() {
        if character.is_whitespace() {
            characters.next();
            continue;
        }

        if character == ':' {
            characters.next();
            tokens.push(Token::Colon);
            continue;
        }

        if character == '"' {
            characters.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some(next) = characters.next() {
                match next {
                    '\\' => match characters.next() {
                        Some(escaped) => value.push(escaped),
                        None => break,
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => value.push(other),
                }
            }

            if !closed {
                return Err(AppError::Validation(
                    "filter query has an unterminated quoted value".to_owned(),
                ));
            }

            tokens.push(Token::Quoted(value));
            continue;
        }

        let mut word = String::new();
        while let Some(&next) = characters.peek() {
            if next.is_whitespace() || next == ':' || next == '"' {
                break;
            }
            word.push(next);
            characters.next();
        }
        tokens.push(Token::Word(word));
    }

    Ok(tokens)
}

fn build_clause(key: &str, value: ClauseValue) -> AppResult<FilterClause> {
    match key {
        "id" => Ok(FilterClause::Id(value.text().to_owned())),
        "field" => Ok(FilterClause::Field(match value {
            ClauseValue::Bare(text) if text.contains('*') => FieldPattern::Wildcard(text),
            ClauseValue::Bare(text) | ClauseValue::Quoted(text) => FieldPattern::Exact(text),
        })),
        "allowed" => parse_flag(key, value.text()).map(FilterClause::Allowed),
        "anonymized" => parse_flag(key, value.text()).map(FilterClause::Anonymized),
        other => Err(AppError::Validation(format!(
            "filter query key '{other}' is not supported; expected one of id, field, allowed, anonymized"
        ))),
    }
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AppError::Validation(format!(
            "filter query key '{key}' expects true or false, got '{other}'"
        ))),
    }
}

fn wildcard_matches(pattern: &[u8], text: &[u8]) -> bool {
    let (mut pattern_index, mut text_index) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while text_index < text.len() {
        if pattern_index < pattern.len() && pattern[pattern_index] == b'*' {
            backtrack = Some((pattern_index, text_index));
            pattern_index += 1;
        } else if pattern_index < pattern.len() && pattern[pattern_index] == text[text_index] {
            pattern_index += 1;
            text_index += 1;
        } else if let Some((star_index, star_text_index)) = backtrack {
            pattern_index = star_index + 1;
            text_index = star_text_index + 1;
            backtrack = Some((star_index, star_text_index + 1));
        } else {
            return false;
        }
    }

    pattern[pattern_index..].iter().all(|byte| *byte == b'*')
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;
    use vigil_core::Namespace;

    use super::{AnonymizationFieldFilter, FieldPattern, FilterClause};
    use crate::{AnonymizationField, NewAnonymizationField};

    fn record(field: &str, allowed: bool, anonymized: bool) -> AnonymizationField {
        match AnonymizationField::create(
            NewAnonymizationField {
                field: field.to_owned(),
                allowed: Some(allowed),
                anonymized: Some(anonymized),
            },
            Namespace::default(),
            "tester",
            Utc::now(),
        ) {
            Ok(record) => record,
            Err(error) => panic!("record should be valid: {error}"),
        }
    }

    #[test]
    fn parses_conjunction_of_clauses() {
        let filter = AnonymizationFieldFilter::parse("field:user.* AND anonymized:true");
        let Ok(filter) = filter else {
            panic!("query should parse");
        };

        assert_eq!(
            filter.clauses(),
            &[
                FilterClause::Field(FieldPattern::Wildcard("user.*".to_owned())),
                FilterClause::Anonymized(true),
            ]
        );
        assert!(filter.matches(&record("user.name", false, true)));
        assert!(!filter.matches(&record("user.name", false, false)));
        assert!(!filter.matches(&record("host.name", false, true)));
    }

    #[test]
    fn quoted_field_values_match_literally() {
        let Ok(filter) = AnonymizationFieldFilter::parse(r#"field: "user.*""#) else {
            panic!("query should parse");
        };

        assert!(!filter.matches(&record("user.name", true, false)));
        assert!(filter.matches(&record("user.*", true, false)));
    }

    #[test]
    fn id_clause_selects_single_record() {
        let target = record("source.ip", true, true);
        let query = format!("id:{}", target.id());
        let Ok(filter) = AnonymizationFieldFilter::parse(query.as_str()) else {
            panic!("query should parse");
        };

        assert!(filter.matches(&target));
        assert!(!filter.matches(&record("source.ip", true, true)));
    }

    #[test]
    fn rejects_malformed_queries() {
        for query in [
            "",
            "   ",
            "field",
            "field:",
            "field:a or allowed:true",
            "field:a and",
            "owner:alice",
            "allowed:yes",
            "field:\"unterminated",
            ":value",
        ] {
            assert!(
                AnonymizationFieldFilter::parse(query).is_err(),
                "query '{query}' should be rejected"
            );
        }
    }

    #[test]
    fn wildcard_handles_leading_and_repeated_stars() {
        let pattern = FieldPattern::Wildcard("*.name".to_owned());
        assert!(pattern.matches("user.name"));
        assert!(pattern.matches(".name"));
        assert!(!pattern.matches("user.names"));

        let pattern = FieldPattern::Wildcard("u**r.*e".to_owned());
        assert!(pattern.matches("user.name"));
        assert!(!pattern.matches("host.name"));
    }

    proptest! {
        #[test]
        fn parser_never_panics_under_random_inputs(query in ".*") {
            let _ = AnonymizationFieldFilter::parse(query.as_str());
        }

        #[test]
        fn exact_field_clause_matches_its_own_name(name in "[a-z][a-z0-9_.]{0,24}") {
            let query = format!("field:\"{name}\"");
            let parsed = AnonymizationFieldFilter::parse(query.as_str());
            prop_assert!(parsed.is_ok());
            if let Ok(filter) = parsed {
                prop_assert!(filter.matches(&record(name.as_str(), false, false)));
            }
        }
    }
}
