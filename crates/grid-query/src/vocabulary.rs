//! Marker and operator vocabulary of the filter language.
//!
//! Everything the grammar treats as a literal lives here: the marker
//! characters, the join words, the range marker and the operator
//! token/label table. A [`Vocabulary`] is passed to the matcher explicitly,
//! so callers can register extra operator tokens without touching the
//! parser.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column::ColumnType;

/// The comparison an operator token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Case-insensitive substring match (text columns).
    Contains,
    /// Equality (all column types).
    Equals,
    /// Strictly greater than (number and date columns).
    GreaterThan,
    /// Strictly less than (number and date columns).
    LessThan,
    /// Inclusive range between two bounds (number and date columns).
    InRange,
}

impl Operator {
    /// All operators, in the order selectors list them.
    pub const ALL: [Operator; 5] = [
        Operator::Contains,
        Operator::Equals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::InRange,
    ];

    /// Returns the canonical token typed after `#`.
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Contains => "contains",
            Operator::Equals => "equals",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::InRange => "inRange",
        }
    }

    /// Returns the label shown by the operator selector.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Contains => "Contains",
            Operator::Equals => "Equals",
            Operator::GreaterThan => "Greater Than",
            Operator::LessThan => "Less Than",
            Operator::InRange => "In Range",
        }
    }

    /// Returns true if the operator can be used on a column of this type.
    pub fn applies_to(&self, column_type: ColumnType) -> bool {
        match column_type {
            ColumnType::Text => matches!(self, Operator::Contains | Operator::Equals),
            ColumnType::Number | ColumnType::Date => !matches!(self, Operator::Contains),
        }
    }

    /// Returns true if the operator takes two bounds (`value #to value2`).
    pub fn is_range(&self) -> bool {
        matches!(self, Operator::InRange)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The word joining two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Join {
    /// Both conditions must hold.
    And,
    /// Either condition must hold.
    Or,
}

impl Join {
    /// Returns the lowercase join word.
    pub fn as_str(&self) -> &'static str {
        match self {
            Join::And => "and",
            Join::Or => "or",
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal markers of the surface syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Introduces field, operator, join and range tokens.
    pub hash: char,
    /// Trailing marker that confirms an expression.
    pub confirm: String,
    /// Separates field and value in the `#field:value` shorthand.
    pub shorthand: char,
    /// Word introducing the upper bound of a range (`#to`).
    pub range: String,
    /// Join word for [`Join::And`].
    pub and: String,
    /// Join word for [`Join::Or`].
    pub or: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            hash: '#',
            confirm: "##".to_string(),
            shorthand: ':',
            range: "to".to_string(),
            and: "and".to_string(),
            or: "or".to_string(),
        }
    }
}

/// An operator token accepted by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSpec {
    /// Token typed after `#`, matched verbatim.
    pub token: String,
    /// Label shown by the operator selector.
    pub label: String,
    /// The comparison the token stands for.
    pub operator: Operator,
}

impl OperatorSpec {
    /// Creates the canonical spec for an operator.
    pub fn canonical(operator: Operator) -> Self {
        Self {
            token: operator.token().to_string(),
            label: operator.label().to_string(),
            operator,
        }
    }
}

/// The complete literal vocabulary of the filter language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    markers: Markers,
    operators: Vec<OperatorSpec>,
    shorthand_operator: Operator,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            operators: Operator::ALL
                .iter()
                .copied()
                .map(OperatorSpec::canonical)
                .collect(),
            shorthand_operator: Operator::Contains,
        }
    }
}

impl Vocabulary {
    /// Creates a vocabulary from explicit markers and operator specs.
    pub fn new(markers: Markers, operators: Vec<OperatorSpec>) -> Self {
        Self {
            markers,
            operators,
            shorthand_operator: Operator::Contains,
        }
    }

    /// Registers an operator token, replacing any spec with the same token.
    pub fn with_operator(mut self, spec: OperatorSpec) -> Self {
        self.operators.retain(|existing| existing.token != spec.token);
        self.operators.push(spec);
        self
    }

    /// Returns the marker table.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Returns every registered operator spec.
    pub fn operators(&self) -> &[OperatorSpec] {
        &self.operators
    }

    /// Returns the operator implied by the `#field:value` shorthand.
    pub fn shorthand_operator(&self) -> Operator {
        self.shorthand_operator
    }

    /// Looks up an operator token (case-sensitive).
    pub fn operator(&self, token: &str) -> Option<&OperatorSpec> {
        self.operators.iter().find(|spec| spec.token == token)
    }

    /// Returns the operator specs usable on a column type.
    pub fn operators_for(&self, column_type: ColumnType) -> impl Iterator<Item = &OperatorSpec> {
        self.operators
            .iter()
            .filter(move |spec| spec.operator.applies_to(column_type))
    }

    /// Returns the token used when writing an operator back out.
    ///
    /// Prefers the canonical token when it is registered.
    pub fn token_for(&self, operator: Operator) -> &str {
        self.operators
            .iter()
            .find(|spec| spec.operator == operator && spec.token == operator.token())
            .or_else(|| self.operators.iter().find(|spec| spec.operator == operator))
            .map(|spec| spec.token.as_str())
            .unwrap_or_else(|| operator.token())
    }

    /// Resolves a join word (case-insensitive).
    pub fn join(&self, word: &str) -> Option<Join> {
        if word.eq_ignore_ascii_case(&self.markers.and) {
            Some(Join::And)
        } else if word.eq_ignore_ascii_case(&self.markers.or) {
            Some(Join::Or)
        } else {
            None
        }
    }

    /// Returns the word written for a join.
    pub fn join_word(&self, join: Join) -> &str {
        match join {
            Join::And => &self.markers.and,
            Join::Or => &self.markers.or,
        }
    }

    /// Returns true if `word` could still grow into a join word.
    pub fn is_join_prefix(&self, word: &str) -> bool {
        starts_with_ignore_case(&self.markers.and, word)
            || starts_with_ignore_case(&self.markers.or, word)
    }

    /// Returns true if `word` is the range marker (case-insensitive).
    pub fn is_range_marker(&self, word: &str) -> bool {
        word.eq_ignore_ascii_case(&self.markers.range)
    }

    /// Returns true if `word` could still grow into the range marker.
    pub fn is_range_prefix(&self, word: &str) -> bool {
        starts_with_ignore_case(&self.markers.range, word)
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operators_cover_all() {
        let vocab = Vocabulary::default();
        for operator in Operator::ALL {
            let spec = vocab.operator(operator.token()).unwrap();
            assert_eq!(spec.operator, operator);
            assert_eq!(spec.label, operator.label());
        }
    }

    #[test]
    fn test_operator_lookup_is_case_sensitive() {
        let vocab = Vocabulary::default();
        assert!(vocab.operator("greaterThan").is_some());
        assert!(vocab.operator("greaterthan").is_none());
        assert!(vocab.operator("GreaterThan").is_none());
    }

    #[test]
    fn test_operators_for_text() {
        let vocab = Vocabulary::default();
        let tokens: Vec<&str> = vocab
            .operators_for(ColumnType::Text)
            .map(|spec| spec.token.as_str())
            .collect();
        assert_eq!(tokens, vec!["contains", "equals"]);
    }

    #[test]
    fn test_operators_for_number_and_date() {
        let vocab = Vocabulary::default();
        for column_type in [ColumnType::Number, ColumnType::Date] {
            let tokens: Vec<&str> = vocab
                .operators_for(column_type)
                .map(|spec| spec.token.as_str())
                .collect();
            assert_eq!(tokens, vec!["equals", "greaterThan", "lessThan", "inRange"]);
        }
    }

    #[test]
    fn test_join_case_insensitive() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.join("and"), Some(Join::And));
        assert_eq!(vocab.join("AND"), Some(Join::And));
        assert_eq!(vocab.join("Or"), Some(Join::Or));
        assert_eq!(vocab.join("xor"), None);
    }

    #[test]
    fn test_join_prefix() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_join_prefix(""));
        assert!(vocab.is_join_prefix("a"));
        assert!(vocab.is_join_prefix("AN"));
        assert!(vocab.is_join_prefix("o"));
        assert!(!vocab.is_join_prefix("x"));
        assert!(!vocab.is_join_prefix("andd"));
    }

    #[test]
    fn test_range_marker() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_range_marker("to"));
        assert!(vocab.is_range_marker("TO"));
        assert!(vocab.is_range_prefix("t"));
        assert!(!vocab.is_range_prefix("x"));
    }

    #[test]
    fn test_with_operator_alias() {
        let vocab = Vocabulary::default().with_operator(OperatorSpec {
            token: "gt".to_string(),
            label: "Greater Than".to_string(),
            operator: Operator::GreaterThan,
        });
        assert_eq!(vocab.operator("gt").unwrap().operator, Operator::GreaterThan);
        // The canonical token still wins when writing expressions back out
        assert_eq!(vocab.token_for(Operator::GreaterThan), "greaterThan");
    }

    #[test]
    fn test_with_operator_replaces_same_token() {
        let vocab = Vocabulary::default().with_operator(OperatorSpec {
            token: "equals".to_string(),
            label: "Is".to_string(),
            operator: Operator::Equals,
        });
        let specs: Vec<_> = vocab
            .operators()
            .iter()
            .filter(|spec| spec.token == "equals")
            .collect();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].label, "Is");
    }

    #[test]
    fn test_applies_to() {
        assert!(Operator::Contains.applies_to(ColumnType::Text));
        assert!(!Operator::Contains.applies_to(ColumnType::Number));
        assert!(!Operator::GreaterThan.applies_to(ColumnType::Text));
        assert!(Operator::InRange.applies_to(ColumnType::Date));
        assert!(Operator::Equals.applies_to(ColumnType::Text));
    }
}
