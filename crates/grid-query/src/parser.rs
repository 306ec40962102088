//! Entry points for classifying and building filter expressions.

use crate::ast::CompositeFilter;
use crate::builder;
use crate::classifier;
use crate::column::Column;
use crate::error::FilterResult;
use crate::matcher::{PatternMatcher, ShapeMatch};
use crate::state::ParseState;
use crate::vocabulary::Vocabulary;

/// Parser for the search-bar filter language.
///
/// Owns the column schema and the vocabulary so callers can classify every
/// keystroke and build on confirmation without passing them around.
///
/// # Example
///
/// ```
/// use grid_query_rs::{Column, FilterParser, ParseState};
///
/// let parser = FilterParser::new(vec![
///     Column::text("name", "Name"),
///     Column::number("base_price", "Base Price"),
/// ]);
///
/// // While typing
/// let state = parser.classify("#base_price #g");
/// assert_eq!(state.search_term(), Some("g"));
///
/// // On confirmation
/// let filter = parser.build("#base_price #greaterThan 50000##").unwrap();
/// assert_eq!(filter.conditions().len(), 1);
///
/// // Plain text is not an expression
/// assert_eq!(parser.classify("paracetamol"), ParseState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct FilterParser {
    columns: Vec<Column>,
    vocabulary: Vocabulary,
}

impl FilterParser {
    /// Creates a parser over the given columns with the default vocabulary.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            vocabulary: Vocabulary::default(),
        }
    }

    /// Replaces the vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Returns the column schema.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Matches the input against the known shapes without resolving any
    /// names.
    pub fn match_input<'a>(&self, input: &'a str) -> Option<ShapeMatch<'a>> {
        PatternMatcher::new(&self.vocabulary).match_input(input)
    }

    /// Returns the interaction state for the current input.
    pub fn classify(&self, input: &str) -> ParseState {
        classifier::classify(input, &self.columns, &self.vocabulary)
    }

    /// Builds a filter from a confirmed or ready-to-confirm input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](crate::ParseError) naming the first part of
    /// the input that does not resolve. Callers fall back to
    /// [`TextSearch`](crate::TextSearch) in that case.
    pub fn build(&self, input: &str) -> FilterResult<CompositeFilter> {
        builder::build(input, &self.columns, &self.vocabulary)
    }
}

/// Classifies the input against `columns` using the default vocabulary.
pub fn classify(input: &str, columns: &[Column]) -> ParseState {
    classifier::classify(input, columns, &Vocabulary::default())
}

/// Builds a filter against `columns` using the default vocabulary.
pub fn build(input: &str, columns: &[Column]) -> FilterResult<CompositeFilter> {
    builder::build(input, columns, &Vocabulary::default())
}
