//! Pattern matcher for progressive filter input.
//!
//! The matcher walks the token stream of the current input as far as the
//! grammar allows and reports which [`Shape`] the input has reached, along
//! with the captured field, operator, value and join segments.
//!
//! # Grammar
//!
//! ```text
//! expression ::= condition [ "#" join " " condition ] [ "##" ]
//! condition  ::= "#" field ( ":" value | " " "#" operator " " value [ "#to " value ] )
//! second     ::= [ "#" field " " ] "#" operator " " value [ "#to " value ]
//! join       ::= "and" | "or"            (case-insensitive)
//! field      ::= word                    (no whitespace, '#' or ':')
//! value      ::= any text up to the next '#'
//! ```
//!
//! Every prefix of a valid expression is accepted as well; segments the user
//! is still typing are reported as open. Because the walk always consumes
//! as much as it can, a more complete shape can never be shadowed by a
//! weaker one.

use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::vocabulary::Vocabulary;

/// The shapes the matcher recognizes, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `#field #op1 v1 #join #op2 v2##`
    ConfirmedPair,
    /// Two conditions, second value present, not confirmed.
    PendingPair,
    /// Two conditions, second operator chosen, no second value yet.
    SecondOperatorChosen,
    /// `#join #`: the second-operator selector is open.
    SecondOperatorSelector,
    /// `#join` typed in full, selector not reopened yet.
    JoinTyped,
    /// `#field #op1 v1 #`: the join selector is open.
    JoinSelector,
    /// `#field #op value`, possibly partial.
    Condition,
    /// `#field:value`.
    ColonShorthand,
}

impl Shape {
    /// Returns the priority rank of the shape (1 is tried first).
    pub fn priority(&self) -> u8 {
        match self {
            Shape::ConfirmedPair => 1,
            Shape::PendingPair => 2,
            Shape::SecondOperatorChosen => 3,
            Shape::SecondOperatorSelector => 4,
            Shape::JoinTyped => 5,
            Shape::JoinSelector => 6,
            Shape::Condition => 7,
            Shape::ColonShorthand => 8,
        }
    }
}

/// A captured piece of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The captured text (values are trimmed).
    pub text: &'a str,
    /// Byte offset of the segment in the input.
    pub start: usize,
    /// Whether the user has moved past this segment.
    pub closed: bool,
}

impl<'a> Segment<'a> {
    fn open(text: &'a str, start: usize) -> Self {
        Self {
            text,
            start,
            closed: false,
        }
    }

    fn closed(text: &'a str, start: usize) -> Self {
        Self {
            text,
            start,
            closed: true,
        }
    }
}

/// The captured groups of one condition. Missing groups are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionMatch<'a> {
    /// The field token. Always present for the first condition; for the
    /// second it is only present when the user named another column.
    pub field: Option<Segment<'a>>,
    /// The operator token. `None` for the colon shorthand.
    pub operator: Option<Segment<'a>>,
    /// Whether the condition was written as `#field:value`.
    pub shorthand: bool,
    /// The value text, present once the operator is closed.
    pub value: Option<Segment<'a>>,
    /// The `#to` marker of a range condition.
    pub range_marker: Option<Segment<'a>>,
    /// The upper bound of a range condition.
    pub upper: Option<Segment<'a>>,
}

impl<'a> ConditionMatch<'a> {
    /// Returns true if value text has been typed.
    pub fn has_value(&self) -> bool {
        self.value.is_some_and(|v| !v.text.is_empty())
    }

    /// Returns true if the operator (or the shorthand) is settled.
    pub fn operator_closed(&self) -> bool {
        self.shorthand || self.operator.is_some_and(|op| op.closed)
    }

    /// Returns true if the walk stopped on value text typed straight after
    /// a closed field, with no operator in between.
    pub(crate) fn value_after_field(&self, stall: Option<Stall<'_>>) -> bool {
        self.operator.is_none()
            && !self.shorthand
            && self.field.is_some_and(|field| field.closed)
            && stall.is_some_and(|stall| stall.kind == StallKind::Unexpected)
    }

    /// Returns the text of the selector currently open inside this
    /// condition, if any.
    fn search_term(&self, field_required: bool) -> Option<&'a str> {
        if self.shorthand {
            return None;
        }
        if field_required {
            match self.field {
                Some(field) if !field.closed => return Some(field.text),
                None => return Some(""),
                _ => {}
            }
        }
        match self.operator {
            None => Some(""),
            Some(op) if !op.closed => Some(op.text),
            Some(_) => None,
        }
    }
}

/// The result of matching an input against the known shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatch<'a> {
    /// The most complete shape the input reaches.
    pub shape: Shape,
    /// The first condition.
    pub first: ConditionMatch<'a>,
    /// The join token, present once a `#` follows the first value.
    pub join: Option<Segment<'a>>,
    /// The second condition, present once the join is closed.
    pub second: Option<ConditionMatch<'a>>,
    /// Whether the input ends with the confirmation marker.
    pub confirmed: bool,
    /// Whether a single residual `#` follows the second condition.
    pub trailing_hash: bool,
}

impl<'a> ShapeMatch<'a> {
    fn new() -> Self {
        Self {
            shape: Shape::Condition,
            first: ConditionMatch::default(),
            join: None,
            second: None,
            confirmed: false,
            trailing_hash: false,
        }
    }

    /// Returns the text after the last `#` while a selector is open.
    ///
    /// The caller uses it to narrow the candidate list of the open column,
    /// operator or join selector. `None` means no selector is open.
    pub fn search_term(&self) -> Option<&'a str> {
        if self.confirmed {
            return None;
        }
        if let Some(second) = &self.second {
            return second.search_term(false);
        }
        if let Some(join) = self.join {
            return (!join.closed).then_some(join.text);
        }
        self.first.search_term(true)
    }
}

/// Why the walk stopped before the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StallKind {
    /// A word after the first value is not a join.
    MalformedJoin,
    /// Text the grammar does not allow at this point.
    Unexpected,
}

/// The point at which the walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stall<'a> {
    pub kind: StallKind,
    pub found: &'a str,
    pub position: usize,
}

impl Stall<'_> {
    /// Converts the stall into the error reported to callers.
    pub(crate) fn into_error(self) -> ParseError {
        match self.kind {
            StallKind::MalformedJoin => ParseError::malformed_join(self.found),
            StallKind::Unexpected => ParseError::unexpected(self.found, self.position),
        }
    }
}

/// Everything the walk captured, including where it stalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Scan<'a> {
    pub matched: ShapeMatch<'a>,
    pub stall: Option<Stall<'a>>,
}

/// Matches raw search-bar input against the filter grammar.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> PatternMatcher<'v> {
    /// Creates a matcher for the given vocabulary.
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Matches the input against the known shapes.
    ///
    /// Returns `None` for empty input, input that does not start with the
    /// field marker (plain text search), and input the grammar rejects.
    pub fn match_input<'a>(&self, input: &'a str) -> Option<ShapeMatch<'a>> {
        let scan = self.scan(input)?;
        match scan.stall {
            None => Some(scan.matched),
            Some(_) => None,
        }
    }

    /// Walks the input as far as the grammar allows.
    ///
    /// Returns `None` when the input is not a filter expression at all.
    pub(crate) fn scan<'a>(&self, input: &'a str) -> Option<Scan<'a>> {
        let tokens = Lexer::new(input, self.vocabulary.markers()).tokenize();
        let first = tokens.first()?;
        if !matches!(first.kind, TokenKind::Hash | TokenKind::Confirm) {
            return None;
        }

        let mut walk = Walk {
            vocabulary: self.vocabulary,
            input,
            tokens,
            position: 0,
            matched: ShapeMatch::new(),
        };
        let stall = walk.run().err();
        let mut matched = walk.matched;
        matched.shape = shape_of(&matched, self.vocabulary);
        Some(Scan { matched, stall })
    }
}

/// Derives the shape from how far the walk got.
fn shape_of(m: &ShapeMatch<'_>, vocabulary: &Vocabulary) -> Shape {
    if let Some(second) = &m.second {
        if m.confirmed && second.has_value() {
            Shape::ConfirmedPair
        } else if second.has_value() {
            Shape::PendingPair
        } else if second.operator_closed() {
            Shape::SecondOperatorChosen
        } else {
            Shape::SecondOperatorSelector
        }
    } else if let Some(join) = m.join {
        if vocabulary.join(join.text).is_some() {
            Shape::JoinTyped
        } else {
            Shape::JoinSelector
        }
    } else if m.first.shorthand {
        Shape::ColonShorthand
    } else {
        Shape::Condition
    }
}

/// What follows a complete value.
enum AfterValue {
    End,
    Confirm,
    Hash,
}

/// Which condition a walk step fills in.
#[derive(Clone, Copy)]
enum Slot {
    First,
    Second,
}

/// A single left-to-right walk over the token stream.
struct Walk<'v, 'a> {
    vocabulary: &'v Vocabulary,
    input: &'a str,
    tokens: Vec<Token<'a>>,
    position: usize,
    matched: ShapeMatch<'a>,
}

type Step<'a, T> = Result<T, Stall<'a>>;

impl<'v, 'a> Walk<'v, 'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.position).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Byte offset of the next token, or the input length at the end.
    fn offset(&self) -> usize {
        self.peek().map_or(self.input.len(), |t| t.start)
    }

    fn skip_space(&mut self) {
        while self.peek_kind() == Some(TokenKind::Space) {
            self.advance();
        }
    }

    fn take_word(&mut self) -> Option<Token<'a>> {
        if self.peek_kind() == Some(TokenKind::Word) {
            self.advance()
        } else {
            None
        }
    }

    fn condition(&mut self, slot: Slot) -> &mut ConditionMatch<'a> {
        match slot {
            Slot::First => &mut self.matched.first,
            Slot::Second => self.matched.second.get_or_insert_with(ConditionMatch::default),
        }
    }

    fn unexpected(&self) -> Stall<'a> {
        let position = self.offset();
        Stall {
            kind: StallKind::Unexpected,
            found: self.input[position..].trim_end(),
            position,
        }
    }

    fn condition_ref(&self, slot: Slot) -> Option<&ConditionMatch<'a>> {
        match slot {
            Slot::First => Some(&self.matched.first),
            Slot::Second => self.matched.second.as_ref(),
        }
    }

    /// Returns true while a range condition still waits for its upper bound.
    fn awaits_upper(&self, slot: Slot) -> bool {
        self.condition_ref(slot).is_some_and(|c| {
            c.upper.is_none()
                && c.operator
                    .and_then(|op| self.vocabulary.operator(op.text))
                    .is_some_and(|spec| spec.operator.is_range())
        })
    }

    /// Reads value text up to the next hash marker.
    fn read_value(&mut self) -> Segment<'a> {
        let start = self.offset();
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Word | TokenKind::Space | TokenKind::Colon)
        ) {
            self.advance();
        }
        let end = self.offset();
        let raw = &self.input[start..end];
        let text = raw.trim();
        let leading = raw.len() - raw.trim_start().len();
        Segment {
            text,
            start: start + leading,
            closed: self.peek().is_some(),
        }
    }

    fn run(&mut self) -> Step<'a, ()> {
        if self.peek_kind() == Some(TokenKind::Confirm) {
            self.advance();
            self.matched.first.field = Some(Segment::closed("", 0));
            return self.confirm();
        }

        // Leading '#'
        self.advance();
        let field = self.take_word();
        let (text, start) = field.map_or(("", self.offset()), |t| (t.text, t.start));
        self.matched.first.field = Some(Segment {
            text,
            start,
            closed: self.peek().is_some(),
        });

        match self.peek_kind() {
            None => return Ok(()),
            Some(TokenKind::Colon) => {
                self.advance();
                self.matched.first.shorthand = true;
                let value = self.read_value();
                self.matched.first.value = Some(value);
            }
            Some(TokenKind::Space) => {
                self.skip_space();
                match self.peek_kind() {
                    None => return Ok(()),
                    Some(TokenKind::Hash) => self.operator_slot(Slot::First, false)?,
                    Some(TokenKind::Confirm) => return self.confirm(),
                    _ => return Err(self.unexpected()),
                }
            }
            Some(TokenKind::Confirm) => return self.confirm(),
            _ => return Err(self.unexpected()),
        }

        if self.matched.first.value.is_none() {
            return self.finish_incomplete();
        }

        match self.after_value(Slot::First)? {
            AfterValue::End => Ok(()),
            AfterValue::Confirm => self.confirm(),
            AfterValue::Hash => self.join(),
        }
    }

    /// Parses `#operator` (or `#field ` when `allow_field` is set) with the
    /// cursor on the hash.
    fn operator_slot(&mut self, slot: Slot, allow_field: bool) -> Step<'a, ()> {
        // '#'
        self.advance();
        let word = self.take_word();
        let (text, start) = word.map_or(("", self.offset()), |t| (t.text, t.start));
        let names_column =
            allow_field && !text.is_empty() && self.vocabulary.operator(text).is_none();

        match self.peek_kind() {
            None => {
                self.condition(slot).operator = Some(Segment::open(text, start));
                Ok(())
            }
            Some(TokenKind::Space) if names_column => {
                self.condition(slot).field = Some(Segment::closed(text, start));
                self.skip_space();
                match self.peek_kind() {
                    Some(TokenKind::Hash) => self.operator_slot(slot, false),
                    None | Some(TokenKind::Confirm) => Ok(()),
                    _ => Err(self.unexpected()),
                }
            }
            Some(TokenKind::Colon) if names_column => {
                self.advance();
                let value = self.read_value();
                let condition = self.condition(slot);
                condition.field = Some(Segment::closed(text, start));
                condition.shorthand = true;
                condition.value = Some(value);
                Ok(())
            }
            Some(TokenKind::Space) | Some(TokenKind::Hash) | Some(TokenKind::Confirm) => {
                self.skip_space();
                let value = self.read_value();
                let condition = self.condition(slot);
                condition.operator = Some(Segment::closed(text, start));
                condition.value = Some(value);
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Handles what follows a value: the end, the confirmation marker, a
    /// range marker, or a hash opening the next part.
    fn after_value(&mut self, slot: Slot) -> Step<'a, AfterValue> {
        match self.peek_kind() {
            None => Ok(AfterValue::End),
            Some(TokenKind::Confirm) => Ok(AfterValue::Confirm),
            Some(TokenKind::Hash) if self.awaits_upper(slot) => self.range_bound(slot),
            Some(TokenKind::Hash) => {
                self.advance();
                Ok(AfterValue::Hash)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parses `#to value` with the cursor on the hash.
    fn range_bound(&mut self, slot: Slot) -> Step<'a, AfterValue> {
        let hash = self.position;
        self.advance();
        let word = self.take_word();
        let (text, start) = word.map_or(("", self.offset()), |t| (t.text, t.start));

        match self.peek_kind() {
            None if self.vocabulary.is_range_prefix(text) => {
                self.condition(slot).range_marker = Some(Segment::open(text, start));
                Ok(AfterValue::End)
            }
            Some(TokenKind::Space | TokenKind::Hash | TokenKind::Confirm)
                if self.vocabulary.is_range_marker(text) =>
            {
                self.skip_space();
                let upper = self.read_value();
                let condition = self.condition(slot);
                condition.range_marker = Some(Segment::closed(text, start));
                condition.upper = Some(upper);
                self.after_value(slot)
            }
            _ => {
                self.position = hash;
                Err(self.unexpected())
            }
        }
    }

    /// Parses the join word after the hash that followed the first value.
    fn join(&mut self) -> Step<'a, ()> {
        let word = self.take_word();
        let (text, start) = word.map_or(("", self.offset()), |t| (t.text, t.start));
        let is_join = self.vocabulary.join(text).is_some();
        self.matched.join = Some(Segment {
            text,
            start,
            closed: self.peek().is_some(),
        });

        match self.peek_kind() {
            None if is_join || self.vocabulary.is_join_prefix(text) => Ok(()),
            Some(TokenKind::Space | TokenKind::Confirm) if is_join => {
                self.skip_space();
                self.second()
            }
            _ if !text.is_empty() && !is_join => Err(self.malformed_join(text, start)),
            _ => Err(self.unexpected()),
        }
    }

    fn malformed_join(&self, text: &'a str, start: usize) -> Stall<'a> {
        Stall {
            kind: StallKind::MalformedJoin,
            found: text,
            position: start,
        }
    }

    /// Parses the second condition after the join.
    fn second(&mut self) -> Step<'a, ()> {
        self.matched.second = Some(ConditionMatch::default());

        match self.peek_kind() {
            None => return Ok(()),
            Some(TokenKind::Hash) => self.operator_slot(Slot::Second, true)?,
            Some(TokenKind::Confirm) => return self.confirm(),
            _ => return Err(self.unexpected()),
        }

        let has_value = self
            .matched
            .second
            .as_ref()
            .is_some_and(|c| c.value.is_some());
        if !has_value {
            return self.finish_incomplete();
        }

        match self.after_value(Slot::Second)? {
            AfterValue::End => Ok(()),
            AfterValue::Confirm => self.confirm(),
            AfterValue::Hash => {
                if self.peek().is_none() {
                    self.matched.trailing_hash = true;
                    Ok(())
                } else {
                    Err(self.unexpected())
                }
            }
        }
    }

    /// Handles the input after a condition that stopped before its value.
    fn finish_incomplete(&mut self) -> Step<'a, ()> {
        match self.peek_kind() {
            None => Ok(()),
            Some(TokenKind::Confirm) => self.confirm(),
            _ => Err(self.unexpected()),
        }
    }

    /// Consumes the confirmation marker, which must end the input.
    fn confirm(&mut self) -> Step<'a, ()> {
        if self.peek_kind() == Some(TokenKind::Confirm) {
            self.advance();
        }
        self.matched.confirmed = true;
        if self.peek().is_some() {
            Err(self.unexpected())
        } else {
            Ok(())
        }
    }
}
