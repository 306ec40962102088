//! Maps the current input to the interaction state the caller should show.

use tracing::trace;

use crate::ast::{CompositeFilter, FilterCondition};
use crate::column::Column;
use crate::error::{FilterResult, ParseError};
use crate::matcher::{ConditionMatch, PatternMatcher, Scan, Segment, Stall};
use crate::resolve::Resolver;
use crate::state::{ConditionDraft, ParseState};
use crate::vocabulary::Vocabulary;

/// How far the user got inside one condition.
enum Progress<'c> {
    Column(String),
    Operator { field: String, search_term: String },
    Value { column: &'c Column, draft: ConditionDraft },
}

/// Classifies the input into a [`ParseState`].
///
/// Never fails: input that cannot become a valid expression is reported as
/// [`ParseState::Invalid`] naming the first boundary that failed.
pub(crate) fn classify(input: &str, columns: &[Column], vocabulary: &Vocabulary) -> ParseState {
    let Some(scan) = PatternMatcher::new(vocabulary).scan(input) else {
        return ParseState::Idle;
    };
    let resolver = Resolver::new(columns, vocabulary);
    let state = classify_scan(&scan, &resolver).unwrap_or_else(ParseState::Invalid);
    trace!(input, state = state.name(), "classified input");
    state
}

fn classify_scan(scan: &Scan<'_>, resolver: &Resolver<'_>) -> FilterResult<ParseState> {
    let m = &scan.matched;

    let (column, draft) = match progress(resolver, &m.first, None, scan.stall)? {
        Progress::Column(search_term) => {
            return settle(scan, ParseState::SelectingColumn { search_term }, "a column");
        }
        Progress::Operator { field, search_term } => {
            return settle(
                scan,
                ParseState::SelectingOperator { field, search_term },
                "an operator",
            );
        }
        Progress::Value { column, draft } => (column, draft),
    };

    let Some(join) = m.join else {
        if let Some(stall) = scan.stall {
            return Err(stall.into_error());
        }
        if m.confirmed {
            let condition = finish(resolver, column, &draft)?;
            return Ok(ParseState::Complete(CompositeFilter::single(condition)));
        }
        let ready = finish(resolver, column, &draft).is_ok();
        return Ok(ParseState::AwaitingValue { draft, ready });
    };

    let first = finish(resolver, column, &draft)?;
    if !join.closed {
        let search_term = join.text.to_string();
        return settle(scan, ParseState::SelectingJoin { first, search_term }, "a join");
    }
    let join = resolver.join(join.text)?;

    let second = m.second.clone().unwrap_or_default();
    let progressed = progress(resolver, &second, Some(column), scan.stall)?;
    let (second_column, second_draft) = match progressed {
        Progress::Column(search_term) => {
            let field = column.field.clone();
            return settle(
                scan,
                ParseState::SelectingSecondOperator {
                    first,
                    join,
                    field,
                    search_term,
                },
                "a second condition",
            );
        }
        Progress::Operator { field, search_term } => {
            let expected = if second.field.is_none() && second.operator.is_none() {
                "a second condition"
            } else {
                "an operator"
            };
            return settle(
                scan,
                ParseState::SelectingSecondOperator {
                    first,
                    join,
                    field,
                    search_term,
                },
                expected,
            );
        }
        Progress::Value { column, draft } => (column, draft),
    };

    if let Some(stall) = scan.stall {
        return Err(stall.into_error());
    }
    if m.confirmed {
        let second = finish(resolver, second_column, &second_draft)?;
        return Ok(ParseState::Complete(CompositeFilter::pair(first, join, second)));
    }
    let ready = finish(resolver, second_column, &second_draft).is_ok();
    Ok(ParseState::AwaitingSecondValue {
        first,
        join,
        second: second_draft,
        ready,
    })
}

/// Resolves the closed parts of a condition and reports where it stops.
fn progress<'c>(
    resolver: &Resolver<'c>,
    condition: &ConditionMatch<'_>,
    inherited: Option<&'c Column>,
    stall: Option<Stall<'_>>,
) -> FilterResult<Progress<'c>> {
    let column = match (condition.field, inherited) {
        (Some(field), _) if !field.closed => return Ok(Progress::Column(field.text.to_string())),
        (Some(field), _) if field.text.is_empty() => {
            return Err(ParseError::incomplete("a column"));
        }
        (Some(field), _) => resolver.condition_column(
            field.text,
            inherited,
            condition.value_after_field(stall),
        )?,
        (None, Some(column)) => column,
        (None, None) => return Ok(Progress::Column(String::new())),
    };

    let operator = if condition.shorthand {
        resolver.shorthand(column)?
    } else {
        match condition.operator {
            None => {
                return Ok(Progress::Operator {
                    field: column.field.clone(),
                    search_term: String::new(),
                });
            }
            Some(op) if !op.closed => {
                return Ok(Progress::Operator {
                    field: column.field.clone(),
                    search_term: op.text.to_string(),
                });
            }
            Some(op) if op.text.is_empty() => return Err(ParseError::incomplete("an operator")),
            Some(op) => resolver.operator(column, op.text)?,
        }
    };

    check_closed(resolver, column, condition.value, "a value")?;
    check_closed(resolver, column, condition.upper, "an upper bound")?;

    Ok(Progress::Value {
        column,
        draft: ConditionDraft {
            field: column.field.clone(),
            operator,
            value: condition.value.map_or("", |v| v.text).to_string(),
            value2: condition.upper.map(|u| u.text.to_string()),
        },
    })
}

/// A value the user has moved past must be present and coerce.
fn check_closed(
    resolver: &Resolver<'_>,
    column: &Column,
    segment: Option<Segment<'_>>,
    expected: &str,
) -> FilterResult<()> {
    match segment {
        Some(seg) if seg.closed && seg.text.is_empty() => Err(ParseError::incomplete(expected)),
        Some(seg) if seg.closed => resolver.value(column, seg.text).map(|_| ()),
        _ => Ok(()),
    }
}

/// Turns a draft into a condition, as confirming it now would.
fn finish(
    resolver: &Resolver<'_>,
    column: &Column,
    draft: &ConditionDraft,
) -> FilterResult<FilterCondition> {
    if draft.value.is_empty() {
        return Err(ParseError::incomplete("a value"));
    }
    resolver.condition(column, draft.operator, &draft.value, draft.value2.as_deref())
}

/// Returns a selector state unless the input stalled or was confirmed early.
fn settle(scan: &Scan<'_>, state: ParseState, expected: &str) -> FilterResult<ParseState> {
    if let Some(stall) = scan.stall {
        return Err(stall.into_error());
    }
    if scan.matched.confirmed {
        return Err(ParseError::incomplete(expected));
    }
    Ok(state)
}
