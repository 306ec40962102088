//! Turns a confirmed (or ready-to-confirm) expression into a filter.

use tracing::debug;

use crate::ast::{CompositeFilter, FilterCondition};
use crate::column::Column;
use crate::error::{FilterResult, ParseError};
use crate::matcher::{ConditionMatch, PatternMatcher, Stall};
use crate::resolve::Resolver;
use crate::vocabulary::Vocabulary;

/// Builds a [`CompositeFilter`] from the input.
///
/// The trailing `##` is optional, and a dangling `#` after the last value
/// is ignored, so pressing Enter on a complete expression works the same as
/// typing the confirmation marker.
pub(crate) fn build(
    input: &str,
    columns: &[Column],
    vocabulary: &Vocabulary,
) -> FilterResult<CompositeFilter> {
    let result = build_filter(input, columns, vocabulary);
    match &result {
        Ok(filter) => debug!(input, filter = %filter, "built filter"),
        Err(error) => debug!(input, kind = error.kind(), %error, "filter build failed"),
    }
    result
}

fn build_filter(
    input: &str,
    columns: &[Column],
    vocabulary: &Vocabulary,
) -> FilterResult<CompositeFilter> {
    let scan = PatternMatcher::new(vocabulary)
        .scan(input)
        .ok_or(ParseError::NotAnExpression)?;
    let resolver = Resolver::new(columns, vocabulary);
    let m = &scan.matched;

    let (column, first) = condition(&resolver, &m.first, None, scan.stall)?;

    // A bare '#' after the first condition is an unused join selector
    let join = match m.join {
        Some(join) if join.closed || !join.text.is_empty() => join,
        _ => {
            return match scan.stall {
                Some(stall) => Err(stall.into_error()),
                None => Ok(CompositeFilter::single(first)),
            };
        }
    };
    let join = resolver.join(join.text)?;

    let second = m
        .second
        .as_ref()
        .ok_or_else(|| missing(scan.stall, "a second condition"))?;
    let (_, second) = condition(&resolver, second, Some(column), scan.stall)?;

    if let Some(stall) = scan.stall {
        return Err(stall.into_error());
    }
    Ok(CompositeFilter::pair(first, join, second))
}

/// Resolves one condition, falling back to `inherited` when it names no
/// column of its own.
fn condition<'c>(
    resolver: &Resolver<'c>,
    condition: &ConditionMatch<'_>,
    inherited: Option<&'c Column>,
    stall: Option<Stall<'_>>,
) -> FilterResult<(&'c Column, FilterCondition)> {
    let column = match (condition.field, inherited) {
        (Some(field), _) if !field.text.is_empty() => resolver.condition_column(
            field.text,
            inherited,
            condition.value_after_field(stall),
        )?,
        (None, Some(column)) => column,
        _ => return Err(missing(stall, "a column")),
    };

    let operator = if condition.shorthand {
        resolver.shorthand(column)?
    } else {
        match condition.operator {
            Some(op) if !op.text.is_empty() => resolver.operator(column, op.text)?,
            _ => return Err(missing(stall, "an operator")),
        }
    };

    let value = match condition.value {
        Some(value) if !value.text.is_empty() => value.text,
        _ => return Err(missing(stall, "a value")),
    };
    let upper = condition.upper.map(|u| u.text).filter(|u| !u.is_empty());
    if operator.is_range() && upper.is_none() {
        // Coercion errors on the lower bound still take precedence
        resolver.value(column, value)?;
        return Err(missing(stall, "an upper bound"));
    }

    let built = resolver.condition(column, operator, value, upper)?;
    Ok((column, built))
}

/// The error for a missing part: the stall that cut the input short, if
/// any, otherwise an incomplete expression.
fn missing(stall: Option<Stall<'_>>, expected: &str) -> ParseError {
    stall.map_or_else(|| ParseError::incomplete(expected), Stall::into_error)
}
