//! Structured filters produced by the builder.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::vocabulary::{Join, Operator, Vocabulary};

/// A condition value after coercion to the column type.
///
/// Serialized with its type next to it (`{"type": "date", "value":
/// "2025-01-01"}`) so text that looks like a number or a date reads back
/// as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FilterValue {
    /// A decimal number.
    Number(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// Trimmed free text.
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// A single `field operator value` predicate.
///
/// `value2` is present exactly when the operator is [`Operator::InRange`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// The column field the condition applies to.
    pub field: String,
    /// The comparison to perform.
    pub operator: Operator,
    /// The (lower bound) value.
    pub value: FilterValue,
    /// The upper bound of a range condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<FilterValue>,
}

impl FilterCondition {
    /// Creates a single-valued condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            value2: None,
        }
    }

    /// Creates an `inRange` condition. Bounds are kept in the order given.
    pub fn range(field: impl Into<String>, low: FilterValue, high: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator: Operator::InRange,
            value: low,
            value2: Some(high),
        }
    }

    /// Returns true if `value2` is present exactly for range operators.
    pub fn is_well_formed(&self) -> bool {
        self.operator.is_range() == self.value2.is_some()
    }
}

/// One condition, or two conditions combined by a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompositeFilterRepr")]
pub struct CompositeFilter {
    conditions: Vec<FilterCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    join: Option<Join>,
}

#[derive(Deserialize)]
struct CompositeFilterRepr {
    conditions: Vec<FilterCondition>,
    #[serde(default)]
    join: Option<Join>,
}

impl TryFrom<CompositeFilterRepr> for CompositeFilter {
    type Error = String;

    fn try_from(repr: CompositeFilterRepr) -> Result<Self, Self::Error> {
        if let Some(bad) = repr.conditions.iter().find(|c| !c.is_well_formed()) {
            return Err(format!(
                "condition on '{}' must have value2 exactly when the operator is inRange",
                bad.field
            ));
        }
        let mut conditions = repr.conditions.into_iter();
        match (conditions.next(), conditions.next(), conditions.next(), repr.join) {
            (Some(first), None, None, None) => Ok(Self::single(first)),
            (Some(first), Some(second), None, Some(join)) => Ok(Self::pair(first, join, second)),
            (Some(_), Some(_), None, None) => Err("two conditions require a join".to_string()),
            (Some(_), None, None, Some(_)) => Err("a join requires two conditions".to_string()),
            _ => Err("a filter has one or two conditions".to_string()),
        }
    }
}

impl CompositeFilter {
    /// Creates a filter with a single condition.
    pub fn single(condition: FilterCondition) -> Self {
        Self {
            conditions: vec![condition],
            join: None,
        }
    }

    /// Creates a filter with two joined conditions.
    pub fn pair(first: FilterCondition, join: Join, second: FilterCondition) -> Self {
        Self {
            conditions: vec![first, second],
            join: Some(join),
        }
    }

    /// Returns the one or two conditions.
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Returns the join, present exactly when there are two conditions.
    pub fn join(&self) -> Option<Join> {
        self.join
    }

    /// Writes the filter back out in the canonical surface syntax.
    ///
    /// The second field is only written when it differs from the first, and
    /// the result always ends with the confirmation marker.
    pub fn to_expression(&self, vocabulary: &Vocabulary) -> String {
        let markers = vocabulary.markers();
        let mut out = String::new();
        let mut previous_field: Option<&str> = None;

        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                if let Some(join) = self.join {
                    out.push_str(&format!(" {}{} ", markers.hash, vocabulary.join_word(join)));
                }
            }
            if previous_field != Some(condition.field.as_str()) {
                out.push(markers.hash);
                out.push_str(&condition.field);
                out.push(' ');
            }
            out.push(markers.hash);
            out.push_str(vocabulary.token_for(condition.operator));
            out.push(' ');
            out.push_str(&condition.value.to_string());
            if let Some(upper) = &condition.value2 {
                out.push_str(&format!(" {}{} {}", markers.hash, markers.range, upper));
            }
            previous_field = Some(condition.field.as_str());
        }

        out.push_str(&markers.confirm);
        out
    }
}

impl fmt::Display for CompositeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_expression(&Vocabulary::default()))
    }
}
