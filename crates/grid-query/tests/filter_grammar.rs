//! Grammar-level properties of the filter language.
//!
//! These tests drive the public API only: classification of every prefix a
//! user types, building of confirmed expressions, and the round trip from
//! a built filter back to its canonical expression.

use grid_query_rs::{
    build, classify, Column, ColumnType, CompositeFilter, FilterCondition, FilterParser,
    FilterValue, Join, Operator, ParseError, ParseState, Vocabulary,
};

fn pharmacy_columns() -> Vec<Column> {
    vec![
        Column::text("name", "Name"),
        Column::text("category", "Category"),
        Column::text("supplier", "Supplier"),
        Column::number("base_price", "Base Price"),
        Column::number("sell_price", "Sell Price"),
        Column::number("stock", "Stock"),
        Column::date("expiry_date", "Expiry Date"),
        Column::text("batch_no", "Batch No").hidden(),
    ]
}

fn sample_value(column_type: ColumnType) -> (&'static str, FilterValue) {
    match column_type {
        ColumnType::Text => ("amoxicillin 500", FilterValue::Text("amoxicillin 500".into())),
        ColumnType::Number => ("1250.75", FilterValue::Number(1250.75)),
        ColumnType::Date => (
            "2025-06-30",
            FilterValue::Date(chrono::NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
        ),
    }
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn every_valid_combination_builds_a_single_condition() {
    let columns = pharmacy_columns();
    let vocabulary = Vocabulary::default();

    for column in columns.iter().filter(|c| c.searchable) {
        for spec in vocabulary.operators_for(column.column_type) {
            if spec.operator.is_range() {
                continue;
            }
            let (raw, value) = sample_value(column.column_type);
            let input = format!("#{} #{} {}##", column.field, spec.token, raw);

            let filter = build(&input, &columns)
                .unwrap_or_else(|e| panic!("{input} failed to build: {e}"));

            assert_eq!(
                filter,
                CompositeFilter::single(FilterCondition::new(
                    &column.field,
                    spec.operator,
                    value
                )),
                "{input}"
            );
        }
    }
}

#[test]
fn range_conditions_build_with_both_bounds() {
    let columns = pharmacy_columns();
    let filter = build("#stock #inRange 10 #to 20##", &columns).unwrap();
    assert_eq!(
        filter,
        CompositeFilter::single(FilterCondition::range(
            "stock",
            FilterValue::Number(10.0),
            FilterValue::Number(20.0)
        ))
    );
}

#[test]
fn two_condition_example_builds() {
    let columns = pharmacy_columns();
    let input = "#base_price #greaterThan 50000 #and #lessThan 100000##";

    let ParseState::Complete(filter) = classify(input, &columns) else {
        panic!("expected a complete state");
    };
    assert_eq!(filter.join(), Some(Join::And));
    assert_eq!(filter.conditions().len(), 2);
    assert_eq!(filter.conditions()[0].value, FilterValue::Number(50000.0));
    assert_eq!(filter.conditions()[1].value, FilterValue::Number(100000.0));
    assert_eq!(build(input, &columns), Ok(filter));
}

#[test]
fn shorthand_builds_without_confirmation() {
    let columns = pharmacy_columns();
    assert_eq!(
        build("#name:paracetamol", &columns),
        Ok(CompositeFilter::single(FilterCondition::new(
            "name",
            Operator::Contains,
            FilterValue::Text("paracetamol".into())
        )))
    );
}

#[test]
fn failures_name_the_boundary() {
    let columns = pharmacy_columns();
    assert!(matches!(
        build("#unknown_field #greaterThan 1##", &columns),
        Err(ParseError::UnknownField { .. })
    ));
    assert!(matches!(
        build("#base_price #greaterThan abc##", &columns),
        Err(ParseError::InvalidValue { .. })
    ));
    assert!(matches!(
        build("#name #lessThan 3##", &columns),
        Err(ParseError::InvalidOperator { .. })
    ));
    assert!(matches!(
        build("#stock #lessThan 3 #nand #equals 1##", &columns),
        Err(ParseError::MalformedJoin { .. })
    ));
    assert!(matches!(
        build("#stock #lessThan##", &columns),
        Err(ParseError::IncompleteExpression { .. })
    ));
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn single_condition_round_trips() {
    let columns = pharmacy_columns();
    for input in [
        "#name #contains vitamin c##",
        "#category #equals Antibiotic##",
        "#base_price #greaterThan 50000##",
        "#sell_price #lessThan 12.5##",
        "#expiry_date #equals 2025-01-31##",
        "#expiry_date #inRange 2025-01-01 #to 2025-12-31##",
    ] {
        let filter = build(input, &columns).unwrap();
        assert_eq!(filter.to_string(), input);
        assert_eq!(build(&filter.to_string(), &columns), Ok(filter));
    }
}

#[test]
fn two_condition_filters_round_trip() {
    let columns = pharmacy_columns();
    for input in [
        "#base_price #greaterThan 50000 #and #lessThan 100000##",
        "#stock #lessThan 5 #or #name #contains amox##",
    ] {
        let filter = build(input, &columns).unwrap();
        assert_eq!(filter.to_string(), input);
        assert_eq!(build(&filter.to_string(), &columns), Ok(filter));
    }
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn keystroke_sequence_opens_the_right_selectors() {
    let columns = pharmacy_columns();
    let expected = [
        (
            "#",
            ParseState::SelectingColumn {
                search_term: "".into(),
            },
        ),
        (
            "#b",
            ParseState::SelectingColumn {
                search_term: "b".into(),
            },
        ),
        (
            "#base_price",
            ParseState::SelectingColumn {
                search_term: "base_price".into(),
            },
        ),
        (
            "#base_price #",
            ParseState::SelectingOperator {
                field: "base_price".into(),
                search_term: "".into(),
            },
        ),
        (
            "#base_price #g",
            ParseState::SelectingOperator {
                field: "base_price".into(),
                search_term: "g".into(),
            },
        ),
    ];
    for (input, state) in expected {
        assert_eq!(classify(input, &columns), state, "{input}");
    }
}

#[test]
fn join_selector_after_first_value() {
    let columns = pharmacy_columns();
    assert_eq!(
        classify("#base_price #greaterThan 50000 #", &columns),
        ParseState::SelectingJoin {
            first: FilterCondition::new(
                "base_price",
                Operator::GreaterThan,
                FilterValue::Number(50000.0)
            ),
            search_term: "".into(),
        }
    );
}

#[test]
fn every_prefix_of_a_valid_expression_classifies_without_error() {
    let columns = pharmacy_columns();
    let input = "#base_price #greaterThan 50000 #and #lessThan 100000##";

    for end in 1..=input.len() {
        let prefix = &input[..end];
        let state = classify(prefix, &columns);
        assert!(
            !matches!(state, ParseState::Invalid(_)),
            "{prefix:?} classified as {state:?}"
        );
    }
}

#[test]
fn classification_is_idempotent() {
    let columns = pharmacy_columns();
    for input in [
        "",
        "#",
        "#sto",
        "#stock #lessThan 5 #o",
        "#stock #lessThan abc #",
        "#stock #lessThan 5 #or #greaterThan 100",
    ] {
        assert_eq!(classify(input, &columns), classify(input, &columns));
    }
}

#[test]
fn ready_flag_tracks_confirmability() {
    let columns = pharmacy_columns();
    let parser = FilterParser::new(columns);
    for input in [
        "#stock #lessThan 5",
        "#stock #lessThan 5 #or #greaterThan 100",
        "#name:para",
    ] {
        assert!(parser.classify(input).is_ready(), "{input}");
        assert!(parser.build(input).is_ok(), "{input}");
    }
    for input in ["#stock #lessThan ", "#stock #lessThan x", "#stock #inRange 5"] {
        assert!(!parser.classify(input).is_ready(), "{input}");
        assert!(parser.build(input).is_err(), "{input}");
    }
}
