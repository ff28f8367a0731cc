//! Fuzz target for criterion tree rendering.
//!
//! Builds arbitrary criterion trees and checks that rendering never panics,
//! is deterministic, numbers parameters densely, and agrees with the
//! parallel renderer.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_criteria_render
//! ```

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use dynsql_query::condition::{self, Condition};
use dynsql_query::criterion::{Connector, Criterion};
use dynsql_query::{
    ParallelConfig, ParameterValue, PlaceholderStyle, RenderOptions, SqlColumn, SqlTable,
    render_criteria_parallel, render_with_options,
};
use libfuzzer_sys::fuzz_target;

const MAX_DEPTH: usize = 6;

#[derive(Debug, Arbitrary)]
enum FuzzCondition {
    Equal(i64),
    NotEqual(i64),
    GreaterThan(i64),
    LessThanOrEqual(i64),
    Like(String),
    LikeCaseInsensitive(String),
    IsNull,
    IsNotNull,
    Between(i64, i64),
    NotBetween(i64, i64),
    In(Vec<i64>),
    NotIn(Vec<i64>),
}

impl FuzzCondition {
    fn into_condition(self) -> Option<Condition<ParameterValue>> {
        let erased = |c: Condition<i64>| c.map(ParameterValue::from);
        Some(match self {
            FuzzCondition::Equal(v) => erased(condition::is_equal_to(v)),
            FuzzCondition::NotEqual(v) => erased(condition::is_not_equal_to(v)),
            FuzzCondition::GreaterThan(v) => erased(condition::is_greater_than(v)),
            FuzzCondition::LessThanOrEqual(v) => erased(condition::is_less_than_or_equal_to(v)),
            FuzzCondition::Like(s) => condition::is_like(ParameterValue::from(s)),
            FuzzCondition::LikeCaseInsensitive(s) => {
                condition::is_like_case_insensitive(s).map(ParameterValue::from)
            }
            FuzzCondition::IsNull => condition::is_null(),
            FuzzCondition::IsNotNull => condition::is_not_null(),
            FuzzCondition::Between(a, b) => erased(condition::is_between(a, b)),
            FuzzCondition::NotBetween(a, b) => erased(condition::is_not_between(a, b)),
            // Empty lists must be rejected, never rendered.
            FuzzCondition::In(values) => erased(condition::is_in(values).ok()?),
            FuzzCondition::NotIn(values) => erased(condition::is_not_in(values).ok()?),
        })
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzCriterion {
    column: u8,
    or: Option<bool>,
    condition: FuzzCondition,
    subs: Vec<FuzzCriterion>,
}

impl FuzzCriterion {
    fn into_criterion(self, columns: &[SqlColumn<ParameterValue>], depth: usize) -> Option<Criterion> {
        let column = &columns[self.column as usize % columns.len()];
        let mut criterion = Criterion::new(column, self.condition.into_condition()?);
        if let Some(or) = self.or {
            criterion = criterion.with_connector(if or { Connector::Or } else { Connector::And });
        }
        if depth < MAX_DEPTH {
            criterion = criterion.with_sub_criteria(
                self.subs
                    .into_iter()
                    .filter_map(|sub| sub.into_criterion(columns, depth + 1)),
            );
        }
        Some(criterion)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(tree) = Vec::<FuzzCriterion>::arbitrary(&mut unstructured) else {
        return;
    };

    let table = SqlTable::of("t").with_alias("a");
    let columns: Vec<SqlColumn<ParameterValue>> = ["id", "name", "score", "created_at"]
        .into_iter()
        .map(|name| SqlColumn::of(name).in_table(&table))
        .collect();
    let criteria: Vec<Criterion> = tree
        .into_iter()
        .filter_map(|c| c.into_criterion(&columns, 0))
        .collect();

    let options = RenderOptions::new().with_placeholder(PlaceholderStyle::Colon);
    let first = render_with_options(&criteria, &options).expect("render failed");
    let second = render_with_options(&criteria, &options).expect("render failed");
    assert_eq!(first, second);

    let expected: usize = criteria.iter().map(Criterion::parameter_count).sum();
    assert_eq!(first.parameters().len(), expected);
    for (index, key) in first.parameters().keys().enumerate() {
        assert_eq!(key, &format!("p{}", index + 1));
    }
    assert_eq!(first.is_empty(), criteria.is_empty());

    let parallel = render_criteria_parallel(&criteria, &options, &ParallelConfig::new(4, 1))
        .expect("parallel render failed");
    assert_eq!(parallel, first);
});
