//! Fluent construction of a complete where clause.
//!
//! ```rust
//! use dynsql_query::column::{SqlColumn, SqlTable};
//! use dynsql_query::condition::{is_equal_to, is_less_than};
//! use dynsql_query::criterion;
//! use dynsql_query::render::RenderOptions;
//! use dynsql_query::where_clause::where_;
//!
//! let table = SqlTable::of("foo").with_alias("a");
//! let column1: SqlColumn<i32> = SqlColumn::of("column1").in_table(&table);
//! let column2: SqlColumn<i32> = SqlColumn::of("column2").in_table(&table);
//!
//! let model = where_(&column1, is_equal_to(1))
//!     .or(&column2, is_equal_to(4))
//!     .and_group(&column2, is_less_than(3), [criterion::or(&column1, is_equal_to(2))])
//!     .build();
//!
//! let clause = model.render(&RenderOptions::new()).unwrap();
//! assert_eq!(
//!     clause.clause(),
//!     "where a.column1 = {parameters.p1} or a.column2 = {parameters.p2} \
//!      and (a.column2 < {parameters.p3} or a.column1 = {parameters.p4})"
//! );
//! ```

use crate::column::TypedColumn;
use crate::condition::Condition;
use crate::criterion::{Connector, Criterion};
use crate::error::RenderResult;
use crate::parallel::{ParallelConfig, render_criteria_parallel};
use crate::render::{RenderOptions, WhereClause, render_with_options};
use crate::value::ParameterValue;

/// Start a where clause with its root criterion.
pub fn where_<C>(column: &C, condition: Condition<C::Value>) -> WhereBuilder
where
    C: TypedColumn,
    C::Value: Into<ParameterValue>,
{
    WhereBuilder::new(column, condition)
}

/// Start a where clause whose root criterion carries sub-criteria.
pub fn where_group<C>(
    column: &C,
    condition: Condition<C::Value>,
    sub_criteria: impl IntoIterator<Item = Criterion>,
) -> WhereBuilder
where
    C: TypedColumn,
    C::Value: Into<ParameterValue>,
{
    WhereBuilder::from_root(Criterion::new(column, condition).with_sub_criteria(sub_criteria))
}

/// Consuming builder for a [`WhereModel`].
#[derive(Debug, Clone)]
pub struct WhereBuilder {
    criteria: Vec<Criterion>,
}

impl WhereBuilder {
    /// Create a builder from a column and condition.
    pub fn new<C>(column: &C, condition: Condition<C::Value>) -> Self
    where
        C: TypedColumn,
        C::Value: Into<ParameterValue>,
    {
        Self::from_root(Criterion::new(column, condition))
    }

    /// Create a builder from an already built root criterion.
    pub fn from_root(root: Criterion) -> Self {
        Self {
            criteria: vec![root],
        }
    }

    fn push(mut self, criterion: Criterion, connector: Connector) -> Self {
        self.criteria.push(criterion.with_connector(connector));
        self
    }

    /// Append `and <column> <condition>`.
    pub fn and<C>(self, column: &C, condition: Condition<C::Value>) -> Self
    where
        C: TypedColumn,
        C::Value: Into<ParameterValue>,
    {
        self.push(Criterion::new(column, condition), Connector::And)
    }

    /// Append `or <column> <condition>`.
    pub fn or<C>(self, column: &C, condition: Condition<C::Value>) -> Self
    where
        C: TypedColumn,
        C::Value: Into<ParameterValue>,
    {
        self.push(Criterion::new(column, condition), Connector::Or)
    }

    /// Append an `and` criterion parenthesized together with its sub-criteria.
    pub fn and_group<C>(
        self,
        column: &C,
        condition: Condition<C::Value>,
        sub_criteria: impl IntoIterator<Item = Criterion>,
    ) -> Self
    where
        C: TypedColumn,
        C::Value: Into<ParameterValue>,
    {
        let criterion = Criterion::new(column, condition).with_sub_criteria(sub_criteria);
        self.push(criterion, Connector::And)
    }

    /// Append an `or` criterion parenthesized together with its sub-criteria.
    pub fn or_group<C>(
        self,
        column: &C,
        condition: Condition<C::Value>,
        sub_criteria: impl IntoIterator<Item = Criterion>,
    ) -> Self
    where
        C: TypedColumn,
        C::Value: Into<ParameterValue>,
    {
        let criterion = Criterion::new(column, condition).with_sub_criteria(sub_criteria);
        self.push(criterion, Connector::Or)
    }

    /// Finish building.
    pub fn build(self) -> WhereModel {
        WhereModel {
            criteria: self.criteria,
        }
    }
}

/// A finished predicate tree: one root criterion and its top-level siblings.
#[derive(Debug, Clone)]
pub struct WhereModel {
    // Never empty; index 0 is the root.
    criteria: Vec<Criterion>,
}

impl WhereModel {
    /// Get the root criterion.
    pub fn root(&self) -> &Criterion {
        &self.criteria[0]
    }

    /// Get the criteria following the root.
    pub fn additional(&self) -> &[Criterion] {
        &self.criteria[1..]
    }

    /// Get every top-level criterion, root first.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Total parameters this model binds when rendered.
    pub fn parameter_count(&self) -> usize {
        self.criteria.iter().map(Criterion::parameter_count).sum()
    }

    /// Render into a where clause.
    pub fn render(&self, options: &RenderOptions) -> RenderResult<WhereClause> {
        render_with_options(&self.criteria, options)
    }

    /// Render on worker threads. Output is identical to [`WhereModel::render`].
    pub fn render_parallel(
        &self,
        options: &RenderOptions,
        parallel: &ParallelConfig,
    ) -> RenderResult<WhereClause> {
        render_criteria_parallel(&self.criteria, options, parallel)
    }
}
