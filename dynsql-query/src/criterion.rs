//! Predicate tree nodes.
//!
//! A [`Criterion`] pairs a column with a condition, remembers how it joins
//! its preceding sibling, and owns any nested sub-criteria. Nodes are
//! immutable once built; the builder methods consume and return `self`.
//!
//! ```rust
//! use dynsql_query::column::SqlColumn;
//! use dynsql_query::condition::{is_equal_to, is_less_than};
//! use dynsql_query::criterion::{self, Criterion};
//!
//! let id: SqlColumn<i32> = SqlColumn::of("id");
//! let age: SqlColumn<i32> = SqlColumn::of("age");
//!
//! let tree = Criterion::new(&id, is_equal_to(3))
//!     .with_sub_criterion(criterion::or(&age, is_less_than(18)));
//!
//! assert!(tree.has_sub_criteria());
//! assert_eq!(tree.parameter_count(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::column::{RenderableColumn, TypedColumn};
use crate::condition::Condition;
use crate::value::ParameterValue;

/// Logical joiner between a criterion and its preceding sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    /// `and`
    And,
    /// `or`
    Or,
}

impl Connector {
    /// Get the connector SQL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One node of a predicate tree.
#[derive(Debug, Clone)]
pub struct Criterion {
    column: Arc<dyn RenderableColumn>,
    condition: Condition<ParameterValue>,
    connector: Option<Connector>,
    sub_criteria: Vec<Criterion>,
}

impl Criterion {
    /// Create a criterion without a connector.
    ///
    /// The condition's value type must match the column's, and is erased to
    /// [`ParameterValue`] here.
    pub fn new<C>(column: &C, condition: Condition<C::Value>) -> Self
    where
        C: TypedColumn,
        C::Value: Into<ParameterValue>,
    {
        Self {
            column: Arc::new(column.clone()),
            condition: condition.map(Into::into),
            connector: None,
            sub_criteria: Vec::new(),
        }
    }

    /// Set the connector to the preceding sibling.
    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Append one nested sub-criterion.
    pub fn with_sub_criterion(mut self, sub: Criterion) -> Self {
        self.sub_criteria.push(sub);
        self
    }

    /// Append nested sub-criteria, in order.
    pub fn with_sub_criteria(mut self, subs: impl IntoIterator<Item = Criterion>) -> Self {
        self.sub_criteria.extend(subs);
        self
    }

    /// Get the connector.
    pub fn connector(&self) -> Option<Connector> {
        self.connector
    }

    /// Get the column.
    pub fn column(&self) -> &dyn RenderableColumn {
        self.column.as_ref()
    }

    /// Get the condition.
    pub fn condition(&self) -> &Condition<ParameterValue> {
        &self.condition
    }

    /// Check whether this node has nested sub-criteria.
    pub fn has_sub_criteria(&self) -> bool {
        !self.sub_criteria.is_empty()
    }

    /// Get the nested sub-criteria.
    pub fn sub_criteria(&self) -> &[Criterion] {
        &self.sub_criteria
    }

    /// Number of parameters this node and its descendants bind.
    pub fn parameter_count(&self) -> usize {
        self.condition.value_count()
            + self
                .sub_criteria
                .iter()
                .map(Criterion::parameter_count)
                .sum::<usize>()
    }

    /// Number of predicates in this node and its descendants.
    pub fn predicate_count(&self) -> usize {
        1 + self
            .sub_criteria
            .iter()
            .map(Criterion::predicate_count)
            .sum::<usize>()
    }
}

/// A criterion joined to its predecessor with `and`.
pub fn and<C>(column: &C, condition: Condition<C::Value>) -> Criterion
where
    C: TypedColumn,
    C::Value: Into<ParameterValue>,
{
    Criterion::new(column, condition).with_connector(Connector::And)
}

/// A criterion joined to its predecessor with `or`.
pub fn or<C>(column: &C, condition: Condition<C::Value>) -> Criterion
where
    C: TypedColumn,
    C::Value: Into<ParameterValue>,
{
    Criterion::new(column, condition).with_connector(Connector::Or)
}
