//! Leaf predicates.
//!
//! A [`Condition`] is an operator plus its operands, independent of any column.
//! Operand arity is part of the type: [`ConditionKind`] has one variant per
//! arity and the renderer matches on it exhaustively.
//!
//! ```rust
//! use dynsql_query::condition::{is_between, is_equal_to, is_in, is_null};
//!
//! let eq = is_equal_to(3);
//! assert_eq!(eq.value_count(), 1);
//!
//! let range = is_between(1, 10);
//! assert_eq!(range.value_count(), 2);
//!
//! let list = is_in(vec![1, 2, 3]).unwrap();
//! assert_eq!(list.value_count(), 3);
//!
//! assert!(is_in(Vec::<i32>::new()).is_err());
//! assert_eq!(is_null::<i32>().value_count(), 0);
//! ```

use crate::error::{RenderError, RenderResult};

/// Rewrites the rendered column text, e.g. `a.name` into `upper(a.name)`.
pub type ColumnOverride = fn(&str) -> String;

/// Wrap a column in `upper(..)`.
pub fn upper(column: &str) -> String {
    format!("upper({})", column)
}

/// Wrap a column in `lower(..)`.
pub fn lower(column: &str) -> String {
    format!("lower({})", column)
}

/// Operators that take no operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoValueOperator {
    /// `is null`
    IsNull,
    /// `is not null`
    IsNotNull,
}

impl NoValueOperator {
    /// Get the operator SQL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
        }
    }
}

/// Operators that take exactly one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleValueOperator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `like`
    Like,
    /// `not like`
    NotLike,
}

impl SingleValueOperator {
    /// Get the operator SQL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Like => "like",
            Self::NotLike => "not like",
        }
    }

    /// Render the operator around one placeholder.
    pub fn render(&self, placeholder: &str) -> String {
        format!("{} {}", self.as_sql(), placeholder)
    }
}

/// Operators that take an ordered pair of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwoValueOperator {
    /// `between .. and ..`
    Between,
    /// `not between .. and ..`
    NotBetween,
}

impl TwoValueOperator {
    /// Render the operator around two placeholders, lower bound first.
    pub fn render(&self, first: &str, second: &str) -> String {
        match self {
            Self::Between => format!("between {} and {}", first, second),
            Self::NotBetween => format!("not between {} and {}", first, second),
        }
    }
}

/// Operators that take a non-empty list of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListOperator {
    /// `in (..)`
    In,
    /// `not in (..)`
    NotIn,
}

impl ListOperator {
    /// Get the operator SQL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }

    /// Render the operator around the placeholders, in list order.
    pub fn render(&self, placeholders: &[String]) -> String {
        format!("{} ({})", self.as_sql(), placeholders.join(", "))
    }
}

/// A list of operands that is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandList<T>(Vec<T>);

impl<T> OperandList<T> {
    /// Build a list, rejecting an empty one.
    pub fn new(operator: ListOperator, values: impl IntoIterator<Item = T>) -> RenderResult<Self> {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return Err(RenderError::empty_operand(operator.as_sql()));
        }
        Ok(Self(values))
    }

    /// Borrow the operands.
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Number of operands (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn map<U>(self, f: impl FnMut(T) -> U) -> OperandList<U> {
        OperandList(self.0.into_iter().map(f).collect())
    }
}

/// The operator and operands of a condition, by arity.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind<T> {
    /// No operands, e.g. `is null`.
    NoValue(NoValueOperator),
    /// One operand, e.g. `= ?`.
    SingleValue(SingleValueOperator, T),
    /// Two operands, e.g. `between ? and ?`.
    TwoValues(TwoValueOperator, T, T),
    /// A non-empty list of operands, e.g. `in (?, ?)`.
    ListValue(ListOperator, OperandList<T>),
}

/// A predicate waiting for a column.
#[derive(Debug, Clone)]
pub struct Condition<T> {
    kind: ConditionKind<T>,
    column_override: Option<ColumnOverride>,
}

impl<T> Condition<T> {
    /// Create a condition from its kind.
    pub fn new(kind: ConditionKind<T>) -> Self {
        Self {
            kind,
            column_override: None,
        }
    }

    /// Rewrite the column text when this condition renders.
    pub fn with_column_override(mut self, column_override: ColumnOverride) -> Self {
        self.column_override = Some(column_override);
        self
    }

    /// Get the kind.
    pub fn kind(&self) -> &ConditionKind<T> {
        &self.kind
    }

    /// Get the column override, if any.
    pub fn column_override(&self) -> Option<ColumnOverride> {
        self.column_override
    }

    /// Number of placeholders this condition requests when rendered.
    pub fn value_count(&self) -> usize {
        match &self.kind {
            ConditionKind::NoValue(_) => 0,
            ConditionKind::SingleValue(..) => 1,
            ConditionKind::TwoValues(..) => 2,
            ConditionKind::ListValue(_, values) => values.len(),
        }
    }

    /// Convert every operand, keeping operator and override.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Condition<U> {
        let kind = match self.kind {
            ConditionKind::NoValue(op) => ConditionKind::NoValue(op),
            ConditionKind::SingleValue(op, v) => ConditionKind::SingleValue(op, f(v)),
            ConditionKind::TwoValues(op, a, b) => {
                let a = f(a);
                ConditionKind::TwoValues(op, a, f(b))
            }
            ConditionKind::ListValue(op, values) => ConditionKind::ListValue(op, values.map(f)),
        };
        Condition {
            kind,
            column_override: self.column_override,
        }
    }

    /// Apply the column override to already-rendered column text.
    pub fn render_column(&self, column: String) -> String {
        match self.column_override {
            Some(rewrite) => rewrite(&column),
            None => column,
        }
    }

    /// Render `<column> <operator text>`.
    ///
    /// `placeholder` is called once per operand, in declared order, and must
    /// return the placeholder text for that operand.
    pub fn render<F>(&self, column: &str, mut placeholder: F) -> String
    where
        F: FnMut(&T) -> String,
    {
        let operator = match &self.kind {
            ConditionKind::NoValue(op) => op.as_sql().to_string(),
            ConditionKind::SingleValue(op, value) => op.render(&placeholder(value)),
            ConditionKind::TwoValues(op, first, second) => {
                let first = placeholder(first);
                let second = placeholder(second);
                op.render(&first, &second)
            }
            ConditionKind::ListValue(op, values) => {
                let placeholders: Vec<String> =
                    values.as_slice().iter().map(&mut placeholder).collect();
                op.render(&placeholders)
            }
        };
        format!("{} {}", column, operator)
    }
}

fn single<T>(op: SingleValueOperator, value: T) -> Condition<T> {
    Condition::new(ConditionKind::SingleValue(op, value))
}

/// `column = value`
pub fn is_equal_to<T>(value: T) -> Condition<T> {
    single(SingleValueOperator::Equal, value)
}

/// `column <> value`
pub fn is_not_equal_to<T>(value: T) -> Condition<T> {
    single(SingleValueOperator::NotEqual, value)
}

/// `column > value`
pub fn is_greater_than<T>(value: T) -> Condition<T> {
    single(SingleValueOperator::GreaterThan, value)
}

/// `column >= value`
pub fn is_greater_than_or_equal_to<T>(value: T) -> Condition<T> {
    single(SingleValueOperator::GreaterThanOrEqual, value)
}

/// `column < value`
pub fn is_less_than<T>(value: T) -> Condition<T> {
    single(SingleValueOperator::LessThan, value)
}

/// `column <= value`
pub fn is_less_than_or_equal_to<T>(value: T) -> Condition<T> {
    single(SingleValueOperator::LessThanOrEqual, value)
}

/// `column like pattern`
pub fn is_like<T>(pattern: T) -> Condition<T> {
    single(SingleValueOperator::Like, pattern)
}

/// `column not like pattern`
pub fn is_not_like<T>(pattern: T) -> Condition<T> {
    single(SingleValueOperator::NotLike, pattern)
}

/// `upper(column) like PATTERN`
pub fn is_like_case_insensitive(pattern: impl Into<String>) -> Condition<String> {
    single(SingleValueOperator::Like, pattern.into().to_uppercase()).with_column_override(upper)
}

/// `upper(column) not like PATTERN`
pub fn is_not_like_case_insensitive(pattern: impl Into<String>) -> Condition<String> {
    single(SingleValueOperator::NotLike, pattern.into().to_uppercase())
        .with_column_override(upper)
}

/// `column is null`
pub fn is_null<T>() -> Condition<T> {
    Condition::new(ConditionKind::NoValue(NoValueOperator::IsNull))
}

/// `column is not null`
pub fn is_not_null<T>() -> Condition<T> {
    Condition::new(ConditionKind::NoValue(NoValueOperator::IsNotNull))
}

/// `column between lower and upper`
pub fn is_between<T>(lower: T, upper: T) -> Condition<T> {
    Condition::new(ConditionKind::TwoValues(TwoValueOperator::Between, lower, upper))
}

/// `column not between lower and upper`
pub fn is_not_between<T>(lower: T, upper: T) -> Condition<T> {
    Condition::new(ConditionKind::TwoValues(TwoValueOperator::NotBetween, lower, upper))
}

/// `column in (values..)`; fails on an empty list.
pub fn is_in<T>(values: impl IntoIterator<Item = T>) -> RenderResult<Condition<T>> {
    let values = OperandList::new(ListOperator::In, values)?;
    Ok(Condition::new(ConditionKind::ListValue(ListOperator::In, values)))
}

/// `column not in (values..)`; fails on an empty list.
pub fn is_not_in<T>(values: impl IntoIterator<Item = T>) -> RenderResult<Condition<T>> {
    let values = OperandList::new(ListOperator::NotIn, values)?;
    Ok(Condition::new(ConditionKind::ListValue(ListOperator::NotIn, values)))
}
