//! Table and column references.
//!
//! Columns are phantom-typed over the value they hold, so a condition built
//! for a `SqlColumn<i32>` cannot be attached to a `SqlColumn<String>`:
//!
//! ```rust
//! use dynsql_query::column::{RenderableColumn, SqlColumn, SqlTable};
//!
//! let table = SqlTable::of("foo").with_alias("a");
//! let id: SqlColumn<i32> = SqlColumn::of("id").in_table(&table);
//!
//! assert_eq!(id.render(true), "a.id");
//! assert_eq!(id.render(false), "id");
//! ```

use std::fmt;
use std::marker::PhantomData;

use smol_str::SmolStr;

/// Capability to render a column reference into SQL text.
///
/// Implementations must be cheap to call repeatedly; rendering may happen on
/// several worker threads at once.
pub trait RenderableColumn: fmt::Debug + Send + Sync {
    /// The bare column name.
    fn name(&self) -> &str;

    /// Render the column, qualified with its table alias when `qualified` is
    /// set and an alias exists.
    fn render(&self, qualified: bool) -> String;
}

/// A column bound to the Rust type of the values compared against it.
pub trait TypedColumn: RenderableColumn + Clone + 'static {
    /// The value type accepted by conditions on this column.
    type Value;
}

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTable {
    name: SmolStr,
    alias: Option<SmolStr>,
}

impl SqlTable {
    /// Create a table reference.
    pub fn of(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Set the table alias.
    pub fn with_alias(mut self, alias: impl Into<SmolStr>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Get the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the table alias.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// A column of type `T`, optionally belonging to a table.
pub struct SqlColumn<T> {
    name: SmolStr,
    table_alias: Option<SmolStr>,
    alias: Option<SmolStr>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SqlColumn<T> {
    /// Create a column reference.
    pub fn of(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            table_alias: None,
            alias: None,
            _marker: PhantomData,
        }
    }

    /// Attach the column to a table; the table alias (if any) becomes the qualifier.
    pub fn in_table(mut self, table: &SqlTable) -> Self {
        self.table_alias = table.alias.clone();
        self
    }

    /// Set the select-list alias. Predicates never use it.
    pub fn with_alias(mut self, alias: impl Into<SmolStr>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Get the select-list alias.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Get the qualifier used when rendering qualified.
    pub fn table_alias(&self) -> Option<&str> {
        self.table_alias.as_deref()
    }
}

impl<T> Clone for SqlColumn<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            table_alias: self.table_alias.clone(),
            alias: self.alias.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SqlColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlColumn")
            .field("name", &self.name)
            .field("table_alias", &self.table_alias)
            .field("alias", &self.alias)
            .finish()
    }
}

impl<T> PartialEq for SqlColumn<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.table_alias == other.table_alias
    }
}

impl<T> RenderableColumn for SqlColumn<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, qualified: bool) -> String {
        match (&self.table_alias, qualified) {
            (Some(qualifier), true) => format!("{}.{}", qualifier, self.name),
            _ => self.name.to_string(),
        }
    }
}

impl<T: 'static> TypedColumn for SqlColumn<T> {
    type Value = T;
}
