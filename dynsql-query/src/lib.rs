//! # dynsql-query
//!
//! Condition-tree rendering for dynamic SQL.
//!
//! This crate turns programmatically built predicate trees into where-clause
//! text plus a map of externally bound parameters:
//! - Typed columns and conditions (`is_equal_to`, `is_in`, `is_between`, ...)
//! - Criterion trees joined with `and`/`or`, nested to any depth
//! - Deterministic parameter keys (`p1`, `p2`, ...) and pluggable placeholder syntax
//! - Order-preserving fragment merging, including parallel rendering
//!
//! ## Rendering a where clause
//!
//! ```rust
//! use dynsql_query::prelude::*;
//!
//! let table = SqlTable::of("animal").with_alias("a");
//! let id: SqlColumn<i32> = SqlColumn::of("id").in_table(&table);
//! let name: SqlColumn<String> = SqlColumn::of("animal_name").in_table(&table);
//!
//! let model = where_(&id, is_in(vec![1, 5, 7]).unwrap())
//!     .or_group(&id, is_greater_than(100), [and(&name, is_like_case_insensitive("%bat%"))])
//!     .build();
//!
//! let clause = model
//!     .render(&RenderOptions::new().with_placeholder(PlaceholderStyle::Colon))
//!     .unwrap();
//!
//! assert_eq!(
//!     clause.clause(),
//!     "where a.id in (:p1, :p2, :p3) or (a.id > :p4 and upper(a.animal_name) like :p5)"
//! );
//! assert_eq!(clause.parameters()["p5"], ParameterValue::from("%BAT%"));
//! ```
//!
//! ## Empty operand lists
//!
//! List conditions reject empty input when they are built:
//!
//! ```rust
//! use dynsql_query::condition::is_in;
//!
//! let err = is_in(Vec::<i32>::new()).unwrap_err();
//! assert!(err.is_empty_operand());
//! ```

pub mod column;
pub mod condition;
pub mod config;
pub mod criterion;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod parallel;
pub mod placeholder;
pub mod render;
pub mod sequence;
pub mod value;
pub mod where_clause;

pub use column::{RenderableColumn, SqlColumn, SqlTable, TypedColumn};
pub use condition::{Condition, ConditionKind, OperandList};
pub use config::RenderConfig;
pub use criterion::{Connector, Criterion};
pub use error::{ErrorCode, ErrorContext, RenderError, RenderResult};
pub use fragment::{FragmentAndParameters, FragmentCollector, Parameters};
pub use parallel::{ParallelConfig, render_criteria_parallel};
pub use placeholder::{Placeholder, PlaceholderFactory, PlaceholderKind, PlaceholderStyle};
pub use render::{
    CriteriaRenderer, RenderOptions, WhereClause, render_condition, render_criteria,
    render_with_options,
};
pub use sequence::{KeySource, ParameterSequence, SharedSequence};
pub use value::ParameterValue;
pub use where_clause::{WhereBuilder, WhereModel, where_, where_group};

// Re-export logging utilities
pub use logging::{
    get_log_format, get_log_level, init as init_logging, init_debug, init_with_level,
    is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::column::{SqlColumn, SqlTable};
    pub use crate::condition::{
        is_between, is_equal_to, is_greater_than, is_greater_than_or_equal_to, is_in, is_less_than,
        is_less_than_or_equal_to, is_like, is_like_case_insensitive, is_not_between,
        is_not_equal_to, is_not_in, is_not_like, is_not_like_case_insensitive, is_not_null,
        is_null,
    };
    pub use crate::criterion::{Connector, Criterion, and, or};
    pub use crate::error::{RenderError, RenderResult};
    pub use crate::placeholder::PlaceholderStyle;
    pub use crate::render::{RenderOptions, WhereClause, render_criteria};
    pub use crate::value::ParameterValue;
    pub use crate::where_clause::{WhereModel, where_, where_group};
}
