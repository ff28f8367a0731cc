//! # dynsql
//!
//! Render programmatically built WHERE-clause trees into SQL fragments with
//! externally bound parameters.
//!
//! dynsql provides:
//! - Typed columns, so a condition's operand type is checked against its column
//! - Criterion trees joined with `and`/`or` and nested to any depth
//! - Deterministic parameter naming (`p1`, `p2`, ...) with pluggable placeholder syntax
//! - Order-preserving parallel rendering for very wide clauses
//!
//! ## Quick Start
//!
//! ```rust
//! use dynsql::prelude::*;
//!
//! let table = SqlTable::of("person").with_alias("p");
//! let age: SqlColumn<i32> = SqlColumn::of("age").in_table(&table);
//! let email: SqlColumn<String> = SqlColumn::of("email").in_table(&table);
//!
//! let clause = where_(&age, is_greater_than_or_equal_to(18))
//!     .and(&email, is_not_null())
//!     .build()
//!     .render(&RenderOptions::new())
//!     .unwrap();
//!
//! assert_eq!(
//!     clause.clause(),
//!     "where p.age >= {parameters.p1} and p.email is not null"
//! );
//! assert_eq!(clause.parameters().len(), 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The rendering engine.
pub mod query {
    pub use dynsql_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use dynsql_query::prelude::*;
    pub use dynsql_query::{ParallelConfig, RenderConfig, render_criteria_parallel};
}

// Re-export key types at the crate root
pub use dynsql_query::{
    Criterion, ErrorCode, ParameterValue, PlaceholderStyle, RenderConfig, RenderError,
    RenderOptions, RenderResult, WhereClause, WhereModel,
};
pub use dynsql_query::logging;
