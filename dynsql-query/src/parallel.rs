//! Data-parallel rendering of top-level criteria.
//!
//! Top-level criteria are split into contiguous chunks. Before any worker
//! starts, each chunk gets its own slice of the parameter sequence, sized by
//! [`Criterion::parameter_count`], so workers never share a counter and the
//! keys they produce are exactly the ones a sequential pass would produce.
//! Chunk results are folded back in chunk order, never completion order.
//!
//! ```rust
//! use dynsql_query::column::SqlColumn;
//! use dynsql_query::condition::is_equal_to;
//! use dynsql_query::criterion::{self, Criterion};
//! use dynsql_query::parallel::{ParallelConfig, render_criteria_parallel};
//! use dynsql_query::render::{RenderOptions, render_with_options};
//!
//! let id: SqlColumn<i32> = SqlColumn::of("id");
//! let criteria: Vec<Criterion> = (0..64)
//!     .map(|n| criterion::or(&id, is_equal_to(n)))
//!     .collect();
//!
//! let options = RenderOptions::new();
//! let parallel = ParallelConfig::new(4, 8);
//!
//! let fanned_out = render_criteria_parallel(&criteria, &options, &parallel).unwrap();
//! let sequential = render_with_options(&criteria, &options).unwrap();
//! assert_eq!(fanned_out, sequential);
//! ```

use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::criterion::Criterion;
use crate::error::{RenderError, RenderResult};
use crate::fragment::FragmentCollector;
use crate::render::{CriteriaRenderer, RenderOptions, WhereClause, render_with_options};
use crate::sequence::ParameterSequence;

/// Worker limits for [`render_criteria_parallel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Upper bound on worker threads.
    pub max_workers: usize,
    /// Fewest top-level criteria worth handing to one worker.
    pub min_criteria_per_worker: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            min_criteria_per_worker: 8,
        }
    }
}

impl ParallelConfig {
    /// Create a config with explicit limits.
    pub fn new(max_workers: usize, min_criteria_per_worker: usize) -> Self {
        Self {
            max_workers,
            min_criteria_per_worker,
        }
    }

    /// Number of workers to use for `criteria` top-level criteria.
    pub fn worker_count(&self, criteria: usize) -> usize {
        if criteria == 0 {
            return 0;
        }
        let by_size = criteria / self.min_criteria_per_worker.max(1);
        by_size.clamp(1, self.max_workers.max(1))
    }
}

struct Chunk<'c> {
    criteria: &'c [Criterion],
    keys: ParameterSequence,
    first: bool,
}

fn render_chunk(chunk: Chunk<'_>, options: &RenderOptions) -> RenderResult<FragmentCollector> {
    let reserved_from = chunk.keys.peek();
    let mut renderer =
        CriteriaRenderer::new(chunk.keys, &options.placeholder, options.qualify_columns);
    let mut collector = FragmentCollector::new();
    let mut reserved = 0;
    for (index, criterion) in chunk.criteria.iter().enumerate() {
        collector.add(renderer.render_top_level(criterion, chunk.first && index == 0)?)?;
        reserved += criterion.parameter_count();
    }
    debug_assert_eq!(renderer.into_keys().peek(), reserved_from + reserved);
    Ok(collector)
}

/// Render top-level criteria on scoped worker threads.
///
/// The result is identical to [`render_with_options`] on the same input.
/// Small inputs (fewer than two workers' worth) are rendered inline.
pub fn render_criteria_parallel(
    criteria: &[Criterion],
    options: &RenderOptions,
    parallel: &ParallelConfig,
) -> RenderResult<WhereClause> {
    let workers = parallel.worker_count(criteria.len());
    if workers <= 1 {
        return render_with_options(criteria, options);
    }

    let chunk_size = criteria.len().div_ceil(workers);
    let mut sequence = options.sequence()?;
    let chunks: Vec<Chunk<'_>> = criteria
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, slice)| Chunk {
            criteria: slice,
            keys: sequence.reserve(slice.iter().map(Criterion::parameter_count).sum()),
            first: index == 0,
        })
        .collect();
    let chunk_count = chunks.len();

    let results: Vec<RenderResult<FragmentCollector>> = thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| scope.spawn(move || render_chunk(chunk, options)))
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(RenderError::worker_panicked(worker)))
            })
            .collect()
    });

    let collector = results
        .into_iter()
        .try_fold(FragmentCollector::new(), |acc, next| acc.merge(next?))?;

    debug!(
        criteria = criteria.len(),
        workers = chunk_count,
        parameters = collector.parameters().len(),
        "rendered criteria in parallel"
    );
    Ok(WhereClause::from_collector(collector, options.where_keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::SqlColumn;
    use crate::condition::{is_between, is_equal_to, is_in, is_null};
    use crate::criterion::{and, or};
    use crate::placeholder::PlaceholderStyle;
    use pretty_assertions::assert_eq;

    fn mixed_criteria(count: usize) -> Vec<Criterion> {
        let id: SqlColumn<i64> = SqlColumn::of("id");
        let score: SqlColumn<i64> = SqlColumn::of("score");
        (0..count as i64)
            .map(|n| match n % 4 {
                0 => or(&id, is_equal_to(n)),
                1 => and(&score, is_between(n, n + 10)),
                2 => and(&id, is_in(vec![n, n + 1, n + 2]).unwrap())
                    .with_sub_criterion(or(&score, is_null())),
                _ => or(&score, is_null()),
            })
            .collect()
    }

    #[test]
    fn test_worker_count() {
        let config = ParallelConfig::new(4, 8);
        assert_eq!(config.worker_count(0), 0);
        assert_eq!(config.worker_count(5), 1);
        assert_eq!(config.worker_count(16), 2);
        assert_eq!(config.worker_count(1000), 4);
        assert_eq!(ParallelConfig::new(0, 0).worker_count(3), 1);
    }

    #[test]
    fn test_matches_sequential_render() {
        let criteria = mixed_criteria(101);
        let options = RenderOptions::new().with_placeholder(PlaceholderStyle::Colon);

        let sequential = render_with_options(&criteria, &options).unwrap();
        for workers in [2, 3, 7, 16] {
            let parallel = ParallelConfig::new(workers, 1);
            let rendered = render_criteria_parallel(&criteria, &options, &parallel).unwrap();
            assert_eq!(rendered, sequential);
        }
    }

    #[test]
    fn test_parameter_order_follows_tree_order() {
        let criteria = mixed_criteria(40);
        let options = RenderOptions::new();
        let rendered =
            render_criteria_parallel(&criteria, &options, &ParallelConfig::new(8, 1)).unwrap();

        let keys: Vec<String> = rendered.parameters().keys().cloned().collect();
        let expected: Vec<String> = (1..=keys.len()).map(|n| format!("p{}", n)).collect();
        assert_eq!(keys, expected);
        assert!(rendered.clause().starts_with("where id = {parameters.p1} and score between"));
    }

    #[test]
    fn test_grouped_criterion_at_chunk_start() {
        let criteria = mixed_criteria(4);
        let options = RenderOptions::new().with_placeholder(PlaceholderStyle::Colon);
        let rendered =
            render_criteria_parallel(&criteria, &options, &ParallelConfig::new(2, 1)).unwrap();
        assert_eq!(
            rendered.clause(),
            "where id = :p1 and score between :p2 and :p3 \
             and (id in (:p4, :p5, :p6) or score is null) or score is null"
        );
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let options = RenderOptions {
            parameter_tag: "p2".into(),
            ..RenderOptions::default()
        };
        let err =
            render_criteria_parallel(&mixed_criteria(40), &options, &ParallelConfig::new(4, 1))
                .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_small_input_renders_inline() {
        let criteria = mixed_criteria(3);
        let options = RenderOptions::new();
        let rendered =
            render_criteria_parallel(&criteria, &options, &ParallelConfig::default()).unwrap();
        assert_eq!(rendered, render_with_options(&criteria, &options).unwrap());
    }

    #[test]
    fn test_empty_input() {
        let rendered =
            render_criteria_parallel(&[], &RenderOptions::new(), &ParallelConfig::new(4, 1))
                .unwrap();
        assert!(rendered.is_empty());
    }
}
