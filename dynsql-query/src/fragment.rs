//! Rendered fragments and their parameters.
//!
//! Parameter maps are [`IndexMap`]s, so iteration order follows the order
//! placeholders were requested.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::error;

use crate::error::{RenderError, RenderResult};
use crate::value::ParameterValue;

/// Parameter key to bound value.
pub type Parameters = IndexMap<String, ParameterValue>;

fn insert_unique(parameters: &mut Parameters, key: String, value: ParameterValue) -> RenderResult<()> {
    match parameters.entry(key) {
        Entry::Occupied(entry) => {
            error!(key = %entry.key(), "duplicate parameter key generated");
            Err(RenderError::key_collision(entry.key().clone()))
        }
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

/// One rendered snippet plus the parameters it binds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FragmentAndParameters {
    fragment: String,
    parameters: Parameters,
}

impl FragmentAndParameters {
    /// Create a fragment that binds nothing.
    pub fn without_parameters(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            parameters: Parameters::new(),
        }
    }

    /// Start collecting parameters for a fragment.
    pub fn builder() -> FragmentAndParametersBuilder {
        FragmentAndParametersBuilder::default()
    }

    /// Rewrite the fragment text, keeping the parameters.
    pub fn map_fragment(self, f: impl FnOnce(String) -> String) -> Self {
        Self {
            fragment: f(self.fragment),
            parameters: self.parameters,
        }
    }

    /// Get the fragment text.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Get the parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Split into fragment and parameters.
    pub fn into_parts(self) -> (String, Parameters) {
        (self.fragment, self.parameters)
    }
}

/// Accumulates parameter entries while a fragment is being rendered.
#[derive(Debug, Default)]
pub struct FragmentAndParametersBuilder {
    entries: Vec<(String, ParameterValue)>,
}

impl FragmentAndParametersBuilder {
    /// Record one parameter.
    pub fn parameter(&mut self, key: impl Into<String>, value: ParameterValue) -> &mut Self {
        self.entries.push((key.into(), value));
        self
    }

    /// Number of recorded parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no parameter was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach the rendered text. Fails if two recorded keys coincide.
    pub fn build(self, fragment: impl Into<String>) -> RenderResult<FragmentAndParameters> {
        let mut parameters = Parameters::with_capacity(self.entries.len());
        for (key, value) in self.entries {
            insert_unique(&mut parameters, key, value)?;
        }
        Ok(FragmentAndParameters {
            fragment: fragment.into(),
            parameters,
        })
    }
}

/// Ordered fragments plus one merged parameter map.
///
/// Fragment order is clause order. Merging appends, so folds must run
/// left to right even when the parts were rendered out of order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FragmentCollector {
    fragments: Vec<String>,
    parameters: Parameters,
}

impl FragmentCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and its parameters.
    pub fn add(&mut self, part: FragmentAndParameters) -> RenderResult<()> {
        let (fragment, parameters) = part.into_parts();
        self.fragments.push(fragment);
        self.extend_parameters(parameters)
    }

    /// Append `other`'s fragments after this collector's and take its parameters.
    pub fn merge(mut self, other: FragmentCollector) -> RenderResult<Self> {
        self.fragments.extend(other.fragments);
        self.extend_parameters(other.parameters)?;
        Ok(self)
    }

    /// Collect parts into a new collector, preserving iteration order.
    pub fn collect<I>(parts: I) -> RenderResult<Self>
    where
        I: IntoIterator<Item = FragmentAndParameters>,
    {
        parts.into_iter().try_fold(Self::new(), |mut collector, part| {
            collector.add(part)?;
            Ok(collector)
        })
    }

    /// Fold collectors left to right.
    pub fn merge_all<I>(collectors: I) -> RenderResult<Self>
    where
        I: IntoIterator<Item = FragmentCollector>,
    {
        collectors
            .into_iter()
            .try_fold(Self::new(), |acc, next| acc.merge(next))
    }

    fn extend_parameters(&mut self, parameters: Parameters) -> RenderResult<()> {
        self.parameters.reserve(parameters.len());
        for (key, value) in parameters {
            insert_unique(&mut self.parameters, key, value)?;
        }
        Ok(())
    }

    /// Get the fragments, in clause order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Get the merged parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Check whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join the fragments with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.fragments.join(separator)
    }

    /// Split into fragments and parameters.
    pub fn into_parts(self) -> (Vec<String>, Parameters) {
        (self.fragments, self.parameters)
    }

    /// Collapse into a single fragment joined with `separator`.
    pub fn into_fragment(self, separator: &str) -> FragmentAndParameters {
        FragmentAndParameters {
            fragment: self.fragments.join(separator),
            parameters: self.parameters,
        }
    }
}
