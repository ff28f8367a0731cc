//! Configuration file parsing for `dynsql.toml`.
//!
//! ```toml
//! parameter_tag = "p"
//! placeholder = "colon"
//! qualify_columns = true
//! where_keyword = true
//!
//! [parallel]
//! max_workers = 4
//! min_criteria_per_worker = 16
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::parallel::ParallelConfig;
use crate::placeholder::PlaceholderKind;
use crate::render::RenderOptions;
use crate::sequence::validate_tag;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "dynsql.toml";

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Prefix for generated parameter keys.
    #[serde(default = "default_parameter_tag")]
    pub parameter_tag: String,

    /// Placeholder syntax.
    #[serde(default)]
    pub placeholder: PlaceholderKind,

    /// Qualify columns with their table alias.
    #[serde(default = "default_true")]
    pub qualify_columns: bool,

    /// Prefix non-empty clauses with `where `.
    #[serde(default = "default_true")]
    pub where_keyword: bool,

    /// Worker limits for parallel rendering.
    #[serde(default)]
    pub parallel: ParallelConfig,
}

fn default_parameter_tag() -> String {
    "p".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            parameter_tag: default_parameter_tag(),
            placeholder: PlaceholderKind::default(),
            qualify_columns: true,
            where_keyword: true,
            parallel: ParallelConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Load and validate configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::config_io(path.display().to_string(), e))?;
        let config: Self = content.parse()?;
        debug!(path = %path.display(), "loaded render configuration");
        Ok(config)
    }

    /// Check field values serde cannot check.
    pub fn validate(&self) -> RenderResult<()> {
        validate_tag(&self.parameter_tag)?;
        if self.parallel.max_workers == 0 {
            return Err(RenderError::invalid_config(
                "parallel.max_workers must be at least 1",
            ));
        }
        if self.parallel.min_criteria_per_worker == 0 {
            return Err(RenderError::invalid_config(
                "parallel.min_criteria_per_worker must be at least 1",
            ));
        }
        Ok(())
    }

    /// Build render options from this configuration.
    ///
    /// The tag is checked when a render pass starts its sequence.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            parameter_tag: self.parameter_tag.as_str().into(),
            placeholder: self.placeholder.into(),
            qualify_columns: self.qualify_columns,
            where_keyword: self.where_keyword,
        }
    }
}

impl FromStr for RenderConfig {
    type Err = RenderError;

    /// Parse and validate configuration from a TOML string.
    fn from_str(content: &str) -> RenderResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
