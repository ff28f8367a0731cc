//! Placeholder syntax.
//!
//! The rendering engine only decides parameter keys; how a key appears inside
//! SQL text is chosen by the caller through a [`PlaceholderStyle`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sequence::KeySource;

/// A function turning a parameter key into placeholder text.
pub type PlaceholderFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Placeholder syntax embedded in rendered fragments.
#[derive(Clone, Default)]
pub enum PlaceholderStyle {
    /// MyBatis map binding: `{parameters.p1}`.
    #[default]
    MyBatis,
    /// Colon-prefixed named parameter: `:p1`.
    Colon,
    /// At-sign named parameter: `@p1`.
    At,
    /// Caller-supplied formatter.
    Custom(PlaceholderFormatter),
}

impl PlaceholderStyle {
    /// Create a style from a formatting function.
    pub fn custom<F>(formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(formatter))
    }

    /// Format a key as placeholder text.
    pub fn format(&self, key: &str) -> String {
        match self {
            Self::MyBatis => format!("{{parameters.{}}}", key),
            Self::Colon => format!(":{}", key),
            Self::At => format!("@{}", key),
            Self::Custom(formatter) => formatter(key),
        }
    }
}

impl fmt::Debug for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MyBatis => write!(f, "MyBatis"),
            Self::Colon => write!(f, "Colon"),
            Self::At => write!(f, "At"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Built-in placeholder styles selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    /// `{parameters.p1}`
    #[default]
    MyBatis,
    /// `:p1`
    Colon,
    /// `@p1`
    At,
}

impl From<PlaceholderKind> for PlaceholderStyle {
    fn from(kind: PlaceholderKind) -> Self {
        match kind {
            PlaceholderKind::MyBatis => Self::MyBatis,
            PlaceholderKind::Colon => Self::Colon,
            PlaceholderKind::At => Self::At,
        }
    }
}

/// A freshly allocated parameter key together with its placeholder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Key in the parameter map.
    pub key: String,
    /// Text embedded in the fragment.
    pub text: String,
}

/// Pairs a key source with a placeholder style.
#[derive(Debug)]
pub struct PlaceholderFactory<'a, S> {
    keys: S,
    style: &'a PlaceholderStyle,
}

impl<'a, S: KeySource> PlaceholderFactory<'a, S> {
    /// Create a factory.
    pub fn new(keys: S, style: &'a PlaceholderStyle) -> Self {
        Self { keys, style }
    }

    /// Allocate the next placeholder.
    pub fn next_placeholder(&mut self) -> Placeholder {
        let key = self.keys.next_key();
        let text = self.style.format(&key);
        Placeholder { key, text }
    }

    /// Give back the key source.
    pub fn into_keys(self) -> S {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::ParameterSequence;

    #[test]
    fn test_builtin_styles() {
        assert_eq!(PlaceholderStyle::MyBatis.format("p1"), "{parameters.p1}");
        assert_eq!(PlaceholderStyle::Colon.format("p1"), ":p1");
        assert_eq!(PlaceholderStyle::At.format("up2"), "@up2");
    }

    #[test]
    fn test_custom_style() {
        let style = PlaceholderStyle::custom(|key| format!("#{{{},jdbcType=INTEGER}}", key));
        assert_eq!(style.format("p3"), "#{p3,jdbcType=INTEGER}");
        assert_eq!(format!("{:?}", style), "Custom(..)");
    }

    #[test]
    fn test_factory_advances_sequence() {
        let style = PlaceholderStyle::Colon;
        let mut factory = PlaceholderFactory::new(ParameterSequence::new("p").unwrap(), &style);
        let first = factory.next_placeholder();
        let second = factory.next_placeholder();

        assert_eq!(first, Placeholder { key: "p1".into(), text: ":p1".into() });
        assert_eq!(second.key, "p2");
        assert_eq!(factory.into_keys().peek(), 3);
    }

    #[test]
    fn test_kind_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: PlaceholderKind,
        }
        let w: Wrapper = toml::from_str("kind = \"colon\"").unwrap();
        assert_eq!(w.kind, PlaceholderKind::Colon);
        let w: Wrapper = toml::from_str("kind = \"mybatis\"").unwrap();
        assert_eq!(w.kind, PlaceholderKind::MyBatis);
    }
}
