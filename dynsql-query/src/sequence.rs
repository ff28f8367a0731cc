//! Parameter key generation.
//!
//! Keys are the tag followed by a counter that starts at 1: `p1`, `p2`, ...
//! A render pass owns one [`ParameterSequence`], or shares a
//! [`SharedSequence`] between threads. Two sequences with different tags can
//! feed the same statement without colliding, provided neither tag ends in a
//! digit: `p` and `p1` would both produce `p11`.

use std::sync::atomic::{AtomicUsize, Ordering};

use smol_str::SmolStr;

use crate::error::{RenderError, RenderResult};

/// Check that `tag` can prefix a counter without ambiguity.
///
/// The tag must be non-empty and must not end in an ASCII digit.
pub fn validate_tag(tag: &str) -> RenderResult<()> {
    if tag.is_empty() {
        return Err(RenderError::invalid_config("parameter tag must not be empty")
            .with_suggestion("Use a short prefix such as \"p\""));
    }
    if tag.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(RenderError::invalid_config(format!(
            "parameter tag '{}' must not end in a digit",
            tag
        ))
        .with_parameter_key(tag)
        .with_suggestion("Keys are the tag followed by a number, so a trailing digit makes them ambiguous"));
    }
    Ok(())
}

/// A source of unique parameter keys.
pub trait KeySource {
    /// Produce the next key. Every call advances the sequence exactly once.
    fn next_key(&mut self) -> String;
}

/// An exclusively owned, monotonically increasing key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSequence {
    tag: SmolStr,
    next: usize,
}

impl ParameterSequence {
    /// Create a sequence whose first key is `{tag}1`.
    pub fn new(tag: impl Into<SmolStr>) -> RenderResult<Self> {
        Self::starting_at(tag, 1)
    }

    /// Create a sequence whose first key is `{tag}{start}`.
    pub fn starting_at(tag: impl Into<SmolStr>, start: usize) -> RenderResult<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;
        Ok(Self { tag, next: start })
    }

    /// Get the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The counter value the next key will use.
    pub fn peek(&self) -> usize {
        self.next
    }

    /// Split off a slice of `count` keys.
    ///
    /// The returned sequence starts where this one currently is; this one
    /// skips ahead past the slice. Slices never overlap, so they can be handed
    /// to independent workers.
    pub fn reserve(&mut self, count: usize) -> ParameterSequence {
        let slice = Self {
            tag: self.tag.clone(),
            next: self.next,
        };
        self.next += count;
        slice
    }
}

impl KeySource for ParameterSequence {
    fn next_key(&mut self) -> String {
        let key = format!("{}{}", self.tag, self.next);
        self.next += 1;
        key
    }
}

/// A thread-safe key sequence backed by an atomic counter.
///
/// Keys stay unique across threads, but their order then follows allocation
/// order rather than tree order. Use [`ParameterSequence::reserve`] when
/// placeholder numbering must be reproducible.
#[derive(Debug)]
pub struct SharedSequence {
    tag: SmolStr,
    counter: AtomicUsize,
}

impl SharedSequence {
    /// Create a shared sequence whose first key is `{tag}1`.
    pub fn new(tag: impl Into<SmolStr>) -> RenderResult<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;
        Ok(Self {
            tag,
            counter: AtomicUsize::new(1),
        })
    }

    /// Allocate the next key.
    pub fn allocate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.tag, n)
    }

    /// The counter value the next key will use.
    pub fn peek(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}

impl KeySource for &SharedSequence {
    fn next_key(&mut self) -> String {
        self.allocate()
    }
}
