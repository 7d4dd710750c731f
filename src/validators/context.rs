//! Lexical validation context
//!
//! Everything a validator needs besides the attribute itself: where errors
//! go and which limits apply. A context is immutable once built and can be
//! shared between threads whenever its factory can.

use crate::error::NodeRef;
use crate::limits::Limits;
use crate::validators::exceptions::{Diagnostics, ParseErrorFactory};

/// Diagnostics and limits for lexical validation
#[derive(Debug)]
pub struct LexicalContext<F> {
    diagnostics: Diagnostics<F>,
    limits: Limits,
}

impl<F: ParseErrorFactory> LexicalContext<F> {
    /// Create a context reporting through `factory`, with default limits
    pub fn new(factory: F) -> Self {
        Self::with_limits(factory, Limits::default())
    }

    /// Create a context with explicit limits
    pub fn with_limits(factory: F, limits: Limits) -> Self {
        Self::from_diagnostics(Diagnostics::new(factory), limits)
    }

    /// Create a context from already-built diagnostics
    pub fn from_diagnostics(diagnostics: Diagnostics<F>, limits: Limits) -> Self {
        Self { diagnostics, limits }
    }

    /// Error reporting
    pub fn diagnostics(&self) -> &Diagnostics<F> {
        &self.diagnostics
    }

    /// Active limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Fail with a limit error unless `value` fits the length limit
    pub(crate) fn check_length(
        &self,
        node: impl FnOnce() -> NodeRef,
        value: &str,
        lexical_space: &'static str,
    ) -> Result<(), F::Error> {
        self.limits
            .check_value_length(value.chars().count())
            .map_err(|e| self.diagnostics.limit_error(node(), value, lexical_space, e))
    }
}
