//! Parse error reporting
//!
//! Validators do not decide what an error looks like to the caller. The
//! schema-construction code supplies a [`ParseErrorFactory`] that turns a
//! [`LexicalError`] into its own error type, and every validator reports
//! through the [`Diagnostics`] wrapping that factory.

use crate::error::{ConfigurationError, LexicalError, NodeRef};
use once_cell::sync::OnceCell;
use std::fmt;

/// Builds the caller's error value from a lexical failure
pub trait ParseErrorFactory {
    /// Error type handed back to validator callers
    type Error;

    /// Convert a lexical failure into the caller's error
    fn parse_error(&self, error: LexicalError) -> Self::Error;
}

impl<F, E> ParseErrorFactory for F
where
    F: Fn(LexicalError) -> E,
{
    type Error = E;

    fn parse_error(&self, error: LexicalError) -> E {
        self(error)
    }
}

/// Error reporting front-end shared by all validators
pub struct Diagnostics<F> {
    factory: F,
}

impl<F: ParseErrorFactory> Diagnostics<F> {
    /// Create diagnostics reporting through `factory`
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Hand a lexical failure to the factory
    pub fn report(&self, error: LexicalError) -> F::Error {
        tracing::debug!(
            node = %error.node,
            kind = ?error.kind,
            lexical_space = error.lexical_space,
            "{}",
            error.message
        );
        self.factory.parse_error(error)
    }

    /// Report that `value` is not in `lexical_space`
    pub fn facet_error(
        &self,
        node: NodeRef,
        value: impl Into<String>,
        lexical_space: &'static str,
    ) -> F::Error {
        self.report(LexicalError::grammar(node, value, lexical_space))
    }

    /// Report a failure with a free-form message
    pub fn resolution_error(
        &self,
        node: NodeRef,
        value: impl Into<String>,
        lexical_space: &'static str,
        message: impl Into<String>,
    ) -> F::Error {
        self.report(LexicalError::resolution(node, value, lexical_space, message))
    }

    /// Report that `value` exceeds a configured limit
    pub fn limit_error(
        &self,
        node: NodeRef,
        value: impl Into<String>,
        lexical_space: &'static str,
        reason: impl fmt::Display,
    ) -> F::Error {
        self.report(LexicalError::limit(node, value, lexical_space, reason))
    }
}

impl<F> fmt::Debug for Diagnostics<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

/// One-time registration point for a [`ParseErrorFactory`]
///
/// For collaborators that only learn their factory after construction. The
/// first [`register`](Self::register) wins; every later attempt fails with
/// [`ConfigurationError::AlreadyRegistered`], even when it passes the same
/// factory again. A slot is an ordinary value owned by whoever wires the
/// lexical layer, never a process global.
pub struct DiagnosticsSlot<F> {
    cell: OnceCell<Diagnostics<F>>,
}

impl<F: ParseErrorFactory> DiagnosticsSlot<F> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Register the factory; only the first call succeeds
    pub fn register(&self, factory: F) -> Result<(), ConfigurationError> {
        self.cell
            .set(Diagnostics::new(factory))
            .map_err(|_| ConfigurationError::AlreadyRegistered)?;
        tracing::debug!("parse error factory registered");
        Ok(())
    }

    /// Registered diagnostics
    pub fn get(&self) -> Result<&Diagnostics<F>, ConfigurationError> {
        self.cell.get().ok_or(ConfigurationError::NotRegistered)
    }

    /// Whether a factory has been registered
    pub fn is_registered(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Take the registered diagnostics out of the slot
    pub fn into_inner(self) -> Result<Diagnostics<F>, ConfigurationError> {
        self.cell.into_inner().ok_or(ConfigurationError::NotRegistered)
    }
}

impl<F: ParseErrorFactory> Default for DiagnosticsSlot<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for DiagnosticsSlot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsSlot")
            .field("registered", &self.cell.get().is_some())
            .finish()
    }
}
