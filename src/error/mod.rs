//! Error module for Kaula.
//!
//! This module provides the error handling framework for the application,
//! with explicit error types, propagation through `?`, and context
//! information for reporting.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

use crate::data_structures::associative_table::AssociativeTableError;

pub mod config;

/// Result type alias used throughout Kaula.
pub type KaulaResult<T> = Result<T, KaulaError>;

/// Core error enum for Kaula.
#[derive(Error, Debug)]
pub enum KaulaError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by associative table operations.
    #[error("Table error: {0}")]
    Table(#[from] AssociativeTableError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors serializing configuration to TOML.
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: KaulaError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: KaulaError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// Error reporter that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Holder for the process-wide error reporter.
#[derive(Debug, Default)]
pub struct ErrorReporting {
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl ErrorReporting {
    /// Set the error reporter.
    pub fn set_reporter(&mut self, reporter: Arc<dyn ErrorReporter>) {
        self.reporter = Some(reporter);
    }

    /// Report an error with context.
    ///
    /// Falls back to standard error when no reporter is configured.
    pub fn report(&self, context: ErrorContext) {
        if let Some(reporter) = &self.reporter {
            reporter.report(context);
        } else {
            eprintln!("Error: {context}");
        }
    }
}

static ERROR_REPORTING: Lazy<RwLock<ErrorReporting>> =
    Lazy::new(|| RwLock::new(ErrorReporting::default()));

/// Report an error through the global error reporter.
pub fn report_error(context: ErrorContext) {
    ERROR_REPORTING.read().report(context);
}

/// Set the global error reporter.
///
/// # Arguments
///
/// * `reporter` - The error reporter to use
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
    ERROR_REPORTING.write().set_reporter(reporter);
}
