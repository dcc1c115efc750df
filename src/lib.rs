//! Kaula Library
//!
//! Kaula provides a fixed-bucket associative table with separate chaining and
//! snapshot iteration, together with the configuration, error handling and
//! logging support used by the `kaula` binary.
//!
//! # Architecture
//!
//! - `data_structures`: the associative table and its snapshot iterators
//! - `config`: layered configuration (defaults, file, environment)
//! - `error`: crate-wide error type and error reporting

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Kaula.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function
pub fn init() -> error::KaulaResult<()> {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));

    config::init_default_config()?;

    Ok(())
}
