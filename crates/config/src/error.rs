//! Error types for project configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when locating or parsing `opreg.kdl`.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A required field is missing from the configuration.
	#[error("missing required field: {0}")]
	MissingField(String),

	/// A field has the wrong shape or an unknown name.
	#[error("invalid value for {field}: {reason}")]
	InvalidValue {
		field: String,
		reason: String,
	},

	/// No ancestor of the starting directory contains a configuration file.
	#[error("no {file} found in {start} or any parent directory")]
	NotFound {
		file: &'static str,
		start: PathBuf,
	},
}

impl ConfigError {
	pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			reason: reason.into(),
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
