use std::path::PathBuf;

/// Fatal generation errors.
///
/// Every variant halts the run: the generator exists to guarantee agreement between the
/// frontend and backend artifacts, and any detected inconsistency means that guarantee
/// cannot hold.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// A catalogue is not valid KDL.
	#[error("{catalogue}: failed to parse catalogue: {source}")]
	Parse {
		catalogue: String,
		#[source]
		source: kdl::KdlError,
	},

	/// A declaration does not have one of the accepted shapes.
	#[error("{catalogue}: invalid function entry ({reason}):\n\t{declaration}")]
	MalformedDeclaration {
		catalogue: String,
		/// Literal KDL text of the offending declaration.
		declaration: String,
		reason: String,
	},

	/// Two signatures mangled to the same opcode.
	#[error("opcode {opcode} is produced by both {first} and {second}")]
	OpcodeCollision {
		opcode: String,
		first: String,
		second: String,
	},

	/// One alias resolves to two different operators.
	#[error(
		"invalid mapping \"{alias}\" -> {incoming}: there is already a mapping \"{alias}\" -> {existing}"
	)]
	AliasConflict {
		alias: String,
		existing: String,
		incoming: String,
	},

	/// Rendering an artifact into its text buffer failed.
	#[error("failed to render {artifact}")]
	Render {
		artifact: &'static str,
		#[source]
		source: std::fmt::Error,
	},

	/// Two artifacts are configured to be written to the same file.
	#[error("{first} and {second} are both written to {path}")]
	OutputClash {
		path: PathBuf,
		first: &'static str,
		second: &'static str,
	},

	/// The manifest could not be serialized.
	#[error("failed to serialize manifest: {0}")]
	Manifest(#[from] serde_json::Error),

	/// A build-script environment variable is missing.
	#[error("environment variable {var} is not set")]
	Env {
		var: &'static str,
		#[source]
		source: std::env::VarError,
	},

	/// Reading a catalogue or writing an artifact failed.
	#[error("I/O error on {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
}

impl RegistryError {
	pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			error,
		}
	}
}

/// Result type for registry generation.
pub type Result<T> = std::result::Result<T, RegistryError>;
