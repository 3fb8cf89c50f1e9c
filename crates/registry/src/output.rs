//! Artifact output.
//!
//! Each artifact is written through a temporary file in its destination directory and
//! renamed into place, so a failed run never leaves a half-written artifact behind. An
//! artifact whose bytes already match the file on disk is not rewritten, which keeps
//! modification times stable for downstream build systems.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::emit::{Artifact, ArtifactKind};
use crate::error::{RegistryError, Result};

/// Destination of every artifact, relative to the project root unless absolute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
	paths: FxHashMap<ArtifactKind, PathBuf>,
}

impl Default for OutputPaths {
	fn default() -> Self {
		Self {
			paths: ArtifactKind::iter().map(|kind| (kind, kind.default_path())).collect(),
		}
	}
}

impl OutputPaths {
	/// Places every artifact directly in `dir` under its default file name.
	pub fn flat(dir: &Path) -> Self {
		Self {
			paths: ArtifactKind::iter().map(|kind| (kind, dir.join(kind.file_name()))).collect(),
		}
	}

	pub fn set(&mut self, kind: ArtifactKind, path: impl Into<PathBuf>) {
		self.paths.insert(kind, path.into());
	}

	pub fn get(&self, kind: ArtifactKind) -> PathBuf {
		self.paths.get(&kind).cloned().unwrap_or_else(|| kind.default_path())
	}

	/// Absolute destination of `kind` under `root`.
	pub fn resolve(&self, root: &Path, kind: ArtifactKind) -> PathBuf {
		root.join(self.get(kind))
	}

	/// First pair of artifacts, in artifact order, that resolve to the same file under
	/// `root`. Paths are compared after lexical normalization.
	pub fn find_clash(&self, root: &Path) -> Option<(ArtifactKind, ArtifactKind, PathBuf)> {
		let mut seen: FxHashMap<PathBuf, ArtifactKind> = FxHashMap::default();
		for kind in ArtifactKind::iter() {
			let path = normalize_path(&self.resolve(root, kind));
			if let Some(&first) = seen.get(&path) {
				return Some((first, kind, path));
			}
			seen.insert(path, kind);
		}
		None
	}

	/// Fails if two artifacts share a destination.
	pub fn validate(&self, root: &Path) -> Result<()> {
		match self.find_clash(root) {
			Some((first, second, path)) => Err(RegistryError::OutputClash {
				path,
				first: first.key(),
				second: second.key(),
			}),
			None => Ok(()),
		}
	}
}

/// Drops `.` components and folds `..` into its parent without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir if normalized.file_name().is_some() => {
				normalized.pop();
			}
			other => normalized.push(other),
		}
	}
	normalized
}

/// What a write pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
	pub written: Vec<PathBuf>,
	pub unchanged: Vec<PathBuf>,
}

/// Whether [`write_artifact`] replaced the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
	Written,
	Unchanged,
}

/// Writes `contents` to `path` atomically, creating parent directories as needed.
pub fn write_artifact(path: &Path, contents: &str) -> Result<WriteOutcome> {
	match fs::read(path) {
		Ok(existing) if existing == contents.as_bytes() => {
			debug!(path = %path.display(), "artifact unchanged");
			return Ok(WriteOutcome::Unchanged);
		}
		Ok(_) => {}
		Err(e) if e.kind() == io::ErrorKind::NotFound => {}
		Err(e) => return Err(RegistryError::io(path, e)),
	}

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	fs::create_dir_all(dir).map_err(|e| RegistryError::io(dir, e))?;

	let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RegistryError::io(dir, e))?;
	tmp.write_all(contents.as_bytes())
		.map_err(|e| RegistryError::io(tmp.path(), e))?;
	tmp.persist(path).map_err(|e| RegistryError::io(path, e.error))?;

	debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
	Ok(WriteOutcome::Written)
}

/// Writes every artifact to its configured destination under `root`.
///
/// Nothing is written if two artifacts share a destination.
pub fn write_all(root: &Path, paths: &OutputPaths, artifacts: &[Artifact]) -> Result<WriteReport> {
	paths.validate(root)?;
	let mut report = WriteReport::default();
	for artifact in artifacts {
		let path = paths.resolve(root, artifact.kind);
		match write_artifact(&path, &artifact.contents)? {
			WriteOutcome::Written => report.written.push(path),
			WriteOutcome::Unchanged => report.unchanged.push(path),
		}
	}
	info!(
		written = report.written.len(),
		unchanged = report.unchanged.len(),
		"artifacts written"
	);
	Ok(report)
}
