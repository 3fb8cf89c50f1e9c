//! Build-script support.
//!
//! Lets a downstream crate regenerate the registry artifacts from its `build.rs`:
//!
//! ```no_run
//! use opreg_registry::EmitOptions;
//! use opreg_registry::compile::BuildCtx;
//!
//! let ctx = BuildCtx::from_env().unwrap();
//! ctx.generate(&[("curated", "functions.kdl")], &EmitOptions::default()).unwrap();
//! ```

use std::env;
use std::path::{Path, PathBuf};

use crate::catalogue::Catalogue;
use crate::emit::EmitOptions;
use crate::error::{RegistryError, Result};
use crate::output::{OutputPaths, WriteReport, write_all};
use crate::pipeline::{Generated, generate};

pub struct BuildCtx {
	pub manifest_dir: PathBuf,
	pub out_dir: PathBuf,
}

impl BuildCtx {
	pub fn new(manifest_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
		Self {
			manifest_dir: manifest_dir.into(),
			out_dir: out_dir.into(),
		}
	}

	/// Reads `CARGO_MANIFEST_DIR` and `OUT_DIR` as set by cargo for build scripts.
	pub fn from_env() -> Result<Self> {
		Ok(Self::new(var("CARGO_MANIFEST_DIR")?, var("OUT_DIR")?))
	}

	pub fn asset(&self, rel: impl AsRef<Path>) -> PathBuf {
		self.manifest_dir.join(rel)
	}

	pub fn rerun_if_changed(&self, path: &Path) {
		println!("cargo:rerun-if-changed={}", path.display());
	}

	/// Loads the `(label, path)` catalogues in order, relative to the manifest directory.
	pub fn load_catalogues(&self, sources: &[(&str, &str)]) -> Result<Vec<Catalogue>> {
		sources
			.iter()
			.map(|(label, rel)| {
				let path = self.asset(rel);
				self.rerun_if_changed(&path);
				Catalogue::load(*label, &path)
			})
			.collect()
	}

	/// Generates all four artifacts into `OUT_DIR` under their default file names.
	pub fn generate(&self, sources: &[(&str, &str)], options: &EmitOptions) -> Result<(Generated, WriteReport)> {
		let catalogues = self.load_catalogues(sources)?;
		let generated = generate(&catalogues, options)?;
		let report = write_all(&self.out_dir, &OutputPaths::flat(&self.out_dir), &generated.artifacts)?;
		Ok((generated, report))
	}
}

fn var(name: &'static str) -> Result<String> {
	env::var(name).map_err(|source| RegistryError::Env { var: name, source })
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;
	use crate::emit::ArtifactKind;

	#[test]
	fn generates_into_out_dir() {
		let manifest = tempfile::tempdir().unwrap();
		let out = tempfile::tempdir().unwrap();
		fs::write(
			manifest.path().join("functions.kdl"),
			r#"
			function "abs" {
				returns "DOUBLE"
				args "DOUBLE"
				backend "MathFunctions::Abs"
				aliases "abs"
			}
			"#,
		)
		.unwrap();

		let ctx = BuildCtx::new(manifest.path(), out.path());
		let (generated, report) = ctx
			.generate(&[("curated", "functions.kdl")], &EmitOptions::default())
			.unwrap();

		assert_eq!(generated.resolved.opcodes.assigned(), ["ABS"]);
		assert_eq!(report.written.len(), 4);
		for kind in [ArtifactKind::Interchange, ArtifactKind::BackendRegistry] {
			assert!(out.path().join(kind.file_name()).is_file());
		}
	}

	#[test]
	fn missing_catalogue_is_an_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let ctx = BuildCtx::new(dir.path(), dir.path());
		let err = ctx.load_catalogues(&[("curated", "absent.kdl")]).unwrap_err();
		assert!(matches!(err, RegistryError::Io { .. }));
	}
}
