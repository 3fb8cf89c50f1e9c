//! Project configuration for opreg.
//!
//! A project is marked by an `opreg.kdl` file at its root. The file lists the function
//! catalogues in ingestion order and may override artifact locations and the names
//! woven into the generated sources:
//!
//! ```kdl
//! catalogues {
//!     curated "common/function-registry/functions.kdl"
//!     generated "common/function-registry/generated_functions.kdl"
//! }
//!
//! outputs {
//!     interchange "common/thrift/Opcodes.thrift"
//!     backend-registry "be/generated-sources/opcode/opcode-registry-init.cc"
//! }
//!
//! emit {
//!     opcode-enum "TExprOpcode"
//!     java-package "frontend.opcode"
//!     thrift-namespace cpp="backend" java="frontend.thrift"
//!     backend-includes "exprs/opcode-registry.h" "exprs/expr.h"
//!     header "Licensed under the Apache License, Version 2.0"
//! }
//! ```
//!
//! Only `catalogues` is required. Omitted outputs and emit settings keep their defaults.

pub mod error;

use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlNode};
use opreg_registry::{ArtifactKind, Catalogue, EmitOptions, OutputPaths};
use tracing::debug;

pub use error::{ConfigError, Result};

/// Name of the configuration file, which also marks the project root.
pub const CONFIG_FILE: &str = "opreg.kdl";

/// One catalogue in ingestion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueSource {
	/// Label used in diagnostics.
	pub label: String,
	/// Path as written in the config, relative to the project root unless absolute.
	pub path: PathBuf,
}

/// Parsed `opreg.kdl`.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
	/// Directory every relative path is resolved against.
	pub root: PathBuf,
	pub catalogues: Vec<CatalogueSource>,
	pub outputs: OutputPaths,
	pub emit: EmitOptions,
}

impl ProjectConfig {
	/// Parse configuration text for a project rooted at `root`.
	pub fn parse(input: &str, root: impl Into<PathBuf>) -> Result<Self> {
		let doc: KdlDocument = input.parse()?;

		let catalogues = doc
			.get("catalogues")
			.ok_or_else(|| ConfigError::MissingField("catalogues".into()))
			.and_then(parse_catalogues)?;

		let root = root.into();
		let mut outputs = OutputPaths::default();
		if let Some(node) = doc.get("outputs") {
			parse_outputs(node, &mut outputs)?;
		}
		if let Some((first, second, path)) = outputs.find_clash(&root) {
			return Err(ConfigError::invalid(
				format!("outputs.{second}"),
				format!("{} is already the destination of {first}", path.display()),
			));
		}

		let mut emit = EmitOptions::default();
		if let Some(node) = doc.get("emit") {
			parse_emit(node, &mut emit)?;
		}

		for node in doc.nodes() {
			let name = node.name().value();
			if !matches!(name, "catalogues" | "outputs" | "emit") {
				return Err(ConfigError::invalid(name, "unknown section"));
			}
		}

		Ok(Self {
			root,
			catalogues,
			outputs,
			emit,
		})
	}

	/// Load configuration from a file. Its directory becomes the project root.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
		let config = Self::parse(&content, root)?;
		debug!(
			path = %path.display(),
			catalogues = config.catalogues.len(),
			"loaded project config"
		);
		Ok(config)
	}

	/// Locate the project root from `start` and load its configuration.
	pub fn discover(start: &Path) -> Result<Self> {
		let root = find_project_root(start)?;
		Self::load(root.join(CONFIG_FILE))
	}

	/// Absolute path of a catalogue.
	pub fn catalogue_path(&self, source: &CatalogueSource) -> PathBuf {
		self.root.join(&source.path)
	}

	/// Read and parse every catalogue, in configured order.
	pub fn load_catalogues(&self) -> opreg_registry::Result<Vec<Catalogue>> {
		self.catalogues
			.iter()
			.map(|source| Catalogue::load(source.label.as_str(), &self.catalogue_path(source)))
			.collect()
	}
}

/// Walks up from `start` to the nearest directory containing [`CONFIG_FILE`].
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
	let abs = start.canonicalize().map_err(|e| ConfigError::Io {
		path: start.to_path_buf(),
		error: e,
	})?;
	let start_dir = if abs.is_file() {
		abs.parent().unwrap_or(&abs).to_path_buf()
	} else {
		abs
	};

	let mut current = start_dir.as_path();
	loop {
		if current.join(CONFIG_FILE).is_file() {
			return Ok(current.to_path_buf());
		}
		match current.parent() {
			Some(parent) => current = parent,
			None => break,
		}
	}

	Err(ConfigError::NotFound {
		file: CONFIG_FILE,
		start: start_dir,
	})
}

fn parse_catalogues(node: &KdlNode) -> Result<Vec<CatalogueSource>> {
	let children = node.children().map(|c| c.nodes()).unwrap_or_default();
	let mut catalogues: Vec<CatalogueSource> = Vec::with_capacity(children.len());
	for child in children {
		let label = child.name().value();
		if catalogues.iter().any(|c| c.label == label) {
			return Err(ConfigError::invalid(
				format!("catalogues.{label}"),
				"duplicate catalogue label",
			));
		}
		catalogues.push(CatalogueSource {
			label: label.to_string(),
			path: PathBuf::from(single_string(child, &format!("catalogues.{label}"))?),
		});
	}
	if catalogues.is_empty() {
		return Err(ConfigError::invalid("catalogues", "at least one catalogue is required"));
	}
	Ok(catalogues)
}

fn parse_outputs(node: &KdlNode, outputs: &mut OutputPaths) -> Result<()> {
	for child in node.children().map(|c| c.nodes()).unwrap_or_default() {
		let key = child.name().value();
		let field = format!("outputs.{key}");
		let kind = ArtifactKind::from_key(key)
			.ok_or_else(|| ConfigError::invalid(&field, "unknown artifact"))?;
		outputs.set(kind, single_string(child, &field)?);
	}
	Ok(())
}

fn parse_emit(node: &KdlNode, emit: &mut EmitOptions) -> Result<()> {
	for child in node.children().map(|c| c.nodes()).unwrap_or_default() {
		let key = child.name().value();
		let field = format!("emit.{key}");
		match key {
			"header" => emit.header.extend(strings(child, &field)?),
			"opcode-enum" => emit.opcode_enum = single_string(child, &field)?,
			"operator-enum" => emit.operator_enum = single_string(child, &field)?,
			"registry-class" => emit.registry_class = single_string(child, &field)?,
			"registry-type" => emit.registry_type = single_string(child, &field)?,
			"column-type" => emit.column_type = single_string(child, &field)?,
			"java-package" => emit.java_package = single_string(child, &field)?,
			"thrift-namespace" => {
				if let Some(arg) = child.entries().iter().find(|e| e.name().is_none()) {
					return Err(ConfigError::invalid(
						field,
						format!("expected cpp= and java= properties, found {}", arg.value()),
					));
				}
				if let Some(cpp) = property(child, "cpp", &field)? {
					emit.thrift_cpp_namespace = cpp;
				}
				if let Some(java) = property(child, "java", &field)? {
					emit.thrift_java_namespace = java;
				}
			}
			"frontend-imports" => emit.frontend_imports = strings(child, &field)?,
			"backend-namespace" => emit.backend_namespace = single_string(child, &field)?,
			"backend-includes" => emit.backend_includes = strings(child, &field)?,
			"backend-init" => emit.backend_init = single_string(child, &field)?,
			"compute-fn" => emit.compute_fn = single_string(child, &field)?,
			"no-symbol" => emit.no_symbol = single_string(child, &field)?,
			_ => return Err(ConfigError::invalid(field, "unknown setting")),
		}
	}
	Ok(())
}

fn strings(node: &KdlNode, field: &str) -> Result<Vec<String>> {
	node.entries()
		.iter()
		.map(|entry| {
			if entry.name().is_some() {
				return Err(ConfigError::invalid(field, "expected positional values"));
			}
			entry
				.value()
				.as_string()
				.map(String::from)
				.ok_or_else(|| ConfigError::invalid(field, format!("expected a string, found {}", entry.value())))
		})
		.collect()
}

fn single_string(node: &KdlNode, field: &str) -> Result<String> {
	let mut values = strings(node, field)?;
	match values.len() {
		1 => Ok(values.remove(0)),
		0 => Err(ConfigError::MissingField(field.to_string())),
		n => Err(ConfigError::invalid(field, format!("expected one value, found {n}"))),
	}
}

fn property(node: &KdlNode, key: &str, field: &str) -> Result<Option<String>> {
	node.get(key)
		.map(|value| {
			value
				.as_string()
				.map(String::from)
				.ok_or_else(|| ConfigError::invalid(format!("{field}.{key}"), "expected a string"))
		})
		.transpose()
}
