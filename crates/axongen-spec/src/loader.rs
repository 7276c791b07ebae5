//! Fixture-based project loader (SPEC_FULL.md §6).
//!
//! The real annotation scanner — walking Go source, understanding comment
//! syntax, reflecting on struct fields — is explicitly out of scope
//! (spec.md §1). What axongen actually consumes is the oracle's output: a
//! `ModuleManifest` plus one already-validated `PackageMetadata` per
//! package. This loader reads that output from a directory tree of JSON
//! fixture files, the shape any real front end would emit: walk with
//! `walkdir`, accumulate per-file errors instead of aborting on the first
//! one.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::common::SourceLocation;
use crate::error::{GenError, GenErrorKind};
use crate::meta::PackageMetadata;
use crate::project::LoadedProject;
use crate::resolver::ModuleManifest;

const MANIFEST_FILE: &str = "axon.module.json";
const PACKAGE_META_FILE: &str = "package.meta.json";
const RAW_ANNOTATIONS_FILE: &str = "annotations.raw.json";

/// One raw annotation line as it would arrive from a real scanner
/// (spec.md §6 wire format), used by `axongen validate` to exercise
/// component A directly instead of assuming pre-validated metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawAnnotationFixture {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub text: String,
}

impl RawAnnotationFixture {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.file.clone(), self.line, self.column)
    }
}

/// Load the project manifest from `<root>/axon.module.json`. Fatal: a
/// project with no resolvable module identifier cannot generate anything
/// (spec.md §4.D "Resolver failures surface a diagnostic with the
/// offending directory").
pub fn load_manifest(root: &Path) -> Result<ModuleManifest, GenError> {
    let path = root.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        GenError::new(
            GenErrorKind::FileSystem,
            format!("failed to read module manifest '{}': {e}", path.display()),
        )
    })?;
    serde_json::from_str(&content).map_err(|e| {
        GenError::new(
            GenErrorKind::FileSystem,
            format!("failed to parse module manifest '{}': {e}", path.display()),
        )
    })
}

/// Walk `root` collecting every `package.meta.json`, parsing each into a
/// `PackageMetadata`. Per-file parse failures are accumulated on
/// `LoadedProject::errors` rather than aborting the whole load, per spec.md
/// §7's per-package diagnostic accumulation.
pub fn load_project(root: &Path) -> Result<LoadedProject, GenError> {
    if !root.is_dir() {
        return Err(GenError::new(
            GenErrorKind::FileSystem,
            format!("project directory not found: '{}'", root.display()),
        ));
    }

    let manifest = load_manifest(root)?;
    let mut project = LoadedProject::new(manifest);

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name() == PACKAGE_META_FILE)
    {
        let path = entry.path();
        match load_package_metadata(path) {
            Ok(package) => project.packages.push(package),
            Err(err) => project.errors.push(err),
        }
    }

    // Deterministic emission order: sort by package_dir (spec.md §9
    // "sorting for determinism" applies to the loader's own ordering too,
    // since a directory walk's order is filesystem-dependent).
    project.packages.sort_by(|a, b| a.package_dir.cmp(&b.package_dir));

    Ok(project)
}

fn load_package_metadata(path: &Path) -> Result<PackageMetadata, GenError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        GenError::new(
            GenErrorKind::FileSystem,
            format!("failed to read '{}': {e}", path.display()),
        )
    })?;
    serde_json::from_str(&content).map_err(|e| {
        GenError::new(
            GenErrorKind::Generation,
            format!("failed to parse '{}': {e}", path.display()),
        )
    })
}

/// Load `<package_dir>/annotations.raw.json`, if present, for callers that
/// want to exercise component A (the schema validator) directly rather
/// than assume pre-validated metadata (spec.md §6).
pub fn load_raw_annotations(package_dir: &Path) -> Result<Vec<RawAnnotationFixture>, GenError> {
    let path = package_dir.join(RAW_ANNOTATIONS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| {
        GenError::new(
            GenErrorKind::FileSystem,
            format!("failed to read '{}': {e}", path.display()),
        )
    })?;
    serde_json::from_str(&content).map_err(|e| {
        GenError::new(
            GenErrorKind::AnnotationSyntax,
            format!("failed to parse '{}': {e}", path.display()),
        )
    })
}

/// Where generated output for `package` should be written
/// (spec.md §6 Outputs: `<package_dir>/autogen_module.<ext>`).
pub fn autogen_module_path(project_root: &Path, package: &PackageMetadata, ext: &str) -> PathBuf {
    project_root.join(&package.package_dir).join(format!("autogen_module.{ext}"))
}
