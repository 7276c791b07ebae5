use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::meta::PackageMetadata;
use crate::resolver::ModuleManifest;

/// The oracle-supplied input to a full generation run: a module manifest
/// plus every package's already-validated metadata (spec.md §6 Inputs).
/// Per-package load failures are accumulated rather than aborting the whole
/// project, so the caller can report every broken package in one pass
/// (spec.md §7 propagation: "diagnostics are accumulated per-package").
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LoadedProject {
    pub manifest: ModuleManifest,
    pub packages: Vec<PackageMetadata>,
    #[serde(skip)]
    #[schemars(skip)]
    pub errors: Vec<GenError>,
}

impl LoadedProject {
    pub fn new(manifest: ModuleManifest) -> Self {
        Self {
            manifest,
            packages: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
