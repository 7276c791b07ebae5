//! Component D — module/path resolver (spec.md §4.D).

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenErrorKind};

/// The subset of the project manifest the resolver needs: the module
/// identifier every generated import path is rooted at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleManifest {
    pub module_identifier: String,
}

impl ModuleManifest {
    pub fn new(module_identifier: impl Into<String>) -> Self {
        Self {
            module_identifier: module_identifier.into(),
        }
    }
}

/// Resolves a project root's module identifier and converts package
/// directories into canonical import paths (spec.md §4.D).
pub struct ModuleResolver {
    root: std::path::PathBuf,
    manifest: ModuleManifest,
}

impl ModuleResolver {
    pub fn new(root: impl Into<std::path::PathBuf>, manifest: ModuleManifest) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    pub fn module_identifier(&self) -> &str {
        &self.manifest.module_identifier
    }

    /// Normalizes `package_dir` to a relative, slash-form suffix of the
    /// module root and prepends the module identifier. A dot-only path
    /// yields the module identifier itself (spec.md §4.D).
    pub fn build_package_path(&self, package_dir: &Path) -> Result<String, GenError> {
        let relative = package_dir.strip_prefix(&self.root).unwrap_or(package_dir);

        let components: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                std::path::Component::CurDir => None,
                other => Some(other.as_os_str().to_string_lossy().into_owned()),
            })
            .collect();

        if components.iter().any(|c| c == "..") {
            return Err(GenError::new(
                GenErrorKind::FileSystem,
                format!(
                    "package directory '{}' escapes the module root",
                    package_dir.display()
                ),
            ));
        }

        if components.is_empty() {
            return Ok(self.manifest.module_identifier.clone());
        }

        Ok(format!("{}/{}", self.manifest.module_identifier, components.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> ModuleResolver {
        ModuleResolver::new("/project", ModuleManifest::new("example.com/app"))
    }

    #[test]
    fn nested_directory_becomes_slash_path() {
        let path = resolver().build_package_path(Path::new("/project/pkg/user")).unwrap();
        assert_eq!(path, "example.com/app/pkg/user");
    }

    #[test]
    fn dot_only_path_yields_module_identifier() {
        let path = resolver().build_package_path(Path::new("/project")).unwrap();
        assert_eq!(path, "example.com/app");

        let path = resolver().build_package_path(Path::new("/project/.")).unwrap();
        assert_eq!(path, "example.com/app");
    }

    #[test]
    fn escaping_path_is_an_error() {
        let err = resolver()
            .build_package_path(Path::new("/project/../outside"))
            .unwrap_err();
        assert_eq!(err.kind, GenErrorKind::FileSystem);
    }
}
