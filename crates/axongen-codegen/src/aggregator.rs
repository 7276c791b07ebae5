//! Component H — root aggregator (spec.md §4.H).

use axongen_spec::error::{GenError, GenErrorKind};

/// One sub-package contributing to the root aggregation file.
#[derive(Debug, Clone)]
pub struct SubModule {
    pub package_name: String,
    pub import_path: String,
    pub module_variable: String,
}

impl SubModule {
    pub fn new(package_name: impl Into<String>, import_path: impl Into<String>, module_variable: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            import_path: import_path.into(),
            module_variable: module_variable.into(),
        }
    }
}

/// Emits the top-level module file composing every sub-module's module
/// variable. Empty input is an error (spec.md §4.H, §8 boundary behaviors).
pub fn generate_root_module(top_level_package: &str, sub_modules: &[SubModule]) -> Result<String, GenError> {
    if sub_modules.is_empty() {
        return Err(GenError::new(
            GenErrorKind::Generation,
            "root aggregator requires at least one sub-module",
        ));
    }

    let mut sorted = sub_modules.to_vec();
    sorted.sort_by(|a, b| a.import_path.cmp(&b.import_path));

    let mut out = String::new();
    out.push_str("// Code generated by axongen. DO NOT EDIT.\n\n");
    out.push_str(&format!("package {top_level_package}\n\n"));

    out.push_str("import (\n\t\"github.com/axonkit/axon\"\n\n");
    for sub in &sorted {
        out.push_str(&format!("\t\"{}\"\n", sub.import_path));
    }
    out.push_str(")\n\n");

    out.push_str(&format!("var Module = axon.Module(\n\t\"{top_level_package}\",\n"));
    for sub in &sorted {
        let base = sub.import_path.rsplit('/').next().unwrap_or(&sub.import_path);
        out.push_str(&format!("\t{base}.{},\n", sub.module_variable));
    }
    out.push_str(")\n");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_sub_module_list_is_an_error() {
        let err = generate_root_module("root", &[]).unwrap_err();
        assert_eq!(err.kind, GenErrorKind::Generation);
    }

    #[test]
    fn composes_every_sub_module() {
        let subs = vec![
            SubModule::new("user", "example.com/app/pkg/user", "Module"),
            SubModule::new("billing", "example.com/app/pkg/billing", "Module"),
        ];
        let text = generate_root_module("app", &subs).unwrap();
        assert!(text.contains("package app"));
        assert!(text.contains("user.Module,"));
        assert!(text.contains("billing.Module,"));
        assert!(text.contains("\"example.com/app/pkg/billing\""));
    }

    #[test]
    fn sub_modules_are_sorted_by_import_path_for_determinism() {
        let subs = vec![
            SubModule::new("zeta", "example.com/app/pkg/zeta", "Module"),
            SubModule::new("alpha", "example.com/app/pkg/alpha", "Module"),
        ];
        let text = generate_root_module("app", &subs).unwrap();
        assert!(text.find("pkg/alpha").unwrap() < text.find("pkg/zeta").unwrap());
    }
}
