use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Shared identity carried by every component kind (spec.md §3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Base {
    pub name: String,
    pub struct_name: String,
    pub dependencies: Vec<Dependency>,
}

impl Base {
    pub fn new(name: impl Into<String>, struct_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            struct_name: struct_name.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dep: Dependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = Dependency>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    /// Dependencies that are injected as constructor parameters, i.e. not `is_init`.
    pub fn injected_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|d| !d.is_init)
    }

    pub fn init_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|d| d.is_init)
    }
}

/// One field on a component: either an injected constructor parameter, or,
/// when `is_init` is set, a field zero-initialized inside the generated
/// constructor via the init-expression rule (spec.md §3, §4.E).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Dependency {
    pub field_name: String,
    pub type_name: String,
    pub is_init: bool,
}

impl Dependency {
    pub fn new(field_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            type_name: type_name.into(),
            is_init: false,
        }
    }

    pub fn init(mut self) -> Self {
        self.is_init = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn injected_vs_init_dependencies_partition() {
        let base = Base::new("UserService", "UserService").with_dependencies([
            Dependency::new("Repo", "UserRepository"),
            Dependency::new("cache", "map[string]string").init(),
        ]);
        assert_eq!(base.injected_dependencies().count(), 1);
        assert_eq!(base.init_dependencies().count(), 1);
    }
}
