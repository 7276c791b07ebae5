use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One method signature an interface derives from its backing struct
/// (spec.md §8 scenario 6). The oracle supplies the signature text verbatim
/// (parameter list and return tuple); the generator never re-parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterfaceMethod {
    pub name: String,
    pub params: String,
    pub returns: String,
}

impl InterfaceMethod {
    pub fn new(name: impl Into<String>, params: impl Into<String>, returns: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            returns: returns.into(),
        }
    }

    /// `GetUser(id int) (*User, error)`.
    pub fn signature(&self) -> String {
        format!("{}({}) {}", self.name, self.params, self.returns)
    }
}

/// An interface derived from a struct's public methods (spec.md §3,
/// "InterfaceMetadata (with method list)").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterfaceMetadata {
    pub name: String,
    pub struct_name: String,
    pub methods: Vec<InterfaceMethod>,
}

impl InterfaceMetadata {
    pub fn new(name: impl Into<String>, struct_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            struct_name: struct_name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: InterfaceMethod) -> Self {
        self.methods.push(method);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn method_signature_matches_declaration_form() {
        let method = InterfaceMethod::new("GetUser", "id int", "(*User, error)");
        assert_eq!(method.signature(), "GetUser(id int) (*User, error)");
    }
}
