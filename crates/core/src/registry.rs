// SPDX-License-Identifier: MIT

//! Registries for dynamically-named action and dome backend modules
//! (spec §9 "Dynamic module resolution"): config-time name -> constructor
//! lookup, replacing the reference's runtime string-based import.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::action::Action;

/// The shape of a single action parameter, for schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl ParamType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Bool => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

/// Parameter schema for one action type.
#[derive(Debug, Clone, Default)]
pub struct ActionParamSchema {
    pub required: BTreeMap<String, ParamType>,
    pub optional: BTreeMap<String, ParamType>,
}

impl ActionParamSchema {
    /// Validate a parameter object against this schema, collecting every
    /// violation rather than stopping at the first.
    pub fn validate(&self, params: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        let obj = match params.as_object() {
            Some(obj) => obj,
            None => {
                errors.push("parameters must be a JSON object".to_string());
                return errors;
            }
        };
        for (name, ty) in &self.required {
            match obj.get(name) {
                None => errors.push(format!("missing required parameter '{name}'")),
                Some(v) if !ty.matches(v) => {
                    errors.push(format!("parameter '{name}' has the wrong type (expected {ty:?})"))
                }
                _ => {}
            }
        }
        for (name, ty) in &self.optional {
            if let Some(v) = obj.get(name) {
                if !ty.matches(v) {
                    errors.push(format!("parameter '{name}' has the wrong type (expected {ty:?})"));
                }
            }
        }
        errors
    }
}

/// Registry of action types resolvable by the `actions_module` config key.
pub trait ActionModuleRegistry: Send + Sync {
    /// Parameter schema for a registered action type, or `None` if unknown.
    fn schema_for(&self, action_type: &str) -> Option<ActionParamSchema>;

    /// Construct a new action instance from its type name and parameters.
    fn construct(&self, action_type: &str, params: &Value) -> Result<Box<dyn Action>, String>;

    /// Whether `action_type` is a registered action.
    fn is_registered(&self, action_type: &str) -> bool {
        self.schema_for(action_type).is_some()
    }
}

/// Registry of dome backend modules resolvable by `dome.module`.
pub trait DomeModuleRegistry: Send + Sync {
    fn is_registered(&self, module: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_param_missing_is_an_error() {
        let mut schema = ActionParamSchema::default();
        schema.required.insert("ra".to_string(), ParamType::Number);
        let errors = schema.validate(&json!({}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("ra"));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let mut schema = ActionParamSchema::default();
        schema.required.insert("ra".to_string(), ParamType::Number);
        let errors = schema.validate(&json!({"ra": "not a number"}));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn satisfied_schema_has_no_errors() {
        let mut schema = ActionParamSchema::default();
        schema.required.insert("ra".to_string(), ParamType::Number);
        schema.optional.insert("label".to_string(), ParamType::String);
        assert!(schema.validate(&json!({"ra": 1.0})).is_empty());
        assert!(schema.validate(&json!({"ra": 1.0, "label": "m31"})).is_empty());
    }
}
