// SPDX-License-Identifier: MIT

//! Concrete `ActionModuleRegistry`/`DomeModuleRegistry` implementations:
//! name -> constructor lookup tables, populated at daemon startup (spec §9
//! "Dynamic module resolution").

use std::collections::BTreeMap;
use std::sync::Arc;

use obs_core::error::BackendError;
use obs_core::{Action, ActionModuleRegistry, ActionParamSchema, DomeModuleRegistry};
use serde_json::Value;

use crate::dome::DomeBackend;

type ActionConstructor = Arc<dyn Fn(&Value) -> Result<Box<dyn Action>, String> + Send + Sync>;

/// An `ActionModuleRegistry` built from an explicit name -> (schema,
/// constructor) table, supplied at startup.
#[derive(Clone, Default)]
pub struct StaticActionRegistry {
    entries: BTreeMap<String, (ActionParamSchema, ActionConstructor)>,
}

impl StaticActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        action_type: impl Into<String>,
        schema: ActionParamSchema,
        constructor: impl Fn(&Value) -> Result<Box<dyn Action>, String> + Send + Sync + 'static,
    ) {
        self.entries.insert(action_type.into(), (schema, Arc::new(constructor)));
    }
}

impl ActionModuleRegistry for StaticActionRegistry {
    fn schema_for(&self, action_type: &str) -> Option<ActionParamSchema> {
        self.entries.get(action_type).map(|(schema, _)| schema.clone())
    }

    fn construct(&self, action_type: &str, params: &Value) -> Result<Box<dyn Action>, String> {
        let (_, constructor) = self
            .entries
            .get(action_type)
            .ok_or_else(|| format!("unknown action type '{action_type}'"))?;
        constructor(params)
    }
}

type DomeConstructor = Arc<dyn Fn(&Value) -> Result<Box<dyn DomeBackend>, BackendError> + Send + Sync>;

/// A `DomeModuleRegistry` built from an explicit name -> constructor table.
#[derive(Clone, Default)]
pub struct StaticDomeRegistry {
    entries: BTreeMap<String, DomeConstructor>,
}

impl StaticDomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        module: impl Into<String>,
        constructor: impl Fn(&Value) -> Result<Box<dyn DomeBackend>, BackendError> + Send + Sync + 'static,
    ) {
        self.entries.insert(module.into(), Arc::new(constructor));
    }

    pub fn construct(&self, module: &str, settings: &Value) -> Result<Box<dyn DomeBackend>, BackendError> {
        let constructor = self
            .entries
            .get(module)
            .ok_or_else(|| BackendError::Unreachable(format!("unknown dome module '{module}'")))?;
        constructor(settings)
    }
}

impl DomeModuleRegistry for StaticDomeRegistry {
    fn is_registered(&self, module: &str) -> bool {
        self.entries.contains_key(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obs_core::test_support::FakeAction;

    #[test]
    fn registered_action_type_constructs() {
        let mut registry = StaticActionRegistry::new();
        registry.register("noop", ActionParamSchema::default(), |_| Ok(Box::new(FakeAction::new("noop"))));
        assert!(registry.is_registered("noop"));
        assert!(registry.construct("noop", &Value::Null).is_ok());
    }

    #[test]
    fn unregistered_action_type_is_an_error() {
        let registry = StaticActionRegistry::new();
        assert!(!registry.is_registered("ghost"));
        assert!(registry.construct("ghost", &Value::Null).is_err());
    }

    #[test]
    fn registered_dome_module_constructs() {
        use crate::dome::fake::FakeDomeBackend;
        let mut registry = StaticDomeRegistry::new();
        registry.register("fake_dome", |_| Ok(Box::new(FakeDomeBackend::new(obs_core::DomeStatus::Closed))));
        assert!(registry.is_registered("fake_dome"));
        assert!(registry.construct("fake_dome", &Value::Null).is_ok());
    }
}
