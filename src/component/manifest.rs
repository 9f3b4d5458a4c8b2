use super::def::ComponentDef;
use std::collections::HashMap;

/// The set of component definitions the scanner's output is resolved
/// against, keyed by fully-qualified name.
///
/// A scanned name with no manifest entry is an isolated load failure; an
/// entry marked plain is skipped silently.
#[derive(Default, Clone)]
pub struct Manifest {
    defs: HashMap<String, ComponentDef>,
}

impl Manifest {
    pub fn builder() -> ManifestBuilder {
        ManifestBuilder::default()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ComponentDef> {
        self.defs.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Fluent collector for component definitions.
#[derive(Default)]
pub struct ManifestBuilder {
    defs: HashMap<String, ComponentDef>,
}

impl ManifestBuilder {
    /// Register a definition under its qualified name. A later definition
    /// with the same name replaces the earlier one.
    pub fn component(mut self, def: ComponentDef) -> Self {
        self.defs.insert(def.qualified_name.clone(), def);
        self
    }

    /// Register a loadable-but-unmanaged type.
    pub fn plain(self, qualified_name: &str) -> Self {
        self.component(ComponentDef::plain(qualified_name))
    }

    pub fn build(self) -> Manifest {
        Manifest { defs: self.defs }
    }
}
