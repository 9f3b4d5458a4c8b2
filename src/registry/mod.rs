//! The instantiation registry
//!
//! Consumes the scanner's name sequence against the manifest and produces
//! the container: string key → live instance. Construction happens exactly
//! once per type; an unnamed service is re-exposed under each of its
//! capability names, all sharing the one instance. Built once at startup and
//! read-only thereafter.

use crate::component::{ComponentDef, ComponentKind, ConstructFn, Instance, Manifest};
use crate::error::{Result, WirefrontError};
use std::collections::HashMap;
use std::sync::Arc;

/// One constructed component: its definition, the key its concrete handle
/// was registered under (none for capability-only services), and the handle
/// itself. The wirer and route-table builder iterate these.
pub struct Constructed {
    pub def: ComponentDef,
    pub key: Option<String>,
    pub holder: Instance,
}

/// The startup-built, immutable instance store.
pub struct Registry {
    entries: HashMap<String, Instance>,
    constructed: Vec<Constructed>,
    load_failures: Vec<String>,
}

impl Registry {
    pub fn get(&self, key: &str) -> Option<&Instance> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn constructed(&self) -> &[Constructed] {
        &self.constructed
    }

    /// Scanned names that resolved to no loadable definition. Each was
    /// logged and skipped; the build itself never aborts over them.
    pub fn load_failures(&self) -> &[String] {
        &self.load_failures
    }

    /// Typed lookup: downcast the entry under `key` to `Arc<T>`.
    ///
    /// `T` may be a trait object; entries are stored as `Arc<dyn Any>`
    /// wrapping `Arc<T>`, so the downcast targets the sized inner `Arc`.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| WirefrontError::DependencyNotFound {
                key: key.to_string(),
            })?;
        entry
            .clone()
            .downcast::<Arc<T>>()
            .map(|wrapper| wrapper.as_ref().clone())
            .map_err(|_| WirefrontError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }
}

/// Builds the registry from scanned names.
pub struct RegistryBuilder<'a> {
    manifest: &'a Manifest,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self { manifest }
    }

    /// Resolve and instantiate each scanned name. Failures are isolated:
    /// a name that does not load is logged and skipped, never fatal.
    pub fn ingest(self, names: &[String]) -> Registry {
        let mut entries: HashMap<String, Instance> = HashMap::new();
        let mut constructed = Vec::new();
        let mut load_failures = Vec::new();

        for name in names {
            let Some(def) = self.manifest.get(name) else {
                tracing::warn!(type_name = %name, "scanned type failed to load, skipping");
                load_failures.push(name.clone());
                continue;
            };
            match &def.kind {
                ComponentKind::Plain => {}
                ComponentKind::Controller { .. } => {
                    let Some(holder) = construct(def, &mut load_failures) else {
                        continue;
                    };
                    let key = lower_first(def.simple_name());
                    insert(&mut entries, key.clone(), holder.clone());
                    constructed.push(Constructed {
                        def: def.clone(),
                        key: Some(key),
                        holder,
                    });
                }
                ComponentKind::Service { name: Some(bean) } => {
                    let Some(holder) = construct(def, &mut load_failures) else {
                        continue;
                    };
                    insert(&mut entries, bean.clone(), holder.clone());
                    constructed.push(Constructed {
                        def: def.clone(),
                        key: Some(bean.clone()),
                        holder,
                    });
                }
                ComponentKind::Service { name: None } => {
                    // Registered only through its capability views; with no
                    // capabilities there is nothing to construct.
                    if def.capabilities.is_empty() {
                        continue;
                    }
                    let Some(holder) = construct(def, &mut load_failures) else {
                        continue;
                    };
                    for capability in &def.capabilities {
                        match (capability.expose)(&holder) {
                            Some(view) => {
                                insert(&mut entries, capability.qualified_name.clone(), view);
                            }
                            None => tracing::warn!(
                                type_name = %def.qualified_name,
                                capability = %capability.qualified_name,
                                "capability cast failed, entry not registered"
                            ),
                        }
                    }
                    constructed.push(Constructed {
                        def: def.clone(),
                        key: None,
                        holder,
                    });
                }
            }
        }

        tracing::info!(
            entries = entries.len(),
            instances = constructed.len(),
            failures = load_failures.len(),
            "registry built"
        );
        Registry {
            entries,
            constructed,
            load_failures,
        }
    }
}

fn construct(def: &ComponentDef, load_failures: &mut Vec<String>) -> Option<Instance> {
    let ctor: &ConstructFn = match &def.construct {
        Some(ctor) => ctor,
        None => {
            tracing::warn!(type_name = %def.qualified_name, "definition has no constructor, skipping");
            load_failures.push(def.qualified_name.clone());
            return None;
        }
    };
    Some(ctor())
}

fn insert(entries: &mut HashMap<String, Instance>, key: String, value: Instance) {
    if entries.insert(key.clone(), value).is_some() {
        // Last registration wins, by design of the container.
        tracing::debug!(key = %key, "registry entry overwritten");
    }
}

/// Lower-camel-case a simple type name: `UserController` → `userController`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ControllerDef, ServiceDef};

    #[derive(Default)]
    struct UserController;

    trait Greet: Send + Sync {
        fn hello(&self) -> &'static str;
    }

    trait Farewell: Send + Sync {}

    #[derive(Default)]
    struct GreetService;

    impl Greet for GreetService {
        fn hello(&self) -> &'static str {
            "hi"
        }
    }

    impl Farewell for GreetService {}

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn controller_keyed_by_lower_camel_simple_name() {
        let manifest = Manifest::builder()
            .component(ControllerDef::new("demo.action.UserController", UserController::default).build())
            .build();
        let registry = RegistryBuilder::new(&manifest).ingest(&names(&["demo.action.UserController"]));
        assert!(registry.contains_key("userController"));
        assert!(registry.resolve::<UserController>("userController").is_ok());
    }

    #[test]
    fn named_service_keyed_by_explicit_name() {
        let manifest = Manifest::builder()
            .component(
                ServiceDef::new("demo.service.GreetService", GreetService::default)
                    .named("greeter")
                    .build(),
            )
            .build();
        let registry = RegistryBuilder::new(&manifest).ingest(&names(&["demo.service.GreetService"]));
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve::<GreetService>("greeter").is_ok());
    }

    #[test]
    fn unnamed_service_shares_one_instance_across_capabilities() {
        let manifest = Manifest::builder()
            .component(
                ServiceDef::new("demo.service.GreetService", GreetService::default)
                    .exposes::<dyn Greet>("demo.service.Greet", |c| c as Arc<dyn Greet>)
                    .exposes::<dyn Farewell>("demo.service.Farewell", |c| c as Arc<dyn Farewell>)
                    .build(),
            )
            .build();
        let registry = RegistryBuilder::new(&manifest).ingest(&names(&["demo.service.GreetService"]));

        // No entry under the concrete name, one per capability.
        assert_eq!(registry.len(), 2);
        assert!(!registry.contains_key("greetService"));
        let greet = registry.resolve::<dyn Greet>("demo.service.Greet").unwrap();
        let farewell = registry.resolve::<dyn Farewell>("demo.service.Farewell").unwrap();
        assert_eq!(greet.hello(), "hi");
        assert!(std::ptr::addr_eq(
            Arc::as_ptr(&greet),
            Arc::as_ptr(&farewell)
        ));
    }

    #[test]
    fn unresolvable_name_is_isolated() {
        let manifest = Manifest::builder()
            .component(ControllerDef::new("demo.action.UserController", UserController::default).build())
            .build();
        let registry = RegistryBuilder::new(&manifest)
            .ingest(&names(&["demo.Ghost", "demo.action.UserController"]));
        assert_eq!(registry.load_failures(), &["demo.Ghost".to_string()]);
        assert!(registry.contains_key("userController"));
    }

    #[test]
    fn plain_types_skip_without_failure() {
        let manifest = Manifest::builder().plain("demo.domain.User").build();
        let registry = RegistryBuilder::new(&manifest).ingest(&names(&["demo.domain.User"]));
        assert!(registry.is_empty());
        assert!(registry.load_failures().is_empty());
    }

    #[test]
    fn duplicate_key_last_registration_wins() {
        // Two controller types sharing a simple name collide on the key.
        #[derive(Default)]
        struct Second;
        let manifest = Manifest::builder()
            .component(ControllerDef::new("demo.a.UserController", UserController::default).build())
            .component(ControllerDef::new("demo.b.UserController", Second::default).build())
            .build();
        let registry = RegistryBuilder::new(&manifest)
            .ingest(&names(&["demo.a.UserController", "demo.b.UserController"]));
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve::<Second>("userController").is_ok());
        assert!(registry.resolve::<UserController>("userController").is_err());
    }

    #[test]
    fn lower_first_cases() {
        assert_eq!(lower_first("UserController"), "userController");
        assert_eq!(lower_first("X"), "x");
        assert_eq!(lower_first(""), "");
    }
}
