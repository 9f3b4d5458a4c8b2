//! The route table
//!
//! Built once from the wired registry: every controller contributes
//! `collapse_slashes("/" + prefix + "/" + suffix)` per routable method.
//! Registering the same composed path twice replaces the earlier mapping,
//! last write wins.

use crate::component::{ComponentKind, InvokeFn, ParamSpec};
use crate::registry::Registry;
use std::collections::HashMap;

/// Collapse every run of `/` into a single separator.
pub fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Identifies a matched handler: the registry entry that owns the method,
/// the formal-parameter shapes used to synthesize arguments, and the
/// invoker itself.
#[derive(Clone)]
pub struct HandlerRef {
    pub owner_key: String,
    pub params: Vec<ParamSpec>,
    pub invoke: InvokeFn,
}

/// Normalized path → handler, read-only after startup.
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, HandlerRef>,
}

impl RouteTable {
    pub fn build(registry: &Registry) -> Self {
        let mut routes: HashMap<String, HandlerRef> = HashMap::new();
        for component in registry.constructed() {
            let ComponentKind::Controller { prefix } = &component.def.kind else {
                continue;
            };
            let Some(owner_key) = &component.key else {
                continue;
            };
            for route in &component.def.routes {
                let path = collapse_slashes(&format!("/{}/{}", prefix, route.path));
                tracing::info!(path = %path, controller = %component.def.qualified_name, "route mapped");
                if routes
                    .insert(
                        path.clone(),
                        HandlerRef {
                            owner_key: owner_key.clone(),
                            params: route.params.clone(),
                            invoke: route.invoke.clone(),
                        },
                    )
                    .is_some()
                {
                    tracing::debug!(path = %path, "route remapped, last registration wins");
                }
            }
        }
        Self { routes }
    }

    pub fn get(&self, path: &str) -> Option<&HandlerRef> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Mapped paths, sorted, for startup diagnostics.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ControllerDef, Manifest};
    use crate::registry::RegistryBuilder;

    #[derive(Default)]
    struct Api;

    fn build_table(prefix: &str, method_paths: &[&str]) -> RouteTable {
        let mut def = ControllerDef::new("demo.action.Api", Api::default).prefix(prefix);
        for path in method_paths {
            def = def.route(path, vec![], |_c: &Api, _args| Ok(()));
        }
        let manifest = Manifest::builder().component(def.build()).build();
        let registry = RegistryBuilder::new(&manifest).ingest(&["demo.action.Api".to_string()]);
        RouteTable::build(&registry)
    }

    #[test]
    fn collapse_slashes_cases() {
        assert_eq!(collapse_slashes("//a///b"), "/a/b");
        assert_eq!(collapse_slashes("//"), "/");
        assert_eq!(collapse_slashes("/a/b"), "/a/b");
        assert_eq!(collapse_slashes(""), "");
    }

    #[test]
    fn composes_prefix_and_suffix() {
        let table = build_table("a", &["b"]);
        assert!(table.get("/a/b").is_some());
    }

    #[test]
    fn empty_prefix_and_suffix_compose_to_root() {
        let table = build_table("", &[""]);
        assert_eq!(table.len(), 1);
        assert!(table.get("/").is_some());
    }

    #[test]
    fn duplicate_separators_in_markers_collapse() {
        let table = build_table("/a/", &["/b"]);
        assert!(table.get("/a/b").is_some());
    }

    #[test]
    fn same_composed_path_last_registration_wins() {
        use crate::component::Args;
        use std::sync::Mutex;
        use std::sync::Arc;

        let hit: Arc<Mutex<&'static str>> = Arc::new(Mutex::new(""));
        let first = Arc::clone(&hit);
        let second = Arc::clone(&hit);

        let manifest = Manifest::builder()
            .component(
                ControllerDef::new("demo.action.Api", Api::default)
                    .prefix("users")
                    .route("list", vec![], move |_c: &Api, _args| {
                        *first.lock().unwrap() = "first";
                        Ok(())
                    })
                    .route("list", vec![], move |_c: &Api, _args| {
                        *second.lock().unwrap() = "second";
                        Ok(())
                    })
                    .build(),
            )
            .build();
        let registry = RegistryBuilder::new(&manifest).ingest(&["demo.action.Api".to_string()]);
        let table = RouteTable::build(&registry);

        assert_eq!(table.len(), 1);
        let handler = table.get("/users/list").unwrap();
        let owner = registry.get(&handler.owner_key).unwrap();
        (handler.invoke)(owner, &Args::new(vec![])).unwrap();
        assert_eq!(*hit.lock().unwrap(), "second");
    }

    #[test]
    fn non_controller_components_contribute_nothing() {
        let manifest = Manifest::builder().plain("demo.domain.User").build();
        let registry = RegistryBuilder::new(&manifest).ingest(&["demo.domain.User".to_string()]);
        assert!(RouteTable::build(&registry).is_empty());
    }
}
