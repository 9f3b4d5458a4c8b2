//! Request dispatch
//!
//! The per-request half of the framework: resolve the normalized path
//! against the route table, synthesize one argument per formal parameter,
//! invoke the handler on its owning registry entry. Runs read-only against
//! the startup snapshot; every failure is absorbed and logged, never
//! propagated past the dispatch boundary.

use crate::component::{ArgValue, Args, ParamSpec};
use crate::registry::Registry;
use crate::route::{RouteTable, collapse_slashes};
use axum::http::Method;
use std::sync::{Arc, Mutex};

/// The inbound request as the dispatcher sees it: method-agnostic (GET and
/// POST route identically), a raw URI path, the deployment context prefix,
/// and the parameter map in insertion order (repeated names append).
pub struct WebRequest {
    method: Method,
    uri_path: String,
    context_path: String,
    params: Vec<(String, Vec<String>)>,
}

impl WebRequest {
    pub fn new(method: Method, uri_path: &str, context_path: &str) -> Self {
        Self {
            method,
            uri_path: uri_path.to_string(),
            context_path: context_path.to_string(),
            params: Vec::new(),
        }
    }

    /// Merge a raw query string (`a=1&b=2&b=3`) into the parameter map.
    /// Values are taken verbatim; a pair without `=` maps to the empty
    /// string.
    pub fn with_query(mut self, query: &str) -> Self {
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            self.add_param(name, value);
        }
        self
    }

    pub fn add_param(&mut self, name: &str, value: &str) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self
                .params
                .push((name.to_string(), vec![value.to_string()])),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri_path(&self) -> &str {
        &self.uri_path
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    pub fn params(&self) -> &[(String, Vec<String>)] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }
}

/// The outbound side: an append-only body writer handlers share with the
/// dispatcher. Internally synchronized; the status surface is fixed at the
/// transport default and never altered by dispatch failures.
#[derive(Default)]
pub struct WebResponse {
    body: Mutex<String>,
}

impl WebResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, chunk: &str) {
        self.body.lock().expect("response body lock").push_str(chunk);
    }

    pub fn body(&self) -> String {
        self.body.lock().expect("response body lock").clone()
    }
}

/// How textual formal parameters are filled from the parameter map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamBinding {
    /// Compatibility behavior: every textual formal receives the rendered
    /// value of the last-iterated parameter entry, whatever the declared
    /// name. Kept faithful to the system this replaces; almost certainly a
    /// latent defect there, so the corrected strategy below can be swapped
    /// in once that call is made.
    #[default]
    LastValue,
    /// Corrected strategy: bind each textual formal by its declared name.
    ByName,
}

impl ParamBinding {
    fn bind(self, declared: Option<&str>, params: &[(String, Vec<String>)]) -> Option<String> {
        match self {
            ParamBinding::LastValue => params.last().map(|(_, values)| render_values(values)),
            ParamBinding::ByName => declared
                .and_then(|name| params.iter().find(|(n, _)| n == name))
                .map(|(_, values)| render_values(values)),
        }
    }
}

/// Render a multi-value parameter the way the dispatcher hands it to
/// handlers: bracketed join, then brackets and all whitespace stripped
/// (`["1", "2"]` → `1,2`, `["42"]` → `42`).
fn render_values(values: &[String]) -> String {
    let raw = format!("[{}]", values.join(", "));
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '[' && *c != ']')
        .collect()
}

/// What a single dispatch pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handler invoked and returned cleanly.
    Handled,
    /// No route matched; literal `404` written, status untouched.
    NotFound,
    /// Route table empty; nothing written, transport default applies.
    PassThrough,
    /// Handler or owner resolution failed; logged and absorbed. The body
    /// holds whatever the handler wrote before failing.
    Failed,
}

/// Per-request resolver over the startup snapshot.
pub struct Dispatcher {
    registry: Arc<Registry>,
    table: Arc<RouteTable>,
    binding: ParamBinding,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, table: Arc<RouteTable>) -> Self {
        Self {
            registry,
            table,
            binding: ParamBinding::default(),
        }
    }

    pub fn with_binding(mut self, binding: ParamBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Resolve and invoke, single pass. Never returns an error: all
    /// failures end in a logged [`DispatchOutcome`].
    pub fn dispatch(&self, request: &WebRequest, response: &WebResponse) -> DispatchOutcome {
        if self.table.is_empty() {
            return DispatchOutcome::PassThrough;
        }

        let stripped = if request.context_path().is_empty() {
            request.uri_path().to_string()
        } else {
            request.uri_path().replace(request.context_path(), "")
        };
        let path = collapse_slashes(&stripped);

        let Some(handler) = self.table.get(&path) else {
            response.write("404");
            return DispatchOutcome::NotFound;
        };

        let values = handler
            .params
            .iter()
            .map(|spec| match spec {
                ParamSpec::Request => ArgValue::Request(request),
                ParamSpec::Response => ArgValue::Response(response),
                ParamSpec::Text { name } => {
                    ArgValue::Text(self.binding.bind(name.as_deref(), request.params()))
                }
                ParamSpec::Other => ArgValue::Absent,
            })
            .collect();
        let args = Args::new(values);

        let Some(owner) = self.registry.get(&handler.owner_key) else {
            tracing::error!(path = %path, owner = %handler.owner_key, "handler owner missing from registry");
            return DispatchOutcome::Failed;
        };
        match (handler.invoke)(owner, &args) {
            Ok(()) => DispatchOutcome::Handled,
            Err(error) => {
                tracing::error!(path = %path, error = %error, "handler invocation failed");
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ControllerDef, Manifest, ParamSpec};
    use crate::registry::RegistryBuilder;

    #[derive(Default)]
    struct Api;

    fn snapshot(def: ControllerDef<Api>) -> (Arc<Registry>, Arc<RouteTable>) {
        let manifest = Manifest::builder().component(def.build()).build();
        let registry = Arc::new(RegistryBuilder::new(&manifest).ingest(&["demo.Api".to_string()]));
        let table = Arc::new(RouteTable::build(&registry));
        (registry, table)
    }

    fn get(path: &str, query: &str) -> WebRequest {
        WebRequest::new(Method::GET, path, "").with_query(query)
    }

    #[test]
    fn empty_table_passes_through() {
        let manifest = Manifest::builder().build();
        let registry = Arc::new(RegistryBuilder::new(&manifest).ingest(&[]));
        let table = Arc::new(RouteTable::build(&registry));
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        let outcome = dispatcher.dispatch(&get("/x/y", ""), &response);
        assert_eq!(outcome, DispatchOutcome::PassThrough);
        assert_eq!(response.body(), "");
    }

    #[test]
    fn unmatched_path_writes_404_body() {
        let def = ControllerDef::new("demo.Api", Api::default).route("ping", vec![], |_c, _a| Ok(()));
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        let outcome = dispatcher.dispatch(&get("/x/y", ""), &response);
        assert_eq!(outcome, DispatchOutcome::NotFound);
        assert_eq!(response.body(), "404");
    }

    #[test]
    fn textual_parameter_is_rendered_without_brackets() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "echo",
            vec![ParamSpec::text("id"), ParamSpec::Response],
            |_c, args| {
                args.response(1).unwrap().write(args.text(0).unwrap_or("-"));
                Ok(())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        assert_eq!(
            dispatcher.dispatch(&get("/echo", "id=42"), &response),
            DispatchOutcome::Handled
        );
        assert_eq!(response.body(), "42");
    }

    #[test]
    fn repeated_parameter_values_join_with_comma() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "echo",
            vec![ParamSpec::text("tag"), ParamSpec::Response],
            |_c, args| {
                args.response(1).unwrap().write(args.text(0).unwrap_or("-"));
                Ok(())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        dispatcher.dispatch(&get("/echo", "tag=1&tag=2"), &response);
        assert_eq!(response.body(), "1,2");
    }

    #[test]
    fn last_value_binding_fills_every_textual_formal() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "pair",
            vec![ParamSpec::text("a"), ParamSpec::text("b"), ParamSpec::Response],
            |_c, args| {
                let resp = args.response(2).unwrap();
                resp.write(args.text(0).unwrap_or("-"));
                resp.write("|");
                resp.write(args.text(1).unwrap_or("-"));
                Ok(())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        dispatcher.dispatch(&get("/pair", "a=1&b=2"), &response);
        // Both formals see the last-iterated entry's value.
        assert_eq!(response.body(), "2|2");
    }

    #[test]
    fn by_name_binding_matches_declared_names() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "pair",
            vec![ParamSpec::text("a"), ParamSpec::text("b"), ParamSpec::Response],
            |_c, args| {
                let resp = args.response(2).unwrap();
                resp.write(args.text(0).unwrap_or("-"));
                resp.write("|");
                resp.write(args.text(1).unwrap_or("-"));
                Ok(())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table).with_binding(ParamBinding::ByName);

        let response = WebResponse::new();
        dispatcher.dispatch(&get("/pair", "a=1&b=2"), &response);
        assert_eq!(response.body(), "1|2");
    }

    #[test]
    fn request_and_other_formals_synthesize() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "inspect",
            vec![ParamSpec::Request, ParamSpec::Other, ParamSpec::Response],
            |_c, args| {
                assert!(args.request(0).is_some());
                assert!(args.text(1).is_none());
                args.response(2).unwrap().write(args.request(0).unwrap().uri_path());
                Ok(())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        dispatcher.dispatch(&get("/inspect", ""), &response);
        assert_eq!(response.body(), "/inspect");
    }

    #[test]
    fn context_path_is_stripped_before_matching() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "ping",
            vec![ParamSpec::Response],
            |_c, args| {
                args.response(0).unwrap().write("pong");
                Ok(())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let request = WebRequest::new(Method::POST, "/app/ping", "/app");
        let response = WebResponse::new();
        assert_eq!(
            dispatcher.dispatch(&request, &response),
            DispatchOutcome::Handled
        );
        assert_eq!(response.body(), "pong");
    }

    #[test]
    fn handler_failure_is_absorbed_and_body_kept() {
        let def = ControllerDef::new("demo.Api", Api::default).route(
            "boom",
            vec![ParamSpec::Response],
            |_c, args| {
                args.response(0).unwrap().write("partial");
                Err("backend unavailable".into())
            },
        );
        let (registry, table) = snapshot(def);
        let dispatcher = Dispatcher::new(registry, table);

        let response = WebResponse::new();
        let outcome = dispatcher.dispatch(&get("/boom", ""), &response);
        assert_eq!(outcome, DispatchOutcome::Failed);
        assert_eq!(response.body(), "partial");
    }
}
