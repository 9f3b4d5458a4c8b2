//! Component definitions
//!
//! The explicit registration API that stands in for annotation scanning:
//! each component type contributes a [`ComponentDef`] — constructor function,
//! injection-slot setters, and route handlers — built through the typed
//! [`ControllerDef`] / [`ServiceDef`] builders and collected in a
//! [`Manifest`] keyed by fully-qualified name.

mod def;
mod manifest;
mod params;
mod slot;

pub use def::{
    AssignFn, Capability, ComponentDef, ComponentKind, ConstructFn, ControllerDef, ExposeFn,
    Instance, InvokeFn, RouteDef, ServiceDef, SlotDef,
};
pub use manifest::{Manifest, ManifestBuilder};
pub use params::{ArgValue, Args, HandlerResult, ParamSpec};
pub use slot::Slot;
