use super::params::{Args, HandlerResult, ParamSpec};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type-erased shared component instance.
///
/// Every instance is stored as `Arc<dyn Any>` wrapping an inner `Arc<T>`
/// (`T` concrete or `dyn Trait`), so one construction can sit behind several
/// registry keys and trait-typed entries stay downcastable: resolving always
/// means `downcast::<Arc<T>>` and cloning the inner `Arc`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Zero-argument constructor producing a fresh erased instance.
pub type ConstructFn = Arc<dyn Fn() -> Instance + Send + Sync>;

/// Fills one injection slot: (holder, dependency) -> did the types line up.
pub type AssignFn = Arc<dyn Fn(&Instance, &Instance) -> bool + Send + Sync>;

/// Re-exposes a concrete instance under a capability (trait) view.
pub type ExposeFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// Invokes a route handler on its owning instance with synthesized args.
pub type InvokeFn = Arc<dyn Fn(&Instance, &Args) -> HandlerResult + Send + Sync>;

/// How a type participates in the container.
#[derive(Clone)]
pub enum ComponentKind {
    /// Routable; registered under the lower-camel-cased simple name.
    Controller { prefix: String },
    /// Injectable; registered under its explicit name, or under every
    /// exposed capability name when unnamed.
    Service { name: Option<String> },
    /// Loadable but unmanaged; the registry builder skips it silently.
    Plain,
}

/// A capability (interface) view an unnamed service is registered under.
#[derive(Clone)]
pub struct Capability {
    pub qualified_name: String,
    pub expose: ExposeFn,
}

/// One injection slot: where to write and which key to look up.
///
/// The computed lookup key is the explicit key when present, else the
/// slot's declared-type key.
#[derive(Clone)]
pub struct SlotDef {
    pub field: &'static str,
    pub explicit_key: Option<String>,
    pub type_key: String,
    pub assign: AssignFn,
}

impl SlotDef {
    pub fn key(&self) -> &str {
        self.explicit_key.as_deref().unwrap_or(&self.type_key)
    }
}

/// One routable method: path suffix, formal-parameter shapes, invoker.
#[derive(Clone)]
pub struct RouteDef {
    pub path: String,
    pub params: Vec<ParamSpec>,
    pub invoke: InvokeFn,
}

/// The erased definition of one component type.
#[derive(Clone)]
pub struct ComponentDef {
    pub qualified_name: String,
    pub kind: ComponentKind,
    pub construct: Option<ConstructFn>,
    pub capabilities: Vec<Capability>,
    pub slots: Vec<SlotDef>,
    pub routes: Vec<RouteDef>,
}

impl ComponentDef {
    /// The simple (unqualified) type name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn plain(qualified_name: &str) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            kind: ComponentKind::Plain,
            construct: None,
            capabilities: Vec::new(),
            slots: Vec::new(),
            routes: Vec::new(),
        }
    }
}

fn erase_construct<C: Send + Sync + 'static>(
    construct: impl Fn() -> C + Send + Sync + 'static,
) -> ConstructFn {
    Arc::new(move || Arc::new(Arc::new(construct())) as Instance)
}

fn erase_assign<C, D>(set: impl Fn(&C, Arc<D>) + Send + Sync + 'static) -> AssignFn
where
    C: Send + Sync + 'static,
    D: ?Sized + Send + Sync + 'static,
{
    Arc::new(move |holder: &Instance, dep: &Instance| {
        match (holder.downcast_ref::<Arc<C>>(), dep.downcast_ref::<Arc<D>>()) {
            (Some(holder), Some(dep)) => {
                set(holder, Arc::clone(dep));
                true
            }
            _ => false,
        }
    })
}

/// Typed builder for a controller definition.
///
/// # Example
/// ```ignore
/// ControllerDef::new("demo.action.UserController", UserController::default)
///     .prefix("")
///     .wires("user_service", None, "demo.service.UserService", |c: &UserController, dep| {
///         c.user_service.set(dep);
///     })
///     .route("getUser", vec![ParamSpec::text("id"), ParamSpec::Response], |c, args| {
///         c.get_user(args.text(0), args.response(1))
///     })
///     .build()
/// ```
pub struct ControllerDef<C> {
    qualified_name: String,
    prefix: String,
    construct: ConstructFn,
    slots: Vec<SlotDef>,
    routes: Vec<RouteDef>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Send + Sync + 'static> ControllerDef<C> {
    pub fn new(qualified_name: &str, construct: impl Fn() -> C + Send + Sync + 'static) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            prefix: String::new(),
            construct: erase_construct(construct),
            slots: Vec::new(),
            routes: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Route prefix composed ahead of every method path. Default empty.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Declare an injection slot. `explicit` is the marker's explicit lookup
    /// key; `type_key` the slot's declared-type qualified name, used when no
    /// explicit key is given.
    pub fn wires<D>(
        mut self,
        field: &'static str,
        explicit: Option<&str>,
        type_key: &str,
        set: impl Fn(&C, Arc<D>) + Send + Sync + 'static,
    ) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        self.slots.push(SlotDef {
            field,
            explicit_key: explicit.map(str::to_string),
            type_key: type_key.to_string(),
            assign: erase_assign(set),
        });
        self
    }

    /// Declare a routable method under `path` (composed after the prefix).
    pub fn route(
        mut self,
        path: &str,
        params: Vec<ParamSpec>,
        handler: impl Fn(&C, &Args) -> HandlerResult + Send + Sync + 'static,
    ) -> Self {
        let invoke: InvokeFn = Arc::new(move |owner: &Instance, args: &Args| {
            let owner = owner
                .downcast_ref::<Arc<C>>()
                .ok_or_else(|| format!("handler owner is not {}", std::any::type_name::<C>()))?;
            handler(owner, args)
        });
        self.routes.push(RouteDef {
            path: path.to_string(),
            params,
            invoke,
        });
        self
    }

    pub fn build(self) -> ComponentDef {
        ComponentDef {
            qualified_name: self.qualified_name,
            kind: ComponentKind::Controller {
                prefix: self.prefix,
            },
            construct: Some(self.construct),
            capabilities: Vec::new(),
            slots: self.slots,
            routes: self.routes,
        }
    }
}

/// Typed builder for a service definition.
pub struct ServiceDef<C> {
    qualified_name: String,
    name: Option<String>,
    construct: ConstructFn,
    capabilities: Vec<Capability>,
    slots: Vec<SlotDef>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Send + Sync + 'static> ServiceDef<C> {
    pub fn new(qualified_name: &str, construct: impl Fn() -> C + Send + Sync + 'static) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            name: None,
            construct: erase_construct(construct),
            capabilities: Vec::new(),
            slots: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Explicit registry name. When set, capability registration is skipped
    /// and the concrete instance sits under this single key.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Expose the service under a capability (trait) qualified name. The
    /// caster lifts the concrete `Arc<C>` into the trait view; every
    /// capability shares the one constructed instance.
    pub fn exposes<D>(
        mut self,
        qualified_name: &str,
        cast: impl Fn(Arc<C>) -> Arc<D> + Send + Sync + 'static,
    ) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        let expose: ExposeFn = Arc::new(move |holder: &Instance| {
            holder
                .downcast_ref::<Arc<C>>()
                .map(|concrete| Arc::new(cast(Arc::clone(concrete))) as Instance)
        });
        self.capabilities.push(Capability {
            qualified_name: qualified_name.to_string(),
            expose,
        });
        self
    }

    /// Declare an injection slot; services are wired the same way
    /// controllers are.
    pub fn wires<D>(
        mut self,
        field: &'static str,
        explicit: Option<&str>,
        type_key: &str,
        set: impl Fn(&C, Arc<D>) + Send + Sync + 'static,
    ) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        self.slots.push(SlotDef {
            field,
            explicit_key: explicit.map(str::to_string),
            type_key: type_key.to_string(),
            assign: erase_assign(set),
        });
        self
    }

    pub fn build(self) -> ComponentDef {
        ComponentDef {
            qualified_name: self.qualified_name,
            kind: ComponentKind::Service { name: self.name },
            construct: Some(self.construct),
            capabilities: self.capabilities,
            slots: self.slots,
            routes: Vec::new(),
        }
    }
}
