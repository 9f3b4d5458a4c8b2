//! # Wirefront
//!
//! A minimal web request-dispatch framework with a startup-built
//! inversion-of-control container for Rust.
//!
//! Wirefront runs one startup pipeline — component discovery →
//! instantiation registry → dependency wiring → route table — and then
//! dispatches every inbound request read-only against that snapshot.
//! Instead of runtime reflection, components are declared through typed
//! builders: each definition carries a constructor function, its injection
//! slots, and its route handlers, collected in a [`Manifest`] the scanner's
//! output is resolved against.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wirefront::prelude::*;
//!
//! // 1. Define your service behind a capability trait
//! trait UserService: Send + Sync {
//!     fn get_user(&self, id: &str) -> String;
//! }
//!
//! #[derive(Default)]
//! struct UserServiceImpl;
//!
//! impl UserService for UserServiceImpl {
//!     fn get_user(&self, id: &str) -> String {
//!         format!("user-{id}")
//!     }
//! }
//!
//! // 2. Define your controller with an injectable slot
//! #[derive(Default)]
//! struct UserController {
//!     user_service: Slot<Arc<dyn UserService>>,
//! }
//!
//! // 3. Declare both in the manifest, bootstrap, serve
//! #[tokio::main]
//! async fn main() {
//!     let manifest = Manifest::builder()
//!         .component(
//!             ServiceDef::new("demo.service.UserServiceImpl", UserServiceImpl::default)
//!                 .exposes::<dyn UserService>("demo.service.UserService", |s| {
//!                     s as Arc<dyn UserService>
//!                 })
//!                 .build(),
//!         )
//!         .component(
//!             ControllerDef::new("demo.action.UserController", UserController::default)
//!                 .wires("user_service", None, "demo.service.UserService", |c: &UserController, dep| {
//!                     c.user_service.set(dep);
//!                 })
//!                 .route("getUser", vec![ParamSpec::text("id"), ParamSpec::Response], |c, args| {
//!                     let service = c.user_service.get().ok_or("service not wired")?;
//!                     let id = args.text(0).unwrap_or_default();
//!                     args.response(1).ok_or("no response")?.write(&service.get_user(id));
//!                     Ok(())
//!                 })
//!                 .build(),
//!         )
//!         .build();
//!
//!     let config = ConfigService::new();
//!     config.set("scanPackage", "demo");
//!
//!     let app = Application::builder()
//!         .config(config)
//!         .manifest(manifest)
//!         .build()
//!         .expect("startup failed");
//!
//!     app.serve("0.0.0.0:3000").await.expect("serve failed");
//! }
//! ```

pub mod component;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod route;
pub mod scan;
pub mod server;
pub mod wire;

// Re-export core types
pub use component::{ControllerDef, Manifest, ParamSpec, ServiceDef, Slot};
pub use config::ConfigService;
pub use dispatch::{DispatchOutcome, Dispatcher, ParamBinding, WebRequest, WebResponse};
pub use error::{Result, WirefrontError};
pub use registry::{Registry, RegistryBuilder};
pub use route::RouteTable;
pub use scan::{FsListing, Scanner};
pub use server::{Application, ApplicationBuilder, shutdown_signal};
pub use wire::{WireOutcome, WireReport, Wirer};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use wirefront::prelude::*;
/// ```
pub mod prelude {
    pub use crate::component::{
        Args, ControllerDef, HandlerResult, Manifest, ParamSpec, ServiceDef, Slot,
    };
    pub use crate::config::ConfigService;
    pub use crate::dispatch::{
        DispatchOutcome, Dispatcher, ParamBinding, WebRequest, WebResponse,
    };
    pub use crate::error::{Result, WirefrontError};
    pub use crate::registry::{Registry, RegistryBuilder};
    pub use crate::route::RouteTable;
    pub use crate::scan::{FsListing, Listing, Scanner};
    pub use crate::server::{Application, ApplicationBuilder, shutdown_signal};
    pub use crate::wire::{WireOutcome, WireReport, Wirer};
    pub use std::sync::Arc;
}
