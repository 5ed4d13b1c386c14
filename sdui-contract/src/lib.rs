//! Contract-driven event orchestration and action dispatch.
//!
//! Two independent paths turn user intent into work:
//!
//! - **Events** ([`ScreenEvent`](sdui_model::ScreenEvent)) go through a
//!   per-screen [`ScreenContract`] and the [`EventOrchestrator`], which
//!   enforces permissions before any network call and maps the event to an
//!   HTTP verb executed by a [`DataLoader`].
//! - **Actions** ([`ActionDefinition`](sdui_model::ActionDefinition)) go
//!   through the [`ActionDispatcher`]: a screen-specific
//!   [`ScreenHandler`] wins when it can handle the action, otherwise the
//!   generic handler from the [`ActionRegistry`] runs.
//!
//! Registries are immutable maps built once at start-up and injected; there
//! are no global singletons. Every public operation returns a tagged result
//! ([`EventResult`](sdui_model::EventResult) /
//! [`ActionResult`](sdui_model::ActionResult)) instead of an error.

mod action;
mod context;
mod contract;
mod dispatcher;
mod error;
pub mod handlers;
mod loader;
pub mod mock;
mod orchestrator;
mod permission;
mod registry;
mod screen_handler;

pub use action::{ActionHandler, ActionRegistry};
pub use context::{ActionContext, Confirmer, EventContext, SessionControl};
pub use contract::{
    CrudContract, CustomEventHandler, ScreenContract, CREATE_HANDLER, SELECT_ITEM_HANDLER,
};
pub use dispatcher::{ActionDispatcher, DispatchRoute};
pub use error::{LoaderError, OrchestratorError};
pub use loader::{DataLoader, Page, QueryParams};
pub use orchestrator::EventOrchestrator;
pub use permission::{PermissionOracle, PermissionSet, SharedPermissions, Verb};
pub use registry::ContractRegistry;
pub use screen_handler::{ScreenHandler, ScreenHandlerRegistry};
