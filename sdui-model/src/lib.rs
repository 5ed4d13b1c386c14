//! Declarative screen model for the SDUI engine.
//!
//! Defines the passive data every other layer consumes:
//! - [`ScreenDefinition`]: one screen: pattern, zone tree, actions, data endpoint
//! - [`Zone`] / [`Slot`]: layout containers and leaf controls
//! - [`ActionDefinition`]: declarative actions embedded in a screen
//! - [`ScreenEvent`]: the closed set of events driving screen contracts
//! - Sync payloads ([`UserDataBundle`], [`DeltaSyncResponse`], ...)
//! - Tagged results ([`EventResult`], [`ActionResult`], [`LoadState`])
//!
//! Nothing here has behaviour beyond lookups and small pure helpers; the
//! JSON shapes are the contract with the backend.

mod action;
mod bundle;
mod condition;
mod data;
mod event;
mod navigation;
mod result;
mod screen;
mod slot;
mod zone;

pub use action::{
    ActionDefinition, ActionTrigger, ActionType, ApiCallConfig, ConfirmConfig, NavigateConfig,
    SubmitFormConfig,
};
pub use bundle::{
    BucketDelta, BucketKey, DeltaSyncRequest, DeltaSyncResponse, MenuItem, ScreenBundleEntry,
    UserContext, UserDataBundle,
};
pub use condition::evaluate_condition;
pub use data::{render_scalar, DataBag};
pub use event::{HttpMethod, ScreenEvent};
pub use navigation::{NavItem, NavigationDefinition};
pub use result::{ActionResult, EventResult, LoadState};
pub use screen::{
    DataConfig, NavigationConfig, PaginationConfig, PlatformOverride, ScreenDefinition,
    ScreenPattern, ScreenTemplate,
};
pub use slot::{BindingTarget, ControlType, Slot};
pub use zone::{Distribution, ItemLayout, Zone, ZoneType};
