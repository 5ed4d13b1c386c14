//! Client-side façade of the SDUI engine.
//!
//! [`ScreenEngine`] wires screen delivery, sync, contracts and actions
//! together; [`ScreenViewModel`] is what a UI layer binds one screen to.
//!
//! ```ignore
//! let engine = ScreenEngine::builder(EngineConfig::load("sdui.toml")?)
//!     .contract(Arc::new(CrudContract::new("users-list", "users", "/api/users")))
//!     .build()?;
//! engine.restore().await?;
//! engine.sync().await?;
//!
//! let vm = engine.view_model("users-list");
//! vm.load().await;
//! let mut screen = vm.screen().subscribe();
//! ```

mod config;
mod engine;
mod state;
mod telemetry;
mod view_model;

pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineError, EngineResult, ScreenEngine, ScreenEngineBuilder};
pub use state::StateHolder;
pub use telemetry::init_tracing;
pub use view_model::{DataState, EngineContext, ITEMS_KEY, ScreenState, ScreenViewModel};
