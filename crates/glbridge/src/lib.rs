//! Typed, error-checked bindings over an immediate-mode OpenGL driver.
//!
//! Every operation goes through the same pipeline: host arguments are
//! validated and converted, the native call runs (with the host lock
//! released if it may block), the driver's error slot is checked when
//! automatic checking is on, and the result is handed back.
//!
//! ```no_run
//! use glbridge::{BridgeConfig, GlContext};
//!
//! glbridge::init_logging();
//! let config = BridgeConfig::load_or_default(&glbridge::default_config_path());
//! let ctx = GlContext::open_system(&config)?;
//! ctx.bootstrap()?;
//! ctx.viewport(0, 0, 800, 600)?;
//! # Ok::<(), glbridge::GlError>(())
//! ```

pub mod batch;
mod bootstrap;
mod bridge;
mod check;
pub mod context;
pub mod dispatch;
pub mod host;
mod info_log;
pub mod marshal;
mod ops;

pub use batch::MAX_BATCH;
pub use context::GlContext;
pub use dispatch::Operation;
pub use host::{HostExclusivity, HostLock, NoHostLock};

pub use glbridge_common::logging::init_logging;
pub use glbridge_core::config::default_config_path;
pub use glbridge_core::{
    ArgumentError, BridgeConfig, BufferId, Capability, CapabilitySet, DriverError, ErrorCategory,
    GlError, GlResult, GlVersion, HostValue, ProgramId, ShaderId, TextureId, VertexArrayId,
};
pub use glbridge_driver::{consts, ExtensionLoading, GlDriver, GlLibrary, SimDriver};
