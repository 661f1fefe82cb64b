//! The session object every operation runs against.

use std::cell::{Cell, OnceCell};
use std::sync::Arc;

use glbridge_core::{BridgeConfig, CapabilitySet, GlError, GlResult};
use glbridge_driver::consts::GL_NO_ERROR;
use glbridge_driver::{GlDriver, GlLibrary};
use tracing::{debug, info, trace};

use crate::bootstrap;
use crate::host::{HostLock, NoHostLock, Released};

/// One native graphics context and the bridge state attached to it.
///
/// The context must be current on the calling thread for every operation;
/// the bridge does not check this. Automatic error checking is a field here
/// rather than process state, so independent contexts (and tests) never see
/// each other's toggle.
pub struct GlContext<D: GlDriver> {
    driver: D,
    error_checking: bool,
    host_lock: Arc<dyn HostLock>,
    bootstrap: OnceCell<GlResult<()>>,
    capabilities: OnceCell<CapabilitySet>,
    /// A caller's error read out of the slot by bridge-internal queries,
    /// reported by the next check instead of the slot.
    deferred_error: Cell<u32>,
}

impl GlContext<GlLibrary> {
    /// Load the system OpenGL library, trying configured paths first.
    pub fn open_system(config: &BridgeConfig) -> GlResult<Self> {
        let library = GlLibrary::load(&config.driver.library_paths)
            .map_err(|cause| GlError::LoaderInit { cause })?;
        info!(
            platform = glbridge_common::platform::platform_name(),
            "system OpenGL library loaded"
        );
        Ok(Self::with_config(library, config))
    }
}

impl<D: GlDriver> GlContext<D> {
    /// Error checking enabled, no host lock.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            error_checking: true,
            host_lock: Arc::new(NoHostLock),
            bootstrap: OnceCell::new(),
            capabilities: OnceCell::new(),
            deferred_error: Cell::new(GL_NO_ERROR),
        }
    }

    pub fn with_config(driver: D, config: &BridgeConfig) -> Self {
        let mut ctx = Self::new(driver);
        ctx.error_checking = config.checks.automatic_error_checking;
        debug!(error_checking = ctx.error_checking, "context configured");
        ctx
    }

    /// Hand `lock` off around blocking native calls.
    pub fn with_host_lock(mut self, lock: Arc<dyn HostLock>) -> Self {
        self.host_lock = lock;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn error_checking(&self) -> bool {
        self.error_checking
    }

    /// Toggle the automatic driver error query after each call. While off,
    /// errors stay pending in the driver and surface at the next check.
    pub fn set_error_checking(&mut self, enabled: bool) {
        self.error_checking = enabled;
    }

    /// Initialise extension loading and verify required capabilities.
    ///
    /// Runs once; every later call returns the first outcome unchanged.
    pub fn bootstrap(&self) -> GlResult<()> {
        self.bootstrap
            .get_or_init(|| bootstrap::run(self))
            .clone()
    }

    /// What the driver advertises. Probed on first use.
    pub fn capabilities(&self) -> &CapabilitySet {
        self.capabilities
            .get_or_init(|| self.isolated(|| bootstrap::probe(&self.driver)))
    }

    /// Run bridge-internal driver queries without touching the caller's view
    /// of the error slot: a code already pending is kept for the next check,
    /// and whatever `queries` raise is discarded.
    pub(crate) fn isolated<R>(&self, queries: impl FnOnce() -> R) -> R {
        let pending = self.driver.get_error();
        let result = queries();
        bootstrap::discard_errors(&self.driver);
        if pending != GL_NO_ERROR && self.deferred_error.get() == GL_NO_ERROR {
            debug!(code = pending, "pending error kept for the next check");
            self.deferred_error.set(pending);
        }
        result
    }

    /// The error the next check reports before looking at the slot.
    pub(crate) fn take_deferred_error(&self) -> u32 {
        self.deferred_error.replace(GL_NO_ERROR)
    }

    /// Run a long native call with the host lock released.
    pub(crate) fn blocking<R>(&self, call: &'static str, native: impl FnOnce(&D) -> R) -> R {
        trace!(call, "releasing host lock");
        let _released = Released::new(self.host_lock.as_ref());
        native(&self.driver)
    }
}
