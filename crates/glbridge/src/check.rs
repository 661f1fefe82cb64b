//! Driver error translation.

use glbridge_core::{DriverError, GlError, GlResult};
use glbridge_driver::consts::GL_NO_ERROR;
use glbridge_driver::GlDriver;
use tracing::debug;

use crate::context::GlContext;

impl<D: GlDriver> GlContext<D> {
    /// Query the driver's error slot now, whatever the toggle says.
    ///
    /// The slot is read exactly once; the first pending code becomes the
    /// error. A code set aside by a capability probe is reported first,
    /// without reading the slot.
    pub fn check_error(&self) -> GlResult<()> {
        let code = match self.take_deferred_error() {
            GL_NO_ERROR => self.driver().get_error(),
            deferred => deferred,
        };
        match DriverError::from_code(code) {
            None => Ok(()),
            Some(err) => {
                debug!(code = err.code(), category = ?err.category(), "driver reported an error");
                Err(err.into())
            }
        }
    }

    /// The automatic check after a native call. No query at all when
    /// checking is off.
    pub(crate) fn checked(&self) -> GlResult<()> {
        if self.error_checking() {
            self.check_error()
        } else {
            Ok(())
        }
    }

    pub(crate) fn checked_value<T>(&self, value: T) -> GlResult<T> {
        self.checked().map(|()| value)
    }

    /// Error for a native call that signalled failure through a null or zero
    /// result. The slot is queried regardless of the toggle.
    pub(crate) fn null_result_error(&self, call: &'static str) -> GlError {
        match self.check_error() {
            Err(err) => err,
            Ok(()) => {
                debug!(call, "null result with no pending driver error");
                DriverError::Unknown(0).into()
            }
        }
    }
}
