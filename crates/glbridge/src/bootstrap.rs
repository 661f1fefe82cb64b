//! Capability bootstrap and probing.

use glbridge_core::{Capability, CapabilitySet, GlError, GlResult, GlVersion};
use glbridge_driver::consts::{GL_EXTENSIONS, GL_NO_ERROR, GL_NUM_EXTENSIONS, GL_VERSION};
use glbridge_driver::{ExtensionLoading, GlDriver};
use tracing::{debug, warn};

use crate::context::GlContext;

/// Bound on codes drained after internal queries; a lost context can keep
/// reporting.
const MAX_DISCARDED_ERRORS: usize = 16;

pub(crate) fn run<D: GlDriver>(ctx: &GlContext<D>) -> GlResult<()> {
    let driver = ctx.driver();
    if driver.extension_loading() == ExtensionLoading::BuiltIn {
        debug!("extension loading is built into the driver, nothing to initialise");
        return Ok(());
    }

    ctx.isolated(|| driver.init_extension_loading())
        .map_err(|cause| {
            warn!(%cause, "extension loader initialisation failed");
            GlError::LoaderInit { cause }
        })?;

    let caps = ctx.capabilities();
    if let Some(capability) = caps.first_missing(&Capability::REQUIRED) {
        warn!(%capability, "required capability missing");
        return Err(GlError::CapabilityMissing { capability });
    }

    debug!(
        version = ?caps.version(),
        extensions = caps.extension_count(),
        "bootstrap complete"
    );
    Ok(())
}

/// Read the version and extension list. Indexed extension queries are used
/// when the driver has them, the legacy space-separated string otherwise.
pub(crate) fn probe<D: GlDriver>(driver: &D) -> CapabilitySet {
    let version = driver
        .get_string(GL_VERSION)
        .and_then(|v| GlVersion::parse(&String::from_utf8_lossy(&v)));

    let count = driver.get_integer(GL_NUM_EXTENSIONS).max(0) as u32;
    let indexed: Result<Vec<_>, _> = (0..count)
        .map(|i| driver.get_string_i(GL_EXTENSIONS, i))
        .collect();

    let extensions: Vec<String> = match indexed {
        Ok(names) if count > 0 => names
            .into_iter()
            .flatten()
            .map(|n| String::from_utf8_lossy(&n).into_owned())
            .collect(),
        _ => driver
            .get_string(GL_EXTENSIONS)
            .map(|all| {
                String::from_utf8_lossy(&all)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    };

    debug!(?version, extensions = extensions.len(), "driver capabilities probed");
    CapabilitySet::new(version, extensions)
}

/// Drain the codes internal queries left in the error slot.
pub(crate) fn discard_errors<D: GlDriver>(driver: &D) {
    for _ in 0..MAX_DISCARDED_ERRORS {
        let code = driver.get_error();
        if code == GL_NO_ERROR {
            return;
        }
        debug!(code, "discarding error raised by an internal query");
    }
}
