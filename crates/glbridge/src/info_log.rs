//! Compile and link diagnostics.

use glbridge_core::{GlError, GlResult, ProgramId, ShaderId};
use glbridge_driver::consts::GL_INFO_LOG_LENGTH;
use glbridge_driver::GlDriver;

use crate::context::GlContext;

/// Slack allocated past the reported length.
const LOG_MARGIN: usize = 10;

impl<D: GlDriver> GlContext<D> {
    pub fn shader_info_log(&self, shader: ShaderId) -> GlResult<Vec<u8>> {
        let gl = self.driver();
        let reported = gl.get_shader_iv(shader.raw(), GL_INFO_LOG_LENGTH);
        let log = fetch_log(reported, |buf| gl.get_shader_info_log(shader.raw(), buf))?;
        self.checked_value(log)
    }

    pub fn program_info_log(&self, program: ProgramId) -> GlResult<Vec<u8>> {
        let gl = self.driver();
        let reported = gl.get_program_iv(program.raw(), GL_INFO_LOG_LENGTH);
        let log = fetch_log(reported, |buf| gl.get_program_info_log(program.raw(), buf))?;
        self.checked_value(log)
    }
}

/// Fetch a log whose length (terminator included) the driver reported as
/// `reported`. Returns exactly the bytes the fetch says it wrote.
fn fetch_log(reported: i32, fetch: impl FnOnce(&mut [u8]) -> i32) -> GlResult<Vec<u8>> {
    fetch_log_of_len(reported.max(0) as usize, fetch)
}

/// The buffer is reserved before `fetch` runs; a failed reservation skips
/// the fetch.
fn fetch_log_of_len(len: usize, fetch: impl FnOnce(&mut [u8]) -> i32) -> GlResult<Vec<u8>> {
    let capacity = len
        .checked_add(LOG_MARGIN)
        .ok_or(GlError::Allocation { bytes: usize::MAX })?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| GlError::Allocation { bytes: capacity })?;
    buf.resize(capacity, 0u8);

    let written = fetch(&mut buf[..len]).max(0) as usize;
    buf.truncate(written.min(len));
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_returns_written_bytes() {
        let log = fetch_log(6, |buf| {
            assert_eq!(buf.len(), 6);
            buf[..5].copy_from_slice(b"oops\n");
            5
        })
        .unwrap();
        assert_eq!(log, b"oops\n");
    }

    #[test]
    fn test_negative_length_gives_empty_log() {
        let log = fetch_log(-1, |buf| {
            assert!(buf.is_empty());
            0
        })
        .unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_failed_reservation_skips_fetch() {
        let len = isize::MAX as usize;
        let err = fetch_log_of_len(len, |_| panic!("fetch must not run")).unwrap_err();
        assert_eq!(err, GlError::Allocation { bytes: len + LOG_MARGIN });

        let err = fetch_log_of_len(usize::MAX, |_| panic!("fetch must not run")).unwrap_err();
        assert_eq!(err, GlError::Allocation { bytes: usize::MAX });
    }
}
