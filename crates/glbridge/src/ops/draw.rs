use glbridge_core::{ArgumentError, GlResult};
use glbridge_driver::GlDriver;

use crate::bridge::non_null;
use crate::context::GlContext;

impl<D: GlDriver> GlContext<D> {
    pub fn draw_arrays(&self, mode: u32, first: i32, count: u32) -> GlResult<()> {
        self.blocking("glDrawArrays", |gl| gl.draw_arrays(mode, first, count));
        self.checked()
    }

    pub fn draw_arrays_instanced(
        &self,
        mode: u32,
        first: i32,
        count: u32,
        instance_count: u32,
    ) -> GlResult<()> {
        self.blocking("glDrawArraysInstanced", |gl| {
            gl.draw_arrays_instanced(mode, first, count, instance_count)
        });
        self.checked()
    }

    /// # Safety
    /// `first` and `count` must each be readable for `draw_count` ints.
    pub unsafe fn multi_draw_arrays(
        &self,
        mode: u32,
        first: *const i32,
        count: *const i32,
        draw_count: u32,
    ) -> GlResult<()> {
        let first = non_null(first, "first")?;
        let count = non_null(count, "count")?;
        self.blocking("glMultiDrawArrays", |gl| unsafe {
            gl.multi_draw_arrays(mode, first, count, draw_count)
        });
        self.checked()
    }

    pub fn multi_draw_arrays_slices(&self, mode: u32, first: &[i32], count: &[i32]) -> GlResult<()> {
        if first.len() != count.len() {
            return Err(ArgumentError::LengthMismatch {
                operation: "glMultiDrawArrays",
                argument: "count",
                other: "first",
                expected: first.len(),
                got: count.len(),
            }
            .into());
        }
        let draw_count = u32::try_from(first.len()).map_err(|_| ArgumentError::OutOfRange {
            operation: "glMultiDrawArrays",
            argument: "first",
            value: first.len().to_string(),
            expected: "at most u32::MAX draws",
        })?;
        unsafe { self.multi_draw_arrays(mode, first.as_ptr(), count.as_ptr(), draw_count) }
    }
}
