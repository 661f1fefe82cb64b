use std::ffi::c_void;

use glbridge_core::{ArgumentError, GlResult};
use glbridge_driver::GlDriver;

use crate::bridge::non_null;
use crate::context::GlContext;

impl<D: GlDriver> GlContext<D> {
    pub fn uniform_2ui(&self, location: i32, x: u32, y: u32) -> GlResult<()> {
        self.driver().uniform_2ui(location, x, y);
        self.checked()
    }

    pub fn uniform_1i(&self, location: i32, x: i32) -> GlResult<()> {
        self.driver().uniform_1i(location, x);
        self.checked()
    }

    pub fn uniform_2f(&self, location: i32, x: f32, y: f32) -> GlResult<()> {
        self.driver().uniform_2f(location, x, y);
        self.checked()
    }

    pub fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) -> GlResult<()> {
        self.driver().uniform_4f(location, x, y, z, w);
        self.checked()
    }

    /// Set a `vec3` array uniform from `count` packed vectors at `value`.
    ///
    /// # Safety
    /// `value` must be readable for `3 * count` floats.
    pub unsafe fn uniform_3fv(&self, location: i32, count: u32, value: *const f32) -> GlResult<()> {
        let value = non_null(value, "value")?;
        unsafe { self.driver().uniform_3fv(location, count, value) };
        self.checked()
    }

    pub fn uniform_3fv_slice(&self, location: i32, values: &[[f32; 3]]) -> GlResult<()> {
        let count = vector_count(values.len())?;
        // An empty slice still has a dangling, non-null pointer.
        unsafe { self.uniform_3fv(location, count, values.as_ptr().cast()) }
    }

    pub fn enable_vertex_attrib_array(&self, index: u32) -> GlResult<()> {
        self.driver().enable_vertex_attrib_array(index);
        self.checked()
    }

    /// Describe attribute `index` in the bound array buffer. `offset` is a
    /// byte offset into that buffer, so zero is valid.
    ///
    /// # Safety
    /// With no array buffer bound, a compatibility-profile driver takes
    /// `offset` as a client-memory address and reads from it at every draw
    /// that sources this attribute. The caller must either keep an array
    /// buffer bound or keep `offset` readable for those draws.
    pub unsafe fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        kind: u32,
        normalized: bool,
        stride: u32,
        offset: usize,
    ) -> GlResult<()> {
        unsafe {
            self.driver()
                .vertex_attrib_pointer(index, size, kind, normalized, stride, offset as *const c_void)
        };
        self.checked()
    }
}

fn vector_count(len: usize) -> GlResult<u32> {
    u32::try_from(len).map_err(|_| {
        ArgumentError::OutOfRange {
            operation: "glUniform3fv",
            argument: "value",
            value: len.to_string(),
            expected: "at most u32::MAX vectors",
        }
        .into()
    })
}
