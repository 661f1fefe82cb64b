//! The native entry-point seam.
//!
//! Method signatures follow the binding's view of each entry point: the
//! argument order is the driver's, integer widths are the ones the host
//! layer validates against. Entry points that read or write caller memory
//! through a raw address are `unsafe`; everything else is safe to call with
//! any value (the driver reports bad values through its error slot).

use std::ffi::{c_void, CStr};

/// An optional entry point the loaded driver does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("driver entry point {0} is not available")]
pub struct MissingEntryPoint(pub &'static str);

/// How extension entry points become available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionLoading {
    /// A loader has to be initialised against the current context.
    Dynamic,
    /// The base driver exports everything; there is nothing to initialise.
    BuiltIn,
}

pub trait GlDriver {
    // ── Loader ──────────────────────────────────────────────────

    fn extension_loading(&self) -> ExtensionLoading;

    /// One-time initialisation of extension loading against the current
    /// context. The error is a human-readable cause.
    fn init_extension_loading(&self) -> Result<(), String>;

    // ── Errors and queries ──────────────────────────────────────

    /// Read and clear the sticky error slot.
    fn get_error(&self) -> u32;

    /// `None` when the driver returned a null string.
    fn get_string(&self, name: u32) -> Option<Vec<u8>>;

    fn get_string_i(&self, name: u32, index: u32) -> Result<Option<Vec<u8>>, MissingEntryPoint>;

    fn get_integer(&self, pname: u32) -> i32;

    // ── Frame state ─────────────────────────────────────────────

    fn viewport(&self, x: u32, y: u32, width: u32, height: u32);

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);

    fn clear(&self, mask: u32);

    fn enable(&self, cap: u32);

    fn disable(&self, cap: u32);

    fn blend_func(&self, sfactor: u32, dfactor: u32);

    fn pixel_store_i(&self, pname: u32, param: i32);

    // ── Names ───────────────────────────────────────────────────

    fn gen_vertex_arrays(&self, names: &mut [u32]);

    fn gen_textures(&self, names: &mut [u32]);

    fn gen_buffers(&self, names: &mut [u32]);

    fn delete_textures(&self, names: &[u32]);

    fn delete_buffers(&self, names: &[u32]);

    fn delete_program(&self, program: u32);

    fn delete_shader(&self, shader: u32);

    // ── Shaders and programs ────────────────────────────────────

    fn create_shader(&self, kind: u32) -> u32;

    fn shader_source(&self, shader: u32, source: &[u8]);

    fn compile_shader(&self, shader: u32);

    fn get_shader_iv(&self, shader: u32, pname: u32) -> i32;

    /// Fetch at most `buf.len()` bytes (terminator included) of the log.
    /// Returns the number of bytes written, terminator excluded.
    fn get_shader_info_log(&self, shader: u32, buf: &mut [u8]) -> i32;

    fn create_program(&self) -> u32;

    fn attach_shader(&self, program: u32, shader: u32);

    fn link_program(&self, program: u32);

    fn get_program_iv(&self, program: u32, pname: u32) -> i32;

    /// Same contract as [`GlDriver::get_shader_info_log`].
    fn get_program_info_log(&self, program: u32, buf: &mut [u8]) -> i32;

    fn use_program(&self, program: u32);

    fn get_uniform_location(&self, program: u32, name: &CStr) -> i32;

    fn get_attrib_location(&self, program: u32, name: &CStr) -> i32;

    // ── Uniforms and attributes ─────────────────────────────────

    fn uniform_2ui(&self, location: i32, x: u32, y: u32);

    fn uniform_1i(&self, location: i32, x: i32);

    fn uniform_2f(&self, location: i32, x: f32, y: f32);

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32);

    /// # Safety
    /// `value` must point to `3 * count` readable floats.
    unsafe fn uniform_3fv(&self, location: i32, count: u32, value: *const f32);

    fn enable_vertex_attrib_array(&self, index: u32);

    /// # Safety
    /// With a buffer bound to the array target `offset` is an offset into
    /// it; otherwise it must stay valid client memory until the draw.
    #[allow(clippy::too_many_arguments)]
    unsafe fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        kind: u32,
        normalized: bool,
        stride: u32,
        offset: *const c_void,
    );

    // ── Textures and buffers ────────────────────────────────────

    fn active_texture(&self, unit: u32);

    fn bind_texture(&self, target: u32, texture: u32);

    fn bind_buffer(&self, target: u32, buffer: u32);

    fn bind_vertex_array(&self, array: u32);

    #[allow(clippy::too_many_arguments)]
    fn tex_storage_3d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<(), MissingEntryPoint>;

    /// # Safety
    /// `pixels` must point to a readable region large enough for the
    /// described sub-image under the current unpack state.
    #[allow(clippy::too_many_arguments)]
    unsafe fn tex_sub_image_3d(
        &self,
        target: u32,
        level: i32,
        x: i32,
        y: i32,
        z: i32,
        width: u32,
        height: u32,
        depth: u32,
        format: u32,
        kind: u32,
        pixels: *const c_void,
    );

    /// # Safety
    /// `pixels` must point to a writable region large enough for the whole
    /// level under the current pack state.
    unsafe fn get_tex_image(&self, target: u32, level: i32, format: u32, kind: u32, pixels: *mut c_void);

    /// # Safety
    /// `data` must point to `size` readable bytes.
    unsafe fn buffer_data(&self, target: u32, size: usize, data: *const c_void, usage: u32);

    /// # Safety
    /// `data` must point to `size` readable bytes.
    unsafe fn named_buffer_data(
        &self,
        buffer: u32,
        size: usize,
        data: *const c_void,
        usage: u32,
    ) -> Result<(), MissingEntryPoint>;

    fn tex_buffer(&self, target: u32, internal_format: u32, buffer: u32);

    fn tex_parameter_i(&self, target: u32, pname: u32, param: i32);

    #[allow(clippy::too_many_arguments)]
    fn copy_image_sub_data(
        &self,
        src: u32,
        src_target: u32,
        src_level: i32,
        src_x: i32,
        src_y: i32,
        src_z: i32,
        dst: u32,
        dst_target: u32,
        dst_level: i32,
        dst_x: i32,
        dst_y: i32,
        dst_z: i32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<(), MissingEntryPoint>;

    // ── Draw ────────────────────────────────────────────────────

    fn draw_arrays(&self, mode: u32, first: i32, count: u32);

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: u32, instance_count: u32);

    /// # Safety
    /// `first` and `count` must each point to `draw_count` readable ints.
    unsafe fn multi_draw_arrays(&self, mode: u32, first: *const i32, count: *const i32, draw_count: u32);
}
