//! Zero-copy transfers through caller-owned memory.
//!
//! Addresses reach the bridge as plain integers from the host. A null
//! address fails the operation before any native call; anything else is
//! handed to the driver as is.

use std::ffi::c_void;

use glbridge_core::{BufferId, Capability, GlError, GlResult, TextureId};
use glbridge_driver::consts::*;
use glbridge_driver::GlDriver;
use tracing::trace;

use crate::context::GlContext;

/// Reject a null address, naming the argument it came from.
pub(crate) fn non_null<T>(ptr: *const T, argument: &'static str) -> GlResult<*const T> {
    if ptr.is_null() {
        Err(GlError::NullPointer { argument })
    } else {
        Ok(ptr)
    }
}

pub(crate) fn non_null_mut<T>(ptr: *mut T, argument: &'static str) -> GlResult<*mut T> {
    non_null(ptr as *const T, argument).map(|p| p as *mut T)
}

impl<D: GlDriver> GlContext<D> {
    /// Upload a sub-image of a 3D or array texture from `pixels`.
    ///
    /// # Safety
    /// `pixels` must be readable for the whole sub-image as laid out by the
    /// current unpack state.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn tex_sub_image_3d(
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
    ) -> GlResult<()> {
        let pixels = non_null(pixels, "pixels")?;
        self.blocking("glTexSubImage3D", |gl| unsafe {
            gl.tex_sub_image_3d(target, level, x, y, z, width, height, depth, format, kind, pixels)
        });
        self.checked()
    }

    /// Download a whole texture level into `pixels`.
    ///
    /// # Safety
    /// `pixels` must be writable for the full level as laid out by the current
    /// pack state.
    pub unsafe fn get_tex_image(
        &self,
        target: u32,
        level: i32,
        format: u32,
        kind: u32,
        pixels: *mut c_void,
    ) -> GlResult<()> {
        let pixels = non_null_mut(pixels, "pixels")?;
        self.blocking("glGetTexImage", |gl| unsafe {
            gl.get_tex_image(target, level, format, kind, pixels)
        });
        self.checked()
    }

    /// Replace the data store of `buffer` with `size` bytes from `data`.
    ///
    /// Uses named buffer access when the driver has it; otherwise the buffer
    /// is bound to the texture-buffer target for the upload and unbound
    /// after.
    ///
    /// # Safety
    /// `data` must be readable for `size` bytes.
    pub unsafe fn upload_buffer_data(
        &self,
        buffer: BufferId,
        size: usize,
        data: *const c_void,
        usage: u32,
    ) -> GlResult<()> {
        let data = non_null(data, "data")?;
        let direct = self.capabilities().has(Capability::DirectStateAccess);
        self.blocking("glNamedBufferData", |gl| {
            let named = direct && unsafe { gl.named_buffer_data(buffer.raw(), size, data, usage) }.is_ok();
            if !named {
                trace!(%buffer, "uploading through the texture-buffer binding");
                gl.bind_buffer(GL_TEXTURE_BUFFER, buffer.raw());
                unsafe { gl.buffer_data(GL_TEXTURE_BUFFER, size, data, usage) };
                gl.bind_buffer(GL_TEXTURE_BUFFER, 0);
            }
        });
        self.checked()
    }

    /// Rewrite the single-channel array texture `dst` with the first channel
    /// of every texel of the four-channel array texture `src`.
    ///
    /// Both textures are treated as `width` x `height` x `layers` at level 0.
    /// Leaves `dst` bound to the 2D-array target and the unpack alignment
    /// at 1.
    ///
    /// # Safety
    /// Level 0 of `src` must be exactly `width` x `height` x `layers` texels,
    /// and the pack alignment must be at most 4, so the driver writes no more
    /// than `4 * width * height * layers` bytes.
    pub unsafe fn extract_red_channel(
        &self,
        src: TextureId,
        dst: TextureId,
        width: u32,
        height: u32,
        layers: u32,
    ) -> GlResult<()> {
        let texels = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layers as usize));
        let bytes = texels
            .and_then(|n| n.checked_mul(5))
            .ok_or(GlError::Allocation { bytes: usize::MAX })?;
        let texels = bytes / 5;

        // One region: four-channel source followed by the one-channel plane.
        let mut scratch: Vec<u8> = Vec::new();
        scratch
            .try_reserve_exact(bytes)
            .map_err(|_| GlError::Allocation { bytes })?;
        scratch.resize(bytes, 0);
        let (rgba, red) = scratch.split_at_mut(texels * 4);

        self.blocking("copy_image_sub_data", |gl| {
            gl.bind_texture(GL_TEXTURE_2D_ARRAY, src.raw());
            unsafe {
                gl.get_tex_image(
                    GL_TEXTURE_2D_ARRAY,
                    0,
                    GL_RGBA,
                    GL_UNSIGNED_BYTE,
                    rgba.as_mut_ptr().cast(),
                )
            };
            gl.bind_texture(GL_TEXTURE_2D_ARRAY, dst.raw());
            gl.pixel_store_i(GL_UNPACK_ALIGNMENT, 1);
            for (plane, texel) in red.iter_mut().zip(rgba.chunks_exact(4)) {
                *plane = texel[0];
            }
            unsafe {
                gl.tex_sub_image_3d(
                    GL_TEXTURE_2D_ARRAY,
                    0,
                    0,
                    0,
                    0,
                    width,
                    height,
                    layers,
                    GL_RED,
                    GL_UNSIGNED_BYTE,
                    red.as_ptr().cast(),
                )
            };
        });
        drop(scratch);
        self.checked()
    }
}
