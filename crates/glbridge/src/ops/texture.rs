use glbridge_core::{BufferId, Capability, GlError, GlResult, TextureId, VertexArrayId};
use glbridge_driver::GlDriver;

use crate::context::GlContext;

impl<D: GlDriver> GlContext<D> {
    pub fn bind_texture(&self, target: u32, texture: TextureId) -> GlResult<()> {
        self.driver().bind_texture(target, texture.raw());
        self.checked()
    }

    pub fn bind_buffer(&self, target: u32, buffer: BufferId) -> GlResult<()> {
        self.driver().bind_buffer(target, buffer.raw());
        self.checked()
    }

    pub fn bind_vertex_array(&self, array: VertexArrayId) -> GlResult<()> {
        self.driver().bind_vertex_array(array.raw());
        self.checked()
    }

    pub fn delete_texture(&self, texture: TextureId) -> GlResult<()> {
        self.driver().delete_textures(&[texture.raw()]);
        self.checked()
    }

    pub fn delete_buffer(&self, buffer: BufferId) -> GlResult<()> {
        self.driver().delete_buffers(&[buffer.raw()]);
        self.checked()
    }

    /// Allocate immutable storage for the texture bound to `target`.
    pub fn tex_storage_3d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> GlResult<()> {
        self.blocking("glTexStorage3D", |gl| {
            gl.tex_storage_3d(target, levels, internal_format, width, height, depth)
        })
        .map_err(|_| GlError::CapabilityMissing {
            capability: Capability::TextureStorage,
        })?;
        self.checked()
    }

    /// Attach `buffer`'s data store to the texture bound to `target`.
    pub fn tex_buffer(&self, target: u32, internal_format: u32, buffer: BufferId) -> GlResult<()> {
        self.driver().tex_buffer(target, internal_format, buffer.raw());
        self.checked()
    }

    pub fn tex_parameter_i(&self, target: u32, pname: u32, param: i32) -> GlResult<()> {
        self.driver().tex_parameter_i(target, pname, param);
        self.checked()
    }

    /// Copy a texel region between two textures on the GPU.
    ///
    /// Needs the copy-image capability; without it this fails with
    /// `CapabilityMissing` and nothing reaches the driver.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_image_sub_data(
        &self,
        src: TextureId,
        src_target: u32,
        src_level: i32,
        src_x: i32,
        src_y: i32,
        src_z: i32,
        dst: TextureId,
        dst_target: u32,
        dst_level: i32,
        dst_x: i32,
        dst_y: i32,
        dst_z: i32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> GlResult<()> {
        let missing = GlError::CapabilityMissing {
            capability: Capability::CopyImage,
        };
        if !self.capabilities().has(Capability::CopyImage) {
            return Err(missing);
        }
        self.blocking("glCopyImageSubData", |gl| {
            gl.copy_image_sub_data(
                src.raw(),
                src_target,
                src_level,
                src_x,
                src_y,
                src_z,
                dst.raw(),
                dst_target,
                dst_level,
                dst_x,
                dst_y,
                dst_z,
                width,
                height,
                depth,
            )
        })
        .map_err(|_| missing)?;
        self.checked()
    }
}
