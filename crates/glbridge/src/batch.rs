//! Batch name generation.

use glbridge_core::{ArgumentError, BufferId, GlResult, TextureId, VertexArrayId};
use glbridge_driver::GlDriver;
use tracing::trace;

use crate::context::GlContext;

/// Most names a single generation request may ask for.
pub const MAX_BATCH: usize = 256;

impl<D: GlDriver> GlContext<D> {
    pub fn gen_vertex_arrays(&self, n: usize) -> GlResult<Vec<VertexArrayId>> {
        self.generate(n, "glGenVertexArrays", D::gen_vertex_arrays, VertexArrayId::from_raw)
    }

    pub fn gen_textures(&self, n: usize) -> GlResult<Vec<TextureId>> {
        self.generate(n, "glGenTextures", D::gen_textures, TextureId::from_raw)
    }

    pub fn gen_buffers(&self, n: usize) -> GlResult<Vec<BufferId>> {
        self.generate(n, "glGenBuffers", D::gen_buffers, BufferId::from_raw)
    }

    /// `n` is checked against [`MAX_BATCH`] before the driver is touched; a
    /// request for zero names returns an empty list without a native call.
    fn generate<H>(
        &self,
        n: usize,
        call: &'static str,
        native: impl FnOnce(&D, &mut [u32]),
        wrap: fn(u32) -> H,
    ) -> GlResult<Vec<H>> {
        if n > MAX_BATCH {
            return Err(ArgumentError::TooMany {
                requested: n as u64,
                limit: MAX_BATCH,
            }
            .into());
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut names = vec![0u32; n];
        native(self.driver(), &mut names);
        trace!(call, n, "names generated");
        self.checked()?;
        Ok(names.into_iter().map(wrap).collect())
    }
}
