use glbridge_core::GlResult;
use glbridge_driver::GlDriver;

use crate::context::GlContext;

impl<D: GlDriver> GlContext<D> {
    pub fn viewport(&self, x: u32, y: u32, width: u32, height: u32) -> GlResult<()> {
        self.driver().viewport(x, y, width, height);
        self.checked()
    }

    pub fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> GlResult<()> {
        self.driver().clear_color(red, green, blue, alpha);
        self.checked()
    }

    pub fn clear(&self, mask: u32) -> GlResult<()> {
        self.blocking("glClear", |gl| gl.clear(mask));
        self.checked()
    }

    pub fn enable(&self, cap: u32) -> GlResult<()> {
        self.driver().enable(cap);
        self.checked()
    }

    pub fn disable(&self, cap: u32) -> GlResult<()> {
        self.driver().disable(cap);
        self.checked()
    }

    pub fn blend_func(&self, sfactor: u32, dfactor: u32) -> GlResult<()> {
        self.driver().blend_func(sfactor, dfactor);
        self.checked()
    }

    pub fn pixel_store_i(&self, pname: u32, param: i32) -> GlResult<()> {
        self.driver().pixel_store_i(pname, param);
        self.checked()
    }

    pub fn get_integer(&self, pname: u32) -> GlResult<i32> {
        let value = self.driver().get_integer(pname);
        self.checked_value(value)
    }

    /// A driver string such as `GL_VERSION`. A null result is always an
    /// error, whether or not automatic checking is on.
    pub fn get_string(&self, name: u32) -> GlResult<Vec<u8>> {
        match self.driver().get_string(name) {
            Some(value) => self.checked_value(value),
            None => Err(self.null_result_error("glGetString")),
        }
    }

    /// Select the texture unit (`GL_TEXTURE0 + n`) later binds apply to.
    pub fn active_texture(&self, unit: u32) -> GlResult<()> {
        self.driver().active_texture(unit);
        self.checked()
    }
}
