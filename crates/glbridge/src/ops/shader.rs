use glbridge_core::{GlResult, ProgramId, ShaderId};
use glbridge_driver::GlDriver;

use crate::context::GlContext;
use crate::marshal::c_name;

impl<D: GlDriver> GlContext<D> {
    pub fn create_shader(&self, kind: u32) -> GlResult<ShaderId> {
        let shader = self.driver().create_shader(kind);
        self.checked_value(ShaderId::from_raw(shader))
    }

    /// Replace the shader's source with `source` (a single string, length
    /// given explicitly, so it need not be NUL-terminated).
    pub fn shader_source(&self, shader: ShaderId, source: &[u8]) -> GlResult<()> {
        self.driver().shader_source(shader.raw(), source);
        self.checked()
    }

    pub fn compile_shader(&self, shader: ShaderId) -> GlResult<()> {
        self.driver().compile_shader(shader.raw());
        self.checked()
    }

    pub fn get_shader_iv(&self, shader: ShaderId, pname: u32) -> GlResult<i32> {
        let value = self.driver().get_shader_iv(shader.raw(), pname);
        self.checked_value(value)
    }

    pub fn delete_shader(&self, shader: ShaderId) -> GlResult<()> {
        self.driver().delete_shader(shader.raw());
        self.checked()
    }

    /// A zero name from the driver is always an error.
    pub fn create_program(&self) -> GlResult<ProgramId> {
        match self.driver().create_program() {
            0 => Err(self.null_result_error("glCreateProgram")),
            program => self.checked_value(ProgramId::from_raw(program)),
        }
    }

    pub fn attach_shader(&self, program: ProgramId, shader: ShaderId) -> GlResult<()> {
        self.driver().attach_shader(program.raw(), shader.raw());
        self.checked()
    }

    pub fn link_program(&self, program: ProgramId) -> GlResult<()> {
        self.driver().link_program(program.raw());
        self.checked()
    }

    pub fn get_program_iv(&self, program: ProgramId, pname: u32) -> GlResult<i32> {
        let value = self.driver().get_program_iv(program.raw(), pname);
        self.checked_value(value)
    }

    pub fn use_program(&self, program: ProgramId) -> GlResult<()> {
        self.driver().use_program(program.raw());
        self.checked()
    }

    pub fn delete_program(&self, program: ProgramId) -> GlResult<()> {
        self.driver().delete_program(program.raw());
        self.checked()
    }

    /// `-1` when the program has no active uniform called `name`.
    pub fn get_uniform_location(&self, program: ProgramId, name: &str) -> GlResult<i32> {
        let name = c_name("glGetUniformLocation", name)?;
        let location = self.driver().get_uniform_location(program.raw(), &name);
        self.checked_value(location)
    }

    pub fn get_attrib_location(&self, program: ProgramId, name: &str) -> GlResult<i32> {
        let name = c_name("glGetAttribLocation", name)?;
        let location = self.driver().get_attrib_location(program.raw(), &name);
        self.checked_value(location)
    }
}
