//! Host entry points.
//!
//! [`Operation`] is the registration list of everything a host runtime can
//! call, under the names the host sees. [`GlContext::invoke`] validates the
//! host arguments against the operation's [`CallDescriptor`], runs the typed
//! operation and converts its result back into a [`HostValue`].

use std::ffi::c_void;

use glbridge_core::{
    BufferId, GlError, GlResult, HostValue, ProgramId, ShaderId, TextureId, VertexArrayId,
};
use glbridge_driver::GlDriver;
use tracing::trace;

use crate::context::GlContext;
use crate::marshal::{ArgKind, Args, CallDescriptor, Param};

macro_rules! operations {
    ($( $(#[$meta:meta])* $variant:ident = $name:literal ( $( $param:ident : $kind:ident ),* ); )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $( $(#[$meta])* $variant, )*
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[ $( Operation::$variant, )* ];

            pub fn descriptor(self) -> &'static CallDescriptor {
                match self {
                    $(
                        Operation::$variant => &CallDescriptor {
                            name: $name,
                            params: &[ $( Param { name: stringify!($param), kind: ArgKind::$kind }, )* ],
                        },
                    )*
                }
            }
        }
    };
}

operations! {
    // Frame state
    Viewport = "glViewport"(x: UInt, y: UInt, width: UInt, height: UInt);
    ClearColor = "glClearColor"(red: Float, green: Float, blue: Float, alpha: Float);
    Clear = "glClear"(mask: UInt);
    Enable = "glEnable"(cap: UInt);
    Disable = "glDisable"(cap: UInt);
    BlendFunc = "glBlendFunc"(sfactor: UInt, dfactor: UInt);
    PixelStorei = "glPixelStorei"(pname: UInt, param: Int);
    GetIntegerv = "glGetIntegerv"(pname: UInt);
    GetString = "glGetString"(name: UInt);
    ActiveTexture = "glActiveTexture"(unit: UInt);

    // Names
    GenVertexArrays = "glGenVertexArrays"(n: Count);
    GenTextures = "glGenTextures"(n: Count);
    GenBuffers = "glGenBuffers"(n: Count);
    DeleteTexture = "glDeleteTexture"(texture: UInt);
    DeleteBuffer = "glDeleteBuffer"(buffer: UInt);

    // Shaders and programs
    CreateShader = "glCreateShader"(kind: UInt);
    ShaderSource = "glShaderSource"(shader: UInt, source: Text);
    CompileShader = "glCompileShader"(shader: UInt);
    GetShaderiv = "glGetShaderiv"(shader: UInt, pname: UInt);
    GetShaderInfoLog = "glGetShaderInfoLog"(shader: UInt);
    DeleteShader = "glDeleteShader"(shader: UInt);
    CreateProgram = "glCreateProgram"();
    AttachShader = "glAttachShader"(program: UInt, shader: UInt);
    LinkProgram = "glLinkProgram"(program: UInt);
    GetProgramiv = "glGetProgramiv"(program: UInt, pname: UInt);
    GetProgramInfoLog = "glGetProgramInfoLog"(program: UInt);
    UseProgram = "glUseProgram"(program: UInt);
    DeleteProgram = "glDeleteProgram"(program: UInt);

    // Uniforms and attributes
    GetUniformLocation = "glGetUniformLocation"(program: UInt, name: Name);
    GetAttribLocation = "glGetAttribLocation"(program: UInt, name: Name);
    Uniform2ui = "glUniform2ui"(location: Int, x: UInt, y: UInt);
    Uniform1i = "glUniform1i"(location: Int, x: Int);
    Uniform2f = "glUniform2f"(location: Int, x: Float, y: Float);
    Uniform4f = "glUniform4f"(location: Int, x: Float, y: Float, z: Float, w: Float);
    Uniform3fv = "glUniform3fv"(location: Int, count: UInt, value: Address);
    EnableVertexAttribArray = "glEnableVertexAttribArray"(index: UInt);
    VertexAttribPointer = "glVertexAttribPointer"(
        index: UInt, size: Int, kind: UInt, normalized: Bool, stride: UInt, offset: Address
    );

    // Textures and buffers
    BindTexture = "glBindTexture"(target: UInt, texture: UInt);
    BindBuffer = "glBindBuffer"(target: UInt, buffer: UInt);
    BindVertexArray = "glBindVertexArray"(array: UInt);
    TexStorage3D = "glTexStorage3D"(
        target: UInt, levels: UInt, internal_format: UInt, width: UInt, height: UInt, depth: UInt
    );
    TexSubImage3D = "glTexSubImage3D"(
        target: UInt, level: Int, x: Int, y: Int, z: Int, width: UInt, height: UInt, depth: UInt,
        format: UInt, kind: UInt, pixels: Address
    );
    GetTexImage = "glGetTexImage"(target: UInt, level: Int, format: UInt, kind: UInt, pixels: Address);
    NamedBufferData = "glNamedBufferData"(buffer: UInt, size: Size, data: Address, usage: UInt);
    TexBuffer = "glTexBuffer"(target: UInt, internal_format: UInt, buffer: UInt);
    TexParameteri = "glTexParameteri"(target: UInt, pname: UInt, param: Int);
    CopyImageSubData = "glCopyImageSubData"(
        src: UInt, src_target: UInt, src_level: Int, src_x: Int, src_y: Int, src_z: Int,
        dst: UInt, dst_target: UInt, dst_level: Int, dst_x: Int, dst_y: Int, dst_z: Int,
        width: UInt, height: UInt, depth: UInt
    );
    /// Red-plane extraction from a four-channel array texture.
    ExtractRedChannel = "copy_image_sub_data"(
        src: UInt, dst: UInt, width: UInt, height: UInt, layers: UInt
    );

    // Draw
    DrawArrays = "glDrawArrays"(mode: UInt, first: Int, count: UInt);
    DrawArraysInstanced = "glDrawArraysInstanced"(mode: UInt, first: Int, count: UInt, instance_count: UInt);
    MultiDrawArrays = "glMultiDrawArrays"(mode: UInt, first: Address, count: Address, draw_count: UInt);

    // Diagnostics and control
    EnableErrorChecking = "enable_automatic_opengl_error_checking"(enabled: Bool);
    CheckError = "glCheckError"();
    Bootstrap = "glewInit"();
}

impl Operation {
    /// The name the host calls this operation by.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }
}

/// One name as a scalar, anything else as a list.
fn names_value<H: Into<u32>>(names: Vec<H>) -> HostValue {
    let mut values: Vec<HostValue> = names
        .into_iter()
        .map(|h| HostValue::from(Into::<u32>::into(h)))
        .collect();
    if values.len() == 1 {
        values.swap_remove(0)
    } else {
        HostValue::List(values)
    }
}

fn unit(result: GlResult<()>) -> GlResult<HostValue> {
    result.map(|()| HostValue::None)
}

impl<D: GlDriver> GlContext<D> {
    /// Call `op` with host arguments.
    ///
    /// # Safety
    /// Arguments in address positions are dereferenced as raw memory of the
    /// size the operation implies; the caller vouches for them exactly as for
    /// the typed `unsafe` methods.
    pub unsafe fn invoke(&mut self, op: Operation, args: &[HostValue]) -> GlResult<HostValue> {
        let a = Args::new(op.descriptor(), args)?;
        trace!(operation = op.name(), "invoke");

        match op {
            Operation::Viewport => unit(self.viewport(a.uint(0)?, a.uint(1)?, a.uint(2)?, a.uint(3)?)),
            Operation::ClearColor => {
                unit(self.clear_color(a.float(0)?, a.float(1)?, a.float(2)?, a.float(3)?))
            }
            Operation::Clear => unit(self.clear(a.uint(0)?)),
            Operation::Enable => unit(self.enable(a.uint(0)?)),
            Operation::Disable => unit(self.disable(a.uint(0)?)),
            Operation::BlendFunc => unit(self.blend_func(a.uint(0)?, a.uint(1)?)),
            Operation::PixelStorei => unit(self.pixel_store_i(a.uint(0)?, a.int(1)?)),
            Operation::GetIntegerv => self.get_integer(a.uint(0)?).map(HostValue::from),
            Operation::GetString => self.get_string(a.uint(0)?).map(HostValue::Bytes),
            Operation::ActiveTexture => unit(self.active_texture(a.uint(0)?)),

            Operation::GenVertexArrays => self.gen_vertex_arrays(batch_count(&a)?).map(names_value),
            Operation::GenTextures => self.gen_textures(batch_count(&a)?).map(names_value),
            Operation::GenBuffers => self.gen_buffers(batch_count(&a)?).map(names_value),
            Operation::DeleteTexture => unit(self.delete_texture(TextureId::from_raw(a.uint(0)?))),
            Operation::DeleteBuffer => unit(self.delete_buffer(BufferId::from_raw(a.uint(0)?))),

            Operation::CreateShader => self
                .create_shader(a.uint(0)?)
                .map(|s| HostValue::from(s.raw())),
            Operation::ShaderSource => {
                unit(self.shader_source(ShaderId::from_raw(a.uint(0)?), a.text(1)?))
            }
            Operation::CompileShader => unit(self.compile_shader(ShaderId::from_raw(a.uint(0)?))),
            Operation::GetShaderiv => self
                .get_shader_iv(ShaderId::from_raw(a.uint(0)?), a.uint(1)?)
                .map(HostValue::from),
            Operation::GetShaderInfoLog => self
                .shader_info_log(ShaderId::from_raw(a.uint(0)?))
                .map(HostValue::Bytes),
            Operation::DeleteShader => unit(self.delete_shader(ShaderId::from_raw(a.uint(0)?))),
            Operation::CreateProgram => self.create_program().map(|p| HostValue::from(p.raw())),
            Operation::AttachShader => unit(self.attach_shader(
                ProgramId::from_raw(a.uint(0)?),
                ShaderId::from_raw(a.uint(1)?),
            )),
            Operation::LinkProgram => unit(self.link_program(ProgramId::from_raw(a.uint(0)?))),
            Operation::GetProgramiv => self
                .get_program_iv(ProgramId::from_raw(a.uint(0)?), a.uint(1)?)
                .map(HostValue::from),
            Operation::GetProgramInfoLog => self
                .program_info_log(ProgramId::from_raw(a.uint(0)?))
                .map(HostValue::Bytes),
            Operation::UseProgram => unit(self.use_program(ProgramId::from_raw(a.uint(0)?))),
            Operation::DeleteProgram => unit(self.delete_program(ProgramId::from_raw(a.uint(0)?))),

            Operation::GetUniformLocation => self
                .get_uniform_location(ProgramId::from_raw(a.uint(0)?), a.name(1)?)
                .map(HostValue::from),
            Operation::GetAttribLocation => self
                .get_attrib_location(ProgramId::from_raw(a.uint(0)?), a.name(1)?)
                .map(HostValue::from),
            Operation::Uniform2ui => unit(self.uniform_2ui(a.int(0)?, a.uint(1)?, a.uint(2)?)),
            Operation::Uniform1i => unit(self.uniform_1i(a.int(0)?, a.int(1)?)),
            Operation::Uniform2f => unit(self.uniform_2f(a.int(0)?, a.float(1)?, a.float(2)?)),
            Operation::Uniform4f => unit(self.uniform_4f(
                a.int(0)?,
                a.float(1)?,
                a.float(2)?,
                a.float(3)?,
                a.float(4)?,
            )),
            Operation::Uniform3fv => unit(unsafe {
                self.uniform_3fv(a.int(0)?, a.uint(1)?, a.address(2)? as *const f32)
            }),
            Operation::EnableVertexAttribArray => unit(self.enable_vertex_attrib_array(a.uint(0)?)),
            Operation::VertexAttribPointer => unit(unsafe {
                self.vertex_attrib_pointer(
                    a.uint(0)?,
                    a.int(1)?,
                    a.uint(2)?,
                    a.bool(3)?,
                    a.uint(4)?,
                    a.address(5)?,
                )
            }),

            Operation::BindTexture => {
                unit(self.bind_texture(a.uint(0)?, TextureId::from_raw(a.uint(1)?)))
            }
            Operation::BindBuffer => unit(self.bind_buffer(a.uint(0)?, BufferId::from_raw(a.uint(1)?))),
            Operation::BindVertexArray => {
                unit(self.bind_vertex_array(VertexArrayId::from_raw(a.uint(0)?)))
            }
            Operation::TexStorage3D => unit(self.tex_storage_3d(
                a.uint(0)?,
                a.uint(1)?,
                a.uint(2)?,
                a.uint(3)?,
                a.uint(4)?,
                a.uint(5)?,
            )),
            Operation::TexSubImage3D => unit(unsafe {
                self.tex_sub_image_3d(
                    a.uint(0)?,
                    a.int(1)?,
                    a.int(2)?,
                    a.int(3)?,
                    a.int(4)?,
                    a.uint(5)?,
                    a.uint(6)?,
                    a.uint(7)?,
                    a.uint(8)?,
                    a.uint(9)?,
                    a.address(10)? as *const c_void,
                )
            }),
            Operation::GetTexImage => unit(unsafe {
                self.get_tex_image(
                    a.uint(0)?,
                    a.int(1)?,
                    a.uint(2)?,
                    a.uint(3)?,
                    a.address(4)? as *mut c_void,
                )
            }),
            Operation::NamedBufferData => unit(unsafe {
                self.upload_buffer_data(
                    BufferId::from_raw(a.uint(0)?),
                    a.size(1)?,
                    a.address(2)? as *const c_void,
                    a.uint(3)?,
                )
            }),
            Operation::TexBuffer => unit(self.tex_buffer(
                a.uint(0)?,
                a.uint(1)?,
                BufferId::from_raw(a.uint(2)?),
            )),
            Operation::TexParameteri => unit(self.tex_parameter_i(a.uint(0)?, a.uint(1)?, a.int(2)?)),
            Operation::CopyImageSubData => unit(self.copy_image_sub_data(
                TextureId::from_raw(a.uint(0)?),
                a.uint(1)?,
                a.int(2)?,
                a.int(3)?,
                a.int(4)?,
                a.int(5)?,
                TextureId::from_raw(a.uint(6)?),
                a.uint(7)?,
                a.int(8)?,
                a.int(9)?,
                a.int(10)?,
                a.int(11)?,
                a.uint(12)?,
                a.uint(13)?,
                a.uint(14)?,
            )),
            Operation::ExtractRedChannel => unit(unsafe {
                self.extract_red_channel(
                    TextureId::from_raw(a.uint(0)?),
                    TextureId::from_raw(a.uint(1)?),
                    a.uint(2)?,
                    a.uint(3)?,
                    a.uint(4)?,
                )
            }),

            Operation::DrawArrays => unit(self.draw_arrays(a.uint(0)?, a.int(1)?, a.uint(2)?)),
            Operation::DrawArraysInstanced => unit(self.draw_arrays_instanced(
                a.uint(0)?,
                a.int(1)?,
                a.uint(2)?,
                a.uint(3)?,
            )),
            Operation::MultiDrawArrays => unit(unsafe {
                self.multi_draw_arrays(
                    a.uint(0)?,
                    a.address(1)? as *const i32,
                    a.address(2)? as *const i32,
                    a.uint(3)?,
                )
            }),

            Operation::EnableErrorChecking => {
                self.set_error_checking(a.bool(0)?);
                Ok(HostValue::None)
            }
            Operation::CheckError => unit(self.check_error()),
            Operation::Bootstrap => unit(self.bootstrap()),
        }
    }

    /// [`invoke`](Self::invoke) by host-visible name.
    ///
    /// # Safety
    /// Same contract as [`invoke`](Self::invoke).
    pub unsafe fn invoke_by_name(&mut self, name: &str, args: &[HostValue]) -> GlResult<HostValue> {
        let op = Operation::from_name(name).ok_or_else(|| GlError::UnknownOperation {
            name: name.to_string(),
        })?;
        unsafe { self.invoke(op, args) }
    }
}

/// Batch sizes beyond the address space can only ever be too many.
fn batch_count(args: &Args<'_>) -> GlResult<usize> {
    Ok(usize::try_from(args.count(0)?).unwrap_or(usize::MAX))
}
