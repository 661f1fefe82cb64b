//! Dynamic loading of the system OpenGL library.
//!
//! Uses `libloading` to open `libGL.so.1` (Linux), `opengl32.dll` (Windows)
//! or the OpenGL framework (macOS). Core entry points are resolved when the
//! library is loaded; extension entry points are resolved by
//! [`GlDriver::init_extension_loading`], once a context is current.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};
use std::sync::OnceLock;

use libloading::{Library, Symbol};
use tracing::{debug, info};

use glbridge_common::platform;

use crate::consts::GL_VERSION;
use crate::driver::{ExtensionLoading, GlDriver, MissingEntryPoint};

type GLenum = c_uint;
type GLuint = c_uint;
type GLint = c_int;
type GLsizei = c_int;
type GLsizeiptr = isize;
type GLfloat = f32;
type GLboolean = u8;
type GLbitfield = c_uint;
type GLchar = c_char;

type FnGetProcAddress = unsafe extern "system" fn(name: *const c_char) -> *const c_void;

type FnGetError = unsafe extern "system" fn() -> GLenum;
type FnGetString = unsafe extern "system" fn(name: GLenum) -> *const u8;
type FnGetIntegerv = unsafe extern "system" fn(pname: GLenum, data: *mut GLint);
type FnViewport = unsafe extern "system" fn(x: GLint, y: GLint, width: GLsizei, height: GLsizei);
type FnClearColor = unsafe extern "system" fn(r: GLfloat, g: GLfloat, b: GLfloat, a: GLfloat);
type FnClear = unsafe extern "system" fn(mask: GLbitfield);
type FnEnable = unsafe extern "system" fn(cap: GLenum);
type FnDisable = unsafe extern "system" fn(cap: GLenum);
type FnBlendFunc = unsafe extern "system" fn(sfactor: GLenum, dfactor: GLenum);
type FnPixelStorei = unsafe extern "system" fn(pname: GLenum, param: GLint);
type FnGenNames = unsafe extern "system" fn(n: GLsizei, names: *mut GLuint);
type FnDeleteNames = unsafe extern "system" fn(n: GLsizei, names: *const GLuint);
type FnDeleteObject = unsafe extern "system" fn(object: GLuint);
type FnCreateShader = unsafe extern "system" fn(kind: GLenum) -> GLuint;
type FnShaderSource = unsafe extern "system" fn(
    shader: GLuint,
    count: GLsizei,
    strings: *const *const GLchar,
    lengths: *const GLint,
);
type FnObjectOp = unsafe extern "system" fn(object: GLuint);
type FnGetObjectiv = unsafe extern "system" fn(object: GLuint, pname: GLenum, params: *mut GLint);
type FnGetInfoLog = unsafe extern "system" fn(
    object: GLuint,
    buf_size: GLsizei,
    length: *mut GLsizei,
    log: *mut GLchar,
);
type FnCreateProgram = unsafe extern "system" fn() -> GLuint;
type FnAttachShader = unsafe extern "system" fn(program: GLuint, shader: GLuint);
type FnGetLocation = unsafe extern "system" fn(program: GLuint, name: *const GLchar) -> GLint;
type FnUniform2ui = unsafe extern "system" fn(location: GLint, x: GLuint, y: GLuint);
type FnUniform1i = unsafe extern "system" fn(location: GLint, x: GLint);
type FnUniform2f = unsafe extern "system" fn(location: GLint, x: GLfloat, y: GLfloat);
type FnUniform4f = unsafe extern "system" fn(
    location: GLint,
    x: GLfloat,
    y: GLfloat,
    z: GLfloat,
    w: GLfloat,
);
type FnUniform3fv = unsafe extern "system" fn(
    location: GLint,
    count: GLsizei,
    value: *const GLfloat,
);
type FnVertexAttribPointer = unsafe extern "system" fn(
    index: GLuint,
    size: GLint,
    kind: GLenum,
    normalized: GLboolean,
    stride: GLsizei,
    pointer: *const c_void,
);
type FnActiveTexture = unsafe extern "system" fn(unit: GLenum);
type FnBindTarget = unsafe extern "system" fn(target: GLenum, name: GLuint);
type FnTexSubImage3D = unsafe extern "system" fn(
    target: GLenum,
    level: GLint,
    x: GLint,
    y: GLint,
    z: GLint,
    width: GLsizei,
    height: GLsizei,
    depth: GLsizei,
    format: GLenum,
    kind: GLenum,
    pixels: *const c_void,
);
type FnGetTexImage = unsafe extern "system" fn(
    target: GLenum,
    level: GLint,
    format: GLenum,
    kind: GLenum,
    pixels: *mut c_void,
);
type FnBufferData = unsafe extern "system" fn(
    target: GLenum,
    size: GLsizeiptr,
    data: *const c_void,
    usage: GLenum,
);
type FnTexBuffer = unsafe extern "system" fn(
    target: GLenum,
    internal_format: GLenum,
    buffer: GLuint,
);
type FnTexParameteri = unsafe extern "system" fn(target: GLenum, pname: GLenum, param: GLint);
type FnDrawArrays = unsafe extern "system" fn(mode: GLenum, first: GLint, count: GLsizei);
type FnDrawArraysInstanced = unsafe extern "system" fn(
    mode: GLenum,
    first: GLint,
    count: GLsizei,
    instance_count: GLsizei,
);
type FnMultiDrawArrays = unsafe extern "system" fn(
    mode: GLenum,
    first: *const GLint,
    count: *const GLsizei,
    draw_count: GLsizei,
);

// Extension entry points
type FnGetStringi = unsafe extern "system" fn(name: GLenum, index: GLuint) -> *const u8;
type FnTexStorage3D = unsafe extern "system" fn(
    target: GLenum,
    levels: GLsizei,
    internal_format: GLenum,
    width: GLsizei,
    height: GLsizei,
    depth: GLsizei,
);
type FnNamedBufferData = unsafe extern "system" fn(
    buffer: GLuint,
    size: GLsizeiptr,
    data: *const c_void,
    usage: GLenum,
);
type FnCopyImageSubData = unsafe extern "system" fn(
    src: GLuint,
    src_target: GLenum,
    src_level: GLint,
    src_x: GLint,
    src_y: GLint,
    src_z: GLint,
    dst: GLuint,
    dst_target: GLenum,
    dst_level: GLint,
    dst_x: GLint,
    dst_y: GLint,
    dst_z: GLint,
    width: GLsizei,
    height: GLsizei,
    depth: GLsizei,
);

/// Entry points that only exist with a newer core version or an extension.
struct ExtEntryPoints {
    gl_get_stringi: Option<FnGetStringi>,
    gl_tex_storage_3d: Option<FnTexStorage3D>,
    gl_named_buffer_data: Option<FnNamedBufferData>,
    gl_copy_image_sub_data: Option<FnCopyImageSubData>,
}

/// The system OpenGL library with resolved function pointers.
pub struct GlLibrary {
    lib: Library,
    get_proc_address: Option<FnGetProcAddress>,
    gl_get_error: FnGetError,
    gl_get_string: FnGetString,
    gl_get_integerv: FnGetIntegerv,
    gl_viewport: FnViewport,
    gl_clear_color: FnClearColor,
    gl_clear: FnClear,
    gl_enable: FnEnable,
    gl_disable: FnDisable,
    gl_blend_func: FnBlendFunc,
    gl_pixel_storei: FnPixelStorei,
    gl_gen_vertex_arrays: FnGenNames,
    gl_gen_textures: FnGenNames,
    gl_gen_buffers: FnGenNames,
    gl_delete_textures: FnDeleteNames,
    gl_delete_buffers: FnDeleteNames,
    gl_delete_program: FnDeleteObject,
    gl_delete_shader: FnDeleteObject,
    gl_create_shader: FnCreateShader,
    gl_shader_source: FnShaderSource,
    gl_compile_shader: FnObjectOp,
    gl_get_shaderiv: FnGetObjectiv,
    gl_get_shader_info_log: FnGetInfoLog,
    gl_create_program: FnCreateProgram,
    gl_attach_shader: FnAttachShader,
    gl_link_program: FnObjectOp,
    gl_get_programiv: FnGetObjectiv,
    gl_get_program_info_log: FnGetInfoLog,
    gl_use_program: FnObjectOp,
    gl_get_uniform_location: FnGetLocation,
    gl_get_attrib_location: FnGetLocation,
    gl_uniform_2ui: FnUniform2ui,
    gl_uniform_1i: FnUniform1i,
    gl_uniform_2f: FnUniform2f,
    gl_uniform_4f: FnUniform4f,
    gl_uniform_3fv: FnUniform3fv,
    gl_enable_vertex_attrib_array: FnObjectOp,
    gl_vertex_attrib_pointer: FnVertexAttribPointer,
    gl_active_texture: FnActiveTexture,
    gl_bind_texture: FnBindTarget,
    gl_bind_buffer: FnBindTarget,
    gl_bind_vertex_array: FnObjectOp,
    gl_tex_sub_image_3d: FnTexSubImage3D,
    gl_get_tex_image: FnGetTexImage,
    gl_buffer_data: FnBufferData,
    gl_tex_buffer: FnTexBuffer,
    gl_tex_parameteri: FnTexParameteri,
    gl_draw_arrays: FnDrawArrays,
    gl_draw_arrays_instanced: FnDrawArraysInstanced,
    gl_multi_draw_arrays: FnMultiDrawArrays,
    ext: OnceLock<ExtEntryPoints>,
}

impl GlLibrary {
    /// Load the system OpenGL library, trying `extra_paths` before the
    /// platform defaults, and resolve all core entry points.
    ///
    /// On Windows core entry points past GL 1.1 only resolve once a context
    /// is current, so load after context creation.
    pub fn load(extra_paths: &[String]) -> Result<Self, String> {
        let lib = Self::load_library(extra_paths)?;

        unsafe {
            let get_proc: Option<FnGetProcAddress> =
                platform::proc_address_symbol().and_then(|name| Self::load_sym_opt(&lib, name));
            let get_proc = get_proc.as_ref();

            let driver = Self {
                gl_get_error: Self::load_fn(&lib, get_proc, "glGetError")?,
                gl_get_string: Self::load_fn(&lib, get_proc, "glGetString")?,
                gl_get_integerv: Self::load_fn(&lib, get_proc, "glGetIntegerv")?,
                gl_viewport: Self::load_fn(&lib, get_proc, "glViewport")?,
                gl_clear_color: Self::load_fn(&lib, get_proc, "glClearColor")?,
                gl_clear: Self::load_fn(&lib, get_proc, "glClear")?,
                gl_enable: Self::load_fn(&lib, get_proc, "glEnable")?,
                gl_disable: Self::load_fn(&lib, get_proc, "glDisable")?,
                gl_blend_func: Self::load_fn(&lib, get_proc, "glBlendFunc")?,
                gl_pixel_storei: Self::load_fn(&lib, get_proc, "glPixelStorei")?,
                gl_gen_vertex_arrays: Self::load_fn(&lib, get_proc, "glGenVertexArrays")?,
                gl_gen_textures: Self::load_fn(&lib, get_proc, "glGenTextures")?,
                gl_gen_buffers: Self::load_fn(&lib, get_proc, "glGenBuffers")?,
                gl_delete_textures: Self::load_fn(&lib, get_proc, "glDeleteTextures")?,
                gl_delete_buffers: Self::load_fn(&lib, get_proc, "glDeleteBuffers")?,
                gl_delete_program: Self::load_fn(&lib, get_proc, "glDeleteProgram")?,
                gl_delete_shader: Self::load_fn(&lib, get_proc, "glDeleteShader")?,
                gl_create_shader: Self::load_fn(&lib, get_proc, "glCreateShader")?,
                gl_shader_source: Self::load_fn(&lib, get_proc, "glShaderSource")?,
                gl_compile_shader: Self::load_fn(&lib, get_proc, "glCompileShader")?,
                gl_get_shaderiv: Self::load_fn(&lib, get_proc, "glGetShaderiv")?,
                gl_get_shader_info_log: Self::load_fn(&lib, get_proc, "glGetShaderInfoLog")?,
                gl_create_program: Self::load_fn(&lib, get_proc, "glCreateProgram")?,
                gl_attach_shader: Self::load_fn(&lib, get_proc, "glAttachShader")?,
                gl_link_program: Self::load_fn(&lib, get_proc, "glLinkProgram")?,
                gl_get_programiv: Self::load_fn(&lib, get_proc, "glGetProgramiv")?,
                gl_get_program_info_log: Self::load_fn(&lib, get_proc, "glGetProgramInfoLog")?,
                gl_use_program: Self::load_fn(&lib, get_proc, "glUseProgram")?,
                gl_get_uniform_location: Self::load_fn(&lib, get_proc, "glGetUniformLocation")?,
                gl_get_attrib_location: Self::load_fn(&lib, get_proc, "glGetAttribLocation")?,
                gl_uniform_2ui: Self::load_fn(&lib, get_proc, "glUniform2ui")?,
                gl_uniform_1i: Self::load_fn(&lib, get_proc, "glUniform1i")?,
                gl_uniform_2f: Self::load_fn(&lib, get_proc, "glUniform2f")?,
                gl_uniform_4f: Self::load_fn(&lib, get_proc, "glUniform4f")?,
                gl_uniform_3fv: Self::load_fn(&lib, get_proc, "glUniform3fv")?,
                gl_enable_vertex_attrib_array: Self::load_fn(
                    &lib,
                    get_proc,
                    "glEnableVertexAttribArray",
                )?,
                gl_vertex_attrib_pointer: Self::load_fn(&lib, get_proc, "glVertexAttribPointer")?,
                gl_active_texture: Self::load_fn(&lib, get_proc, "glActiveTexture")?,
                gl_bind_texture: Self::load_fn(&lib, get_proc, "glBindTexture")?,
                gl_bind_buffer: Self::load_fn(&lib, get_proc, "glBindBuffer")?,
                gl_bind_vertex_array: Self::load_fn(&lib, get_proc, "glBindVertexArray")?,
                gl_tex_sub_image_3d: Self::load_fn(&lib, get_proc, "glTexSubImage3D")?,
                gl_get_tex_image: Self::load_fn(&lib, get_proc, "glGetTexImage")?,
                gl_buffer_data: Self::load_fn(&lib, get_proc, "glBufferData")?,
                gl_tex_buffer: Self::load_fn(&lib, get_proc, "glTexBuffer")?,
                gl_tex_parameteri: Self::load_fn(&lib, get_proc, "glTexParameteri")?,
                gl_draw_arrays: Self::load_fn(&lib, get_proc, "glDrawArrays")?,
                gl_draw_arrays_instanced: Self::load_fn(&lib, get_proc, "glDrawArraysInstanced")?,
                gl_multi_draw_arrays: Self::load_fn(&lib, get_proc, "glMultiDrawArrays")?,
                get_proc_address: get_proc.copied(),
                ext: OnceLock::new(),
                lib,
            };

            info!("OpenGL driver loaded ({})", platform::platform_name());
            Ok(driver)
        }
    }

    fn load_library(extra_paths: &[String]) -> Result<Library, String> {
        let candidates = extra_paths
            .iter()
            .map(String::as_str)
            .chain(platform::default_gl_library_names().iter().copied());

        let mut last_err = String::from("no candidate library names");
        for name in candidates {
            match unsafe { Library::new(name) } {
                Ok(lib) => {
                    info!("loaded OpenGL driver from: {}", name);
                    return Ok(lib);
                }
                Err(e) => {
                    last_err = format!("{}: {}", name, e);
                    debug!("failed to load {}: {}", name, e);
                }
            }
        }

        Err(format!("failed to load OpenGL driver library: {}", last_err))
    }

    unsafe fn load_sym_opt<F: Copy>(lib: &Library, name: &str) -> Option<F> {
        unsafe { lib.get(name.as_bytes()).ok().map(|s: Symbol<F>| *s) }
    }

    /// Resolve `name` from the library exports, then through the platform's
    /// get-proc-address.
    unsafe fn load_fn_opt<F: Copy>(
        lib: &Library,
        get_proc: Option<&FnGetProcAddress>,
        name: &str,
    ) -> Option<F> {
        if let Some(f) = unsafe { Self::load_sym_opt(lib, name) } {
            return Some(f);
        }
        let get_proc = get_proc?;
        let cname = CString::new(name).ok()?;
        let ptr = unsafe { get_proc(cname.as_ptr()) };
        // wglGetProcAddress signals failure with small sentinels as well as null
        if matches!(ptr as usize, 0 | 1 | 2 | 3 | usize::MAX) {
            return None;
        }
        debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*const c_void>());
        Some(unsafe { std::mem::transmute_copy::<*const c_void, F>(&ptr) })
    }

    unsafe fn load_fn<F: Copy>(
        lib: &Library,
        get_proc: Option<&FnGetProcAddress>,
        name: &str,
    ) -> Result<F, String> {
        unsafe { Self::load_fn_opt(lib, get_proc, name) }
            .ok_or_else(|| format!("failed to load {}", name))
    }

    fn ext(&self) -> Option<&ExtEntryPoints> {
        self.ext.get()
    }

    fn read_string(ptr: *const u8) -> Option<Vec<u8>> {
        if ptr.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(ptr as *const c_char) }.to_bytes().to_vec())
    }
}

impl GlDriver for GlLibrary {
    fn extension_loading(&self) -> ExtensionLoading {
        if platform::extension_loading_builtin() {
            ExtensionLoading::BuiltIn
        } else {
            ExtensionLoading::Dynamic
        }
    }

    fn init_extension_loading(&self) -> Result<(), String> {
        if Self::read_string(unsafe { (self.gl_get_string)(GL_VERSION) }).is_none() {
            return Err("missing GL version (no context current on this thread?)".to_string());
        }
        let get_proc = self.get_proc_address.as_ref();
        self.ext.get_or_init(|| unsafe {
            ExtEntryPoints {
                gl_get_stringi: Self::load_fn_opt(&self.lib, get_proc, "glGetStringi"),
                gl_tex_storage_3d: Self::load_fn_opt(&self.lib, get_proc, "glTexStorage3D"),
                gl_named_buffer_data: Self::load_fn_opt(&self.lib, get_proc, "glNamedBufferData"),
                gl_copy_image_sub_data: Self::load_fn_opt(
                    &self.lib,
                    get_proc,
                    "glCopyImageSubData",
                ),
            }
        });
        debug!("extension entry points resolved");
        Ok(())
    }

    fn get_error(&self) -> u32 {
        unsafe { (self.gl_get_error)() }
    }

    fn get_string(&self, name: u32) -> Option<Vec<u8>> {
        Self::read_string(unsafe { (self.gl_get_string)(name) })
    }

    fn get_string_i(&self, name: u32, index: u32) -> Result<Option<Vec<u8>>, MissingEntryPoint> {
        let func = self
            .ext()
            .and_then(|e| e.gl_get_stringi)
            .ok_or(MissingEntryPoint("glGetStringi"))?;
        Ok(Self::read_string(unsafe { func(name, index) }))
    }

    fn get_integer(&self, pname: u32) -> i32 {
        // Some queries write several values; only the first is reported.
        let mut values: [GLint; 4] = [0; 4];
        unsafe { (self.gl_get_integerv)(pname, values.as_mut_ptr()) };
        values[0]
    }

    fn viewport(&self, x: u32, y: u32, width: u32, height: u32) {
        unsafe { (self.gl_viewport)(x as GLint, y as GLint, width as GLsizei, height as GLsizei) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { (self.gl_clear_color)(red, green, blue, alpha) }
    }

    fn clear(&self, mask: u32) {
        unsafe { (self.gl_clear)(mask) }
    }

    fn enable(&self, cap: u32) {
        unsafe { (self.gl_enable)(cap) }
    }

    fn disable(&self, cap: u32) {
        unsafe { (self.gl_disable)(cap) }
    }

    fn blend_func(&self, sfactor: u32, dfactor: u32) {
        unsafe { (self.gl_blend_func)(sfactor, dfactor) }
    }

    fn pixel_store_i(&self, pname: u32, param: i32) {
        unsafe { (self.gl_pixel_storei)(pname, param) }
    }

    fn gen_vertex_arrays(&self, names: &mut [u32]) {
        unsafe { (self.gl_gen_vertex_arrays)(names.len() as GLsizei, names.as_mut_ptr()) }
    }

    fn gen_textures(&self, names: &mut [u32]) {
        unsafe { (self.gl_gen_textures)(names.len() as GLsizei, names.as_mut_ptr()) }
    }

    fn gen_buffers(&self, names: &mut [u32]) {
        unsafe { (self.gl_gen_buffers)(names.len() as GLsizei, names.as_mut_ptr()) }
    }

    fn delete_textures(&self, names: &[u32]) {
        unsafe { (self.gl_delete_textures)(names.len() as GLsizei, names.as_ptr()) }
    }

    fn delete_buffers(&self, names: &[u32]) {
        unsafe { (self.gl_delete_buffers)(names.len() as GLsizei, names.as_ptr()) }
    }

    fn delete_program(&self, program: u32) {
        unsafe { (self.gl_delete_program)(program) }
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { (self.gl_delete_shader)(shader) }
    }

    fn create_shader(&self, kind: u32) -> u32 {
        unsafe { (self.gl_create_shader)(kind) }
    }

    fn shader_source(&self, shader: u32, source: &[u8]) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { (self.gl_shader_source)(shader, 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: u32) {
        unsafe { (self.gl_compile_shader)(shader) }
    }

    fn get_shader_iv(&self, shader: u32, pname: u32) -> i32 {
        let mut value: GLint = 0;
        unsafe { (self.gl_get_shaderiv)(shader, pname, &mut value) };
        value
    }

    fn get_shader_info_log(&self, shader: u32, buf: &mut [u8]) -> i32 {
        let mut written: GLsizei = 0;
        unsafe {
            (self.gl_get_shader_info_log)(
                shader,
                buf.len() as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut GLchar,
            )
        };
        written
    }

    fn create_program(&self) -> u32 {
        unsafe { (self.gl_create_program)() }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        unsafe { (self.gl_attach_shader)(program, shader) }
    }

    fn link_program(&self, program: u32) {
        unsafe { (self.gl_link_program)(program) }
    }

    fn get_program_iv(&self, program: u32, pname: u32) -> i32 {
        let mut value: GLint = 0;
        unsafe { (self.gl_get_programiv)(program, pname, &mut value) };
        value
    }

    fn get_program_info_log(&self, program: u32, buf: &mut [u8]) -> i32 {
        let mut written: GLsizei = 0;
        unsafe {
            (self.gl_get_program_info_log)(
                program,
                buf.len() as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut GLchar,
            )
        };
        written
    }

    fn use_program(&self, program: u32) {
        unsafe { (self.gl_use_program)(program) }
    }

    fn get_uniform_location(&self, program: u32, name: &CStr) -> i32 {
        unsafe { (self.gl_get_uniform_location)(program, name.as_ptr()) }
    }

    fn get_attrib_location(&self, program: u32, name: &CStr) -> i32 {
        unsafe { (self.gl_get_attrib_location)(program, name.as_ptr()) }
    }

    fn uniform_2ui(&self, location: i32, x: u32, y: u32) {
        unsafe { (self.gl_uniform_2ui)(location, x, y) }
    }

    fn uniform_1i(&self, location: i32, x: i32) {
        unsafe { (self.gl_uniform_1i)(location, x) }
    }

    fn uniform_2f(&self, location: i32, x: f32, y: f32) {
        unsafe { (self.gl_uniform_2f)(location, x, y) }
    }

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { (self.gl_uniform_4f)(location, x, y, z, w) }
    }

    unsafe fn uniform_3fv(&self, location: i32, count: u32, value: *const f32) {
        unsafe { (self.gl_uniform_3fv)(location, count as GLsizei, value) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { (self.gl_enable_vertex_attrib_array)(index) }
    }

    unsafe fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        kind: u32,
        normalized: bool,
        stride: u32,
        offset: *const c_void,
    ) {
        unsafe {
            (self.gl_vertex_attrib_pointer)(
                index,
                size,
                kind,
                normalized as GLboolean,
                stride as GLsizei,
                offset,
            )
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { (self.gl_active_texture)(unit) }
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        unsafe { (self.gl_bind_texture)(target, texture) }
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        unsafe { (self.gl_bind_buffer)(target, buffer) }
    }

    fn bind_vertex_array(&self, array: u32) {
        unsafe { (self.gl_bind_vertex_array)(array) }
    }

    fn tex_storage_3d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<(), MissingEntryPoint> {
        let func = self
            .ext()
            .and_then(|e| e.gl_tex_storage_3d)
            .ok_or(MissingEntryPoint("glTexStorage3D"))?;
        unsafe {
            func(
                target,
                levels as GLsizei,
                internal_format,
                width as GLsizei,
                height as GLsizei,
                depth as GLsizei,
            )
        };
        Ok(())
    }

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
    ) {
        unsafe {
            (self.gl_tex_sub_image_3d)(
                target,
                level,
                x,
                y,
                z,
                width as GLsizei,
                height as GLsizei,
                depth as GLsizei,
                format,
                kind,
                pixels,
            )
        }
    }

    unsafe fn get_tex_image(
        &self,
        target: u32,
        level: i32,
        format: u32,
        kind: u32,
        pixels: *mut c_void,
    ) {
        unsafe { (self.gl_get_tex_image)(target, level, format, kind, pixels) }
    }

    unsafe fn buffer_data(&self, target: u32, size: usize, data: *const c_void, usage: u32) {
        unsafe { (self.gl_buffer_data)(target, size as GLsizeiptr, data, usage) }
    }

    unsafe fn named_buffer_data(
        &self,
        buffer: u32,
        size: usize,
        data: *const c_void,
        usage: u32,
    ) -> Result<(), MissingEntryPoint> {
        let func = self
            .ext()
            .and_then(|e| e.gl_named_buffer_data)
            .ok_or(MissingEntryPoint("glNamedBufferData"))?;
        unsafe { func(buffer, size as GLsizeiptr, data, usage) };
        Ok(())
    }

    fn tex_buffer(&self, target: u32, internal_format: u32, buffer: u32) {
        unsafe { (self.gl_tex_buffer)(target, internal_format, buffer) }
    }

    fn tex_parameter_i(&self, target: u32, pname: u32, param: i32) {
        unsafe { (self.gl_tex_parameteri)(target, pname, param) }
    }

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
    ) -> Result<(), MissingEntryPoint> {
        let func = self
            .ext()
            .and_then(|e| e.gl_copy_image_sub_data)
            .ok_or(MissingEntryPoint("glCopyImageSubData"))?;
        unsafe {
            func(
                src,
                src_target,
                src_level,
                src_x,
                src_y,
                src_z,
                dst,
                dst_target,
                dst_level,
                dst_x,
                dst_y,
                dst_z,
                width as GLsizei,
                height as GLsizei,
                depth as GLsizei,
            )
        };
        Ok(())
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: u32) {
        unsafe { (self.gl_draw_arrays)(mode, first, count as GLsizei) }
    }

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: u32, instance_count: u32) {
        unsafe {
            (self.gl_draw_arrays_instanced)(
                mode,
                first,
                count as GLsizei,
                instance_count as GLsizei,
            )
        }
    }

    unsafe fn multi_draw_arrays(
        &self,
        mode: u32,
        first: *const i32,
        count: *const i32,
        draw_count: u32,
    ) {
        unsafe { (self.gl_multi_draw_arrays)(mode, first, count, draw_count as GLsizei) }
    }
}
