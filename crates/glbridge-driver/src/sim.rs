//! In-process simulated OpenGL driver.
//!
//! Behaves like a conforming core-profile driver for the subset of entry
//! points the bridge uses: a single sticky error slot (first error wins,
//! cleared on read), distinct nonzero names, shader compile and program link
//! with info logs, texture and buffer storage backed by host memory. Every
//! native call is journaled so tests can assert on exactly which calls were
//! (or were not) issued.
//!
//! Shader "compilation" is line based: every line containing `#error`
//! produces one diagnostic. Declarations of the form `uniform <type> <name>;`
//! and (in vertex shaders) `in <type> <name>;` become the program's active
//! uniforms and attributes, numbered in order of first appearance.
//!
//! Texture views of buffers (`glTexBuffer`) can be read back with
//! `glGetTexImage` on the texture-buffer target, which yields the raw buffer
//! bytes.

use std::collections::{HashMap, HashSet};
use std::ffi::{c_void, CStr};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::consts::*;
use crate::driver::{ExtensionLoading, GlDriver, MissingEntryPoint};

const GL_TEXTURE_2D: u32 = 0x0DE1;
const GL_ELEMENT_ARRAY_BUFFER: u32 = 0x8893;
const GL_UNIFORM_BUFFER: u32 = 0x8A11;
const GL_PIXEL_PACK_BUFFER: u32 = 0x88EB;
const GL_PIXEL_UNPACK_BUFFER: u32 = 0x88EC;

const MAX_TEXTURE_SIZE: u32 = 16384;
const MAX_ARRAY_TEXTURE_LAYERS: u32 = 2048;
const MAX_VERTEX_ATTRIBS: u32 = 16;
const MAX_TEXTURE_UNITS: u32 = 32;
/// Allocations above this report GL_OUT_OF_MEMORY.
const MEMORY_BUDGET: usize = 256 * 1024 * 1024;

pub const SIM_VERSION: &str = "4.6.0 glbridge simulated driver";

type CallHook = Arc<dyn Fn(&'static str) + Send + Sync>;

/// Last value written to a uniform location.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    UInt2([u32; 2]),
    Int1(i32),
    Float2([f32; 2]),
    Float4([f32; 4]),
    Float3v(Vec<[f32; 3]>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimDraw {
    pub mode: u32,
    pub first: i32,
    pub count: u32,
    pub instances: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimAttribPointer {
    pub size: i32,
    pub kind: u32,
    pub normalized: bool,
    pub stride: u32,
    pub offset: usize,
}

#[derive(Default)]
struct SimVertexArray {
    enabled: HashSet<u32>,
    pointers: HashMap<u32, SimAttribPointer>,
}

struct TexStorage {
    format: u32,
    levels: u32,
    width: u32,
    height: u32,
    depth: u32,
    data: Vec<u8>,
}

#[derive(Default)]
struct SimTexture {
    /// Zero until first bound.
    target: u32,
    storage: Option<TexStorage>,
    buffer_view: Option<(u32, u32)>,
    params: HashMap<u32, i32>,
}

struct SimShader {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct SimProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
    attribs: Vec<String>,
    values: HashMap<i32, UniformValue>,
}

struct SimState {
    calls: Vec<&'static str>,
    error: u32,
    injected: HashMap<&'static str, u32>,

    version: Option<String>,
    extensions: Vec<String>,
    missing: HashSet<&'static str>,
    loading: ExtensionLoading,
    loader_failure: Option<String>,

    next_texture: u32,
    next_buffer: u32,
    next_vertex_array: u32,
    next_object: u32,

    viewport: [u32; 4],
    clear_color: [f32; 4],
    clears: Vec<u32>,
    enabled: HashSet<u32>,
    blend: (u32, u32),
    unpack_alignment: i32,
    pack_alignment: i32,

    textures: HashMap<u32, SimTexture>,
    buffers: HashMap<u32, Vec<u8>>,
    vertex_arrays: HashMap<u32, SimVertexArray>,
    shaders: HashMap<u32, SimShader>,
    programs: HashMap<u32, SimProgram>,

    active_unit: u32,
    texture_bindings: HashMap<(u32, u32), u32>,
    buffer_bindings: HashMap<u32, u32>,
    bound_vertex_array: u32,
    current_program: u32,

    draws: Vec<SimDraw>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            error: GL_NO_ERROR,
            injected: HashMap::new(),
            version: Some(SIM_VERSION.to_string()),
            extensions: vec![
                "GL_ARB_texture_storage".to_string(),
                "GL_ARB_texture_buffer_object_rgb32".to_string(),
                "GL_ARB_copy_image".to_string(),
                "GL_ARB_direct_state_access".to_string(),
            ],
            missing: HashSet::new(),
            loading: ExtensionLoading::Dynamic,
            loader_failure: None,
            next_texture: 1,
            next_buffer: 1,
            next_vertex_array: 1,
            next_object: 1,
            viewport: [0; 4],
            clear_color: [0.0; 4],
            clears: Vec::new(),
            enabled: HashSet::new(),
            blend: (GL_ONE, GL_ZERO),
            unpack_alignment: 4,
            pack_alignment: 4,
            textures: HashMap::new(),
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            active_unit: 0,
            texture_bindings: HashMap::new(),
            buffer_bindings: HashMap::new(),
            bound_vertex_array: 0,
            current_program: 0,
            draws: Vec::new(),
        }
    }
}

impl SimState {
    /// Record an error unless one is already pending.
    fn raise(&mut self, code: u32) {
        if self.error == GL_NO_ERROR {
            self.error = code;
        }
    }

    fn bound_texture(&self, target: u32) -> u32 {
        self.texture_bindings
            .get(&(self.active_unit, target))
            .copied()
            .unwrap_or(0)
    }

    fn bound_buffer(&self, target: u32) -> u32 {
        self.buffer_bindings.get(&target).copied().unwrap_or(0)
    }

    /// Shader calls on a program name are an operation error, unknown names
    /// a value error.
    fn missing_shader_error(&self, shader: u32) -> u32 {
        if self.programs.contains_key(&shader) {
            GL_INVALID_OPERATION
        } else {
            GL_INVALID_VALUE
        }
    }

    fn alignment_ok(value: i32) -> bool {
        matches!(value, 1 | 2 | 4 | 8)
    }

    fn current_program_mut(&mut self) -> Option<&mut SimProgram> {
        let current = self.current_program;
        if current == 0 {
            return None;
        }
        self.programs.get_mut(&current)
    }

    fn set_uniform(&mut self, location: i32, value: UniformValue) {
        let Some(program) = self.current_program_mut() else {
            self.raise(GL_INVALID_OPERATION);
            return;
        };
        if location == -1 {
            return;
        }
        if location < 0 || location as usize >= program.uniforms.len() {
            self.raise(GL_INVALID_OPERATION);
            return;
        }
        program.values.insert(location, value);
    }

    fn gen_names(counter: &mut u32, names: &mut [u32]) {
        for name in names.iter_mut() {
            *name = *counter;
            *counter += 1;
        }
    }
}

fn texel_size(internal_format: u32) -> Option<usize> {
    match internal_format {
        GL_R8 => Some(1),
        GL_RGBA8 => Some(4),
        GL_RGB32UI => Some(12),
        _ => None,
    }
}

/// Channels per texel for byte-sized color formats.
fn channels(internal_format: u32) -> Option<usize> {
    match internal_format {
        GL_R8 => Some(1),
        GL_RGBA8 => Some(4),
        _ => None,
    }
}

fn client_channels(format: u32, kind: u32) -> Result<usize, u32> {
    if kind != GL_UNSIGNED_BYTE {
        return Err(if kind == GL_FLOAT { GL_INVALID_OPERATION } else { GL_INVALID_ENUM });
    }
    match format {
        GL_RED => Ok(1),
        GL_RGBA => Ok(4),
        _ => Err(GL_INVALID_ENUM),
    }
}

fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// Bytes a client image occupies: every row but the last is padded to the
/// alignment.
fn client_image_len(row_bytes: usize, stride: usize, rows: usize) -> usize {
    if rows == 0 {
        0
    } else {
        stride * (rows - 1) + row_bytes
    }
}

fn convert_texel(src: &[u8], dst: &mut [u8]) {
    for (i, out) in dst.iter_mut().enumerate() {
        *out = match src.get(i) {
            Some(v) => *v,
            None if i == 3 => 0xFF,
            None => 0,
        };
    }
}

fn declared_names(source: &str, keyword: &str) -> Vec<String> {
    source
        .split([';', '\n'])
        .filter_map(|statement| {
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            if tokens.len() >= 3 && tokens[0] == keyword {
                let name = tokens[tokens.len() - 1];
                Some(name.split('[').next().unwrap_or(name).to_string())
            } else {
                None
            }
        })
        .collect()
}

fn compile(source: &str) -> (bool, String) {
    if source.trim().is_empty() {
        return (false, "0:0: error: empty shader source\n".to_string());
    }
    let mut log = String::new();
    for (index, line) in source.lines().enumerate() {
        if let Some(pos) = line.find("#error") {
            let message = line[pos + "#error".len()..].trim();
            log.push_str(&format!("0:{}: error: '#error' : {}\n", index + 1, message));
        }
    }
    (log.is_empty(), log)
}

fn write_log(log: &str, buf: &mut [u8]) -> i32 {
    if buf.is_empty() {
        return 0;
    }
    let n = log.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&log.as_bytes()[..n]);
    buf[n] = 0;
    n as i32
}

fn log_length(log: &str) -> i32 {
    if log.is_empty() {
        0
    } else {
        log.len() as i32 + 1
    }
}

/// The simulated driver. Interior state sits behind a mutex so the driver
/// can be shared with hooks and inspected while a context owns it.
pub struct SimDriver {
    state: Mutex<SimState>,
    hook: Mutex<Option<CallHook>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// A GL 4.6 driver advertising every capability the bridge knows.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState::default()),
            hook: Mutex::new(None),
        }
    }

    // ── Configuration ───────────────────────────────────────────

    /// Replace the `GL_VERSION` string; `None` simulates a missing context.
    pub fn set_version(&self, version: Option<&str>) {
        self.state.lock().version = version.map(str::to_string);
    }

    pub fn set_extensions<I, S>(&self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.lock().extensions = extensions.into_iter().map(Into::into).collect();
    }

    /// Make an optional entry point (e.g. `"glCopyImageSubData"`) unavailable.
    pub fn remove_entry_point(&self, name: &'static str) {
        self.state.lock().missing.insert(name);
    }

    pub fn set_extension_loading(&self, loading: ExtensionLoading) {
        self.state.lock().loading = loading;
    }

    /// Make loader initialisation fail with `cause`.
    pub fn fail_loader(&self, cause: &str) {
        self.state.lock().loader_failure = Some(cause.to_string());
    }

    /// Raise `code` the next time the named entry point is called.
    pub fn inject_error(&self, call: &'static str, code: u32) {
        self.state.lock().injected.insert(call, code);
    }

    /// Put `code` in the error slot now (unless one is already pending).
    pub fn raise_error(&self, code: u32) {
        self.state.lock().raise(code);
    }

    /// Run `hook` at the start of every native call, before the driver lock
    /// is taken.
    pub fn set_call_hook<F>(&self, hook: F)
    where
        F: Fn(&'static str) + Send + Sync + 'static,
    {
        *self.hook.lock() = Some(Arc::new(hook));
    }

    // ── Inspection ──────────────────────────────────────────────

    /// Every native call so far, in order, including `glGetError`.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == name).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// The pending error code, without clearing it.
    pub fn peek_error(&self) -> u32 {
        self.state.lock().error
    }

    pub fn viewport_state(&self) -> [u32; 4] {
        self.state.lock().viewport
    }

    pub fn clear_color_state(&self) -> [f32; 4] {
        self.state.lock().clear_color
    }

    pub fn clear_masks(&self) -> Vec<u32> {
        self.state.lock().clears.clone()
    }

    pub fn is_enabled(&self, cap: u32) -> bool {
        self.state.lock().enabled.contains(&cap)
    }

    pub fn blend_state(&self) -> (u32, u32) {
        self.state.lock().blend
    }

    pub fn texture_exists(&self, texture: u32) -> bool {
        self.state.lock().textures.contains_key(&texture)
    }

    pub fn buffer_exists(&self, buffer: u32) -> bool {
        self.state.lock().buffers.contains_key(&buffer)
    }

    pub fn program_exists(&self, program: u32) -> bool {
        self.state.lock().programs.contains_key(&program)
    }

    pub fn shader_exists(&self, shader: u32) -> bool {
        self.state.lock().shaders.contains_key(&shader)
    }

    /// Level-0 contents of a texture with storage, in its internal format.
    pub fn texture_data(&self, texture: u32) -> Option<Vec<u8>> {
        let state = self.state.lock();
        state
            .textures
            .get(&texture)
            .and_then(|t| t.storage.as_ref())
            .map(|s| s.data.clone())
    }

    pub fn texture_parameter(&self, texture: u32, pname: u32) -> Option<i32> {
        let state = self.state.lock();
        state.textures.get(&texture).and_then(|t| t.params.get(&pname).copied())
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.lock().buffers.get(&buffer).cloned()
    }

    pub fn bound_buffer(&self, target: u32) -> u32 {
        self.state.lock().bound_buffer(target)
    }

    pub fn bound_texture(&self, target: u32) -> u32 {
        self.state.lock().bound_texture(target)
    }

    pub fn current_program(&self) -> u32 {
        self.state.lock().current_program
    }

    pub fn uniform(&self, program: u32, location: i32) -> Option<UniformValue> {
        let state = self.state.lock();
        state.programs.get(&program).and_then(|p| p.values.get(&location).cloned())
    }

    pub fn attrib_pointer(&self, vertex_array: u32, index: u32) -> Option<SimAttribPointer> {
        let state = self.state.lock();
        state
            .vertex_arrays
            .get(&vertex_array)
            .and_then(|v| v.pointers.get(&index).copied())
    }

    pub fn attrib_enabled(&self, vertex_array: u32, index: u32) -> bool {
        let state = self.state.lock();
        state
            .vertex_arrays
            .get(&vertex_array)
            .is_some_and(|v| v.enabled.contains(&index))
    }

    pub fn draws(&self) -> Vec<SimDraw> {
        self.state.lock().draws.clone()
    }

    // ── Internals ───────────────────────────────────────────────

    /// Journal a native call and apply any injected error.
    fn enter(&self, name: &'static str) -> MutexGuard<'_, SimState> {
        let hook = self.hook.lock().clone();
        if let Some(hook) = hook {
            hook(name);
        }
        let mut state = self.state.lock();
        state.calls.push(name);
        if let Some(code) = state.injected.remove(name) {
            state.raise(code);
        }
        state
    }

    fn optional(&self, state: &SimState, name: &'static str) -> Result<(), MissingEntryPoint> {
        if state.missing.contains(name) {
            Err(MissingEntryPoint(name))
        } else {
            Ok(())
        }
    }

    fn store_buffer(state: &mut SimState, buffer: u32, size: usize, data: *const c_void) {
        if size > MEMORY_BUDGET {
            state.raise(GL_OUT_OF_MEMORY);
            return;
        }
        let contents = if data.is_null() {
            vec![0u8; size]
        } else {
            unsafe { std::slice::from_raw_parts(data as *const u8, size) }.to_vec()
        };
        state.buffers.insert(buffer, contents);
    }
}

impl GlDriver for SimDriver {
    fn extension_loading(&self) -> ExtensionLoading {
        self.state.lock().loading
    }

    fn init_extension_loading(&self) -> Result<(), String> {
        let state = self.enter("loader_init");
        if let Some(cause) = &state.loader_failure {
            return Err(cause.clone());
        }
        if state.version.is_none() {
            return Err("missing GL version (no context current on this thread?)".to_string());
        }
        Ok(())
    }

    fn get_error(&self) -> u32 {
        let mut state = self.enter("glGetError");
        std::mem::replace(&mut state.error, GL_NO_ERROR)
    }

    fn get_string(&self, name: u32) -> Option<Vec<u8>> {
        let mut state = self.enter("glGetString");
        let value = match name {
            GL_VERSION => state.version.clone(),
            GL_VENDOR => Some("glbridge".to_string()),
            GL_RENDERER => Some("SimDriver".to_string()),
            GL_SHADING_LANGUAGE_VERSION => Some("4.60".to_string()),
            GL_EXTENSIONS => Some(state.extensions.join(" ")),
            _ => {
                state.raise(GL_INVALID_ENUM);
                None
            }
        };
        value.map(String::into_bytes)
    }

    fn get_string_i(&self, name: u32, index: u32) -> Result<Option<Vec<u8>>, MissingEntryPoint> {
        let mut state = self.enter("glGetStringi");
        self.optional(&state, "glGetStringi")?;
        if name != GL_EXTENSIONS {
            state.raise(GL_INVALID_ENUM);
            return Ok(None);
        }
        match state.extensions.get(index as usize).cloned() {
            Some(ext) => Ok(Some(ext.into_bytes())),
            None => {
                state.raise(GL_INVALID_VALUE);
                Ok(None)
            }
        }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let mut state = self.enter("glGetIntegerv");
        match pname {
            GL_NUM_EXTENSIONS => state.extensions.len() as i32,
            GL_MAX_TEXTURE_SIZE => MAX_TEXTURE_SIZE as i32,
            GL_MAX_ARRAY_TEXTURE_LAYERS => MAX_ARRAY_TEXTURE_LAYERS as i32,
            GL_UNPACK_ALIGNMENT => state.unpack_alignment,
            GL_PACK_ALIGNMENT => state.pack_alignment,
            GL_CURRENT_PROGRAM => state.current_program as i32,
            GL_TEXTURE_BINDING_2D_ARRAY => state.bound_texture(GL_TEXTURE_2D_ARRAY) as i32,
            GL_ACTIVE_TEXTURE => (GL_TEXTURE0 + state.active_unit) as i32,
            _ => {
                state.raise(GL_INVALID_ENUM);
                0
            }
        }
    }

    fn viewport(&self, x: u32, y: u32, width: u32, height: u32) {
        let mut state = self.enter("glViewport");
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        state.viewport = [x, y, width, height];
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        let mut state = self.enter("glClearColor");
        state.clear_color = [red, green, blue, alpha].map(|c| c.clamp(0.0, 1.0));
    }

    fn clear(&self, mask: u32) {
        let mut state = self.enter("glClear");
        let known = GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT | GL_STENCIL_BUFFER_BIT;
        if mask & !known != 0 {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        state.clears.push(mask);
    }

    fn enable(&self, cap: u32) {
        let mut state = self.enter("glEnable");
        match cap {
            GL_BLEND | GL_DEPTH_TEST | GL_CULL_FACE | GL_SCISSOR_TEST | GL_FRAMEBUFFER_SRGB => {
                state.enabled.insert(cap);
            }
            _ => state.raise(GL_INVALID_ENUM),
        }
    }

    fn disable(&self, cap: u32) {
        let mut state = self.enter("glDisable");
        match cap {
            GL_BLEND | GL_DEPTH_TEST | GL_CULL_FACE | GL_SCISSOR_TEST | GL_FRAMEBUFFER_SRGB => {
                state.enabled.remove(&cap);
            }
            _ => state.raise(GL_INVALID_ENUM),
        }
    }

    fn blend_func(&self, sfactor: u32, dfactor: u32) {
        let mut state = self.enter("glBlendFunc");
        let valid = |f: u32| f == GL_ZERO || f == GL_ONE || (GL_SRC_COLOR..=GL_SRC_ALPHA_SATURATE).contains(&f);
        if !valid(sfactor) || !valid(dfactor) {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        state.blend = (sfactor, dfactor);
    }

    fn pixel_store_i(&self, pname: u32, param: i32) {
        let mut state = self.enter("glPixelStorei");
        match pname {
            GL_UNPACK_ALIGNMENT | GL_PACK_ALIGNMENT if !SimState::alignment_ok(param) => {
                state.raise(GL_INVALID_VALUE)
            }
            GL_UNPACK_ALIGNMENT => state.unpack_alignment = param,
            GL_PACK_ALIGNMENT => state.pack_alignment = param,
            _ => state.raise(GL_INVALID_ENUM),
        }
    }

    fn gen_vertex_arrays(&self, names: &mut [u32]) {
        let mut state = self.enter("glGenVertexArrays");
        let state = &mut *state;
        SimState::gen_names(&mut state.next_vertex_array, names);
        for name in names.iter() {
            state.vertex_arrays.insert(*name, SimVertexArray::default());
        }
    }

    fn gen_textures(&self, names: &mut [u32]) {
        let mut state = self.enter("glGenTextures");
        let state = &mut *state;
        SimState::gen_names(&mut state.next_texture, names);
        for name in names.iter() {
            state.textures.insert(*name, SimTexture::default());
        }
    }

    fn gen_buffers(&self, names: &mut [u32]) {
        let mut state = self.enter("glGenBuffers");
        let state = &mut *state;
        SimState::gen_names(&mut state.next_buffer, names);
        for name in names.iter() {
            state.buffers.insert(*name, Vec::new());
        }
    }

    fn delete_textures(&self, names: &[u32]) {
        let mut state = self.enter("glDeleteTextures");
        for name in names {
            if state.textures.remove(name).is_some() {
                state.texture_bindings.retain(|_, bound| *bound != *name);
            }
        }
    }

    fn delete_buffers(&self, names: &[u32]) {
        let mut state = self.enter("glDeleteBuffers");
        for name in names {
            if state.buffers.remove(name).is_some() {
                state.buffer_bindings.retain(|_, bound| *bound != *name);
            }
        }
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.enter("glDeleteProgram");
        if program == 0 {
            return;
        }
        if state.programs.remove(&program).is_none() {
            state.raise(GL_INVALID_VALUE);
        } else if state.current_program == program {
            state.current_program = 0;
        }
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.enter("glDeleteShader");
        if shader == 0 {
            return;
        }
        if state.shaders.remove(&shader).is_none() {
            state.raise(GL_INVALID_VALUE);
        }
    }

    fn create_shader(&self, kind: u32) -> u32 {
        let mut state = self.enter("glCreateShader");
        if kind != GL_VERTEX_SHADER && kind != GL_FRAGMENT_SHADER {
            state.raise(GL_INVALID_ENUM);
            return 0;
        }
        let name = state.next_object;
        state.next_object += 1;
        state.shaders.insert(
            name,
            SimShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        name
    }

    fn shader_source(&self, shader: u32, source: &[u8]) {
        let mut state = self.enter("glShaderSource");
        let text = String::from_utf8_lossy(source).into_owned();
        if let Some(s) = state.shaders.get_mut(&shader) {
            s.source = text;
            return;
        }
        let code = state.missing_shader_error(shader);
        state.raise(code);
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.enter("glCompileShader");
        if let Some(s) = state.shaders.get_mut(&shader) {
            let (ok, log) = compile(&s.source);
            s.compiled = ok;
            s.log = log;
            return;
        }
        let code = state.missing_shader_error(shader);
        state.raise(code);
    }

    fn get_shader_iv(&self, shader: u32, pname: u32) -> i32 {
        let mut state = self.enter("glGetShaderiv");
        let Some(s) = state.shaders.get(&shader) else {
            let code = state.missing_shader_error(shader);
            state.raise(code);
            return 0;
        };
        match pname {
            GL_COMPILE_STATUS => s.compiled as i32,
            GL_INFO_LOG_LENGTH => log_length(&s.log),
            GL_SHADER_TYPE => s.kind as i32,
            GL_DELETE_STATUS => GL_FALSE,
            _ => {
                state.raise(GL_INVALID_ENUM);
                0
            }
        }
    }

    fn get_shader_info_log(&self, shader: u32, buf: &mut [u8]) -> i32 {
        let mut state = self.enter("glGetShaderInfoLog");
        match state.shaders.get(&shader) {
            Some(s) => write_log(&s.log, buf),
            None => {
                state.raise(GL_INVALID_VALUE);
                0
            }
        }
    }

    fn create_program(&self) -> u32 {
        let mut state = self.enter("glCreateProgram");
        let name = state.next_object;
        state.next_object += 1;
        state.programs.insert(name, SimProgram::default());
        name
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.enter("glAttachShader");
        if !state.shaders.contains_key(&shader) {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        let code = match state.programs.get_mut(&program) {
            Some(p) if p.attached.contains(&shader) => GL_INVALID_OPERATION,
            Some(p) => {
                p.attached.push(shader);
                return;
            }
            None => GL_INVALID_VALUE,
        };
        state.raise(code);
    }

    fn link_program(&self, program: u32) {
        let mut state = self.enter("glLinkProgram");
        let Some(p) = state.programs.get(&program) else {
            state.raise(GL_INVALID_VALUE);
            return;
        };

        let mut log = String::new();
        let mut uniforms: Vec<String> = Vec::new();
        let mut attribs: Vec<String> = Vec::new();
        if p.attached.is_empty() {
            log.push_str("error: no shaders attached to the program\n");
        }
        for shader in &p.attached {
            match state.shaders.get(shader) {
                Some(s) if s.compiled => {
                    for name in declared_names(&s.source, "uniform") {
                        if !uniforms.contains(&name) {
                            uniforms.push(name);
                        }
                    }
                    if s.kind == GL_VERTEX_SHADER {
                        for name in declared_names(&s.source, "in") {
                            if !attribs.contains(&name) {
                                attribs.push(name);
                            }
                        }
                    }
                }
                _ => log.push_str(&format!("error: shader {} is not compiled\n", shader)),
            }
        }

        let linked = log.is_empty();
        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = linked;
            p.log = log;
            p.values.clear();
            if linked {
                p.uniforms = uniforms;
                p.attribs = attribs;
            }
        }
    }

    fn get_program_iv(&self, program: u32, pname: u32) -> i32 {
        let mut state = self.enter("glGetProgramiv");
        let Some(p) = state.programs.get(&program) else {
            let code = if state.shaders.contains_key(&program) {
                GL_INVALID_OPERATION
            } else {
                GL_INVALID_VALUE
            };
            state.raise(code);
            return 0;
        };
        match pname {
            GL_LINK_STATUS => p.linked as i32,
            GL_INFO_LOG_LENGTH => log_length(&p.log),
            GL_ATTACHED_SHADERS => p.attached.len() as i32,
            GL_DELETE_STATUS => GL_FALSE,
            _ => {
                state.raise(GL_INVALID_ENUM);
                0
            }
        }
    }

    fn get_program_info_log(&self, program: u32, buf: &mut [u8]) -> i32 {
        let mut state = self.enter("glGetProgramInfoLog");
        match state.programs.get(&program) {
            Some(p) => write_log(&p.log, buf),
            None => {
                state.raise(GL_INVALID_VALUE);
                0
            }
        }
    }

    fn use_program(&self, program: u32) {
        let mut state = self.enter("glUseProgram");
        if program == 0 {
            state.current_program = 0;
            return;
        }
        match state.programs.get(&program) {
            Some(p) if p.linked => state.current_program = program,
            Some(_) => state.raise(GL_INVALID_OPERATION),
            None => state.raise(GL_INVALID_VALUE),
        }
    }

    fn get_uniform_location(&self, program: u32, name: &CStr) -> i32 {
        let mut state = self.enter("glGetUniformLocation");
        let name = name.to_string_lossy();
        match state.programs.get(&program) {
            Some(p) if p.linked => p
                .uniforms
                .iter()
                .position(|u| *u == name)
                .map_or(-1, |i| i as i32),
            Some(_) => {
                state.raise(GL_INVALID_OPERATION);
                -1
            }
            None => {
                state.raise(GL_INVALID_VALUE);
                -1
            }
        }
    }

    fn get_attrib_location(&self, program: u32, name: &CStr) -> i32 {
        let mut state = self.enter("glGetAttribLocation");
        let name = name.to_string_lossy();
        match state.programs.get(&program) {
            Some(p) if p.linked => p
                .attribs
                .iter()
                .position(|a| *a == name)
                .map_or(-1, |i| i as i32),
            Some(_) => {
                state.raise(GL_INVALID_OPERATION);
                -1
            }
            None => {
                state.raise(GL_INVALID_VALUE);
                -1
            }
        }
    }

    fn uniform_2ui(&self, location: i32, x: u32, y: u32) {
        let mut state = self.enter("glUniform2ui");
        state.set_uniform(location, UniformValue::UInt2([x, y]));
    }

    fn uniform_1i(&self, location: i32, x: i32) {
        let mut state = self.enter("glUniform1i");
        state.set_uniform(location, UniformValue::Int1(x));
    }

    fn uniform_2f(&self, location: i32, x: f32, y: f32) {
        let mut state = self.enter("glUniform2f");
        state.set_uniform(location, UniformValue::Float2([x, y]));
    }

    fn uniform_4f(&self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        let mut state = self.enter("glUniform4f");
        state.set_uniform(location, UniformValue::Float4([x, y, z, w]));
    }

    unsafe fn uniform_3fv(&self, location: i32, count: u32, value: *const f32) {
        let mut state = self.enter("glUniform3fv");
        if count > i32::MAX as u32 {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        let floats = unsafe { std::slice::from_raw_parts(value, count as usize * 3) };
        let vectors = floats.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        state.set_uniform(location, UniformValue::Float3v(vectors));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.enter("glEnableVertexAttribArray");
        if index >= MAX_VERTEX_ATTRIBS {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        let vao = state.bound_vertex_array;
        match state.vertex_arrays.get_mut(&vao) {
            Some(v) if vao != 0 => {
                v.enabled.insert(index);
            }
            _ => state.raise(GL_INVALID_OPERATION),
        }
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
        let mut state = self.enter("glVertexAttribPointer");
        if index >= MAX_VERTEX_ATTRIBS || !(1..=4).contains(&size) || stride > i32::MAX as u32 {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        if kind != GL_FLOAT && kind != GL_UNSIGNED_BYTE {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        let vao = state.bound_vertex_array;
        let has_array_buffer = state.bound_buffer(GL_ARRAY_BUFFER) != 0;
        match state.vertex_arrays.get_mut(&vao) {
            Some(v) if vao != 0 && has_array_buffer => {
                v.pointers.insert(
                    index,
                    SimAttribPointer {
                        size,
                        kind,
                        normalized,
                        stride,
                        offset: offset as usize,
                    },
                );
            }
            _ => state.raise(GL_INVALID_OPERATION),
        }
    }

    fn active_texture(&self, unit: u32) {
        let mut state = self.enter("glActiveTexture");
        if !(GL_TEXTURE0..GL_TEXTURE0 + MAX_TEXTURE_UNITS).contains(&unit) {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        state.active_unit = unit - GL_TEXTURE0;
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        let mut state = self.enter("glBindTexture");
        if !matches!(target, GL_TEXTURE_2D | GL_TEXTURE_3D | GL_TEXTURE_2D_ARRAY | GL_TEXTURE_BUFFER) {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        if texture != 0 {
            match state.textures.get_mut(&texture) {
                Some(t) if t.target == 0 => t.target = target,
                Some(t) if t.target == target => {}
                _ => {
                    state.raise(GL_INVALID_OPERATION);
                    return;
                }
            }
        }
        let unit = state.active_unit;
        state.texture_bindings.insert((unit, target), texture);
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        let mut state = self.enter("glBindBuffer");
        if !matches!(
            target,
            GL_ARRAY_BUFFER
                | GL_ELEMENT_ARRAY_BUFFER
                | GL_TEXTURE_BUFFER
                | GL_UNIFORM_BUFFER
                | GL_PIXEL_PACK_BUFFER
                | GL_PIXEL_UNPACK_BUFFER
        ) {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        if buffer != 0 && !state.buffers.contains_key(&buffer) {
            state.raise(GL_INVALID_OPERATION);
            return;
        }
        state.buffer_bindings.insert(target, buffer);
    }

    fn bind_vertex_array(&self, array: u32) {
        let mut state = self.enter("glBindVertexArray");
        if array != 0 && !state.vertex_arrays.contains_key(&array) {
            state.raise(GL_INVALID_OPERATION);
            return;
        }
        state.bound_vertex_array = array;
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
        let mut state = self.enter("glTexStorage3D");
        self.optional(&state, "glTexStorage3D")?;
        if target != GL_TEXTURE_2D_ARRAY && target != GL_TEXTURE_3D {
            state.raise(GL_INVALID_ENUM);
            return Ok(());
        }
        let Some(texel) = texel_size(internal_format) else {
            state.raise(GL_INVALID_ENUM);
            return Ok(());
        };
        if levels == 0 || width == 0 || height == 0 || depth == 0 {
            state.raise(GL_INVALID_VALUE);
            return Ok(());
        }
        if width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE || depth > MAX_ARRAY_TEXTURE_LAYERS {
            state.raise(GL_INVALID_VALUE);
            return Ok(());
        }
        let texture = state.bound_texture(target);
        match state.textures.get(&texture) {
            Some(t) if texture != 0 && t.storage.is_none() => {}
            _ => {
                state.raise(GL_INVALID_OPERATION);
                return Ok(());
            }
        }
        let size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(depth as usize))
            .and_then(|v| v.checked_mul(texel));
        let size = match size {
            Some(size) if size <= MEMORY_BUDGET => size,
            _ => {
                state.raise(GL_OUT_OF_MEMORY);
                return Ok(());
            }
        };
        if let Some(t) = state.textures.get_mut(&texture) {
            t.storage = Some(TexStorage {
                format: internal_format,
                levels,
                width,
                height,
                depth,
                data: vec![0u8; size],
            });
        }
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
        let mut state = self.enter("glTexSubImage3D");
        if target != GL_TEXTURE_2D_ARRAY && target != GL_TEXTURE_3D {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        let client = match client_channels(format, kind) {
            Ok(c) => c,
            Err(code) => {
                state.raise(code);
                return;
            }
        };
        let alignment = state.unpack_alignment as usize;
        let texture = state.bound_texture(target);
        let Some(storage) = state.textures.get_mut(&texture).and_then(|t| t.storage.as_mut()) else {
            state.raise(GL_INVALID_OPERATION);
            return;
        };
        let Some(stored) = channels(storage.format) else {
            state.raise(GL_INVALID_OPERATION);
            return;
        };
        if level < 0 || level as u32 >= storage.levels {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        let in_bounds = x >= 0
            && y >= 0
            && z >= 0
            && x as u64 + width as u64 <= storage.width as u64
            && y as u64 + height as u64 <= storage.height as u64
            && z as u64 + depth as u64 <= storage.depth as u64;
        if !in_bounds {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        if level > 0 {
            // Only level 0 is backed by memory.
            return;
        }

        let (w, h, d) = (width as usize, height as usize, depth as usize);
        let row_bytes = w * client;
        let stride = align_up(row_bytes, alignment);
        let len = client_image_len(row_bytes, stride, h * d);
        let src = unsafe { std::slice::from_raw_parts(pixels as *const u8, len) };
        let (sw, sh) = (storage.width as usize, storage.height as usize);
        for layer in 0..d {
            for row in 0..h {
                let src_row = &src[(layer * h + row) * stride..][..row_bytes];
                for col in 0..w {
                    let texel = ((z as usize + layer) * sh + (y as usize + row)) * sw + (x as usize + col);
                    convert_texel(
                        &src_row[col * client..][..client],
                        &mut storage.data[texel * stored..][..stored],
                    );
                }
            }
        }
    }

    unsafe fn get_tex_image(&self, target: u32, level: i32, format: u32, kind: u32, pixels: *mut c_void) {
        let mut state = self.enter("glGetTexImage");
        let texture = state.bound_texture(target);

        if target == GL_TEXTURE_BUFFER {
            let view = state.textures.get(&texture).and_then(|t| t.buffer_view);
            let Some((_, buffer)) = view else {
                state.raise(GL_INVALID_OPERATION);
                return;
            };
            let contents = state.buffers.get(&buffer).cloned().unwrap_or_default();
            let dst = unsafe { std::slice::from_raw_parts_mut(pixels as *mut u8, contents.len()) };
            dst.copy_from_slice(&contents);
            return;
        }

        if target != GL_TEXTURE_2D_ARRAY && target != GL_TEXTURE_3D {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        let client = match client_channels(format, kind) {
            Ok(c) => c,
            Err(code) => {
                state.raise(code);
                return;
            }
        };
        let alignment = state.pack_alignment as usize;
        let Some(storage) = state.textures.get(&texture).and_then(|t| t.storage.as_ref()) else {
            state.raise(GL_INVALID_OPERATION);
            return;
        };
        let Some(stored) = channels(storage.format) else {
            state.raise(GL_INVALID_OPERATION);
            return;
        };
        if level != 0 {
            state.raise(GL_INVALID_VALUE);
            return;
        }

        let (w, h, d) = (
            storage.width as usize,
            storage.height as usize,
            storage.depth as usize,
        );
        let row_bytes = w * client;
        let stride = align_up(row_bytes, alignment);
        let len = client_image_len(row_bytes, stride, h * d);
        let dst = unsafe { std::slice::from_raw_parts_mut(pixels as *mut u8, len) };
        for row in 0..h * d {
            for col in 0..w {
                let texel = row * w + col;
                convert_texel(
                    &storage.data[texel * stored..][..stored],
                    &mut dst[row * stride + col * client..][..client],
                );
            }
        }
    }

    unsafe fn buffer_data(&self, target: u32, size: usize, data: *const c_void, usage: u32) {
        let mut state = self.enter("glBufferData");
        if !matches!(usage, GL_STREAM_DRAW | GL_STATIC_DRAW | GL_DYNAMIC_DRAW) {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        if size > isize::MAX as usize {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        let buffer = state.bound_buffer(target);
        if buffer == 0 {
            state.raise(GL_INVALID_OPERATION);
            return;
        }
        Self::store_buffer(&mut state, buffer, size, data);
    }

    unsafe fn named_buffer_data(
        &self,
        buffer: u32,
        size: usize,
        data: *const c_void,
        usage: u32,
    ) -> Result<(), MissingEntryPoint> {
        let mut state = self.enter("glNamedBufferData");
        self.optional(&state, "glNamedBufferData")?;
        if !matches!(usage, GL_STREAM_DRAW | GL_STATIC_DRAW | GL_DYNAMIC_DRAW) {
            state.raise(GL_INVALID_ENUM);
            return Ok(());
        }
        if !state.buffers.contains_key(&buffer) {
            state.raise(GL_INVALID_OPERATION);
            return Ok(());
        }
        Self::store_buffer(&mut state, buffer, size, data);
        Ok(())
    }

    fn tex_buffer(&self, target: u32, internal_format: u32, buffer: u32) {
        let mut state = self.enter("glTexBuffer");
        if target != GL_TEXTURE_BUFFER || texel_size(internal_format).is_none() {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        if buffer != 0 && !state.buffers.contains_key(&buffer) {
            state.raise(GL_INVALID_OPERATION);
            return;
        }
        let texture = state.bound_texture(GL_TEXTURE_BUFFER);
        match state.textures.get_mut(&texture) {
            Some(t) if texture != 0 => {
                t.buffer_view = (buffer != 0).then_some((internal_format, buffer));
            }
            _ => state.raise(GL_INVALID_OPERATION),
        }
    }

    fn tex_parameter_i(&self, target: u32, pname: u32, param: i32) {
        let mut state = self.enter("glTexParameteri");
        if !matches!(
            pname,
            GL_TEXTURE_MIN_FILTER | GL_TEXTURE_MAG_FILTER | GL_TEXTURE_WRAP_S | GL_TEXTURE_WRAP_T
        ) {
            state.raise(GL_INVALID_ENUM);
            return;
        }
        let texture = state.bound_texture(target);
        match state.textures.get_mut(&texture) {
            Some(t) if texture != 0 => {
                t.params.insert(pname, param);
            }
            _ => state.raise(GL_INVALID_OPERATION),
        }
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
        let mut state = self.enter("glCopyImageSubData");
        self.optional(&state, "glCopyImageSubData")?;
        let target_ok = |t: u32| t == GL_TEXTURE_2D_ARRAY || t == GL_TEXTURE_3D;
        if !target_ok(src_target) || !target_ok(dst_target) {
            state.raise(GL_INVALID_ENUM);
            return Ok(());
        }
        if src_level != 0 || dst_level != 0 {
            state.raise(GL_INVALID_VALUE);
            return Ok(());
        }

        let geometry = |texture: u32| {
            state
                .textures
                .get(&texture)
                .filter(|t| t.target == src_target || t.target == dst_target)
                .and_then(|t| t.storage.as_ref())
                .map(|s| (s.format, s.width, s.height, s.depth))
        };
        let (Some(src_geom), Some(dst_geom)) = (geometry(src), geometry(dst)) else {
            state.raise(GL_INVALID_VALUE);
            return Ok(());
        };
        let fits = |(x, y, z): (i32, i32, i32), (_, w, h, d): (u32, u32, u32, u32)| {
            x >= 0
                && y >= 0
                && z >= 0
                && x as u64 + width as u64 <= w as u64
                && y as u64 + height as u64 <= h as u64
                && z as u64 + depth as u64 <= d as u64
        };
        if src_geom.0 != dst_geom.0
            || !fits((src_x, src_y, src_z), src_geom)
            || !fits((dst_x, dst_y, dst_z), dst_geom)
        {
            state.raise(GL_INVALID_VALUE);
            return Ok(());
        }

        let texel = texel_size(src_geom.0).unwrap_or(1);
        let source = state
            .textures
            .get(&src)
            .and_then(|t| t.storage.as_ref())
            .map(|s| s.data.clone())
            .unwrap_or_default();
        let (sw, sh) = (src_geom.1 as usize, src_geom.2 as usize);
        let (dw, dh) = (dst_geom.1 as usize, dst_geom.2 as usize);
        if let Some(storage) = state.textures.get_mut(&dst).and_then(|t| t.storage.as_mut()) {
            for layer in 0..depth as usize {
                for row in 0..height as usize {
                    for col in 0..width as usize {
                        let s = ((src_z as usize + layer) * sh + src_y as usize + row) * sw
                            + src_x as usize
                            + col;
                        let d = ((dst_z as usize + layer) * dh + dst_y as usize + row) * dw
                            + dst_x as usize
                            + col;
                        storage.data[d * texel..][..texel]
                            .copy_from_slice(&source[s * texel..][..texel]);
                    }
                }
            }
        }
        Ok(())
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: u32) {
        let mut state = self.enter("glDrawArrays");
        record_draw(&mut state, mode, first, count, 1);
    }

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: u32, instance_count: u32) {
        let mut state = self.enter("glDrawArraysInstanced");
        record_draw(&mut state, mode, first, count, instance_count);
    }

    unsafe fn multi_draw_arrays(&self, mode: u32, first: *const i32, count: *const i32, draw_count: u32) {
        let mut state = self.enter("glMultiDrawArrays");
        if draw_count > i32::MAX as u32 {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        let firsts = unsafe { std::slice::from_raw_parts(first, draw_count as usize) };
        let counts = unsafe { std::slice::from_raw_parts(count, draw_count as usize) };
        if counts.iter().any(|c| *c < 0) {
            state.raise(GL_INVALID_VALUE);
            return;
        }
        for (f, c) in firsts.iter().zip(counts) {
            record_draw(&mut state, mode, *f, *c as u32, 1);
        }
    }
}

fn record_draw(state: &mut SimState, mode: u32, first: i32, count: u32, instances: u32) {
    if mode > GL_TRIANGLE_FAN {
        state.raise(GL_INVALID_ENUM);
        return;
    }
    if first < 0 || count > i32::MAX as u32 || instances > i32::MAX as u32 {
        state.raise(GL_INVALID_VALUE);
        return;
    }
    if state.bound_vertex_array == 0 {
        state.raise(GL_INVALID_OPERATION);
        return;
    }
    state.draws.push(SimDraw {
        mode,
        first,
        count,
        instances,
    });
}
