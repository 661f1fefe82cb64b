//! Integration test: call pipeline
//!
//! Error translation and the checking toggle, batch name generation, log
//! retrieval and null-result handling, all against the simulated driver.
//!
//! Run with: cargo test --test pipeline_test

use glbridge::consts::*;
use glbridge::{
    ArgumentError, BridgeConfig, DriverError, ErrorCategory, GlContext, GlError, ProgramId,
    SimDriver, MAX_BATCH,
};

fn make_context() -> GlContext<SimDriver> {
    GlContext::new(SimDriver::new())
}

const BROKEN_FRAGMENT: &str = "#version 330\nout vec4 color;\n#error unterminated block\nvoid main() {}\n";

// ── Error translation ───────────────────────────────────────────

#[test]
fn test_driver_error_is_raised_after_call() {
    let ctx = make_context();
    let err = ctx.pixel_store_i(GL_UNPACK_ALIGNMENT, 3).unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::InvalidValue));
    assert_eq!(err.category(), ErrorCategory::BadArgument);
    assert_eq!(ctx.driver().call_count("glGetError"), 1);
}

#[test]
fn test_successful_call_queries_error_once() {
    let ctx = make_context();
    ctx.viewport(0, 0, 320, 200).unwrap();
    assert_eq!(ctx.driver().calls(), vec!["glViewport", "glGetError"]);
}

#[test]
fn test_out_of_memory_maps_to_allocation() {
    let ctx = make_context();
    let texture = ctx.gen_textures(1).unwrap()[0];
    ctx.bind_texture(GL_TEXTURE_2D_ARRAY, texture).unwrap();
    let err = ctx
        .tex_storage_3d(GL_TEXTURE_2D_ARRAY, 1, GL_RGBA8, 16384, 16384, 64)
        .unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::OutOfMemory));
    assert_eq!(err.category(), ErrorCategory::Allocation);
}

#[test]
fn test_stack_and_unknown_codes_are_categorised() {
    let ctx = make_context();

    ctx.driver().raise_error(GL_STACK_UNDERFLOW);
    let err = ctx.check_error().unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::StackUnderflow));
    assert_eq!(err.category(), ErrorCategory::Overflow);

    ctx.driver().raise_error(0x9999);
    let err = ctx.check_error().unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::Unknown(0x9999)));
    assert_eq!(err.category(), ErrorCategory::Runtime);

    ctx.check_error().unwrap();
}

#[test]
fn test_disabled_checking_never_queries_driver() {
    let mut ctx = make_context();
    ctx.set_error_checking(false);

    ctx.enable(0xFFFF).unwrap();
    ctx.blend_func(0xDEAD, GL_ONE).unwrap();
    ctx.viewport(0, 0, 10, 10).unwrap();
    assert_eq!(ctx.driver().call_count("glGetError"), 0);

    // The first error is still pending and surfaces once checking is back.
    ctx.set_error_checking(true);
    let err = ctx.check_error().unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::InvalidEnum));
    assert_eq!(err.category(), ErrorCategory::BadArgument);
    ctx.check_error().unwrap();
}

#[test]
fn test_config_sets_checking_toggle() {
    let config = BridgeConfig::from_toml_str("[checks]\nautomatic_error_checking = false\n").unwrap();
    let ctx = GlContext::with_config(SimDriver::new(), &config);
    assert!(!ctx.error_checking());

    ctx.enable(0xFFFF).unwrap();
    assert_eq!(ctx.driver().call_count("glGetError"), 0);
    assert_eq!(ctx.driver().peek_error(), GL_INVALID_ENUM);
}

// ── Batch generation ────────────────────────────────────────────

#[test]
fn test_batch_returns_distinct_names_in_order() {
    for n in [1usize, 2, 17, 255, MAX_BATCH] {
        let ctx = make_context();
        let textures = ctx.gen_textures(n).unwrap();
        let raw: Vec<u32> = textures.iter().map(|t| t.raw()).collect();
        let expected: Vec<u32> = (1..=n as u32).collect();
        assert_eq!(raw, expected, "batch of {}", n);
    }
}

#[test]
fn test_batch_of_each_kind() {
    let ctx = make_context();
    let arrays = ctx.gen_vertex_arrays(2).unwrap();
    let buffers = ctx.gen_buffers(3).unwrap();
    assert_eq!(arrays.len(), 2);
    assert_eq!(buffers.len(), 3);
    assert!(arrays.iter().all(|a| !a.is_none()));
    assert!(buffers.iter().all(|b| ctx.driver().buffer_exists(b.raw())));
}

#[test]
fn test_empty_batch_makes_no_native_call() {
    let ctx = make_context();
    assert!(ctx.gen_buffers(0).unwrap().is_empty());
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_oversized_batch_is_rejected_before_driver() {
    let ctx = make_context();
    let err = ctx.gen_vertex_arrays(MAX_BATCH + 1).unwrap_err();
    assert_eq!(
        err,
        GlError::Argument(ArgumentError::TooMany {
            requested: 257,
            limit: 256,
        })
    );
    assert!(ctx.driver().calls().is_empty());
}

// ── Shaders, programs and logs ──────────────────────────────────

#[test]
fn test_compile_log_length_matches_query() {
    let ctx = make_context();
    let shader = ctx.create_shader(GL_FRAGMENT_SHADER).unwrap();
    ctx.shader_source(shader, BROKEN_FRAGMENT.as_bytes()).unwrap();
    ctx.compile_shader(shader).unwrap();

    assert_eq!(ctx.get_shader_iv(shader, GL_COMPILE_STATUS).unwrap(), GL_FALSE);
    let reported = ctx.get_shader_iv(shader, GL_INFO_LOG_LENGTH).unwrap();

    let log = ctx.shader_info_log(shader).unwrap();
    assert!(!log.is_empty());
    // The length query counts the terminator, the fetch does not.
    assert_eq!(log.len(), reported as usize - 1);
    assert_eq!(log, b"0:3: error: '#error' : unterminated block\n");
}

#[test]
fn test_clean_compile_has_empty_log() {
    let ctx = make_context();
    let shader = ctx.create_shader(GL_VERTEX_SHADER).unwrap();
    ctx.shader_source(shader, b"void main() {}").unwrap();
    ctx.compile_shader(shader).unwrap();
    assert_eq!(ctx.get_shader_iv(shader, GL_COMPILE_STATUS).unwrap(), GL_TRUE);
    assert!(ctx.shader_info_log(shader).unwrap().is_empty());
}

#[test]
fn test_link_failure_log() {
    let ctx = make_context();
    let shader = ctx.create_shader(GL_FRAGMENT_SHADER).unwrap();
    ctx.shader_source(shader, BROKEN_FRAGMENT.as_bytes()).unwrap();
    ctx.compile_shader(shader).unwrap();
    let program = ctx.create_program().unwrap();
    ctx.attach_shader(program, shader).unwrap();
    ctx.link_program(program).unwrap();

    assert_eq!(ctx.get_program_iv(program, GL_LINK_STATUS).unwrap(), GL_FALSE);
    let log = ctx.program_info_log(program).unwrap();
    assert_eq!(log, format!("error: shader {} is not compiled\n", shader.raw()).into_bytes());

    let err = ctx.use_program(program).unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::InvalidOperation));
}

#[test]
fn test_program_uniforms_and_lifecycle() {
    let ctx = make_context();
    let vs = ctx.create_shader(GL_VERTEX_SHADER).unwrap();
    ctx.shader_source(vs, b"in vec3 position;\nuniform vec3 lights[4];\nvoid main() {}\n")
        .unwrap();
    ctx.compile_shader(vs).unwrap();
    let program = ctx.create_program().unwrap();
    ctx.attach_shader(program, vs).unwrap();
    ctx.link_program(program).unwrap();
    ctx.use_program(program).unwrap();

    let location = ctx.get_uniform_location(program, "lights").unwrap();
    assert_eq!(location, 0);
    assert_eq!(ctx.get_uniform_location(program, "missing").unwrap(), -1);
    assert_eq!(ctx.get_attrib_location(program, "position").unwrap(), 0);

    ctx.uniform_3fv_slice(location, &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
    assert_eq!(
        ctx.driver().uniform(program.raw(), location),
        Some(glbridge_driver::UniformValue::Float3v(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]))
    );
    assert_eq!(ctx.get_integer(GL_CURRENT_PROGRAM).unwrap(), program.raw() as i32);

    ctx.delete_shader(vs).unwrap();
    ctx.delete_program(program).unwrap();
    assert!(!ctx.driver().program_exists(program.raw()));
}

#[test]
fn test_uniform_name_with_nul_is_rejected() {
    let ctx = make_context();
    let err = ctx
        .get_uniform_location(ProgramId::from_raw(1), "bad\0name")
        .unwrap_err();
    assert!(matches!(err, GlError::Argument(ArgumentError::InteriorNul { .. })));
    assert!(ctx.driver().calls().is_empty());
}

// ── Null results ────────────────────────────────────────────────

#[test]
fn test_get_string_returns_bytes() {
    let ctx = make_context();
    let version = ctx.get_string(GL_VERSION).unwrap();
    assert!(version.starts_with(b"4.6"));
}

#[test]
fn test_null_string_fails_even_when_unchecked() {
    let mut ctx = make_context();
    ctx.set_error_checking(false);

    let err = ctx.get_string(0x4242).unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::InvalidEnum));

    ctx.driver().set_version(None);
    let err = ctx.get_string(GL_VERSION).unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::Unknown(0)));
}

#[test]
fn test_draw_pipeline() {
    let ctx = make_context();
    let vao = ctx.gen_vertex_arrays(1).unwrap()[0];
    let vbo = ctx.gen_buffers(1).unwrap()[0];
    ctx.bind_vertex_array(vao).unwrap();
    ctx.bind_buffer(GL_ARRAY_BUFFER, vbo).unwrap();
    ctx.enable_vertex_attrib_array(0).unwrap();
    unsafe { ctx.vertex_attrib_pointer(0, 2, GL_FLOAT, false, 8, 0) }.unwrap();
    unsafe { ctx.vertex_attrib_pointer(1, 4, GL_UNSIGNED_BYTE, true, 8, 4) }.unwrap();
    let layout = ctx.driver().attrib_pointer(vao.raw(), 1).unwrap();
    assert_eq!((layout.size, layout.stride, layout.offset), (4, 8, 4));
    ctx.clear_color(0.0, 0.0, 0.0, 1.0).unwrap();
    ctx.clear(GL_COLOR_BUFFER_BIT).unwrap();
    ctx.draw_arrays(GL_TRIANGLES, 0, 3).unwrap();
    ctx.draw_arrays_instanced(GL_TRIANGLE_STRIP, 0, 4, 2).unwrap();
    ctx.multi_draw_arrays_slices(GL_LINE_STRIP, &[0, 2], &[2, 2]).unwrap();

    assert_eq!(ctx.driver().draws().len(), 4);
    assert_eq!(ctx.driver().clear_masks(), vec![GL_COLOR_BUFFER_BIT]);

    let err = ctx.multi_draw_arrays_slices(GL_LINES, &[0, 1], &[2]).unwrap_err();
    assert!(matches!(err, GlError::Argument(ArgumentError::LengthMismatch { .. })));
}
