//! Integration test: host dispatch
//!
//! Operations called by host name with dynamically typed arguments:
//! argument validation, result conversion and an end-to-end frame.
//!
//! Run with: cargo test --test dispatch_test

use std::collections::HashSet;

use glbridge::consts::*;
use glbridge::{
    ArgumentError, DriverError, GlContext, GlError, GlResult, HostValue, Operation, SimDriver,
};

fn call(ctx: &mut GlContext<SimDriver>, name: &str, args: Vec<HostValue>) -> GlResult<HostValue> {
    unsafe { ctx.invoke_by_name(name, &args) }
}

fn int(v: impl Into<i64>) -> HostValue {
    HostValue::Int(v.into())
}

fn make_context() -> GlContext<SimDriver> {
    GlContext::new(SimDriver::new())
}

// ── Registry ────────────────────────────────────────────────────

#[test]
fn test_names_are_unique_and_resolvable() {
    let mut seen = HashSet::new();
    for op in Operation::ALL {
        assert!(seen.insert(op.name()), "duplicate name {}", op.name());
        assert_eq!(Operation::from_name(op.name()), Some(*op));
    }
    assert_eq!(Operation::from_name("glBegin"), None);
}

#[test]
fn test_host_names_match_entry_points() {
    assert_eq!(Operation::Viewport.name(), "glViewport");
    assert_eq!(Operation::Bootstrap.name(), "glewInit");
    assert_eq!(Operation::CheckError.name(), "glCheckError");
    assert_eq!(
        Operation::EnableErrorChecking.name(),
        "enable_automatic_opengl_error_checking"
    );
    assert_eq!(Operation::ExtractRedChannel.name(), "copy_image_sub_data");
    assert_eq!(Operation::CopyImageSubData.name(), "glCopyImageSubData");
    assert_eq!(Operation::TexSubImage3D.descriptor().params.len(), 11);
}

#[test]
fn test_unknown_operation() {
    let mut ctx = make_context();
    let err = call(&mut ctx, "glBegin", vec![int(GL_TRIANGLES)]).unwrap_err();
    assert_eq!(
        err,
        GlError::UnknownOperation {
            name: "glBegin".to_string()
        }
    );
    assert!(ctx.driver().calls().is_empty());
}

// ── Argument validation ─────────────────────────────────────────

#[test]
fn test_wrong_arity() {
    let mut ctx = make_context();
    let err = call(&mut ctx, "glViewport", vec![int(0), int(0), int(10)]).unwrap_err();
    assert_eq!(
        err,
        GlError::Argument(ArgumentError::Arity {
            operation: "glViewport",
            expected: 4,
            got: 3,
        })
    );
    assert_eq!(err.to_string(), "glViewport() takes 4 argument(s) (3 given)");
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_wrong_type() {
    let mut ctx = make_context();
    let err = call(
        &mut ctx,
        "glViewport",
        vec![int(0), int(0), HostValue::from("wide"), int(10)],
    )
    .unwrap_err();
    assert_eq!(
        err,
        GlError::Argument(ArgumentError::Type {
            operation: "glViewport",
            argument: "width",
            expected: "an unsigned 32-bit integer",
            got: "text",
        })
    );
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_later_bad_argument_blocks_the_call() {
    let mut ctx = make_context();
    // The first three are fine; the bad fourth still stops the native call.
    let err = call(
        &mut ctx,
        "glClearColor",
        vec![
            HostValue::Float(0.1),
            HostValue::Float(0.2),
            HostValue::Float(0.3),
            HostValue::None,
        ],
    )
    .unwrap_err();
    assert!(matches!(err, GlError::Argument(ArgumentError::Type { argument: "alpha", .. })));
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_out_of_range_integers() {
    let mut ctx = make_context();

    let err = call(&mut ctx, "glClear", vec![int(-1)]).unwrap_err();
    assert!(matches!(
        err,
        GlError::Argument(ArgumentError::OutOfRange { argument: "mask", .. })
    ));

    let err = call(&mut ctx, "glUniform1i", vec![int(0), int(1i64 << 40)]).unwrap_err();
    assert!(matches!(
        err,
        GlError::Argument(ArgumentError::OutOfRange { argument: "x", .. })
    ));

    let err = call(&mut ctx, "glGenTextures", vec![int(-3)]).unwrap_err();
    assert!(matches!(
        err,
        GlError::Argument(ArgumentError::OutOfRange { argument: "n", .. })
    ));
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_non_finite_float() {
    let mut ctx = make_context();
    for bad in [f64::NAN, f64::INFINITY, 1e300] {
        let err = call(
            &mut ctx,
            "glUniform2f",
            vec![int(0), HostValue::Float(bad), HostValue::Float(0.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GlError::Argument(ArgumentError::NonFinite {
                operation: "glUniform2f",
                argument: "x",
            })
        );
    }
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_name_with_interior_nul() {
    let mut ctx = make_context();
    let err = call(
        &mut ctx,
        "glGetAttribLocation",
        vec![int(1), HostValue::from("pos\0ition")],
    )
    .unwrap_err();
    assert_eq!(
        err,
        GlError::Argument(ArgumentError::InteriorNul {
            operation: "glGetAttribLocation",
            argument: "name",
        })
    );
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_null_address_through_dispatch() {
    let mut ctx = make_context();
    let err = call(
        &mut ctx,
        "glNamedBufferData",
        vec![int(1), int(64), int(0), int(GL_STREAM_DRAW)],
    )
    .unwrap_err();
    assert_eq!(err, GlError::NullPointer { argument: "data" });
    assert!(ctx.driver().calls().is_empty());
}

// ── Results ─────────────────────────────────────────────────────

#[test]
fn test_batch_results() {
    let mut ctx = make_context();
    assert_eq!(call(&mut ctx, "glGenTextures", vec![int(1)]).unwrap(), int(1));
    assert_eq!(
        call(&mut ctx, "glGenTextures", vec![int(3)]).unwrap(),
        HostValue::List(vec![int(2), int(3), int(4)])
    );
    assert_eq!(
        call(&mut ctx, "glGenBuffers", vec![int(0)]).unwrap(),
        HostValue::List(Vec::new())
    );

    let err = call(&mut ctx, "glGenVertexArrays", vec![int(1000)]).unwrap_err();
    assert!(matches!(err, GlError::Argument(ArgumentError::TooMany { requested: 1000, .. })));
}

#[test]
fn test_error_checking_toggle_through_dispatch() {
    let mut ctx = make_context();
    call(
        &mut ctx,
        "enable_automatic_opengl_error_checking",
        vec![HostValue::Bool(false)],
    )
    .unwrap();
    assert!(!ctx.error_checking());

    call(&mut ctx, "glEnable", vec![int(0x1234)]).unwrap();
    assert_eq!(ctx.driver().call_count("glGetError"), 0);

    let err = call(&mut ctx, "glCheckError", Vec::new()).unwrap_err();
    assert_eq!(err, GlError::Driver(DriverError::InvalidEnum));
    call(&mut ctx, "glCheckError", Vec::new()).unwrap();
}

#[test]
fn test_frame_through_dispatch() {
    let mut ctx = make_context();
    assert_eq!(call(&mut ctx, "glewInit", Vec::new()).unwrap(), HostValue::None);

    let version = call(&mut ctx, "glGetString", vec![int(GL_VERSION)]).unwrap();
    assert!(version.as_bytes().unwrap().starts_with(b"4.6"));

    let vs = call(&mut ctx, "glCreateShader", vec![int(GL_VERTEX_SHADER)]).unwrap();
    call(
        &mut ctx,
        "glShaderSource",
        vec![
            vs.clone(),
            HostValue::from("in vec2 position;\nuniform vec4 tint;\nvoid main() {}\n"),
        ],
    )
    .unwrap();
    call(&mut ctx, "glCompileShader", vec![vs.clone()]).unwrap();
    assert_eq!(
        call(&mut ctx, "glGetShaderiv", vec![vs.clone(), int(GL_COMPILE_STATUS)]).unwrap(),
        int(GL_TRUE)
    );
    assert_eq!(
        call(&mut ctx, "glGetShaderInfoLog", vec![vs.clone()]).unwrap(),
        HostValue::Bytes(Vec::new())
    );

    let program = call(&mut ctx, "glCreateProgram", Vec::new()).unwrap();
    call(&mut ctx, "glAttachShader", vec![program.clone(), vs.clone()]).unwrap();
    call(&mut ctx, "glLinkProgram", vec![program.clone()]).unwrap();
    call(&mut ctx, "glUseProgram", vec![program.clone()]).unwrap();

    let tint = call(
        &mut ctx,
        "glGetUniformLocation",
        vec![program.clone(), HostValue::from("tint")],
    )
    .unwrap();
    let floats = [0.5, 0.25, 1.0, 1.0].map(HostValue::Float);
    let mut args = vec![tint];
    args.extend(floats);
    call(&mut ctx, "glUniform4f", args).unwrap();

    let vao = call(&mut ctx, "glGenVertexArrays", vec![int(1)]).unwrap();
    let vbo = call(&mut ctx, "glGenBuffers", vec![int(1)]).unwrap();
    call(&mut ctx, "glBindVertexArray", vec![vao.clone()]).unwrap();
    call(&mut ctx, "glBindBuffer", vec![int(GL_ARRAY_BUFFER), vbo]).unwrap();
    call(
        &mut ctx,
        "glVertexAttribPointer",
        vec![int(0), int(2), int(GL_FLOAT), HostValue::Bool(false), int(8), int(0)],
    )
    .unwrap();
    call(&mut ctx, "glEnableVertexAttribArray", vec![int(0)]).unwrap();

    call(&mut ctx, "glViewport", vec![int(0), int(0), int(640), int(480)]).unwrap();
    call(&mut ctx, "glClear", vec![int(GL_COLOR_BUFFER_BIT)]).unwrap();

    let firsts = [0i32, 4];
    let counts = [4i32, 4];
    call(
        &mut ctx,
        "glMultiDrawArrays",
        vec![
            int(GL_TRIANGLE_STRIP),
            HostValue::from(firsts.as_ptr() as usize),
            HostValue::from(counts.as_ptr() as usize),
            int(2),
        ],
    )
    .unwrap();

    let driver = ctx.driver();
    let program_name = program.as_int().unwrap() as u32;
    let vao_name = vao.as_int().unwrap() as u32;
    assert_eq!(driver.viewport_state(), [0, 0, 640, 480]);
    assert_eq!(
        driver.uniform(program_name, 0),
        Some(glbridge_driver::UniformValue::Float4([0.5, 0.25, 1.0, 1.0]))
    );
    assert!(driver.attrib_enabled(vao_name, 0));
    assert_eq!(driver.attrib_pointer(vao_name, 0).map(|p| p.stride), Some(8));
    assert_eq!(driver.draws().len(), 2);
}

#[test]
fn test_texture_upload_through_dispatch() {
    let mut ctx = make_context();
    let texture = call(&mut ctx, "glGenTextures", vec![int(1)]).unwrap();
    call(&mut ctx, "glBindTexture", vec![int(GL_TEXTURE_2D_ARRAY), texture.clone()]).unwrap();
    call(
        &mut ctx,
        "glTexStorage3D",
        vec![int(GL_TEXTURE_2D_ARRAY), int(1), int(GL_R8), int(4), int(1), int(1)],
    )
    .unwrap();
    call(&mut ctx, "glPixelStorei", vec![int(GL_UNPACK_ALIGNMENT), int(1)]).unwrap();

    let row = [10u8, 20, 30, 40];
    call(
        &mut ctx,
        "glTexSubImage3D",
        vec![
            int(GL_TEXTURE_2D_ARRAY),
            int(0),
            int(0),
            int(0),
            int(0),
            int(4),
            int(1),
            int(1),
            int(GL_RED),
            int(GL_UNSIGNED_BYTE),
            HostValue::from(row.as_ptr() as usize),
        ],
    )
    .unwrap();

    let texture = texture.as_int().unwrap() as u32;
    assert_eq!(ctx.driver().texture_data(texture), Some(row.to_vec()));
}
