//! Integration test: capability bootstrap
//!
//! Loader initialisation, required-capability checks, caching of the
//! outcome and capability probing through both extension query styles.
//!
//! Run with: cargo test --test bootstrap_test

use glbridge::consts::*;
use glbridge::{
    Capability, DriverError, ErrorCategory, ExtensionLoading, GlContext, GlError, GlVersion,
    SimDriver,
};

#[test]
fn test_bootstrap_succeeds_on_modern_driver() {
    let ctx = GlContext::new(SimDriver::new());
    ctx.bootstrap().unwrap();
    assert_eq!(ctx.driver().call_count("loader_init"), 1);
    assert_eq!(ctx.capabilities().version(), Some(GlVersion::new(4, 6)));
}

#[test]
fn test_core_version_satisfies_requirements_without_extensions() {
    let driver = SimDriver::new();
    driver.set_version(Some("4.5.0 core"));
    driver.set_extensions(Vec::<String>::new());
    let ctx = GlContext::new(driver);

    ctx.bootstrap().unwrap();
    let caps = ctx.capabilities();
    assert!(caps.has(Capability::TextureStorage));
    assert!(caps.has(Capability::DirectStateAccess));
    assert!(caps.has(Capability::CopyImage));
}

#[test]
fn test_missing_capability_is_named() {
    let driver = SimDriver::new();
    driver.set_version(Some("3.3.0"));
    driver.set_extensions(["GL_ARB_texture_storage"]);
    let ctx = GlContext::new(driver);

    let err = ctx.bootstrap().unwrap_err();
    assert_eq!(
        err,
        GlError::CapabilityMissing {
            capability: Capability::TextureBufferObjectRgb32
        }
    );
    assert_eq!(err.category(), ErrorCategory::Runtime);
    assert!(err
        .to_string()
        .ends_with("missing the required extension: GL_ARB_texture_buffer_object_rgb32"));
}

#[test]
fn test_first_missing_capability_wins() {
    let driver = SimDriver::new();
    driver.set_version(Some("3.3.0"));
    driver.set_extensions(Vec::<String>::new());
    let ctx = GlContext::new(driver);

    let err = ctx.bootstrap().unwrap_err();
    assert_eq!(
        err,
        GlError::CapabilityMissing {
            capability: Capability::TextureStorage
        }
    );
}

#[test]
fn test_loader_failure_carries_cause() {
    let driver = SimDriver::new();
    driver.fail_loader("Missing GL version");
    let ctx = GlContext::new(driver);

    let err = ctx.bootstrap().unwrap_err();
    assert_eq!(
        err,
        GlError::LoaderInit {
            cause: "Missing GL version".to_string()
        }
    );
    assert_eq!(err.category(), ErrorCategory::Runtime);
}

#[test]
fn test_no_current_context_fails_loader() {
    let driver = SimDriver::new();
    driver.set_version(None);
    let ctx = GlContext::new(driver);
    assert!(matches!(ctx.bootstrap(), Err(GlError::LoaderInit { .. })));
}

#[test]
fn test_outcome_is_cached() {
    let driver = SimDriver::new();
    driver.fail_loader("no context");
    let ctx = GlContext::new(driver);

    let first = ctx.bootstrap().unwrap_err();
    let second = ctx.bootstrap().unwrap_err();
    assert_eq!(first, second);
    assert_eq!(ctx.driver().call_count("loader_init"), 1);

    let ctx = GlContext::new(SimDriver::new());
    ctx.bootstrap().unwrap();
    ctx.bootstrap().unwrap();
    assert_eq!(ctx.driver().call_count("loader_init"), 1);
    assert_eq!(ctx.driver().call_count("glGetString"), 1);
}

#[test]
fn test_builtin_loading_is_a_no_op() {
    let driver = SimDriver::new();
    driver.set_extension_loading(ExtensionLoading::BuiltIn);
    driver.fail_loader("must not be called");
    let ctx = GlContext::new(driver);

    ctx.bootstrap().unwrap();
    assert_eq!(ctx.driver().call_count("loader_init"), 0);
    assert!(ctx.driver().calls().is_empty());
}

#[test]
fn test_probe_falls_back_to_extension_string() {
    let driver = SimDriver::new();
    driver.set_version(Some("3.3.0"));
    driver.set_extensions([
        "GL_ARB_texture_storage",
        "GL_ARB_texture_buffer_object_rgb32",
        "GL_ARB_copy_image",
    ]);
    driver.remove_entry_point("glGetStringi");
    let ctx = GlContext::new(driver);

    ctx.bootstrap().unwrap();
    let caps = ctx.capabilities();
    assert_eq!(caps.extension_count(), 3);
    assert!(caps.has(Capability::CopyImage));
    assert!(!caps.has(Capability::DirectStateAccess));
}

#[test]
fn test_probe_uses_indexed_queries() {
    let ctx = GlContext::new(SimDriver::new());

    let count = ctx.capabilities().extension_count();
    assert_eq!(ctx.driver().call_count("glGetStringi"), count);
    assert_eq!(ctx.get_integer(GL_NUM_EXTENSIONS).unwrap() as usize, count);
}

#[test]
fn test_tex_storage_without_entry_point() {
    let driver = SimDriver::new();
    driver.remove_entry_point("glTexStorage3D");
    let ctx = GlContext::new(driver);
    let texture = ctx.gen_textures(1).unwrap()[0];
    ctx.bind_texture(GL_TEXTURE_2D_ARRAY, texture).unwrap();

    let err = ctx
        .tex_storage_3d(GL_TEXTURE_2D_ARRAY, 1, GL_RGBA8, 4, 4, 1)
        .unwrap_err();
    assert_eq!(
        err,
        GlError::CapabilityMissing {
            capability: Capability::TextureStorage
        }
    );
}

#[test]
fn test_probe_errors_are_not_blamed_on_the_next_call() {
    let driver = SimDriver::new();
    driver.inject_error("glGetIntegerv", GL_INVALID_ENUM);
    let ctx = GlContext::new(driver);

    ctx.bootstrap().unwrap();
    ctx.viewport(0, 0, 10, 10).unwrap();
    assert_eq!(ctx.driver().peek_error(), GL_NO_ERROR);
}

#[test]
fn test_lazy_probe_keeps_callers_pending_error() {
    let driver = SimDriver::new();
    driver.remove_entry_point("glGetStringi");
    driver.inject_error("glGetString", GL_INVALID_ENUM);
    let ctx = GlContext::new(driver);
    ctx.driver().raise_error(GL_INVALID_VALUE);

    // The probe's own failure is dropped; the caller's error is reported once.
    assert!(ctx.capabilities().extension_count() > 0);
    assert_eq!(ctx.check_error(), Err(GlError::Driver(DriverError::InvalidValue)));
    ctx.check_error().unwrap();
}

#[test]
fn test_upload_before_bootstrap_is_not_blamed_for_probe_errors() {
    let driver = SimDriver::new();
    driver.remove_entry_point("glGetStringi");
    driver.inject_error("glGetString", GL_INVALID_ENUM);
    let ctx = GlContext::new(driver);

    let buffer = ctx.gen_buffers(1).unwrap()[0];
    let data = [1u8, 2, 3, 4];
    unsafe {
        ctx.upload_buffer_data(buffer, data.len(), data.as_ptr().cast(), GL_STATIC_DRAW)
            .unwrap();
    }
    assert_eq!(ctx.driver().buffer_contents(buffer.raw()), Some(data.to_vec()));
}
