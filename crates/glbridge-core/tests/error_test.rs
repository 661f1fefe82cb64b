use glbridge_core::error::codes;
use glbridge_core::{Capability, CapabilitySet, DriverError, ErrorCategory, GlError, GlVersion};

#[test]
fn test_no_error_translates_to_none() {
    assert_eq!(DriverError::from_code(codes::GL_NO_ERROR), None);
}

#[test]
fn test_driver_codes_map_to_categories() {
    let cases = [
        (codes::GL_INVALID_ENUM, ErrorCategory::BadArgument),
        (codes::GL_INVALID_VALUE, ErrorCategory::BadArgument),
        (codes::GL_INVALID_OPERATION, ErrorCategory::BadArgument),
        (codes::GL_INVALID_FRAMEBUFFER_OPERATION, ErrorCategory::BadArgument),
        (codes::GL_OUT_OF_MEMORY, ErrorCategory::Allocation),
        (codes::GL_STACK_OVERFLOW, ErrorCategory::Overflow),
        (codes::GL_STACK_UNDERFLOW, ErrorCategory::Overflow),
        (0x9999, ErrorCategory::Runtime),
    ];
    for (code, category) in cases {
        let err = DriverError::from_code(code).unwrap();
        assert_eq!(err.category(), category, "code 0x{:04x}", code);
        assert_eq!(err.code(), code);
        assert_eq!(GlError::from(err).category(), category);
    }
}

#[test]
fn test_unknown_code_is_preserved() {
    assert_eq!(DriverError::from_code(0x1234), Some(DriverError::Unknown(0x1234)));
}

#[test]
fn test_capability_error_names_extension() {
    let err = GlError::CapabilityMissing {
        capability: Capability::TextureStorage,
    };
    assert!(err.to_string().contains("GL_ARB_texture_storage"));
}

#[test]
fn test_version_parsing() {
    assert_eq!(GlVersion::parse("4.6.0 NVIDIA 535.54.03"), Some(GlVersion::new(4, 6)));
    assert_eq!(GlVersion::parse("3.3 (Core Profile) Mesa 23.0"), Some(GlVersion::new(3, 3)));
    assert_eq!(GlVersion::parse("OpenGL ES 3.2 Mesa"), Some(GlVersion::new(3, 2)));
    assert_eq!(GlVersion::parse("garbage"), None);
}

#[test]
fn test_capability_present_by_extension_or_core_version() {
    let old = CapabilitySet::new(Some(GlVersion::new(3, 3)), ["GL_ARB_texture_storage"]);
    assert!(old.has(Capability::TextureStorage));
    assert!(!old.has(Capability::TextureBufferObjectRgb32));
    assert_eq!(
        old.first_missing(&Capability::REQUIRED),
        Some(Capability::TextureBufferObjectRgb32)
    );

    let modern = CapabilitySet::new(Some(GlVersion::new(4, 5)), Vec::<String>::new());
    assert!(modern.has(Capability::CopyImage));
    assert!(modern.has(Capability::DirectStateAccess));
    assert_eq!(modern.first_missing(&Capability::REQUIRED), None);
}
