/// Library file names of the system OpenGL driver, in search order.
pub fn default_gl_library_names() -> &'static [&'static str] {
    #[cfg(target_os = "windows")]
    {
        &["opengl32.dll"]
    }
    #[cfg(target_os = "macos")]
    {
        &["/System/Library/Frameworks/OpenGL.framework/OpenGL"]
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        &["libGL.so.1", "libGL.so"]
    }
}

/// Name of the symbol used to resolve extension entry points at runtime,
/// or `None` where every entry point is exported by the base library.
pub fn proc_address_symbol() -> Option<&'static str> {
    #[cfg(target_os = "windows")]
    {
        Some("wglGetProcAddress")
    }
    #[cfg(target_os = "macos")]
    {
        None
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        Some("glXGetProcAddressARB")
    }
}

/// True where the extension mechanism is part of the base driver, so no
/// separate loader has to be initialised.
pub fn extension_loading_builtin() -> bool {
    cfg!(target_os = "macos")
}

/// Returns the platform name string.
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "windows")]
    { "windows" }
    #[cfg(target_os = "linux")]
    { "linux" }
    #[cfg(target_os = "macos")]
    { "macos" }
    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    { "unknown" }
}
