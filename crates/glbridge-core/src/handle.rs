//! Strongly typed driver handles.
//!
//! The driver hands out plain `u32` names for every resource kind. Each kind
//! gets its own wrapper so a texture name can never be passed where a program
//! is expected. Names are opaque: the bridge never invents one, it only
//! forwards what generation calls returned or what the caller supplied.

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// The reserved zero name (unbinds when passed to a bind call).
            pub const NONE: Self = Self(0);

            /// Wrap a name obtained from the driver or forwarded by the host.
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }

            pub const fn is_none(self) -> bool {
                self.0 == 0
            }

            /// Resource kind, used in diagnostics.
            pub const fn kind() -> &'static str {
                $kind
            }
        }

        impl From<$name> for u32 {
            fn from(h: $name) -> u32 {
                h.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    };
}

gl_handle!(
    /// A shader object.
    ShaderId, "shader"
);
gl_handle!(
    /// A linked (or linkable) program object.
    ProgramId, "program"
);
gl_handle!(
    /// A texture object.
    TextureId, "texture"
);
gl_handle!(
    /// A buffer object.
    BufferId, "buffer"
);
gl_handle!(
    /// A vertex array object.
    VertexArrayId, "vertex-array"
);
