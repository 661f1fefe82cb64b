//! Optional driver features and how to tell whether they are present.

use std::collections::BTreeSet;
use std::fmt;

/// A driver feature gated behind an extension (or a core version that
/// absorbed it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    TextureStorage,
    TextureBufferObjectRgb32,
    CopyImage,
    DirectStateAccess,
}

impl Capability {
    /// Checked by bootstrap, in this order.
    pub const REQUIRED: [Capability; 2] = [
        Capability::TextureStorage,
        Capability::TextureBufferObjectRgb32,
    ];

    pub const ALL: [Capability; 4] = [
        Capability::TextureStorage,
        Capability::TextureBufferObjectRgb32,
        Capability::CopyImage,
        Capability::DirectStateAccess,
    ];

    /// The extension string the driver advertises for this feature.
    pub fn extension(&self) -> &'static str {
        match self {
            Capability::TextureStorage => "GL_ARB_texture_storage",
            Capability::TextureBufferObjectRgb32 => "GL_ARB_texture_buffer_object_rgb32",
            Capability::CopyImage => "GL_ARB_copy_image",
            Capability::DirectStateAccess => "GL_ARB_direct_state_access",
        }
    }

    /// First core version that includes the feature without the extension.
    pub fn core_since(&self) -> GlVersion {
        match self {
            Capability::TextureStorage => GlVersion::new(4, 2),
            Capability::TextureBufferObjectRgb32 => GlVersion::new(4, 0),
            Capability::CopyImage => GlVersion::new(4, 3),
            Capability::DirectStateAccess => GlVersion::new(4, 5),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `major.minor` of a `GL_VERSION` string.
    ///
    /// Accepts both desktop (`"4.6.0 NVIDIA 535.54"`) and ES style
    /// (`"OpenGL ES 3.2 Mesa"`) strings.
    pub fn parse(version: &str) -> Option<Self> {
        let start = version.find(|c: char| c.is_ascii_digit())?;
        let mut parts = version[start..]
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty());
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
        Some(Self { major, minor })
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What a driver advertised at probe time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    version: Option<GlVersion>,
    extensions: BTreeSet<String>,
}

impl CapabilitySet {
    pub fn new<I, S>(version: Option<GlVersion>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version,
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn version(&self) -> Option<GlVersion> {
        self.version
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.has_extension(capability.extension())
            || self.version.is_some_and(|v| v >= capability.core_since())
    }

    /// First entry of `required` that is absent.
    pub fn first_missing(&self, required: &[Capability]) -> Option<Capability> {
        required.iter().copied().find(|c| !self.has(*c))
    }

    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }
}
