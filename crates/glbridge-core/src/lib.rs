pub mod capability;
pub mod config;
pub mod error;
pub mod handle;
pub mod value;

pub use capability::{Capability, CapabilitySet, GlVersion};
pub use config::BridgeConfig;
pub use error::{ArgumentError, DriverError, ErrorCategory, GlError, GlResult};
pub use handle::{BufferId, ProgramId, ShaderId, TextureId, VertexArrayId};
pub use value::HostValue;
