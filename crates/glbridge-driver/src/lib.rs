//! The native side of the bridge.
//!
//! [`GlDriver`] is the seam every bridge operation calls through. Two
//! implementations ship here: [`GlLibrary`], which loads the system OpenGL
//! library at runtime, and [`SimDriver`], a deterministic in-process driver
//! used by the test suites.

pub mod consts;
pub mod driver;
pub mod library;
pub mod sim;

pub use driver::{ExtensionLoading, GlDriver, MissingEntryPoint};
pub use library::GlLibrary;
pub use sim::{SimAttribPointer, SimDraw, SimDriver, UniformValue};
