//! Typed operations, one method per native entry point.
//!
//! Each method issues its native call, then runs the automatic error check.
//! Calls that may block on the GPU release the host lock around the native
//! call only.

mod draw;
mod shader;
mod state;
mod texture;
mod uniform;
