//! Error taxonomy of the bridge.
//!
//! Every operation either yields its result or exactly one [`GlError`].
//! Argument problems are caught before the native call, driver problems are
//! read back from the driver's error slot after it.

use crate::capability::Capability;

/// Driver error codes as reported by `glGetError`.
pub mod codes {
    pub const GL_NO_ERROR: u32 = 0;
    pub const GL_INVALID_ENUM: u32 = 0x0500;
    pub const GL_INVALID_VALUE: u32 = 0x0501;
    pub const GL_INVALID_OPERATION: u32 = 0x0502;
    pub const GL_STACK_OVERFLOW: u32 = 0x0503;
    pub const GL_STACK_UNDERFLOW: u32 = 0x0504;
    pub const GL_OUT_OF_MEMORY: u32 = 0x0505;
    pub const GL_INVALID_FRAMEBUFFER_OPERATION: u32 = 0x0506;
}

pub type GlResult<T> = Result<T, GlError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("the OpenGL driver on this system is missing the required extension: {}", .capability.extension())]
    CapabilityMissing { capability: Capability },

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("could not allocate {bytes} bytes of scratch memory")]
    Allocation { bytes: usize },

    #[error("not a valid data pointer: {argument}")]
    NullPointer { argument: &'static str },

    #[error("extension loader initialisation failed: {cause}")]
    LoaderInit { cause: String },

    #[error("no such operation: {name}")]
    UnknownOperation { name: String },
}

impl GlError {
    /// Broad class of the failure, as a host runtime would map it onto its
    /// own exception hierarchy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GlError::Argument(_) | GlError::NullPointer { .. } => ErrorCategory::BadArgument,
            GlError::Driver(e) => e.category(),
            GlError::Allocation { .. } => ErrorCategory::Allocation,
            GlError::CapabilityMissing { .. }
            | GlError::LoaderInit { .. }
            | GlError::UnknownOperation { .. } => ErrorCategory::Runtime,
        }
    }
}

/// Host-argument validation failures. Raised before any native call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("{operation}() takes {expected} argument(s) ({got} given)")]
    Arity {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{operation}(): argument '{argument}' must be {expected}, not {got}")]
    Type {
        operation: &'static str,
        argument: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{operation}(): argument '{argument}' = {value} does not fit {expected}")]
    OutOfRange {
        operation: &'static str,
        argument: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{operation}(): argument '{argument}' must be a finite number")]
    NonFinite {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("{operation}(): argument '{argument}' contains an embedded NUL byte")]
    InteriorNul {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("{operation}(): argument '{argument}' length {got} does not match '{other}' length {expected}")]
    LengthMismatch {
        operation: &'static str,
        argument: &'static str,
        other: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("generating more than {limit} names in a single call is not supported ({requested} requested)")]
    TooMany { requested: u64, limit: usize },
}

/// A code read back from the driver's error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("an enum value is invalid (GL_INVALID_ENUM)")]
    InvalidEnum,
    #[error("a numeric value is invalid (GL_INVALID_VALUE)")]
    InvalidValue,
    #[error("this operation is not allowed in the current state (GL_INVALID_OPERATION)")]
    InvalidOperation,
    #[error("the framebuffer object is not complete (GL_INVALID_FRAMEBUFFER_OPERATION)")]
    InvalidFramebufferOperation,
    #[error("there is not enough memory left to execute the command (GL_OUT_OF_MEMORY)")]
    OutOfMemory,
    #[error("an operation would cause an internal stack to overflow (GL_STACK_OVERFLOW)")]
    StackOverflow,
    #[error("an operation would cause an internal stack to underflow (GL_STACK_UNDERFLOW)")]
    StackUnderflow,
    #[error("an unknown OpenGL error occurred (code 0x{0:04x})")]
    Unknown(u32),
}

impl DriverError {
    /// Translate a raw error code. `GL_NO_ERROR` yields `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        use codes::*;
        let err = match code {
            GL_NO_ERROR => return None,
            GL_INVALID_ENUM => DriverError::InvalidEnum,
            GL_INVALID_VALUE => DriverError::InvalidValue,
            GL_INVALID_OPERATION => DriverError::InvalidOperation,
            GL_INVALID_FRAMEBUFFER_OPERATION => DriverError::InvalidFramebufferOperation,
            GL_OUT_OF_MEMORY => DriverError::OutOfMemory,
            GL_STACK_OVERFLOW => DriverError::StackOverflow,
            GL_STACK_UNDERFLOW => DriverError::StackUnderflow,
            other => DriverError::Unknown(other),
        };
        Some(err)
    }

    /// The raw code this error was translated from.
    pub fn code(&self) -> u32 {
        use codes::*;
        match self {
            DriverError::InvalidEnum => GL_INVALID_ENUM,
            DriverError::InvalidValue => GL_INVALID_VALUE,
            DriverError::InvalidOperation => GL_INVALID_OPERATION,
            DriverError::InvalidFramebufferOperation => GL_INVALID_FRAMEBUFFER_OPERATION,
            DriverError::OutOfMemory => GL_OUT_OF_MEMORY,
            DriverError::StackOverflow => GL_STACK_OVERFLOW,
            DriverError::StackUnderflow => GL_STACK_UNDERFLOW,
            DriverError::Unknown(code) => *code,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DriverError::InvalidEnum
            | DriverError::InvalidValue
            | DriverError::InvalidOperation
            | DriverError::InvalidFramebufferOperation => ErrorCategory::BadArgument,
            DriverError::OutOfMemory => ErrorCategory::Allocation,
            DriverError::StackOverflow | DriverError::StackUnderflow => ErrorCategory::Overflow,
            DriverError::Unknown(_) => ErrorCategory::Runtime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad argument or bad state.
    BadArgument,
    Allocation,
    Overflow,
    Runtime,
}
