//! Host argument validation and conversion.
//!
//! Every entry point has a [`CallDescriptor`] listing its parameters and the
//! native type each one must convert to. [`Args::new`] converts every
//! argument once up front, so a bad argument anywhere fails the call before
//! any native code runs.

use std::ffi::CString;

use glbridge_core::{ArgumentError, HostValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Unsigned 32-bit integer: enums, handles, sizes in texels.
    UInt,
    /// Signed 32-bit integer.
    Int,
    /// Finite 32-bit float.
    Float,
    Bool,
    /// Text or bytes, passed through verbatim.
    Text,
    /// Text without interior NUL, for identifier lookups.
    Name,
    /// A caller-owned memory address encoded as an integer.
    Address,
    /// A byte count.
    Size,
    /// A non-negative request count.
    Count,
}

impl ArgKind {
    pub fn expected(self) -> &'static str {
        match self {
            ArgKind::UInt => "an unsigned 32-bit integer",
            ArgKind::Int => "a signed 32-bit integer",
            ArgKind::Float => "a float",
            ArgKind::Bool => "a bool",
            ArgKind::Text => "text or bytes",
            ArgKind::Name => "text",
            ArgKind::Address => "a memory address",
            ArgKind::Size => "a byte count",
            ArgKind::Count => "a non-negative count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ArgKind,
}

/// The host-visible signature of one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallDescriptor {
    pub name: &'static str,
    pub params: &'static [Param],
}

/// Host arguments checked against a descriptor.
pub struct Args<'a> {
    desc: &'static CallDescriptor,
    values: &'a [HostValue],
}

impl<'a> Args<'a> {
    pub fn new(desc: &'static CallDescriptor, values: &'a [HostValue]) -> Result<Self, ArgumentError> {
        if values.len() != desc.params.len() {
            return Err(ArgumentError::Arity {
                operation: desc.name,
                expected: desc.params.len(),
                got: values.len(),
            });
        }
        let args = Self { desc, values };
        for (index, param) in desc.params.iter().enumerate() {
            match param.kind {
                ArgKind::UInt => args.uint(index).map(drop)?,
                ArgKind::Int => args.int(index).map(drop)?,
                ArgKind::Float => args.float(index).map(drop)?,
                ArgKind::Bool => args.bool(index).map(drop)?,
                ArgKind::Text => args.text(index).map(drop)?,
                ArgKind::Name => args.name(index).map(drop)?,
                ArgKind::Address => args.address(index).map(drop)?,
                ArgKind::Size => args.size(index).map(drop)?,
                ArgKind::Count => args.count(index).map(drop)?,
            }
        }
        Ok(args)
    }

    pub fn uint(&self, index: usize) -> Result<u32, ArgumentError> {
        self.ranged(index, ArgKind::UInt)
    }

    pub fn int(&self, index: usize) -> Result<i32, ArgumentError> {
        self.ranged(index, ArgKind::Int)
    }

    pub fn float(&self, index: usize) -> Result<f32, ArgumentError> {
        let wide = match self.value(index)? {
            HostValue::Float(v) => *v,
            HostValue::Int(v) => *v as f64,
            other => return Err(self.type_error(index, ArgKind::Float, other)),
        };
        let narrow = wide as f32;
        if !narrow.is_finite() {
            return Err(ArgumentError::NonFinite {
                operation: self.desc.name,
                argument: self.param_name(index),
            });
        }
        Ok(narrow)
    }

    pub fn bool(&self, index: usize) -> Result<bool, ArgumentError> {
        match self.value(index)? {
            HostValue::Bool(b) => Ok(*b),
            HostValue::Int(v) => Ok(*v != 0),
            other => Err(self.type_error(index, ArgKind::Bool, other)),
        }
    }

    pub fn text(&self, index: usize) -> Result<&'a [u8], ArgumentError> {
        match self.value(index)? {
            HostValue::Text(s) => Ok(s.as_bytes()),
            HostValue::Bytes(b) => Ok(b),
            other => Err(self.type_error(index, ArgKind::Text, other)),
        }
    }

    pub fn name(&self, index: usize) -> Result<&'a str, ArgumentError> {
        let name = match self.value(index)? {
            HostValue::Text(s) => s.as_str(),
            other => return Err(self.type_error(index, ArgKind::Name, other)),
        };
        if name.contains('\0') {
            return Err(ArgumentError::InteriorNul {
                operation: self.desc.name,
                argument: self.param_name(index),
            });
        }
        Ok(name)
    }

    pub fn address(&self, index: usize) -> Result<usize, ArgumentError> {
        self.ranged(index, ArgKind::Address)
    }

    pub fn size(&self, index: usize) -> Result<usize, ArgumentError> {
        let size: usize = self.ranged(index, ArgKind::Size)?;
        if size > isize::MAX as usize {
            return Err(self.range_error(index, ArgKind::Size, size.to_string()));
        }
        Ok(size)
    }

    pub fn count(&self, index: usize) -> Result<u64, ArgumentError> {
        self.ranged(index, ArgKind::Count)
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn value(&self, index: usize) -> Result<&'a HostValue, ArgumentError> {
        self.values.get(index).ok_or(ArgumentError::Arity {
            operation: self.desc.name,
            expected: self.desc.params.len(),
            got: self.values.len(),
        })
    }

    fn param_name(&self, index: usize) -> &'static str {
        self.desc.params.get(index).map_or("?", |p| p.name)
    }

    fn integer(&self, index: usize, kind: ArgKind) -> Result<i64, ArgumentError> {
        match self.value(index)? {
            HostValue::Int(v) => Ok(*v),
            HostValue::Bool(b) => Ok(*b as i64),
            other => Err(self.type_error(index, kind, other)),
        }
    }

    fn ranged<T: TryFrom<i64>>(&self, index: usize, kind: ArgKind) -> Result<T, ArgumentError> {
        let v = self.integer(index, kind)?;
        T::try_from(v).map_err(|_| self.range_error(index, kind, v.to_string()))
    }

    fn type_error(&self, index: usize, kind: ArgKind, got: &HostValue) -> ArgumentError {
        ArgumentError::Type {
            operation: self.desc.name,
            argument: self.param_name(index),
            expected: kind.expected(),
            got: got.type_name(),
        }
    }

    fn range_error(&self, index: usize, kind: ArgKind, value: String) -> ArgumentError {
        ArgumentError::OutOfRange {
            operation: self.desc.name,
            argument: self.param_name(index),
            value,
            expected: kind.expected(),
        }
    }
}

/// `name` as a C string for the driver.
pub(crate) fn c_name(operation: &'static str, name: &str) -> Result<CString, ArgumentError> {
    CString::new(name).map_err(|_| ArgumentError::InteriorNul {
        operation,
        argument: "name",
    })
}
