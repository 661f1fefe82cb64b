//! Values as the host runtime sees them.

use std::fmt;

/// A dynamically typed value crossing the host/native boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<HostValue>),
}

impl HostValue {
    /// Host-facing type name, used in argument errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::None => "none",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Text(_) => "text",
            HostValue::Bytes(_) => "bytes",
            HostValue::List(_) => "list",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HostValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[HostValue]> {
        match self {
            HostValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "None"),
            HostValue::Bool(b) => write!(f, "{}", b),
            HostValue::Int(v) => write!(f, "{}", v),
            HostValue::Float(v) => write!(f, "{}", v),
            HostValue::Text(s) => write!(f, "{:?}", s),
            HostValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            HostValue::List(items) => write!(f, "<list of {}>", items.len()),
        }
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::Int(v as i64)
    }
}

impl From<u32> for HostValue {
    fn from(v: u32) -> Self {
        HostValue::Int(v as i64)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Int(v)
    }
}

impl From<usize> for HostValue {
    fn from(v: usize) -> Self {
        HostValue::Int(v as i64)
    }
}

impl From<f32> for HostValue {
    fn from(v: f32) -> Self {
        HostValue::Float(v as f64)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Float(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Text(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::Text(v)
    }
}

impl From<Vec<u8>> for HostValue {
    fn from(v: Vec<u8>) -> Self {
        HostValue::Bytes(v)
    }
}
