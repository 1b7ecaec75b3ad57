//! Foreign result codes.

use std::fmt;

use thiserror::Error;

/// Result code returned across the foreign ABI.
///
/// Codes are passed through verbatim in both directions. The well-known
/// values follow the host's conventions, which use COM `HRESULT` values on
/// Windows and small integers everywhere else.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResultCode(pub i32);

#[cfg(target_os = "windows")]
impl ResultCode {
    pub const OK: Self = Self(0);
    pub const TRUE: Self = Self(0);
    pub const FALSE: Self = Self(1);
    pub const NO_INTERFACE: Self = Self(0x8000_4002_u32 as i32);
    pub const INVALID_ARGUMENT: Self = Self(0x8007_0057_u32 as i32);
    pub const NOT_IMPLEMENTED: Self = Self(0x8000_4001_u32 as i32);
    pub const INTERNAL_ERROR: Self = Self(0x8000_4005_u32 as i32);
    pub const NOT_INITIALIZED: Self = Self(0x8000_FFFF_u32 as i32);
    pub const OUT_OF_MEMORY: Self = Self(0x8007_000E_u32 as i32);
}

#[cfg(not(target_os = "windows"))]
impl ResultCode {
    pub const OK: Self = Self(0);
    pub const TRUE: Self = Self(0);
    pub const FALSE: Self = Self(1);
    pub const NO_INTERFACE: Self = Self(-1);
    pub const INVALID_ARGUMENT: Self = Self(2);
    pub const NOT_IMPLEMENTED: Self = Self(3);
    pub const INTERNAL_ERROR: Self = Self(4);
    pub const NOT_INITIALIZED: Self = Self(5);
    pub const OUT_OF_MEMORY: Self = Self(6);
}

impl ResultCode {
    /// Check if this is [`ResultCode::OK`].
    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    /// Convert into a `Result`, keeping any non-OK code as the error.
    #[inline]
    pub fn ok(self) -> Result<(), ResultCode> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::OK => "OK",
            Self::FALSE => "FALSE",
            Self::NO_INTERFACE => "NO_INTERFACE",
            Self::INVALID_ARGUMENT => "INVALID_ARGUMENT",
            Self::NOT_IMPLEMENTED => "NOT_IMPLEMENTED",
            Self::INTERNAL_ERROR => "INTERNAL_ERROR",
            Self::NOT_INITIALIZED => "NOT_INITIALIZED",
            Self::OUT_OF_MEMORY => "OUT_OF_MEMORY",
            _ => return None,
        })
    }
}

impl fmt::Debug for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "ResultCode::{name}"),
            None => write!(f, "ResultCode({:#010x})", self.0),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#x})", self.0),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

impl From<i32> for ResultCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

/// Failure of an interface query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The object does not implement the requested interface.
    #[error("interface not supported")]
    NoInterface,
    /// The query itself failed.
    #[error("interface query failed: {0}")]
    Failed(ResultCode),
}

impl QueryError {
    /// Map a foreign result code to a query error.
    pub fn from_code(code: ResultCode) -> Self {
        if code == ResultCode::NO_INTERFACE {
            QueryError::NoInterface
        } else {
            QueryError::Failed(code)
        }
    }
}

impl From<QueryError> for ResultCode {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NoInterface => ResultCode::NO_INTERFACE,
            QueryError::Failed(code) => code,
        }
    }
}
