//! Error types for the Golioth bindings.

use core::ffi::c_int;

/// Result code returned by the native SDK.
///
/// The SDK reports `0` for success and a positive `golioth_status` value for
/// anything else. Codes this crate does not know about are kept verbatim in
/// [`Status::Unknown`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum Status {
    /// Generic failure.
    #[error("generic failure")]
    Fail,
    /// The server hostname could not be resolved.
    #[error("DNS lookup failed")]
    DnsLookup,
    /// The operation is not implemented by this SDK build.
    #[error("not implemented")]
    NotImplemented,
    /// The SDK ran out of memory.
    #[error("memory allocation failed")]
    MemAlloc,
    /// A required pointer was null.
    #[error("null argument")]
    Null,
    /// The payload had an invalid format.
    #[error("invalid format")]
    InvalidFormat,
    /// The SDK failed to serialize the payload.
    #[error("serialization failed")]
    Serialize,
    /// A transport-level I/O error.
    #[error("I/O error")]
    Io,
    /// The request timed out inside the SDK.
    #[error("request timed out")]
    Timeout,
    /// The request queue is full.
    #[error("request queue full")]
    QueueFull,
    /// The operation is not allowed in the current configuration.
    #[error("not allowed")]
    NotAllowed,
    /// The client is in a state that does not allow the operation.
    #[error("invalid state")]
    InvalidState,
    /// There is no more data to return.
    #[error("no more data")]
    NoMoreData,
    /// The server rejected the request.
    #[error("request was not acknowledged")]
    Nack,
    /// The server reported a bad request.
    #[error("bad request")]
    BadRequest,
    /// The server answered with a non-2.xx CoAP response code.
    #[error("CoAP response error")]
    CoapResponse,
    /// A code not covered by the variants above.
    #[error("unknown status {0}")]
    Unknown(i32),
}

impl Status {
    /// Raw value the SDK uses for success.
    pub const OK: c_int = 0;

    /// Map a raw result code, treating `0` as success.
    pub fn check(code: c_int) -> Result<(), Status> {
        if code == Self::OK {
            Ok(())
        } else {
            Err(Self::from_code(code))
        }
    }

    /// Map a non-zero raw result code onto a status.
    pub fn from_code(code: c_int) -> Status {
        match code {
            1 => Status::Fail,
            2 => Status::DnsLookup,
            3 => Status::NotImplemented,
            4 => Status::MemAlloc,
            5 => Status::Null,
            6 => Status::InvalidFormat,
            7 => Status::Serialize,
            8 => Status::Io,
            9 => Status::Timeout,
            10 => Status::QueueFull,
            11 => Status::NotAllowed,
            12 => Status::InvalidState,
            13 => Status::NoMoreData,
            14 => Status::Nack,
            15 => Status::BadRequest,
            16 => Status::CoapResponse,
            other => Status::Unknown(other),
        }
    }

    /// The raw code this status was decoded from.
    pub fn code(&self) -> c_int {
        match self {
            Status::Fail => 1,
            Status::DnsLookup => 2,
            Status::NotImplemented => 3,
            Status::MemAlloc => 4,
            Status::Null => 5,
            Status::InvalidFormat => 6,
            Status::Serialize => 7,
            Status::Io => 8,
            Status::Timeout => 9,
            Status::QueueFull => 10,
            Status::NotAllowed => 11,
            Status::InvalidState => 12,
            Status::NoMoreData => 13,
            Status::Nack => 14,
            Status::BadRequest => 15,
            Status::CoapResponse => 16,
            Status::Unknown(code) => *code,
        }
    }
}

/// A value or path could not be encoded for the native layer.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum EncodingError {
    /// The path does not fit into the path buffer.
    #[error("path longer than {max} bytes")]
    PathTooLong {
        /// Maximum accepted path length in bytes.
        max: usize,
    },
    /// The path contains a NUL byte and cannot be passed as a C string.
    #[error("path contains a NUL byte")]
    PathContainsNul,
    /// A structured value could not be serialized to JSON.
    #[error("value could not be serialized to JSON")]
    Json,
    /// A string returned by the SDK was not valid UTF-8.
    #[error("value is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors surfaced by the client and LightDB operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `golioth_client_create` returned a null handle.
    #[error("native client creation failed")]
    Creation,
    /// The client did not connect before the timeout elapsed.
    #[error("client did not connect within the timeout")]
    ConnectTimeout,
    /// A LightDB call returned a non-zero status.
    #[error("LightDB request failed: {0}")]
    Store(#[from] Status),
    /// A path or value could not be encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),
    /// The loaded library does not export the named symbol.
    #[error("native SDK does not export `{0}`")]
    Unsupported(&'static str),
    /// The shared library or one of its required symbols failed to load.
    #[cfg(feature = "std")]
    #[error("failed to load native SDK: {0}")]
    Library(#[from] libloading::Error),
    /// An environment variable held an invalid value.
    #[cfg(feature = "std")]
    #[error("invalid value for `{0}`")]
    Config(&'static str),
}

impl Error {
    /// The native status behind a failed LightDB call, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Store(status) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Status::Fail => defmt::write!(f, "Fail"),
            Status::DnsLookup => defmt::write!(f, "DnsLookup"),
            Status::NotImplemented => defmt::write!(f, "NotImplemented"),
            Status::MemAlloc => defmt::write!(f, "MemAlloc"),
            Status::Null => defmt::write!(f, "Null"),
            Status::InvalidFormat => defmt::write!(f, "InvalidFormat"),
            Status::Serialize => defmt::write!(f, "Serialize"),
            Status::Io => defmt::write!(f, "Io"),
            Status::Timeout => defmt::write!(f, "Timeout"),
            Status::QueueFull => defmt::write!(f, "QueueFull"),
            Status::NotAllowed => defmt::write!(f, "NotAllowed"),
            Status::InvalidState => defmt::write!(f, "InvalidState"),
            Status::NoMoreData => defmt::write!(f, "NoMoreData"),
            Status::Nack => defmt::write!(f, "Nack"),
            Status::BadRequest => defmt::write!(f, "BadRequest"),
            Status::CoapResponse => defmt::write!(f, "CoapResponse"),
            Status::Unknown(code) => defmt::write!(f, "Unknown({})", code),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EncodingError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncodingError::PathTooLong { max } => defmt::write!(f, "PathTooLong({})", max),
            EncodingError::PathContainsNul => defmt::write!(f, "PathContainsNul"),
            EncodingError::Json => defmt::write!(f, "Json"),
            EncodingError::InvalidUtf8 => defmt::write!(f, "InvalidUtf8"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Creation => defmt::write!(f, "Creation"),
            Error::ConnectTimeout => defmt::write!(f, "ConnectTimeout"),
            Error::Store(status) => defmt::write!(f, "Store({})", status),
            Error::Encoding(err) => defmt::write!(f, "Encoding({})", err),
            Error::Unsupported(symbol) => defmt::write!(f, "Unsupported({})", symbol),
            #[cfg(feature = "std")]
            Error::Library(_) => defmt::write!(f, "Library"),
            #[cfg(feature = "std")]
            Error::Config(var) => defmt::write!(f, "Config({})", var),
        }
    }
}
