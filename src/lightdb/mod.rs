//! LightDB state access.
//!
//! LightDB is the key-value store the Golioth cloud keeps for every device.
//! Each operation here is a single blocking call into the native SDK, bounded
//! by the accessor's timeout.
//!
//! ```rust,no_run
//! # fn demo() -> Result<(), libgolioth::Error> {
//! use libgolioth::{Client, NativeLibrary, Options, Value};
//!
//! let sdk = NativeLibrary::global("libgolioth_sdk.so")?;
//! let client = Client::connect_psk(sdk, b"device@project", b"secret", Options::default())?;
//!
//! let lightdb = client.lightdb();
//! lightdb.set("counter", 0)?;
//! lightdb.set("pi", 2.5_f32)?;
//! lightdb.set("is_rust", true)?;
//! lightdb.set("greeting", "grüß dich")?;
//! lightdb.set("raw", Value::Json(r#"{"key0":14}"#))?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

use crate::client::Client;
use crate::config::Timeout;
use crate::error::{EncodingError, Error, Status};
use crate::sys::{ClientHandle, Sdk};
use core::ffi::{CStr, c_int};
use heapless::Vec;
use serde::Serialize;


/// Longest accepted LightDB path, in bytes.
///
/// The SDK sizes each CoAP request from the path it is given and sets no
/// limit of its own. Paths are copied into a fixed stack buffer so the
/// terminator can be added without allocating, and this is that buffer's
/// size. LightDB paths are short slash-separated keys, well below this.
pub const MAX_PATH_LEN: usize = 128;
/// Largest JSON document [`LightDb::set_structured`] can encode without
/// `std`, in bytes.
pub const MAX_JSON_LEN: usize = 1024;

/// A LightDB path encoded as a NUL-terminated C string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    buf: Vec<u8, { MAX_PATH_LEN + 1 }>,
}

impl Path {
    /// Encode `path`, rejecting interior NUL bytes and paths longer than
    /// [`MAX_PATH_LEN`].
    pub fn new(path: &str) -> Result<Self, EncodingError> {
        if path.len() > MAX_PATH_LEN {
            return Err(EncodingError::PathTooLong { max: MAX_PATH_LEN });
        }
        if path.as_bytes().contains(&0) {
            return Err(EncodingError::PathContainsNul);
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(path.as_bytes())
            .map_err(|_| EncodingError::PathTooLong { max: MAX_PATH_LEN })?;
        buf.push(0)
            .map_err(|_| EncodingError::PathTooLong { max: MAX_PATH_LEN })?;
        Ok(Self { buf })
    }

    /// The path as passed to the SDK.
    pub fn as_c_str(&self) -> &CStr {
        // `new` guarantees exactly one NUL, at the end.
        CStr::from_bytes_until_nul(&self.buf).unwrap_or_default()
    }

    /// Length in bytes, without the terminator.
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    /// Whether this is the root path `""`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A value that can be written to LightDB.
///
/// Every variant maps to exactly one native setter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// `golioth_lightdb_set_int_sync`
    Int(i32),
    /// `golioth_lightdb_set_bool_sync`
    Bool(bool),
    /// `golioth_lightdb_set_float_sync`
    Float(f32),
    /// `golioth_lightdb_set_string_sync`, length in UTF-8 bytes.
    String(&'a str),
    /// `golioth_lightdb_set_json_sync` with an already serialized document.
    Json(&'a str),
}

impl Value<'_> {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Json(_) => "json",
        }
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::String(value)
    }
}

/// LightDB accessor bound to a connected [`Client`].
pub struct LightDb<'c, S: Sdk> {
    client: &'c Client<S>,
    timeout: Timeout,
}

impl<S: Sdk> core::fmt::Debug for LightDb<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LightDb")
            .field("client", &self.client.handle())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<'c, S: Sdk> LightDb<'c, S> {
    pub(crate) fn new(client: &'c Client<S>, timeout: Timeout) -> Self {
        Self { client, timeout }
    }

    /// Use `timeout` for every request made through this accessor.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout applied to each request.
    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// Write `value` at `path`.
    ///
    /// A non-zero native result becomes [`Error::Store`].
    pub fn set<'v>(&self, path: &str, value: impl Into<Value<'v>>) -> Result<(), Error> {
        let value = value.into();
        let encoded = Path::new(path)?;
        let code = self.dispatch(&encoded, value);
        self.finish("set", path, code)
    }

    fn dispatch(&self, path: &Path, value: Value<'_>) -> c_int {
        let (sdk, handle, timeout) = self.parts();
        let path = path.as_c_str();

        debug!("lightdb set ({}) with timeout {}", value.kind(), timeout);
        match value {
            Value::Int(v) => sdk.lightdb_set_int(handle, path, v, timeout),
            Value::Bool(v) => sdk.lightdb_set_bool(handle, path, v, timeout),
            Value::Float(v) => sdk.lightdb_set_float(handle, path, v, timeout),
            Value::String(v) => sdk.lightdb_set_string(handle, path, v.as_bytes(), timeout),
            Value::Json(v) => sdk.lightdb_set_json(handle, path, v.as_bytes(), timeout),
        }
    }

    fn parts(&self) -> (&'c S, ClientHandle, i32) {
        let client = self.client;
        (client.sdk(), client.handle(), self.timeout.as_raw())
    }

    fn finish(&self, op: &'static str, path: &str, code: c_int) -> Result<(), Error> {
        match Status::check(code) {
            Ok(()) => {
                debug!("lightdb {} {} ok", op, path);
                Ok(())
            }
            Err(status) => {
                warn!("lightdb {} {} failed: {}", op, path, status);
                Err(Error::Store(status))
            }
        }
    }

    /// Write an integer.
    pub fn set_int(&self, path: &str, value: i32) -> Result<(), Error> {
        self.set(path, Value::Int(value))
    }

    /// Write a boolean.
    pub fn set_bool(&self, path: &str, value: bool) -> Result<(), Error> {
        self.set(path, Value::Bool(value))
    }

    /// Write a float.
    pub fn set_float(&self, path: &str, value: f32) -> Result<(), Error> {
        self.set(path, Value::Float(value))
    }

    /// Write a string.
    pub fn set_string(&self, path: &str, value: &str) -> Result<(), Error> {
        self.set(path, Value::String(value))
    }

    /// Write a JSON document that is already serialized.
    pub fn set_json(&self, path: &str, json: &str) -> Result<(), Error> {
        self.set(path, Value::Json(json))
    }

    /// Serialize `value` to JSON and write it at `path`.
    ///
    /// With `std` the document may have any size. Without it the document is
    /// encoded on the stack and must fit into [`MAX_JSON_LEN`] bytes.
    pub fn set_structured<T: Serialize + ?Sized>(
        &self,
        path: &str,
        value: &T,
    ) -> Result<(), Error> {
        #[cfg(feature = "std")]
        {
            let json = serde_json::to_string(value).map_err(|_| EncodingError::Json)?;
            self.set(path, Value::Json(&json))
        }
        #[cfg(not(feature = "std"))]
        {
            let mut buf = [0u8; MAX_JSON_LEN];
            let len = serde_json_core::to_slice(value, &mut buf).map_err(|_| EncodingError::Json)?;
            let json = core::str::from_utf8(&buf[..len]).map_err(|_| EncodingError::Json)?;
            self.set(path, Value::Json(json))
        }
    }

    /// Read an integer.
    pub fn get_int(&self, path: &str) -> Result<i32, Error> {
        let encoded = Path::new(path)?;
        let (sdk, handle, timeout) = self.parts();
        let mut value = 0;
        let code = sdk
            .lightdb_get_int(handle, encoded.as_c_str(), &mut value, timeout)
            .ok_or(Error::Unsupported("golioth_lightdb_get_int_sync"))?;
        self.finish("get", path, code)?;
        Ok(value)
    }

    /// Read a boolean.
    pub fn get_bool(&self, path: &str) -> Result<bool, Error> {
        let encoded = Path::new(path)?;
        let (sdk, handle, timeout) = self.parts();
        let mut value = false;
        let code = sdk
            .lightdb_get_bool(handle, encoded.as_c_str(), &mut value, timeout)
            .ok_or(Error::Unsupported("golioth_lightdb_get_bool_sync"))?;
        self.finish("get", path, code)?;
        Ok(value)
    }

    /// Read a float.
    pub fn get_float(&self, path: &str) -> Result<f32, Error> {
        let encoded = Path::new(path)?;
        let (sdk, handle, timeout) = self.parts();
        let mut value = 0.0;
        let code = sdk
            .lightdb_get_float(handle, encoded.as_c_str(), &mut value, timeout)
            .ok_or(Error::Unsupported("golioth_lightdb_get_float_sync"))?;
        self.finish("get", path, code)?;
        Ok(value)
    }

    /// Read a string into `buf` and return the part the SDK filled in.
    ///
    /// The SDK NUL-terminates the value and truncates it to fit `buf`.
    pub fn get_string<'b>(&self, path: &str, buf: &'b mut [u8]) -> Result<&'b str, Error> {
        let encoded = Path::new(path)?;
        let (sdk, handle, timeout) = self.parts();
        let code = sdk
            .lightdb_get_string(handle, encoded.as_c_str(), buf, timeout)
            .ok_or(Error::Unsupported("golioth_lightdb_get_string_sync"))?;
        self.finish("get", path, code)?;

        let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        core::str::from_utf8(&buf[..len]).map_err(|_| EncodingError::InvalidUtf8.into())
    }

    /// Remove the value at `path`.
    pub fn delete(&self, path: &str) -> Result<(), Error> {
        let encoded = Path::new(path)?;
        let (sdk, handle, timeout) = self.parts();
        let code = sdk
            .lightdb_delete(handle, encoded.as_c_str(), timeout)
            .ok_or(Error::Unsupported("golioth_lightdb_delete_sync"))?;
        self.finish("delete", path, code)
    }
}
