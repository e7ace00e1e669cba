//! Timeouts and client options.

use crate::sys::GOLIOTH_SYS_WAIT_FOREVER;
use core::time::Duration;

/// How long a blocking native call may wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Give up after this many milliseconds.
    Millis(u32),
    /// Block until the SDK reports completion.
    Forever,
}

impl Timeout {
    /// Encode for the native layer. Millisecond values saturate at `i32::MAX`.
    pub fn as_raw(self) -> i32 {
        match self {
            Timeout::Millis(ms) => i32::try_from(ms).unwrap_or(i32::MAX),
            Timeout::Forever => GOLIOTH_SYS_WAIT_FOREVER,
        }
    }

    /// Decode a value as the SDK interprets it; any negative value waits forever.
    pub fn from_raw(raw: i32) -> Self {
        u32::try_from(raw).map_or(Timeout::Forever, Timeout::Millis)
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::Millis(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX))
    }
}

/// Default time to wait for the client to connect.
pub const DEFAULT_CONNECT_TIMEOUT: Timeout = Timeout::Millis(5000);
/// Default time to wait for a LightDB request.
pub const DEFAULT_REQUEST_TIMEOUT: Timeout = Timeout::Millis(3000);

/// Client options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Passed to `golioth_client_wait_for_connect`.
    pub connect_timeout: Timeout,
    /// Default timeout for LightDB requests issued through the client.
    pub request_timeout: Timeout,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[cfg(feature = "std")]
mod env {
    use super::{Options, Timeout};
    use crate::error::Error;
    use std::path::PathBuf;

    /// Environment variable holding the path of the native SDK library.
    pub const LIBRARY_PATH_VAR: &str = "GOLIOTH_SDK_LIBRARY";
    /// Environment variable overriding the connect timeout, in milliseconds.
    pub const CONNECT_TIMEOUT_VAR: &str = "GOLIOTH_CONNECT_TIMEOUT_MS";
    /// Environment variable overriding the request timeout, in milliseconds.
    pub const REQUEST_TIMEOUT_VAR: &str = "GOLIOTH_REQUEST_TIMEOUT_MS";

    impl Options {
        /// Defaults, overridden by `GOLIOTH_CONNECT_TIMEOUT_MS` and
        /// `GOLIOTH_REQUEST_TIMEOUT_MS`. `-1` waits forever.
        pub fn from_env() -> Result<Self, Error> {
            let mut options = Options::default();
            if let Some(timeout) = timeout_var(CONNECT_TIMEOUT_VAR)? {
                options.connect_timeout = timeout;
            }
            if let Some(timeout) = timeout_var(REQUEST_TIMEOUT_VAR)? {
                options.request_timeout = timeout;
            }
            Ok(options)
        }
    }

    fn timeout_var(name: &'static str) -> Result<Option<Timeout>, Error> {
        match std::env::var(name) {
            Ok(value) => parse_timeout(&value).map(Some).ok_or(Error::Config(name)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::Config(name)),
        }
    }

    pub(crate) fn parse_timeout(value: &str) -> Option<Timeout> {
        match value.trim().parse::<i64>().ok()? {
            -1 => Some(Timeout::Forever),
            ms if ms >= 0 => u32::try_from(ms).ok().map(Timeout::Millis),
            _ => None,
        }
    }

    /// `GOLIOTH_SDK_LIBRARY`, or the platform file name of `golioth_sdk`
    /// (`libgolioth_sdk.so` on Linux) resolved through the loader search path.
    pub fn library_path_from_env() -> PathBuf {
        match std::env::var_os(LIBRARY_PATH_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(libloading::library_filename("golioth_sdk")),
        }
    }
}

#[cfg(feature = "std")]
pub use env::{CONNECT_TIMEOUT_VAR, LIBRARY_PATH_VAR, REQUEST_TIMEOUT_VAR, library_path_from_env};
