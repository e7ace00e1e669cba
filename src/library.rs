//! Dynamically loaded native SDK.
//!
//! [`NativeLibrary::open`] loads a private copy of the shared library and
//! resolves every entry point up front. [`NativeLibrary::global`] does the
//! same once per process and hands out a `'static` reference that is never
//! unloaded.

use crate::error::Error;
use crate::sys::*;
use core::ffi::{CStr, c_int};
use libloading::Library;
use once_cell::sync::OnceCell;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

static GLOBAL: OnceCell<NativeLibrary> = OnceCell::new();

/// Symbols every SDK build must export.
struct Required {
    client_create: golioth_client_create_fn,
    client_wait_for_connect: golioth_client_wait_for_connect_fn,
    set_int: golioth_lightdb_set_int_sync_fn,
    set_bool: golioth_lightdb_set_bool_sync_fn,
    set_float: golioth_lightdb_set_float_sync_fn,
    set_string: golioth_lightdb_set_bytes_sync_fn,
    set_json: golioth_lightdb_set_bytes_sync_fn,
}

/// Symbols that depend on how the SDK was configured.
struct Optional {
    client_is_connected: Option<golioth_client_is_connected_fn>,
    client_destroy: Option<golioth_client_destroy_fn>,
    get_int: Option<golioth_lightdb_get_int_sync_fn>,
    get_bool: Option<golioth_lightdb_get_bool_sync_fn>,
    get_float: Option<golioth_lightdb_get_float_sync_fn>,
    get_string: Option<golioth_lightdb_get_string_sync_fn>,
    delete: Option<golioth_lightdb_delete_sync_fn>,
}

/// The native SDK loaded from a shared library.
pub struct NativeLibrary {
    required: Required,
    optional: Optional,
    path: PathBuf,
    // Keeps the function pointers above valid; dropped last.
    _library: Library,
}

impl core::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .field("has_destroy", &self.optional.client_destroy.is_some())
            .field("has_get", &self.optional.get_int.is_some())
            .field("has_delete", &self.optional.delete.is_some())
            .finish_non_exhaustive()
    }
}

/// Path as a loggable string.
fn display(path: &Path) -> &str {
    path.to_str().unwrap_or("<non-UTF-8 path>")
}

/// Resolve a required symbol and copy out the function pointer.
///
/// # Safety
///
/// `T` must match the C signature of `name`.
unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> Result<T, Error> {
    // SAFETY: forwarded to the caller.
    let symbol = unsafe { library.get::<T>(name)? };
    Ok(*symbol)
}

/// Resolve an optional symbol.
///
/// # Safety
///
/// `T` must match the C signature of `name`.
unsafe fn optional_symbol<T: Copy>(library: &Library, name: &[u8]) -> Option<T> {
    // SAFETY: forwarded to the caller.
    unsafe { library.get::<T>(name) }.ok().map(|symbol| *symbol)
}

impl NativeLibrary {
    /// Load the SDK from `path` and resolve its entry points.
    ///
    /// Fails if the library cannot be opened or one of the required
    /// `golioth_client_*` / `golioth_lightdb_set_*_sync` symbols is missing.
    pub fn open(path: impl AsRef<OsStr>) -> Result<Self, Error> {
        let path = PathBuf::from(path.as_ref());
        debug!("loading native SDK from {}", self::display(&path));

        // SAFETY: loading the SDK runs its initializers, which have no
        // preconditions beyond being loaded once per handle.
        let library = unsafe { Library::new(&path)? };

        // SAFETY: every signature below is taken from the SDK headers.
        let required = unsafe {
            Required {
                client_create: symbol(&library, b"golioth_client_create\0")?,
                client_wait_for_connect: symbol(&library, b"golioth_client_wait_for_connect\0")?,
                set_int: symbol(&library, b"golioth_lightdb_set_int_sync\0")?,
                set_bool: symbol(&library, b"golioth_lightdb_set_bool_sync\0")?,
                set_float: symbol(&library, b"golioth_lightdb_set_float_sync\0")?,
                set_string: symbol(&library, b"golioth_lightdb_set_string_sync\0")?,
                set_json: symbol(&library, b"golioth_lightdb_set_json_sync\0")?,
            }
        };

        // SAFETY: as above.
        let optional = unsafe {
            Optional {
                client_is_connected: optional_symbol(&library, b"golioth_client_is_connected\0"),
                client_destroy: optional_symbol(&library, b"golioth_client_destroy\0"),
                get_int: optional_symbol(&library, b"golioth_lightdb_get_int_sync\0"),
                get_bool: optional_symbol(&library, b"golioth_lightdb_get_bool_sync\0"),
                get_float: optional_symbol(&library, b"golioth_lightdb_get_float_sync\0"),
                get_string: optional_symbol(&library, b"golioth_lightdb_get_string_sync\0"),
                delete: optional_symbol(&library, b"golioth_lightdb_delete_sync\0"),
            }
        };

        if optional.client_destroy.is_none() {
            warn!("golioth_client_destroy is missing, clients are never freed");
        }
        info!("loaded native SDK from {}", self::display(&path));

        Ok(Self {
            required,
            optional,
            path,
            _library: library,
        })
    }

    /// Load the SDK once per process.
    ///
    /// The first successful call loads `path`; later calls return the cached
    /// library regardless of the path they pass. The library is never
    /// unloaded.
    pub fn global(path: impl AsRef<OsStr>) -> Result<&'static NativeLibrary, Error> {
        let path = path.as_ref();
        let library = GLOBAL.get_or_try_init(|| NativeLibrary::open(path))?;
        if library.path.as_os_str() != path {
            warn!(
                "native SDK already loaded from {}, ignoring {}",
                self::display(&library.path),
                self::display(Path::new(path))
            );
        }
        Ok(library)
    }

    /// [`NativeLibrary::global`] with the path from `GOLIOTH_SDK_LIBRARY`.
    pub fn global_from_env() -> Result<&'static NativeLibrary, Error> {
        Self::global(crate::config::library_path_from_env())
    }

    /// The process-wide library, if one has been loaded.
    pub fn loaded() -> Option<&'static NativeLibrary> {
        GLOBAL.get()
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sdk for NativeLibrary {
    fn client_create(&self, config: &golioth_client_config_t) -> *mut golioth_client_t {
        // SAFETY: `config` and the buffers it points at outlive the call.
        unsafe { (self.required.client_create)(config) }
    }

    fn client_wait_for_connect(&self, client: ClientHandle, timeout_ms: i32) -> bool {
        // SAFETY: `client` came from `golioth_client_create`.
        unsafe { (self.required.client_wait_for_connect)(client.as_ptr(), timeout_ms) }
    }

    fn lightdb_set_int(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: i32,
        timeout_ms: i32,
    ) -> c_int {
        // SAFETY: `path` is NUL-terminated and outlives the call.
        unsafe { (self.required.set_int)(client.as_ptr(), path.as_ptr(), value, timeout_ms) }
    }

    fn lightdb_set_bool(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: bool,
        timeout_ms: i32,
    ) -> c_int {
        // SAFETY: as for `lightdb_set_int`.
        unsafe { (self.required.set_bool)(client.as_ptr(), path.as_ptr(), value, timeout_ms) }
    }

    fn lightdb_set_float(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: f32,
        timeout_ms: i32,
    ) -> c_int {
        // SAFETY: as for `lightdb_set_int`.
        unsafe { (self.required.set_float)(client.as_ptr(), path.as_ptr(), value, timeout_ms) }
    }

    fn lightdb_set_string(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int {
        // SAFETY: `value` is passed with its exact length and outlives the call.
        unsafe {
            (self.required.set_string)(
                client.as_ptr(),
                path.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                timeout_ms,
            )
        }
    }

    fn lightdb_set_json(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int {
        // SAFETY: as for `lightdb_set_string`.
        unsafe {
            (self.required.set_json)(
                client.as_ptr(),
                path.as_ptr(),
                value.as_ptr().cast(),
                value.len(),
                timeout_ms,
            )
        }
    }

    fn client_is_connected(&self, client: ClientHandle) -> Option<bool> {
        let is_connected = self.optional.client_is_connected?;
        // SAFETY: `client` came from `golioth_client_create`.
        Some(unsafe { is_connected(client.as_ptr()) })
    }

    fn client_destroy(&self, client: ClientHandle) -> bool {
        match self.optional.client_destroy {
            Some(destroy) => {
                // SAFETY: called at most once per handle, by `Client::drop`.
                unsafe { destroy(client.as_ptr()) };
                true
            }
            None => false,
        }
    }

    fn lightdb_get_int(
        &self,
        client: ClientHandle,
        path: &CStr,
        out: &mut i32,
        timeout_ms: i32,
    ) -> Option<c_int> {
        let get = self.optional.get_int?;
        // SAFETY: `out` is a valid, exclusive destination for the call.
        let code = unsafe { get(client.as_ptr(), path.as_ptr(), out, timeout_ms) };
        Some(code)
    }

    fn lightdb_get_bool(
        &self,
        client: ClientHandle,
        path: &CStr,
        out: &mut bool,
        timeout_ms: i32,
    ) -> Option<c_int> {
        let get = self.optional.get_bool?;
        // SAFETY: as for `lightdb_get_int`.
        let code = unsafe { get(client.as_ptr(), path.as_ptr(), out, timeout_ms) };
        Some(code)
    }

    fn lightdb_get_float(
        &self,
        client: ClientHandle,
        path: &CStr,
        out: &mut f32,
        timeout_ms: i32,
    ) -> Option<c_int> {
        let get = self.optional.get_float?;
        // SAFETY: as for `lightdb_get_int`.
        let code = unsafe { get(client.as_ptr(), path.as_ptr(), out, timeout_ms) };
        Some(code)
    }

    fn lightdb_get_string(
        &self,
        client: ClientHandle,
        path: &CStr,
        buf: &mut [u8],
        timeout_ms: i32,
    ) -> Option<c_int> {
        let get = self.optional.get_string?;
        // SAFETY: the SDK writes at most `buf.len()` bytes into `buf`.
        Some(unsafe {
            get(
                client.as_ptr(),
                path.as_ptr(),
                buf.as_mut_ptr().cast(),
                buf.len(),
                timeout_ms,
            )
        })
    }

    fn lightdb_delete(&self, client: ClientHandle, path: &CStr, timeout_ms: i32) -> Option<c_int> {
        let delete = self.optional.delete?;
        // SAFETY: as for `lightdb_set_int`.
        let code = unsafe { delete(client.as_ptr(), path.as_ptr(), timeout_ms) };
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_fails_to_load() {
        let err = NativeLibrary::open("/nonexistent/libgolioth_sdk.so").unwrap_err();
        assert!(matches!(err, Error::Library(_)));
    }

    #[test]
    fn log_path_is_plain_text() {
        let path = "/opt/golioth/libgolioth_sdk.so";
        assert_eq!(display(Path::new(path)), path);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_log_path_is_replaced() {
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/opt/\xFF/libgolioth_sdk.so"));
        assert_eq!(display(path), "<non-UTF-8 path>");
    }
}
