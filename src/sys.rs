//! Raw ABI of the native Golioth SDK.
//!
//! The layouts here mirror the C headers of the SDK one to one. Nothing in
//! this module owns memory: every pointer stored in a layout borrows from a
//! buffer the caller keeps alive for the duration of the native call.
//!
//! [`Sdk`] is the seam between the safe wrappers and the native code. The
//! dynamically loaded library implements it, and so can a statically linked
//! build or a test double.

#![allow(non_camel_case_types)]
#![allow(missing_docs)]

use core::ffi::{CStr, c_char, c_int, c_void};
use core::ptr::NonNull;

/// Opaque native client.
pub type golioth_client_t = c_void;

/// Discriminant of [`golioth_tls_credentials_t`].
pub type golioth_tls_auth_type_t = c_int;

/// Credentials carry a pre-shared key.
pub const GOLIOTH_TLS_AUTH_TYPE_PSK: golioth_tls_auth_type_t = 0;
/// Credentials carry a certificate chain and private key.
pub const GOLIOTH_TLS_AUTH_TYPE_PKI: golioth_tls_auth_type_t = 1;

/// Timeout value the SDK interprets as "block until done".
pub const GOLIOTH_SYS_WAIT_FOREVER: i32 = -1;

/// PSK identity and secret.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct golioth_psk_credentials_t {
    pub psk_id: *const c_char,
    pub psk_id_len: usize,
    pub psk: *const c_char,
    pub psk_len: usize,
}

/// CA certificate, device certificate and device private key.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct golioth_pki_credentials_t {
    pub ca_cert: *const u8,
    pub ca_cert_len: usize,
    pub public_cert: *const u8,
    pub public_cert_len: usize,
    pub private_key: *const u8,
    pub private_key_len: usize,
}

/// Payload of [`golioth_tls_credentials_t`]; `auth_type` selects the field.
#[repr(C)]
#[derive(Clone, Copy)]
pub union golioth_tls_credentials_u {
    pub psk: golioth_psk_credentials_t,
    pub pki: golioth_pki_credentials_t,
}

/// Tagged credentials as passed to `golioth_client_create`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct golioth_tls_credentials_t {
    pub auth_type: golioth_tls_auth_type_t,
    pub u: golioth_tls_credentials_u,
}

/// Client configuration.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct golioth_client_config_t {
    pub credentials: golioth_tls_credentials_t,
}

pub type golioth_client_create_fn =
    unsafe extern "C" fn(config: *const golioth_client_config_t) -> *mut golioth_client_t;
pub type golioth_client_wait_for_connect_fn =
    unsafe extern "C" fn(client: *mut golioth_client_t, timeout_ms: c_int) -> bool;
pub type golioth_client_is_connected_fn =
    unsafe extern "C" fn(client: *mut golioth_client_t) -> bool;
pub type golioth_client_destroy_fn = unsafe extern "C" fn(client: *mut golioth_client_t);

pub type golioth_lightdb_set_int_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: i32,
    timeout_ms: c_int,
) -> c_int;
pub type golioth_lightdb_set_bool_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: bool,
    timeout_ms: c_int,
) -> c_int;
pub type golioth_lightdb_set_float_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: f32,
    timeout_ms: c_int,
) -> c_int;
/// Shared by `set_string_sync` and `set_json_sync`.
pub type golioth_lightdb_set_bytes_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: *const c_char,
    value_len: usize,
    timeout_ms: c_int,
) -> c_int;

pub type golioth_lightdb_get_int_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: *mut i32,
    timeout_ms: c_int,
) -> c_int;
pub type golioth_lightdb_get_bool_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: *mut bool,
    timeout_ms: c_int,
) -> c_int;
pub type golioth_lightdb_get_float_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    value: *mut f32,
    timeout_ms: c_int,
) -> c_int;
pub type golioth_lightdb_get_string_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    buf: *mut c_char,
    buf_size: usize,
    timeout_ms: c_int,
) -> c_int;
pub type golioth_lightdb_delete_sync_fn = unsafe extern "C" fn(
    client: *mut golioth_client_t,
    path: *const c_char,
    timeout_ms: c_int,
) -> c_int;

/// Non-null handle to a native client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientHandle(NonNull<golioth_client_t>);

impl ClientHandle {
    /// Wrap a pointer returned by `golioth_client_create`.
    pub fn from_raw(ptr: *mut golioth_client_t) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// The raw pointer handed back to native calls.
    pub fn as_ptr(&self) -> *mut golioth_client_t {
        self.0.as_ptr()
    }
}

/// Entry points of the native SDK.
///
/// The required methods correspond to the symbols every SDK build exports.
/// The remaining methods return `None` when the backing library does not
/// provide them.
///
/// Implementations receive borrowed arguments that are valid for the
/// duration of the call only and must not retain them.
pub trait Sdk {
    /// `golioth_client_create`. Returns null on failure.
    fn client_create(&self, config: &golioth_client_config_t) -> *mut golioth_client_t;

    /// `golioth_client_wait_for_connect`.
    fn client_wait_for_connect(&self, client: ClientHandle, timeout_ms: i32) -> bool;

    /// `golioth_lightdb_set_int_sync`.
    fn lightdb_set_int(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: i32,
        timeout_ms: i32,
    ) -> c_int;

    /// `golioth_lightdb_set_bool_sync`.
    fn lightdb_set_bool(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: bool,
        timeout_ms: i32,
    ) -> c_int;

    /// `golioth_lightdb_set_float_sync`.
    fn lightdb_set_float(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: f32,
        timeout_ms: i32,
    ) -> c_int;

    /// `golioth_lightdb_set_string_sync`. `value.len()` is passed as the length.
    fn lightdb_set_string(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int;

    /// `golioth_lightdb_set_json_sync`. `value.len()` is passed as the length.
    fn lightdb_set_json(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int;

    /// `golioth_client_is_connected`.
    fn client_is_connected(&self, _client: ClientHandle) -> Option<bool> {
        None
    }

    /// `golioth_client_destroy`. Returns `false` if the symbol is missing.
    fn client_destroy(&self, _client: ClientHandle) -> bool {
        false
    }

    /// `golioth_lightdb_get_int_sync`.
    fn lightdb_get_int(
        &self,
        _client: ClientHandle,
        _path: &CStr,
        _out: &mut i32,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        None
    }

    /// `golioth_lightdb_get_bool_sync`.
    fn lightdb_get_bool(
        &self,
        _client: ClientHandle,
        _path: &CStr,
        _out: &mut bool,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        None
    }

    /// `golioth_lightdb_get_float_sync`.
    fn lightdb_get_float(
        &self,
        _client: ClientHandle,
        _path: &CStr,
        _out: &mut f32,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        None
    }

    /// `golioth_lightdb_get_string_sync`. The SDK writes a NUL-terminated
    /// string into `buf`.
    fn lightdb_get_string(
        &self,
        _client: ClientHandle,
        _path: &CStr,
        _buf: &mut [u8],
        _timeout_ms: i32,
    ) -> Option<c_int> {
        None
    }

    /// `golioth_lightdb_delete_sync`.
    fn lightdb_delete(
        &self,
        _client: ClientHandle,
        _path: &CStr,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        None
    }
}

impl<S: Sdk + ?Sized> Sdk for &S {
    fn client_create(&self, config: &golioth_client_config_t) -> *mut golioth_client_t {
        (**self).client_create(config)
    }

    fn client_wait_for_connect(&self, client: ClientHandle, timeout_ms: i32) -> bool {
        (**self).client_wait_for_connect(client, timeout_ms)
    }

    fn lightdb_set_int(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: i32,
        timeout_ms: i32,
    ) -> c_int {
        (**self).lightdb_set_int(client, path, value, timeout_ms)
    }

    fn lightdb_set_bool(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: bool,
        timeout_ms: i32,
    ) -> c_int {
        (**self).lightdb_set_bool(client, path, value, timeout_ms)
    }

    fn lightdb_set_float(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: f32,
        timeout_ms: i32,
    ) -> c_int {
        (**self).lightdb_set_float(client, path, value, timeout_ms)
    }

    fn lightdb_set_string(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int {
        (**self).lightdb_set_string(client, path, value, timeout_ms)
    }

    fn lightdb_set_json(
        &self,
        client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int {
        (**self).lightdb_set_json(client, path, value, timeout_ms)
    }

    fn client_is_connected(&self, client: ClientHandle) -> Option<bool> {
        (**self).client_is_connected(client)
    }

    fn client_destroy(&self, client: ClientHandle) -> bool {
        (**self).client_destroy(client)
    }

    fn lightdb_get_int(
        &self,
        client: ClientHandle,
        path: &CStr,
        out: &mut i32,
        timeout_ms: i32,
    ) -> Option<c_int> {
        (**self).lightdb_get_int(client, path, out, timeout_ms)
    }

    fn lightdb_get_bool(
        &self,
        client: ClientHandle,
        path: &CStr,
        out: &mut bool,
        timeout_ms: i32,
    ) -> Option<c_int> {
        (**self).lightdb_get_bool(client, path, out, timeout_ms)
    }

    fn lightdb_get_float(
        &self,
        client: ClientHandle,
        path: &CStr,
        out: &mut f32,
        timeout_ms: i32,
    ) -> Option<c_int> {
        (**self).lightdb_get_float(client, path, out, timeout_ms)
    }

    fn lightdb_get_string(
        &self,
        client: ClientHandle,
        path: &CStr,
        buf: &mut [u8],
        timeout_ms: i32,
    ) -> Option<c_int> {
        (**self).lightdb_get_string(client, path, buf, timeout_ms)
    }

    fn lightdb_delete(&self, client: ClientHandle, path: &CStr, timeout_ms: i32) -> Option<c_int> {
        (**self).lightdb_delete(client, path, timeout_ms)
    }
}
