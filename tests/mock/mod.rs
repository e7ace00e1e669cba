//! Recording SDK doubles for exercising the bindings without a native library.

#![allow(dead_code)]

use libgolioth::sys::*;
use std::cell::{Cell, RefCell};
use std::ffi::{CStr, c_int};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Credentials as the SDK saw them during `golioth_client_create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeenCredentials {
    Psk {
        id: Vec<u8>,
        secret: Vec<u8>,
    },
    Pki {
        ca: Vec<u8>,
        cert: Vec<u8>,
        key: Vec<u8>,
    },
    Unknown(c_int),
}

/// One native call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(SeenCredentials),
    WaitForConnect {
        timeout_ms: i32,
    },
    SetInt {
        path: String,
        value: i32,
        timeout_ms: i32,
    },
    SetBool {
        path: String,
        value: bool,
        timeout_ms: i32,
    },
    SetFloat {
        path: String,
        value: f32,
        timeout_ms: i32,
    },
    SetString {
        path: String,
        value: Vec<u8>,
        len: usize,
        timeout_ms: i32,
    },
    SetJson {
        path: String,
        value: Vec<u8>,
        len: usize,
        timeout_ms: i32,
    },
    GetInt {
        path: String,
    },
    GetBool {
        path: String,
    },
    GetFloat {
        path: String,
    },
    GetString {
        path: String,
        buf_size: usize,
    },
    Delete {
        path: String,
        timeout_ms: i32,
    },
    IsConnected,
    Destroy,
}

impl Call {
    /// Calls that create, connect or destroy the client.
    fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Call::Create(_) | Call::WaitForConnect { .. } | Call::Destroy
        )
    }
}

/// Configurable SDK double that records every call.
pub struct MockSdk {
    pub calls: RefCell<Vec<Call>>,
    /// Return a null handle from `client_create`.
    pub fail_create: bool,
    /// Time the fake connection needs; shorter waits fail.
    pub connect_latency_ms: i32,
    /// Result code for every LightDB call.
    pub status: Cell<c_int>,
    /// Whether the optional symbols are "exported".
    pub full_api: bool,
    /// Values returned by reads.
    pub stored_int: i32,
    pub stored_bool: bool,
    pub stored_float: f32,
    pub stored_string: Vec<u8>,
    pub token: u8,
}

impl Default for MockSdk {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_create: false,
            connect_latency_ms: 100,
            status: Cell::new(0),
            full_api: true,
            stored_int: 0,
            stored_bool: false,
            stored_float: 0.0,
            stored_string: Vec::new(),
            token: 0,
        }
    }
}

impl MockSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the seven required entry points.
    pub fn minimal() -> Self {
        Self {
            full_api: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls made after the client connected.
    pub fn lightdb_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !call.is_lifecycle())
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn path_of(path: &CStr) -> String {
    path.to_str().expect("path is UTF-8").to_owned()
}

fn token_handle(token: &u8) -> *mut golioth_client_t {
    NonNull::from(token).cast::<golioth_client_t>().as_ptr()
}

/// Copy `len` bytes from a pointer held in the credentials layout.
///
/// # Safety
///
/// `ptr` must be valid for `len` bytes.
unsafe fn copy_buffer(ptr: *const u8, len: usize) -> Vec<u8> {
    if len == 0 {
        return Vec::new();
    }
    unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec()
}

impl Sdk for MockSdk {
    fn client_create(&self, config: &golioth_client_config_t) -> *mut golioth_client_t {
        let creds = config.credentials;
        // SAFETY: the bindings keep the credential buffers alive for this call
        // and set auth_type to match the active union field.
        let seen = unsafe {
            match creds.auth_type {
                GOLIOTH_TLS_AUTH_TYPE_PSK => {
                    let psk = creds.u.psk;
                    SeenCredentials::Psk {
                        id: copy_buffer(psk.psk_id.cast(), psk.psk_id_len),
                        secret: copy_buffer(psk.psk.cast(), psk.psk_len),
                    }
                }
                GOLIOTH_TLS_AUTH_TYPE_PKI => {
                    let pki = creds.u.pki;
                    SeenCredentials::Pki {
                        ca: copy_buffer(pki.ca_cert, pki.ca_cert_len),
                        cert: copy_buffer(pki.public_cert, pki.public_cert_len),
                        key: copy_buffer(pki.private_key, pki.private_key_len),
                    }
                }
                other => SeenCredentials::Unknown(other),
            }
        };
        self.record(Call::Create(seen));

        if self.fail_create {
            std::ptr::null_mut()
        } else {
            token_handle(&self.token)
        }
    }

    fn client_wait_for_connect(&self, _client: ClientHandle, timeout_ms: i32) -> bool {
        self.record(Call::WaitForConnect { timeout_ms });
        timeout_ms < 0 || timeout_ms >= self.connect_latency_ms
    }

    fn lightdb_set_int(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: i32,
        timeout_ms: i32,
    ) -> c_int {
        self.record(Call::SetInt {
            path: path_of(path),
            value,
            timeout_ms,
        });
        self.status.get()
    }

    fn lightdb_set_bool(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: bool,
        timeout_ms: i32,
    ) -> c_int {
        self.record(Call::SetBool {
            path: path_of(path),
            value,
            timeout_ms,
        });
        self.status.get()
    }

    fn lightdb_set_float(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: f32,
        timeout_ms: i32,
    ) -> c_int {
        self.record(Call::SetFloat {
            path: path_of(path),
            value,
            timeout_ms,
        });
        self.status.get()
    }

    fn lightdb_set_string(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int {
        self.record(Call::SetString {
            path: path_of(path),
            value: value.to_vec(),
            len: value.len(),
            timeout_ms,
        });
        self.status.get()
    }

    fn lightdb_set_json(
        &self,
        _client: ClientHandle,
        path: &CStr,
        value: &[u8],
        timeout_ms: i32,
    ) -> c_int {
        self.record(Call::SetJson {
            path: path_of(path),
            value: value.to_vec(),
            len: value.len(),
            timeout_ms,
        });
        self.status.get()
    }

    fn client_is_connected(&self, _client: ClientHandle) -> Option<bool> {
        if !self.full_api {
            return None;
        }
        self.record(Call::IsConnected);
        Some(true)
    }

    fn client_destroy(&self, _client: ClientHandle) -> bool {
        if !self.full_api {
            return false;
        }
        self.record(Call::Destroy);
        true
    }

    fn lightdb_get_int(
        &self,
        _client: ClientHandle,
        path: &CStr,
        out: &mut i32,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        if !self.full_api {
            return None;
        }
        self.record(Call::GetInt {
            path: path_of(path),
        });
        *out = self.stored_int;
        Some(self.status.get())
    }

    fn lightdb_get_bool(
        &self,
        _client: ClientHandle,
        path: &CStr,
        out: &mut bool,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        if !self.full_api {
            return None;
        }
        self.record(Call::GetBool {
            path: path_of(path),
        });
        *out = self.stored_bool;
        Some(self.status.get())
    }

    fn lightdb_get_float(
        &self,
        _client: ClientHandle,
        path: &CStr,
        out: &mut f32,
        _timeout_ms: i32,
    ) -> Option<c_int> {
        if !self.full_api {
            return None;
        }
        self.record(Call::GetFloat {
            path: path_of(path),
        });
        *out = self.stored_float;
        Some(self.status.get())
    }

    fn lightdb_get_string(
        &self,
        _client: ClientHandle,
        path: &CStr,
        buf: &mut [u8],
        _timeout_ms: i32,
    ) -> Option<c_int> {
        if !self.full_api {
            return None;
        }
        self.record(Call::GetString {
            path: path_of(path),
            buf_size: buf.len(),
        });
        let len = self.stored_string.len().min(buf.len().saturating_sub(1));
        buf[..len].copy_from_slice(&self.stored_string[..len]);
        if len < buf.len() {
            buf[len] = 0;
        }
        Some(self.status.get())
    }

    fn lightdb_delete(&self, _client: ClientHandle, path: &CStr, timeout_ms: i32) -> Option<c_int> {
        if !self.full_api {
            return None;
        }
        self.record(Call::Delete {
            path: path_of(path),
            timeout_ms,
        });
        Some(self.status.get())
    }
}

/// SDK double that can be shared between threads.
///
/// Every LightDB call holds a slot for a short while and records how many
/// calls were inside the SDK at the same time.
#[derive(Default)]
pub struct ThreadSafeSdk {
    token: u8,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl ThreadSafeSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most LightDB calls ever observed inside the SDK at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// LightDB calls that returned.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn enter(&self) -> c_int {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Long enough for an unsynchronized caller to overlap.
        thread::sleep(Duration::from_micros(200));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        0
    }
}

impl Sdk for ThreadSafeSdk {
    fn client_create(&self, _config: &golioth_client_config_t) -> *mut golioth_client_t {
        token_handle(&self.token)
    }

    fn client_wait_for_connect(&self, _client: ClientHandle, _timeout_ms: i32) -> bool {
        true
    }

    fn lightdb_set_int(&self, _: ClientHandle, _: &CStr, _: i32, _: i32) -> c_int {
        self.enter()
    }

    fn lightdb_set_bool(&self, _: ClientHandle, _: &CStr, _: bool, _: i32) -> c_int {
        self.enter()
    }

    fn lightdb_set_float(&self, _: ClientHandle, _: &CStr, _: f32, _: i32) -> c_int {
        self.enter()
    }

    fn lightdb_set_string(&self, _: ClientHandle, _: &CStr, _: &[u8], _: i32) -> c_int {
        self.enter()
    }

    fn lightdb_set_json(&self, _: ClientHandle, _: &CStr, _: &[u8], _: i32) -> c_int {
        self.enter()
    }
}
