//! Connection to the Golioth cloud through the native SDK.

use crate::config::{Options, Timeout};
use crate::credentials::Credentials;
use crate::error::Error;
use crate::lightdb::LightDb;
use crate::sys::{ClientHandle, Sdk};

/// An open native client.
///
/// The client owns its native handle and destroys it on drop when the SDK
/// exports `golioth_client_destroy`. It is `Send` but not `Sync`: the handle
/// can move to another thread, but concurrent calls need a lock (see
/// `SharedClient`).
pub struct Client<S: Sdk> {
    sdk: S,
    handle: ClientHandle,
    options: Options,
}

// SAFETY: the SDK client runs its own worker and may be driven from any
// thread; `Client` is not `Sync`, so calls on one handle never overlap.
unsafe impl<S: Sdk + Send> Send for Client<S> {}

impl<S: Sdk> Client<S> {
    /// Create a client with `credentials` and block until it connects.
    ///
    /// Fails with [`Error::Creation`] when the SDK returns a null handle and
    /// with [`Error::ConnectTimeout`] when the connection is not up within
    /// `options.connect_timeout`.
    pub fn connect(sdk: S, credentials: &Credentials<'_>, options: Options) -> Result<Self, Error> {
        let raw = credentials.to_raw();
        debug!("creating client ({})", credentials.auth_type().as_str());

        let handle = match ClientHandle::from_raw(sdk.client_create(raw.as_config())) {
            Some(handle) => handle,
            None => {
                error!("golioth_client_create returned null");
                return Err(Error::Creation);
            }
        };

        // Dropped on timeout, which releases the native client.
        let client = Self {
            sdk,
            handle,
            options,
        };
        if !client.wait_for_connect(options.connect_timeout) {
            warn!(
                "client not connected after {} ms",
                options.connect_timeout.as_raw()
            );
            return Err(Error::ConnectTimeout);
        }

        info!("client connected");
        Ok(client)
    }

    /// Connect with a pre-shared key.
    pub fn connect_psk(
        sdk: S,
        identity: &[u8],
        secret: &[u8],
        options: Options,
    ) -> Result<Self, Error> {
        Self::connect(sdk, &Credentials::psk(identity, secret), options)
    }

    /// Connect with a CA certificate, device certificate and private key.
    pub fn connect_pki(
        sdk: S,
        ca_cert: &[u8],
        public_cert: &[u8],
        private_key: &[u8],
        options: Options,
    ) -> Result<Self, Error> {
        let credentials = Credentials::pki(ca_cert, public_cert, private_key);
        Self::connect(sdk, &credentials, options)
    }

    /// Block until the client is connected or `timeout` elapses.
    pub fn wait_for_connect(&self, timeout: Timeout) -> bool {
        self.sdk
            .client_wait_for_connect(self.handle, timeout.as_raw())
    }

    /// Whether the client currently has a session with the cloud.
    pub fn is_connected(&self) -> Result<bool, Error> {
        self.sdk
            .client_is_connected(self.handle)
            .ok_or(Error::Unsupported("golioth_client_is_connected"))
    }

    /// LightDB accessor using the client's request timeout.
    pub fn lightdb(&self) -> LightDb<'_, S> {
        LightDb::new(self, self.options.request_timeout)
    }

    /// Options the client was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The native handle.
    pub fn handle(&self) -> ClientHandle {
        self.handle
    }

    /// The SDK backing this client.
    pub fn sdk(&self) -> &S {
        &self.sdk
    }
}

impl<S: Sdk> Drop for Client<S> {
    fn drop(&mut self) {
        if self.sdk.client_destroy(self.handle) {
            debug!("client destroyed");
        } else {
            debug!("client left open, SDK cannot destroy it");
        }
    }
}

impl<S: Sdk> core::fmt::Debug for Client<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("handle", &self.handle)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
pub use shared::SharedClient;

#[cfg(feature = "std")]
mod shared {
    use super::Client;
    use crate::error::Error;
    use crate::lightdb::Value;
    use crate::sys::Sdk;
    use std::sync::{Arc, Mutex, PoisonError};

    /// A [`Client`] that can be cloned across threads.
    ///
    /// Every native call on the connection happens under one lock.
    #[derive(Debug)]
    pub struct SharedClient<S: Sdk> {
        inner: Arc<Mutex<Client<S>>>,
    }

    impl<S: Sdk> Clone for SharedClient<S> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S: Sdk> From<Client<S>> for SharedClient<S> {
        fn from(client: Client<S>) -> Self {
            Self::new(client)
        }
    }

    impl<S: Sdk> SharedClient<S> {
        /// Wrap `client`.
        pub fn new(client: Client<S>) -> Self {
            Self {
                inner: Arc::new(Mutex::new(client)),
            }
        }

        /// Run `f` with exclusive access to the client.
        pub fn with<R>(&self, f: impl FnOnce(&Client<S>) -> R) -> R {
            // A panic inside `f` leaves no partial state behind.
            let client = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            f(&client)
        }

        /// [`LightDb::set`](crate::LightDb::set) under the lock.
        pub fn set<'v>(&self, path: &str, value: impl Into<Value<'v>>) -> Result<(), Error> {
            self.with(|client| client.lightdb().set(path, value))
        }
    }
}
