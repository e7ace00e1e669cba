//! TLS credentials for the native client.
//!
//! [`Credentials`] borrows the secret material instead of copying it. The
//! layout produced by [`Credentials::to_raw`] carries the same lifetime, so a
//! [`RawConfig`] can never outlive the buffers its pointers refer to.

use crate::sys::{
    GOLIOTH_TLS_AUTH_TYPE_PKI, GOLIOTH_TLS_AUTH_TYPE_PSK, golioth_client_config_t,
    golioth_pki_credentials_t, golioth_psk_credentials_t, golioth_tls_auth_type_t,
    golioth_tls_credentials_t, golioth_tls_credentials_u,
};
use core::marker::PhantomData;

/// Authentication mode selected by a set of credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuthType {
    /// Pre-shared key.
    Psk,
    /// Certificates and private key.
    Pki,
}

impl AuthType {
    /// The discriminant written into `golioth_tls_credentials_t`.
    pub fn raw(self) -> golioth_tls_auth_type_t {
        match self {
            AuthType::Psk => GOLIOTH_TLS_AUTH_TYPE_PSK,
            AuthType::Pki => GOLIOTH_TLS_AUTH_TYPE_PKI,
        }
    }

    /// Lowercase name, for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::Psk => "psk",
            AuthType::Pki => "pki",
        }
    }
}

/// Credentials used to authenticate the TLS session.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    /// Pre-shared key identity and secret.
    Psk {
        /// PSK identity, e.g. `device-id@project-id`.
        identity: &'a [u8],
        /// PSK secret.
        secret: &'a [u8],
    },
    /// Certificate based authentication. Certificates are PEM or DER, as
    /// accepted by the TLS backend the SDK was built with.
    Pki {
        /// CA certificate used to verify the server.
        ca_cert: &'a [u8],
        /// Device certificate.
        public_cert: &'a [u8],
        /// Device private key.
        private_key: &'a [u8],
    },
}

impl<'a> Credentials<'a> {
    /// PSK credentials.
    pub fn psk(identity: &'a [u8], secret: &'a [u8]) -> Self {
        Credentials::Psk { identity, secret }
    }

    /// PKI credentials.
    pub fn pki(ca_cert: &'a [u8], public_cert: &'a [u8], private_key: &'a [u8]) -> Self {
        Credentials::Pki {
            ca_cert,
            public_cert,
            private_key,
        }
    }

    /// The authentication mode of these credentials.
    pub fn auth_type(&self) -> AuthType {
        match self {
            Credentials::Psk { .. } => AuthType::Psk,
            Credentials::Pki { .. } => AuthType::Pki,
        }
    }

    /// Build the native client configuration.
    ///
    /// The discriminant and the active union field are always written
    /// together from the same variant.
    pub fn to_raw(&self) -> RawConfig<'a> {
        let credentials = match *self {
            Credentials::Psk { identity, secret } => golioth_tls_credentials_t {
                auth_type: GOLIOTH_TLS_AUTH_TYPE_PSK,
                u: golioth_tls_credentials_u {
                    psk: golioth_psk_credentials_t {
                        psk_id: identity.as_ptr().cast(),
                        psk_id_len: identity.len(),
                        psk: secret.as_ptr().cast(),
                        psk_len: secret.len(),
                    },
                },
            },
            Credentials::Pki {
                ca_cert,
                public_cert,
                private_key,
            } => golioth_tls_credentials_t {
                auth_type: GOLIOTH_TLS_AUTH_TYPE_PKI,
                u: golioth_tls_credentials_u {
                    pki: golioth_pki_credentials_t {
                        ca_cert: ca_cert.as_ptr(),
                        ca_cert_len: ca_cert.len(),
                        public_cert: public_cert.as_ptr(),
                        public_cert_len: public_cert.len(),
                        private_key: private_key.as_ptr(),
                        private_key_len: private_key.len(),
                    },
                },
            },
        };

        RawConfig {
            config: golioth_client_config_t { credentials },
            _buffers: PhantomData,
        }
    }
}

// Secrets stay out of logs and panic messages.
impl core::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Credentials::Psk { identity, secret } => f
                .debug_struct("Psk")
                .field("identity_len", &identity.len())
                .field("secret_len", &secret.len())
                .finish(),
            Credentials::Pki {
                ca_cert,
                public_cert,
                private_key,
            } => f
                .debug_struct("Pki")
                .field("ca_cert_len", &ca_cert.len())
                .field("public_cert_len", &public_cert.len())
                .field("private_key_len", &private_key.len())
                .finish(),
        }
    }
}

/// Native client configuration borrowing the credential buffers for `'a`.
pub struct RawConfig<'a> {
    config: golioth_client_config_t,
    _buffers: PhantomData<&'a [u8]>,
}

impl RawConfig<'_> {
    /// The layout handed to `golioth_client_create`.
    pub fn as_config(&self) -> &golioth_client_config_t {
        &self.config
    }
}

impl core::fmt::Debug for RawConfig<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawConfig")
            .field("auth_type", &self.config.credentials.auth_type)
            .finish_non_exhaustive()
    }
}
