//! TLS setup for the mock server.
//!
//! A [`TlsContext`] holds the server-side acceptor built from PEM
//! certificate and key material, supplied either from files or directly as
//! strings (for certificates generated in test code).

use std::sync::Arc;

use rustls::pki_types::CertificateDer;
use tokio_rustls::TlsAcceptor;

use super::LifecycleError;

/// Certificate/key pair ready to serve HTTPS connections.
pub struct TlsContext {
    acceptor: TlsAcceptor,
}

impl TlsContext {
    /// Load PEM certificate chain and private key from files.
    pub fn from_pem_files(cert_path: &str, key_path: &str) -> Result<Self, LifecycleError> {
        let cert_pem = std::fs::read_to_string(cert_path).map_err(|e| {
            LifecycleError::InvalidCertificate(format!(
                "failed to read certificate file '{cert_path}': {e}"
            ))
        })?;
        let key_pem = std::fs::read_to_string(key_path).map_err(|e| {
            LifecycleError::InvalidCertificate(format!(
                "failed to read private key file '{key_path}': {e}"
            ))
        })?;
        Self::from_pem(&cert_pem, &key_pem)
    }

    /// Build from in-memory PEM strings.
    pub fn from_pem(cert_pem: &str, key_pem: &str) -> Result<Self, LifecycleError> {
        build_acceptor(cert_pem, key_pem)
            .map(|acceptor| Self { acceptor })
            .map_err(|e| LifecycleError::InvalidCertificate(e.to_string()))
    }

    pub(super) fn into_acceptor(self) -> TlsAcceptor {
        self.acceptor
    }
}

fn build_acceptor(cert_pem: &str, key_pem: &str) -> Result<TlsAcceptor, anyhow::Error> {
    let certs: Vec<CertificateDer> = rustls_pemfile::certs(&mut cert_pem.as_bytes())
        .collect::<Result<_, _>>()
        .map_err(|e| anyhow::anyhow!("failed to parse certificate PEM: {e}"))?;

    if certs.is_empty() {
        anyhow::bail!("no certificates found in PEM input");
    }

    // Accepts PKCS8, RSA, or EC private keys
    let key = rustls_pemfile::private_key(&mut key_pem.as_bytes())
        .map_err(|e| anyhow::anyhow!("failed to parse private key PEM: {e}"))?
        .ok_or_else(|| anyhow::anyhow!("no private key found in PEM input"))?;

    // Pin the ring provider explicitly so feature unification in the
    // dependency graph cannot leave the process-default provider ambiguous.
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let server_config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| anyhow::anyhow!("unsupported TLS protocol versions: {e}"))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| anyhow::anyhow!("invalid certificate/key pair: {e}"))?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_pem() {
        let result = TlsContext::from_pem("not a certificate", "not a key");
        assert!(matches!(result, Err(LifecycleError::InvalidCertificate(_))));
    }

    #[test]
    fn rejects_missing_files() {
        let result = TlsContext::from_pem_files("/nonexistent/cert.pem", "/nonexistent/key.pem");
        assert!(matches!(result, Err(LifecycleError::InvalidCertificate(_))));
    }

    #[test]
    fn rejects_cert_without_key() {
        // Valid-looking PEM block boundaries but no parseable key material.
        let cert = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        let result = TlsContext::from_pem(cert, "");
        assert!(result.is_err());
    }
}
