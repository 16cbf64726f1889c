//! Certificate capture over a TLS handshake
//!
//! Chains are recorded exactly as presented, including ones that would
//! not validate.

use crate::utils::HarvestError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, DigitallySignedStruct, Error as RustlsError, SignatureScheme};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// Source of the DER certificates a host presents, in handshake order
#[allow(async_fn_in_trait)]
pub trait ChainSource {
    async fn capture(&self, host: &str, port: u16) -> Result<Vec<Vec<u8>>, HarvestError>;
}

/// Accepts whatever chain the server presents.
///
/// Advertised schemes must be ones the provider can verify.
#[derive(Debug)]
struct RecordingVerifier {
    schemes: Vec<SignatureScheme>,
}

impl RecordingVerifier {
    fn for_provider(provider: &CryptoProvider) -> Self {
        Self {
            schemes: provider.signature_verification_algorithms.supported_schemes(),
        }
    }
}

impl ServerCertVerifier for RecordingVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

/// Captures chains with a real TLS handshake
pub struct TlsChainSource {
    config: Arc<ClientConfig>,
    connect_timeout: Duration,
    handshake_timeout: Duration,
}

impl TlsChainSource {
    pub fn new(
        connect_timeout: Duration,
        handshake_timeout: Duration,
    ) -> Result<Self, HarvestError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = RecordingVerifier::for_provider(&provider);
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| HarvestError::ClientSetup {
                message: format!("TLS configuration: {}", e),
            })?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();

        Ok(Self {
            config: Arc::new(config),
            connect_timeout,
            handshake_timeout,
        })
    }
}

impl ChainSource for TlsChainSource {
    async fn capture(&self, host: &str, port: u16) -> Result<Vec<Vec<u8>>, HarvestError> {
        let server_name =
            ServerName::try_from(host.to_string()).map_err(|_| HarvestError::InvalidHost {
                host: host.to_string(),
            })?;

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| HarvestError::Timeout {
                host: host.to_string(),
                port,
            })?
            .map_err(|e| HarvestError::Connection {
                host: host.to_string(),
                port,
                message: e.to_string(),
            })?;

        let connector = TlsConnector::from(Arc::clone(&self.config));
        let tls_stream = tokio::time::timeout(
            self.handshake_timeout,
            connector.connect(server_name, stream),
        )
        .await
        .map_err(|_| HarvestError::Handshake {
            host: host.to_string(),
            message: "TLS handshake timed out".to_string(),
        })?
        .map_err(|e| HarvestError::Handshake {
            host: host.to_string(),
            message: e.to_string(),
        })?;

        let (_, connection) = tls_stream.get_ref();
        tracing::debug!("{}: negotiated {:?}", host, connection.protocol_version());

        Ok(connection
            .peer_certificates()
            .map(|certs| certs.iter().map(|c| c.as_ref().to_vec()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_builds() {
        assert!(TlsChainSource::new(Duration::from_secs(1), Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_verifier_schemes_come_from_provider() {
        let verifier = RecordingVerifier::for_provider(&rustls::crypto::ring::default_provider());
        let schemes = verifier.supported_verify_schemes();
        assert!(schemes.contains(&SignatureScheme::ECDSA_NISTP256_SHA256));
        assert!(schemes.contains(&SignatureScheme::RSA_PSS_SHA256));
        // ring has no Ed448
        assert!(!schemes.contains(&SignatureScheme::ED448));
    }

    #[tokio::test]
    async fn test_invalid_host_rejected() {
        let source = TlsChainSource::new(Duration::from_secs(1), Duration::from_secs(1)).unwrap();
        let result = source.capture("not a host name", 443).await;
        assert!(matches!(result, Err(HarvestError::InvalidHost { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let source = TlsChainSource::new(Duration::from_secs(2), Duration::from_secs(2)).unwrap();
        // Port 1 is typically not open
        let result = source.capture("localhost", 1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_capture_google() {
        let source = TlsChainSource::new(Duration::from_secs(5), Duration::from_secs(5)).unwrap();
        let chain = source.capture("www.google.com", 443).await.unwrap();
        assert!(!chain.is_empty());
    }
}
