//! Certificate file reading and format detection
//!
//! Auto-detects PEM and DER and extracts DER-encoded certificates.

use crate::utils::CertFileError;
use std::path::Path;
use x509_parser::prelude::*;

/// Detected certificate file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    Pem,
    Der,
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedFormat::Pem => write!(f, "PEM"),
            DetectedFormat::Der => write!(f, "DER"),
        }
    }
}

/// Detect format from raw bytes
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DetectedFormat, CertFileError> {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.contains("-----BEGIN ") {
            return Ok(DetectedFormat::Pem);
        }
    }

    if X509Certificate::from_der(data).is_ok() {
        return Ok(DetectedFormat::Der);
    }

    Err(CertFileError::UnsupportedFormat {
        format: "unknown (could not detect PEM or DER)".to_string(),
    })
}

/// Read certificates from a file, returning DER-encoded certificate bytes.
pub fn read_certificates(path: &Path) -> Result<Vec<Vec<u8>>, CertFileError> {
    let data = std::fs::read(path).map_err(|e| CertFileError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    read_certificates_from_bytes(&data).map_err(|e| CertFileError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Read certificates from in-memory PEM or DER data
pub fn read_certificates_from_bytes(data: &[u8]) -> Result<Vec<Vec<u8>>, CertFileError> {
    match detect_format_from_bytes(data)? {
        DetectedFormat::Pem => read_pem_certificates(data),
        DetectedFormat::Der => Ok(vec![data.to_vec()]),
    }
}

/// Read all CERTIFICATE blocks from PEM data
fn read_pem_certificates(data: &[u8]) -> Result<Vec<Vec<u8>>, CertFileError> {
    let pems = ::pem::parse_many(data).map_err(|e| CertFileError::ParseError {
        message: format!("Failed to parse PEM: {}", e),
    })?;

    let certs: Vec<Vec<u8>> = pems
        .into_iter()
        .filter(|p| p.tag() == "CERTIFICATE")
        .map(|p| p.into_contents())
        .collect();

    if certs.is_empty() {
        return Err(CertFileError::ParseError {
            message: "No CERTIFICATE blocks found in PEM data".to_string(),
        });
    }

    Ok(certs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pem_format() {
        let pem_data =
            b"-----BEGIN CERTIFICATE-----\nMIIBkTCB+wIJAL...\n-----END CERTIFICATE-----\n";
        assert_eq!(
            detect_format_from_bytes(pem_data).unwrap(),
            DetectedFormat::Pem
        );
    }

    #[test]
    fn test_detect_unknown_format() {
        let garbage = b"this is not a certificate";
        assert!(detect_format_from_bytes(garbage).is_err());
    }

    #[test]
    fn test_marker_file_has_no_certificates() {
        let result = read_certificates_from_bytes(b"# no intermediate certificates found\n");
        assert!(result.is_err());
    }
}
