//! Human-readable subject lines for harvested certificates

use crate::harvest::pem_split::pem_to_der;
use serde::Serialize;
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

/// Subject, issuer and fingerprint of one certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertSubject {
    pub subject: String,
    pub issuer: String,
    pub fingerprint_sha256: String,
}

impl CertSubject {
    pub fn from_der(der: &[u8]) -> Option<Self> {
        let (_, cert) = X509Certificate::from_der(der).ok()?;
        Some(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            fingerprint_sha256: hex::encode(Sha256::digest(der)),
        })
    }

    pub fn from_pem(block: &str) -> Option<Self> {
        pem_to_der(block).and_then(|der| Self::from_der(&der))
    }

    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }
}
