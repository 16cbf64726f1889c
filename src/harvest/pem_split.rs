//! PEM block handling for captured chains
//!
//! Works on text so that a chain file written by the harvester, or the
//! raw output of `openssl s_client -showcerts`, splits the same way.

use base64::Engine;

const BEGIN_CERT: &str = "-----BEGIN CERTIFICATE-----";
const END_CERT: &str = "-----END CERTIFICATE-----";

/// Encode DER bytes as one PEM certificate block (LF line endings)
pub fn der_to_pem(der: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(der);
    let mut pem = String::with_capacity(b64.len() + b64.len() / 64 + 64);
    pem.push_str(BEGIN_CERT);
    pem.push('\n');
    for chunk in b64.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(chunk).unwrap_or(""));
        pem.push('\n');
    }
    pem.push_str(END_CERT);
    pem.push('\n');
    pem
}

/// Every certificate block in `text`, in order, normalized to LF endings.
///
/// Text outside the markers is dropped; an unterminated block is ignored.
pub fn pem_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        let marker = line.trim();

        if marker == BEGIN_CERT {
            current = Some(format!("{}\n", BEGIN_CERT));
            continue;
        }

        if let Some(block) = current.as_mut() {
            if marker == END_CERT {
                block.push_str(END_CERT);
                block.push('\n');
                blocks.extend(current.take());
            } else {
                block.push_str(marker);
                block.push('\n');
            }
        }
    }

    blocks
}

/// The first certificate block: the leaf
pub fn extract_leaf(chain: &str) -> Option<String> {
    pem_blocks(chain).into_iter().next()
}

/// Blocks 2..N: everything the server sent after the leaf
pub fn extract_intermediates_from_chain(chain: &str) -> Vec<String> {
    pem_blocks(chain).into_iter().skip(1).collect()
}

/// Decode a PEM certificate block back to DER
pub fn pem_to_der(block: &str) -> Option<Vec<u8>> {
    ::pem::parse(block)
        .ok()
        .filter(|p| p.tag() == "CERTIFICATE")
        .map(|p| p.into_contents())
}
