//! Certificates minted with rcgen for the integration tests
#![allow(dead_code)]

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, CustomExtension, DistinguishedName, DnType,
    IsCa,
};

/// id-pe-authorityInfoAccess
const AIA_OID: &[u64] = &[1, 3, 6, 1, 5, 5, 7, 1, 1];

/// DER for an AIA extension holding one CA Issuers URI
pub fn aia_ca_issuers(url: &str) -> Vec<u8> {
    let uri = url.as_bytes();
    assert!(uri.len() < 100, "short URLs only");

    // accessMethod id-ad-caIssuers, accessLocation [6] uniformResourceIdentifier
    let mut access = vec![0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02];
    access.push(0x86);
    access.push(uri.len() as u8);
    access.extend_from_slice(uri);

    let mut description = vec![0x30, access.len() as u8];
    description.extend(access);

    let mut syntax = vec![0x30, description.len() as u8];
    syntax.extend(description);
    syntax
}

fn named(cn: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, "certbench tests");
    dn.push(DnType::CommonName, cn);
    dn
}

fn ca_params(cn: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new());
    params.distinguished_name = named(cn);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

fn leaf_params(host: &str, aia_url: Option<&str>) -> CertificateParams {
    let mut params = CertificateParams::new(vec![host.to_string()]);
    params.distinguished_name = named(host);
    if let Some(url) = aia_url {
        params
            .custom_extensions
            .push(CustomExtension::from_oid_content(AIA_OID, aia_ca_issuers(url)));
    }
    params
}

/// Root -> intermediate -> leaf, all DER
pub struct MintedChain {
    pub root: Vec<u8>,
    pub intermediate: Vec<u8>,
    pub leaf: Vec<u8>,
}

/// Mint a three-level chain; the leaf carries an AIA URL when given
pub fn mint_chain(host: &str, aia_url: Option<&str>) -> MintedChain {
    let root = Certificate::from_params(ca_params("certbench Test Root")).unwrap();
    let intermediate =
        Certificate::from_params(ca_params("certbench Test Intermediate")).unwrap();
    let leaf = Certificate::from_params(leaf_params(host, aia_url)).unwrap();

    MintedChain {
        root: root.serialize_der().unwrap(),
        intermediate: intermediate.serialize_der_with_signer(&root).unwrap(),
        leaf: leaf.serialize_der_with_signer(&intermediate).unwrap(),
    }
}

/// A chain whose intermediate has already expired
pub fn mint_chain_with_expired_intermediate(host: &str) -> MintedChain {
    let root = Certificate::from_params(ca_params("certbench Test Root")).unwrap();
    let mut params = ca_params("certbench Expired Intermediate");
    params.not_before = rcgen::date_time_ymd(2000, 1, 1);
    params.not_after = rcgen::date_time_ymd(2001, 1, 1);
    let intermediate = Certificate::from_params(params).unwrap();
    let leaf = Certificate::from_params(leaf_params(host, None)).unwrap();

    MintedChain {
        root: root.serialize_der().unwrap(),
        intermediate: intermediate.serialize_der_with_signer(&root).unwrap(),
        leaf: leaf.serialize_der_with_signer(&intermediate).unwrap(),
    }
}

/// A standalone self-signed leaf
pub fn self_signed(host: &str) -> Vec<u8> {
    Certificate::from_params(leaf_params(host, None))
        .unwrap()
        .serialize_der()
        .unwrap()
}
