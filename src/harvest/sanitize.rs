//! Hostname to file name token

/// Token used when a host has no usable characters at all
const FALLBACK: &str = "host";

/// Map a hostname to a filesystem-safe token.
///
/// Runs of anything other than ASCII letters and digits collapse to a
/// single `-`, with no separator at either end.
pub fn sanitize(host: &str) -> String {
    let mut out = String::with_capacity(host.len());
    let mut pending_separator = false;

    for c in host.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if out.is_empty() {
        FALLBACK.to_string()
    } else {
        out
    }
}
