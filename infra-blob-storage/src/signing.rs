//! SharedKey request authorization for the blob REST API.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use redaction_domain::StorageError;

type HmacSha256 = Hmac<Sha256>;

pub fn rfc1123_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Canonical string-to-sign for the 2015-02-21+ SharedKey scheme. Only the
/// standard headers this adapter actually sends are filled in; a zero
/// Content-Length is signed as the empty string. `x_ms_headers` must use
/// lowercase names and is sorted here.
pub fn string_to_sign(
    verb: &str,
    content_length: usize,
    content_type: &str,
    x_ms_headers: &[(&str, &str)],
    canonicalized_resource: &str,
) -> String {
    let content_length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    let mut headers: Vec<(&str, &str)> = x_ms_headers.to_vec();
    headers.sort();
    let canonicalized_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();

    format!(
        "{verb}\n\n\n{content_length}\n\n{content_type}\n\n\n\n\n\n\n{canonicalized_headers}{canonicalized_resource}"
    )
}

pub fn shared_key_authorization(
    account: &str,
    key_base64: &str,
    string_to_sign: &str,
) -> Result<String, StorageError> {
    let key = BASE64.decode(key_base64).map_err(|err| {
        StorageError::Connection(format!("account key is not valid base64: {err}"))
    })?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|err| StorageError::Connection(err.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());
    Ok(format!("SharedKey {account}:{signature}"))
}
