//! OAuth 1.0a request signing (HMAC-SHA1)
//!
//! Implements the signing steps of RFC 5849 section 3.4 as used by the
//! Twitter API: every parameter is percent-encoded per RFC 3986, sorted, and
//! joined into the signature base string together with the method and the
//! normalized URL. JSON request bodies are not part of the signature.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;

use crate::config::TwitterCredentials;
use crate::error::{PlatformError, Result};

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

pub struct OAuth1Signer {
    consumer_key: SecretString,
    consumer_secret: SecretString,
    token: SecretString,
    token_secret: SecretString,
}

impl OAuth1Signer {
    pub fn new(consumer_key: &str, consumer_secret: &str, token: &str, token_secret: &str) -> Self {
        Self {
            consumer_key: SecretString::from(consumer_key.to_string()),
            consumer_secret: SecretString::from(consumer_secret.to_string()),
            token: SecretString::from(token.to_string()),
            token_secret: SecretString::from(token_secret.to_string()),
        }
    }

    pub fn from_credentials(credentials: &TwitterCredentials) -> Self {
        Self::new(
            credentials.consumer_key.expose_secret(),
            credentials.consumer_secret.expose_secret(),
            credentials.access_token.expose_secret(),
            credentials.access_token_secret.expose_secret(),
        )
    }

    /// Build the `Authorization` header for a request, with a fresh nonce and timestamp
    pub fn authorization_header(&self, method: &str, url: &Url) -> Result<String> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp();

        self.authorization_header_with(method, url, &nonce, timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &Url,
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let mut oauth_params = self.oauth_params(nonce, timestamp);
        let signature = self.signature(method, url, &oauth_params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
            .collect();

        Ok(format!("OAuth {}", fields.join(", ")))
    }

    /// Compute the base64 HMAC-SHA1 signature for a request
    pub fn signature(
        &self,
        method: &str,
        url: &Url,
        oauth_params: &[(String, String)],
    ) -> Result<String> {
        let base = signature_base_string(method, url, oauth_params);
        let key = format!(
            "{}&{}",
            percent_encode(self.consumer_secret.expose_secret()),
            percent_encode(self.token_secret.expose_secret())
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| {
            PlatformError::Authentication(format!("Invalid OAuth signing key: {}", e))
        })?;
        mac.update(base.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    fn oauth_params(&self, nonce: &str, timestamp: i64) -> Vec<(String, String)> {
        vec![
            (
                "oauth_consumer_key".to_string(),
                self.consumer_key.expose_secret().to_string(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.token.expose_secret().to_string(),
            ),
            ("oauth_version".to_string(), VERSION.to_string()),
        ]
    }
}

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Scheme, host, non-default port and path; no query or fragment
pub fn normalized_url(url: &Url) -> String {
    let mut base = format!(
        "{}://{}",
        url.scheme().to_ascii_lowercase(),
        url.host_str().unwrap_or_default().to_ascii_lowercase()
    );
    if let Some(port) = url.port() {
        base.push_str(&format!(":{}", port));
    }
    base.push_str(url.path());
    base
}

/// `METHOD&url&params`, each component percent-encoded
pub fn signature_base_string(method: &str, url: &Url, oauth_params: &[(String, String)]) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (percent_encode(&key), percent_encode(&value)))
        .chain(
            oauth_params
                .iter()
                .map(|(key, value)| (percent_encode(key), percent_encode(value))),
        )
        .collect();
    params.sort();

    let parameter_string = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&normalized_url(url)),
        percent_encode(&parameter_string)
    )
}
