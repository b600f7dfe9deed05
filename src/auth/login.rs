//! Login redirection to the identity provider's authorize endpoint.
//!
//! The redirect asks for an implicit-flow access token:
//!
//! ```text
//! {issuer}/v1/authorize?client_id=..&response_type=token&scope=openid
//!     &redirect_uri=..&state=..&nonce=<fresh>
//! ```

use url::Url;

/// Number of random bytes in a nonce.
pub const NONCE_BYTES: usize = 32;

/// Authorize parameters set from configuration; callers cannot override them.
const RESERVED_PARAMS: [&str; 6] = [
    "client_id",
    "response_type",
    "scope",
    "redirect_uri",
    "state",
    "nonce",
];

/// Fixed parts of the authorize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSettings {
    pub issuer: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub state: String,
}

/// Generate a fresh hex-encoded nonce.
pub fn generate_nonce() -> String {
    let bytes: [u8; NONCE_BYTES] = rand::random();
    hex::encode(bytes)
}

impl LoginSettings {
    /// Authorize endpoint of the issuer.
    pub fn authorize_endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}/v1/authorize", self.issuer.trim_end_matches('/')))
    }

    /// Build the authorize URL.
    ///
    /// `passthrough` holds query parameters from the incoming request; they
    /// are kept ahead of the authorize parameters. Any that name an
    /// authorize parameter are dropped.
    pub fn authorize_url(
        &self,
        nonce: &str,
        passthrough: &[(String, String)],
    ) -> Result<Url, url::ParseError> {
        let mut url = self.authorize_endpoint()?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in passthrough {
                if RESERVED_PARAMS.contains(&key.as_str()) {
                    continue;
                }
                query.append_pair(key, value);
            }
            query
                .append_pair("client_id", &self.client_id)
                .append_pair("response_type", "token")
                .append_pair("scope", "openid")
                .append_pair("redirect_uri", &self.redirect_uri)
                .append_pair("state", &self.state)
                .append_pair("nonce", nonce);
        }
        Ok(url)
    }
}
