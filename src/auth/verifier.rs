//! Access token verification against the identity provider.
//!
//! Tokens are JWTs signed by the identity provider. Verification checks the
//! signature, expiry, issuer and audience with `jsonwebtoken`, then checks
//! that the `cid` claim names the expected client.
//!
//! Signing keys come from a [`KeySource`]:
//!
//! - [`KeySource::Jwks`] fetches the provider's JSON Web Key Set from
//!   `{issuer}/v1/keys` and caches the keys by key id. A token naming an
//!   unknown key id triggers a refetch, which picks up rotated keys, but at
//!   most once per [`DEFAULT_MIN_REFRESH`].
//! - [`KeySource::Static`] uses a single fixed key (local development and
//!   tests).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::VerifyError;

/// Claims an access token must carry to be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimExpectations {
    /// Expected `iss`
    pub issuer: String,

    /// Expected `aud`
    pub audience: String,

    /// Expected `cid`
    pub client_id: String,
}

/// Claims read from a verified token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub exp: u64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub cid: Option<String>,
    #[serde(default)]
    pub scp: Vec<String>,
}

/// Something that can decide whether a bearer token is acceptable.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AccessClaims, VerifyError>;
}

/// Minimum time between two fetches of a remote key set.
pub const DEFAULT_MIN_REFRESH: Duration = Duration::from_secs(300);

/// Where signing keys come from.
pub enum KeySource {
    /// Keys published by the identity provider
    Jwks(RemoteKeys),

    /// One fixed key
    Static(DecodingKey),
}

impl KeySource {
    /// Key set published at `{issuer}/v1/keys`.
    pub fn jwks_for_issuer(issuer: &str) -> Self {
        KeySource::Jwks(RemoteKeys::for_issuer(issuer))
    }

    async fn key_for(&self, kid: Option<&str>) -> Result<DecodingKey, VerifyError> {
        match self {
            KeySource::Static(key) => Ok(key.clone()),
            KeySource::Jwks(remote) => {
                let kid = kid.ok_or_else(|| VerifyError::UnknownKey("<none>".to_string()))?;
                remote.key(kid).await
            }
        }
    }
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn refresh_due(&self, min_refresh: Duration) -> bool {
        self.fetched_at.map_or(true, |at| at.elapsed() >= min_refresh)
    }
}

/// JSON Web Key Set fetched over HTTP and cached by key id.
pub struct RemoteKeys {
    url: String,
    client: reqwest::Client,
    min_refresh: Duration,
    cache: RwLock<KeyCache>,
}

impl RemoteKeys {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            min_refresh: DEFAULT_MIN_REFRESH,
            cache: RwLock::new(KeyCache::default()),
        }
    }

    pub fn for_issuer(issuer: &str) -> Self {
        Self::new(format!("{}/v1/keys", issuer.trim_end_matches('/')))
    }

    /// Set the minimum time between fetches.
    pub fn with_min_refresh(mut self, min_refresh: Duration) -> Self {
        self.min_refresh = min_refresh;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        {
            let cache = self.cache.read().await;
            if let Some(key) = cache.keys.get(kid) {
                return Ok(key.clone());
            }
            if !cache.refresh_due(self.min_refresh) {
                return Err(VerifyError::UnknownKey(kid.to_string()));
            }
        }

        let mut cache = self.cache.write().await;

        // Another request may have refreshed while we waited for the lock.
        if let Some(key) = cache.keys.get(kid) {
            return Ok(key.clone());
        }
        if !cache.refresh_due(self.min_refresh) {
            return Err(VerifyError::UnknownKey(kid.to_string()));
        }

        debug!(kid, url = %self.url, "Signing key not cached, fetching key set");
        // Failed attempts count toward the interval.
        cache.fetched_at = Some(Instant::now());
        let set = self.fetch().await?;

        cache.keys.clear();
        for jwk in &set.keys {
            let Some(id) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    cache.keys.insert(id, key);
                }
                Err(e) => warn!(kid = %id, "Skipping unusable signing key: {}", e),
            }
        }

        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| VerifyError::UnknownKey(kid.to_string()))
    }

    async fn fetch(&self) -> Result<JwkSet, reqwest::Error> {
        self.client
            .get(self.url.as_str())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

/// JWT verifier bound to one issuer, audience and client.
pub struct JwtVerifier {
    expectations: ClaimExpectations,
    keys: KeySource,
    algorithm: Algorithm,
}

impl JwtVerifier {
    /// Verify RS256 tokens with keys from the issuer's key set.
    pub fn new(expectations: ClaimExpectations) -> Self {
        let keys = KeySource::jwks_for_issuer(&expectations.issuer);
        Self {
            expectations,
            keys,
            algorithm: Algorithm::RS256,
        }
    }

    /// Verify tokens with keys from `keys`, accepting only `algorithm`.
    pub fn with_key_source(
        expectations: ClaimExpectations,
        keys: KeySource,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            expectations,
            keys,
            algorithm,
        }
    }

    /// Verify tokens signed with a fixed key.
    pub fn with_static_key(
        expectations: ClaimExpectations,
        key: DecodingKey,
        algorithm: Algorithm,
    ) -> Self {
        Self::with_key_source(expectations, KeySource::Static(key), algorithm)
    }

    /// Verify HS256 tokens signed with a shared secret.
    pub fn with_secret(expectations: ClaimExpectations, secret: &[u8]) -> Self {
        Self::with_static_key(
            expectations,
            DecodingKey::from_secret(secret),
            Algorithm::HS256,
        )
    }

    pub fn expectations(&self) -> &ClaimExpectations {
        &self.expectations
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.expectations.issuer]);
        validation.set_audience(&[&self.expectations.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<AccessClaims, VerifyError> {
        let header = decode_header(token).map_err(VerifyError::Malformed)?;
        let key = self.keys.key_for(header.kid.as_deref()).await?;

        let data = decode::<AccessClaims>(token, &key, &self.validation())
            .map_err(VerifyError::Rejected)?;
        let claims = data.claims;

        if claims.cid.as_deref() != Some(self.expectations.client_id.as_str()) {
            return Err(VerifyError::ClientIdMismatch {
                expected: self.expectations.client_id.clone(),
                actual: claims.cid,
            });
        }

        Ok(claims)
    }
}
