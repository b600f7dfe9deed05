//! Identity provider integration.
//!
//! - [`verifier`] - checks bearer tokens issued by the identity provider
//! - [`login`] - builds the redirect that starts a login

pub mod login;
pub mod verifier;

pub use login::{generate_nonce, LoginSettings, NONCE_BYTES};
pub use verifier::{
    AccessClaims, ClaimExpectations, JwtVerifier, KeySource, RemoteKeys, TokenVerifier,
    DEFAULT_MIN_REFRESH,
};
