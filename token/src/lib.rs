//! Bearer tokens.
//!
//! Users of the data portal are identified by a JSON Web Token signed with a
//! key the server is configured with. The server is stateless with respect to
//! sessions: every request carries its token and the `sub` claim is taken as
//! the user ID. That ID is what collections record as their owner.
//!
//! ## Profile claims
//!
//! Tokens may carry the standard OpenID Connect `name` and `email` claims.
//! They are only used to fill in the contact details of newly created
//! collections when the request leaves them out.
//!
//! ## Supplying the token
//!
//! The JWT can be supplied to the server in one of two ways:
//!
//! - As a normal Bearer token.
//! - As the password in Basic Auth. The username is ignored.
//!
//! ## Example token
//!
//! ```json
//! {
//!   "sub": "test_user_id",
//!   "exp": 4102324986,
//!   "name": "Jane Doe",
//!   "email": "jane@example.org"
//! }
//! ```

#![deny(
    asm_sub_register,
    deprecated,
    missing_abi,
    unsafe_code,
    unused_macros,
    unused_must_use,
    unused_unsafe
)]
#![deny(clippy::from_over_into, clippy::needless_question_mark)]
#![cfg_attr(
    not(debug_assertions),
    deny(unused_imports, unused_mut, unused_variables)
)]

pub mod util;


use std::collections::HashSet;
use std::error::Error as StdError;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use chrono::{DateTime, Utc};
use displaydoc::Display;
use jwt_simple::prelude::{RSAKeyPairLike, RSAPublicKeyLike, VerificationOptions};
pub use jwt_simple::{
    algorithms::{HS256Key, MACLike, RS256KeyPair, RS256PublicKey},
    claims::{Claims, JWTClaims},
    prelude::UnixTimeStamp,
};
use serde::{Deserialize, Serialize};

/// A validated JSON Web Token.
#[derive(Debug)]
pub struct Token(JWTClaims<TokenClaims>);

/// Custom claims of a JSON Web Token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TokenClaims {
    /// Display name of the user.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Email address of the user.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A token error.
#[derive(Debug, Display)]
pub enum Error {
    /// JWT error: {0}
    TokenError(jwt_simple::Error),

    /// Base64 decode error: {0}
    Base64Error(base64::DecodeError),

    /// Failure decoding the base64 layer of the base64 encoded PEM
    Utf8Error(std::str::Utf8Error),

    /// The expiry time {0} is before the Unix epoch
    InvalidExpiry(DateTime<Utc>),

    /// Pubkey-only JWT authentication cannot create signed JWTs
    PubkeyOnlyCannotCreateToken,
}

/// The supported JWT signature types.
pub enum SignatureType {
    HS256(HS256Key),
    RS256(RS256KeyPair),
    RS256PubkeyOnly(RS256PublicKey),
}

impl Token {
    /// Verifies and decodes a token.
    pub fn from_jwt(
        token: &str,
        signature_type: &SignatureType,
        maybe_bound_issuer: &Option<String>,
        maybe_bound_audiences: &Option<HashSet<String>>,
    ) -> Result<Self> {
        let opts = VerificationOptions {
            allowed_issuers: maybe_bound_issuer
                .as_ref()
                .map(|s| [s.to_owned()].into()),
            allowed_audiences: maybe_bound_audiences.to_owned(),
            ..Default::default()
        };

        let claims = match signature_type {
            SignatureType::HS256(key) => key.verify_token::<TokenClaims>(token, Some(opts)),
            SignatureType::RS256(key) => key
                .public_key()
                .verify_token::<TokenClaims>(token, Some(opts)),
            SignatureType::RS256PubkeyOnly(key) => {
                key.verify_token::<TokenClaims>(token, Some(opts))
            }
        }
        .map_err(Error::TokenError)?;

        if claims.subject.is_none() {
            tracing::debug!("Token has no subject");
        }

        Ok(Self(claims))
    }

    /// Creates a new token for a user with an expiration timestamp.
    pub fn new(sub: String, exp: &DateTime<Utc>) -> Result<Self> {
        let exp_secs: u64 = exp
            .timestamp()
            .try_into()
            .map_err(|_| Error::InvalidExpiry(*exp))?;

        let now_secs: u64 = Utc::now().timestamp().try_into().unwrap_or_default();

        Ok(Self(JWTClaims {
            issued_at: Some(UnixTimeStamp::from_secs(now_secs)),
            expires_at: Some(UnixTimeStamp::from_secs(exp_secs)),
            invalid_before: Some(UnixTimeStamp::from_secs(now_secs)),
            issuer: None,
            subject: Some(sub),
            audiences: None,
            jwt_id: None,
            nonce: None,
            custom: TokenClaims::default(),
        }))
    }

    /// Attaches profile claims to the token.
    pub fn set_profile(&mut self, name: Option<String>, email: Option<String>) {
        self.0.custom.name = name;
        self.0.custom.email = email;
    }

    /// Encodes the token.
    pub fn encode(
        &self,
        signature_type: &SignatureType,
        maybe_bound_issuer: &Option<String>,
        maybe_bound_audiences: &Option<HashSet<String>>,
    ) -> Result<String> {
        let mut token = self.0.clone();

        if let Some(issuer) = maybe_bound_issuer {
            token = token.with_issuer(issuer);
        }
        if let Some(audiences) = maybe_bound_audiences {
            token = token.with_audiences(audiences.to_owned());
        }

        match signature_type {
            SignatureType::HS256(key) => key.authenticate(token).map_err(Error::TokenError),
            SignatureType::RS256(key) => key.sign(token).map_err(Error::TokenError),
            SignatureType::RS256PubkeyOnly(_) => Err(Error::PubkeyOnlyCannotCreateToken),
        }
    }

    /// Returns the subject of the token, that is the user ID.
    pub fn sub(&self) -> Option<&str> {
        self.0.subject.as_deref()
    }

    /// Returns the display name of the user, if present.
    pub fn name(&self) -> Option<&str> {
        self.0.custom.name.as_deref()
    }

    /// Returns the email of the user, if present.
    pub fn email(&self) -> Option<&str> {
        self.0.custom.email.as_deref()
    }

    /// Returns the claims as a serializable value.
    pub fn opaque_claims(&self) -> &impl Serialize {
        &self.0
    }
}

impl StdError for Error {}

pub fn decode_token_hs256_secret_base64(s: &str) -> Result<HS256Key> {
    let decoded = BASE64_STANDARD.decode(s).map_err(Error::Base64Error)?;
    Ok(HS256Key::from_bytes(&decoded))
}

pub fn decode_token_rs256_secret_base64(s: &str) -> Result<RS256KeyPair> {
    let decoded = BASE64_STANDARD.decode(s).map_err(Error::Base64Error)?;
    let secret = std::str::from_utf8(&decoded).map_err(Error::Utf8Error)?;
    let keypair = RS256KeyPair::from_pem(secret).map_err(Error::TokenError)?;

    Ok(keypair)
}

pub fn decode_token_rs256_pubkey_base64(s: &str) -> Result<RS256PublicKey> {
    let decoded = BASE64_STANDARD.decode(s).map_err(Error::Base64Error)?;
    let pubkey = std::str::from_utf8(&decoded).map_err(Error::Utf8Error)?;
    let pubkey = RS256PublicKey::from_pem(pubkey).map_err(Error::TokenError)?;

    Ok(pubkey)
}
