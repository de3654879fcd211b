//! Firebase ID token authentication.
//!
//! The app sends `Authorization: Bearer <Firebase ID token>`. Tokens are
//! RS256-signed by Google's secure-token service; verification checks the
//! signature against Google's published JWKS and, when a project id is
//! configured, locks audience and issuer to that project.

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// JWKS endpoint for Firebase secure-token signing keys.
const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// JWT claims from a Firebase ID token.
#[derive(Debug, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// Subject (user id)
    pub sub: String,
    /// Firebase's alias for the subject
    pub user_id: Option<String>,
    /// Email, if the account has one
    pub email: Option<String>,
    /// Audience (the Firebase project id)
    pub aud: String,
    /// Issuer (`https://securetoken.google.com/<project-id>`)
    pub iss: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Verified user identity extracted from token claims.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User's Firebase uid
    pub user_id: String,
    /// User's email
    pub email: Option<String>,
}

impl TryFrom<FirebaseClaims> for AuthenticatedUser {
    type Error = Error;

    fn try_from(claims: FirebaseClaims) -> Result<Self> {
        let user_id = claims.user_id.unwrap_or(claims.sub);
        if user_id.is_empty() {
            return Err(Error::InvalidCredential("token has no subject".to_string()));
        }

        Ok(Self {
            user_id,
            email: claims.email,
        })
    }
}

/// Extract the token portion of an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or(Error::MissingCredential)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(Error::MalformedCredential)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Error::MalformedCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Error::MalformedCredential);
    }

    Ok(token)
}

/// Verifies a bearer token against the external identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<FirebaseClaims>;
}

/// Production verifier backed by Google's secure-token JWKS.
pub struct GoogleTokenVerifier {
    http: reqwest::Client,
    project_id: Option<String>,
}

/// One RSA key from the JWKS document.
#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

impl GoogleTokenVerifier {
    pub fn new(http: reqwest::Client, project_id: Option<String>) -> Self {
        Self { http, project_id }
    }

    async fn fetch_key(&self, kid: &str) -> Result<DecodingKey> {
        let jwks: JwkSet = self
            .http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .map_err(|e| Error::InvalidCredential(format!("JWKS fetch failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::InvalidCredential(format!("JWKS parse failed: {e}")))?;

        let jwk = jwks
            .keys
            .iter()
            .find(|key| key.kid == kid)
            .ok_or_else(|| Error::InvalidCredential(format!("unknown signing key {kid}")))?;

        DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| Error::InvalidCredential(format!("bad signing key: {e}")))
    }

    /// Exact issuer comparison for a project-locked deployment.
    ///
    /// The validator already checked audience and issuer, but the lock is
    /// part of the auth contract so it is asserted explicitly as well.
    fn check_project_lock(claims: &FirebaseClaims, project_id: &str) -> Result<()> {
        let expected_iss = format!("https://securetoken.google.com/{project_id}");
        if claims.iss != expected_iss {
            return Err(Error::InvalidCredential(format!(
                "token issuer {} does not match project {}",
                claims.iss, project_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<FirebaseClaims> {
        let header = decode_header(token)
            .map_err(|e| Error::InvalidCredential(format!("bad token header: {e}")))?;
        let kid = header
            .kid
            .ok_or_else(|| Error::InvalidCredential("token header has no kid".to_string()))?;

        let key = self.fetch_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        match &self.project_id {
            Some(project_id) => {
                validation.set_audience(&[project_id]);
                validation.set_issuer(&[format!("https://securetoken.google.com/{project_id}")]);
            }
            None => {
                validation.validate_aud = false;
            }
        }

        let token_data = decode::<FirebaseClaims>(token, &key, &validation)
            .map_err(|e| Error::InvalidCredential(format!("token verification failed: {e}")))?;

        if let Some(project_id) = &self.project_id {
            Self::check_project_lock(&token_data.claims, project_id)?;
        }

        Ok(token_data.claims)
    }
}

/// Authenticate an incoming request from its Authorization header.
pub async fn authenticate(
    header: Option<&str>,
    verifier: &dyn TokenVerifier,
) -> Result<AuthenticatedUser> {
    let token = bearer_token(header)?;
    let claims = verifier.verify(token).await?;
    AuthenticatedUser::try_from(claims)
}
