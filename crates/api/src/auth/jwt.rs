//! Token handling for the four portal roles.
//!
//! A successful login mints two tokens. The access token is a short-lived
//! HS256 JWT whose [`Claims`] carry the account id and role name, so route
//! guards can authorize a request without a database round trip. The refresh
//! token is an opaque UUID tied to a session row; the database stores only
//! its SHA-256 digest, so leaked rows cannot be replayed as tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use intrack_core::types::DbId;

/// Payload of an access token.
///
/// `role` is the lowercase role name (`"student"`, `"supervisor"`,
/// `"lecturer"`, `"admin"`); the auth extractor parses it back into a
/// `Role` and rejects tokens carrying anything else.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id (the `accounts.id` column).
    pub sub: DbId,
    /// Lowercase role name baked in at login time.
    pub role: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Per-token UUID, available for audit trails.
    pub jti: String,
}

impl Claims {
    fn new(account_id: DbId, role: &str, issued_at: i64, ttl_mins: i64) -> Self {
        Self {
            sub: account_id,
            role: role.to_string(),
            exp: issued_at + ttl_mins * 60,
            iat: issued_at,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signing secret and token lifetimes, loaded once at startup.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 signing secret shared by sign and verify.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expiry_mins: i64,
    /// Refresh token (session) lifetime in days.
    pub refresh_token_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7) from the
    /// environment.
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is missing or empty, or when an expiry
    /// variable is set but not an integer. Startup-time configuration
    /// errors are fatal.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: env_i64(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }

    /// Mint a signed access token for an account.
    pub fn sign_access_token(
        &self,
        account_id: DbId,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims::new(account_id, role, now, self.access_token_expiry_mins);
        encode(
            &Header::default(), // HS256
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Verify an access token's signature and expiry and return its claims.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(), // HS256, checks exp with leeway
        )?;
        Ok(data.claims)
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid i64")),
        Err(_) => default,
    }
}

/// Mint a refresh token, returning `(plaintext, sha256_hex_digest)`.
///
/// The plaintext goes to the client exactly once; the session row stores
/// only the digest.
pub fn mint_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = refresh_token_digest(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a refresh token, for lookup against session rows.
pub fn refresh_token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trips_every_role() {
        let config = config_with("test-secret-that-is-long-enough-for-hmac");
        for (id, role) in [
            (1, "student"),
            (2, "supervisor"),
            (3, "lecturer"),
            (4, "admin"),
        ] {
            let token = config.sign_access_token(id, role).unwrap();
            let claims = config.decode_access_token(&token).unwrap();
            assert_eq!(claims.sub, id);
            assert_eq!(claims.role, role);
            assert!(claims.exp > claims.iat);
            assert!(!claims.jti.is_empty());
        }
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let config = config_with("test-secret-that-is-long-enough-for-hmac");

        // Hand-build a token that expired 5 minutes ago, well past the
        // default 60-second validation leeway.
        let now = chrono::Utc::now().timestamp();
        let mut claims = Claims::new(9, "student", now - 600, 15);
        claims.exp = now - 300;

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(config.decode_access_token(&token).is_err());
    }

    #[test]
    fn token_signed_elsewhere_is_rejected() {
        let ours = config_with("portal-secret-alpha");
        let theirs = config_with("portal-secret-bravo");

        let token = theirs.sign_access_token(5, "admin").unwrap();
        assert!(ours.decode_access_token(&token).is_err());
    }

    #[test]
    fn refresh_digest_is_stable_hex() {
        let (plaintext, digest) = mint_refresh_token();
        assert_eq!(digest, refresh_token_digest(&plaintext));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
