use crate::error::Error;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl SessionTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn mac(secret: &[u8], signing_input: &[u8]) -> Result<HmacSha256, Error> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::InvalidSignature)?;
    mac.update(signing_input);
    Ok(mac)
}

/// Create an HS256 signed session token (JWT).
///
/// # Errors
///
/// Returns an error if claims/header JSON cannot be encoded or the MAC cannot
/// be keyed.
pub fn sign_hs256(secret: &[u8], claims: &SessionTokenClaims) -> Result<String, Error> {
    let header_b64 = b64e_json(&SessionTokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let signature = mac(secret, signing_input.as_bytes())?.finalize().into_bytes();
    let signature_b64 = Base64UrlUnpadded::encode_string(&signature);

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Issue a session token for `subject` that expires `ttl_seconds` after `now`.
///
/// # Errors
///
/// Returns `InvalidTtl` for non-positive lifetimes, or a signing error.
pub fn issue_hs256(
    secret: &[u8],
    subject: &str,
    ttl_seconds: i64,
    now_unix_seconds: i64,
) -> Result<String, Error> {
    if ttl_seconds <= 0 {
        return Err(Error::InvalidTtl);
    }
    let claims = SessionTokenClaims {
        sub: subject.to_string(),
        iat: now_unix_seconds,
        exp: now_unix_seconds + ttl_seconds,
    };
    sign_hs256(secret, &claims)
}

/// Verify an HS256 session token and return its decoded claims.
///
/// Verification is a pure function of the token, the secret, and the provided
/// clock; it performs no I/O.
///
/// # Errors
///
/// Returns an error if:
/// - the token is malformed or contains invalid base64/json,
/// - the header declares an algorithm other than HS256,
/// - the signature does not verify under `secret`,
/// - the current time is at or past `exp`.
pub fn verify_hs256(
    token: &str,
    secret: &[u8],
    now_unix_seconds: i64,
) -> Result<SessionTokenClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let sig_b64 = parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() {
        return Err(Error::TokenFormat);
    }

    let header: SessionTokenHeader = b64d_json(header_b64)?;
    if header.alg != "HS256" {
        return Err(Error::UnsupportedAlg(header.alg));
    }

    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature_bytes = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Base64)?;
    mac(secret, signing_input.as_bytes())?
        .verify_slice(&signature_bytes)
        .map_err(|_| Error::InvalidSignature)?;

    let claims: SessionTokenClaims = b64d_json(claims_b64)?;
    if claims.exp <= now_unix_seconds {
        return Err(Error::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret-not-for-production";
    // Fixed clock so expiry assertions are deterministic.
    const NOW: i64 = 1_700_000_000;

    fn test_claims(sub: &str) -> SessionTokenClaims {
        SessionTokenClaims {
            sub: sub.to_string(),
            iat: NOW,
            exp: NOW + 3600,
        }
    }

    #[test]
    fn round_trip_returns_subject() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("user-123"))?;
        let verified = verify_hs256(&token, SECRET, NOW)?;
        assert_eq!(verified.sub, "user-123");
        assert_eq!(verified.iat, NOW);
        assert_eq!(verified.exp, NOW + 3600);
        Ok(())
    }

    #[test]
    fn issue_sets_lifetime_from_now() -> Result<(), Error> {
        let token = issue_hs256(SECRET, "user-123", 120, NOW)?;
        let verified = verify_hs256(&token, SECRET, NOW + 119)?;
        assert_eq!(verified.sub, "user-123");
        assert_eq!(verified.exp, NOW + 120);
        Ok(())
    }

    #[test]
    fn rejects_at_and_after_expiry() -> Result<(), Error> {
        let token = issue_hs256(SECRET, "user-123", 120, NOW)?;
        // exp is exclusive: a token is invalid the second it expires.
        assert!(matches!(
            verify_hs256(&token, SECRET, NOW + 120),
            Err(Error::Expired)
        ));
        assert!(matches!(
            verify_hs256(&token, SECRET, NOW + 9999),
            Err(Error::Expired)
        ));
        Ok(())
    }

    #[test]
    fn rejects_non_positive_ttl() {
        assert!(matches!(
            issue_hs256(SECRET, "user-123", 0, NOW),
            Err(Error::InvalidTtl)
        ));
        assert!(matches!(
            issue_hs256(SECRET, "user-123", -1, NOW),
            Err(Error::InvalidTtl)
        ));
    }

    #[test]
    fn rejects_wrong_secret() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("user-123"))?;
        let result = verify_hs256(&token, b"some-other-secret", NOW);
        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn rejects_tampered_claims() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims("user-123"))?;
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = b64e_json(&test_claims("user-456"))?;
        parts[1] = &forged;
        let tampered = parts.join(".");
        assert!(matches!(
            verify_hs256(&tampered, SECRET, NOW),
            Err(Error::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            verify_hs256("", SECRET, NOW),
            Err(Error::TokenFormat)
        ));
        assert!(matches!(
            verify_hs256("only-one-segment", SECRET, NOW),
            Err(Error::TokenFormat)
        ));
        assert!(matches!(
            verify_hs256("a.b.c.d", SECRET, NOW),
            Err(Error::TokenFormat)
        ));
        assert!(matches!(
            verify_hs256("!!!.???.###", SECRET, NOW),
            Err(Error::Base64)
        ));
    }

    #[test]
    fn rejects_unsupported_algorithm() -> Result<(), Error> {
        let header = SessionTokenHeader {
            alg: "none".to_string(),
            typ: "JWT".to_string(),
        };
        let header_b64 = b64e_json(&header)?;
        let claims_b64 = b64e_json(&test_claims("user-123"))?;
        let token = format!("{header_b64}.{claims_b64}.AAAA");
        assert!(matches!(
            verify_hs256(&token, SECRET, NOW),
            Err(Error::UnsupportedAlg(alg)) if alg == "none"
        ));
        Ok(())
    }
}
