use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Subset of the access-token payload the client cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Expiry as a unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Audience, a string or a list.
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.exp
            .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
    }
}

/// Reads the payload without checking the signature: the client never holds
/// the server's secret, it only needs `sub` and `exp`.
pub fn read_unverified(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    #[test]
    fn reads_claims_signed_with_unknown_secret() {
        let token = encode(
            &Header::default(),
            &json!({"sub": "17", "aud": ["fastapi-users:auth"], "exp": 1_900_000_000}),
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .expect("sign");
        let claims = read_unverified(&token).expect("decode claims");
        assert_eq!(claims.sub, "17");
        assert_eq!(
            claims.expires_at().map(|t| t.unix_timestamp()),
            Some(1_900_000_000)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(read_unverified("definitely.not.jwt").is_err());
        assert!(read_unverified("opaque-token").is_err());
    }
}
