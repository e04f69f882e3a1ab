use anyhow::{Context, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::models::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // User ID
    pub email: String,
    #[serde(deserialize_with = "deserialize_role")]
    pub role: UserRole,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

// Lenient role parsing: tokens minted by older identity services carry
// capitalized role strings.
fn deserialize_role<'de, D>(deserializer: D) -> Result<UserRole, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let role_str = Option::<String>::deserialize(deserializer)?;

    match role_str.as_deref() {
        Some("instructor") | Some("Instructor") => Ok(UserRole::Instructor),
        Some("admin") | Some("Admin") => Ok(UserRole::Admin),
        Some("student") | Some("Student") => Ok(UserRole::Student),
        _ => Ok(UserRole::Student), // Default to student if role is missing
    }
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims> {
    let mut validation = Validation::new(Algorithm::HS256);

    // Allow for some clock skew
    validation.leeway = 60;
    validation.validate_aud = false;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &validation)
        .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

    fn mint(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_valid_token() {
        let token = mint(&json!({
            "sub": "42",
            "email": "student@example.com",
            "role": "student",
            "exp": 9999999999u64,
            "iat": 1516239022u64,
        }));

        let claims = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn missing_role_defaults_to_student() {
        let token = mint(&json!({
            "sub": "7",
            "email": "who@example.com",
            "role": null,
            "exp": 9999999999u64,
            "iat": 1516239022u64,
        }));

        let claims = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn capitalized_role_strings_are_accepted() {
        let token = mint(&json!({
            "sub": "9",
            "email": "admin@example.com",
            "role": "Admin",
            "exp": 9999999999u64,
            "iat": 1516239022u64,
        }));

        let claims = decode_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn rejects_tampered_signature() {
        let token = mint(&json!({
            "sub": "1",
            "email": "x@example.com",
            "role": "student",
            "exp": 9999999999u64,
            "iat": 1516239022u64,
        }));

        let result = decode_jwt(&token, "a-completely-different-secret-32-chars!!");
        assert!(result.is_err());
    }
}
