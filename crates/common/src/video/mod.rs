//! Video-room token issuance
//!
//! Builds the signed join tokens the third-party conferencing provider
//! (JaaS) expects: HS256 over the provider's base64-encoded shared secret,
//! with the SDK key id in the JWT header. Issuance is pure; nothing is
//! written to the store.

use crate::config::VideoConfig;
use crate::db::models::User;
use crate::errors::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token audience required by the provider
pub const JAAS_AUDIENCE: &str = "jitsi";

/// Token subject required by the provider
pub const JAAS_SUBJECT: &str = "meet.jit.si";

/// Caller identity embedded in the join token
#[derive(Debug, Serialize, Deserialize)]
pub struct JaasUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JaasContext {
    pub user: JaasUser,
}

/// Claim bundle the provider's widget validates
#[derive(Debug, Serialize, Deserialize)]
pub struct JaasClaims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    pub room: String,
    pub exp: i64,
    pub iat: i64,
    pub context: JaasContext,
}

/// Issues signed join tokens for the provider's video rooms
pub struct JaasTokenIssuer {
    app_id: String,
    api_key_id: String,
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl JaasTokenIssuer {
    /// Build an issuer from configuration.
    ///
    /// The shared secret is stored base64 encoded as handed out by the
    /// provider and decoded here once.
    pub fn from_config(config: &VideoConfig) -> Result<Self> {
        let app_id = config.app_id.clone().ok_or_else(|| AppError::Configuration {
            message: "video.app_id is not configured".to_string(),
        })?;
        let api_key_id = config
            .api_key_id
            .clone()
            .ok_or_else(|| AppError::Configuration {
                message: "video.api_key_id is not configured".to_string(),
            })?;
        let encoded_secret = config
            .app_secret
            .as_deref()
            .ok_or_else(|| AppError::Configuration {
                message: "video.app_secret is not configured".to_string(),
            })?;

        let secret = BASE64
            .decode(encoded_secret)
            .map_err(|e| AppError::Configuration {
                message: format!("video.app_secret is not valid base64: {}", e),
            })?;

        Ok(Self {
            app_id,
            api_key_id,
            encoding_key: EncodingKey::from_secret(&secret),
            ttl_secs: config.token_ttl_secs as i64,
        })
    }

    /// Issue a join token for a room on behalf of a user
    pub fn issue(&self, room_name: &str, user: &User) -> Result<String> {
        let now = Utc::now();

        let claims = JaasClaims {
            aud: JAAS_AUDIENCE.to_string(),
            iss: self.app_id.clone(),
            sub: JAAS_SUBJECT.to_string(),
            room: room_name.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            context: JaasContext {
                user: JaasUser {
                    id: user.id.to_string(),
                    name: user.name.clone(),
                    email: user.email.clone(),
                },
            },
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.api_key_id.clone());

        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to sign join token: {}", e),
        })
    }
}

/// Generate a room name for a newly scheduled meeting
pub fn room_name_for_idea(idea_id: Uuid) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!("odrlab-{}-{}", idea_id.simple(), &nonce[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

    fn test_config() -> VideoConfig {
        VideoConfig {
            app_id: Some("vpaas-magic-cookie-0000".to_string()),
            api_key_id: Some("vpaas-magic-cookie-0000/abcdef".to_string()),
            app_secret: Some(BASE64.encode(b"super-secret-signing-key")),
            token_ttl_secs: 3600,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            password_hash: "unused".to_string(),
            role: "mentor".to_string(),
            phone: None,
            city: None,
            country: None,
            institution: None,
            highest_education: None,
            usage_note: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let issuer = JaasTokenIssuer::from_config(&test_config()).unwrap();
        let user = test_user();

        let token = issuer.issue("odrlab-room-1", &user).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JAAS_AUDIENCE]);
        let decoded = decode::<JaasClaims>(
            &token,
            &DecodingKey::from_secret(b"super-secret-signing-key"),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims.room, "odrlab-room-1");
        assert_eq!(decoded.claims.iss, "vpaas-magic-cookie-0000");
        assert_eq!(decoded.claims.sub, JAAS_SUBJECT);
        assert_eq!(decoded.claims.context.user.id, user.id.to_string());
        assert_eq!(decoded.claims.context.user.email, user.email);
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn test_header_carries_sdk_key_id() {
        let issuer = JaasTokenIssuer::from_config(&test_config()).unwrap();
        let token = issuer.issue("room", &test_user()).unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(
            header.kid.as_deref(),
            Some("vpaas-magic-cookie-0000/abcdef")
        );
    }

    #[test]
    fn test_missing_configuration_rejected() {
        let mut config = test_config();
        config.app_secret = None;
        assert!(matches!(
            JaasTokenIssuer::from_config(&config),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_malformed_secret_rejected() {
        let mut config = test_config();
        config.app_secret = Some("not!!valid//base64===".to_string());
        assert!(matches!(
            JaasTokenIssuer::from_config(&config),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_room_names_are_unique_per_call() {
        let idea = Uuid::new_v4();
        let a = room_name_for_idea(idea);
        let b = room_name_for_idea(idea);
        assert!(a.starts_with("odrlab-"));
        assert_ne!(a, b);
    }
}
