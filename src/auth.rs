use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        User,
        user::{Claims, Role},
    },
    state::AppState,
};

/// Identity of the caller, taken from a bearer token.
pub struct AuthClaims(pub Claims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    (
                        StatusCode::UNAUTHORIZED,
                        "Missing or invalid Authorization header".into(),
                    )
                })?;

        AuthClaims::from_token(bearer.token(), &state.config.jwt_secret)
    }
}

impl AuthClaims {
    pub fn from_token(token: &str, secret: &str) -> Result<Self, (StatusCode, String)> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token".into()))?;

        Ok(Self(token_data.claims))
    }

    pub fn user_id(&self) -> Result<Uuid, (StatusCode, String)> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".into()).to_response())
    }

    pub fn require_role(&self, role: Role) -> Result<Uuid, (StatusCode, String)> {
        if self.0.role != role {
            return Err(AppError::Forbidden(format!(
                "Only {} users can do this",
                match role {
                    Role::Gourmand => "gourmand",
                    Role::Owner => "owner",
                }
            ))
            .to_response());
        }
        self.user_id()
    }
}

pub fn generate_jwt(user: &User, secret: &str) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(AppError::JwtError)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
