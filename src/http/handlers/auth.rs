use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{generate_jwt, verify_password},
    db::user::{get::get_credentials, post::NewUser, create_user},
    errors::AppError,
    models::user::{Role, User},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct SigninPayload {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn validate_signup(payload: &SignupPayload) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("First and last name are required".into()));
    }
    Ok(())
}

pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    validate_signup(&payload).map_err(|e| {
        tracing::warn!("Rejected signup: {}", e);
        e.to_response()
    })?;

    let new_user = NewUser {
        email: payload.email,
        password: payload.password,
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        role: payload.role,
    };

    let user = create_user(new_user, state.postgres().clone())
        .await
        .map_err(|e| {
            tracing::error!("Error creating user: {}", e);
            e.to_response()
        })?;

    let token = generate_jwt(&user, &state.config.jwt_secret).map_err(|e| {
        tracing::error!("Error generating token: {}", e);
        e.to_response()
    })?;

    tracing::info!("User signed up: {} ({:?})", user.slug, user.role);
    Ok(Json(AuthResponse { token, user }))
}

pub async fn signin_handler(
    State(state): State<AppState>,
    Json(payload): Json<SigninPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let credentials = get_credentials(&payload.email, state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error fetching credentials: {}", e);
            e.to_response()
        })?;

    let Some(credentials) = credentials.filter(|c| verify_password(&payload.password, &c.password_hash))
    else {
        tracing::warn!("Failed sign-in for {}", payload.email);
        return Err(AppError::Unauthorized("Invalid email or password".into()).to_response());
    };

    let token = generate_jwt(&credentials.user, &state.config.jwt_secret).map_err(|e| {
        tracing::error!("Error generating token: {}", e);
        e.to_response()
    })?;

    tracing::info!("User signed in: {}", credentials.user.slug);
    Ok(Json(AuthResponse {
        token,
        user: credentials.user,
    }))
}
