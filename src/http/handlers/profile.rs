use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthClaims,
    db::{
        review::get_reviews_by_author,
        user::{
            get::{get_gourmand_profile, get_owner_profile, get_user_by_id},
            patch::{ProfileUpdate, update_profile},
        },
    },
    engine::{dashboard::owner_dashboard, nps::ReportPeriod},
    errors::AppError,
    models::{
        Review, User,
        nps::OwnerDashboard,
        user::{GourmandProfile, OwnerProfile, Role},
    },
    state::AppState,
};

#[derive(Deserialize)]
pub struct ProfileQuery {
    pub period: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileView {
    Gourmand {
        user: User,
        profile: GourmandProfile,
        reviews: Vec<Review>,
    },
    Owner {
        user: User,
        profile: OwnerProfile,
        dashboard: OwnerDashboard,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
}

pub async fn get_profile_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileView>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    let log_err = |e: AppError| {
        tracing::error!("Error building profile for {}: {}", user_id, e);
        e.to_response()
    };

    let user = get_user_by_id(user_id, state.postgres()).await.map_err(log_err)?;

    let view = match user.role {
        Role::Gourmand => {
            let profile = get_gourmand_profile(user_id, state.postgres())
                .await
                .map_err(log_err)?;
            let reviews = get_reviews_by_author(user_id, state.postgres())
                .await
                .map_err(log_err)?;
            ProfileView::Gourmand {
                user,
                profile,
                reviews,
            }
        }
        Role::Owner => {
            let profile = get_owner_profile(user_id, state.postgres())
                .await
                .map_err(log_err)?;
            let period = ReportPeriod::parse(query.period.as_deref());
            let dashboard =
                owner_dashboard(&state.store, &state.summaries, user_id, period, Utc::now())
                    .await
                    .map_err(log_err)?;
            ProfileView::Owner {
                user,
                profile,
                dashboard,
            }
        }
    };

    tracing::info!("Retrieved profile for user {}", user_id);
    Ok(Json(view))
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<ProfilePatch>,
) -> Result<StatusCode, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    let update = ProfileUpdate {
        first_name: payload.first_name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        last_name: payload.last_name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        description: payload.description,
    };

    update_profile(user_id, claims.0.role, update, state.postgres().clone())
        .await
        .map_err(|e| {
            tracing::error!("Error updating profile: {}", e);
            e.to_response()
        })?;

    Ok(StatusCode::NO_CONTENT)
}
