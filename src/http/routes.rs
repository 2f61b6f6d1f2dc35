use axum::{
    Router,
    routing::{get, post},
};

use crate::{http::handlers::*, state::AppState};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/signin", post(signin_handler))
        .route(
            "/profile",
            get(get_profile_handler).patch(update_profile_handler),
        )
        .route("/places", get(list_places_handler).post(create_place_handler))
        .route(
            "/places/{slug}",
            get(get_place_handler).put(update_place_handler),
        )
        .route("/places/{slug}/reviews", get(get_place_reviews_handler))
        .route("/places/{slug}/analytics", get(get_place_analytics_handler))
        .route(
            "/reviews",
            get(list_reviews_handler).post(create_review_handler),
        )
        .route("/reviews/{slug}", get(get_review_handler))
        .route("/reviews/{slug}/vote", get(get_vote_handler))
        .route("/reviews/{slug}/vote/{vote_type}", post(vote_handler))
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route("/events/{slug}", get(get_event_handler))
        .route("/gourmands", get(list_gourmands_handler))
        .route("/gourmands/{slug}", get(get_gourmand_handler))
        .route("/gourmands/{slug}/reviews", get(get_gourmand_reviews_handler))
        .route("/nps/tags", get(list_tags_handler))
        .with_state(state)
}
