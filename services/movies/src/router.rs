use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use cinema_core::health::healthz;
use cinema_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{get_orders, get_region, signup, signup_form, update_region},
    health::readyz,
    movie::{get_movie, list_movies},
    petition::{
        cast_vote, confirm_delete_petition, create_petition, delete_petition, get_petition,
        list_petitions, petition_form,
    },
    rating::submit_rating,
    review::{
        create_reply, create_review, delete_reply, delete_review, edit_review, edit_review_form,
    },
    trending::get_trending,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Catalog
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(get_movie))
        // Reviews
        .route("/movies/{id}/review/create", post(create_review))
        .route(
            "/movies/{id}/review/{review_id}/edit",
            get(edit_review_form).post(edit_review),
        )
        .route("/movies/{id}/review/{review_id}/delete", post(delete_review))
        // Replies
        .route(
            "/movies/{id}/review/{review_id}/reply/create",
            post(create_reply),
        )
        .route("/movies/{id}/reply/{reply_id}/delete", post(delete_reply))
        // Ratings
        .route("/movies/{id}/rating/submit", post(submit_rating))
        // Petitions
        .route("/movies/petitions", get(list_petitions))
        .route(
            "/movies/petitions/create",
            get(petition_form).post(create_petition),
        )
        .route("/movies/petitions/{petition_id}", get(get_petition))
        .route("/movies/petitions/{petition_id}/vote", post(cast_vote))
        .route(
            "/movies/petitions/{petition_id}/delete",
            get(confirm_delete_petition).post(delete_petition),
        )
        // Trending
        .route("/trending", get(get_trending))
        // Accounts
        .route("/accounts/signup", get(signup_form).post(signup))
        .route("/accounts/region", get(get_region).post(update_region))
        .route("/accounts/orders", get(get_orders))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
