use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use cinema_auth_types::identity::IdentityHeaders;

use crate::error::MoviesServiceError;
use crate::handlers::movie::{MovieResponse, ReviewResponse};
use crate::handlers::{RedirectResponse, done, movie_path, page, recover};
use crate::state::AppState;
use crate::usecase::reply::{CreateReplyUseCase, DeleteReplyUseCase};
use crate::usecase::review::{
    CreateReviewUseCase, DeleteReviewUseCase, EditReviewUseCase, GetReviewForEditUseCase,
};

#[derive(Debug, Deserialize, Default)]
pub struct CommentForm {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct EditReviewContext {
    pub movie: MovieResponse,
    pub review: ReviewResponse,
}

// ── POST /movies/{id}/review/create ──────────────────────────────────────────

pub async fn create_review(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<CommentForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = CreateReviewUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    };
    match uc.execute(identity.into(), id, &form.comment).await {
        Ok(_) => Ok(done(jar, None, &movie_path(id))),
        Err(e) => recover(jar, e, &movie_path(id)),
    }
}

// ── GET /movies/{id}/review/{review_id}/edit ─────────────────────────────────

pub async fn edit_review_form(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i32, i32)>,
) -> Result<Response, MoviesServiceError> {
    let uc = GetReviewForEditUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    };
    let response = match uc.execute(identity.into(), id, review_id).await {
        Ok((movie, review)) => page(
            jar,
            "Edit Review",
            EditReviewContext {
                movie: movie.into(),
                review: review.into(),
            },
        )
        .into_response(),
        Err(e) => recover(jar, e, &movie_path(id))?.into_response(),
    };
    Ok(response)
}

// ── POST /movies/{id}/review/{review_id}/edit ────────────────────────────────

pub async fn edit_review(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i32, i32)>,
    Form(form): Form<CommentForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = EditReviewUseCase {
        reviews: state.review_repo(),
    };
    match uc
        .execute(identity.into(), id, review_id, &form.comment)
        .await
    {
        Ok(()) => Ok(done(jar, None, &movie_path(id))),
        Err(e) => recover(jar, e, &movie_path(id)),
    }
}

// ── POST /movies/{id}/review/{review_id}/delete ──────────────────────────────

pub async fn delete_review(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i32, i32)>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = DeleteReviewUseCase {
        reviews: state.review_repo(),
    };
    match uc.execute(identity.into(), id, review_id).await {
        Ok(()) => Ok(done(jar, None, &movie_path(id))),
        Err(e) => recover(jar, e, &movie_path(id)),
    }
}

// ── POST /movies/{id}/review/{review_id}/reply/create ────────────────────────

pub async fn create_reply(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i32, i32)>,
    Form(form): Form<CommentForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = CreateReplyUseCase {
        reviews: state.review_repo(),
        replies: state.reply_repo(),
    };
    match uc
        .execute(identity.into(), id, review_id, &form.comment)
        .await
    {
        Ok(_) => Ok(done(jar, None, &movie_path(id))),
        Err(e) => recover(jar, e, &movie_path(id)),
    }
}

// ── POST /movies/{id}/reply/{reply_id}/delete ────────────────────────────────

pub async fn delete_reply(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, reply_id)): Path<(i32, i32)>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = DeleteReplyUseCase {
        reviews: state.review_repo(),
        replies: state.reply_repo(),
    };
    match uc.execute(identity.into(), id, reply_id).await {
        Ok(()) => Ok(done(jar, None, &movie_path(id))),
        Err(e) => recover(jar, e, &movie_path(id)),
    }
}
