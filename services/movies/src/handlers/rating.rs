use axum::Form;
use axum::extract::{Path, State};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use cinema_auth_types::identity::IdentityHeaders;
use cinema_core::flash::FlashMessage;

use crate::error::MoviesServiceError;
use crate::handlers::{RedirectResponse, done, movie_path, recover};
use crate::state::AppState;
use crate::usecase::rating::SubmitRatingUseCase;

#[derive(Debug, Deserialize, Default)]
pub struct RatingForm {
    #[serde(default)]
    pub stars: String,
}

// ── POST /movies/{id}/rating/submit ──────────────────────────────────────────

pub async fn submit_rating(
    jar: CookieJar,
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<RatingForm>,
) -> Result<RedirectResponse, MoviesServiceError> {
    let uc = SubmitRatingUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
    };
    match uc.execute(identity.into(), id, &form.stars).await {
        Ok(outcome) => Ok(done(
            jar,
            Some(FlashMessage::success(outcome.message())),
            &movie_path(id),
        )),
        Err(e) => recover(jar, e, &movie_path(id)),
    }
}
