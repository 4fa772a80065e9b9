use axum::extract::{Path, Query, State};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cinema_auth_types::identity::IdentityHeaders;
use cinema_domain::rating::Stars;

use crate::domain::types::{Movie, Reply, Review};
use crate::error::MoviesServiceError;
use crate::handlers::{PageResponse, page};
use crate::state::AppState;
use crate::usecase::movie::{GetMovieDetailUseCase, ListMoviesUseCase, ReviewThread};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub description: String,
    pub image: String,
}

impl From<Movie> for MovieResponse {
    fn from(m: Movie) -> Self {
        Self {
            id: m.id,
            name: m.name,
            price: m.price,
            description: m.description,
            image: m.image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub id: i32,
    pub user_id: Uuid,
    pub username: String,
    pub comment: String,
    #[serde(serialize_with = "cinema_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Reply> for ReplyResponse {
    fn from(r: Reply) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            username: r.username,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: Uuid,
    pub username: String,
    pub comment: String,
    #[serde(serialize_with = "cinema_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<ReplyResponse>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            username: r.username,
            comment: r.comment,
            created_at: r.created_at,
            replies: vec![],
        }
    }
}

impl From<ReviewThread> for ReviewResponse {
    fn from(thread: ReviewThread) -> Self {
        Self {
            replies: thread.replies.into_iter().map(ReplyResponse::from).collect(),
            ..Self::from(thread.review)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListContext {
    pub search: Option<String>,
    pub movies: Vec<MovieResponse>,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailContext {
    pub movie: MovieResponse,
    pub reviews: Vec<ReviewResponse>,
    pub average_rating: f64,
    pub rating_count: u64,
    pub user_rating: Option<Stars>,
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct MovieListQuery {
    pub search: Option<String>,
}

// ── GET /movies ──────────────────────────────────────────────────────────────

pub async fn list_movies(
    jar: CookieJar,
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<PageResponse<MovieListContext>, MoviesServiceError> {
    let uc = ListMoviesUseCase {
        movies: state.movie_repo(),
    };
    let movies = uc.execute(query.search.as_deref()).await?;
    Ok(page(
        jar,
        "Movies",
        MovieListContext {
            search: query.search,
            movies: movies.into_iter().map(MovieResponse::from).collect(),
        },
    ))
}

// ── GET /movies/{id} ─────────────────────────────────────────────────────────

pub async fn get_movie(
    jar: CookieJar,
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<PageResponse<MovieDetailContext>, MoviesServiceError> {
    let uc = GetMovieDetailUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
        replies: state.reply_repo(),
        ratings: state.rating_repo(),
    };
    let detail = uc.execute(id, identity.map(|i| i.user_id)).await?;
    let title = detail.movie.name.clone();
    Ok(page(
        jar,
        title,
        MovieDetailContext {
            movie: detail.movie.into(),
            reviews: detail.reviews.into_iter().map(ReviewResponse::from).collect(),
            average_rating: detail.rating.average,
            rating_count: detail.rating.count,
            user_rating: detail.user_rating,
        },
    ))
}
