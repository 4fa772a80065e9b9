use std::collections::HashMap;

use uuid::Uuid;

use cinema_domain::rating::{RatingSummary, Stars};

use crate::domain::repository::{
    MovieRepository, RatingRepository, ReplyRepository, ReviewRepository,
};
use crate::domain::types::{Movie, Reply, Review};
use crate::error::MoviesServiceError;

// ── ListMovies ───────────────────────────────────────────────────────────────

pub struct ListMoviesUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> ListMoviesUseCase<M> {
    /// A blank search term lists the whole catalog.
    pub async fn execute(&self, search: Option<&str>) -> Result<Vec<Movie>, MoviesServiceError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.movies.list(search).await
    }
}

// ── GetMovieDetail ───────────────────────────────────────────────────────────

/// A review with its replies, oldest first.
#[derive(Debug, Clone)]
pub struct ReviewThread {
    pub review: Review,
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub movie: Movie,
    pub reviews: Vec<ReviewThread>,
    pub rating: RatingSummary,
    /// The caller's own rating, when signed in and rated.
    pub user_rating: Option<Stars>,
}

pub struct GetMovieDetailUseCase<M, V, P, R>
where
    M: MovieRepository,
    V: ReviewRepository,
    P: ReplyRepository,
    R: RatingRepository,
{
    pub movies: M,
    pub reviews: V,
    pub replies: P,
    pub ratings: R,
}

impl<M, V, P, R> GetMovieDetailUseCase<M, V, P, R>
where
    M: MovieRepository,
    V: ReviewRepository,
    P: ReplyRepository,
    R: RatingRepository,
{
    pub async fn execute(
        &self,
        movie_id: i32,
        viewer: Option<Uuid>,
    ) -> Result<MovieDetail, MoviesServiceError> {
        let movie = self
            .movies
            .find_by_id(movie_id)
            .await?
            .ok_or(MoviesServiceError::MovieNotFound)?;

        let reviews = self.reviews.list_by_movie(movie_id).await?;
        let review_ids: Vec<i32> = reviews.iter().map(|r| r.id).collect();
        let mut replies_by_review: HashMap<i32, Vec<Reply>> = HashMap::new();
        for reply in self.replies.list_by_reviews(&review_ids).await? {
            replies_by_review
                .entry(reply.review_id)
                .or_default()
                .push(reply);
        }
        let reviews = reviews
            .into_iter()
            .map(|review| ReviewThread {
                replies: replies_by_review.remove(&review.id).unwrap_or_default(),
                review,
            })
            .collect();

        let rating = self.ratings.summary(movie_id).await?;
        let user_rating = match viewer {
            Some(user_id) => self
                .ratings
                .find(movie_id, user_id)
                .await?
                .map(|r| r.stars),
            None => None,
        };

        Ok(MovieDetail {
            movie,
            reviews,
            rating,
            user_rating,
        })
    }
}
