use chrono::Utc;

use cinema_domain::form::{REVIEW_COMMENT_MAX, clean_comment};

use crate::domain::repository::{MovieRepository, ReviewRepository};
use crate::domain::types::{Actor, Movie, Review};
use crate::error::MoviesServiceError;

/// Load a review and check it belongs to `movie_id`.
async fn review_of_movie<V: ReviewRepository>(
    reviews: &V,
    movie_id: i32,
    review_id: i32,
) -> Result<Review, MoviesServiceError> {
    reviews
        .find_by_id(review_id)
        .await?
        .filter(|r| r.movie_id == movie_id)
        .ok_or(MoviesServiceError::ReviewNotFound)
}

/// Load a review of `movie_id` that `actor` wrote.
async fn owned_review<V: ReviewRepository>(
    reviews: &V,
    movie_id: i32,
    review_id: i32,
    actor: Actor,
) -> Result<Review, MoviesServiceError> {
    let review = review_of_movie(reviews, movie_id, review_id).await?;
    if review.user_id != actor.user_id {
        return Err(MoviesServiceError::NotReviewOwner);
    }
    Ok(review)
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewUseCase<M: MovieRepository, V: ReviewRepository> {
    pub movies: M,
    pub reviews: V,
}

impl<M: MovieRepository, V: ReviewRepository> CreateReviewUseCase<M, V> {
    /// Returns the new review id.
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        comment: &str,
    ) -> Result<i32, MoviesServiceError> {
        if self.movies.find_by_id(movie_id).await?.is_none() {
            return Err(MoviesServiceError::MovieNotFound);
        }
        let comment = clean_comment(comment, REVIEW_COMMENT_MAX)?;
        self.reviews
            .create(movie_id, actor.user_id, &comment, Utc::now())
            .await
    }
}

// ── GetReviewForEdit ─────────────────────────────────────────────────────────

pub struct GetReviewForEditUseCase<M: MovieRepository, V: ReviewRepository> {
    pub movies: M,
    pub reviews: V,
}

impl<M: MovieRepository, V: ReviewRepository> GetReviewForEditUseCase<M, V> {
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        review_id: i32,
    ) -> Result<(Movie, Review), MoviesServiceError> {
        let movie = self
            .movies
            .find_by_id(movie_id)
            .await?
            .ok_or(MoviesServiceError::MovieNotFound)?;
        let review = owned_review(&self.reviews, movie_id, review_id, actor).await?;
        Ok((movie, review))
    }
}

// ── EditReview ───────────────────────────────────────────────────────────────

pub struct EditReviewUseCase<V: ReviewRepository> {
    pub reviews: V,
}

impl<V: ReviewRepository> EditReviewUseCase<V> {
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        review_id: i32,
        comment: &str,
    ) -> Result<(), MoviesServiceError> {
        let review = owned_review(&self.reviews, movie_id, review_id, actor).await?;
        let comment = clean_comment(comment, REVIEW_COMMENT_MAX)?;
        self.reviews.update_comment(review.id, &comment).await
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<V: ReviewRepository> {
    pub reviews: V,
}

impl<V: ReviewRepository> DeleteReviewUseCase<V> {
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        review_id: i32,
    ) -> Result<(), MoviesServiceError> {
        let review = owned_review(&self.reviews, movie_id, review_id, actor).await?;
        self.reviews.delete_with_replies(review.id).await?;
        tracing::debug!(review_id, movie_id, "review deleted");
        Ok(())
    }
}
