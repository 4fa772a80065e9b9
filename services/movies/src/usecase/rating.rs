use chrono::Utc;

use cinema_domain::rating::Stars;

use crate::domain::repository::{MovieRepository, RatingRepository};
use crate::domain::types::{Actor, Rating};
use crate::error::MoviesServiceError;

/// Whether a submission created the caller's rating or replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Created(Stars),
    Updated(Stars),
}

impl RatingOutcome {
    pub fn message(self) -> String {
        match self {
            Self::Created(stars) => format!("You have rated this movie {stars} stars."),
            Self::Updated(stars) => format!("Your rating has been updated to {stars} stars."),
        }
    }
}

// ── SubmitRating ─────────────────────────────────────────────────────────────

pub struct SubmitRatingUseCase<M: MovieRepository, R: RatingRepository> {
    pub movies: M,
    pub ratings: R,
}

impl<M: MovieRepository, R: RatingRepository> SubmitRatingUseCase<M, R> {
    /// `raw_stars` is the submitted form value; anything other than a plain
    /// integer from 1 to 5 is rejected before any write.
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        raw_stars: &str,
    ) -> Result<RatingOutcome, MoviesServiceError> {
        if self.movies.find_by_id(movie_id).await?.is_none() {
            return Err(MoviesServiceError::MovieNotFound);
        }
        let stars = Stars::parse(raw_stars).map_err(|_| MoviesServiceError::InvalidStars)?;
        let now = Utc::now();

        match self.ratings.find(movie_id, actor.user_id).await? {
            Some(_) => {
                self.ratings
                    .update_stars(movie_id, actor.user_id, stars, now)
                    .await?;
                tracing::debug!(
                    movie_id,
                    user_id = %actor.user_id,
                    stars = stars.get(),
                    "rating updated"
                );
                Ok(RatingOutcome::Updated(stars))
            }
            None => {
                self.ratings
                    .insert(&Rating {
                        movie_id,
                        user_id: actor.user_id,
                        stars,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
                tracing::debug!(
                    movie_id,
                    user_id = %actor.user_id,
                    stars = stars.get(),
                    "rating created"
                );
                Ok(RatingOutcome::Created(stars))
            }
        }
    }
}
