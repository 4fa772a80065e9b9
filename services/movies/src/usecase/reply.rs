use chrono::Utc;

use cinema_domain::form::{REPLY_COMMENT_MAX, clean_comment};

use crate::domain::repository::{ReplyRepository, ReviewRepository};
use crate::domain::types::Actor;
use crate::error::MoviesServiceError;

// ── CreateReply ──────────────────────────────────────────────────────────────

pub struct CreateReplyUseCase<V: ReviewRepository, P: ReplyRepository> {
    pub reviews: V,
    pub replies: P,
}

impl<V: ReviewRepository, P: ReplyRepository> CreateReplyUseCase<V, P> {
    /// Returns the new reply id.
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        review_id: i32,
        comment: &str,
    ) -> Result<i32, MoviesServiceError> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .filter(|r| r.movie_id == movie_id)
            .ok_or(MoviesServiceError::ReviewNotFound)?;
        let comment = clean_comment(comment, REPLY_COMMENT_MAX)?;
        self.replies
            .create(review.id, actor.user_id, &comment, Utc::now())
            .await
    }
}

// ── DeleteReply ──────────────────────────────────────────────────────────────

pub struct DeleteReplyUseCase<V: ReviewRepository, P: ReplyRepository> {
    pub reviews: V,
    pub replies: P,
}

impl<V: ReviewRepository, P: ReplyRepository> DeleteReplyUseCase<V, P> {
    pub async fn execute(
        &self,
        actor: Actor,
        movie_id: i32,
        reply_id: i32,
    ) -> Result<(), MoviesServiceError> {
        let reply = self
            .replies
            .find_by_id(reply_id)
            .await?
            .ok_or(MoviesServiceError::ReplyNotFound)?;
        let on_movie = self
            .reviews
            .find_by_id(reply.review_id)
            .await?
            .is_some_and(|r| r.movie_id == movie_id);
        if !on_movie {
            return Err(MoviesServiceError::ReplyNotFound);
        }
        if reply.user_id != actor.user_id {
            return Err(MoviesServiceError::NotReplyOwner);
        }
        self.replies.delete(reply.id).await
    }
}
