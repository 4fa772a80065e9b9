use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use cinema_core::flash::FlashMessage;
use cinema_domain::form::{CommentError, FieldErrors};

/// Movies service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum MoviesServiceError {
    #[error("movie not found")]
    MovieNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("reply not found")]
    ReplyNotFound,
    #[error("petition not found")]
    PetitionNotFound,
    #[error("comment must not be empty")]
    EmptyComment,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("invalid stars")]
    InvalidStars,
    #[error("invalid vote type")]
    InvalidVoteType,
    #[error("invalid region")]
    InvalidRegion,
    #[error("invalid form")]
    InvalidForm(FieldErrors),
    #[error("not the review owner")]
    NotReviewOwner,
    #[error("not the reply owner")]
    NotReplyOwner,
    #[error("not allowed to delete petition")]
    NotPetitionOwner,
    #[error("username already taken")]
    UsernameTaken,
    #[error("conflicting write")]
    SaveConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MoviesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MovieNotFound => "MOVIE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::ReplyNotFound => "REPLY_NOT_FOUND",
            Self::PetitionNotFound => "PETITION_NOT_FOUND",
            Self::EmptyComment => "EMPTY_COMMENT",
            Self::CommentTooLong { .. } => "COMMENT_TOO_LONG",
            Self::InvalidStars => "INVALID_STARS",
            Self::InvalidVoteType => "INVALID_VOTE_TYPE",
            Self::InvalidRegion => "INVALID_REGION",
            Self::InvalidForm(_) => "INVALID_FORM",
            Self::NotReviewOwner => "NOT_REVIEW_OWNER",
            Self::NotReplyOwner => "NOT_REPLY_OWNER",
            Self::NotPetitionOwner => "NOT_PETITION_OWNER",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::SaveConflict => "SAVE_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// The message shown to the user after a redirect, for errors a page
    /// handler can recover from. `None` means the error is rendered as a
    /// JSON error response instead.
    pub fn flash(&self) -> Option<FlashMessage> {
        let text = match self {
            Self::EmptyComment => "Comment cannot be empty.".to_owned(),
            Self::CommentTooLong { max } => {
                format!("Comment must be at most {max} characters.")
            }
            Self::InvalidStars => "Please select a valid rating (1-5 stars).".to_owned(),
            Self::InvalidVoteType => "Invalid vote type.".to_owned(),
            Self::InvalidRegion => "Please select a valid region.".to_owned(),
            Self::NotReviewOwner => "You can only change your own reviews.".to_owned(),
            Self::NotReplyOwner => "You can only delete your own replies.".to_owned(),
            Self::NotPetitionOwner => {
                "You do not have permission to delete this petition.".to_owned()
            }
            Self::SaveConflict => "Failed to save your changes. Please try again.".to_owned(),
            _ => return None,
        };
        Some(FlashMessage::error(text))
    }
}

impl From<CommentError> for MoviesServiceError {
    fn from(e: CommentError) -> Self {
        match e {
            CommentError::Empty => Self::EmptyComment,
            CommentError::TooLong { max } => Self::CommentTooLong { max },
        }
    }
}

impl IntoResponse for MoviesServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MovieNotFound
            | Self::ReviewNotFound
            | Self::ReplyNotFound
            | Self::PetitionNotFound => StatusCode::NOT_FOUND,
            Self::EmptyComment
            | Self::CommentTooLong { .. }
            | Self::InvalidStars
            | Self::InvalidVoteType
            | Self::InvalidRegion => StatusCode::BAD_REQUEST,
            Self::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotReviewOwner | Self::NotReplyOwner | Self::NotPetitionOwner => {
                StatusCode::FORBIDDEN
            }
            Self::UsernameTaken | Self::SaveConflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::InvalidForm(ref errors) = self {
            body["errors"] = serde_json::json!(errors);
        }
        (status, axum::Json(body)).into_response()
    }
}
