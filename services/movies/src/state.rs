use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccountRepository, DbMovieRepository, DbOrderRepository, DbPetitionRepository,
    DbProfileRepository, DbRatingRepository, DbReplyRepository, DbReviewRepository,
    DbTrendingRepository, DbVoteRepository,
};
use crate::infra::password::Argon2Hasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn movie_repo(&self) -> DbMovieRepository {
        DbMovieRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn reply_repo(&self) -> DbReplyRepository {
        DbReplyRepository {
            db: self.db.clone(),
        }
    }

    pub fn rating_repo(&self) -> DbRatingRepository {
        DbRatingRepository {
            db: self.db.clone(),
        }
    }

    pub fn petition_repo(&self) -> DbPetitionRepository {
        DbPetitionRepository {
            db: self.db.clone(),
        }
    }

    pub fn vote_repo(&self) -> DbVoteRepository {
        DbVoteRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn trending_repo(&self) -> DbTrendingRepository {
        DbTrendingRepository {
            db: self.db.clone(),
        }
    }

    pub fn password_hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }
}
