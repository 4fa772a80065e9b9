#![allow(async_fn_in_trait)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cinema_domain::rating::{RatingSummary, Stars};
use cinema_domain::region::Region;
use cinema_domain::vote::{VoteCounts, VoteDirection};

use crate::domain::types::{
    Account, Movie, NewAccount, NewPetition, Order, Petition, Profile, Rating, Reply, Review,
    TrendingEntry,
};
use crate::error::MoviesServiceError;

/// Repository for user accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_username(&self, username: &str)
    -> Result<Option<Account>, MoviesServiceError>;

    /// Insert the user and their profile atomically.
    /// Returns `UsernameTaken` when the username unique constraint fires.
    async fn create_with_profile(&self, account: &NewAccount) -> Result<(), MoviesServiceError>;
}

/// Repository for the one-to-one region profile of a user.
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, MoviesServiceError>;

    /// Create the profile or overwrite its region.
    async fn upsert_region(
        &self,
        user_id: Uuid,
        region: Region,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MoviesServiceError>;
}

/// Repository for the movie catalog (read-only for end users).
pub trait MovieRepository: Send + Sync {
    /// All movies ordered by name, optionally restricted to names containing
    /// `search` (case-insensitive).
    async fn list(&self, search: Option<&str>) -> Result<Vec<Movie>, MoviesServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, MoviesServiceError>;
}

/// Repository for movie reviews.
pub trait ReviewRepository: Send + Sync {
    /// Reviews of a movie, oldest first.
    async fn list_by_movie(&self, movie_id: i32) -> Result<Vec<Review>, MoviesServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, MoviesServiceError>;

    /// Returns the new review id.
    async fn create(
        &self,
        movie_id: i32,
        user_id: Uuid,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, MoviesServiceError>;

    async fn update_comment(&self, id: i32, comment: &str) -> Result<(), MoviesServiceError>;

    /// Delete a review and every reply to it.
    async fn delete_with_replies(&self, id: i32) -> Result<(), MoviesServiceError>;
}

/// Repository for replies to reviews.
pub trait ReplyRepository: Send + Sync {
    /// Replies to any of `review_ids`, oldest first.
    async fn list_by_reviews(&self, review_ids: &[i32]) -> Result<Vec<Reply>, MoviesServiceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Reply>, MoviesServiceError>;

    /// Returns the new reply id.
    async fn create(
        &self,
        review_id: i32,
        user_id: Uuid,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, MoviesServiceError>;

    async fn delete(&self, id: i32) -> Result<(), MoviesServiceError>;
}

/// Repository for star ratings. One row per (movie, user).
pub trait RatingRepository: Send + Sync {
    async fn find(&self, movie_id: i32, user_id: Uuid)
    -> Result<Option<Rating>, MoviesServiceError>;

    /// Returns `SaveConflict` when a concurrent insert won the race.
    async fn insert(&self, rating: &Rating) -> Result<(), MoviesServiceError>;

    /// Returns `SaveConflict` when the rating row no longer exists.
    async fn update_stars(
        &self,
        movie_id: i32,
        user_id: Uuid,
        stars: Stars,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MoviesServiceError>;

    async fn summary(&self, movie_id: i32) -> Result<RatingSummary, MoviesServiceError>;
}

/// Repository for movie petitions.
pub trait PetitionRepository: Send + Sync {
    /// Active petitions, newest first.
    async fn list_active(&self) -> Result<Vec<Petition>, MoviesServiceError>;

    /// Look up a petition that has not been deleted.
    async fn find_active(&self, id: i32) -> Result<Option<Petition>, MoviesServiceError>;

    /// Returns the new petition id.
    async fn create(&self, petition: &NewPetition) -> Result<i32, MoviesServiceError>;

    /// Mark an active petition inactive. Returns `true` if a row changed.
    async fn deactivate(&self, id: i32) -> Result<bool, MoviesServiceError>;
}

/// Repository for petition votes. One row per (petition, user).
pub trait VoteRepository: Send + Sync {
    async fn find(
        &self,
        petition_id: i32,
        user_id: Uuid,
    ) -> Result<Option<VoteDirection>, MoviesServiceError>;

    /// Returns `SaveConflict` when a concurrent insert won the race.
    async fn insert(
        &self,
        petition_id: i32,
        user_id: Uuid,
        direction: VoteDirection,
        created_at: DateTime<Utc>,
    ) -> Result<(), MoviesServiceError>;

    /// Returns `SaveConflict` when the vote row no longer exists.
    async fn update_direction(
        &self,
        petition_id: i32,
        user_id: Uuid,
        direction: VoteDirection,
    ) -> Result<(), MoviesServiceError>;

    async fn delete(&self, petition_id: i32, user_id: Uuid) -> Result<(), MoviesServiceError>;

    /// Vote tallies keyed by petition id. Petitions without votes are absent.
    async fn counts(
        &self,
        petition_ids: &[i32],
    ) -> Result<HashMap<i32, VoteCounts>, MoviesServiceError>;
}

/// Read-only view over the purchase subsystem's orders.
pub trait OrderRepository: Send + Sync {
    /// Orders of a user, newest first, with their items.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, MoviesServiceError>;
}

/// Purchase aggregation for the trending map.
pub trait TrendingRepository: Send + Sync {
    /// Movies ranked by total quantity purchased, descending, then by movie id.
    /// With `region`, only orders placed by users whose profile is in that
    /// region are counted.
    async fn top_movies(
        &self,
        region: Option<Region>,
        limit: u64,
    ) -> Result<Vec<TrendingEntry>, MoviesServiceError>;
}

/// One-way password hashing for new accounts.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, MoviesServiceError>;
}
