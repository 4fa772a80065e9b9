use chrono::{DateTime, Utc};
use uuid::Uuid;

use cinema_domain::rating::Stars;
use cinema_domain::region::Region;
use cinema_domain::user::UserRole;
use cinema_domain::vote::VoteCounts;

/// The authenticated caller a use case acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// A user account as seen by this service.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A new account together with its initial region profile.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub region: Region,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Uuid,
    pub region: Region,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i32,
    pub movie_id: i32,
    pub user_id: Uuid,
    pub username: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: i32,
    pub review_id: i32,
    pub user_id: Uuid,
    pub username: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub movie_id: i32,
    pub user_id: Uuid,
    pub stars: Stars,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Petition {
    pub id: i32,
    pub movie_title: String,
    pub description: String,
    pub reason: String,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewPetition {
    pub movie_title: String,
    pub description: String,
    pub reason: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A petition together with its vote tally.
#[derive(Debug, Clone)]
pub struct PetitionSummary {
    pub petition: Petition,
    pub votes: VoteCounts,
}

impl PetitionSummary {
    /// Upvotes minus downvotes.
    pub fn net_score(&self) -> i64 {
        self.votes.net()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i32,
    pub user_id: Uuid,
    pub total: i32,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: i32,
    pub movie_id: i32,
    pub movie_name: String,
    pub price: i32,
    pub quantity: i32,
}

/// One row of a trending list: purchases of a movie aggregated over a set of
/// orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingEntry {
    pub movie_id: i32,
    pub movie_name: String,
    pub movie_image: String,
    pub total_purchases: i64,
    pub order_count: i64,
}
