use chrono::Utc;
use uuid::Uuid;

use cinema_domain::form::{FieldErrors, SignupInput, validate_signup};
use cinema_domain::region::Region;

use crate::domain::repository::{
    AccountRepository, OrderRepository, PasswordHasher, ProfileRepository,
};
use crate::domain::types::{Actor, NewAccount, Order};
use crate::error::MoviesServiceError;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

fn username_taken() -> MoviesServiceError {
    let mut errors = FieldErrors::new();
    errors.add("username", USERNAME_TAKEN);
    MoviesServiceError::InvalidForm(errors)
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupUseCase<A: AccountRepository, H: PasswordHasher> {
    pub accounts: A,
    pub hasher: H,
}

impl<A: AccountRepository, H: PasswordHasher> SignupUseCase<A, H> {
    /// Creates the user together with a profile in the chosen region and
    /// returns the new user id.
    pub async fn execute(&self, input: SignupInput<'_>) -> Result<Uuid, MoviesServiceError> {
        let draft = validate_signup(input).map_err(MoviesServiceError::InvalidForm)?;

        if self
            .accounts
            .find_by_username(&draft.username)
            .await?
            .is_some()
        {
            return Err(username_taken());
        }

        let account = NewAccount {
            id: Uuid::now_v7(),
            username: draft.username,
            email: draft.email,
            password_hash: self.hasher.hash(&draft.password)?,
            region: draft.region,
            created_at: Utc::now(),
        };
        match self.accounts.create_with_profile(&account).await {
            Ok(()) => {}
            Err(MoviesServiceError::UsernameTaken) => return Err(username_taken()),
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %account.id, region = %account.region, "account created");
        Ok(account.id)
    }
}

// ── GetRegion ────────────────────────────────────────────────────────────────

pub struct GetRegionUseCase<Pr: ProfileRepository> {
    pub profiles: Pr,
}

impl<Pr: ProfileRepository> GetRegionUseCase<Pr> {
    /// `None` when the user has no profile yet.
    pub async fn execute(&self, actor: Actor) -> Result<Option<Region>, MoviesServiceError> {
        Ok(self.profiles.find(actor.user_id).await?.map(|p| p.region))
    }
}

// ── UpdateRegion ─────────────────────────────────────────────────────────────

pub struct UpdateRegionUseCase<Pr: ProfileRepository> {
    pub profiles: Pr,
}

impl<Pr: ProfileRepository> UpdateRegionUseCase<Pr> {
    /// Creates the profile if it is missing.
    pub async fn execute(&self, actor: Actor, raw_region: &str) -> Result<Region, MoviesServiceError> {
        let region = raw_region
            .parse::<Region>()
            .map_err(|_| MoviesServiceError::InvalidRegion)?;
        self.profiles
            .upsert_region(actor.user_id, region, Utc::now())
            .await?;
        tracing::info!(user_id = %actor.user_id, region = region.code(), "region updated");
        Ok(region)
    }
}

// ── ListOrders ───────────────────────────────────────────────────────────────

pub struct ListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListOrdersUseCase<O> {
    pub async fn execute(&self, actor: Actor) -> Result<Vec<Order>, MoviesServiceError> {
        self.orders.list_by_user(actor.user_id).await
    }
}
