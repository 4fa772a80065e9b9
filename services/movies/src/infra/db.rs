use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, NotSet, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr,
    TransactionTrait,
    sea_query::{Expr, Func, OnConflict, Query, SimpleExpr},
};
use uuid::Uuid;

use cinema_core::sea_ext::FilterContainsIgnoreCase;
use cinema_domain::rating::{RatingSummary, Stars};
use cinema_domain::region::Region;
use cinema_domain::user::UserRole;
use cinema_domain::vote::{VoteCounts, VoteDirection};
use cinema_movies_schema::{
    movies, order_items, orders, petitions, ratings, replies, reviews, user_profiles, users,
    votes,
};

use crate::domain::repository::{
    AccountRepository, MovieRepository, OrderRepository, PetitionRepository, ProfileRepository,
    RatingRepository, ReplyRepository, ReviewRepository, TrendingRepository, VoteRepository,
};
use crate::domain::types::{
    Account, Movie, NewAccount, NewPetition, Order, OrderItem, Petition, Profile, Rating, Reply,
    Review, TrendingEntry,
};
use crate::error::MoviesServiceError;

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn username_of(user: Option<users::Model>) -> String {
    user.map(|u| u.username).unwrap_or_default()
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, MoviesServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(account_from_model))
    }

    async fn create_with_profile(&self, account: &NewAccount) -> Result<(), MoviesServiceError> {
        let txn = self.db.begin().await.context("begin signup transaction")?;

        let user = users::ActiveModel {
            id: Set(account.id),
            username: Set(account.username.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            role: Set(UserRole::Normal.as_u8() as i16),
            created_at: Set(account.created_at),
        };
        match users::Entity::insert(user).exec_without_returning(&txn).await {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(MoviesServiceError::UsernameTaken),
            Err(e) => return Err(anyhow::Error::new(e).context("insert user").into()),
        }

        user_profiles::Entity::insert(user_profiles::ActiveModel {
            user_id: Set(account.id),
            region: Set(account.region.code().to_owned()),
            updated_at: Set(account.created_at),
        })
        .exec_without_returning(&txn)
        .await
        .context("insert user profile")?;

        txn.commit().await.context("commit signup transaction")?;
        Ok(())
    }
}

fn account_from_model(model: users::Model) -> Account {
    Account {
        id: model.id,
        username: model.username,
        email: model.email,
        role: u8::try_from(model.role)
            .ok()
            .and_then(UserRole::from_u8)
            .unwrap_or_default(),
        created_at: model.created_at,
    }
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, MoviesServiceError> {
        let Some(model) = user_profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find user profile")?
        else {
            return Ok(None);
        };
        let region = model
            .region
            .parse::<Region>()
            .with_context(|| format!("stored region of user {user_id}"))?;
        Ok(Some(Profile {
            user_id: model.user_id,
            region,
            updated_at: model.updated_at,
        }))
    }

    async fn upsert_region(
        &self,
        user_id: Uuid,
        region: Region,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MoviesServiceError> {
        user_profiles::Entity::insert(user_profiles::ActiveModel {
            user_id: Set(user_id),
            region: Set(region.code().to_owned()),
            updated_at: Set(updated_at),
        })
        .on_conflict(
            OnConflict::column(user_profiles::Column::UserId)
                .update_columns([
                    user_profiles::Column::Region,
                    user_profiles::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("upsert user profile region")?;
        Ok(())
    }
}

// ── Movie repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMovieRepository {
    pub db: DatabaseConnection,
}

impl MovieRepository for DbMovieRepository {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Movie>, MoviesServiceError> {
        let mut query = movies::Entity::find();
        if let Some(term) = search {
            query = query.filter_contains_ignore_case(movies::Column::Name, term);
        }
        let models = query
            .order_by_asc(movies::Column::Name)
            .order_by_asc(movies::Column::Id)
            .all(&self.db)
            .await
            .context("list movies")?;
        Ok(models.into_iter().map(movie_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, MoviesServiceError> {
        let model = movies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find movie by id")?;
        Ok(model.map(movie_from_model))
    }
}

fn movie_from_model(model: movies::Model) -> Movie {
    Movie {
        id: model.id,
        name: model.name,
        price: model.price,
        description: model.description,
        image: model.image,
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list_by_movie(&self, movie_id: i32) -> Result<Vec<Review>, MoviesServiceError> {
        let rows = reviews::Entity::find()
            .filter(reviews::Column::MovieId.eq(movie_id))
            .find_also_related(users::Entity)
            .order_by_asc(reviews::Column::CreatedAt)
            .order_by_asc(reviews::Column::Id)
            .all(&self.db)
            .await
            .context("list reviews by movie")?;
        Ok(rows
            .into_iter()
            .map(|(review, user)| review_from_model(review, user))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, MoviesServiceError> {
        let row = reviews::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(row.map(|(review, user)| review_from_model(review, user)))
    }

    async fn create(
        &self,
        movie_id: i32,
        user_id: Uuid,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, MoviesServiceError> {
        let result = reviews::Entity::insert(reviews::ActiveModel {
            id: NotSet,
            movie_id: Set(movie_id),
            user_id: Set(user_id),
            comment: Set(comment.to_owned()),
            created_at: Set(created_at),
        })
        .exec(&self.db)
        .await
        .context("create review")?;
        Ok(result.last_insert_id)
    }

    async fn update_comment(&self, id: i32, comment: &str) -> Result<(), MoviesServiceError> {
        reviews::Entity::update_many()
            .col_expr(reviews::Column::Comment, Expr::value(comment))
            .filter(reviews::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update review comment")?;
        Ok(())
    }

    async fn delete_with_replies(&self, id: i32) -> Result<(), MoviesServiceError> {
        let txn = self.db.begin().await.context("begin review delete")?;
        replies::Entity::delete_many()
            .filter(replies::Column::ReviewId.eq(id))
            .exec(&txn)
            .await
            .context("delete replies of review")?;
        reviews::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete review")?;
        txn.commit().await.context("commit review delete")?;
        Ok(())
    }
}

fn review_from_model(model: reviews::Model, user: Option<users::Model>) -> Review {
    Review {
        id: model.id,
        movie_id: model.movie_id,
        user_id: model.user_id,
        username: username_of(user),
        comment: model.comment,
        created_at: model.created_at,
    }
}

// ── Reply repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReplyRepository {
    pub db: DatabaseConnection,
}

impl ReplyRepository for DbReplyRepository {
    async fn list_by_reviews(&self, review_ids: &[i32]) -> Result<Vec<Reply>, MoviesServiceError> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = replies::Entity::find()
            .filter(replies::Column::ReviewId.is_in(review_ids.iter().copied()))
            .find_also_related(users::Entity)
            .order_by_asc(replies::Column::CreatedAt)
            .order_by_asc(replies::Column::Id)
            .all(&self.db)
            .await
            .context("list replies by reviews")?;
        Ok(rows
            .into_iter()
            .map(|(reply, user)| reply_from_model(reply, user))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Reply>, MoviesServiceError> {
        let row = replies::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find reply by id")?;
        Ok(row.map(|(reply, user)| reply_from_model(reply, user)))
    }

    async fn create(
        &self,
        review_id: i32,
        user_id: Uuid,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, MoviesServiceError> {
        let result = replies::Entity::insert(replies::ActiveModel {
            id: NotSet,
            review_id: Set(review_id),
            user_id: Set(user_id),
            comment: Set(comment.to_owned()),
            created_at: Set(created_at),
        })
        .exec(&self.db)
        .await
        .context("create reply")?;
        Ok(result.last_insert_id)
    }

    async fn delete(&self, id: i32) -> Result<(), MoviesServiceError> {
        replies::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete reply")?;
        Ok(())
    }
}

fn reply_from_model(model: replies::Model, user: Option<users::Model>) -> Reply {
    Reply {
        id: model.id,
        review_id: model.review_id,
        user_id: model.user_id,
        username: username_of(user),
        comment: model.comment,
        created_at: model.created_at,
    }
}

// ── Rating repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRatingRepository {
    pub db: DatabaseConnection,
}

impl RatingRepository for DbRatingRepository {
    async fn find(
        &self,
        movie_id: i32,
        user_id: Uuid,
    ) -> Result<Option<Rating>, MoviesServiceError> {
        let Some(model) = ratings::Entity::find_by_id((movie_id, user_id))
            .one(&self.db)
            .await
            .context("find rating")?
        else {
            return Ok(None);
        };
        let stars = u8::try_from(model.stars)
            .ok()
            .and_then(|v| Stars::new(v).ok())
            .with_context(|| format!("stored stars {} out of range", model.stars))?;
        Ok(Some(Rating {
            movie_id: model.movie_id,
            user_id: model.user_id,
            stars,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }))
    }

    async fn insert(&self, rating: &Rating) -> Result<(), MoviesServiceError> {
        let am = ratings::ActiveModel {
            movie_id: Set(rating.movie_id),
            user_id: Set(rating.user_id),
            stars: Set(rating.stars.get() as i16),
            created_at: Set(rating.created_at),
            updated_at: Set(rating.updated_at),
        };
        match ratings::Entity::insert(am).exec_without_returning(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(MoviesServiceError::SaveConflict),
            Err(e) => Err(anyhow::Error::new(e).context("insert rating").into()),
        }
    }

    async fn update_stars(
        &self,
        movie_id: i32,
        user_id: Uuid,
        stars: Stars,
        updated_at: DateTime<Utc>,
    ) -> Result<(), MoviesServiceError> {
        let res = ratings::Entity::update_many()
            .col_expr(ratings::Column::Stars, Expr::value(stars.get() as i16))
            .col_expr(ratings::Column::UpdatedAt, Expr::value(updated_at))
            .filter(ratings::Column::MovieId.eq(movie_id))
            .filter(ratings::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("update rating stars")?;
        if res.rows_affected == 0 {
            return Err(MoviesServiceError::SaveConflict);
        }
        Ok(())
    }

    async fn summary(&self, movie_id: i32) -> Result<RatingSummary, MoviesServiceError> {
        let totals: Option<(Option<i64>, i64)> = ratings::Entity::find()
            .select_only()
            .column_as(ratings::Column::Stars.sum(), "stars_sum")
            .column_as(ratings::Column::Stars.count(), "stars_count")
            .filter(ratings::Column::MovieId.eq(movie_id))
            .into_tuple()
            .one(&self.db)
            .await
            .context("summarize ratings")?;
        let (sum, count) = totals.unwrap_or((None, 0));
        Ok(RatingSummary::from_totals(
            sum.unwrap_or(0).max(0) as u64,
            count.max(0) as u64,
        ))
    }
}

// ── Petition repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPetitionRepository {
    pub db: DatabaseConnection,
}

impl PetitionRepository for DbPetitionRepository {
    async fn list_active(&self) -> Result<Vec<Petition>, MoviesServiceError> {
        let rows = petitions::Entity::find()
            .filter(petitions::Column::IsActive.eq(true))
            .find_also_related(users::Entity)
            .order_by_desc(petitions::Column::CreatedAt)
            .order_by_desc(petitions::Column::Id)
            .all(&self.db)
            .await
            .context("list active petitions")?;
        Ok(rows
            .into_iter()
            .map(|(petition, user)| petition_from_model(petition, user))
            .collect())
    }

    async fn find_active(&self, id: i32) -> Result<Option<Petition>, MoviesServiceError> {
        let row = petitions::Entity::find_by_id(id)
            .filter(petitions::Column::IsActive.eq(true))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find active petition")?;
        Ok(row.map(|(petition, user)| petition_from_model(petition, user)))
    }

    async fn create(&self, petition: &NewPetition) -> Result<i32, MoviesServiceError> {
        let result = petitions::Entity::insert(petitions::ActiveModel {
            id: NotSet,
            movie_title: Set(petition.movie_title.clone()),
            description: Set(petition.description.clone()),
            reason: Set(petition.reason.clone()),
            created_by: Set(petition.created_by),
            created_at: Set(petition.created_at),
            is_active: Set(true),
        })
        .exec(&self.db)
        .await
        .context("create petition")?;
        Ok(result.last_insert_id)
    }

    async fn deactivate(&self, id: i32) -> Result<bool, MoviesServiceError> {
        let result = petitions::Entity::update_many()
            .col_expr(petitions::Column::IsActive, Expr::value(false))
            .filter(petitions::Column::Id.eq(id))
            .filter(petitions::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .context("deactivate petition")?;
        Ok(result.rows_affected > 0)
    }
}

fn petition_from_model(model: petitions::Model, user: Option<users::Model>) -> Petition {
    Petition {
        id: model.id,
        movie_title: model.movie_title,
        description: model.description,
        reason: model.reason,
        created_by: model.created_by,
        created_by_username: username_of(user),
        created_at: model.created_at,
        is_active: model.is_active,
    }
}

// ── Vote repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVoteRepository {
    pub db: DatabaseConnection,
}

impl VoteRepository for DbVoteRepository {
    async fn find(
        &self,
        petition_id: i32,
        user_id: Uuid,
    ) -> Result<Option<VoteDirection>, MoviesServiceError> {
        let model = votes::Entity::find_by_id((petition_id, user_id))
            .one(&self.db)
            .await
            .context("find vote")?;
        model
            .map(|m| {
                m.vote_type
                    .parse::<VoteDirection>()
                    .context("stored vote type")
                    .map_err(MoviesServiceError::from)
            })
            .transpose()
    }

    async fn insert(
        &self,
        petition_id: i32,
        user_id: Uuid,
        direction: VoteDirection,
        created_at: DateTime<Utc>,
    ) -> Result<(), MoviesServiceError> {
        let am = votes::ActiveModel {
            petition_id: Set(petition_id),
            user_id: Set(user_id),
            vote_type: Set(direction.as_str().to_owned()),
            created_at: Set(created_at),
        };
        match votes::Entity::insert(am).exec_without_returning(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(MoviesServiceError::SaveConflict),
            Err(e) => Err(anyhow::Error::new(e).context("insert vote").into()),
        }
    }

    async fn update_direction(
        &self,
        petition_id: i32,
        user_id: Uuid,
        direction: VoteDirection,
    ) -> Result<(), MoviesServiceError> {
        let res = votes::Entity::update_many()
            .col_expr(votes::Column::VoteType, Expr::value(direction.as_str()))
            .filter(votes::Column::PetitionId.eq(petition_id))
            .filter(votes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("update vote direction")?;
        // Row retracted concurrently.
        if res.rows_affected == 0 {
            return Err(MoviesServiceError::SaveConflict);
        }
        Ok(())
    }

    async fn delete(&self, petition_id: i32, user_id: Uuid) -> Result<(), MoviesServiceError> {
        votes::Entity::delete_by_id((petition_id, user_id))
            .exec(&self.db)
            .await
            .context("delete vote")?;
        Ok(())
    }

    async fn counts(
        &self,
        petition_ids: &[i32],
    ) -> Result<HashMap<i32, VoteCounts>, MoviesServiceError> {
        if petition_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32, String, i64)> = votes::Entity::find()
            .select_only()
            .column(votes::Column::PetitionId)
            .column(votes::Column::VoteType)
            .column_as(votes::Column::UserId.count(), "votes")
            .filter(votes::Column::PetitionId.is_in(petition_ids.iter().copied()))
            .group_by(votes::Column::PetitionId)
            .group_by(votes::Column::VoteType)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count votes")?;

        let mut counts: HashMap<i32, VoteCounts> = HashMap::new();
        for (petition_id, vote_type, n) in rows {
            let entry = counts.entry(petition_id).or_default();
            let n = n.max(0) as u64;
            match vote_type.parse::<VoteDirection>() {
                Ok(VoteDirection::Up) => entry.up += n,
                Ok(VoteDirection::Down) => entry.down += n,
                Err(e) => tracing::warn!(petition_id, error = %e, "skipping unknown vote type"),
            }
        }
        Ok(counts)
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, MoviesServiceError> {
        let order_models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        if order_models.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = order_models.iter().map(|o| o.id).collect();
        let item_rows = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .find_also_related(movies::Entity)
            .order_by_asc(order_items::Column::Id)
            .all(&self.db)
            .await
            .context("list order items")?;

        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for (item, movie) in item_rows {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItem {
                    id: item.id,
                    movie_id: item.movie_id,
                    movie_name: movie.map(|m| m.name).unwrap_or_default(),
                    price: item.price,
                    quantity: item.quantity,
                });
        }

        Ok(order_models
            .into_iter()
            .map(|o| Order {
                items: items_by_order.remove(&o.id).unwrap_or_default(),
                id: o.id,
                user_id: o.user_id,
                total: o.total,
                created_at: o.created_at,
            })
            .collect())
    }
}

// ── Trending repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTrendingRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct TrendingRow {
    movie_id: i32,
    movie_name: String,
    movie_image: String,
    total_purchases: i64,
    order_count: i64,
}

impl TrendingRepository for DbTrendingRepository {
    async fn top_movies(
        &self,
        region: Option<Region>,
        limit: u64,
    ) -> Result<Vec<TrendingEntry>, MoviesServiceError> {
        let total_purchases: SimpleExpr = order_items::Column::Quantity.sum();
        let order_count: SimpleExpr = Func::count_distinct(Expr::col((
            order_items::Entity,
            order_items::Column::OrderId,
        )))
        .into();

        let mut query = order_items::Entity::find()
            .select_only()
            .column_as(movies::Column::Id, "movie_id")
            .column_as(movies::Column::Name, "movie_name")
            .column_as(movies::Column::Image, "movie_image")
            .column_as(total_purchases.clone(), "total_purchases")
            .column_as(order_count, "order_count")
            .join(JoinType::InnerJoin, order_items::Relation::Movie.def())
            .join(JoinType::InnerJoin, order_items::Relation::Order.def());

        if let Some(region) = region {
            query = query.filter(
                orders::Column::UserId.in_subquery(
                    Query::select()
                        .column(user_profiles::Column::UserId)
                        .from(user_profiles::Entity)
                        .and_where(Expr::col(user_profiles::Column::Region).eq(region.code()))
                        .to_owned(),
                ),
            );
        }

        let rows = query
            .group_by(movies::Column::Id)
            .group_by(movies::Column::Name)
            .group_by(movies::Column::Image)
            .order_by_desc(total_purchases)
            .order_by_asc(movies::Column::Id)
            .limit(limit)
            .into_model::<TrendingRow>()
            .all(&self.db)
            .await
            .with_context(|| match region {
                Some(r) => format!("top movies in region {r}"),
                None => "top movies overall".to_owned(),
            })?;

        Ok(rows
            .into_iter()
            .map(|row| TrendingEntry {
                movie_id: row.movie_id,
                movie_name: row.movie_name,
                movie_image: row.movie_image,
                total_purchases: row.total_purchases,
                order_count: row.order_count,
            })
            .collect())
    }
}
