use chrono::{Duration, Utc};
use sea_orm::{
    ActiveValue::Set, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    NotSet, Schema,
};
use uuid::Uuid;

use cinema_domain::region::Region;
use cinema_domain::user::UserRole;
use cinema_movies::domain::types::Actor;
use cinema_movies::state::AppState;
use cinema_movies_schema::{
    movies, order_items, orders, petitions, ratings, replies, reviews, user_profiles, users,
    votes,
};

// ── Database ─────────────────────────────────────────────────────────────────

/// A fresh in-memory SQLite database with every movies-service table.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    // One connection, so every query sees the same in-memory database.
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    // Parents before children so foreign keys resolve.
    let statements = [
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(user_profiles::Entity),
        schema.create_table_from_entity(movies::Entity),
        schema.create_table_from_entity(reviews::Entity),
        schema.create_table_from_entity(replies::Entity),
        schema.create_table_from_entity(ratings::Entity),
        schema.create_table_from_entity(petitions::Entity),
        schema.create_table_from_entity(votes::Entity),
        schema.create_table_from_entity(orders::Entity),
        schema.create_table_from_entity(order_items::Entity),
    ];
    for stmt in statements {
        db.execute(backend.build(&stmt)).await.unwrap();
    }
    db
}

pub async fn setup_state() -> AppState {
    AppState {
        db: setup_db().await,
    }
}

// ── Seed data ────────────────────────────────────────────────────────────────

pub async fn insert_user(db: &DatabaseConnection, username: &str, region: Option<Region>) -> Uuid {
    let id = Uuid::now_v7();
    users::Entity::insert(users::ActiveModel {
        id: Set(id),
        username: Set(username.to_owned()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("$argon2id$test".to_owned()),
        role: Set(UserRole::Normal.as_u8() as i16),
        created_at: Set(Utc::now()),
    })
    .exec_without_returning(db)
    .await
    .unwrap();

    if let Some(region) = region {
        user_profiles::Entity::insert(user_profiles::ActiveModel {
            user_id: Set(id),
            region: Set(region.code().to_owned()),
            updated_at: Set(Utc::now()),
        })
        .exec_without_returning(db)
        .await
        .unwrap();
    }
    id
}

pub async fn insert_movie(db: &DatabaseConnection, name: &str) -> i32 {
    movies::Entity::insert(movies::ActiveModel {
        id: NotSet,
        name: Set(name.to_owned()),
        price: Set(12),
        description: Set(format!("About {name}")),
        image: Set(format!("{}.jpg", name.to_lowercase())),
    })
    .exec(db)
    .await
    .unwrap()
    .last_insert_id
}

/// Places one order for `user_id` with `(movie_id, quantity)` items.
pub async fn insert_order(db: &DatabaseConnection, user_id: Uuid, items: &[(i32, i32)]) -> i32 {
    let order_id = orders::Entity::insert(orders::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        total: Set(items.iter().map(|(_, q)| 12 * q).sum()),
        created_at: Set(Utc::now()),
    })
    .exec(db)
    .await
    .unwrap()
    .last_insert_id;

    for &(movie_id, quantity) in items {
        order_items::Entity::insert(order_items::ActiveModel {
            id: NotSet,
            order_id: Set(order_id),
            movie_id: Set(movie_id),
            price: Set(12),
            quantity: Set(quantity),
        })
        .exec(db)
        .await
        .unwrap();
    }
    order_id
}

/// Inserts a petition created `age_minutes` ago.
pub async fn insert_petition(
    db: &DatabaseConnection,
    created_by: Uuid,
    movie_title: &str,
    age_minutes: i64,
) -> i32 {
    petitions::Entity::insert(petitions::ActiveModel {
        id: NotSet,
        movie_title: Set(movie_title.to_owned()),
        description: Set("A classic".to_owned()),
        reason: Set("Everyone asks for it".to_owned()),
        created_by: Set(created_by),
        created_at: Set(Utc::now() - Duration::minutes(age_minutes)),
        is_active: Set(true),
    })
    .exec(db)
    .await
    .unwrap()
    .last_insert_id
}

pub fn actor(user_id: Uuid) -> Actor {
    Actor {
        user_id,
        role: UserRole::Normal,
    }
}

pub fn staff(user_id: Uuid) -> Actor {
    Actor {
        user_id,
        role: UserRole::Staff,
    }
}
