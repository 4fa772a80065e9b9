use sea_orm::{EntityTrait, PaginatorTrait};

use cinema_domain::form::SignupInput;
use cinema_domain::rating::Stars;
use cinema_domain::region::Region;
use cinema_domain::vote::{VoteAction, VoteDirection};
use cinema_movies::domain::repository::{
    MovieRepository, PetitionRepository, ProfileRepository, RatingRepository, ReplyRepository,
    TrendingRepository, VoteRepository,
};
use cinema_movies::error::MoviesServiceError;
use cinema_movies::usecase::account::{ListOrdersUseCase, SignupUseCase, UpdateRegionUseCase};
use cinema_movies::usecase::petition::{DeletePetitionUseCase, GetPetitionUseCase};
use cinema_movies::usecase::rating::SubmitRatingUseCase;
use cinema_movies::usecase::reply::CreateReplyUseCase;
use cinema_movies::usecase::review::{CreateReviewUseCase, DeleteReviewUseCase};
use cinema_movies::usecase::vote::CastVoteUseCase;
use cinema_movies_schema::{petitions, ratings, replies, users, votes};

use crate::helpers::{
    actor, insert_movie, insert_order, insert_petition, insert_user, setup_state, staff,
};

// ── Ratings ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_one_rating_row_with_last_stars() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let user = insert_user(&state.db, "alice", None).await;

    let uc = SubmitRatingUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
    };
    for raw in ["2", "3", "5"] {
        uc.execute(actor(user), movie, raw).await.unwrap();
    }

    let rows = ratings::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stars, 5);

    let stored = state.rating_repo().find(movie, user).await.unwrap().unwrap();
    assert_eq!(stored.stars, Stars::new(5).unwrap());
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn should_average_ratings_across_users() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let alice = insert_user(&state.db, "alice", None).await;
    let bob = insert_user(&state.db, "bob", None).await;

    let repo = state.rating_repo();
    let empty = repo.summary(movie).await.unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.average, 0.0);

    let uc = SubmitRatingUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
    };
    uc.execute(actor(alice), movie, "3").await.unwrap();
    uc.execute(actor(bob), movie, "5").await.unwrap();

    let summary = repo.summary(movie).await.unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.average, 4.0);
}

#[tokio::test]
async fn should_surface_duplicate_rating_insert_as_save_conflict() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let user = insert_user(&state.db, "alice", None).await;

    let repo = state.rating_repo();
    let rating = cinema_movies::domain::types::Rating {
        movie_id: movie,
        user_id: user,
        stars: Stars::new(4).unwrap(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    repo.insert(&rating).await.unwrap();
    let result = repo.insert(&rating).await;
    assert!(
        matches!(result, Err(MoviesServiceError::SaveConflict)),
        "expected SaveConflict, got {result:?}"
    );
}

// ── Votes ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_leave_no_vote_row_after_voting_up_twice() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let voter = insert_user(&state.db, "voter", None).await;
    let petition = insert_petition(&state.db, creator, "Paprika", 0).await;

    let uc = CastVoteUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    };
    uc.execute(actor(voter), petition, "up").await.unwrap();
    let second = uc.execute(actor(voter), petition, "up").await.unwrap();
    assert_eq!(second, VoteAction::Retract);

    assert_eq!(votes::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn should_switch_vote_in_place() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let voter = insert_user(&state.db, "voter", None).await;
    let petition = insert_petition(&state.db, creator, "Paprika", 0).await;

    let uc = CastVoteUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    };
    uc.execute(actor(voter), petition, "up").await.unwrap();
    uc.execute(actor(voter), petition, "down").await.unwrap();

    let rows = votes::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].vote_type, "down");
    assert_eq!(
        state.vote_repo().find(petition, voter).await.unwrap(),
        Some(VoteDirection::Down)
    );
}

#[tokio::test]
async fn should_report_save_conflict_when_switching_a_removed_vote() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let voter = insert_user(&state.db, "voter", None).await;
    let petition = insert_petition(&state.db, creator, "Perfect Blue", 0).await;

    let repo = state.vote_repo();
    repo.insert(petition, voter, VoteDirection::Up, chrono::Utc::now())
        .await
        .unwrap();
    // Another tab retracts between the lookup and the switch.
    repo.delete(petition, voter).await.unwrap();

    let err = repo
        .update_direction(petition, voter, VoteDirection::Down)
        .await
        .unwrap_err();
    assert!(matches!(err, MoviesServiceError::SaveConflict));
    assert_eq!(votes::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn should_tally_votes_per_petition() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let first = insert_petition(&state.db, creator, "Paprika", 0).await;
    let second = insert_petition(&state.db, creator, "Akira", 0).await;

    let uc = CastVoteUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    };
    for (name, direction) in [("a", "up"), ("b", "up"), ("c", "down")] {
        let voter = insert_user(&state.db, name, None).await;
        uc.execute(actor(voter), first, direction).await.unwrap();
    }

    let counts = state.vote_repo().counts(&[first, second]).await.unwrap();
    let tally = counts[&first];
    assert_eq!((tally.up, tally.down), (2, 1));
    assert_eq!(tally.net(), 1);
    assert!(!counts.contains_key(&second));
}

// ── Petitions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_active_petitions_newest_first_with_creator_name() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let older = insert_petition(&state.db, creator, "Akira", 60).await;
    let newer = insert_petition(&state.db, creator, "Paprika", 5).await;

    let listed = state.petition_repo().list_active().await.unwrap();
    let ids: Vec<i32> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, [newer, older]);
    assert_eq!(listed[0].created_by_username, "creator");
}

#[tokio::test]
async fn should_keep_petition_active_when_non_creator_deletes() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let stranger = insert_user(&state.db, "stranger", None).await;
    let petition = insert_petition(&state.db, creator, "Paprika", 0).await;

    let uc = DeletePetitionUseCase {
        petitions: state.petition_repo(),
    };
    let result = uc.execute(actor(stranger), petition).await;
    assert!(matches!(result, Err(MoviesServiceError::NotPetitionOwner)));

    let row = petitions::Entity::find_by_id(petition)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(row.is_active);
}

#[tokio::test]
async fn should_hide_petition_deleted_by_staff() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let moderator = insert_user(&state.db, "moderator", None).await;
    let petition = insert_petition(&state.db, creator, "Paprika", 0).await;

    let uc = DeletePetitionUseCase {
        petitions: state.petition_repo(),
    };
    uc.execute(staff(moderator), petition).await.unwrap();

    assert!(state.petition_repo().list_active().await.unwrap().is_empty());
    let detail = GetPetitionUseCase {
        petitions: state.petition_repo(),
        votes: state.vote_repo(),
    }
    .execute(petition, None)
    .await;
    assert!(matches!(detail, Err(MoviesServiceError::PetitionNotFound)));

    // The row is kept, only deactivated.
    let row = petitions::Entity::find_by_id(petition)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!row.is_active);

    let again = uc.execute(actor(creator), petition).await;
    assert!(matches!(again, Err(MoviesServiceError::PetitionNotFound)));
}

// ── Trending ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rank_movies_by_quantity_within_region() {
    let state = setup_state().await;
    let heat = insert_movie(&state.db, "Heat").await;
    let ronin = insert_movie(&state.db, "Ronin").await;
    let alien = insert_movie(&state.db, "Alien").await;

    let west_a = insert_user(&state.db, "west_a", Some(Region::West)).await;
    let west_b = insert_user(&state.db, "west_b", Some(Region::West)).await;
    let east = insert_user(&state.db, "east", Some(Region::Northeast)).await;

    insert_order(&state.db, west_a, &[(heat, 1), (ronin, 2)]).await;
    insert_order(&state.db, west_b, &[(ronin, 2)]).await;
    insert_order(&state.db, west_b, &[(heat, 1)]).await;
    insert_order(&state.db, east, &[(alien, 9)]).await;

    let repo = state.trending_repo();
    let west = repo.top_movies(Some(Region::West), 5).await.unwrap();
    let ranked: Vec<(i32, i64, i64)> = west
        .iter()
        .map(|e| (e.movie_id, e.total_purchases, e.order_count))
        .collect();
    assert_eq!(ranked, [(ronin, 4, 2), (heat, 2, 2)]);
    assert_eq!(west[0].movie_name, "Ronin");
    assert_eq!(west[0].movie_image, "ronin.jpg");

    let overall = repo.top_movies(None, 10).await.unwrap();
    let ids: Vec<i32> = overall.iter().map(|e| e.movie_id).collect();
    assert_eq!(ids, [alien, ronin, heat]);
}

#[tokio::test]
async fn should_return_empty_trending_for_region_without_buyers() {
    let state = setup_state().await;
    let heat = insert_movie(&state.db, "Heat").await;
    let buyer = insert_user(&state.db, "buyer", Some(Region::West)).await;
    insert_order(&state.db, buyer, &[(heat, 3)]).await;

    let midwest = state
        .trending_repo()
        .top_movies(Some(Region::Midwest), 5)
        .await
        .unwrap();
    assert!(midwest.is_empty());
}

#[tokio::test]
async fn should_count_buyers_without_profile_only_overall() {
    let state = setup_state().await;
    let heat = insert_movie(&state.db, "Heat").await;
    let anonymous = insert_user(&state.db, "noprofile", None).await;
    insert_order(&state.db, anonymous, &[(heat, 1)]).await;

    let repo = state.trending_repo();
    for region in Region::ALL {
        assert!(repo.top_movies(Some(region), 5).await.unwrap().is_empty());
    }
    assert_eq!(repo.top_movies(None, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn should_break_trending_ties_by_movie_id_and_apply_limit() {
    let state = setup_state().await;
    let buyer = insert_user(&state.db, "buyer", Some(Region::Southeast)).await;
    let mut movie_ids = Vec::new();
    for name in ["F", "E", "D", "C", "B", "A"] {
        let id = insert_movie(&state.db, name).await;
        insert_order(&state.db, buyer, &[(id, 1)]).await;
        movie_ids.push(id);
    }

    let top = state
        .trending_repo()
        .top_movies(Some(Region::Southeast), 5)
        .await
        .unwrap();
    let ids: Vec<i32> = top.iter().map(|e| e.movie_id).collect();
    assert_eq!(ids, &movie_ids[..5]);
}

// ── Catalog, reviews and replies ─────────────────────────────────────────────

#[tokio::test]
async fn should_search_movie_names_case_insensitively() {
    let state = setup_state().await;
    insert_movie(&state.db, "The Matrix").await;
    insert_movie(&state.db, "Heat").await;
    insert_movie(&state.db, "100% Wolf").await;

    let repo = state.movie_repo();
    let names = |movies: Vec<cinema_movies::domain::types::Movie>| {
        movies.into_iter().map(|m| m.name).collect::<Vec<_>>()
    };
    assert_eq!(names(repo.list(Some("matrix")).await.unwrap()), ["The Matrix"]);
    assert_eq!(names(repo.list(Some("%")).await.unwrap()), ["100% Wolf"]);
    assert_eq!(
        names(repo.list(None).await.unwrap()),
        ["100% Wolf", "Heat", "The Matrix"]
    );
}

#[tokio::test]
async fn should_delete_review_with_its_replies() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let author = insert_user(&state.db, "author", None).await;
    let replier = insert_user(&state.db, "replier", None).await;

    let review = CreateReviewUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    }
    .execute(actor(author), movie, "  Great heist movie  ")
    .await
    .unwrap();
    CreateReplyUseCase {
        reviews: state.review_repo(),
        replies: state.reply_repo(),
    }
    .execute(actor(replier), movie, review, "Agreed")
    .await
    .unwrap();

    let threads = state.reply_repo().list_by_reviews(&[review]).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].username, "replier");

    DeleteReviewUseCase {
        reviews: state.review_repo(),
    }
    .execute(actor(author), movie, review)
    .await
    .unwrap();
    assert_eq!(replies::Entity::find().count(&state.db).await.unwrap(), 0);
}

// ── Accounts ─────────────────────────────────────────────────────────────────

fn signup_input(username: &str) -> SignupInput<'_> {
    SignupInput {
        username,
        email: "new@example.com",
        password1: "s3cret-pass",
        password2: "s3cret-pass",
        region: "southwest",
    }
}

#[tokio::test]
async fn should_create_user_and_profile_on_signup() {
    let state = setup_state().await;
    let uc = SignupUseCase {
        accounts: state.account_repo(),
        hasher: state.password_hasher(),
    };
    let id = uc.execute(signup_input("newbie")).await.unwrap();

    let user = users::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.username, "newbie");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let profile = state.profile_repo().find(id).await.unwrap().unwrap();
    assert_eq!(profile.region, Region::Southwest);

    let duplicate = uc.execute(signup_input("newbie")).await;
    assert!(matches!(
        duplicate,
        Err(MoviesServiceError::InvalidForm(ref e)) if e.contains("username")
    ));
}

#[tokio::test]
async fn should_upsert_region_for_user_without_profile() {
    let state = setup_state().await;
    let user = insert_user(&state.db, "legacy", None).await;

    let uc = UpdateRegionUseCase {
        profiles: state.profile_repo(),
    };
    uc.execute(actor(user), "midwest").await.unwrap();
    uc.execute(actor(user), "west").await.unwrap();

    let profile = state.profile_repo().find(user).await.unwrap().unwrap();
    assert_eq!(profile.region, Region::West);
}

#[tokio::test]
async fn should_list_orders_with_movie_names() {
    let state = setup_state().await;
    let heat = insert_movie(&state.db, "Heat").await;
    let buyer = insert_user(&state.db, "buyer", None).await;
    let other = insert_user(&state.db, "other", None).await;
    insert_order(&state.db, buyer, &[(heat, 2)]).await;
    insert_order(&state.db, other, &[(heat, 1)]).await;

    let orders = ListOrdersUseCase {
        orders: state.order_repo(),
    }
    .execute(actor(buyer))
    .await
    .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total, 24);
    assert_eq!(orders[0].items[0].movie_name, "Heat");
    assert_eq!(orders[0].items[0].quantity, 2);
}
