use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::{TestRequest, TestServer};
use serde_json::{Value, json};

use cinema_core::flash::{FlashLevel, FlashMessage};
use cinema_domain::region::Region;
use cinema_movies::router::build_router;
use cinema_movies::state::AppState;
use cinema_testing::auth::MockAuth;
use cinema_testing::flash::{clears_flash, flash_from_headers, flash_request_cookie};

use crate::helpers::{insert_movie, insert_order, insert_petition, insert_user, setup_state};

fn server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

fn signed_in(mut request: TestRequest, auth: &MockAuth) -> TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

fn with_flash(request: TestRequest, flash: &FlashMessage) -> TestRequest {
    request.add_header(
        header::COOKIE,
        HeaderValue::from_str(&flash_request_cookie(flash)).unwrap(),
    )
}

fn location(response: &axum_test::TestResponse) -> String {
    response
        .header(header::LOCATION)
        .to_str()
        .unwrap()
        .to_owned()
}

// ── Routing & identity ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_checks() {
    let server = server(setup_state().await);
    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn should_set_request_id_on_responses() {
    let server = server(setup_state().await);
    let response = server.get("/healthz").await;
    assert!(
        response
            .headers()
            .contains_key(HeaderName::from_static("x-request-id"))
    );
}

#[tokio::test]
async fn should_redirect_anonymous_writer_to_login() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let server = server(state);

    let path = format!("/movies/{movie}/review/create");
    let response = server.post(&path).form(&json!({"comment": "hi"})).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/accounts/login?next={path}"));
}

#[tokio::test]
async fn should_reject_get_on_mutating_endpoints() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let server = server(state);
    let auth = MockAuth::normal(uuid::Uuid::now_v7());

    for path in [
        format!("/movies/{movie}/rating/submit"),
        format!("/movies/{movie}/review/create"),
        "/movies/petitions/1/vote".to_owned(),
    ] {
        let response = signed_in(server.get(&path), &auth).await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[tokio::test]
async fn should_render_not_found_as_json() {
    let server = server(setup_state().await);
    let response = server.get("/movies/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MOVIE_NOT_FOUND");
}

// ── Catalog & ratings ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_movies_matching_search() {
    let state = setup_state().await;
    insert_movie(&state.db, "The Matrix").await;
    insert_movie(&state.db, "Heat").await;
    let server = server(state);

    let body: Value = server.get("/movies?search=MATRIX").await.json();
    assert_eq!(body["title"], "Movies");
    assert_eq!(body["search"], "MATRIX");
    assert_eq!(body["movies"].as_array().unwrap().len(), 1);
    assert_eq!(body["movies"][0]["name"], "The Matrix");
}

#[tokio::test]
async fn should_flash_rating_result_and_show_it_once() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let user = insert_user(&state.db, "alice", None).await;
    let server = server(state);
    let auth = MockAuth::normal(user);

    let response = signed_in(server.post(&format!("/movies/{movie}/rating/submit")), &auth)
        .form(&json!({"stars": "4"}))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/movies/{movie}"));
    let flash = flash_from_headers(response.headers()).unwrap();
    assert_eq!(flash.level, FlashLevel::Success);
    assert_eq!(flash.message, "You have rated this movie 4 stars.");

    let page = with_flash(signed_in(server.get(&format!("/movies/{movie}")), &auth), &flash).await;
    page.assert_status_ok();
    assert!(clears_flash(page.headers()));
    let body: Value = page.json();
    assert_eq!(body["message"]["message"], "You have rated this movie 4 stars.");
    assert_eq!(body["rating_count"], 1);
    assert_eq!(body["average_rating"], 4.0);
    assert_eq!(body["user_rating"], 4);
}

#[tokio::test]
async fn should_flash_error_for_out_of_range_stars() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let user = insert_user(&state.db, "alice", None).await;
    let server = server(state);

    let response = signed_in(
        server.post(&format!("/movies/{movie}/rating/submit")),
        &MockAuth::normal(user),
    )
    .form(&json!({"stars": "9"}))
    .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let flash = flash_from_headers(response.headers()).unwrap();
    assert_eq!(flash.level, FlashLevel::Error);
    assert_eq!(flash.message, "Please select a valid rating (1-5 stars).");

    let body: Value = server.get(&format!("/movies/{movie}")).await.json();
    assert_eq!(body["rating_count"], 0);
}

#[tokio::test]
async fn should_flash_error_for_empty_review() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let user = insert_user(&state.db, "alice", None).await;
    let server = server(state);

    let response = signed_in(
        server.post(&format!("/movies/{movie}/review/create")),
        &MockAuth::normal(user),
    )
    .form(&json!({"comment": "   "}))
    .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let flash = flash_from_headers(response.headers()).unwrap();
    assert_eq!(flash.message, "Comment cannot be empty.");
}

#[tokio::test]
async fn should_show_review_thread_on_movie_page() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let author = insert_user(&state.db, "author", None).await;
    let replier = insert_user(&state.db, "replier", None).await;
    let server = server(state);

    signed_in(
        server.post(&format!("/movies/{movie}/review/create")),
        &MockAuth::normal(author),
    )
    .form(&json!({"comment": "Great heist movie"}))
    .await
    .assert_status(StatusCode::SEE_OTHER);

    let body: Value = server.get(&format!("/movies/{movie}")).await.json();
    let review_id = body["reviews"][0]["id"].as_i64().unwrap();

    signed_in(
        server.post(&format!("/movies/{movie}/review/{review_id}/reply/create")),
        &MockAuth::normal(replier),
    )
    .form(&json!({"comment": "Agreed"}))
    .await
    .assert_status(StatusCode::SEE_OTHER);

    let body: Value = server.get(&format!("/movies/{movie}")).await.json();
    assert_eq!(body["reviews"][0]["username"], "author");
    assert_eq!(body["reviews"][0]["replies"][0]["comment"], "Agreed");
    assert_eq!(body["reviews"][0]["replies"][0]["username"], "replier");
}

#[tokio::test]
async fn should_refuse_editing_someone_elses_review() {
    let state = setup_state().await;
    let movie = insert_movie(&state.db, "Heat").await;
    let author = insert_user(&state.db, "author", None).await;
    let intruder = insert_user(&state.db, "intruder", None).await;
    let server = server(state);

    signed_in(
        server.post(&format!("/movies/{movie}/review/create")),
        &MockAuth::normal(author),
    )
    .form(&json!({"comment": "Original"}))
    .await;
    let body: Value = server.get(&format!("/movies/{movie}")).await.json();
    let review_id = body["reviews"][0]["id"].as_i64().unwrap();

    let response = signed_in(
        server.post(&format!("/movies/{movie}/review/{review_id}/edit")),
        &MockAuth::normal(intruder),
    )
    .form(&json!({"comment": "Hijacked"}))
    .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let flash = flash_from_headers(response.headers()).unwrap();
    assert_eq!(flash.level, FlashLevel::Error);

    let body: Value = server.get(&format!("/movies/{movie}")).await.json();
    assert_eq!(body["reviews"][0]["comment"], "Original");
}

// ── Petitions & votes ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_petition_field_errors() {
    let state = setup_state().await;
    let user = insert_user(&state.db, "alice", None).await;
    let server = server(state);

    let response = signed_in(server.post("/movies/petitions/create"), &MockAuth::normal(user))
        .form(&json!({"movie_title": "", "description": "Please", "reason": ""}))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_FORM");
    assert!(body["errors"]["movie_title"].is_string());
    assert!(body["errors"]["reason"].is_string());
    assert!(body["errors"].get("description").is_none());
}

#[tokio::test]
async fn should_create_petition_and_list_it() {
    let state = setup_state().await;
    let user = insert_user(&state.db, "alice", None).await;
    let server = server(state);

    let response = signed_in(server.post("/movies/petitions/create"), &MockAuth::normal(user))
        .form(&json!({
            "movie_title": "Paprika",
            "description": "Satoshi Kon classic",
            "reason": "Never shown here",
        }))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/movies/petitions");
    assert_eq!(
        flash_from_headers(response.headers()).unwrap().message,
        "Your movie petition has been created successfully!"
    );

    let body: Value = server.get("/movies/petitions").await.json();
    assert_eq!(body["petitions"][0]["movie_title"], "Paprika");
    assert_eq!(body["petitions"][0]["created_by_username"], "alice");
    assert_eq!(body["petitions"][0]["net_score"], 0);
}

#[tokio::test]
async fn should_toggle_vote_with_flash_messages() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let voter = insert_user(&state.db, "voter", None).await;
    let petition = insert_petition(&state.db, creator, "Paprika", 0).await;
    let server = server(state);
    let auth = MockAuth::normal(voter);
    let path = format!("/movies/petitions/{petition}/vote");

    let cast = signed_in(server.post(&path), &auth)
        .form(&json!({"vote_type": "up"}))
        .await;
    assert_eq!(location(&cast), format!("/movies/petitions/{petition}"));
    assert_eq!(
        flash_from_headers(cast.headers()).unwrap().message,
        "You have upvoted for this petition."
    );

    let detail: Value = signed_in(server.get(&format!("/movies/petitions/{petition}")), &auth)
        .await
        .json();
    assert_eq!(detail["user_vote"], "up");
    assert_eq!(detail["petition"]["upvotes"], 1);

    let retract = signed_in(server.post(&path), &auth)
        .form(&json!({"vote_type": "up"}))
        .await;
    let flash = flash_from_headers(retract.headers()).unwrap();
    assert_eq!(flash.level, FlashLevel::Info);
    assert_eq!(flash.message, "Your vote has been removed.");

    let invalid = signed_in(server.post(&path), &auth)
        .form(&json!({"vote_type": "sideways"}))
        .await;
    assert_eq!(
        flash_from_headers(invalid.headers()).unwrap().message,
        "Invalid vote type."
    );
}

#[tokio::test]
async fn should_deny_petition_delete_to_non_creator() {
    let state = setup_state().await;
    let creator = insert_user(&state.db, "creator", None).await;
    let stranger = insert_user(&state.db, "stranger", None).await;
    let petition = insert_petition(&state.db, creator, "Paprika", 0).await;
    let server = server(state);
    let path = format!("/movies/petitions/{petition}/delete");

    let response = signed_in(server.post(&path), &MockAuth::normal(stranger)).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/movies/petitions/{petition}"));
    assert_eq!(
        flash_from_headers(response.headers()).unwrap().message,
        "You do not have permission to delete this petition."
    );
    server
        .get(&format!("/movies/petitions/{petition}"))
        .await
        .assert_status_ok();

    let confirm = signed_in(server.get(&path), &MockAuth::normal(creator)).await;
    confirm.assert_status_ok();
    let body: Value = confirm.json();
    assert_eq!(body["petition"]["id"], petition);

    let deleted = signed_in(server.post(&path), &MockAuth::staff(stranger)).await;
    assert_eq!(location(&deleted), "/movies/petitions");
    server
        .get(&format!("/movies/petitions/{petition}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ── Trending & accounts ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_render_trending_map_for_every_region() {
    let state = setup_state().await;
    let heat = insert_movie(&state.db, "Heat").await;
    let buyer = insert_user(&state.db, "buyer", Some(Region::West)).await;
    insert_order(&state.db, buyer, &[(heat, 2)]).await;
    let server = server(state);

    let body: Value = signed_in(server.get("/trending"), &MockAuth::normal(buyer))
        .await
        .json();
    let regions = body["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 5);
    assert_eq!(regions[0]["code"], "northeast");
    assert!(regions[0]["movies"].as_array().unwrap().is_empty());
    assert_eq!(regions[4]["code"], "west");
    assert_eq!(regions[4]["name"], "West");
    assert_eq!(regions[4]["movies"][0]["total_purchases"], 2);
    assert_eq!(body["overall_trending"][0]["movie_name"], "Heat");
    assert_eq!(body["user_region"], "west");

    let anonymous: Value = server.get("/trending").await.json();
    assert!(anonymous["user_region"].is_null());
}

#[tokio::test]
async fn should_sign_up_and_redirect_to_login() {
    let server = server(setup_state().await);
    let form = json!({
        "username": "newbie",
        "email": "newbie@example.com",
        "password1": "s3cret-pass",
        "password2": "s3cret-pass",
        "region": "midwest",
    });

    let response = server.post("/accounts/signup").form(&form).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login");
    assert_eq!(
        flash_from_headers(response.headers()).unwrap().message,
        "Account created successfully. Please log in."
    );

    let again = server.post("/accounts/signup").form(&form).await;
    again.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = again.json();
    assert_eq!(
        body["errors"]["username"],
        "A user with that username already exists."
    );
}

#[tokio::test]
async fn should_update_region_and_redirect_to_trending() {
    let state = setup_state().await;
    let user = insert_user(&state.db, "alice", Some(Region::Northeast)).await;
    let server = server(state);
    let auth = MockAuth::normal(user);

    let response = signed_in(server.post("/accounts/region"), &auth)
        .form(&json!({"region": "southeast"}))
        .await;
    assert_eq!(location(&response), "/trending");
    assert_eq!(
        flash_from_headers(response.headers()).unwrap().message,
        "Region updated successfully."
    );

    let body: Value = signed_in(server.get("/accounts/region"), &auth).await.json();
    assert_eq!(body["region"], "southeast");

    let invalid = signed_in(server.post("/accounts/region"), &auth)
        .form(&json!({"region": "atlantis"}))
        .await;
    assert_eq!(location(&invalid), "/accounts/region");
    assert_eq!(
        flash_from_headers(invalid.headers()).unwrap().message,
        "Please select a valid region."
    );
}

#[tokio::test]
async fn should_list_own_orders() {
    let state = setup_state().await;
    let heat = insert_movie(&state.db, "Heat").await;
    let buyer = insert_user(&state.db, "buyer", None).await;
    insert_order(&state.db, buyer, &[(heat, 3)]).await;
    let server = server(state);

    let body: Value = signed_in(server.get("/accounts/orders"), &MockAuth::normal(buyer))
        .await
        .json();
    assert_eq!(body["orders"][0]["items"][0]["movie_name"], "Heat");
    assert_eq!(body["orders"][0]["items"][0]["quantity"], 3);

    let anonymous = server.get("/accounts/orders").await;
    anonymous.assert_status(StatusCode::SEE_OTHER);
}
