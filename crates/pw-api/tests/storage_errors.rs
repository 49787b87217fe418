//! Failure paths driven through mocked stores.

use actix_web::{http::StatusCode, test, web, App};
use chrono::Utc;
use pw_api::AppState;
use pw_core::error::AppError;
use pw_core::models::{TokenKind, User, VerifiedToken};
use pw_core::traits::{MockAuthProvider, MockCommentRepo, MockPostRepo, MockUserRepo};
use serde_json::Value;
use uuid::Uuid;

fn state(
    users: MockUserRepo,
    posts: MockPostRepo,
    auth: MockAuthProvider,
) -> web::Data<AppState> {
    web::Data::new(AppState {
        users: Box::new(users),
        posts: Box::new(posts),
        comments: Box::new(MockCommentRepo::new()),
        auth: Box::new(auth),
    })
}

/// Wires the mocks so that any Bearer token resolves to `user`.
fn signed_in(user: &User) -> (MockUserRepo, MockAuthProvider) {
    let subject = user.uuid;
    let mut auth = MockAuthProvider::new();
    auth.expect_verify().returning(move |_| {
        Ok(VerifiedToken {
            subject,
            kind: TokenKind::Access,
        })
    });

    let found = user.clone();
    let mut users = MockUserRepo::new();
    users
        .expect_get_user_by_uuid()
        .returning(move |_| Ok(Some(found.clone())));

    (users, auth)
}

fn alice() -> User {
    User {
        id: 1,
        uuid: Uuid::new_v4(),
        username: "alice".to_string(),
        password_hash: String::new(),
        date_joined: Utc::now(),
    }
}

#[actix_web::test]
async fn store_failure_is_a_generic_500() {
    let mut posts = MockPostRepo::new();
    posts
        .expect_list_recent_posts()
        .returning(|| Err(AppError::Internal("database is locked".to_string())));
    let app = test::init_service(App::new().configure(pw_api::app_config(state(
        MockUserRepo::new(),
        posts,
        MockAuthProvider::new(),
    ))))
    .await;

    let req = test::TestRequest::get().uri("/posts/recent/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "internal server error");
}

#[actix_web::test]
async fn pin_on_a_vanished_post_is_not_found() {
    let user = alice();
    let (users, auth) = signed_in(&user);
    let mut posts = MockPostRepo::new();
    posts.expect_pin_post().times(1).returning(|_| Ok(false));
    let app =
        test::init_service(App::new().configure(pw_api::app_config(state(users, posts, auth))))
            .await;

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}/pin/", Uuid::new_v4()))
        .insert_header(("Authorization", "Bearer anything"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn token_for_a_deleted_user_is_unauthorized() {
    let mut auth = MockAuthProvider::new();
    auth.expect_verify().returning(|_| {
        Ok(VerifiedToken {
            subject: Uuid::new_v4(),
            kind: TokenKind::Access,
        })
    });
    let mut users = MockUserRepo::new();
    users.expect_get_user_by_uuid().returning(|_| Ok(None));
    let app = test::init_service(App::new().configure(pw_api::app_config(state(
        users,
        MockPostRepo::new(),
        auth,
    ))))
    .await;

    let req = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header(("Authorization", "Bearer anything"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn duplicate_username_race_surfaces_as_bad_request() {
    let mut users = MockUserRepo::new();
    users
        .expect_create_user()
        .returning(|_| Err(AppError::Conflict("username: already taken".to_string())));
    let mut auth = MockAuthProvider::new();
    auth.expect_hash_password()
        .returning(|_| Ok("$argon2id$stub".to_string()));
    let app = test::init_service(App::new().configure(pw_api::app_config(state(
        users,
        MockPostRepo::new(),
        auth,
    ))))
    .await;

    let req = test::TestRequest::post()
        .uri("/users/register/")
        .set_json(serde_json::json!({ "username": "alice", "password": "correct horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "username: already taken");
}

#[actix_web::test]
async fn unknown_username_still_pays_for_a_hash_check() {
    let mut users = MockUserRepo::new();
    users.expect_get_user_by_username().returning(|_| Ok(None));
    let mut auth = MockAuthProvider::new();
    auth.expect_verify_password()
        .withf(|password, hash| {
            password.to_string() == "correct horse"
                && hash.to_string() == pw_api::handlers::users::DUMMY_PASSWORD_HASH
        })
        .times(1)
        .returning(|_, _| false);
    auth.expect_issue_tokens().never();
    let app = test::init_service(App::new().configure(pw_api::app_config(state(
        users,
        MockPostRepo::new(),
        auth,
    ))))
    .await;

    let req = test::TestRequest::post()
        .uri("/users/login/")
        .set_json(serde_json::json!({ "username": "nobody", "password": "correct horse" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}
