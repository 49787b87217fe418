//! # pw-api
//!
//! The web routing and orchestration layer for Pinwall.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;

use actix_web::web;

pub use handlers::AppState;

/// Configures the routes for the posts and users APIs.
///
/// Literal segments (`recent`, `me`, `login`, ...) are registered ahead of the
/// parameterised ones so they are matched first.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{comments, posts, users};

    cfg.service(
        web::scope("/posts")
            .route("/", web::get().to(posts::list_own_posts))
            .route("/", web::post().to(posts::create_post))
            .route("/recent/", web::get().to(posts::recent_posts))
            .service(
                web::resource("/{uuid}/")
                    .route(web::get().to(posts::retrieve_post))
                    .route(web::put().to(posts::replace_post))
                    .route(web::patch().to(posts::patch_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            .route("/{uuid}/pin/", web::put().to(posts::pin_post))
            .service(
                web::resource("/{post_uuid}/comments/")
                    .route(web::get().to(comments::list_comments))
                    .route(web::post().to(comments::create_comment)),
            )
            .service(
                web::resource("/{post_uuid}/comments/{comment_uuid}/")
                    .route(web::get().to(comments::retrieve_comment))
                    .route(web::delete().to(comments::delete_comment)),
            ),
    )
    .service(
        web::scope("/users")
            .route("/login/", web::post().to(users::login))
            .route("/token/refresh/", web::post().to(users::refresh_token))
            .route("/token/verify/", web::post().to(users::verify_token))
            .route("/register/", web::post().to(users::register))
            .service(
                web::resource("/password/change/")
                    .route(web::post().to(users::change_password))
                    .route(web::put().to(users::change_password)),
            )
            .route("/me/", web::get().to(users::current_user))
            .route("/{user_uuid}/posts/", web::get().to(posts::list_user_posts))
            .route("/{username}/", web::get().to(users::user_details)),
    );
}

/// Registers the shared state and all routes in one go, for the binary and for tests.
pub fn app_config(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state);
        configure_routes(cfg);
    }
}
