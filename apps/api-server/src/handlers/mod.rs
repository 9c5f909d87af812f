//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{HttpResponse, web};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .service(
                    web::resource("")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post))
                        .default_service(web::route().to(HttpResponse::MethodNotAllowed)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::put().to(posts::update_post))
                        .route(web::delete().to(posts::delete_post))
                        .default_service(web::route().to(HttpResponse::MethodNotAllowed)),
                ),
        );
}
