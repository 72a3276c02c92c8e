pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod mock_data;
pub mod models;
pub mod promo;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, HttpRequest};
use std::sync::Arc;

use crate::db::ContentStore;
use crate::errors::ApiError;

pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub media_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, media_url: impl Into<String>) -> Self {
        AppState {
            store,
            media_url: media_url.into(),
        }
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

/// Registers the public storefront API under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .service(
                web::resource("/")
                    .name("api-root")
                    .route(web::get().to(handlers::api_root)),
            )
            .service(
                web::resource("/announcements/")
                    .name("announcement-list")
                    .route(web::get().to(handlers::list_announcements)),
            )
            .service(
                web::resource("/banners/")
                    .name("banner-list")
                    .route(web::get().to(handlers::list_banners)),
            )
            .service(
                web::resource("/sale-banner/")
                    .name("sale-banner")
                    .route(web::get().to(handlers::active_sale_banner)),
            )
            .service(
                web::resource("/testimonials/")
                    .name("testimonial-list")
                    .route(web::get().to(handlers::list_testimonials)),
            )
            .service(
                web::resource("/social/whatsapp-group/")
                    .name("whatsapp-group-link")
                    .route(web::get().to(handlers::whatsapp_group_link)),
            )
            .service(
                web::resource("/products/")
                    .name("product-list")
                    .route(web::get().to(handlers::list_products)),
            )
            .service(
                web::resource("/products/{slug}/")
                    .name("product-detail")
                    .route(web::get().to(handlers::get_product)),
            )
            .service(
                web::resource("/categories/")
                    .name("category-list")
                    .route(web::get().to(handlers::list_categories)),
            )
            .service(
                web::resource("/faqs/")
                    .name("faq-list")
                    .route(web::get().to(handlers::list_faqs)),
            )
            .service(
                web::resource("/size-guide/")
                    .name("size-guide")
                    .route(web::get().to(handlers::list_size_guides)),
            )
            .service(
                web::resource("/validate-promo/")
                    .name("validate-promo")
                    .route(web::post().to(handlers::validate_promo)),
            ),
    );
}
