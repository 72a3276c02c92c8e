use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::ToPrimitive;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::db::models::{Banner, ProductWithRelations, WHATSAPP_GROUP};
use crate::db::store::ProductFilter;
use crate::errors::ApiError;
use crate::models::*;
use crate::promo::{self, PromoError};
use crate::AppState;

/// Names of the routes listed by the API root, keyed as the storefront expects.
pub const ROOT_LINKS: [(&str, &str); 9] = [
    ("announcements", "announcement-list"),
    ("banners", "banner-list"),
    ("sale-banner", "sale-banner"),
    ("products", "product-list"),
    ("categories", "category-list"),
    ("testimonials", "testimonial-list"),
    ("faqs", "faq-list"),
    ("size-guide", "size-guide"),
    ("whatsapp-link", "whatsapp-group-link"),
];

/// Turns a stored media path into an absolute URL on the requesting host.
fn media_url(req: &HttpRequest, prefix: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let info = req.connection_info();
    format!(
        "{}://{}{}{}",
        info.scheme(),
        info.host(),
        prefix,
        path.trim_start_matches('/')
    )
}

fn banner_response(req: &HttpRequest, prefix: &str, banner: Banner) -> BannerResponse {
    let image_url = banner
        .image
        .as_deref()
        .filter(|path| !path.is_empty())
        .map(|path| media_url(req, prefix, path));
    BannerResponse {
        id: banner.id,
        heading: banner.heading,
        sub_heading: banner.sub_heading,
        image_url,
        order: banner.display_order,
    }
}

fn product_response(req: &HttpRequest, prefix: &str, item: ProductWithRelations) -> ProductResponse {
    let ProductWithRelations {
        product,
        category_name,
        images,
    } = item;

    let sale = if product.is_sale_active {
        Some(SaleInfo {
            enabled: true,
            label: product.sale_label,
            ends_at: product.sale_ends_at,
        })
    } else {
        None
    };

    ProductResponse {
        id: product.id,
        slug: product.slug,
        name: product.name,
        description: product.description,
        price: product.price,
        discount_percent: product.discount_percent,
        images: images
            .iter()
            .filter(|img| !img.image.is_empty())
            .map(|img| media_url(req, prefix, &img.image))
            .collect(),
        category: category_name,
        rating: product.rating,
        reviews: product.reviews_count,
        stock: product.stock,
        sale,
        specifications: product.specifications,
    }
}

pub async fn api_root(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let mut links = Map::new();
    for (key, route) in ROOT_LINKS {
        let url = req.url_for_static(route)?;
        links.insert(key.to_string(), Value::String(url.to_string()));
    }
    Ok(HttpResponse::Ok().json(links))
}

pub async fn list_announcements(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let announcements = web::block(move || store.active_announcements()).await??;
    let body: Vec<AnnouncementResponse> = announcements.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn list_banners(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let banners = web::block(move || store.active_banners()).await??;
    let body: Vec<BannerResponse> = banners
        .into_iter()
        .map(|banner| banner_response(&req, &data.media_url, banner))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn active_sale_banner(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let banner = web::block(move || store.live_sale_banner(Utc::now())).await??;
    Ok(HttpResponse::Ok().json(banner.map(SaleBannerResponse::from)))
}

pub async fn list_testimonials(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let testimonials = web::block(move || store.active_testimonials()).await??;
    let body: Vec<TestimonialResponse> = testimonials.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn whatsapp_group_link(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let link = web::block(move || store.social_link(WHATSAPP_GROUP)).await??;
    Ok(HttpResponse::Ok().json(SocialLinkResponse {
        url: link.map(|l| l.url),
    }))
}

pub async fn list_categories(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let categories = web::block(move || store.categories()).await??;
    let body: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn list_products(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = ProductFilter::try_from(query.into_inner())?;
    let store = data.store.clone();
    let products = web::block(move || store.products(&filter)).await??;
    let body: Vec<ProductResponse> = products
        .into_iter()
        .map(|item| product_response(&req, &data.media_url, item))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn get_product(
    req: HttpRequest,
    data: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = slug.into_inner();
    let store = data.store.clone();
    let product = web::block(move || store.product_by_slug(&slug))
        .await??
        .ok_or(ApiError::ProductNotFound)?;
    Ok(HttpResponse::Ok().json(product_response(&req, &data.media_url, product)))
}

pub async fn list_faqs(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let sections = web::block(move || store.faq_sections()).await??;
    let body: Vec<FaqSectionResponse> = sections.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn list_size_guides(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = data.store.clone();
    let guides = web::block(move || store.size_guides()).await??;
    let body: Vec<SizeGuideResponse> = guides.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn validate_promo(
    data: web::Data<AppState>,
    payload: web::Json<PromoRequest>,
) -> Result<HttpResponse, ApiError> {
    let (raw_code, total) = payload.into_inner().into_parts()?;
    let code = promo::normalize_code(&raw_code);

    let store = data.store.clone();
    let lookup = code.clone();
    let promo_code = web::block(move || store.promo_code(&lookup))
        .await??
        .ok_or(PromoError::NotFound)?;

    let discount = promo::apply(&promo_code, &total, Utc::now())?;
    log::debug!("Promo {} applied to {}: discount {}", code, total, discount);
    let discount_amount = discount
        .to_f64()
        .ok_or_else(|| ApiError::Internal(format!("discount {} is not representable", discount)))?;

    Ok(HttpResponse::Ok().json(PromoResponse {
        code: promo_code.code,
        discount_amount,
        message: "Promo code applied successfully!".to_string(),
    }))
}
