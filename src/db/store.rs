use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::db::models::*;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("query failed: {0}")]
    Query(DieselError),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid record: {0}")]
    Invalid(String),
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                StoreError::Invalid(info.message().to_string())
            }
            other => StoreError::Query(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrderField {
    Price,
    CreatedAt,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductOrdering {
    pub field: ProductOrderField,
    pub descending: bool,
}

impl ProductOrdering {
    pub const NEWEST_FIRST: ProductOrdering = ProductOrdering {
        field: ProductOrderField::CreatedAt,
        descending: true,
    };

    /// Parses one `ordering` term such as `price` or `-rating`.
    pub fn parse(term: &str) -> Option<Self> {
        let term = term.trim();
        let (descending, name) = match term.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, term),
        };
        let field = match name {
            "price" => ProductOrderField::Price,
            "created_at" => ProductOrderField::CreatedAt,
            "rating" => ProductOrderField::Rating,
            _ => return None,
        };
        Some(ProductOrdering { field, descending })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category_name: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub search_terms: Vec<String>,
    pub ordering: Vec<ProductOrdering>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductFilter {
            category_name: None,
            min_price: None,
            max_price: None,
            search_terms: Vec::new(),
            ordering: vec![ProductOrdering::NEWEST_FIRST],
        }
    }
}

/// Read side of the content store, one method per public read path.
pub trait ContentStore: Send + Sync {
    fn active_announcements(&self) -> StoreResult<Vec<Announcement>>;
    fn active_banners(&self) -> StoreResult<Vec<Banner>>;
    /// The active, unexpired sale banner ending soonest.
    fn live_sale_banner(&self, now: DateTime<Utc>) -> StoreResult<Option<SaleBanner>>;
    fn active_testimonials(&self) -> StoreResult<Vec<Testimonial>>;
    /// The most recently updated active link for `platform`.
    fn social_link(&self, platform: &str) -> StoreResult<Option<SocialLink>>;
    fn categories(&self) -> StoreResult<Vec<Category>>;
    fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<ProductWithRelations>>;
    fn product_by_slug(&self, slug: &str) -> StoreResult<Option<ProductWithRelations>>;
    fn faq_sections(&self) -> StoreResult<Vec<(FaqCategory, Vec<Faq>)>>;
    fn size_guides(&self) -> StoreResult<Vec<SizeGuideCategory>>;
    /// Case-insensitive lookup; `code` is expected to be normalized already.
    fn promo_code(&self, code: &str) -> StoreResult<Option<PromoCode>>;
}

/// Write side used for seeding. Slugs are derived here when left blank.
pub trait ContentWriter {
    fn add_announcement(&mut self, new: NewAnnouncement) -> StoreResult<Announcement>;
    fn add_banner(&mut self, new: NewBanner) -> StoreResult<Banner>;
    fn add_sale_banner(&mut self, new: NewSaleBanner) -> StoreResult<SaleBanner>;
    fn add_testimonial(&mut self, new: NewTestimonial) -> StoreResult<Testimonial>;
    fn add_social_link(&mut self, new: NewSocialLink) -> StoreResult<SocialLink>;
    fn add_category(&mut self, new: NewCategory) -> StoreResult<Category>;
    fn add_product(&mut self, new: NewProduct) -> StoreResult<Product>;
    fn add_product_image(&mut self, new: NewProductImage) -> StoreResult<ProductImage>;
    fn add_faq_category(&mut self, new: NewFaqCategory) -> StoreResult<FaqCategory>;
    fn add_faq(&mut self, new: NewFaq) -> StoreResult<Faq>;
    fn add_size_guide(&mut self, new: NewSizeGuideCategory) -> StoreResult<SizeGuideCategory>;
    fn add_promo_code(&mut self, new: NewPromoCode) -> StoreResult<PromoCode>;
}
