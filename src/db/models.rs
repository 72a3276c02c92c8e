use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::db::schema::{
    announcements, banners, categories, faq_categories, faqs, product_images, products,
    promo_codes, sale_banners, size_guide_categories, social_links, testimonials,
};

pub const WHATSAPP_GROUP: &str = "whatsapp_group";

/// Returns the explicit slug when one is given, otherwise slugifies `name`.
pub fn slug_or_derived(explicit: Option<&str>, name: &str) -> String {
    match explicit.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slug::slugify(name),
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = announcements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Announcement {
    pub id: i32,
    pub text: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = announcements)]
pub struct NewAnnouncement {
    pub text: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewAnnouncement {
    pub fn new(text: impl Into<String>) -> Self {
        NewAnnouncement {
            text: text.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = banners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Banner {
    pub id: i32,
    pub heading: String,
    pub sub_heading: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = banners)]
pub struct NewBanner {
    pub heading: String,
    pub sub_heading: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

impl NewBanner {
    pub fn new(heading: impl Into<String>, display_order: i32) -> Self {
        NewBanner {
            heading: heading.into(),
            sub_heading: None,
            image: None,
            is_active: true,
            display_order,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = sale_banners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleBanner {
    pub id: i32,
    pub label: String,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SaleBanner {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sale_banners)]
pub struct NewSaleBanner {
    pub label: String,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewSaleBanner {
    pub fn new(label: impl Into<String>, ends_at: DateTime<Utc>) -> Self {
        NewSaleBanner {
            label: label.into(),
            ends_at,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = testimonials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Testimonial {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub text: String,
    pub rating: i32,
    pub product_name: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = testimonials)]
pub struct NewTestimonial {
    pub name: String,
    pub location: String,
    pub text: String,
    pub rating: i32,
    pub product_name: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewTestimonial {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        text: impl Into<String>,
        product_name: impl Into<String>,
    ) -> Self {
        NewTestimonial {
            name: name.into(),
            location: location.into(),
            text: text.into(),
            rating: 5,
            product_name: product_name.into(),
            image: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = social_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SocialLink {
    pub id: i32,
    pub platform: String,
    pub url: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = social_links)]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl NewSocialLink {
    pub fn whatsapp_group(url: impl Into<String>) -> Self {
        NewSocialLink {
            platform: WHATSAPP_GROUP.to_string(),
            url: url.into(),
            is_active: true,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = categories)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slug_or_derived(None, &name);
        NewCategory { name, slug }
    }

    /// Fills in the slug from the name if it was left blank.
    pub fn ensure_slug(&mut self) {
        self.slug = slug_or_derived(Some(&self.slug), &self.name);
    }
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Category))]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: BigDecimal,
    pub discount_percent: i32,
    pub category_id: i32,
    pub stock: i32,
    pub rating: f64,
    pub reviews_count: i32,
    pub specifications: Value,
    pub is_sale_active: bool,
    pub sale_label: Option<String>,
    pub sale_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: BigDecimal,
    pub discount_percent: i32,
    pub category_id: i32,
    pub stock: i32,
    pub rating: f64,
    pub reviews_count: i32,
    pub specifications: Value,
    pub is_sale_active: bool,
    pub sale_label: Option<String>,
    pub sale_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: BigDecimal,
        category_id: i32,
    ) -> Self {
        let name = name.into();
        let slug = slug_or_derived(None, &name);
        let now = Utc::now();
        NewProduct {
            name,
            slug,
            description: description.into(),
            price,
            discount_percent: 0,
            category_id,
            stock: 0,
            rating: 0.0,
            reviews_count: 0,
            specifications: Value::Array(Vec::new()),
            is_sale_active: false,
            sale_label: None,
            sale_ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn ensure_slug(&mut self) {
        self.slug = slug_or_derived(Some(&self.slug), &self.name);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
        if !(0..=100).contains(&self.discount_percent) {
            return Err("Discount percent must be between 0 and 100".to_string());
        }
        if self.stock < 0 || self.reviews_count < 0 {
            return Err("Stock and review counts cannot be negative".to_string());
        }
        if !self.specifications.is_array() {
            return Err("Specifications must be a list".to_string());
        }
        Ok(())
    }
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Product))]
#[diesel(table_name = product_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub image: String,
    pub display_order: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = product_images)]
pub struct NewProductImage {
    pub product_id: i32,
    pub image: String,
    pub display_order: i32,
}

/// A product with its category name and images, loaded together.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithRelations {
    pub product: Product,
    pub category_name: String,
    pub images: Vec<ProductImage>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = faq_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FaqCategory {
    pub id: i32,
    pub name: String,
    pub display_order: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = faq_categories)]
pub struct NewFaqCategory {
    pub name: String,
    pub display_order: i32,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(FaqCategory, foreign_key = category_id))]
#[diesel(table_name = faqs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Faq {
    pub id: i32,
    pub category_id: i32,
    pub question: String,
    pub answer: String,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = faqs)]
pub struct NewFaq {
    pub category_id: i32,
    pub question: String,
    pub answer: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl NewFaq {
    pub fn new(
        category_id: i32,
        question: impl Into<String>,
        answer: impl Into<String>,
        display_order: i32,
    ) -> Self {
        NewFaq {
            category_id,
            question: question.into(),
            answer: answer.into(),
            display_order,
            is_active: true,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = size_guide_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SizeGuideCategory {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub display_order: i32,
    #[diesel(column_name = column_headers)]
    pub columns: Value,
    pub data: Value,
    pub instruction_title: String,
    pub instruction_text: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = size_guide_categories)]
pub struct NewSizeGuideCategory {
    pub slug: String,
    pub name: String,
    pub display_order: i32,
    #[diesel(column_name = column_headers)]
    pub columns: Value,
    pub data: Value,
    pub instruction_title: String,
    pub instruction_text: String,
}

impl NewSizeGuideCategory {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, display_order: i32) -> Self {
        NewSizeGuideCategory {
            slug: slug.into(),
            name: name.into(),
            display_order,
            columns: Value::Array(Vec::new()),
            data: Value::Array(Vec::new()),
            instruction_title: "How to Measure".to_string(),
            instruction_text: String::new(),
        }
    }

    /// Every row must be an object keyed by the configured column headers.
    pub fn validate(&self) -> Result<(), String> {
        let columns: Vec<&str> = match self.columns.as_array() {
            Some(cols) => cols.iter().filter_map(Value::as_str).collect(),
            None => return Err("Size guide columns must be a list of strings".to_string()),
        };
        let rows = self
            .data
            .as_array()
            .ok_or_else(|| "Size guide data must be a list of rows".to_string())?;
        for row in rows {
            let row = row
                .as_object()
                .ok_or_else(|| "Size guide rows must be objects".to_string())?;
            if let Some(key) = row.keys().find(|k| !columns.contains(&k.as_str())) {
                return Err(format!("Unknown size guide column '{}'", key));
            }
        }
        Ok(())
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = promo_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PromoCode {
    pub id: i32,
    pub code: String,
    pub description: String,
    pub discount_type: String,
    pub discount_value: BigDecimal,
    pub min_order_amount: BigDecimal,
    pub max_discount_amount: Option<BigDecimal>,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl PromoCode {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if matches!(self.valid_to, Some(valid_to) if now > valid_to) {
            return false;
        }
        now >= self.valid_from
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = promo_codes)]
pub struct NewPromoCode {
    pub code: String,
    pub description: String,
    pub discount_type: String,
    pub discount_value: BigDecimal,
    pub min_order_amount: BigDecimal,
    pub max_discount_amount: Option<BigDecimal>,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

impl NewPromoCode {
    pub fn new(code: impl Into<String>, discount_type: &str, discount_value: BigDecimal) -> Self {
        NewPromoCode {
            code: code.into(),
            description: String::new(),
            discount_type: discount_type.to_string(),
            discount_value,
            min_order_amount: BigDecimal::from(0),
            max_discount_amount: None,
            is_active: true,
            valid_from: Utc::now(),
            valid_to: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_slug_derived_from_name() {
        assert_eq!(slug_or_derived(None, "Silver Rings & Bands"), "silver-rings-bands");
        assert_eq!(slug_or_derived(Some("  "), "Anklets"), "anklets");
        assert_eq!(slug_or_derived(Some("custom-slug"), "Anklets"), "custom-slug");
    }

    #[test]
    fn test_new_category_keeps_explicit_slug() {
        let mut category = NewCategory::new("Nose Pins");
        assert_eq!(category.slug, "nose-pins");
        category.slug = "pins".to_string();
        category.ensure_slug();
        assert_eq!(category.slug, "pins");
        category.slug.clear();
        category.ensure_slug();
        assert_eq!(category.slug, "nose-pins");
    }

    #[test]
    fn test_sale_banner_expiry() {
        let now = Utc::now();
        let banner = SaleBanner {
            id: 1,
            label: "Flash Sale".to_string(),
            ends_at: now,
            is_active: true,
            created_at: now - Duration::days(1),
        };
        assert!(!banner.is_expired(now));
        assert!(banner.is_expired(now + Duration::seconds(1)));
    }

    #[test]
    fn test_promo_validity_window() {
        let now = Utc::now();
        let mut promo = PromoCode {
            id: 1,
            code: "DEV10".to_string(),
            description: String::new(),
            discount_type: "percent".to_string(),
            discount_value: BigDecimal::from(10),
            min_order_amount: BigDecimal::from(0),
            max_discount_amount: None,
            is_active: true,
            valid_from: now - Duration::days(1),
            valid_to: None,
        };
        assert!(promo.is_valid(now));

        promo.valid_to = Some(now - Duration::minutes(1));
        assert!(!promo.is_valid(now));

        promo.valid_to = Some(now + Duration::days(1));
        promo.valid_from = now + Duration::hours(1);
        assert!(!promo.is_valid(now));

        promo.valid_from = now - Duration::days(1);
        promo.is_active = false;
        assert!(!promo.is_valid(now));
    }

    #[test]
    fn test_size_guide_rows_must_match_columns() {
        let mut guide = NewSizeGuideCategory::new("rings", "Ring Size Chart", 0);
        guide.columns = json!(["Indian Size", "US Size"]);
        guide.data = json!([{ "Indian Size": "6", "US Size": "3" }]);
        assert!(guide.validate().is_ok());

        guide.data = json!([{ "Indian Size": "6", "UK Size": "F" }]);
        assert!(guide.validate().is_err());
    }

    #[test]
    fn test_size_guide_maps_to_columns_column() {
        let select = size_guide_categories::table.select(SizeGuideCategory::as_select());
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&select).to_string();
        assert!(sql.contains("\"size_guide_categories\".\"columns\""));

        let guide = NewSizeGuideCategory::new("rings", "Ring Size Chart", 0);
        let insert = diesel::insert_into(size_guide_categories::table).values(&guide);
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&insert).to_string();
        assert!(sql.contains("\"columns\""));
    }

    #[test]
    fn test_product_validation() {
        let mut product = NewProduct::new("Ring", "Silver ring", BigDecimal::from(100), 1);
        assert!(product.validate().is_ok());
        product.discount_percent = 120;
        assert!(product.validate().is_err());
    }
}
