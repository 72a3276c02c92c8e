use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::db::models::{
    Announcement, Category, Faq, FaqCategory, SaleBanner, SizeGuideCategory, Testimonial,
};
use crate::db::store::{ProductFilter, ProductOrdering};
use crate::errors::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnnouncementResponse {
    pub id: i32,
    pub text: String,
}

impl From<Announcement> for AnnouncementResponse {
    fn from(a: Announcement) -> Self {
        AnnouncementResponse { id: a.id, text: a.text }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    pub id: i32,
    pub heading: String,
    pub sub_heading: Option<String>,
    pub image_url: Option<String>,
    pub order: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleBannerResponse {
    pub id: i32,
    pub label: String,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<SaleBanner> for SaleBannerResponse {
    fn from(s: SaleBanner) -> Self {
        SaleBannerResponse {
            id: s.id,
            label: s.label,
            ends_at: s.ends_at,
            is_active: s.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestimonialResponse {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub text: String,
    pub rating: i32,
    pub product_name: String,
}

impl From<Testimonial> for TestimonialResponse {
    fn from(t: Testimonial) -> Self {
        TestimonialResponse {
            id: t.id,
            name: t.name,
            location: t.location,
            text: t.text,
            rating: t.rating,
            product_name: t.product_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SocialLinkResponse {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleInfo {
    pub enabled: bool,
    pub label: Option<String>,
    #[serde(rename = "endsAt")]
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub discount_percent: i32,
    pub images: Vec<String>,
    pub category: String,
    pub rating: f64,
    pub reviews: i32,
    pub stock: i32,
    pub sale: Option<SaleInfo>,
    pub specifications: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaqQuestion {
    pub q: String,
    pub a: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaqSectionResponse {
    pub category: String,
    pub questions: Vec<FaqQuestion>,
}

impl From<(FaqCategory, Vec<Faq>)> for FaqSectionResponse {
    fn from((category, questions): (FaqCategory, Vec<Faq>)) -> Self {
        FaqSectionResponse {
            category: category.name,
            questions: questions
                .into_iter()
                .map(|faq| FaqQuestion {
                    q: faq.question,
                    a: faq.answer,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SizeGuideResponse {
    pub slug: String,
    pub name: String,
    pub columns: Value,
    pub data: Value,
    pub instruction_title: String,
    pub instruction_text: String,
}

impl From<SizeGuideCategory> for SizeGuideResponse {
    fn from(g: SizeGuideCategory) -> Self {
        SizeGuideResponse {
            slug: g.slug,
            name: g.name,
            columns: g.columns,
            data: g.data,
            instruction_title: g.instruction_title,
            instruction_text: g.instruction_text,
        }
    }
}

/// Query string accepted by the product list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(rename = "category__name")]
    pub category_name: Option<String>,
    #[serde(rename = "price__gte")]
    pub price_gte: Option<String>,
    #[serde(rename = "price__lte")]
    pub price_lte: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

const MAX_AMOUNT_CHARS: usize = 32;
const MAX_INTEGER_DIGITS: i64 = 8;
const MAX_FRACTION_DIGITS: i64 = 6;

/// Parses a money amount, keeping it within the range of the stored
/// `NUMERIC(10,2)` columns before any arithmetic touches it.
fn parse_amount(field: &str, raw: &str) -> Result<BigDecimal, ApiError> {
    let not_a_number = || ApiError::Validation(format!("{} must be a number", field));
    if raw.len() > MAX_AMOUNT_CHARS {
        return Err(not_a_number());
    }
    let amount = BigDecimal::from_str(raw).map_err(|_| not_a_number())?;

    let (_, scale) = amount.as_bigint_and_exponent();
    let integer_digits = amount.digits() as i64 - scale;
    if scale > MAX_FRACTION_DIGITS || integer_digits > MAX_INTEGER_DIGITS {
        return Err(ApiError::Validation(format!("{} is out of range", field)));
    }
    Ok(amount)
}

fn parse_price(field: &str, raw: Option<&str>) -> Result<Option<BigDecimal>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_amount(field, value).map(Some),
    }
}

impl TryFrom<ProductQuery> for ProductFilter {
    type Error = ApiError;

    fn try_from(query: ProductQuery) -> Result<Self, Self::Error> {
        let min_price = parse_price("price__gte", query.price_gte.as_deref())?;
        let max_price = parse_price("price__lte", query.price_lte.as_deref())?;

        let search_terms = query
            .search
            .as_deref()
            .unwrap_or_default()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let mut ordering: Vec<ProductOrdering> = query
            .ordering
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(ProductOrdering::parse)
            .collect();
        if ordering.is_empty() {
            ordering.push(ProductOrdering::NEWEST_FIRST);
        }

        Ok(ProductFilter {
            category_name: query.category_name.filter(|c| !c.is_empty()),
            min_price,
            max_price,
            search_terms,
            ordering,
        })
    }
}

/// `total_amount` may arrive as a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    pub fn to_decimal(&self) -> Result<BigDecimal, ApiError> {
        let raw = match self {
            AmountInput::Number(n) => n.to_string(),
            AmountInput::Text(s) => s.trim().to_string(),
        };
        let amount = parse_amount("total_amount", &raw)?;
        if amount < BigDecimal::from(0) {
            return Err(ApiError::Validation(
                "total_amount cannot be negative".to_string(),
            ));
        }
        Ok(amount)
    }
}

#[derive(Debug, Deserialize)]
pub struct PromoRequest {
    pub code: Option<String>,
    pub total_amount: Option<AmountInput>,
}

impl PromoRequest {
    /// Returns the raw code and the order total.
    pub fn into_parts(self) -> Result<(String, BigDecimal), ApiError> {
        let code = self
            .code
            .ok_or_else(|| ApiError::Validation("code is required".to_string()))?;
        let total = self
            .total_amount
            .ok_or_else(|| ApiError::Validation("total_amount is required".to_string()))?
            .to_decimal()?;
        Ok((code, total))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromoResponse {
    pub code: String,
    pub discount_amount: f64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::ProductOrderField;
    use serde_json::json;

    #[test]
    fn test_query_defaults_to_newest_first() {
        let filter = ProductFilter::try_from(ProductQuery::default()).unwrap();
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_query_ignores_unknown_ordering_fields() {
        let query = ProductQuery {
            ordering: Some("name,-price".to_string()),
            ..ProductQuery::default()
        };
        let filter = ProductFilter::try_from(query).unwrap();
        assert_eq!(filter.ordering.len(), 1);
        assert_eq!(filter.ordering[0].field, ProductOrderField::Price);
        assert!(filter.ordering[0].descending);
    }

    #[test]
    fn test_query_rejects_bad_price() {
        let query = ProductQuery {
            price_gte: Some("cheap".to_string()),
            ..ProductQuery::default()
        };
        assert!(matches!(
            ProductFilter::try_from(query),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_query_splits_search_terms() {
        let query = ProductQuery {
            search: Some("  silver   ring ".to_string()),
            ..ProductQuery::default()
        };
        let filter = ProductFilter::try_from(query).unwrap();
        assert_eq!(filter.search_terms, vec!["silver", "ring"]);
    }

    #[test]
    fn test_promo_amount_accepts_number_or_string() {
        let req: PromoRequest =
            serde_json::from_value(json!({ "code": "dev10", "total_amount": 5000 })).unwrap();
        let (code, total) = req.into_parts().unwrap();
        assert_eq!(code, "dev10");
        assert_eq!(total, BigDecimal::from(5000));

        let req: PromoRequest =
            serde_json::from_value(json!({ "code": "X", "total_amount": "49.99" })).unwrap();
        assert_eq!(req.into_parts().unwrap().1, BigDecimal::from_str("49.99").unwrap());
    }

    #[test]
    fn test_amounts_outside_money_range_rejected() {
        let long = "1".repeat(40);
        for raw in ["1e10000000", "1e-10000000", "0.0000001", "123456789", long.as_str()] {
            let req: PromoRequest =
                serde_json::from_value(json!({ "code": "X", "total_amount": raw })).unwrap();
            assert!(matches!(req.into_parts(), Err(ApiError::Validation(_))), "{}", raw);
        }

        let req: PromoRequest =
            serde_json::from_value(json!({ "code": "X", "total_amount": "99999999.99" })).unwrap();
        assert!(req.into_parts().is_ok());

        let req: PromoRequest =
            serde_json::from_value(json!({ "code": "X", "total_amount": 1e300 })).unwrap();
        assert!(matches!(req.into_parts(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_query_rejects_huge_price_bounds() {
        let query = ProductQuery {
            price_gte: Some("1e10000000".to_string()),
            ..ProductQuery::default()
        };
        assert!(matches!(
            ProductFilter::try_from(query),
            Err(ApiError::Validation(_))
        ));

        let query = ProductQuery {
            price_lte: Some("2.5e3".to_string()),
            ..ProductQuery::default()
        };
        let filter = ProductFilter::try_from(query).unwrap();
        assert_eq!(filter.max_price, Some(BigDecimal::from(2500)));
    }

    #[test]
    fn test_promo_request_requires_fields() {
        let req: PromoRequest = serde_json::from_value(json!({ "code": "X" })).unwrap();
        assert!(matches!(req.into_parts(), Err(ApiError::Validation(_))));

        let req: PromoRequest =
            serde_json::from_value(json!({ "code": "X", "total_amount": -1 })).unwrap();
        assert!(matches!(req.into_parts(), Err(ApiError::Validation(_))));

        let req: PromoRequest =
            serde_json::from_value(json!({ "code": "X", "total_amount": "abc" })).unwrap();
        assert!(matches!(req.into_parts(), Err(ApiError::Validation(_))));
    }
}
