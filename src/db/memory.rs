use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::db::models::*;
use crate::db::store::{
    ContentStore, ContentWriter, ProductFilter, ProductOrderField, ProductOrdering, StoreError,
    StoreResult,
};

/// Vector-backed content store. Filled through `ContentWriter` first, then
/// shared read-only behind an `Arc`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    announcements: Vec<Announcement>,
    banners: Vec<Banner>,
    sale_banners: Vec<SaleBanner>,
    testimonials: Vec<Testimonial>,
    social_links: Vec<SocialLink>,
    categories: Vec<Category>,
    products: Vec<Product>,
    product_images: Vec<ProductImage>,
    faq_categories: Vec<FaqCategory>,
    faqs: Vec<Faq>,
    size_guides: Vec<SizeGuideCategory>,
    promo_codes: Vec<PromoCode>,
}

fn next_id(len: usize) -> i32 {
    len as i32 + 1
}

fn compare_products(a: &Product, b: &Product, orderings: &[ProductOrdering]) -> Ordering {
    for ordering in orderings {
        let cmp = match ordering.field {
            ProductOrderField::Price => a.price.cmp(&b.price),
            ProductOrderField::CreatedAt => a.created_at.cmp(&b.created_at),
            ProductOrderField::Rating => a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal),
        };
        let cmp = if ordering.descending { cmp.reverse() } else { cmp };
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    b.id.cmp(&a.id)
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn category_name(&self, category_id: i32) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
    }

    fn with_relations(&self, product: &Product) -> Option<ProductWithRelations> {
        let category_name = self.category_name(product.category_id)?.to_string();
        let mut images: Vec<ProductImage> = self
            .product_images
            .iter()
            .filter(|img| img.product_id == product.id)
            .cloned()
            .collect();
        images.sort_by_key(|img| (img.display_order, img.id));
        Some(ProductWithRelations {
            product: product.clone(),
            category_name,
            images,
        })
    }

    fn matches(&self, product: &Product, filter: &ProductFilter) -> bool {
        if let Some(name) = &filter.category_name {
            if self.category_name(product.category_id) != Some(name.as_str()) {
                return false;
            }
        }

        if let Some(min) = &filter.min_price {
            if product.price < *min {
                return false;
            }
        }

        if let Some(max) = &filter.max_price {
            if product.price > *max {
                return false;
            }
        }

        let name = product.name.to_lowercase();
        let description = product.description.to_lowercase();
        filter.search_terms.iter().all(|term| {
            let term = term.to_lowercase();
            name.contains(&term) || description.contains(&term)
        })
    }
}

impl ContentStore for MemoryStore {
    fn active_announcements(&self) -> StoreResult<Vec<Announcement>> {
        let mut active: Vec<Announcement> = self
            .announcements
            .iter()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(active)
    }

    fn active_banners(&self) -> StoreResult<Vec<Banner>> {
        let mut active: Vec<Banner> = self.banners.iter().filter(|b| b.is_active).cloned().collect();
        active.sort_by_key(|b| (b.display_order, b.id));
        Ok(active)
    }

    fn live_sale_banner(&self, now: DateTime<Utc>) -> StoreResult<Option<SaleBanner>> {
        Ok(self
            .sale_banners
            .iter()
            .filter(|s| s.is_active && !s.is_expired(now))
            .min_by_key(|s| (s.ends_at, s.id))
            .cloned())
    }

    fn active_testimonials(&self) -> StoreResult<Vec<Testimonial>> {
        let mut active: Vec<Testimonial> = self
            .testimonials
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(active)
    }

    fn social_link(&self, platform: &str) -> StoreResult<Option<SocialLink>> {
        Ok(self
            .social_links
            .iter()
            .filter(|l| l.platform == platform && l.is_active)
            .max_by_key(|l| (l.updated_at, l.id))
            .cloned())
    }

    fn categories(&self) -> StoreResult<Vec<Category>> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<ProductWithRelations>> {
        let mut matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| self.matches(p, filter))
            .collect();
        matching.sort_by(|a, b| compare_products(a, b, &filter.ordering));
        Ok(matching
            .into_iter()
            .filter_map(|p| self.with_relations(p))
            .collect())
    }

    fn product_by_slug(&self, slug: &str) -> StoreResult<Option<ProductWithRelations>> {
        Ok(self
            .products
            .iter()
            .find(|p| p.slug == slug)
            .and_then(|p| self.with_relations(p)))
    }

    fn faq_sections(&self) -> StoreResult<Vec<(FaqCategory, Vec<Faq>)>> {
        let mut sections = self.faq_categories.clone();
        sections.sort_by_key(|c| (c.display_order, c.id));
        Ok(sections
            .into_iter()
            .map(|section| {
                let mut questions: Vec<Faq> = self
                    .faqs
                    .iter()
                    .filter(|q| q.category_id == section.id && q.is_active)
                    .cloned()
                    .collect();
                questions.sort_by_key(|q| (q.display_order, q.id));
                (section, questions)
            })
            .collect())
    }

    fn size_guides(&self) -> StoreResult<Vec<SizeGuideCategory>> {
        let mut guides = self.size_guides.clone();
        guides.sort_by_key(|g| (g.display_order, g.id));
        Ok(guides)
    }

    fn promo_code(&self, code: &str) -> StoreResult<Option<PromoCode>> {
        Ok(self
            .promo_codes
            .iter()
            .find(|p| p.code.to_uppercase() == code)
            .cloned())
    }
}

impl ContentWriter for MemoryStore {
    fn add_announcement(&mut self, new: NewAnnouncement) -> StoreResult<Announcement> {
        let record = Announcement {
            id: next_id(self.announcements.len()),
            text: new.text,
            is_active: new.is_active,
            created_at: new.created_at,
        };
        self.announcements.push(record.clone());
        Ok(record)
    }

    fn add_banner(&mut self, new: NewBanner) -> StoreResult<Banner> {
        let record = Banner {
            id: next_id(self.banners.len()),
            heading: new.heading,
            sub_heading: new.sub_heading,
            image: new.image,
            is_active: new.is_active,
            display_order: new.display_order,
        };
        self.banners.push(record.clone());
        Ok(record)
    }

    fn add_sale_banner(&mut self, new: NewSaleBanner) -> StoreResult<SaleBanner> {
        let record = SaleBanner {
            id: next_id(self.sale_banners.len()),
            label: new.label,
            ends_at: new.ends_at,
            is_active: new.is_active,
            created_at: new.created_at,
        };
        self.sale_banners.push(record.clone());
        Ok(record)
    }

    fn add_testimonial(&mut self, new: NewTestimonial) -> StoreResult<Testimonial> {
        let record = Testimonial {
            id: next_id(self.testimonials.len()),
            name: new.name,
            location: new.location,
            text: new.text,
            rating: new.rating,
            product_name: new.product_name,
            image: new.image,
            is_active: new.is_active,
            created_at: new.created_at,
        };
        self.testimonials.push(record.clone());
        Ok(record)
    }

    fn add_social_link(&mut self, new: NewSocialLink) -> StoreResult<SocialLink> {
        let record = SocialLink {
            id: next_id(self.social_links.len()),
            platform: new.platform,
            url: new.url,
            is_active: new.is_active,
            updated_at: new.updated_at,
        };
        self.social_links.push(record.clone());
        Ok(record)
    }

    fn add_category(&mut self, mut new: NewCategory) -> StoreResult<Category> {
        new.ensure_slug();
        if self.categories.iter().any(|c| c.name == new.name) {
            return Err(StoreError::Conflict(format!("category name '{}' already exists", new.name)));
        }
        if self.categories.iter().any(|c| c.slug == new.slug) {
            return Err(StoreError::Conflict(format!("category slug '{}' already exists", new.slug)));
        }
        let record = Category {
            id: next_id(self.categories.len()),
            name: new.name,
            slug: new.slug,
        };
        self.categories.push(record.clone());
        Ok(record)
    }

    fn add_product(&mut self, mut new: NewProduct) -> StoreResult<Product> {
        new.ensure_slug();
        new.validate().map_err(StoreError::Invalid)?;
        if self.category_name(new.category_id).is_none() {
            return Err(StoreError::Invalid(format!("unknown category {}", new.category_id)));
        }
        if self.products.iter().any(|p| p.slug == new.slug) {
            return Err(StoreError::Conflict(format!("product slug '{}' already exists", new.slug)));
        }
        let record = Product {
            id: next_id(self.products.len()),
            name: new.name,
            slug: new.slug,
            description: new.description,
            price: new.price,
            discount_percent: new.discount_percent,
            category_id: new.category_id,
            stock: new.stock,
            rating: new.rating,
            reviews_count: new.reviews_count,
            specifications: new.specifications,
            is_sale_active: new.is_sale_active,
            sale_label: new.sale_label,
            sale_ends_at: new.sale_ends_at,
            created_at: new.created_at,
            updated_at: new.updated_at,
        };
        self.products.push(record.clone());
        Ok(record)
    }

    fn add_product_image(&mut self, new: NewProductImage) -> StoreResult<ProductImage> {
        if !self.products.iter().any(|p| p.id == new.product_id) {
            return Err(StoreError::Invalid(format!("unknown product {}", new.product_id)));
        }
        let record = ProductImage {
            id: next_id(self.product_images.len()),
            product_id: new.product_id,
            image: new.image,
            display_order: new.display_order,
        };
        self.product_images.push(record.clone());
        Ok(record)
    }

    fn add_faq_category(&mut self, new: NewFaqCategory) -> StoreResult<FaqCategory> {
        if self.faq_categories.iter().any(|c| c.name == new.name) {
            return Err(StoreError::Conflict(format!("FAQ category '{}' already exists", new.name)));
        }
        let record = FaqCategory {
            id: next_id(self.faq_categories.len()),
            name: new.name,
            display_order: new.display_order,
        };
        self.faq_categories.push(record.clone());
        Ok(record)
    }

    fn add_faq(&mut self, new: NewFaq) -> StoreResult<Faq> {
        if !self.faq_categories.iter().any(|c| c.id == new.category_id) {
            return Err(StoreError::Invalid(format!("unknown FAQ category {}", new.category_id)));
        }
        let record = Faq {
            id: next_id(self.faqs.len()),
            category_id: new.category_id,
            question: new.question,
            answer: new.answer,
            display_order: new.display_order,
            is_active: new.is_active,
        };
        self.faqs.push(record.clone());
        Ok(record)
    }

    fn add_size_guide(&mut self, new: NewSizeGuideCategory) -> StoreResult<SizeGuideCategory> {
        new.validate().map_err(StoreError::Invalid)?;
        if self.size_guides.iter().any(|g| g.slug == new.slug) {
            return Err(StoreError::Conflict(format!("size guide slug '{}' already exists", new.slug)));
        }
        let record = SizeGuideCategory {
            id: next_id(self.size_guides.len()),
            slug: new.slug,
            name: new.name,
            display_order: new.display_order,
            columns: new.columns,
            data: new.data,
            instruction_title: new.instruction_title,
            instruction_text: new.instruction_text,
        };
        self.size_guides.push(record.clone());
        Ok(record)
    }

    fn add_promo_code(&mut self, new: NewPromoCode) -> StoreResult<PromoCode> {
        let normalized = new.code.to_uppercase();
        if self.promo_codes.iter().any(|p| p.code.to_uppercase() == normalized) {
            return Err(StoreError::Conflict(format!("promo code '{}' already exists", new.code)));
        }
        let record = PromoCode {
            id: next_id(self.promo_codes.len()),
            code: new.code,
            description: new.description,
            discount_type: new.discount_type,
            discount_value: new.discount_value,
            min_order_amount: new.min_order_amount,
            max_discount_amount: new.max_discount_amount,
            is_active: new.is_active,
            valid_from: new.valid_from,
            valid_to: new.valid_to,
        };
        self.promo_codes.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Duration;

    fn store_with_catalog() -> MemoryStore {
        let mut store = MemoryStore::new();
        let rings = store.add_category(NewCategory::new("Rings")).unwrap();
        let anklets = store.add_category(NewCategory::new("Anklets")).unwrap();
        let now = Utc::now();
        for (name, price, category, age_days, rating) in [
            ("Moon Ring", 1200, rings.id, 3, 4.5),
            ("Star Ring", 800, rings.id, 1, 4.9),
            ("Charm Anklet", 1500, anklets.id, 2, 3.8),
        ] {
            let mut product = NewProduct::new(name, format!("{} in silver", name), BigDecimal::from(price), category);
            product.created_at = now - Duration::days(age_days);
            product.rating = rating;
            store.add_product(product).unwrap();
        }
        store
    }

    fn names(products: Vec<ProductWithRelations>) -> Vec<String> {
        products.into_iter().map(|p| p.product.name).collect()
    }

    #[test]
    fn test_duplicate_slugs_rejected() {
        let mut store = store_with_catalog();
        let err = store.add_category(NewCategory::new("Rings")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let dup = NewProduct::new("Moon Ring", "again", BigDecimal::from(1), 1);
        assert!(matches!(store.add_product(dup), Err(StoreError::Conflict(_))));
    }

    #[test]
    fn test_duplicate_promo_codes_rejected_case_insensitively() {
        let mut store = MemoryStore::new();
        store
            .add_promo_code(NewPromoCode::new("DEV10", "percent", BigDecimal::from(10)))
            .unwrap();
        let err = store
            .add_promo_code(NewPromoCode::new("dev10", "percent", BigDecimal::from(5)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_product_requires_known_category() {
        let mut store = MemoryStore::new();
        let orphan = NewProduct::new("Lost", "no category", BigDecimal::from(1), 42);
        assert!(matches!(store.add_product(orphan), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn test_default_ordering_newest_first() {
        let store = store_with_catalog();
        let products = store.products(&ProductFilter::default()).unwrap();
        assert_eq!(names(products), vec!["Star Ring", "Charm Anklet", "Moon Ring"]);
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let store = store_with_catalog();
        let filter = ProductFilter {
            category_name: Some("Rings".to_string()),
            min_price: Some(BigDecimal::from(1000)),
            ..ProductFilter::default()
        };
        assert_eq!(names(store.products(&filter).unwrap()), vec!["Moon Ring"]);
    }

    #[test]
    fn test_search_requires_every_term() {
        let store = store_with_catalog();
        let filter = ProductFilter {
            search_terms: vec!["SILVER".to_string(), "ring".to_string()],
            ordering: vec![ProductOrdering::parse("price").unwrap()],
            ..ProductFilter::default()
        };
        assert_eq!(names(store.products(&filter).unwrap()), vec!["Star Ring", "Moon Ring"]);
    }

    #[test]
    fn test_order_by_rating_descending() {
        let store = store_with_catalog();
        let filter = ProductFilter {
            ordering: vec![ProductOrdering::parse("-rating").unwrap()],
            ..ProductFilter::default()
        };
        assert_eq!(
            names(store.products(&filter).unwrap()),
            vec!["Star Ring", "Moon Ring", "Charm Anklet"]
        );
    }

    #[test]
    fn test_product_images_sorted_by_order() {
        let mut store = store_with_catalog();
        for (image, order) in [("b.jpg", 2), ("a.jpg", 0), ("c.jpg", 1)] {
            store
                .add_product_image(NewProductImage {
                    product_id: 1,
                    image: image.to_string(),
                    display_order: order,
                })
                .unwrap();
        }
        let product = store.product_by_slug("moon-ring").unwrap().unwrap();
        let images: Vec<&str> = product.images.iter().map(|i| i.image.as_str()).collect();
        assert_eq!(images, vec!["a.jpg", "c.jpg", "b.jpg"]);
        assert_eq!(product.category_name, "Rings");
    }
}
