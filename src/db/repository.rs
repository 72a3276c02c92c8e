use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;

use crate::db::connection::PgPool;
use crate::db::models::*;
use crate::db::schema::*;
use crate::db::store::{
    ContentStore, ContentWriter, ProductFilter, ProductOrderField, StoreError, StoreResult,
};

diesel::define_sql_function!(fn upper(x: Text) -> Text);

pub fn get_active_announcements(conn: &mut PgConnection) -> QueryResult<Vec<Announcement>> {
    announcements::table
        .filter(announcements::is_active.eq(true))
        .order((announcements::created_at.desc(), announcements::id.desc()))
        .select(Announcement::as_select())
        .load(conn)
}

pub fn get_active_banners(conn: &mut PgConnection) -> QueryResult<Vec<Banner>> {
    banners::table
        .filter(banners::is_active.eq(true))
        .order((banners::display_order.asc(), banners::id.asc()))
        .select(Banner::as_select())
        .load(conn)
}

pub fn get_live_sale_banner(
    conn: &mut PgConnection,
    now: DateTime<Utc>,
) -> QueryResult<Option<SaleBanner>> {
    sale_banners::table
        .filter(sale_banners::is_active.eq(true))
        .filter(sale_banners::ends_at.ge(now))
        .order((sale_banners::ends_at.asc(), sale_banners::id.asc()))
        .select(SaleBanner::as_select())
        .first(conn)
        .optional()
}

pub fn get_active_testimonials(conn: &mut PgConnection) -> QueryResult<Vec<Testimonial>> {
    testimonials::table
        .filter(testimonials::is_active.eq(true))
        .order((testimonials::created_at.desc(), testimonials::id.desc()))
        .select(Testimonial::as_select())
        .load(conn)
}

pub fn get_social_link(conn: &mut PgConnection, platform: &str) -> QueryResult<Option<SocialLink>> {
    social_links::table
        .filter(social_links::platform.eq(platform))
        .filter(social_links::is_active.eq(true))
        .order((social_links::updated_at.desc(), social_links::id.desc()))
        .select(SocialLink::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_categories(conn: &mut PgConnection) -> QueryResult<Vec<Category>> {
    categories::table
        .order(categories::name.asc())
        .select(Category::as_select())
        .load(conn)
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub fn get_products(
    conn: &mut PgConnection,
    filter: &ProductFilter,
) -> QueryResult<Vec<ProductWithRelations>> {
    let mut query = products::table
        .inner_join(categories::table)
        .select((Product::as_select(), categories::name))
        .into_boxed();

    if let Some(name) = &filter.category_name {
        query = query.filter(categories::name.eq(name.clone()));
    }

    if let Some(min) = &filter.min_price {
        query = query.filter(products::price.ge(min.clone()));
    }

    if let Some(max) = &filter.max_price {
        query = query.filter(products::price.le(max.clone()));
    }

    for term in &filter.search_terms {
        let pattern = format!("%{}%", escape_like(term));
        query = query.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.ilike(pattern)),
        );
    }

    for ordering in &filter.ordering {
        query = match (ordering.field, ordering.descending) {
            (ProductOrderField::Price, false) => query.then_order_by(products::price.asc()),
            (ProductOrderField::Price, true) => query.then_order_by(products::price.desc()),
            (ProductOrderField::CreatedAt, false) => query.then_order_by(products::created_at.asc()),
            (ProductOrderField::CreatedAt, true) => query.then_order_by(products::created_at.desc()),
            (ProductOrderField::Rating, false) => query.then_order_by(products::rating.asc()),
            (ProductOrderField::Rating, true) => query.then_order_by(products::rating.desc()),
        };
    }

    let rows = query
        .then_order_by(products::id.desc())
        .load::<(Product, String)>(conn)?;
    attach_images(conn, rows)
}

pub fn get_product_by_slug(
    conn: &mut PgConnection,
    slug: &str,
) -> QueryResult<Option<ProductWithRelations>> {
    let row = products::table
        .inner_join(categories::table)
        .filter(products::slug.eq(slug))
        .select((Product::as_select(), categories::name))
        .first::<(Product, String)>(conn)
        .optional()?;

    match row {
        Some(row) => Ok(attach_images(conn, vec![row])?.pop()),
        None => Ok(None),
    }
}

// One query for all images of the page, grouped back onto their products.
fn attach_images(
    conn: &mut PgConnection,
    rows: Vec<(Product, String)>,
) -> QueryResult<Vec<ProductWithRelations>> {
    let (products, names): (Vec<Product>, Vec<String>) = rows.into_iter().unzip();
    let images = ProductImage::belonging_to(&products)
        .order((product_images::display_order.asc(), product_images::id.asc()))
        .select(ProductImage::as_select())
        .load::<ProductImage>(conn)?
        .grouped_by(&products);

    Ok(products
        .into_iter()
        .zip(names)
        .zip(images)
        .map(|((product, category_name), images)| ProductWithRelations {
            product,
            category_name,
            images,
        })
        .collect())
}

pub fn get_faq_sections(conn: &mut PgConnection) -> QueryResult<Vec<(FaqCategory, Vec<Faq>)>> {
    let sections = faq_categories::table
        .order((faq_categories::display_order.asc(), faq_categories::id.asc()))
        .select(FaqCategory::as_select())
        .load::<FaqCategory>(conn)?;

    let questions = Faq::belonging_to(&sections)
        .filter(faqs::is_active.eq(true))
        .order((faqs::display_order.asc(), faqs::id.asc()))
        .select(Faq::as_select())
        .load::<Faq>(conn)?
        .grouped_by(&sections);

    Ok(sections.into_iter().zip(questions).collect())
}

pub fn get_size_guides(conn: &mut PgConnection) -> QueryResult<Vec<SizeGuideCategory>> {
    size_guide_categories::table
        .order((
            size_guide_categories::display_order.asc(),
            size_guide_categories::id.asc(),
        ))
        .select(SizeGuideCategory::as_select())
        .load(conn)
}

pub fn get_promo_code(conn: &mut PgConnection, code: &str) -> QueryResult<Option<PromoCode>> {
    promo_codes::table
        .filter(upper(promo_codes::code).eq(code))
        .select(PromoCode::as_select())
        .first(conn)
        .optional()
}

pub fn count_categories(conn: &mut PgConnection) -> QueryResult<i64> {
    categories::table.count().get_result(conn)
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

impl ContentStore for PgStore {
    fn active_announcements(&self) -> StoreResult<Vec<Announcement>> {
        let conn = &mut self.pool.get()?;
        Ok(get_active_announcements(conn)?)
    }

    fn active_banners(&self) -> StoreResult<Vec<Banner>> {
        let conn = &mut self.pool.get()?;
        Ok(get_active_banners(conn)?)
    }

    fn live_sale_banner(&self, now: DateTime<Utc>) -> StoreResult<Option<SaleBanner>> {
        let conn = &mut self.pool.get()?;
        Ok(get_live_sale_banner(conn, now)?)
    }

    fn active_testimonials(&self) -> StoreResult<Vec<Testimonial>> {
        let conn = &mut self.pool.get()?;
        Ok(get_active_testimonials(conn)?)
    }

    fn social_link(&self, platform: &str) -> StoreResult<Option<SocialLink>> {
        let conn = &mut self.pool.get()?;
        Ok(get_social_link(conn, platform)?)
    }

    fn categories(&self) -> StoreResult<Vec<Category>> {
        let conn = &mut self.pool.get()?;
        Ok(get_all_categories(conn)?)
    }

    fn products(&self, filter: &ProductFilter) -> StoreResult<Vec<ProductWithRelations>> {
        let conn = &mut self.pool.get()?;
        Ok(get_products(conn, filter)?)
    }

    fn product_by_slug(&self, slug: &str) -> StoreResult<Option<ProductWithRelations>> {
        let conn = &mut self.pool.get()?;
        Ok(get_product_by_slug(conn, slug)?)
    }

    fn faq_sections(&self) -> StoreResult<Vec<(FaqCategory, Vec<Faq>)>> {
        let conn = &mut self.pool.get()?;
        Ok(get_faq_sections(conn)?)
    }

    fn size_guides(&self) -> StoreResult<Vec<SizeGuideCategory>> {
        let conn = &mut self.pool.get()?;
        Ok(get_size_guides(conn)?)
    }

    fn promo_code(&self, code: &str) -> StoreResult<Option<PromoCode>> {
        let conn = &mut self.pool.get()?;
        Ok(get_promo_code(conn, code)?)
    }
}

/// Inserts records through a single connection, usually inside a transaction.
pub struct PgWriter<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgWriter<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        PgWriter { conn }
    }
}

impl ContentWriter for PgWriter<'_> {
    fn add_announcement(&mut self, new: NewAnnouncement) -> StoreResult<Announcement> {
        Ok(diesel::insert_into(announcements::table)
            .values(&new)
            .returning(Announcement::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_banner(&mut self, new: NewBanner) -> StoreResult<Banner> {
        Ok(diesel::insert_into(banners::table)
            .values(&new)
            .returning(Banner::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_sale_banner(&mut self, new: NewSaleBanner) -> StoreResult<SaleBanner> {
        Ok(diesel::insert_into(sale_banners::table)
            .values(&new)
            .returning(SaleBanner::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_testimonial(&mut self, new: NewTestimonial) -> StoreResult<Testimonial> {
        Ok(diesel::insert_into(testimonials::table)
            .values(&new)
            .returning(Testimonial::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_social_link(&mut self, new: NewSocialLink) -> StoreResult<SocialLink> {
        Ok(diesel::insert_into(social_links::table)
            .values(&new)
            .returning(SocialLink::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_category(&mut self, mut new: NewCategory) -> StoreResult<Category> {
        new.ensure_slug();
        Ok(diesel::insert_into(categories::table)
            .values(&new)
            .returning(Category::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_product(&mut self, mut new: NewProduct) -> StoreResult<Product> {
        new.ensure_slug();
        new.validate().map_err(StoreError::Invalid)?;
        Ok(diesel::insert_into(products::table)
            .values(&new)
            .returning(Product::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_product_image(&mut self, new: NewProductImage) -> StoreResult<ProductImage> {
        Ok(diesel::insert_into(product_images::table)
            .values(&new)
            .returning(ProductImage::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_faq_category(&mut self, new: NewFaqCategory) -> StoreResult<FaqCategory> {
        Ok(diesel::insert_into(faq_categories::table)
            .values(&new)
            .returning(FaqCategory::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_faq(&mut self, new: NewFaq) -> StoreResult<Faq> {
        Ok(diesel::insert_into(faqs::table)
            .values(&new)
            .returning(Faq::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_size_guide(&mut self, new: NewSizeGuideCategory) -> StoreResult<SizeGuideCategory> {
        new.validate().map_err(StoreError::Invalid)?;
        Ok(diesel::insert_into(size_guide_categories::table)
            .values(&new)
            .returning(SizeGuideCategory::as_returning())
            .get_result(&mut *self.conn)?)
    }

    fn add_promo_code(&mut self, new: NewPromoCode) -> StoreResult<PromoCode> {
        Ok(diesel::insert_into(promo_codes::table)
            .values(&new)
            .returning(PromoCode::as_returning())
            .get_result(&mut *self.conn)?)
    }
}
