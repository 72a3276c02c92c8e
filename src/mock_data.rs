use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::db::models::*;
use crate::db::store::{ContentWriter, StoreResult};

/// Demo storefront content: a small jewellery catalog plus the marketing
/// records every page of the site reads.
pub fn load_demo<W: ContentWriter + ?Sized>(writer: &mut W) -> StoreResult<()> {
    let now = Utc::now();

    for (age_hours, text) in [
        (3, "Free shipping on orders above ₹999"),
        (2, "New festive collection is live"),
        (1, "Use code DEV10 for 10% off"),
    ] {
        let mut announcement = NewAnnouncement::new(text);
        announcement.created_at = now - Duration::hours(age_hours);
        writer.add_announcement(announcement)?;
    }

    let mut hero = NewBanner::new("Handcrafted Silver", 0);
    hero.sub_heading = Some("Timeless pieces for every day".to_string());
    hero.image = Some("banners/hero.jpg".to_string());
    writer.add_banner(hero)?;
    let mut festive = NewBanner::new("Festive Edit", 1);
    festive.sub_heading = Some("Gift-ready sets".to_string());
    writer.add_banner(festive)?;

    writer.add_sale_banner(NewSaleBanner::new(
        "Flash Sale! 50% Off Everything",
        now + Duration::days(3),
    ))?;

    let mut review = NewTestimonial::new(
        "Priya",
        "Mumbai",
        "Beautiful finish and quick delivery.",
        "Moonstone Ring",
    );
    review.created_at = now - Duration::days(2);
    writer.add_testimonial(review)?;
    writer.add_testimonial(NewTestimonial::new(
        "Arjun",
        "Pune",
        "My wife loved the anklets.",
        "Charm Anklet",
    ))?;

    writer.add_social_link(NewSocialLink::whatsapp_group(
        "https://chat.whatsapp.com/demo-storefront",
    ))?;

    let rings = writer.add_category(NewCategory::new("Rings"))?;
    let anklets = writer.add_category(NewCategory::new("Anklets"))?;

    let mut moonstone = NewProduct::new(
        "Moonstone Ring",
        "Sterling silver ring with a natural moonstone.",
        BigDecimal::from(1299),
        rings.id,
    );
    moonstone.discount_percent = 10;
    moonstone.stock = 25;
    moonstone.rating = 4.7;
    moonstone.reviews_count = 38;
    moonstone.specifications = json!([
        { "label": "Material", "value": "925 Silver" },
        { "label": "Stone", "value": "Moonstone" }
    ]);
    moonstone.is_sale_active = true;
    moonstone.sale_label = Some("Flash Sale".to_string());
    moonstone.sale_ends_at = Some(now + Duration::days(3));
    moonstone.created_at = now - Duration::days(10);
    let moonstone = writer.add_product(moonstone)?;
    for (order, image) in ["products/moonstone-front.jpg", "products/moonstone-side.jpg"]
        .into_iter()
        .enumerate()
    {
        writer.add_product_image(NewProductImage {
            product_id: moonstone.id,
            image: image.to_string(),
            display_order: order as i32,
        })?;
    }

    let mut anklet = NewProduct::new(
        "Charm Anklet",
        "Lightweight anklet with tiny bell charms.",
        BigDecimal::from(899),
        anklets.id,
    );
    anklet.stock = 40;
    anklet.rating = 4.4;
    anklet.reviews_count = 12;
    anklet.specifications = json!([{ "label": "Material", "value": "925 Silver" }]);
    let anklet = writer.add_product(anklet)?;
    writer.add_product_image(NewProductImage {
        product_id: anklet.id,
        image: "products/charm-anklet.jpg".to_string(),
        display_order: 0,
    })?;

    let shipping = writer.add_faq_category(NewFaqCategory {
        name: "Orders & Shipping".to_string(),
        display_order: 0,
    })?;
    writer.add_faq(NewFaq::new(
        shipping.id,
        "How long does delivery take?",
        "Orders ship within 2 business days and arrive in 3-7 days.",
        0,
    ))?;
    writer.add_faq(NewFaq::new(
        shipping.id,
        "Do you ship internationally?",
        "Not yet. We currently ship within India only.",
        1,
    ))?;
    let care = writer.add_faq_category(NewFaqCategory {
        name: "Jewellery Care".to_string(),
        display_order: 1,
    })?;
    writer.add_faq(NewFaq::new(
        care.id,
        "How do I clean silver?",
        "Wipe with a soft cloth and store in the zip pouch provided.",
        0,
    ))?;

    let mut ring_sizes = NewSizeGuideCategory::new("rings", "Ring Size Chart", 0);
    ring_sizes.columns = json!(["Indian Size", "US Size", "Diameter (mm)"]);
    ring_sizes.data = json!([
        { "Indian Size": "6", "US Size": "3", "Diameter (mm)": "14.1" },
        { "Indian Size": "10", "US Size": "5", "Diameter (mm)": "15.7" },
        { "Indian Size": "14", "US Size": "7", "Diameter (mm)": "17.3" }
    ]);
    ring_sizes.instruction_text =
        "Wrap a strip of paper around your finger and measure the length in mm.".to_string();
    writer.add_size_guide(ring_sizes)?;

    let mut percent10 = NewPromoCode::new("PERCENT10", "percent", BigDecimal::from(10));
    percent10.description = "10% off, capped at ₹200".to_string();
    percent10.max_discount_amount = Some(BigDecimal::from(200));
    writer.add_promo_code(percent10)?;

    let mut flat100 = NewPromoCode::new("FLAT100", "fixed", BigDecimal::from(100));
    flat100.description = "₹100 off any order".to_string();
    writer.add_promo_code(flat100)?;

    let mut dev10 = NewPromoCode::new("DEV10", "percent", BigDecimal::from(10));
    dev10.min_order_amount = BigDecimal::from(500);
    dev10.valid_to = Some(now + Duration::days(30));
    writer.add_promo_code(dev10)?;

    Ok(())
}
