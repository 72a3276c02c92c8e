diesel::table! {
    announcements (id) {
        id -> Int4,
        text -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    banners (id) {
        id -> Int4,
        heading -> Varchar,
        sub_heading -> Nullable<Varchar>,
        image -> Nullable<Varchar>,
        is_active -> Bool,
        display_order -> Int4,
    }
}

diesel::table! {
    sale_banners (id) {
        id -> Int4,
        label -> Varchar,
        ends_at -> Timestamptz,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    testimonials (id) {
        id -> Int4,
        name -> Varchar,
        location -> Varchar,
        text -> Text,
        rating -> Int4,
        product_name -> Varchar,
        image -> Nullable<Varchar>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    social_links (id) {
        id -> Int4,
        platform -> Varchar,
        url -> Varchar,
        is_active -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int4,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    products (id) {
        id -> Int4,
        name -> Varchar,
        slug -> Varchar,
        description -> Text,
        price -> Numeric,
        discount_percent -> Int4,
        category_id -> Int4,
        stock -> Int4,
        rating -> Float8,
        reviews_count -> Int4,
        specifications -> Jsonb,
        is_sale_active -> Bool,
        sale_label -> Nullable<Varchar>,
        sale_ends_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    product_images (id) {
        id -> Int4,
        product_id -> Int4,
        image -> Varchar,
        display_order -> Int4,
    }
}

diesel::table! {
    faq_categories (id) {
        id -> Int4,
        name -> Varchar,
        display_order -> Int4,
    }
}

diesel::table! {
    faqs (id) {
        id -> Int4,
        category_id -> Int4,
        question -> Varchar,
        answer -> Text,
        display_order -> Int4,
        is_active -> Bool,
    }
}

diesel::table! {
    size_guide_categories (id) {
        id -> Int4,
        slug -> Varchar,
        name -> Varchar,
        display_order -> Int4,
        #[sql_name = "columns"]
        column_headers -> Jsonb,
        data -> Jsonb,
        instruction_title -> Varchar,
        instruction_text -> Text,
    }
}

diesel::table! {
    promo_codes (id) {
        id -> Int4,
        code -> Varchar,
        description -> Varchar,
        discount_type -> Varchar,
        discount_value -> Numeric,
        min_order_amount -> Numeric,
        max_discount_amount -> Nullable<Numeric>,
        is_active -> Bool,
        valid_from -> Timestamptz,
        valid_to -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(products -> categories (category_id));
diesel::joinable!(product_images -> products (product_id));
diesel::joinable!(faqs -> faq_categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    announcements,
    banners,
    sale_banners,
    testimonials,
    social_links,
    categories,
    products,
    product_images,
    faq_categories,
    faqs,
    size_guide_categories,
    promo_codes,
);
