//! Promo code validation and discount calculation.
//!
//! All amounts stay in `BigDecimal` until the response is built. A percentage
//! discount is rounded half-up to two decimal places before it is capped, so
//! the caps (`max_discount_amount`, order total) always hold exactly.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::models::PromoCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percent" | "percentage" => Some(DiscountType::Percentage),
            "fixed" => Some(DiscountType::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PromoError {
    #[error("Invalid promo code")]
    NotFound,
    #[error("Promo code is expired or inactive")]
    ExpiredOrInactive,
    #[error("Minimum order amount of ₹{minimum} required")]
    MinimumNotMet { minimum: BigDecimal },
    #[error("Promo code has an unknown discount type '{0}'")]
    UnknownDiscountType(String),
}

pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Checks `promo` against the order total at `now` and returns the discount.
pub fn apply(
    promo: &PromoCode,
    total: &BigDecimal,
    now: DateTime<Utc>,
) -> Result<BigDecimal, PromoError> {
    if !promo.is_valid(now) {
        return Err(PromoError::ExpiredOrInactive);
    }

    if *total < promo.min_order_amount {
        return Err(PromoError::MinimumNotMet {
            minimum: promo.min_order_amount.clone(),
        });
    }

    let discount_type = DiscountType::parse(&promo.discount_type)
        .ok_or_else(|| PromoError::UnknownDiscountType(promo.discount_type.clone()))?;

    let discount = match discount_type {
        DiscountType::Percentage => {
            let raw = total * &promo.discount_value / BigDecimal::from(100);
            let rounded = raw.with_scale_round(2, RoundingMode::HalfUp);
            match &promo.max_discount_amount {
                Some(cap) if !cap.is_zero() => rounded.min(cap.clone()),
                _ => rounded,
            }
        }
        DiscountType::Fixed => promo.discount_value.clone(),
    };

    Ok(discount.min(total.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn promo(code: &str, discount_type: &str, value: &str) -> PromoCode {
        PromoCode {
            id: 1,
            code: code.to_string(),
            description: String::new(),
            discount_type: discount_type.to_string(),
            discount_value: dec(value),
            min_order_amount: dec("0"),
            max_discount_amount: None,
            is_active: true,
            valid_from: Utc::now() - Duration::days(1),
            valid_to: None,
        }
    }

    #[test]
    fn test_percentage_discount_is_capped() {
        let mut percent10 = promo("PERCENT10", "percent", "10");
        percent10.max_discount_amount = Some(dec("200"));
        let discount = apply(&percent10, &dec("5000"), Utc::now()).unwrap();
        assert_eq!(discount, dec("200"));
    }

    #[test]
    fn test_percentage_discount_without_cap() {
        let percent10 = promo("PERCENT10", "percent", "10");
        let discount = apply(&percent10, &dec("5000"), Utc::now()).unwrap();
        assert_eq!(discount, dec("500"));
    }

    #[test]
    fn test_percentage_discount_rounds_half_up() {
        let percent = promo("ODD", "percent", "12.5");
        // 12.5% of 0.99 = 0.12375
        let discount = apply(&percent, &dec("0.99"), Utc::now()).unwrap();
        assert_eq!(discount, dec("0.12"));

        // 10% of 0.45 = 0.045
        let percent10 = promo("P10", "percent", "10");
        let discount = apply(&percent10, &dec("0.45"), Utc::now()).unwrap();
        assert_eq!(discount, dec("0.05"));
    }

    #[test]
    fn test_fixed_discount_never_exceeds_total() {
        let flat = promo("FLAT100", "fixed", "100");
        assert_eq!(apply(&flat, &dec("50"), Utc::now()).unwrap(), dec("50"));
        assert_eq!(apply(&flat, &dec("450"), Utc::now()).unwrap(), dec("100"));
    }

    #[test]
    fn test_percentage_discount_bounded_by_cap_and_total() {
        let mut promo = promo("BIG", "percent", "150");
        promo.max_discount_amount = Some(dec("75"));
        for total in ["0", "10", "49.99", "50", "1000"] {
            let total = dec(total);
            let discount = apply(&promo, &total, Utc::now()).unwrap();
            assert!(discount <= dec("75"));
            assert!(discount <= total);
        }
    }

    #[test]
    fn test_expired_code_rejected_even_when_active() {
        let mut expired = promo("OLD", "fixed", "10");
        expired.valid_to = Some(Utc::now() - Duration::hours(1));
        assert_eq!(
            apply(&expired, &dec("100"), Utc::now()),
            Err(PromoError::ExpiredOrInactive)
        );
    }

    #[test]
    fn test_not_yet_valid_code_rejected() {
        let mut upcoming = promo("SOON", "fixed", "10");
        upcoming.valid_from = Utc::now() + Duration::days(2);
        assert_eq!(
            apply(&upcoming, &dec("100"), Utc::now()),
            Err(PromoError::ExpiredOrInactive)
        );
    }

    #[test]
    fn test_minimum_order_reports_required_amount() {
        let mut min = promo("MIN500", "fixed", "50");
        min.min_order_amount = dec("500.00");
        let err = apply(&min, &dec("499.99"), Utc::now()).unwrap_err();
        assert_eq!(err, PromoError::MinimumNotMet { minimum: dec("500.00") });
        assert_eq!(err.to_string(), "Minimum order amount of ₹500.00 required");

        assert_eq!(apply(&min, &dec("500"), Utc::now()).unwrap(), dec("50"));
    }

    #[test]
    fn test_unknown_discount_type() {
        let odd = promo("BOGO", "bogo", "1");
        assert!(matches!(
            apply(&odd, &dec("10"), Utc::now()),
            Err(PromoError::UnknownDiscountType(_))
        ));
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" dev10 "), "DEV10");
        assert_eq!(normalize_code("DEV10"), normalize_code("dev10"));
    }
}
