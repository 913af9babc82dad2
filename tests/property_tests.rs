//! Property-based tests for the record forms.
//!
//! These check the field rules across generated inputs rather than a handful
//! of hand-picked cases.

use chrono::{Duration, Local};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tea_admin::models::{
    ActivityStatus, InventoryForm, InventoryItem, Product, ProductCategory, ProductForm,
    QualityCheck, QualityCheckForm, QualityStatus, Sale, SaleForm, Supplier, SupplierForm,
};
use tea_admin::Resource;

// Strategies for generating test data
fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,20}"
}

fn blank_strategy() -> impl Strategy<Value = String> {
    "[ \t]{0,4}"
}

fn cents_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn inventory_counts_follow_sign(name in text_strategy(), stock in -1000i32..1000, threshold in -1000i32..1000) {
        let form = InventoryForm { name, stock: Some(stock), threshold: Some(threshold) };
        let valid = InventoryItem::check(&form).is_ok();
        prop_assert_eq!(valid, stock >= 0 && threshold >= 0);
    }

    #[test]
    fn blank_inventory_name_always_fails(name in blank_strategy(), stock in 0i32..1000) {
        let form = InventoryForm { name, stock: Some(stock), threshold: Some(0) };
        prop_assert!(InventoryItem::check(&form).is_err());
    }

    #[test]
    fn supplier_orders_must_not_be_negative(orders in -500i32..500) {
        let form = SupplierForm {
            name: "Wimal".into(),
            supplier_id: "S0098".into(),
            location: "Riverston".into(),
            status: Some(ActivityStatus::Active),
            orders: Some(orders),
        };
        prop_assert_eq!(Supplier::check(&form).is_ok(), orders >= 0);
    }

    #[test]
    fn sale_needs_positive_quantity_and_amount(quantity in -5i32..50, cents in -10_000i64..10_000) {
        let amount = Decimal::new(cents, 2);
        let form = SaleForm {
            product: "Green Tea".into(),
            quantity: Some(quantity),
            amount: Some(amount),
            date: Some(Local::now().date_naive()),
        };
        prop_assert_eq!(Sale::check(&form).is_ok(), quantity >= 1 && cents > 0);
    }

    #[test]
    fn any_non_negative_price_is_accepted(price in cents_strategy()) {
        let form = ProductForm {
            name: "Chamomile".into(),
            category: Some(ProductCategory::HerbalTea),
            price: Some(price),
            ..ProductForm::default()
        };
        prop_assert!(Product::check(&form).is_ok());
    }

    #[test]
    fn negative_prices_are_rejected(cents in 1i64..10_000_000) {
        let form = ProductForm {
            name: "Chamomile".into(),
            category: Some(ProductCategory::HerbalTea),
            price: Some(Decimal::new(-cents, 2)),
            ..ProductForm::default()
        };
        prop_assert!(Product::check(&form).is_err());
    }

    #[test]
    fn quality_batches_and_dates(batch in "[A-Za-z0-9-]{1,10}", offset in -30i64..30) {
        let form = QualityCheckForm {
            batch_number: batch.clone(),
            inspection_date: Some(Local::now().date_naive() + Duration::days(offset)),
            status: QualityStatus::Passed,
        };
        let batch_ok = batch.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        prop_assert_eq!(QualityCheck::check(&form).is_ok(), batch_ok && offset >= 0);
    }
}
