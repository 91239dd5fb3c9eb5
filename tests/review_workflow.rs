// End-to-end review workflows against the public engine API

use chrono::NaiveDate;
use grocer_review::catalog::{Catalog, ProductSku};
use grocer_review::engine::{CategoryFilter, ReviewEngine, ReviewStatus, StatusFilter};
use grocer_review::feed::types::RecommendationRecord;
use proptest::prelude::*;
use std::sync::Arc;

fn product(sku: &str, category: &str) -> ProductSku {
    ProductSku {
        sku: sku.to_string(),
        name: sku.to_string(),
        category: category.to_string(),
        unit_of_measure: "each".to_string(),
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::with_products(vec![
        product("A", "Produce"),
        product("B", "Produce"),
        product("PROD-001", "Produce"),
        product("DAIRY-001", "Dairy"),
        product("BAKE-001", "Bakery"),
    ]))
}

fn record(sku: &str, recommended: i64) -> RecommendationRecord {
    RecommendationRecord {
        sku: sku.to_string(),
        product_name: sku.to_string(),
        current_inventory: 12,
        forecasted_qty: recommended + 4,
        recommended_qty: recommended,
        target_delivery_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
    }
}

fn status_of(engine: &ReviewEngine, sku: &str) -> ReviewStatus {
    engine.get(sku).unwrap().status()
}

#[test]
fn test_adjust_approve_then_bulk_approve_other() {
    let mut engine = ReviewEngine::new(catalog(), vec![record("A", 20), record("B", 10)]);

    engine.set_adjusted_qty("A", 25);
    assert_eq!(status_of(&engine, "A"), ReviewStatus::Adjusted);

    engine.approve("A");
    assert_eq!(status_of(&engine, "A"), ReviewStatus::AdjustedAndApproved);

    engine.toggle_select("B");
    assert_eq!(engine.approve_selected(), 1);
    assert_eq!(status_of(&engine, "B"), ReviewStatus::Approved);
    assert_eq!(engine.selected_count(), 0);
    assert_eq!(status_of(&engine, "A"), ReviewStatus::AdjustedAndApproved);
    assert_eq!(engine.get("A").unwrap().adjusted_qty(), 25);
}

#[test]
fn test_select_all_under_category_replaces_selection() {
    let mut engine = ReviewEngine::new(
        catalog(),
        vec![record("PROD-001", 20), record("DAIRY-001", 6), record("BAKE-001", 9)],
    );
    engine.toggle_select("PROD-001");
    engine.toggle_select("BAKE-001");

    engine.set_category_filter(CategoryFilter::new("Dairy"));
    engine.select_all(true);

    assert_eq!(engine.selected_skus(), vec!["DAIRY-001"]);
}

#[test]
fn test_adjust_and_revert() {
    let mut engine = ReviewEngine::new(catalog(), vec![record("A", 20)]);
    engine.set_adjusted_qty("A", 5);
    assert_eq!(status_of(&engine, "A"), ReviewStatus::Adjusted);
    engine.set_adjusted_qty("A", 20);
    assert_eq!(status_of(&engine, "A"), ReviewStatus::PendingForReview);
}

#[test]
fn test_approved_items_leave_pending_filter() {
    let mut engine = ReviewEngine::new(catalog(), vec![record("A", 20), record("B", 10)]);
    engine.set_status_filter(StatusFilter::Only(ReviewStatus::PendingForReview));
    engine.select_all(true);
    assert_eq!(engine.approve_selected(), 2);
    assert!(engine.filtered_view().is_empty());
    assert_eq!(
        engine.status_counts(),
        vec![
            (ReviewStatus::PendingForReview, 0),
            (ReviewStatus::Adjusted, 0),
            (ReviewStatus::Approved, 2),
            (ReviewStatus::AdjustedAndApproved, 0),
        ]
    );
}

#[derive(Debug, Clone)]
enum Op {
    SetQty(usize, i64),
    Approve(usize),
    Toggle(usize),
    SelectAll(bool),
    ApproveSelected,
    NextStatusFilter,
    NextCategoryFilter,
}

const SKUS: [&str; 5] = ["A", "B", "PROD-001", "DAIRY-001", "BAKE-001"];

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SKUS.len(), 0i64..40).prop_map(|(i, q)| Op::SetQty(i, q)),
        (0..SKUS.len()).prop_map(Op::Approve),
        (0..SKUS.len()).prop_map(Op::Toggle),
        any::<bool>().prop_map(Op::SelectAll),
        Just(Op::ApproveSelected),
        Just(Op::NextStatusFilter),
        Just(Op::NextCategoryFilter),
    ]
}

fn batch() -> Vec<RecommendationRecord> {
    SKUS.iter()
        .enumerate()
        .map(|(i, sku)| record(sku, 10 + i as i64))
        .collect()
}

fn apply(engine: &mut ReviewEngine, categories: &[String], op: &Op) {
    match *op {
        Op::SetQty(i, q) => engine.set_adjusted_qty(SKUS[i], q),
        Op::Approve(i) => engine.approve(SKUS[i]),
        Op::Toggle(i) => engine.toggle_select(SKUS[i]),
        Op::SelectAll(checked) => engine.select_all(checked),
        Op::ApproveSelected => {
            engine.approve_selected();
        }
        Op::NextStatusFilter => {
            let next = engine.status_filter().next();
            engine.set_status_filter(next);
        }
        Op::NextCategoryFilter => {
            let next = engine.category_filter().next(categories);
            engine.set_category_filter(next);
        }
    }
}

proptest! {
    #[test]
    fn prop_selection_stays_within_filtered_view(ops in prop::collection::vec(op(), 0..40)) {
        let catalog = catalog();
        let categories = catalog.categories();
        let mut engine = ReviewEngine::new(catalog, batch());
        for op in &ops {
            apply(&mut engine, &categories, op);
            let visible: Vec<&str> = engine.filtered_view().iter().map(|r| r.sku.as_str()).collect();
            for sku in engine.selected_skus() {
                prop_assert!(visible.contains(&sku), "{} selected but hidden after {:?}", sku, op);
            }
        }
    }

    #[test]
    fn prop_approval_is_sticky(ops in prop::collection::vec(op(), 0..40)) {
        let catalog = catalog();
        let categories = catalog.categories();
        let mut engine = ReviewEngine::new(catalog, batch());
        let mut approved: Vec<String> = Vec::new();
        for op in &ops {
            apply(&mut engine, &categories, op);
            for sku in &approved {
                prop_assert!(engine.get(sku).unwrap().is_approved());
            }
            approved = engine.iter().filter(|r| r.is_approved()).map(|r| r.sku.clone()).collect();
        }
    }

    #[test]
    fn prop_status_matches_quantity(ops in prop::collection::vec(op(), 0..40)) {
        let catalog = catalog();
        let categories = catalog.categories();
        let mut engine = ReviewEngine::new(catalog, batch());
        for op in &ops {
            apply(&mut engine, &categories, op);
        }
        for rec in engine.iter() {
            let adjusted = rec.adjusted_qty() != rec.recommended_qty;
            let expected = match (adjusted, rec.is_approved()) {
                (false, false) => ReviewStatus::PendingForReview,
                (true, false) => ReviewStatus::Adjusted,
                (false, true) => ReviewStatus::Approved,
                (true, true) => ReviewStatus::AdjustedAndApproved,
            };
            prop_assert_eq!(rec.status(), expected);
        }
    }
}
