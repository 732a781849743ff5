//! End-to-end interception through a bound catalog service
//!
//! Run with: `cargo test --test interception`

mod common;

use common::{catalog_interceptor, Catalog};
use listward::{Interceptor, MutationError, Tag, TagRegistry};
use std::sync::Arc;

fn catalog() -> Catalog {
    Catalog::bind(&catalog_interceptor()).unwrap()
}

// === Scenario: reverse-tagged methods ===

#[test]
fn items_in_order_is_reversed() {
    let result = catalog().items_in_order.invoke(());
    assert_eq!(result, ["Date", "Cherry", "Banana", "Apple"]);
}

#[test]
fn numbers_are_reversed() {
    let result = catalog().numbers.invoke(());
    assert_eq!(result, [5, 4, 3, 2, 1]);
}

#[test]
fn undeclared_sibling_is_not_reversed() {
    let catalog = catalog();
    assert!(catalog.characters.plan().is_noop());
    assert_eq!(catalog.characters.invoke(()), ['a', 'b', 'c']);
}

// === Scenario: deduplicate-tagged methods ===

#[test]
fn strings_are_made_unique_in_order() {
    let result = catalog().items_with_duplicates.invoke(());
    assert_eq!(result, ["Red", "Blue", "Green", "Yellow"]);
}

#[test]
fn integers_are_made_unique_in_order() {
    let result = catalog().numbers_with_duplicates.invoke(());
    assert_eq!(result, [10, 20, 30, 40]);
}

// === Scenario: not-null substitution ===

#[test]
fn absent_result_becomes_modifiable_empty_list() {
    let mut result = catalog()
        .nullable_strings
        .invoke(())
        .expect("substitution must produce a list");

    assert!(result.is_empty());
    result.push("test".to_string()).unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn absent_result_becomes_frozen_empty_list() {
    let mut result = catalog()
        .nullable_integers
        .invoke(())
        .expect("substitution must produce a list");

    assert!(result.is_empty());
    assert_eq!(
        result.push(1),
        Err(MutationError::Unsupported { operation: "push" })
    );
    assert!(result.is_empty());
}

#[test]
fn present_empty_list_is_not_substituted() {
    let result = catalog().empty_flags.invoke(()).unwrap();
    assert!(result.is_empty());
    assert!(result.is_modifiable());
}

#[test]
fn present_list_is_left_alone() {
    let result = catalog().flags.invoke(()).unwrap();
    assert_eq!(result, [true, false]);
}

#[test]
fn substitution_preempts_deduplicate_and_reverse() {
    let result = catalog().nothing_at_all.invoke(()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn each_call_gets_its_own_empty_list() {
    let catalog = catalog();
    let mut first = catalog.nullable_strings.invoke(()).unwrap();
    first.push("leak".to_string()).unwrap();

    let second = catalog.nullable_strings.invoke(()).unwrap();
    assert!(second.is_empty());
}

// === Scenario: declaration order does not change execution order ===

#[test]
fn reverse_declared_first_still_runs_last() {
    let catalog = catalog();
    assert!(catalog.shuffled_tags.plan().deduplicate);
    assert_eq!(catalog.shuffled_tags.invoke(()), [3, 2, 1]);
}

// === Scenario: no aliasing between caller result and function state ===

struct Pantry {
    shelf: Vec<String>,
}

#[test]
fn mutating_result_does_not_touch_function_state() {
    let pantry = Pantry {
        shelf: vec!["flour".to_string(), "sugar".to_string(), "salt".to_string()],
    };
    let registry = TagRegistry::builder()
        .declare("pantry::shelf", [Tag::Reverse])
        .unwrap()
        .build();
    let interceptor = Interceptor::new(Arc::new(registry));
    let shelf = interceptor
        .bind_infallible("pantry::shelf", |_: ()| pantry.shelf.clone())
        .unwrap();

    let mut result = shelf.invoke(());
    assert_eq!(result, ["salt", "sugar", "flour"].map(String::from));
    result.clear().unwrap();

    assert_eq!(pantry.shelf, vec!["flour", "sugar", "salt"]);
    assert_eq!(shelf.invoke(()).len(), 3);
}

// === Scenario: shared wrappers across threads ===

#[test]
fn catalog_is_shared_across_threads() {
    let catalog = Arc::new(catalog());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(catalog.items_in_order.invoke(()), ["Date", "Cherry", "Banana", "Apple"]);
                    assert_eq!(catalog.numbers_with_duplicates.invoke(()), [10, 20, 30, 40]);
                    let mut fresh = catalog.nullable_strings.invoke(()).unwrap();
                    assert!(fresh.is_empty());
                    fresh.push("mine".to_string()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

// === Scenario: float results under Reverse and undeclared ===

#[test]
fn float_readings_reverse_or_pass_through() {
    let registry = TagRegistry::builder()
        .declare("sensor::readings", [Tag::Reverse])
        .unwrap()
        .build();
    let interceptor = Interceptor::new(Arc::new(registry));

    let readings = interceptor
        .bind_infallible("sensor::readings", |_: ()| vec![1.5_f64, 2.5, 3.5])
        .unwrap();
    assert_eq!(readings.invoke(()), [3.5, 2.5, 1.5]);

    let raw = interceptor
        .bind_infallible("sensor::raw", |_: ()| vec![1.5_f64, 2.5, 3.5])
        .unwrap();
    assert_eq!(raw.invoke(()), [1.5, 2.5, 3.5]);
}
