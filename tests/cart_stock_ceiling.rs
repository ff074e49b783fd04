//! Integration test for the cart's per-product stock ceiling over the pet
//! catalog fixture.
//!
//! Kibble has 10 units on hand, shared by its 1kg and 5kg lines. The cat tree
//! has 2, catnip has none and grooming is untracked.

use jiff::Timestamp;
use testresult::TestResult;

use petshop::{fixtures::Fixture, prelude::*};

#[test]
fn ceiling_holds_across_variations_and_updates() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let kibble = fixture.product("kibble")?;
    let small = fixture.variation("kibble", "1kg")?;
    let large = fixture.variation("kibble", "5kg")?;
    let now = Timestamp::now();

    let mut cart = Cart::new();
    let small_line = cart.add(kibble, 4, Some(small), &[], now)?;
    let large_line = cart.add(kibble, 5, Some(large), &[], now)?;

    assert_eq!(cart.quantity_of(kibble.uuid), 9);

    let before = cart.clone();
    let rejected = cart.add(kibble, 2, Some(small), &[], now);

    assert!(matches!(
        rejected,
        Err(CartError::InsufficientStock {
            available: 10,
            in_cart: 9,
            ..
        })
    ));
    assert_eq!(cart, before);

    cart.update_quantity(&large_line, 6)?;
    assert_eq!(cart.quantity_of(kibble.uuid), 10);

    assert!(cart.update_quantity(&small_line, 5).is_err());
    assert_eq!(cart.quantity_of(kibble.uuid), 10);

    cart.update_quantity(&small_line, 1)?;
    cart.add(kibble, 3, Some(small), &[], now)?;
    assert_eq!(cart.quantity_of(kibble.uuid), 10);

    Ok(())
}

#[test]
fn at_ceiling_one_more_is_refused() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let cat_tree = fixture.product("cat-tree")?;
    let now = Timestamp::now();

    let mut cart = Cart::new();
    cart.add(cat_tree, 2, None, &[], now)?;

    let before = cart.clone();
    let error = cart
        .add(cat_tree, 1, None, &[], now)
        .err()
        .ok_or("expected the cart to refuse")?;

    assert_eq!(error.max_additional(), Some(0));
    assert_eq!(
        error.to_string(),
        "Sorry, only 2 pieces available for Cat Tree Tower. You already have 2 in your cart."
    );
    assert_eq!(cart, before);

    Ok(())
}

#[test]
fn out_of_stock_and_untracked() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let now = Timestamp::now();
    let mut cart = Cart::new();

    assert!(matches!(
        cart.add(fixture.product("catnip")?, 1, None, &[], now),
        Err(CartError::OutOfStock { .. })
    ));

    let grooming = fixture.product("grooming")?;
    let large = fixture.variation("grooming", "Large Breed")?;
    cart.add(grooming, 40, Some(large), &[], now)?;

    assert_eq!(cart.total_price()?, pesos(20_000));

    Ok(())
}

#[test]
fn repeated_selection_merges_in_any_add_on_order() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let kibble = fixture.product("kibble")?;
    let chew = fixture.add_on("kibble", "Dental Chew", 1)?;
    let treat = fixture.add_on("kibble", "Training Treat", 1)?;
    let now = Timestamp::now();

    let mut cart = Cart::new();
    let first = cart.add(kibble, 1, None, &[chew.clone(), treat.clone()], now)?;
    let second = cart.add(kibble, 2, None, &[treat, chew], now)?;

    assert_eq!(first, second);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price()?, pesos(345));

    Ok(())
}
