//! Integration test for pricing the pet catalog fixture.
//!
//! Kibble costs ₱100 with a 5kg variation at +₱20, a ₱10 dental chew and a ₱5
//! training treat. Two chews and one treat on a 5kg bag price each unit at
//! 100 + 20 + 10×2 + 5×1 = ₱145, so three bags come to ₱435.
//!
//! The cat tree has an always-on ₱999 discount. The holiday collar's ₱240
//! discount only runs through December.

use jiff::Timestamp;
use testresult::TestResult;

use petshop::{
    fixtures::Fixture,
    prelude::*,
};

#[test]
fn kibble_with_variation_and_add_ons() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let kibble = fixture.product("kibble")?;
    let five_kilo = fixture.variation("kibble", "5kg")?;
    let add_ons = [
        fixture.add_on("kibble", "Dental Chew", 2)?,
        fixture.add_on("kibble", "Training Treat", 1)?,
    ];

    let (unit, total) = preview(kibble, Some(five_kilo), &add_ons, 3, Timestamp::now())?;

    assert_eq!(unit, pesos(145));
    assert_eq!(total, pesos(435));

    Ok(())
}

#[test]
fn always_on_discount_prices_cat_tree() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let cat_tree = fixture.product("cat-tree")?;
    let now = Timestamp::now();

    assert!(is_discount_active(cat_tree, now));
    assert_eq!(unit_price(cat_tree, None, &[], now)?, pesos(999));
    assert_eq!(cat_tree.discount.savings(cat_tree.base_price, now)?, pesos(251));

    Ok(())
}

#[test]
fn holiday_discount_follows_its_window() -> TestResult {
    let fixture = Fixture::from_set("pets")?;
    let collar = fixture.product("holiday-collar")?;

    let november: Timestamp = "2026-11-30T12:00:00Z".parse()?;
    let december: Timestamp = "2026-12-15T12:00:00Z".parse()?;
    let new_year: Timestamp = "2027-01-01T00:00:00Z".parse()?;

    assert_eq!(unit_price(collar, None, &[], november)?, pesos(300));
    assert_eq!(unit_price(collar, None, &[], december)?, pesos(240));
    assert_eq!(unit_price(collar, None, &[], new_year)?, pesos(300));

    Ok(())
}

#[test]
fn switched_off_discount_is_ignored() -> TestResult {
    let mut fixture = Fixture::from_set("pets")?;
    let cat_tree = fixture.product_mut("cat-tree")?;
    cat_tree.discount.active = false;

    assert_eq!(unit_price(cat_tree, None, &[], Timestamp::now())?, pesos(1_250));

    Ok(())
}

#[test]
fn catalog_availability() -> TestResult {
    let fixture = Fixture::from_set("pets")?;

    assert_eq!(fixture.len(), 6);
    assert!(fixture.product("kibble")?.is_available());
    assert!(fixture.product("grooming")?.is_available());
    assert!(!fixture.product("catnip")?.is_available());
    assert!(!fixture.product("retired-leash")?.is_available());

    Ok(())
}
