//! Cart behaviour across sequences of operations

use larder::prelude::*;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

fn product(id: &str, minor: i64) -> ProductSnapshot<'static> {
    ProductSnapshot::new(id, id, Money::from_minor(minor, USD))
}

fn expected_subtotal(cart: &Cart<'_>) -> i64 {
    cart.iter()
        .map(|line| line.unit_price().to_minor_units() * i64::from(line.quantity()))
        .sum()
}

#[test]
fn repeated_adds_sum_into_one_line() -> TestResult {
    let sequences: [&[u32]; 4] = [&[1], &[1, 1, 1], &[2, 5, 1], &[10, 3, 7, 1, 1]];

    for quantities in sequences {
        let mut cart = Cart::new(USD);

        for &quantity in quantities {
            cart.add_item(product("jam", 4_50), quantity)?;
        }

        let expected: u32 = quantities.iter().sum();

        assert_eq!(cart.line_count(), 1, "one line for {quantities:?}");
        assert_eq!(
            cart.get(&ProductId::from("jam")).map(LineItem::quantity),
            Some(expected),
            "quantity for {quantities:?}"
        );
    }

    Ok(())
}

#[test]
fn subtotal_matches_lines_after_every_mutation() -> TestResult {
    let mut cart = Cart::new(USD);
    let jam = ProductId::from("jam");
    let bread = ProductId::from("bread");

    let steps: [&dyn Fn(&mut Cart<'static>) -> Result<(), CartError>; 9] = [
        &|cart| cart.add_item(product("jam", 4_50), 2),
        &|cart| cart.add_item(product("bread", 3_25), 1),
        &|cart| cart.add_item(product("cheese", 11_99), 3),
        &|cart| {
            cart.update_quantity(&ProductId::from("bread"), 4);
            Ok(())
        },
        &|cart| {
            cart.remove_item(&ProductId::from("cheese"));
            Ok(())
        },
        &|cart| cart.add_one(product("jam", 4_50)),
        &|cart| {
            cart.decrement(&ProductId::from("jam"));
            Ok(())
        },
        &|cart| {
            cart.update_quantity(&ProductId::from("bread"), -3);
            Ok(())
        },
        &|cart| {
            cart.clear();
            Ok(())
        },
    ];

    for (index, step) in steps.iter().enumerate() {
        step(&mut cart)?;

        assert_eq!(
            cart.subtotal()?.to_minor_units(),
            expected_subtotal(&cart),
            "subtotal after step {index}"
        );
    }

    assert!(cart.get(&jam).is_none(), "jam cleared");
    assert!(cart.get(&bread).is_none(), "bread cleared");

    Ok(())
}

#[test]
fn remove_then_add_does_not_carry_quantity() -> TestResult {
    let mut cart = Cart::new(USD);
    let jam = ProductId::from("jam");

    cart.add_item(product("jam", 4_50), 6)?;
    cart.remove_item(&jam);
    cart.add_item(product("jam", 4_50), 1)?;

    assert_eq!(cart.get(&jam).map(LineItem::quantity), Some(1), "fresh line");

    Ok(())
}

#[test]
fn non_positive_updates_remove_items() -> TestResult {
    for quantity in [0, -1, i64::MIN] {
        let mut cart = Cart::new(USD);
        let jam = ProductId::from("jam");

        cart.add_item(product("jam", 4_50), 3)?;
        cart.update_quantity(&jam, quantity);

        assert!(cart.get(&jam).is_none(), "removed by update to {quantity}");
    }

    Ok(())
}

#[test]
fn two_products_scenario() -> TestResult {
    let mut cart = Cart::new(USD);

    cart.add_item(product("A", 12_99), 2)?;
    cart.add_item(product("B", 8_00), 1)?;

    assert_eq!(cart.item_count(), 3, "item count");
    assert_eq!(cart.subtotal()?, Money::from_minor(33_98, USD), "subtotal");

    let policy = ShippingPolicy::standard(USD);
    let totals = OrderTotals::for_cart(&cart, &policy, Money::from_minor(0, USD))?;

    assert_eq!(totals.shipping_progress_percent(), 68, "progress");

    Ok(())
}

#[test]
fn clear_resets_everything() -> TestResult {
    let mut cart = Cart::new(USD);

    cart.add_item(product("A", 12_99), 2)?;
    cart.add_item(product("B", 8_00), 5)?;
    cart.clear();

    assert_eq!(cart.item_count(), 0, "item count");
    assert_eq!(cart.subtotal()?, Money::from_minor(0, USD), "subtotal");
    assert_eq!(cart.iter().count(), 0, "no lines");

    Ok(())
}
