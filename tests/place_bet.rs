#![allow(non_snake_case)]

use bau_cua::{
    Ack,
    Animal,
    GameConfig,
    Notice,
    Phase,
    Rejection,
    Variant,
    test_helpers::{
        TEST_SEED,
        TestContext,
    },
};

fn wager_with_balance(starting_balance: u64) -> TestContext {
    let config = GameConfig {
        starting_balance,
        ..GameConfig::default()
    };
    TestContext::new_with_config(Variant::Wager, config, TEST_SEED)
}

#[test]
fn place_bet__moves_coins_into_ledger() {
    let mut ctx = TestContext::wager();

    // when
    ctx.bet(Animal::Crab, 2);
    ctx.bet(Animal::Gourd, 1);

    // then
    assert_eq!(ctx.table.balance(), 10_000 - 300);
    assert_eq!(ctx.table.bets().amount(Animal::Crab), 200);
    assert_eq!(ctx.table.bets().amount(Animal::Gourd), 100);
    assert_eq!(ctx.table.bets().total(), 300);
}

#[test]
fn place_bet__above_balance_is_rejected_without_changes() {
    let mut ctx = wager_with_balance(150);
    ctx.bet(Animal::Deer, 1);

    // when
    let result = ctx.table.place_bet(Animal::Deer);

    // then
    assert_eq!(
        result,
        Err(Rejection::InsufficientBalance {
            requested: 100,
            available: 50
        })
    );
    assert_eq!(ctx.table.balance(), 50);
    assert_eq!(ctx.table.bets().amount(Animal::Deer), 100);
    assert_eq!(ctx.notices(), vec![Notice::InsufficientBalance]);
}

#[test]
fn place_bet__whole_balance_is_allowed() {
    let mut ctx = wager_with_balance(100);

    // when
    let result = ctx.table.place_bet(Animal::Shrimp);

    // then
    assert_eq!(result, Ok(Ack::Applied));
    assert_eq!(ctx.table.balance(), 0);
}

#[test]
fn place_bet__ignored_while_rolling() {
    let mut ctx = TestContext::wager();
    ctx.bet(Animal::Fish, 1);
    let _ = ctx.table.roll().unwrap();
    assert_eq!(ctx.table.phase(), Phase::Rolling);

    // when
    let result = ctx.table.place_bet(Animal::Rooster);

    // then
    assert_eq!(result, Ok(Ack::Ignored));
    assert_eq!(ctx.table.bets().amount(Animal::Rooster), 0);
    assert_eq!(ctx.table.balance(), 9_900);
}

#[test]
fn place_bet__ignored_on_free_table() {
    let mut ctx = TestContext::free();

    // when
    let result = ctx.table.place_bet(Animal::Crab);

    // then
    assert_eq!(result, Ok(Ack::Ignored));
    assert!(ctx.table.bets().is_empty());
    assert!(ctx.notices().is_empty());
}

#[test]
fn place_bet_amount__zero_is_ignored() {
    let mut ctx = TestContext::wager();

    // when
    let result = ctx.table.place_bet_amount(Animal::Crab, 0);

    // then
    assert_eq!(result, Ok(Ack::Ignored));
    assert_eq!(ctx.table.balance(), 10_000);
}
