use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn test_roll_die_stays_in_range() {
    let mut rng = rng();
    for _ in 0..500 {
        let v = roll_die(&mut rng, 6);
        assert!((1..=6).contains(&v));
    }
    assert_eq!(roll_die(&mut rng, 0), 0);
}

#[test]
fn test_roll_dice_total_is_sum_of_faces() {
    let mut rng = rng();
    let roll = roll_dice(&mut rng, 4, 8);
    assert_eq!(roll.rolls.len(), 4);
    assert_eq!(roll.total, roll.rolls.iter().sum::<i32>());
}

#[test]
fn test_saving_throw_meets_dc() {
    let mut rng = rng();
    // Lowest possible total is 1 + bonus, so a DC at or under that always passes
    let easy = roll_saving_throw(&mut rng, 2, 3);
    assert!(easy.succeeded);
    assert_eq!(easy.total, easy.roll + 2);

    // Highest possible total is 20 + bonus
    let hard = roll_saving_throw(&mut rng, 2, 23);
    assert!(!hard.succeeded);
}

#[test]
fn test_parse_dice_notation() {
    assert_eq!(
        DiceExpr::parse("2d6+3").unwrap(),
        DiceExpr { count: 2, sides: 6, modifier: 3 }
    );
    assert_eq!(
        DiceExpr::parse("d20").unwrap(),
        DiceExpr { count: 1, sides: 20, modifier: 0 }
    );
    assert_eq!(
        DiceExpr::parse(" 3D8 - 1 ").unwrap(),
        DiceExpr { count: 3, sides: 8, modifier: -1 }
    );
    assert_eq!(DiceExpr::parse("2d6+3").unwrap().to_string(), "2d6+3");
}

#[test]
fn test_parse_rejects_bad_notation() {
    assert_eq!(DiceExpr::parse(""), Err(DiceError::Empty));
    assert!(matches!(DiceExpr::parse("12"), Err(DiceError::MissingDie { .. })));
    assert!(matches!(DiceExpr::parse("2d0"), Err(DiceError::ZeroSides { .. })));
    assert!(matches!(DiceExpr::parse("xd6"), Err(DiceError::InvalidNumber { .. })));
    assert!(matches!(DiceExpr::parse("0d6"), Err(DiceError::DiceCount { .. })));
}

#[test]
fn test_parse_rejects_oversized_dice() {
    assert_eq!(
        DiceExpr::parse("2d2000000000"),
        Err(DiceError::Sides {
            sides: 2_000_000_000,
            max: 10_000,
        })
    );
    assert!(DiceExpr::parse("1d10000").is_ok());
}

#[test]
fn test_large_rolls_saturate() {
    let mut rng = rng();
    let roll = roll_dice(&mut rng, 3, u32::MAX);
    assert!(roll.rolls.iter().all(|r| *r >= 1));
    assert!(roll.total >= *roll.rolls.iter().max().unwrap());

    let expr = DiceExpr::parse("1d1+2147483647").unwrap();
    assert_eq!(expr.roll(&mut rng).total, i32::MAX);

    let save = roll_saving_throw(&mut rng, i32::MAX, 10);
    assert_eq!(save.total, i32::MAX);
    assert!(save.succeeded);
}

#[test]
fn test_expression_roll_applies_modifier() {
    let mut rng = rng();
    let expr = DiceExpr::parse("3d1+2").unwrap();
    let roll = expr.roll(&mut rng);
    assert_eq!(roll.rolls, vec![1, 1, 1]);
    assert_eq!(roll.total, 5);
}
