use std::collections::VecDeque;

use qjack::{
    Action, Bot, Game, GameError, Outcome, Rank, RiskCategory, Role, StickBot, TurnView, full_shoe,
};

/// Shoe whose cards come out in `deal_order`.
fn stacked(deal_order: &[u8]) -> Vec<Rank> {
    deal_order
        .iter()
        .rev()
        .map(|&value| Rank::new(value).expect("valid rank"))
        .collect()
}

fn single_seat(deal_order: &[u8], balance: u32) -> Result<Game, GameError> {
    Game::builder()
        .with_seed(7)
        .with_shoe(stacked(deal_order))
        .with_participant("p", Role::Policy, balance)
        .build()
}

/// Plays a fixed script of actions, then sticks.
struct Scripted(VecDeque<Action>);

impl Bot for Scripted {
    fn select_action(&mut self, _view: &TurnView) -> Action {
        self.0.pop_front().unwrap_or(Action::Stick)
    }
}

#[test]
fn full_shoe_composition() {
    let shoe = full_shoe();
    assert_eq!(shoe.len(), 52);
    let tens = shoe.iter().filter(|rank| rank.value() == 10).count();
    let aces = shoe.iter().filter(|rank| rank.is_ace()).count();
    assert_eq!(tens, 16);
    assert_eq!(aces, 4);
    assert_eq!(shoe.iter().map(|rank| u32::from(rank.value())).sum::<u32>(), 380);
}

#[test]
fn deal_order_players_then_dealer() -> Result<(), GameError> {
    let mut game = Game::builder()
        .with_shoe(stacked(&[2, 3, 4, 5, 6, 7]))
        .with_participant("a", Role::Policy, 100)
        .with_participant("b", Role::Policy, 100)
        .build()?;
    game.deal_initial();
    let hand = |seat| -> Result<Vec<u8>, GameError> {
        Ok(game.participant(seat)?.hand().iter().map(|r| r.value()).collect())
    };
    assert_eq!(hand(0)?, vec![2, 3]);
    assert_eq!(hand(1)?, vec![4, 5]);
    let dealer: Vec<u8> = game.dealer_hand().iter().map(|r| r.value()).collect();
    assert_eq!(dealer, vec![6, 7]);
    assert_eq!(game.dealer_visible(), Rank::new(6));
    Ok(())
}

#[test]
fn dealer_stands_on_hard_seventeen_and_draw_returns_bet() -> Result<(), GameError> {
    let mut game = single_seat(&[10, 7, 10, 7], 100)?;
    let report = game.play_round(10, &mut [&mut StickBot])?;
    assert_eq!(report.dealer_hand.len(), 2);
    assert_eq!(report.dealer_total(), 17);
    assert_eq!(report.results["p"], Outcome::Draw);
    assert_eq!(game.participant(0)?.balance(), 100);
    Ok(())
}

#[test]
fn dealer_stands_on_soft_seventeen() -> Result<(), GameError> {
    let mut game = single_seat(&[10, 8, 11, 6], 100)?;
    let report = game.play_round(10, &mut [&mut StickBot])?;
    assert_eq!(report.dealer_hand.len(), 2);
    assert_eq!(report.results["p"], Outcome::Win);
    assert_eq!(game.participant(0)?.balance(), 110);
    Ok(())
}

#[test]
fn dealer_draws_below_seventeen_and_bust_pays_double() -> Result<(), GameError> {
    let mut game = single_seat(&[10, 9, 10, 6, 10], 100)?;
    let report = game.play_round(10, &mut [&mut StickBot])?;
    assert_eq!(report.dealer_total(), 26);
    assert_eq!(report.results["p"], Outcome::Win);
    assert_eq!(game.participant(0)?.balance(), 110);
    Ok(())
}

#[test]
fn player_bust_ends_turn_and_loses_even_if_dealer_busts() -> Result<(), GameError> {
    // player 10,6 hits 9; dealer 10,6 draws 10
    let mut game = single_seat(&[10, 6, 10, 6, 9, 10], 100)?;
    let mut bot = Scripted(VecDeque::from([Action::Hit, Action::Hit]));
    let report = game.play_round(10, &mut [&mut bot])?;
    let turn = &report.turns[0];
    assert!(turn.busted);
    assert_eq!(turn.actions, vec![Action::Hit]);
    assert_eq!(game.participant(0)?.total(), 25);
    assert_eq!(report.dealer_total(), 26);
    assert_eq!(report.results["p"], Outcome::Lose);
    assert_eq!(game.participant(0)?.balance(), 90);
    Ok(())
}

#[test]
fn soft_hand_absorbs_a_hit() -> Result<(), GameError> {
    // A,6 hits 10 -> 17 hard
    let mut game = single_seat(&[11, 6, 10, 8, 10], 100)?;
    let mut bot = Scripted(VecDeque::from([Action::Hit]));
    let report = game.play_round(10, &mut [&mut bot])?;
    assert!(!report.turns[0].busted);
    assert_eq!(report.turns[0].actions, vec![Action::Hit, Action::Stick]);
    assert_eq!(game.participant(0)?.total(), 17);
    assert_eq!(report.results["p"], Outcome::Lose);
    Ok(())
}

#[test]
fn short_stack_goes_all_in() -> Result<(), GameError> {
    let mut game = single_seat(&[10, 9, 10, 7], 7)?;
    game.place_bets(10);
    assert_eq!(game.participant(0)?.bet(), 7);
    assert_eq!(game.participant(0)?.balance(), 0);
    game.deal_initial();
    game.dealer_turn();
    let results = game.settle_bets();
    assert_eq!(results["p"], Outcome::Win);
    assert_eq!(game.participant(0)?.balance(), 14);
    Ok(())
}

#[test]
fn state_key_after_deal() -> Result<(), GameError> {
    let mut game = single_seat(&[11, 6, 5, 10], 100)?;
    game.place_bets(10);
    game.deal_initial();
    let state = game.state_key(0)?;
    assert_eq!(state.total, 17);
    assert!(state.usable_ace);
    assert_eq!(state.dealer_visible, Rank::new(5).expect("rank"));
    assert_eq!(state.risk, RiskCategory::Medium);
    assert!((state.bet_fraction.value() - 0.1).abs() < 1e-12);
    Ok(())
}

#[test]
fn exhausted_shoe_refills() -> Result<(), GameError> {
    let mut game = single_seat(&[10, 8, 10, 7], 100)?;
    game.deal_initial();
    assert_eq!(game.shoe_remaining(), 0);
    game.hit(0)?;
    assert_eq!(game.shoe_remaining(), 51);
    Ok(())
}

#[test]
fn round_requires_one_bot_per_seat() -> Result<(), GameError> {
    let mut game = Game::builder()
        .with_seed(3)
        .with_participant("a", Role::Policy, 100)
        .with_participant("b", Role::Policy, 100)
        .build()?;
    let err = game.play_round(10, &mut [&mut StickBot]).unwrap_err();
    assert!(matches!(err, GameError::InvalidConfiguration(_)));
    Ok(())
}

#[test]
fn seeded_rounds_are_reproducible() -> Result<(), GameError> {
    let play = || -> Result<_, GameError> {
        let mut game = Game::builder()
            .with_seed(42)
            .with_participant("a", Role::Policy, 100)
            .with_participant("b", Role::Policy, 100)
            .build()?;
        let mut reports = Vec::new();
        for _ in 0..20 {
            reports.push(game.play_round(10, &mut [&mut StickBot, &mut StickBot])?);
        }
        Ok(reports)
    };
    assert_eq!(play()?, play()?);
    Ok(())
}
