use std::collections::BTreeMap;
use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::action::{Action, Seat};
use crate::bot::Bot;
use crate::card::{BLACKJACK, DEALER_STANDS_ON, Rank};
use crate::encoding::StateEncoder;
use crate::error::GameError;
use crate::hand::hand_total;
use crate::shoe::Shoe;
use crate::state::{Participant, Role, StateKey, TurnView};

pub const DEFAULT_STARTING_BALANCE: u32 = 100;
pub const DEFAULT_BET: u32 = 10;

/// How a participant's round ended.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Lose,
}

impl Outcome {
    /// Amount returned to the participant's balance for a settled `bet`.
    pub fn payout(self, bet: u32) -> u32 {
        match self {
            Outcome::Win => bet.saturating_mul(2),
            Outcome::Draw => bet,
            Outcome::Lose => 0,
        }
    }

    /// Scalar learning signal: +1 win, 0 draw, -1 loss.
    pub fn reward(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.0,
            Outcome::Lose => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Draw => "draw",
            Outcome::Lose => "lose",
        }
    }
}

/// Compares final totals. A busted player loses even when the dealer busts too.
pub fn settle(player_total: u8, dealer_total: u8) -> Outcome {
    if player_total > BLACKJACK {
        Outcome::Lose
    } else if dealer_total > BLACKJACK || player_total > dealer_total {
        Outcome::Win
    } else if player_total == dealer_total {
        Outcome::Draw
    } else {
        Outcome::Lose
    }
}

/// Outcome per participant name.
pub type RoundResults = BTreeMap<String, Outcome>;

/// Record of a single participant's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSummary {
    pub seat: Seat,
    pub actions: Vec<Action>,
    pub busted: bool,
}

impl TurnSummary {
    pub fn last_action(&self) -> Option<Action> {
        self.actions.last().copied()
    }
}

/// Everything that happened in one call to [`Game::play_round`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub turns: Vec<TurnSummary>,
    pub dealer_hand: Vec<Rank>,
    pub results: RoundResults,
}

impl RoundReport {
    pub fn dealer_total(&self) -> u8 {
        hand_total(&self.dealer_hand)
    }
}

/// Table configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameConfig {
    /// Shuffle seed; an entropy-seeded shoe is used when absent.
    pub seed: Option<u64>,
}

/// Builder that seats participants and allows deterministic shoe injection for
/// tests and training runs.
#[derive(Default)]
pub struct GameBuilder {
    config: GameConfig,
    shoe: Option<Vec<Rank>>,
    participants: Vec<Participant>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Fixed shoe order; the last card is dealt first.
    pub fn with_shoe(mut self, cards: Vec<Rank>) -> Self {
        self.shoe = Some(cards);
        self
    }

    pub fn with_participant(mut self, name: impl Into<String>, role: Role, balance: u32) -> Self {
        self.participants.push(Participant::new(name, role, balance));
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Blackjack round engine: one dealer against any number of seated participants.
pub struct Game {
    participants: Vec<Participant>,
    dealer: Vec<Rank>,
    dealer_visible: Option<Rank>,
    shoe: Shoe<StdRng>,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, seat: Seat) -> Result<&Participant, GameError> {
        self.participants
            .get(seat)
            .ok_or(GameError::InvalidSeat(seat))
    }

    pub fn seat_of(&self, name: &str) -> Option<Seat> {
        self.participants.iter().position(|p| p.name() == name)
    }

    pub fn dealer_hand(&self) -> &[Rank] {
        &self.dealer
    }

    pub fn dealer_total(&self) -> u8 {
        hand_total(&self.dealer)
    }

    /// Dealer's face-up card, once the initial deal has happened.
    pub fn dealer_visible(&self) -> Option<Rank> {
        self.dealer_visible
    }

    pub fn shoe_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    /// Restores a participant's bankroll, e.g. between training episodes.
    pub fn reset_balance(&mut self, seat: Seat, balance: u32) -> Result<(), GameError> {
        self.participant_mut(seat)?.set_balance(balance);
        Ok(())
    }

    /// Every participant wagers `min(amount, balance)`.
    pub fn place_bets(&mut self, amount: u32) {
        for participant in &mut self.participants {
            participant.wager(amount);
        }
    }

    /// Clears all hands, deals two cards to each participant and then two to the
    /// dealer. The dealer's first card is the visible one.
    pub fn deal_initial(&mut self) {
        for participant in &mut self.participants {
            participant.clear_hand();
        }
        self.dealer.clear();
        for seat in 0..self.participants.len() {
            for _ in 0..2 {
                let card = self.shoe.draw();
                self.participants[seat].receive(card);
            }
        }
        for _ in 0..2 {
            let card = self.shoe.draw();
            self.dealer.push(card);
        }
        self.dealer_visible = self.dealer.first().copied();
    }

    pub fn state_key(&self, seat: Seat) -> Result<StateKey, GameError> {
        let participant = self.participant(seat)?;
        let visible = self.dealer_visible.ok_or(GameError::NotDealt)?;
        Ok(StateEncoder::encode(participant, visible))
    }

    pub fn turn_view(&self, seat: Seat) -> Result<TurnView, GameError> {
        let participant = self.participant(seat)?;
        let dealer_visible = self.dealer_visible.ok_or(GameError::NotDealt)?;
        Ok(TurnView {
            seat,
            name: participant.name().to_string(),
            hand: participant.hand().to_vec(),
            total: participant.total(),
            dealer_visible,
            balance: participant.balance(),
            starting_balance: participant.starting_balance(),
            bet: participant.bet(),
            state: StateEncoder::encode(participant, dealer_visible),
        })
    }

    /// Deals one card to the seat and returns it.
    pub fn hit(&mut self, seat: Seat) -> Result<Rank, GameError> {
        self.participant(seat)?;
        let card = self.shoe.draw();
        self.participant_mut(seat)?.receive(card);
        Ok(card)
    }

    /// Asks `bot` for decisions until it sticks or the hand busts.
    pub fn player_turn(&mut self, seat: Seat, bot: &mut dyn Bot) -> Result<TurnSummary, GameError> {
        let mut actions = Vec::new();
        loop {
            let view = self.turn_view(seat)?;
            let action = bot.select_action(&view);
            actions.push(action);
            log::trace!("{} at {} chooses {}", view.name, view.state, action);
            match action {
                Action::Hit => {
                    self.hit(seat)?;
                    if self.participant(seat)?.total() > BLACKJACK {
                        return Ok(TurnSummary {
                            seat,
                            actions,
                            busted: true,
                        });
                    }
                }
                Action::Stick => {
                    return Ok(TurnSummary {
                        seat,
                        actions,
                        busted: false,
                    });
                }
            }
        }
    }

    /// Fixed dealer policy: draw while the total is below 17.
    pub fn dealer_turn(&mut self) {
        while hand_total(&self.dealer) < DEALER_STANDS_ON {
            let card = self.shoe.draw();
            self.dealer.push(card);
        }
    }

    /// Pays out every participant against the dealer's final total.
    pub fn settle_bets(&mut self) -> RoundResults {
        let dealer_total = self.dealer_total();
        let mut results = RoundResults::new();
        for participant in &mut self.participants {
            let outcome = settle(participant.total(), dealer_total);
            participant.credit(outcome.payout(participant.bet()));
            results.insert(participant.name().to_string(), outcome);
        }
        results
    }

    /// Bets, deals, runs every seat in order with its bot, plays the dealer and
    /// settles. `bots[i]` plays seat `i`.
    pub fn play_round(
        &mut self,
        bet: u32,
        bots: &mut [&mut dyn Bot],
    ) -> Result<RoundReport, GameError> {
        if bots.len() != self.participants.len() {
            return Err(GameError::InvalidConfiguration(
                "exactly one bot per seat is required",
            ));
        }
        self.place_bets(bet);
        self.deal_initial();
        let mut turns = Vec::with_capacity(bots.len());
        for (seat, bot) in bots.iter_mut().enumerate() {
            turns.push(self.player_turn(seat, &mut **bot)?);
        }
        self.dealer_turn();
        let results = self.settle_bets();
        Ok(RoundReport {
            turns,
            dealer_hand: self.dealer.clone(),
            results,
        })
    }

    fn participant_mut(&mut self, seat: Seat) -> Result<&mut Participant, GameError> {
        self.participants
            .get_mut(seat)
            .ok_or(GameError::InvalidSeat(seat))
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            shoe,
            participants,
        } = builder;
        if participants.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "at least one participant is required",
            ));
        }
        let mut names = HashSet::new();
        for participant in &participants {
            if !names.insert(participant.name()) {
                return Err(GameError::DuplicateName(participant.name().to_string()));
            }
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let shoe = match shoe {
            Some(cards) => Shoe::from_cards(cards, rng),
            None => Shoe::new(rng),
        };
        Ok(Game {
            participants,
            dealer: Vec::new(),
            dealer_visible: None,
            shoe,
        })
    }
}
