use std::fmt::Write;

use crate::action::Action;
use crate::card::{ACE, MIN_RANK, Rank, format_cards};
use crate::game::{RoundReport, TurnSummary};
use crate::learning::ValueTable;
use crate::state::{BetFraction, Participant, RiskCategory, StateKey, TurnView};

/// Player totals shown on the policy grid's vertical axis.
pub const GRID_TOTALS: std::ops::RangeInclusive<u8> = 4..=21;
/// Dealer up-cards on the horizontal axis (11 is the ace).
pub const GRID_DEALER_CARDS: std::ops::RangeInclusive<u8> = MIN_RANK..=ACE;
/// Wager assumed when the grid looks up states, 10 out of 100.
pub const DEFAULT_GRID_BET_FRACTION: f64 = 0.1;

/// One (player total × dealer card) cell of the policy grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub player_total: u8,
    pub dealer_card: Rank,
    pub action: Action,
    /// Rough win likelihood, `(best value + 1) / 2` clamped to [0, 1].
    pub win_probability: f64,
}

/// Recommended actions for one risk category and usable-ace flag.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyGrid {
    pub risk: RiskCategory,
    pub usable_ace: bool,
    pub cells: Vec<GridCell>,
}

impl PolicyGrid {
    pub fn cell(&self, player_total: u8, dealer_card: Rank) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|cell| cell.player_total == player_total && cell.dealer_card == dealer_card)
    }
}

pub fn grid_dealer_cards() -> impl Iterator<Item = Rank> {
    GRID_DEALER_CARDS.filter_map(Rank::new)
}

pub fn policy_grid(
    table: &ValueTable,
    risk: RiskCategory,
    usable_ace: bool,
    bet_fraction: BetFraction,
) -> PolicyGrid {
    let mut cells = Vec::new();
    for player_total in GRID_TOTALS {
        for dealer_card in grid_dealer_cards() {
            let state = StateKey {
                total: player_total,
                dealer_visible: dealer_card,
                usable_ace,
                risk,
                bet_fraction,
            };
            let hit = table.get(&state, Action::Hit);
            let stick = table.get(&state, Action::Stick);
            let action = if hit >= stick { Action::Hit } else { Action::Stick };
            let best = hit.max(stick);
            cells.push(GridCell {
                player_total,
                dealer_card,
                action,
                win_probability: ((best + 1.0) / 2.0).clamp(0.0, 1.0),
            });
        }
    }
    PolicyGrid {
        risk,
        usable_ace,
        cells,
    }
}

/// Panels for every risk category, usable ace first.
pub fn policy_grids(table: &ValueTable, bet_fraction: BetFraction) -> Vec<PolicyGrid> {
    let mut grids = Vec::with_capacity(RiskCategory::ALL.len() * 2);
    for risk in RiskCategory::ALL {
        for usable_ace in [true, false] {
            grids.push(policy_grid(table, risk, usable_ace, bet_fraction));
        }
    }
    grids
}

/// Text table: rows are player totals (high to low), columns dealer cards.
pub fn render_policy_grid(grid: &PolicyGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Risk: {}, Usable Ace: {}",
        grid.risk, grid.usable_ace
    );
    let _ = write!(out, "{:>5}", "");
    for dealer_card in grid_dealer_cards() {
        let _ = write!(out, " {:>6}", dealer_card.to_string());
    }
    let _ = writeln!(out);
    for player_total in GRID_TOTALS.rev() {
        let _ = write!(out, "{player_total:>5}");
        for dealer_card in grid_dealer_cards() {
            match grid.cell(player_total, dealer_card) {
                Some(cell) => {
                    let _ = write!(
                        out,
                        " {}:{:.2}",
                        action_letter(cell.action),
                        cell.win_probability
                    );
                }
                None => {
                    let _ = write!(out, " {:>6}", "--");
                }
            }
        }
        let _ = writeln!(out);
    }
    out
}

/// Windowed mean of `values`. Produces `len - window + 1` points; the window
/// shrinks to the series length when the series is shorter.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let window = window.clamp(1, values.len());
    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);
    for idx in window..values.len() {
        sum += values[idx] - values[idx - window];
        out.push(sum / window as f64);
    }
    out
}

pub fn render_turn(view: &TurnView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} - balance {} (initial {}), bet {}",
        view.name, view.balance, view.starting_balance, view.bet
    );
    let _ = writeln!(
        out,
        "  Hand: {} (total: {})",
        format_cards(&view.hand),
        view.total
    );
    let _ = write!(out, "  Dealer shows: {}", view.dealer_visible);
    out
}

pub fn describe_turn(name: &str, hand: &[Rank], summary: &TurnSummary) -> String {
    let actions: Vec<&str> = summary.actions.iter().map(|a| a.as_str()).collect();
    let total = crate::hand::hand_total(hand);
    let mut text = format!(
        "{name} selects [{}] -> {} (total: {total})",
        actions.join(", "),
        format_cards(hand)
    );
    if summary.busted {
        text.push_str(" BUST");
    }
    text
}

pub fn render_round(report: &RoundReport, participants: &[Participant]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Dealer's hand: {} (total: {})",
        format_cards(&report.dealer_hand),
        report.dealer_total()
    );
    let _ = writeln!(out, "\nRound results:");
    for participant in participants {
        if let Some(outcome) = report.results.get(participant.name()) {
            let _ = writeln!(out, "  {}: {}", participant.name(), outcome.as_str());
        }
    }
    let _ = writeln!(out, "\nCurrent balances:");
    for participant in participants {
        let _ = writeln!(
            out,
            "  {}: {} (initial: {})",
            participant.name(),
            participant.balance(),
            participant.starting_balance()
        );
    }
    out
}

fn action_letter(action: Action) -> char {
    match action {
        Action::Hit => 'H',
        Action::Stick => 'S',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(total: u8, dealer: u8, risk: RiskCategory, usable_ace: bool) -> StateKey {
        StateKey {
            total,
            dealer_visible: Rank::new(dealer).unwrap(),
            usable_ace,
            risk,
            bet_fraction: BetFraction::new(DEFAULT_GRID_BET_FRACTION),
        }
    }

    #[test]
    fn empty_table_recommends_hit_at_even_odds() {
        let grid = policy_grid(
            &ValueTable::new(),
            RiskCategory::Medium,
            false,
            BetFraction::new(DEFAULT_GRID_BET_FRACTION),
        );
        assert_eq!(grid.cells.len(), 18 * 10);
        assert!(grid.cells.iter().all(|c| c.action == Action::Hit));
        assert!(grid.cells.iter().all(|c| c.win_probability == 0.5));
    }

    #[test]
    fn grid_reads_matching_states_only() {
        let mut table = ValueTable::new();
        table.set(state(20, 6, RiskCategory::Medium, false), Action::Stick, 0.8);
        table.set(state(12, 10, RiskCategory::Medium, false), Action::Stick, -2.0);
        table.set(state(12, 10, RiskCategory::Medium, false), Action::Hit, -3.0);
        let grids = policy_grids(&table, BetFraction::new(DEFAULT_GRID_BET_FRACTION));
        assert_eq!(grids.len(), 6);
        let medium_hard = grids
            .iter()
            .find(|g| g.risk == RiskCategory::Medium && !g.usable_ace)
            .unwrap();
        let stand = medium_hard.cell(20, Rank::new(6).unwrap()).unwrap();
        assert_eq!(stand.action, Action::Stick);
        assert!((stand.win_probability - 0.9).abs() < 1e-12);
        let hopeless = medium_hard.cell(12, Rank::TEN).unwrap();
        assert_eq!(hopeless.win_probability, 0.0);

        let high_hard = grids
            .iter()
            .find(|g| g.risk == RiskCategory::High && !g.usable_ace)
            .unwrap();
        assert_eq!(high_hard.cell(20, Rank::new(6).unwrap()).unwrap().action, Action::Hit);

        let text = render_policy_grid(medium_hard);
        assert!(text.contains("S:0.90"));
    }

    #[test]
    fn moving_average_windows() {
        let values = [1.0, -1.0, 1.0, 1.0];
        assert_eq!(moving_average(&values, 2), vec![0.0, 0.0, 1.0]);
        assert_eq!(moving_average(&values, 10), vec![0.5]);
        assert_eq!(moving_average(&values, 0), values.to_vec());
        assert!(moving_average(&[], 3).is_empty());
    }
}
