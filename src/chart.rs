//! PNG rendering of policy grids and training reward curves.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::action::Action;
use crate::visualize::{GRID_DEALER_CARDS, GRID_TOTALS, PolicyGrid, moving_average};

const GRID_COLUMNS: i32 = (*GRID_DEALER_CARDS.end() - *GRID_DEALER_CARDS.start() + 1) as i32;
const GRID_ROWS: i32 = (*GRID_TOTALS.end() - *GRID_TOTALS.start() + 1) as i32;

/// Draws one heat-map panel per grid, two panels per row.
pub fn render_policy_chart(
    out: &Path,
    grids: &[PolicyGrid],
    episodes: u64,
) -> Result<(), Box<dyn Error>> {
    if grids.is_empty() {
        return Err("no policy grids to render".into());
    }
    let rows = grids.len().div_ceil(2);
    let root = BitMapBackend::new(out, (1200, 500 * rows as u32)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;
    let root = root
        .titled(
            &format!(
                "Estimated win probability and suggested action ({episodes} episodes)"
            ),
            ("sans-serif", 26),
        )
        .map_err(|e| format!("{e}"))?;
    let panels = root.split_evenly((rows, 2));

    for (grid, area) in grids.iter().zip(panels.iter()) {
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("Risk: {}, Usable Ace: {}", grid.risk, grid.usable_ace),
                ("sans-serif", 18),
            )
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(40)
            .build_cartesian_2d(0..GRID_COLUMNS, 0..GRID_ROWS)
            .map_err(|e| format!("{e}"))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Dealer's visible card")
            .y_desc("Player's total")
            .x_labels(GRID_COLUMNS as usize)
            .y_labels(GRID_ROWS as usize)
            .x_label_formatter(&|x| dealer_label(*x))
            .y_label_formatter(&|y| (i32::from(*GRID_TOTALS.start()) + *y).to_string())
            .draw()
            .map_err(|e| format!("{e}"))?;

        chart
            .draw_series(grid.cells.iter().map(|cell| {
                let (x, y) = cell_origin(cell.player_total, cell.dealer_card.value());
                Rectangle::new([(x, y), (x + 1, y + 1)], heat_color(cell.win_probability).filled())
            }))
            .map_err(|e| format!("{e}"))?;

        chart
            .draw_series(grid.cells.iter().map(|cell| {
                let (x, y) = cell_origin(cell.player_total, cell.dealer_card.value());
                let letter = match cell.action {
                    Action::Hit => "H",
                    Action::Stick => "S",
                };
                Text::new(
                    format!("{letter} {:.2}", cell.win_probability),
                    (x, y + 1),
                    ("sans-serif", 11).into_font().color(&WHITE),
                )
            }))
            .map_err(|e| format!("{e}"))?;
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}

/// Plots per-episode rewards, or their moving average when `window` is set.
pub fn render_reward_curve(
    out: &Path,
    rewards: &[f64],
    window: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    if rewards.is_empty() {
        return Err("no rewards recorded".into());
    }
    let (series, caption) = match window {
        Some(window) => (
            moving_average(rewards, window),
            format!("Moving average reward (window {window})"),
        ),
        None => (rewards.to_vec(), String::from("Training rewards over episodes")),
    };

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..series.len(), -1.05f64..1.05f64)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc("Reward")
        .y_label_formatter(&|v| format!("{v:.1}"))
        .draw()
        .map_err(|e| format!("{e}"))?;

    chart
        .draw_series(LineSeries::new(
            series.iter().enumerate().map(|(idx, value)| (idx, *value)),
            &BLUE,
        ))
        .map_err(|e| format!("{e}"))?;

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}

fn cell_origin(player_total: u8, dealer_card: u8) -> (i32, i32) {
    (
        i32::from(dealer_card) - i32::from(*GRID_DEALER_CARDS.start()),
        i32::from(player_total) - i32::from(*GRID_TOTALS.start()),
    )
}

fn dealer_label(column: i32) -> String {
    let value = i32::from(*GRID_DEALER_CARDS.start()) + column;
    if value == i32::from(*GRID_DEALER_CARDS.end()) {
        String::from("A")
    } else {
        value.to_string()
    }
}

/// Dark purple at 0 through to yellow at 1.
fn heat_color(probability: f64) -> RGBColor {
    let t = probability.clamp(0.0, 1.0);
    let lerp = |from: u8, to: u8| (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8;
    RGBColor(lerp(68, 253), lerp(1, 231), lerp(84, 37))
}
