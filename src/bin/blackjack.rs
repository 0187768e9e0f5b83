use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use qjack::chart::{render_policy_chart, render_reward_curve};
use qjack::game::{DEFAULT_BET, DEFAULT_STARTING_BALANCE};
use qjack::learning::training::{AI_PLAYER, DEFAULT_EPISODES};
use qjack::persistence::DEFAULT_CHECKPOINT;
use qjack::visualize::{DEFAULT_GRID_BET_FRACTION, describe_turn, render_policy_grid, render_round};
use qjack::{
    AgentConfig, BetFraction, Checkpoint, Game, HumanBot, PersistenceError, QLearningAgent, Role,
    RoundReport, StickBot, TrainingConfig, ValueTable, load_checkpoint, load_or_default,
    policy_grids, save_checkpoint, train,
};

/// Checkpoints trained for fewer episodes than this do not give advice.
const MIN_TRAINED_EPISODES: u64 = 1000;
const HUMAN_PLAYER: &str = "Human";
const SEED_STREAM_MIX: u64 = 0xA11C_E5EE_D000_0001;

#[derive(Parser, Debug)]
#[command(
    name = "blackjack",
    about = "Play blackjack with an AI advisor or train it with tabular Q-learning",
    version
)]
struct Cli {
    /// Value-table checkpoint read by `play`/`chart` and written by `train`.
    #[arg(long, global = true, default_value = DEFAULT_CHECKPOINT)]
    checkpoint: PathBuf,

    /// Mode to run; prompts on stdin when omitted.
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Interactive multi-round play against the dealer, next to the AI player.
    Play(PlayArgs),
    /// Bulk training over simulated episodes.
    Train(TrainArgs),
    /// Render the learned policy as a win-probability grid.
    Chart(ChartArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Starting balance for both the human and the AI player.
    #[arg(long, default_value_t = DEFAULT_STARTING_BALANCE)]
    balance: u32,
    /// Shuffle seed (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct TrainArgs {
    /// Number of simulated episodes.
    #[arg(long, default_value_t = DEFAULT_EPISODES)]
    episodes: usize,
    /// Learning rate α.
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f64,
    /// Discount factor γ.
    #[arg(long, default_value_t = 0.9)]
    discount: f64,
    /// Exploration probability ε.
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,
    /// Wager placed by both seats every episode.
    #[arg(long, default_value_t = DEFAULT_BET)]
    bet: u32,
    /// Balance both seats are reset to every episode.
    #[arg(long, default_value_t = DEFAULT_STARTING_BALANCE)]
    balance: u32,
    /// Master seed controlling reproducibility (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
    /// Continue from the existing checkpoint instead of an empty table.
    #[arg(long, action = ArgAction::SetTrue)]
    resume: bool,
    /// Output file for the reward curve.
    #[arg(long, default_value = "training_rewards.png")]
    reward_chart: PathBuf,
    /// Moving-average window for the reward curve (0 plots raw rewards).
    #[arg(long, default_value_t = 1000)]
    window: usize,
    /// Skip rendering the reward curve.
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,
}

#[derive(Parser, Debug)]
struct ChartArgs {
    /// Output PNG file.
    #[arg(short = 'o', long = "out", default_value = "policy.png")]
    out: PathBuf,
    /// Bet fraction assumed when looking up states.
    #[arg(long, default_value_t = DEFAULT_GRID_BET_FRACTION)]
    bet_fraction: f64,
    /// Also print the grids as text.
    #[arg(long, action = ArgAction::SetTrue)]
    text: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mode = match cli.mode {
        Some(mode) => mode,
        None => match prompt_mode(&mut input)? {
            Some(mode) => mode,
            None => {
                println!("Invalid mode. Exiting.");
                return Ok(());
            }
        },
    };
    match mode {
        Mode::Play(args) => run_play(&args, &cli.checkpoint, &mut input),
        Mode::Train(args) => run_training(&args, &cli.checkpoint),
        Mode::Chart(args) => run_chart(&args, &cli.checkpoint),
    }
}

fn prompt_mode(input: &mut impl BufRead) -> Result<Option<Mode>, Box<dyn Error>> {
    let choice = prompt(input, "Choose mode (interactive/training): ")?;
    match choice.trim().to_ascii_lowercase().as_str() {
        "interactive" | "play" => Ok(Some(Mode::Play(PlayArgs::parse_from(["play"])))),
        "training" | "train" => {
            let answer = prompt(input, "Enter number of training episodes (e.g., 100000): ")?;
            let mut args = TrainArgs::parse_from(["train"]);
            args.episodes = parse_or(&answer, DEFAULT_EPISODES);
            Ok(Some(Mode::Train(args)))
        }
        _ => Ok(None),
    }
}

fn run_play(
    args: &PlayArgs,
    checkpoint_path: &Path,
    input: &mut impl BufRead,
) -> Result<(), Box<dyn Error>> {
    let loaded = load_checkpoint(checkpoint_path);
    let (assisted, notice) = advice_status(&loaded);
    println!("{notice}");
    let checkpoint = loaded.unwrap_or_default();
    let mut agent =
        QLearningAgent::from_entropy(AgentConfig::default().greedy()).with_table(checkpoint.table);

    let mut builder = Game::builder()
        .with_participant(HUMAN_PLAYER, Role::Human, args.balance)
        .with_participant(AI_PLAYER, Role::Policy, args.balance);
    if let Some(seed) = args.seed {
        builder = builder.with_seed(seed);
    }
    let mut game = builder.build()?;

    loop {
        let advisor = if assisted { Some(&mut agent) } else { None };
        play_round(&mut game, input, advisor)?;
        let again = prompt(input, "Play another round? (y/n): ")?;
        if !again.trim().eq_ignore_ascii_case("y") {
            break;
        }
    }
    Ok(())
}

/// Whether the checkpoint may advise the human, and the message saying so.
fn advice_status(loaded: &Result<Checkpoint, PersistenceError>) -> (bool, String) {
    match loaded {
        Ok(checkpoint) if checkpoint.episodes >= MIN_TRAINED_EPISODES => (
            true,
            format!(
                "Loaded trained Q-table with {} episodes. AI suggestions enabled.",
                checkpoint.episodes
            ),
        ),
        Ok(checkpoint) => (
            false,
            format!(
                "Q-table exists but with insufficient training episodes ({}). AI suggestions disabled.",
                checkpoint.episodes
            ),
        ),
        Err(err) => (
            false,
            format!("Could not load trained Q-table ({err}). AI suggestions disabled."),
        ),
    }
}

fn play_round(
    game: &mut Game,
    input: &mut impl BufRead,
    mut advisor: Option<&mut QLearningAgent>,
) -> Result<(), Box<dyn Error>> {
    let human_seat = game
        .seat_of(HUMAN_PLAYER)
        .ok_or("human player is not seated")?;
    {
        let human = game.participant(human_seat)?;
        println!(
            "Your balance is: {} (Initial: {})",
            human.balance(),
            human.starting_balance()
        );
    }
    let answer = prompt(input, "Enter your bet amount for this round: ")?;
    let bet = parse_or(&answer, DEFAULT_BET);
    game.place_bets(bet);
    game.deal_initial();

    let mut turns = Vec::with_capacity(game.participants().len());
    for seat in 0..game.participants().len() {
        let summary = match game.participant(seat)?.role() {
            Role::Human => {
                let mut human = HumanBot::new(&mut *input, io::stdout());
                match advisor.as_deref_mut() {
                    Some(agent) => game.player_turn(seat, &mut human.with_advisor(agent))?,
                    None => game.player_turn(seat, &mut human)?,
                }
            }
            Role::Policy => match advisor.as_deref_mut() {
                Some(agent) => game.player_turn(seat, agent)?,
                None => game.player_turn(seat, &mut StickBot)?,
            },
        };
        let participant = game.participant(seat)?;
        println!(
            "{}",
            describe_turn(participant.name(), participant.hand(), &summary)
        );
        turns.push(summary);
    }
    game.dealer_turn();
    let results = game.settle_bets();
    let report = RoundReport {
        turns,
        dealer_hand: game.dealer_hand().to_vec(),
        results,
    };
    println!("{}", render_round(&report, game.participants()));
    println!("{}", "-".repeat(40));
    Ok(())
}

fn run_training(args: &TrainArgs, checkpoint_path: &Path) -> Result<(), Box<dyn Error>> {
    validate_train_args(args)?;
    let config = AgentConfig::new(args.learning_rate, args.discount, args.epsilon)?;
    let (table, prior_episodes) = if args.resume {
        let checkpoint = load_or_default(checkpoint_path);
        (checkpoint.table, checkpoint.episodes)
    } else {
        (ValueTable::new(), 0)
    };
    let agent = match args.seed {
        Some(seed) => QLearningAgent::seeded(config, seed),
        None => QLearningAgent::from_entropy(config),
    };
    let mut agent = agent.with_table(table);

    let mut training = TrainingConfig::new(args.episodes)?;
    training.bet = args.bet;
    training.starting_balance = args.balance;
    if let Some(seed) = args.seed {
        training = training.with_seed(seed ^ SEED_STREAM_MIX);
    }

    println!(
        "Training for {} episodes (α={}, γ={}, ε={})",
        args.episodes, args.learning_rate, args.discount, args.epsilon
    );
    let report = train(&mut agent, &training)?;
    println!(
        "  win rate: {:.2}%  |  mean reward: {:.4}  |  wins/draws/losses: {}/{}/{}",
        report.win_rate() * 100.0,
        report.mean_reward(),
        report.wins,
        report.draws,
        report.losses
    );

    let table = agent.into_table();
    println!("  states learned: {}", table.len());
    let total_episodes = prior_episodes + args.episodes as u64;
    save_checkpoint(checkpoint_path, &Checkpoint::new(table, total_episodes))?;
    println!("  checkpoint saved -> {}", checkpoint_path.display());

    if !args.no_chart {
        let window = (args.window > 0).then_some(args.window);
        render_reward_curve(&args.reward_chart, &report.rewards, window)?;
        println!("  reward curve written to {}", args.reward_chart.display());
    }
    Ok(())
}

fn validate_train_args(args: &TrainArgs) -> Result<(), Box<dyn Error>> {
    if args.episodes == 0 {
        return Err("episodes must be positive".into());
    }
    if args.bet == 0 {
        return Err("bet must be positive".into());
    }
    Ok(())
}

fn run_chart(args: &ChartArgs, checkpoint_path: &Path) -> Result<(), Box<dyn Error>> {
    if !(0.0..=1.0).contains(&args.bet_fraction) {
        return Err("bet fraction must be between 0 and 1".into());
    }
    let checkpoint = load_or_default(checkpoint_path);
    if checkpoint.table.is_empty() {
        println!("No Q table available for analysis.");
        return Ok(());
    }
    let grids = policy_grids(&checkpoint.table, BetFraction::new(args.bet_fraction));
    if args.text {
        for grid in &grids {
            println!("{}", render_policy_grid(grid));
        }
    }
    render_policy_chart(&args.out, &grids, checkpoint.episodes)?;
    println!("Chart written to {}", args.out.display());
    Ok(())
}

/// Prints `message` and reads one line; an empty string on end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Positive number from user text, or `default` when malformed.
fn parse_or<T>(text: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match text.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        assert_eq!(parse_or("abc", DEFAULT_BET), DEFAULT_BET);
        assert_eq!(parse_or("0", DEFAULT_BET), DEFAULT_BET);
        assert_eq!(parse_or("", DEFAULT_BET), DEFAULT_BET);
        assert_eq!(parse_or("-5", DEFAULT_EPISODES), DEFAULT_EPISODES);
        assert_eq!(parse_or(" 25\n", DEFAULT_BET), 25);
        assert_eq!(parse_or("2500", DEFAULT_EPISODES), 2500);
    }

    #[test]
    fn training_prompt_defaults_bad_episode_count() {
        let mut input = Cursor::new("training\nabc\n");
        match prompt_mode(&mut input).unwrap() {
            Some(Mode::Train(args)) => {
                assert_eq!(args.episodes, DEFAULT_EPISODES);
                assert_eq!(args.bet, DEFAULT_BET);
            }
            other => panic!("expected training mode, got {other:?}"),
        }
    }

    #[test]
    fn training_prompt_reads_episode_count() {
        let mut input = Cursor::new("Train\n2500\n");
        match prompt_mode(&mut input).unwrap() {
            Some(Mode::Train(args)) => assert_eq!(args.episodes, 2500),
            other => panic!("expected training mode, got {other:?}"),
        }
    }

    #[test]
    fn interactive_prompt_selects_play() {
        let mut input = Cursor::new("interactive\n");
        match prompt_mode(&mut input).unwrap() {
            Some(Mode::Play(args)) => {
                assert_eq!(args.balance, DEFAULT_STARTING_BALANCE);
                assert!(args.seed.is_none());
            }
            other => panic!("expected play mode, got {other:?}"),
        }
    }

    #[test]
    fn unknown_or_missing_mode_is_rejected() {
        assert!(prompt_mode(&mut Cursor::new("quit\n")).unwrap().is_none());
        assert!(prompt_mode(&mut Cursor::new("")).unwrap().is_none());
    }

    #[test]
    fn advice_depends_on_load_result_and_episodes() {
        let trained: Result<Checkpoint, PersistenceError> =
            Ok(Checkpoint::new(ValueTable::new(), MIN_TRAINED_EPISODES));
        let (assisted, notice) = advice_status(&trained);
        assert!(assisted);
        assert!(notice.starts_with("Loaded trained Q-table"));

        let undertrained: Result<Checkpoint, PersistenceError> =
            Ok(Checkpoint::new(ValueTable::new(), MIN_TRAINED_EPISODES - 1));
        let (assisted, notice) = advice_status(&undertrained);
        assert!(!assisted);
        assert!(notice.contains("insufficient training episodes"));

        let missing: Result<Checkpoint, PersistenceError> = Err(PersistenceError::Io(
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        ));
        let (assisted, notice) = advice_status(&missing);
        assert!(!assisted);
        assert!(notice.starts_with("Could not load trained Q-table"));
    }
}
