use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Utc;
use planet_tetris_engine::{GameConfig, GameOverRecord, PieceSeed, PlanetSession};
use rand::Rng as _;

use crate::{
    schema::leaderboard::LeaderboardEntry,
    script::{self, ScriptStep},
    util,
    view,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Number of planet sides (3 to 8)
    #[arg(long, default_value_t = 4)]
    sides: usize,
    /// Player name recorded on the leaderboard
    #[arg(long, default_value = "player")]
    player: String,
    /// Seed for piece generation (32 hex digits); random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Game configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Resume a saved session instead of creating a new one
    #[arg(long, conflicts_with_all = ["sides", "seed", "config"])]
    load: Option<PathBuf>,
    /// Input script, one event per line
    #[arg(long)]
    script: Option<PathBuf>,
    /// Save the session to this file when the script ends
    #[arg(long)]
    save: Option<PathBuf>,
    /// Append game-over records to this leaderboard file
    #[arg(long)]
    leaderboard: Option<PathBuf>,
    /// Print the active side after the script ends
    #[arg(long)]
    print_board: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        sides,
        player,
        seed,
        config,
        load,
        script,
        save,
        leaderboard,
        print_board,
    } = arg;

    let mut session = match load {
        Some(path) => {
            let session = util::read_session_file(path)?;
            eprintln!(
                "Loaded {}-sided session of {} from {}",
                session.side_count(),
                session.player_name(),
                path.display()
            );
            session
        }
        None => {
            let config = match config {
                Some(path) => util::read_config_file(path)?,
                None => GameConfig::default(),
            };
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let session = PlanetSession::new(player.as_str(), *sides, config, seed)?;
            eprintln!(
                "Created {}-sided session of {} (seed {})",
                session.side_count(),
                session.player_name(),
                session.seed()
            );
            session
        }
    };
    session.start();

    let steps = match script {
        Some(path) => read_script_file(path)?,
        None => vec![],
    };
    eprintln!("Running {} script steps...", steps.len());
    let records = script::run_script(&mut session, &steps);
    for record in &records {
        eprintln!(
            "Side {} is over: score {}, level {}, rows {}",
            record.side + 1,
            record.score,
            record.level,
            record.rows_cleared
        );
    }

    if let Some(path) = leaderboard {
        append_to_leaderboard(path, session.player_name(), &records)?;
    }
    if let Some(path) = save {
        util::write_session_file(path, &session)?;
        eprintln!("Saved session to {}", path.display());
    }

    print!("{}", summary(&session));
    if *print_board {
        println!();
        print!("{}", view::render_side(&session.snapshot()));
    }

    Ok(())
}

fn read_script_file(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    let steps = script::parse_script(&text)
        .with_context(|| format!("Failed to parse script file: {}", path.display()))?;
    Ok(steps)
}

fn append_to_leaderboard(
    path: &Path,
    player_name: &str,
    records: &[GameOverRecord],
) -> anyhow::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let mut leaderboard = util::read_leaderboard_file(path)?;
    let now = Utc::now();
    for record in records {
        leaderboard.insert(LeaderboardEntry::from_record(player_name, record, now));
    }
    util::write_leaderboard_file(path, &leaderboard)?;
    eprintln!(
        "Added {} entries to leaderboard {}",
        records.len(),
        path.display()
    );
    Ok(())
}

fn summary(session: &PlanetSession) -> String {
    let mut out = format!(
        "{} | {} sides | phase {:?} | total score {}\n",
        session.player_name(),
        session.side_count(),
        session.phase(),
        session.total_score()
    );
    for (index, side) in session.sides().iter().enumerate() {
        let progression = side.progression();
        let marker = if index == session.active_index() { '*' } else { ' ' };
        let state = if side.is_game_over() { "over" } else { "live" };
        out.push_str(&format!(
            "{marker} side {}: score {:>7}  level {:>2}  rows {:>4}  pieces {:>4}  time {:>6.1}s  {state}\n",
            index + 1,
            progression.score(),
            progression.level(),
            progression.rows_cleared(),
            progression.completed_pieces(),
            progression.elapsed().as_secs_f64(),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use planet_tetris_engine::{InputEvent, SideDirection};

    use super::*;

    #[test]
    fn test_summary_lists_every_side() {
        let seed = PieceSeed::from_bytes([4; 16]);
        let mut session = PlanetSession::new("ann", 3, GameConfig::default(), seed).unwrap();
        session.start();
        session.apply(InputEvent::SwitchSide(SideDirection::Next));

        let text = summary(&session);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "ann | 3 sides | phase Playing | total score 0");
        assert!(lines[1].starts_with("  side 1:"), "{}", lines[1]);
        assert!(lines[2].starts_with("* side 2:"), "{}", lines[2]);
        assert!(lines.iter().skip(1).all(|line| line.ends_with("live")));
    }
}
