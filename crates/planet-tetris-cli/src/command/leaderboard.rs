use std::path::PathBuf;

use crate::{schema::leaderboard::Leaderboard, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArg {
    /// Leaderboard file path
    #[arg(long, default_value = "leaderboard.json")]
    file: PathBuf,
    /// Number of entries to show
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

pub(crate) fn run(arg: &LeaderboardArg) -> anyhow::Result<()> {
    let LeaderboardArg { file, limit } = arg;

    let leaderboard = util::read_leaderboard_file(file)?;
    eprintln!(
        "Loaded {} entries from {}",
        leaderboard.len(),
        file.display()
    );
    print!("{}", render(&leaderboard, *limit));
    Ok(())
}

fn render(leaderboard: &Leaderboard, limit: usize) -> String {
    let entries = leaderboard.top(limit);
    if entries.is_empty() {
        return "No entries yet.\n".to_owned();
    }
    let mut out = format!(
        "{:>4}  {:<16} {:>8} {:>5} {:>5} {:>5}  {}\n",
        "rank", "player", "score", "level", "rows", "sides", "date"
    );
    for (rank, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<16} {:>8} {:>5} {:>5} {:>5}  {}\n",
            rank + 1,
            entry.player_name,
            entry.score,
            entry.level,
            entry.rows,
            entry.side_count,
            entry.recorded_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    out
}
