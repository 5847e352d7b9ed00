use clap::{Parser, Subcommand};

use self::{leaderboard::LeaderboardArg, play::PlayArg};

mod leaderboard;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run an input script against a new or saved planet session
    Play(#[clap(flatten)] PlayArg),
    /// Show the best entries of a leaderboard file
    Leaderboard(#[clap(flatten)] LeaderboardArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Leaderboard(arg) => leaderboard::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_play_arguments() {
        let args = CommandArgs::try_parse_from([
            "planet-tetris",
            "play",
            "--sides",
            "6",
            "--seed",
            "0123456789abcdef0123456789abcdef",
            "--print-board",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::Play(_)));
    }

    #[test]
    fn test_load_conflicts_with_new_session_options() {
        let result = CommandArgs::try_parse_from([
            "planet-tetris",
            "play",
            "--load",
            "session.json",
            "--sides",
            "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_malformed_seed() {
        let result = CommandArgs::try_parse_from(["planet-tetris", "play", "--seed", "xyz"]);
        assert!(result.is_err());
    }
}
