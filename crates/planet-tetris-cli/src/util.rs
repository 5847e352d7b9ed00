use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;
use planet_tetris_engine::{GameConfig, PlanetSession};

use crate::schema::leaderboard::Leaderboard;

/// Write `value` as pretty-printed JSON to `path`, replacing any existing file
pub fn write_json_file<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", file_kind, path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).with_context(|| {
        format!(
            "Failed to write {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush {} file: {}", file_kind, path.display()))?;

    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a saved planet session from a JSON file
pub fn read_session_file<P>(path: P) -> anyhow::Result<PlanetSession>
where
    P: AsRef<Path>,
{
    read_json_file("session", path)
}

/// Read game configuration from a JSON file
pub fn read_config_file<P>(path: P) -> anyhow::Result<GameConfig>
where
    P: AsRef<Path>,
{
    read_json_file("config", path)
}

/// Save a planet session as a JSON file
pub fn write_session_file<P>(path: P, session: &PlanetSession) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    write_json_file("session", path, session)
}

/// Save a leaderboard as a JSON file
pub fn write_leaderboard_file<P>(path: P, leaderboard: &Leaderboard) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    write_json_file("leaderboard", path, leaderboard)
}

/// Read a leaderboard from a JSON file
///
/// A missing file is an empty leaderboard.
pub fn read_leaderboard_file<P>(path: P) -> anyhow::Result<Leaderboard>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Leaderboard::default());
    }
    read_json_file("leaderboard", path)
}
