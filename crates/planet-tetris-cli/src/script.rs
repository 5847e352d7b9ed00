//! Input scripts for headless play.
//!
//! One step per line:
//!
//! - an input event name such as `moveLeft` or `switchSide(+1)`
//! - `wait <ms>` lets time pass, so gravity runs
//! - `tick` forces one gravity step
//!
//! Blank lines are skipped and `#` starts a comment.

use std::time::Duration;

use planet_tetris_engine::{GameOverRecord, InputEvent, ParseInputEventError, PlanetSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptStep {
    Event(InputEvent),
    Wait(Duration),
    Tick,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub(crate) enum ScriptError {
    #[display("line {line}: {source}")]
    UnknownEvent {
        line: usize,
        source: ParseInputEventError,
    },
    #[display("line {line}: invalid wait duration {value:?}")]
    InvalidWait {
        line: usize,
        value: String,
    },
}

pub(crate) fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = vec![];
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split_once('#').map_or(raw, |(before, _)| before).trim();
        if content.is_empty() {
            continue;
        }
        let step = if content == "tick" {
            ScriptStep::Tick
        } else if let Some(value) = content.strip_prefix("wait ") {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidWait {
                    line,
                    value: value.trim().to_owned(),
                })?;
            ScriptStep::Wait(Duration::from_millis(millis))
        } else {
            let event = content
                .parse()
                .map_err(|source| ScriptError::UnknownEvent { line, source })?;
            ScriptStep::Event(event)
        };
        steps.push(step);
    }
    Ok(steps)
}

/// Runs `steps` against `session` and returns the game-over records in order.
pub(crate) fn run_script(session: &mut PlanetSession, steps: &[ScriptStep]) -> Vec<GameOverRecord> {
    steps
        .iter()
        .filter_map(|step| match *step {
            ScriptStep::Event(event) => session.apply(event),
            ScriptStep::Wait(elapsed) => session.advance(elapsed),
            ScriptStep::Tick => session.tick(),
        })
        .collect()
}
