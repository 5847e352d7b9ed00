use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Direction of a side switch around the planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SideDirection {
    Previous,
    Next,
}

/// Player input understood by a planet session.
///
/// Events are written in camel case, e.g. `moveLeft` or `switchSide(+1)`.
///
/// # Examples
///
/// ```
/// use planet_tetris_engine::{InputEvent, SideDirection};
///
/// let event: InputEvent = "switchSide(-1)".parse().unwrap();
/// assert_eq!(event, InputEvent::SwitchSide(SideDirection::Previous));
/// assert_eq!(event.to_string(), "switchSide(-1)");
///
/// assert_eq!("hardDrop".parse::<InputEvent>().unwrap(), InputEvent::HardDrop);
/// assert!("jump".parse::<InputEvent>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    /// Rotate clockwise.
    Rotate,
    RotateCcw,
    SoftDropStart,
    SoftDropEnd,
    HardDrop,
    /// Toggles between playing and paused.
    Pause,
    SwitchSide(SideDirection),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown input event {input:?}")]
pub struct ParseInputEventError {
    input: String,
}

impl InputEvent {
    pub const ALL: [InputEvent; 10] = [
        InputEvent::MoveLeft,
        InputEvent::MoveRight,
        InputEvent::Rotate,
        InputEvent::RotateCcw,
        InputEvent::SoftDropStart,
        InputEvent::SoftDropEnd,
        InputEvent::HardDrop,
        InputEvent::Pause,
        InputEvent::SwitchSide(SideDirection::Previous),
        InputEvent::SwitchSide(SideDirection::Next),
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InputEvent::MoveLeft => "moveLeft",
            InputEvent::MoveRight => "moveRight",
            InputEvent::Rotate => "rotate",
            InputEvent::RotateCcw => "rotateCcw",
            InputEvent::SoftDropStart => "softDropStart",
            InputEvent::SoftDropEnd => "softDropEnd",
            InputEvent::HardDrop => "hardDrop",
            InputEvent::Pause => "pause",
            InputEvent::SwitchSide(SideDirection::Previous) => "switchSide(-1)",
            InputEvent::SwitchSide(SideDirection::Next) => "switchSide(+1)",
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputEvent {
    type Err = ParseInputEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(event) = InputEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == trimmed)
        {
            return Ok(event);
        }
        // `switchSide(1)` is accepted as a shorthand for `switchSide(+1)`.
        if trimmed == "switchSide(1)" {
            return Ok(InputEvent::SwitchSide(SideDirection::Next));
        }
        Err(ParseInputEventError {
            input: s.to_owned(),
        })
    }
}
