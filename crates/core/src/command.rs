use std::fmt;
use std::str::FromStr;

/// Transport command understood by the bridge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportCommand {
    Play,
    Pause,
    Next,
    Previous,
}

impl TransportCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportCommand::Play => "play",
            TransportCommand::Pause => "pause",
            TransportCommand::Next => "next",
            TransportCommand::Previous => "previous",
        }
    }
}

impl fmt::Display for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for unrecognized command tokens
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCommandError;

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid transport command")
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for TransportCommand {
    type Err = ParseCommandError;

    /// Case-insensitive; surrounding whitespace is not trimmed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "play" => Ok(TransportCommand::Play),
            "pause" => Ok(TransportCommand::Pause),
            "next" => Ok(TransportCommand::Next),
            "previous" => Ok(TransportCommand::Previous),
            _ => Err(ParseCommandError),
        }
    }
}
