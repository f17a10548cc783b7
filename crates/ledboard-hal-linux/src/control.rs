//! Line-oriented command surface for headless runs.

use ledboard_core::gesture::Gesture;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostCommand {
    Trigger(Gesture),
    Info,
    Quit,
    Help,
}

pub const HELP: &str =
    "commands: press | double | triple | long | left | right | info | quit | help";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    Empty,
    Unknown(String),
}

impl HostCommand {
    /// Parses one input line. Matching is case-insensitive.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let word = line.trim().to_ascii_lowercase();
        let command = match word.as_str() {
            "" => return Err(ParseError::Empty),
            "press" | "single" | "p" => HostCommand::Trigger(Gesture::SinglePress),
            "double" => HostCommand::Trigger(Gesture::DoublePress),
            "triple" => HostCommand::Trigger(Gesture::TriplePress),
            "long" | "hold" => HostCommand::Trigger(Gesture::LongPress),
            "left" | "l" => HostCommand::Trigger(Gesture::RotateLeft),
            "right" | "r" => HostCommand::Trigger(Gesture::RotateRight),
            "info" | "i" => HostCommand::Info,
            "quit" | "exit" | "q" => HostCommand::Quit,
            "help" | "?" => HostCommand::Help,
            _ => return Err(ParseError::Unknown(word)),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_gesture_trigger() {
        let cases = [
            ("press", Gesture::SinglePress),
            ("double", Gesture::DoublePress),
            ("triple", Gesture::TriplePress),
            ("long", Gesture::LongPress),
            ("left", Gesture::RotateLeft),
            ("right", Gesture::RotateRight),
        ];
        for (line, gesture) in cases {
            assert_eq!(HostCommand::parse(line), Ok(HostCommand::Trigger(gesture)));
        }
    }

    #[test]
    fn trims_and_ignores_case() {
        assert_eq!(HostCommand::parse("  INFO \n"), Ok(HostCommand::Info));
        assert_eq!(HostCommand::parse("Quit"), Ok(HostCommand::Quit));
    }

    #[test]
    fn rejects_blank_and_unknown_lines() {
        assert_eq!(HostCommand::parse("   "), Err(ParseError::Empty));
        assert_eq!(
            HostCommand::parse("jump"),
            Err(ParseError::Unknown(String::from("jump")))
        );
    }
}
