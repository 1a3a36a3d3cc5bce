//! Commands typed at the client prompt.

use serde_json::Number;

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `move <x> <y>`
    Move { x: Number, y: Number },
    /// `state <name>`: change the animation state
    State(String),
    /// `face <direction>`
    Face(String),
    /// `action <name>`: one-off action such as `attack1` or `dodge`
    Action(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Usage("<command> [args...]"));
        };
        let args: Vec<&str> = words.collect();

        match (verb, args.as_slice()) {
            ("move" | "m", [x, y]) => Ok(Self::Move {
                x: parse_number(x)?,
                y: parse_number(y)?,
            }),
            ("move" | "m", _) => Err(CommandError::Usage("move <x> <y>")),
            ("state", [name]) => Ok(Self::State(name.to_string())),
            ("state", _) => Err(CommandError::Usage("state <name>")),
            ("face", [direction]) => Ok(Self::Face(direction.to_string())),
            ("face", _) => Err(CommandError::Usage("face <direction>")),
            ("action" | "a", [name]) => Ok(Self::Action(name.to_string())),
            ("action" | "a", _) => Err(CommandError::Usage("action <name>")),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit", _) => Ok(Self::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Integers stay integers on the wire; anything else becomes a float.
fn parse_number(word: &str) -> Result<Number, CommandError> {
    if let Ok(int) = word.parse::<i64>() {
        return Ok(Number::from(int));
    }
    word.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| CommandError::NotANumber(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_with_integers() {
        // テスト項目: 整数の move は整数のまま解釈される
        // when (操作):
        let result = Command::parse("move 5 7");

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(Command::Move {
                x: Number::from(5),
                y: Number::from(7)
            })
        );
    }

    #[test]
    fn test_parse_move_with_floats_and_alias() {
        // テスト項目: 小数と短縮形 m を受け付ける
        // when (操作):
        let result = Command::parse("  m 1.5   -2.25 ");

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(Command::Move {
                x: Number::from_f64(1.5).unwrap(),
                y: Number::from_f64(-2.25).unwrap()
            })
        );
    }

    #[test]
    fn test_parse_move_rejects_bad_arguments() {
        // テスト項目: 引数が足りない、または数値でない move はエラー
        // then (期待する結果):
        assert_eq!(
            Command::parse("move 1"),
            Err(CommandError::Usage("move <x> <y>"))
        );
        assert_eq!(
            Command::parse("move left 1"),
            Err(CommandError::NotANumber("left".to_string()))
        );
        assert_eq!(
            Command::parse("move NaN 1"),
            Err(CommandError::NotANumber("NaN".to_string()))
        );
    }

    #[test]
    fn test_parse_state_face_action() {
        // テスト項目: state / face / action が解釈される
        // then (期待する結果):
        assert_eq!(Command::parse("state run"), Ok(Command::State("run".to_string())));
        assert_eq!(Command::parse("face up"), Ok(Command::Face("up".to_string())));
        assert_eq!(
            Command::parse("a attack2"),
            Ok(Command::Action("attack2".to_string()))
        );
    }

    #[test]
    fn test_parse_help_and_quit() {
        // テスト項目: help と quit が解釈される
        // then (期待する結果):
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_unknown_command() {
        // テスト項目: 未知のコマンドはエラー
        // then (期待する結果):
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
