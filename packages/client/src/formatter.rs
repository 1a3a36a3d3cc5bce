//! Message formatting utilities for client display.

use courtyard_server::infrastructure::dto::websocket::PlayerInfo;
use courtyard_shared::time::local_clock_time;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a roster, marking the current player with "(me)"
    pub fn format_roster(players: &[PlayerInfo], me: &str) -> String {
        Self::format_roster_at(players, me, &local_clock_time())
    }

    fn format_roster_at(players: &[PlayerInfo], me: &str, clock_time: &str) -> String {
        let mut output = format!("\n{}\nPlayers ({}) at {}:\n", RULE, players.len(), clock_time);

        if players.is_empty() {
            output.push_str("(No players)\n");
        }
        for player in players {
            let me_suffix = if player.nickname == me { " (me)" } else { "" };
            let invulnerable = if player.is_invulnerable { " [invulnerable]" } else { "" };
            output.push_str(&format!(
                "{}{} @ ({}, {}) {} facing {}{}\n",
                player.nickname,
                me_suffix,
                player.x,
                player.y,
                player.state,
                player.direction,
                invulnerable
            ));
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a message that is not a roster
    pub fn format_raw_message(text: &str) -> String {
        format!("\n[raw] {}\n", text)
    }

    pub fn format_error(message: &str) -> String {
        format!("\n! {}\n", message)
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  move <x> <y>       move to a position (alias: m)",
            "  state <name>       change animation state (idle, run, ...)",
            "  face <direction>   change facing direction (up, down, left, right)",
            "  action <name>      perform an action (attack1, attack2, dodge; alias: a)",
            "  help               show this help (alias: ?)",
            "  quit               leave the game (alias: exit)",
            "",
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn player(nickname: &str, x: i64, y: i64) -> PlayerInfo {
        PlayerInfo {
            nickname: nickname.to_string(),
            x: Number::from(x),
            y: Number::from(y),
            state: "idle".to_string(),
            direction: "down".to_string(),
            current_frame: Number::from(0),
            current_time: Number::from(0),
            is_invulnerable: false,
            afterimages: vec![],
        }
    }

    #[test]
    fn test_format_roster_marks_me() {
        // テスト項目: ロスターの自分の行に (me) が付く
        // given (前提条件):
        let players = vec![player("alice", 5, 7), player("bob", 100, 100)];

        // when (操作):
        let output = MessageFormatter::format_roster_at(&players, "alice", "12:00:00");

        // then (期待する結果):
        assert!(output.contains("Players (2) at 12:00:00:"));
        assert!(output.contains("alice (me) @ (5, 7) idle facing down\n"));
        assert!(output.contains("bob @ (100, 100) idle facing down\n"));
    }

    #[test]
    fn test_format_roster_shows_invulnerability() {
        // テスト項目: 無敵状態のプレイヤーには [invulnerable] が付く
        // given (前提条件):
        let mut dodging = player("bob", 1, 2);
        dodging.state = "dodge".to_string();
        dodging.is_invulnerable = true;

        // when (操作):
        let output = MessageFormatter::format_roster_at(&[dodging], "alice", "12:00:00");

        // then (期待する結果):
        assert!(output.contains("bob @ (1, 2) dodge facing down [invulnerable]"));
    }

    #[test]
    fn test_format_empty_roster() {
        // テスト項目: 空のロスターは (No players) と表示される
        // when (操作):
        let output = MessageFormatter::format_roster_at(&[], "alice", "12:00:00");

        // then (期待する結果):
        assert!(output.contains("(No players)"));
    }

    #[test]
    fn test_format_help_lists_commands() {
        // テスト項目: ヘルプに全コマンドが含まれる
        // when (操作):
        let output = MessageFormatter::format_help();

        // then (期待する結果):
        for command in ["move", "state", "face", "action", "help", "quit"] {
            assert!(output.contains(command));
        }
    }
}
