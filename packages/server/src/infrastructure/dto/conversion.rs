//! Conversion logic between DTOs and domain entities.

use serde_json::{Map, Value};

use crate::domain::{Afterimage, PlayerEntry, RosterEntry, StateFields};
use crate::infrastructure::dto::{
    http::PlayerDetailDto,
    websocket::{self as dto, AfterimageTuple, bool_field, number_field, string_field},
};
use courtyard_shared::time::timestamp_to_rfc3339;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<&Map<String, Value>> for StateFields {
    fn from(object: &Map<String, Value>) -> Self {
        Self {
            x: number_field(object, "x"),
            y: number_field(object, "y"),
            state: string_field(object, "state"),
            direction: string_field(object, "direction"),
            current_frame: number_field(object, "current_frame"),
            current_time: number_field(object, "current_time"),
            is_invulnerable: bool_field(object, "is_invulnerable"),
            afterimages: match object.get("afterimages") {
                Some(Value::Array(items)) => Some(items.iter().filter_map(afterimage).collect()),
                _ => None,
            },
        }
    }
}

/// Entries that are not an array of exactly four numbers are dropped.
fn afterimage(value: &Value) -> Option<Afterimage> {
    let Value::Array(items) = value else {
        return None;
    };
    match items.as_slice() {
        [Value::Number(x), Value::Number(y), Value::Number(alpha), Value::Number(remaining)] => {
            Some(Afterimage {
                x: x.clone(),
                y: y.clone(),
                alpha: alpha.clone(),
                remaining: remaining.clone(),
            })
        }
        _ => None,
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Afterimage> for AfterimageTuple {
    fn from(model: Afterimage) -> Self {
        [model.x, model.y, model.alpha, model.remaining]
    }
}

impl From<PlayerEntry> for dto::PlayerInfo {
    fn from(model: PlayerEntry) -> Self {
        let state = model.state;
        Self {
            nickname: model.nickname.into_string(),
            x: state.x,
            y: state.y,
            state: state.state,
            direction: state.direction,
            current_frame: state.current_frame,
            current_time: state.current_time,
            is_invulnerable: state.is_invulnerable,
            afterimages: state.afterimages.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RosterEntry> for PlayerDetailDto {
    fn from(model: RosterEntry) -> Self {
        Self {
            joined_at: timestamp_to_rfc3339(model.joined_at.value()),
            player: PlayerEntry {
                nickname: model.nickname,
                state: model.state,
            }
            .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Number, json};

    use super::*;
    use crate::domain::{Nickname, PlayerState, Timestamp};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_state_fields_from_full_object() {
        // テスト項目: 全フィールドを持つオブジェクトから StateFields が生成される
        // given (前提条件):
        let map = object(json!({
            "type": "update",
            "x": 10, "y": 20.5,
            "state": "attack2", "direction": "up",
            "current_frame": 3, "current_time": 0.12,
            "is_invulnerable": true,
            "afterimages": [[1, 2, 0.4, 0.3], [3, 4, 0.2, 0.1]]
        }));

        // when (操作):
        let fields = StateFields::from(&map);

        // then (期待する結果):
        assert_eq!(fields.x, Some(Number::from(10u64)));
        assert_eq!(fields.y, Number::from_f64(20.5));
        assert_eq!(fields.state.as_deref(), Some("attack2"));
        assert_eq!(fields.direction.as_deref(), Some("up"));
        assert_eq!(fields.current_frame, Some(Number::from(3u64)));
        assert_eq!(fields.is_invulnerable, Some(true));
        assert_eq!(fields.afterimages.unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_afterimage_entries_are_dropped() {
        // テスト項目: 4 要素の数値配列でない残像エントリは捨てられる
        // given (前提条件):
        let map = object(json!({
            "afterimages": [[1, 2, 0.4, 0.3], [1, 2, 3], "x", [1, "2", 3, 4]]
        }));

        // when (操作):
        let fields = StateFields::from(&map);

        // then (期待する結果):
        let afterimages = fields.afterimages.unwrap();
        assert_eq!(afterimages.len(), 1);
        assert_eq!(afterimages[0].x, Number::from(1u64));
    }

    #[test]
    fn test_non_array_afterimages_is_absent() {
        // テスト項目: 配列でない afterimages は欠落として扱われる
        // given (前提条件):
        let map = object(json!({"afterimages": {"x": 1}}));

        // when (操作):
        let fields = StateFields::from(&map);

        // then (期待する結果):
        assert_eq!(fields.afterimages, None);
    }

    #[test]
    fn test_player_entry_to_player_info() {
        // テスト項目: ドメインの PlayerEntry が PlayerInfo DTO に変換される
        // given (前提条件):
        let entry = PlayerEntry {
            nickname: Nickname::new("alice".to_string()).unwrap(),
            state: PlayerState::default(),
        };

        // when (操作):
        let info: dto::PlayerInfo = entry.into();

        // then (期待する結果):
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "nickname": "alice",
                "x": 100, "y": 100,
                "state": "idle", "direction": "down",
                "current_frame": 0, "current_time": 0,
                "is_invulnerable": false,
                "afterimages": []
            })
        );
    }

    #[test]
    fn test_roster_entry_to_player_detail() {
        // テスト項目: RosterEntry が参加時刻付きの PlayerDetailDto に変換される
        // given (前提条件):
        let entry = RosterEntry {
            nickname: Nickname::new("bob".to_string()).unwrap(),
            joined_at: Timestamp::new(1672531200000),
            state: PlayerState::default(),
        };

        // when (操作):
        let detail: PlayerDetailDto = entry.into();

        // then (期待する結果):
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["nickname"], "bob");
        assert_eq!(json["x"], 100);
        assert!(json["joined_at"].as_str().unwrap().starts_with("2023-01-01T00:00:00"));
    }
}
