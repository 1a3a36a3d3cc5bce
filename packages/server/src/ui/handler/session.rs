//! Protocol handling for one connection, independent of the socket.
//!
//! [`SessionDriver`] turns inbound frames into use case calls and tells the socket
//! loop whether to keep going. Frames of one connection are handled strictly in
//! arrival order.

use std::sync::Arc;

use crate::{
    domain::{ClientSession, ConnectionHandle, MalformedVerdict},
    infrastructure::dto::websocket::{ClientMessage, DecodeError},
    ui::state::AppState,
};

/// What the socket loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

pub struct SessionDriver {
    state: Arc<AppState>,
    session: ClientSession,
    handle: ConnectionHandle,
}

impl SessionDriver {
    pub fn new(state: Arc<AppState>, handle: ConnectionHandle) -> Self {
        let session = ClientSession::new(handle.id(), state.config.max_malformed);
        Self {
            state,
            session,
            handle,
        }
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub async fn on_text(&mut self, text: &str) -> Flow {
        match ClientMessage::decode(text) {
            Ok(message) => {
                self.session.record_well_formed();
                self.dispatch(message).await;
                Flow::Continue
            }
            Err(e) => self.on_malformed(e),
        }
    }

    pub async fn on_binary(&mut self) -> Flow {
        self.on_malformed(DecodeError::Binary)
    }

    /// Release the session's nickname, tell the remaining players, and ask the pusher
    /// loop to close the socket.
    pub async fn teardown(mut self) {
        if let Some(nickname) = self.session.close() {
            self.state
                .leave_player_usecase
                .execute(&nickname, self.handle.id())
                .await;
        }
        // fails when the pusher loop is already gone
        let _ = self.handle.close();
        tracing::debug!("Connection {} torn down", self.handle.id());
    }

    fn on_malformed(&mut self, error: DecodeError) -> Flow {
        let peer = self.describe_peer();
        match self.session.record_malformed() {
            MalformedVerdict::Tolerated { count } => {
                tracing::debug!(
                    "Malformed message from {} ({}/{}): {}",
                    peer,
                    count,
                    self.state.config.max_malformed,
                    error
                );
                Flow::Continue
            }
            MalformedVerdict::LimitReached => {
                tracing::warn!("Too many malformed messages from {}, disconnecting", peer);
                if let Err(e) = self.handle.close() {
                    tracing::debug!("Connection already closing: {}", e);
                }
                Flow::Close
            }
        }
    }

    async fn dispatch(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::Ping => {
                tracing::trace!("Ping from {}", self.describe_peer());
            }
            ClientMessage::Join {
                nickname: Some(nickname),
                fields,
            } => {
                let previous = self.session.join(nickname.clone());
                let outcome = self
                    .state
                    .join_player_usecase
                    .execute(self.handle.clone(), nickname, previous, fields)
                    .await;
                tracing::debug!(
                    "{} starts at ({}, {}){}",
                    self.describe_peer(),
                    outcome.state.x,
                    outcome.state.y,
                    if outcome.displaced.is_some() {
                        " after taking over the nickname"
                    } else {
                        ""
                    }
                );
            }
            ClientMessage::Join { nickname: None, .. } => {
                tracing::debug!("Join without nickname from {}, ignored", self.describe_peer());
            }
            ClientMessage::Update(fields) | ClientMessage::Action(fields) => {
                let Some(nickname) = self.session.nickname().cloned() else {
                    tracing::debug!(
                        "Update before join from connection {}, dropped",
                        self.handle.id()
                    );
                    return;
                };
                self.state
                    .update_player_usecase
                    .execute(&nickname, self.handle.id(), fields)
                    .await;
            }
            ClientMessage::Unknown(message_type) => {
                tracing::debug!(
                    "Unknown message type '{}' from {}, ignored",
                    message_type,
                    self.describe_peer()
                );
            }
        }
    }

    fn describe_peer(&self) -> String {
        match self.session.nickname() {
            Some(nickname) => format!("'{}'", nickname),
            None => format!("connection {}", self.handle.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RelayConfig,
        domain::{ConnectionRegistry, OutboundFrame, SessionPhase},
        infrastructure::{
            dto::websocket::PlayersUpdateMessage, message_pusher::WebSocketMessagePusher,
            registry::InMemoryConnectionRegistry,
        },
        usecase::{
            GetPlayersUseCase, JoinPlayerUseCase, LeavePlayerUseCase, RosterBroadcaster,
            ShutdownUseCase, UpdatePlayerUseCase,
        },
    };
    use courtyard_shared::time::FixedClock;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 1 接続分のプロトコル処理（状態遷移、不正メッセージの計数、ディスパッチ）
    //
    // 【どのようなシナリオをテストするか】
    // 1. 5 回連続の不正メッセージで切断、4 回 + 正常 1 回ではリセット
    // 2. nickname だけの join でデフォルト状態
    // 3. join 前の update は無視
    // 4. ping はブロードキャストも状態変更もしない
    // 5. 切断時に残りの参加者へ 1 回だけロスターが送られる
    // ========================================

    fn create_state() -> (Arc<AppState>, Arc<InMemoryConnectionRegistry>) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let broadcaster = Arc::new(RosterBroadcaster::new(
            registry.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        ));
        let state = Arc::new(AppState {
            join_player_usecase: Arc::new(JoinPlayerUseCase::new(
                registry.clone(),
                Arc::new(FixedClock::new(0)),
            )),
            update_player_usecase: Arc::new(UpdatePlayerUseCase::new(
                registry.clone(),
                broadcaster.clone(),
            )),
            leave_player_usecase: Arc::new(LeavePlayerUseCase::new(registry.clone(), broadcaster)),
            get_players_usecase: Arc::new(GetPlayersUseCase::new(registry.clone())),
            shutdown_usecase: Arc::new(ShutdownUseCase::new(registry.clone())),
            config: RelayConfig::default(),
            shutdown: tokio::sync::watch::channel(false).0,
        });
        (state, registry)
    }

    fn connect(state: &Arc<AppState>) -> (SessionDriver, UnboundedReceiver<OutboundFrame>) {
        let (handle, rx) = ConnectionHandle::channel();
        (SessionDriver::new(state.clone(), handle), rx)
    }

    fn players(frame: Option<OutboundFrame>) -> serde_json::Value {
        match frame {
            Some(OutboundFrame::Text(text)) => {
                let message: PlayersUpdateMessage = serde_json::from_str(&text).unwrap();
                serde_json::to_value(message.players).unwrap()
            }
            other => panic!("expected players_update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_five_malformed_messages_close_connection() {
        // テスト項目: 5 回連続の不正メッセージで接続が閉じられる
        // given (前提条件):
        let (state, _registry) = create_state();
        let (mut driver, mut rx) = connect(&state);

        // when (操作):
        let mut flows = Vec::new();
        for payload in ["nope", "[]", "{}", "42", r#"{"x":1}"#] {
            flows.push(driver.on_text(payload).await);
        }

        // then (期待する結果):
        assert_eq!(&flows[..4], &[Flow::Continue; 4]);
        assert_eq!(flows[4], Flow::Close);
        assert_eq!(rx.recv().await, Some(OutboundFrame::Close));
    }

    #[tokio::test]
    async fn test_four_malformed_then_well_formed_keeps_connection() {
        // テスト項目: 4 回の不正メッセージの後に正常メッセージでカウントがリセットされる
        // given (前提条件):
        let (state, _registry) = create_state();
        let (mut driver, mut rx) = connect(&state);
        for _ in 0..4 {
            driver.on_text("garbage").await;
        }

        // when (操作):
        let flow = driver.on_text(r#"{"type":"ping"}"#).await;
        let after = driver.on_text("garbage").await;

        // then (期待する結果):
        assert_eq!(flow, Flow::Continue);
        assert_eq!(after, Flow::Continue);
        assert_eq!(driver.session().malformed_count(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_binary_frames_count_as_malformed() {
        // テスト項目: バイナリフレームは不正メッセージとして数えられる
        // given (前提条件):
        let (state, _registry) = create_state();
        let (mut driver, _rx) = connect(&state);

        // when (操作):
        driver.on_binary().await;

        // then (期待する結果):
        assert_eq!(driver.session().malformed_count(), 1);
    }

    #[tokio::test]
    async fn test_join_with_nickname_only_stores_default_state() {
        // テスト項目: nickname だけの join でデフォルト状態が保存され、ブロードキャストはしない
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut driver, mut rx) = connect(&state);

        // when (操作):
        driver.on_text(r#"{"type":"join","nickname":"alice"}"#).await;

        // then (期待する結果):
        assert!(matches!(driver.session().phase(), SessionPhase::Joined(_)));
        assert!(rx.try_recv().is_err());
        let snapshot = registry.snapshot().await;
        let message = PlayersUpdateMessage::from_snapshot(&snapshot);
        assert_eq!(
            serde_json::to_value(&message.players[0]).unwrap(),
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

    #[tokio::test]
    async fn test_join_without_nickname_is_ignored_not_malformed() {
        // テスト項目: nickname の無い join は無視され、不正メッセージとしても数えない
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut driver, _rx) = connect(&state);

        // when (操作):
        let flow = driver.on_text(r#"{"type":"join"}"#).await;

        // then (期待する結果):
        assert_eq!(flow, Flow::Continue);
        assert_eq!(driver.session().phase(), &SessionPhase::Connected);
        assert_eq!(driver.session().malformed_count(), 0);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_update_before_join_changes_nothing() {
        // テスト項目: join 前の update は状態を変えず、クラッシュもしない
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut driver, mut rx) = connect(&state);

        // when (操作):
        let flow = driver.on_text(r#"{"type":"update","x":5,"y":7}"#).await;

        // then (期待する結果):
        assert_eq!(flow, Flow::Continue);
        assert_eq!(registry.count().await, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_is_broadcast_to_all_joined_connections() {
        // テスト項目: a の update が a と b の両方に届き、b のエントリは変わらない
        // given (前提条件):
        let (state, _registry) = create_state();
        let (mut a, mut rx_a) = connect(&state);
        let (mut b, mut rx_b) = connect(&state);
        a.on_text(r#"{"type":"join","nickname":"a"}"#).await;
        b.on_text(r#"{"type":"join","nickname":"b"}"#).await;

        // when (操作):
        a.on_text(r#"{"type":"update","x":5,"y":7}"#).await;

        // then (期待する結果):
        for rx in [&mut rx_a, &mut rx_b] {
            let players = players(rx.recv().await);
            assert_eq!(players[0]["nickname"], "a");
            assert_eq!((players[0]["x"].clone(), players[0]["y"].clone()), (json!(5), json!(7)));
            assert_eq!(players[1]["nickname"], "b");
            assert_eq!((players[1]["x"].clone(), players[1]["y"].clone()), (json!(100), json!(100)));
        }
    }

    #[tokio::test]
    async fn test_action_is_handled_like_update() {
        // テスト項目: action も update と同様に状態を更新しブロードキャストする
        // given (前提条件):
        let (state, _registry) = create_state();
        let (mut a, mut rx_a) = connect(&state);
        a.on_text(r#"{"type":"join","nickname":"a"}"#).await;

        // when (操作):
        a.on_text(r#"{"type":"action","x":1,"y":2,"state":"attack1","is_invulnerable":true}"#)
            .await;

        // then (期待する結果):
        let players = players(rx_a.recv().await);
        assert_eq!(players[0]["state"], "attack1");
        assert_eq!(players[0]["is_invulnerable"], true);
    }

    #[tokio::test]
    async fn test_ping_neither_broadcasts_nor_mutates() {
        // テスト項目: ping はブロードキャストも状態変更もしない
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut a, mut rx_a) = connect(&state);
        a.on_text(r#"{"type":"join","nickname":"a"}"#).await;
        let before = registry.snapshot().await.players;

        // when (操作):
        a.on_text(r#"{"type":"ping","x":9,"y":9}"#).await;

        // then (期待する結果):
        assert!(rx_a.try_recv().is_err());
        assert_eq!(registry.snapshot().await.players, before);
    }

    #[tokio::test]
    async fn test_unknown_type_is_ignored() {
        // テスト項目: 未知の type は無視され、不正メッセージとしても数えない
        // given (前提条件):
        let (state, _registry) = create_state();
        let (mut a, mut rx_a) = connect(&state);
        a.on_text(r#"{"type":"join","nickname":"a"}"#).await;

        // when (操作):
        let flow = a.on_text(r#"{"type":"chat","text":"hi"}"#).await;

        // then (期待する結果):
        assert_eq!(flow, Flow::Continue);
        assert_eq!(a.session().malformed_count(), 0);
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_teardown_broadcasts_once_to_remaining() {
        // テスト項目: a の切断で残りの接続に a を含まないロスターが 1 回だけ送られる
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut a, _rx_a) = connect(&state);
        let (mut b, mut rx_b) = connect(&state);
        a.on_text(r#"{"type":"join","nickname":"a"}"#).await;
        b.on_text(r#"{"type":"join","nickname":"b"}"#).await;

        // when (操作):
        a.teardown().await;

        // then (期待する結果):
        let players = players(rx_b.recv().await);
        assert_eq!(players.as_array().unwrap().len(), 1);
        assert_eq!(players[0]["nickname"], "b");
        assert!(rx_b.try_recv().is_err());
        assert_eq!(registry.snapshot().await.nicknames(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_teardown_before_join_broadcasts_nothing() {
        // テスト項目: join 前に切断しても何もブロードキャストされない
        // given (前提条件):
        let (state, _registry) = create_state();
        let (a, _rx_a) = connect(&state);
        let (mut b, mut rx_b) = connect(&state);
        b.on_text(r#"{"type":"join","nickname":"b"}"#).await;

        // when (操作):
        a.teardown().await;

        // then (期待する結果):
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_nickname_collision_closes_earlier_connection() {
        // テスト項目: 同じ nickname の join で以前の接続は閉じられ、その切断は新しい所有者を消さない
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut first, mut rx_first) = connect(&state);
        let (mut second, _rx_second) = connect(&state);
        first.on_text(r#"{"type":"join","nickname":"alice"}"#).await;

        // when (操作):
        second.on_text(r#"{"type":"join","nickname":"alice","x":1,"y":1}"#).await;
        first.teardown().await;

        // then (期待する結果):
        assert_eq!(rx_first.recv().await, Some(OutboundFrame::Close));
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.nicknames(), vec!["alice"]);
        assert_eq!(snapshot.players[0].state.x, serde_json::Number::from(1u64));
    }

    #[tokio::test]
    async fn test_registry_matches_joined_sessions() {
        // テスト項目: どの操作列の後でもレジストリのキーは join 済みの接続と一致する
        // given (前提条件):
        let (state, registry) = create_state();
        let (mut a, _rx_a) = connect(&state);
        let (mut b, _rx_b) = connect(&state);
        let (mut c, _rx_c) = connect(&state);

        // when (操作):
        a.on_text(r#"{"type":"join","nickname":"a"}"#).await;
        b.on_text(r#"{"type":"join","nickname":"b"}"#).await;
        c.on_text(r#"{"type":"update","x":1,"y":1}"#).await;
        b.on_text(r#"{"type":"join","nickname":"bee"}"#).await;
        a.teardown().await;
        c.on_text(r#"{"type":"join","nickname":"c"}"#).await;

        // then (期待する結果):
        assert_eq!(registry.snapshot().await.nicknames(), vec!["bee", "c"]);
        assert_eq!(registry.count().await, 2);
    }
}
