//! UseCase 層
//!
//! RelayServer の振る舞い（join、状態更新とブロードキャスト、切断、シャットダウン）を
//! ドメインのインターフェース（ConnectionRegistry, MessagePusher）だけを使って実装します。

mod broadcast_roster;
mod get_players;
mod join_player;
mod leave_player;
mod shutdown;
mod update_player;

pub use broadcast_roster::RosterBroadcaster;
pub use get_players::GetPlayersUseCase;
pub use join_player::{JoinOutcome, JoinPlayerUseCase};
pub use leave_player::LeavePlayerUseCase;
pub use shutdown::ShutdownUseCase;
pub use update_player::{UpdateOutcome, UpdatePlayerUseCase};
