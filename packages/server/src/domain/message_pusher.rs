//! MessagePusher trait 定義
//!
//! 接続中のクライアントへメッセージを届けるインターフェース。

use async_trait::async_trait;

use super::registry::BroadcastTarget;

/// MessagePusher trait
///
/// ブロードキャストは部分失敗を許容する。ある宛先への送信失敗はログに残すだけで、
/// 他の宛先への送信を中断せず、宛先をレジストリから削除もしない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 全ての宛先に同じ内容を送信し、送信に成功した宛先の数を返す
    async fn broadcast(&self, targets: &[BroadcastTarget], content: &str) -> usize;
}
