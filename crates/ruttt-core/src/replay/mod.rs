//! リプレイバッファモジュール
//!
//! エピソード終了後に収穫した (状態, 価値) ペアを固定容量のリング
//! バッファへ蓄積し、シャッフル済みの学習サンプルを払い出す。

mod buffer;

pub use buffer::{ReplayBuffer, StateValuePair};
