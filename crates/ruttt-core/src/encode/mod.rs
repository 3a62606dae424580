//! 盤面のテンソル表現
//!
//! 外部評価バックエンドへ渡す固定長エンコーディング。
//! main（9×9×6）と macro（3×3×2）の2テンソルからなる。

mod channels;

pub use channels::{encode_channels, MACRO_SIZE, MAIN_CHANNELS, MAIN_SIZE};
