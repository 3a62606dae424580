//! 外部評価バックエンドの契約
//!
//! 探索はニューラル評価器の内部を知らない。エンコード済みテンソルの
//! バッチを渡して同数のスカラーを受け取る同期呼び出しだけを要求する。
//! プロセス内モデル・RPC・テスト用スタブのいずれでも実装できる。

mod batch;

pub use batch::{EvalBatch, MAX_BATCH};

use anyhow::Result;

/// 同期バッチ評価の能力
///
/// `main_channels` / `macro_channels` には先頭から `count` 局面分の
/// エンコードが連続して入る（1局面あたり [`crate::encode::MAIN_SIZE`] /
/// [`crate::encode::MACRO_SIZE`] バイト）。実装は `values_out[..count]` に
/// 各局面のスカラー評価を書き込む。値は [-1, 1] で、その局面で手番を
/// 持つ側から見た良さと解釈される。
///
/// 呼び出しはブロッキングで、発行後のキャンセルはできない。失敗は
/// 探索全体にとって致命的であり、リトライは行われない。
pub trait Evaluator {
    fn evaluate(
        &mut self,
        main_channels: &[u8],
        macro_channels: &[u8],
        count: usize,
        values_out: &mut [f32],
    ) -> Result<()>;
}
