//! 学習サンプルの JSONL エクスポート
//!
//! サンプリング済みの (状態, 価値) ペアをテンソルエンコードして
//! 1件1行の JSON で書き出す。学習側はこのファイルを読むだけでよい。

use std::io::Write;

use anyhow::{Context, Result};

use ruttt_core::encode::{encode_channels, MACRO_SIZE, MAIN_SIZE};
use ruttt_core::replay::StateValuePair;
use ruttt_core::types::Player;

use super::types::SampleRecord;

/// サンプル列を JSONL として書き出し、書いた件数を返す
///
/// 価値は先手視点で保持されているため、後手番の状態では符号を反転して
/// 「その局面の手番側から見た値」に揃える。テンソルの正規化と同じ向き。
pub fn write_samples<W: Write>(writer: &mut W, samples: &[StateValuePair]) -> Result<usize> {
    let mut main = vec![0u8; MAIN_SIZE];
    let mut macro_channels = vec![0u8; MACRO_SIZE];

    for pair in samples {
        encode_channels(&pair.board, &mut main, &mut macro_channels);
        let value = match pair.board.current_player() {
            Player::X => pair.value,
            Player::O => -pair.value,
        };
        let record = SampleRecord {
            main: main.clone(),
            macro_channels: macro_channels.clone(),
            value,
        };
        serde_json::to_writer(&mut *writer, &record).context("failed to serialize sample")?;
        writeln!(writer).context("failed to write sample")?;
    }
    Ok(samples.len())
}
