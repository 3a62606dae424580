//! ベースライン評価器
//!
//! 外部推論バックエンドの代わりに使える決定的ヒューリスティック。
//! [`ruttt_core::eval::Evaluator`] の契約（手番側視点・[-1, 1]）を
//! そのまま満たすので、ネットワーク実装と差し替え可能。

use anyhow::Result;
use ruttt_core::encode::MACRO_SIZE;
use ruttt_core::eval::Evaluator;

/// macro テンソルの獲得小盤面差による評価
///
/// 手番側が勝った小盤面数と相手側のそれの差を [-1, 1] に正規化する。
pub struct MacroMaterialEvaluator;

impl Evaluator for MacroMaterialEvaluator {
    fn evaluate(
        &mut self,
        _main_channels: &[u8],
        macro_channels: &[u8],
        count: usize,
        values_out: &mut [f32],
    ) -> Result<()> {
        for i in 0..count {
            let offset = i * MACRO_SIZE;
            let mut diff = 0i32;
            for board in 0..9 {
                diff += macro_channels[offset + 2 * board] as i32;
                diff -= macro_channels[offset + 2 * board + 1] as i32;
            }
            values_out[i] = diff as f32 / 9.0;
        }
        Ok(())
    }
}
