//! 子局面バッチの収集と評価
//!
//! 1つの親局面の展開で生じた非終局の子局面をテンソルエンコードして
//! 共有バッファへ溜め、評価呼び出しを1回にまとめる。

use super::Evaluator;
use crate::board::Board;
use crate::encode::{encode_channels, MACRO_SIZE, MAIN_SIZE};
use crate::search::ValueTable;
use crate::types::{Move, Player};
use anyhow::Result;

/// 1バッチの最大局面数（1局面の合法手数上限）
pub const MAX_BATCH: usize = 81;

/// 子局面バッチ
///
/// バッファは確保済みのまま使い回す。`begin` → `push`×n → `flush` を
/// 親局面の展開ごとに繰り返す。
pub struct EvalBatch {
    main_channels: Vec<u8>,
    macro_channels: Vec<u8>,
    moves: [Move; MAX_BATCH],
    values: [f32; MAX_BATCH],
    count: usize,
}

impl EvalBatch {
    pub fn new() -> Self {
        Self {
            main_channels: vec![0; MAX_BATCH * MAIN_SIZE],
            macro_channels: vec![0; MAX_BATCH * MACRO_SIZE],
            moves: [Move::from_raw(0); MAX_BATCH],
            values: [0.0; MAX_BATCH],
            count: 0,
        }
    }

    /// 新しい親局面の展開を開始する
    #[inline]
    pub fn begin(&mut self) {
        self.count = 0;
    }

    /// 収集済みの子局面数
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// 空かどうか
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 非終局の子局面をエンコードして追加する
    pub fn push(&mut self, child: &Board, mv: Move) {
        debug_assert!(self.count < MAX_BATCH);
        let main_offset = self.count * MAIN_SIZE;
        let macro_offset = self.count * MACRO_SIZE;
        encode_channels(
            child,
            &mut self.main_channels[main_offset..main_offset + MAIN_SIZE],
            &mut self.macro_channels[macro_offset..macro_offset + MACRO_SIZE],
        );
        self.moves[self.count] = mv;
        self.count += 1;
    }

    /// 収集済みの子局面をまとめて評価し、親の行動価値として書き込む
    ///
    /// 収集数が0なら何もしない。評価器の出力は子局面の手番側から見た
    /// 値なので、先手（X）視点へ直してから格納する: 子の手番がOになる
    /// のは親の手番がXのときで、その場合だけ符号を反転する。
    /// 消費後はカウンタを0に戻す。
    pub fn flush<E: Evaluator>(
        &mut self,
        evaluator: &mut E,
        parent_player: Player,
        parent_hash: u64,
        values: &mut ValueTable,
    ) -> Result<()> {
        if self.count == 0 {
            return Ok(());
        }

        evaluator.evaluate(
            &self.main_channels[..self.count * MAIN_SIZE],
            &self.macro_channels[..self.count * MACRO_SIZE],
            self.count,
            &mut self.values[..self.count],
        )?;

        for i in 0..self.count {
            let value = match parent_player {
                Player::X => -self.values[i],
                Player::O => self.values[i],
            };
            values.set_action_value(parent_hash, self.moves[i], value);
        }
        self.count = 0;
        Ok(())
    }
}

impl Default for EvalBatch {
    fn default() -> Self {
        Self::new()
    }
}
