//! 価値テーブル（ValueTable）
//!
//! 64ビット整数キーの独立した2つのマップを持つ。
//!
//! - 状態価値 v(s): キーは状態の内容ハッシュ
//! - 行動価値 v'(s,a): キーは内容ハッシュと着手バイトの混合
//!
//! 未登録エントリの読み出しは 0 を返す。

use std::collections::HashMap;

use crate::types::Move;

// 行動価値キーの混合に使う奇数定数
const MIX_MUL1: u64 = 0x9E37_79B9_7F4A_7C15;
const MIX_MUL2: u64 = 0xBF58_476D_1CE4_E5B9;

/// 状態ハッシュと着手バイトから行動価値キーを作る
#[inline]
fn action_key(state_hash: u64, mv: Move) -> u64 {
    let mut h = state_hash ^ (mv.raw() as u64).wrapping_mul(MIX_MUL1);
    h = h.rotate_left(31);
    h.wrapping_mul(MIX_MUL2)
}

/// 価値テーブル
pub struct ValueTable {
    state_values: HashMap<u64, f32>,
    action_values: HashMap<u64, f32>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self {
            state_values: HashMap::new(),
            action_values: HashMap::new(),
        }
    }

    /// 状態価値 v(s)（未登録なら 0）
    #[inline]
    pub fn state_value(&self, state_hash: u64) -> f32 {
        self.state_values.get(&state_hash).copied().unwrap_or(0.0)
    }

    /// 状態価値を設定する
    #[inline]
    pub fn set_state_value(&mut self, state_hash: u64, value: f32) {
        self.state_values.insert(state_hash, value);
    }

    /// 行動価値 v'(s,a)（未登録なら 0）
    #[inline]
    pub fn action_value(&self, state_hash: u64, mv: Move) -> f32 {
        self.action_values
            .get(&action_key(state_hash, mv))
            .copied()
            .unwrap_or(0.0)
    }

    /// 行動価値を設定する
    #[inline]
    pub fn set_action_value(&mut self, state_hash: u64, mv: Move, value: f32) {
        self.action_values.insert(action_key(state_hash, mv), value);
    }

    /// (状態価値数, 行動価値数)
    #[inline]
    pub fn len(&self) -> (usize, usize) {
        (self.state_values.len(), self.action_values.len())
    }

    /// 空かどうか
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state_values.is_empty() && self.action_values.is_empty()
    }

    /// 両テーブルを空にする（確保済み容量は保持する）
    pub fn clear(&mut self) {
        self.state_values.clear();
        self.action_values.clear();
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}
