//! 訪問済み状態集合（StateSet）
//!
//! 1探索エピソード内で訪問した状態の重複排除集合。内容ハッシュの
//! 一致だけで同一視し、完全比較は行わない（衝突リスクは許容済み）。
//! 所有するスナップショットは値型の配列に置き、エピソード終了時に
//! リプレイバッファへ一括で吸い上げる。

use std::collections::HashSet;

use crate::board::Board;

/// 訪問済み状態集合
pub struct StateSet {
    hashes: HashSet<u64>,
    states: Vec<Board>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hashes: HashSet::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    /// 状態を追加する
    ///
    /// 同じ内容ハッシュの状態が既にあれば何もしない。追加時は独立に
    /// 所有するコピーを保存する。新規追加なら true を返す。
    pub fn add(&mut self, board: &Board) -> bool {
        if !self.hashes.insert(board.hash()) {
            return false;
        }
        self.states.push(*board);
        true
    }

    /// 同じ内容ハッシュの状態を保持しているか
    #[inline]
    pub fn contains(&self, board: &Board) -> bool {
        self.hashes.contains(&board.hash())
    }

    /// 保持数
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// 空かどうか
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// 全要素を捨てる（確保済み容量は保持する）
    pub fn clear(&mut self) {
        self.hashes.clear();
        self.states.clear();
    }

    /// 所有する全スナップショット
    #[inline]
    pub fn states(&self) -> &[Board] {
        &self.states
    }
}

impl Default for StateSet {
    fn default() -> Self {
        Self::new()
    }
}
