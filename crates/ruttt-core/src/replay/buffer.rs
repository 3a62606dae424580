//! リプレイバッファ
//!
//! 固定容量の循環配列。満杯後は常に最古のスロットを上書きする
//! （純粋な FIFO であり、リザーバサンプリングではない）。
//! 「前回サンプル以降の新規追加数」を数え、学習を始めてよいかの
//! 判定に使う。

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::board::Board;
use crate::search::{StateSet, ValueTable};

/// (状態, 価値) ペア
#[derive(Debug, Clone, Copy)]
pub struct StateValuePair {
    pub board: Board,
    pub value: f32,
}

/// リプレイバッファ
pub struct ReplayBuffer {
    entries: Vec<StateValuePair>,
    capacity: usize,
    insert_pos: usize,
    full: bool,
    new_added: usize,
    sample_threshold: usize,
    indices: Vec<usize>,
    sample_out: Vec<StateValuePair>,
    rng: Xoshiro256PlusPlus,
}

impl ReplayBuffer {
    /// 容量・学習開始しきい値・シードを指定して作る
    pub fn new(capacity: usize, sample_threshold: usize, seed: u64) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            insert_pos: 0,
            full: false,
            new_added: 0,
            sample_threshold,
            indices: Vec::with_capacity(capacity),
            sample_out: Vec::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// ペアを1件追加する
    ///
    /// 満杯なら現在位置の最古エントリを上書きする。
    pub fn add(&mut self, board: Board, value: f32) {
        let pair = StateValuePair { board, value };
        if self.entries.len() < self.capacity {
            self.entries.push(pair);
        } else {
            self.entries[self.insert_pos] = pair;
        }
        self.insert_pos += 1;
        if self.insert_pos == self.capacity {
            self.insert_pos = 0;
            self.full = true;
        }
        self.new_added += 1;
    }

    /// 現在の保持数
    #[inline]
    pub fn len(&self) -> usize {
        if self.full { self.capacity } else { self.insert_pos }
    }

    /// 空かどうか
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 前回サンプル以降の新規追加数
    #[inline]
    pub fn new_added(&self) -> usize {
        self.new_added
    }

    /// 学習に足る新規データが溜まったか
    #[inline]
    pub fn is_enough_new_data(&self) -> bool {
        self.new_added >= self.sample_threshold
    }

    /// エピソードのキャッシュからペアを吸い上げる
    ///
    /// 状態集合が持つ全状態について価値テーブルから v(s) を引いて追加し、
    /// 両キャッシュを空にする（容量は保持される）。
    pub fn drain_from(&mut self, states: &mut StateSet, values: &mut ValueTable) {
        for board in states.states().iter().copied() {
            let value = values.state_value(board.hash());
            self.add(board, value);
        }
        states.clear();
        values.clear();
    }

    /// シャッフル済みサンプルを最大 `n` 件払い出す
    ///
    /// 使用域全体の添字順列をシャッフルし、先頭から `n` 件（保持数が
    /// 少なければ全件）を再利用バッファへコピーして返す。新規追加
    /// カウンタはリセットされる。
    pub fn sample(&mut self, n: usize) -> &[StateValuePair] {
        let used = self.len();
        self.indices.clear();
        self.indices.extend(0..used);
        self.indices.shuffle(&mut self.rng);

        let take = n.min(used);
        self.sample_out.clear();
        self.sample_out
            .extend(self.indices[..take].iter().map(|&i| self.entries[i]));
        self.new_added = 0;
        &self.sample_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SmallBoardTable;
    use crate::types::Move;

    fn boards(table: &SmallBoardTable, count: usize) -> Vec<Board> {
        // 先頭の1手だけ異なる盤面列
        let mut out = Vec::new();
        for i in 0..count {
            let mut board = Board::new(table);
            board.apply_move(table, Move::new((i % 9) as u8, (i / 9) as u8));
            out.push(board);
        }
        out
    }

    #[test]
    fn test_fifo_overwrite_at_capacity() {
        let table = SmallBoardTable::new();
        let mut buffer = ReplayBuffer::new(4, 8, 42);
        let items = boards(&table, 6);

        for (i, board) in items.iter().enumerate() {
            buffer.add(*board, i as f32);
        }

        // 容量で頭打ちになり、最古の2件（値0と1）が上書きされている
        assert_eq!(buffer.len(), 4);
        let sample = buffer.sample(4);
        let mut values: Vec<f32> = sample.iter().map(|p| p.value).collect();
        values.sort_by(f32::total_cmp);
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_enough_new_data_gate() {
        let table = SmallBoardTable::new();
        let mut buffer = ReplayBuffer::new(16, 3, 42);
        let items = boards(&table, 3);

        buffer.add(items[0], 0.0);
        buffer.add(items[1], 0.0);
        assert!(!buffer.is_enough_new_data());
        buffer.add(items[2], 0.0);
        assert!(buffer.is_enough_new_data());

        // サンプル払い出しでカウンタが戻る
        buffer.sample(2);
        assert!(!buffer.is_enough_new_data());
        assert_eq!(buffer.new_added(), 0);
    }

    #[test]
    fn test_sample_caps_at_len() {
        let table = SmallBoardTable::new();
        let mut buffer = ReplayBuffer::new(16, 4, 7);
        for (i, board) in boards(&table, 3).iter().enumerate() {
            buffer.add(*board, i as f32);
        }
        assert_eq!(buffer.sample(8).len(), 3);
        assert_eq!(buffer.sample(2).len(), 2);
    }

    #[test]
    fn test_drain_from_clears_sources() {
        let table = SmallBoardTable::new();
        let mut states = StateSet::new();
        let mut values = ValueTable::new();
        for (i, board) in boards(&table, 5).iter().enumerate() {
            states.add(board);
            values.set_state_value(board.hash(), i as f32 * 0.1);
        }

        let mut buffer = ReplayBuffer::new(16, 4, 7);
        buffer.drain_from(&mut states, &mut values);

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.new_added(), 5);
        assert!(states.is_empty());
        assert!(values.is_empty());

        // 吸い上げたペアは状態とv(s)の対応を保っている
        let sample = buffer.sample(5);
        for pair in sample {
            assert!(pair.value >= 0.0 && pair.value <= 0.4);
        }
    }
}
