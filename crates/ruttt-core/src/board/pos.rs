//! 大盤面（Board）
//!
//! 9つの小盤面ワードと2つの集約ワード、内容ハッシュからなる値型。
//!
//! - レイヤーワード: 小盤面ごとの X勝ち / O勝ち / 進行中 の3レイヤー
//!   （9ビット×3）。下位18ビットはそのままメタ盤面の占有コードとして
//!   事前計算テーブルで参照できる。
//! - グローバルワード: 全体のゲーム状態・手番・合法ターゲット小盤面の
//!   数とインデックスリスト。
//! - 内容ハッシュ: 他の11ワードを順序依存で畳み込んだ64ビット値。
//!   キャッシュ・重複排除のキー専用で、衝突耐性は持たない。
//!
//! 着手適用は occupancy の1ビット更新とテーブル参照による再導出のみで、
//! 派生フィールドを手書きで更新することはない。

use super::movelist::MoveList;
use super::small;
use super::tables::SmallBoardTable;
use crate::types::{GameState, Move, Player};

/// 小盤面の数
pub const SUB_BOARD_COUNT: usize = 9;

// レイヤーワードのビット位置
const LAYER_X_POS: u32 = 0;
const LAYER_O_POS: u32 = 9;
const LAYER_ONGOING_POS: u32 = 18;
/// 小盤面1枚分のレイヤービット（インデックスでシフトして使う）
const LAYER_CLEAR_MASK: u64 = (1 << LAYER_X_POS) | (1 << LAYER_O_POS) | (1 << LAYER_ONGOING_POS);

// グローバルワードのビット位置
const GLOBAL_STATE_MASK: u64 = 0xF;
const PLAYER_BIT: u64 = 1 << 4;
const VALID_COUNT_POS: u32 = 5;
const VALID_LIST_POS: u32 = 9;
const VALID_LIST_MASK: u64 = 0xF_FFFF_FFFF;

// 内容ハッシュ（FNV-1a 風の順序依存畳み込み）
const HASH_OFFSET: u64 = 0xcbf29ce484222325;
const HASH_PRIME: u64 = 0x100000001b3;

/// 大盤面
///
/// 値型であり、代入・コピーがそのまま深いクローンになる。探索での仮想
/// 進行はスタック上のコピーに対して行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    sub_boards: [u64; SUB_BOARD_COUNT],
    layers: u64,
    global: u64,
    hash: u64,
}

impl Board {
    /// 初期局面を作る
    pub fn new(table: &SmallBoardTable) -> Self {
        let mut board = Self {
            sub_boards: [0; SUB_BOARD_COUNT],
            layers: 0,
            global: 0,
            hash: 0,
        };
        for index in 0..SUB_BOARD_COUNT {
            board.sub_boards[index] = table.info(board.sub_boards[index]);
            board.merge_sub_board_state(index);
        }
        board.update_global_state(table);
        // 初期局面は全9盤面が合法ターゲット
        board.set_valid_boards(9, 0x876543210);
        board.recompute_hash();
        board
    }

    /// 着手を適用する
    ///
    /// 着手の合法性は検証しない。非合法手を渡すと派生状態が静かに壊れる
    /// （呼び出し側が `generate_moves` の結果から選ぶ契約）。
    pub fn apply_move(&mut self, table: &SmallBoardTable, mv: Move) {
        let board_index = mv.board_index();
        let cell_index = mv.cell_index();

        let cell_bit =
            1u64 << (cell_index as u32 + self.current_player().index() as u32 * small::O_PART_POS);
        self.sub_boards[board_index] |= cell_bit;

        // 占有ビットだけ進めた直後の状態フィールドは着手前のまま
        let old_state = small::state(self.sub_boards[board_index]);
        self.sub_boards[board_index] = table.info(self.sub_boards[board_index]);
        let new_state = small::state(self.sub_boards[board_index]);
        if new_state != old_state {
            self.merge_sub_board_state(board_index);
            self.update_global_state(table);
        }

        self.update_valid_boards(cell_index);
        self.global ^= PLAYER_BIT;
        self.recompute_hash();
    }

    /// 合法手を列挙する
    ///
    /// バッファの内容はこの盤面の次の変更まで有効。
    pub fn generate_moves(&self, list: &mut MoveList) {
        list.clear();
        let count = self.valid_board_count();
        let encoded = self.valid_boards_encoded();
        for i in 0..count {
            let board_index = ((encoded >> (i * 4)) & small::NIBBLE_MASK) as u8;
            let word = self.sub_boards[board_index as usize];
            let mut free_list = small::free_cells(word);
            for _ in 0..small::free_count(word) {
                let cell_index = (free_list & small::NIBBLE_MASK) as u8;
                list.push(Move::new(board_index, cell_index));
                free_list >>= 4;
            }
        }
    }

    /// 終局かどうか
    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_state().is_over()
    }

    /// 全体のゲーム状態
    #[inline]
    pub fn game_state(&self) -> GameState {
        GameState::from_code(self.global & GLOBAL_STATE_MASK)
    }

    /// 手番
    #[inline]
    pub fn current_player(&self) -> Player {
        Player::from_bit(self.global & PLAYER_BIT)
    }

    /// 内容ハッシュ
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// 小盤面ワード
    #[inline]
    pub fn sub_board(&self, index: usize) -> u64 {
        self.sub_boards[index]
    }

    /// 指定手番が勝った小盤面の9ビットマスク
    #[inline]
    pub fn wins_layer(&self, player: Player) -> u64 {
        match player {
            Player::X => (self.layers >> LAYER_X_POS) & small::PART_MASK,
            Player::O => (self.layers >> LAYER_O_POS) & small::PART_MASK,
        }
    }

    /// 進行中の小盤面の9ビットマスク
    #[inline]
    pub fn ongoing_layer(&self) -> u64 {
        (self.layers >> LAYER_ONGOING_POS) & small::PART_MASK
    }

    /// 合法ターゲット小盤面の数
    #[inline]
    pub fn valid_board_count(&self) -> usize {
        ((self.global >> VALID_COUNT_POS) & small::NIBBLE_MASK) as usize
    }

    /// 合法ターゲット小盤面のインデックスリスト（4ビット×count）
    #[inline]
    pub fn valid_boards_encoded(&self) -> u64 {
        (self.global >> VALID_LIST_POS) & VALID_LIST_MASK
    }

    /// 盤面全体の空きセル数
    pub fn free_cell_total(&self, table: &SmallBoardTable) -> u32 {
        self.sub_boards
            .iter()
            .map(|&word| table.free_cell_count(small::occupancy_union(word)))
            .sum()
    }

    /// 終局スコアを [-1, 1] で返す（終局時のみ意味を持つ）
    ///
    /// F を終局時の空きセル総数として、X勝ち = (F+C)/D、O勝ち = -(F+C)/D、
    /// 引き分け = 0。X の最速勝ち（17手、F=64）がちょうど +1.0 になるよう
    /// C = 64·0.3/0.7 で正規化し、最遅勝ち（F=0）を ±0.2 程度に圧縮して
    /// 終盤の接戦が中立付近に潰れないようにしている。O の最速勝ちは1手
    /// 遅い（F=63）ため、下限は -1.0 にわずかに届かない。
    pub fn terminal_score(&self, table: &SmallBoardTable) -> f32 {
        const LAST_WIN_SCORE: f32 = 0.3;
        const MAX_FREE_CELLS: f32 = 64.0;
        const C: f32 = MAX_FREE_CELLS * LAST_WIN_SCORE / (1.0 - LAST_WIN_SCORE);
        const DENOM: f32 = MAX_FREE_CELLS + C;

        let free_cells = self.free_cell_total(table) as f32;
        match self.game_state() {
            GameState::XWins => (free_cells + C) / DENOM,
            GameState::OWins => -((free_cells + C) / DENOM),
            _ => 0.0,
        }
    }

    /// 小盤面の状態コードをレイヤーワードへ反映する
    fn merge_sub_board_state(&mut self, index: usize) {
        let state = small::state(self.sub_boards[index]);
        let combined = ((state & GameState::XWins.code()) << LAYER_X_POS)
            | (((state & GameState::OWins.code()) >> 1) << LAYER_O_POS)
            | (((state & GameState::Ongoing.code()) >> 2) << LAYER_ONGOING_POS);
        self.layers &= !(LAYER_CLEAR_MASK << index);
        self.layers |= combined << index;
    }

    /// レイヤーワードから全体のゲーム状態を導出する
    fn update_global_state(&mut self, table: &SmallBoardTable) {
        // 勝ちレイヤー2枚をそのままメタ盤面の占有コードとして参照する
        let mut state = small::state(table.info(self.layers));
        if state == GameState::Ongoing.code() && self.ongoing_layer() == 0 {
            // 全小盤面が決着済みでメタラインなし。テーブルはメタ盤面の
            // 占有が埋まらない限り引き分けを返さないため、ここで補正する。
            state = GameState::Draw.code();
        }
        self.global = (self.global & !GLOBAL_STATE_MASK) | state;
    }

    /// 強制ターゲット規則に従って合法ターゲットリストを再計算する
    ///
    /// 直前の着手のセルインデックスが指す小盤面が進行中ならそれが唯一の
    /// ターゲット、そうでなければ進行中の全小盤面がターゲットになる。
    /// 終局していれば空にする。
    fn update_valid_boards(&mut self, last_cell_index: usize) {
        if self.is_game_over() {
            self.set_valid_boards(0, 0);
            return;
        }

        let ongoing = self.ongoing_layer();
        if (ongoing >> last_cell_index) & 1 != 0 {
            self.set_valid_boards(1, last_cell_index as u64);
        } else {
            let mut count = 0u64;
            let mut list = 0u64;
            for index in 0..SUB_BOARD_COUNT as u64 {
                if (ongoing >> index) & 1 != 0 {
                    list |= index << (count * 4);
                    count += 1;
                }
            }
            self.set_valid_boards(count, list);
        }
    }

    fn set_valid_boards(&mut self, count: u64, list: u64) {
        const FIELD_MASK: u64 =
            (small::NIBBLE_MASK << VALID_COUNT_POS) | (VALID_LIST_MASK << VALID_LIST_POS);
        self.global =
            (self.global & !FIELD_MASK) | (count << VALID_COUNT_POS) | (list << VALID_LIST_POS);
    }

    /// 内容ハッシュを全ワードから再計算する
    ///
    /// 小盤面数が固定で小さいため、差分更新はせず毎回 O(11) で畳み込む。
    fn recompute_hash(&mut self) {
        let mut hash = HASH_OFFSET;
        for &word in &self.sub_boards {
            hash ^= word;
            hash = hash.wrapping_mul(HASH_PRIME);
        }
        hash ^= self.layers;
        hash = hash.wrapping_mul(HASH_PRIME);
        hash ^= self.global;
        hash = hash.wrapping_mul(HASH_PRIME);
        self.hash = hash;
    }
}
