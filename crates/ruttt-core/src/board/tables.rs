//! 小盤面の事前計算テーブル
//!
//! 2^18 通りの (Xマスク, Oマスク) 占有コードごとに、状態コード・空きセル数・
//! 空きセルリストを含む完全な小盤面ワードを一度だけ構築する。
//! 以後は占有コードの参照一発で派生情報が得られる。
//!
//! テーブルはプロセス内で共有可能な不変オブジェクトであり、グローバル変数には
//! しない。利用側（[`super::Board`] 等）へ参照で注入する。

use super::small;
use crate::types::GameState;

/// 3目並びのラインマスク（横3・縦3・斜め2）
const LINE_MASKS: [u64; 8] = [
    0b000_000_111,
    0b000_111_000,
    0b111_000_000,
    0b001_001_001,
    0b010_010_010,
    0b100_100_100,
    0b100_010_001,
    0b001_010_100,
];

/// 小盤面の事前計算テーブル
///
/// - `words`: 18ビット占有コード → 完全な小盤面ワード。
///   マスクが重複するコードと両者勝ちのコードは 0 のまま（合法手では到達
///   しないが、参照してもクラッシュしない）。
/// - `free_counts`: 9ビット占有ユニオン → 空きセル数。終局スコア計算で使う。
pub struct SmallBoardTable {
    words: Box<[u64]>,
    free_counts: Box<[u8]>,
}

impl SmallBoardTable {
    /// テーブルを構築する（プロセスごとに一度）
    pub fn new() -> Self {
        let mut words = vec![0u64; 1 << 18].into_boxed_slice();

        for x_mask in 0u64..512 {
            for o_mask in 0u64..512 {
                if x_mask & o_mask != 0 {
                    continue; // 占有が重複するコードは不正
                }
                let x_wins = has_line(x_mask);
                let o_wins = has_line(o_mask);
                if x_wins && o_wins {
                    continue; // 両者勝ちも不正
                }

                let state = if x_wins {
                    GameState::XWins
                } else if o_wins {
                    GameState::OWins
                } else if (x_mask | o_mask) == small::PART_MASK {
                    GameState::Draw
                } else {
                    GameState::Ongoing
                };

                let union = x_mask | o_mask;
                let mut free_list = 0u64;
                let mut free_count = 0u64;
                for cell in 0..9u64 {
                    if union & (1 << cell) == 0 {
                        free_list |= cell << (free_count * 4);
                        free_count += 1;
                    }
                }

                let code = x_mask | (o_mask << small::O_PART_POS);
                words[code as usize] = code
                    | (state.code() << small::STATE_POS)
                    | (free_count << small::FREE_COUNT_POS)
                    | (free_list << small::FREE_CELLS_POS);
            }
        }

        let mut free_counts = vec![0u8; 512].into_boxed_slice();
        for (union, entry) in free_counts.iter_mut().enumerate() {
            *entry = 9 - (union as u64 & small::PART_MASK).count_ones() as u8;
        }

        Self { words, free_counts }
    }

    /// 占有コードに対応する完全な小盤面ワードを返す
    ///
    /// 引数のワードは占有ビット以外を含んでいてよい（マスクして参照する）。
    #[inline]
    pub fn info(&self, word: u64) -> u64 {
        self.words[small::occupancy(word) as usize]
    }

    /// 9ビット占有ユニオンに対する空きセル数
    #[inline]
    pub fn free_cell_count(&self, union: u64) -> u32 {
        self.free_counts[(union & small::PART_MASK) as usize] as u32
    }
}

impl Default for SmallBoardTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 9ビットマスクに3目並びが含まれるか
#[inline]
const fn has_line(mask: u64) -> bool {
    let mut i = 0;
    while i < LINE_MASKS.len() {
        if mask & LINE_MASKS[i] == LINE_MASKS[i] {
            return true;
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameState;

    #[test]
    fn test_empty_board_entry() {
        let table = SmallBoardTable::new();
        let word = table.info(0);
        assert_eq!(small::state(word), GameState::Ongoing.code());
        assert_eq!(small::free_count(word), 9);
        // 空きセルリストは 0..8 の昇順
        assert_eq!(small::free_cells(word), 0x876543210);
    }

    #[test]
    fn test_row_and_diagonal_wins() {
        let table = SmallBoardTable::new();
        // X が上段横3
        let word = table.info(0b000_000_111);
        assert_eq!(small::state(word), GameState::XWins.code());
        // O が斜め（セル 0,4,8）
        let word = table.info(0b100_010_001 << small::O_PART_POS);
        assert_eq!(small::state(word), GameState::OWins.code());
    }

    #[test]
    fn test_draw_entry() {
        let table = SmallBoardTable::new();
        // X O X / X O O / O X X: どちらにもラインがなく全セル占有
        let x_mask: u64 = 0b110001101;
        let o_mask: u64 = 0b001110010;
        let word = table.info(x_mask | (o_mask << small::O_PART_POS));
        assert_eq!(small::state(word), GameState::Draw.code());
        assert_eq!(small::free_count(word), 0);
    }

    #[test]
    fn test_overlapping_code_is_zero() {
        let table = SmallBoardTable::new();
        // セル0を両者が占有する不正コード
        let word = table.info(0b1 | (0b1 << small::O_PART_POS));
        assert_eq!(word, 0);
    }

    #[test]
    fn test_free_cell_count_table() {
        let table = SmallBoardTable::new();
        assert_eq!(table.free_cell_count(0), 9);
        assert_eq!(table.free_cell_count(0b111_111_111), 0);
        assert_eq!(table.free_cell_count(0b000_010_001), 7);
    }

    #[test]
    fn test_free_list_order_matches_count() {
        let table = SmallBoardTable::new();
        // X={0,8}, O={4}: 空きは {1,2,3,5,6,7} の昇順
        let word = table.info(0b100_000_001 | (0b000_010_000 << small::O_PART_POS));
        assert_eq!(small::free_count(word), 6);
        let mut cells = Vec::new();
        let mut list = small::free_cells(word);
        for _ in 0..small::free_count(word) {
            cells.push(list & small::NIBBLE_MASK);
            list >>= 4;
        }
        assert_eq!(cells, vec![1, 2, 3, 5, 6, 7]);
    }
}
