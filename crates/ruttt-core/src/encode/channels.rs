//! チャンネルエンコーディング
//!
//! 盤面を channels-last のバイトテンソルへ変換する。
//!
//! main テンソル（9×9×6、アドレスは `(h*9 + w)*6 + c`）:
//!
//! | c | 内容                                   |
//! |---|----------------------------------------|
//! | 0 | 手番側の石                             |
//! | 1 | 相手側の石                             |
//! | 2 | 手番側が勝った小盤面                   |
//! | 3 | 相手側が勝った小盤面                   |
//! | 4 | 合法ターゲット小盤面                   |
//! | 5 | 合法ターゲット小盤面内の空きセル       |
//!
//! macro テンソル（3×3×2）: 手番側・相手側が勝った小盤面。
//!
//! チャンネル 0/2 は常に「その局面で手番を持つ側」を指すよう正規化する。
//! 評価バックエンドの出力は常に手番側から見た良さになる。
//!
//! 空間座標は `(h, w)` → 小盤面 `(h/3)*3 + w/3`、セル `(h%3)*3 + w%3`。

use crate::board::{small, Board, SUB_BOARD_COUNT};
use crate::types::Player;

/// main テンソルのチャンネル数
pub const MAIN_CHANNELS: usize = 6;
/// main テンソルの総バイト数（9×9×6）
pub const MAIN_SIZE: usize = 9 * 9 * MAIN_CHANNELS;
/// macro テンソルの総バイト数（3×3×2）
pub const MACRO_SIZE: usize = 3 * 3 * 2;

/// 盤面を main / macro テンソルへ書き出す
///
/// 出力スライスはそれぞれ [`MAIN_SIZE`] / [`MACRO_SIZE`] バイト以上で
/// あること。0/1 のバイト値を書き込む。
pub fn encode_channels(board: &Board, main_out: &mut [u8], macro_out: &mut [u8]) {
    let mover = board.current_player();
    let mover_wins = board.wins_layer(mover);
    let opponent_wins = board.wins_layer(mover.opponent());

    // 小盤面ごとの9ビットマスクをチャンネル別に組み立てる
    let mut masks = [[0u64; SUB_BOARD_COUNT]; MAIN_CHANNELS];
    for index in 0..SUB_BOARD_COUNT {
        let word = board.sub_board(index);
        let (mine, theirs) = match mover {
            Player::X => (small::x_part(word), small::o_part(word)),
            Player::O => (small::o_part(word), small::x_part(word)),
        };
        masks[0][index] = mine;
        masks[1][index] = theirs;
        masks[2][index] = small::PART_MASK * ((mover_wins >> index) & 1);
        masks[3][index] = small::PART_MASK * ((opponent_wins >> index) & 1);
    }
    let encoded = board.valid_boards_encoded();
    for i in 0..board.valid_board_count() {
        let index = ((encoded >> (i * 4)) & small::NIBBLE_MASK) as usize;
        let word = board.sub_board(index);
        masks[4][index] = small::PART_MASK;
        masks[5][index] = !small::occupancy_union(word) & small::PART_MASK;
    }

    let mut offset = 0;
    for h in 0..9usize {
        for w in 0..9usize {
            let board_index = (h / 3) * 3 + w / 3;
            let cell_index = (h % 3) * 3 + w % 3;
            for channel_masks in &masks {
                main_out[offset] = ((channel_masks[board_index] >> cell_index) & 1) as u8;
                offset += 1;
            }
        }
    }

    for index in 0..SUB_BOARD_COUNT {
        macro_out[2 * index] = ((mover_wins >> index) & 1) as u8;
        macro_out[2 * index + 1] = ((opponent_wins >> index) & 1) as u8;
    }
}
