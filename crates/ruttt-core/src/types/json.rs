//! 盤面のJSON表現
//!
//! 自己対局ハーネスのログ出力やデバッグ用のスナップショット。
//! ビットパック表現を人間と外部ツールが読める形に落とす。

use serde::{Deserialize, Serialize};

use crate::board::{small, Board, SUB_BOARD_COUNT};
use crate::types::{GameState, Player};

/// 盤面全体のJSONスナップショット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardJson {
    /// 9行×9列。各行は "x" / "o" / "." からなる9文字
    pub cells: Vec<String>,
    /// 手番: "x" | "o"
    pub turn: String,
    /// "ongoing" | "x_wins" | "o_wins" | "draw"
    pub state: String,
    /// 現在の合法ターゲット小盤面インデックス
    pub valid_boards: Vec<u8>,
    /// 内容ハッシュ（16進）
    pub hash: String,
}

impl BoardJson {
    /// 盤面からスナップショットを作る
    pub fn from_board(board: &Board) -> Self {
        let mut cells = Vec::with_capacity(9);
        for h in 0..9usize {
            let mut row = String::with_capacity(9);
            for w in 0..9usize {
                let board_index = (h / 3) * 3 + w / 3;
                let cell_index = (h % 3) * 3 + w % 3;
                let word = board.sub_board(board_index);
                let bit = 1u64 << cell_index;
                if small::x_part(word) & bit != 0 {
                    row.push('x');
                } else if small::o_part(word) & bit != 0 {
                    row.push('o');
                } else {
                    row.push('.');
                }
            }
            cells.push(row);
        }

        let encoded = board.valid_boards_encoded();
        let valid_boards = (0..board.valid_board_count())
            .map(|i| ((encoded >> (i * 4)) & small::NIBBLE_MASK) as u8)
            .collect();

        Self {
            cells,
            turn: player_label(board.current_player()).to_string(),
            state: state_label(board.game_state()).to_string(),
            valid_boards,
            hash: format!("{:016x}", board.hash()),
        }
    }
}

/// 手番のラベル
pub fn player_label(player: Player) -> &'static str {
    match player {
        Player::X => "x",
        Player::O => "o",
    }
}

/// ゲーム状態のラベル
pub fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Ongoing => "ongoing",
        GameState::XWins => "x_wins",
        GameState::OWins => "o_wins",
        GameState::Draw => "draw",
    }
}
