//! 盤面モジュール
//!
//! 9つの小盤面（3×3）からなる大盤面を12ワード相当の固定長表現で扱う。
//!
//! - `small`: 小盤面ワードのビットフィールドアクセス
//! - [`SmallBoardTable`]: 2^18 通りの占有コードに対する派生情報の事前計算テーブル
//! - [`Board`]: 大盤面本体（着手適用・合法手列挙・終局スコア）
//! - [`MoveList`]: 合法手の再利用バッファ
//!
//! 小盤面ワードの派生フィールド（状態・空きセル数・空きセルリスト）は
//! 常にテーブル参照で導出し、手書きで更新しない。

mod movelist;
mod pos;
pub mod small;
mod tables;

pub use movelist::MoveList;
pub use pos::{Board, SUB_BOARD_COUNT};
pub use tables::SmallBoardTable;
