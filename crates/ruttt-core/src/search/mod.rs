//! Descent 探索モジュール
//!
//! 再帰的 best-first 価値学習探索（Descent）と、1エピソード分の
//! 状態集合・価値テーブルを提供する。
//!
//! - [`DescentSearch`]: 探索本体。時間予算内で `descend_once` を繰り返す
//! - [`StateSet`]: 訪問済み状態の重複排除集合（ハッシュキー + 値型アリーナ）
//! - [`ValueTable`]: 状態価値 v(s) と行動価値 v'(s,a) の2テーブル

mod descent;
#[cfg(test)]
mod tests;
mod values;
mod visited;

pub use descent::DescentSearch;
pub use values::ValueTable;
pub use visited::StateSet;
