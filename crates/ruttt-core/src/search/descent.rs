//! Descent 探索本体
//!
//! 再帰的 best-first 価値学習探索（Cohen-Solal の Descent 系）。
//! 1回の反復は根から「現時点で最良に見える手」だけを辿って終局まで
//! 深化し、経路上の状態価値・行動価値を逆伝播で更新する。幅優先や
//! 全展開は行わない。単一経路深化がこのアルゴリズムの定義的性質で
//! あり、反復を重ねるほど根の価値推定が洗練される。
//!
//! 未訪問状態の展開では、終局の子は厳密スコアで直接評価し、非終局の
//! 子はまとめて1回の評価呼び出しに載せる。価値はすべて先手（X）視点
//! で持ち、手番Xなら最大化・手番Oなら最小化で手を選ぶ。

use std::time::{Duration, Instant};

use anyhow::Result;

use super::values::ValueTable;
use super::visited::StateSet;
use crate::board::{Board, MoveList, SmallBoardTable};
use crate::eval::{EvalBatch, Evaluator};
use crate::types::{Move, Player};

/// Descent 探索
///
/// 状態集合と価値テーブルは1エピソードのあいだ探索インスタンスが
/// 単独で所有・更新し、エピソード終了時にリプレイバッファへ排出する。
pub struct DescentSearch<E> {
    evaluator: E,
    batch: EvalBatch,
    visited: StateSet,
    values: ValueTable,
}

impl<E: Evaluator> DescentSearch<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            batch: EvalBatch::new(),
            visited: StateSet::new(),
            values: ValueTable::new(),
        }
    }

    /// 時間予算内で `descend_once` を繰り返し、根の価値推定を返す
    ///
    /// 予算はトップレベル反復の合間にのみ確認する。1反復の所要時間
    /// （再帰深さ×評価往復）のぶんだけ超過しうる。最低1反復は行う。
    pub fn run(&mut self, table: &SmallBoardTable, root: &Board, budget: Duration) -> Result<f32> {
        let deadline = Instant::now() + budget;
        let mut iterations = 0u64;
        let value = loop {
            let value = self.descend_once(table, root)?;
            iterations += 1;
            if Instant::now() >= deadline {
                break value;
            }
        };
        log::debug!(
            "descent: {iterations} iterations, root value {value:.4}, {} states visited",
            self.visited.len()
        );
        Ok(value)
    }

    /// 1反復: 現在最良の単一経路を終局まで深化させる
    fn descend_once(&mut self, table: &SmallBoardTable, state: &Board) -> Result<f32> {
        let hash = state.hash();

        if state.is_game_over() {
            let score = state.terminal_score(table);
            self.visited.add(state);
            self.values.set_state_value(hash, score);
            return Ok(score);
        }

        let mut moves = MoveList::new();
        state.generate_moves(&mut moves);

        if self.visited.add(state) {
            // 初訪問: 全子局面を展開する。終局の子は厳密スコアを直接
            // 書き、非終局の子はバッチへ回して評価呼び出しを1回にする。
            self.batch.begin();
            for &mv in moves.iter() {
                let mut child = *state;
                child.apply_move(table, mv);
                if child.is_game_over() {
                    let score = child.terminal_score(table);
                    self.visited.add(&child);
                    self.values.set_state_value(child.hash(), score);
                    self.values.set_action_value(hash, mv, score);
                } else {
                    self.batch.push(&child, mv);
                }
            }
            self.batch
                .flush(&mut self.evaluator, state.current_player(), hash, &mut self.values)?;
        }

        let maximize = state.current_player() == Player::X;
        let chosen = self.best_move(hash, &moves, maximize);
        let mut child = *state;
        child.apply_move(table, chosen);
        let value = self.descend_once(table, &child)?;
        self.values.set_action_value(hash, chosen, value);

        // 再帰で行動価値が動いたので選び直し、状態価値をそれに揃える
        let best = self.best_move(hash, &moves, maximize);
        let best_value = self.values.action_value(hash, best);
        self.values.set_state_value(hash, best_value);
        Ok(best_value)
    }

    /// 行動価値テーブル上の最良手
    ///
    /// 厳密比較のため、同値なら先に列挙された手が残る。
    fn best_move(&self, hash: u64, moves: &MoveList, maximize: bool) -> Move {
        debug_assert!(!moves.is_empty());
        let mut best = moves[0];
        let mut best_value = self.values.action_value(hash, best);
        for &mv in moves.iter().skip(1) {
            let value = self.values.action_value(hash, mv);
            if (maximize && value > best_value) || (!maximize && value < best_value) {
                best = mv;
                best_value = value;
            }
        }
        best
    }

    /// 訪問済み状態集合
    #[inline]
    pub fn visited(&self) -> &StateSet {
        &self.visited
    }

    /// 価値テーブル
    #[inline]
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// リプレイバッファへの排出用に両キャッシュを可変で貸し出す
    #[inline]
    pub fn caches_mut(&mut self) -> (&mut StateSet, &mut ValueTable) {
        (&mut self.visited, &mut self.values)
    }
}
