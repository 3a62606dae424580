//! descent モジュールのテスト

use std::time::Duration;

use anyhow::{bail, Result};

use crate::board::{Board, MoveList, SmallBoardTable};
use crate::eval::Evaluator;
use crate::search::DescentSearch;
use crate::types::{Move, Player};

/// 全局面に 0 を返すスタブ
struct ZeroEvaluator;

impl Evaluator for ZeroEvaluator {
    fn evaluate(
        &mut self,
        _main: &[u8],
        _macro: &[u8],
        count: usize,
        values_out: &mut [f32],
    ) -> Result<()> {
        values_out[..count].fill(0.0);
        Ok(())
    }
}

/// 呼ばれた時点で失敗するスタブ（評価が起きないことの検証用）
struct FailingEvaluator;

impl Evaluator for FailingEvaluator {
    fn evaluate(&mut self, _: &[u8], _: &[u8], _: usize, _: &mut [f32]) -> Result<()> {
        bail!("evaluator must not be called");
    }
}

/// 手番側の石数差から決める決定的な擬似評価
struct MaterialStub;

impl Evaluator for MaterialStub {
    fn evaluate(
        &mut self,
        main: &[u8],
        _macro: &[u8],
        count: usize,
        values_out: &mut [f32],
    ) -> Result<()> {
        for i in 0..count {
            let offset = i * crate::encode::MAIN_SIZE;
            let mut diff = 0i32;
            for cell in 0..81 {
                diff += main[offset + cell * 6] as i32;
                diff -= main[offset + cell * 6 + 1] as i32;
            }
            values_out[i] = diff as f32 / 81.0;
        }
        Ok(())
    }
}

/// X の最速勝ち形を作る手順（`board::pos` のテストと同じ直接適用）
const FASTEST_X_WIN: [(u8, u8); 17] = [
    (0, 0),
    (3, 0),
    (0, 1),
    (3, 1),
    (0, 2),
    (4, 0),
    (1, 0),
    (4, 1),
    (1, 1),
    (5, 0),
    (1, 2),
    (5, 1),
    (2, 0),
    (6, 0),
    (2, 1),
    (6, 1),
    (2, 2),
];

fn setup(moves: &[(u8, u8)]) -> (SmallBoardTable, Board) {
    let table = SmallBoardTable::new();
    let mut board = Board::new(&table);
    for &(bi, ci) in moves {
        board.apply_move(&table, Move::new(bi, ci));
    }
    (table, board)
}

/// 探索後の整合性: 状態価値は行動価値の argmax/argmin と一致する
fn assert_state_action_consistency<E: Evaluator>(
    search: &DescentSearch<E>,
    board: &Board,
    maximize: bool,
) {
    let mut moves = MoveList::new();
    board.generate_moves(&mut moves);
    let best = moves
        .iter()
        .map(|&mv| search.values().action_value(board.hash(), mv))
        .fold(if maximize { f32::NEG_INFINITY } else { f32::INFINITY }, |acc, v| {
            if maximize { acc.max(v) } else { acc.min(v) }
        });
    assert_eq!(search.values().state_value(board.hash()), best);
}

#[test]
fn test_single_iteration_consistency() {
    let (table, root) = setup(&[]);
    let mut search = DescentSearch::new(ZeroEvaluator);

    let value = search.run(&table, &root, Duration::ZERO).unwrap();

    assert_eq!(search.values().state_value(root.hash()), value);
    assert_state_action_consistency(&search, &root, true);
    // 根と経路上の状態が訪問済みになっている
    assert!(search.visited().contains(&root));
    assert!(search.visited().len() > 1);
}

#[test]
fn test_terminal_root_returns_exact_score() {
    let (table, root) = setup(&FASTEST_X_WIN);
    assert!(root.is_game_over());

    // 終局局面では評価器は一切呼ばれない
    let mut search = DescentSearch::new(FailingEvaluator);
    let value = search.run(&table, &root, Duration::ZERO).unwrap();

    assert_eq!(value, 1.0);
    assert_eq!(search.values().state_value(root.hash()), 1.0);
    assert!(search.visited().contains(&root));
    assert_eq!(search.visited().len(), 1);
}

#[test]
fn test_descent_finds_immediate_win() {
    // 最速勝ち手順の最終手前: X は (2,2) で勝てる
    let (table, root) = setup(&FASTEST_X_WIN[..16]);
    assert_eq!(root.current_player(), Player::X);

    let mut search = DescentSearch::new(ZeroEvaluator);
    let value = search.run(&table, &root, Duration::ZERO).unwrap();

    assert_eq!(value, 1.0);
    assert_eq!(search.values().action_value(root.hash(), Move::new(2, 2)), 1.0);
    assert_state_action_consistency(&search, &root, true);
}

#[test]
fn test_forced_single_move_skips_evaluation() {
    // 盤面8の最後の1セルだけが残った局面。唯一の子は終局（引き分け）
    // なので、バッチが空のまま評価器は呼ばれない。
    let x_moves: [(u8, u8); 16] = [
        (0, 0),
        (0, 1),
        (0, 2),
        (2, 0),
        (2, 1),
        (2, 2),
        (3, 0),
        (3, 1),
        (3, 2),
        (7, 0),
        (7, 1),
        (7, 2),
        (8, 0),
        (8, 2),
        (8, 3),
        (8, 7),
    ];
    let o_moves: [(u8, u8); 16] = [
        (1, 0),
        (1, 1),
        (1, 2),
        (4, 0),
        (4, 1),
        (4, 2),
        (5, 0),
        (5, 1),
        (5, 2),
        (6, 0),
        (6, 1),
        (6, 2),
        (8, 1),
        (8, 4),
        (8, 5),
        (8, 6),
    ];
    let table = SmallBoardTable::new();
    let mut root = Board::new(&table);
    for i in 0..16 {
        root.apply_move(&table, Move::new(x_moves[i].0, x_moves[i].1));
        root.apply_move(&table, Move::new(o_moves[i].0, o_moves[i].1));
    }
    assert!(!root.is_game_over());

    let mut moves = MoveList::new();
    root.generate_moves(&mut moves);
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0], Move::new(8, 8));

    let mut search = DescentSearch::new(FailingEvaluator);
    let value = search.run(&table, &root, Duration::ZERO).unwrap();
    assert_eq!(value, 0.0);
    assert_eq!(search.values().action_value(root.hash(), Move::new(8, 8)), 0.0);
}

#[test]
fn test_repeated_iterations_stay_consistent() {
    let (table, root) = setup(&[(4, 4)]);
    assert_eq!(root.current_player(), Player::O);

    let mut search = DescentSearch::new(MaterialStub);
    search.run(&table, &root, Duration::from_millis(5)).unwrap();

    // 手番Oの根では最小値と一致する
    assert_state_action_consistency(&search, &root, false);
    let (state_count, action_count) = search.values().len();
    assert!(state_count > 0);
    assert!(action_count > 0);
    assert!(search.visited().len() <= state_count);
}
