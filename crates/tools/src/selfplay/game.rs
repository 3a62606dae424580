//! エピソード実行と着手選択

use anyhow::Result;
use rand::Rng;

use ruttt_core::board::{Board, MoveList, SmallBoardTable};
use ruttt_core::eval::Evaluator;
use ruttt_core::replay::ReplayBuffer;
use ruttt_core::search::{DescentSearch, ValueTable};
use ruttt_core::types::json::state_label;
use ruttt_core::types::{Move, Player};

use super::types::{EpisodeStats, SelfPlayConfig};

/// 1エピソードを初期局面から終局まで実行する
///
/// 各手番で時間予算つきの Descent を走らせ、ordinal 分布で着手を選ぶ。
/// エピソードの初手だけは ratio 0（一様）で選び、開局の多様性を確保する。
pub fn play_episode<E: Evaluator, R: Rng>(
    table: &SmallBoardTable,
    search: &mut DescentSearch<E>,
    config: &SelfPlayConfig,
    rng: &mut R,
) -> Result<EpisodeStats> {
    let mut board = Board::new(table);
    let mut plies = 0u32;

    while !board.is_game_over() {
        search.run(table, &board, config.move_time)?;
        let ratio = if plies == 0 { 0.0 } else { config.ordinal_ratio };
        let mv = select_move_ordinal(&board, search.values(), ratio, rng);
        board.apply_move(table, mv);
        plies += 1;
        log::debug!("ply {plies}: {mv} ({} states)", search.visited().len());
    }

    Ok(EpisodeStats {
        plies,
        outcome: state_label(board.game_state()).to_string(),
        score: board.terminal_score(table),
    })
}

/// リプレイバッファに十分な新規データが溜まるまで自己対局を繰り返す
///
/// エピソードごとにキャッシュをバッファへ排出する。実行した
/// エピソード数を返す。
pub fn run_selfplay<E: Evaluator, R: Rng>(
    table: &SmallBoardTable,
    search: &mut DescentSearch<E>,
    buffer: &mut ReplayBuffer,
    config: &SelfPlayConfig,
    rng: &mut R,
) -> Result<u32> {
    let mut episodes = 0u32;
    while !buffer.is_enough_new_data() {
        let stats = play_episode(table, search, config, rng)?;
        episodes += 1;
        let harvested = search.visited().len();
        let (states, values) = search.caches_mut();
        buffer.drain_from(states, values);
        log::info!(
            "episode {episodes}: {} in {} plies (score {:.3}), {harvested} states harvested, \
             buffer {}/{} new",
            stats.outcome,
            stats.plies,
            stats.score,
            buffer.new_added(),
            buffer.len(),
        );
    }
    Ok(episodes)
}

/// ordinal 分布による着手選択
///
/// 行動価値で手番に応じて降順/昇順に並べ、j 番目の候補を
/// p = ratio·(n−j−1)/(n−j) + 1/(n−j) で受理しながら先頭から走査する。
/// ratio 1.0 なら常に先頭（最良手）、0.0 なら残り候補から一様に選ぶ
/// ことと等価になる。全候補が棄却されたら末尾の手を返す。
pub fn select_move_ordinal<R: Rng>(
    board: &Board,
    values: &ValueTable,
    ratio: f32,
    rng: &mut R,
) -> Move {
    let mut moves = MoveList::new();
    board.generate_moves(&mut moves);
    debug_assert!(!moves.is_empty());

    let hash = board.hash();
    let mut scored: Vec<(Move, f32)> = moves
        .iter()
        .map(|&mv| (mv, values.action_value(hash, mv)))
        .collect();
    if board.current_player() == Player::X {
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    let n = scored.len();
    for j in 0..n {
        let remaining = (n - j) as f32;
        let p = ratio * (remaining - 1.0) / remaining + 1.0 / remaining;
        if rng.random::<f32>() < p {
            return scored[j].0;
        }
    }
    scored[n - 1].0
}
