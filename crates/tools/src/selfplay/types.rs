//! 自己対局の設定と記録型

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 自己対局の設定
#[derive(Clone, Copy, Debug)]
pub struct SelfPlayConfig {
    /// 1手あたりの探索時間予算
    pub move_time: Duration,
    /// ordinal 分布の ratio（1.0 で常に最良手、0.0 で一様）
    pub ordinal_ratio: f32,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            move_time: Duration::from_millis(1000),
            ordinal_ratio: 0.7,
        }
    }
}

/// 1エピソードの結果
#[derive(Clone, Debug)]
pub struct EpisodeStats {
    /// 着手数
    pub plies: u32,
    /// 終局状態のラベル（"x_wins" | "o_wins" | "draw"）
    pub outcome: String,
    /// 終局スコア（先手視点）
    pub score: f32,
}

/// 学習サンプル1件のJSONL表現
///
/// テンソルは手番側視点に正規化済みで、`value` も同じ視点の符号に
/// 直してある（後手番の状態では先手視点の値を反転する）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    /// main テンソル（9×9×6、channels-last）
    pub main: Vec<u8>,
    /// macro テンソル（3×3×2）
    #[serde(rename = "macro")]
    pub macro_channels: Vec<u8>,
    /// 手番側視点の価値
    pub value: f32,
}
