use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use ruttt_core::board::SmallBoardTable;
use ruttt_core::replay::ReplayBuffer;
use ruttt_core::search::DescentSearch;
use tools::selfplay::{
    run_selfplay, write_samples, MacroMaterialEvaluator, SelfPlayConfig,
};

/// Descent 自己対局ハーネス。十分な新規データが溜まるまでエピソードを
/// 回し、リプレイバッファからサンプリングした学習データを JSONL で
/// 書き出す。
///
/// # よく使うコマンド例
///
/// - 小さめの設定で1ラウンドだけ回す:
///   `cargo run -p tools --bin descent_selfplay -- --move-time-ms 100 --sample-size 512 --out runs/selfplay/smoke.jsonl`
///
/// - 既定パラメータ（1手1秒、サンプル40960件）で回し続ける:
///   `cargo run -p tools --bin descent_selfplay -- --rounds 0`
///
/// `--out` 未指定時は `runs/selfplay/<timestamp>-samples.jsonl` に書き出す。
#[derive(Parser, Debug)]
#[command(author, version, about = "ruttt descent selfplay harness")]
struct Cli {
    /// Rounds of selfplay + sample export. 0 = run forever
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Per-move search budget in milliseconds
    #[arg(long, default_value_t = 1000)]
    move_time_ms: u64,

    /// Replay buffer capacity
    #[arg(long, default_value_t = 800_000)]
    buffer_capacity: usize,

    /// Samples per export batch (also the "enough new data" threshold)
    #[arg(long, default_value_t = 40_960)]
    sample_size: usize,

    /// Ordinal action selection ratio (1.0 = always best move)
    #[arg(long, default_value_t = 0.7)]
    ordinal_ratio: f32,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSONL path for sampled training data
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let out_path = cli.out.clone().unwrap_or_else(|| {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S");
        PathBuf::from(format!("runs/selfplay/{timestamp}-samples.jsonl"))
    });
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(&out_path)
        .with_context(|| format!("failed to create {}", out_path.display()))?;
    let mut writer = BufWriter::new(file);

    let config = SelfPlayConfig {
        move_time: std::time::Duration::from_millis(cli.move_time_ms),
        ordinal_ratio: cli.ordinal_ratio,
    };
    let table = SmallBoardTable::new();
    let mut search = DescentSearch::new(MacroMaterialEvaluator);
    let mut buffer = ReplayBuffer::new(cli.buffer_capacity, cli.sample_size, seed);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut round = 0u32;
    loop {
        round += 1;
        let episodes = run_selfplay(&table, &mut search, &mut buffer, &config, &mut rng)?;
        let samples = buffer.sample(cli.sample_size);
        let written = write_samples(&mut writer, samples)
            .with_context(|| format!("failed to export to {}", out_path.display()))?;
        log::info!(
            "round {round}: {episodes} episodes, exported {written} samples to {}",
            out_path.display()
        );
        if cli.rounds != 0 && round >= cli.rounds {
            break;
        }
    }

    Ok(())
}
