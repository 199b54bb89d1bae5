//! # Anim CLI
//!
//! 在确定性模拟宿主上运行动画场景，按固定间隔打印视图状态。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p anim-cli -- demo
//! cargo run -p anim-cli -- --seconds 2 --every 0.1 shake --seed 7
//! cargo run -p anim-cli -- follow 0,0 100,0 100,100 --speed 80
//! cargo run -p anim-cli -- describe demo
//! cargo run -p anim-cli -- --config anim.json --verbose demo
//! ```

mod playback;
mod scene;

use std::path::PathBuf;

use anim_host::HostConfig;
use anim_runtime::Vec2;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::playback::PlayOptions;
use crate::scene::{Scene, Stage};

#[derive(Parser)]
#[command(name = "anim")]
#[command(about = "动画场景模拟器 - 在模拟宿主上运行动作树并打印采样")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 宿主配置文件（默认：anim.json，不存在时使用默认配置）
    #[arg(short, long, default_value = "anim.json", global = true)]
    config: PathBuf,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 播放时长（秒）
    #[arg(short, long, default_value_t = 6.0, global = true)]
    seconds: f32,

    /// 采样间隔（秒）
    #[arg(short, long, default_value_t = 0.5, global = true)]
    every: f32,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Scene(SceneCommand),

    /// 打印场景的动作树，不运行
    Describe {
        #[command(subcommand)]
        scene: SceneCommand,
    },
}

#[derive(Subcommand)]
enum SceneCommand {
    /// 示例控制器：移动、旋转、移动、旋转，无限重复
    Demo {
        #[command(flatten)]
        stage: StageArgs,
    },

    /// 在舞台中心随机抖动
    Shake {
        #[command(flatten)]
        stage: StageArgs,

        /// 水平抖动幅度
        #[arg(long, default_value_t = 10.0)]
        force_x: f32,

        /// 垂直抖动幅度
        #[arg(long, default_value_t = 10.0)]
        force_y: f32,

        /// 每秒抖动次数
        #[arg(long, default_value_t = 40.0)]
        frequency: f32,

        /// 抖动时长（秒）
        #[arg(long, default_value_t = 1.0)]
        duration: f32,

        /// 随机种子（不指定则每次不同）
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 从舞台中心出发依次经过各点
    Follow {
        #[command(flatten)]
        stage: StageArgs,

        /// 路径点，格式 x,y（x 为负数时放在 `--` 之后）
        #[arg(value_parser = scene::parse_point)]
        points: Vec<Vec2>,

        /// 移动速度（每秒距离）
        #[arg(long, default_value_t = 100.0)]
        speed: f32,
    },
}

#[derive(Args, Clone, Copy)]
struct StageArgs {
    /// 舞台宽度
    #[arg(long, default_value_t = 375.0)]
    width: f32,

    /// 舞台高度
    #[arg(long, default_value_t = 667.0)]
    height: f32,
}

impl From<StageArgs> for Stage {
    fn from(args: StageArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
        }
    }
}

impl SceneCommand {
    fn build(&self) -> Result<Scene> {
        let scene = match self {
            Self::Demo { stage } => scene::demo((*stage).into()),
            Self::Shake {
                stage,
                force_x,
                force_y,
                frequency,
                duration,
                seed,
            } => scene::shake(
                (*stage).into(),
                Vec2::new(*force_x, *force_y),
                *frequency,
                *duration,
                *seed,
            ),
            Self::Follow {
                stage,
                points,
                speed,
            } => scene::follow((*stage).into(), points, *speed),
        };
        scene.context("无法构建场景")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Describe { scene } => {
            let scene = scene.build()?;
            print!("{}", scene.action.describe());
        }
        Commands::Scene(command) => {
            let scene = command.build()?;
            let config = HostConfig::load(&cli.config);
            let options = PlayOptions {
                seconds: cli.seconds,
                every: cli.every,
            };

            let declared = scene.action.duration();
            println!("▶ {} (declared {declared:.2}s)", scene.name);
            let playback = playback::play(&config, &scene, options)?;
            for line in &playback.samples {
                println!("  {line}");
            }
            println!("{}", playback.summary());
        }
    }

    Ok(())
}
