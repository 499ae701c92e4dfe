//! A2PLUS - Apple II Plus Emulator Core in Rust
//!
//! ヘッドレスのホストランナー:
//! ROMとフロッピーをロードし、フレーム単位でマシンを駆動する。
//! ビデオ描画やサウンド出力は外部のフロントエンドが担当する。
//!
//! # 使用方法
//! ```
//! a2plus -1 game.nib
//! RUST_LOG=info a2plus --frames 600
//! ```

// テスト専用モジュール（main.rsのみ）
mod test_cpu;

use a2plus::apple2::Apple2;
use a2plus::config::Config;
use clap::Parser;
use std::time::{Duration, Instant};

/// A2PLUS - Apple II Plus Emulator Core in Rust
#[derive(Parser, Debug)]
#[command(name = "a2plus")]
#[command(author = "A2RS Project")]
#[command(version = "0.1.0")]
#[command(about = "A2PLUS - Apple II Plus Emulator Core in Rust", long_about = None)]
struct Args {
    /// ディスクイメージファイル（NIB形式、ドライブ1）
    #[arg(short = '1', long)]
    disk1: Option<String>,

    /// APPLESOFT ROMファイル（12KB）
    #[arg(short, long)]
    rom: Option<String>,

    /// Disk II PROM（256バイト）
    #[arg(long)]
    disk_rom: Option<String>,

    /// 実行するフレーム数（0で無制限）
    #[arg(long, default_value = "0")]
    frames: u64,

    /// 目標FPS
    #[arg(long)]
    fps: Option<u64>,

    /// リアルタイムにペーシングせず全力で実行する
    #[arg(long)]
    no_throttle: bool,

    /// CPUテストを実行（Klaus2m5 6502 functional test）
    #[arg(long, value_name = "TEST_BIN")]
    test_cpu: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // CPU機能テストモード
    if let Some(path) = args.test_cpu {
        match test_cpu::run_functional_test(&path) {
            Ok(true) => std::process::exit(0),
            Ok(false) => std::process::exit(1),
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let mut config = Config::load();
    if let Some(fps) = args.fps {
        config.fps = fps.max(1);
    }
    let rom_path = args.rom.unwrap_or_else(|| config.rom_path.clone());
    let disk_rom_path = args.disk_rom.unwrap_or_else(|| config.disk_rom_path.clone());

    let mut machine = match Apple2::from_files(&rom_path, &disk_rom_path) {
        Ok(machine) => machine,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    machine.fps = config.fps;
    log::info!("Loaded ROM {} and PROM {}", rom_path, disk_rom_path);

    // フロッピー: コマンドラインが優先、なければ前回のものを使う
    let floppy = args.disk1.clone().or_else(|| config.last_disk.clone());
    if let Some(path) = floppy {
        match machine.insert_floppy(&path) {
            Ok(()) => {
                config.last_disk = Some(path);
                machine.power_cycle();
            }
            Err(e) => log::error!("{}", e),
        }
    }

    config.rom_path = rom_path;
    config.disk_rom_path = disk_rom_path;
    if let Err(e) = config.save() {
        log::warn!("{}", e);
    }

    //===================================================================== メインループ

    let frame_duration = Duration::from_micros(1_000_000 / machine.fps);
    let mut next_frame = Instant::now();
    let started = Instant::now();

    loop {
        machine.run_frame();

        if args.frames != 0 && machine.frame_count() >= args.frames {
            break;
        }

        if !args.no_throttle {
            next_frame += frame_duration;
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            } else {
                // 遅れているときはペースを現在時刻に合わせ直す
                next_frame = now;
            }
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    log::info!(
        "Ran {} frames, {} cycles in {:.2}s",
        machine.frame_count(),
        machine.ticks(),
        elapsed
    );
}
