//! Apple II+ エミュレータ
//!
//! CPU、メモリ、周辺機器を統合したマシン本体と
//! フレーム単位のスケジューラ

use std::path::Path;

use crate::clock::{Clock, CPU_FREQUENCY};
use crate::cpu::Cpu;
use crate::memory::Memory;

/// デフォルトの目標フレームレート
pub const DEFAULT_FPS: u64 = 60;

/// ディスクモーター回転中のオーバークロック: 1バーストのサイクル数
const MOTOR_BURST_CYCLES: u64 = 10_000;

/// モーターが止まらない場合でもUIを固めないためのバースト回数上限
const MOTOR_BURST_LIMIT: u32 = 50;

/// Power-UPバイト: ここを0にしてからリセットするとコールドブートになる
const POWER_UP_BYTE: u16 = 0x03F4;

/// Apple II+ マシン
pub struct Apple2 {
    /// 6502 CPU
    pub cpu: Cpu,
    /// メモリシステム（周辺機器を含む）
    pub memory: Memory,
    /// 共有サイクルクロック
    pub clock: Clock,
    /// 一時停止フラグ
    pub paused: bool,
    /// 目標フレームレート
    pub fps: u64,
    /// フレームカウンタ
    frame_count: u64,
}

impl Apple2 {
    /// ROMイメージからマシンを構築してリセットする
    ///
    /// rom は12KBのAPPLESOFT ROM、slot_rom は256バイトのDisk ][ PROM
    pub fn new(rom: &[u8], slot_rom: &[u8]) -> Result<Self, String> {
        let clock = Clock::new();
        let mut memory = Memory::new(&clock);
        memory.load_rom(rom)?;
        memory.load_slot_rom(slot_rom)?;

        let mut cpu = Cpu::new(clock.clone());
        cpu.reset(&mut memory);

        Ok(Apple2 {
            cpu,
            memory,
            clock,
            paused: false,
            fps: DEFAULT_FPS,
            frame_count: 0,
        })
    }

    /// ROMファイルからマシンを構築する
    pub fn from_files<P: AsRef<Path>>(rom_path: P, slot_rom_path: P) -> Result<Self, String> {
        let rom = std::fs::read(rom_path.as_ref())
            .map_err(|e| format!("Failed to read ROM {}: {}", rom_path.as_ref().display(), e))?;
        let slot_rom = std::fs::read(slot_rom_path.as_ref()).map_err(|e| {
            format!(
                "Failed to read Disk II PROM {}: {}",
                slot_rom_path.as_ref().display(),
                e
            )
        })?;
        Apple2::new(&rom, &slot_rom)
    }

    /// フロッピーイメージをロードする
    pub fn insert_floppy<P: AsRef<Path>>(&mut self, path: P) -> Result<(), String> {
        self.memory.disk.insert_floppy(path)
    }

    /// ウォームリセット（RAMと周辺機器の状態は保持される）
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.memory);
    }

    /// パワーサイクル: Power-UPバイトを消してからリセットする
    /// 起動時の自己診断からやり直すコールドブート相当
    pub fn power_cycle(&mut self) {
        use crate::cpu::MemoryBus;
        self.memory.write(POWER_UP_BYTE, 0);
        self.cpu.reset(&mut self.memory);
    }

    /// 1フレーム分のエミュレーションを実行する
    ///
    /// 通常は1フレーム分のサイクルを実行し、ディスクモーターが
    /// 回っている間は追加バーストでオーバークロックして
    /// ディスクI/O中の体感待ち時間を減らす
    pub fn run_frame(&mut self) {
        if !self.paused {
            self.cpu.run(&mut self.memory, CPU_FREQUENCY / self.fps);
        }

        let mut limit = MOTOR_BURST_LIMIT;
        while self.memory.disk.motor_on() && limit > 0 {
            self.cpu.run(&mut self.memory, MOTOR_BURST_CYCLES);
            limit -= 1;
        }

        self.frame_count += 1;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::MemoryBus;
    use crate::memory::{ROM_SIZE, SL6_SIZE};

    /// リセットベクタが$E000を指す最小ROM
    /// $E000にはJMP $E000（無限ループ）を置く
    fn test_rom() -> Vec<u8> {
        let mut rom = vec![0u8; ROM_SIZE];
        rom[0x1000] = 0x4C; // $E000: JMP $E000
        rom[0x1001] = 0x00;
        rom[0x1002] = 0xE0;
        rom[0x2FFC] = 0x00; // リセットベクタ = $E000
        rom[0x2FFD] = 0xE0;
        rom
    }

    fn new_machine() -> Apple2 {
        Apple2::new(&test_rom(), &[0u8; SL6_SIZE]).unwrap()
    }

    #[test]
    fn test_construction_enforces_rom_sizes() {
        assert!(Apple2::new(&[0u8; 100], &[0u8; SL6_SIZE]).is_err());
        assert!(Apple2::new(&test_rom(), &[0u8; 100]).is_err());
        assert!(Apple2::new(&test_rom(), &[0u8; SL6_SIZE]).is_ok());
    }

    #[test]
    fn test_reset_loads_vector_from_rom() {
        let machine = new_machine();
        assert_eq!(machine.cpu.regs.pc, 0xE000);
        assert_eq!(machine.ticks(), 7);
    }

    #[test]
    fn test_power_cycle_clears_power_up_byte() {
        let mut machine = new_machine();
        machine.memory.write(0x03F4, 0xA5);
        machine.power_cycle();
        assert_eq!(machine.memory.read(0x03F4), 0x00);
        assert_eq!(machine.cpu.regs.pc, 0xE000);
    }

    #[test]
    fn test_run_frame_consumes_budget() {
        let mut machine = new_machine();
        let start = machine.ticks();
        machine.run_frame();
        let elapsed = machine.ticks() - start;
        // JMP無限ループ（3サイクル）なのでバジェット+端数だけ進む
        assert!(elapsed >= CPU_FREQUENCY / DEFAULT_FPS);
        assert!(elapsed < CPU_FREQUENCY / DEFAULT_FPS + 10);
        assert_eq!(machine.frame_count(), 1);
    }

    #[test]
    fn test_paused_frame_runs_nothing() {
        let mut machine = new_machine();
        machine.paused = true;
        let start = machine.ticks();
        machine.run_frame();
        assert_eq!(machine.ticks(), start);
    }

    #[test]
    fn test_motor_on_overclocks_frame() {
        let mut machine = new_machine();
        machine.memory.read(0xC0E9); // モーターオン
        let start = machine.ticks();
        machine.run_frame();
        let elapsed = machine.ticks() - start;
        // 通常バジェットに加えて上限いっぱいのバーストが走る
        assert!(elapsed >= CPU_FREQUENCY / DEFAULT_FPS + 50 * 10_000);
        assert!(machine.memory.disk.motor_on());
    }

    #[test]
    fn test_register_invariants_after_frames() {
        let mut machine = new_machine();
        for _ in 0..3 {
            machine.run_frame();
        }
        // PCは常に16bit、SPは8bitに収まっている（型が保証するが
        // 実行後の値も妥当な範囲にあること）
        assert_eq!(machine.cpu.regs.pc, 0xE000);
        assert_eq!(machine.cpu.regs.sp, 0xFD);
    }
}
