//! Apple II+ メモリサブシステム
//!
//! メモリマップとソフトスイッチを実装
//!
//! $C000-$C0FF（と$CFFF）へのアクセスは、読み書きされるデータとは
//! 無関係に周辺機器の状態を変化させる。CPUのダミーアクセスも含めて
//! すべてのバスアクセスがディスパッチャを通る必要がある。

use crate::clock::Clock;
use crate::cpu::MemoryBus;
use crate::disk::Disk;
use crate::keyboard::Keyboard;
use crate::paddle::Paddle;
use crate::speaker::Speaker;
use crate::video::VideoMode;

/// メモリマップの定数
pub const RAM_SIZE: usize = 0xC000; // 48K RAM in $0000-$BFFF

pub const ROM_START: u16 = 0xD000; // 12K ROM in $D000-$FFFF
pub const ROM_SIZE: usize = 0x3000;

pub const LGC_SIZE: usize = 0x3000; // Language Card 12K in $D000-$FFFF
pub const BK2_SIZE: usize = 0x1000; // LC bank 2 4K in $D000-$DFFF

pub const SL6_START: u16 = 0xC600; // disk ][ PROM in slot 6
pub const SL6_SIZE: usize = 0x0100;

/// Apple II+ メモリシステム
///
/// RAM/ROM/Language Cardと、ソフトスイッチ経由で操作される
/// 周辺機器を所有する
#[derive(Clone)]
pub struct Memory {
    pub ram: Box<[u8; RAM_SIZE]>,
    rom: Box<[u8; ROM_SIZE]>,
    lgc: Box<[u8; LGC_SIZE]>,
    bk2: Box<[u8; BK2_SIZE]>,
    sl6: Box<[u8; SL6_SIZE]>,

    /// Language Card: $D000-$FFFFの読み出しがLC/BK2から行われる
    lc_read: bool,
    /// Language Card: $D000-$FFFFへの書き込みを受け付ける
    lc_write: bool,
    /// Language Card: バンク2が$D000-$DFFFを覆う
    lc_bank2: bool,
    /// Language Card: プリライトフリップフロップ
    /// 次の該当アクセスでlc_writeを立てるための1アクセス分の状態
    lc_prewrite: bool,

    /// Disk ][ データラッチ
    dlatch: u8,

    pub disk: Disk,
    pub keyboard: Keyboard,
    pub paddles: [Paddle; 2],
    pub speaker: Speaker,
    pub video: VideoMode,
}

impl Memory {
    pub fn new(clock: &Clock) -> Self {
        Memory {
            ram: Box::new([0; RAM_SIZE]),
            rom: Box::new([0; ROM_SIZE]),
            lgc: Box::new([0; LGC_SIZE]),
            bk2: Box::new([0; BK2_SIZE]),
            sl6: Box::new([0; SL6_SIZE]),
            lc_read: false,
            lc_write: false,
            lc_bank2: true,
            lc_prewrite: false,
            dlatch: 0,
            disk: Disk::new(),
            keyboard: Keyboard::new(),
            paddles: [Paddle::new(clock.clone()), Paddle::new(clock.clone())],
            speaker: Speaker::new(clock.clone()),
            video: VideoMode::new(),
        }
    }

    /// APPLESOFT ROM（12KB固定）をロード
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), String> {
        if data.len() != ROM_SIZE {
            return Err(format!(
                "ROM must be exactly {} bytes, got {}",
                ROM_SIZE,
                data.len()
            ));
        }
        self.rom.copy_from_slice(data);
        Ok(())
    }

    /// Disk ][ PROM（256バイト固定）をスロット6にロード
    pub fn load_slot_rom(&mut self, data: &[u8]) -> Result<(), String> {
        if data.len() != SL6_SIZE {
            return Err(format!(
                "Disk II PROM must be exactly {} bytes, got {}",
                SL6_SIZE,
                data.len()
            ));
        }
        self.sl6.copy_from_slice(data);
        Ok(())
    }

    pub fn lc_read_enabled(&self) -> bool {
        self.lc_read
    }

    pub fn lc_write_enabled(&self) -> bool {
        self.lc_write
    }

    pub fn lc_bank2_enabled(&self) -> bool {
        self.lc_bank2
    }

    //======================================= メモリマップドソフトスイッチ

    /// $C0xx のアクセスを処理する
    ///
    /// readMem/writeMem の両方から呼ばれる。value が None のとき読み出し
    /// アクセス。返り値は読み出しアクセスのときだけ意味を持つ。
    fn soft_switches(&mut self, address: u16, value: Option<u8>) -> u8 {
        match address {
            // KEYBOARD
            0xC000 => self.keyboard.get_key(),
            // KBDSTROBE
            0xC010 => {
                self.keyboard.strobe();
                0x00
            }

            // TAPEOUT, SPEAKER
            // 一部のタイトルが依存する広いデコードで$C020-$C03F全体を取る
            0xC020..=0xC03F => {
                self.speaker.toggle_on_access();
                0x00
            }

            // VIDEO MODES
            0xC050 => {
                self.video.set_text(false);
                0x00
            }
            0xC051 => {
                self.video.set_text(true);
                0x00
            }
            0xC052 => {
                self.video.set_mixed(false);
                0x00
            }
            0xC053 => {
                self.video.set_mixed(true);
                0x00
            }
            0xC054 => {
                self.video.set_page2(false);
                0x00
            }
            0xC055 => {
                self.video.set_page2(true);
                0x00
            }
            0xC056 => {
                self.video.set_hires(false);
                0x00
            }
            0xC057 => {
                self.video.set_hires(true);
                0x00
            }

            // PADDLES
            0xC061 => self.paddles[0].button(),
            0xC062 => self.paddles[1].button(),
            0xC064 => self.paddles[0].read(),
            0xC065 => self.paddles[1].read(),
            0xC070 => {
                self.paddles[0].reset();
                self.paddles[1].reset();
                0x00
            }

            // LANGUAGE CARD
            0xC080..=0xC08F => self.language_card(address, value),

            // DISK ][ card in slot 6
            0xC0E0..=0xC0E7 => {
                self.disk.step_motor(address);
                0x00
            }
            0xC0E8 => {
                self.disk.set_motor_on(false);
                0x00
            }
            0xC0E9 => {
                self.disk.set_motor_on(true);
                0x00
            }
            // DRIVE0EN / DRIVE1EN（ドライブは1台のみ）
            0xC0EA | 0xC0EB => 0x00,
            // データラッチのシフト
            0xC0EC => {
                if self.disk.write_mode() {
                    self.disk.write(self.dlatch);
                } else {
                    self.dlatch = self.disk.read();
                }
                self.dlatch
            }
            // Load Data Latch
            0xC0ED => {
                if let Some(v) = value {
                    if v != 0 {
                        self.dlatch = v;
                    }
                }
                0x00
            }
            // latch for READ: プロテクト状態を返す
            0xC0EE => {
                self.disk.set_write_mode(false);
                if self.disk.read_only() {
                    0x80
                } else {
                    0x00
                }
            }
            // latch for WRITE
            0xC0EF => {
                self.disk.set_write_mode(true);
                0x00
            }

            _ => 0x00, // catch all
        }
    }

    /// $C080-$C08F: Language Card バンク切り替え
    ///
    /// bit3がバンク選択、下位2ビットが操作。書き込み許可は
    /// プリライトフリップフロップが立っている状態での2回目の
    /// 該当アクセスで初めて有効になる。読み出しアクセスだけが
    /// フリップフロップを立て、書き込みアクセスは倒す。
    fn language_card(&mut self, address: u16, value: Option<u8>) -> u8 {
        let read_access = value.is_none();
        self.lc_bank2 = address & 0x08 == 0;
        match address & 0x03 {
            0x0 => {
                self.lc_read = true;
                self.lc_write = false;
                self.lc_prewrite = false;
            }
            0x1 => {
                self.lc_read = false;
                self.lc_write |= self.lc_prewrite;
                self.lc_prewrite = read_access;
            }
            0x2 => {
                self.lc_read = false;
                self.lc_write = false;
                self.lc_prewrite = false;
            }
            _ => {
                self.lc_read = true;
                self.lc_write |= self.lc_prewrite;
                self.lc_prewrite = read_access;
            }
        }
        0x00
    }
}

//============================================================= メモリアクセス

impl MemoryBus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        if address < RAM_SIZE as u16 {
            return self.ram[address as usize]; // RAM
        }
        if address == 0xCFFF {
            self.disk.set_motor_on(false); // ハードウェアフラグのリセット
            return 0;
        }
        if address & 0xFF00 == 0xC000 {
            return self.soft_switches(address, None);
        }
        if address & 0xFF00 == SL6_START {
            return self.sl6[(address - SL6_START) as usize]; // disk ][
        }
        if address >= ROM_START {
            if !self.lc_read {
                return self.rom[(address - ROM_START) as usize]; // ROM
            }
            if self.lc_bank2 && address < 0xE000 {
                return self.bk2[(address - ROM_START) as usize]; // BK2
            }
            return self.lgc[(address - ROM_START) as usize]; // LC
        }
        0 // catch all
    }

    fn write(&mut self, address: u16, value: u8) {
        if address < RAM_SIZE as u16 {
            self.ram[address as usize] = value; // RAM
            return;
        }
        if address & 0xFF00 == 0xC000 {
            self.soft_switches(address, Some(value));
            return;
        }
        if self.lc_write && address >= ROM_START {
            // Language Card
            if self.lc_bank2 && address < 0xE000 {
                self.bk2[(address - ROM_START) as usize] = value; // BK2
                return;
            }
            self.lgc[(address - ROM_START) as usize] = value; // LC
        }
        // ROM領域への書き込みは黙って捨てる
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_memory() -> Memory {
        Memory::new(&Clock::new())
    }

    #[test]
    fn test_ram_roundtrip() {
        let mut mem = new_memory();
        for addr in [0x0000u16, 0x0001, 0x03F4, 0x2000, 0xBFFF] {
            mem.write(addr, 0x5A);
            assert_eq!(mem.read(addr), 0x5A);
        }
    }

    #[test]
    fn test_rom_is_write_protected() {
        let mut mem = new_memory();
        let mut rom = vec![0u8; ROM_SIZE];
        rom[0] = 0xA9;
        mem.load_rom(&rom).unwrap();
        mem.write(0xD000, 0x00);
        assert_eq!(mem.read(0xD000), 0xA9);
    }

    #[test]
    fn test_rom_size_is_enforced() {
        let mut mem = new_memory();
        assert!(mem.load_rom(&[0u8; 100]).is_err());
        assert!(mem.load_slot_rom(&[0u8; 512]).is_err());
        assert!(mem.load_rom(&vec![0u8; ROM_SIZE]).is_ok());
        assert!(mem.load_slot_rom(&[0u8; SL6_SIZE]).is_ok());
    }

    #[test]
    fn test_slot6_prom_mapping() {
        let mut mem = new_memory();
        let mut prom = [0u8; SL6_SIZE];
        prom[0] = 0xA2;
        prom[1] = 0x20;
        mem.load_slot_rom(&prom).unwrap();
        assert_eq!(mem.read(0xC600), 0xA2);
        assert_eq!(mem.read(0xC601), 0x20);
        assert_eq!(mem.read(0xC6FF), 0x00);
    }

    #[test]
    fn test_unmapped_io_region_reads_zero() {
        let mut mem = new_memory();
        assert_eq!(mem.read(0xC100), 0);
        assert_eq!(mem.read(0xC500), 0);
        assert_eq!(mem.read(0xC800), 0);
        assert_eq!(mem.read(0xCFFE), 0);
    }

    #[test]
    fn test_all_soft_switch_reads_are_safe() {
        let mut mem = new_memory();
        for low in 0x00..=0xFFu16 {
            mem.read(0xC000 | low);
        }
        mem.read(0xCFFF);
    }

    #[test]
    fn test_reads_outside_io_are_stable() {
        let mut mem = new_memory();
        for addr in [0x0000u16, 0x5000, 0xBFFF, 0xC600, 0xD000, 0xFFFF] {
            let first = mem.read(addr);
            assert_eq!(mem.read(addr), first);
        }
    }

    #[test]
    fn test_language_card_write_needs_two_reads() {
        let mut mem = new_memory();
        let mut rom = vec![0u8; ROM_SIZE];
        rom[0] = 0xEE;
        mem.load_rom(&rom).unwrap();

        // 1回の読み出しだけでは書き込みは有効にならない
        mem.read(0xC081);
        mem.write(0xD000, 0x42);
        assert_eq!(mem.read(0xD000), 0xEE); // ROMのまま

        // 2回読むとプリライトFFが書き込みを有効化する
        let mut mem = new_memory();
        let mut rom = vec![0u8; ROM_SIZE];
        rom[0] = 0xEE;
        mem.load_rom(&rom).unwrap();
        mem.read(0xC081);
        mem.read(0xC081);
        mem.write(0xD000, 0x42);
        mem.read(0xC080); // バンク2 読み出し有効
        assert_eq!(mem.read(0xD000), 0x42);
    }

    #[test]
    fn test_language_card_write_access_clears_prewrite() {
        let mut mem = new_memory();
        // 書き込みアクセスはフリップフロップを倒すので、
        // read/write/readの交互では書き込みは有効にならない
        mem.read(0xC081);
        mem.write(0xC081, 0x00);
        mem.write(0xD000, 0x42);
        assert!(!mem.lc_write_enabled());
    }

    #[test]
    fn test_language_card_bank_select() {
        let mut mem = new_memory();
        // バンク2に書く
        mem.read(0xC081);
        mem.read(0xC081);
        mem.write(0xD000, 0x11);
        mem.write(0xE000, 0x22);
        mem.read(0xC080);
        assert_eq!(mem.read(0xD000), 0x11); // BK2
        assert_eq!(mem.read(0xE000), 0x22); // LCは$E000以上で共通

        // バンク1に切り替えると$D000の見え方が変わる
        mem.read(0xC089);
        mem.read(0xC089);
        mem.write(0xD000, 0x33);
        mem.read(0xC088);
        assert_eq!(mem.read(0xD000), 0x33);
        assert_eq!(mem.read(0xE000), 0x22);
        // バンク2に戻す
        mem.read(0xC080);
        assert_eq!(mem.read(0xD000), 0x11);
    }

    #[test]
    fn test_language_card_full_roundtrip() {
        let mut mem = new_memory();
        mem.read(0xC083); // LC2 read+write (1回目)
        mem.read(0xC083); // 2回目で書き込みが有効に
        assert!(mem.lc_read_enabled());
        assert!(mem.lc_write_enabled());
        for addr in [0xD000u16, 0xDFFF, 0xE000, 0xFFFF] {
            mem.write(addr, 0x77);
            assert_eq!(mem.read(addr), 0x77);
        }
    }

    #[test]
    fn test_rom_only_switch_disables_lc() {
        let mut mem = new_memory();
        let mut rom = vec![0u8; ROM_SIZE];
        rom[0x2FFF] = 0x60;
        mem.load_rom(&rom).unwrap();
        mem.read(0xC083);
        mem.read(0xC083);
        mem.write(0xFFFF, 0x99);
        assert_eq!(mem.read(0xFFFF), 0x99);
        mem.read(0xC082); // ROMONLY
        assert_eq!(mem.read(0xFFFF), 0x60);
        assert!(!mem.lc_write_enabled());
    }

    #[test]
    fn test_keyboard_latch_through_bus() {
        let mut mem = new_memory();
        mem.keyboard.set_key(0xC1);
        mem.keyboard.set_key(0xC2);
        assert_eq!(mem.read(0xC000), 0xC1);
        assert_eq!(mem.read(0xC000), 0xC1);
        mem.read(0xC010); // ストローブクリア
        assert_eq!(mem.read(0xC000), 0xC2);
    }

    #[test]
    fn test_speaker_wide_decode() {
        let mut mem = new_memory();
        let initial = mem.speaker.state();
        mem.read(0xC030);
        assert_eq!(mem.speaker.state(), !initial);
        mem.read(0xC020); // カセット出力も同じトグルに落ちる
        assert_eq!(mem.speaker.state(), initial);
        mem.write(0xC03F, 0xFF); // 書き込みアクセスでもトグルする
        assert_eq!(mem.speaker.state(), !initial);
    }

    #[test]
    fn test_video_mode_switches() {
        let mut mem = new_memory();
        assert!(mem.video.text());
        mem.read(0xC050);
        assert!(!mem.video.text());
        mem.read(0xC053);
        assert!(mem.video.mixed());
        mem.read(0xC055);
        assert!(mem.video.page2());
        mem.read(0xC057);
        assert!(mem.video.hires());
        mem.write(0xC051, 0);
        assert!(mem.video.text());
    }

    #[test]
    fn test_paddle_timer_through_bus() {
        let clock = Clock::new();
        let mut mem = Memory::new(&clock);
        mem.paddles[0].update(255);
        mem.read(0xC070); // タイマーリセット
        clock.advance(2_000);
        assert_eq!(mem.read(0xC064), 0x80);
        // ポーリングを続けるとタイムアウトする
        let mut total = 2_000u64;
        while total < 400_000 && mem.read(0xC064) == 0x80 {
            clock.advance(11);
            total += 11;
        }
        assert_eq!(mem.read(0xC064), 0x00);
    }

    #[test]
    fn test_paddle_buttons_through_bus() {
        let mut mem = new_memory();
        assert_eq!(mem.read(0xC061), 0x00);
        mem.paddles[0].set_button(true);
        mem.paddles[1].set_button(true);
        assert_eq!(mem.read(0xC061), 0xFF);
        assert_eq!(mem.read(0xC062), 0xFF);
    }

    #[test]
    fn test_motor_switches() {
        let mut mem = new_memory();
        mem.read(0xC0E9);
        assert!(mem.disk.motor_on());
        mem.read(0xC0E8);
        assert!(!mem.disk.motor_on());
        mem.read(0xC0E9);
        mem.read(0xCFFF); // $CFFFでもモーターオフ
        assert!(!mem.disk.motor_on());
    }

    #[test]
    fn test_stepper_through_bus_write() {
        // 書き込みアクセスでもステッパーは駆動される
        let mut mem = new_memory();
        mem.write(0xC0E1, 0x00);
        mem.write(0xC0E3, 0x00);
        mem.write(0xC0E0, 0x00);
        mem.write(0xC0E5, 0x00);
        mem.write(0xC0E2, 0x00);
        assert_eq!(mem.disk.half_track(), 1);
    }

    #[test]
    fn test_disk_latch_read_shift() {
        let mut mem = new_memory();
        let mut image = vec![0u8; crate::disk::NIB_SIZE];
        image[1] = 0xD5;
        mem.disk.load_image(&image);
        mem.read(0xC0EE); // 読み出しモード
        assert_eq!(mem.read(0xC0EC), 0xD5);
    }

    #[test]
    fn test_disk_latch_write_shift() {
        let mut mem = new_memory();
        mem.write(0xC0ED, 0xAA); // ラッチにロード
        mem.read(0xC0EF); // 書き込みモード
        assert!(mem.disk.write_mode());
        // 書き込みモードの$C0ECはラッチの内容をヘッド位置に書き、
        // ラッチの値を返す
        assert_eq!(mem.read(0xC0EC), 0xAA);
        assert_eq!(mem.disk.nibble(), 1);
    }

    #[test]
    fn test_write_protect_reporting() {
        let mut mem = new_memory();
        assert_eq!(mem.read(0xC0EE), 0x00);
        mem.disk.set_read_only(true);
        assert_eq!(mem.read(0xC0EE), 0x80);
    }

    #[test]
    fn test_latch_load_ignores_zero_and_reads() {
        let mut mem = new_memory();
        mem.write(0xC0ED, 0x00); // 0はロードされない
        mem.read(0xC0ED); // 読み出しアクセスもロードしない
        mem.write(0xC0ED, 0x42);
        mem.read(0xC0EF);
        mem.read(0xC0EC); // dlatch($42)を書き込む
        assert_eq!(mem.dlatch, 0x42);
    }
}
