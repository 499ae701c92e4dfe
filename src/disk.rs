//! Apple II Disk II ドライブエミュレーション
//!
//! Disk II hardware emulation based on "Beneath Apple DOS" documentation
//! NIB形式（ニブル化済み）のディスクイメージをサポート
//!
//! ステッパーモーターは直近2世代のフェーズ履歴から
//! ヘッドの移動方向を決定する。

use std::fs;
use std::path::Path;

/// ディスクの定数
pub const TRACKS: usize = 35;

/// NIBフォーマットの定数
pub const NIB_TRACK_SIZE: usize = 6656;
pub const NIB_SIZE: usize = TRACKS * NIB_TRACK_SIZE; // 232960 bytes

/// ハーフトラックの最大値（トラック0〜34 = ハーフトラック0〜68）
pub const MAX_HALF_TRACK: usize = 68;

/// フロッピードライブ1台分の状態
#[derive(Clone)]
pub struct Disk {
    /// ニブル化済みディスクイメージ
    data: Vec<u8>,
    /// 書き込みプロテクト
    read_only: bool,
    /// モーター状態
    motor_on: bool,
    /// 書き込みモード（Q7ラッチ）
    write_mode: bool,

    /// 4つのマグネットフェーズの状態
    phases: [bool; 4],
    /// 1世代前のフェーズ状態
    phases_b: [bool; 4],
    /// 2世代前のフェーズ状態
    phases_bb: [bool; 4],
    /// 現在アクティブなフェーズ番号
    p_idx: usize,
    /// 1つ前にアクティブだったフェーズ番号
    p_idx_b: usize,

    /// 現在のトラック位置 (0-34)
    track: usize,
    /// ハーフトラック位置 (0-68)
    half_track: usize,
    /// ヘッド直下のニブル位置 (0-6655)
    nibble: usize,
}

impl Default for Disk {
    fn default() -> Self {
        Self::new()
    }
}

impl Disk {
    pub fn new() -> Self {
        Disk {
            data: vec![0; NIB_SIZE],
            read_only: false,
            motor_on: false,
            write_mode: false,
            phases: [false; 4],
            phases_b: [false; 4],
            phases_bb: [false; 4],
            p_idx: 0,
            p_idx_b: 0,
            track: 0,
            half_track: 0,
            nibble: 0,
        }
    }

    //======================= ソフトスイッチから参照されるゲッター/セッター

    pub fn set_write_mode(&mut self, state: bool) {
        self.write_mode = state;
    }

    pub fn write_mode(&self) -> bool {
        self.write_mode
    }

    pub fn set_motor_on(&mut self, state: bool) {
        if self.motor_on != state {
            log::debug!("disk motor {}", if state { "on" } else { "off" });
        }
        self.motor_on = state;
    }

    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    pub fn set_read_only(&mut self, state: bool) {
        self.read_only = state;
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn half_track(&self) -> usize {
        self.half_track
    }

    pub fn nibble(&self) -> usize {
        self.nibble
    }

    //======================================================= フロッピーのロード

    /// NIBイメージをロードする
    ///
    /// 232,960バイトより短いファイルはゼロ埋め、長いファイルは切り詰める。
    /// 書き込みプロテクトはファイルの書き込み属性に従う。
    pub fn insert_floppy<P: AsRef<Path>>(&mut self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| format!("Failed to read floppy image {}: {}", path.display(), e))?;

        let mut data = vec![0u8; NIB_SIZE];
        let len = bytes.len().min(NIB_SIZE);
        data[..len].copy_from_slice(&bytes[..len]);
        self.data = data;

        self.read_only = fs::metadata(path)
            .map(|m| m.permissions().readonly())
            .unwrap_or(false);

        log::info!(
            "Inserted floppy {} ({} bytes{})",
            path.display(),
            len,
            if self.read_only { ", write protected" } else { "" }
        );
        Ok(())
    }

    /// メモリ上のイメージを直接ロードする（テスト等）
    pub fn load_image(&mut self, bytes: &[u8]) {
        let mut data = vec![0u8; NIB_SIZE];
        let len = bytes.len().min(NIB_SIZE);
        data[..len].copy_from_slice(&bytes[..len]);
        self.data = data;
    }

    //========================================================== ヘッドの読み書き

    /// ヘッド直下のニブルを読む
    /// アクセスごとにディスクが1ニブル分回転する
    pub fn read(&mut self) -> u8 {
        self.nibble = (self.nibble + 1) % NIB_TRACK_SIZE;
        self.data[self.track * NIB_TRACK_SIZE + self.nibble]
    }

    /// ヘッド直下のニブルに書く
    pub fn write(&mut self, value: u8) {
        self.nibble = (self.nibble + 1) % NIB_TRACK_SIZE;
        self.data[self.track * NIB_TRACK_SIZE + self.nibble] = value;
    }

    //====================================================== ステッパーモーター

    /// $C0E0-$C0E7 のアクセスでフェーズマグネットを駆動する
    ///
    /// アドレスのbit2..1がフェーズ番号、bit0がON/OFF。
    /// 2世代前のフェーズ履歴から隣接マグネットの励磁順を調べて
    /// ヘッドの移動方向を決める。
    pub fn step_motor(&mut self, address: u16) {
        let address = (address & 7) as usize;
        let phase = address >> 1;

        // フェーズ履歴のシフト
        self.phases_bb[self.p_idx_b] = self.phases_b[self.p_idx_b];
        self.phases_b[self.p_idx] = self.phases[self.p_idx];
        self.p_idx_b = self.p_idx;
        self.p_idx = phase;

        if address & 1 == 0 {
            // PHASE x OFF: ヘッドは動かない
            self.phases[phase] = false;
            return;
        }

        if self.phases_bb[(phase + 1) & 3] {
            // ヘッドが内周側へハーフトラック移動
            self.half_track = self.half_track.saturating_sub(1);
        }

        if self.phases_bb[(phase.wrapping_sub(1)) & 3] {
            // ヘッドが外周側へハーフトラック移動
            if self.half_track < MAX_HALF_TRACK {
                self.half_track += 1;
            }
        }

        self.phases[phase] = true;
        self.track = (self.half_track + 1) / 2;
        // トラックが変わるのでヘッド位置を先頭に戻す
        self.nibble = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// フェーズONのアドレス
    fn on(phase: usize) -> u16 {
        0xC0E1 + (phase as u16) * 2
    }

    /// フェーズOFFのアドレス
    fn off(phase: usize) -> u16 {
        0xC0E0 + (phase as u16) * 2
    }

    /// 昇順のフェーズ励磁（外周方向）をpairs回行う
    /// 最初のONでフェーズ履歴を準備してから (ON, 前フェーズOFF) を繰り返す
    fn walk_outward(disk: &mut Disk, pairs: usize) {
        disk.step_motor(on(0));
        for k in 1..=pairs {
            disk.step_motor(on(k & 3));
            disk.step_motor(off((k - 1) & 3));
        }
    }

    #[test]
    fn test_stepper_outward_walk() {
        let mut disk = Disk::new();
        // 履歴が2世代たまるまでの最初の1ペアは動かず、以降1ペアごとに
        // ハーフトラック1つ外周側へ進む
        walk_outward(&mut disk, 8);
        assert_eq!(disk.half_track(), 7);
        assert_eq!(disk.track(), 4);
        assert_eq!(disk.nibble(), 0);
    }

    #[test]
    fn test_stepper_inward_walk() {
        let mut disk = Disk::new();
        walk_outward(&mut disk, 8);
        assert_eq!(disk.half_track(), 7);
        // 降順の励磁で内周方向へ戻る
        for k in 0..4 {
            disk.step_motor(on((3 - k) & 3));
            disk.step_motor(off((4 - k) & 3));
        }
        assert_eq!(disk.half_track(), 3);
        assert_eq!(disk.track(), 2);
    }

    #[test]
    fn test_stepper_off_access_does_not_move() {
        let mut disk = Disk::new();
        disk.step_motor(on(0));
        disk.step_motor(on(1));
        disk.step_motor(off(0));
        disk.step_motor(off(1));
        assert_eq!(disk.half_track(), 0);
        assert_eq!(disk.track(), 0);
    }

    #[test]
    fn test_stepper_clamps_at_outer_edge() {
        let mut disk = Disk::new();
        walk_outward(&mut disk, 100);
        assert_eq!(disk.half_track(), MAX_HALF_TRACK);
        assert_eq!(disk.track(), TRACKS - 1);
    }

    #[test]
    fn test_stepper_clamps_at_inner_edge() {
        let mut disk = Disk::new();
        // 内周端から降順励磁を続けてもhalf_trackは0のまま
        disk.step_motor(on(3));
        for k in 0..8 {
            let phase = (3usize.wrapping_sub(k + 1)) & 3;
            disk.step_motor(on(phase));
            disk.step_motor(off((phase + 1) & 3));
        }
        assert_eq!(disk.half_track(), 0);
        assert_eq!(disk.track(), 0);
    }

    #[test]
    fn test_head_io_spins_disk() {
        let mut disk = Disk::new();
        let mut image = vec![0u8; NIB_SIZE];
        image[1] = 0xD5;
        image[2] = 0xAA;
        disk.load_image(&image);
        // 読み出し前に1ニブル回転する
        assert_eq!(disk.read(), 0xD5);
        assert_eq!(disk.read(), 0xAA);
        assert_eq!(disk.nibble(), 2);
    }

    #[test]
    fn test_head_io_wraps_track() {
        let mut disk = Disk::new();
        for _ in 0..NIB_TRACK_SIZE {
            disk.read();
        }
        assert_eq!(disk.nibble(), 0);
    }

    #[test]
    fn test_write_lands_under_head() {
        let mut disk = Disk::new();
        disk.write(0xD5);
        assert_eq!(disk.nibble(), 1);
        assert_eq!(disk.data[1], 0xD5);
    }

    #[test]
    fn test_insert_floppy_pads_and_truncates() {
        let dir = std::env::temp_dir();

        let short_path = dir.join("a2plus_test_short.nib");
        fs::write(&short_path, vec![0xAAu8; 100]).unwrap();
        let mut disk = Disk::new();
        disk.insert_floppy(&short_path).unwrap();
        assert_eq!(disk.data.len(), NIB_SIZE);
        assert_eq!(disk.data[99], 0xAA);
        assert_eq!(disk.data[100], 0x00);
        fs::remove_file(&short_path).ok();

        let long_path = dir.join("a2plus_test_long.nib");
        fs::write(&long_path, vec![0x55u8; NIB_SIZE + 500]).unwrap();
        disk.insert_floppy(&long_path).unwrap();
        assert_eq!(disk.data.len(), NIB_SIZE);
        fs::remove_file(&long_path).ok();
    }

    #[test]
    fn test_insert_missing_floppy_fails() {
        let mut disk = Disk::new();
        assert!(disk.insert_floppy("/nonexistent/a2plus.nib").is_err());
    }
}
