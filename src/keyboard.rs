//! キーボードコントローラ
//!
//! 実機のApple IIにキーバッファはないが、ここではFIFOを使う:
//! - ホストの入力とCPUの実行は非同期なので取りこぼしを防ぐ
//! - クリップボード貼り付けを「タイプされたように」流し込める
//!
//! $C000はラッチされた最新キー（bit7がストローブ）を返し、
//! $C010でストローブがクリアされて次の文字が現れる。

use std::collections::VecDeque;

use minifb::Key;

/// キー修飾子のインデックス: なし=0, CTRL=1, SHIFT=2, CTRL+SHIFT=3
pub const MOD_NONE: usize = 0;
pub const MOD_CTRL: usize = 1;
pub const MOD_SHIFT: usize = 2;
pub const MOD_CTRL_SHIFT: usize = 3;

/// ホストキーシンボル -> Apple IIキーコードの変換表（QWERTY US）
/// 列は [なし, CTRL, SHIFT, CTRL+SHIFT]、$00は「割り当てなし」
fn keymap(key: Key) -> Option<[u8; 4]> {
    let row = match key {
        Key::A => [0xC1, 0x81, 0x00, 0x00],
        Key::B => [0xC2, 0x82, 0x00, 0x00],
        Key::C => [0xC3, 0x83, 0x00, 0x00],
        Key::D => [0xC4, 0x84, 0x00, 0x00],
        Key::E => [0xC5, 0x85, 0x00, 0x00],
        Key::F => [0xC6, 0x86, 0x00, 0x00],
        Key::G => [0xC7, 0x87, 0x00, 0x00],
        Key::H => [0xC8, 0x88, 0x00, 0x00],
        Key::I => [0xC9, 0x89, 0x00, 0x00],
        Key::J => [0xCA, 0x8A, 0x00, 0x00],
        Key::K => [0xCB, 0x8B, 0x00, 0x00],
        Key::L => [0xCC, 0x8C, 0x00, 0x00],
        Key::M => [0xCD, 0x8D, 0x00, 0x9D],
        Key::N => [0xCE, 0x8E, 0x00, 0x9E],
        Key::O => [0xCF, 0x8F, 0x00, 0x00],
        Key::P => [0xD0, 0x80, 0x00, 0x90],
        Key::Q => [0xD1, 0x91, 0x00, 0x00],
        Key::R => [0xD2, 0x92, 0x00, 0x00],
        Key::S => [0xD3, 0x93, 0x00, 0x00],
        Key::T => [0xD4, 0x94, 0x00, 0x00],
        Key::U => [0xD5, 0x95, 0x00, 0x00],
        Key::V => [0xD6, 0x96, 0x00, 0x00],
        Key::W => [0xD7, 0x97, 0x00, 0x00],
        Key::X => [0xD8, 0x98, 0x00, 0x00],
        Key::Y => [0xD9, 0x99, 0x00, 0x00],
        Key::Z => [0xDA, 0x9A, 0x00, 0x00],
        Key::Key0 => [0xB0, 0x00, 0xA9, 0x00],
        Key::Key1 => [0xB1, 0x00, 0xA1, 0x00],
        Key::Key2 => [0xB2, 0x00, 0xC0, 0x00],
        Key::Key3 => [0xB3, 0x00, 0xA3, 0x00],
        Key::Key4 => [0xB4, 0x00, 0xA4, 0x00],
        Key::Key5 => [0xB5, 0x00, 0xA5, 0x00],
        Key::Key6 => [0xB6, 0x00, 0xDE, 0x00],
        Key::Key7 => [0xB7, 0x00, 0xA6, 0x00],
        Key::Key8 => [0xB8, 0x00, 0xAA, 0x00],
        Key::Key9 => [0xB9, 0x00, 0xA8, 0x00],
        Key::LeftBracket => [0xDB, 0x9B, 0x00, 0x00],
        Key::Backslash => [0xDC, 0x9C, 0x00, 0x00],
        Key::RightBracket => [0xDD, 0x9D, 0x00, 0x00],
        Key::Backspace => [0x88, 0xDF, 0x00, 0x00],
        Key::Left => [0x88, 0x00, 0x00, 0x00],
        Key::Right => [0x95, 0x00, 0x00, 0x00],
        Key::Space => [0xA0, 0x00, 0x00, 0x00],
        Key::Escape => [0x9B, 0x00, 0x00, 0x00],
        Key::Enter => [0x8D, 0x00, 0x00, 0x00],
        Key::Apostrophe => [0xA7, 0x00, 0xA2, 0x00],
        Key::Equal => [0xBD, 0x00, 0xAB, 0x00],
        Key::Semicolon => [0xBB, 0x00, 0xBA, 0x00],
        Key::Comma => [0xAC, 0x00, 0xBC, 0x00],
        Key::Period => [0xAE, 0x00, 0xBE, 0x00],
        Key::Slash => [0xAF, 0x00, 0xBF, 0x00],
        Key::Minus => [0xAD, 0x00, 0xDF, 0x00],
        Key::Backquote => [0xE0, 0x00, 0xFE, 0x00],
        _ => return None,
    };
    Some(row)
}

/// キーボードの状態
#[derive(Clone, Default)]
pub struct Keyboard {
    /// 入力キューFIFO
    queue: VecDeque<u8>,
    /// ラッチされた現在のキー（bit7がストローブ）
    key: u8,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard {
            queue: VecDeque::new(),
            key: 0x00,
        }
    }

    /// キーコードをそのままキューに積む（貼り付け等）
    pub fn set_key(&mut self, value: u8) {
        self.queue.push_back(value);
    }

    /// ホストキーシンボルと修飾子からキーを積む
    /// 変換表に割り当てのないキーは無視される
    pub fn set_key_from(&mut self, key: Key, modifiers: usize) {
        if let Some(row) = keymap(key) {
            let code = row[modifiers & 3];
            if code != 0x00 {
                self.queue.push_back(code);
            }
        }
    }

    /// ソフトスイッチ $C000
    ///
    /// ストローブ済み（bit7クリア）の先頭はキューから落とし、
    /// 後続があればそれを新しい現在キーとしてラッチする。
    pub fn get_key(&mut self) -> u8 {
        if let Some(&head) = self.queue.front() {
            if head <= 0x7F {
                self.key = head;
                self.queue.pop_front();
                if let Some(&next) = self.queue.front() {
                    self.key = next;
                }
            } else {
                self.key = head;
            }
        }
        self.key
    }

    /// ソフトスイッチ $C010: 先頭キーのストローブをクリア
    pub fn strobe(&mut self) {
        if let Some(head) = self.queue.front_mut() {
            *head &= 0x7F;
        }
    }

    /// キューの長さ（デバッグ用）
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_sequence() {
        let mut kbd = Keyboard::new();
        kbd.set_key(0xC1);
        kbd.set_key(0xC2);
        assert_eq!(kbd.get_key(), 0xC1);
        assert_eq!(kbd.get_key(), 0xC1); // ストローブまで同じキー
        kbd.strobe();
        assert_eq!(kbd.get_key(), 0xC2); // 次の文字が現れる
        assert_eq!(kbd.get_key(), 0xC2);
    }

    #[test]
    fn test_strobe_clears_head_bit7() {
        let mut kbd = Keyboard::new();
        kbd.set_key(0xC1);
        kbd.strobe();
        assert_eq!(*kbd.queue.front().unwrap() & 0x80, 0);
    }

    #[test]
    fn test_strobe_on_empty_queue() {
        let mut kbd = Keyboard::new();
        kbd.strobe();
        assert_eq!(kbd.get_key(), 0x00);
    }

    #[test]
    fn test_last_key_persists_after_drain() {
        let mut kbd = Keyboard::new();
        kbd.set_key(0xC1);
        kbd.get_key();
        kbd.strobe();
        // キューが空になっても最後のキー（bit7クリア）が残る
        assert_eq!(kbd.get_key(), 0x41);
        assert_eq!(kbd.get_key(), 0x41);
        assert_eq!(kbd.pending(), 0);
    }

    #[test]
    fn test_keymap_modifiers() {
        let mut kbd = Keyboard::new();
        kbd.set_key_from(Key::A, MOD_NONE);
        kbd.set_key_from(Key::A, MOD_CTRL);
        assert_eq!(kbd.get_key(), 0xC1);
        kbd.strobe();
        assert_eq!(kbd.get_key(), 0x81);
    }

    #[test]
    fn test_unmapped_cell_is_skipped() {
        let mut kbd = Keyboard::new();
        kbd.set_key_from(Key::A, MOD_SHIFT); // SHIFT+Aは割り当てなし
        kbd.set_key_from(Key::F1, MOD_NONE); // 表にないキー
        assert_eq!(kbd.pending(), 0);
    }
}
