//! ビデオモードスイッチ
//!
//! コアはフレームバッファを持たない。
//! $C050-$C057で切り替わる4つのモードフラグだけを保持し、
//! 外部のレンダラがRAMとこのフラグを参照して描画する。

/// ビデオモードフラグ
#[derive(Debug, Clone)]
pub struct VideoMode {
    /// テキストモード
    text: bool,
    /// ミックスモード（グラフィック+下4行テキスト）
    mixed: bool,
    /// 表示ページ2
    page2: bool,
    /// Hi-Resグラフィック
    hires: bool,
}

impl Default for VideoMode {
    fn default() -> Self {
        // 起動時はテキストモード
        VideoMode {
            text: true,
            mixed: false,
            page2: false,
            hires: false,
        }
    }
}

impl VideoMode {
    pub fn new() -> Self {
        VideoMode::default()
    }

    pub fn set_text(&mut self, on: bool) {
        self.text = on;
    }

    pub fn text(&self) -> bool {
        self.text
    }

    pub fn set_mixed(&mut self, on: bool) {
        self.mixed = on;
    }

    pub fn mixed(&self) -> bool {
        self.mixed
    }

    pub fn set_page2(&mut self, on: bool) {
        self.page2 = on;
    }

    pub fn page2(&self) -> bool {
        self.page2
    }

    pub fn set_hires(&mut self, on: bool) {
        self.hires = on;
    }

    pub fn hires(&self) -> bool {
        self.hires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_defaults() {
        let mode = VideoMode::new();
        assert!(mode.text());
        assert!(!mode.mixed());
        assert!(!mode.page2());
        assert!(!mode.hires());
    }
}
