//! CPUサイクルクロック
//!
//! マシン全体で共有される単一のサイクルカウンタ。
//! CPU（と割り込みエントリ）だけが進め、パドルやスピーカーが参照する。

use std::cell::Cell;
use std::rc::Rc;

/// Apple II+ のCPUクロック周波数（Hz）
pub const CPU_FREQUENCY: u64 = 1_023_000;

/// 共有サイクルカウンタのハンドル
///
/// clone したハンドルはすべて同じカウンタを指す。
#[derive(Clone, Default)]
pub struct Clock {
    ticks: Rc<Cell<u64>>,
}

impl Clock {
    pub fn new() -> Self {
        Clock {
            ticks: Rc::new(Cell::new(0)),
        }
    }

    /// 現在のサイクル数を取得
    #[inline(always)]
    pub fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    /// サイクルカウンタを進める
    #[inline(always)]
    pub fn advance(&self, cycles: u64) {
        self.ticks.set(self.ticks.get() + cycles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_handle() {
        let clock = Clock::new();
        let other = clock.clone();
        clock.advance(100);
        assert_eq!(other.ticks(), 100);
        other.advance(23);
        assert_eq!(clock.ticks(), 123);
    }
}
