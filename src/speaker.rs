//! スピーカートグルフック
//!
//! $C020-$C03Fへのアクセスでトグルされる1ビットの状態。
//! 音声合成はコアの外。オーディオ層はトグル時刻のリストを回収して
//! パルス幅を計算する。

use crate::clock::Clock;

/// スピーカーの状態
#[derive(Clone)]
pub struct Speaker {
    /// $C030 トグルフラグ
    spkr: bool,
    /// 最後にトグルされたサイクル
    previous_tick: u64,
    /// トグルが起きたサイクルのリスト（オーディオ層が回収する）
    clicks: Vec<u64>,
    clock: Clock,
}

impl Speaker {
    pub fn new(clock: Clock) -> Self {
        Speaker {
            spkr: true,
            previous_tick: 0,
            clicks: Vec::with_capacity(4096),
            clock,
        }
    }

    /// バスアクセスによるトグル
    pub fn toggle_on_access(&mut self) {
        self.spkr = !self.spkr;
        self.previous_tick = self.clock.ticks();
        // 回収されないまま溜まり続けないように上限を設ける
        if self.clicks.len() < 65536 {
            self.clicks.push(self.previous_tick);
        }
    }

    pub fn state(&self) -> bool {
        self.spkr
    }

    /// 最後にトグルされたサイクルを取得
    pub fn previous_tick(&self) -> u64 {
        self.previous_tick
    }

    /// 溜まったトグル時刻をオーディオ層に引き渡す
    pub fn take_clicks(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.clicks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_records_tick() {
        let clock = Clock::new();
        let mut speaker = Speaker::new(clock.clone());
        let initial = speaker.state();
        clock.advance(123);
        speaker.toggle_on_access();
        assert_eq!(speaker.state(), !initial);
        assert_eq!(speaker.previous_tick(), 123);
        clock.advance(77);
        speaker.toggle_on_access();
        assert_eq!(speaker.state(), initial);
        assert_eq!(speaker.take_clicks(), vec![123, 200]);
        assert!(speaker.take_clicks().is_empty());
    }
}
