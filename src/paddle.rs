//! パドル（アナログコントローラ）
//!
//! 実機の558タイマーをカウントダウンで近似する。
//! $C070でリセットされたカウントダウンはポーリングのたびに
//! 経過サイクル/5.6だけ減り、position=255なら約11サイクル×255の間
//! $80を返し続ける。

use crate::clock::Clock;

/// 1本のパドル軸とそのプッシュボタン
#[derive(Clone)]
pub struct Paddle {
    /// 位置 0（左端）〜255（右端）、127が中央
    position: u8,
    /// リセット以降のカウントダウン
    countdown: f64,
    /// カウントダウンをリセットしたサイクル
    countdown_trigger: u64,
    /// プッシュボタン（$00 / $FF）
    push_button: u8,
    clock: Clock,
}

impl Paddle {
    pub fn new(clock: Clock) -> Self {
        Paddle {
            position: 127,
            countdown: 0.0,
            countdown_trigger: 0,
            push_button: 0x00,
            clock,
        }
    }

    /// $C061/$C062 プッシュボタンの読み取り
    pub fn button(&self) -> u8 {
        self.push_button
    }

    pub fn set_button(&mut self, pressed: bool) {
        self.push_button = if pressed { 0xFF } else { 0x00 };
    }

    /// $C070 タイマーリセット: カウントダウンを位置の2乗で初期化
    pub fn reset(&mut self) {
        self.countdown = self.position as f64 * self.position as f64;
        self.countdown_trigger = self.clock.ticks();
    }

    /// $C064/$C065 タイマー読み取り
    ///
    /// 読むたびにトリガーからの経過分を減算する。
    /// タイムアウト前は$80、タイムアウト後は$00。
    pub fn read(&mut self) -> u8 {
        let elapsed = self.clock.ticks() - self.countdown_trigger;
        self.countdown -= elapsed as f64 / 5.6;
        if self.countdown <= 0.0 {
            self.countdown = 0.0;
            return 0x00;
        }
        0x80
    }

    /// ホストからの位置更新
    pub fn update(&mut self, position: u8) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_levels() {
        let mut paddle = Paddle::new(Clock::new());
        assert_eq!(paddle.button(), 0x00);
        paddle.set_button(true);
        assert_eq!(paddle.button(), 0xFF);
        paddle.set_button(false);
        assert_eq!(paddle.button(), 0x00);
    }

    #[test]
    fn test_countdown_timing() {
        let clock = Clock::new();
        let mut paddle = Paddle::new(clock.clone());
        paddle.update(255);
        paddle.reset();

        clock.advance(2_000);
        assert_eq!(paddle.read(), 0x80);

        // PDLルーチンと同じく短い間隔でポーリングするとタイムアウトに達する
        let mut total = 2_000u64;
        while total < 122_000 {
            clock.advance(11);
            total += 11;
            if paddle.read() == 0x00 {
                break;
            }
        }
        assert_eq!(paddle.read(), 0x00);
        assert!(total < 122_000);
    }

    #[test]
    fn test_zero_position_times_out_immediately() {
        let clock = Clock::new();
        let mut paddle = Paddle::new(clock.clone());
        paddle.update(0);
        paddle.reset();
        clock.advance(1);
        assert_eq!(paddle.read(), 0x00);
    }
}
