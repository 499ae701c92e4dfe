//! A2PLUS - Apple II Plus Emulator Core in Rust
//!
//! Apple II+ のコアエミュレーション:
//! - サイクルカウント付き 6502 CPU
//! - メモリマップドI/O（ソフトスイッチ）と Language Card
//! - Disk II コントローラ（NIB形式）
//! - キーボード、パドル、スピーカートグル、ビデオモードスイッチ

pub mod clock;
pub mod cpu;
pub mod memory;
pub mod disk;
pub mod keyboard;
pub mod paddle;
pub mod speaker;
pub mod video;
pub mod apple2;
pub mod config;
