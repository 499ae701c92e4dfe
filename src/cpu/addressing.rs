//! アドレッシングモードの実装
//!
//! 6502のアドレッシングモードを定義
//!
//! ヘルパーはオペランドのフェッチと実効アドレスの計算だけを行い、
//! サイクルはページ境界ペナルティ分のみ加算する。
//! 命令の基本サイクル数は各オペコード側で加算する。

use super::{Cpu, MemoryBus};

impl Cpu {
    //--------------------------------------------------
    // アドレッシングモードのヘルパー関数
    //--------------------------------------------------

    /// 即値を取得
    pub(super) fn get_immediate<M: MemoryBus>(&mut self, memory: &mut M) -> u8 {
        let value = memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// ゼロページアドレスを取得
    pub(super) fn get_zeropage_addr<M: MemoryBus>(&mut self, memory: &mut M) -> u16 {
        let addr = memory.read(self.regs.pc) as u16;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        addr
    }

    /// ゼロページ,Xアドレスを取得（ゼロページ内で折り返す）
    pub(super) fn get_zeropage_x_addr<M: MemoryBus>(&mut self, memory: &mut M) -> u16 {
        let base = memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        base.wrapping_add(self.regs.x) as u16
    }

    /// ゼロページ,Yアドレスを取得（ゼロページ内で折り返す）
    pub(super) fn get_zeropage_y_addr<M: MemoryBus>(&mut self, memory: &mut M) -> u16 {
        let base = memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        base.wrapping_add(self.regs.y) as u16
    }

    /// 絶対アドレスを取得
    pub(super) fn get_absolute_addr<M: MemoryBus>(&mut self, memory: &mut M) -> u16 {
        let low = memory.read(self.regs.pc) as u16;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let high = memory.read(self.regs.pc) as u16;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        (high << 8) | low
    }

    /// 絶対,Xアドレスを取得
    ///
    /// 読み込みはページ境界を越えたときのみ+1サイクル。
    /// 書き込み（ストア、RMW）は常に+1サイクル。
    pub(super) fn get_absolute_x_addr<M: MemoryBus>(&mut self, memory: &mut M, write: bool) -> u16 {
        let base = self.get_absolute_addr(memory);
        let addr = base.wrapping_add(self.regs.x as u16);
        if write || (base & 0xFF00) != (addr & 0xFF00) {
            self.cycles += 1;
        }
        addr
    }

    /// 絶対,Yアドレスを取得
    pub(super) fn get_absolute_y_addr<M: MemoryBus>(&mut self, memory: &mut M, write: bool) -> u16 {
        let base = self.get_absolute_addr(memory);
        let addr = base.wrapping_add(self.regs.y as u16);
        if write || (base & 0xFF00) != (addr & 0xFF00) {
            self.cycles += 1;
        }
        addr
    }

    /// 間接,Xアドレスを取得（プリインデックス）
    pub(super) fn get_indirect_x_addr<M: MemoryBus>(&mut self, memory: &mut M) -> u16 {
        let base = memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let ptr = base.wrapping_add(self.regs.x);
        let low = memory.read(ptr as u16) as u16;
        let high = memory.read(ptr.wrapping_add(1) as u16) as u16;
        (high << 8) | low
    }

    /// 間接,Yアドレスを取得（ポストインデックス）
    pub(super) fn get_indirect_y_addr<M: MemoryBus>(&mut self, memory: &mut M, write: bool) -> u16 {
        let ptr = memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let low = memory.read(ptr as u16) as u16;
        let high = memory.read(ptr.wrapping_add(1) as u16) as u16;
        let base = (high << 8) | low;
        let addr = base.wrapping_add(self.regs.y as u16);
        if write || (base & 0xFF00) != (addr & 0xFF00) {
            self.cycles += 1;
        }
        addr
    }

    /// ブランチを実行（共通ロジック）
    ///
    /// 基本2サイクル、分岐成立で+1、ページ境界越えでさらに+1
    pub(super) fn branch<M: MemoryBus>(&mut self, memory: &mut M, condition: bool) {
        let offset = memory.read(self.regs.pc) as i8;
        self.regs.pc = self.regs.pc.wrapping_add(1);

        if condition {
            let base = self.regs.pc;
            self.regs.pc = base.wrapping_add(offset as u16);
            self.cycles += 1;
            if (base & 0xFF00) != (self.regs.pc & 0xFF00) {
                self.cycles += 1;
            }
        }
        self.cycles += 2;
    }
}
