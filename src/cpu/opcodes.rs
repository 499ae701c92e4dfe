//! オペコードの実装
//!
//! 6502の全ドキュメント化オペコードを実装
//!
//! 各メソッドの末尾で命令の基本サイクル数を加算する。
//! ページ境界ペナルティはアドレッシングヘルパー側で加算される。

use super::{flags, Cpu, MemoryBus};

impl Cpu {
    //--------------------------------------------------
    // ALU共通ロジック
    //--------------------------------------------------

    /// ADC本体: BCD補正は2進結果に対する補正項として計算する
    fn adc_value(&mut self, operand: u8) {
        let a = self.regs.a as i32;
        let m = operand as i32;
        let carry = self.regs.c as i32;
        let mut sum = (a + m + carry) & 0xFFFF;
        self.regs.v = ((sum ^ a) & (sum ^ m) & 0x80) != 0;
        if self.regs.d {
            sum += ((((sum + 0x66) ^ a ^ m) >> 3) & 0x22) * 3;
        }
        self.regs.c = sum > 0xFF;
        self.regs.a = (sum & 0xFF) as u8;
        let result = self.regs.a;
        self.regs.update_zero_negative(result);
    }

    /// SBC本体: オペランドを補数化してADCに帰着させる
    /// BCDモードではさらに$66を引いてから補正項を加算する
    fn sbc_value(&mut self, operand: u8) {
        let a = self.regs.a as i32;
        let mut m = (operand ^ 0xFF) as i32;
        if self.regs.d {
            m -= 0x66;
        }
        let carry = self.regs.c as i32;
        let mut sum = (a + m + carry) & 0xFFFF;
        self.regs.v = ((sum ^ a) & (sum ^ m) & 0x80) != 0;
        if self.regs.d {
            sum += ((((sum + 0x66) ^ a ^ m) >> 3) & 0x22) * 3;
        }
        self.regs.c = sum > 0xFF;
        self.regs.a = (sum & 0xFF) as u8;
        let result = self.regs.a;
        self.regs.update_zero_negative(result);
    }

    /// 比較共通: C はレジスタ >= オペランドでセット（ボロー反転）
    fn compare_value(&mut self, reg: u8, operand: u8) {
        let result = reg.wrapping_sub(operand);
        self.regs.update_zero_negative(result);
        self.regs.c = reg >= operand;
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        self.regs.c = (value & 0x80) != 0;
        let result = value << 1;
        self.regs.update_zero_negative(result);
        result
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.regs.c = (value & 0x01) != 0;
        let result = value >> 1;
        self.regs.update_zero_negative(result);
        result
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let result = (value << 1) | self.regs.c as u8;
        self.regs.c = (value & 0x80) != 0;
        self.regs.update_zero_negative(result);
        result
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | ((self.regs.c as u8) << 7);
        self.regs.c = (value & 0x01) != 0;
        self.regs.update_zero_negative(result);
        result
    }

    //--------------------------------------------------
    // LDA - Load Accumulator
    //--------------------------------------------------
    pub(super) fn lda_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.a = self.get_immediate(memory);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 2;
    }

    pub(super) fn lda_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 3;
    }

    pub(super) fn lda_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn lda_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn lda_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn lda_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn lda_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 6;
    }

    pub(super) fn lda_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        self.regs.a = memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // LDX - Load X Register
    //--------------------------------------------------
    pub(super) fn ldx_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.x = self.get_immediate(memory);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 2;
    }

    pub(super) fn ldx_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        self.regs.x = memory.read(addr);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 3;
    }

    pub(super) fn ldx_zeropage_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_y_addr(memory);
        self.regs.x = memory.read(addr);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 4;
    }

    pub(super) fn ldx_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        self.regs.x = memory.read(addr);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 4;
    }

    pub(super) fn ldx_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        self.regs.x = memory.read(addr);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 4;
    }

    //--------------------------------------------------
    // LDY - Load Y Register
    //--------------------------------------------------
    pub(super) fn ldy_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.y = self.get_immediate(memory);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 2;
    }

    pub(super) fn ldy_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        self.regs.y = memory.read(addr);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 3;
    }

    pub(super) fn ldy_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        self.regs.y = memory.read(addr);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 4;
    }

    pub(super) fn ldy_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        self.regs.y = memory.read(addr);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 4;
    }

    pub(super) fn ldy_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        self.regs.y = memory.read(addr);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 4;
    }

    //--------------------------------------------------
    // STA - Store Accumulator
    //--------------------------------------------------
    pub(super) fn sta_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        memory.write(addr, self.regs.a);
        self.cycles += 3;
    }

    pub(super) fn sta_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        memory.write(addr, self.regs.a);
        self.cycles += 4;
    }

    pub(super) fn sta_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        memory.write(addr, self.regs.a);
        self.cycles += 4;
    }

    pub(super) fn sta_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        memory.write(addr, self.regs.a);
        self.cycles += 4;
    }

    pub(super) fn sta_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, true);
        memory.write(addr, self.regs.a);
        self.cycles += 4;
    }

    pub(super) fn sta_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        memory.write(addr, self.regs.a);
        self.cycles += 6;
    }

    pub(super) fn sta_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, true);
        memory.write(addr, self.regs.a);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // STX / STY
    //--------------------------------------------------
    pub(super) fn stx_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        memory.write(addr, self.regs.x);
        self.cycles += 3;
    }

    pub(super) fn stx_zeropage_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_y_addr(memory);
        memory.write(addr, self.regs.x);
        self.cycles += 4;
    }

    pub(super) fn stx_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        memory.write(addr, self.regs.x);
        self.cycles += 4;
    }

    pub(super) fn sty_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        memory.write(addr, self.regs.y);
        self.cycles += 3;
    }

    pub(super) fn sty_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        memory.write(addr, self.regs.y);
        self.cycles += 4;
    }

    pub(super) fn sty_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        memory.write(addr, self.regs.y);
        self.cycles += 4;
    }

    //--------------------------------------------------
    // Transfer Instructions
    //--------------------------------------------------
    pub(super) fn tax(&mut self) {
        self.regs.x = self.regs.a;
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 2;
    }

    pub(super) fn txa(&mut self) {
        self.regs.a = self.regs.x;
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 2;
    }

    pub(super) fn tay(&mut self) {
        self.regs.y = self.regs.a;
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 2;
    }

    pub(super) fn tya(&mut self) {
        self.regs.a = self.regs.y;
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 2;
    }

    pub(super) fn tsx(&mut self) {
        self.regs.x = self.regs.sp;
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 2;
    }

    /// TXSはフラグに影響しない
    pub(super) fn txs(&mut self) {
        self.regs.sp = self.regs.x;
        self.cycles += 2;
    }

    //--------------------------------------------------
    // Stack Instructions
    //--------------------------------------------------
    pub(super) fn pha<M: MemoryBus>(&mut self, memory: &mut M) {
        let a = self.regs.a;
        self.push_byte(memory, a);
        self.cycles += 3;
    }

    pub(super) fn pla<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.a = self.pop_byte(memory);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    /// PHPはBとUをセットした状態でプッシュする
    pub(super) fn php<M: MemoryBus>(&mut self, memory: &mut M) {
        let status = self.regs.status() | flags::BREAK | flags::UNUSED;
        self.push_byte(memory, status);
        self.cycles += 3;
    }

    pub(super) fn plp<M: MemoryBus>(&mut self, memory: &mut M) {
        let status = self.pop_byte(memory);
        self.regs.set_status(status);
        self.cycles += 4;
    }

    //--------------------------------------------------
    // ADC - Add with Carry
    //--------------------------------------------------
    pub(super) fn adc_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        self.adc_value(operand);
        self.cycles += 2;
    }

    pub(super) fn adc_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 3;
    }

    pub(super) fn adc_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn adc_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn adc_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn adc_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn adc_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 6;
    }

    pub(super) fn adc_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        let operand = memory.read(addr);
        self.adc_value(operand);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // SBC - Subtract with Carry
    //--------------------------------------------------
    pub(super) fn sbc_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        self.sbc_value(operand);
        self.cycles += 2;
    }

    pub(super) fn sbc_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 3;
    }

    pub(super) fn sbc_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn sbc_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn sbc_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn sbc_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 4;
    }

    pub(super) fn sbc_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 6;
    }

    pub(super) fn sbc_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        let operand = memory.read(addr);
        self.sbc_value(operand);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // CMP / CPX / CPY
    //--------------------------------------------------
    pub(super) fn cmp_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 2;
    }

    pub(super) fn cmp_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 3;
    }

    pub(super) fn cmp_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 4;
    }

    pub(super) fn cmp_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 4;
    }

    pub(super) fn cmp_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 4;
    }

    pub(super) fn cmp_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 4;
    }

    pub(super) fn cmp_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 6;
    }

    pub(super) fn cmp_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        let operand = memory.read(addr);
        let a = self.regs.a;
        self.compare_value(a, operand);
        self.cycles += 5;
    }

    pub(super) fn cpx_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        let x = self.regs.x;
        self.compare_value(x, operand);
        self.cycles += 2;
    }

    pub(super) fn cpx_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let operand = memory.read(addr);
        let x = self.regs.x;
        self.compare_value(x, operand);
        self.cycles += 3;
    }

    pub(super) fn cpx_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let operand = memory.read(addr);
        let x = self.regs.x;
        self.compare_value(x, operand);
        self.cycles += 4;
    }

    pub(super) fn cpy_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        let y = self.regs.y;
        self.compare_value(y, operand);
        self.cycles += 2;
    }

    pub(super) fn cpy_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let operand = memory.read(addr);
        let y = self.regs.y;
        self.compare_value(y, operand);
        self.cycles += 3;
    }

    pub(super) fn cpy_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let operand = memory.read(addr);
        let y = self.regs.y;
        self.compare_value(y, operand);
        self.cycles += 4;
    }

    //--------------------------------------------------
    // INC / DEC (メモリRMW)
    //--------------------------------------------------
    pub(super) fn inc_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr).wrapping_add(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 5;
    }

    pub(super) fn inc_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let value = memory.read(addr).wrapping_add(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 6;
    }

    pub(super) fn inc_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr).wrapping_add(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 6;
    }

    pub(super) fn inc_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        let value = memory.read(addr).wrapping_add(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 6;
    }

    pub(super) fn dec_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr).wrapping_sub(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 5;
    }

    pub(super) fn dec_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let value = memory.read(addr).wrapping_sub(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 6;
    }

    pub(super) fn dec_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr).wrapping_sub(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 6;
    }

    pub(super) fn dec_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        let value = memory.read(addr).wrapping_sub(1);
        memory.write(addr, value);
        self.regs.update_zero_negative(value);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // INX / INY / DEX / DEY
    //--------------------------------------------------
    pub(super) fn inx(&mut self) {
        self.regs.x = self.regs.x.wrapping_add(1);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 2;
    }

    pub(super) fn iny(&mut self) {
        self.regs.y = self.regs.y.wrapping_add(1);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 2;
    }

    pub(super) fn dex(&mut self) {
        self.regs.x = self.regs.x.wrapping_sub(1);
        let x = self.regs.x;
        self.regs.update_zero_negative(x);
        self.cycles += 2;
    }

    pub(super) fn dey(&mut self) {
        self.regs.y = self.regs.y.wrapping_sub(1);
        let y = self.regs.y;
        self.regs.update_zero_negative(y);
        self.cycles += 2;
    }

    //--------------------------------------------------
    // AND
    //--------------------------------------------------
    pub(super) fn and_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        self.regs.a &= operand;
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 2;
    }

    pub(super) fn and_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 3;
    }

    pub(super) fn and_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn and_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn and_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn and_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn and_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 6;
    }

    pub(super) fn and_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        self.regs.a &= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // ORA
    //--------------------------------------------------
    pub(super) fn ora_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        self.regs.a |= operand;
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 2;
    }

    pub(super) fn ora_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 3;
    }

    pub(super) fn ora_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn ora_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn ora_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn ora_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn ora_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 6;
    }

    pub(super) fn ora_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        self.regs.a |= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // EOR
    //--------------------------------------------------
    pub(super) fn eor_immediate<M: MemoryBus>(&mut self, memory: &mut M) {
        let operand = self.get_immediate(memory);
        self.regs.a ^= operand;
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 2;
    }

    pub(super) fn eor_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 3;
    }

    pub(super) fn eor_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn eor_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn eor_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, false);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn eor_absolute_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_y_addr(memory, false);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 4;
    }

    pub(super) fn eor_indirect_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_x_addr(memory);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 6;
    }

    pub(super) fn eor_indirect_y<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_indirect_y_addr(memory, false);
        self.regs.a ^= memory.read(addr);
        let a = self.regs.a;
        self.regs.update_zero_negative(a);
        self.cycles += 5;
    }

    //--------------------------------------------------
    // ASL
    //--------------------------------------------------
    pub(super) fn asl_accumulator(&mut self) {
        let a = self.regs.a;
        self.regs.a = self.asl_value(a);
        self.cycles += 2;
    }

    pub(super) fn asl_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr);
        let result = self.asl_value(value);
        memory.write(addr, result);
        self.cycles += 5;
    }

    pub(super) fn asl_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let value = memory.read(addr);
        let result = self.asl_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn asl_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr);
        let result = self.asl_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn asl_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        let value = memory.read(addr);
        let result = self.asl_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // LSR
    //--------------------------------------------------
    pub(super) fn lsr_accumulator(&mut self) {
        let a = self.regs.a;
        self.regs.a = self.lsr_value(a);
        self.cycles += 2;
    }

    pub(super) fn lsr_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr);
        let result = self.lsr_value(value);
        memory.write(addr, result);
        self.cycles += 5;
    }

    pub(super) fn lsr_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let value = memory.read(addr);
        let result = self.lsr_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn lsr_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr);
        let result = self.lsr_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn lsr_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        let value = memory.read(addr);
        let result = self.lsr_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // ROL
    //--------------------------------------------------
    pub(super) fn rol_accumulator(&mut self) {
        let a = self.regs.a;
        self.regs.a = self.rol_value(a);
        self.cycles += 2;
    }

    pub(super) fn rol_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr);
        let result = self.rol_value(value);
        memory.write(addr, result);
        self.cycles += 5;
    }

    pub(super) fn rol_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let value = memory.read(addr);
        let result = self.rol_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn rol_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr);
        let result = self.rol_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn rol_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        let value = memory.read(addr);
        let result = self.rol_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // ROR
    //--------------------------------------------------
    pub(super) fn ror_accumulator(&mut self) {
        let a = self.regs.a;
        self.regs.a = self.ror_value(a);
        self.cycles += 2;
    }

    pub(super) fn ror_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr);
        let result = self.ror_value(value);
        memory.write(addr, result);
        self.cycles += 5;
    }

    pub(super) fn ror_zeropage_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_x_addr(memory);
        let value = memory.read(addr);
        let result = self.ror_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn ror_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr);
        let result = self.ror_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    pub(super) fn ror_absolute_x<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_x_addr(memory, true);
        let value = memory.read(addr);
        let result = self.ror_value(value);
        memory.write(addr, result);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // BIT
    //--------------------------------------------------
    pub(super) fn bit_zeropage<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_zeropage_addr(memory);
        let value = memory.read(addr);
        self.regs.z = (self.regs.a & value) == 0;
        self.regs.v = (value & 0x40) != 0;
        self.regs.s = (value & 0x80) != 0;
        self.cycles += 3;
    }

    pub(super) fn bit_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.get_absolute_addr(memory);
        let value = memory.read(addr);
        self.regs.z = (self.regs.a & value) == 0;
        self.regs.v = (value & 0x40) != 0;
        self.regs.s = (value & 0x80) != 0;
        self.cycles += 4;
    }

    //--------------------------------------------------
    // Branch Instructions
    //--------------------------------------------------
    pub(super) fn bpl<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = !self.regs.s;
        self.branch(memory, condition);
    }

    pub(super) fn bmi<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = self.regs.s;
        self.branch(memory, condition);
    }

    pub(super) fn bvc<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = !self.regs.v;
        self.branch(memory, condition);
    }

    pub(super) fn bvs<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = self.regs.v;
        self.branch(memory, condition);
    }

    pub(super) fn bcc<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = !self.regs.c;
        self.branch(memory, condition);
    }

    pub(super) fn bcs<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = self.regs.c;
        self.branch(memory, condition);
    }

    pub(super) fn bne<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = !self.regs.z;
        self.branch(memory, condition);
    }

    pub(super) fn beq<M: MemoryBus>(&mut self, memory: &mut M) {
        let condition = self.regs.z;
        self.branch(memory, condition);
    }

    //--------------------------------------------------
    // Jump / Call
    //--------------------------------------------------
    pub(super) fn jmp_absolute<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.pc = self.get_absolute_addr(memory);
        self.cycles += 3;
    }

    /// JMP間接: 6502のページ境界バグを再現する
    /// （上位バイトは下位バイトと同じページから読まれる）
    pub(super) fn jmp_indirect<M: MemoryBus>(&mut self, memory: &mut M) {
        let ptr = self.get_absolute_addr(memory);
        let low = memory.read(ptr) as u16;
        let high_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
        let high = memory.read(high_addr) as u16;
        self.regs.pc = (high << 8) | low;
        self.cycles += 5;
    }

    /// JSR: 最後のオペランドバイトのアドレス（戻り先-1）を積む
    pub(super) fn jsr<M: MemoryBus>(&mut self, memory: &mut M) {
        let low = memory.read(self.regs.pc) as u16;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let high = memory.read(self.regs.pc) as u16;
        let ret = self.regs.pc;
        self.push_word(memory, ret);
        self.regs.pc = (high << 8) | low;
        self.cycles += 6;
    }

    pub(super) fn rts<M: MemoryBus>(&mut self, memory: &mut M) {
        let addr = self.pop_word(memory);
        self.regs.pc = addr.wrapping_add(1);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // Interrupts
    //--------------------------------------------------
    /// BRK: パディングバイトを飛ばしたPCとB/Uセットのステータスを積む
    pub(super) fn brk<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let pc = self.regs.pc;
        self.push_word(memory, pc);
        let status = self.regs.status() | flags::BREAK | flags::UNUSED;
        self.push_byte(memory, status);
        self.regs.i = true;
        self.regs.d = false;
        self.regs.pc = memory.read(0xFFFE) as u16 | ((memory.read(0xFFFF) as u16) << 8);
        self.cycles += 7;
    }

    pub(super) fn rti<M: MemoryBus>(&mut self, memory: &mut M) {
        let status = self.pop_byte(memory);
        self.regs.set_status(status);
        self.regs.pc = self.pop_word(memory);
        self.cycles += 6;
    }

    //--------------------------------------------------
    // Flag Instructions
    //--------------------------------------------------
    pub(super) fn clc(&mut self) {
        self.regs.c = false;
        self.cycles += 2;
    }

    pub(super) fn sec(&mut self) {
        self.regs.c = true;
        self.cycles += 2;
    }

    pub(super) fn cli(&mut self) {
        self.regs.i = false;
        self.cycles += 2;
    }

    pub(super) fn sei(&mut self) {
        self.regs.i = true;
        self.cycles += 2;
    }

    pub(super) fn clv(&mut self) {
        self.regs.v = false;
        self.cycles += 2;
    }

    pub(super) fn cld(&mut self) {
        self.regs.d = false;
        self.cycles += 2;
    }

    pub(super) fn sed(&mut self) {
        self.regs.d = true;
        self.cycles += 2;
    }

    //--------------------------------------------------
    // NOP
    //--------------------------------------------------
    pub(super) fn nop(&mut self) {
        self.cycles += 2;
    }
}
