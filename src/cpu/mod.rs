//! MOS 6502 CPU Emulator
//!
//! Apple II+ で使用される6502プロセッサのエミュレーション実装
//! Based on 6502 technical specifications and datasheet

mod opcodes;
mod addressing;

use crate::clock::Clock;

/// CPUのステータスレジスタのフラグビット
pub mod flags {
    pub const CARRY: u8 = 0b0000_0001;       // C: キャリーフラグ
    pub const ZERO: u8 = 0b0000_0010;        // Z: ゼロフラグ
    pub const IRQ_DISABLE: u8 = 0b0000_0100; // I: 割り込み禁止フラグ
    pub const DECIMAL: u8 = 0b0000_1000;     // D: BCDモードフラグ
    pub const BREAK: u8 = 0b0001_0000;       // B: ブレークフラグ
    pub const UNUSED: u8 = 0b0010_0000;      // 未使用（常に1）
    pub const OVERFLOW: u8 = 0b0100_0000;    // V: オーバーフローフラグ
    pub const NEGATIVE: u8 = 0b1000_0000;    // N: 負数フラグ
}

/// メモリバスインターフェース
/// CPUがメモリにアクセスするために必要なトレイト
pub trait MemoryBus {
    /// メモリから1バイト読み取り
    fn read(&mut self, address: u16) -> u8;
    /// メモリに1バイト書き込み
    fn write(&mut self, address: u16, value: u8);
}

/// CPUレジスタの状態
///
/// ステータスフラグは独立したboolで保持し、
/// スタック操作時にのみ1バイトにパックする
#[derive(Debug, Clone, PartialEq)]
pub struct Registers {
    /// アキュムレータ（A）
    pub a: u8,
    /// Xインデックスレジスタ
    pub x: u8,
    /// Yインデックスレジスタ
    pub y: u8,
    /// スタックポインタ
    pub sp: u8,
    /// プログラムカウンタ
    pub pc: u16,
    /// キャリー
    pub c: bool,
    /// ゼロ
    pub z: bool,
    /// 割り込み禁止
    pub i: bool,
    /// BCDモード
    pub d: bool,
    /// ブレーク
    pub b: bool,
    /// 未使用（プッシュ時は常に1）
    pub u: bool,
    /// オーバーフロー
    pub v: bool,
    /// 負数
    pub s: bool,
}

impl Default for Registers {
    fn default() -> Self {
        Registers {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD, // スタックは$01FDから開始
            pc: 0,
            c: false,
            z: false,
            i: true,
            d: false,
            b: false,
            u: true,
            v: false,
            s: false,
        }
    }
}

impl Registers {
    /// フラグを1バイトにパック
    pub fn status(&self) -> u8 {
        let mut p = 0;
        if self.c { p |= flags::CARRY; }
        if self.z { p |= flags::ZERO; }
        if self.i { p |= flags::IRQ_DISABLE; }
        if self.d { p |= flags::DECIMAL; }
        if self.b { p |= flags::BREAK; }
        if self.u { p |= flags::UNUSED; }
        if self.v { p |= flags::OVERFLOW; }
        if self.s { p |= flags::NEGATIVE; }
        p
    }

    /// 1バイトからフラグを展開（未使用ビットは常に1に固定）
    pub fn set_status(&mut self, value: u8) {
        self.c = value & flags::CARRY != 0;
        self.z = value & flags::ZERO != 0;
        self.i = value & flags::IRQ_DISABLE != 0;
        self.d = value & flags::DECIMAL != 0;
        self.b = value & flags::BREAK != 0;
        self.u = true;
        self.v = value & flags::OVERFLOW != 0;
        self.s = value & flags::NEGATIVE != 0;
    }

    /// ゼロフラグと負数フラグを値に基づいて更新
    pub fn update_zero_negative(&mut self, value: u8) {
        self.z = value == 0;
        self.s = (value & 0x80) != 0;
    }
}

/// 6502 CPUエミュレータ
#[derive(Clone)]
pub struct Cpu {
    /// CPUレジスタ
    pub regs: Registers,
    /// 共有サイクルクロック
    pub clock: Clock,
    /// 現在の命令で消費したサイクル
    cycles: u64,
}

impl Cpu {
    /// 新しいCPUインスタンスを作成
    pub fn new(clock: Clock) -> Self {
        Cpu {
            regs: Registers::default(),
            clock,
            cycles: 0,
        }
    }

    /// CPUをリセット
    ///
    /// PC、SP、I、Uのみ初期化する（ウォームリセット）。
    /// 他のレジスタとフラグは保持される。
    pub fn reset<M: MemoryBus>(&mut self, memory: &mut M) {
        let low = memory.read(0xFFFC) as u16;
        let high = memory.read(0xFFFD) as u16;
        self.regs.pc = (high << 8) | low;
        self.regs.sp = 0xFD;
        self.regs.i = true;
        self.regs.u = true;
        self.clock.advance(7); // リセットには7サイクル必要
    }

    /// IRQ（割り込み要求）- Iフラグがクリアされているときのみ受け付ける
    pub fn irq<M: MemoryBus>(&mut self, memory: &mut M) {
        if self.regs.i {
            return;
        }
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let pc = self.regs.pc;
        self.push_word(memory, pc);
        let status = (self.regs.status() | flags::UNUSED) & !flags::BREAK;
        self.push_byte(memory, status);
        self.regs.i = true;
        self.regs.pc = memory.read(0xFFFE) as u16 | ((memory.read(0xFFFF) as u16) << 8);
        self.clock.advance(7);
    }

    /// NMI（ノンマスカブル割り込み）- 常に受け付ける
    pub fn nmi<M: MemoryBus>(&mut self, memory: &mut M) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
        let pc = self.regs.pc;
        self.push_word(memory, pc);
        let status = (self.regs.status() | flags::UNUSED) & !flags::BREAK;
        self.push_byte(memory, status);
        self.regs.i = true;
        self.regs.pc = memory.read(0xFFFA) as u16 | ((memory.read(0xFFFB) as u16) << 8);
        self.clock.advance(7);
    }

    /// 1命令を実行し、消費したサイクル数を返す
    pub fn step<M: MemoryBus>(&mut self, memory: &mut M) -> u64 {
        self.cycles = 0;
        let opcode = self.fetch_byte(memory);
        self.execute_opcode(memory, opcode);
        self.clock.advance(self.cycles);
        self.cycles
    }

    /// サイクルバジェット分の命令を実行する
    ///
    /// クロックが target = 現在値 + cycle_budget に達するまで
    /// 命令単位で実行を続ける
    pub fn run<M: MemoryBus>(&mut self, memory: &mut M, cycle_budget: u64) {
        let target = self.clock.ticks() + cycle_budget;
        while self.clock.ticks() < target {
            self.step(memory);
        }
    }

    /// PCから1バイトフェッチしてPCをインクリメント
    fn fetch_byte<M: MemoryBus>(&mut self, memory: &mut M) -> u8 {
        let value = memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// スタックに1バイトプッシュ
    fn push_byte<M: MemoryBus>(&mut self, memory: &mut M, value: u8) {
        memory.write(0x0100 | self.regs.sp as u16, value);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    /// スタックから1バイトポップ
    fn pop_byte<M: MemoryBus>(&mut self, memory: &mut M) -> u8 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        memory.read(0x0100 | self.regs.sp as u16)
    }

    /// スタックに2バイトプッシュ（上位バイト先）
    fn push_word<M: MemoryBus>(&mut self, memory: &mut M, value: u16) {
        self.push_byte(memory, (value >> 8) as u8);
        self.push_byte(memory, value as u8);
    }

    /// スタックから2バイトポップ
    fn pop_word<M: MemoryBus>(&mut self, memory: &mut M) -> u16 {
        let low = self.pop_byte(memory) as u16;
        let high = self.pop_byte(memory) as u16;
        (high << 8) | low
    }

    /// オペコードを実行
    fn execute_opcode<M: MemoryBus>(&mut self, memory: &mut M, opcode: u8) {
        match opcode {
            // LDA - Load Accumulator
            0xA9 => self.lda_immediate(memory),
            0xA5 => self.lda_zeropage(memory),
            0xB5 => self.lda_zeropage_x(memory),
            0xAD => self.lda_absolute(memory),
            0xBD => self.lda_absolute_x(memory),
            0xB9 => self.lda_absolute_y(memory),
            0xA1 => self.lda_indirect_x(memory),
            0xB1 => self.lda_indirect_y(memory),

            // LDX - Load X Register
            0xA2 => self.ldx_immediate(memory),
            0xA6 => self.ldx_zeropage(memory),
            0xB6 => self.ldx_zeropage_y(memory),
            0xAE => self.ldx_absolute(memory),
            0xBE => self.ldx_absolute_y(memory),

            // LDY - Load Y Register
            0xA0 => self.ldy_immediate(memory),
            0xA4 => self.ldy_zeropage(memory),
            0xB4 => self.ldy_zeropage_x(memory),
            0xAC => self.ldy_absolute(memory),
            0xBC => self.ldy_absolute_x(memory),

            // STA - Store Accumulator
            0x85 => self.sta_zeropage(memory),
            0x95 => self.sta_zeropage_x(memory),
            0x8D => self.sta_absolute(memory),
            0x9D => self.sta_absolute_x(memory),
            0x99 => self.sta_absolute_y(memory),
            0x81 => self.sta_indirect_x(memory),
            0x91 => self.sta_indirect_y(memory),

            // STX - Store X Register
            0x86 => self.stx_zeropage(memory),
            0x96 => self.stx_zeropage_y(memory),
            0x8E => self.stx_absolute(memory),

            // STY - Store Y Register
            0x84 => self.sty_zeropage(memory),
            0x94 => self.sty_zeropage_x(memory),
            0x8C => self.sty_absolute(memory),

            // Transfer Instructions
            0xAA => self.tax(),
            0x8A => self.txa(),
            0xA8 => self.tay(),
            0x98 => self.tya(),
            0xBA => self.tsx(),
            0x9A => self.txs(),

            // Stack Instructions
            0x48 => self.pha(memory),
            0x68 => self.pla(memory),
            0x08 => self.php(memory),
            0x28 => self.plp(memory),

            // Arithmetic - ADC
            0x69 => self.adc_immediate(memory),
            0x65 => self.adc_zeropage(memory),
            0x75 => self.adc_zeropage_x(memory),
            0x6D => self.adc_absolute(memory),
            0x7D => self.adc_absolute_x(memory),
            0x79 => self.adc_absolute_y(memory),
            0x61 => self.adc_indirect_x(memory),
            0x71 => self.adc_indirect_y(memory),

            // Arithmetic - SBC
            0xE9 => self.sbc_immediate(memory),
            0xE5 => self.sbc_zeropage(memory),
            0xF5 => self.sbc_zeropage_x(memory),
            0xED => self.sbc_absolute(memory),
            0xFD => self.sbc_absolute_x(memory),
            0xF9 => self.sbc_absolute_y(memory),
            0xE1 => self.sbc_indirect_x(memory),
            0xF1 => self.sbc_indirect_y(memory),

            // Compare
            0xC9 => self.cmp_immediate(memory),
            0xC5 => self.cmp_zeropage(memory),
            0xD5 => self.cmp_zeropage_x(memory),
            0xCD => self.cmp_absolute(memory),
            0xDD => self.cmp_absolute_x(memory),
            0xD9 => self.cmp_absolute_y(memory),
            0xC1 => self.cmp_indirect_x(memory),
            0xD1 => self.cmp_indirect_y(memory),

            0xE0 => self.cpx_immediate(memory),
            0xE4 => self.cpx_zeropage(memory),
            0xEC => self.cpx_absolute(memory),

            0xC0 => self.cpy_immediate(memory),
            0xC4 => self.cpy_zeropage(memory),
            0xCC => self.cpy_absolute(memory),

            // Increment/Decrement
            0xE6 => self.inc_zeropage(memory),
            0xF6 => self.inc_zeropage_x(memory),
            0xEE => self.inc_absolute(memory),
            0xFE => self.inc_absolute_x(memory),

            0xC6 => self.dec_zeropage(memory),
            0xD6 => self.dec_zeropage_x(memory),
            0xCE => self.dec_absolute(memory),
            0xDE => self.dec_absolute_x(memory),

            0xE8 => self.inx(),
            0xC8 => self.iny(),
            0xCA => self.dex(),
            0x88 => self.dey(),

            // Logical - AND
            0x29 => self.and_immediate(memory),
            0x25 => self.and_zeropage(memory),
            0x35 => self.and_zeropage_x(memory),
            0x2D => self.and_absolute(memory),
            0x3D => self.and_absolute_x(memory),
            0x39 => self.and_absolute_y(memory),
            0x21 => self.and_indirect_x(memory),
            0x31 => self.and_indirect_y(memory),

            // Logical - ORA
            0x09 => self.ora_immediate(memory),
            0x05 => self.ora_zeropage(memory),
            0x15 => self.ora_zeropage_x(memory),
            0x0D => self.ora_absolute(memory),
            0x1D => self.ora_absolute_x(memory),
            0x19 => self.ora_absolute_y(memory),
            0x01 => self.ora_indirect_x(memory),
            0x11 => self.ora_indirect_y(memory),

            // Logical - EOR
            0x49 => self.eor_immediate(memory),
            0x45 => self.eor_zeropage(memory),
            0x55 => self.eor_zeropage_x(memory),
            0x4D => self.eor_absolute(memory),
            0x5D => self.eor_absolute_x(memory),
            0x59 => self.eor_absolute_y(memory),
            0x41 => self.eor_indirect_x(memory),
            0x51 => self.eor_indirect_y(memory),

            // Shifts
            0x0A => self.asl_accumulator(),
            0x06 => self.asl_zeropage(memory),
            0x16 => self.asl_zeropage_x(memory),
            0x0E => self.asl_absolute(memory),
            0x1E => self.asl_absolute_x(memory),

            0x4A => self.lsr_accumulator(),
            0x46 => self.lsr_zeropage(memory),
            0x56 => self.lsr_zeropage_x(memory),
            0x4E => self.lsr_absolute(memory),
            0x5E => self.lsr_absolute_x(memory),

            0x2A => self.rol_accumulator(),
            0x26 => self.rol_zeropage(memory),
            0x36 => self.rol_zeropage_x(memory),
            0x2E => self.rol_absolute(memory),
            0x3E => self.rol_absolute_x(memory),

            0x6A => self.ror_accumulator(),
            0x66 => self.ror_zeropage(memory),
            0x76 => self.ror_zeropage_x(memory),
            0x6E => self.ror_absolute(memory),
            0x7E => self.ror_absolute_x(memory),

            // BIT test
            0x24 => self.bit_zeropage(memory),
            0x2C => self.bit_absolute(memory),

            // Branch Instructions
            0x10 => self.bpl(memory),
            0x30 => self.bmi(memory),
            0x50 => self.bvc(memory),
            0x70 => self.bvs(memory),
            0x90 => self.bcc(memory),
            0xB0 => self.bcs(memory),
            0xD0 => self.bne(memory),
            0xF0 => self.beq(memory),

            // Jump/Call
            0x4C => self.jmp_absolute(memory),
            0x6C => self.jmp_indirect(memory),
            0x20 => self.jsr(memory),
            0x60 => self.rts(memory),

            // Interrupts
            0x00 => self.brk(memory),
            0x40 => self.rti(memory),

            // Flag Instructions
            0x18 => self.clc(),
            0x38 => self.sec(),
            0x58 => self.cli(),
            0x78 => self.sei(),
            0xB8 => self.clv(),
            0xD8 => self.cld(),
            0xF8 => self.sed(),

            // NOP
            0xEA => self.nop(),

            // 未定義オペコード: サイクルを消費しないNOPとして扱う
            // （PCはオペコード1バイト分だけ進んでいる）
            _ => {}
        }
    }
}
