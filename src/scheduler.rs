// Catch-up scheduler - drives the CPU forward one instruction at a time and
// advances the PPU by the equivalent number of dots using the region's
// dot-per-CPU-cycle ratio, servicing OAM DMA stalls and the APU frame-IRQ
// divider along the way (§4.2, §4.5).

use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::ppu::{Ppu, Region};

/// Runs the CPU/PPU catch-up loop for one machine. Owns neither the CPU nor
/// the bus/PPU -- `machine.rs` holds those and calls `run_frame`/`step`.
pub struct Scheduler {
    region: Region,
    /// Running PPU-dot total implied by all CPU cycles charged so far, used
    /// for the PAL 16:5 remainder accumulator (NTSC's exact 3:1 ratio never
    /// needs the remainder, but sharing one code path keeps this simple).
    dot_remainder: u32,
    cpu_cycle_is_odd: bool,
}

impl Scheduler {
    pub fn new(region: Region) -> Self {
        Scheduler {
            region,
            dot_remainder: 0,
            cpu_cycle_is_odd: false,
        }
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    fn dot_ratio(&self) -> (u32, u32) {
        match self.region {
            Region::Ntsc => (3, 1),
            Region::Pal => (16, 5),
        }
    }

    /// Advances the PPU by the dots owed for `cpu_cycles` elapsed CPU cycles,
    /// using an integer accumulator so PAL's 16:5 ratio never drifts.
    fn catch_up_ppu(&mut self, ppu: &Rc<RefCell<Ppu>>, cpu_cycles: u32) {
        let (num, den) = self.dot_ratio();
        self.dot_remainder += cpu_cycles * num;
        let dots = self.dot_remainder / den;
        self.dot_remainder %= den;
        let mut ppu = ppu.borrow_mut();
        for _ in 0..dots {
            ppu.clock();
        }
    }

    /// Runs `reset(bus)`, then burns the 7-cycle / 7-ratio-dot reset delay so
    /// the CPU/PPU relative phase matches hardware before the first frame.
    pub fn reset(&mut self, cpu: &mut Cpu, bus: &mut Bus, ppu: &Rc<RefCell<Ppu>>) {
        self.dot_remainder = 0;
        self.cpu_cycle_is_odd = false;
        cpu.reset(bus);
        self.charge_cpu_cycles(bus, ppu, 7);
    }

    /// Charges `cycles` CPU cycles to the APU frame-IRQ divider and the PPU
    /// catch-up accumulator, without running any CPU instruction. Used for
    /// the reset delay and for OAM DMA stalls.
    fn charge_cpu_cycles(&mut self, bus: &mut Bus, ppu: &Rc<RefCell<Ppu>>, cycles: u32) {
        for _ in 0..cycles {
            bus.apu_mut().tick();
            self.cpu_cycle_is_odd = !self.cpu_cycle_is_odd;
        }
        self.catch_up_ppu(ppu, cycles);
    }

    /// Runs exactly one CPU instruction (servicing a pending OAM DMA stall
    /// first, if one is queued), catches the PPU up, and services any
    /// interrupts the instruction's side effects raised. Returns the number
    /// of CPU cycles this step consumed, including any DMA stall.
    pub fn step(&mut self, cpu: &mut Cpu, bus: &mut Bus, ppu: &Rc<RefCell<Ppu>>) -> u32 {
        let mut total_cycles = 0u32;

        bus.set_cpu_cycle_parity(self.cpu_cycle_is_odd);
        if let Some(stall) = bus.take_oam_dma() {
            self.charge_cpu_cycles(bus, ppu, stall);
            total_cycles += stall;
        }

        let instruction_cycles = cpu.step(bus) as u32;
        for _ in 0..instruction_cycles {
            bus.apu_mut().tick();
            self.cpu_cycle_is_odd = !self.cpu_cycle_is_odd;
        }
        self.catch_up_ppu(ppu, instruction_cycles);
        total_cycles += instruction_cycles;

        self.service_interrupts(cpu, bus, ppu);

        total_cycles
    }

    fn service_interrupts(&mut self, cpu: &mut Cpu, bus: &mut Bus, ppu: &Rc<RefCell<Ppu>>) {
        let nmi_pending = ppu.borrow().nmi_line();
        if nmi_pending {
            cpu.nmi(bus);
            self.charge_cpu_cycles(bus, ppu, 7);
            return;
        }

        if bus.apu_mut().irq_pending() || bus.mapper_irq_pending() {
            cpu.irq(bus);
            self.charge_cpu_cycles(bus, ppu, 7);
        }
    }

    /// Runs CPU instructions until the PPU reports a completed frame.
    pub fn run_frame(&mut self, cpu: &mut Cpu, bus: &mut Bus, ppu: &Rc<RefCell<Ppu>>) {
        loop {
            self.step(cpu, bus, ppu);
            if ppu.borrow_mut().frame_complete() {
                break;
            }
        }
    }
}
