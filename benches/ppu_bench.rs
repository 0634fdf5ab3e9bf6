// PPU Benchmarks
// Performance benchmarks for PPU rendering operations

use criterion::{criterion_group, criterion_main, Criterion};
use nes_core::cartridge::{build_mapper, Cartridge, Mirroring};
use nes_core::{MemoryMappedDevice, Ppu};
use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

fn wired_ppu() -> Ppu {
    let cart = Cartridge {
        prg_rom: vec![0u8; 16 * 1024],
        chr_rom: vec![0xAA; 8 * 1024],
        chr_is_ram: false,
        prg_ram: vec![0u8; 8 * 1024],
        mapper_number: 0,
        mirroring: Mirroring::Horizontal,
        has_battery: false,
    };
    let mapper = Rc::new(RefCell::new(build_mapper(cart).unwrap()));
    let mut ppu = Ppu::new();
    ppu.set_mapper(mapper);
    ppu
}

/// Benchmark a full frame of PPU dots (the main performance-critical path).
fn bench_ppu_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_rendering");
    group.sample_size(20);

    // One NTSC frame = 262 scanlines * 341 dots = 89,342 dots.
    group.bench_function("full_frame_via_clock", |b| {
        let mut ppu = wired_ppu();
        ppu.write(0x2001, 0b0001_1110); // show background and sprites

        b.iter(|| {
            for _ in 0..89342 {
                ppu.clock();
            }
            black_box(ppu.frame());
        });
    });

    group.finish();
}

fn bench_ppu_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_clock");

    group.bench_function("single_dot", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            black_box(ppu.clock());
        });
    });

    group.bench_function("scanline_341_dots", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            for _ in 0..341 {
                ppu.clock();
            }
        });
    });

    group.finish();
}

fn bench_ppu_registers(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_registers");

    group.bench_function("ppuctrl_write", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            ppu.write(black_box(0x2000), black_box(0b1001_0000));
        });
    });

    group.bench_function("ppustatus_read", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            black_box(ppu.read(0x2002));
        });
    });

    group.bench_function("ppudata_write_sequence", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            ppu.write(0x2006, 0x20);
            ppu.write(0x2006, 0x00);
            for i in 0..32 {
                ppu.write(0x2007, i);
            }
        });
    });

    group.finish();
}

fn bench_ppu_oam(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_oam");

    group.bench_function("oam_write", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            ppu.write(0x2003, 0);
            for i in 0..=255u8 {
                ppu.write(0x2004, i);
            }
        });
    });

    group.bench_function("oam_read", |b| {
        let mut ppu = wired_ppu();
        b.iter(|| {
            black_box(ppu.read(0x2004));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ppu_rendering,
    bench_ppu_clock,
    bench_ppu_registers,
    bench_ppu_oam
);
criterion_main!(benches);
