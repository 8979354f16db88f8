use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cytrus_core::framebuffer_layout::FramebufferLayout;
use cytrus_core::renderer::{ScreenId, ScreenReadback, ScreenSurface};
use cytrus_core::settings::LayoutOption;
use cytrus_core::types::Frame;
use cytrus_libretro::compose::compose_screens;

/// Screens filled with a gradient so no two source pixels are alike
struct BenchScreens {
    top: ScreenSurface,
    bottom: ScreenSurface,
}

impl BenchScreens {
    fn new() -> Self {
        let mut top = ScreenSurface::new(400, 240);
        let mut bottom = ScreenSurface::new(320, 240);
        for (i, b) in top.pixels.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        for (i, b) in bottom.pixels.iter_mut().enumerate() {
            *b = (i % 241) as u8;
        }
        Self { top, bottom }
    }
}

impl ScreenReadback for BenchScreens {
    fn screen(&self, id: ScreenId) -> &ScreenSurface {
        match id {
            ScreenId::TopLeft | ScreenId::TopRight => &self.top,
            ScreenId::Bottom => &self.bottom,
        }
    }
}

fn bench_compose_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_layouts");
    let screens = BenchScreens::new();

    for (name, option) in [
        ("default", LayoutOption::Default),
        ("single", LayoutOption::SingleScreen),
        ("side", LayoutOption::SideScreen),
    ] {
        let layout = FramebufferLayout::compute(option, false, 1);
        let mut frame = Frame::new(layout.width, layout.height);
        group.bench_function(name, |b| {
            b.iter(|| compose_screens(black_box(&mut frame), black_box(&layout), &screens));
        });
    }

    group.finish();
}

fn bench_compose_scaled(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_scaled");
    let screens = BenchScreens::new();

    for factor in [1u32, 2, 3, 4] {
        let layout = FramebufferLayout::compute(LayoutOption::Default, false, factor);
        let mut frame = Frame::new(layout.width, layout.height);
        group.bench_with_input(BenchmarkId::from_parameter(factor), &layout, |b, layout| {
            b.iter(|| compose_screens(black_box(&mut frame), layout, &screens));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compose_layouts, bench_compose_scaled);
criterion_main!(benches);
