use criterion::{black_box, criterion_group, criterion_main, Criterion};
use svgplay_core::{AnimationController, RepeatMode};

fn flipbook(tracks: usize, frames: usize) -> String {
    let values: Vec<String> = (0..frames).map(|f| format!("#frame{f}")).collect();
    let values = values.join(";");
    let mut svg = String::from(r##"<svg xmlns="http://www.w3.org/2000/svg">"##);
    for t in 0..tracks {
        svg.push_str(&format!(
            r##"<use id="track{t}" href="#sprite"><animate attributeName="xlink:href" values="{values}" dur="10s"/></use>"##
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn bench_update(c: &mut Criterion) {
    let svg = flipbook(32, 120);
    let mut ctl = AnimationController::new();
    ctl.load_from_content(&svg).unwrap();
    ctl.set_repeat_mode(RepeatMode::Loop);
    ctl.play();

    c.bench_function("update_32_tracks", |b| {
        b.iter(|| ctl.update(black_box(1.0 / 60.0)))
    });

    c.bench_function("animation_states_32_tracks", |b| {
        b.iter(|| black_box(ctl.current_animation_states()))
    });
}

fn bench_load(c: &mut Criterion) {
    let svg = flipbook(32, 120);
    c.bench_function("load_32_tracks", |b| {
        b.iter(|| {
            let mut ctl = AnimationController::new();
            ctl.load_from_content(black_box(&svg)).unwrap();
            ctl
        })
    });
}

criterion_group!(benches, bench_update, bench_load);
criterion_main!(benches);
