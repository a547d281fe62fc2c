//! Benchmarks for a busy assistant session in virtual time.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sidekick_animation_core::{Animation, AssistantData, Config, Frame, NoAudio};
use sidekick_orchestrator::{Assistant, AssistantConfig};

fn bench_data() -> AssistantData {
    let frames = |n: usize| (0..n).map(|_| Frame::new(50)).collect::<Vec<_>>();
    AssistantData::new("Bench", [64, 64])
        .with_animation("Show", Animation::new(frames(2)))
        .with_animation("Idle1", Animation::new(frames(6)))
        .with_animation("Idle2", Animation::new(frames(4)))
        .with_animation("Wave", Animation::new(frames(8)))
        .with_animation(
            "MoveLeft",
            Animation::new(vec![
                Frame::new(50).with_exit_branch(2),
                Frame::new(50).with_exit_branch(0),
                Frame::new(50),
            ])
            .with_exit_branching(),
        )
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("assistant_session");
    let data = bench_data();
    let cfg = AssistantConfig {
        animation: Config {
            muted: true,
            seed: Some(11),
        },
        ..AssistantConfig::default()
    };

    for tasks in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(tasks), &tasks, |b, &tasks| {
            b.iter(|| {
                let mut a = Assistant::new(data.clone(), cfg.clone(), &NoAudio).expect("bench data");
                a.set_viewport(1_024.0, 768.0);
                a.set_position(500.0, 300.0);
                a.show(true);
                for i in 0..tasks {
                    match i % 3 {
                        0 => {
                            a.play("Wave");
                        }
                        1 => {
                            let x = (i * 37 % 900) as f64;
                            a.move_to_with(x, 200.0, 300).expect("placed");
                        }
                        _ => a.speak("one two three", false),
                    }
                }
                a.advance(black_box(60_000));
                black_box(a.take_events());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
