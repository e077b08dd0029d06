//! Kernel evaluation and small training benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maxmargin::{Dataset, KernelSpec, Sample, Svm};

fn make_vector(seed: u64, dim: usize) -> Vec<f64> {
    // Cheap deterministic pseudo-random features
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..dim)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

fn bench_kernels(c: &mut Criterion) {
    let a = make_vector(1, 256);
    let b = make_vector(2, 256);

    let kernels = [
        ("linear", KernelSpec::Linear),
        (
            "polynomial",
            KernelSpec::Polynomial {
                degree: 3,
                gamma: 0.5,
                coef0: 1.0,
            },
        ),
        ("rbf", KernelSpec::Rbf { gamma: 0.5 }),
        (
            "sigmoid",
            KernelSpec::Sigmoid {
                gamma: 0.5,
                coef0: 0.0,
            },
        ),
    ];

    let mut group = c.benchmark_group("kernel_evaluate_256d");
    for (name, kernel) in kernels {
        group.bench_function(name, |bencher| {
            bencher.iter(|| kernel.evaluate(black_box(&a), black_box(&b)).unwrap())
        });
    }
    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let samples: Vec<Sample> = (0..60)
        .map(|i| {
            let label = (i % 3) as u32 + 1;
            let mut features = make_vector(i as u64, 8);
            // Shift each class into its own region so the problem is solvable
            features[0] += label as f64 * 2.0;
            Sample::new(features, label)
        })
        .collect();
    let dataset = Dataset::from_samples(samples).unwrap();

    c.bench_function("train_3_class_rbf_60x8", |bencher| {
        bencher.iter(|| {
            Svm::new()
                .with_kernel(KernelSpec::Rbf { gamma: 1.0 })
                .with_scaling(true)
                .train(black_box(&dataset))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_kernels, bench_training);
criterion_main!(benches);
