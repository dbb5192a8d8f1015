#![allow(dead_code)]
use cvboot::Dataset;
use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub(crate) fn create_data(n_samples: usize, n_features: usize) -> Dataset {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let feature_distribution = Uniform::new(0.0, 1.0);
    let noise_distribution = Uniform::new(-1.0, 1.0);
    let weight_distribution = Uniform::new(-1.0, 1.0);

    let weights: Vec<f64> = (0..n_features).map(|_| rng.sample(weight_distribution)).collect();

    let columns: Vec<Vec<f64>> = (0..n_features)
        .map(|_| (0..n_samples).map(|_| rng.sample(feature_distribution)).collect())
        .collect();

    // linear model + uniform noise
    let target: Vec<f64> = (0..n_samples)
        .map(|i| {
            let linear: f64 = columns.iter().zip(&weights).map(|(c, w)| c[i] * w).sum();
            linear + rng.sample(noise_distribution)
        })
        .collect();

    let names = (0..n_features).map(|j| format!("x{}", j)).collect();
    Dataset::new(names, columns, "totpay", target).expect("generated columns have equal length")
}

pub(crate) fn predictions(n_samples: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(2024);
    (0..n_samples).map(|_| rng.gen_range(0.0..1000.0)).collect()
}
