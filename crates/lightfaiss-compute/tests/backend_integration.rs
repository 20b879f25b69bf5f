//! Integration tests for compute backends.
//!
//! Both backends are checked against the scalar reference scores. The
//! accelerator pipeline runs on a host-device ComputeManager.

use lightfaiss_compute::{
    available_backends, norm_l2_squared, select_backend, ComputeConfig, ComputeManager,
    DevicePreference, DeviceType, MatrixView, MetricType,
};

/// Deterministic floats in [-1, 1).
fn pseudo_random(n: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_add(0x9e37_79b9);
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

fn assert_close(a: f32, b: f32) {
    let tolerance = 1e-4 * a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= tolerance, "{} vs {}", a, b);
}

#[test]
fn test_backends_match_reference_scores() {
    let manager = ComputeManager::cpu();
    let dim = 32;
    let queries = pseudo_random(7 * dim, 1);
    let candidates = pseudo_random(90 * dim, 2);
    let q = MatrixView::new(&queries, dim).unwrap();
    let c = MatrixView::new(&candidates, dim).unwrap();

    for metric in [MetricType::InnerProduct, MetricType::L2Squared] {
        let expected = metric.score_matrix(q, c).unwrap();
        for device in available_backends(Some(&manager)) {
            let backend = select_backend(device, Some(&manager)).unwrap();
            let scores = backend.compute_scores(q, c, metric).unwrap();
            assert_eq!((scores.rows(), scores.cols()), (7, 90));
            for (a, b) in scores.as_slice().iter().zip(expected.as_slice()) {
                assert_close(*a, *b);
            }
        }
    }
}

#[test]
fn test_normalize_large_batch_on_both_backends() {
    let manager = ComputeManager::cpu();
    let dim = 4;
    let rows = 12_000;
    let original = pseudo_random(rows * dim, 3);

    for device in [DeviceType::CpuBlas, DeviceType::GpuCompute] {
        let mut data = original.clone();
        // A zero row stays zero
        data[..dim].fill(0.0);

        let backend = select_backend(device, Some(&manager)).unwrap();
        backend.normalize_l2(&mut data, dim).unwrap();

        assert_eq!(&data[..dim], &[0.0; 4]);
        for row in data.chunks(dim).skip(1).step_by(997) {
            assert!((norm_l2_squared(row) - 1.0).abs() < 1e-4);
        }
    }
}

#[test]
fn test_cpu_preference_manager() {
    let manager = ComputeManager::new(&ComputeConfig::new(DevicePreference::Cpu)).unwrap();
    assert!(!manager.is_accelerated());
    assert_eq!(manager.device_name(), "cpu");
}
