use approx::assert_abs_diff_eq;
use core::f64::consts::PI;
use dd_rs::kernel::KernelLifecycle;
use dd_rs::na::DMatrix;
use dd_rs::signal::traits::{Denoise1D, Differentiate1D, FourierSeriesFit1D};
use dd_rs::signal::{
    dft_matrix, fftshift, finite_difference, shift_index, DenoiseConfig, DenoiseKernel,
    FourierSeriesConfig, FourierSeriesKernel, SpectralDerivativeConfig, SpectralDerivativeKernel,
};
use dd_rs::stats::{TruncationConfig, TruncationKernel, TruncationSelect1D};
use dd_rs::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn rms(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    (sum / a.len() as f64).sqrt()
}

#[test]
fn noisy_two_tone_is_denoised() {
    let dt = 0.001;
    let n = 1000;
    let clean: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            (2.0 * PI * 50.0 * t).sin() + (2.0 * PI * 120.0 * t).sin()
        })
        .collect();

    // uniform noise with the variance of a 2.5 sigma Gaussian
    let half_width = 2.5 * 3f64.sqrt();
    let mut rng = StdRng::seed_from_u64(2024);
    let noisy: Vec<f64> = clean
        .iter()
        .map(|v| v + rng.random_range(-half_width..half_width))
        .collect();

    let kernel = DenoiseKernel::try_new(DenoiseConfig {
        threshold: 100.0,
        sample_spacing: dt,
    })
    .expect("valid config");
    let result = kernel.run_alloc(&noisy).expect("valid");

    assert_eq!(result.kept, 4);
    for bin in [50, 120, 880, 950] {
        assert!(result.psd_clean[bin] > 100.0);
    }
    assert!(rms(&noisy, &clean) > 2.0);
    assert!(rms(&result.filtered, &clean) < 0.3);

    let centred = fftshift(&result.frequencies);
    assert_abs_diff_eq!(centred[0], -500.0, epsilon = 1e-9);
    assert_abs_diff_eq!(centred[n / 2], 0.0, epsilon = 1e-12);
}

#[test]
fn wave_packet_derivative_real_and_complex_agree() {
    let (n, l) = (128, 30.0);
    let dx = l / n as f64;
    let x: Vec<f64> = (0..n).map(|i| -l / 2.0 + i as f64 * dx).collect();
    let f: Vec<f64> = x.iter().map(|v| v.cos() * (-v * v / 25.0).exp()).collect();
    let exact: Vec<f64> = x
        .iter()
        .zip(f.iter())
        .map(|(v, fv)| -(v.sin() * (-v * v / 25.0).exp() + 2.0 / 25.0 * v * fv))
        .collect();

    let kernel =
        SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length: l }).expect("valid");
    let real: Vec<f64> = kernel.run_alloc(&f).expect("valid");
    let lifted: Vec<Complex<f64>> = f.iter().map(|&v| Complex::new(v, 0.0)).collect();
    let complex: Vec<Complex<f64>> = kernel.run_alloc(&lifted).expect("valid");

    for (r, c) in real.iter().zip(complex.iter()) {
        assert_abs_diff_eq!(*r, c.re, epsilon = 1e-12);
    }
    let fd = finite_difference(&f, dx).expect("valid");
    assert!(rms(&real, &exact) < rms(&fd, &exact));
}

#[test]
fn hat_function_truncation_point() {
    let n = 2000;
    let dx = 0.001;
    let x: Vec<f64> = (0..n).map(|i| PI * (-1.0 + (i + 1) as f64 * dx)).collect();
    let q = n / 4;
    let f: Vec<f64> = (0..n)
        .map(|i| {
            if (q..2 * q).contains(&i) {
                (i - q + 1) as f64 * 4.0 / n as f64
            } else if (2 * q..3 * q).contains(&i) {
                1.0 - (i - 2 * q) as f64 * 4.0 / n as f64
            } else {
                0.0
            }
        })
        .collect();

    let series = FourierSeriesKernel::try_new(FourierSeriesConfig {
        half_period: PI,
        terms: 99,
    })
    .expect("valid config")
    .run_alloc(&x, &f)
    .expect("valid");
    let errors = series.relative_errors(&x, &f).expect("valid");
    assert_eq!(errors.len(), 100);

    let kernel = TruncationKernel::try_new(TruncationConfig {
        scale: 4.0 / 3f64.sqrt(),
    })
    .expect("valid config");
    assert_eq!(kernel.run(&errors).expect("valid"), Some(5));
}

#[test]
fn dft_matrix_is_scaled_unitary() {
    let n = 16;
    let f = dft_matrix(n).expect("valid");
    let gram = &f * f.adjoint();
    let expected = DMatrix::from_diagonal_element(n, n, Complex::new(n as f64, 0.0));
    for (a, b) in gram.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
        assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-9);
    }

    // the zero-frequency row sits in the middle of the centred ordering
    assert_eq!(shift_index(n / 2, n).expect("valid"), 0);
}
