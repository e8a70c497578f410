use anyhow::{anyhow, bail, Context, Result};
use dd_rs::kernel::KernelLifecycle;
use dd_rs::linalg::{
    factorize, lstsq as lstsq_baseline, Factorize2D, LeastSquaresSolve2D, LowRankApprox2D,
    SvdConfig, SvdKernel, SvdSolveConfig, SvdSolveKernel, TruncatedSvdConfig, TruncatedSvdKernel,
};
use dd_rs::na::DMatrix;
use dd_rs::signal::traits::{Denoise1D, Differentiate1D, SpectralTransform1D};
use dd_rs::signal::{
    differentiate, fftfreq, forward, forward_real, frequency_index, inverse, mask_by_threshold,
    normalize, power_spectral_density, real_part, to_complex, wavenumbers, DenoiseConfig,
    DenoiseKernel, SpectralConfig, SpectralDerivativeConfig, SpectralDerivativeKernel,
    SpectralTransform,
};
use dd_rs::Complex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";
const PYTHON_BIN_ENV: &str = "DD_RS_PYTHON";

const PY_NUMPY_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np

env = json.loads(sys.stdin.read())
op = env["op"]
iters = int(env["iters"])
p = env["payload"]

def _as_array(key):
    return np.asarray(p[key], dtype=float)

def _flat(v):
    return np.asarray(v, dtype=float).reshape(-1)

def _split(z):
    z = np.asarray(z, dtype=complex).reshape(-1)
    return np.concatenate([z.real, z.imag])

def _compute():
    if op == "svd_values":
        return np.linalg.svd(_as_array("a"), compute_uv=False)
    if op == "svd_reconstruct":
        u, s, vt = np.linalg.svd(_as_array("a"), full_matrices=False)
        r = int(p["rank"])
        return (u[:, :r] * s[:r]) @ vt[:r, :]
    if op == "lstsq":
        return np.linalg.lstsq(_as_array("a"), _as_array("b"), rcond=None)[0]
    if op == "fft":
        return _split(np.fft.fft(_as_array("x")))
    if op == "fftfreq":
        return np.fft.fftfreq(int(p["n"]), d=float(p["d"]))
    if op == "psd":
        x = _as_array("x")
        c = np.fft.fft(x)
        return (c * np.conj(c)).real / len(x)
    if op == "denoise":
        x = _as_array("x")
        n = len(x)
        c = np.fft.fft(x)
        psd = (c * np.conj(c)).real / n
        c = c * (psd > float(p["threshold"]))
        return np.fft.ifft(c).real
    if op == "spectral_derivative":
        x = _as_array("x")
        n = len(x)
        kappa = (2 * np.pi / float(p["length"])) * np.fft.fftfreq(n, d=1.0 / n)
        return np.fft.ifft(1j * kappa * np.fft.fft(x)).real

    raise RuntimeError(f"unsupported op: {op}")

y = _flat(_compute())

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": y.tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
    speedup_vs_baseline: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    rows: Vec<ContractRow>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            eprintln!();
            eprintln!("Set {PYTHON_BIN_ENV} to choose the interpreter (default: {DEFAULT_PYTHON_BIN}).");
            Ok(())
        }
    }
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();

    // Shared synthetic inputs.
    let matrix = DMatrix::from_fn(40, 24, |i, j| {
        let (x, y) = (i as f64 / 7.0, j as f64 / 5.0);
        (x + 0.3 * y).sin() + 0.5 * (x * y).cos() + 0.05 * (i * j % 7) as f64
    });
    let rhs = DMatrix::from_fn(40, 1, |i, _| (i as f64 / 3.0).cos() + 0.1 * i as f64);
    let signal: Vec<f64> = (0..512)
        .map(|i| {
            let t = i as f64 / 512.0;
            (2.0 * std::f64::consts::PI * 12.0 * t).sin()
                + 0.35 * (2.0 * std::f64::consts::PI * 40.0 * t).cos()
                + 0.2 * (i as f64 * 1.37).sin()
        })
        .collect();

    // Singular values
    {
        let case_id = "svd_singular_values";
        let kernel = SvdKernel::try_new(SvdConfig { max_iterations: 0 })?;
        let candidate = kernel
            .run(&matrix)
            .map_err(|e| anyhow!("svd candidate execution failed: {e}"))?
            .singular_values()
            .as_slice()
            .to_vec();
        let baseline = factorize(&matrix)
            .map_err(|e| anyhow!("svd baseline execution failed: {e}"))?
            .singular_values()
            .as_slice()
            .to_vec();
        let py = python_numpy_eval(
            &python_bin,
            "svd_values",
            json!({ "a": matrix_rows(&matrix) }),
            100,
        )?;

        let candidate_ns = benchmark_avg_ns(60, || {
            kernel
                .run(&matrix)
                .map(|_| ())
                .map_err(|e| anyhow!("svd candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(60, || {
            factorize(&matrix)
                .map(|_| ())
                .map_err(|e| anyhow!("svd baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // Rank-4 reconstruction
    {
        let case_id = "svd_rank4_reconstruction";
        let rank = 4;
        let kernel = TruncatedSvdKernel::try_new(TruncatedSvdConfig {
            rank,
            max_iterations: 0,
        })?;
        let candidate = flatten_matrix_row_major(
            &kernel
                .run(&matrix)
                .map_err(|e| anyhow!("reconstruction candidate failed: {e}"))?,
        );
        let baseline = flatten_matrix_row_major(
            &factorize(&matrix)
                .and_then(|svd| svd.reconstruct(rank))
                .map_err(|e| anyhow!("reconstruction baseline failed: {e}"))?,
        );
        let py = python_numpy_eval(
            &python_bin,
            "svd_reconstruct",
            json!({ "a": matrix_rows(&matrix), "rank": rank }),
            100,
        )?;

        let candidate_ns = benchmark_avg_ns(60, || {
            kernel
                .run(&matrix)
                .map(|_| ())
                .map_err(|e| anyhow!("reconstruction candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(60, || {
            factorize(&matrix)
                .and_then(|svd| svd.reconstruct(rank))
                .map(|_| ())
                .map_err(|e| anyhow!("reconstruction baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // Least squares
    {
        let case_id = "lstsq_40x24";
        let svd = factorize(&matrix).map_err(|e| anyhow!("lstsq factorization failed: {e}"))?;
        let kernel = SvdSolveKernel::try_new(SvdSolveConfig::default())?;
        let candidate = kernel
            .run(&svd, &rhs)
            .map_err(|e| anyhow!("lstsq candidate failed: {e}"))?
            .as_slice()
            .to_vec();
        let baseline = lstsq_baseline(&matrix, &rhs)
            .map_err(|e| anyhow!("lstsq baseline failed: {e}"))?
            .as_slice()
            .to_vec();
        let py = python_numpy_eval(
            &python_bin,
            "lstsq",
            json!({ "a": matrix_rows(&matrix), "b": rhs.as_slice() }),
            100,
        )?;

        let candidate_ns = benchmark_avg_ns(120, || {
            kernel
                .run(&svd, &rhs)
                .map(|_| ())
                .map_err(|e| anyhow!("lstsq candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(60, || {
            lstsq_baseline(&matrix, &rhs)
                .map(|_| ())
                .map_err(|e| anyhow!("lstsq baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // Forward FFT
    {
        let case_id = "fft_forward_512";
        let lifted = to_complex(&signal);
        let kernel = SpectralTransform::try_new(SpectralConfig { len: signal.len() })?;
        let candidate = split_complex(
            &kernel
                .forward_alloc(&lifted)
                .map_err(|e| anyhow!("fft candidate failed: {e}"))?,
        );
        let baseline =
            split_complex(&forward(&lifted).map_err(|e| anyhow!("fft baseline failed: {e}"))?);
        let py = python_numpy_eval(&python_bin, "fft", json!({ "x": signal }), 400)?;

        let mut out = vec![Complex::new(0.0, 0.0); signal.len()];
        let candidate_ns = benchmark_avg_ns(400, || {
            kernel
                .forward_into(&lifted, &mut out)
                .map_err(|e| anyhow!("fft candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(400, || {
            forward(&lifted)
                .map(|_| ())
                .map_err(|e| anyhow!("fft baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // Frequency axis
    {
        let case_id = "fftfreq_odd_and_even";
        let d = 0.01;
        let mut candidate = Vec::new();
        let mut baseline = Vec::new();
        let mut py_output = Vec::new();
        let mut python_ns = 0.0;
        let mut version = None;
        for n in [255usize, 256] {
            candidate.extend(fftfreq(n, d).map_err(|e| anyhow!("fftfreq candidate failed: {e}"))?);
            for bin in 0..n {
                let k = frequency_index(bin, n)
                    .map_err(|e| anyhow!("fftfreq baseline failed: {e}"))?;
                baseline.push(k as f64 / (n as f64 * d));
            }
            let py = python_numpy_eval(&python_bin, "fftfreq", json!({ "n": n, "d": d }), 400)?;
            py_output.extend(py.output.iter().copied());
            python_ns += py.avg_ns;
            version = Some(py);
        }
        let py = PythonEval {
            output: py_output,
            avg_ns: python_ns,
            ..version.context("fftfreq case produced no python evaluation")?
        };

        let candidate_ns = benchmark_avg_ns(400, || {
            for n in [255usize, 256] {
                fftfreq(n, d).map_err(|e| anyhow!("fftfreq candidate benchmark failed: {e}"))?;
            }
            Ok(())
        })?;
        let baseline_ns = benchmark_avg_ns(400, || {
            for n in [255usize, 256] {
                for bin in 0..n {
                    frequency_index(bin, n)
                        .map_err(|e| anyhow!("fftfreq baseline benchmark failed: {e}"))?;
                }
            }
            Ok(())
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // Power spectral density
    {
        let case_id = "psd_512";
        let n = signal.len();
        let denoise = DenoiseKernel::try_new(DenoiseConfig {
            threshold: f64::NEG_INFINITY,
            sample_spacing: 1.0 / n as f64,
        })?;
        let candidate = denoise
            .run_alloc(&signal)
            .map_err(|e| anyhow!("psd candidate failed: {e}"))?
            .psd;
        let baseline = forward_real(&signal)
            .and_then(|c| power_spectral_density(&c, n))
            .map_err(|e| anyhow!("psd baseline failed: {e}"))?;
        let py = python_numpy_eval(&python_bin, "psd", json!({ "x": signal }), 400)?;

        let candidate_ns = benchmark_avg_ns(200, || {
            denoise
                .run_alloc(&signal)
                .map(|_| ())
                .map_err(|e| anyhow!("psd candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(200, || {
            forward_real(&signal)
                .and_then(|c| power_spectral_density(&c, n))
                .map(|_| ())
                .map_err(|e| anyhow!("psd baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // PSD-threshold denoise
    {
        let case_id = "denoise_threshold_20";
        let threshold = 20.0;
        let n = signal.len();
        let kernel = DenoiseKernel::try_new(DenoiseConfig {
            threshold,
            sample_spacing: 1.0 / n as f64,
        })?;
        let candidate = kernel
            .run_alloc(&signal)
            .map_err(|e| anyhow!("denoise candidate failed: {e}"))?
            .filtered;
        let baseline_pipeline = || -> dd_rs::Result<Vec<f64>> {
            let coeffs = forward_real(&signal)?;
            let psd = power_spectral_density(&coeffs, n)?;
            let masked = mask_by_threshold(&coeffs, &psd, threshold)?;
            Ok(real_part(&normalize(&inverse(&masked)?)))
        };
        let baseline =
            baseline_pipeline().map_err(|e| anyhow!("denoise baseline failed: {e}"))?;
        let py = python_numpy_eval(
            &python_bin,
            "denoise",
            json!({ "x": signal, "threshold": threshold }),
            400,
        )?;

        let mut out = vec![0.0; n];
        let candidate_ns = benchmark_avg_ns(200, || {
            kernel
                .run_into(&signal, &mut out)
                .map_err(|e| anyhow!("denoise candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(200, || {
            baseline_pipeline()
                .map(|_| ())
                .map_err(|e| anyhow!("denoise baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    // Spectral derivative
    {
        let case_id = "spectral_derivative_128";
        let (n, length) = (128usize, 30.0);
        let dx = length / n as f64;
        let f: Vec<f64> = (0..n)
            .map(|i| {
                let x = -length / 2.0 + i as f64 * dx;
                x.cos() * (-x * x / 25.0).exp()
            })
            .collect();
        let kernel = SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length })?;
        let candidate: Vec<f64> = kernel
            .run_alloc(&f)
            .map_err(|e| anyhow!("derivative candidate failed: {e}"))?;
        let baseline_pipeline = || -> dd_rs::Result<Vec<f64>> {
            let coeffs = forward_real(&f)?;
            let kappa = wavenumbers(n, length)?;
            let scaled = differentiate(&coeffs, &kappa)?;
            Ok(real_part(&normalize(&inverse(&scaled)?)))
        };
        let baseline =
            baseline_pipeline().map_err(|e| anyhow!("derivative baseline failed: {e}"))?;
        let py = python_numpy_eval(
            &python_bin,
            "spectral_derivative",
            json!({ "x": f, "length": length }),
            400,
        )?;

        let mut out: Vec<f64> = vec![0.0; n];
        let candidate_ns = benchmark_avg_ns(400, || {
            kernel
                .run_into(&f, &mut out)
                .map_err(|e| anyhow!("derivative candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(400, || {
            baseline_pipeline()
                .map(|_| ())
                .map_err(|e| anyhow!("derivative baseline benchmark failed: {e}"))
        })?;

        record_case(&mut rows, case_id, candidate, baseline, py, candidate_ns, baseline_ns)?;
    }

    let version_probe = python_versions(&python_bin)?;
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.to_string_lossy().into_owned(),
        python_version: version_probe.python_version,
        numpy_version: version_probe.numpy_version,
        rows,
    };

    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_vec_pretty(&bundle).context("serializing summary bundle")?,
    )
    .context("writing summary.json")?;

    println!("Contract artifacts generated in: {}", out_dir.display());
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", out_dir.join("summary.json").display());
    println!("  - cases: {}", bundle.rows.len());

    Ok(())
}

fn detect_python_bin() -> PathBuf {
    std::env::var_os(PYTHON_BIN_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON_BIN))
}

fn python_versions(python_bin: &Path) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        r#"
import json, sys
import numpy
payload = json.loads(sys.stdin.read())
print(json.dumps({
    "output": [],
    "avg_ns": 0.0,
    "python_version": sys.version.split()[0],
    "numpy_version": numpy.__version__
}))
"#,
        json!({}),
    )
}

fn python_numpy_eval(
    python_bin: &Path,
    op: &str,
    payload: serde_json::Value,
    iters: usize,
) -> Result<PythonEval> {
    run_python_eval(
        python_bin,
        PY_NUMPY_SCRIPT,
        json!({
            "op": op,
            "iters": iters,
            "payload": payload
        }),
    )
}

fn run_python_eval(
    python_bin: &Path,
    script: &str,
    payload: serde_json::Value,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&payload).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    let parsed: PythonEval = serde_json::from_str(stdout.trim()).context("parsing python json")?;
    Ok(parsed)
}

fn record_case(
    rows: &mut Vec<ContractRow>,
    case_id: &str,
    candidate: Vec<f64>,
    baseline: Vec<f64>,
    py: PythonEval,
    candidate_ns: f64,
    baseline_ns: f64,
) -> Result<()> {
    ensure_same_length(case_id, &candidate, &baseline)?;
    ensure_same_length(case_id, &candidate, &py.output)?;

    rows.push(build_row(RowBuildInput {
        case_id,
        rust_candidate: &candidate,
        python_reference: &py.output,
        rust_candidate_ns: candidate_ns,
        rust_baseline_ns: baseline_ns,
        python_ns: py.avg_ns,
    }));
    Ok(())
}

/// Nested row lists, the layout `np.asarray` expects for a 2D array.
fn matrix_rows(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

fn flatten_matrix_row_major(matrix: &DMatrix<f64>) -> Vec<f64> {
    matrix_rows(matrix).into_iter().flatten().collect()
}

/// Real parts followed by imaginary parts.
fn split_complex(values: &[Complex<f64>]) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.re)
        .chain(values.iter().map(|v| v.im))
        .collect()
}

fn ensure_same_length(case_id: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        bail!(
            "case {case_id} has mismatched output lengths: left={}, right={}",
            a.len(),
            b.len()
        );
    }
    Ok(())
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

struct RowBuildInput<'a> {
    case_id: &'a str,
    rust_candidate: &'a [f64],
    python_reference: &'a [f64],
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
}

fn build_row(args: RowBuildInput<'_>) -> ContractRow {
    let pearson_r = pearson(args.rust_candidate, args.python_reference);
    let mae = mean_abs_error(args.rust_candidate, args.python_reference);
    let rmse = root_mean_squared_error(args.rust_candidate, args.python_reference);
    let max_abs = max_abs_error(args.rust_candidate, args.python_reference);
    ContractRow {
        case_id: args.case_id.to_string(),
        pearson_r,
        mae,
        rmse,
        max_abs,
        rust_candidate_ns: args.rust_candidate_ns,
        rust_baseline_ns: args.rust_baseline_ns,
        python_ns: args.python_ns,
        speedup_vs_baseline: args.rust_baseline_ns / args.rust_candidate_ns,
        speedup_vs_python: args.python_ns / args.rust_candidate_ns,
    }
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,pearson_r,mae,rmse,max_abs,rust_candidate_ns,rust_baseline_ns,python_ns,speedup_vs_baseline,speedup_vs_python\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.12},{:.12},{:.12},{:.12},{:.3},{:.3},{:.3},{:.6},{:.6}\n",
            row.case_id,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.rust_candidate_ns,
            row.rust_baseline_ns,
            row.python_ns,
            row.speedup_vs_baseline,
            row.speedup_vs_python,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
