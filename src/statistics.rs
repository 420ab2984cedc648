// statistics.rs - error analysis for Monte Carlo time series

use crate::error::{Error, Result};

/// Sokal window factor: the sum stops at the first W with W ≥ C·τ_int(W).
const WINDOW_FACTOR: f64 = 6.0;

fn require(data: &[f64], needed: usize) -> Result<()> {
    if data.len() < needed {
        Err(Error::InsufficientSamples { needed, found: data.len() })
    } else {
        Ok(())
    }
}

fn require_same_length(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        Err(Error::LengthMismatch { left: a.len(), right: b.len() })
    } else {
        Ok(())
    }
}

/// Undefined for fewer than two samples.
pub fn mean(data: &[f64]) -> Result<f64> {
    require(data, 2)?;
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Naive standard error of the mean, ignoring autocorrelation.
pub fn std_error(data: &[f64]) -> Result<f64> {
    require(data, 2)?;
    let n = data.len() as f64;
    let m = mean(data)?;
    let var = data.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (n - 1.0);
    Ok((var / n).sqrt())
}

/// Integrated autocorrelation time τ_int = ½ + Σ_{t=1}^{W} ρ(t) with
/// automatic windowing (A.D. Sokal, 1989). A constant series gives ½.
pub fn autocorr_time(data: &[f64]) -> Result<f64> {
    require(data, 2)?;
    let n = data.len();
    let m = mean(data)?;

    let c0 = data.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / n as f64;
    if c0 <= 0.0 {
        return Ok(0.5);
    }

    let mut tau = 0.5;
    for t in 1..n {
        let ct = data[..n - t]
            .iter()
            .zip(&data[t..])
            .map(|(&x, &y)| (x - m) * (y - m))
            .sum::<f64>()
            / (n - t) as f64;
        tau += ct / c0;

        if t as f64 >= WINDOW_FACTOR * tau {
            break;
        }
    }
    Ok(tau)
}

/// Jackknife estimate: mean and error of the leave-one-out values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jackknife {
    pub mean: f64,
    pub error: f64,
}

impl Jackknife {
    /// error = √(N-1) · (population) stdev of the leave-one-out values.
    fn from_samples(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        Self { mean, error: ((n - 1.0) * var).sqrt() }
    }
}

/// Jackknife for `f` of the series mean.
pub fn jackknife<F>(data: &[f64], f: F) -> Result<Jackknife>
where
    F: Fn(f64) -> f64,
{
    require(data, 2)?;
    let n = data.len() as f64;
    let sum: f64 = data.iter().sum();
    let values: Vec<f64> = data.iter().map(|&x| f((sum - x) / (n - 1.0))).collect();
    Ok(Jackknife::from_samples(&values))
}

/// Jackknife for `f` of two series means; leave-one-out sample i drops
/// index i from both series.
pub fn jackknife_pair<F>(a: &[f64], b: &[f64], f: F) -> Result<Jackknife>
where
    F: Fn(f64, f64) -> f64,
{
    require_same_length(a, b)?;
    require(a, 2)?;
    let n = a.len() as f64;
    let sum_a: f64 = a.iter().sum();
    let sum_b: f64 = b.iter().sum();
    let values: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(&xa, &xb)| f((sum_a - xa) / (n - 1.0), (sum_b - xb) / (n - 1.0)))
        .collect();
    Ok(Jackknife::from_samples(&values))
}

/// U4 = 3/2 (1 - ⟨m⁴⟩ / 3⟨m²⟩²), normalized so the ordered phase gives 1.
#[inline(always)]
pub fn u4(m2: f64, m4: f64) -> f64 {
    1.5 * (1.0 - m4 / (3.0 * m2 * m2))
}

/// χ = ⟨m²⟩ - ⟨|m|⟩².
#[inline(always)]
pub fn chi(m2: f64, m_abs: f64) -> f64 {
    m2 - m_abs * m_abs
}

pub fn binder_cumulant(m2: &[f64], m4: &[f64]) -> Result<f64> {
    require_same_length(m2, m4)?;
    Ok(u4(mean(m2)?, mean(m4)?))
}

pub fn jackknife_binder_cumulant(m2: &[f64], m4: &[f64]) -> Result<Jackknife> {
    jackknife_pair(m2, m4, u4)
}

pub fn susceptibility(m2: &[f64], m_abs: &[f64]) -> Result<f64> {
    require_same_length(m2, m_abs)?;
    Ok(chi(mean(m2)?, mean(m_abs)?))
}

pub fn jackknife_susceptibility(m2: &[f64], m_abs: &[f64]) -> Result<Jackknife> {
    jackknife_pair(m2, m_abs, chi)
}

/// Streaming accumulator for one observable.
///
/// Mean and error come from running sums; the full history is kept for the
/// autocorrelation and jackknife estimators.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    samples: Vec<f64>,
    sum: f64,
    sum2: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: f64) {
        self.samples.push(value);
        self.sum += value;
        self.sum2 += value * value;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<f64> {
        self.samples.last().copied()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn mean(&self) -> Result<f64> {
        require(&self.samples, 2)?;
        Ok(self.sum / self.len() as f64)
    }

    /// √((⟨x²⟩ - ⟨x⟩²) / (N - 1)).
    pub fn error(&self) -> Result<f64> {
        require(&self.samples, 2)?;
        let n = self.len() as f64;
        let mean = self.sum / n;
        // rounding can leave a tiny negative variance
        let var = (self.sum2 / n - mean * mean).max(0.0);
        Ok((var / (n - 1.0)).sqrt())
    }

    /// τ_int over the whole history.
    pub fn autocorr_time(&self) -> Result<f64> {
        autocorr_time(&self.samples)
    }

    /// τ_int over the first half of the history.
    pub fn autocorr_front(&self) -> Result<f64> {
        require(&self.samples, 4)?;
        autocorr_time(&self.samples[..self.len() / 2])
    }

    /// τ_int over the second half of the history.
    pub fn autocorr_back(&self) -> Result<f64> {
        require(&self.samples, 4)?;
        autocorr_time(&self.samples[self.len() / 2..])
    }

    pub fn jackknife_mean(&self) -> Result<Jackknife> {
        jackknife(&self.samples, |m| m)
    }

    pub fn jackknife<F: Fn(f64) -> f64>(&self, f: F) -> Result<Jackknife> {
        jackknife(&self.samples, f)
    }

    /// Two-series jackknife against another accumulator of equal length.
    pub fn jackknife_with<F: Fn(f64, f64) -> f64>(&self, other: &Accumulator, f: F) -> Result<Jackknife> {
        jackknife_pair(&self.samples, &other.samples, f)
    }

    pub fn summary(&self, name: &str) -> Result<Summary> {
        Ok(Summary {
            name: name.to_string(),
            value: self.mean()?,
            error: self.error()?,
            tau_front: self.autocorr_front().ok(),
            tau_back: self.autocorr_back().ok(),
            n: self.len(),
        })
    }
}

/// One row of the final results table.
#[derive(Debug, Clone)]
pub struct Summary {
    pub name: String,
    pub value: f64,
    pub error: f64,
    pub tau_front: Option<f64>,
    pub tau_back: Option<f64>,
    pub n: usize,
}

impl Summary {
    /// Row for a derived (jackknifed) quantity.
    pub fn derived(name: &str, jk: Jackknife, value: f64, n: usize) -> Self {
        Self {
            name: name.to_string(),
            value,
            error: jk.error,
            tau_front: None,
            tau_back: None,
            n,
        }
    }

    pub fn format_row(&self) -> String {
        let tau = |t: Option<f64>| t.map_or_else(|| "-".to_string(), |t| format!("{t:.4}"));
        format!(
            "{:<16} {:>+20.12e} {:>20.12e} {:>10} {:>10} {:>8}",
            self.name,
            self.value,
            self.error,
            tau(self.tau_front),
            tau(self.tau_back),
            self.n
        )
    }
}

pub fn print_summary_table(rows: &[Summary]) {
    println!("\n{:=<90}", "");
    println!(
        "{:<16} {:>20} {:>20} {:>10} {:>10} {:>8}",
        "Observable", "Value", "Error", "τ_front", "τ_back", "N"
    );
    println!("{:-<90}", "");
    for row in rows {
        println!("{}", row.format_row());
    }
    println!("{:=<90}", "");
}
