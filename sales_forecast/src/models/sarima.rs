//! Seasonal autoregressive-integrated model for weekly sales series
//!
//! Estimation is conditional: the series is differenced (seasonally
//! first, then regularly), AR coefficients come from the Yule-Walker
//! equations solved with Levinson-Durbin, and MA coefficients from the
//! autocorrelation of the AR residuals. Coefficients are clamped instead
//! of constrained, so short or noisy retail series never fail on
//! stationarity checks.

use crate::error::{ForecastError, Result};

/// Coefficients are kept strictly inside the unit interval so forecast
/// recursions cannot blow up on borderline estimates.
const COEFF_LIMIT: f64 = 0.99;

/// Autoregressive-integrated model, optionally with one multiplicative
/// seasonal (1,1,1) component at a fixed period.
#[derive(Debug, Clone)]
pub struct Sarima {
    name: String,
    p: usize,
    d: usize,
    q: usize,
    seasonal_period: Option<usize>,
}

/// Fitted model state
#[derive(Debug, Clone)]
pub struct TrainedSarima {
    name: String,
    d: usize,
    seasonal_period: Option<usize>,
    /// Raw training series
    original: Vec<f64>,
    /// Differencing stages: stage 0 is the (seasonally differenced)
    /// series, stage k is the k-times regularly differenced series
    stages: Vec<Vec<f64>>,
    /// Mean of the fully differenced series
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: f64,
    seasonal_ma: f64,
    /// In-sample one-step residuals of the fully differenced series
    residuals: Vec<f64>,
}

impl Sarima {
    /// Create a non-seasonal model of the given (p, d, q) order
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p + d + q == 0 {
            return Err(ForecastError::InvalidInput(
                "Model order (0,0,0) has nothing to estimate".to_string(),
            ));
        }
        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            seasonal_period: None,
        })
    }

    /// Create a model with an added (1,1,1) seasonal component at
    /// `period`
    pub fn with_seasonal(p: usize, d: usize, q: usize, period: usize) -> Result<Self> {
        if period < 2 {
            return Err(ForecastError::InvalidInput(
                "Seasonal period must be at least 2".to_string(),
            ));
        }
        let base = Self::new(p, d, q)?;
        Ok(Self {
            name: format!("SARIMA({},{},{})x(1,1,1,{})", p, d, q, period),
            seasonal_period: Some(period),
            ..base
        })
    }

    /// Name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fit the model to a series.
    pub fn train(&self, series: &[f64]) -> Result<TrainedSarima> {
        let mut stage0 = series.to_vec();
        if let Some(period) = self.seasonal_period {
            if series.len() <= period + self.d + self.p.max(self.q) + 1 {
                return Err(ForecastError::InsufficientData(format!(
                    "{} needs more than {} observations, got {}",
                    self.name,
                    period + self.d + self.p.max(self.q) + 1,
                    series.len()
                )));
            }
            stage0 = seasonal_difference(&stage0, period);
        }

        let mut stages = vec![stage0];
        for _ in 0..self.d {
            let next = difference(stages[stages.len() - 1].as_slice());
            stages.push(next);
        }

        let w = stages[stages.len() - 1].clone();
        let lag_span = self.p.max(self.q) + self.seasonal_period.unwrap_or(0);
        if w.len() <= lag_span + 1 {
            return Err(ForecastError::InsufficientData(format!(
                "{} needs more than {} differenced observations, got {}",
                self.name,
                lag_span + 1,
                w.len()
            )));
        }

        let intercept = w.iter().sum::<f64>() / w.len() as f64;
        let centered: Vec<f64> = w.iter().map(|v| v - intercept).collect();

        let ar = fit_ar(&centered, self.p);
        let ar_residuals = ar_residuals(&centered, &ar);
        let ma = fit_ma(&ar_residuals, self.q);

        let (seasonal_ar, seasonal_ma) = match self.seasonal_period {
            Some(period) if centered.len() > period + 1 => (
                clamp(sample_acf(&centered, period)),
                clamp(sample_acf(&ar_residuals, period)),
            ),
            _ => (0.0, 0.0),
        };

        let mut trained = TrainedSarima {
            name: self.name.clone(),
            d: self.d,
            seasonal_period: self.seasonal_period,
            original: series.to_vec(),
            stages,
            intercept,
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
            residuals: Vec::new(),
        };
        trained.residuals = trained.in_sample_residuals(&centered);

        if trained.residuals.iter().any(|r| !r.is_finite()) {
            return Err(ForecastError::ModelFit(format!(
                "{} produced non-finite residuals",
                self.name
            )));
        }

        Ok(trained)
    }
}

impl TrainedSarima {
    /// Name of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-step prediction of the centered differenced value at `t`,
    /// conditional on zeros before the sample start.
    fn predict_centered(&self, centered: &[f64], residuals: &[f64], t: usize) -> f64 {
        let s = self.seasonal_period.unwrap_or(0);
        let mut pred = 0.0;

        for (j, &phi) in self.ar.iter().enumerate() {
            if t > j {
                pred += phi * centered[t - 1 - j];
            }
        }
        for (k, &theta) in self.ma.iter().enumerate() {
            if t > k {
                pred += theta * residuals[t - 1 - k];
            }
        }
        if s > 0 {
            if t >= s {
                pred += self.seasonal_ar * centered[t - s];
                pred += self.seasonal_ma * residuals[t - s];
            }
            // Multiplicative interaction terms
            for (j, &phi) in self.ar.iter().enumerate() {
                if t >= s + 1 + j {
                    pred -= phi * self.seasonal_ar * centered[t - s - 1 - j];
                }
            }
            for (k, &theta) in self.ma.iter().enumerate() {
                if t >= s + 1 + k {
                    pred += theta * self.seasonal_ma * residuals[t - s - 1 - k];
                }
            }
        }

        pred
    }

    fn in_sample_residuals(&self, centered: &[f64]) -> Vec<f64> {
        let mut residuals = vec![0.0; centered.len()];
        for t in 0..centered.len() {
            let pred = self.predict_centered(centered, &residuals, t);
            residuals[t] = centered[t] - pred;
        }
        residuals
    }

    /// Forecast `horizon` future values on the original scale.
    ///
    /// The differenced-scale recursion extends the sample with expected
    /// values (future shocks zero), then differencing is inverted:
    /// regular orders by cumulative summation, the seasonal order by
    /// adding back the value one period earlier.
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidInput(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let w = &self.stages[self.stages.len() - 1];
        let mut centered: Vec<f64> = w.iter().map(|v| v - self.intercept).collect();
        let mut residuals = self.residuals.clone();

        let mut w_forecast = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let t = centered.len();
            let pred = self.predict_centered(&centered, &residuals, t);
            centered.push(pred);
            residuals.push(0.0);
            w_forecast.push(pred + self.intercept);
        }

        // Invert regular differencing, innermost stage first.
        let mut values = w_forecast;
        for stage in (0..self.d).rev() {
            let mut level = *self.stages[stage]
                .last()
                .ok_or_else(|| ForecastError::ModelFit("Empty differencing stage".to_string()))?;
            for value in &mut values {
                level += *value;
                *value = level;
            }
        }

        // Invert seasonal differencing against the extended history.
        if let Some(period) = self.seasonal_period {
            let mut extended = self.original.clone();
            for value in &mut values {
                let base = extended[extended.len() - period];
                *value += base;
                extended.push(*value);
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(format!(
                "{} forecast diverged",
                self.name
            )));
        }

        Ok(values)
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(-COEFF_LIMIT, COEFF_LIMIT)
}

/// First difference of a series
fn difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Seasonal difference at `period`
fn seasonal_difference(series: &[f64], period: usize) -> Vec<f64> {
    (period..series.len())
        .map(|i| series[i] - series[i - period])
        .collect()
}

/// Lag-k sample autocorrelation of an already mean-adjusted series
fn sample_acf(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if n <= lag {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    if variance < 1e-12 {
        return 0.0;
    }
    let covariance = (0..n - lag)
        .map(|i| (values[i] - mean) * (values[i + lag] - mean))
        .sum::<f64>()
        / n as f64;
    covariance / variance
}

/// AR coefficients from the Yule-Walker equations via Levinson-Durbin
fn fit_ar(centered: &[f64], p: usize) -> Vec<f64> {
    if p == 0 || centered.len() <= p {
        return Vec::new();
    }

    let mut acf = vec![1.0];
    for k in 1..=p {
        acf.push(sample_acf(centered, k));
    }

    let coefficients = levinson_durbin(&acf, p);
    coefficients.into_iter().map(clamp).collect()
}

fn levinson_durbin(acf: &[f64], p: usize) -> Vec<f64> {
    let mut phi = vec![vec![0.0; p + 1]; p + 1];
    let mut sigma = vec![0.0; p + 1];
    sigma[0] = acf[0];

    for k in 1..=p {
        if sigma[k - 1].abs() < 1e-12 {
            break;
        }
        let mut numerator = acf[k];
        for j in 1..k {
            numerator -= phi[k - 1][j] * acf[k - j];
        }
        phi[k][k] = numerator / sigma[k - 1];
        for j in 1..k {
            phi[k][j] = phi[k - 1][j] - phi[k][k] * phi[k - 1][k - j];
        }
        sigma[k] = sigma[k - 1] * (1.0 - phi[k][k].powi(2));
    }

    (1..=p).map(|j| phi[p][j]).collect()
}

/// Residuals of the pure AR part, conditional on zeros before the
/// sample start
fn ar_residuals(centered: &[f64], ar: &[f64]) -> Vec<f64> {
    centered
        .iter()
        .enumerate()
        .map(|(t, &value)| {
            let predicted: f64 = ar
                .iter()
                .enumerate()
                .filter(|(j, _)| t > *j)
                .map(|(j, &phi)| phi * centered[t - 1 - j])
                .sum();
            value - predicted
        })
        .collect()
}

/// MA coefficients from the autocorrelation of the AR residuals
fn fit_ma(residuals: &[f64], q: usize) -> Vec<f64> {
    (1..=q).map(|k| clamp(sample_acf(residuals, k))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn differencing_helpers() {
        let series = vec![10.0, 12.0, 15.0, 14.0];
        assert_eq!(difference(&series), vec![2.0, 3.0, -1.0]);
        assert_eq!(seasonal_difference(&series, 2), vec![5.0, 2.0]);
    }

    #[test]
    fn levinson_durbin_recovers_single_lag() {
        // For AR(1), phi equals the lag-1 autocorrelation.
        let coeffs = levinson_durbin(&[1.0, 0.6], 1);
        assert!((coeffs[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn forecast_on_trend_continues_upward() {
        let series: Vec<f64> = (0..80).map(|i| 100.0 + 5.0 * i as f64).collect();
        let model = Sarima::new(1, 1, 1).unwrap();
        let trained = model.train(&series).unwrap();
        let forecast = trained.forecast(6).unwrap();

        assert_eq!(forecast.len(), 6);
        let last = *series.last().unwrap();
        for value in forecast {
            assert!(value > last - 10.0, "trend forecast collapsed: {}", value);
        }
    }

    #[test]
    fn seasonal_forecast_tracks_the_cycle() {
        let period = 12;
        let series: Vec<f64> = (0..72)
            .map(|i| 500.0 + 100.0 * (2.0 * PI * i as f64 / period as f64).sin())
            .collect();
        let model = Sarima::with_seasonal(1, 1, 1, period).unwrap();
        let trained = model.train(&series).unwrap();
        let forecast = trained.forecast(period).unwrap();

        assert_eq!(forecast.len(), period);
        // A seasonal step ahead should land near the value one period back.
        for (i, value) in forecast.iter().enumerate() {
            let reference = series[series.len() - period + i];
            assert!(
                (value - reference).abs() < 120.0,
                "step {} drifted: {} vs {}",
                i,
                value,
                reference
            );
        }
    }

    #[test]
    fn too_short_series_is_rejected() {
        let model = Sarima::new(1, 1, 1).unwrap();
        assert!(model.train(&[1.0, 2.0, 3.0]).is_err());

        let seasonal = Sarima::with_seasonal(1, 1, 1, 52).unwrap();
        let short: Vec<f64> = (0..60).map(|i| i as f64).collect();
        assert!(seasonal.train(&short).is_err());
    }

    #[test]
    fn training_is_deterministic() {
        let series: Vec<f64> = (0..100)
            .map(|i| 100.0 + ((i * 31) % 17) as f64)
            .collect();
        let model = Sarima::new(1, 1, 1).unwrap();
        let a = model.train(&series).unwrap().forecast(8).unwrap();
        let b = model.train(&series).unwrap().forecast(8).unwrap();
        assert_eq!(a, b);
    }
}
