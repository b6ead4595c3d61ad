//! Association statistics for one ordered word pair.
//!
//! Every statistic is computed on its own and yields `None` when its formula
//! is undefined for the pair (logarithm of a non-positive value, division by
//! zero, non-finite result). One undefined statistic never affects the
//! others.

use std::f64::consts::LN_2;

use serde::Serialize;

/// 2x2 contingency table of a word pair `(w1, w2)`.
///
/// `a` is the joint count, `b = f(w2) - a`, `c = f(w1) - a` and
/// `d = N - f(w1) - f(w2)`. Unlike the textbook `N - (f(w1) + f(w2) - a)`,
/// `d` does not add `a` back. The cells are signed: window counts can exceed
/// a word's frequency, which drives `b` or `c` below zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContingencyTable {
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: i64,
}

impl ContingencyTable {
    pub fn new(joint: u64, f1: u64, f2: u64, total: u64) -> Self {
        let (a, f1, f2, total) = (joint as i64, f1 as i64, f2 as i64, total as i64);
        Self {
            a,
            b: f2 - a,
            c: f1 - a,
            d: total - f1 - f2,
        }
    }

    /// Sum of the four cells.
    pub fn grand_total(&self) -> i64 {
        self.a + self.b + self.c + self.d
    }

    /// Log-likelihood ratio (G²) of the table.
    ///
    /// Undefined when any cell, marginal or the grand total is zero or
    /// negative: a word that only ever occurs next to its collocate (`c = 0`)
    /// has no score.
    pub fn log_likelihood(&self) -> Option<f64> {
        let Self { a, b, c, d } = *self;
        let cells = x_ln_x(a)? + x_ln_x(b)? + x_ln_x(c)? + x_ln_x(d)?;
        let marginals = x_ln_x(a + b)? + x_ln_x(a + c)? + x_ln_x(b + d)? + x_ln_x(c + d)?;
        finite(2.0 * (cells - marginals + x_ln_x(self.grand_total())?))
    }
}

fn x_ln_x(x: i64) -> Option<f64> {
    match x {
        x if x <= 0 => None,
        x => {
            let x = x as f64;
            Some(x * x.ln())
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn ln(x: f64) -> Option<f64> {
    (x > 0.0).then(|| x.ln()).and_then(finite)
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        finite(numerator / denominator)
    }
}

/// The association measures reported next to the log-likelihood.
///
/// `N` is the corpus token count and `S` the window radius.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AssociationMeasures {
    /// Pointwise mutual information, `log2(a N / (f1 f2 S))`.
    pub mi: Option<f64>,
    /// Cubed mutual information, `log2(a³ N / (f1 f2 S))`.
    pub mi3: Option<f64>,
    /// z-score of the joint count against its expectation.
    pub zscore: Option<f64>,
    /// Observed/expected ratio, `a (N - f1) / (f1 f2 S)`.
    #[serde(rename = "oe")]
    pub observed_expected: Option<f64>,
    /// Log-log, `ln(a N / (f1 f2 S)) ln(a) / (ln 2)²`.
    #[serde(rename = "loglog")]
    pub log_log: Option<f64>,
}

impl AssociationMeasures {
    pub fn compute(joint: u64, f1: u64, f2: u64, total: u64, span: u64) -> Self {
        let (a, f1, f2, n, s) = (joint as f64, f1 as f64, f2 as f64, total as f64, span as f64);
        let expected_denominator = f1 * f2 * s;

        let mi = ratio(a * n, expected_denominator)
            .and_then(ln)
            .map(|x| x / LN_2);
        let mi3 = ratio(a.powi(3) * n, expected_denominator)
            .and_then(ln)
            .map(|x| x / LN_2);
        let observed_expected = ratio(a * (n - f1), expected_denominator);
        let log_log = ratio(a * n, expected_denominator)
            .and_then(ln)
            .zip(ln(a))
            .and_then(|(l, la)| finite(l * la / (LN_2 * LN_2)));

        Self {
            mi,
            mi3,
            zscore: z_score(a, f1, f2, n, s),
            observed_expected,
            log_log,
        }
    }
}

/// `p = f2 / (N - f1)`, `E = p f1 S`, `z = (a - E) / sqrt(E (1 - p))`.
fn z_score(a: f64, f1: f64, f2: f64, n: f64, s: f64) -> Option<f64> {
    let p = ratio(f2, n - f1)?;
    let expected = p * f1 * s;
    let variance = expected * (1.0 - p);
    if variance <= 0.0 {
        return None;
    }
    ratio(a - expected, variance.sqrt())
}
