//! Threshold crossings on a sampled curve

use super::calc::peak;
use super::types::{Crossing, Direction};
use crate::data::curve::Curve;

/// Linear interpolation of the time at which the segment `(t0, c0) → (t1, c1)`
/// reaches `threshold`
///
/// Callers guarantee `c0 != c1`.
#[inline]
pub fn interpolate_time(t0: f64, c0: f64, t1: f64, c1: f64, threshold: f64) -> f64 {
    t0 + (threshold - c0) * (t1 - t0) / (c1 - c0)
}

/// Lazy sequence of the first rising and the first post-peak falling crossing
///
/// A rising crossing is the first pair `(i − 1, i)` with `C[i−1] < θ ≤ C[i]`. A falling
/// crossing is the first pair after the peak with `C[i−1] ≥ θ > C[i]`. Each call to
/// [crossings] starts a fresh scan.
#[derive(Debug, Clone)]
pub struct Crossings<'a> {
    curve: &'a Curve,
    threshold: f64,
    stage: Stage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Rising,
    Falling,
    Done,
}

/// Crossings of `threshold` by `curve`, rising first, at most two
pub fn crossings(curve: &Curve, threshold: f64) -> Crossings<'_> {
    Crossings {
        curve,
        threshold,
        stage: Stage::Rising,
    }
}

impl Crossings<'_> {
    fn crossing(&self, i: usize, direction: Direction) -> Crossing {
        let t = self.curve.times();
        let c = self.curve.concentrations();
        Crossing {
            time: interpolate_time(t[i - 1], c[i - 1], t[i], c[i], self.threshold),
            concentration: self.threshold,
            direction,
        }
    }
}

impl Iterator for Crossings<'_> {
    type Item = Crossing;

    fn next(&mut self) -> Option<Crossing> {
        if self.stage == Stage::Rising {
            self.stage = Stage::Falling;
            if let Some(i) = rising_index(self.curve.concentrations(), self.threshold) {
                return Some(self.crossing(i, Direction::Rising));
            }
        }
        if self.stage == Stage::Falling {
            self.stage = Stage::Done;
            let start = peak(self.curve).index;
            if let Some(i) = falling_index(self.curve.concentrations(), self.threshold, start) {
                return Some(self.crossing(i, Direction::Falling));
            }
        }
        None
    }
}

fn rising_index(c: &[f64], threshold: f64) -> Option<usize> {
    (1..c.len()).find(|&i| c[i - 1] < threshold && threshold <= c[i])
}

fn falling_index(c: &[f64], threshold: f64, after: usize) -> Option<usize> {
    (after + 1..c.len()).find(|&i| c[i - 1] >= threshold && threshold > c[i])
}

/// First fall below `threshold` after the peak
pub fn falling_crossing(curve: &Curve, threshold: f64) -> Option<Crossing> {
    crossings(curve, threshold).find(|c| c.direction == Direction::Falling)
}
