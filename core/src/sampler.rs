//! Weighted random selection over a fixed key set.
//!
//! Used for the country pick, the occupation pick, and the
//! reconciliation pick in the allocator.

use crate::{
    error::{SimError, SimResult},
    rng::StreamRng,
};

#[derive(Debug, Clone)]
pub struct WeightedTable {
    name: &'static str,
    keys: Vec<String>,
    weights: Vec<f64>,
    total: f64,
}

impl WeightedTable {
    /// Build a table from parallel key/weight lists.
    /// Negative weights count as zero. Fails if nothing can be drawn.
    pub fn new(name: &'static str, entries: Vec<(String, f64)>) -> SimResult<Self> {
        let (keys, weights): (Vec<String>, Vec<f64>) = entries
            .into_iter()
            .map(|(k, w)| (k, w.max(0.0)))
            .unzip();
        let total: f64 = weights.iter().sum();
        if keys.is_empty() || total <= 0.0 {
            return Err(SimError::ZeroWeight { table: name });
        }
        Ok(Self { name, keys, weights, total })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn weight_of(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.weights[i])
    }

    /// Draw one key, proportional to its weight.
    pub fn pick(&self, rng: &mut StreamRng) -> &str {
        let roll = rng.next_f64() * self.total;
        let mut cumulative = 0.0;
        for (key, weight) in self.keys.iter().zip(&self.weights) {
            cumulative += weight;
            if roll < cumulative {
                return key;
            }
        }
        // Float drift can leave roll == total; fall back to the last
        // key that can actually be drawn.
        self.keys
            .iter()
            .zip(&self.weights)
            .rev()
            .find(|(_, w)| **w > 0.0)
            .map(|(k, _)| k.as_str())
            .unwrap_or(self.keys[self.keys.len() - 1].as_str())
    }
}
