//! Nonlinear transfer functions for the excitation mechanisms.
//!
//! Each one maps a pressure or velocity difference to a reflection or
//! transmission coefficient. They are memoryless; all the dynamics come from
//! the delay lines and filters around them.

/// Air jet nonlinearity: the cubic `x(x^2 - 1)`, clamped to [-1, 1].
///
/// Models the sigmoid deflection of an air jet across a flue opening.
#[inline]
pub fn jet_table(input: f32) -> f32 {
    (input * (input * input - 1.0)).clamp(-1.0, 1.0)
}

/// Single-reed reflection table: a clamped line in the pressure difference.
///
/// Slope is negative for a stiffening reed; the clamp at -1 is the beating
/// (fully closed) regime.
pub struct ReedTable {
    pub offset: f32,
    pub slope: f32,
}

impl ReedTable {
    pub fn new() -> Self {
        Self {
            offset: 0.7,
            slope: -0.3,
        }
    }

    pub fn lookup(&self, pressure_diff: f32) -> f32 {
        (self.offset + self.slope * pressure_diff).clamp(-1.0, 1.0)
    }
}

impl Default for ReedTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Bow friction curve: steep pseudo-hyperbolic falloff away from the sticking
/// region, clamped to [0, 1].
pub struct BowTable {
    pub offset: f32,
    pub slope: f32,
}

impl BowTable {
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            slope: 0.1,
        }
    }

    pub fn lookup(&self, input: f32) -> f32 {
        let sample = (input + self.offset) * self.slope;
        let output = (sample.abs() + 0.75).powf(-4.0);
        output.clamp(0.0, 1.0)
    }
}

impl Default for BowTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_table_is_odd_and_clamped() {
        assert_eq!(jet_table(0.0), 0.0);
        for i in 0..100 {
            let x = i as f32 * 0.05;
            assert!((jet_table(x) + jet_table(-x)).abs() < 1e-6);
        }
        assert_eq!(jet_table(5.0), 1.0);
        assert_eq!(jet_table(-5.0), -1.0);
    }

    #[test]
    fn test_reed_closes_under_high_pressure() {
        let reed = ReedTable::new();
        // Low pressure difference: reed near its offset.
        assert!((reed.lookup(0.0) - 0.7).abs() < 1e-6);
        // Large positive difference drives the output down to the clamp.
        assert_eq!(reed.lookup(10.0), -1.0);
        // Large negative difference saturates open.
        assert_eq!(reed.lookup(-10.0), 1.0);
    }

    #[test]
    fn test_bow_table_sticks_near_zero_velocity() {
        let bow = BowTable {
            offset: 0.0,
            slope: 3.0,
        };
        let stuck = bow.lookup(0.0);
        let slipping = bow.lookup(1.0);
        assert!(stuck > slipping, "friction should fall off with velocity");
        for i in -50..50 {
            let v = i as f32 * 0.1;
            let f = bow.lookup(v);
            assert!((0.0..=1.0).contains(&f), "friction out of range: {}", f);
        }
    }
}
