//! Placeholder metrics generation
//!
//! Random values inside fixed domain ranges, matching the shape and
//! cadence a sensor-derived pipeline would produce.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::DrowsinessMetrics;

/// Pause between published generations
pub const SIMULATION_INTERVAL: Duration = Duration::from_millis(500);

/// Generate one metrics record.
pub fn sample(rng: &mut impl Rng) -> DrowsinessMetrics {
    DrowsinessMetrics {
        is_drowsy: rng.gen_bool(0.2),
        confidence: rng.gen_range(0.7..0.95),
        eye_aspect_ratio: rng.gen_range(0.2..0.3),
        yawn_count: rng.gen_range(0..=5),
        blink_count: rng.gen_range(10..=30),
        timestamp: Utc::now().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_inside_domain_ranges() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let record = sample(&mut rng);
            assert!((0.7..0.95).contains(&record.confidence));
            assert!((0.2..0.3).contains(&record.eye_aspect_ratio));
            assert!(record.yawn_count <= 5);
            assert!((10..=30).contains(&record.blink_count));
            assert!(record.timestamp > 0);
        }
    }
}
