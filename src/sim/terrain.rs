//! Destructible 1-D heightmap
//!
//! Heights are sampled uniformly across the playable width (x from -half to
//! +half). Lookups are flat-step (nearest sample) so physics sees exactly the
//! resolution that deformation carves.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::MatchSettings;

/// Sine octaves used for the initial profile: (amplitude, frequency)
const OCTAVES: [(f32, f32); 3] = [(4.0, 0.08), (2.0, 0.21), (0.6, 0.53)];
/// Baseline height the octaves oscillate around
const BASE_HEIGHT: f32 = 2.0;
/// Generated ground stays at least this far above water
const MIN_DRY_HEIGHT: f32 = 1.0;

/// Logical terrain heights. Sample count is fixed for the match and heights
/// only ever decrease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainField {
    width: f32,
    heights: Vec<f32>,
}

impl TerrainField {
    /// Flat field at `height` with `segments + 1` samples
    pub fn flat(width: f32, segments: usize, height: f32) -> Self {
        Self {
            width,
            heights: vec![height; segments.max(1) + 1],
        }
    }

    /// Build from explicit samples (at least two)
    pub fn from_samples(width: f32, heights: Vec<f32>) -> Option<Self> {
        (heights.len() >= 2).then_some(Self { width, heights })
    }

    /// Rolling hills from randomly phased sine octaves
    pub fn generate<R: Rng>(settings: &MatchSettings, rng: &mut R) -> Self {
        let phases: Vec<f32> = OCTAVES.iter().map(|_| rng.random_range(0.0..TAU)).collect();
        let floor = settings.water_level + MIN_DRY_HEIGHT;

        let mut field = Self::flat(settings.world_width, settings.terrain_segments, 0.0);
        for i in 0..field.heights.len() {
            let x = field.world_x(i);
            let h = OCTAVES
                .iter()
                .zip(&phases)
                .fold(BASE_HEIGHT, |acc, (&(amp, freq), &phase)| {
                    acc + amp * (x * freq + phase).sin()
                });
            field.heights[i] = h.max(floor);
        }
        field
    }

    /// Playable width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Number of segments between samples
    pub fn segments(&self) -> usize {
        self.heights.len() - 1
    }

    /// Distance between neighbouring samples
    pub fn spacing(&self) -> f32 {
        self.width / self.segments() as f32
    }

    /// Raw samples, left to right
    pub fn samples(&self) -> &[f32] {
        &self.heights
    }

    /// World x of a sample index
    pub fn world_x(&self, index: usize) -> f32 {
        -self.width / 2.0 + index as f32 * self.spacing()
    }

    /// Nearest sample index for world x, clamped to the edges
    pub fn index_of(&self, x: f32) -> usize {
        let t = ((x + self.width / 2.0) / self.spacing()).round();
        // NaN and negatives saturate to 0
        (t.max(0.0) as usize).min(self.segments())
    }

    /// Height of the sample nearest to `x`
    pub fn height_at(&self, x: f32) -> f32 {
        self.heights[self.index_of(x)]
    }

    /// Carve a circular crater. Returns the touched index range, if any.
    pub fn deform(&mut self, center_x: f32, radius: f32) -> Option<RangeInclusive<usize>> {
        if !(radius > 0.0) || !center_x.is_finite() {
            return None;
        }

        let spacing = self.spacing();
        let half = self.width / 2.0;
        let lo = ((center_x - radius + half) / spacing).floor().max(0.0) as usize;
        let hi = ((center_x + radius + half) / spacing).ceil().max(0.0) as usize;
        let hi = hi.min(self.segments());

        let mut touched: Option<(usize, usize)> = None;
        for i in lo..=hi {
            let dist = (self.world_x(i) - center_x).abs();
            if dist < radius {
                let depth = (radius * radius - dist * dist).sqrt();
                self.heights[i] -= depth;
                touched = Some(match touched {
                    Some((first, _)) => (first, i),
                    None => (i, i),
                });
            }
        }

        log::debug!(
            "Crater at x={:.2} r={:.2} touched {:?}",
            center_x,
            radius,
            touched
        );
        touched.map(|(first, last)| first..=last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> TerrainField {
        // spacing 0.5, sample i at x = -50 + 0.5 i
        TerrainField::flat(100.0, 200, 0.0)
    }

    #[test]
    fn test_index_mapping() {
        let t = field();
        assert_eq!(t.samples().len(), 201);
        assert_eq!(t.index_of(-50.0), 0);
        assert_eq!(t.index_of(0.0), 100);
        assert_eq!(t.index_of(50.0), 200);
        assert_eq!(t.index_of(0.2), 100);
        assert_eq!(t.index_of(0.3), 101);
        assert!((t.world_x(101) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_height_lookup_clamps_to_edges() {
        let mut heights = vec![0.0; 201];
        heights[0] = 3.0;
        heights[200] = 7.0;
        let t = TerrainField::from_samples(100.0, heights).unwrap();
        assert_eq!(t.height_at(-1000.0), 3.0);
        assert_eq!(t.height_at(1000.0), 7.0);
        assert_eq!(t.height_at(f32::NAN), 3.0);
    }

    #[test]
    fn test_crater_shape() {
        let mut t = field();
        let range = t.deform(0.0, 6.0).unwrap();

        // Epicenter drops by exactly the radius
        assert_eq!(t.height_at(0.0), -6.0);
        // Samples at distance >= r untouched
        assert_eq!(t.height_at(6.0), 0.0);
        assert_eq!(t.height_at(-6.0), 0.0);
        assert_eq!(t.height_at(10.0), 0.0);
        // Circular profile in between
        let expected = -(36.0f32 - 9.0).sqrt();
        assert!((t.height_at(3.0) - expected).abs() < 1e-5);

        assert_eq!(range, t.index_of(-5.5)..=t.index_of(5.5));
    }

    #[test]
    fn test_repeated_craters_dig_deeper() {
        let mut t = field();
        t.deform(10.0, 4.0);
        t.deform(10.0, 4.0);
        assert_eq!(t.height_at(10.0), -8.0);
    }

    #[test]
    fn test_crater_at_edge_clips() {
        let mut t = field();
        let range = t.deform(-50.0, 2.0).unwrap();
        assert_eq!(*range.start(), 0);
        assert_eq!(t.height_at(-50.0), -2.0);
        assert!(t.deform(500.0, 2.0).is_none());
        assert!(t.deform(0.0, 0.0).is_none());
    }

    #[test]
    fn test_generate_is_seeded_and_dry() {
        let settings = MatchSettings::default();
        let a = TerrainField::generate(&settings, &mut Pcg32::seed_from_u64(7));
        let b = TerrainField::generate(&settings, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.samples().len(), settings.terrain_segments + 1);
        assert!(a.samples().iter().all(|&h| h > settings.water_level));
    }

    proptest! {
        #[test]
        fn prop_deform_never_raises(
            craters in prop::collection::vec((-60.0f32..60.0, 0.1f32..12.0), 1..20)
        ) {
            let mut t = field();
            for (cx, r) in craters {
                let before = t.samples().to_vec();
                t.deform(cx, r);
                for (old, new) in before.iter().zip(t.samples()) {
                    prop_assert!(new <= old);
                }
            }
        }
    }
}
