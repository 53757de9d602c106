//! Direction blending for organic-looking growth.

use crate::error::DegenerateVector;
use glam::Vec3;
use rand::Rng;

/// Weight of the raw noise vector in the second blend stage.
pub const NOISE_BLEND: f32 = 0.3;

/// Squared length below which a blended direction is considered degenerate.
const MIN_LENGTH_SQUARED: f32 = 1e-12;

/// Normalizes `v`, failing on near-zero or non-finite input.
pub fn unit(v: Vec3) -> Result<Vec3, DegenerateVector> {
    if v.length_squared() < MIN_LENGTH_SQUARED {
        return Err(DegenerateVector);
    }
    v.try_normalize().ok_or(DegenerateVector)
}

/// Blends a prior growth direction with the local surface normal and noise.
///
/// 1. Draws a raw noise vector with each component uniform in `[-1, 1]`.
/// 2. Lerps `prior` toward `normal` by a factor uniform in `[0, attraction]`.
/// 3. Lerps that toward the noise by [`NOISE_BLEND`].
/// 4. Normalizes.
///
/// ### Parameters
/// - `prior` - Direction of the segment being extended.
/// - `normal` - Normal of the nearest target surface point.
/// - `attraction` - Upper bound of the pull toward `normal`.
/// - `rng` - Random source.
///
/// ### Returns
/// A unit vector, or [`DegenerateVector`] when the blend cancels out.
pub fn organic_direction(
    prior: Vec3,
    normal: Vec3,
    attraction: f32,
    rng: &mut impl Rng,
) -> Result<Vec3, DegenerateVector> {
    let noise = Vec3::new(
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
    );
    let pull = rng.random_range(0.0..=attraction);

    let biased = prior.lerp(normal, pull);
    unit(biased.lerp(noise, NOISE_BLEND))
}
