//! Random draws and color palettes
//!
//! Every draw takes the RNG by reference so callers can inject a seeded
//! generator and replay a run exactly.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Packed 0xRRGGBB color
pub type Color = u32;

/// Colors assigned to battle bodies by roster index
pub const BODY_PALETTE: [Color; 12] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xffa500, 0x800080, 0xff69b4,
    0x32cd32, 0xff4500, 0x9370db,
];

/// Colors the arena ball cycles through on each growth
pub const ARENA_PALETTE: [Color; 6] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff];

/// Victory confetti colors
pub const CONFETTI_PALETTE: [Color; 7] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xffa500,
];

/// Seeded generator used by rounds
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Uniform draw in [-1, 1)
#[inline]
pub fn signed_unit<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(-1.0..1.0)
}

/// Uniform palette pick
pub fn pick_color<R: Rng>(rng: &mut R, palette: &[Color]) -> Color {
    palette[rng.random_range(0..palette.len())]
}

/// Palette entry for a roster index, wrapping around
#[inline]
pub fn indexed_color(palette: &[Color], index: usize) -> Color {
    palette[index % palette.len()]
}
