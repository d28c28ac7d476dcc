use ring::rand::{SecureRandom, SystemRandom};

use crate::types::group::GroupColor;

/// Chooses a color for a newly created group when the request names none.
pub trait ColorPicker {
    fn pick(&self) -> GroupColor;
}

/// Picks uniformly from the eight group colors using the system RNG.
pub struct RandomColorPicker {
    rng: SystemRandom,
}

impl RandomColorPicker {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for RandomColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPicker for RandomColorPicker {
    fn pick(&self) -> GroupColor {
        let mut byte = [0u8; 1];
        // 256 is a multiple of 8, so the modulo is unbiased.
        match self.rng.fill(&mut byte) {
            Ok(()) => GroupColor::ALL[byte[0] as usize % GroupColor::ALL.len()],
            Err(_) => GroupColor::Blue,
        }
    }
}

/// Always returns the same color. Used when settings pin a default color.
pub struct FixedColorPicker(pub GroupColor);

impl ColorPicker for FixedColorPicker {
    fn pick(&self) -> GroupColor {
        self.0
    }
}
