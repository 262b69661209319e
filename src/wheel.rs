// ============================================
// src/wheel.rs
// The letter wheel: random target letter + forward-only rotation
// ============================================

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::WheelError;
use crate::letters::{DEFAULT_EXCLUDED, Letter, LetterSet};

const FULL_TURN: f64 = 360.0;

/// How many whole extra turns a spin makes before landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub min_turns: u32,
    pub max_turns: u32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_turns: 4,
            max_turns: 7,
        }
    }
}

/// Letter set and spin behaviour of a wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Alphabet letters left off the wheel.
    pub excluded: Vec<char>,
    pub spin: SpinConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            excluded: DEFAULT_EXCLUDED.to_vec(),
            spin: SpinConfig::default(),
        }
    }
}

/// Result of one spin. `rotation_delta` is only interesting to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinOutcome {
    pub letter: Letter,
    pub index: usize,
    pub extra_turns: u32,
    /// Forward rotation in degrees, always positive.
    pub rotation_delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WheelState {
    Idle,
    Spinning(SpinOutcome),
}

/// Snapshot for status displays.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelStats {
    pub total_letters: usize,
    pub selected_letter: Option<Letter>,
    pub is_spinning: bool,
    pub rotation_degrees: f64,
    pub excluded_letters: Vec<char>,
}

pub struct LetterWheel {
    letters: LetterSet,
    spin: SpinConfig,
    /// Always in `[0, 360)`.
    rotation_degrees: f64,
    selected: Option<Letter>,
    state: WheelState,
    rng: StdRng,
}

impl LetterWheel {
    /// Wheel with an OS-seeded random source.
    pub fn new(letters: LetterSet, spin: SpinConfig) -> Result<Self, WheelError> {
        Self::with_rng(letters, spin, StdRng::from_os_rng())
    }

    /// Wheel with a fixed seed, for reproducible sequences.
    pub fn with_seed(letters: LetterSet, spin: SpinConfig, seed: u64) -> Result<Self, WheelError> {
        Self::with_rng(letters, spin, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(letters: LetterSet, spin: SpinConfig, rng: StdRng) -> Result<Self, WheelError> {
        if letters.is_empty() {
            return Err(WheelError::EmptyLetterSet);
        }
        if spin.min_turns > spin.max_turns {
            return Err(WheelError::InvalidTurnRange {
                min: spin.min_turns,
                max: spin.max_turns,
            });
        }
        Ok(Self {
            letters,
            spin,
            rotation_degrees: 0.0,
            selected: None,
            state: WheelState::Idle,
            rng,
        })
    }

    /// Builds the wheel described by a config section.
    pub fn from_config(config: &WheelConfig) -> Result<Self, WheelError> {
        let letters = LetterSet::from_exclusions(&config.excluded)?;
        Self::new(letters, config.spin)
    }

    pub fn letters(&self) -> &LetterSet {
        &self.letters
    }

    /// Size of one segment in degrees.
    pub fn angle_per_segment(&self) -> f64 {
        FULL_TURN / self.letters.len() as f64
    }

    /// Fixed angle of a letter's segment, or `None` if it is not on the wheel.
    pub fn segment_angle(&self, letter: Letter) -> Option<f64> {
        self.letters
            .position(letter)
            .map(|index| index as f64 * self.angle_per_segment())
    }

    /// The letter whose segment sits under the window at `rotation` degrees.
    pub fn letter_at_rotation(&self, rotation: f64) -> Option<Letter> {
        let count = self.letters.len();
        if count == 0 {
            return None;
        }
        let normalized = rotation.rem_euclid(FULL_TURN);
        let index = (normalized / self.angle_per_segment()).round() as usize % count;
        self.letters.get(index)
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn selected_letter(&self) -> Option<Letter> {
        self.selected
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, WheelState::Spinning(_))
    }

    /// The outcome of the spin still in flight, if any.
    pub fn pending(&self) -> Option<SpinOutcome> {
        match self.state {
            WheelState::Spinning(outcome) => Some(outcome),
            WheelState::Idle => None,
        }
    }

    /// MARK: Spin
    ///
    /// Picks a uniformly random letter and the forward rotation that lands on
    /// it. While a spin is in flight the pending outcome is returned again.
    pub fn spin(&mut self) -> Result<SpinOutcome, WheelError> {
        if let WheelState::Spinning(outcome) = self.state {
            debug!("spin requested while spinning, reusing pending outcome");
            return Ok(outcome);
        }

        let count = self.letters.len();
        if count == 0 {
            return Err(WheelError::EmptyLetterSet);
        }

        let target_index = self.rng.random_range(0..count);
        let letter = self
            .letters
            .get(target_index)
            .ok_or(WheelError::EmptyLetterSet)?;
        let target_angle = target_index as f64 * self.angle_per_segment();
        let extra_turns = self
            .rng
            .random_range(self.spin.min_turns..=self.spin.max_turns);

        let current = self.rotation_degrees.rem_euclid(FULL_TURN);
        let mut rotation_delta = extra_turns as f64 * FULL_TURN + target_angle - current;
        // Never spin backwards, even with zero extra turns.
        if rotation_delta < 0.0 {
            rotation_delta += FULL_TURN;
        }

        // (current + delta) mod 360 is exactly the target segment angle.
        self.rotation_degrees = target_angle;
        self.selected = Some(letter);

        let outcome = SpinOutcome {
            letter,
            index: target_index,
            extra_turns,
            rotation_delta,
        };
        self.state = WheelState::Spinning(outcome);
        debug!(
            "spin -> '{}' (index {}, {} turns, delta {:.1}°)",
            letter, target_index, extra_turns, rotation_delta
        );
        Ok(outcome)
    }

    /// Ends the spin in flight. Returns `None` when nothing was spinning.
    pub fn complete_spin(&mut self) -> Option<Letter> {
        match std::mem::replace(&mut self.state, WheelState::Idle) {
            WheelState::Spinning(outcome) => Some(outcome.letter),
            WheelState::Idle => None,
        }
    }

    /// Back to the unspun position, showing the first letter.
    pub fn reset(&mut self) {
        self.state = WheelState::Idle;
        self.rotation_degrees = 0.0;
        self.selected = self.letters.get(0);
    }

    /// Puts `letter` in the window without spinning. `false` if it is not on the wheel.
    pub fn force_select(&mut self, letter: Letter) -> bool {
        if !self.letters.contains(letter) {
            return false;
        }
        self.selected = Some(letter);
        true
    }

    /// Repairs an out-of-range rotation or a foreign selected letter.
    /// Returns `true` when nothing needed fixing.
    pub fn validate_and_repair(&mut self) -> bool {
        let mut valid = true;

        if !(0.0..FULL_TURN).contains(&self.rotation_degrees) || self.rotation_degrees.is_nan() {
            warn!(
                "wheel rotation {} out of range, resetting",
                self.rotation_degrees
            );
            self.rotation_degrees = 0.0;
            valid = false;
        }

        if let Some(letter) = self.selected {
            if !self.letters.contains(letter) {
                warn!("selected letter '{}' is not on the wheel, resetting", letter);
                self.selected = self.letters.get(0);
                valid = false;
            }
        }

        valid
    }

    pub fn stats(&self) -> WheelStats {
        WheelStats {
            total_letters: self.letters.len(),
            selected_letter: self.selected,
            is_spinning: self.is_spinning(),
            rotation_degrees: self.rotation_degrees,
            excluded_letters: self.letters.excluded().to_vec(),
        }
    }
}
