/*!
bounded.rs - range-checked integer newtype.

`Bounded<MIN, MAX>` holds a `u16` that is guaranteed to lie in
`MIN..=MAX`. Construction and every mutation re-validate the value and
report a [`BoundError`] instead of silently storing garbage.

Hardware latches that physically drop high bits (e.g. the 5-bit MMC1
registers) use [`Bounded::wrapping_from`], which folds any input into
range the way the chip does.
*/

use thiserror::Error;

/// A value was rejected by a [`Bounded`] constructor or setter.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("value {value} is outside the range {min}..={max}")]
pub struct BoundError {
    pub value: u16,
    pub min: u16,
    pub max: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bounded<const MIN: u16, const MAX: u16>(u16);

impl<const MIN: u16, const MAX: u16> Bounded<MIN, MAX> {
    pub const MIN: u16 = MIN;
    pub const MAX: u16 = MAX;

    pub fn new(value: u16) -> Result<Self, BoundError> {
        Self::check(value)?;
        Ok(Self(value))
    }

    /// Fold `value` into range modulo the span (`MIN + (value - MIN) % span`).
    pub fn wrapping_from(value: u16) -> Self {
        let span = MAX as u32 - MIN as u32 + 1;
        let offset = (value.wrapping_sub(MIN) as u32) % span;
        Self((MIN as u32 + offset) as u16)
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    pub fn set(&mut self, value: u16) -> Result<(), BoundError> {
        Self::check(value)?;
        self.0 = value;
        Ok(())
    }

    fn check(value: u16) -> Result<(), BoundError> {
        if (MIN..=MAX).contains(&value) {
            Ok(())
        } else {
            Err(BoundError {
                value,
                min: MIN,
                max: MAX,
            })
        }
    }
}

impl<const MIN: u16, const MAX: u16> Default for Bounded<MIN, MAX> {
    fn default() -> Self {
        Self(MIN)
    }
}

impl<const MIN: u16, const MAX: u16> TryFrom<u16> for Bounded<MIN, MAX> {
    type Error = BoundError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
