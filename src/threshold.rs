use crate::error::Error;

/// Intensity cutoff for the binary mapping.
///
/// Gray values strictly greater than the threshold become foreground (255),
/// everything else, including the threshold value itself, becomes background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u8);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(127);
    pub const MIN: Threshold = Threshold(u8::MIN);
    pub const MAX: Threshold = Threshold(u8::MAX);

    #[inline]
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns `true` if a gray value lands on the foreground side.
    #[inline]
    #[must_use]
    pub const fn is_foreground(self, gray: u8) -> bool {
        gray > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// Out-of-range values are rejected instead of clamped.
impl TryFrom<i64> for Threshold {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| Error::InvalidThreshold(value))
    }
}

impl TryFrom<i32> for Threshold {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_127() {
        assert_eq!(Threshold::default().value(), 127);
    }

    #[test]
    fn accepts_full_range() {
        assert_eq!(Threshold::try_from(0i64).unwrap(), Threshold::MIN);
        assert_eq!(Threshold::try_from(255i64).unwrap(), Threshold::MAX);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Threshold::try_from(-1i64),
            Err(Error::InvalidThreshold(-1))
        ));
        assert!(matches!(
            Threshold::try_from(256i32),
            Err(Error::InvalidThreshold(256))
        ));
    }

    #[test]
    fn boundary_is_background() {
        let t = Threshold::new(127);
        assert!(!t.is_foreground(127));
        assert!(t.is_foreground(128));
    }
}
