//! GPIO polarity
//!
//! Control lines on the Zest Display board are not all active high: the
//! XPT2046 pulls PENIRQ low while the panel is touched, the backlight
//! transistor is driven high. Drivers store an [`ActiveLevel`] instead of
//! hard-coding either convention.

/// Electrical level at which a control line is considered asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Asserted when the pin reads/drives high
    #[default]
    High,
    /// Asserted when the pin reads/drives low
    Low,
}

impl ActiveLevel {
    /// Whether a line currently at `level_high` is asserted
    pub const fn is_active(self, level_high: bool) -> bool {
        match self {
            ActiveLevel::High => level_high,
            ActiveLevel::Low => !level_high,
        }
    }

    /// Electrical level (true = high) that puts the line in the `active` state
    pub const fn level_for(self, active: bool) -> bool {
        match self {
            ActiveLevel::High => active,
            ActiveLevel::Low => !active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_active_low() {
        assert!(ActiveLevel::Low.is_active(false));
        assert!(!ActiveLevel::Low.is_active(true));
        assert!(!ActiveLevel::Low.level_for(true));
    }

    proptest! {
        #[test]
        fn level_for_is_inverse_of_is_active(active: bool, low: bool) {
            let polarity = if low { ActiveLevel::Low } else { ActiveLevel::High };
            prop_assert_eq!(polarity.is_active(polarity.level_for(active)), active);
        }
    }
}
