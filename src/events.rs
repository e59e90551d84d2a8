// TempWatch - Status Types

use crate::config::{STATUS_RED_FROM_C, STATUS_YELLOW_FROM_C};

// ---------------------------------------------------------------------------
// Tri-color status indicator
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Green,
    Yellow,
    Red,
}

impl IndicatorColor {
    /// Map a temperature onto the indicator bands.  Anything that is not
    /// below the red threshold (including NaN) shows red.
    pub fn from_temperature(celsius: f32) -> Self {
        if celsius < STATUS_YELLOW_FROM_C {
            Self::Green
        } else if celsius < STATUS_RED_FROM_C {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    /// Channel levels as `(red, green, blue)`.
    pub fn rgb(self) -> (bool, bool, bool) {
        match self {
            Self::Green  => (false, true, false),
            Self::Yellow => (true, true, false),
            Self::Red    => (true, false, false),
        }
    }
}

// ---------------------------------------------------------------------------
// Alarm state (owned by the alarm task)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmState {
    /// Armed: the next excursion above the threshold raises the alarm.
    #[default]
    Idle,
    /// Raised and not yet re-armed by the temperature returning to normal.
    Active,
}
