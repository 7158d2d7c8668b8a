//! Top-level dashboard views and their tab registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::SpmError;

// ──────────────────── views ────────────────────

/// Top-level sections of the dashboard panel.
///
/// Exactly one view is visible at a time. Number keys `1`–`7` map onto the
/// declaration order below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Summary cards for every subsystem.
    #[default]
    Overview,
    /// Active persona and persona mixing.
    Persona,
    /// Loaded skills and technique details.
    Skills,
    /// Evolution level and progress history.
    Evolution,
    /// Multi-tab statistics body.
    Statistics,
    /// Manual controls (refresh, pause, reset).
    Control,
    /// Multi-tab settings body, including the danger zone.
    Settings,
}

/// Total number of views (used for prev/next wrapping).
const VIEW_COUNT: u8 = 7;

/// Every view in navigation order.
pub const ALL_VIEWS: [View; VIEW_COUNT as usize] = [
    View::Overview,
    View::Persona,
    View::Skills,
    View::Evolution,
    View::Statistics,
    View::Control,
    View::Settings,
];

const STATISTICS_TABS: &[&str] = &[
    "overview",
    "performance",
    "evolution",
    "interactions",
    "trends",
];

const SETTINGS_TABS: &[&str] = &["general", "display", "notifications", "data"];

impl View {
    /// 1-based view number for hotkey mapping.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Overview => 1,
            Self::Persona => 2,
            Self::Skills => 3,
            Self::Evolution => 4,
            Self::Statistics => 5,
            Self::Control => 6,
            Self::Settings => 7,
        }
    }

    /// Resolve a 1-based number key to a view. Returns `None` for out-of-range.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Overview),
            2 => Some(Self::Persona),
            3 => Some(Self::Skills),
            4 => Some(Self::Evolution),
            5 => Some(Self::Statistics),
            6 => Some(Self::Control),
            7 => Some(Self::Settings),
            _ => None,
        }
    }

    /// Next view in navigation order, wrapping Settings → Overview.
    #[must_use]
    pub const fn next(self) -> Self {
        let n = self.number() % VIEW_COUNT + 1;
        match Self::from_number(n) {
            Some(v) => v,
            None => Self::Overview,
        }
    }

    /// Previous view in navigation order, wrapping Overview → Settings.
    #[must_use]
    pub const fn prev(self) -> Self {
        let n = if self.number() == 1 {
            VIEW_COUNT
        } else {
            self.number() - 1
        };
        match Self::from_number(n) {
            Some(v) => v,
            None => Self::Settings,
        }
    }

    /// Stable identifier used by event wiring and configuration.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Persona => "persona",
            Self::Skills => "skills",
            Self::Evolution => "evolution",
            Self::Statistics => "statistics",
            Self::Control => "control",
            Self::Settings => "settings",
        }
    }

    /// Human-readable title for panel headers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Persona => "Persona",
            Self::Skills => "Skills",
            Self::Evolution => "Evolution",
            Self::Statistics => "Statistics",
            Self::Control => "Control",
            Self::Settings => "Settings",
        }
    }

    /// Tabs registered for this view; empty when the view has a single body.
    #[must_use]
    pub const fn tabs(self) -> &'static [&'static str] {
        match self {
            Self::Statistics => STATISTICS_TABS,
            Self::Settings => SETTINGS_TABS,
            _ => &[],
        }
    }

    /// Tab selected when the view is entered.
    #[must_use]
    pub fn default_tab(self) -> Option<&'static str> {
        self.tabs().first().copied()
    }

    /// Resolve a tab identifier to its registered static name.
    #[must_use]
    pub fn find_tab(self, tab: &str) -> Option<&'static str> {
        self.tabs().iter().copied().find(|t| *t == tab)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for View {
    type Err = SpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_VIEWS
            .iter()
            .copied()
            .find(|v| v.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SpmError::InvalidView {
                requested: s.to_string(),
            })
    }
}
