//! ============================================================================
//! Modes - Behavior selectors for the response engine
//! ============================================================================
//! Each mode picks the strategy that handles input:
//! - **Standard** (v1): recall, structured and implicit teaching
//! - **Analytic** (v2): recall with rationale and process steps
//! - **WebAugmented** (v6): remote lookup with auto-save
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Behavior selector, cycled by an explicit toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Standard,
    Analytic,
    WebAugmented,
}

impl Mode {
    /// Toggle order
    pub const ALL: [Mode; 3] = [Mode::Standard, Mode::Analytic, Mode::WebAugmented];

    /// Short badge id shown next to replies
    pub fn id(&self) -> &'static str {
        match self {
            Mode::Standard => "v1",
            Mode::Analytic => "v2",
            Mode::WebAugmented => "v6",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Standard => "v1.5 Standard",
            Mode::Analytic => "v2 DeepThought",
            Mode::WebAugmented => "v6 Web Surfer",
        }
    }

    /// Accent colour as RGB
    pub fn accent(&self) -> (u8, u8, u8) {
        match self {
            Mode::Standard => (0xA3, 0xA3, 0xA3),
            Mode::Analytic => (0x60, 0xa5, 0xfa),
            Mode::WebAugmented => (0x8b, 0x5c, 0xf6),
        }
    }

    /// Next mode in toggle order, wrapping around
    pub fn next(&self) -> Mode {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "standard" => Ok(Mode::Standard),
            "v2" | "analytic" | "deep" => Ok(Mode::Analytic),
            "v6" | "web" | "web_augmented" | "web-augmented" => Ok(Mode::WebAugmented),
            _ => Err(format!(
                "Unknown mode: {}. Valid values: v1/standard, v2/analytic, v6/web",
                s
            )),
        }
    }
}
