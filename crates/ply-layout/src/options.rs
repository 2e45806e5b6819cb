use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutMode {
    #[default]
    Force,
    Radial,
    BubbleForce,
    BubbleRadial,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 4] = [Self::Force, Self::Radial, Self::BubbleForce, Self::BubbleRadial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Force => "force",
            Self::Radial => "radial",
            Self::BubbleForce => "bubble+force",
            Self::BubbleRadial => "bubble+radial",
        }
    }

    /// Bubble modes keep members inside their group circles.
    pub fn is_bubble(&self) -> bool {
        matches!(self, Self::BubbleForce | Self::BubbleRadial)
    }

    pub fn is_radial(&self) -> bool {
        matches!(self, Self::Radial | Self::BubbleRadial)
    }

    /// Parses `name`, falling back to [`LayoutMode::Force`] for unknown names.
    pub fn parse_or_default(name: &str) -> Self {
        match name.parse() {
            Ok(mode) => mode,
            Err(_) => {
                tracing::warn!(mode = name, "unknown layout mode, falling back to force");
                Self::Force
            }
        }
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "+");
        match normalized.as_str() {
            "force" => Ok(Self::Force),
            "radial" => Ok(Self::Radial),
            "bubble+force" | "bubble" => Ok(Self::BubbleForce),
            "bubble+radial" => Ok(Self::BubbleRadial),
            _ => Err(Error::InvalidOption {
                name: "mode",
                message: format!("unknown layout mode `{s}`"),
            }),
        }
    }
}

impl From<String> for LayoutMode {
    fn from(value: String) -> Self {
        Self::parse_or_default(&value)
    }
}

impl From<LayoutMode> for String {
    fn from(value: LayoutMode) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub mode: LayoutMode,
    /// Many-body strength; negative repels.
    pub charge_strength: f64,
    pub link_distance: f64,
    pub gravity: f64,
    pub collision_strength: f64,
    /// Pull toward the component center, clamped to `[0, 1]`.
    pub component_attraction: f64,
    /// Pull toward the community center, clamped to `[0, 1]`.
    pub community_attraction: f64,
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    /// Cooling coefficient the integrator restarts at on activation.
    pub restart_alpha: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Force,
            charge_strength: -30.0,
            link_distance: 30.0,
            gravity: 0.05,
            collision_strength: 0.7,
            component_attraction: 0.5,
            community_attraction: 0.5,
            width: 960.0,
            height: 640.0,
            seed: 1,
            restart_alpha: 1.0,
        }
    }
}

impl LayoutOptions {
    /// Rejects values no layout can work with. Attractions are not checked; they are clamped.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("chargeStrength", self.charge_strength),
            ("linkDistance", self.link_distance),
            ("gravity", self.gravity),
            ("collisionStrength", self.collision_strength),
            ("componentAttraction", self.component_attraction),
            ("communityAttraction", self.community_attraction),
            ("restartAlpha", self.restart_alpha),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidOption {
                    name,
                    message: format!("expected a finite number, got {value}"),
                });
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOption {
                    name,
                    message: format!("expected a positive canvas size, got {value}"),
                });
            }
        }
        if self.link_distance < 0.0 {
            return Err(Error::InvalidOption {
                name: "linkDistance",
                message: format!("expected a non-negative distance, got {}", self.link_distance),
            });
        }
        if !(0.0..=1.0).contains(&self.restart_alpha) {
            return Err(Error::InvalidOption {
                name: "restartAlpha",
                message: format!("expected a value in [0, 1], got {}", self.restart_alpha),
            });
        }
        Ok(())
    }

    /// Copy with attractions clamped into `[0, 1]`.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.component_attraction = clamp_unit(out.component_attraction);
        out.community_attraction = clamp_unit(out.community_attraction);
        out
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
