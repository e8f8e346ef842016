use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Open bound used for the unbounded side of the lowest and highest levels.
pub const OPEN_BOUND: f64 = 1e10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "sed")]
    Sedentary,
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "mod")]
    Moderate,
    #[serde(rename = "vig")]
    Vigorous,
    #[serde(rename = "MVPA")]
    Mvpa,
    #[serde(rename = "SLPA")]
    Slpa,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 6] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Vigorous,
        Self::Mvpa,
        Self::Slpa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sed",
            Self::Light => "light",
            Self::Moderate => "mod",
            Self::Vigorous => "vig",
            Self::Mvpa => "MVPA",
            Self::Slpa => "SLPA",
        }
    }
}

impl Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sed" | "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "mod" | "moderate" => Ok(Self::Moderate),
            "vig" | "vigorous" => Ok(Self::Vigorous),
            "mvpa" => Ok(Self::Mvpa),
            "slpa" => Ok(Self::Slpa),
            _ => Err(ConfigError::InvalidLevel(s.to_string())),
        }
    }
}

/// Half-open `[lower, upper)` band on the acceleration metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

impl Thresholds {
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        if lower.is_nan() || upper.is_nan() || lower >= upper {
            return Err(ConfigError::MalformedCutpoints(format!(
                "lower threshold {lower} must be below upper threshold {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value < self.upper
    }

    /// Per-epoch intensity mask.
    pub fn mask(&self, metric: &[f64]) -> Vec<u8> {
        metric.iter().map(|&v| u8::from(self.contains(v))).collect()
    }

    pub fn count(&self, metric: &[f64]) -> usize {
        metric.iter().filter(|&&v| self.contains(v)).count()
    }
}

/// Upper bounds of the sedentary, light and moderate levels, in g.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cutpoints {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
}

impl Cutpoints {
    pub const DEFAULT_SET: &'static str = "migueles_wrist_adult";

    pub const MIGUELES_WRIST_ADULT: Cutpoints = Cutpoints {
        sedentary: 0.050,
        light: 0.110,
        moderate: 0.440,
    };

    pub const HILDEBRAND_WRIST_ADULT_GENEACTIV: Cutpoints = Cutpoints {
        sedentary: 0.0448,
        light: 0.1006,
        moderate: 0.4288,
    };

    pub const HILDEBRAND_WRIST_ADULT_ACTIGRAPH: Cutpoints = Cutpoints {
        sedentary: 0.0474,
        light: 0.0691,
        moderate: 0.2587,
    };

    pub const NAMED: [(&'static str, Cutpoints); 3] = [
        ("migueles_wrist_adult", Self::MIGUELES_WRIST_ADULT),
        (
            "hildebrand_wrist_adult_geneactiv",
            Self::HILDEBRAND_WRIST_ADULT_GENEACTIV,
        ),
        (
            "hildebrand_wrist_adult_actigraph",
            Self::HILDEBRAND_WRIST_ADULT_ACTIGRAPH,
        ),
    ];

    /// Looks up a named set; `None` selects the default adult wrist set.
    pub fn named(name: Option<&str>) -> Result<Self, ConfigError> {
        let name = name.unwrap_or(Self::DEFAULT_SET);
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
            .ok_or_else(|| ConfigError::UnknownCutpoints(name.to_string()))
    }

    /// Resolves the band for `level`. Only the band itself is validated;
    /// overlap between levels is allowed.
    pub fn thresholds(&self, level: ActivityLevel) -> Result<Thresholds, ConfigError> {
        for (label, value) in [
            ("sedentary", self.sedentary),
            ("light", self.light),
            ("moderate", self.moderate),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::MalformedCutpoints(format!(
                    "{label} cutpoint is not finite"
                )));
            }
        }

        let (lower, upper) = match level {
            ActivityLevel::Sedentary => (-OPEN_BOUND, self.sedentary),
            ActivityLevel::Light => (self.sedentary, self.light),
            ActivityLevel::Moderate => (self.light, self.moderate),
            ActivityLevel::Vigorous => (self.moderate, OPEN_BOUND),
            ActivityLevel::Mvpa => (self.light, OPEN_BOUND),
            ActivityLevel::Slpa => (-OPEN_BOUND, self.light),
        };

        Thresholds::new(lower, upper)
    }
}

impl Default for Cutpoints {
    fn default() -> Self {
        Self::MIGUELES_WRIST_ADULT
    }
}

/// Behavioral state a calculator is restricted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointState {
    #[default]
    Wake,
    Sleep,
}

impl EndpointState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wake => "wake",
            Self::Sleep => "sleep",
        }
    }

    /// Column name for a statistic computed in this state.
    pub fn column(&self, name: impl Display) -> String {
        format!("{} {}", self.as_str(), name)
    }
}

impl Display for EndpointState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wake" => Ok(Self::Wake),
            "sleep" => Ok(Self::Sleep),
            _ => Err(ConfigError::InvalidState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!("MVPA".parse::<ActivityLevel>(), Ok(ActivityLevel::Mvpa));
        assert_eq!("mvpa".parse::<ActivityLevel>(), Ok(ActivityLevel::Mvpa));
        assert_eq!("Sedentary".parse::<ActivityLevel>(), Ok(ActivityLevel::Sedentary));
        assert_eq!("mod".parse::<ActivityLevel>(), Ok(ActivityLevel::Moderate));
    }

    #[test]
    fn unknown_level_is_config_error() {
        assert_eq!(
            "medium".parse::<ActivityLevel>(),
            Err(ConfigError::InvalidLevel("medium".into()))
        );
    }

    #[test]
    fn default_set_thresholds() {
        let cp = Cutpoints::named(None).unwrap();
        assert_eq!(cp, Cutpoints::MIGUELES_WRIST_ADULT);

        let light = cp.thresholds(ActivityLevel::Light).unwrap();
        assert_eq!(light, Thresholds { lower: 0.050, upper: 0.110 });

        let mvpa = cp.thresholds(ActivityLevel::Mvpa).unwrap();
        assert_eq!(mvpa.lower, 0.110);
        assert_eq!(mvpa.upper, OPEN_BOUND);

        let sed = cp.thresholds(ActivityLevel::Sedentary).unwrap();
        assert_eq!(sed.lower, -OPEN_BOUND);
    }

    #[test]
    fn unknown_set_is_config_error() {
        assert!(matches!(
            Cutpoints::named(Some("nope")),
            Err(ConfigError::UnknownCutpoints(_))
        ));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let cp = Cutpoints {
            sedentary: 0.2,
            light: 0.1,
            moderate: 0.4,
        };
        assert!(cp.thresholds(ActivityLevel::Light).is_err());
        // other bands are untouched by the bad light cutpoint
        assert!(cp.thresholds(ActivityLevel::Vigorous).is_ok());
    }

    #[test]
    fn non_finite_cutpoint_is_rejected() {
        let cp = Cutpoints {
            sedentary: f64::NAN,
            light: 0.1,
            moderate: 0.4,
        };
        assert!(cp.thresholds(ActivityLevel::Vigorous).is_err());
    }

    #[test]
    fn band_is_half_open() {
        let t = Thresholds::new(0.1, 1.0).unwrap();
        assert!(t.contains(0.1));
        assert!(!t.contains(1.0));
        assert!(!t.contains(f64::NAN));
        assert_eq!(t.mask(&[0.0, 0.1, 0.5, 1.0]), vec![0, 1, 1, 0]);
        assert_eq!(t.count(&[0.0, 0.1, 0.5, 1.0]), 2);
    }

    #[test]
    fn state_prefixes_columns() {
        assert_eq!(EndpointState::Sleep.column("max acc 5min [g]"), "sleep max acc 5min [g]");
        assert_eq!(EndpointState::default(), EndpointState::Wake);
    }
}
