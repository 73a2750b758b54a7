//! Presentation preferences
//!
//! Read from the page URL query string, e.g. `?quality=low&fps=0&seed=42`.
//! Gameplay tuning stays in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::TREASURE_COUNT;
use crate::renderer::MAX_TREASURES;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Ray-march step budget per pixel
    pub fn march_steps(&self) -> u32 {
        match self {
            QualityPreset::Low => 48,
            QualityPreset::Medium => 96,
            QualityPreset::High => 160,
        }
    }

    /// Whether to render caustics, bubbles and light shafts
    pub fn water_effects_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Show FPS counter
    pub show_fps: bool,
    /// Reduced motion (freezes water effects, seaweed sway and glow pulsing)
    pub reduced_motion: bool,
    /// Fixed session seed (random per session when unset)
    pub seed: Option<u64>,
    /// Treasures spawned per session
    pub treasure_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_fps: true,
            reduced_motion: false,
            seed: None,
            treasure_count: TREASURE_COUNT,
        }
    }
}

impl Settings {
    /// Parse settings from a URL query string (leading `?` optional).
    ///
    /// Unknown keys and malformed values are ignored and keep their defaults.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "quality" => match QualityPreset::parse(value) {
                    Some(preset) => settings.quality = preset,
                    None => log::warn!("Unknown quality preset: {}", value),
                },
                "fps" => settings.show_fps = parse_flag(value),
                "reduced_motion" => settings.reduced_motion = parse_flag(value),
                "seed" => match value.parse() {
                    Ok(seed) => settings.seed = Some(seed),
                    Err(_) => log::warn!("Ignoring invalid seed: {}", value),
                },
                "treasures" => match value.parse::<usize>() {
                    Ok(count) => settings.treasure_count = count.min(MAX_TREASURES),
                    Err(_) => log::warn!("Ignoring invalid treasure count: {}", value),
                },
                _ => log::debug!("Ignoring unknown setting: {}", key),
            }
        }

        settings
    }

    /// Whether glow, seaweed and water effects should animate
    pub fn animate_effects(&self) -> bool {
        !self.reduced_motion
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "" | "1" | "true" | "on" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_query("");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.treasure_count, 10);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_parse_query() {
        let settings = Settings::from_query("?quality=High&fps=0&reduced_motion&seed=42&treasures=5");
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(!settings.show_fps);
        assert!(settings.reduced_motion);
        assert!(!settings.animate_effects());
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.treasure_count, 5);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let settings = Settings::from_query("quality=ultra&seed=abc&treasures=-1&bogus=1");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_treasure_count_capped() {
        let settings = Settings::from_query("treasures=1000");
        assert_eq!(settings.treasure_count, MAX_TREASURES);
    }

    #[test]
    fn test_preset_budgets() {
        assert!(QualityPreset::Low.march_steps() < QualityPreset::High.march_steps());
        assert!(!QualityPreset::Low.water_effects_enabled());
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::Medium.as_str(), "Medium");
    }
}
