use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Slide count of the stock presentation.
pub const DEFAULT_SLIDE_COUNT: usize = 11;

/// Top-level configuration for the slide deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// How long the transition lock is held after a slide change.
    pub transition_ms: f64,
    /// Minimum `|deltaY|` of a wheel event before it navigates.
    pub wheel_threshold: f64,
    /// Minimum vertical travel of a touch swipe before it navigates.
    pub swipe_threshold: f64,
    /// Element id whose subtree keeps native wheel behaviour (the globe).
    pub wheel_exclusion_id: Option<String>,
    /// Effect per slide, by index. Slides past the end get no effect.
    pub effects: Vec<EffectKind>,
    pub feeds: FeedConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            transition_ms: 800.0,
            wheel_threshold: 50.0,
            swipe_threshold: 50.0,
            wheel_exclusion_id: Some("earth-container".to_owned()),
            effects: default_effects(DEFAULT_SLIDE_COUNT),
            feeds: FeedConfig::default(),
        }
    }
}

impl DeckConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Effect configured for `index`, `EffectKind::None` when unset.
    pub fn effect_for(&self, index: usize) -> EffectKind {
        self.effects.get(index).copied().unwrap_or(EffectKind::None)
    }
}

/// Stock layout: light particles on the title slide, the globe on slide 1,
/// stat counters on slide 2, the NDVI time-lapse on slide 5 and alternating
/// particle fields everywhere else.
pub fn default_effects(slides: usize) -> Vec<EffectKind> {
    (0..slides)
        .map(|i| match i {
            0 => EffectKind::Particles { variant: ParticleVariant::Light },
            1 => EffectKind::Globe,
            2 => EffectKind::Stats,
            5 => EffectKind::Timelapse,
            // slide numbers are 1-based in the deck: odd numbers are light
            _ if i % 2 == 0 => EffectKind::Particles { variant: ParticleVariant::Light },
            _ => EffectKind::Particles { variant: ParticleVariant::Dark },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectKind {
    None,
    Particles { variant: ParticleVariant },
    Globe,
    Stats,
    /// Satellite NDVI time-lapse drawn on a 2D canvas.
    Timelapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleVariant {
    Light,
    Dark,
    /// Sparse and non-interactive, so it does not fight the globe.
    Earth,
}

/// Tunables of one particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub count: usize,
    pub link_distance: f64,
    pub link_opacity: f64,
    pub link_width: f64,
    pub speed: f64,
    pub max_radius: f64,
    pub opacity: f64,
    pub interactive: bool,
}

impl ParticleVariant {
    pub fn params(self) -> ParticleParams {
        match self {
            ParticleVariant::Light => ParticleParams {
                count: 120,
                link_distance: 120.0,
                link_opacity: 0.4,
                link_width: 1.0,
                speed: 0.6,
                max_radius: 2.0,
                opacity: 0.3,
                interactive: true,
            },
            ParticleVariant::Dark => ParticleParams {
                count: 150,
                link_distance: 120.0,
                link_opacity: 0.7,
                link_width: 1.5,
                speed: 0.8,
                max_radius: 2.0,
                opacity: 0.5,
                interactive: true,
            },
            ParticleVariant::Earth => ParticleParams {
                count: 80,
                link_distance: 100.0,
                link_opacity: 0.3,
                link_width: 0.8,
                speed: 0.4,
                max_radius: 1.5,
                opacity: 0.3,
                interactive: false,
            },
        }
    }
}

/// Brand palette shared by every particle field.
pub const PARTICLE_COLORS: [&str; 4] = ["#00bfa6", "#00D4FF", "#2ECC71", "#E0A82E"];

/// Refresh periods of the demo data feeds, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub carbon_price_ms: u32,
    pub carbon_totals_ms: u32,
    pub insights_ms: u32,
    pub alerts_ms: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            carbon_price_ms: 5_000,
            carbon_totals_ms: 10_000,
            insights_ms: 30_000,
            alerts_ms: 45_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_deck() {
        let cfg = DeckConfig::default();
        assert_eq!(cfg.transition_ms, 800.0);
        assert_eq!(cfg.effects.len(), DEFAULT_SLIDE_COUNT);
        assert_eq!(cfg.effect_for(1), EffectKind::Globe);
        assert_eq!(cfg.effect_for(2), EffectKind::Stats);
        assert_eq!(
            cfg.effect_for(3),
            EffectKind::Particles { variant: ParticleVariant::Dark }
        );
        assert_eq!(cfg.effect_for(5), EffectKind::Timelapse);
        assert_eq!(cfg.effect_for(42), EffectKind::None);
    }

    #[test]
    fn timelapse_parses_from_table() {
        let cfg = DeckConfig::from_json(r#"{ "effects": [{ "effect": "none" }, { "effect": "timelapse" }] }"#)
            .unwrap();
        assert_eq!(cfg.effect_for(1), EffectKind::Timelapse);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg = DeckConfig::from_json(
            r#"{ "transition_ms": 400, "effects": [{ "effect": "globe" }, { "effect": "none" }] }"#,
        )
        .unwrap();
        assert_eq!(cfg.transition_ms, 400.0);
        assert_eq!(cfg.wheel_threshold, 50.0);
        assert_eq!(cfg.effects, vec![EffectKind::Globe, EffectKind::None]);
        assert_eq!(cfg.feeds, FeedConfig::default());
    }

    #[test]
    fn particle_variant_parses_from_table() {
        let cfg = DeckConfig::from_json(
            r#"{ "effects": [{ "effect": "particles", "variant": "earth" }] }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.effect_for(0),
            EffectKind::Particles { variant: ParticleVariant::Earth }
        );
        assert!(!ParticleVariant::Earth.params().interactive);
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = DeckConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::error::DeckError::Config(_)));
    }
}
