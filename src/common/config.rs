use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::layout_engine::{Gravity, LayoutKind, Orientation};

pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tiling").join("config.toml"))
}

pub fn restore_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("tiling").join("layout.ron"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Layout a new screen starts with
    #[serde(default)]
    pub default_layout: LayoutKind,
    /// Layouts visited by next/previous layout, in order
    #[serde(default = "default_enabled_layouts")]
    pub enabled_layouts: Vec<LayoutKind>,
    /// Share of the width given to master tiles (0..1)
    #[serde(default = "default_master_ratio")]
    pub master_ratio: f64,
    /// Number of master tiles a master/stack layout starts with
    #[serde(default = "default_master_count")]
    pub master_count: usize,
    #[serde(default)]
    pub gaps: GapSettings,
    /// Apply gaps when only one tile is on screen
    #[serde(default = "yes")]
    pub gaps_on_single: bool,
    /// Rotate layouts by a quarter turn on screens taller than they are wide
    #[serde(default = "no")]
    pub auto_rotate_portrait: bool,
    #[serde(default)]
    pub gravity: Gravity,
    /// Orientation of the root container of the manual split layout
    #[serde(default)]
    pub split_orientation: Orientation,
}

/// Gap configuration for window spacing
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GapSettings {
    /// Outer gaps (space between windows and screen edges)
    #[serde(default)]
    pub outer: OuterGaps,
    /// Inner gaps (space between windows)
    #[serde(default)]
    pub inner: InnerGaps,
}

/// Outer gap configuration (space between windows and screen edges)
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OuterGaps {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

/// Inner gap configuration (space between windows)
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct InnerGaps {
    /// Horizontal gap between windows
    #[serde(default)]
    pub horizontal: f64,
    /// Vertical gap between windows
    #[serde(default)]
    pub vertical: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            default_layout: LayoutKind::default(),
            enabled_layouts: default_enabled_layouts(),
            master_ratio: default_master_ratio(),
            master_count: default_master_count(),
            gaps: GapSettings::default(),
            gaps_on_single: true,
            auto_rotate_portrait: false,
            gravity: Gravity::default(),
            split_orientation: Orientation::default(),
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.master_ratio > 0.0 && self.master_ratio < 1.0) {
            issues.push(format!(
                "master_ratio must be between 0 and 1 (exclusive), got {}",
                self.master_ratio
            ));
        }

        if self.enabled_layouts.is_empty() {
            issues.push("enabled_layouts must name at least one layout".to_string());
        } else if !self.enabled_layouts.contains(&self.default_layout) {
            issues.push(format!(
                "default_layout `{}` is not in enabled_layouts",
                self.default_layout
            ));
        }

        issues.extend(self.gaps.validate());

        issues
    }
}

impl GapSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.outer.validate());
        issues.extend(self.inner.validate());
        issues
    }
}

impl OuterGaps {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (name, value) in [
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
            ("right", self.right),
        ] {
            if value < 0.0 {
                issues.push(format!("outer gap {name} must be non-negative, got {value}"));
            }
        }
        issues
    }
}

impl InnerGaps {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.horizontal < 0.0 {
            issues.push(format!(
                "inner gap horizontal must be non-negative, got {}",
                self.horizontal
            ));
        }
        if self.vertical < 0.0 {
            issues.push(format!(
                "inner gap vertical must be non-negative, got {}",
                self.vertical
            ));
        }
        issues
    }
}

fn yes() -> bool { true }

fn no() -> bool { false }

fn default_master_ratio() -> f64 { 0.5 }

fn default_master_count() -> usize { 1 }

fn default_enabled_layouts() -> Vec<LayoutKind> {
    vec![
        LayoutKind::Half,
        LayoutKind::Grid,
        LayoutKind::Spiral,
        LayoutKind::Blade,
        LayoutKind::I3,
    ]
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => Ok(config),
            Err(e) => bail!("{e}"),
        }
    }

    /// Save the current config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.layout.validate() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_file_matches_default_config() {
        let config = Config::parse(include_str!("../../tiling.default.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.layout.master_ratio, 0.5);
        assert_eq!(config.layout.master_count, 1);
        assert!(config.layout.gaps_on_single);
        assert_eq!(config.layout.enabled_layouts.len(), 5);
    }

    #[test]
    fn parses_layout_settings() {
        let config = Config::parse(
            r#"
            [layout]
            default_layout = "grid"
            enabled_layouts = ["grid", "i3"]
            master_ratio = 0.6
            master_count = 2
            gaps_on_single = false
            gravity = "left"
            split_orientation = "vertical"

            [layout.gaps.outer]
            top = 8
            left = 8
            bottom = 8
            right = 8

            [layout.gaps.inner]
            horizontal = 4
            "#,
        )
        .unwrap();
        let layout = &config.layout;
        assert_eq!(layout.default_layout, LayoutKind::Grid);
        assert_eq!(layout.enabled_layouts, vec![LayoutKind::Grid, LayoutKind::I3]);
        assert_eq!(layout.master_count, 2);
        assert_eq!(layout.gravity, Gravity::Left);
        assert_eq!(layout.split_orientation, Orientation::Vertical);
        assert_eq!(layout.gaps.outer.left, 8.0);
        assert_eq!(layout.gaps.inner.horizontal, 4.0);
        assert_eq!(layout.gaps.inner.vertical, 0.0);
        assert!(!layout.gaps_on_single);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::parse("[layout]\nmaster_ratoi = 0.4\n").unwrap_err();
        assert!(err.to_string().contains("master_ratoi"));
    }

    #[test]
    fn validation_reports_every_problem() {
        let mut config = Config::default();
        config.layout.master_ratio = 1.5;
        config.layout.enabled_layouts = vec![LayoutKind::Blade];
        config.layout.gaps.outer.top = -1.0;
        config.layout.gaps.inner.vertical = -2.0;
        let issues = config.validate();
        assert_eq!(issues.len(), 4, "{issues:?}");
        assert!(issues[0].contains("master_ratio"));
        assert!(issues[1].contains("default_layout"));
    }

    #[test]
    fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.layout.master_count = 3;
        config.layout.gaps.inner.horizontal = 6.0;
        config.save(&path).unwrap();
        assert_eq!(Config::read(&path).unwrap(), config);
    }
}
