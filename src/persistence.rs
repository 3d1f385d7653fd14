//! Configuration persistence: load and save [`RefLineConfig`] as JSON or YAML.
//!
//! This module provides serializable mirror types for config parts that
//! cannot directly derive serde traits (egui types like Color32, LineStyle).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RefLineConfig;
use crate::data::geometry::ViewRect;
use crate::data::line_look::LineLook;
use crate::error::{RefLineError, Result};
use crate::ref_lines::{RefLineDef, RefLineKind};

// ---------- Serializable mirror types ----------

/// Serializable version of egui_plot::LineStyle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SerLineStyle {
    Solid,
    Dashed { length: f32 },
    Dotted { spacing: f32 },
}

/// Serializable version of LineLook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineLookSerde {
    pub color_rgba: [u8; 4],
    #[serde(default = "default_true")]
    pub visible: bool,
    pub width: f32,
    pub style: SerLineStyle,
}

fn default_true() -> bool {
    true
}

impl From<&LineLook> for LineLookSerde {
    fn from(l: &LineLook) -> Self {
        use egui_plot::LineStyle;
        let style = match l.style {
            LineStyle::Solid => SerLineStyle::Solid,
            LineStyle::Dashed { length } => SerLineStyle::Dashed { length },
            LineStyle::Dotted { spacing } => SerLineStyle::Dotted { spacing },
        };
        Self {
            color_rgba: [l.color.r(), l.color.g(), l.color.b(), l.color.a()],
            visible: l.visible,
            width: l.width,
            style,
        }
    }
}

impl LineLookSerde {
    /// Convert back to a LineLook.
    pub fn into_look(self) -> LineLook {
        use egui::Color32;
        use egui_plot::LineStyle;
        let style = match self.style {
            SerLineStyle::Solid => LineStyle::Solid,
            SerLineStyle::Dashed { length } => LineStyle::Dashed { length },
            SerLineStyle::Dotted { spacing } => LineStyle::Dotted { spacing },
        };
        LineLook {
            color: Color32::from_rgba_unmultiplied(
                self.color_rgba[0],
                self.color_rgba[1],
                self.color_rgba[2],
                self.color_rgba[3],
            ),
            visible: self.visible,
            width: self.width,
            style,
        }
    }
}

/// Serializable reference line entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefLineDefSerde {
    pub kind: RefLineKind,
    #[serde(default)]
    pub params: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look: Option<LineLookSerde>,
}

impl From<&RefLineDef> for RefLineDefSerde {
    fn from(d: &RefLineDef) -> Self {
        Self {
            kind: d.kind,
            params: d.params.clone(),
            look: d.look.as_ref().map(LineLookSerde::from),
        }
    }
}

impl RefLineDefSerde {
    pub fn into_def(self) -> RefLineDef {
        RefLineDef {
            kind: self.kind,
            params: self.params,
            look: self.look.map(LineLookSerde::into_look),
        }
    }
}

/// Serializable version of RefLineConfig. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefLineConfigSerde {
    pub title: String,
    pub plot_id: String,
    pub initial_view: ViewRect,
    pub auto_range: bool,
    pub show_legend: bool,
    pub default_look: LineLookSerde,
    pub lines: Vec<RefLineDefSerde>,
}

impl Default for RefLineConfigSerde {
    fn default() -> Self {
        Self::from(&RefLineConfig::default())
    }
}

impl From<&RefLineConfig> for RefLineConfigSerde {
    fn from(c: &RefLineConfig) -> Self {
        Self {
            title: c.title.clone(),
            plot_id: c.plot_id.clone(),
            initial_view: c.initial_view,
            auto_range: c.auto_range,
            show_legend: c.show_legend,
            default_look: LineLookSerde::from(&c.default_look),
            lines: c.lines.iter().map(RefLineDefSerde::from).collect(),
        }
    }
}

impl RefLineConfigSerde {
    pub fn into_config(self) -> RefLineConfig {
        RefLineConfig {
            title: self.title,
            plot_id: self.plot_id,
            // accept unordered ranges from hand-written files
            initial_view: ViewRect::new(self.initial_view.x_range(), self.initial_view.y_range()),
            auto_range: self.auto_range,
            show_legend: self.show_legend,
            default_look: self.default_look.into_look(),
            lines: self.lines.into_iter().map(RefLineDefSerde::into_def).collect(),
        }
    }
}

// ---------- File formats ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but yaml/yml is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Serialize a config.
pub fn config_to_string(
    cfg: &RefLineConfig,
    format: ConfigFormat,
) -> std::result::Result<String, String> {
    let ser = RefLineConfigSerde::from(cfg);
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&ser).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::to_string(&ser).map_err(|e| e.to_string()),
    }
}

/// Deserialize a config.
pub fn config_from_str(
    text: &str,
    format: ConfigFormat,
) -> std::result::Result<RefLineConfig, String> {
    let ser: RefLineConfigSerde = match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string())?,
    };
    Ok(ser.into_config())
}

/// Save a config, choosing JSON or YAML from the file extension.
pub fn save_config(cfg: &RefLineConfig, path: &Path) -> Result<()> {
    let txt = config_to_string(cfg, ConfigFormat::from_path(path))
        .map_err(|e| RefLineError::config(path, e))?;
    std::fs::write(path, txt)?;
    info!(path = %path.display(), "config saved");
    Ok(())
}

/// Load a config, choosing JSON or YAML from the file extension.
pub fn load_config(path: &Path) -> Result<RefLineConfig> {
    let txt = std::fs::read_to_string(path).map_err(|e| RefLineError::config(path, e))?;
    let cfg = config_from_str(&txt, ConfigFormat::from_path(path))
        .map_err(|e| RefLineError::config(path, e))?;
    info!(path = %path.display(), lines = cfg.lines.len(), "config loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_plot::LineStyle;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("noext")), ConfigFormat::Json);
    }

    #[test]
    fn look_keeps_dash_style() {
        let look = LineLook::default().with_style(LineStyle::Dashed { length: 3.0 });
        let back = LineLookSerde::from(&look).into_look();
        assert_eq!(back, look);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = config_from_str(
            r#"{ "lines": [ { "kind": "horizontal", "params": [2.5] } ] }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        assert_eq!(cfg.title, RefLineConfig::default().title);
        assert_eq!(cfg.lines, vec![RefLineDef::horizontal(2.5)]);
    }

    #[test]
    fn yaml_with_unordered_view() {
        let text = "
initial_view:
  x_min: 5.0
  x_max: -5.0
  y_min: 1.0
  y_max: -1.0
lines:
  - kind: vertical
  - kind: infinite
    params: [1.0, 0.0, 0.0]
";
        let cfg = config_from_str(text, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.initial_view.x_range(), (-5.0, 5.0));
        assert_eq!(cfg.initial_view.y_range(), (-1.0, 1.0));
        assert_eq!(cfg.lines[0].kind, RefLineKind::Vertical);
        assert!(cfg.lines[0].params.is_empty());
        assert_eq!(cfg.lines[1], RefLineDef::infinite(1.0, 0.0, 0.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(config_from_str("{ not json", ConfigFormat::Json).is_err());
    }
}
