//! Chart parameters (display-side configuration) and their domains.
//!
//! Every field has a default matching the app's Fraktionen chart, so an
//! empty parameter file (`{}`) is valid.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_NO_AFFILIATION_MARKER: &str = "fraktionslos";
pub const DEFAULT_MATCHES_LABEL: &str = "Übereinstimmungen";
pub const DEFAULT_DIFFS_LABEL: &str = "Differenzen";
pub const DEFAULT_MATCHES_COLOR: &str = "#f5a623";
pub const DEFAULT_DIFFS_COLOR: &str = "#b1b3b4";
pub const DEFAULT_NOTE: &str = "Hohe Übereinstimmungen Ihrer Stellungnahmen mit mehreren Parteien \
bedeuten nicht zwangsläufig eine inhaltliche Nähe dieser Parteien zueinander";

/// `#rrggbb`, stored lowercase.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for HexColor {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').ok_or(CoreError::InvalidColor)?;
        if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(CoreError::InvalidColor)
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> String { c.0 }
}

fn default_marker() -> String { DEFAULT_NO_AFFILIATION_MARKER.to_string() }
fn default_matches_label() -> String { DEFAULT_MATCHES_LABEL.to_string() }
fn default_diffs_label() -> String { DEFAULT_DIFFS_LABEL.to_string() }
fn default_matches_color() -> HexColor { HexColor(DEFAULT_MATCHES_COLOR.to_string()) }
fn default_diffs_color() -> HexColor { HexColor(DEFAULT_DIFFS_COLOR.to_string()) }
fn default_note() -> String { DEFAULT_NOTE.to_string() }

/// Display-side configuration for the party comparison chart.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ChartParams {
    /// Party value excluded from all tallies.
    #[cfg_attr(feature = "serde", serde(default = "default_marker"))]
    pub no_affiliation_marker: String,
    #[cfg_attr(feature = "serde", serde(default = "default_matches_label"))]
    pub matches_label: String,
    #[cfg_attr(feature = "serde", serde(default = "default_diffs_label"))]
    pub diffs_label: String,
    #[cfg_attr(feature = "serde", serde(default = "default_matches_color"))]
    pub matches_color: HexColor,
    #[cfg_attr(feature = "serde", serde(default = "default_diffs_color"))]
    pub diffs_color: HexColor,
    #[cfg_attr(feature = "serde", serde(default = "default_note"))]
    pub note: String,
}

impl Default for ChartParams {
    fn default() -> Self {
        Self {
            no_affiliation_marker: default_marker(),
            matches_label: default_matches_label(),
            diffs_label: default_diffs_label(),
            matches_color: default_matches_color(),
            diffs_color: default_diffs_color(),
            note: default_note(),
        }
    }
}

/// Reject parameter sets a chart cannot be drawn from.
pub fn validate_domains(p: &ChartParams) -> Result<(), CoreError> {
    if p.no_affiliation_marker.trim().is_empty() {
        return Err(CoreError::DomainOutOfRange("no_affiliation_marker"));
    }
    if p.matches_label.trim().is_empty() {
        return Err(CoreError::DomainOutOfRange("matches_label"));
    }
    if p.diffs_label.trim().is_empty() {
        return Err(CoreError::DomainOutOfRange("diffs_label"));
    }
    if p.matches_label == p.diffs_label {
        return Err(CoreError::DomainOutOfRange("labels must differ"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_app_chart() {
        let p = ChartParams::default();
        assert_eq!(p.no_affiliation_marker, "fraktionslos");
        assert_eq!(p.matches_color.as_str(), "#f5a623");
        assert_eq!(p.diffs_color.as_str(), "#b1b3b4");
        assert!(validate_domains(&p).is_ok());
    }

    #[test]
    fn color_parsing() {
        assert_eq!("#F5A623".parse::<HexColor>().unwrap().as_str(), "#f5a623");
        assert_eq!("f5a623".parse::<HexColor>(), Err(CoreError::InvalidColor));
        assert_eq!("#f5a62".parse::<HexColor>(), Err(CoreError::InvalidColor));
        assert_eq!("#gggggg".parse::<HexColor>(), Err(CoreError::InvalidColor));
    }

    #[test]
    fn empty_marker_rejected() {
        let p = ChartParams { no_affiliation_marker: " ".into(), ..ChartParams::default() };
        assert_eq!(validate_domains(&p), Err(CoreError::DomainOutOfRange("no_affiliation_marker")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn empty_object_yields_defaults() {
        let p: ChartParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p, ChartParams::default());
        assert!(serde_json::from_str::<ChartParams>(r#"{"matches_color":"red"}"#).is_err());
    }
}
