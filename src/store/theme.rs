//! Light/dark render theme.

use serde::{Deserialize, Serialize};

/// Theme applied to the composed preview document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderTheme {
    #[default]
    Light,
    Dark,
}

impl RenderTheme {
    /// Value of the `color-scheme` declaration.
    pub const fn color_scheme(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Class set on the `<html>` element.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Light => "",
            Self::Dark => "dark",
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}
