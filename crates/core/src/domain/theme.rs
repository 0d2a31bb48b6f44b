use std::fmt;

use serde::{Deserialize, Serialize};

/// Page color scheme. Only `Dark` is ever written to the theme slot; `Light`
/// is represented by the slot being absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const DARK_FLAG: &'static str = "dark";

    pub fn from_slot(value: Option<&str>) -> Self {
        match value {
            Some(Self::DARK_FLAG) => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn only_exact_dark_flag_selects_dark() {
        assert_eq!(Theme::from_slot(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_slot(Some("Dark")), Theme::Light);
        assert_eq!(Theme::from_slot(Some("light")), Theme::Light);
        assert_eq!(Theme::from_slot(None), Theme::Light);
    }

    #[test]
    fn toggling_twice_returns_to_start() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
