use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::business::DEFAULT_MARKERS;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Gallery carousel settings.
    pub carousel: CarouselOptions,
    /// Optional business-info document and the placeholders it fills.
    pub business_info: Option<BusinessInfoOptions>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.carousel
            .validate()
            .context("invalid carousel configuration")?;
        if let Some(info) = &self.business_info {
            info.validate()?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CarouselOptions {
    /// Image references in display order.
    pub images: Vec<String>,
    /// Period of the recurring auto-advance.
    #[serde(with = "humantime_serde")]
    pub auto_advance: Duration,
    /// Duration of one animated step.
    #[serde(with = "humantime_serde")]
    pub transition: Duration,
    /// CSS timing function applied to animated steps.
    pub easing: String,
    /// Which manual navigation controls are present.
    pub controls: ControlOptions,
}

impl CarouselOptions {
    const fn default_auto_advance() -> Duration {
        Duration::from_millis(5000)
    }

    const fn default_transition() -> Duration {
        Duration::from_millis(1200)
    }

    fn default_easing() -> String {
        "cubic-bezier(0.65, 0, 0.35, 1)".to_string()
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.images.is_empty(),
            "carousel.images must list at least one image"
        );
        ensure!(
            self.auto_advance > Duration::ZERO,
            "carousel.auto-advance must be positive"
        );
        ensure!(
            self.transition > Duration::ZERO,
            "carousel.transition must be positive"
        );
        ensure!(
            self.transition < self.auto_advance,
            "carousel.transition must be shorter than carousel.auto-advance"
        );
        ensure!(
            !self.easing.trim().is_empty(),
            "carousel.easing must not be empty"
        );
        Ok(())
    }
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            auto_advance: Self::default_auto_advance(),
            transition: Self::default_transition(),
            easing: Self::default_easing(),
            controls: ControlOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControlOptions {
    pub previous: bool,
    pub next: bool,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            previous: true,
            next: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BusinessInfoOptions {
    /// JSON document describing the business.
    pub source: PathBuf,
    /// Placeholder markers present on the page, in document order.
    #[serde(default = "BusinessInfoOptions::default_markers")]
    pub markers: Vec<String>,
}

impl BusinessInfoOptions {
    fn default_markers() -> Vec<String> {
        DEFAULT_MARKERS.iter().map(|m| (*m).to_string()).collect()
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.source.as_os_str().is_empty(),
            "business-info.source must not be empty"
        );
        Ok(())
    }
}
