//! JSON configuration and report helpers for card scanning.

use crate::{CardDetectionResult, CardDetector, CardSize, ScanParams, ScanStats};
use cardscan_core::Quadrilateral;
use cardscan_imgproc::{BinarizeParams, PolygonParams};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum ScanConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for a scan run. Unset fields keep the [`ScanParams`]
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub image_path: String,
    /// Directory for rectified card images.
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub blur_radius: Option<u32>,
    #[serde(default)]
    pub binarize: Option<BinarizeParams>,
    #[serde(default)]
    pub polygon: Option<PolygonParams>,
    #[serde(default)]
    pub area_tolerance_percent: Option<f64>,
    /// Output resolution for a poker-size card; ignored when `card_size` is set.
    #[serde(default)]
    pub px_per_mm: Option<f32>,
    #[serde(default)]
    pub card_size: Option<CardSize>,
}

impl ScanConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScanConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScanConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ScanConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ScanConfigError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("cards"))
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("scan_report.json"))
    }

    /// Build detector parameters, applying overrides from the config.
    pub fn build_params(&self) -> ScanParams {
        let mut params = ScanParams::default();
        if let Some(blur_radius) = self.blur_radius {
            params.blur_radius = blur_radius;
        }
        if let Some(binarize) = self.binarize {
            params.binarize = binarize;
        }
        if let Some(polygon) = self.polygon {
            params.polygon = polygon;
        }
        if let Some(tolerance) = self.area_tolerance_percent {
            params.area_tolerance_percent = tolerance;
        }
        if let Some(px_per_mm) = self.px_per_mm {
            params.card_size = CardSize::from_mm(CardSize::WIDTH_MM, CardSize::HEIGHT_MM, px_per_mm);
        }
        if let Some(card_size) = self.card_size {
            params.card_size = card_size;
        }
        params
    }

    pub fn build_detector(&self) -> CardDetector {
        CardDetector::new(self.build_params())
    }
}

/// Per-card entry of a [`ScanReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardReport {
    pub index: usize,
    /// Source corners in top-left, top-right, bottom-right, bottom-left order.
    pub quad: Quadrilateral,
    pub h_img_from_card: [[f64; 3]; 3],
    #[serde(default)]
    pub path: Option<String>,
}

/// Serializable summary of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub image_path: String,
    pub card_width: u32,
    pub card_height: u32,
    pub cards: Vec<CardReport>,
    pub stats: ScanStats,
}

impl ScanReport {
    pub fn new(image_path: impl Into<String>, params: &ScanParams, result: &CardDetectionResult) -> Self {
        let cards = result
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| CardReport {
                index,
                quad: card.quad,
                h_img_from_card: card.h_img_from_card.to_array(),
                path: None,
            })
            .collect();
        Self {
            image_path: image_path.into(),
            card_width: params.card_size.width,
            card_height: params.card_size.height,
            cards,
            stats: result.stats,
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScanConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ScanConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
