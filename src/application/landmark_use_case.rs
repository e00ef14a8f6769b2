// ============================================================
// Layer 2 — LandmarkUseCase
// ============================================================
// Draws a predicted mouth onto a face image:
//
//   Step 1: Read normalised features (JSON array)   (serde_json)
//   Step 2: Restore pixel keypoints                 (Layer 7 - vision)
//   Step 3: Draw the lip contour                    (Layer 7 - vision)
//   Step 4: Save the annotated image                (image)

use anyhow::{Context, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::vision::{
    lips::{draw_lips, LineStyle},
    transform::original_keypoints,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkConfig {
    /// JSON array: x values followed by y values
    pub features:  PathBuf,
    pub image:     PathBuf,
    pub output:    PathBuf,
    pub scale:     f64,
    /// Radians
    pub tilt:      f64,
    pub mean:      [f64; 2],
    pub color:     [u8; 3],
    pub thickness: u32,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            features:  PathBuf::from("features.json"),
            image:     PathBuf::from("face.png"),
            output:    PathBuf::from("face_lips.png"),
            scale:     1.0,
            tilt:      0.0,
            mean:      [0.0, 0.0],
            color:     [255, 255, 255],
            thickness: 1,
        }
    }
}

pub struct LandmarkUseCase {
    config: LandmarkConfig,
}

impl LandmarkUseCase {
    pub fn new(config: LandmarkConfig) -> Self {
        Self { config }
    }

    /// Returns the keypoints that were drawn.
    pub fn execute(&self) -> Result<Vec<[i32; 2]>> {
        let cfg = &self.config;

        let text = fs::read_to_string(&cfg.features)
            .with_context(|| format!("Cannot read '{}'", cfg.features.display()))?;
        let features: Vec<f64> = serde_json::from_str(&text)
            .with_context(|| format!("'{}' is not a JSON array of numbers", cfg.features.display()))?;

        let keypoints = original_keypoints(&features, cfg.scale, cfg.tilt, cfg.mean)?;
        tracing::debug!("Restored {} keypoints", keypoints.len());

        let mut img = image::open(&cfg.image)
            .with_context(|| format!("Cannot open image '{}'", cfg.image.display()))?
            .to_rgb8();
        let style = LineStyle { color: Rgb(cfg.color), thickness: cfg.thickness };
        draw_lips(&keypoints, &mut img, style)?;

        img.save(&cfg.output)
            .with_context(|| format!("Cannot save image to '{}'", cfg.output.display()))?;
        tracing::info!("Wrote '{}'", cfg.output.display());

        Ok(keypoints)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    /// 20 mouth points on a ring of radius 10 around the origin
    fn mouth_features() -> Vec<f64> {
        let angles: Vec<f64> = (0..20).map(|i| i as f64 * std::f64::consts::TAU / 20.0).collect();
        let xs = angles.iter().map(|a| a.cos() * 10.0);
        let ys = angles.iter().map(|a| a.sin() * 10.0);
        xs.chain(ys).collect()
    }

    fn config(tmp: &TempDir) -> LandmarkConfig {
        let image = tmp.path().join("face.png");
        RgbImage::new(64, 64).save(&image).unwrap();
        let features = tmp.path().join("mouth.json");
        fs::write(&features, serde_json::to_string(&mouth_features()).unwrap()).unwrap();

        LandmarkConfig {
            features,
            image,
            output: tmp.path().join("out.png"),
            mean: [32.0, 32.0],
            color: [0, 255, 0],
            ..Default::default()
        }
    }

    #[test]
    fn test_draws_mouth_onto_image() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        let keypoints = LandmarkUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(keypoints.len(), 20);
        assert_eq!(keypoints[0], [42, 32]);

        let out = image::open(&cfg.output).unwrap().to_rgb8();
        assert_eq!(*out.get_pixel(42, 32), Rgb([0, 255, 0]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_wrong_number_of_points_fails() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        fs::write(&cfg.features, "[1.0, 2.0, 3.0, 4.0]").unwrap();
        assert!(LandmarkUseCase::new(cfg.clone()).execute().is_err());
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_malformed_features_fail() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        fs::write(&cfg.features, "{\"x\": 1}").unwrap();
        assert!(LandmarkUseCase::new(cfg).execute().is_err());
    }
}
