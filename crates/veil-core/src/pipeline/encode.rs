//! Lossless PNG output and output path planning.

use image::{DynamicImage, ImageFormat};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::PipelineError;

/// Where transformed images go and what they are called.
#[derive(Debug, Clone)]
pub struct OutputPlanner {
    dir: Option<PathBuf>,
    overwrite: bool,
}

impl OutputPlanner {
    /// Planner writing under `dir`, or next to each input when `None`.
    pub fn new(dir: Option<PathBuf>, overwrite: bool) -> Self {
        Self { dir, overwrite }
    }

    /// Build a planner from the `[output]` settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.output_dir(), config.output.overwrite)
    }

    /// `<stem><suffix>.png`, next to the input or under the output dir.
    pub fn output_path(&self, input: &Path, suffix: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let file_name = format!("{}{}.png", stem, suffix);
        match &self.dir {
            Some(dir) => dir.join(file_name),
            None => input
                .parent()
                .map(|p| p.join(&file_name))
                .unwrap_or_else(|| PathBuf::from(&file_name)),
        }
    }

    /// Cheap early check so an existing output fails before decoding.
    ///
    /// [`write`](Self::write) enforces the same rule atomically.
    pub fn check_target(&self, target: &Path) -> Result<(), PipelineError> {
        if !self.overwrite && target.exists() {
            return Err(PipelineError::OutputExists(target.to_path_buf()));
        }
        Ok(())
    }

    /// Write `bytes` to `target`, creating parent directories as needed.
    ///
    /// Without overwrite the file is opened with `create_new`, so when two
    /// inputs map to the same output only the first writer wins.
    pub async fn write(&self, target: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
        let write_err = |source: io::Error| PipelineError::Write {
            path: target.to_path_buf(),
            source,
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PipelineError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .create_new(!self.overwrite)
            .open(target)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => PipelineError::OutputExists(target.to_path_buf()),
                _ => write_err(e),
            })?;
        file.write_all(bytes).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)
    }
}

/// Encode an image as PNG into memory.
pub fn encode_png(image: &DynamicImage, path: &Path) -> Result<Vec<u8>, PipelineError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};

    #[test]
    fn test_output_path_next_to_input() {
        let planner = OutputPlanner::new(None, false);
        assert_eq!(
            planner.output_path(Path::new("/shots/cat.jpg"), ".veiled"),
            PathBuf::from("/shots/cat.veiled.png")
        );
        assert_eq!(
            planner.output_path(Path::new("cat.veiled.png"), ".unveiled"),
            PathBuf::from("cat.veiled.unveiled.png")
        );
    }

    #[test]
    fn test_output_path_under_dir() {
        let planner = OutputPlanner::new(Some(PathBuf::from("/out")), false);
        assert_eq!(
            planner.output_path(Path::new("/shots/deep/cat.webp"), ".veiled"),
            PathBuf::from("/out/cat.veiled.png")
        );
    }

    #[test]
    fn test_from_config_empty_dir_means_alongside() {
        let planner = OutputPlanner::from_config(&Config::default());
        assert_eq!(
            planner.output_path(Path::new("/a/b.png"), ".veiled"),
            PathBuf::from("/a/b.veiled.png")
        );
    }

    #[tokio::test]
    async fn test_write_refuses_existing_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("x.veiled.png");
        std::fs::write(&target, b"old").unwrap();

        let planner = OutputPlanner::new(None, false);
        let result = planner.write(&target, b"new").await;
        assert!(matches!(result, Err(PipelineError::OutputExists(_))));
        assert_eq!(std::fs::read(&target).unwrap(), b"old");

        let planner = OutputPlanner::new(None, true);
        planner.write(&target, b"new").await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_writes_to_one_target_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shared.veiled.png");
        let planner = OutputPlanner::new(None, false);

        let (a, b) = tokio::join!(
            planner.write(&target, b"first"),
            planner.write(&target, b"second")
        );
        let won: Vec<&[u8]> = [(a, &b"first"[..]), (b, &b"second"[..])]
            .into_iter()
            .filter_map(|(result, bytes)| match result {
                Ok(()) => Some(bytes),
                Err(PipelineError::OutputExists(_)) => None,
                Err(e) => panic!("unexpected error: {e}"),
            })
            .collect();
        assert_eq!(won.len(), 1);
        assert_eq!(std::fs::read(&target).unwrap(), won[0]);
    }

    #[tokio::test]
    async fn test_write_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/y.png");
        OutputPlanner::new(None, false)
            .write(&target, b"data")
            .await
            .unwrap();
        assert!(target.exists());
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let img = RgbaImage::from_fn(5, 3, |x, y| {
            image::Rgba([x as u8 * 40, y as u8 * 70, 9, 128])
        });
        let original = DynamicImage::ImageRgba8(img);
        let bytes = encode_png(&original, Path::new("t.png")).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.to_rgba8().as_raw(), original.to_rgba8().as_raw());
    }
}
