use crate::error::{Error, Result};
use crate::state::data::Gallery;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Extensions that get re-encoded (compared case-insensitively)
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Prefix of the scratch file written next to the original
const TEMP_PREFIX: &str = "_temp_";

const JPEG_QUALITY: u8 = 90;

/// Counts for one gallery folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripReport {
    pub artworks: FolderSummary,
    pub photography: FolderSummary,
}

impl StripReport {
    pub fn processed(&self) -> usize {
        self.artworks.processed + self.photography.processed
    }

    pub fn errors(&self) -> usize {
        self.artworks.errors + self.photography.errors
    }
}

/// Strip metadata from both gallery folders under `root`
///
/// Decoding and encoding are CPU-bound, so the whole pass runs on the
/// blocking pool.
pub async fn strip_site(root: PathBuf) -> Result<StripReport> {
    let report = task::spawn_blocking(move || strip_site_blocking(&root)).await?;
    info!(
        processed = report.processed(),
        errors = report.errors(),
        "metadata stripped"
    );
    Ok(report)
}

fn strip_site_blocking(root: &Path) -> StripReport {
    StripReport {
        artworks: strip_folder(&root.join(Gallery::Artworks.folder())),
        photography: strip_folder(&root.join(Gallery::Photography.folder())),
    }
}

/// Re-encode every image directly inside `dir`; a missing folder counts as empty
pub fn strip_folder(dir: &Path) -> FolderSummary {
    let mut summary = FolderSummary::default();
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no such folder");
        return summary;
    }

    let files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_strippable(p));

    for path in files {
        match strip_file(&path) {
            Ok(()) => {
                info!("✓ {}", path.display());
                summary.processed += 1;
            }
            Err(e) => {
                error!("✗ {e}");
                summary.errors += 1;
            }
        }
    }
    summary
}

fn is_strippable(path: &Path) -> bool {
    let leftover = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEMP_PREFIX));
    if leftover {
        debug!(path = %path.display(), "skipping leftover scratch file");
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Rewrite one image upright and without metadata.
///
/// The new file is written beside the original and renamed over it, so a
/// failure never leaves the original half-written.
pub fn strip_file(path: &Path) -> Result<()> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(Error::io(path, std::io::ErrorKind::InvalidInput.into()));
    };
    let temp = path.with_file_name(format!("{TEMP_PREFIX}{name}"));

    let result = reencode(path, &temp).and_then(|()| {
        fs::rename(&temp, path).map_err(|e| Error::io(path, e))
    });
    if result.is_err() && temp.exists() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn reencode(path: &Path, temp: &Path) -> Result<()> {
    let image_err = |source| Error::Image {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(image_err)?;
    let mut decoder = ImageReader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?
        .into_decoder()
        .map_err(image_err)?;
    let orientation = decoder.orientation().map_err(image_err)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(image_err)?;
    img.apply_orientation(orientation);

    match format {
        ImageFormat::Jpeg => {
            let file = File::create(temp).map_err(|e| Error::io(temp, e))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
            img.write_with_encoder(encoder).map_err(image_err)
        }
        _ => img.save_with_format(temp, format).map_err(image_err),
    }
}
