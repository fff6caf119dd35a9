//! Turns the gallery photos into inline `data:` URIs for the static site.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const TEXT_OUTPUT: &str = "base64_images.txt";
pub const SNIPPET_OUTPUT: &str = "gallery_snippet.html";

const ALT_PREFIX: &str = "Shree Agrawal Yaatri Grah - Room";
const IMG_STYLE: &str = "max-width: 100%; height: auto; border-radius: 8px;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub file_name: String,
    /// 1-based position among all candidate files, so skipped files keep
    /// their room number.
    pub position: usize,
    pub base64: String,
}

impl EncodedImage {
    fn img_tag(&self, extra: &str) -> String {
        format!(
            r#"<img src="data:image/jpeg;base64,{}" alt="{ALT_PREFIX} {}" style="{IMG_STYLE}"{extra}>"#,
            self.base64, self.position
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct GalleryReport {
    pub files: Vec<(String, FileOutcome)>,
    pub text_path: PathBuf,
    pub snippet_path: PathBuf,
}

impl GalleryReport {
    pub fn converted(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, outcome)| *outcome == FileOutcome::Converted)
            .count()
    }
}

/// `*.jpg` files in `dir`, any case, sorted by name.
pub fn list_jpegs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read image directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_jpg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"));
        if is_jpg && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Base64 of a file's bytes, refusing anything that is not a JPEG.
pub fn encode_jpeg(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let format = image::guess_format(&bytes)
        .with_context(|| format!("{} is not a recognised image", path.display()))?;
    anyhow::ensure!(
        format == ImageFormat::Jpeg,
        "{} is {:?}, not JPEG",
        path.display(),
        format
    );
    Ok(STANDARD.encode(bytes))
}

pub fn render_text(images: &[EncodedImage]) -> String {
    let mut out = String::from("Base64 encoded images for HTML:\n\n");
    for image in images {
        let _ = writeln!(out, "<!-- {} -->", image.file_name);
        let _ = writeln!(out, "{}\n", image.img_tag(""));
    }
    out
}

pub fn render_snippet(images: &[EncodedImage]) -> String {
    let mut html = String::from("<div class=\"gallery-grid\">\n");
    for image in images {
        html.push_str("    <div class=\"gallery-item\">\n");
        let _ = writeln!(html, "        {}", image.img_tag(r#" loading="lazy""#));
        html.push_str("    </div>\n");
    }
    html.push_str("</div>");
    html
}

/// Encode every photo in `images_dir` and write both outputs into `out_dir`.
/// Unreadable or non-JPEG files are reported and left out.
pub fn convert_gallery(images_dir: &Path, out_dir: &Path) -> Result<GalleryReport> {
    let mut report = GalleryReport {
        text_path: out_dir.join(TEXT_OUTPUT),
        snippet_path: out_dir.join(SNIPPET_OUTPUT),
        ..Default::default()
    };
    let mut encoded = Vec::new();

    for (index, path) in list_jpegs(images_dir)?.into_iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match encode_jpeg(&path) {
            Ok(base64) => {
                log_info!("converted {file_name}");
                encoded.push(EncodedImage {
                    file_name: file_name.clone(),
                    position: index + 1,
                    base64,
                });
                report.files.push((file_name, FileOutcome::Converted));
            }
            Err(err) => {
                log_warn!("skipping {file_name}: {err:#}");
                report
                    .files
                    .push((file_name, FileOutcome::Failed(format!("{err:#}"))));
            }
        }
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    fs::write(&report.text_path, render_text(&encoded))
        .with_context(|| format!("failed to write {}", report.text_path.display()))?;
    fs::write(&report.snippet_path, render_snippet(&encoded))
        .with_context(|| format!("failed to write {}", report.snippet_path.display()))?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shree-lodge-gallery-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn jpeg_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn converts_sorted_jpegs_and_skips_garbage() {
        let images = scratch_dir("images");
        let out = scratch_dir("out");
        fs::write(images.join("b_room.JPG"), jpeg_bytes()).unwrap();
        fs::write(images.join("a_lobby.jpg"), jpeg_bytes()).unwrap();
        fs::write(images.join("c_broken.jpg"), b"not an image").unwrap();
        fs::write(images.join("notes.txt"), b"ignored").unwrap();

        let report = convert_gallery(&images, &out).unwrap();
        let names: Vec<_> = report.files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["a_lobby.jpg", "b_room.JPG", "c_broken.jpg"]);
        assert_eq!(report.converted(), 2);
        assert!(matches!(report.files[2].1, FileOutcome::Failed(_)));

        let text = fs::read_to_string(&report.text_path).unwrap();
        assert!(text.starts_with("Base64 encoded images for HTML:\n\n<!-- a_lobby.jpg -->\n"));
        assert!(text.contains(r#"alt="Shree Agrawal Yaatri Grah - Room 2""#));
        assert!(!text.contains("c_broken"));

        let snippet = fs::read_to_string(&report.snippet_path).unwrap();
        assert_eq!(snippet.matches("gallery-item").count(), 2);
        assert!(snippet.ends_with("</div>"));
        assert!(snippet.contains(r#"loading="lazy">"#));

        fs::remove_dir_all(&images).unwrap();
        fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join("shree-lodge-gallery-does-not-exist");
        assert!(convert_gallery(&missing, &std::env::temp_dir()).is_err());
    }

    #[test]
    fn empty_gallery_still_writes_frames() {
        let text = render_text(&[]);
        assert_eq!(text, "Base64 encoded images for HTML:\n\n");
        assert_eq!(render_snippet(&[]), "<div class=\"gallery-grid\">\n</div>");
    }
}
