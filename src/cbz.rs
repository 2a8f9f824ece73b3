use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::{write::FileOptions, ZipWriter};

/// Chapter number as it appears in archive names: a single leading zero
/// below 10, the bare number otherwise.
fn padded_chapter(chapter: u32) -> String {
    if chapter < 10 {
        format!("0{}", chapter)
    } else {
        chapter.to_string()
    }
}

/// Bundle every `.jpg` in `image_dir` into `[{chapter}] {chapter_name}.cbz`
/// under `manga_dir`, entries flattened to their basenames and ordered by
/// page number. An existing archive at that path is overwritten.
pub fn write_cbz(
    manga_dir: &Path,
    image_dir: &Path,
    chapter: u32,
    chapter_name: &str,
) -> Result<PathBuf> {
    let archive_path = manga_dir.join(format!("[{}] {}.cbz", padded_chapter(chapter), chapter_name));

    let mut images = Vec::new();
    for entry in fs::read_dir(image_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "jpg") {
            images.push(path);
        }
    }
    images.sort_by_key(|path| {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u32>().ok())
    });

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o755);

    for image in &images {
        let name = image
            .file_name()
            .context("image path has no file name")?
            .to_string_lossy();
        debug!("Writing {} to {}", image.display(), archive_path.display());
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(image)?)?;
    }
    zip.finish()?;

    Ok(archive_path)
}
