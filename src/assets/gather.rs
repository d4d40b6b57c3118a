use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::foundation::{
    core::Resolution,
    error::{ReelError, ReelResult},
};

/// Stills of one folder that share the picked image's extension and resolution.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ImageSet {
    pub folder: PathBuf,
    /// Lowercase extension without the dot.
    pub extension: String,
    pub resolution: Resolution,
    /// Oldest first.
    pub paths: Vec<PathBuf>,
}

impl ImageSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Read only the header of `path` to find its pixel size.
pub fn probe_resolution(path: &Path) -> ReelResult<Resolution> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("read image header '{}'", path.display()))?;
    Ok(Resolution::new(width, height))
}

/// Collect the siblings of `picked` that can be cut into one clip with it.
///
/// Candidates are the regular files next to `picked` with the same extension (ignoring case)
/// and the same pixel size. Files whose header cannot be read are left out. The result is sorted
/// by creation time, falling back to modification time on filesystems that do not record it.
#[tracing::instrument(skip_all, fields(picked = %picked.display()))]
pub fn gather_siblings(picked: &Path, min_images: usize) -> ReelResult<ImageSet> {
    let extension = lowercase_extension(picked).ok_or_else(|| {
        ReelError::validation(format!("'{}' has no file extension", picked.display()))
    })?;
    let resolution = probe_resolution(picked)?;
    let folder = picked
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let candidates: Vec<PathBuf> = fs::read_dir(&folder)
        .with_context(|| format!("list folder '{}'", folder.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|p| lowercase_extension(p).as_deref() == Some(extension.as_str()))
        .collect();

    let mut matched: Vec<(SystemTime, PathBuf)> = candidates
        .into_par_iter()
        .filter_map(|p| match probe_resolution(&p) {
            Ok(res) if res == resolution => Some((created_or_modified(&p), p)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %p.display(), error = %e, "skipping unreadable still");
                None
            }
        })
        .collect();
    matched.sort();

    tracing::debug!(
        count = matched.len(),
        %resolution,
        extension = extension.as_str(),
        "gathered sibling stills"
    );

    if matched.len() < min_images {
        tracing::warn!(
            folder = %folder.display(),
            count = matched.len(),
            %resolution,
            extension = extension.as_str(),
            "not enough stills to build a clip"
        );
        return Err(ReelError::not_enough_images(format!(
            "found {} .{extension} image(s) at {resolution} in '{}', need at least {min_images}",
            matched.len(),
            folder.display()
        )));
    }

    Ok(ImageSet {
        folder,
        extension,
        resolution,
        paths: matched.into_iter().map(|(_, p)| p).collect(),
    })
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
}

fn created_or_modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/gather.rs"]
mod tests;
