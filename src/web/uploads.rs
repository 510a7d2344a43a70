use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use axum::extract::{Multipart, multipart::Field};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};

/// Result type used by the shared upload helpers.
pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    /// The client sent something we refuse to store.
    Rejected,
    /// Writing to the upload directory failed.
    Storage,
}

/// Error returned when validating or persisting uploaded files.
#[derive(Debug)]
pub struct UploadError {
    kind: UploadErrorKind,
    message: String,
}

impl UploadError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: UploadErrorKind::Rejected,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self {
            kind: UploadErrorKind::Storage,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> UploadErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

/// Expectations for the single multipart file field accepted by an upload endpoint.
#[derive(Debug, Clone, Copy)]
pub struct FileFieldConfig<'a> {
    pub field_name: &'a str,
    pub allowed_extensions: &'a [&'a str],
    /// Stem used when sanitizing leaves nothing of the client file name.
    pub fallback_stem: &'a str,
}

/// Metadata describing a stored upload on disk.
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub original_name: String,
    pub stored_name: String,
    pub stored_path: PathBuf,
    pub file_size: u64,
}

/// Ensures the destination directory exists.
pub async fn ensure_directory(path: &Path) -> UploadResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|err| UploadError::storage(format!("failed to create upload directory: {err}")))
}

/// Reads multipart form data and stores the configured file field in `dest_dir`.
///
/// Text fields are ignored. Existing files are never overwritten; a numeric suffix is
/// appended to the sanitized name until a free one is found.
pub async fn process_upload_form(
    mut multipart: Multipart,
    dest_dir: &Path,
    config: &FileFieldConfig<'_>,
) -> UploadResult<SavedFile> {
    ensure_directory(dest_dir).await?;

    let mut saved: Option<SavedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::rejected(format!("failed to parse upload form: {err}")))?
    {
        if field.file_name().is_none() {
            continue;
        }

        let field_name = field.name().unwrap_or("").to_string();
        if field_name != config.field_name {
            return Err(UploadError::rejected(format!(
                "unsupported file field `{field_name}`"
            )));
        }
        if let Some(first) = saved.as_ref() {
            let _ = tokio::fs::remove_file(&first.stored_path).await;
            return Err(UploadError::rejected(format!(
                "only one file may be sent in `{}`",
                config.field_name
            )));
        }

        saved = Some(store_field(field, dest_dir, config).await?);
    }

    saved.ok_or_else(|| {
        UploadError::rejected(format!("missing file field `{}`", config.field_name))
    })
}

async fn store_field(
    mut field: Field<'_>,
    dest_dir: &Path,
    config: &FileFieldConfig<'_>,
) -> UploadResult<SavedFile> {
    let original_name = field.file_name().unwrap_or("upload.bin").to_string();
    let extension = extension_of(&original_name);

    if !config.allowed_extensions.is_empty()
        && !config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    {
        return Err(UploadError::rejected(format!(
            "file type `{extension}` is not allowed"
        )));
    }

    let sanitized = sanitized_name(&original_name, config.fallback_stem, &extension);
    let (stored_name, mut file) = create_unique(dest_dir, &sanitized).await?;
    let stored_path = dest_dir.join(&stored_name);

    let mut total_bytes: u64 = 0;
    let copy_result: UploadResult<()> = async {
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| UploadError::rejected(format!("failed to read upload data: {err}")))?
        {
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|err| UploadError::storage(format!("failed to write file: {err}")))?;
        }
        file.flush()
            .await
            .map_err(|err| UploadError::storage(format!("failed to flush file: {err}")))
    }
    .await;

    if let Err(err) = copy_result {
        drop(file);
        let _ = tokio::fs::remove_file(&stored_path).await;
        return Err(err);
    }

    Ok(SavedFile {
        original_name,
        stored_name,
        stored_path,
        file_size: total_bytes,
    })
}

/// Opens `candidate` (or the first free `stem_N.ext` variant) with `create_new`.
async fn create_unique(dest_dir: &Path, candidate: &str) -> UploadResult<(String, File)> {
    let (stem, extension) = split_name(candidate);
    let mut counter = 0usize;
    loop {
        let attempt = if counter == 0 {
            candidate.to_string()
        } else {
            suffixed_name(&stem, &extension, counter)
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest_dir.join(&attempt))
            .await
        {
            Ok(file) => return Ok((attempt, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => counter += 1,
            Err(err) => {
                return Err(UploadError::storage(format!("failed to save file: {err}")));
            }
        }
    }
}

fn sanitized_name(original: &str, fallback_stem: &str, extension: &str) -> String {
    let sanitized = sanitize_filename::sanitize(original);
    if !sanitized.is_empty() && !sanitized.starts_with('.') {
        return sanitized;
    }
    if extension.is_empty() {
        fallback_stem.to_string()
    } else {
        format!("{fallback_stem}.{extension}")
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn suffixed_name(stem: &str, extension: &str, counter: usize) -> String {
    if extension.is_empty() {
        format!("{}_{}", stem, counter)
    } else {
        format!("{}_{}.{}", stem, counter, extension)
    }
}

fn split_name(name: &str) -> (String, String) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string();
    (stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sanitized_name_strips_path_components() {
        assert_eq!(
            sanitized_name("dir/../passwd.png", "image", "png"),
            "dir..passwd.png"
        );
        assert_eq!(sanitized_name("sunset.JPG", "image", "jpg"), "sunset.JPG");
    }

    #[test]
    fn sanitized_name_falls_back_when_nothing_is_left() {
        assert_eq!(sanitized_name("///", "image", ""), "image");
        assert_eq!(sanitized_name("../x.png", "image", "png"), "image.png");
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Photo.PNG"), "png");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn split_name_handles_extension() {
        let (stem, ext) = split_name("report.final.png");
        assert_eq!(stem, "report.final");
        assert_eq!(ext, "png");
    }

    #[tokio::test]
    async fn create_unique_appends_counter_instead_of_overwriting() {
        let dir = tempdir().expect("temp dir");
        std::fs::write(dir.path().join("photo.png"), b"first").expect("seed file");

        let (name, _file) = create_unique(dir.path(), "photo.png").await.expect("create");
        assert_eq!(name, "photo_1.png");

        let (name, _file) = create_unique(dir.path(), "photo.png").await.expect("create");
        assert_eq!(name, "photo_2.png");

        let original = std::fs::read(dir.path().join("photo.png")).expect("read");
        assert_eq!(original, b"first");
    }
}
