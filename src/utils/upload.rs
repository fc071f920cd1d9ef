use crate::config::UploadsConfig;
use crate::error::{AppError, AppResult};
use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug)]
pub struct SavedImage {
    pub url: String,
}

fn sanitized_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Streams every file field of a multipart upload to uuid-named files under
/// `{root}/images/books` and returns the public urls. The byte cap applies to
/// the upload as a whole.
pub async fn save_book_images(
    config: &UploadsConfig,
    payload: &mut Multipart,
) -> AppResult<Vec<SavedImage>> {
    let dir = Path::new(&config.root).join("images").join("books");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    let mut saved = Vec::new();
    let mut total_bytes = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart payload: {e}")))?
    {
        let Some(filename) = field.content_disposition().get_filename().map(str::to_owned) else {
            continue;
        };
        let ext = sanitized_extension(&filename).ok_or_else(|| {
            AppError::ValidationError(format!("Unsupported image file: {filename}"))
        })?;

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Failed to read upload: {e}")))?
        {
            total_bytes += chunk.len();
            if total_bytes > config.max_bytes {
                return Err(AppError::ValidationError(format!(
                    "Upload exceeds the {} byte limit",
                    config.max_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), &data)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;

        saved.push(SavedImage {
            url: format!("/images/books/{file_name}"),
        });
    }

    if saved.is_empty() {
        return Err(AppError::ValidationError(
            "No image files in upload".to_string(),
        ));
    }

    Ok(saved)
}

/// Removes the stored file behind an image url. A file already gone is fine.
pub async fn delete_image_file(config: &UploadsConfig, url: &str) {
    let relative = url.trim_start_matches('/');
    let path: PathBuf = Path::new(&config.root).join(relative);
    if let Err(e) = tokio::fs::remove_file(&path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Failed to delete image file {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_extension() {
        assert_eq!(sanitized_extension("cover.JPG").as_deref(), Some("jpg"));
        assert_eq!(sanitized_extension("a.b.png").as_deref(), Some("png"));
        assert_eq!(sanitized_extension("script.sh"), None);
        assert_eq!(sanitized_extension("noextension"), None);
    }
}
