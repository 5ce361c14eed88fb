use anyhow::Context;
use bytes::Bytes;
use image::ImageFormat;
use rand::RngCore;

use crate::storage::ImageStore;

pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Uploads larger than this on either axis are shrunk to fit, keeping
/// aspect ratio.
const MAX_DIMENSION: u32 = 500;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Whether a client-supplied filename carries an accepted image extension.
pub fn allowed_file(filename: &str) -> bool {
    extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Route under which stored images are served.
pub fn public_image_url(filename: &str) -> String {
    format!("/static/uploads/{filename}")
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

fn format_for(ext: &str) -> Option<ImageFormat> {
    match ext {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "gif" => Some(ImageFormat::Gif),
        _ => None,
    }
}

fn random_name(ext: &str) -> String {
    let mut token = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut token);
    let hex: String = token.iter().map(|b| format!("{b:02x}")).collect();
    format!("{hex}.{ext}")
}

/// Decode an upload, shrink it into the dimension envelope and persist it
/// under a collision-resistant random filename. Returns the stored name.
pub async fn save_picture(
    store: &dyn ImageStore,
    original_name: &str,
    body: Bytes,
) -> anyhow::Result<String> {
    let ext = extension(original_name)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .context("unsupported image type")?;
    let format = format_for(&ext).context("unsupported image type")?;

    // Decoding and re-encoding is CPU-bound.
    let normalized = tokio::task::spawn_blocking(move || normalize(&body, format))
        .await
        .context("image task panicked")??;

    let name = random_name(&ext);
    store.put(&name, normalized).await?;
    Ok(name)
}

fn normalize(body: &Bytes, format: ImageFormat) -> anyhow::Result<Bytes> {
    let img = image::load_from_memory_with_format(body, format).context("decode image")?;
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img
    };
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, format).context("encode image")?;
    Ok(Bytes::from(out.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn extension_allowlist() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("photo.JPG"));
        assert!(allowed_file("photo.jpeg"));
        assert!(allowed_file("animated.gif"));
        assert!(allowed_file("archive.tar.jpg"));
        assert!(!allowed_file("photo.webp"));
        assert!(!allowed_file("photo.svg"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("trailingdot."));
    }

    #[test]
    fn random_names_keep_extension_and_differ() {
        let a = random_name("png");
        let b = random_name("png");
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 16 + ".png".len());
        assert_ne!(a, b);
    }

    #[test]
    fn public_url_points_at_uploads() {
        assert_eq!(
            public_image_url("default.jpg"),
            "/static/uploads/default.jpg"
        );
    }

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode test image");
        Bytes::from(out.into_inner())
    }

    #[test]
    fn oversized_images_are_shrunk_into_the_envelope() {
        let normalized = normalize(&png_bytes(800, 600), ImageFormat::Png).expect("normalize");
        let img = image::load_from_memory_with_format(&normalized, ImageFormat::Png)
            .expect("decode normalized");
        assert_eq!((img.width(), img.height()), (500, 375));
    }

    #[test]
    fn small_images_are_left_alone() {
        let normalized = normalize(&png_bytes(120, 80), ImageFormat::Png).expect("normalize");
        let img = image::load_from_memory_with_format(&normalized, ImageFormat::Png)
            .expect("decode normalized");
        assert_eq!((img.width(), img.height()), (120, 80));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(normalize(&Bytes::from_static(b"not an image"), ImageFormat::Png).is_err());
    }

    #[tokio::test]
    async fn save_picture_rejects_disallowed_extension() {
        let state = crate::state::AppState::fake();
        let err = save_picture(state.images.as_ref(), "payload.exe", png_bytes(10, 10))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported image type"));
    }

    #[tokio::test]
    async fn save_picture_stores_under_random_name() {
        let state = crate::state::AppState::fake();
        let name = save_picture(state.images.as_ref(), "selfie.png", png_bytes(10, 10))
            .await
            .expect("save");
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 16 + ".png".len());
    }
}
