//! Resolution of attachment urls to image bytes for embedding.

use printpdf::image_crate::{
    self,
    DynamicImage,
    ImageFormat,
};
use std::path::{
    Component,
    Path,
    PathBuf,
};

use crate::error::Error;

pub trait AttachmentSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error>;
}

/// Serves attachments stored beneath a local directory, addressed by
/// relative urls such as `/files/plan.png`.
#[derive(Clone, Debug)]
pub struct DirAttachmentSource {
    root: PathBuf,
}

/// A source that has nothing; every fetch fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAttachments;

/// A decoded image ready for embedding.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub url: String,
    pub image: DynamicImage,
}

const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "svg",
];

impl DirAttachmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = Path::new(url.trim_start_matches('/'));
        path.components()
            .all(|c| matches!(c, Component::Normal(_)))
            .then(|| self.root.join(path))
    }
}

impl AttachmentSource for DirAttachmentSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        if url.contains("://") {
            return Err(Error::Attachment {
                url: url.to_string(),
                reason: "remote attachments are not fetched".to_string(),
            });
        }
        let path = self.resolve(strip_query(url))
            .ok_or_else(|| Error::Attachment {
                url: url.to_string(),
                reason: "not a path beneath the attachment root".to_string(),
            })?;
        Ok(std::fs::read(path)?)
    }
}

impl AttachmentSource for NoAttachments {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Error> {
        Err(Error::Attachment {
            url: url.to_string(),
            reason: "no attachment source configured".to_string(),
        })
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#'])
        .next()
        .unwrap_or(url)
}

/// Whether the url names an image by its extension.
pub fn names_image(url: &str) -> bool {
    strip_query(url)
        .rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Fetches and decodes the image at `url`; only PNG and JPEG are
/// accepted.
pub fn load_image(source: &dyn AttachmentSource, url: &str) -> Result<DecodedImage, Error> {
    let bytes = source.fetch(url)?;
    let format = image_crate::guess_format(&bytes)
        .map_err(|e| Error::Image {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(Error::Image {
            url: url.to_string(),
            reason: format!("unsupported file type {format:?}"),
        });
    }
    let image = image_crate::load_from_memory_with_format(&bytes, format)
        .map_err(|e| Error::Image {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Image {
            url: url.to_string(),
            reason: "empty image".to_string(),
        });
    }
    Ok(DecodedImage {
        url: url.to_string(),
        image,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn image_names() {
        assert!(names_image("https://files.example.com/site/photo.JPG"));
        assert!(names_image("/files/plan.png?token=abc"));
        assert!(names_image("/files/sketch.svg"));
        assert!(!names_image("/files/invoice.pdf"));
        assert!(!names_image("/files/noextension"));
    }

    #[test]
    fn dir_source() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("files"))?;
        std::fs::write(dir.path().join("files/note.txt"), b"hello")?;
        let source = DirAttachmentSource::new(dir.path());
        assert_eq!(source.fetch("/files/note.txt")?, b"hello");
        assert_eq!(source.fetch("files/note.txt?v=2")?, b"hello");
        assert!(source.fetch("/files/../../etc/passwd").is_err());
        assert!(source.fetch("/files/missing.png").is_err());
        assert!(matches!(
            source.fetch("https://files.example.com/files/note.txt"),
            Err(Error::Attachment { .. }),
        ));
        Ok(())
    }

    #[test]
    fn unsupported_images() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("anim.gif"), b"GIF89a\x01\x00\x01\x00\x00\x00\x00;")?;
        std::fs::write(dir.path().join("broken.png"), b"\x89PNG\r\n\x1a\nnot really")?;
        let source = DirAttachmentSource::new(dir.path());
        assert!(matches!(
            load_image(&source, "/anim.gif"),
            Err(Error::Image { .. }),
        ));
        assert!(matches!(
            load_image(&source, "/broken.png"),
            Err(Error::Image { .. }),
        ));
        assert!(matches!(
            load_image(&NoAttachments, "/anything.png"),
            Err(Error::Attachment { .. }),
        ));
        Ok(())
    }
}
