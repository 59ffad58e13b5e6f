//! Paginated PDF rendering of saved records.
//!
//! Rendering happens in two stages: the record is first laid out into
//! per-page draw operations by [`Layout::build`], which is pure and
//! total, and the layout is then serialized by the writer.  Images named
//! by link rows are fetched and decoded up front; any that cannot be
//! used are left out with a warning.

pub mod attachment;
pub mod cursor;
pub mod layout;
mod writer;

use studiocore::{
    normalize::{
        normalize,
        NormalizedSection,
    },
    record::SavedRecord,
};

use crate::{
    error::Error,
    output::{
        OutputMode,
        PdfOutput,
    },
};

pub use attachment::{
    AttachmentSource,
    DirAttachmentSource,
    NoAttachments,
};
pub use layout::{
    Color,
    DEFAULT_FIRM_CONTACT,
    Layout,
    PdfOptions,
};

fn section_images(
    section: &NormalizedSection,
    attachments: &dyn AttachmentSource,
) -> Vec<attachment::DecodedImage> {
    section.links()
        .filter(|(_, url)| attachment::names_image(url))
        .filter_map(|(label, url)| match attachment::load_image(attachments, url) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!(
                    "skipping image {label:?} in section {:?}: {e}",
                    section.category(),
                );
                None
            }
        })
        .collect()
}

/// Lays out the record without serializing it.
pub fn layout_record(
    record: &SavedRecord,
    options: &PdfOptions,
    attachments: &dyn AttachmentSource,
) -> Layout {
    let sections = normalize(record);
    let images = sections.iter()
        .map(|section| section_images(section, attachments))
        .collect();
    Layout::build(record, &sections, images, options)
}

/// Renders the record as a PDF to be handed over according to `mode`.
pub fn render_pdf(
    record: &SavedRecord,
    options: &PdfOptions,
    attachments: &dyn AttachmentSource,
    mode: OutputMode,
) -> Result<PdfOutput, Error> {
    let layout = layout_record(record, options, attachments);
    log::debug!(
        "rendering {} as {} page(s) with {} image(s)",
        record.path(),
        layout.pages.len(),
        layout.images.len(),
    );
    let bytes = writer::write(&layout, &record.project_name)?;
    Ok(PdfOutput::new(&record.project_name, bytes, mode))
}
