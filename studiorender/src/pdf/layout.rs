//! Pure page layout.  Every position is in millimetres measured from the
//! top left corner of an A4 portrait page; text positions are baselines.

use printpdf::image_crate::{
    DynamicImage,
    GenericImageView,
};
use std::{
    fmt,
    str::FromStr,
};
use studiocore::{
    normalize::NormalizedSection,
    record::SavedRecord,
};

use crate::format_created_at;
use super::{
    attachment::DecodedImage,
    cursor::DocumentCursor,
};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Nothing but the footer is placed below this line.
pub const BOTTOM_LIMIT: f32 = 272.0;
pub const FOOTER_BASELINE: f32 = 287.0;
pub const CONTINUATION_TOP: f32 = MARGIN + 8.0;

const PT_TO_MM: f32 = 0.3528;
// Estimated Helvetica advance per character, as a fraction of the size.
const REGULAR_ADVANCE: f32 = 0.5;
const BOLD_ADVANCE: f32 = 0.56;

const TITLE_SIZE: f32 = 16.0;
const META_SIZE: f32 = 10.0;
const SECTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 9.0;
const SMALL_SIZE: f32 = 8.0;

/// Footer contact line used when none is configured.
pub const DEFAULT_FIRM_CONTACT: &str = "Studio Architects | 1 Quay Street, Auckland | +64 9 555 0100";

const TITLE_LINE_HEIGHT: f32 = 7.0;
const TITLE_MAX_LINES: usize = 3;
const LINE_HEIGHT: f32 = 4.2;
const CELL_PADDING: f32 = 1.8;
const SECTION_TITLE_HEIGHT: f32 = 8.0;
const SECTION_GAP: f32 = 6.0;
const IMAGE_BOX: f32 = 80.0;
const META_VALUE_OFFSET: f32 = 22.0;

const TABLE_COLUMNS: [(&str, f32); 2] = [
    ("Field", 60.0),
    ("Value", 120.0),
];
const CHECKLIST_COLUMNS: [(&str, f32); 3] = [
    ("Item", 90.0),
    ("Status", 35.0),
    ("Remarks", 55.0),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PdfOptions {
    /// Printed in the footer of every page.
    pub firm_contact: String,
    /// Fill of table header rows and the header rule.
    pub brand: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Color,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Image {
        image: usize,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub images: Vec<DynamicImage>,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GREY: Color = Color::new(110, 110, 110);
    pub const BORDER: Color = Color::new(170, 170, 170);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            firm_contact: DEFAULT_FIRM_CONTACT.to_string(),
            brand: Color::default(),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::new(31, 58, 95)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize| hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok());
        match (hex.len(), channel(0), channel(2), channel(4)) {
            (6, Some(r), Some(g), Some(b)) => Ok(Color::new(r, g, b)),
            _ => Err(format!("expected a colour such as #1f3a5f, got {s:?}")),
        }
    }
}

impl Page {
    /// Every piece of text on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Replaces characters the built-in fonts cannot encode.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_control() => ' ',
            c if (c as u32) <= 0xff => c,
            _ => '?',
        })
        .collect()
}

fn advance(bold: bool) -> f32 {
    if bold { BOLD_ADVANCE } else { REGULAR_ADVANCE }
}

pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    text.chars().count() as f32 * size * PT_TO_MM * advance(bold)
}

/// Breaks text into lines no wider than `width`, on whitespace where
/// possible.  Always yields at least one line.
pub fn wrap(text: &str, width: f32, size: f32, bold: bool) -> Vec<String> {
    let max_chars = ((width / (size * PT_TO_MM * advance(bold))) as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                let needed = if len == 0 { chunk.len() } else { len + 1 + chunk.len() };
                if needed > max_chars && len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                if len > 0 {
                    line.push(' ');
                    len += 1;
                }
                line.extend(chunk);
                len += chunk.len();
            }
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines.into_iter().map(|line| sanitize(&line)).collect()
}

/// Shortens the line so that it ends in `...` and fits `width`.
fn ellipsize(line: &str, width: f32, size: f32, bold: bool) -> String {
    let mut chars: Vec<char> = line.trim_end().chars().collect();
    while !chars.is_empty()
        && text_width(&format!("{}...", String::from_iter(&chars)), size, bold) > width
    {
        chars.pop();
    }
    format!("{}...", String::from_iter(chars).trim_end())
}

fn centred(text: &str, size: f32, bold: bool) -> f32 {
    ((PAGE_WIDTH - text_width(text, size, bold)) / 2.0).max(MARGIN)
}

fn row_height(cells: &[Vec<String>]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

struct Table {
    columns: &'static [(&'static str, f32)],
    header: Vec<Vec<String>>,
    rows: Vec<Vec<Vec<String>>>,
}

impl Table {
    fn new(section: &NormalizedSection) -> Self {
        let columns: &'static [(&'static str, f32)] = match section {
            NormalizedSection::Table { .. } => &TABLE_COLUMNS,
            NormalizedSection::Checklist { .. } => &CHECKLIST_COLUMNS,
        };
        let cells = |values: Vec<&str>, bold: bool| values.into_iter()
            .zip(columns)
            .map(|(value, (_, w))| wrap(value, w - 2.0 * CELL_PADDING, BODY_SIZE, bold))
            .collect::<Vec<_>>();
        let header = cells(columns.iter().map(|(name, _)| *name).collect(), true);
        let rows = match section {
            NormalizedSection::Table { rows, .. } => rows.iter()
                .map(|row| cells(vec![row.label.as_str(), row.value.as_str()], false))
                .collect(),
            NormalizedSection::Checklist { rows, .. } => rows.iter()
                .map(|row| cells(vec![row.item.as_str(), row.status.as_str(), row.remarks.as_str()], false))
                .collect(),
        };
        let mut table = Self { columns, header, rows };
        table.truncate_tall_rows(section.category());
        table
    }

    // A row must fit on a fresh page below the section title and header.
    fn truncate_tall_rows(&mut self, category: &str) {
        let room = BOTTOM_LIMIT - CONTINUATION_TOP - SECTION_TITLE_HEIGHT
            - row_height(&self.header);
        let max_lines = (((room - 2.0 * CELL_PADDING) / LINE_HEIGHT) as usize).max(1);
        for row in self.rows.iter_mut() {
            if row.iter().any(|cell| cell.len() > max_lines) {
                log::warn!("truncating an over-long row in section {category:?}");
                row.iter_mut().for_each(|cell| cell.truncate(max_lines));
            }
        }
    }
}

struct Composer<'a> {
    layout: Layout,
    record: &'a SavedRecord,
    options: &'a PdfOptions,
}

impl Composer<'_> {
    fn push(&mut self, cursor: DocumentCursor, op: DrawOp) {
        self.layout.pages[cursor.page].ops.push(op);
    }

    fn text(
        &mut self,
        cursor: DocumentCursor,
        x: f32,
        size: f32,
        bold: bool,
        color: Color,
        text: String,
    ) {
        self.push(cursor, DrawOp::Text { x, y: cursor.y, size, bold, color, text });
    }

    fn title(&self) -> String {
        sanitize(&self.record.project_name)
    }

    fn first_page_header(&mut self, cursor: DocumentCursor) -> DocumentCursor {
        let mut cursor = cursor;
        let mut lines = wrap(&self.record.project_name, CONTENT_WIDTH, TITLE_SIZE, true);
        if lines.len() > TITLE_MAX_LINES {
            lines.truncate(TITLE_MAX_LINES);
            if let Some(last) = lines.last_mut() {
                *last = ellipsize(last, CONTENT_WIDTH, TITLE_SIZE, true);
            }
        }
        for line in lines {
            cursor = cursor.advance(TITLE_LINE_HEIGHT);
            let x = centred(&line, TITLE_SIZE, true);
            self.text(cursor, x, TITLE_SIZE, true, Color::BLACK, line);
        }
        cursor = cursor.advance(2.0);
        let meta = [
            ("File", self.record.file_name.clone()),
            ("Saved by", self.record.employee_name.clone()),
            ("Date", format_created_at(self.record.created_at)),
        ];
        for (label, value) in meta {
            cursor = cursor.advance(5.0);
            self.text(cursor, MARGIN, META_SIZE, true, Color::BLACK, label.to_string());
            let value = wrap(&value, CONTENT_WIDTH - META_VALUE_OFFSET, META_SIZE, false)
                .swap_remove(0);
            self.text(cursor, MARGIN + META_VALUE_OFFSET, META_SIZE, false, Color::BLACK, value);
        }
        cursor = cursor.advance(3.0);
        let brand = self.options.brand;
        self.push(cursor, DrawOp::FillRect {
            x: MARGIN,
            y: cursor.y,
            w: CONTENT_WIDTH,
            h: 0.5,
            color: brand,
        });
        cursor.advance(4.0)
    }

    fn new_page(&mut self) -> DocumentCursor {
        self.layout.pages.push(Page::default());
        let cursor = DocumentCursor::new(self.layout.pages.len() - 1, MARGIN + 3.0);
        let title = wrap(&self.title(), CONTENT_WIDTH, SMALL_SIZE, false).swap_remove(0);
        self.text(cursor, MARGIN, SMALL_SIZE, false, Color::GREY, title);
        self.push(cursor, DrawOp::FillRect {
            x: MARGIN,
            y: cursor.y + 2.0,
            w: CONTENT_WIDTH,
            h: 0.2,
            color: Color::BORDER,
        });
        DocumentCursor::new(cursor.page, CONTINUATION_TOP)
    }

    fn row(
        &mut self,
        cursor: DocumentCursor,
        columns: &[(&str, f32)],
        cells: &[Vec<String>],
        header: bool,
    ) -> DocumentCursor {
        let h = row_height(cells);
        let brand = self.options.brand;
        let mut x = MARGIN;
        for ((_, w), cell) in columns.iter().zip(cells) {
            if header {
                self.push(cursor, DrawOp::FillRect { x, y: cursor.y, w: *w, h, color: brand });
            }
            self.push(cursor, DrawOp::StrokeRect { x, y: cursor.y, w: *w, h, color: Color::BORDER });
            let color = if header { Color::WHITE } else { Color::BLACK };
            for (i, line) in cell.iter().enumerate() {
                let baseline = cursor.advance(CELL_PADDING + (i + 1) as f32 * LINE_HEIGHT - 1.0);
                self.text(baseline, x + CELL_PADDING, BODY_SIZE, header, color, line.clone());
            }
            x += w;
        }
        cursor.advance(h)
    }

    fn section(
        &mut self,
        cursor: DocumentCursor,
        section: &NormalizedSection,
    ) -> DocumentCursor {
        let table = Table::new(section);
        let header_h = row_height(&table.header);
        let first_h = table.rows.first().map(|row| row_height(row)).unwrap_or(0.0);

        let mut cursor = cursor;
        if cursor.y > CONTINUATION_TOP
            && !cursor.fits(SECTION_TITLE_HEIGHT + header_h + first_h, BOTTOM_LIMIT)
        {
            cursor = self.new_page();
        }
        let title = cursor.advance(6.0);
        let category = wrap(section.category(), CONTENT_WIDTH, SECTION_SIZE, true).swap_remove(0);
        self.text(title, MARGIN, SECTION_SIZE, true, Color::BLACK, category);
        cursor = cursor.advance(SECTION_TITLE_HEIGHT);

        cursor = self.row(cursor, table.columns, &table.header, true);
        for row in table.rows.iter() {
            if !cursor.fits(row_height(row), BOTTOM_LIMIT) {
                cursor = self.new_page();
                cursor = self.row(cursor, table.columns, &table.header, true);
            }
            cursor = self.row(cursor, table.columns, row, false);
        }
        cursor
    }

    fn image(
        &mut self,
        cursor: DocumentCursor,
        decoded: DecodedImage,
    ) -> DocumentCursor {
        let (pw, ph) = decoded.image.dimensions();
        let scale = IMAGE_BOX / pw.max(ph).max(1) as f32;
        let (w, h) = (pw as f32 * scale, ph as f32 * scale);
        let mut cursor = cursor.advance(3.0);
        if !cursor.fits(h, BOTTOM_LIMIT) {
            cursor = self.new_page();
        }
        log::debug!("embedding {} at {w:.1}x{h:.1}mm", decoded.url);
        self.layout.images.push(decoded.image);
        let image = self.layout.images.len() - 1;
        self.push(cursor, DrawOp::Image { image, x: MARGIN, y: cursor.y, w, h });
        cursor.advance(h)
    }

    // Runs after all content is placed so the page count is known.
    fn footers(&mut self) {
        let contact = match self.options.firm_contact.trim() {
            "" => DEFAULT_FIRM_CONTACT,
            contact => contact,
        };
        let contact = sanitize(contact);
        let total = self.layout.pages.len();
        for (i, page) in self.layout.pages.iter_mut().enumerate() {
            page.ops.push(DrawOp::Text {
                x: centred(&contact, SMALL_SIZE, false),
                y: FOOTER_BASELINE,
                size: SMALL_SIZE,
                bold: false,
                color: Color::GREY,
                text: contact.clone(),
            });
            let number = format!("Page {} of {total}", i + 1);
            page.ops.push(DrawOp::Text {
                x: PAGE_WIDTH - MARGIN - text_width(&number, SMALL_SIZE, false),
                y: FOOTER_BASELINE,
                size: SMALL_SIZE,
                bold: false,
                color: Color::GREY,
                text: number,
            });
        }
    }
}

impl Layout {
    /// Lays out the record; `images` holds the decoded images of each
    /// section, in section order.
    pub fn build(
        record: &SavedRecord,
        sections: &[NormalizedSection],
        images: Vec<Vec<DecodedImage>>,
        options: &PdfOptions,
    ) -> Self {
        let mut composer = Composer {
            layout: Layout {
                pages: vec![Page::default()],
                images: Vec::new(),
            },
            record,
            options,
        };
        let mut cursor = composer.first_page_header(DocumentCursor::new(0, MARGIN));
        let mut images = images.into_iter();
        for section in sections {
            cursor = composer.section(cursor, section);
            for image in images.next().unwrap_or_default() {
                cursor = composer.image(cursor, image);
            }
            cursor = cursor.advance(SECTION_GAP);
        }
        composer.footers();
        composer.layout
    }
}
