/// A position on the document: the page index and the distance, in
/// millimetres, from the top edge of that page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentCursor {
    pub page: usize,
    pub y: f32,
}

impl DocumentCursor {
    pub fn new(page: usize, y: f32) -> Self {
        Self { page, y }
    }

    pub fn advance(self, dy: f32) -> Self {
        Self {
            page: self.page,
            y: self.y + dy,
        }
    }

    /// Whether content of the given height fits above `limit`.
    pub fn fits(&self, height: f32, limit: f32) -> bool {
        self.y + height <= limit
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn advance_keeps_page() {
        let cursor = DocumentCursor::new(2, 10.0).advance(5.5);
        assert_eq!(cursor, DocumentCursor::new(2, 15.5));
        assert!(cursor.fits(10.0, 25.5));
        assert!(!cursor.fits(10.1, 25.5));
    }
}
