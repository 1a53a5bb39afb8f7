/// Forward-only cursor over a decoded result set.
///
/// Holds the results captured when the operation ran; re-running the
/// operation re-queries the store.
#[derive(Debug, Clone)]
pub struct Cursor<T> {
    items: Vec<T>,
    pos: usize,
}

impl<T: Clone> Cursor<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items, pos: 0 }
    }

    pub fn advance(&mut self) -> Option<T> {
        if self.pos >= self.items.len() {
            return None;
        }
        let item = self.items[self.pos].clone();
        self.pos += 1;
        Some(item)
    }

    /// Remaining items, consuming the cursor.
    #[must_use]
    pub fn to_vec(mut self) -> Vec<T> {
        self.items.split_off(self.pos)
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}
