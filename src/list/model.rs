//! Row storage and mutation

use super::types::{FooterState, ListChange, ListObserver, Row, RowData, RowKind};
use crate::types::Item;
use std::fmt;
use tracing::{debug, warn};

/// Ordered rows: optional header, content, optional footer
///
/// Invariants:
/// - if any content row exists, the header exists at index 0 and holds the
///   first item ever inserted
/// - at most one footer exists and it is always the last row
#[derive(Default)]
pub struct ListModel {
    header: Option<Item>,
    content: Vec<Item>,
    footer: Option<FooterState>,
    observers: Vec<Box<dyn ListObserver>>,
}

impl ListModel {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for change notifications
    pub fn subscribe(&mut self, observer: impl ListObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Total number of rows, sentinels included
    pub fn len(&self) -> usize {
        self.header_rows() + self.content.len() + usize::from(self.footer.is_some())
    }

    /// Check if there are no rows at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of content rows (the header is not counted)
    pub fn content_count(&self) -> usize {
        self.content.len()
    }

    /// Number of loaded items (header plus content)
    pub fn item_count(&self) -> usize {
        self.header_rows() + self.content.len()
    }

    /// Check if the header row is present
    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Header item, if loaded
    pub fn header(&self) -> Option<&Item> {
        self.header.as_ref()
    }

    /// Current footer, if any
    pub fn footer(&self) -> Option<&FooterState> {
        self.footer.as_ref()
    }

    /// Row at `index`
    pub fn row_at(&self, index: usize) -> Option<Row<'_>> {
        let header_rows = self.header_rows();
        if let Some(header) = &self.header {
            if index == 0 {
                return Some(Row::Header(header));
            }
        }
        if let Some(item) = self.content.get(index.checked_sub(header_rows)?) {
            return Some(Row::Content(item));
        }
        match &self.footer {
            Some(footer) if index + 1 == self.len() => Some(Row::Footer(footer)),
            _ => None,
        }
    }

    /// Kind of the row at `index`
    pub fn row_kind_at(&self, index: usize) -> Option<RowKind> {
        self.row_at(index).map(|row| row.kind())
    }

    /// Item behind a header or content row
    ///
    /// Detail views reference items by index through this accessor instead
    /// of holding a copy of the list.
    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.row_at(index).and_then(|row| row.item())
    }

    /// All rows, in order
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.header
            .iter()
            .map(Row::Header)
            .chain(self.content.iter().map(Row::Content))
            .chain(self.footer.iter().map(Row::Footer))
    }

    /// Owned copy of every row
    pub fn snapshot(&self) -> Vec<RowData> {
        self.rows().map(|row| row.to_data()).collect()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Pin the header row
    ///
    /// Returns false (and leaves the list untouched) if a header already
    /// exists: the header is always derived from the first item ever loaded.
    pub fn insert_header(&mut self, item: Item) -> bool {
        if self.header.is_some() {
            warn!(title = %item.title, "header already pinned, ignoring");
            return false;
        }
        self.header = Some(item);
        self.notify(ListChange::Inserted { start: 0, count: 1 });
        true
    }

    /// Append content rows before the footer
    ///
    /// If no header exists yet, the first item is promoted to the header.
    pub fn append_content(&mut self, items: Vec<Item>) {
        let mut items = items.into_iter();
        if self.header.is_none() {
            match items.next() {
                Some(first) => {
                    self.insert_header(first);
                }
                None => return,
            }
        }

        let start = self.header_rows() + self.content.len();
        let before = self.content.len();
        self.content.extend(items);
        let count = self.content.len() - before;
        if count > 0 {
            debug!(start, count, "appended content rows");
            self.notify(ListChange::Inserted { start, count });
        }
    }

    /// Replace everything with a fresh first page
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.clear();
        self.append_content(items);
    }

    /// Set the footer, inserting it or flipping it in place
    ///
    /// A footer that is already present is changed in place: setting the
    /// footer twice never produces two footer rows.
    pub fn set_footer(&mut self, state: FooterState) {
        if let Some(footer) = self.footer.as_mut() {
            *footer = state;
            let index = self.len() - 1;
            self.notify(ListChange::Changed { index });
        } else {
            self.footer = Some(state);
            let start = self.len() - 1;
            self.notify(ListChange::Inserted { start, count: 1 });
        }
    }

    /// Remove the footer, returning it
    pub fn clear_footer(&mut self) -> Option<FooterState> {
        let index = self.len().checked_sub(1)?;
        let footer = self.footer.take()?;
        self.notify(ListChange::Removed {
            start: index,
            count: 1,
        });
        Some(footer)
    }

    /// Remove every row
    pub fn clear(&mut self) {
        let count = self.len();
        self.header = None;
        self.content.clear();
        self.footer = None;
        if count > 0 {
            self.notify(ListChange::Removed { start: 0, count });
        }
    }

    fn header_rows(&self) -> usize {
        usize::from(self.header.is_some())
    }

    fn notify(&self, change: ListChange) {
        for observer in &self.observers {
            observer.on_change(&change);
        }
    }
}

impl fmt::Debug for ListModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListModel")
            .field("header", &self.header)
            .field("content", &self.content.len())
            .field("footer", &self.footer)
            .field("observers", &self.observers.len())
            .finish()
    }
}
