//! Read-only item search inside a single order.

use crate::item::OrderItem;

/// Lazy filter over an order's items.
///
/// An item matches when its `product_id` (as decimal text) contains the
/// trimmed search term. An empty term matches every item. The iterator is
/// `Clone`, so a search can be restarted without re-reading the order.
#[derive(Debug, Clone)]
pub struct ItemMatches<'a> {
    items: core::slice::Iter<'a, OrderItem>,
    term: &'a str,
}

impl<'a> ItemMatches<'a> {
    pub fn new(items: &'a [OrderItem], term: &'a str) -> Self {
        Self {
            items: items.iter(),
            term: term.trim(),
        }
    }

    fn matches(&self, item: &OrderItem) -> bool {
        self.term.is_empty() || item.product_id.to_string().contains(self.term)
    }
}

impl<'a> Iterator for ItemMatches<'a> {
    type Item = &'a OrderItem;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.items.next() {
            if self.matches(item) {
                return Some(item);
            }
        }
        None
    }
}
