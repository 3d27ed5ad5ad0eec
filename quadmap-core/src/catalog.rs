//! Registry of map categories and their pins, plus feed ordering.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::model::{CategoryId, FeedItem, MapCategory, MapPin, SortOption};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Errors raised by catalog lookups.
pub enum CatalogError {
    /// No category with this id is registered.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),
}

/// A category together with the pins placed in it.
struct CategoryEntry {
    meta: MapCategory,
    pins: Vec<MapPin>,
}

/// Registry that resolves categories and pins by category identifier.
pub struct MapCatalog {
    categories: BTreeMap<CategoryId, CategoryEntry>,
}

impl MapCatalog {
    /// Build a catalog from category and pin lists.
    ///
    /// Pins referring to an unregistered category are dropped.
    #[must_use]
    pub fn new(categories: Vec<MapCategory>, pins: Vec<MapPin>) -> Self {
        let mut categories_map: BTreeMap<CategoryId, CategoryEntry> = categories
            .into_iter()
            .map(|meta| {
                let entry = CategoryEntry {
                    meta,
                    pins: Vec::new(),
                };
                (entry.meta.id.clone(), entry)
            })
            .collect();

        for pin in pins {
            match categories_map.get_mut(&pin.category) {
                Some(entry) => entry.pins.push(pin),
                None => log::warn!(
                    "Dropping pin {:?}: unknown category {}",
                    pin.id.0,
                    pin.category
                ),
            }
        }

        Self {
            categories: categories_map,
        }
    }

    /// Return all categories sorted by display name, then id.
    #[must_use]
    pub fn categories(&self) -> Vec<MapCategory> {
        let mut categories: Vec<MapCategory> = self
            .categories
            .values()
            .map(|entry| entry.meta.clone())
            .collect();
        categories.sort_by(|left, right| {
            left.name
                .cmp(&right.name)
                .then_with(|| left.id.cmp(&right.id))
        });
        categories
    }

    /// Look up a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCategory`] when no category is registered.
    pub fn category(&self, id: &CategoryId) -> Result<&MapCategory, CatalogError> {
        self.entry(id).map(|entry| &entry.meta)
    }

    /// Pins placed in the given category, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCategory`] when no category is registered.
    pub fn pins_in(&self, id: &CategoryId) -> Result<&[MapPin], CatalogError> {
        self.entry(id).map(|entry| entry.pins.as_slice())
    }

    /// Iterator over every pin, ordered by category id and then insertion.
    pub fn all_pins(&self) -> impl Iterator<Item = &MapPin> {
        self.categories.values().flat_map(|entry| entry.pins.iter())
    }

    fn entry(&self, id: &CategoryId) -> Result<&CategoryEntry, CatalogError> {
        self.categories
            .get(id)
            .ok_or_else(|| CatalogError::UnknownCategory(id.clone()))
    }
}

/// Order feed items in place according to the selected sort option.
///
/// `MostLiked` breaks ties by recency. The sort is stable.
pub fn sort_feed(items: &mut [FeedItem], order: SortOption) {
    match order {
        SortOption::Newest => items.sort_by_key(|item| Reverse(item.created_at)),
        SortOption::Oldest => items.sort_by_key(|item| item.created_at),
        SortOption::MostLiked => {
            items.sort_by_key(|item| (Reverse(item.likes), Reverse(item.created_at)));
        }
    }
}
