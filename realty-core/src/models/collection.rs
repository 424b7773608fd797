use serde::{Deserialize, Serialize};

use super::Property;

/// Ordered, append-only list of properties for one session.
///
/// Insertion order is display and comparison order. Entries are never
/// deduplicated, edited or removed, and a property has no identity beyond
/// its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCollection {
    properties: Vec<Property>,
}

impl PropertyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property and returns its position.
    pub fn push(
        &mut self,
        property: Property,
    ) -> usize {
        self.properties.push(property);
        self.properties.len() - 1
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&Property> {
        self.properties.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    pub fn as_slice(&self) -> &[Property] {
        &self.properties
    }
}

impl Extend<Property> for PropertyCollection {
    fn extend<T: IntoIterator<Item = Property>>(
        &mut self,
        iter: T,
    ) {
        self.properties.extend(iter);
    }
}

impl FromIterator<Property> for PropertyCollection {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PropertyCollection {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyCollection {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
