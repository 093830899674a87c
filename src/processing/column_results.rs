use indexmap::IndexMap;
use serde::Serialize;

/// Per-column results keyed by column name, kept in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnResults<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for ColumnResults<T> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<T> ColumnResults<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result. Re-inserting a column replaces its value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: T) {
        self.entries.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&T> {
        self.entries.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for ColumnResults<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_serializes_as_object() {
        let mut results = ColumnResults::new();
        results.insert("zeta", 1);
        results.insert("alpha", 2);
        results.insert("zeta", 3);

        assert_eq!(results.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(results.get("zeta"), Some(&3));
        assert!(!results.contains("beta"));
        assert_eq!(serde_json::to_string(&results).unwrap(), r#"{"zeta":3,"alpha":2}"#);
    }
}
