use crate::domain::prediction::{ModelKey, PredictionSeries};

/// Session-scoped predictions, one series per model.
///
/// Entries keep their insertion order; re-inserting a key replaces the series
/// in place so colour assignment stays stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionStore {
    entries: Vec<(ModelKey, PredictionSeries)>,
}

impl PredictionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn put(&mut self, key: ModelKey, series: PredictionSeries) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = series,
            None => self.entries.push((key, series)),
        }
    }

    pub fn get(&self, key: &ModelKey) -> Option<&PredictionSeries> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, series)| series)
    }

    pub fn all(&self) -> impl Iterator<Item = (&ModelKey, &PredictionSeries)> {
        self.entries.iter().map(|(key, series)| (key, series))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
