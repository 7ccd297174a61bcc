use lsqp_types::Key;
use std::collections::BTreeMap;

use crate::JacobianFactor;

/// Key -> positions of the factors that reference it
///
/// Built once per factor list; positions are ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableIndex {
    index: BTreeMap<Key, Vec<usize>>,
}

impl VariableIndex {
    /// Index a factor list given the keys of each factor, in list order
    pub fn new<I, K>(factor_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: IntoIterator<Item = Key>,
    {
        let mut index: BTreeMap<Key, Vec<usize>> = BTreeMap::new();
        for (position, keys) in factor_keys.into_iter().enumerate() {
            for key in keys {
                let entry = index.entry(key).or_default();
                if entry.last() != Some(&position) {
                    entry.push(position);
                }
            }
        }
        VariableIndex { index }
    }

    pub fn from_factors(factors: &[JacobianFactor]) -> Self {
        Self::new(factors.iter().map(|f| f.keys().collect::<Vec<_>>()))
    }

    /// Factor positions touching `key`; empty when the key is unknown
    pub fn factors(&self, key: Key) -> &[usize] {
        self.index.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: Key) -> bool {
        self.index.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.index.keys().copied()
    }

    pub fn num_variables(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
