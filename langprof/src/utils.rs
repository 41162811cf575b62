use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashMap;

/// Assigns dense IDs to keys in order of first appearance.
#[derive(Clone, Debug)]
pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K> Indexer<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    /// Builds an indexer whose IDs are the positions in `keys`.
    ///
    /// Returns `None` if `keys` contains a duplicate.
    pub fn from_keys(keys: Vec<K>) -> Option<Self> {
        let mut ids = HashMap::with_capacity(keys.len());
        for (id, key) in keys.iter().enumerate() {
            if ids.insert(key.clone(), id).is_some() {
                return None;
            }
        }
        Some(Self { ids, keys })
    }

    pub fn get_id<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len();
            self.keys.push(key.to_owned());
            self.ids.insert(key.to_owned(), id);
            id
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

impl<K> Default for Indexer<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
