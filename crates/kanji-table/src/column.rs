//! Column identities.
//!
//! A [`ColumnRegistry`] hands out a dense, stable number for every distinct
//! column name it sees. Readers map these numbers to header positions, so the
//! same [`Column`] handle can be used with every table that declares it.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of the registry a column was created by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RegistryId(u64);

/// Assigns each distinct column name a number the first time it is seen.
///
/// Numbers start at 0 and increase by one per new name. Registration is
/// append-only and serialized internally, so a registry can be shared by
/// reference across threads.
///
/// # Example
///
/// ```
/// use kanji_table::ColumnRegistry;
///
/// let registry = ColumnRegistry::new();
/// let name = registry.register("Name");
/// let strokes = registry.register("Strokes");
/// assert_eq!(name.number(), 0);
/// assert_eq!(strokes.number(), 1);
/// assert_eq!(registry.register("Name"), name);
/// ```
#[derive(Debug)]
pub struct ColumnRegistry {
    id: RegistryId,
    numbers: Mutex<HashMap<Arc<str>, usize>>,
}

impl ColumnRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            id: RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed)),
            numbers: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the column for `name`, registering it if it is new.
    pub fn register(&self, name: &str) -> Column {
        // A panic while holding the lock cannot leave a half-inserted entry.
        let mut numbers = self.numbers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((name, &number)) = numbers.get_key_value(name) {
            return Column {
                name: Arc::clone(name),
                number,
                registry: self.id,
            };
        }
        let name: Arc<str> = Arc::from(name);
        let number = numbers.len();
        numbers.insert(Arc::clone(&name), number);
        tracing::trace!(column = %name, number, "registered column");
        Column {
            name,
            number,
            registry: self.id,
        }
    }

    /// Registers every name in order and returns the handles.
    pub fn register_all(&self, names: &[&str]) -> Vec<Column> {
        names.iter().map(|name| self.register(name)).collect()
    }

    /// Number of distinct names registered so far.
    pub fn len(&self) -> usize {
        self.numbers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no names have been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn id(&self) -> RegistryId {
        self.id
    }
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for a named column.
///
/// Two handles are equal when their numbers are equal. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Column {
    name: Arc<str>,
    number: usize,
    registry: RegistryId,
}

impl Column {
    /// Column name as it appears in table headers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number assigned by the registry.
    pub fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn registry(&self) -> RegistryId {
        self.registry
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Column {}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
