// # Area-scoped LSDB
//
// In-memory link-state database holding the LSAs of one flooding scope.
//
// ## Change hooks
//
// The owner installs a single `LsdbHook` when the database is created. The
// hook is told about every entry that enters or leaves the database, after
// the change has been committed. Replacing an LSA with a newer instance of
// the same key reports the old one as removed and then the new one as added.
//
// Dropping the database drops the hook without reporting the remaining
// entries, so nothing observes a database that is being torn down.

use std::collections::BTreeMap;
use std::fmt;

use crate::area::AreaId;
use crate::lsa::{Lsa, LsaKey, LsaType};

/// Observer for LSDB membership changes
pub trait LsdbHook: Send + Sync {
    /// An LSA has entered the database
    fn on_add(&self, lsa: &Lsa);

    /// An LSA has left the database
    fn on_remove(&self, lsa: &Lsa);
}

/// Link-state database for a single area
pub struct Lsdb {
    scope: AreaId,
    entries: BTreeMap<LsaKey, Lsa>,
    hook: Option<Box<dyn LsdbHook>>,
}

impl Lsdb {
    /// Create an empty database for the given scope
    pub fn new(scope: AreaId) -> Self {
        Self {
            scope,
            entries: BTreeMap::new(),
            hook: None,
        }
    }

    /// Create an empty database with its change hook installed
    pub fn with_hook(scope: AreaId, hook: Box<dyn LsdbHook>) -> Self {
        Self {
            hook: Some(hook),
            ..Self::new(scope)
        }
    }

    /// Scope every stored LSA belongs to
    pub fn scope(&self) -> AreaId {
        self.scope
    }

    /// Install an LSA, replacing any stored instance with the same key
    ///
    /// Returns the replaced instance, if any.
    pub fn add(&mut self, mut lsa: Lsa) -> Option<Lsa> {
        lsa.scope = self.scope;
        let key = lsa.key();
        let old = self.entries.insert(key, lsa);

        if let Some(hook) = &self.hook {
            if let Some(old) = &old {
                hook.on_remove(old);
            }
            if let Some(stored) = self.entries.get(&key) {
                hook.on_add(stored);
            }
        }

        old
    }

    /// Remove the LSA stored under `key`
    pub fn remove(&mut self, key: &LsaKey) -> Option<Lsa> {
        let removed = self.entries.remove(key)?;
        if let Some(hook) = &self.hook {
            hook.on_remove(&removed);
        }
        Some(removed)
    }

    pub fn lookup(&self, key: &LsaKey) -> Option<&Lsa> {
        self.entries.get(key)
    }

    /// Number of stored LSAs
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = &Lsa> {
        self.entries.values()
    }

    /// Iterate over the LSAs of one type
    pub fn iter_type(&self, ls_type: LsaType) -> impl Iterator<Item = &Lsa> {
        let code = ls_type.code();
        self.entries
            .values()
            .filter(move |lsa| lsa.header.ls_type == code)
    }
}

impl fmt::Debug for Lsdb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lsdb")
            .field("scope", &self.scope)
            .field("count", &self.entries.len())
            .field("hooked", &self.hook.is_some())
            .finish()
    }
}
