//! In-memory prescription drafts.
//!
//! Each draft is one [`PrescriptionEditor`] addressed by a random id. Drafts
//! live only as long as the process; a submitted prescription belongs to the
//! backend, not here.
//!
//! A draft ends when it is closed, when it sits untouched for the idle timeout,
//! or when the book is full and it is the least recently used one. Reading or
//! editing a draft counts as use.

use super::PrescriptionEditor;
use crate::catalog::ProductCatalog;
use crate::constants::{DRAFT_IDLE_TIMEOUT, MAX_OPEN_DRAFTS};
use crate::{ClinicError, ClinicResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug)]
struct Draft {
    editor: PrescriptionEditor,
    touched: Instant,
    /// Position in use order; larger is more recent.
    last_use: u64,
}

#[derive(Debug, Default)]
struct Drafts {
    open: HashMap<Uuid, Draft>,
    uses: u64,
}

impl Drafts {
    fn next_use(&mut self) -> u64 {
        self.uses += 1;
        self.uses
    }

    /// Returns the live draft, discarding it first if it has gone idle.
    fn live(&mut self, id: Uuid, idle: Duration) -> ClinicResult<&mut Draft> {
        let expired = match self.open.get(&id) {
            Some(draft) => draft.touched.elapsed() >= idle,
            None => return Err(ClinicError::DraftNotFound(id)),
        };
        if expired {
            self.open.remove(&id);
            tracing::debug!("prescription draft {} expired", id);
            return Err(ClinicError::DraftNotFound(id));
        }
        let last_use = self.next_use();
        let draft = self
            .open
            .get_mut(&id)
            .ok_or(ClinicError::DraftNotFound(id))?;
        draft.touched = Instant::now();
        draft.last_use = last_use;
        Ok(draft)
    }

    fn purge_idle(&mut self, idle: Duration) {
        let before = self.open.len();
        self.open.retain(|_, draft| draft.touched.elapsed() < idle);
        let purged = before - self.open.len();
        if purged > 0 {
            tracing::debug!("discarded {} idle prescription drafts", purged);
        }
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .open
            .iter()
            .min_by_key(|(_, draft)| draft.last_use)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.open.remove(&id);
            tracing::warn!("draft limit reached, evicted prescription draft {}", id);
        }
    }
}

/// Shared store of open drafts. Cloning shares the same store.
#[derive(Clone, Debug)]
pub struct DraftBook {
    drafts: Arc<RwLock<Drafts>>,
    idle_timeout: Duration,
    max_open: usize,
}

impl Default for DraftBook {
    fn default() -> Self {
        Self::with_limits(DRAFT_IDLE_TIMEOUT, MAX_OPEN_DRAFTS)
    }
}

impl DraftBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A book with its own idle timeout and capacity. A capacity of zero is
    /// treated as one.
    pub fn with_limits(idle_timeout: Duration, max_open: usize) -> Self {
        Self {
            drafts: Arc::default(),
            idle_timeout,
            max_open: max_open.max(1),
        }
    }

    /// Opens a new draft with a blank staging row.
    pub fn open(&self, catalog: ProductCatalog) -> ClinicResult<Uuid> {
        let id = Uuid::new_v4();
        let mut drafts = self.drafts.write().map_err(|_| ClinicError::LockPoisoned)?;
        drafts.purge_idle(self.idle_timeout);
        while drafts.open.len() >= self.max_open {
            drafts.evict_least_recent();
        }
        let last_use = drafts.next_use();
        drafts.open.insert(
            id,
            Draft {
                editor: PrescriptionEditor::new(catalog),
                touched: Instant::now(),
                last_use,
            },
        );
        tracing::debug!("opened prescription draft {}", id);
        Ok(id)
    }

    /// Runs `f` against a shared borrow of the draft.
    pub fn read<T>(&self, id: Uuid, f: impl FnOnce(&PrescriptionEditor) -> T) -> ClinicResult<T> {
        let mut drafts = self.drafts.write().map_err(|_| ClinicError::LockPoisoned)?;
        let draft = drafts.live(id, self.idle_timeout)?;
        Ok(f(&draft.editor))
    }

    /// Runs a mutation against the draft.
    ///
    /// If `f` fails the draft is left as `f` left it; editor operations do not
    /// mutate on error.
    pub fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut PrescriptionEditor) -> ClinicResult<T>,
    ) -> ClinicResult<T> {
        let mut drafts = self.drafts.write().map_err(|_| ClinicError::LockPoisoned)?;
        let draft = drafts.live(id, self.idle_timeout)?;
        f(&mut draft.editor)
    }

    /// Discards a draft, returning it if it existed.
    pub fn close(&self, id: Uuid) -> ClinicResult<Option<PrescriptionEditor>> {
        let mut drafts = self.drafts.write().map_err(|_| ClinicError::LockPoisoned)?;
        Ok(drafts.open.remove(&id).map(|draft| draft.editor))
    }

    pub fn len(&self) -> usize {
        self.drafts.read().map(|d| d.open.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prescription::MedicationField;

    #[test]
    fn drafts_are_isolated_and_shared_across_clones() {
        let book = DraftBook::new();
        let a = book.open(ProductCatalog::default()).unwrap();
        let b = book.clone().open(ProductCatalog::default()).unwrap();
        assert_eq!(book.len(), 2);

        book.update(a, |editor| editor.update_field(0, MedicationField::Route, "Oral"))
            .unwrap();
        assert_eq!(book.read(a, |e| e.rows()[0].route.clone()).unwrap(), "Oral");
        assert_eq!(book.read(b, |e| e.rows()[0].route.clone()).unwrap(), "");
    }

    #[test]
    fn missing_draft_is_reported() {
        let book = DraftBook::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            book.read(id, |_| ()),
            Err(ClinicError::DraftNotFound(missing)) if missing == id
        ));

        let opened = book.open(ProductCatalog::default()).unwrap();
        assert!(book.close(opened).unwrap().is_some());
        assert!(book.is_empty());
    }

    #[test]
    fn idle_drafts_are_discarded() {
        let book = DraftBook::with_limits(Duration::ZERO, 8);
        let first = book.open(ProductCatalog::default()).unwrap();
        let second = book.open(ProductCatalog::default()).unwrap();
        assert_eq!(book.len(), 1);

        assert!(matches!(
            book.read(first, |_| ()),
            Err(ClinicError::DraftNotFound(_))
        ));
        assert!(matches!(
            book.update(second, |_| Ok(())),
            Err(ClinicError::DraftNotFound(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn full_book_evicts_least_recently_used() {
        let book = DraftBook::with_limits(Duration::from_secs(3600), 2);
        let a = book.open(ProductCatalog::default()).unwrap();
        let b = book.open(ProductCatalog::default()).unwrap();
        book.read(a, |_| ()).unwrap();

        let c = book.open(ProductCatalog::default()).unwrap();
        assert_eq!(book.len(), 2);
        assert!(book.read(a, |_| ()).is_ok());
        assert!(book.read(c, |_| ()).is_ok());
        assert!(matches!(
            book.read(b, |_| ()),
            Err(ClinicError::DraftNotFound(missing)) if missing == b
        ));
    }
}
