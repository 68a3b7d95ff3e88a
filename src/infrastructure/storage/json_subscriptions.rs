use crate::domain::error::DomainError;
use crate::domain::ports::subscription_repository::SubscriptionRepository;
use crate::domain::values::recipient_id::RecipientId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// On-disk document: `{ "subscribed_groups": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SubscriptionFile {
    #[serde(default)]
    subscribed_groups: Vec<String>,
}

/// Subscription registry persisted as a pretty-printed JSON file.
///
/// Every mutation rewrites the whole file while holding the set's lock, so
/// concurrent add/remove calls cannot overwrite each other's state.
/// Disk failures are logged; the in-memory set stays authoritative.
pub struct JsonSubscriptionStore {
    path: PathBuf,
    subscribed: Mutex<BTreeSet<RecipientId>>,
}

impl JsonSubscriptionStore {
    /// Load the file at `path`, creating it empty if missing, then merge the
    /// administrator-configured `static_entries`.
    pub fn load(path: impl Into<PathBuf>, static_entries: &[RecipientId]) -> Self {
        let path = path.into();

        let (mut set, needs_write) = match read_file(&path) {
            Ok(Some(loaded)) => {
                info!(path = %path.display(), count = loaded.set.len(), "Loaded subscriptions");
                if loaded.rewritten {
                    info!(path = %path.display(), "Stored recipients were normalized, rewriting file");
                }
                (loaded.set, loaded.rewritten)
            }
            Ok(None) => {
                info!(path = %path.display(), "Subscription file missing, creating empty one");
                (BTreeSet::new(), true)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read subscriptions, starting empty");
                (BTreeSet::new(), false)
            }
        };

        let before = set.len();
        set.extend(static_entries.iter().cloned());
        let merged = set.len() - before;
        if merged > 0 {
            info!(merged, "Merged configured recipients into subscriptions");
        }

        let store = Self {
            path,
            subscribed: Mutex::new(set),
        };
        if needs_write || merged > 0 {
            store.save();
        }
        store
    }

    /// Write the current set to disk. Failures are logged, not returned.
    pub fn save(&self) {
        let guard = self.lock();
        self.persist(&guard);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<RecipientId>> {
        // A poisoned lock still holds a consistent set: every mutation is a
        // single insert/remove.
        self.subscribed.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, set: &BTreeSet<RecipientId>) {
        match write_file(&self.path, set) {
            Ok(()) => debug!(path = %self.path.display(), count = set.len(), "Saved subscriptions"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to save subscriptions"),
        }
    }
}

impl SubscriptionRepository for JsonSubscriptionStore {
    fn add(&self, id: &RecipientId) -> bool {
        let mut guard = self.lock();
        if !guard.insert(id.clone()) {
            return false;
        }
        self.persist(&guard);
        info!(recipient = %id, "Subscribed");
        true
    }

    fn remove(&self, id: &RecipientId) -> bool {
        let mut guard = self.lock();
        if !guard.remove(id) {
            return false;
        }
        self.persist(&guard);
        info!(recipient = %id, "Unsubscribed");
        true
    }

    fn list(&self) -> BTreeSet<RecipientId> {
        self.lock().clone()
    }

    fn contains(&self, id: &RecipientId) -> bool {
        self.lock().contains(id)
    }

    fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

struct LoadedFile {
    set: BTreeSet<RecipientId>,
    /// The file content differs from what saving `set` would write.
    rewritten: bool,
}

/// `Ok(None)` when the file does not exist.
fn read_file(path: &Path) -> Result<Option<LoadedFile>, DomainError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DomainError::Io(format!("read {}: {e}", path.display()))),
    };

    let file: SubscriptionFile = serde_json::from_str(&raw)
        .map_err(|e| DomainError::Io(format!("parse {}: {e}", path.display())))?;

    let set: BTreeSet<RecipientId> = file
        .subscribed_groups
        .iter()
        .filter_map(|raw| match RecipientId::new(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(entry = %raw, error = %e, "Skipping invalid stored recipient");
                None
            }
        })
        .collect();

    let rewritten = !set
        .iter()
        .map(|id| id.as_str())
        .eq(file.subscribed_groups.iter().map(String::as_str));
    Ok(Some(LoadedFile { set, rewritten }))
}

/// Write to a sibling temp file, then rename over the target.
fn write_file(path: &Path, set: &BTreeSet<RecipientId>) -> Result<(), DomainError> {
    let file = SubscriptionFile {
        subscribed_groups: set.iter().map(|id| id.to_string()).collect(),
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| DomainError::Io(format!("serialize subscriptions: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| DomainError::Io(format!("create {}: {e}", parent.display())))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json).map_err(|e| DomainError::Io(format!("write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        DomainError::Io(format!("rename to {}: {e}", path.display()))
    })
}
