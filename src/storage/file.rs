// src/storage/file.rs
// DOCUMENTATION: File-backed storage engine
// PURPOSE: Keep every entity in memory and persist the whole object map as a
// single JSON document keyed by "ClassName.id"

use super::{scope, StorageEngine, StorageError, StorageResult};
use crate::models::{Entity, EntityKind};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// One staged change, replayed onto the committed map
#[derive(Debug, Clone)]
enum Change {
    Put(Entity),
    Delete(Entity),
}

/// JSON file object store
/// DOCUMENTATION: `objects` mirrors the file. `new` and `delete` only record
/// changes in the caller's request scope; reads see the committed map with
/// that scope's changes applied. `save` replays the changes onto the latest
/// committed map, checks references and writes the file, or discards them.
pub struct FileStorage {
    path: PathBuf,
    objects: RwLock<HashMap<String, Entity>>,
    sessions: Mutex<HashMap<u64, Vec<Change>>>,
}

impl FileStorage {
    /// Create an engine over `path`. Nothing is read until `reload`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            objects: RwLock::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn stage(&self, change: Change) {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(scope::current()).or_default().push(change);
    }

    /// Committed objects as seen by the current scope
    async fn view(&self) -> HashMap<String, Entity> {
        let changes = self.sessions.lock().await.get(&scope::current()).cloned();
        let mut objects = self.objects.read().await.clone();
        if let Some(changes) = changes {
            apply(&mut objects, &changes);
        }
        objects
    }

    async fn read_file(&self) -> StorageResult<HashMap<String, Entity>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No storage file at {}, starting empty", self.path.display());
                return Ok(HashMap::new());
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", self.path.display(), e);
                return Err(e.into());
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("Corrupt storage file {}: {}", self.path.display(), e);
            StorageError::from(e)
        })
    }

    /// Write to a sibling temp file, then rename over the target
    async fn write_file(&self, bytes: Vec<u8>) -> StorageResult<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn write_checked(&self, objects: &HashMap<String, Entity>) -> StorageResult<()> {
        check_references(objects)?;
        let bytes = serde_json::to_vec(objects)?;
        self.write_file(bytes).await.map_err(|e| {
            log::error!("Failed to write {}: {}", self.path.display(), e);
            e
        })
    }
}

fn apply(objects: &mut HashMap<String, Entity>, changes: &[Change]) {
    for change in changes {
        match change {
            Change::Put(entity) => {
                objects.insert(entity.key(), entity.clone());
            }
            Change::Delete(entity) => {
                if objects.contains_key(&entity.key()) {
                    let removed = remove_cascade(objects, entity);
                    log::debug!("Deleted {} ({} objects removed)", entity.key(), removed);
                }
            }
        }
    }
}

/// Reject any entity whose foreign keys point at nothing
fn check_references(objects: &HashMap<String, Entity>) -> StorageResult<()> {
    for entity in objects.values() {
        for (kind, id) in entity.references() {
            if !objects.contains_key(&kind.key(&id)) {
                return Err(StorageError::ConstraintViolation(format!(
                    "{} references missing {} {}",
                    entity.key(),
                    kind,
                    id
                )));
            }
        }
    }
    Ok(())
}

/// Remove `root` and every entity transitively owned by it
/// DOCUMENTATION: Mirrors the ON DELETE CASCADE rules of the relational
/// schema. Deleted amenities are unlinked from places instead of cascading.
fn remove_cascade(objects: &mut HashMap<String, Entity>, root: &Entity) -> usize {
    let mut removed = 0;
    let mut queue = VecDeque::from([(root.kind(), root.id())]);
    let mut seen: HashSet<(EntityKind, Uuid)> = HashSet::new();

    while let Some(parent) = queue.pop_front() {
        if !seen.insert(parent) {
            continue;
        }
        if objects.remove(&parent.0.key(&parent.1)).is_some() {
            removed += 1;
        }

        if parent.0 == EntityKind::Amenity {
            for entity in objects.values_mut() {
                if let Entity::Place(place) = entity {
                    place.amenity_ids.retain(|id| *id != parent.1);
                }
            }
            continue;
        }

        queue.extend(
            objects
                .values()
                .filter(|entity| entity.owners().contains(&parent))
                .map(|entity| (entity.kind(), entity.id())),
        );
    }

    removed
}

#[async_trait]
impl StorageEngine for FileStorage {
    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<HashMap<String, Entity>> {
        let mut objects = self.view().await;
        if let Some(kind) = kind {
            objects.retain(|_, entity| entity.kind() == kind);
        }
        Ok(objects)
    }

    async fn new(&self, entity: Entity) {
        self.stage(Change::Put(entity)).await;
    }

    async fn save(&self) -> StorageResult<()> {
        let changes = self.sessions.lock().await.remove(&scope::current());
        let Some(changes) = changes.filter(|changes| !changes.is_empty()) else {
            return Ok(());
        };

        let mut objects = self.objects.write().await;
        let mut next = objects.clone();
        apply(&mut next, &changes);

        if let Err(e) = self.write_checked(&next).await {
            log::error!("Discarded {} staged changes: {}", changes.len(), e);
            return Err(e);
        }

        *objects = next;
        log::debug!("Saved object map to {}", self.path.display());
        Ok(())
    }

    async fn delete(&self, entity: Option<&Entity>) -> StorageResult<()> {
        if let Some(entity) = entity {
            self.stage(Change::Delete(entity.clone())).await;
        }
        Ok(())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.view().await.remove(&kind.key(&id)))
    }

    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize> {
        let objects = self.view().await;
        Ok(match kind {
            Some(kind) => objects.values().filter(|e| e.kind() == kind).count(),
            None => objects.len(),
        })
    }

    async fn reload(&self) -> StorageResult<()> {
        self.sessions.lock().await.remove(&scope::current());
        let mut objects = self.objects.write().await;
        *objects = self.read_file().await?;
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        self.reload().await
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
