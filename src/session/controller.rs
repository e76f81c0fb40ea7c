use crate::error::{Error, Result};
use crate::session::gate::PasswordGate;
use crate::state::data::Gallery;
use crate::state::edit::{ContactField, EditStore, RecordField, Rotation, SharedField};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// One edit-mode session over an explicit edit store.
///
/// Every commit requires edit mode to be active. Values are trimmed here
/// and tag-stripped by the store, so a commit records exactly what the
/// merge will later write.
#[derive(Debug)]
pub struct EditSession {
    store: EditStore,
    gate: PasswordGate,
    editing: bool,
}

impl EditSession {
    /// Start a session; stale rotations never survive a reload
    pub fn new(mut store: EditStore, gate: PasswordGate) -> Self {
        if store.clear_rotations() {
            debug!("cleared rotation edits from the previous session");
        }
        EditSession {
            store,
            gate,
            editing: false,
        }
    }

    /// Load the store kept at `path`. A missing or unreadable file starts
    /// from an empty store.
    pub async fn load(path: &Path, gate: PasswordGate) -> Result<Self> {
        let store = match tokio::fs::read_to_string(path).await {
            Ok(json) => EditStore::from_json_or_empty(&json),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no edit store yet");
                EditStore::new()
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        Ok(Self::new(store, gate))
    }

    pub async fn persist(&self, path: &Path) -> Result<()> {
        let json = self.store.to_json()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| Error::io(path, e))
    }

    pub fn enter(&mut self, password: &str) -> Result<()> {
        if !self.gate.check(password) {
            warn!("edit mode refused: incorrect password");
            return Err(Error::WrongPassword);
        }
        self.editing = true;
        info!("edit mode on");
        Ok(())
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Leave edit mode and hand back the store to be saved
    pub fn exit(&mut self) -> &EditStore {
        if self.editing {
            info!("edit mode off");
        }
        self.editing = false;
        &self.store
    }

    pub fn store(&self) -> &EditStore {
        &self.store
    }

    fn ensure_editing(&self) -> Result<()> {
        if self.editing {
            Ok(())
        } else {
            Err(Error::NotEditing)
        }
    }

    pub fn commit_title(&mut self, src: &str, title: &str) -> Result<()> {
        self.ensure_editing()?;
        self.store
            .set_record_field(src, RecordField::Title, title.trim());
        Ok(())
    }

    /// Prices and the sold flag only exist on the artworks gallery
    pub fn commit_price(&mut self, src: &str, price: &str) -> Result<()> {
        self.ensure_editing()?;
        require_artwork(src)?;
        self.store
            .set_record_field(src, RecordField::Price, price.trim());
        Ok(())
    }

    pub fn set_sold(&mut self, src: &str, sold: bool) -> Result<()> {
        self.ensure_editing()?;
        require_artwork(src)?;
        let flag = if sold { "1" } else { "0" };
        self.store.set_record_field(src, RecordField::Sold, flag);
        Ok(())
    }

    /// Turn an image a quarter clockwise and return its new rotation
    pub fn rotate(&mut self, src: &str) -> Result<Rotation> {
        self.ensure_editing()?;
        let current = self
            .store
            .record(src)
            .and_then(|record| record.rotation.as_deref());
        let next = Rotation::parse_lossy(current).next();
        self.store
            .set_record_field(src, RecordField::Rotation, next.as_str());
        Ok(next)
    }

    pub fn commit_shared(&mut self, field: SharedField, value: &str) -> Result<()> {
        self.ensure_editing()?;
        self.store.set_shared(field, value.trim());
        Ok(())
    }

    pub fn commit_contact(&mut self, field: ContactField, value: &str) -> Result<()> {
        self.ensure_editing()?;
        self.store.set_contact(field, value.trim());
        Ok(())
    }

    pub fn commit_heading(&mut self, gallery: Gallery, value: &str) -> Result<()> {
        self.ensure_editing()?;
        self.store.set_heading(gallery, value.trim());
        Ok(())
    }

    /// Drop `src` at `index` of the gallery as currently displayed.
    ///
    /// `index` counts positions among the other entries and is clamped to
    /// the end. The full resulting order is stored and returned.
    pub fn move_entry(
        &mut self,
        gallery: Gallery,
        current: &[String],
        src: &str,
        index: usize,
    ) -> Result<Vec<String>> {
        self.ensure_editing()?;
        if !current.iter().any(|s| s == src) {
            return Err(Error::unknown("gallery entry", src));
        }

        let mut order: Vec<String> = current.iter().filter(|s| *s != src).cloned().collect();
        order.insert(index.min(order.len()), src.to_string());
        self.store.set_order(gallery, order.clone());
        Ok(order)
    }
}

fn require_artwork(src: &str) -> Result<()> {
    if src.starts_with(Gallery::Artworks.src_prefix()) {
        Ok(())
    } else {
        Err(Error::unknown("artwork", src))
    }
}
