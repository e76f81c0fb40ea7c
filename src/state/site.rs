use crate::error::{Error, Result};
use crate::html::merge::{display_order, gallery_sources, merge_page};
use crate::state::data::{Gallery, PageKind};
use crate::state::edit::EditStore;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// The Site is the portfolio's root directory on disk.
/// It holds the three pages (which are both served content and the save
/// target), the image folders, and every other static asset.
pub struct Site {
    root: PathBuf,
}

/// Outcome of folding an edit store into the pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: Vec<PageKind>,
    pub unchanged: Vec<PageKind>,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Site { root: root.into() }
    }

    /// Get the site root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn page_path(&self, kind: PageKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Map a request path onto a file below the root.
    ///
    /// `/` is the home page. Any `..`, absolute or prefixed component is
    /// refused outright rather than normalized.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf> {
        let relative = match request_path.trim_start_matches('/') {
            "" => PageKind::Home.file_name(),
            path => path,
        };

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::PathEscapesRoot(request_path.to_string()));
                }
            }
        }
        Ok(resolved)
    }

    pub async fn read_page(&self, kind: PageKind) -> Result<String> {
        let path = self.page_path(kind);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::io(path, e))
    }

    /// Merge `store` into every page and overwrite the ones that changed.
    ///
    /// All pages are read before anything is written, so a missing page
    /// aborts the save untouched. There is no transaction across the
    /// writes themselves.
    pub async fn apply(&self, store: &EditStore) -> Result<SaveReport> {
        let mut pages = Vec::with_capacity(PageKind::ALL.len());
        for kind in PageKind::ALL {
            pages.push((kind, self.read_page(kind).await?));
        }

        let mut report = SaveReport::default();
        for (kind, html) in pages {
            let merged = merge_page(&html, store, kind);
            if merged == html {
                debug!(page = %kind, "no changes");
                report.unchanged.push(kind);
                continue;
            }
            let path = self.page_path(kind);
            tokio::fs::write(&path, merged)
                .await
                .map_err(|e| Error::io(&path, e))?;
            info!(page = %kind, "saved edits");
            report.written.push(kind);
        }
        Ok(report)
    }

    /// The gallery order a visitor sees: the page order with the stored
    /// order applied on top
    pub async fn display_order(&self, gallery: Gallery, store: &EditStore) -> Result<Vec<String>> {
        let html = self.read_page(gallery.page()).await?;
        let sources = gallery_sources(&html, gallery);
        Ok(display_order(&sources, store.order(gallery)))
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site").field("root", &self.root).finish()
    }
}
