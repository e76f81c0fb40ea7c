//! Shared data structures for the site model
//!
//! These describe the fixed shape of the portfolio: three pages and the
//! two galleries that live on them.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// One of the three HTML pages the save pipeline rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// `index.html`, carries the artworks gallery
    Home,
    /// `contact.html`
    Contact,
    /// `photography.html`, carries the photography gallery
    Photography,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Home, PageKind::Contact, PageKind::Photography];

    /// File name relative to the site root
    pub fn file_name(self) -> &'static str {
        match self {
            PageKind::Home => "index.html",
            PageKind::Contact => "contact.html",
            PageKind::Photography => "photography.html",
        }
    }

    /// The gallery shown on this page, if any
    pub fn gallery(self) -> Option<Gallery> {
        match self {
            PageKind::Home => Some(Gallery::Artworks),
            PageKind::Photography => Some(Gallery::Photography),
            PageKind::Contact => None,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A reorderable image gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gallery {
    Artworks,
    Photography,
}

impl Gallery {
    /// `id` of the `<section>` that holds the entries
    pub fn container_id(self) -> &'static str {
        match self {
            Gallery::Artworks => "artworksGallery",
            Gallery::Photography => "photographyGallery",
        }
    }

    /// Image `src` prefix identifying entries of this gallery
    pub fn src_prefix(self) -> &'static str {
        match self {
            Gallery::Artworks => "artworks/",
            Gallery::Photography => "photography/",
        }
    }

    /// Folder under the site root holding the image files
    pub fn folder(self) -> &'static str {
        match self {
            Gallery::Artworks => "artworks",
            Gallery::Photography => "photography",
        }
    }

    /// Reserved store key holding the desired display order
    pub fn order_key(self) -> &'static str {
        match self {
            Gallery::Artworks => "artworksOrder",
            Gallery::Photography => "photographyOrder",
        }
    }

    /// Reserved store key holding the page heading edits
    pub fn header_key(self) -> &'static str {
        match self {
            Gallery::Artworks => "galleryHeader",
            Gallery::Photography => "photographyHeader",
        }
    }

    /// `id` of the page heading element
    pub fn heading_id(self) -> &'static str {
        match self {
            Gallery::Artworks => "galleryTitle",
            Gallery::Photography => "photographyTitle",
        }
    }

    /// Page the gallery is rendered on
    pub fn page(self) -> PageKind {
        match self {
            Gallery::Artworks => PageKind::Home,
            Gallery::Photography => PageKind::Photography,
        }
    }
}

impl FromStr for Gallery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artworks" => Ok(Gallery::Artworks),
            "photography" => Ok(Gallery::Photography),
            other => Err(Error::unknown("gallery", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_and_galleries_line_up() {
        for kind in PageKind::ALL {
            if let Some(gallery) = kind.gallery() {
                assert_eq!(gallery.page(), kind);
            }
        }
        assert_eq!(PageKind::Contact.gallery(), None);
    }

    #[test]
    fn test_gallery_from_str() {
        assert_eq!("photography".parse::<Gallery>().unwrap(), Gallery::Photography);
        assert!(matches!(
            "sculpture".parse::<Gallery>(),
            Err(Error::Unknown { kind: "gallery", .. })
        ));
    }
}
