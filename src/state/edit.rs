//! Pending site edits made in edit mode
//!
//! The edit store maps an image path (e.g. `artworks/foo.jpg`) to the
//! field edits for that image, plus a handful of reserved keys holding
//! page-wide fields and gallery orders. It is the single source of truth
//! for pending edits: the HTML on disk is only ever the base it gets
//! merged into.
//!
//! The JSON shape is the one the browser keeps in local storage and posts
//! to `/api/save`, so deserialization is lenient: malformed sections are
//! skipped with a warning instead of failing the whole save.

use crate::error::Error;
use crate::state::data::Gallery;
use regex::Regex;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

pub const GLOBAL_KEY: &str = "global";
pub const CONTACT_KEY: &str = "contactPage";

/// Title sentinel: rendered, but visually hidden
pub const UNNAMED: &str = "Unnamed";
/// Price sentinel (case-insensitive): styled as sold
pub const SOLD: &str = "SOLD";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strip anything that looks like a tag from a committed value
pub fn sanitize(value: &str) -> String {
    TAG.replace_all(value, "").into_owned()
}

/// Interpret a boolean-ish flag as written by the edit UI (`"1"`/`"0"`)
pub fn is_truthy(flag: &str) -> bool {
    !matches!(
        flag.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// Accept strings, booleans and numbers where the UI stores strings
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            return Err(de::Error::custom(format!(
                "expected a string, found {other}"
            )))
        }
    })
}

/// Field edits for one image
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRecord {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub price: Option<String>,

    /// Independent of a `SOLD` price; rendered as `data-sold`
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub sold: Option<String>,

    /// Visual only, never written into saved HTML
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub rotation: Option<String>,
}

impl EditRecord {
    pub fn is_sold(&self) -> Option<bool> {
        self.sold.as_deref().map(is_truthy)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn set(&mut self, field: RecordField, value: String) {
        let slot = match field {
            RecordField::Title => &mut self.title,
            RecordField::Price => &mut self.price,
            RecordField::Sold => &mut self.sold,
            RecordField::Rotation => &mut self.rotation,
        };
        *slot = Some(value);
    }
}

/// Editable fields of an image record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Title,
    Price,
    Sold,
    Rotation,
}

/// Header and footer text shared by every page (`global`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedFields {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub nav_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub nav_link_artworks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub nav_link_photography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub nav_link_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub footer_text: Option<String>,
}

impl SharedFields {
    pub fn get(&self, field: SharedField) -> Option<&str> {
        match field {
            SharedField::NavLogo => self.nav_logo.as_deref(),
            SharedField::NavLinkArtworks => self.nav_link_artworks.as_deref(),
            SharedField::NavLinkPhotography => self.nav_link_photography.as_deref(),
            SharedField::NavLinkContact => self.nav_link_contact.as_deref(),
            SharedField::FooterText => self.footer_text.as_deref(),
        }
    }

    fn set(&mut self, field: SharedField, value: String) {
        let slot = match field {
            SharedField::NavLogo => &mut self.nav_logo,
            SharedField::NavLinkArtworks => &mut self.nav_link_artworks,
            SharedField::NavLinkPhotography => &mut self.nav_link_photography,
            SharedField::NavLinkContact => &mut self.nav_link_contact,
            SharedField::FooterText => &mut self.footer_text,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A shared header/footer element, identified by its `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedField {
    NavLogo,
    NavLinkArtworks,
    NavLinkPhotography,
    NavLinkContact,
    FooterText,
}

impl SharedField {
    pub const ALL: [SharedField; 5] = [
        SharedField::NavLogo,
        SharedField::NavLinkArtworks,
        SharedField::NavLinkPhotography,
        SharedField::NavLinkContact,
        SharedField::FooterText,
    ];

    /// The element `id`, which is also the key inside `global`
    pub fn id(self) -> &'static str {
        self.as_str()
    }

    /// Tag the element is expected to have
    pub fn tag(self) -> &'static str {
        match self {
            SharedField::FooterText => "p",
            _ => "a",
        }
    }
}

/// Fields of the contact page (`contactPage`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub email: Option<String>,
    /// Free text block; `box` on the wire
    #[serde(
        rename = "box",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_string"
    )]
    pub body: Option<String>,
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> Option<&str> {
        match field {
            ContactField::Label => self.label.as_deref(),
            ContactField::Email => self.email.as_deref(),
            ContactField::Box => self.body.as_deref(),
        }
    }

    fn set(&mut self, field: ContactField, value: String) {
        let slot = match field {
            ContactField::Label => &mut self.label,
            ContactField::Email => &mut self.email,
            ContactField::Box => &mut self.body,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Label,
    Email,
    Box,
}

/// Gallery page heading (`galleryHeader` / `photographyHeader`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub title: Option<String>,
}

impl HeaderFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
    }
}

/// Quarter-turn rotation offered by the edit UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Rotation::None => "0",
            Rotation::Quarter => "90",
            Rotation::Half => "180",
            Rotation::ThreeQuarter => "270",
        }
    }

    /// Next clockwise step; wraps around after 270
    pub fn next(self) -> Self {
        match self {
            Rotation::None => Rotation::Quarter,
            Rotation::Quarter => Rotation::Half,
            Rotation::Half => Rotation::ThreeQuarter,
            Rotation::ThreeQuarter => Rotation::None,
        }
    }

    /// Unknown values read back as no rotation
    pub fn parse_lossy(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rotation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Rotation::None),
            "90" => Ok(Rotation::Quarter),
            "180" => Ok(Rotation::Half),
            "270" => Ok(Rotation::ThreeQuarter),
            other => Err(Error::unknown("rotation", other)),
        }
    }
}

macro_rules! field_names {
    ($ty:ident, $kind:literal, { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(Error::unknown($kind, other)),
                }
            }
        }
    };
}

field_names!(RecordField, "record field", {
    "title" => Title,
    "price" => Price,
    "sold" => Sold,
    "rotation" => Rotation,
});

field_names!(SharedField, "shared field", {
    "navLogo" => NavLogo,
    "navLinkArtworks" => NavLinkArtworks,
    "navLinkPhotography" => NavLinkPhotography,
    "navLinkContact" => NavLinkContact,
    "footerText" => FooterText,
});

field_names!(ContactField, "contact field", {
    "label" => Label,
    "email" => Email,
    "box" => Box,
});

/// All pending edits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditStore {
    pub global: SharedFields,
    pub contact: ContactFields,
    pub gallery_header: HeaderFields,
    pub photography_header: HeaderFields,
    pub artworks_order: Vec<String>,
    pub photography_order: Vec<String>,
    /// Per-image records keyed by relative image path
    pub records: BTreeMap<String, EditRecord>,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a store as posted by the browser
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a stored store, treating anything unreadable as empty
    pub fn from_json_or_empty(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            warn!("discarding unreadable edit store: {e}");
            Self::default()
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn record(&self, src: &str) -> Option<&EditRecord> {
        self.records.get(src)
    }

    pub fn header(&self, gallery: Gallery) -> &HeaderFields {
        match gallery {
            Gallery::Artworks => &self.gallery_header,
            Gallery::Photography => &self.photography_header,
        }
    }

    pub fn order(&self, gallery: Gallery) -> &[String] {
        match gallery {
            Gallery::Artworks => &self.artworks_order,
            Gallery::Photography => &self.photography_order,
        }
    }

    pub fn set_order(&mut self, gallery: Gallery, order: Vec<String>) {
        match gallery {
            Gallery::Artworks => self.artworks_order = order,
            Gallery::Photography => self.photography_order = order,
        }
    }

    pub fn set_record_field(&mut self, src: &str, field: RecordField, value: &str) {
        debug!(src, field = field.as_str(), "edit recorded");
        self.records
            .entry(src.to_string())
            .or_default()
            .set(field, sanitize(value));
    }

    pub fn set_shared(&mut self, field: SharedField, value: &str) {
        self.global.set(field, sanitize(value));
    }

    pub fn set_contact(&mut self, field: ContactField, value: &str) {
        debug!(field = field.as_str(), "contact edit recorded");
        self.contact.set(field, sanitize(value));
    }

    pub fn set_heading(&mut self, gallery: Gallery, value: &str) {
        let header = match gallery {
            Gallery::Artworks => &mut self.gallery_header,
            Gallery::Photography => &mut self.photography_header,
        };
        header.title = Some(sanitize(value));
    }

    /// Drop every rotation edit; returns whether anything was removed
    pub fn clear_rotations(&mut self) -> bool {
        let mut cleared = false;
        for record in self.records.values_mut() {
            cleared |= record.rotation.take().is_some();
        }
        self.records.retain(|_, record| !record.is_empty());
        cleared
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut store = Self::default();
        for (key, value) in map {
            match key.as_str() {
                GLOBAL_KEY => store.global = section(&key, value),
                CONTACT_KEY => store.contact = section(&key, value),
                "galleryHeader" => store.gallery_header = section(&key, value),
                "photographyHeader" => store.photography_header = section(&key, value),
                "artworksOrder" => store.artworks_order = order_list(&key, value),
                "photographyOrder" => store.photography_order = order_list(&key, value),
                _ => match value {
                    Value::Object(_) => {
                        let record: EditRecord = section(&key, value);
                        if !record.is_empty() {
                            store.records.insert(key, record);
                        }
                    }
                    Value::Null => {}
                    other => warn!(key = %key, "ignoring non-object edit record: {other}"),
                },
            }
        }
        store
    }
}

fn section<T: DeserializeOwned + Default>(key: &str, value: Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(key, "ignoring malformed edit entry: {e}");
        T::default()
    })
}

fn order_list(key: &str, value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(src) => Some(src),
                _ => None,
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(key, "ignoring non-array order: {other}");
            Vec::new()
        }
    }
}

impl<'de> Deserialize<'de> for EditStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

impl Serialize for EditStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if !self.global.is_empty() {
            map.serialize_entry(GLOBAL_KEY, &self.global)?;
        }
        if !self.contact.is_empty() {
            map.serialize_entry(CONTACT_KEY, &self.contact)?;
        }
        for gallery in [Gallery::Artworks, Gallery::Photography] {
            let header = self.header(gallery);
            if !header.is_empty() {
                map.serialize_entry(gallery.header_key(), header)?;
            }
            let order = self.order(gallery);
            if !order.is_empty() {
                map.serialize_entry(gallery.order_key(), order)?;
            }
        }
        for (src, record) in &self.records {
            if !record.is_empty() {
                map.serialize_entry(src, record)?;
            }
        }
        map.end()
    }
}
