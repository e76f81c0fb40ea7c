//! Folding an edit store into page HTML
//!
//! Every rule works on identified nodes of a parsed [`Document`] and
//! expresses its change as splices, so markup no edit touches comes out
//! byte-for-byte as it went in. Anything that does not have the expected
//! structure is skipped: a hand-edited entry simply stops receiving edits
//! instead of being mangled. Merging is idempotent.

use crate::html::document::{Document, Element, Rewriter};
use crate::html::escape::{escape, quote_escaped, unescape};
use crate::state::data::{Gallery, PageKind};
use crate::state::edit::{is_truthy, ContactField, EditStore, SharedField, SOLD, UNNAMED};
use tracing::debug;

const HIDDEN_TITLE: &str = "artwork-title--hidden";
const SOLD_PRICE: &str = "artwork-price--sold";
const SOLD_ATTR: &str = "data-sold";

/// Apply `store` to one page and return the new page text
pub fn merge_page(html: &str, store: &EditStore, kind: PageKind) -> String {
    let doc = Document::parse(html);
    let mut rw = Rewriter::new();

    for field in SharedField::ALL {
        if let Some(value) = store.global.get(field) {
            set_text_by_id(&doc, &mut rw, field.id(), Some(field.tag()), value);
        }
    }

    if let Some(gallery) = kind.gallery() {
        if let Some(title) = store.header(gallery).title.as_deref() {
            set_text_by_id(&doc, &mut rw, gallery.heading_id(), None, title);
        }
    }

    match kind {
        PageKind::Contact => merge_contact(&doc, &mut rw, store),
        PageKind::Home => merge_gallery(&doc, &mut rw, store, Gallery::Artworks, true),
        PageKind::Photography => merge_gallery(&doc, &mut rw, store, Gallery::Photography, false),
    }

    rw.apply(html)
}

/// Image paths of the gallery entries, in document order
pub fn gallery_sources(html: &str, gallery: Gallery) -> Vec<String> {
    let doc = Document::parse(html);
    match gallery_container(&doc, gallery) {
        Some(container) => gallery_entries(&doc, container, gallery)
            .into_iter()
            .map(|entry| entry.src)
            .collect(),
        None => Vec::new(),
    }
}

/// Order `sources` by `order`: listed paths first in list order, the rest
/// afterwards in their original relative order. Unknown list items are
/// skipped and repeated ones count once.
pub fn display_order(sources: &[String], order: &[String]) -> Vec<String> {
    let refs: Vec<&str> = sources.iter().map(String::as_str).collect();
    order_positions(&refs, order)
        .into_iter()
        .map(|i| sources[i].clone())
        .collect()
}

/// Permutation where slot `n` receives `sources[result[n]]`
fn order_positions(sources: &[&str], order: &[String]) -> Vec<usize> {
    let mut placed = vec![false; sources.len()];
    let mut positions = Vec::with_capacity(sources.len());
    for wanted in order {
        for (i, src) in sources.iter().enumerate() {
            if !placed[i] && *src == wanted {
                placed[i] = true;
                positions.push(i);
            }
        }
    }
    positions.extend((0..sources.len()).filter(|&i| !placed[i]));
    positions
}

fn set_text_by_id(doc: &Document<'_>, rw: &mut Rewriter, id: &str, tag: Option<&str>, value: &str) {
    let Some(index) = doc.find_by_id(id) else {
        return;
    };
    let element = doc.element(index);
    if tag.is_some_and(|t| element.tag != t) || doc.text_of(index).is_none() {
        debug!(id, "element does not have the expected shape, leaving it");
        return;
    }
    rw.replace(element.inner.clone(), escape(value));
}

/// Set `name="value"`; `value` must already be escaped
fn set_attr(doc: &Document<'_>, rw: &mut Rewriter, element: &Element, name: &str, value: &str) {
    let rendered = format!(r#"{name}="{value}""#);
    match element.attr(name) {
        Some(attr) if doc.slice(attr.span.clone()) == rendered => {}
        Some(attr) => rw.replace(attr.span.clone(), rendered),
        None => rw.insert(element.attr_insert_point(), format!(" {rendered}")),
    }
}

fn remove_attr(doc: &Document<'_>, rw: &mut Rewriter, element: &Element, name: &str) {
    let Some(attr) = element.attr(name) else {
        return;
    };
    let bytes = doc.source().as_bytes();
    let mut start = attr.span.start;
    while start > element.open.start && bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }
    rw.replace(start..attr.span.end, "");
}

fn toggle_class(doc: &Document<'_>, rw: &mut Rewriter, element: &Element, class: &str, on: bool) {
    if element.has_class(class) == on {
        return;
    }
    let mut classes: Vec<&str> = element
        .attr_value("class")
        .map(|v| v.split_ascii_whitespace().collect())
        .unwrap_or_default();
    if on {
        classes.push(class);
    } else {
        classes.retain(|c| *c != class);
    }

    if classes.is_empty() {
        remove_attr(doc, rw, element, "class");
    } else {
        set_attr(doc, rw, element, "class", &classes.join(" "));
    }
}

fn merge_contact(doc: &Document<'_>, rw: &mut Rewriter, store: &EditStore) {
    let contact = &store.contact;

    if let Some(label) = contact.get(ContactField::Label) {
        set_text_by_id(doc, rw, "contactLabel", Some("span"), label);
    }

    if let Some(email) = contact.get(ContactField::Email) {
        if let Some(index) = doc.find_by_id("contactEmail") {
            let link = doc.element(index);
            if link.tag == "a" && doc.text_of(index).is_some() {
                let email = escape(email);
                set_attr(doc, rw, link, "href", &format!("mailto:{email}"));
                rw.replace(link.inner.clone(), email);
            } else {
                debug!("contactEmail is not a plain link, leaving it");
            }
        }
    }

    // the box is free text: whatever markup it held is replaced wholesale
    if let Some(body) = contact.get(ContactField::Box) {
        if let Some(index) = doc.find_by_id("contactBox") {
            let block = doc.element(index);
            if block.tag == "div" && block.closed {
                rw.replace(block.inner.clone(), escape(body));
            }
        }
    }
}

/// One recognised gallery entry
struct Entry {
    article: usize,
    src: String,
    img: usize,
    /// The image sits inside an `.artwork-frame`
    framed: bool,
    title: Option<usize>,
    price: Option<usize>,
}

fn gallery_container(doc: &Document<'_>, gallery: Gallery) -> Option<usize> {
    let index = doc.find_by_id(gallery.container_id())?;
    let section = doc.element(index);
    if section.tag == "section" && section.closed {
        Some(index)
    } else {
        debug!(id = gallery.container_id(), "gallery container is not a closed section");
        None
    }
}

/// Direct-child `article.artwork` elements holding an image of this gallery
fn gallery_entries(doc: &Document<'_>, container: usize, gallery: Gallery) -> Vec<Entry> {
    let mut found = Vec::new();
    for &article in &doc.element(container).children {
        let element = doc.element(article);
        if element.tag != "article" || !element.has_class("artwork") || !element.closed {
            continue;
        }

        let descendants = doc.descendants(article);
        let Some((img, src)) = descendants.iter().find_map(|&i| {
            let e = doc.element(i);
            if e.tag != "img" {
                return None;
            }
            let src = e.attr_value("src")?;
            src.starts_with(gallery.src_prefix()).then(|| (i, src.to_string()))
        }) else {
            continue;
        };
        let framed = doc
            .element(img)
            .parent
            .is_some_and(|p| doc.element(p).has_class("artwork-frame"));
        let with_class =
            |class: &str| descendants.iter().copied().find(|&i| doc.element(i).has_class(class));

        found.push(Entry {
            article,
            src,
            img,
            framed,
            title: with_class("artwork-title"),
            price: with_class("artwork-price"),
        });
    }
    found
}

fn merge_gallery(
    doc: &Document<'_>,
    rw: &mut Rewriter,
    store: &EditStore,
    gallery: Gallery,
    rewrite_entries: bool,
) {
    let Some(container) = gallery_container(doc, gallery) else {
        return;
    };
    let entries = gallery_entries(doc, container, gallery);
    if entries.is_empty() {
        return;
    }

    // entry edits are rendered per entry so entries can then move as a whole
    let mut entry_rw = Rewriter::new();
    if rewrite_entries {
        for entry in &entries {
            rewrite_entry(doc, &mut entry_rw, store, entry);
        }
    }

    let sources: Vec<&str> = entries.iter().map(|e| e.src.as_str()).collect();
    let order = store.order(gallery);
    let positions = if order.is_empty() {
        (0..entries.len()).collect()
    } else {
        order_positions(&sources, order)
    };

    for (slot, &from) in positions.iter().enumerate() {
        let target = doc.element(entries[slot].article).outer.clone();
        let text = entry_rw.render(doc.source(), doc.element(entries[from].article).outer.clone());
        if text != doc.slice(target.clone()) {
            rw.replace(target, text);
        }
    }
}

fn rewrite_entry(doc: &Document<'_>, rw: &mut Rewriter, store: &EditStore, entry: &Entry) {
    let Some(record) = store.record(&entry.src) else {
        return;
    };
    let (Some(title_at), Some(price_at)) = (entry.title, entry.price) else {
        debug!(src = %entry.src, "entry lacks a title or price, leaving it");
        return;
    };
    let (Some(title_text), Some(price_text)) = (doc.text_of(title_at), doc.text_of(price_at))
    else {
        debug!(src = %entry.src, "entry title or price holds markup, leaving it");
        return;
    };
    if !entry.framed {
        debug!(src = %entry.src, "entry image is not framed, leaving it");
        return;
    }

    let article = doc.element(entry.article);
    let title_el = doc.element(title_at);
    let price_el = doc.element(price_at);

    let title = record
        .title
        .clone()
        .unwrap_or_else(|| unescape(title_text.trim()));
    let price = record
        .price
        .clone()
        .unwrap_or_else(|| unescape(price_text.trim()));
    let marked_sold = article.attr(SOLD_ATTR).map(|a| is_truthy(a.value.as_deref().unwrap_or("")));
    let sold = record.is_sold().unwrap_or(marked_sold == Some(true));

    // a title taken from the page is reused as written, entities included
    let alt = match &record.title {
        Some(edited) => {
            let escaped = escape(edited);
            rw.replace(title_el.inner.clone(), escaped.clone());
            escaped
        }
        None => quote_escaped(title_text.trim()),
    };
    set_attr(doc, rw, doc.element(entry.img), "alt", &alt);
    toggle_class(doc, rw, title_el, HIDDEN_TITLE, title == UNNAMED);

    if record.price.is_some() {
        rw.replace(price_el.inner.clone(), escape(&price));
    }
    toggle_class(doc, rw, price_el, SOLD_PRICE, price.trim().eq_ignore_ascii_case(SOLD));

    match (sold, marked_sold) {
        (true, Some(true)) | (false, None) => {}
        (true, _) => set_attr(doc, rw, article, SOLD_ATTR, "1"),
        (false, Some(_)) => remove_attr(doc, rw, article, SOLD_ATTR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::edit::{EditRecord, RecordField};
    use proptest::prelude::*;

    const HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Ana Ribeiro</title>
</head>
<body>
  <nav class="nav">
    <a href="index.html" id="navLogo" class="nav-logo">Ana Ribeiro</a>
    <ul class="nav-links">
      <li><a href="index.html" id="navLinkArtworks">Artworks</a></li>
      <li><a href="photography.html" id="navLinkPhotography">Photography</a></li>
      <li><a href="contact.html" id="navLinkContact">Contact</a></li>
    </ul>
  </nav>
"#;

    const FOOTER: &str = r#"  <footer><p id="footerText">&copy; 2024 Ana Ribeiro</p></footer>
  <script src="script.js"></script>
</body>
</html>
"#;

    fn artwork(src: &str, title: &str, price: &str) -> String {
        format!(
            r#"    <article class="artwork">
      <div class="artwork-frame">
        <img src="{src}" alt="{title}">
      </div>
      <h3 class="artwork-title">{title}</h3>
      <p class="artwork-price">{price}</p>
    </article>
"#
        )
    }

    fn home(entries: &[String]) -> String {
        format!(
            "{HEADER}  <h1 id=\"galleryTitle\">Artworks</h1>\n  <section class=\"gallery\" id=\"artworksGallery\">\n{}  </section>\n{FOOTER}",
            entries.concat()
        )
    }

    fn photography(srcs: &[&str]) -> String {
        let entries: String = srcs
            .iter()
            .map(|src| {
                format!(
                    "    <article class=\"artwork\">\n      <div class=\"artwork-frame\"><img src=\"{src}\" alt=\"\"></div>\n    </article>\n"
                )
            })
            .collect();
        format!(
            "{HEADER}  <section class=\"gallery gallery--photography\" id=\"photographyGallery\">\n{entries}  </section>\n{FOOTER}"
        )
    }

    fn contact() -> String {
        format!(
            r#"{HEADER}  <main>
    <p><span class="contact-label" id="contactLabel">Email</span>
      <a class="contact-email" id="contactEmail" href="mailto:old@example.com">old@example.com</a></p>
    <div class="contact-box" id="contactBox">Say hello.<br>Commissions welcome.</div>
  </main>
{FOOTER}"#
        )
    }

    fn abc() -> String {
        home(&[
            artwork("artworks/a.jpg", "Dawn", "€400"),
            artwork("artworks/b.jpg", "Noon", "€300"),
            artwork("artworks/c.jpg", "Dusk", "€250"),
        ])
    }

    fn store(json: &str) -> EditStore {
        EditStore::from_json(json).unwrap()
    }

    fn position(html: &str, needle: &str) -> usize {
        html.find(needle).unwrap_or_else(|| panic!("{needle} not in output"))
    }

    #[test]
    fn test_empty_store_changes_nothing() {
        let empty = EditStore::new();
        let page = abc();
        assert_eq!(merge_page(&page, &empty, PageKind::Home), page);
        assert_eq!(merge_page(&contact(), &empty, PageKind::Contact), contact());
    }

    #[test]
    fn test_shared_fields_only_when_present() {
        let edits = store(r#"{ "global": { "navLogo": "Ana & Co", "footerText": null } }"#);
        let merged = merge_page(&contact(), &edits, PageKind::Contact);

        assert!(merged.contains(r#"<a href="index.html" id="navLogo" class="nav-logo">Ana &amp; Co</a>"#));
        assert!(merged.contains(r#"<p id="footerText">&copy; 2024 Ana Ribeiro</p>"#));
        assert!(merged.contains(r#"id="navLinkContact">Contact</a>"#));
    }

    #[test]
    fn test_unnamed_title_is_hidden() {
        let mut edits = EditStore::new();
        edits.set_record_field("artworks/b.jpg", RecordField::Title, UNNAMED);
        let merged = merge_page(&abc(), &edits, PageKind::Home);

        assert!(merged.contains(r#"<img src="artworks/b.jpg" alt="Unnamed">"#));
        assert!(merged.contains(
            r#"<h3 class="artwork-title artwork-title--hidden">Unnamed</h3>"#
        ));
        assert_eq!(merged.matches(HIDDEN_TITLE).count(), 1);

        edits.set_record_field("artworks/b.jpg", RecordField::Title, "Midday");
        let renamed = merge_page(&merged, &edits, PageKind::Home);
        assert!(renamed.contains(r#"<h3 class="artwork-title">Midday</h3>"#));
        assert!(!renamed.contains(HIDDEN_TITLE));
    }

    #[test]
    fn test_sold_price_class_ignores_flag() {
        let edits = store(r#"{ "artworks/a.jpg": { "price": "sold", "sold": "0" } }"#);
        let merged = merge_page(&abc(), &edits, PageKind::Home);

        assert!(merged.contains(r#"<p class="artwork-price artwork-price--sold">sold</p>"#));
        assert!(!merged.contains(SOLD_ATTR));
    }

    #[test]
    fn test_sold_flag_toggles_data_attribute() {
        let page = abc();
        let sold = merge_page(&page, &store(r#"{ "artworks/c.jpg": { "sold": "1" } }"#), PageKind::Home);
        assert_eq!(sold.matches(r#"<article class="artwork" data-sold="1">"#).count(), 1);
        assert!(position(&sold, "data-sold") > position(&sold, "artworks/b.jpg"));
        // a flag alone does not touch the price styling
        assert!(!sold.contains(SOLD_PRICE));

        let unsold = merge_page(&sold, &store(r#"{ "artworks/c.jpg": { "sold": "0" } }"#), PageKind::Home);
        assert_eq!(unsold, page);
    }

    #[test]
    fn test_order_moves_listed_entries_first() {
        let page = abc();
        let edits = store(r#"{ "artworksOrder": ["artworks/b.jpg", "artworks/a.jpg"] }"#);
        let merged = merge_page(&page, &edits, PageKind::Home);

        let a = position(&merged, "artworks/a.jpg");
        let b = position(&merged, "artworks/b.jpg");
        let c = position(&merged, "artworks/c.jpg");
        assert!(b < a && a < c);
        // a pure permutation: surrounding whitespace stays put
        assert_eq!(merged.len(), page.len());
        assert!(merged.ends_with(FOOTER));
    }

    #[test]
    fn test_order_skips_unknown_and_repeated_paths() {
        let edits = store(
            r#"{ "artworksOrder": ["artworks/zz.jpg", "artworks/c.jpg", "artworks/c.jpg", "artworks/a.jpg"] }"#,
        );
        let merged = merge_page(&abc(), &edits, PageKind::Home);

        assert_eq!(
            gallery_sources(&merged, Gallery::Artworks),
            ["artworks/c.jpg", "artworks/a.jpg", "artworks/b.jpg"]
        );
    }

    #[test]
    fn test_entry_without_record_is_untouched() {
        let untouched = artwork("artworks/b.jpg", "Noon", "SOLD");
        let page = home(&[artwork("artworks/a.jpg", "Dawn", "€400"), untouched.clone()]);
        let edits = store(r#"{ "artworks/a.jpg": { "title": "First light", "sold": "1" } }"#);
        let merged = merge_page(&page, &edits, PageKind::Home);

        assert!(merged.contains(&untouched));
        assert!(merged.contains(r#"<h3 class="artwork-title">First light</h3>"#));
    }

    #[test]
    fn test_values_are_escaped() {
        let title = r#""Red" <Blue> & Co"#;
        let edits = store(
            &serde_json::json!({
                "artworks/a.jpg": { "title": title },
                "contactPage": { "email": "a\"b@example.com" }
            })
            .to_string(),
        );
        let merged = merge_page(&abc(), &edits, PageKind::Home);

        let escaped = "&quot;Red&quot; &lt;Blue&gt; &amp; Co";
        assert!(merged.contains(&format!(r#"alt="{escaped}""#)));
        assert!(merged.contains(&format!(r#"<h3 class="artwork-title">{escaped}</h3>"#)));

        let doc = Document::parse(&merged);
        let h3 = doc.find(|e| e.has_class("artwork-title")).unwrap();
        assert_eq!(unescape(doc.text_of(h3).unwrap()), title);

        let contact_page = merge_page(&contact(), &edits, PageKind::Contact);
        assert!(contact_page.contains(
            r#"href="mailto:a&quot;b@example.com">a&quot;b@example.com</a>"#
        ));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let edits = store(
            r#"{
                "global": { "navLogo": "A. Ribeiro", "navLinkArtworks": "Work", "footerText": "<3 & more" },
                "contactPage": { "label": "Mail", "email": "ana@example.com", "box": "Open for commissions" },
                "galleryHeader": { "title": "Paintings" },
                "photographyHeader": { "title": "Film" },
                "artworksOrder": ["artworks/c.jpg", "artworks/a.jpg"],
                "photographyOrder": ["photography/y.jpg"],
                "artworks/a.jpg": { "title": "Unnamed", "price": "Sold", "sold": "1", "rotation": "90" },
                "artworks/b.jpg": { "price": "€350" },
                "artworks/c.jpg": { "title": "Dusk \"II\"", "sold": "0" }
            }"#,
        );
        let pages = [
            (abc(), PageKind::Home),
            (contact(), PageKind::Contact),
            (photography(&["photography/x.jpg", "photography/y.jpg"]), PageKind::Photography),
        ];
        for (page, kind) in pages {
            let once = merge_page(&page, &edits, kind);
            assert_ne!(once, page, "{kind}");
            assert_eq!(merge_page(&once, &edits, kind), once, "{kind}");
        }
    }

    #[test]
    fn test_page_title_entities_survive_in_alt() {
        let entry = r#"    <article class="artwork">
      <div class="artwork-frame"><img src="artworks/a.jpg" alt="old"></div>
      <h3 class="artwork-title">Caf&eacute; &ndash; "Night"</h3>
      <p class="artwork-price">€5</p>
    </article>
"#;
        let page = home(&[entry.to_string()]);
        let edits = store(r#"{ "artworks/a.jpg": { "price": "€6" } }"#);
        let merged = merge_page(&page, &edits, PageKind::Home);

        assert!(merged.contains(r#"alt="Caf&eacute; &ndash; &quot;Night&quot;""#));
        assert!(!merged.contains("&amp;eacute;"));
        assert!(merged.contains(r#"<h3 class="artwork-title">Caf&eacute; &ndash; "Night"</h3>"#));
        assert!(merged.contains(r#"<p class="artwork-price">€6</p>"#));
        assert_eq!(merge_page(&merged, &edits, PageKind::Home), merged);
    }

    fn edit_text() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(UNNAMED.to_string()),
            Just("sold".to_string()),
            Just("Caf&eacute;".to_string()),
            "[a-zA-Z0-9 &<>\"'é€]{0,10}",
        ]
    }

    fn edit_record() -> impl Strategy<Value = EditRecord> {
        let sold = prop_oneof![Just("1"), Just("0"), Just("true"), Just("")].prop_map(String::from);
        (
            proptest::option::of(edit_text()),
            proptest::option::of(edit_text()),
            proptest::option::of(sold),
        )
            .prop_map(|(title, price, sold)| EditRecord {
                title,
                price,
                sold,
                rotation: None,
            })
    }

    const SOURCES: [&str; 3] = ["artworks/a.jpg", "artworks/b.jpg", "artworks/c.jpg"];

    fn mixed_page() -> String {
        home(&[
            artwork(SOURCES[0], "Dawn", "€400"),
            artwork(SOURCES[1], "Caf&eacute; &amp; Co", "€300"),
            artwork(SOURCES[2], UNNAMED, "SOLD"),
        ])
    }

    proptest! {
        #[test]
        fn test_merge_is_idempotent_for_generated_stores(
            records in proptest::collection::vec(proptest::option::of(edit_record()), 3),
            order in proptest::sample::subsequence(SOURCES.to_vec(), 0..=3).prop_shuffle(),
            logo in proptest::option::of(edit_text()),
        ) {
            let mut edits = EditStore::new();
            for (src, record) in SOURCES.iter().zip(records) {
                if let Some(record) = record {
                    edits.records.insert(src.to_string(), record);
                }
            }
            edits.artworks_order = order.into_iter().map(String::from).collect();
            edits.global.nav_logo = logo;

            let page = mixed_page();
            let once = merge_page(&page, &edits, PageKind::Home);
            prop_assert_eq!(merge_page(&once, &edits, PageKind::Home), once.clone());

            let mut before = gallery_sources(&page, Gallery::Artworks);
            let mut after = gallery_sources(&once, Gallery::Artworks);
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);

            let untitled_b = edits.record(SOURCES[1]).is_some_and(|r| r.title.is_none());
            if untitled_b {
                prop_assert!(once.contains(r#"alt="Caf&eacute; &amp; Co""#));
            }
        }
    }

    #[test]
    fn test_rotation_never_reaches_html() {
        let edits = store(r#"{ "artworks/a.jpg": { "rotation": "180" } }"#);
        let merged = merge_page(&abc(), &edits, PageKind::Home);
        assert!(!merged.contains("180"));
        assert!(!merged.contains("rotate"));
    }

    #[test]
    fn test_malformed_entry_still_moves_but_is_not_rewritten() {
        let broken = r#"    <article class="artwork">
      <div class="artwork-frame"><img src="artworks/x.jpg" alt="X"></div>
      <h3 class="artwork-title">No <em>price</em></h3>
    </article>
"#;
        let page = home(&[artwork("artworks/a.jpg", "Dawn", "€400"), broken.to_string()]);
        let edits = store(
            r#"{ "artworks/x.jpg": { "title": "Fixed", "sold": "1" }, "artworksOrder": ["artworks/x.jpg"] }"#,
        );
        let merged = merge_page(&page, &edits, PageKind::Home);

        assert!(merged.contains(broken));
        assert!(position(&merged, "artworks/x.jpg") < position(&merged, "artworks/a.jpg"));
    }

    #[test]
    fn test_contact_fields() {
        let edits = store(
            r#"{ "contactPage": { "label": "Write", "email": "ana@example.com", "box": "Back in May" } }"#,
        );
        let merged = merge_page(&contact(), &edits, PageKind::Contact);

        assert!(merged.contains(r#"id="contactLabel">Write</span>"#));
        assert!(merged.contains(
            r#"<a class="contact-email" id="contactEmail" href="mailto:ana@example.com">ana@example.com</a>"#
        ));
        assert!(merged.contains(r#"<div class="contact-box" id="contactBox">Back in May</div>"#));

        // contact fields only apply to the contact page
        let page = abc();
        assert_eq!(merge_page(&page, &edits, PageKind::Home), page);
    }

    #[test]
    fn test_photography_reorders_without_rewriting() {
        let page = photography(&["photography/x.jpg", "photography/y.jpg", "photography/z.jpg"]);
        let edits = store(
            r#"{
                "photographyOrder": ["photography/z.jpg"],
                "photography/x.jpg": { "title": "Ignored", "sold": "1" },
                "artworksOrder": ["photography/y.jpg"]
            }"#,
        );
        let merged = merge_page(&page, &edits, PageKind::Photography);

        assert_eq!(
            gallery_sources(&merged, Gallery::Photography),
            ["photography/z.jpg", "photography/x.jpg", "photography/y.jpg"]
        );
        assert!(!merged.contains("Ignored"));
        assert!(!merged.contains(SOLD_ATTR));
    }

    #[test]
    fn test_missing_container_is_a_no_op() {
        let page = format!("{HEADER}  <main><p>Nothing here yet</p></main>\n{FOOTER}");
        let edits = store(r#"{ "artworksOrder": ["artworks/a.jpg"], "artworks/a.jpg": { "title": "A" } }"#);
        assert_eq!(merge_page(&page, &edits, PageKind::Home), page);
        assert!(gallery_sources(&page, Gallery::Artworks).is_empty());
    }

    #[test]
    fn test_gallery_heading() {
        let edits = store(r#"{ "galleryHeader": { "title": "Paintings & Prints" } }"#);
        let merged = merge_page(&abc(), &edits, PageKind::Home);
        assert!(merged.contains(r#"<h1 id="galleryTitle">Paintings &amp; Prints</h1>"#));
    }

    #[test]
    fn test_display_order() {
        let sources: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let order: Vec<String> = ["d", "x", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(display_order(&sources, &order), ["d", "b", "a", "c"]);
        assert_eq!(display_order(&sources, &[]), sources);
    }
}
