/// HTML handling for the save pipeline
///
/// This module handles:
/// - Locating elements and attributes by byte span (document.rs)
/// - Escaping interpolated values (escape.rs)
/// - Folding the edit store into each page (merge.rs)

pub mod document;
pub mod escape;
pub mod merge;
