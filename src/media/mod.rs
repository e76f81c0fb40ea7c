/// Image housekeeping for the gallery folders
///
/// This module handles:
/// - Re-encoding gallery images without EXIF and other metadata (strip.rs)

pub mod strip;
