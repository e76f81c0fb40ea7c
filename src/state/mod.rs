/// State management module
///
/// This module handles all site state, including:
/// - The pages and galleries of the portfolio (data.rs)
/// - Pending edits and their JSON form (edit.rs)
/// - The site root on disk and the save pipeline (site.rs)

pub mod data;
pub mod edit;
pub mod site;
