/// Edit-mode controller
///
/// This module handles:
/// - The password gate in front of edit mode (gate.rs)
/// - Field commits against an explicit edit store (controller.rs)

pub mod controller;
pub mod gate;
