//! Typestate markers shared by the builders in this crate

/// Marker type for missing required builder fields.
#[derive(Debug)]
pub struct Missing;

/// Marker type for set builder fields.
#[derive(Debug)]
pub struct Set<T>(pub(crate) T);
