use thiserror::Error;

/// Reasons a layout refused an edit.
///
/// None of these are fatal: the layout keeps its last consistent state and the
/// caller is expected to carry on, usually after logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("tile index {index} out of range for {len} tiles")]
    InvalidIndex { index: usize, len: usize },
    #[error("a single tile always fills the screen and cannot be resized")]
    SingleTile,
    #[error("edit would produce an empty or negative size")]
    DegenerateGeometry,
    #[error("requested rectangle lies outside the layout area")]
    OffScreen,
    #[error("node is not a direct child of the container")]
    NotAChild,
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), LayoutError> {
    if index < len {
        Ok(())
    } else {
        Err(LayoutError::InvalidIndex { index, len })
    }
}
