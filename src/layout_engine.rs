pub mod container;
pub mod engine;
mod error;
pub(crate) mod graph;
pub mod gravity;
pub mod layout;
pub mod systems;
pub mod utils;

pub use container::{ContainerTree, NodeKind};
pub use engine::{EventResponse, LayoutCommand, LayoutEvent, TilingEngine};
pub use error::LayoutError;
pub use graph::{LayoutKind, Orientation};
pub use gravity::{Gravity, Rotation};
pub use layout::{Layout, Tile};
pub use systems::{
    BladeLayout, GridLayout, HalfLayout, I3Layout, LayoutStrategy, LayoutStrategyKind,
    SpiralLayout, SplitMode, TileFrame, get_grid_measurements,
};
