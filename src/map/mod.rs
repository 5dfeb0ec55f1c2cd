use crate::entity::Coordinate;
use std::sync::Arc;

mod trace;

pub use trace::TraceMap;

/// Handle to one live marker on a map surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Visual representation of a marker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Icon {
    /// Avatar image reference
    Avatar(String),
    /// Category glyph (listing overlay markers)
    Glyph(char),
    /// Default pin
    Pin,
}

/// Interaction callback for a marker (e.g. open-chat)
pub type InteractFn = Box<dyn Fn() + Send + Sync>;

/// Contract to the external map widget.
///
/// Implementations own rendering; the synchronizer owns which markers exist
/// and where they sit, and is the only component allowed to mutate the
/// marker layer.
pub trait MapSurface {
    /// Place a new marker and return its handle
    fn create_marker(&self, at: Coordinate, icon: &Icon) -> MarkerId;

    /// Move an existing marker in place
    fn set_position(&self, marker: MarkerId, at: Coordinate);

    /// Swap an existing marker's visual in place
    fn set_icon(&self, marker: MarkerId, icon: &Icon);

    /// Remove a marker; its handle is dead afterwards
    fn remove_marker(&self, marker: MarkerId);

    /// Register the interaction callback for a marker
    fn on_interact(&self, marker: MarkerId, callback: InteractFn);
}

impl<M: MapSurface + ?Sized> MapSurface for Arc<M> {
    fn create_marker(&self, at: Coordinate, icon: &Icon) -> MarkerId {
        (**self).create_marker(at, icon)
    }

    fn set_position(&self, marker: MarkerId, at: Coordinate) {
        (**self).set_position(marker, at)
    }

    fn set_icon(&self, marker: MarkerId, icon: &Icon) {
        (**self).set_icon(marker, icon)
    }

    fn remove_marker(&self, marker: MarkerId) {
        (**self).remove_marker(marker)
    }

    fn on_interact(&self, marker: MarkerId, callback: InteractFn) {
        (**self).on_interact(marker, callback)
    }
}
