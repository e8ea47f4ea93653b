use std::sync::Arc;

use crate::{
    animator::variant::{Direction, Variant},
    content::catalog::{ContentRecord, ObjectId},
    foundation::core::{Generation, Millis, ViewRect, Viewport},
};

/// Everything captured when a begin command arrives. Never mutated afterwards.
#[derive(Clone, Debug)]
pub struct CloneDescriptor {
    /// Rect the clone starts from.
    pub source_rect: ViewRect,
    /// Rect the clone is headed to (used by the default variant).
    pub dest_rect: ViewRect,
    /// Catalog record rendered inside the clone, shared with the catalog.
    pub content: Arc<ContentRecord>,
    /// Forward or back.
    pub direction: Direction,
    /// Stage machine the clone plays.
    pub variant: Variant,
    /// Lifecycle stamp; callbacks carrying an older one are ignored.
    pub generation: Generation,
    /// Viewport at command time; stage geometry is computed against this, not a live value.
    pub viewport: Viewport,
    /// Clock value the begin command was issued at.
    pub issued_at: Millis,
}

impl CloneDescriptor {
    /// Grid object the clone was cut from.
    pub fn object_id(&self) -> &ObjectId {
        &self.content.id
    }

    /// Image the clone shows, closed before open.
    pub fn image_ref(&self) -> Option<&str> {
        self.content.images.preferred()
    }

    /// Caption of the content.
    pub fn label(&self) -> &str {
        &self.content.label
    }
}
