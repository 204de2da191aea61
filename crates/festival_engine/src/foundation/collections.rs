//! Handle types for stable references
//!
//! Every render resource and every scheduled task is addressed through a
//! generational slotmap key, so a stale handle to a freed resource can never
//! alias a newer one.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a resource owned by a [`RenderWorld`](crate::render::RenderWorld)
    pub struct ResourceId;

    /// Handle to a task pending in a [`Scheduler`](crate::animation::Scheduler)
    pub struct TaskId;
}

/// Handle-based map for render resources
pub type ResourceMap<T> = SlotMap<ResourceId, T>;
