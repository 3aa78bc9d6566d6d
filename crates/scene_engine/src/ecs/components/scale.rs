//! Scale component
//!
//! Holds the animation rate and target for an entity's scale. The target
//! is only ever changed through `ComponentStore::set_target_scale`, which
//! also starts the animation; the component itself is plain data.

/// Component describing an entity's animated scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleComponent {
    /// Animation speed in scale units per second, always positive
    pub scale_rate: f32,

    /// Scale the entity's node is animating toward
    pub target_scale: f32,
}

impl ScaleComponent {
    /// Key under which the scale animation runs on the node; restarting the
    /// animation replaces whatever runs under this key.
    pub const ANIMATION_KEY: &'static str = "scale";

    /// Default animation speed in scale units per second
    pub const DEFAULT_RATE: f32 = 3.0;

    /// Create a scale component with the given animation rate
    pub fn new(scale_rate: f32) -> Self {
        Self {
            scale_rate: scale_rate.max(f32::EPSILON),
            target_scale: 1.0,
        }
    }
}

impl Default for ScaleComponent {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATE)
    }
}
