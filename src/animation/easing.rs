use serde::{Deserialize, Serialize};

/// Progress shaping curve applied to normalized elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    EaseOut,
    EaseInOut,
    /// Smoothstep
    Smooth,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::Smooth,
    ];

    /// Maps `t` in [0, 1] to eased progress in [0, 1].
    ///
    /// Every curve is monotonic non-decreasing with `apply(0) == 0` and
    /// `apply(1) == 1`. Out-of-range and NaN input is clamped first.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        let eased = match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Smooth => t * t * (3.0 - 2.0 * t),
        };
        eased.clamp(0.0, 1.0)
    }
}
