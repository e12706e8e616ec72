use tracing::warn;

use crate::geometry::{DEFAULT_POSE_EPSILON, PoseCalculator};

use super::env::parse_finite_f64;

pub const ENV_POINTER_EPSILON: &str = "WAYMARK_POINTER_EPSILON";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerConfig {
    pub epsilon: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_POSE_EPSILON,
        }
    }
}

impl PointerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_raw(std::env::var(ENV_POINTER_EPSILON).ok().as_deref())
    }

    /// Invalid or out-of-range values fall back to the default tolerance.
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let parsed = parse_finite_f64(raw);
        match parsed {
            Some(epsilon) if epsilon > 0.0 && epsilon < 0.5 => Self { epsilon },
            Some(epsilon) => {
                warn!(epsilon, "{ENV_POINTER_EPSILON} out of (0, 0.5), using default");
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[must_use]
    pub fn calculator(&self) -> PoseCalculator {
        PoseCalculator::new(self.epsilon).unwrap_or_default()
    }
}
