//! Shipped transformer implementations

pub mod exposure;
pub mod overrides;
pub mod target;

pub use exposure::{ExposureTransformer, ExposureTransformerGenerator};
pub use overrides::{OverridesTransformer, OverridesTransformerGenerator};
pub use target::{TargetTransformer, TargetTransformerGenerator};

use crate::transformer::TransformerGenerator;
use std::sync::Arc;

/// The shipped transformer generators, in registration order
///
/// Registration order is the forward order; the manifest pass runs its exact
/// reverse. Appending here changes both passes at once.
pub fn standard_generators() -> Vec<Arc<dyn TransformerGenerator>> {
    vec![
        Arc::new(TargetTransformerGenerator),
        Arc::new(ExposureTransformerGenerator),
        Arc::new(OverridesTransformerGenerator),
    ]
}
