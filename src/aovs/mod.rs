// Copyright @yucwang 2026

pub mod component;
pub mod depth;
pub mod normal;
pub mod uv;

use crate::core::aov::AOV;
use component::{ComponentAOV, ShadingComponent};
use depth::DepthAOV;
use normal::NormalAOV;
use uv::UVAOV;

/// Names accepted by `create_aov`.
pub const AOV_MODELS: [&str; 7] = ["diffuse", "glossy", "volume", "emission", "normal", "uv", "depth"];

/// Builds a built-in AOV descriptor from its model name.
pub fn create_aov(name: &str) -> Option<Box<dyn AOV>> {
    if let Some(component) = ShadingComponent::from_name(name) {
        return Some(Box::new(ComponentAOV::new(component, None)));
    }

    match name {
        "normal" => Some(Box::new(NormalAOV::new(None))),
        "uv" => Some(Box::new(UVAOV::new(None))),
        "depth" => Some(Box::new(DepthAOV::new(None))),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::aov_accumulator::{AOVAccumulator, ColorAOVAccumulator};

    /// Descriptor with a caller-chosen name backed by a plain color channel.
    pub(crate) struct NamedColorAOV {
        name: String,
    }

    impl NamedColorAOV {
        pub(crate) fn new(name: &str) -> Self {
            Self { name: name.to_string() }
        }
    }

    impl AOV for NamedColorAOV {
        fn id(&self) -> &str {
            &self.name
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn create_accumulator(&self, index: usize) -> Box<dyn AOVAccumulator> {
            Box::new(ColorAOVAccumulator::new(index))
        }
    }

    #[test]
    fn test_create_every_model() {
        for model in AOV_MODELS.iter() {
            let aov = create_aov(model).unwrap();
            assert_eq!(aov.name(), *model);
            assert_eq!(aov.create_accumulator(7).index(), 7);
        }
        assert!(create_aov("specular").is_none());
    }
}
