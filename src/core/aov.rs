// Copyright @yucwang 2026

use crate::core::aov_accumulator::AOVAccumulator;
use crate::core::shading::MAX_AOV_COUNT;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_AOV_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique default ID for an AOV descriptor.
pub fn generate_aov_id(type_name: &str) -> String {
    let seq = NEXT_AOV_ID.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", type_name, seq)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AOVError {
    CapacityExceeded { capacity: usize },
    DuplicateName(String),
    InvalidChannelIndex(usize),
}

impl fmt::Display for AOVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AOVError::CapacityExceeded { capacity } => {
                write!(f, "AOV capacity of {} exhausted", capacity)
            }
            AOVError::DuplicateName(name) => write!(f, "AOV '{}' already registered", name),
            AOVError::InvalidChannelIndex(index) => {
                write!(f, "channel index {} is not an extra AOV slot", index)
            }
        }
    }
}

impl std::error::Error for AOVError {}

/// Describes one extra output channel and knows how to build the
/// accumulator that fills it.
pub trait AOV: Send + Sync {
    /// Unique identifier of this descriptor instance.
    fn id(&self) -> &str;

    /// Model name, also the channel name written to disk.
    fn name(&self) -> &str;

    fn describe(&self) -> String {
        format!("{} [id={}]", self.name(), self.id())
    }

    /// Returns a fresh accumulator targeting channel `index`.
    fn create_accumulator(&self, index: usize) -> Box<dyn AOVAccumulator>;
}

/// Ordered set of AOV descriptors of a frame. The position of a descriptor
/// is the channel index its accumulator writes to.
pub struct AOVContainer {
    aovs: Vec<Box<dyn AOV>>,
}

impl Default for AOVContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl AOVContainer {
    pub fn new() -> Self {
        Self { aovs: Vec::new() }
    }

    pub fn insert(&mut self, aov: Box<dyn AOV>) -> Result<usize, AOVError> {
        if self.aovs.len() == MAX_AOV_COUNT {
            return Err(AOVError::CapacityExceeded { capacity: MAX_AOV_COUNT });
        }
        if self.get_by_name(aov.name()).is_some() {
            return Err(AOVError::DuplicateName(aov.name().to_string()));
        }

        self.aovs.push(aov);
        Ok(self.aovs.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.aovs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aovs.is_empty()
    }

    pub fn get_by_index(&self, index: usize) -> Option<&dyn AOV> {
        self.aovs.get(index).map(|aov| aov.as_ref())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&dyn AOV> {
        self.aovs.iter().find(|aov| aov.name() == name).map(|aov| aov.as_ref())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.aovs.iter().position(|aov| aov.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AOV> {
        self.aovs.iter().map(|aov| aov.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aovs::create_aov;
    use crate::aovs::tests::NamedColorAOV;

    #[test]
    fn test_insert_assigns_positions() {
        let mut aovs = AOVContainer::new();
        assert!(aovs.is_empty());
        assert_eq!(aovs.insert(create_aov("depth").unwrap()), Ok(0));
        assert_eq!(aovs.insert(create_aov("normal").unwrap()), Ok(1));
        assert_eq!(aovs.len(), 2);
        assert_eq!(aovs.get_by_index(1).map(|a| a.name()), Some("normal"));
        assert_eq!(aovs.index_of("depth"), Some(0));
        assert!(aovs.get_by_name("uv").is_none());
        assert!(aovs.get_by_index(2).is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut aovs = AOVContainer::new();
        aovs.insert(create_aov("diffuse").unwrap()).unwrap();
        let err = aovs.insert(create_aov("diffuse").unwrap()).unwrap_err();
        assert_eq!(err, AOVError::DuplicateName(String::from("diffuse")));
        assert_eq!(aovs.len(), 1);
    }

    #[test]
    fn test_capacity_bounded() {
        let mut aovs = AOVContainer::new();
        let names = ["diffuse", "glossy", "volume", "emission", "normal", "uv", "depth"];
        for i in 0..MAX_AOV_COUNT {
            let aov: Box<dyn AOV> = match names.get(i) {
                Some(name) => create_aov(name).unwrap(),
                None => Box::new(NamedColorAOV::new(&format!("custom{}", i))),
            };
            aovs.insert(aov).unwrap();
        }
        let err = aovs.insert(create_aov("depth").unwrap()).unwrap_err();
        assert_eq!(err, AOVError::CapacityExceeded { capacity: MAX_AOV_COUNT });
        assert_eq!(aovs.len(), MAX_AOV_COUNT);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_aov_id("DepthAOV");
        let b = generate_aov_id("DepthAOV");
        assert!(a.starts_with("DepthAOV_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_describe() {
        let aov = NamedColorAOV::new("custom");
        assert_eq!(aov.describe(), "custom [id=custom]");
    }

    #[test]
    fn test_error_display() {
        let err = AOVError::CapacityExceeded { capacity: 4 };
        assert_eq!(format!("{}", err), "AOV capacity of 4 exhausted");
        let err = AOVError::InvalidChannelIndex(40);
        assert_eq!(format!("{}", err), "channel index 40 is not an extra AOV slot");
    }
}
