//! Backbone selection by depth

use super::{BackboneConfig, MultiExitModel, MultiExitResNet};
use std::fmt;

/// Supported backbone depths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Nine,
    Eighteen,
    ThirtyFour,
}

impl Depth {
    /// Map a layer count to a supported depth
    pub fn from_layers(layers: usize) -> Option<Self> {
        match layers {
            9 => Some(Self::Nine),
            18 => Some(Self::Eighteen),
            34 => Some(Self::ThirtyFour),
            _ => None,
        }
    }

    pub fn layers(self) -> usize {
        match self {
            Self::Nine => 9,
            Self::Eighteen => 18,
            Self::ThirtyFour => 34,
        }
    }

    /// Residual blocks in each of the four stages
    pub fn blocks_per_stage(self) -> [usize; 4] {
        match self {
            Self::Nine => [1, 1, 1, 1],
            Self::Eighteen => [2, 2, 2, 2],
            Self::ThirtyFour => [3, 4, 6, 3],
        }
    }

    /// CIFAR backbone of this depth
    pub fn build(self, num_classes: usize, seed: u64) -> MultiExitResNet {
        let config = BackboneConfig::cifar(self.to_string(), self.blocks_per_stage(), num_classes);
        MultiExitResNet::new(config, seed)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resnet{}", self.layers())
    }
}

/// Build the backbone for `depth`, or `None` when the depth is unsupported
pub fn build_model(depth: usize, num_classes: usize, seed: u64) -> Option<Box<dyn MultiExitModel>> {
    Depth::from_layers(depth).map(|d| Box::new(d.build(num_classes, seed)) as Box<dyn MultiExitModel>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_depths() {
        for layers in [9, 18, 34] {
            let depth = Depth::from_layers(layers).unwrap();
            assert_eq!(depth.layers(), layers);
        }
    }

    #[test]
    fn test_unsupported_depth_builds_nothing() {
        assert!(Depth::from_layers(50).is_none());
        assert!(build_model(50, 10, 0).is_none());
    }

    #[test]
    fn test_every_backbone_has_four_exits() {
        let model = build_model(9, 10, 0).unwrap();
        assert_eq!(model.num_exits(), 4);
        assert_eq!(model.num_classes(), 10);
        assert_eq!(model.architecture(), "resnet9");
    }

    #[test]
    fn test_block_layout() {
        assert_eq!(Depth::ThirtyFour.blocks_per_stage(), [3, 4, 6, 3]);
        assert_eq!(Depth::Eighteen.blocks_per_stage().iter().sum::<usize>(), 8);
    }
}
