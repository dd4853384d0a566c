//! Residual multi-exit backbone

use super::{ExitOutputs, Linear, MultiExitModel};
use crate::autograd::{add, mul, relu, sub, sum};
use crate::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Gain of the second projection in each residual block; keeps deep
/// stacks near identity at initialization.
const RESIDUAL_GAIN: f32 = 0.1;

/// Shape of a [`MultiExitResNet`]
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneConfig {
    /// Flattened input size (C * H * W)
    pub input_dim: usize,
    /// Width of each stage; one exit per stage
    pub stage_widths: Vec<usize>,
    /// Residual blocks in each stage
    pub blocks_per_stage: Vec<usize>,
    /// Size of the aligned feature every exit projects to
    pub align_dim: usize,
    pub num_classes: usize,
    /// Tag reported by [`MultiExitModel::architecture`]
    pub name: String,
}

impl BackboneConfig {
    /// CIFAR-sized (3 x 32 x 32) backbone with four stages
    pub fn cifar(name: impl Into<String>, blocks_per_stage: [usize; 4], num_classes: usize) -> Self {
        Self {
            input_dim: 3 * 32 * 32,
            stage_widths: vec![64, 128, 256, 512],
            blocks_per_stage: blocks_per_stage.to_vec(),
            align_dim: 512,
            num_classes,
            name: name.into(),
        }
    }
}

struct ResidualBlock {
    fc1: Linear,
    fc2: Linear,
}

impl ResidualBlock {
    fn forward(&self, h: &Tensor, rows: usize) -> Tensor {
        let inner = relu(&self.fc1.forward(h, rows));
        relu(&add(h, &self.fc2.forward(&inner, rows)))
    }
}

struct Stage {
    entry: Linear,
    blocks: Vec<ResidualBlock>,
}

struct ExitHead {
    align: Linear,
    classifier: Linear,
}

/// Residual MLP with one exit per stage.
///
/// Each stage projects to its width, runs its residual blocks, and feeds an
/// exit head (alignment projection + classifier). Outputs are ordered
/// deepest first, so exit 0 is the full network.
pub struct MultiExitResNet {
    config: BackboneConfig,
    stages: Vec<Stage>,
    exits: Vec<ExitHead>,
}

impl MultiExitResNet {
    /// Build with weights drawn from `seed`
    ///
    /// # Panics
    ///
    /// Panics if `stage_widths` and `blocks_per_stage` differ in length or
    /// are empty.
    pub fn new(config: BackboneConfig, seed: u64) -> Self {
        assert!(!config.stage_widths.is_empty(), "Backbone needs at least one stage");
        assert_eq!(
            config.stage_widths.len(),
            config.blocks_per_stage.len(),
            "One block count per stage"
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let mut stages = Vec::with_capacity(config.stage_widths.len());
        let mut exits = Vec::with_capacity(config.stage_widths.len());
        let mut prev = config.input_dim;

        for (s, (&width, &blocks)) in
            config.stage_widths.iter().zip(&config.blocks_per_stage).enumerate()
        {
            let entry = Linear::new(format!("stage{s}.entry"), prev, width, 1.0, &mut rng);
            let blocks = (0..blocks)
                .map(|b| ResidualBlock {
                    fc1: Linear::new(format!("stage{s}.block{b}.fc1"), width, width, 1.0, &mut rng),
                    fc2: Linear::new(
                        format!("stage{s}.block{b}.fc2"),
                        width,
                        width,
                        RESIDUAL_GAIN,
                        &mut rng,
                    ),
                })
                .collect();
            stages.push(Stage { entry, blocks });

            exits.push(ExitHead {
                align: Linear::new(format!("exit{s}.align"), width, config.align_dim, 1.0, &mut rng),
                classifier: Linear::new(
                    format!("exit{s}.classifier"),
                    config.align_dim,
                    config.num_classes,
                    1.0,
                    &mut rng,
                ),
            });
            prev = width;
        }

        Self { config, stages, exits }
    }

    pub fn config(&self) -> &BackboneConfig {
        &self.config
    }
}

impl MultiExitModel for MultiExitResNet {
    fn forward(&self, inputs: &Tensor, batch_size: usize) -> ExitOutputs {
        assert_eq!(
            inputs.len(),
            batch_size * self.config.input_dim,
            "Input must be batch x input_dim"
        );

        let mut features = Vec::with_capacity(self.stages.len());
        let mut logits = Vec::with_capacity(self.stages.len());
        let mut h = inputs.clone();

        for (stage, exit) in self.stages.iter().zip(&self.exits) {
            h = relu(&stage.entry.forward(&h, batch_size));
            for block in &stage.blocks {
                h = block.forward(&h, batch_size);
            }
            let feature = relu(&exit.align.forward(&h, batch_size));
            logits.push(exit.classifier.forward(&feature, batch_size));
            features.push(feature);
        }

        // Deepest first
        logits.reverse();
        features.reverse();

        // Σ_i ‖f_i − stopgrad(f_0)‖²
        let target = features[0].detach();
        let mut penalty = Tensor::zeros(1, false);
        for feature in &features[1..] {
            let diff = sub(feature, &target);
            penalty = add(&penalty, &sum(&mul(&diff, &diff)));
        }

        ExitOutputs::new(logits, penalty, batch_size, self.config.num_classes)
    }

    fn num_exits(&self) -> usize {
        self.exits.len()
    }

    fn num_classes(&self) -> usize {
        self.config.num_classes
    }

    fn input_dim(&self) -> usize {
        self.config.input_dim
    }

    fn architecture(&self) -> String {
        self.config.name.clone()
    }

    fn named_parameters(&self) -> Vec<(String, &Tensor, Vec<usize>)> {
        let mut params = Vec::new();
        for (stage, exit) in self.stages.iter().zip(&self.exits) {
            params.extend(stage.entry.named_parameters());
            for block in &stage.blocks {
                params.extend(block.fc1.named_parameters());
                params.extend(block.fc2.named_parameters());
            }
            params.extend(exit.align.named_parameters());
            params.extend(exit.classifier.named_parameters());
        }
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = Vec::new();
        for (stage, exit) in self.stages.iter_mut().zip(self.exits.iter_mut()) {
            params.extend(stage.entry.parameters_mut());
            for block in &mut stage.blocks {
                params.extend(block.fc1.parameters_mut());
                params.extend(block.fc2.parameters_mut());
            }
            params.extend(exit.align.parameters_mut());
            params.extend(exit.classifier.parameters_mut());
        }
        params
    }
}
