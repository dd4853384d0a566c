//! Training command

use super::{log, Cli, LogLevel};
use crate::config::ExperimentConfig;
use crate::data::{
    load_cifar, test_transforms, train_transforms, CifarVariant, DataLoader, InMemoryDataset,
    LoaderConfig,
};
use crate::distill::SelfDistillationLoss;
use crate::io::ExperimentDir;
use crate::model::build_model;
use crate::optim::{MultiStepLR, SGD};
use crate::train::{TrainResult, Trainer};
use crate::{Error, Result};
use std::sync::Arc;

/// Run the command described by `cli`
pub fn run_command(cli: Cli) -> Result<()> {
    let level = cli.log_level();
    let data_root = cli.experiment.data_root.clone();
    run_experiment(&cli.experiment, level, |variant| load_cifar(&data_root, variant)).map(|_| ())
}

/// Full run: create the experiment directory, resolve dataset and model,
/// then train and evaluate for `config.epoch` epochs.
///
/// `load` supplies the `(train, test)` split for the selected dataset. An
/// unsupported class count, depth, batch size or blur bound fails here,
/// after the directory and config snapshot have been written.
pub fn run_experiment<F>(
    config: &ExperimentConfig,
    level: LogLevel,
    load: F,
) -> Result<(ExperimentDir, TrainResult)>
where
    F: FnOnce(CifarVariant) -> Result<(InMemoryDataset, InMemoryDataset)>,
{
    log(level, LogLevel::Normal, &format!("{config:?}"));

    let dir = ExperimentDir::create(config)?;
    log(level, LogLevel::Verbose, &format!("Experiment directory: {}", dir.path().display()));
    check_loader_options(config)?;

    let variant = CifarVariant::from_classes(config.class_num).ok_or_else(|| {
        Error::config(
            "class_num",
            format!("no dataset with {} classes", config.class_num),
            "use --class-num 10 or --class-num 100",
        )
    })?;
    log(level, LogLevel::Normal, &format!("dataset: {}", variant.name()));
    let (train_set, test_set) = load(variant)?;

    let model = build_model(config.depth, config.class_num, config.seed).ok_or_else(|| {
        Error::config(
            "depth",
            format!("no backbone of depth {}", config.depth),
            "use --depth 9, 18 or 34",
        )
    })?;
    log(level, LogLevel::Normal, &format!("using resnet {}", config.depth));
    log(
        level,
        LogLevel::Verbose,
        &format!("{} parameters", model.num_parameters()),
    );

    let train_config = config.train_config();
    let loader_config = LoaderConfig::new()
        .with_batch_size(train_config.batch_size)
        .with_num_workers(config.num_workers)
        .with_seed(train_config.seed);
    let train_loader = DataLoader::new(
        Arc::new(train_set),
        train_transforms(config.blur_std),
        loader_config.clone(),
    );
    let test_loader = DataLoader::new(
        Arc::new(test_set),
        test_transforms(config.blur_std),
        loader_config.with_shuffle(false),
    );

    let optimizer = SGD::new(train_config.lr, train_config.momentum)
        .with_weight_decay(train_config.weight_decay);
    let scheduler = MultiStepLR::new(
        train_config.lr,
        train_config.milestones.clone(),
        train_config.lr_decay,
    );
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "lr {} divided by {} at epochs {:?}",
            train_config.lr,
            train_config.lr_decay,
            scheduler.milestones()
        ),
    );
    let loss_fn = SelfDistillationLoss::new(train_config.lambda_kd)
        .with_temperature(train_config.temperature)
        .with_distill_scale(train_config.distill_scale)
        .with_feature_coeff(train_config.feature_coeff);

    let mut trainer = Trainer::new(model, Box::new(optimizer), Box::new(scheduler), loss_fn)
        .with_log_level(level);

    log(level, LogLevel::Normal, "Start Training");
    let result = trainer.fit(train_config.epochs, &train_loader, &test_loader, &dir)?;
    Ok((dir, result))
}

fn check_loader_options(config: &ExperimentConfig) -> Result<()> {
    if config.batch_size == 0 {
        return Err(Error::config(
            "batch_size",
            "batch size must be positive",
            "use --batch-size 128",
        ));
    }
    if config.blur_std.is_nan() || config.blur_std < 0.0 {
        return Err(Error::config(
            "blur_std",
            format!("blur SD must be non-negative, got {}", config.blur_std),
            "use --blur-std 0 to disable blur",
        ));
    }
    Ok(())
}
