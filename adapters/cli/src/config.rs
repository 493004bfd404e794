use std::{fs, path::Path};

use anyhow::{Context, Result};
use sky_battle_core::{Probability, Tuning};

/// Command-line overrides applied on top of the tuning file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TuningOverrides {
    pub(crate) shield_probability: Option<f64>,
    pub(crate) shield_duration: Option<u32>,
}

/// Loads the tuning from an optional TOML file, applies overrides and validates the result.
pub(crate) fn load_tuning(path: Option<&Path>, overrides: TuningOverrides) -> Result<Tuning> {
    let tuning = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning file {}", path.display()))?;
            parse_tuning(&contents)
                .with_context(|| format!("failed to parse tuning file {}", path.display()))?
        }
        None => Tuning::default(),
    };

    let tuning = apply_overrides(tuning, overrides)?;
    tuning.validate().context("invalid tuning")?;
    Ok(tuning)
}

fn parse_tuning(contents: &str) -> Result<Tuning> {
    toml::from_str(contents).context("failed to parse tuning toml contents")
}

fn apply_overrides(mut tuning: Tuning, overrides: TuningOverrides) -> Result<Tuning> {
    if let Some(value) = overrides.shield_probability {
        tuning.boss.shield_probability =
            Probability::new(value).context("invalid --shield-probability")?;
    }
    if let Some(frames) = overrides.shield_duration {
        tuning.boss.shield_duration = frames;
    }
    Ok(tuning)
}
