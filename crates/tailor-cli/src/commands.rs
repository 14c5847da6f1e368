//! Command implementations

use anyhow::{Context, bail};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tailor_core::{CanonicalizeOptions, ConfigLoader, TailorConfig};
use tailor_rules::{CanonicalizationEngine, PASSES, SignatureOptions};
use tracing::debug;

use crate::OutputFormat;
use crate::output::{CanonicalizeReport, OutputFormatter, Rewrite};

/// Flags of the `canonicalize` command
pub struct CanonicalizeArgs {
    pub candidates: Vec<String>,
    pub stdin: bool,
    pub rem_px: Option<f64>,
    pub collapse: bool,
    pub logical_to_physical: bool,
}

fn load_config(config_path: Option<PathBuf>) -> anyhow::Result<TailorConfig> {
    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    debug!(
        "Loaded config with {} theme tokens and {} custom utilities",
        config.theme.len(),
        config.utilities.len()
    );
    Ok(config)
}

fn build_engine(config: &TailorConfig) -> anyhow::Result<CanonicalizationEngine> {
    let design_system = config
        .design_system()
        .context("Failed to build the design system from config")?;
    Ok(CanonicalizationEngine::new(Arc::new(design_system)))
}

fn read_candidates(args: &CanonicalizeArgs) -> anyhow::Result<Vec<String>> {
    let mut candidates: Vec<String> = args
        .candidates
        .iter()
        .flat_map(|arg| arg.split_whitespace())
        .map(str::to_string)
        .collect();

    if args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read candidates from stdin")?;
        candidates.extend(input.split_whitespace().map(str::to_string));
    }

    if candidates.is_empty() {
        bail!("No candidates given (pass them as arguments or use --stdin)");
    }
    Ok(candidates)
}

/// Flags override the config file; boolean flags can only turn features on
fn resolve_options(config: &TailorConfig, args: &CanonicalizeArgs) -> CanonicalizeOptions {
    let defaults = config.canonicalize_options();
    CanonicalizeOptions {
        rem_px: args.rem_px.or(defaults.rem_px),
        collapse: args.collapse || defaults.collapse,
        logical_to_physical: args.logical_to_physical || defaults.logical_to_physical,
    }
}

pub fn canonicalize_command(
    args: CanonicalizeArgs,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let candidates = read_candidates(&args)?;
    let options = resolve_options(&config, &args);
    let engine = build_engine(&config)?;

    debug!("Canonicalizing {} candidates", candidates.len());
    let result = engine.canonicalize_candidates(&candidates, &options);

    let rewrites = candidates
        .iter()
        .filter_map(|candidate| {
            let canonical = engine.canonicalize_candidate(candidate, &options);
            (canonical != *candidate).then(|| Rewrite {
                from: candidate.clone(),
                to: canonical,
            })
        })
        .collect();

    let report = CanonicalizeReport {
        input: candidates,
        output: result,
        rewrites,
    };
    OutputFormatter::new(format).print_canonicalized(&report)
}

pub fn signature_command(
    candidate: &str,
    variant: bool,
    rem_px: Option<f64>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = build_engine(&config)?;
    let options = SignatureOptions {
        rem_px: rem_px.or(config.canonicalize.rem_px),
        ..Default::default()
    };

    let signatures = engine.signatures();
    let signature = if variant {
        signatures.variant_signature(candidate, &options)
    } else {
        signatures.utility_signature(candidate, &options)
    };
    match signature.as_str() {
        Some(css) => {
            print!("{css}");
            Ok(())
        }
        None => bail!("'{candidate}' does not compile to CSS"),
    }
}

pub fn passes_command(format: OutputFormat) -> anyhow::Result<()> {
    OutputFormatter::new(format).print_passes(PASSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(candidates: &[&str]) -> CanonicalizeArgs {
        CanonicalizeArgs {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            stdin: false,
            rem_px: None,
            collapse: false,
            logical_to_physical: false,
        }
    }

    #[test]
    fn test_arguments_are_split_on_whitespace() {
        let candidates = read_candidates(&args(&["flex  mt-1", "italic"])).unwrap();
        assert_eq!(candidates, vec!["flex", "mt-1", "italic"]);
    }

    #[test]
    fn test_no_candidates_is_an_error() {
        assert!(read_candidates(&args(&["   "])).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = TailorConfig::default();
        config.canonicalize.rem_px = Some(10.0);
        config.canonicalize.collapse = true;

        let mut flags = args(&["flex"]);
        let options = resolve_options(&config, &flags);
        assert_eq!(options.rem_px, Some(10.0));
        assert!(options.collapse);
        assert!(!options.logical_to_physical);

        flags.rem_px = Some(16.0);
        flags.logical_to_physical = true;
        let options = resolve_options(&config, &flags);
        assert_eq!(options.rem_px, Some(16.0));
        assert!(options.logical_to_physical);
    }
}
