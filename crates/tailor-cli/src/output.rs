//! Output formatting
//!
//! Human output keeps stdout pipeable: the canonical classes go to stdout,
//! the per-candidate rewrites to stderr.

use colored::*;
use serde::Serialize;
use tailor_rules::CanonicalizationPass;

use crate::OutputFormat;

/// One candidate that changed spelling
#[derive(Debug, Clone, Serialize)]
pub struct Rewrite {
    pub from: String,
    pub to: String,
}

/// Result of a `canonicalize` run
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalizeReport {
    pub input: Vec<String>,
    pub output: Vec<String>,
    pub rewrites: Vec<Rewrite>,
}

#[derive(Serialize)]
struct PassEntry<'a> {
    id: &'a str,
    description: &'a str,
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn print_canonicalized(&self, report: &CanonicalizeReport) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                for rewrite in &report.rewrites {
                    eprintln!("{} {} {}", rewrite.from.dimmed(), "→".cyan(), rewrite.to.green());
                }
                println!("{}", report.output.join(" "));
                Ok(())
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
                Ok(())
            }
        }
    }

    pub fn print_passes(&self, passes: &[CanonicalizationPass]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", "Canonicalization passes:".bold());
                for (position, pass) in passes.iter().enumerate() {
                    println!("  {}. {} - {}", position + 1, pass.id.cyan(), pass.description);
                }
                Ok(())
            }
            OutputFormat::Json => {
                let entries: Vec<PassEntry> = passes
                    .iter()
                    .map(|pass| PassEntry {
                        id: pass.id,
                        description: pass.description,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                Ok(())
            }
        }
    }
}
