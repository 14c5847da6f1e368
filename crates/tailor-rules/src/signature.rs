//! Signatures
//!
//! A signature is the canonical CSS text a utility or variant compiles to.
//! Two class strings with equal signatures are interchangeable. Signatures
//! are memoized per option set, and the reverse indexes (signature to
//! utilities, signature to variants, declaration to utilities) are built
//! once, in parallel, the first time they are needed.

use crate::canonical::canonicalize;
use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};
use rayon::prelude::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tailor_core::css::{CssNode, to_css};
use tailor_core::{Candidate, CanonicalizeOptions, CompileOptions, DesignSystem};
use tracing::debug;

/// Canonical CSS of a class string
///
/// `Invalid` never equals anything, itself included.
#[derive(Debug, Clone)]
pub enum Signature {
    Valid(String),
    Invalid,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Signature::Valid(a), Signature::Valid(b)) => a == b,
            _ => false,
        }
    }
}

impl Signature {
    pub fn is_valid(&self) -> bool {
        matches!(self, Signature::Valid(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Signature::Valid(text) => Some(text),
            Signature::Invalid => None,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Valid(text) => f.write_str(text),
            Signature::Invalid => f.write_str("<invalid>"),
        }
    }
}

/// Extra normalizations applied before comparing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureFeatures {
    /// Expand `margin`, `padding`, `inset` and `gap` shorthands into longhands
    pub expand_properties: bool,
    /// Map logical longhands onto physical ones
    pub logical_to_physical: bool,
}

/// Options a signature depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignatureOptions {
    /// Root font size: `rem` values are compared in `px` when set
    pub rem_px: Option<f64>,
    pub features: SignatureFeatures,
}

impl SignatureOptions {
    /// The same options with shorthand expansion turned on
    pub fn expanded(self) -> Self {
        Self {
            features: SignatureFeatures {
                expand_properties: true,
                ..self.features
            },
            ..self
        }
    }

    fn key(&self) -> TableKey {
        TableKey {
            rem_px: self.rem_px.map(f64::to_bits),
            expand_properties: self.features.expand_properties,
            logical_to_physical: self.features.logical_to_physical,
        }
    }
}

impl From<&CanonicalizeOptions> for SignatureOptions {
    fn from(options: &CanonicalizeOptions) -> Self {
        Self {
            rem_px: options.rem_px,
            features: SignatureFeatures {
                expand_properties: false,
                logical_to_physical: options.logical_to_physical,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TableKey {
    rem_px: Option<u64>,
    expand_properties: bool,
    logical_to_physical: bool,
}

type Index<K> = HashMap<K, Vec<String>>;

/// Memo tables for one option set
#[derive(Default)]
struct SignatureTables {
    nodes: DashMap<String, Option<Arc<Vec<CssNode>>>>,
    utilities: DashMap<String, Signature>,
    variants: DashMap<String, Signature>,
    utility_index: OnceCell<Index<String>>,
    variant_index: OnceCell<Index<String>>,
    declaration_index: OnceCell<Index<(String, String)>>,
}

static VAR_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"var\(\s*(--[A-Za-z0-9_-]+)")
        .unwrap_or_else(|err| panic!("invalid var() pattern: {err}"))
});

/// Computes and caches signatures against one design system
pub struct SignatureEngine {
    design_system: Arc<dyn DesignSystem>,
    tables: DashMap<TableKey, Arc<SignatureTables>>,
}

impl SignatureEngine {
    pub fn new(design_system: Arc<dyn DesignSystem>) -> Self {
        Self {
            design_system,
            tables: DashMap::new(),
        }
    }

    pub fn design_system(&self) -> &dyn DesignSystem {
        self.design_system.as_ref()
    }

    fn tables(&self, options: &SignatureOptions) -> Arc<SignatureTables> {
        self.tables.entry(options.key()).or_default().clone()
    }

    /// Canonical nodes of a whitespace-separated class string
    ///
    /// `None` when any token fails to compile.
    pub fn canonical_nodes(&self, text: &str, options: &SignatureOptions) -> Option<Arc<Vec<CssNode>>> {
        let tables = self.tables(options);
        if let Some(cached) = tables.nodes.get(text) {
            return cached.clone();
        }
        let computed = self.compute_nodes(text, options).map(Arc::new);
        tables.nodes.insert(text.to_string(), computed.clone());
        computed
    }

    fn compute_nodes(&self, text: &str, options: &SignatureOptions) -> Option<Vec<CssNode>> {
        let design_system = self.design_system();
        let compile = CompileOptions {
            suppress_inline: true,
        };

        let mut declarations = Vec::new();
        for token in text.split_whitespace() {
            let compiled = design_system
                .parse_candidate(token)
                .iter()
                .find_map(|candidate| design_system.compile_ast_nodes(candidate, compile))?;
            declarations.extend(compiled);
        }
        if declarations.is_empty() {
            return None;
        }

        let nodes = canonicalize(&[CssNode::rule(".x", declarations)], design_system, options);
        (!nodes.is_empty()).then_some(nodes)
    }

    /// Signature of a whitespace-separated class string
    pub fn utility_signature(&self, text: &str, options: &SignatureOptions) -> Signature {
        let tables = self.tables(options);
        if let Some(cached) = tables.utilities.get(text) {
            return cached.clone();
        }
        let signature = match self.canonical_nodes(text, options) {
            Some(nodes) => Signature::Valid(to_css(&nodes)),
            None => Signature::Invalid,
        };
        tables.utilities.insert(text.to_string(), signature.clone());
        signature
    }

    pub fn candidate_signature(&self, candidate: &Candidate, options: &SignatureOptions) -> Signature {
        self.utility_signature(&self.design_system.print_candidate(candidate), options)
    }

    /// Signature of a single variant
    ///
    /// The variant is applied to a fixed `color: red` declaration so that
    /// only the wrapping it produces is compared.
    pub fn variant_signature(&self, text: &str, options: &SignatureOptions) -> Signature {
        let tables = self.tables(options);
        if let Some(cached) = tables.variants.get(text) {
            return cached.clone();
        }
        let signature = self
            .compute_variant(text, options)
            .map_or(Signature::Invalid, Signature::Valid);
        tables.variants.insert(text.to_string(), signature.clone());
        signature
    }

    fn compute_variant(&self, text: &str, options: &SignatureOptions) -> Option<String> {
        let design_system = self.design_system();
        let variant = design_system.parse_variant(text)?;
        let applied = design_system.apply_variant(
            &variant,
            vec![CssNode::decl("color", "red")],
            CompileOptions {
                suppress_inline: true,
            },
        )?;
        let nodes = canonicalize(&[CssNode::rule(".x", applied)], design_system, options);
        (!nodes.is_empty()).then(|| to_css(&nodes))
    }

    /// Enumerable utilities sharing `signature`, in class-list order
    pub fn utilities_with_signature(&self, signature: &Signature, options: &SignatureOptions) -> Vec<String> {
        let Some(text) = signature.as_str() else {
            return Vec::new();
        };
        let tables = self.tables(options);
        let index = self.utility_index(&tables, options);
        index.get(text).cloned().unwrap_or_default()
    }

    /// Enumerable variants sharing `signature`, in variant-list order
    pub fn variants_with_signature(&self, signature: &Signature, options: &SignatureOptions) -> Vec<String> {
        let Some(text) = signature.as_str() else {
            return Vec::new();
        };
        let tables = self.tables(options);
        let index = self.variant_index(&tables, options);
        index.get(text).cloned().unwrap_or_default()
    }

    /// Enumerable utilities declaring `property: value`
    pub fn utilities_setting(&self, property: &str, value: &str, options: &SignatureOptions) -> Vec<String> {
        let tables = self.tables(options);
        let index = self.declaration_index(&tables, options);
        index
            .get(&(property.to_string(), value.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Canonical `(property, value)` pairs of a class string
    pub fn declarations(&self, text: &str, options: &SignatureOptions) -> Option<Vec<(String, String)>> {
        let nodes = self.canonical_nodes(text, options)?;
        let mut pairs = Vec::new();
        collect_declarations(&nodes, &mut pairs);
        Some(pairs)
    }

    /// Build every index for `options`
    ///
    /// Index construction runs on the rayon pool, so call this before
    /// fanning candidates out to it.
    pub fn warm(&self, options: &SignatureOptions) {
        let tables = self.tables(options);
        self.utility_index(&tables, options);
        self.variant_index(&tables, options);
        self.declaration_index(&tables, options);
    }

    fn enumerable_utilities(&self) -> Vec<String> {
        let prefixed = |name: String| match self.design_system.prefix() {
            Some(prefix) => format!("{prefix}:{name}"),
            None => name,
        };
        let mut names = Vec::new();
        for entry in self.design_system.class_list() {
            for modifier in &entry.modifiers {
                if modifier.parse::<f64>().is_err() {
                    names.push(prefixed(format!("{}/{}", entry.name, modifier)));
                }
            }
            names.push(prefixed(entry.name));
        }
        names
    }

    fn utility_index<'a>(&self, tables: &'a SignatureTables, options: &SignatureOptions) -> &'a Index<String> {
        tables.utility_index.get_or_init(|| {
            let names = self.enumerable_utilities();
            let signatures: Vec<(String, Signature)> = names
                .into_par_iter()
                .map(|name| {
                    let signature = self.utility_signature(&name, options);
                    (name, signature)
                })
                .collect();

            let mut index: Index<String> = HashMap::new();
            for (name, signature) in signatures {
                if let Signature::Valid(text) = signature {
                    index.entry(text).or_default().push(name);
                }
            }
            debug!("Indexed {} utility signatures", index.len());
            index
        })
    }

    fn variant_index<'a>(&self, tables: &'a SignatureTables, options: &SignatureOptions) -> &'a Index<String> {
        tables.variant_index.get_or_init(|| {
            let signatures: Vec<(String, Signature)> = self
                .design_system
                .variant_list()
                .into_par_iter()
                .map(|name| {
                    let signature = self.variant_signature(&name, options);
                    (name, signature)
                })
                .collect();

            let mut index: Index<String> = HashMap::new();
            for (name, signature) in signatures {
                if let Signature::Valid(text) = signature {
                    index.entry(text).or_default().push(name);
                }
            }
            debug!("Indexed {} variant signatures", index.len());
            index
        })
    }

    fn declaration_index<'a>(
        &self,
        tables: &'a SignatureTables,
        options: &SignatureOptions,
    ) -> &'a Index<(String, String)> {
        tables.declaration_index.get_or_init(|| {
            let declarations: Vec<(String, Vec<(String, String)>)> = self
                .enumerable_utilities()
                .into_par_iter()
                .filter_map(|name| {
                    let pairs = self.declarations(&name, options)?;
                    Some((name, pairs))
                })
                .collect();

            let mut index: Index<(String, String)> = HashMap::new();
            for (name, pairs) in declarations {
                for pair in pairs {
                    let utilities = index.entry(pair).or_default();
                    if !utilities.contains(&name) {
                        utilities.push(name.clone());
                    }
                }
            }
            debug!("Indexed {} declarations", index.len());
            index
        })
    }

    /// Whether swapping `original` for `replacement` keeps every variable
    /// the original reads
    ///
    /// A replacement that declares one of those variables itself does not
    /// preserve it.
    pub fn preserves_variables(&self, original: &Candidate, replacement: &Candidate) -> bool {
        let compile = CompileOptions {
            suppress_inline: true,
        };
        let Some(original_nodes) = self.design_system.compile_ast_nodes(original, compile) else {
            return false;
        };
        let Some(replacement_nodes) = self.design_system.compile_ast_nodes(replacement, compile) else {
            return false;
        };

        let mut read = HashSet::new();
        let mut declared = HashSet::new();
        collect_variables(&original_nodes, &mut read, &mut HashSet::new());
        let mut replacement_read = HashSet::new();
        collect_variables(&replacement_nodes, &mut replacement_read, &mut declared);

        read.iter()
            .all(|variable| replacement_read.contains(variable) && !declared.contains(variable))
    }
}

fn collect_declarations(nodes: &[CssNode], out: &mut Vec<(String, String)>) {
    for node in nodes {
        match node {
            CssNode::Declaration { property, value, .. } => {
                out.push((property.clone(), value.clone()));
            }
            CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => {
                collect_declarations(nodes, out)
            }
            CssNode::Comment(_) => {}
        }
    }
}

fn collect_variables(nodes: &[CssNode], read: &mut HashSet<String>, declared: &mut HashSet<String>) {
    for node in nodes {
        match node {
            CssNode::Declaration { property, value, .. } => {
                if property.starts_with("--") {
                    declared.insert(property.clone());
                }
                for captures in VAR_REFERENCE.captures_iter(value) {
                    read.insert(captures[1].to_string());
                }
            }
            CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => {
                collect_variables(nodes, read, declared)
            }
            CssNode::Comment(_) => {}
        }
    }
}
