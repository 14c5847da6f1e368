//! Design system
//!
//! The [`DesignSystem`] trait is everything the canonicalization engine needs
//! from the compiler: candidate parsing and printing, theme lookups,
//! compiling a candidate to CSS nodes and enumerating known utilities and
//! variants. [`DefaultDesignSystem`] is the built-in implementation.

mod functions;
mod utilities;
mod variants;

pub use functions::with_alpha;
pub use utilities::ClassEntry;
pub use variants::VariantShape;

use crate::candidate::{
    Candidate, CandidateGrammar, CandidateKind, Variant, parse_candidate, parse_variant,
    print_candidate, print_variant, segment,
};
use crate::css::{CssNode, escape_class_name, flatten, to_css};
use crate::error::TailorError;
use crate::result::Result;
use crate::theme::{ResolveOptions, Theme};
use functions::{FunctionContext, substitute_functions};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};
use utilities::{UtilityRegistry, alpha_from_modifier};
use variants::{COMPOUND_VARIANTS, FUNCTIONAL_VARIANTS, VariantRegistry};

pub use utilities::is_spacing_multiplier;

/// Options for compiling a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit `var()` references even for inline theme entries
    pub suppress_inline: bool,
}

impl CompileOptions {
    fn context(self) -> FunctionContext {
        FunctionContext {
            resolve: ResolveOptions {
                suppress_inline: self.suppress_inline,
            },
            in_at_rule: false,
        }
    }
}

/// The compiler surface the canonicalization engine works against
pub trait DesignSystem: Send + Sync {
    /// Class prefix (`tw` in `tw:flex`)
    fn prefix(&self) -> Option<&str>;

    /// Every candidate `input` could denote, empty when unparseable
    fn parse_candidate(&self, input: &str) -> Vec<Candidate>;

    fn print_candidate(&self, candidate: &Candidate) -> String;

    fn parse_variant(&self, input: &str) -> Option<Variant>;

    fn print_variant(&self, variant: &Variant) -> String;

    /// Raw value of a token or `theme()` key path
    fn resolve_theme_value(&self, path: &str) -> Option<String>;

    /// How a token is referenced from compiled CSS
    fn theme_reference(&self, name: &str, options: ResolveOptions) -> Option<String>;

    /// Compile a candidate, `None` when it is invalid
    fn compile_ast_nodes(&self, candidate: &Candidate, options: CompileOptions) -> Option<Vec<CssNode>>;

    /// Wrap `nodes` in a single variant
    fn apply_variant(
        &self,
        variant: &Variant,
        nodes: Vec<CssNode>,
        options: CompileOptions,
    ) -> Option<Vec<CssNode>>;

    /// Enumerable utilities with their suggested modifiers
    fn class_list(&self) -> Vec<ClassEntry>;

    /// Enumerable variants
    fn variant_list(&self) -> Vec<String>;

    /// Roots of functional utilities (`bg`, `-m`, ...)
    fn functional_roots(&self) -> Vec<String>;

    /// Compile class names to a stylesheet
    fn candidates_to_css(&self, candidates: &[&str]) -> String;
}

/// Built-in design system over a [`Theme`]
pub struct DefaultDesignSystem {
    theme: Theme,
    prefix: Option<String>,
    grammar: CandidateGrammar,
    utilities: UtilityRegistry,
    variants: VariantRegistry,
    /// Custom utilities and the candidates they `@apply`
    custom: IndexMap<String, Vec<String>>,
}

impl Default for DefaultDesignSystem {
    fn default() -> Self {
        Self::new()
    }
}

static VAR_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"var\((--[A-Za-z0-9_-]+)")
        .unwrap_or_else(|err| panic!("invalid var() pattern: {err}"))
});

impl DefaultDesignSystem {
    /// Design system with the default theme
    pub fn new() -> Self {
        Self::with_theme(Theme::with_defaults())
    }

    pub fn with_theme(theme: Theme) -> Self {
        let utilities = UtilityRegistry::builtin();
        let variants = VariantRegistry::builtin(&theme);
        let mut design_system = Self {
            theme,
            prefix: None,
            grammar: CandidateGrammar::default(),
            utilities,
            variants,
            custom: IndexMap::new(),
        };
        design_system.rebuild_grammar();
        design_system
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self.rebuild_grammar();
        self
    }

    /// Register custom utilities
    ///
    /// Values are `@apply` lists (`"@apply flex p-4"`; the `@apply` keyword is
    /// optional). Circular applies and candidates that do not compile are
    /// rejected.
    pub fn with_utilities(mut self, utilities: IndexMap<String, String>) -> Result<Self> {
        for (name, body) in utilities {
            let body = body.trim();
            let body = body.strip_prefix("@apply").unwrap_or(body);
            let tokens: Vec<String> = body
                .trim()
                .trim_end_matches(';')
                .split_whitespace()
                .map(str::to_string)
                .collect();
            self.custom.insert(name, tokens);
        }
        self.rebuild_grammar();
        self.check_apply_cycles()?;

        for (name, tokens) in &self.custom {
            for token in tokens {
                let compiles = self
                    .parse_candidate(token)
                    .iter()
                    .any(|candidate| self.compile_ast_nodes(candidate, CompileOptions::default()).is_some());
                if !compiles {
                    return Err(TailorError::unknown_candidate(name, token));
                }
            }
        }
        debug!("Registered {} custom utilities", self.custom.len());
        Ok(self)
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn grammar(&self) -> &CandidateGrammar {
        &self.grammar
    }

    fn rebuild_grammar(&mut self) {
        let mut static_utilities: HashSet<String> =
            self.utilities.static_names().cloned().collect();
        static_utilities.extend(self.custom.keys().cloned());

        self.grammar = CandidateGrammar {
            prefix: self.prefix.clone(),
            static_utilities,
            functional_utilities: self.utilities.functional_roots().cloned().collect(),
            static_variants: self.variants.static_names().cloned().collect(),
            functional_variants: FUNCTIONAL_VARIANTS.iter().map(|name| name.to_string()).collect(),
            compound_variants: COMPOUND_VARIANTS.iter().map(|name| name.to_string()).collect(),
        };
    }

    /// Custom utility a token applies, ignoring variants and importance
    fn applied_custom<'a>(&self, token: &'a str) -> Option<&'a str> {
        let base = segment(token, ':').last().copied()?;
        let base = base.trim_start_matches('!').trim_end_matches('!');
        self.custom.contains_key(base).then_some(base)
    }

    fn check_apply_cycles(&self) -> Result<()> {
        let mut done: IndexSet<&str> = IndexSet::new();
        for name in self.custom.keys() {
            let mut path = Vec::new();
            self.visit_applies(name, &mut path, &mut done)?;
        }
        Ok(())
    }

    fn visit_applies<'a>(
        &'a self,
        name: &'a str,
        path: &mut Vec<&'a str>,
        done: &mut IndexSet<&'a str>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|seen| *seen == name) {
            let mut chain: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            chain.push(name.to_string());
            return Err(TailorError::circular_apply(&chain));
        }
        path.push(name);
        if let Some(tokens) = self.custom.get(name) {
            for token in tokens {
                if let Some(applied) = self.applied_custom(token) {
                    self.visit_applies(applied, path, done)?;
                }
            }
        }
        path.pop();
        done.insert(name);
        Ok(())
    }

    fn compile_custom(&self, tokens: &[String], options: CompileOptions) -> Option<Vec<CssNode>> {
        let mut nodes = Vec::new();
        for token in tokens {
            let compiled = self
                .parse_candidate(token)
                .iter()
                .find_map(|candidate| self.compile_ast_nodes(candidate, options))?;
            nodes.extend(compiled);
        }
        Some(nodes)
    }

    fn compile_utility(&self, candidate: &Candidate, options: CompileOptions) -> Option<Vec<CssNode>> {
        let ctx = options.context();
        match &candidate.kind {
            CandidateKind::Static { root } => match self.custom.get(root) {
                Some(tokens) => self.compile_custom(tokens, options),
                None => self.utilities.compile_static(root),
            },
            CandidateKind::Functional {
                root,
                value,
                modifier,
            } => self
                .utilities
                .compile_functional(root, value.as_ref(), modifier.as_ref(), &self.theme, ctx),
            CandidateKind::Arbitrary {
                property,
                value,
                modifier,
            } => {
                let mut value = substitute_functions(value, &self.theme, ctx)?;
                if let Some(modifier) = modifier {
                    let alpha = alpha_from_modifier(modifier, &self.theme, ctx)?;
                    value = with_alpha(&value, &alpha);
                }
                Some(vec![CssNode::decl(property.clone(), value)])
            }
        }
    }
}

fn mark_important(nodes: &mut [CssNode]) {
    for node in nodes {
        match node {
            CssNode::Declaration { important, .. } => *important = true,
            CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => mark_important(nodes),
            CssNode::Comment(_) => {}
        }
    }
}

fn collect_variables(nodes: &[CssNode], out: &mut IndexSet<String>) {
    for node in nodes {
        match node {
            CssNode::Declaration { value, .. } => {
                for capture in VAR_REFERENCE.captures_iter(value) {
                    out.insert(capture[1].to_string());
                }
            }
            CssNode::Rule { nodes, .. } | CssNode::AtRule { nodes, .. } => collect_variables(nodes, out),
            CssNode::Comment(_) => {}
        }
    }
}

impl DesignSystem for DefaultDesignSystem {
    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn parse_candidate(&self, input: &str) -> Vec<Candidate> {
        parse_candidate(input, &self.grammar)
    }

    fn print_candidate(&self, candidate: &Candidate) -> String {
        print_candidate(candidate, self.prefix.as_deref())
    }

    fn parse_variant(&self, input: &str) -> Option<Variant> {
        parse_variant(input, &self.grammar)
    }

    fn print_variant(&self, variant: &Variant) -> String {
        print_variant(variant)
    }

    fn resolve_theme_value(&self, path: &str) -> Option<String> {
        self.theme.resolve_path(path)
    }

    fn theme_reference(&self, name: &str, options: ResolveOptions) -> Option<String> {
        self.theme.reference(name, options)
    }

    fn compile_ast_nodes(&self, candidate: &Candidate, options: CompileOptions) -> Option<Vec<CssNode>> {
        let mut nodes = self.compile_utility(candidate, options)?;
        if nodes.is_empty() {
            return None;
        }
        if candidate.important {
            mark_important(&mut nodes);
        }
        for variant in candidate.variants.iter().rev() {
            nodes = self.apply_variant(variant, nodes, options)?;
        }
        Some(nodes)
    }

    fn apply_variant(
        &self,
        variant: &Variant,
        nodes: Vec<CssNode>,
        options: CompileOptions,
    ) -> Option<Vec<CssNode>> {
        self.variants.apply(variant, nodes, &self.theme, options.context())
    }

    fn class_list(&self) -> Vec<ClassEntry> {
        let mut list = self.utilities.class_list(&self.theme);
        list.extend(self.custom.keys().map(|name| ClassEntry {
            name: name.clone(),
            modifiers: Vec::new(),
        }));
        list
    }

    fn variant_list(&self) -> Vec<String> {
        self.variants.list()
    }

    fn functional_roots(&self) -> Vec<String> {
        self.utilities.functional_roots().cloned().collect()
    }

    fn candidates_to_css(&self, candidates: &[&str]) -> String {
        let mut rules = Vec::new();
        for raw in candidates {
            let compiled = self
                .parse_candidate(raw)
                .iter()
                .find_map(|candidate| self.compile_ast_nodes(candidate, CompileOptions::default()));
            match compiled {
                Some(nodes) => rules.push(CssNode::rule(format!(".{}", escape_class_name(raw)), nodes)),
                None => trace!("skipping invalid candidate {raw}"),
            }
        }
        let rules = flatten(&rules);

        let mut used = IndexSet::new();
        collect_variables(&rules, &mut used);
        let root: Vec<CssNode> = self
            .theme
            .iter()
            .filter(|(name, entry)| !entry.reference && used.contains(name.as_str()))
            .map(|(name, entry)| CssNode::decl(name.clone(), entry.value.clone()))
            .collect();

        let mut stylesheet = Vec::with_capacity(rules.len() + 1);
        if !root.is_empty() {
            stylesheet.push(CssNode::rule(":root", root));
        }
        stylesheet.extend(rules);
        to_css(&stylesheet)
    }
}
