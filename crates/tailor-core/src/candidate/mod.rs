//! Candidate model
//!
//! A candidate is one class token such as `hover:bg-red-500/50!`. Candidates
//! are plain values: passes clone them, mutate the clone and throw it away
//! when the rewrite does not hold.

mod parse;
mod print;

pub use parse::{
    CandidateGrammar, decode_arbitrary_value, infer_data_type, is_known_data_type,
    parse_candidate, parse_variant, segment,
};
pub use print::{encode_arbitrary_value, print_candidate, print_modifier, print_variant};

/// Kind-specific part of a candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// `flex`, `italic`
    Static { root: String },
    /// `bg-red-500/50`, `w-[64rem]`, `-mt-2`
    Functional {
        root: String,
        value: Option<UtilityValue>,
        modifier: Option<Modifier>,
    },
    /// `[color:red]/50`
    Arbitrary {
        property: String,
        value: String,
        modifier: Option<Modifier>,
    },
}

/// A parsed class token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub kind: CandidateKind,
    /// Variants in source order; the last one is applied innermost
    pub variants: Vec<Variant>,
    pub important: bool,
}

impl Candidate {
    pub fn new(kind: CandidateKind) -> Self {
        Self {
            kind,
            variants: Vec::new(),
            important: false,
        }
    }

    pub fn static_utility(root: impl Into<String>) -> Self {
        Self::new(CandidateKind::Static { root: root.into() })
    }

    pub fn functional(root: impl Into<String>, value: Option<UtilityValue>) -> Self {
        Self::new(CandidateKind::Functional {
            root: root.into(),
            value,
            modifier: None,
        })
    }

    pub fn arbitrary(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(CandidateKind::Arbitrary {
            property: property.into(),
            value: value.into(),
            modifier: None,
        })
    }

    /// The same utility without variants or importance
    pub fn base(&self) -> Candidate {
        Candidate::new(self.kind.clone())
    }

    /// Copy variants and importance from `other`
    pub fn with_context_of(mut self, other: &Candidate) -> Candidate {
        self.variants = other.variants.clone();
        self.important = other.important;
        self
    }

    pub fn modifier(&self) -> Option<&Modifier> {
        match &self.kind {
            CandidateKind::Functional { modifier, .. } | CandidateKind::Arbitrary { modifier, .. } => {
                modifier.as_ref()
            }
            CandidateKind::Static { .. } => None,
        }
    }

    pub fn set_modifier(&mut self, new_modifier: Option<Modifier>) {
        match &mut self.kind {
            CandidateKind::Functional { modifier, .. } | CandidateKind::Arbitrary { modifier, .. } => {
                *modifier = new_modifier;
            }
            CandidateKind::Static { .. } => {}
        }
    }

    pub fn root(&self) -> Option<&str> {
        match &self.kind {
            CandidateKind::Static { root } | CandidateKind::Functional { root, .. } => Some(root),
            CandidateKind::Arbitrary { .. } => None,
        }
    }

    /// The arbitrary value text of an arbitrary property or arbitrary-valued utility
    pub fn arbitrary_value(&self) -> Option<&str> {
        match &self.kind {
            CandidateKind::Arbitrary { value, .. } => Some(value),
            CandidateKind::Functional {
                value: Some(UtilityValue::Arbitrary { value, .. }),
                ..
            } => Some(value),
            _ => None,
        }
    }
}

/// Value of a functional utility
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UtilityValue {
    /// `red-500`, `4`; `fraction` holds `1/2` when a named modifier followed
    Named {
        value: String,
        fraction: Option<String>,
    },
    /// `[64rem]`, `[color:var(--x)]`
    Arbitrary {
        value: String,
        data_type: Option<String>,
    },
}

impl UtilityValue {
    pub fn named(value: impl Into<String>) -> Self {
        UtilityValue::Named {
            value: value.into(),
            fraction: None,
        }
    }

    pub fn arbitrary(value: impl Into<String>) -> Self {
        UtilityValue::Arbitrary {
            value: value.into(),
            data_type: None,
        }
    }
}

/// Modifier after `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Modifier {
    Named(String),
    Arbitrary(String),
}

impl Modifier {
    pub fn value(&self) -> &str {
        match self {
            Modifier::Named(value) | Modifier::Arbitrary(value) => value,
        }
    }
}

/// Value of a functional variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariantValue {
    Named(String),
    Arbitrary(String),
}

impl VariantValue {
    pub fn value(&self) -> &str {
        match self {
            VariantValue::Named(value) | VariantValue::Arbitrary(value) => value,
        }
    }
}

/// A condition prefixed to a candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `hover`, `md`, `*`
    Static { root: String },
    /// `data-open`, `nth-[2n+1]`, `min-[40rem]`
    Functional {
        root: String,
        value: Option<VariantValue>,
        modifier: Option<Modifier>,
    },
    /// `[&:hover]`, `[@media_print]`, `[>img]`
    Arbitrary { selector: String, relative: bool },
    /// `group-hover/item`, `not-focus`
    Compound {
        root: String,
        variant: Box<Variant>,
        modifier: Option<Modifier>,
    },
}

impl Variant {
    pub fn static_variant(root: impl Into<String>) -> Self {
        Variant::Static { root: root.into() }
    }

    pub fn functional(root: impl Into<String>, value: VariantValue) -> Self {
        Variant::Functional {
            root: root.into(),
            value: Some(value),
            modifier: None,
        }
    }

    pub fn arbitrary(selector: impl Into<String>) -> Self {
        Variant::Arbitrary {
            selector: selector.into(),
            relative: false,
        }
    }

    pub fn compound(root: impl Into<String>, variant: Variant) -> Self {
        Variant::Compound {
            root: root.into(),
            variant: Box::new(variant),
            modifier: None,
        }
    }
}
