//! Snapshot tests for signature text

use std::sync::Arc;

use insta::assert_snapshot;
use tailor_core::DefaultDesignSystem;
use tailor_rules::{SignatureEngine, SignatureFeatures, SignatureOptions};

fn engine() -> SignatureEngine {
    SignatureEngine::new(Arc::new(DefaultDesignSystem::new()))
}

fn utility(text: &str, options: &SignatureOptions) -> String {
    engine().utility_signature(text, options).to_string()
}

fn variant(text: &str) -> String {
    engine()
        .variant_signature(text, &SignatureOptions::default())
        .to_string()
}

#[test]
fn test_static_utility() {
    assert_snapshot!(utility("flex", &SignatureOptions::default()), @r"
    .x {
      display: flex;
    }
    ");
}

#[test]
fn test_spacing_is_folded() {
    assert_snapshot!(utility("w-4", &SignatureOptions::default()), @r"
    .x {
      width: 1rem;
    }
    ");
}

#[test]
fn test_rem_is_converted_with_root_size() {
    let options = SignatureOptions {
        rem_px: Some(16.0),
        ..Default::default()
    };
    assert_snapshot!(utility("w-4", &options), @r"
    .x {
      width: 16px;
    }
    ");
}

#[test]
fn test_variants_wrap_the_rule() {
    assert_snapshot!(utility("hover:flex", &SignatureOptions::default()), @r"
    .x:hover {
      display: flex;
    }
    ");
    assert_snapshot!(utility("md:flex", &SignatureOptions::default()), @r"
    @media (width>=48rem) {
      .x {
        display: flex;
      }
    }
    ");
}

#[test]
fn test_expanded_shorthand() {
    let options = SignatureOptions::default().expanded();
    assert_snapshot!(utility("m-1", &options), @r"
    .x {
      margin-bottom: 0.25rem;
      margin-left: 0.25rem;
      margin-right: 0.25rem;
      margin-top: 0.25rem;
    }
    ");
}

#[test]
fn test_logical_to_physical() {
    let options = SignatureOptions {
        features: SignatureFeatures {
            expand_properties: true,
            logical_to_physical: true,
        },
        ..Default::default()
    };
    assert_snapshot!(utility("mx-2", &options), @r"
    .x {
      margin-left: 0.5rem;
      margin-right: 0.5rem;
    }
    ");
}

#[test]
fn test_variant_signatures() {
    assert_snapshot!(variant("*"), @r"
    .x>* {
      color: red;
    }
    ");
    assert_snapshot!(variant("data-open"), @r"
    .x[data-open] {
      color: red;
    }
    ");
    assert_snapshot!(variant("[&[data-open]]"), @r"
    .x[data-open] {
      color: red;
    }
    ");
}

#[test]
fn test_invalid_display() {
    assert_eq!(utility("not-a-utility", &SignatureOptions::default()), "<invalid>");
}
