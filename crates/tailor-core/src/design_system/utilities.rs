//! Built-in utilities
//!
//! Static utilities map to a fixed declaration list. Functional utilities are
//! registered per root as one or more [`FunctionalKind`]s; a candidate
//! compiles with the first kind that accepts its value.

use super::functions::{FunctionContext, substitute_functions, with_alpha};
use crate::candidate::{Modifier, UtilityValue, infer_data_type};
use crate::css::CssNode;
use crate::fold::{format_number, parse_dimension};
use crate::theme::Theme;
use indexmap::IndexMap;

/// A utility with a fixed declaration list
#[derive(Debug, Clone)]
pub(crate) struct StaticUtility {
    pub declarations: Vec<(&'static str, &'static str)>,
    /// Legacy and deprecated utilities compile but are not enumerated
    pub listed: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FunctionalKind {
    Spacing {
        properties: &'static [&'static str],
        keywords: &'static [(&'static str, &'static str)],
        fractions: bool,
        negative: bool,
    },
    Color {
        property: &'static str,
    },
    BackgroundImage,
    BorderWidth,
    TextSize,
    Leading,
    Opacity,
    ZIndex {
        negative: bool,
    },
    Order {
        negative: bool,
    },
    Aspect,
    GridCols,
    Radius,
}

const MARGIN_KEYWORDS: &[(&str, &str)] = &[("auto", "auto"), ("px", "1px")];
const PADDING_KEYWORDS: &[(&str, &str)] = &[("px", "1px")];
const INSET_KEYWORDS: &[(&str, &str)] = &[("auto", "auto"), ("px", "1px"), ("full", "100%")];
const WIDTH_KEYWORDS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("px", "1px"),
    ("full", "100%"),
    ("screen", "100vw"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];
const HEIGHT_KEYWORDS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("px", "1px"),
    ("full", "100%"),
    ("screen", "100vh"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];
const SIZE_KEYWORDS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("px", "1px"),
    ("full", "100%"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
];
const GAP_KEYWORDS: &[(&str, &str)] = &[("px", "1px")];

/// Spacing multipliers enumerated in the class list
const SPACING_STEPS: &[&str] = &[
    "0", "0.5", "1", "1.5", "2", "2.5", "3", "3.5", "4", "5", "6", "7", "8", "9", "10", "11",
    "12", "14", "16", "20", "24", "28", "32", "36", "40", "44", "48", "52", "56", "60", "64",
    "72", "80", "96",
];

const FRACTIONS: &[&str] = &["1/2", "1/3", "2/3", "1/4", "3/4"];

pub(crate) struct UtilityRegistry {
    statics: IndexMap<String, StaticUtility>,
    functionals: IndexMap<String, Vec<FunctionalKind>>,
}

/// A class list entry: a utility name and the modifiers it accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: String,
    pub modifiers: Vec<String>,
}

impl UtilityRegistry {
    pub(crate) fn builtin() -> Self {
        let mut registry = Self {
            statics: IndexMap::new(),
            functionals: IndexMap::new(),
        };
        registry.register_statics();
        registry.register_spacing();

        for (root, property) in [
            ("bg", "background-color"),
            ("text", "color"),
            ("border", "border-color"),
            ("fill", "fill"),
            ("stroke", "stroke"),
            ("accent", "accent-color"),
            ("caret", "caret-color"),
            ("decoration", "text-decoration-color"),
            ("outline", "outline-color"),
        ] {
            registry.functional(root, FunctionalKind::Color { property });
        }
        registry.functional("bg", FunctionalKind::BackgroundImage);
        registry.functional("border", FunctionalKind::BorderWidth);
        registry.functional("text", FunctionalKind::TextSize);
        registry.functional("leading", FunctionalKind::Leading);
        registry.functional("opacity", FunctionalKind::Opacity);
        registry.functional("z", FunctionalKind::ZIndex { negative: false });
        registry.functional("-z", FunctionalKind::ZIndex { negative: true });
        registry.functional("order", FunctionalKind::Order { negative: false });
        registry.functional("-order", FunctionalKind::Order { negative: true });
        registry.functional("aspect", FunctionalKind::Aspect);
        registry.functional("grid-cols", FunctionalKind::GridCols);
        registry.functional("rounded", FunctionalKind::Radius);
        registry
    }

    fn static_utility(&mut self, name: &str, declarations: Vec<(&'static str, &'static str)>, listed: bool) {
        self.statics.insert(
            name.to_string(),
            StaticUtility {
                declarations,
                listed,
            },
        );
    }

    fn functional(&mut self, root: &str, kind: FunctionalKind) {
        self.functionals.entry(root.to_string()).or_default().push(kind);
    }

    fn register_statics(&mut self) {
        for (name, display) in [
            ("block", "block"),
            ("inline-block", "inline-block"),
            ("inline", "inline"),
            ("flex", "flex"),
            ("inline-flex", "inline-flex"),
            ("grid", "grid"),
            ("inline-grid", "inline-grid"),
            ("contents", "contents"),
            ("hidden", "none"),
        ] {
            self.static_utility(name, vec![("display", display)], true);
        }
        for position in ["static", "fixed", "absolute", "relative", "sticky"] {
            self.static_utility(position, vec![("position", position)], true);
        }

        let listed: &[(&str, &[(&'static str, &'static str)])] = &[
            ("italic", &[("font-style", "italic")]),
            ("not-italic", &[("font-style", "normal")]),
            ("underline", &[("text-decoration-line", "underline")]),
            ("line-through", &[("text-decoration-line", "line-through")]),
            ("no-underline", &[("text-decoration-line", "none")]),
            ("grow", &[("flex-grow", "1")]),
            ("grow-0", &[("flex-grow", "0")]),
            ("shrink", &[("flex-shrink", "1")]),
            ("shrink-0", &[("flex-shrink", "0")]),
            (
                "truncate",
                &[
                    ("overflow", "hidden"),
                    ("text-overflow", "ellipsis"),
                    ("white-space", "nowrap"),
                ],
            ),
            ("text-ellipsis", &[("text-overflow", "ellipsis")]),
            ("text-clip", &[("text-overflow", "clip")]),
            ("box-decoration-slice", &[("box-decoration-break", "slice")]),
            ("box-decoration-clone", &[("box-decoration-break", "clone")]),
            ("wrap-break-word", &[("overflow-wrap", "break-word")]),
            ("wrap-anywhere", &[("overflow-wrap", "anywhere")]),
            ("border", &[("border-width", "1px")]),
            ("rounded", &[("border-radius", "0.25rem")]),
        ];
        for (name, declarations) in listed {
            self.static_utility(name, declarations.to_vec(), true);
        }

        let unlisted: &[(&str, &[(&'static str, &'static str)])] = &[
            ("flex-grow", &[("flex-grow", "1")]),
            ("flex-shrink", &[("flex-shrink", "1")]),
            ("overflow-ellipsis", &[("text-overflow", "ellipsis")]),
            ("decoration-slice", &[("box-decoration-break", "slice")]),
            ("decoration-clone", &[("box-decoration-break", "clone")]),
            ("break-words", &[("overflow-wrap", "break-word")]),
            ("order-none", &[("order", "0")]),
        ];
        for (name, declarations) in unlisted {
            self.static_utility(name, declarations.to_vec(), false);
        }

        for (suffix, position) in [
            ("t", "to top in oklab"),
            ("tr", "to top right in oklab"),
            ("r", "to right in oklab"),
            ("br", "to bottom right in oklab"),
            ("b", "to bottom in oklab"),
            ("bl", "to bottom left in oklab"),
            ("l", "to left in oklab"),
            ("tl", "to top left in oklab"),
        ] {
            let declarations = vec![
                ("--tw-gradient-position", position),
                ("background-image", "linear-gradient(var(--tw-gradient-stops))"),
            ];
            self.static_utility(&format!("bg-linear-to-{suffix}"), declarations.clone(), true);
            self.static_utility(&format!("bg-gradient-to-{suffix}"), declarations, false);
        }
    }

    fn register_spacing(&mut self) {
        let spacing = |properties, keywords, fractions, negative| FunctionalKind::Spacing {
            properties,
            keywords,
            fractions,
            negative,
        };

        let groups: &[(&str, &'static [&'static str], &'static [(&'static str, &'static str)], bool, bool)] = &[
            ("m", &["margin"], MARGIN_KEYWORDS, false, true),
            ("mx", &["margin-inline"], MARGIN_KEYWORDS, false, true),
            ("my", &["margin-block"], MARGIN_KEYWORDS, false, true),
            ("ms", &["margin-inline-start"], MARGIN_KEYWORDS, false, true),
            ("me", &["margin-inline-end"], MARGIN_KEYWORDS, false, true),
            ("mt", &["margin-top"], MARGIN_KEYWORDS, false, true),
            ("mr", &["margin-right"], MARGIN_KEYWORDS, false, true),
            ("mb", &["margin-bottom"], MARGIN_KEYWORDS, false, true),
            ("ml", &["margin-left"], MARGIN_KEYWORDS, false, true),
            ("p", &["padding"], PADDING_KEYWORDS, false, false),
            ("px", &["padding-inline"], PADDING_KEYWORDS, false, false),
            ("py", &["padding-block"], PADDING_KEYWORDS, false, false),
            ("ps", &["padding-inline-start"], PADDING_KEYWORDS, false, false),
            ("pe", &["padding-inline-end"], PADDING_KEYWORDS, false, false),
            ("pt", &["padding-top"], PADDING_KEYWORDS, false, false),
            ("pr", &["padding-right"], PADDING_KEYWORDS, false, false),
            ("pb", &["padding-bottom"], PADDING_KEYWORDS, false, false),
            ("pl", &["padding-left"], PADDING_KEYWORDS, false, false),
            ("w", &["width"], WIDTH_KEYWORDS, true, false),
            ("h", &["height"], HEIGHT_KEYWORDS, true, false),
            ("size", &["width", "height"], SIZE_KEYWORDS, true, false),
            ("inset", &["inset"], INSET_KEYWORDS, true, true),
            ("inset-x", &["inset-inline"], INSET_KEYWORDS, true, true),
            ("inset-y", &["inset-block"], INSET_KEYWORDS, true, true),
            ("top", &["top"], INSET_KEYWORDS, true, true),
            ("right", &["right"], INSET_KEYWORDS, true, true),
            ("bottom", &["bottom"], INSET_KEYWORDS, true, true),
            ("left", &["left"], INSET_KEYWORDS, true, true),
            ("gap", &["gap"], GAP_KEYWORDS, false, false),
            ("gap-x", &["column-gap"], GAP_KEYWORDS, false, false),
            ("gap-y", &["row-gap"], GAP_KEYWORDS, false, false),
        ];

        for (root, properties, keywords, fractions, allows_negative) in groups {
            self.functional(root, spacing(*properties, *keywords, *fractions, false));
            if *allows_negative {
                self.functional(&format!("-{root}"), spacing(*properties, *keywords, *fractions, true));
            }
        }
    }

    pub(crate) fn static_names(&self) -> impl Iterator<Item = &String> {
        self.statics.keys()
    }

    pub(crate) fn functional_roots(&self) -> impl Iterator<Item = &String> {
        self.functionals.keys()
    }

    pub(crate) fn compile_static(&self, root: &str) -> Option<Vec<CssNode>> {
        let utility = self.statics.get(root)?;
        Some(
            utility
                .declarations
                .iter()
                .map(|(property, value)| CssNode::decl(*property, *value))
                .collect(),
        )
    }

    pub(crate) fn compile_functional(
        &self,
        root: &str,
        value: Option<&UtilityValue>,
        modifier: Option<&Modifier>,
        theme: &Theme,
        ctx: FunctionContext,
    ) -> Option<Vec<CssNode>> {
        let kinds = self.functionals.get(root)?;
        kinds
            .iter()
            .find_map(|kind| compile_kind(*kind, value?, modifier, theme, ctx))
    }

    /// Every enumerable utility with its suggested modifiers
    pub(crate) fn class_list(&self, theme: &Theme) -> Vec<ClassEntry> {
        let mut entries: Vec<ClassEntry> = self
            .statics
            .iter()
            .filter(|(_, utility)| utility.listed)
            .map(|(name, _)| ClassEntry {
                name: name.clone(),
                modifiers: Vec::new(),
            })
            .collect();

        let opacity_steps: Vec<String> = (0..=100).step_by(5).map(|step| step.to_string()).collect();

        for (root, kinds) in &self.functionals {
            for kind in kinds {
                let (values, modifiers): (Vec<String>, Vec<String>) = match kind {
                    FunctionalKind::Spacing {
                        keywords,
                        fractions,
                        negative,
                        ..
                    } => {
                        let mut values: Vec<String> = Vec::new();
                        if !negative {
                            values.extend(keywords.iter().map(|(name, _)| name.to_string()));
                        }
                        values.extend(
                            SPACING_STEPS
                                .iter()
                                .filter(|step| !*negative || **step != "0")
                                .map(|step| step.to_string()),
                        );
                        if *fractions && !negative {
                            values.extend(FRACTIONS.iter().map(|f| f.to_string()));
                        }
                        (values, Vec::new())
                    }
                    FunctionalKind::Color { .. } => {
                        let mut values = vec!["transparent".to_string(), "current".to_string(), "inherit".to_string()];
                        values.extend(theme.keys("--color"));
                        (values, opacity_steps.clone())
                    }
                    FunctionalKind::BackgroundImage => (vec!["none".to_string()], Vec::new()),
                    FunctionalKind::BorderWidth => (
                        ["0", "2", "4", "8"].iter().map(|v| v.to_string()).collect(),
                        Vec::new(),
                    ),
                    FunctionalKind::TextSize => (theme.keys("--text"), theme.keys("--leading")),
                    FunctionalKind::Leading => {
                        let mut values = theme.keys("--leading");
                        values.push("none".to_string());
                        values.extend((3..=10).map(|step| step.to_string()));
                        (values, Vec::new())
                    }
                    FunctionalKind::Opacity => (opacity_steps.clone(), Vec::new()),
                    FunctionalKind::ZIndex { negative } => {
                        let mut values: Vec<String> = (1..=5).map(|step| (step * 10).to_string()).collect();
                        if !negative {
                            values.insert(0, "0".to_string());
                            values.push("auto".to_string());
                        }
                        (values, Vec::new())
                    }
                    FunctionalKind::Order { negative } => {
                        let mut values: Vec<String> = (1..=12).map(|step| step.to_string()).collect();
                        if !negative {
                            values.insert(0, "0".to_string());
                            values.push("first".to_string());
                            values.push("last".to_string());
                        }
                        (values, Vec::new())
                    }
                    FunctionalKind::Aspect => (
                        ["square", "video", "auto"].iter().map(|v| v.to_string()).collect(),
                        Vec::new(),
                    ),
                    FunctionalKind::GridCols => {
                        let mut values: Vec<String> = (1..=12).map(|step| step.to_string()).collect();
                        values.push("none".to_string());
                        values.push("subgrid".to_string());
                        (values, Vec::new())
                    }
                    FunctionalKind::Radius => {
                        let mut values = vec!["none".to_string(), "full".to_string()];
                        values.extend(theme.keys("--radius"));
                        (values, Vec::new())
                    }
                };
                entries.extend(values.into_iter().map(|value| ClassEntry {
                    name: format!("{root}-{value}"),
                    modifiers: modifiers.clone(),
                }));
            }
        }
        entries
    }
}

/// `N`, `N.25`, `N.5`, `N.75`
pub fn is_spacing_multiplier(value: &str) -> bool {
    match parse_dimension(value) {
        Some(dimension) => {
            dimension.unit.is_none()
                && dimension.value >= 0.0
                && (dimension.value * 4.0).fract() == 0.0
                && !value.starts_with('+')
        }
        None => false,
    }
}

fn is_positive_integer(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) && value != "0" && !value.starts_with('0')
}

fn is_integer(value: &str) -> bool {
    value == "0" || is_positive_integer(value)
}

fn negate(value: String, negative: bool) -> String {
    if negative {
        format!("calc({value} * -1)")
    } else {
        value
    }
}

/// Resolve an arbitrary value if its data type is one of `accepted`
///
/// An explicit data type must match; an inferred one must match when it can
/// be determined at all.
fn arbitrary(
    value: &UtilityValue,
    accepted: &[&str],
    theme: &Theme,
    ctx: FunctionContext,
) -> Option<String> {
    let UtilityValue::Arbitrary { value, data_type } = value else {
        return None;
    };
    match data_type.as_deref() {
        Some("any") => {}
        Some(data_type) if !accepted.contains(&data_type) => return None,
        Some(_) => {}
        None => {
            if let Some(inferred) = infer_data_type(value)
                && !accepted.contains(&inferred)
            {
                return None;
            }
        }
    }
    substitute_functions(value, theme, ctx)
}

pub(crate) fn alpha_from_modifier(modifier: &Modifier, theme: &Theme, ctx: FunctionContext) -> Option<String> {
    match modifier {
        Modifier::Named(value) => {
            let dimension = parse_dimension(value)?;
            if dimension.unit.is_some() || dimension.value < 0.0 || dimension.value > 100.0 {
                return None;
            }
            Some(format!("{}%", format_number(dimension.value)))
        }
        Modifier::Arbitrary(value) => substitute_functions(value, theme, ctx),
    }
}

/// Resolve a colour value with its opacity modifier
pub(crate) fn resolve_color(
    value: &UtilityValue,
    modifier: Option<&Modifier>,
    theme: &Theme,
    ctx: FunctionContext,
) -> Option<String> {
    let color = match value {
        UtilityValue::Named { value, .. } => match value.as_str() {
            "transparent" => "transparent".to_string(),
            "current" => "currentcolor".to_string(),
            "inherit" => "inherit".to_string(),
            name => theme.reference(&format!("--color-{name}"), ctx.resolve)?,
        },
        arbitrary_value => arbitrary(arbitrary_value, &["color"], theme, ctx)?,
    };
    match modifier {
        Some(modifier) => Some(with_alpha(&color, &alpha_from_modifier(modifier, theme, ctx)?)),
        None => Some(color),
    }
}

fn spacing_value(
    value: &UtilityValue,
    modifier: Option<&Modifier>,
    keywords: &[(&str, &str)],
    fractions: bool,
    theme: &Theme,
    ctx: FunctionContext,
) -> Option<String> {
    match value {
        UtilityValue::Named { value, fraction } => {
            if let Some(fraction) = fraction
                && fractions
                && matches!(modifier, Some(Modifier::Named(_)))
            {
                let (numerator, denominator) = fraction.split_once('/')?;
                if !is_integer(numerator) || !is_positive_integer(denominator) {
                    return None;
                }
                return Some(format!("calc({numerator}/{denominator} * 100%)"));
            }
            if modifier.is_some() {
                return None;
            }
            if let Some((_, keyword)) = keywords.iter().find(|(name, _)| name == value) {
                return Some(keyword.to_string());
            }
            if let Some(reference) = theme.reference(&format!("--spacing-{value}"), ctx.resolve) {
                return Some(reference);
            }
            if is_spacing_multiplier(value) {
                let base = theme.reference("--spacing", ctx.resolve)?;
                return Some(format!("calc({base} * {value})"));
            }
            None
        }
        UtilityValue::Arbitrary { .. } => {
            if modifier.is_some() {
                return None;
            }
            arbitrary(value, &["length", "percentage", "number"], theme, ctx)
        }
    }
}

fn declarations(properties: &[&str], value: &str) -> Vec<CssNode> {
    properties
        .iter()
        .map(|property| CssNode::decl(*property, value))
        .collect()
}

fn compile_kind(
    kind: FunctionalKind,
    value: &UtilityValue,
    modifier: Option<&Modifier>,
    theme: &Theme,
    ctx: FunctionContext,
) -> Option<Vec<CssNode>> {
    let named = match value {
        UtilityValue::Named { value, .. } => Some(value.as_str()),
        UtilityValue::Arbitrary { .. } => None,
    };

    match kind {
        FunctionalKind::Spacing {
            properties,
            keywords,
            fractions,
            negative,
        } => {
            if negative && named.is_some_and(|name| keywords.iter().any(|(k, _)| *k == name && *k != "px")) {
                return None;
            }
            let resolved = spacing_value(value, modifier, keywords, fractions, theme, ctx)?;
            Some(declarations(properties, &negate(resolved, negative)))
        }
        FunctionalKind::Color { property } => {
            let color = resolve_color(value, modifier, theme, ctx)?;
            Some(vec![CssNode::decl(property, color)])
        }
        FunctionalKind::BackgroundImage => {
            if modifier.is_some() {
                return None;
            }
            let image = match named {
                Some("none") => "none".to_string(),
                Some(_) => return None,
                None => arbitrary(value, &["image", "url"], theme, ctx)?,
            };
            if named.is_none() && infer_data_type(&image).is_none() && !matches!(value, UtilityValue::Arbitrary { data_type: Some(_), .. }) {
                return None;
            }
            Some(vec![CssNode::decl("background-image", image)])
        }
        FunctionalKind::BorderWidth => {
            if modifier.is_some() {
                return None;
            }
            let width = match named {
                Some(name) if is_integer(name) => format!("{name}px"),
                Some(_) => return None,
                None => arbitrary(value, &["length", "line-width"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("border-width", width)])
        }
        FunctionalKind::TextSize => {
            let (font_size, default_line_height) = match named {
                Some(name) => (
                    theme.reference(&format!("--text-{name}"), ctx.resolve)?,
                    theme.reference(&format!("--text-{name}--line-height"), ctx.resolve),
                ),
                None => (
                    arbitrary(value, &["length", "percentage", "absolute-size", "relative-size"], theme, ctx)?,
                    None,
                ),
            };
            let line_height = match modifier {
                Some(Modifier::Named(name)) => Some(
                    theme
                        .reference(&format!("--leading-{name}"), ctx.resolve)
                        .or_else(|| {
                            is_spacing_multiplier(name)
                                .then(|| theme.reference("--spacing", ctx.resolve))
                                .flatten()
                                .map(|base| format!("calc({base} * {name})"))
                        })?,
                ),
                Some(Modifier::Arbitrary(line_height)) => Some(substitute_functions(line_height, theme, ctx)?),
                None => default_line_height,
            };
            let mut nodes = vec![CssNode::decl("font-size", font_size)];
            if let Some(line_height) = line_height {
                nodes.push(CssNode::decl("line-height", line_height));
            }
            Some(nodes)
        }
        FunctionalKind::Leading => {
            if modifier.is_some() {
                return None;
            }
            let line_height = match named {
                Some("none") => "1".to_string(),
                Some(name) => match theme.reference(&format!("--leading-{name}"), ctx.resolve) {
                    Some(reference) => reference,
                    None if is_spacing_multiplier(name) => {
                        format!("calc({} * {name})", theme.reference("--spacing", ctx.resolve)?)
                    }
                    None => return None,
                },
                None => arbitrary(value, &["length", "percentage", "number"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("line-height", line_height)])
        }
        FunctionalKind::Opacity => {
            if modifier.is_some() {
                return None;
            }
            let opacity = match named {
                Some(name) => {
                    let dimension = parse_dimension(name)?;
                    if dimension.unit.is_some() || dimension.value > 100.0 || dimension.value < 0.0 {
                        return None;
                    }
                    format!("{name}%")
                }
                None => arbitrary(value, &["number", "percentage"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("opacity", opacity)])
        }
        FunctionalKind::ZIndex { negative } => {
            if modifier.is_some() {
                return None;
            }
            let z = match named {
                Some("auto") if !negative => "auto".to_string(),
                Some(name) if is_integer(name) => name.to_string(),
                Some(_) => return None,
                None => arbitrary(value, &["integer", "number"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("z-index", negate(z, negative))])
        }
        FunctionalKind::Order { negative } => {
            if modifier.is_some() {
                return None;
            }
            let order = match named {
                Some("first") if !negative => "calc(-infinity)".to_string(),
                Some("last") if !negative => "calc(infinity)".to_string(),
                Some(name) if is_integer(name) => name.to_string(),
                Some(_) => return None,
                None => arbitrary(value, &["integer", "number"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("order", negate(order, negative))])
        }
        FunctionalKind::Aspect => {
            let ratio = match value {
                UtilityValue::Named { fraction: Some(fraction), .. } if modifier.is_some() => {
                    let (numerator, denominator) = fraction.split_once('/')?;
                    if !is_positive_integer(numerator) || !is_positive_integer(denominator) {
                        return None;
                    }
                    format!("{numerator} / {denominator}")
                }
                _ if modifier.is_some() => return None,
                UtilityValue::Named { value, .. } => match value.as_str() {
                    "square" => "1 / 1".to_string(),
                    "video" => "16 / 9".to_string(),
                    "auto" => "auto".to_string(),
                    _ => return None,
                },
                UtilityValue::Arbitrary { .. } => arbitrary(value, &["ratio", "number"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("aspect-ratio", ratio)])
        }
        FunctionalKind::GridCols => {
            if modifier.is_some() {
                return None;
            }
            let template = match named {
                Some("none") => "none".to_string(),
                Some("subgrid") => "subgrid".to_string(),
                Some(name) if is_positive_integer(name) => format!("repeat({name}, minmax(0, 1fr))"),
                Some(_) => return None,
                None => arbitrary(value, &[], theme, ctx)?,
            };
            Some(vec![CssNode::decl("grid-template-columns", template)])
        }
        FunctionalKind::Radius => {
            if modifier.is_some() {
                return None;
            }
            let radius = match named {
                Some("none") => "0".to_string(),
                Some("full") => "calc(infinity * 1px)".to_string(),
                Some(name) => theme.reference(&format!("--radius-{name}"), ctx.resolve)?,
                None => arbitrary(value, &["length", "percentage"], theme, ctx)?,
            };
            Some(vec![CssNode::decl("border-radius", radius)])
        }
    }
}
