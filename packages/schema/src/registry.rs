//! # Component Registry
//!
//! Static, read-only metadata for every [`ComponentType`]: palette category,
//! property definitions for the properties panel, default prop values, and
//! the child-containment policy enforced by every structural mutation.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::component::{Category, ChildPolicy, ComponentType};
use crate::node::Props;

/// Editor control used to edit a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    TextArea,
    Number,
    Boolean,
    Select,
    Color,
}

/// A single editable property of a component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDefinition {
    pub name: &'static str,
    pub label: &'static str,
    pub control: ControlKind,
    pub default: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Allowed values for `Select` controls
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
}

/// Registry entry for one component kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub category: Category,
    pub label: &'static str,
    pub description: &'static str,
    pub props: Vec<PropDefinition>,
    pub default_props: Props,
    pub child_policy: ChildPolicy,

    /// Permitted child kinds when the policy is `specific`
    pub allowed_children: &'static [ComponentType],

    /// When set, this kind may only be placed inside these parents
    pub allowed_parents: Option<&'static [ComponentType]>,
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

impl ComponentDefinition {
    pub fn prop(&self, name: &str) -> Option<&PropDefinition> {
        self.props.iter().find(|p| p.name == name)
    }
}

static REGISTRY: OnceLock<Vec<ComponentDefinition>> = OnceLock::new();

/// All registry entries, in [`ComponentType::ALL`] order
pub fn definitions() -> &'static [ComponentDefinition] {
    REGISTRY.get_or_init(|| ComponentType::ALL.iter().copied().map(build).collect())
}

/// Registry entry for a component kind
pub fn definition(component_type: ComponentType) -> &'static ComponentDefinition {
    // ALL lists the variants in declaration order
    &definitions()[component_type as usize]
}

/// Entries for one palette category
pub fn components_in(category: Category) -> impl Iterator<Item = &'static ComponentDefinition> {
    definitions().iter().filter(move |d| d.category == category)
}

pub fn child_policy(component_type: ComponentType) -> ChildPolicy {
    definition(component_type).child_policy
}

pub fn can_have_children(component_type: ComponentType) -> bool {
    child_policy(component_type).allows_children()
}

/// Whether `child` may be placed directly inside `parent`.
///
/// `single` is treated like `any` here; cardinality is checked by
/// [`crate::validation::check_placement`].
pub fn can_be_child_of(child: ComponentType, parent: ComponentType) -> bool {
    let parent_def = definition(parent);

    let accepted = match parent_def.child_policy {
        ChildPolicy::None => false,
        ChildPolicy::Any | ChildPolicy::Single => true,
        ChildPolicy::Specific => parent_def.allowed_children.contains(&child),
    };

    if !accepted {
        return false;
    }

    match definition(child).allowed_parents {
        Some(parents) => parents.contains(&parent),
        None => true,
    }
}

// Prop definition helpers

fn text(name: &'static str, label: &'static str, default: &str) -> PropDefinition {
    PropDefinition {
        name,
        label,
        control: ControlKind::Text,
        default: json!(default),
        min: None,
        max: None,
        step: None,
        options: &[],
    }
}

fn text_area(name: &'static str, label: &'static str, default: &str) -> PropDefinition {
    PropDefinition {
        control: ControlKind::TextArea,
        ..text(name, label, default)
    }
}

fn color(name: &'static str, label: &'static str, default: &str) -> PropDefinition {
    PropDefinition {
        control: ControlKind::Color,
        ..text(name, label, default)
    }
}

fn boolean(name: &'static str, label: &'static str, default: bool) -> PropDefinition {
    PropDefinition {
        control: ControlKind::Boolean,
        default: json!(default),
        ..text(name, label, "")
    }
}

fn number(
    name: &'static str,
    label: &'static str,
    default: f64,
    min: f64,
    max: f64,
    step: f64,
) -> PropDefinition {
    PropDefinition {
        control: ControlKind::Number,
        default: json!(default),
        min: Some(min),
        max: Some(max),
        step: Some(step),
        ..text(name, label, "")
    }
}

fn select(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    default: &str,
) -> PropDefinition {
    PropDefinition {
        control: ControlKind::Select,
        options,
        ..text(name, label, default)
    }
}

const COLORS: &[&str] = &["primary", "secondary", "success", "error", "info", "warning"];
const SIZES: &[&str] = &["small", "medium", "large"];
const SPACING_DIRECTIONS: &[&str] = &["row", "row-reverse", "column", "column-reverse"];

struct Entry {
    category: Category,
    label: &'static str,
    description: &'static str,
    props: Vec<PropDefinition>,
    extra_defaults: Value,
    child_policy: ChildPolicy,
    allowed_children: &'static [ComponentType],
    allowed_parents: Option<&'static [ComponentType]>,
}

impl Entry {
    fn new(category: Category, label: &'static str, description: &'static str) -> Self {
        Self {
            category,
            label,
            description,
            props: Vec::new(),
            extra_defaults: Value::Null,
            child_policy: ChildPolicy::None,
            allowed_children: &[],
            allowed_parents: None,
        }
    }

    fn props(mut self, props: Vec<PropDefinition>) -> Self {
        self.props = props;
        self
    }

    fn defaults(mut self, extra: Value) -> Self {
        self.extra_defaults = extra;
        self
    }

    fn any(mut self) -> Self {
        self.child_policy = ChildPolicy::Any;
        self
    }

    fn single(mut self) -> Self {
        self.child_policy = ChildPolicy::Single;
        self
    }

    fn only(mut self, children: &'static [ComponentType]) -> Self {
        self.child_policy = ChildPolicy::Specific;
        self.allowed_children = children;
        self
    }

    fn parents(mut self, parents: &'static [ComponentType]) -> Self {
        self.allowed_parents = Some(parents);
        self
    }

    fn finish(self, component_type: ComponentType) -> ComponentDefinition {
        let mut default_props: Props = self
            .props
            .iter()
            .map(|p| (p.name.to_string(), p.default.clone()))
            .collect();

        if let Value::Object(extra) = self.extra_defaults {
            default_props.extend(extra);
        }

        ComponentDefinition {
            component_type,
            category: self.category,
            label: self.label,
            description: self.description,
            props: self.props,
            default_props,
            child_policy: self.child_policy,
            allowed_children: self.allowed_children,
            allowed_parents: self.allowed_parents,
        }
    }
}

fn build(component_type: ComponentType) -> ComponentDefinition {
    use Category::*;
    use ComponentType as T;

    let entry = match component_type {
        T::Box => Entry::new(Layout, "Box", "Generic container for grouping and spacing")
            .props(vec![
                select("display", "Display", &["block", "flex", "grid", "inline-block"], "block"),
                number("p", "Padding", 1.0, 0.0, 12.0, 1.0),
                number("m", "Margin", 0.0, 0.0, 12.0, 1.0),
                color("bgcolor", "Background", ""),
            ])
            .any(),
        T::Container => Entry::new(Layout, "Container", "Centers content horizontally")
            .props(vec![
                select("maxWidth", "Max Width", &["xs", "sm", "md", "lg", "xl"], "lg"),
                boolean("disableGutters", "Disable Gutters", false),
            ])
            .any(),
        T::Stack => Entry::new(Layout, "Stack", "One-dimensional layout with spacing")
            .props(vec![
                select("direction", "Direction", SPACING_DIRECTIONS, "column"),
                number("spacing", "Spacing", 2.0, 0.0, 12.0, 1.0),
                select(
                    "alignItems",
                    "Align Items",
                    &["stretch", "flex-start", "center", "flex-end"],
                    "stretch",
                ),
            ])
            .any(),
        T::Grid => Entry::new(Layout, "Grid", "Responsive grid layout")
            .props(vec![
                boolean("container", "Container", true),
                number("spacing", "Spacing", 2.0, 0.0, 12.0, 1.0),
                number("xs", "Columns (xs)", 12.0, 1.0, 12.0, 1.0),
            ])
            .any(),
        T::Paper => Entry::new(Layout, "Paper", "Elevated surface")
            .props(vec![
                number("elevation", "Elevation", 1.0, 0.0, 24.0, 1.0),
                select("variant", "Variant", &["elevation", "outlined"], "elevation"),
                boolean("square", "Square", false),
            ])
            .any(),
        T::Card => Entry::new(Layout, "Card", "Surface for a single subject")
            .props(vec![
                select("variant", "Variant", &["elevation", "outlined"], "elevation"),
                boolean("raised", "Raised", false),
            ])
            .any(),
        T::CardContent => Entry::new(Layout, "Card Content", "Body area of a card")
            .any()
            .parents(&[T::Card]),
        T::CardActions => Entry::new(Layout, "Card Actions", "Action row of a card")
            .props(vec![boolean("disableSpacing", "Disable Spacing", false)])
            .any()
            .parents(&[T::Card]),
        T::Divider => Entry::new(Layout, "Divider", "Thin separator line").props(vec![
            select("orientation", "Orientation", &["horizontal", "vertical"], "horizontal"),
            select("variant", "Variant", &["fullWidth", "inset", "middle"], "fullWidth"),
        ]),

        T::Typography => Entry::new(Typography, "Typography", "Text with a typographic variant")
            .props(vec![
                text_area("text", "Text", "Text"),
                select(
                    "variant",
                    "Variant",
                    &[
                        "h1", "h2", "h3", "h4", "h5", "h6", "subtitle1", "subtitle2", "body1",
                        "body2", "caption", "overline",
                    ],
                    "body1",
                ),
                select(
                    "align",
                    "Align",
                    &["inherit", "left", "center", "right", "justify"],
                    "inherit",
                ),
                color("color", "Color", "text.primary"),
                boolean("gutterBottom", "Gutter Bottom", false),
            ]),

        T::TextField => Entry::new(Input, "Text Field", "Single or multi-line text input")
            .props(vec![
                text("label", "Label", "Label"),
                text("placeholder", "Placeholder", ""),
                select("variant", "Variant", &["outlined", "filled", "standard"], "outlined"),
                select("size", "Size", &["small", "medium"], "medium"),
                boolean("multiline", "Multiline", false),
                boolean("fullWidth", "Full Width", false),
            ]),
        T::Checkbox => Entry::new(Input, "Checkbox", "Boolean toggle with a box").props(vec![
            text("label", "Label", "Checkbox"),
            boolean("defaultChecked", "Checked", false),
            select("color", "Color", COLORS, "primary"),
        ]),
        T::Switch => Entry::new(Input, "Switch", "On/off toggle").props(vec![
            text("label", "Label", "Switch"),
            boolean("defaultChecked", "Checked", false),
            select("color", "Color", COLORS, "primary"),
        ]),
        T::Slider => Entry::new(Input, "Slider", "Select a value from a range").props(vec![
            number("defaultValue", "Value", 30.0, 0.0, 100.0, 1.0),
            number("min", "Min", 0.0, -1000.0, 1000.0, 1.0),
            number("max", "Max", 100.0, -1000.0, 1000.0, 1.0),
            number("step", "Step", 1.0, 0.1, 100.0, 0.1),
        ]),
        T::Select => Entry::new(Input, "Select", "Dropdown choice")
            .props(vec![
                text("label", "Label", "Select"),
                select("variant", "Variant", &["outlined", "filled", "standard"], "outlined"),
                boolean("fullWidth", "Full Width", false),
            ])
            .only(&[T::MenuItem]),
        T::MenuItem => Entry::new(Input, "Menu Item", "Option inside a select")
            .props(vec![text("text", "Text", "Option"), text("value", "Value", "")])
            .parents(&[T::Select]),
        T::RadioGroup => Entry::new(Input, "Radio Group", "Group of mutually exclusive options")
            .props(vec![text("label", "Label", "Options"), boolean("row", "Row", false)])
            .only(&[T::Radio]),
        T::Radio => Entry::new(Input, "Radio", "One option of a radio group")
            .props(vec![text("label", "Label", "Option"), text("value", "Value", "")])
            .parents(&[T::RadioGroup]),

        T::Button => Entry::new(Action, "Button", "Clickable action").props(vec![
            text("text", "Text", "Button"),
            select("variant", "Variant", &["text", "contained", "outlined"], "contained"),
            select("color", "Color", COLORS, "primary"),
            select("size", "Size", SIZES, "medium"),
            boolean("disabled", "Disabled", false),
            boolean("fullWidth", "Full Width", false),
        ]),
        T::IconButton => Entry::new(Action, "Icon Button", "Action rendered as an icon").props(vec![
            text("icon", "Icon", "Add"),
            select("color", "Color", COLORS, "primary"),
            select("size", "Size", SIZES, "medium"),
        ]),
        T::ButtonGroup => Entry::new(Action, "Button Group", "Row of related buttons")
            .props(vec![
                select("variant", "Variant", &["text", "contained", "outlined"], "outlined"),
                select("orientation", "Orientation", &["horizontal", "vertical"], "horizontal"),
            ])
            .only(&[T::Button, T::IconButton]),

        T::Avatar => Entry::new(DataDisplay, "Avatar", "User picture or initials").props(vec![
            text("text", "Initials", "A"),
            text("src", "Image URL", ""),
            select("variant", "Variant", &["circular", "rounded", "square"], "circular"),
        ]),
        T::Badge => Entry::new(DataDisplay, "Badge", "Small count attached to its child")
            .props(vec![
                text("badgeContent", "Content", "4"),
                select("color", "Color", COLORS, "primary"),
                select("variant", "Variant", &["standard", "dot"], "standard"),
            ])
            .single(),
        T::Chip => Entry::new(DataDisplay, "Chip", "Compact label").props(vec![
            text("label", "Label", "Chip"),
            select("variant", "Variant", &["filled", "outlined"], "filled"),
            select("color", "Color", COLORS, "primary"),
        ]),
        T::Tooltip => Entry::new(DataDisplay, "Tooltip", "Hover hint around its child")
            .props(vec![
                text("title", "Title", "Tooltip"),
                select("placement", "Placement", &["top", "bottom", "left", "right"], "bottom"),
                boolean("arrow", "Arrow", false),
            ])
            .single(),
        T::Icon => Entry::new(DataDisplay, "Icon", "Material icon glyph").props(vec![
            text("name", "Icon", "Star"),
            select("fontSize", "Size", &["inherit", "small", "medium", "large"], "medium"),
            color("color", "Color", "inherit"),
        ]),
        T::List => Entry::new(DataDisplay, "List", "Vertical list of items")
            .props(vec![
                boolean("dense", "Dense", false),
                boolean("disablePadding", "Disable Padding", false),
            ])
            .only(&[T::ListItem]),
        T::ListItem => Entry::new(DataDisplay, "List Item", "Row inside a list")
            .props(vec![boolean("divider", "Divider", false)])
            .any()
            .parents(&[T::List]),
        T::Alert => Entry::new(DataDisplay, "Alert", "Short prominent message")
            .props(vec![
                select("severity", "Severity", &["success", "info", "warning", "error"], "info"),
                select("variant", "Variant", &["standard", "filled", "outlined"], "standard"),
                text("text", "Text", "This is an alert"),
            ])
            .any(),

        T::AppBar => Entry::new(Navigation, "App Bar", "Top application bar")
            .props(vec![
                select(
                    "position",
                    "Position",
                    &["static", "fixed", "sticky", "absolute", "relative"],
                    "static",
                ),
                select(
                    "color",
                    "Color",
                    &["default", "primary", "secondary", "transparent"],
                    "primary",
                ),
            ])
            .only(&[T::Toolbar]),
        T::Toolbar => Entry::new(Navigation, "Toolbar", "Horizontal bar content")
            .props(vec![select("variant", "Variant", &["regular", "dense"], "regular")])
            .any()
            .parents(&[T::AppBar]),
        T::Tabs => Entry::new(Navigation, "Tabs", "Switch between views")
            .props(vec![
                number("value", "Selected", 0.0, 0.0, 50.0, 1.0),
                select("variant", "Variant", &["standard", "scrollable", "fullWidth"], "standard"),
            ])
            .only(&[T::Tab]),
        T::Tab => Entry::new(Navigation, "Tab", "One tab of a tab bar")
            .props(vec![text("label", "Label", "Tab"), boolean("disabled", "Disabled", false)])
            .parents(&[T::Tabs]),
        T::Link => Entry::new(Navigation, "Link", "Hyperlink").props(vec![
            text("text", "Text", "Link"),
            text("href", "URL", "#"),
            select("underline", "Underline", &["always", "hover", "none"], "hover"),
        ]),
        T::Breadcrumbs => Entry::new(Navigation, "Breadcrumbs", "Path of links")
            .props(vec![text("separator", "Separator", "/")])
            .defaults(json!({ "aria-label": "breadcrumb" }))
            .only(&[T::Link, T::Typography]),
    };

    entry.finish(component_type)
}
