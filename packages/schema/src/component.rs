//! Component kinds, palette categories and child-containment policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Every component kind the builder can place on the canvas.
///
/// Serialized by name (`"Box"`, `"Typography"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    // Layout
    Box,
    Container,
    Stack,
    Grid,
    Paper,
    Card,
    CardContent,
    CardActions,
    Divider,

    // Typography
    Typography,

    // Input
    TextField,
    Checkbox,
    Switch,
    Slider,
    Select,
    MenuItem,
    RadioGroup,
    Radio,

    // Action
    Button,
    IconButton,
    ButtonGroup,

    // Data display
    Avatar,
    Badge,
    Chip,
    Tooltip,
    Icon,
    List,
    ListItem,
    Alert,

    // Navigation
    AppBar,
    Toolbar,
    Tabs,
    Tab,
    Link,
    Breadcrumbs,
}

impl ComponentType {
    pub const ALL: [ComponentType; 35] = [
        ComponentType::Box,
        ComponentType::Container,
        ComponentType::Stack,
        ComponentType::Grid,
        ComponentType::Paper,
        ComponentType::Card,
        ComponentType::CardContent,
        ComponentType::CardActions,
        ComponentType::Divider,
        ComponentType::Typography,
        ComponentType::TextField,
        ComponentType::Checkbox,
        ComponentType::Switch,
        ComponentType::Slider,
        ComponentType::Select,
        ComponentType::MenuItem,
        ComponentType::RadioGroup,
        ComponentType::Radio,
        ComponentType::Button,
        ComponentType::IconButton,
        ComponentType::ButtonGroup,
        ComponentType::Avatar,
        ComponentType::Badge,
        ComponentType::Chip,
        ComponentType::Tooltip,
        ComponentType::Icon,
        ComponentType::List,
        ComponentType::ListItem,
        ComponentType::Alert,
        ComponentType::AppBar,
        ComponentType::Toolbar,
        ComponentType::Tabs,
        ComponentType::Tab,
        ComponentType::Link,
        ComponentType::Breadcrumbs,
    ];

    /// Serialized name of this component kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Box => "Box",
            ComponentType::Container => "Container",
            ComponentType::Stack => "Stack",
            ComponentType::Grid => "Grid",
            ComponentType::Paper => "Paper",
            ComponentType::Card => "Card",
            ComponentType::CardContent => "CardContent",
            ComponentType::CardActions => "CardActions",
            ComponentType::Divider => "Divider",
            ComponentType::Typography => "Typography",
            ComponentType::TextField => "TextField",
            ComponentType::Checkbox => "Checkbox",
            ComponentType::Switch => "Switch",
            ComponentType::Slider => "Slider",
            ComponentType::Select => "Select",
            ComponentType::MenuItem => "MenuItem",
            ComponentType::RadioGroup => "RadioGroup",
            ComponentType::Radio => "Radio",
            ComponentType::Button => "Button",
            ComponentType::IconButton => "IconButton",
            ComponentType::ButtonGroup => "ButtonGroup",
            ComponentType::Avatar => "Avatar",
            ComponentType::Badge => "Badge",
            ComponentType::Chip => "Chip",
            ComponentType::Tooltip => "Tooltip",
            ComponentType::Icon => "Icon",
            ComponentType::List => "List",
            ComponentType::ListItem => "ListItem",
            ComponentType::Alert => "Alert",
            ComponentType::AppBar => "AppBar",
            ComponentType::Toolbar => "Toolbar",
            ComponentType::Tabs => "Tabs",
            ComponentType::Tab => "Tab",
            ComponentType::Link => "Link",
            ComponentType::Breadcrumbs => "Breadcrumbs",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownComponentType(s.to_string()))
    }
}

/// Palette grouping for a component kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Layout,
    Typography,
    Input,
    Action,
    DataDisplay,
    Navigation,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Layout,
        Category::Typography,
        Category::Input,
        Category::Action,
        Category::DataDisplay,
        Category::Navigation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Layout => "Layout",
            Category::Typography => "Typography",
            Category::Input => "Inputs",
            Category::Action => "Actions",
            Category::DataDisplay => "Data Display",
            Category::Navigation => "Navigation",
        }
    }
}

/// Which children a node of a given kind may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildPolicy {
    /// Leaf: no `children` field at all
    None,
    /// Any component kind, any number
    Any,
    /// Any component kind, at most one
    Single,
    /// Only the kinds listed in the definition's `allowed_children`
    Specific,
}

impl ChildPolicy {
    pub fn allows_children(&self) -> bool {
        !matches!(self, ChildPolicy::None)
    }
}
