use serde::{Deserialize, Serialize};

/// A leaf control in the screen tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default)]
    pub id: String,
    pub control_type: ControlType,
    /// Run-time data reference of the form `slot:<key>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Field name used when the slot's value is submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    /// Id of the action this slot triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Prefix marking a slot binding into run-time data.
const BIND_PREFIX: &str = "slot:";

impl Slot {
    /// Creates a bare slot of the given control type.
    pub fn new(id: impl Into<String>, control_type: ControlType) -> Self {
        Self {
            id: id.into(),
            control_type,
            bind: None,
            label: None,
            value: None,
            placeholder: None,
            field: None,
            required: false,
            read_only: false,
            event_id: None,
            icon: None,
        }
    }

    pub fn with_bind(mut self, key: &str) -> Self {
        self.bind = Some(format!("{BIND_PREFIX}{key}"));
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The data key this slot binds to, if `bind` is a `slot:` reference.
    pub fn bind_key(&self) -> Option<&str> {
        self.bind.as_deref()?.strip_prefix(BIND_PREFIX)
    }
}

/// Which slot property a binding resolves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    Label,
    Value,
}

/// The kind of control a slot renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    Label,
    TextInput,
    EmailInput,
    PasswordInput,
    NumberInput,
    SearchBar,
    Checkbox,
    Switch,
    RadioGroup,
    Select,
    FilledButton,
    OutlinedButton,
    TextButton,
    IconButton,
    Icon,
    Avatar,
    Image,
    Divider,
    ListItem,
    MetricCard,
    Chip,
    Rating,
    /// A control this client does not know; rendered as nothing.
    #[serde(other)]
    Unknown,
}

impl ControlType {
    /// Where bound data lands for this control. Fixed per type.
    pub const fn binding_target(self) -> BindingTarget {
        match self {
            Self::Label
            | Self::FilledButton
            | Self::OutlinedButton
            | Self::TextButton
            | Self::ListItem
            | Self::Chip => BindingTarget::Label,
            _ => BindingTarget::Value,
        }
    }

    /// Whether the control collects user input.
    pub const fn is_input(self) -> bool {
        matches!(
            self,
            Self::TextInput
                | Self::EmailInput
                | Self::PasswordInput
                | Self::NumberInput
                | Self::SearchBar
                | Self::Checkbox
                | Self::Switch
                | Self::RadioGroup
                | Self::Select
                | Self::Rating
        )
    }

    /// Maps a form field `type` string to a control. Unknown types are text inputs.
    pub fn from_field_type(field_type: &str) -> Self {
        match field_type.to_ascii_lowercase().as_str() {
            "email" => Self::EmailInput,
            "password" => Self::PasswordInput,
            "number" | "integer" | "decimal" => Self::NumberInput,
            "checkbox" => Self::Checkbox,
            "switch" | "toggle" => Self::Switch,
            "select" | "dropdown" => Self::Select,
            "radio" => Self::RadioGroup,
            "search" => Self::SearchBar,
            "rating" => Self::Rating,
            _ => Self::TextInput,
        }
    }
}
