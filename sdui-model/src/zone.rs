use crate::condition::evaluate_condition;
use crate::data::DataBag;
use crate::slot::Slot;
use serde::{Deserialize, Serialize};

/// A layout container in the screen tree.
///
/// Zones nest by ownership: a zone holds its child zones directly, so the
/// tree can never contain cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    #[serde(default)]
    pub distribution: Distribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<Slot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Zone>,
    /// Slot template applied per row for list-like zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_layout: Option<ItemLayout>,
    /// Data bag key holding the rows of a list-like zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
}

impl Zone {
    /// Creates an empty zone.
    pub fn new(id: impl Into<String>, zone_type: ZoneType) -> Self {
        Self {
            id: id.into(),
            zone_type,
            distribution: Distribution::default(),
            condition: None,
            slots: Vec::new(),
            zones: Vec::new(),
            item_layout: None,
            data_key: None,
        }
    }

    pub fn with_slots(mut self, slots: Vec<Slot>) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Whether this zone's condition holds against `data`.
    pub fn is_visible(&self, data: &DataBag) -> bool {
        self.condition
            .as_deref()
            .is_none_or(|expr| evaluate_condition(expr, data))
    }

    pub(crate) fn collect_slots<'a>(&'a self, out: &mut Vec<&'a Slot>) {
        out.extend(self.slots.iter());
        if let Some(layout) = &self.item_layout {
            out.extend(layout.slots.iter());
        }
        for child in &self.zones {
            child.collect_slots(out);
        }
    }
}

/// What kind of container a zone is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneType {
    Container,
    FormSection,
    SimpleList,
    GroupedList,
    MetricGrid,
    ActionGroup,
    CardList,
}

impl ZoneType {
    /// List-like zones render their `item_layout` once per row.
    pub fn is_list(self) -> bool {
        matches!(self, Self::SimpleList | Self::GroupedList | Self::CardList)
    }
}

/// How children of a zone are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Distribution {
    #[default]
    Stacked,
    SideBySide,
    Grid,
    FlowRow,
}

/// Slot template for one row of a list-like zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemLayout {
    #[serde(default)]
    pub slots: Vec<Slot>,
}
