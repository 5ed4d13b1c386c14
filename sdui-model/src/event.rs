use serde::{Deserialize, Serialize};
use std::fmt;

/// Events a screen raises toward its contract.
///
/// Distinct from [`ActionType`](crate::ActionType): events are routed
/// through the contract/orchestrator layer, actions through the action
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenEvent {
    LoadData,
    Search,
    SelectItem,
    LoadMore,
    SaveNew,
    SaveExisting,
    Delete,
    Refresh,
    Create,
}

impl ScreenEvent {
    /// Events that only read data.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            Self::LoadData | Self::Search | Self::SelectItem | Self::LoadMore | Self::Refresh
        )
    }

    /// The HTTP method an event maps to when the contract does not override it.
    pub fn default_method(self) -> HttpMethod {
        match self {
            Self::SaveNew => HttpMethod::Post,
            Self::SaveExisting => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
            Self::LoadData
            | Self::Search
            | Self::SelectItem
            | Self::LoadMore
            | Self::Refresh
            | Self::Create => HttpMethod::Get,
        }
    }
}

impl fmt::Display for ScreenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadData => "LOAD_DATA",
            Self::Search => "SEARCH",
            Self::SelectItem => "SELECT_ITEM",
            Self::LoadMore => "LOAD_MORE",
            Self::SaveNew => "SAVE_NEW",
            Self::SaveExisting => "SAVE_EXISTING",
            Self::Delete => "DELETE",
            Self::Refresh => "REFRESH",
            Self::Create => "CREATE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
