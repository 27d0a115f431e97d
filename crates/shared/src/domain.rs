use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiException;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Page sizes offered by the page-size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ItemsPerPage {
    #[default]
    Five,
    Ten,
    Twenty,
}

impl ItemsPerPage {
    pub const ALL: [ItemsPerPage; 3] = [ItemsPerPage::Five, ItemsPerPage::Ten, ItemsPerPage::Twenty];

    pub fn get(self) -> u32 {
        match self {
            ItemsPerPage::Five => 5,
            ItemsPerPage::Ten => 10,
            ItemsPerPage::Twenty => 20,
        }
    }
}

impl TryFrom<u32> for ItemsPerPage {
    type Error = ApiException;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(ItemsPerPage::Five),
            10 => Ok(ItemsPerPage::Ten),
            20 => Ok(ItemsPerPage::Twenty),
            other => Err(ApiException::validation(format!(
                "unsupported page size {other}; expected one of 5, 10, 20"
            ))),
        }
    }
}

impl From<ItemsPerPage> for u32 {
    fn from(value: ItemsPerPage) -> Self {
        value.get()
    }
}

impl fmt::Display for ItemsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    List,
    Cards,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(rename = "user_name")]
    pub display_name: String,
    pub is_active: bool,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: UserId(id.into()),
            display_name: display_name.into(),
            is_active,
        }
    }
}
