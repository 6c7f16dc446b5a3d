//! Abstract display items handed to the UI layer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize, Serializer};

use super::Amount;

/// Translation key plus named parameters; resolved to text by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringKey {
    pub key: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl StringKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

impl From<&str> for StringKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DisplayText {
    Plain(String),
    Key(StringKey),
    /// Placeholder for a value that a later enrichment pass fills in.
    Pending,
}

impl From<String> for DisplayText {
    fn from(text: String) -> Self {
        DisplayText::Plain(text)
    }
}

/// Leaf value with an icon, a text and a describing label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub icon: String,
    pub text: DisplayText,
    pub description: StringKey,
}

impl DisplayItem {
    pub fn new(
        icon: impl Into<String>,
        text: impl Into<DisplayText>,
        description: impl Into<StringKey>,
    ) -> Self {
        Self {
            id: None,
            icon: icon.into(),
            text: text.into(),
            description: description.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertColor {
    Warning,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: StringKey,
    pub description: StringKey,
    pub icon: String,
    pub color: AlertColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub index: u64,
    pub amount: Amount,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub display_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardList {
    pub rewards: Vec<RewardRecord>,
    pub index_col_label: StringKey,
    pub amount_col_label: StringKey,
    pub payout_col_label: StringKey,
}

/// Lightweight row for delegatee selection lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateeSummary {
    pub address: String,
    pub header: [String; 2],
    pub description: [String; 2],
}

/// Second-stage update of a display list: `Some` replaces the item with the same id (or
/// appends it), `None` removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUpdate {
    pub id: String,
    pub item: Option<DisplayItem>,
}

impl DisplayUpdate {
    pub fn replace(id: impl Into<String>, item: Option<DisplayItem>) -> Self {
        let id = id.into();
        Self {
            item: item.map(|item| item.with_id(id.clone())),
            id,
        }
    }
}

#[derive(Debug, Default)]
struct Versioned {
    version: u64,
    items: Arc<Vec<DisplayItem>>,
}

/// Copy-on-write list of display items.
///
/// Clones share the same storage, so an update applied after the owning result was handed
/// out is visible to every holder. Readers always get a complete snapshot; writers build a
/// new vector and swap it in under the write lock, bumping the version.
#[derive(Clone, Default)]
pub struct DisplayList {
    inner: Arc<RwLock<Versioned>>,
}

impl DisplayList {
    pub fn new(items: Vec<DisplayItem>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Versioned {
                version: 0,
                items: Arc::new(items),
            })),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<DisplayItem>> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard.items)
    }

    pub fn version(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn find(&self, id: &str) -> Option<DisplayItem> {
        self.snapshot().iter().find(|item| item.has_id(id)).cloned()
    }

    /// Applies all updates as one swap and returns the new version.
    pub fn apply<I: IntoIterator<Item = DisplayUpdate>>(&self, updates: I) -> u64 {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut items = guard.items.as_ref().clone();
        for update in updates {
            let position = items.iter().position(|item| item.has_id(&update.id));
            match (position, update.item) {
                (Some(index), Some(item)) => items[index] = item,
                (None, Some(item)) => items.push(item),
                (Some(index), None) => {
                    items.remove(index);
                }
                (None, None) => {}
            }
        }
        guard.items = Arc::new(items);
        guard.version += 1;
        guard.version
    }

    /// Replaces only the text of the item with `id`. Returns false when no such item exists.
    pub fn set_text(&self, id: &str, text: DisplayText) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = guard.items.iter().position(|item| item.has_id(id)) else {
            return false;
        };
        let mut items = guard.items.as_ref().clone();
        items[index].text = text;
        guard.items = Arc::new(items);
        guard.version += 1;
        true
    }
}

impl From<Vec<DisplayItem>> for DisplayList {
    fn from(items: Vec<DisplayItem>) -> Self {
        Self::new(items)
    }
}

impl PartialEq for DisplayList {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot() == other.snapshot()
    }
}

impl fmt::Debug for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot().iter()).finish()
    }
}

impl Serialize for DisplayList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().as_ref().serialize(serializer)
    }
}
