//! Frontend Models
//!
//! Template items, blocks and the transient records derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque item identifier, unique within a template
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Grouping compatibility key: the segment between the first and last `-`
/// of a compound type id, split once more into category and qualifier.
///
/// `item-scale-1` -> category `scale`, no qualifier.
/// `item-scale-agree-3` -> category `scale`, qualifier `agree`.
/// Ids with fewer than two `-` delimiters still yield a key (possibly empty),
/// so equality stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub category: String,
    pub qualifier: Option<String>,
}

impl TypeKey {
    pub fn parse(raw: &str) -> Self {
        let middle = middle_segment(raw);
        match middle.split_once('-') {
            Some((category, qualifier)) => TypeKey {
                category: category.to_string(),
                qualifier: Some(qualifier.to_string()),
            },
            None => TypeKey {
                category: middle.to_string(),
                qualifier: None,
            },
        }
    }
}

/// Text between the first and last `-`. A missing delimiter counts as
/// index 0 and reversed bounds are swapped.
fn middle_segment(raw: &str) -> &str {
    let start = raw.find('-').map_or(0, |i| i + 1);
    let end = raw.rfind('-').unwrap_or(0);
    if start <= end { &raw[start..end] } else { &raw[end..start] }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}-{}", self.category, q),
            None => f.write_str(&self.category),
        }
    }
}

/// Compound type id as delivered by the server, parsed once on ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemType {
    pub raw: String,
    /// `None` only when the server sent no type at all
    pub key: Option<TypeKey>,
}

impl ItemType {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = Some(TypeKey::parse(&raw));
        Self { raw, key }
    }

    /// Type of an entry that carried no type attribute
    pub fn missing() -> Self {
        Self { raw: String::new(), key: None }
    }

    pub fn is_missing(&self) -> bool {
        self.key.is_none()
    }

    /// Equality on the type key; reflexive and symmetric for every item
    pub fn groups_with(&self, other: &ItemType) -> bool {
        self.key == other.key
    }
}

/// Where an item lives in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    Standalone,
    ChildOf(ItemId),
}

/// A unit that may be displayed, reordered, or deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    pub id: ItemId,
    /// DOM-level row identity; unique within a block
    pub row_id: String,
    pub text: String,
    pub item_type: ItemType,
    /// Position among siblings; meaningful for top-level items and within a block
    pub display_order: u32,
    pub membership: Membership,
}

/// Parent item plus its ordered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub parent: TemplateItem,
    pub children: Vec<TemplateItem>,
}

impl Block {
    pub fn id(&self) -> &ItemId {
        &self.parent.id
    }
}

/// A row of the top-level list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelRow {
    Item(TemplateItem),
    Block(Block),
}

impl TopLevelRow {
    pub fn id(&self) -> &ItemId {
        match self {
            TopLevelRow::Item(item) => &item.id,
            TopLevelRow::Block(block) => block.id(),
        }
    }

    pub fn head(&self) -> &TemplateItem {
        match self {
            TopLevelRow::Item(item) => item,
            TopLevelRow::Block(block) => &block.parent,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            TopLevelRow::Block(block) => Some(block),
            TopLevelRow::Item(_) => None,
        }
    }
}

/// An item eligible to be added to a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupableCandidate {
    pub item_id: ItemId,
    pub row_id: String,
    /// 1-based label of the row in the top-level list
    pub row_number: usize,
    pub text: String,
    pub item_type: ItemType,
}

/// What a delete/ungroup action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    StandaloneItem,
    BlockChildItem,
    Block,
}

/// REST reference path a delete/ungroup action goes through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// `eval-templateitem`: delete-by-id
    TemplateItem,
    /// `eval-templateitem/unblock`: state-changing POST keyed by item id
    Unblock,
    /// Any other reference, deleted by id
    Other(String),
}

impl ItemRef {
    pub const TEMPLATE_ITEM: &'static str = "eval-templateitem";
    pub const UNBLOCK: &'static str = "eval-templateitem/unblock";

    pub fn parse(reference: &str) -> Self {
        match reference {
            Self::TEMPLATE_ITEM => ItemRef::TemplateItem,
            Self::UNBLOCK => ItemRef::Unblock,
            other => ItemRef::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ItemRef::TemplateItem => Self::TEMPLATE_ITEM,
            ItemRef::Unblock => Self::UNBLOCK,
            ItemRef::Other(s) => s,
        }
    }
}

/// A delete/ungroup action awaiting user confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub target: ItemId,
    pub kind: TargetKind,
    pub reference: ItemRef,
    /// Truncated preview of the item's text
    pub label: String,
}

impl PendingConfirmation {
    /// Block kinds read "ungroup", except a block child addressed through the
    /// plain item reference, which is a delete.
    pub fn is_ungroup(&self) -> bool {
        match self.kind {
            TargetKind::StandaloneItem => false,
            TargetKind::Block => true,
            TargetKind::BlockChildItem => self.reference != ItemRef::TemplateItem,
        }
    }
}

/// Inline, dismissible message shown after a workflow step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A guard rejected the action before any request
    Validation,
    /// The backend request failed
    Transport,
}

impl Notice {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Validation, message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Transport, message: message.into() }
    }
}

// ========================
// Wire Format
// ========================

/// Item list as delivered by the server (embedded in the page or returned
/// after a structural change)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSnapshot {
    pub template_id: String,
    /// Label of the "take evaluation" action
    #[serde(default)]
    pub begin_eval_label: Option<String>,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

/// One rendered row; identity fields may be missing on malformed input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub item_id: Option<String>,
    #[serde(default)]
    pub row_id: Option<String>,
    #[serde(default)]
    pub text: String,
    pub item_type: Option<String>,
    #[serde(default)]
    pub display_order: u32,
    /// Parent block id for block children
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub block_parent: bool,
}
