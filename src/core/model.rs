// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Structure/union model built by the parser and walked by the layout pass.
//!
//! Groups (structures, unions and the top-level document) live in one arena
//! and refer to each other by `GroupId`. Named structures are additionally
//! indexed by their namespace-qualified name in the registry.

use std::collections::BTreeMap;
use std::fmt;

/// Index of a group in the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Members laid out one after another.
    Structure,
    /// Members laid out over the same start address.
    Union,
}

#[derive(Debug, Clone)]
pub struct Group {
    kind: GroupKind,
    members: Vec<Item>,
}

impl Group {
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn members(&self) -> &[Item] {
        &self.members
    }
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(u64),
    /// Already namespace-qualified symbol reference.
    Symbol(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => f.write_str(&format_hex(*value)),
            Value::Symbol(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub comment: Option<String>,
    pub size: Option<u64>,
    /// Qualified registry name of the `.dstruct` target.
    pub structure: Option<String>,
    pub line: u32,
}

/// One parsed construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Text {
        comment: Option<String>,
    },
    /// `Some` enters a namespace, `None` leaves the innermost one.
    Namespace(Option<String>),
    /// `Some` starts a virtual region, `None` ends it.
    Address(Option<u64>),
    Skip {
        amount: u64,
        line: u32,
    },
    Assignment {
        name: String,
        value: Value,
        comment: Option<String>,
    },
    Member(Member),
    /// Anonymous structure or union nested in its parent.
    Group(GroupId),
}

/// Arena of groups plus the registry of named structures.
#[derive(Debug, Clone)]
pub struct Model {
    groups: Vec<Group>,
    registry: BTreeMap<String, GroupId>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            groups: vec![Group {
                kind: GroupKind::Structure,
                members: Vec::new(),
            }],
            registry: BTreeMap::new(),
        }
    }

    /// The top-level document group.
    pub fn document(&self) -> GroupId {
        GroupId(0)
    }

    pub fn add_group(&mut self, kind: GroupKind) -> GroupId {
        self.groups.push(Group {
            kind,
            members: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn push(&mut self, id: GroupId, item: Item) {
        self.groups[id.0].members.push(item);
    }

    /// Register a named structure. A later definition replaces an earlier one.
    pub fn register(&mut self, name: String, id: GroupId) -> Option<GroupId> {
        self.registry.insert(name, id)
    }

    pub fn lookup(&self, name: &str) -> Option<GroupId> {
        self.registry.get(name).copied()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

/// `$` followed by lowercase hex digits without leading zeros.
pub fn format_hex(value: u64) -> String {
    format!("${value:x}")
}

/// Parse `$`-prefixed hex or plain decimal.
pub fn parse_number(text: &str) -> Option<u64> {
    if let Some(hex) = text.strip_prefix('$') {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(hex, 16).ok()
    } else if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}
