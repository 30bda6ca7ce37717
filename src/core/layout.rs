// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Layout simulation and symbol emission.
//!
//! Groups are walked with an explicit frame stack. A structure threads the
//! address cursor through its members; a union starts every member at its
//! entry address and ends at the furthest member end. `.dstruct`
//! instantiations enter the member's namespace for the duration of the
//! referenced structure and are tracked on the instantiation path, so a
//! structure that (directly or indirectly) contains itself is reported
//! instead of expanded.

use crate::core::error::{ConvErrorKind, Diagnostics};
use crate::core::model::{GroupId, GroupKind, Item, Member, Model, format_hex};
use crate::core::namespace::NamespaceStack;

/// Current address, `None` outside any virtual region.
pub type Cursor = Option<u64>;

#[derive(Debug)]
struct Frame {
    group: GroupId,
    kind: GroupKind,
    next: usize,
    entry: Cursor,
    /// Running cursor for structures, furthest end for unions.
    cursor: Cursor,
    /// Set when the frame instantiates a `.dstruct` member.
    instance: bool,
}

impl Frame {
    fn new(group: GroupId, kind: GroupKind, start: Cursor, instance: bool) -> Self {
        Self {
            group,
            kind,
            next: 0,
            entry: start,
            cursor: start,
            instance,
        }
    }

    fn child_start(&self) -> Cursor {
        match self.kind {
            GroupKind::Structure => self.cursor,
            GroupKind::Union => self.entry,
        }
    }

    fn complete_child(&mut self, end: Cursor) {
        self.cursor = match self.kind {
            GroupKind::Structure => end,
            GroupKind::Union => furthest(self.cursor, end),
        };
    }
}

fn furthest(left: Cursor, right: Cursor) -> Cursor {
    match (left, right) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Walks the model and renders `symbol = offset` lines.
pub struct LayoutEmitter<'a> {
    model: &'a Model,
    namespace: NamespaceStack,
    out: String,
    symbols: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> LayoutEmitter<'a> {
    pub fn new(model: &'a Model, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            model,
            namespace: NamespaceStack::new(),
            out: String::new(),
            symbols: 0,
            diagnostics,
        }
    }

    /// Emit the top-level document starting outside any virtual region.
    pub fn emit_document(&mut self) -> Cursor {
        self.namespace.clear();
        self.emit_group(self.model.document(), None)
    }

    /// Emit a registered structure at `start` under a fresh namespace.
    /// A missing structure is recorded and nothing is emitted.
    pub fn emit_named(&mut self, namespace: &str, key: &str, start: u64) -> Cursor {
        self.namespace.clear();
        let Some(id) = self.model.lookup(key) else {
            self.diagnostics.error(
                None,
                ConvErrorKind::Symbol,
                format!("missing structure '{key}'"),
            );
            return None;
        };
        self.namespace.enter(namespace);
        let end = self.emit_group(id, Some(start));
        self.namespace.clear();
        end
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn symbols(&self) -> usize {
        self.symbols
    }

    pub fn into_output(self) -> (String, usize) {
        (self.out, self.symbols)
    }

    /// Lay out one group starting at `start` and return its end cursor.
    pub fn emit_group(&mut self, id: GroupId, start: Cursor) -> Cursor {
        let model = self.model;
        let mut stack = vec![Frame::new(id, model.group(id).kind(), start, false)];
        let mut path = vec![id];
        let mut end = start;

        while let Some(frame) = stack.last_mut() {
            let Some(item) = model.group(frame.group).members().get(frame.next) else {
                let finished_end = frame.cursor;
                let finished_instance = frame.instance;
                stack.pop();
                if finished_instance {
                    self.namespace.leave();
                    path.pop();
                }
                match stack.last_mut() {
                    Some(parent) => parent.complete_child(finished_end),
                    None => end = finished_end,
                }
                continue;
            };
            frame.next += 1;
            let at = frame.child_start();

            match item {
                Item::Text { comment } => {
                    self.emit_line(comment.as_deref().unwrap_or(""));
                    frame.complete_child(at);
                }
                Item::Namespace(Some(name)) => {
                    self.namespace.enter(name);
                    frame.complete_child(at);
                }
                Item::Namespace(None) => {
                    self.namespace.leave();
                    frame.complete_child(at);
                }
                Item::Address(address) => frame.complete_child(*address),
                Item::Skip { amount, line } => {
                    let next = self.skip(at, *amount, *line);
                    frame.complete_child(next);
                }
                Item::Assignment {
                    name,
                    value,
                    comment,
                } => {
                    self.emit_assignment(name, &value.to_string(), comment.as_deref());
                    frame.complete_child(at);
                }
                Item::Group(child) => {
                    let kind = model.group(*child).kind();
                    stack.push(Frame::new(*child, kind, at, false));
                }
                Item::Member(member) => match &member.structure {
                    None => {
                        let next = self.scalar_member(member, at);
                        frame.complete_child(next);
                    }
                    Some(name) => match self.resolve(member, name, at, &path) {
                        Some(target) => {
                            self.namespace.enter(&member.name);
                            path.push(target);
                            let kind = model.group(target).kind();
                            stack.push(Frame::new(target, kind, at, true));
                        }
                        None => frame.complete_child(at),
                    },
                },
            }
        }
        end
    }

    fn skip(&mut self, at: Cursor, amount: u64, line: u32) -> Cursor {
        let Some(address) = at else {
            self.diagnostics.error(
                Some(line),
                ConvErrorKind::Layout,
                "skip outside virtual region",
            );
            return None;
        };
        self.advance(address, amount, line)
    }

    fn scalar_member(&mut self, member: &Member, at: Cursor) -> Cursor {
        let Some(address) = at else {
            self.member_outside_virtual(member);
            return None;
        };
        self.emit_assignment(
            &member.name,
            &format_hex(address),
            member.comment.as_deref(),
        );
        match member.size {
            Some(size) => self.advance(address, size, member.line),
            None => {
                let qualified = self.namespace.qualify(&member.name);
                self.diagnostics.error(
                    Some(member.line),
                    ConvErrorKind::Layout,
                    format!("no size or struct given for {qualified}"),
                );
                at
            }
        }
    }

    /// Find the structure a `.dstruct` member expands to. Returns `None`
    /// after recording why it cannot be expanded.
    fn resolve(
        &mut self,
        member: &Member,
        name: &str,
        at: Cursor,
        path: &[GroupId],
    ) -> Option<GroupId> {
        if at.is_none() {
            self.member_outside_virtual(member);
            return None;
        }
        let Some(target) = self.model.lookup(name) else {
            self.diagnostics.error(
                Some(member.line),
                ConvErrorKind::Symbol,
                format!("unknown struct '{name}'"),
            );
            return None;
        };
        if path.contains(&target) {
            self.diagnostics.error(
                Some(member.line),
                ConvErrorKind::Symbol,
                format!("recursive struct '{name}'"),
            );
            return None;
        }
        Some(target)
    }

    fn member_outside_virtual(&mut self, member: &Member) {
        self.diagnostics.error(
            Some(member.line),
            ConvErrorKind::Layout,
            "member outside of virtual",
        );
    }

    fn advance(&mut self, address: u64, amount: u64, line: u32) -> Cursor {
        let next = address.checked_add(amount);
        if next.is_none() {
            self.diagnostics
                .error(Some(line), ConvErrorKind::Layout, "address overflow");
        }
        next
    }

    fn emit_assignment(&mut self, name: &str, value: &str, comment: Option<&str>) {
        let mut line = format!("{}{name} = {value}", self.namespace.prefix());
        if let Some(comment) = comment {
            line.push_str("  ");
            line.push_str(comment);
        }
        self.emit_line(&line);
        self.symbols += 1;
    }

    fn emit_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }
}
