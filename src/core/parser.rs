// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Directive parser: builds the document and the structure registry from
//! tokenized lines in one pass.
//!
//! Dispatch is by word count first and keyword position second. Text,
//! namespace, virtual-region and skip items always go to the top-level
//! document; assignments, members and anonymous groups go to the innermost
//! open scope. Named structures are registered but not placed in their
//! enclosing scope.

use crate::core::error::{ConvErrorKind, Diagnostics};
use crate::core::line::Line;
use crate::core::model::{GroupId, GroupKind, Item, Member, Model, Value, parse_number};
use crate::core::namespace::NamespaceStack;

/// Parse all lines into a model. Problems are recorded in `diagnostics`; the
/// parse always runs to the end of input.
pub fn parse_lines(lines: &[Line], diagnostics: &mut Diagnostics) -> Model {
    let mut parser = DirectiveParser::new(diagnostics);
    for (idx, line) in lines.iter().enumerate() {
        parser.process_line(line, idx as u32 + 1);
    }
    parser.finish()
}

pub struct DirectiveParser<'a> {
    model: Model,
    namespace: NamespaceStack,
    scopes: Vec<GroupId>,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> DirectiveParser<'a> {
    pub fn new(diagnostics: &'a mut Diagnostics) -> Self {
        let model = Model::new();
        let document = model.document();
        Self {
            model,
            namespace: NamespaceStack::new(),
            scopes: vec![document],
            diagnostics,
        }
    }

    pub fn namespace(&self) -> &NamespaceStack {
        &self.namespace
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn process_line(&mut self, line: &Line, line_num: u32) {
        match line.words() {
            [] => self.push_document(Item::Text {
                comment: line.comment().map(str::to_string),
            }),
            [word] => self.one_word(word, line, line_num),
            [first, second] => self.two_words(first, second, line, line_num),
            [first, second, third] => self.three_words(first, second, third, line, line_num),
            _ => self.unrecognized(line, line_num),
        }
    }

    /// Check end-of-input invariants and hand back the model.
    pub fn finish(self) -> Model {
        if self.scopes.len() != 1 {
            self.diagnostics
                .error(None, ConvErrorKind::Scope, "unclosed struct/union");
        }
        if !self.namespace.is_empty() {
            self.diagnostics
                .error(None, ConvErrorKind::Scope, "unclosed namespace");
        }
        self.model
    }

    fn one_word(&mut self, word: &str, line: &Line, line_num: u32) {
        match word {
            ".endn" => {
                if self.namespace.leave() {
                    self.push_document(Item::Namespace(None));
                } else {
                    self.scope_error(line_num, "'.endn' outside namespace");
                }
            }
            ".endv" => self.push_document(Item::Address(None)),
            ".ends" => {
                self.close_scope(GroupKind::Structure, line_num, "'.ends' outside structure")
            }
            ".endu" => self.close_scope(GroupKind::Union, line_num, "'.endu' outside union"),
            ".struct" => self.open_anonymous(GroupKind::Structure),
            ".union" => self.open_anonymous(GroupKind::Union),
            _ => self.unrecognized(line, line_num),
        }
    }

    fn two_words(&mut self, first: &str, second: &str, line: &Line, line_num: u32) {
        match (first, second) {
            (name, ".namespace") => {
                self.namespace.enter(name);
                self.push_document(Item::Namespace(Some(name.to_string())));
            }
            (".virtual", address) => {
                if let Some(address) = self.number(address, line_num) {
                    self.push_document(Item::Address(Some(address)));
                }
            }
            (name, ".struct") => {
                let id = self.model.add_group(GroupKind::Structure);
                self.model.register(self.namespace.qualify(name), id);
                self.scopes.push(id);
            }
            (".word", _) => self.push_document(Item::Skip {
                amount: 2,
                line: line_num,
            }),
            (".fill", amount) => {
                if let Some(amount) = self.number(amount, line_num) {
                    self.push_document(Item::Skip {
                        amount,
                        line: line_num,
                    });
                }
            }
            (_, ".ends") => {
                if self.scopes.len() == 1 {
                    self.scope_error(line_num, "'.ends' outside structure");
                } else {
                    self.scopes.pop();
                }
            }
            _ => self.unrecognized(line, line_num),
        }
    }

    fn three_words(&mut self, first: &str, second: &str, third: &str, line: &Line, line_num: u32) {
        let comment = line.comment().map(str::to_string);
        match second {
            "=" => {
                let value = if is_literal(third) {
                    match self.number(third, line_num) {
                        Some(value) => Value::Number(value),
                        None => return,
                    }
                } else {
                    Value::Symbol(self.namespace.qualify(&third.replace('.', "_")))
                };
                self.push_scope(Item::Assignment {
                    name: first.to_string(),
                    value,
                    comment,
                });
            }
            ".byte" => self.add_member(first, comment, Some(1), None, line_num),
            ".word" => self.add_member(first, comment, Some(2), None, line_num),
            ".dword" => self.add_member(first, comment, Some(4), None, line_num),
            ".fill" => {
                if let Some(size) = self.number(third, line_num) {
                    self.add_member(first, comment, Some(size), None, line_num);
                }
            }
            ".dstruct" => {
                let name = if third.contains('.') {
                    third.replace('.', "_")
                } else {
                    self.namespace.qualify(third)
                };
                self.add_member(first, comment, None, Some(name), line_num);
            }
            _ => self.unrecognized(line, line_num),
        }
    }

    fn add_member(
        &mut self,
        name: &str,
        comment: Option<String>,
        size: Option<u64>,
        structure: Option<String>,
        line_num: u32,
    ) {
        self.push_scope(Item::Member(Member {
            name: name.to_string(),
            comment,
            size,
            structure,
            line: line_num,
        }));
    }

    fn open_anonymous(&mut self, kind: GroupKind) {
        let id = self.model.add_group(kind);
        self.push_scope(Item::Group(id));
        self.scopes.push(id);
    }

    fn close_scope(&mut self, kind: GroupKind, line_num: u32, message: &str) {
        let top = self.current_scope();
        if self.scopes.len() == 1 || self.model.group(top).kind() != kind {
            self.scope_error(line_num, message);
        } else {
            self.scopes.pop();
        }
    }

    fn current_scope(&self) -> GroupId {
        self.scopes
            .last()
            .copied()
            .unwrap_or_else(|| self.model.document())
    }

    fn push_scope(&mut self, item: Item) {
        let scope = self.current_scope();
        self.model.push(scope, item);
    }

    fn push_document(&mut self, item: Item) {
        let document = self.model.document();
        self.model.push(document, item);
    }

    fn number(&mut self, text: &str, line_num: u32) -> Option<u64> {
        let value = parse_number(text);
        if value.is_none() {
            self.diagnostics.error(
                Some(line_num),
                ConvErrorKind::Number,
                format!("invalid number '{text}'"),
            );
        }
        value
    }

    fn scope_error(&mut self, line_num: u32, message: &str) {
        self.diagnostics
            .error(Some(line_num), ConvErrorKind::Scope, message);
    }

    fn unrecognized(&mut self, line: &Line, line_num: u32) {
        self.diagnostics.error(
            Some(line_num),
            ConvErrorKind::Directive,
            format!("unrecognized line '{}'", line.text()),
        );
    }
}

/// Assignment values that are numbers rather than symbol references.
fn is_literal(value: &str) -> bool {
    value.starts_with('$') || (!value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::line::tokenize;

    fn parse(source: &str) -> (Model, Diagnostics) {
        let mut diags = Diagnostics::new("test.asm");
        let model = parse_lines(&tokenize(source), &mut diags);
        (model, diags)
    }

    fn messages(diags: &Diagnostics) -> Vec<String> {
        diags.entries().iter().map(|d| d.format()).collect()
    }

    fn document(model: &Model) -> &[Item] {
        model.group(model.document()).members()
    }

    #[test]
    fn blank_and_comment_lines_become_text() {
        let (model, diags) = parse("\n; hello\n");
        assert!(!diags.has_errors());
        assert_eq!(
            document(&model),
            [
                Item::Text { comment: None },
                Item::Text {
                    comment: Some("; hello".into())
                },
            ]
        );
    }

    #[test]
    fn named_struct_is_registered_with_namespace_and_not_placed() {
        let (model, diags) = parse(
            "kernel .namespace\n\
             hdr .struct\n\
             len .fill 4\n\
             .ends\n\
             .endn\n",
        );
        assert!(!diags.has_errors(), "{:?}", messages(&diags));
        let id = model.lookup("kernel_hdr").expect("registered");
        assert_eq!(
            model.group(id).members(),
            [Item::Member(Member {
                name: "len".into(),
                comment: None,
                size: Some(4),
                structure: None,
                line: 3,
            })]
        );
        assert_eq!(
            document(&model),
            [
                Item::Namespace(Some("kernel".into())),
                Item::Namespace(None),
            ]
        );
    }

    #[test]
    fn scalar_member_sizes() {
        let (model, diags) = parse(
            "s .struct\n\
             a .byte ?\n\
             b .word ?  ; two\n\
             c .dword ?\n\
             d .fill $10\n\
             s .ends\n",
        );
        assert!(!diags.has_errors());
        let id = model.lookup("s").expect("registered");
        let sizes: Vec<Option<u64>> = model
            .group(id)
            .members()
            .iter()
            .map(|item| match item {
                Item::Member(member) => member.size,
                other => panic!("unexpected item {other:?}"),
            })
            .collect();
        assert_eq!(sizes, [Some(1), Some(2), Some(4), Some(16)]);
        let Item::Member(b) = &model.group(id).members()[1] else {
            panic!("expected member");
        };
        assert_eq!(b.comment.as_deref(), Some("; two"));
    }

    #[test]
    fn anonymous_union_nests_in_current_scope() {
        let (model, diags) = parse(
            "ev .struct\n\
             .union\n\
             a .byte ?\n\
             b .word ?\n\
             .endu\n\
             .ends\n",
        );
        assert!(!diags.has_errors());
        let id = model.lookup("ev").expect("registered");
        let [Item::Group(inner)] = model.group(id).members() else {
            panic!("expected nested union");
        };
        assert_eq!(model.group(*inner).kind(), GroupKind::Union);
        assert_eq!(model.group(*inner).members().len(), 2);
    }

    #[test]
    fn assignment_values() {
        let (model, diags) = parse(
            "ns .namespace\n\
             a = 10\n\
             b = $FF\n\
             c = other.thing\n\
             .endn\n",
        );
        assert!(!diags.has_errors());
        let values: Vec<&Value> = document(&model)
            .iter()
            .filter_map(|item| match item {
                Item::Assignment { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            [
                &Value::Number(10),
                &Value::Number(255),
                &Value::Symbol("ns_other_thing".into()),
            ]
        );
    }

    #[test]
    fn dstruct_reference_qualification() {
        let (model, _) = parse(
            "k .namespace\n\
             s .struct\n\
             a .dstruct local\n\
             b .dstruct other.remote\n\
             .ends\n\
             .endn\n",
        );
        let id = model.lookup("k_s").expect("registered");
        let refs: Vec<&str> = model
            .group(id)
            .members()
            .iter()
            .filter_map(|item| match item {
                Item::Member(member) => member.structure.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(refs, ["k_local", "other_remote"]);
    }

    #[test]
    fn skip_forms_and_virtual() {
        let (model, diags) = parse(".virtual $100\n.word x\n.fill 3\n.endv\n.virtual 16\n");
        assert!(!diags.has_errors());
        assert_eq!(
            document(&model),
            [
                Item::Address(Some(0x100)),
                Item::Skip { amount: 2, line: 2 },
                Item::Skip { amount: 3, line: 3 },
                Item::Address(None),
                Item::Address(Some(16)),
            ]
        );
    }

    #[test]
    fn unrecognized_lines_report_text_and_line() {
        let (_, diags) = parse("\nfoo\na b\na b c\na b c d\n");
        assert_eq!(
            messages(&diags),
            [
                "test.asm:2: unrecognized line 'foo'",
                "test.asm:3: unrecognized line 'a b'",
                "test.asm:4: unrecognized line 'a b c'",
                "test.asm:5: unrecognized line 'a b c d'",
            ]
        );
    }

    #[test]
    fn close_mismatches_are_reported_and_parse_continues() {
        let (_, diags) = parse(".ends\n.endu\n.endn\n.union\n.ends\n.endu\nx .ends\n");
        assert_eq!(
            messages(&diags),
            [
                "test.asm:1: '.ends' outside structure",
                "test.asm:2: '.endu' outside union",
                "test.asm:3: '.endn' outside namespace",
                "test.asm:5: '.ends' outside structure",
                "test.asm:7: '.ends' outside structure",
            ]
        );
    }

    #[test]
    fn named_close_pops_any_scope() {
        let (_, diags) = parse(".union\nu .ends\n");
        assert!(!diags.has_errors());
    }

    #[test]
    fn unclosed_scopes_are_reported_without_line() {
        let (_, diags) = parse("ns .namespace\ns .struct\n");
        assert_eq!(
            messages(&diags),
            ["test.asm: unclosed struct/union", "test.asm: unclosed namespace"]
        );
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let (model, diags) = parse(".virtual $zz\nx .fill lots\n.fill -1\ny = $g\n");
        assert_eq!(
            messages(&diags),
            [
                "test.asm:1: invalid number '$zz'",
                "test.asm:2: invalid number 'lots'",
                "test.asm:3: invalid number '-1'",
                "test.asm:4: invalid number '$g'",
            ]
        );
        assert!(document(&model).is_empty());
    }

    #[test]
    fn comments_inside_structure_go_to_document() {
        let (model, _) = parse("s .struct\n; inside\na .byte ?\n.ends\n");
        assert_eq!(
            document(&model),
            [Item::Text {
                comment: Some("; inside".into())
            }]
        );
    }

    #[test]
    fn parser_state_tracks_open_scopes_line_by_line() {
        let mut diags = Diagnostics::new("test.asm");
        let lines = tokenize("kernel .namespace
hdr .struct
.union
.endu
.ends
.endn
");
        let mut parser = DirectiveParser::new(&mut diags);
        let mut seen = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            parser.process_line(line, idx as u32 + 1);
            seen.push((parser.namespace().prefix(), parser.scope_depth()));
        }
        let model = parser.finish();
        assert_eq!(
            seen,
            [
                ("kernel_".to_string(), 1),
                ("kernel_".to_string(), 2),
                ("kernel_".to_string(), 3),
                ("kernel_".to_string(), 2),
                ("kernel_".to_string(), 1),
                (String::new(), 1),
            ]
        );
        assert!(model.lookup("kernel_hdr").is_some());
        assert!(!diags.has_errors());
    }
}
