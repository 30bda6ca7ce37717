// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Translation core: tokenizer, namespace stack, model, parser and layout.

pub mod error;
pub mod layout;
pub mod line;
pub mod model;
pub mod namespace;
pub mod parser;
