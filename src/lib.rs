// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Library entry exposing the converter modules.
pub mod cli;
pub mod convert;
pub mod core;
