// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod daemon;
pub mod lock;
pub mod reboot;
pub mod send_need_reboot;
pub mod set_max;
pub mod status;
