// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Wire contract shared between the query analyzer and the external
//! text-reasoning service. Serialization types only; no I/O lives here.

pub mod requests;
pub mod responses;

pub use requests::{Message, ReasonerRequest};
pub use responses::{ContentBlock, ReasonerReply, ReplyError};

/// Reply error kinds that permit exactly one escalation to the fallback
/// model. Any other kind is fatal immediately.
pub const RETRIABLE_ERROR_KINDS: [&str; 2] = ["invalid_request_error", "model_not_found"];

/// Whether a reply error kind allows the primary -> fallback transition.
pub fn is_retriable_error_kind(kind: &str) -> bool {
    RETRIABLE_ERROR_KINDS.contains(&kind)
}
