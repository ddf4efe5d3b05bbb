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

use serde::{Deserialize, Serialize};

/// Reasoning-service reply envelope: either a message whose first text
/// block carries the JSON payload, or an error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReasonerReply {
    Message { content: Vec<ContentBlock> },
    Error { error: ReplyError },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ReasonerReply {
    /// The body of the first text block, if this is a successful message.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            ReasonerReply::Message { content } => content.iter().map(|block| {
                let ContentBlock::Text { text } = block;
                text.as_str()
            }).next(),
            ReasonerReply::Error { .. } => None,
        }
    }
}
