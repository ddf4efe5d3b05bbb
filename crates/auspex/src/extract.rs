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

/// Locates the first balanced `{...}` object substring in free text.
/// Brace counting is string- and escape-aware so braces inside JSON
/// string values do not unbalance the scan.
pub fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let mut brace_count = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in content[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => brace_count += 1,
            '}' if !in_string => {
                brace_count -= 1;
                if brace_count == 0 {
                    return Some(&content[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_object_embedded_in_prose() {
        let content = "Here is the analysis:\n{\"queryType\": \"correlation\"}\nHope that helps!";
        assert_eq!(
            extract_json_object(content),
            Some(r#"{"queryType": "correlation"}"#)
        );
    }

    #[test]
    fn handles_nested_objects() {
        let content = r#"{"a": {"b": 1}, "c": 2} trailing"#;
        assert_eq!(extract_json_object(content), Some(r#"{"a": {"b": 1}, "c": 2}"#));
    }

    #[test]
    fn braces_inside_strings_do_not_unbalance() {
        let content = r#"{"note": "a { stray } brace", "x": 1}"#;
        assert_eq!(extract_json_object(content), Some(content));
    }

    #[test]
    fn escaped_quotes_stay_inside_strings() {
        let content = r#"{"quote": "she said \"hi\"", "n": 1}"#;
        assert_eq!(extract_json_object(content), Some(content));
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("unbalanced { forever"), None);
    }
}
