//! Doc comment model and `@tag` parsing.
//!
//! Doc comments are read from `///` lines. Text before the first tag is the summary.
//! A line starting with `@` opens a tag; following lines without `@` continue it:
//!
//! ```text
//! /// Lists users of a team.
//! ///
//! /// @param team_id {long} the owning team
//! /// @author jane
//! ```

use serde::{Deserialize, Serialize};

/// A parsed doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    /// Free text before the first tag
    pub summary: String,
    /// Tags in source order
    pub tags: Vec<DocTag>,
}

/// A structured `@name ...` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTag {
    /// Tag name without the `@`
    pub name: String,
    /// Parameter name, for `@param` tags
    pub param: Option<String>,
    /// Type written in braces, for `@param name {type}` tags
    pub type_hint: Option<String>,
    /// Remaining text of the tag
    pub content: String,
}

impl DocComment {
    /// Parses doc comment lines. Returns `None` when there are no lines at all.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }

        let mut summary_lines: Vec<&str> = Vec::new();
        let mut tags: Vec<(DocTag, Vec<String>)> = Vec::new();

        for line in lines {
            let trimmed = line.as_ref().trim();
            if let Some(rest) = trimmed.strip_prefix('@') {
                tags.push((Self::parse_tag(rest), Vec::new()));
            } else if let Some((_, continuation)) = tags.last_mut() {
                continuation.push(trimmed.to_string());
            } else {
                summary_lines.push(trimmed);
            }
        }

        let tags = tags
            .into_iter()
            .map(|(mut tag, continuation)| {
                for line in continuation.iter().filter(|l| !l.is_empty()) {
                    if !tag.content.is_empty() {
                        tag.content.push('\n');
                    }
                    tag.content.push_str(line);
                }
                tag
            })
            .collect();

        Some(Self {
            summary: summary_lines.join("\n").trim().to_string(),
            tags,
        })
    }

    /// First tag with the given name (case-insensitive)
    pub fn tag(&self, name: &str) -> Option<&DocTag> {
        self.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// The `@param` tag for a parameter
    pub fn param_tag(&self, param: &str) -> Option<&DocTag> {
        self.tags
            .iter()
            .find(|t| t.name == "param" && t.param.as_deref() == Some(param))
    }

    fn parse_tag(rest: &str) -> DocTag {
        let (name, body) = split_word(rest);
        let mut tag = DocTag {
            name: name.to_string(),
            param: None,
            type_hint: None,
            content: String::new(),
        };

        if name != "param" {
            tag.content = body.trim().to_string();
            return tag;
        }

        // Accept both `@param name {type} text` and `@param {type} name text`
        let mut body = body.trim_start();
        if let Some((hint, after)) = split_type_hint(body) {
            tag.type_hint = Some(hint);
            body = after;
        }
        let (param, after) = split_word(body);
        if !param.is_empty() {
            tag.param = Some(param.to_string());
        }
        body = after.trim_start();
        if tag.type_hint.is_none() {
            if let Some((hint, after)) = split_type_hint(body) {
                tag.type_hint = Some(hint);
                body = after;
            }
        }
        tag.content = body.trim().to_string();
        tag
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    }
}

/// Reads a `{type}` prefix, respecting nested braces.
fn split_type_hint(text: &str) -> Option<(String, &str)> {
    let inner = text.strip_prefix('{')?;
    let mut depth = 1usize;
    for (pos, ch) in inner.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let hint = inner[..pos].trim().to_string();
                    return Some((hint, inner[pos + 1..].trim_start()));
                }
            }
            _ => {}
        }
    }
    None
}
