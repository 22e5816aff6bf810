//! Marker-based merging of regenerated documents with their previous version.
//!
//! Generated documents carry two kinds of delimited regions:
//!
//! ```text
//! <!-- knowlens:auto-start -->
//! (regenerated on every run)
//! <!-- knowlens:auto-end -->
//!
//! <!-- knowlens:user-start -->
//! (kept verbatim across runs)
//! <!-- knowlens:user-end -->
//! ```
//!
//! Everything outside a region is static text and always comes from the fresh
//! document. Splitting a document into sections and joining their contents with
//! `\n` reproduces it byte for byte.

use serde::Serialize;

pub const AUTO_START: &str = "<!-- knowlens:auto-start -->";
pub const AUTO_END: &str = "<!-- knowlens:auto-end -->";
pub const USER_START: &str = "<!-- knowlens:user-start -->";
pub const USER_END: &str = "<!-- knowlens:user-end -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Auto,
    User,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSection {
    pub section_type: SectionType,
    /// Raw lines of the section joined with `\n`, markers included
    pub content: String,
}

impl ContentSection {
    fn new(section_type: SectionType, lines: &[&str]) -> Self {
        Self {
            section_type,
            content: lines.join("\n"),
        }
    }
}

/// Split a document into auto, user and static sections in a single pass.
///
/// End markers that do not close the current section are ordinary text, so
/// unbalanced or nested markers degrade to static content instead of failing.
pub fn parse_sections(doc: &str) -> Vec<ContentSection> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_type = SectionType::Static;

    for line in doc.split('\n') {
        let trimmed = line.trim();

        let opens = match trimmed {
            AUTO_START => Some(SectionType::Auto),
            USER_START => Some(SectionType::User),
            _ => None,
        };
        if let Some(section_type) = opens {
            if !current.is_empty() {
                sections.push(ContentSection::new(current_type, &current));
                current.clear();
            }
            current.push(line);
            current_type = section_type;
            continue;
        }

        let closes = (trimmed == AUTO_END && current_type == SectionType::Auto)
            || (trimmed == USER_END && current_type == SectionType::User);
        if closes {
            current.push(line);
            sections.push(ContentSection::new(current_type, &current));
            current.clear();
            current_type = SectionType::Static;
            continue;
        }

        current.push(line);
    }

    if !current.is_empty() {
        sections.push(ContentSection::new(current_type, &current));
    }

    sections
}

/// Contents of every user section, markers included, in document order
pub fn extract_user_sections(doc: &str) -> Vec<String> {
    parse_sections(doc)
        .into_iter()
        .filter(|s| s.section_type == SectionType::User)
        .map(|s| s.content)
        .collect()
}

/// Merge a freshly rendered document with the existing one.
///
/// The n-th user section of `new_doc` is replaced by the n-th user section of
/// `existing_doc`. Pairing is positional; surplus sections on either side are
/// left alone. Auto and static sections always come from `new_doc`.
pub fn merge_content(new_doc: &str, existing_doc: &str) -> String {
    if existing_doc.trim().is_empty() {
        return new_doc.to_string();
    }

    let preserved = extract_user_sections(existing_doc);
    if preserved.is_empty() {
        return new_doc.to_string();
    }

    let mut preserved = preserved.into_iter();
    parse_sections(new_doc)
        .into_iter()
        .map(|section| match section.section_type {
            SectionType::User => preserved.next().unwrap_or(section.content),
            _ => section.content,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap `body` in auto markers
pub fn auto_section(body: &str) -> String {
    format!("{}\n{}\n{}", AUTO_START, body, AUTO_END)
}

/// Wrap `body` in user markers
pub fn user_section(body: &str) -> String {
    format!("{}\n{}\n{}", USER_START, body, USER_END)
}
