/// Section kind, derived from the leading token of a section id.
///
/// The producer names sections `think`, `tool-calls`, `tool-responses`,
/// `answer`, appending `-N` when a kind repeats within a turn. Anything
/// else renders generically under its own token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Think,
    ToolCalls,
    ToolResponses,
    Answer,
    Other(String),
}

impl SectionKind {
    pub fn classify(section_id: &str) -> Self {
        if section_id.starts_with("think") {
            SectionKind::Think
        } else if section_id.starts_with("tool-responses") {
            SectionKind::ToolResponses
        } else if section_id.starts_with("tool-calls") {
            SectionKind::ToolCalls
        } else if section_id.starts_with("answer") {
            SectionKind::Answer
        } else {
            SectionKind::Other(kind_token(section_id).to_string())
        }
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, SectionKind::ToolCalls | SectionKind::ToolResponses)
    }

    pub fn label(&self) -> &str {
        match self {
            SectionKind::Think => "Thinking",
            SectionKind::ToolCalls => "Tool Call",
            SectionKind::ToolResponses => "Tool Response",
            SectionKind::Answer => "Answer",
            SectionKind::Other(token) => token,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SectionKind::Think => "…",
            SectionKind::ToolCalls => "→",
            SectionKind::ToolResponses => "←",
            SectionKind::Answer => "●",
            SectionKind::Other(_) => "•",
        }
    }
}

/// Strips the trailing `-N` occurrence counter, leaving the kind token.
fn kind_token(section_id: &str) -> &str {
    match section_id.rsplit_once('-') {
        Some((token, suffix)) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) => {
            token
        }
        _ => section_id,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLifecycle {
    /// Referenced but not yet painted; no render node exists.
    Pending,
    /// Render node created; content may still be arriving.
    Materialized,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub kind: SectionKind,
    pub lifecycle: SectionLifecycle,
    pub content: String,
    /// Presentation default for `think` sections: flips on the first
    /// non-whitespace content and stays set.
    pub expanded: bool,
}

impl Section {
    pub fn pending(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: SectionKind::classify(id),
            lifecycle: SectionLifecycle::Pending,
            content: String::new(),
            expanded: false,
        }
    }
}
