use crate::state::section::SectionKind;

/// Name of the internal task-list tool. Tool sections whose content mentions
/// it are hidden; the task panel is fed by the push channel instead, so
/// showing the raw call would duplicate it.
pub const TASK_LIST_TOOL_MARKER: &str = "TodoWrite";

/// Pure decision: must this section be hidden entirely?
///
/// Only tool-call and tool-response sections are candidates. Stickiness is
/// the registry's job; this function looks at a single event's content.
pub fn should_suppress(kind: &SectionKind, content: &str) -> bool {
    kind.is_tool() && content.contains(TASK_LIST_TOOL_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppresses_task_list_tool_sections_only() {
        let call = SectionKind::classify("tool-calls-1");
        let response = SectionKind::classify("tool-responses-1");
        let payload = r#"{"name":"TodoWrite","todos":[]}"#;

        assert!(should_suppress(&call, payload));
        assert!(should_suppress(&response, payload));
        assert!(!should_suppress(&call, r#"{"name":"netgenerate"}"#));
    }

    #[test]
    fn test_marker_in_non_tool_sections_is_not_suppressed() {
        let think = SectionKind::classify("think");
        let answer = SectionKind::classify("answer");

        assert!(!should_suppress(&think, "I will call TodoWrite next"));
        assert!(!should_suppress(&answer, "I updated the list via TodoWrite"));
    }
}
