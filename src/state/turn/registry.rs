use super::state::TurnState;
use super::suppress::should_suppress;
use crate::state::section::{Section, SectionKind, SectionLifecycle};
use crate::types::WireEvent;
use crate::ui::surface::RenderSurface;
use std::collections::hash_map::Entry;

impl TurnState {
    /// Feed one decoded stream event through suppression, lifecycle, and
    /// painting, in that order. Events are applied strictly in arrival
    /// order by the single active turn invocation.
    pub fn apply(&mut self, event: WireEvent, surface: &mut dyn RenderSurface) {
        match event {
            WireEvent::SectionStart { section } => self.on_start(&section),
            WireEvent::Content { section, content } => {
                self.on_content(&section, &content, surface)
            }
            WireEvent::SectionComplete { section } => self.on_complete(&section, surface),
            WireEvent::Error { message } => surface.append_error_notice(&message),
            WireEvent::Complete | WireEvent::Unknown => {}
        }
    }

    /// Registers a section without creating a render node. Repeated starts
    /// are no-ops.
    pub fn on_start(&mut self, id: &str) {
        if self.is_suppressed(id) || self.sections.contains_key(id) {
            return;
        }
        self.sections.insert(id.to_string(), Section::pending(id));
        self.pending.insert(id.to_string());
    }

    /// Routes content into a section, materializing it lazily. The content
    /// is the full section text so far; painting replaces in place.
    pub fn on_content(&mut self, id: &str, text: &str, surface: &mut dyn RenderSurface) {
        if self.is_suppressed(id) {
            return;
        }

        let kind = SectionKind::classify(id);
        if should_suppress(&kind, text) {
            self.suppress(id, surface);
            return;
        }

        // A content event may be the first reference to its section; such a
        // section is pending like one registered by a start event.
        let section = match self.sections.entry(id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.pending.insert(id.to_string());
                entry.insert(Section::pending(id))
            }
        };

        if section.lifecycle == SectionLifecycle::Pending {
            // Reasoning sections stay pending until real content arrives;
            // everything else materializes on its first content event.
            if section.kind == SectionKind::Think && text.is_empty() {
                return;
            }
            surface.ensure_section(id, &section.kind);
            section.lifecycle = SectionLifecycle::Materialized;
            self.pending.remove(id);
        }

        section.content = text.to_string();
        if section.kind == SectionKind::Think && !text.trim().is_empty() {
            section.expanded = true;
        }
        surface.paint_section(id, &section.content, section.expanded);
    }

    /// Completes a section. A section that never received content is
    /// materialized now so the user sees it existed; a section never
    /// referenced at all gets the same treatment.
    pub fn on_complete(&mut self, id: &str, surface: &mut dyn RenderSurface) {
        if self.is_suppressed(id) {
            // The section is simply gone; nothing to paint or finish.
            self.sections.remove(id);
            self.pending.remove(id);
            return;
        }

        let section = self
            .sections
            .entry(id.to_string())
            .or_insert_with(|| Section::pending(id));

        if section.lifecycle == SectionLifecycle::Pending {
            surface.ensure_section(id, &section.kind);
            surface.paint_section(id, &section.content, section.expanded);
            section.lifecycle = SectionLifecycle::Materialized;
            self.pending.remove(id);
        }

        section.lifecycle = SectionLifecycle::Complete;
        surface.complete_section(id);
    }

    fn suppress(&mut self, id: &str, surface: &mut dyn RenderSurface) {
        let had_render_node = matches!(
            self.sections.get(id).map(|section| section.lifecycle),
            Some(SectionLifecycle::Materialized) | Some(SectionLifecycle::Complete)
        );
        self.sections.remove(id);
        self.pending.remove(id);
        self.suppressed.insert(id.to_string());
        if had_render_node {
            surface.remove_section(id);
        }
    }
}
