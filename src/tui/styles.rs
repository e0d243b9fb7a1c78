use ratatui::style::{Color, Modifier, Style};

/// Colors used by the catalog table and its overlays
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Color,
    pub favorite: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub background: Color,
    pub footer_bg: Color,
    pub frame: Color,
    /// Frame color once the page has settled
    pub frame_ready: Color,
    pub ok: Color,
    pub pending: Color,
    pub failure: Color,
    pub hint: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            header: Color::Rgb(147, 51, 234),
            favorite: Color::Rgb(236, 72, 153),
            text: Color::Rgb(248, 250, 252),
            muted: Color::Rgb(148, 163, 184),
            highlight_fg: Color::White,
            highlight_bg: Color::Rgb(30, 58, 138),
            background: Color::Rgb(15, 23, 42),
            footer_bg: Color::Rgb(30, 41, 59),
            frame: Color::Rgb(71, 85, 105),
            frame_ready: Color::Rgb(147, 51, 234),
            ok: Color::Rgb(34, 197, 94),
            pending: Color::Rgb(245, 158, 11),
            failure: Color::Rgb(239, 68, 68),
            hint: Color::Rgb(100, 116, 139),
        }
    }

    /// Popover body
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Table frame while a page is loading
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.frame)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.frame_ready)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted row
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .fg(self.highlight_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// `[♥]` marker and the favorite count
    pub fn favorite_style(&self) -> Style {
        Style::default().fg(self.favorite).add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header).add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.footer_bg)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.ok)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.pending)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.failure).add_modifier(Modifier::BOLD)
    }

    pub fn help_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Empty-table message and the blank popover input
    pub fn placeholder_style(&self) -> Style {
        Style::default().fg(self.hint).add_modifier(Modifier::ITALIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_frame_differs_from_ready_frame() {
        let theme = Theme::default();
        assert_ne!(theme.border_style().fg, theme.focused_border_style().fg);
        assert!(theme.error_style().add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.favorite_style().fg, Some(theme.favorite));
    }
}
