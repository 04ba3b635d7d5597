//! Help overlay renderer for revue.
//!
//! Draws a centred modal over the current tab. `Clear` erases the area first,
//! so the overlay needs no second draw call.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 50 columns, where the centred rect
/// would be too small to read.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 50 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let section = |title: &'static str| {
        Line::styled(title, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
    };
    Text::from(vec![
        section("Files"),
        Line::from("  o / i         Type a path to load"),
        Line::from("  drop / paste  Load the dropped file"),
        Line::from("  x             Remove the loaded file"),
        Line::from("  a             Analyze (or retry) the loaded file"),
        Line::from(""),
        section("Navigation"),
        Line::from("  Tab / S-Tab   Next / previous tab"),
        Line::from("  1 2 3         Review / History / Samples"),
        Line::from("  H / L         Focus preview / results"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from(""),
        section("Samples"),
        Line::from("  Enter         Load the selected sample"),
        Line::from(""),
        section("Path input"),
        Line::from("  Enter         Load the typed path"),
        Line::from("  Ctrl-u        Clear the input"),
        Line::from("  Esc           Cancel"),
        Line::from(""),
        section("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
    ])
}
