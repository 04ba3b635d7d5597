//! Syntax highlighting for the code preview.
//!
//! Uses syntect's bundled syntaxes and themes, converted to owned ratatui
//! lines so the result can be cached in `AppState` across frames. Highlighting
//! a large file takes seconds, so it never runs inside `terminal.draw`: the
//! dispatcher runs [`highlight_source`] on the blocking pool and the preview
//! shows [`plain_source`] until the result lands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const SYNTECT_THEME: &str = "base16-ocean.dark";

/// Loads the syntax and theme sets up front so the first highlight does not
/// pay for it.
pub fn warm_up() {
    let _ = &*PS;
    let _ = &*TS;
}

/// Picks a syntax by file extension. The bundled set has no TypeScript or
/// JSX grammar, so those fall back to JavaScript.
fn syntax_for(ext: Option<&str>) -> &'static SyntaxReference {
    let ext = ext.unwrap_or("txt");
    let ext = match ext {
        "ts" | "tsx" | "jsx" | "mjs" => "js",
        other => other,
    };
    PS.find_syntax_by_extension(ext)
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Background colors are dropped so the preview sits on the panel background.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Splits `content` into unstyled lines, one per `\n`-separated segment.
///
/// Cheap enough to run on the event loop; the preview shows these until the
/// highlighted version arrives.
pub fn plain_source(content: &str) -> Vec<Line<'static>> {
    content
        .split('\n')
        .map(|raw| Line::raw(raw.strip_suffix('\r').unwrap_or(raw).to_owned()))
        .collect()
}

/// Highlights `content` into one ratatui line per `\n`-separated segment.
///
/// Runs on the blocking pool. Returns `None` as soon as `cancel` is set, so a
/// superseded file stops burning CPU. The line count always matches
/// [`plain_source`]. When no syntect theme is available the text is unstyled.
pub fn highlight_source(
    content: &str,
    ext: Option<&str>,
    cancel: &AtomicBool,
) -> Option<Vec<Line<'static>>> {
    let Some(theme) = TS.themes.get(SYNTECT_THEME).or_else(|| TS.themes.values().next()) else {
        return Some(plain_source(content));
    };
    let mut highlighter = HighlightLines::new(syntax_for(ext), theme);

    let mut lines = Vec::new();
    let mut buf = String::new();
    for raw in content.split('\n') {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        let code = raw.strip_suffix('\r').unwrap_or(raw);
        // The newline-aware grammars expect each line to end in '\n'.
        buf.clear();
        buf.push_str(code);
        buf.push('\n');
        let line = match highlighter.highlight_line(&buf, &PS) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| syntect_to_span(style, text.trim_end_matches('\n')))
                    .filter(|s| !s.content.is_empty())
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "highlighting failed, using plain text");
                Line::raw(code.to_owned())
            }
        };
        lines.push(line);
    }
    Some(lines)
}

/// Prefixes one preview row with its right-aligned 1-based line number.
///
/// Applied only to the rows on screen, never to the whole file.
pub fn with_gutter(
    number: usize,
    width: usize,
    line: &Line<'static>,
    gutter: Style,
) -> Line<'static> {
    let mut spans = Vec::with_capacity(line.spans.len() + 1);
    spans.push(Span::styled(format!("{number:>width$} │ "), gutter));
    spans.extend(line.spans.iter().cloned());
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn highlight(content: &str, ext: &str) -> Vec<Line<'static>> {
        highlight_source(content, Some(ext), &AtomicBool::new(false)).unwrap()
    }

    #[test]
    fn one_line_per_newline_separated_segment() {
        let lines = highlight("fn main() {\r\n}\n", "rs");
        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines[0]), "fn main() {");
        assert_eq!(plain(&lines[1]), "}");
        assert_eq!(plain(&lines[2]), "");
        assert_eq!(plain_source("fn main() {\r\n}\n").len(), 3);
    }

    #[test]
    fn gutter_is_right_aligned() {
        let line = Line::raw("x = 1");
        assert_eq!(plain(&with_gutter(1, 2, &line, Style::default())), " 1 │ x = 1");
        assert_eq!(plain(&with_gutter(10, 2, &line, Style::default())), "10 │ x = 1");
    }

    #[test]
    fn rust_keywords_are_colored() {
        let lines = highlight("fn main() {}", "rs");
        assert!(lines[0].spans.iter().any(|s| s.style.fg.is_some()));
    }

    #[test]
    fn plain_source_is_unstyled() {
        let lines = plain_source("fn main() {}\nlet x = 1;");
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().flat_map(|l| &l.spans).all(|s| s.style.fg.is_none()));
    }

    #[test]
    fn cancelled_highlight_stops_early() {
        let content = "x = 1\n".repeat(10_000);
        assert!(highlight_source(&content, Some("py"), &AtomicBool::new(true)).is_none());
    }

    #[test]
    fn unknown_extension_falls_back_to_plain_text() {
        assert_eq!(syntax_for(Some("zzz")).name, "Plain Text");
        assert_eq!(syntax_for(Some("tsx")).name, "JavaScript");
        assert_eq!(syntax_for(None).name, "Plain Text");
    }
}
