//! Main rendering logic for the TUI.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::state::{AppState, Mode};
use super::style::Styles;
use crate::model::ProcessSample;
use crate::rank::SortBy;

const NAME_WIDTH: usize = 20;
const USER_WIDTH: usize = 12;

/// Main render function. Also records how many table rows fit, which the
/// state needs for scroll clamping.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    // Main layout: header, table, footer.
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    state.view_height = chunks[1].height as usize;
    state.clamp_selection();

    render_header(frame, chunks[0]);
    render_table(frame, chunks[1], state);
    render_footer(frame, chunks[2], state);

    if let Mode::ConfirmKill { pid, name } = &state.mode {
        render_kill_confirm(frame, area, *pid, name);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = format!(
        " {:<6} {:<20} {:<12} {:>12} {:>8}",
        "PID", "NAME", "USER", "MEM(kB)", "CPU%"
    );
    frame.render_widget(Paragraph::new(header).style(Styles::header()), area);
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows: Vec<Line> = state
        .visible
        .samples()
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .take(area.height as usize)
        .map(|(i, sample)| {
            let style = if i == state.selected {
                Styles::selected()
            } else {
                Styles::default()
            };
            Line::from(Span::styled(format_row(sample), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(rows), area);
}

/// Formats one table row with fixed column widths.
///
/// Display values are clamped, not the underlying samples: CPU% to
/// 0..=100 per the column width, memory to twelve digits.
fn format_row(sample: &ProcessSample) -> String {
    let cpu = sample.cpu_percent.clamp(0.0, 100.0);
    let memory = sample.memory_kb.min(999_999_999_999);
    format!(
        " {:<6} {:<20} {:<12} {:>12} {:>8.1}",
        sample.pid,
        truncate(&sample.name, NAME_WIDTH),
        truncate(&sample.user, USER_WIDTH),
        memory,
        cpu,
    )
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.mode {
        Mode::Search { buffer } => {
            let line = Line::from(vec![
                Span::styled(" SEARCH: ", Styles::header()),
                Span::styled(format!("{buffer}_"), Styles::search_input()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
        }
        _ => {
            let sort = match state.sort_by {
                SortBy::Pid => "pid",
                SortBy::Name => "name",
                SortBy::Memory => "mem",
                SortBy::Cpu => "cpu",
            };
            let summary = format!(
                " sort: {} [p/n/m/c] | [/] search | [k] kill | [q] quit | filter: [{}] | total: {}",
                sort,
                state.filter_text,
                state.visible.len(),
            );
            frame.render_widget(Paragraph::new(summary).style(Styles::help()), area);
        }
    }
}

/// Renders a centered kill confirmation popup over the table.
fn render_kill_confirm(frame: &mut Frame, area: Rect, pid: u32, name: &str) {
    let popup_width = (area.width * 50 / 100).clamp(40, 60).min(area.width);
    let popup_height = area.height.min(7);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Terminate process ")
        .borders(Borders::ALL)
        .border_style(Styles::confirm());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let content = vec![
        Line::from(Span::styled(
            format!("Send SIGTERM to {} (pid {})?", truncate(name, NAME_WIDTH), pid),
            Styles::default(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Styles::confirm()),
            Span::styled(" → terminate    ", Styles::help()),
            Span::styled("n", Styles::confirm()),
            Span::styled(" or ", Styles::help()),
            Span::styled("Esc", Styles::confirm()),
            Span::styled(" → cancel", Styles::help()),
        ]),
    ];

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, user: &str, memory_kb: u64, cpu_percent: f32) -> ProcessSample {
        ProcessSample {
            pid: 42,
            name: name.to_string(),
            user: user.to_string(),
            memory_kb,
            cpu_percent,
        }
    }

    #[test]
    fn long_fields_are_truncated_for_display() {
        let row = format_row(&sample(
            "a-process-with-a-very-long-name",
            "someextremelylonguser",
            1024,
            1.0,
        ));
        assert!(row.contains("a-process-with-a-ver"));
        assert!(!row.contains("a-process-with-a-very"));
        assert!(row.contains("someextremel"));
        assert!(!row.contains("someextremely"));
    }

    #[test]
    fn display_clamps_but_keeps_underlying_values() {
        let busy = sample("spin", "root", 1024, 380.0);
        let row = format_row(&busy);
        assert!(row.contains("100.0"));
        // Sample itself untouched; ranking still sees the real value.
        assert_eq!(busy.cpu_percent, 380.0);

        let row = format_row(&sample("hog", "root", u64::MAX, 0.0));
        assert!(row.contains("999999999999"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld, this is long", 10), "héllo wörl");
        assert_eq!(truncate("short", 20), "short");
    }
}
