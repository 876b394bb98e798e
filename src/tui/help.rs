use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{key:<12}"), Style::default().fg(Color::Magenta)),
        Span::raw(label),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Audience input:"),
        key_line("(type)", "Edit the name list, one name per line"),
        key_line("Enter", "New line"),
        key_line("Backspace", "Delete last character"),
        key_line("Ctrl-U", "Clear the input box"),
        key_line("Ctrl-A", "Add audience"),
        Line::from(""),
        Line::from("Raffle:"),
        key_line("Ctrl-D", "Draw winner"),
        key_line("Ctrl-R", "Reset audience and winner"),
        key_line("Ctrl-Y", "Copy winner to clipboard"),
        key_line("↑/↓", "Scroll audience list"),
        Line::from(""),
        Line::from("General:"),
        key_line("Tab", "Switch tabs"),
        key_line("Esc / Ctrl-C", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Draws are uniform: ", Style::default().fg(Color::Gray)),
            Span::raw("every line is one entry, duplicates included."),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
