use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    session::{CharClass, Session},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const TITLE: &str = "Welcome to the Typer Zone";
const NOTE: &str = "Note: Your accuracy and typing speed will be displayed at the end of the test.";
const PLACEHOLDER: &str = "Start typing...";

/// "5-minute" for whole minutes, "45-second" otherwise
pub fn timer_label(secs: u32) -> String {
    if secs > 0 && secs % 60 == 0 {
        format!("{}-minute", secs / 60)
    } else {
        format!("{secs}-second")
    }
}

fn sentence_spans(session: &Session) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let underlined_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::UNDERLINED);

    session
        .classify()
        .into_iter()
        .map(|(expected, class)| match class {
            CharClass::Correct => Span::styled(expected.to_string(), green_bold_style),
            CharClass::Incorrect => Span::styled(
                match expected {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            CharClass::Next => Span::styled(expected.to_string(), underlined_bold_style),
            CharClass::Pending => Span::styled(expected.to_string(), dim_style),
        })
        .collect()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let sentence =
            Paragraph::new(Line::from(sentence_spans(session))).wrap(Wrap { trim: false });
        // rows the word wrap really takes, plus one spare
        let sentence_lines = (sentence.line_count(max_chars_per_line) as u16).saturating_add(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),              // title
                Constraint::Length(1),              // note
                Constraint::Length(2),              // timer note
                Constraint::Length(sentence_lines), // sentence
                Constraint::Length(3),              // input box
                Constraint::Length(3),              // status / results
                Constraint::Min(0),                 // padding
                Constraint::Length(1),              // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(TITLE, bold_style.fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(NOTE, italic_style))
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!(
                "Timer: The {} timer will start once you begin typing.",
                timer_label(session.duration_secs())
            ),
            italic_style,
        ))
        .render(chunks[2], buf);

        sentence.render(chunks[3], buf);

        let completed = session.is_completed();
        let input_block = Block::default().borders(Borders::ALL).title(if completed {
            "input (disabled)"
        } else {
            "input"
        });
        let input_text = if session.typed().is_empty() && !completed {
            Span::styled(PLACEHOLDER, dim_style.add_modifier(Modifier::ITALIC))
        } else if completed {
            Span::styled(session.typed().to_string(), dim_style)
        } else {
            Span::raw(session.typed().to_string())
        };

        // keep the tail of the input visible
        let visible = chunks[4].width.saturating_sub(2) as usize;
        let scroll = session.typed().width().saturating_sub(visible.saturating_sub(1)) as u16;
        Paragraph::new(input_text)
            .block(input_block)
            .scroll((0, if completed { 0 } else { scroll }))
            .render(chunks[4], buf);

        let status = if completed {
            vec![
                Line::from(Span::styled(
                    format!("Typing speed: {} wpm", session.speed()),
                    bold_style,
                )),
                Line::from(Span::styled(
                    format!("Accuracy: {}%", session.accuracy()),
                    bold_style,
                )),
            ]
        } else {
            vec![Line::from(Span::styled(
                format!("Time remaining: {} seconds", session.remaining_secs()),
                bold_style,
            ))]
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        let legend = if completed {
            "(r)estart / (esc)ape"
        } else {
            "(tab) restart / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[7], buf);
    }
}
