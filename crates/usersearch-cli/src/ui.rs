use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use usersearch_core::orchestration::{Notification, SearchSnapshot};
use usersearch_core::view::{
    NO_RESULTS_MESSAGE, SEARCH_PLACEHOLDER, SearchView, TITLE, UserCard,
};

const ACCENT: Color = Color::Rgb(0xef, 0x3e, 0x3a);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const CARD_WIDTH: u16 = 34;
const CARD_HEIGHT: u16 = 6;
const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, input: &str, snapshot: &SearchSnapshot, tick: usize) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(frame.area());

    frame.render_widget(
        Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        chunks[0],
    );
    render_input(frame, chunks[1], input, snapshot.loading, tick);
    render_body(frame, chunks[2], snapshot);
    frame.render_widget(
        Paragraph::new("Esc dismiss/quit  Ctrl+U clear  Ctrl+C quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    if let Some(notification) = &snapshot.notification {
        render_notification(frame, notification);
    }
}

fn render_input(frame: &mut Frame, area: Rect, input: &str, loading: bool, tick: usize) {
    let mut block = Block::bordered().border_style(Style::default().fg(ACCENT));
    if loading {
        block = block.title(format!(" {} ", SPINNER[tick % SPINNER.len()]));
    }

    let text = if input.is_empty() {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input)
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    let width = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x + area.width.saturating_sub(2);
    frame.set_cursor_position(((area.x + 1).saturating_add(width).min(max_x), area.y + 1));
}

fn render_body(frame: &mut Frame, area: Rect, snapshot: &SearchSnapshot) {
    match SearchView::from_snapshot(snapshot) {
        SearchView::Results(cards) => render_cards(frame, area, &cards),
        SearchView::Loading => frame.render_widget(
            Paragraph::new("Searching...").alignment(Alignment::Center),
            area,
        ),
        SearchView::NoResults => frame.render_widget(
            Paragraph::new(NO_RESULTS_MESSAGE).alignment(Alignment::Center),
            area,
        ),
        SearchView::Idle => {}
    }
}

fn render_cards(frame: &mut Frame, area: Rect, cards: &[UserCard]) {
    let per_row = usize::from((area.width / CARD_WIDTH).max(1));
    let width = CARD_WIDTH.min(area.width);

    for (index, card) in cards.iter().enumerate() {
        let row = u16::try_from(index / per_row).unwrap_or(u16::MAX);
        let column = u16::try_from(index % per_row).unwrap_or(u16::MAX);
        let y = row.saturating_mul(CARD_HEIGHT);
        if y.saturating_add(CARD_HEIGHT) > area.height {
            break;
        }

        let card_area = Rect::new(area.x + column * CARD_WIDTH, area.y + y, width, CARD_HEIGHT);
        let lines = vec![
            Line::from(card.followers_label.clone()),
            Line::from(Span::styled(
                card.avatar_url.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(vec![
                Span::styled(
                    card.profile_link_label,
                    Style::default().add_modifier(Modifier::UNDERLINED),
                ),
                Span::raw(" "),
                Span::styled(card.profile_url.clone(), Style::default().fg(Color::Blue)),
            ]),
        ];
        let block = Block::bordered().title(Span::styled(
            card.login.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            card_area,
        );
    }
}

fn render_notification(frame: &mut Frame, notification: &Notification) {
    let area = centered(frame.area(), POPUP_WIDTH, POPUP_HEIGHT);
    let block = Block::bordered()
        .title(" Error ")
        .border_style(Style::default().fg(ACCENT));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(notification.message.as_str()),
            Line::from(Span::styled(
                "press Esc to dismiss",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true }),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use usersearch_core::models::UserDetail;
    use usersearch_core::orchestration::{Notification, SearchSnapshot};
    use usersearch_core::view::{GENERIC_ERROR_MESSAGE, NO_RESULTS_MESSAGE, SEARCH_PLACEHOLDER};

    use super::render;

    fn draw(input: &str, snapshot: &SearchSnapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| render(frame, input, snapshot, 0))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_a_card_per_result() {
        let snapshot = SearchSnapshot {
            query: "octocat".to_string(),
            results: vec![UserDetail {
                id: None,
                login: "octocat".to_string(),
                avatar_url: "a.png".to_string(),
                followers: 5000,
                html_url: "https://github.com/octocat".to_string(),
            }],
            ..SearchSnapshot::default()
        };

        let screen = draw("octocat", &snapshot);
        assert!(screen.contains("octocat"));
        assert!(screen.contains("Followers: 5000"));
        assert!(screen.contains("View Profile"));
        assert!(!screen.contains(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn renders_placeholder_and_no_results_message() {
        assert!(draw("", &SearchSnapshot::default()).contains(SEARCH_PLACEHOLDER));

        let snapshot = SearchSnapshot {
            query: "zzzzznosuchuser".to_string(),
            ..SearchSnapshot::default()
        };
        assert!(draw("zzzzznosuchuser", &snapshot).contains(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn renders_error_popup() {
        let snapshot = SearchSnapshot {
            query: "octocat".to_string(),
            notification: Some(Notification {
                message: GENERIC_ERROR_MESSAGE.to_string(),
                run: None,
                raised_at: SystemTime::now(),
            }),
            ..SearchSnapshot::default()
        };
        assert!(draw("octocat", &snapshot).contains(GENERIC_ERROR_MESSAGE));
    }
}
