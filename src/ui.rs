use crate::client::AppSnapshot;
use bau_cua::{
    Animal,
    Notice,
    Phase,
    Variant,
    notice::{
        Severity,
        format_coins,
    },
    secret::zone_at,
};
use color_eyre::eyre::Result;
use crossterm::{
    event::{
        self,
        Event,
        KeyCode,
        KeyEventKind,
        KeyModifiers,
        MouseButton,
        MouseEventKind,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use itertools::Itertools;
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::*,
};
use std::{
    io::stdout,
    time::Duration,
};
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthChar;

const INPUT_POLL: Duration = Duration::from_millis(100);

pub enum UserEvent {
    Quit,
    Redraw,
    /// A tap on the table: the secret zone it landed in and the card it hit.
    Tap { zone: Option<u8>, card: Option<u8> },
    /// Buttons sit on the table too, so a click on them carries its zone.
    Roll { zone: Option<u8> },
    Reset { zone: Option<u8> },
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<Event>;

#[derive(Debug)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
    table_area: Rect,
    card_areas: [Rect; 6],
    roll_area: Rect,
    home_area: Rect,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            mode: Mode::Normal,
            terminal: None,
            table_area: Rect::default(),
            card_areas: [Rect::default(); 6],
            roll_area: Rect::default(),
            home_area: Rect::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

/// Reads crossterm events on a plain thread so the async loop never blocks.
/// The thread stops once the receiver is dropped.
pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    tracing::error!(error = %e, "polling terminal input failed");
                    break;
                }
            }
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "reading terminal input failed");
                    break;
                }
            }
        }
    });
    rx
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub fn translate(state: &mut UiState, ev: Event) -> Option<UserEvent> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => {
            if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
                return Some(UserEvent::Quit);
            }
            if let Mode::QuitModal = state.mode {
                return match k.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        state.mode = Mode::Normal;
                        Some(UserEvent::Redraw)
                    }
                    _ => None,
                };
            }
            match k.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    state.mode = Mode::QuitModal;
                    Some(UserEvent::Redraw)
                }
                KeyCode::Char(c @ '1'..='6') => {
                    let card = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                    Some(UserEvent::Tap { zone: None, card })
                }
                KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Enter => {
                    Some(UserEvent::Roll { zone: None })
                }
                KeyCode::Char('h') => Some(UserEvent::Reset { zone: None }),
                _ => None,
            }
        }
        Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
            if let Mode::QuitModal = state.mode {
                return None;
            }
            let pos = Position::new(m.column, m.row);
            let area = state.table_area;
            let zone = zone_at(
                f64::from(m.column.saturating_sub(area.x)),
                f64::from(m.row.saturating_sub(area.y)),
                f64::from(area.width),
                f64::from(area.height),
            );
            if state.home_area.contains(pos) {
                return Some(UserEvent::Reset { zone });
            }
            if state.roll_area.contains(pos) {
                return Some(UserEvent::Roll { zone });
            }
            let card = state
                .card_areas
                .iter()
                .position(|r| r.contains(pos))
                .and_then(|idx| u8::try_from(idx + 1).ok());
            Some(UserEvent::Tap { zone, card })
        }
        Event::Resize(_, _) => Some(UserEvent::Redraw),
        _ => None,
    }
}

fn ui(f: &mut Frame, state: &mut UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    state.table_area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(6), // crab, fish, shrimp
            Constraint::Length(7), // dice + roll button
            Constraint::Length(6), // deer, rooster, gourd
            Constraint::Min(6),    // history + notices
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_header(f, state, chunks[0], snap);
    draw_cards(f, state, chunks[1], &Animal::ALL[..3], snap);
    draw_dice(f, state, chunks[2], snap);
    draw_cards(f, state, chunks[3], &Animal::ALL[3..], snap);
    draw_lower(f, chunks[4], snap);
    draw_help(f, chunks[5], snap);
    draw_modals(f, state);
}

fn draw_header(f: &mut Frame, state: &mut UiState, area: Rect, snap: &AppSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(20),
        ])
        .split(area);

    let home = Paragraph::new("⌂ Home")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(home, cols[0]);
    state.home_area = cols[0];

    let mut title = vec![Line::styled(
        "Bầu Cua VNG 2024-2025",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if snap.variant == Variant::Wager && snap.favor_active {
        title.push(Line::styled(
            "⭐ Chế độ may mắn đang hoạt động",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        ));
    } else {
        title.push(Line::styled(
            snap.status.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let title = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, cols[1]);

    let purse = match snap.variant {
        Variant::Wager => format!("{} xu", format_coins(snap.balance)),
        Variant::Free => String::from("Chơi miễn phí"),
    };
    let purse = Paragraph::new(purse)
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(purse, cols[2]);
}

fn draw_cards(
    f: &mut Frame,
    state: &mut UiState,
    area: Rect,
    animals: &[Animal],
    snap: &AppSnapshot,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(animals.iter().map(|_| Constraint::Ratio(1, animals.len() as u32)))
        .split(area);
    for (animal, rect) in animals.iter().zip(cols.iter()) {
        state.card_areas[usize::from(animal.position()) - 1] = *rect;
        let winner = snap.winners.contains(animal);
        let bet = snap.bet_on(*animal);
        let mut border = Style::default().fg(Color::Gray);
        if bet > 0 {
            border = Style::default().fg(Color::Blue);
        }
        if winner {
            border = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        let mut lines = vec![
            Line::from(animal_emoji(*animal)),
            Line::styled(
                animal.vietnamese(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        if bet > 0 {
            lines.push(Line::styled(
                format!("{} xu", format_coins(bet)),
                Style::default().fg(Color::Blue),
            ));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if winner { BorderType::Double } else { BorderType::Rounded })
            .border_style(border)
            .title(format!(" {} ", animal.position()));
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            *rect,
        );
    }
}

fn draw_dice(f: &mut Frame, state: &mut UiState, area: Rect, snap: &AppSnapshot) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(3)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .flex(Flex::Center)
        .constraints([Constraint::Length(14); 3])
        .spacing(2)
        .split(rows[0]);

    for (idx, (die, rect)) in snap.dice.iter().zip(cols.iter()).enumerate() {
        let face = if die.animating {
            spinning_face(snap.frame, idx)
        } else {
            die.face
        };
        let style = if die.animating {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let p = Paragraph::new(vec![
            Line::from(animal_emoji(face)),
            Line::styled(face.vietnamese(), style),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, *rect);
    }

    let (label, style) = match snap.phase {
        Phase::Betting => (
            "LẮC XÚC XẮC",
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Phase::Rolling => ("ĐANG LẮC...", Style::default().fg(Color::White).bg(Color::DarkGray)),
        Phase::WaitingForTap => (
            "ĐANG LẮC...",
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Phase::Result => ("KẾT QUẢ", Style::default().fg(Color::White).bg(Color::Green)),
    };
    let button_row = Layout::default()
        .direction(Direction::Horizontal)
        .flex(Flex::Center)
        .constraints([Constraint::Length(22)])
        .split(rows[1]);
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, button_row[0]);
    state.roll_area = button_row[0];
}

fn draw_lower(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let width = usize::from(lower[0].width.saturating_sub(2));
    let mut history = Vec::new();
    if snap.history.is_empty() {
        history.push(Line::styled("None", Style::default().fg(Color::DarkGray)));
    }
    for record in &snap.history {
        let faces = record.outcome.iter().map(|a| animal_emoji(*a)).join(" ");
        let tail = match record.payout {
            Some(0) => String::from("thua"),
            Some(n) => format!("+{} xu", format_coins(n)),
            None if record.forced => String::from("✔"),
            None => String::new(),
        };
        history.push(Line::from(fit(
            &format!("#{} {} {}", record.round, faces, tail),
            width,
        )));
    }
    let history = Paragraph::new(history)
        .block(Block::default().borders(Borders::ALL).title("Roll History"));
    f.render_widget(history, lower[0]);

    let width = usize::from(lower[1].width.saturating_sub(2));
    let mut notices = Vec::new();
    for notice in snap.toasts.iter().rev() {
        notices.push(Line::styled(
            fit(notice.title(), width),
            notice_style(notice).add_modifier(Modifier::BOLD),
        ));
        notices.push(Line::styled(fit(&notice.description(), width), notice_style(notice)));
    }
    let notices = Paragraph::new(notices)
        .block(Block::default().borders(Borders::ALL).title("Notices"));
    f.render_widget(notices, lower[1]);
}

fn draw_help(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let text = match snap.variant {
        Variant::Wager => "1-6/click bet | space/r roll | h home | q/Esc quit",
        Variant::Free => "1-6/click tap | space/r roll | h home | q/Esc quit",
    };
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState) {
    match &state.mode {
        Mode::QuitModal => {
            let area = centered_rect(40, 20, f.area());
            let block = Block::default().borders(Borders::ALL).title("Confirm Quit");
            let p = Paragraph::new("Leave the table? (Y/N)");
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal => {}
    }
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}

fn notice_style(notice: &Notice) -> Style {
    match (notice.severity(), notice) {
        (Severity::Warning, _) => Style::default().fg(Color::Red),
        (_, Notice::Won(_)) => Style::default().fg(Color::Green),
        (_, Notice::FavorActivated | Notice::OverrideArmed) => {
            Style::default().fg(Color::Yellow)
        }
        _ => Style::default(),
    }
}

// Purely cosmetic; each die cycles at its own offset while rolling.
fn spinning_face(frame: u64, die: usize) -> Animal {
    let idx = (frame as usize).wrapping_add(die * 2) % Animal::ALL.len();
    Animal::ALL[idx]
}

fn animal_emoji(animal: Animal) -> &'static str {
    match animal {
        Animal::Crab => "🦀",
        Animal::Fish => "🐟",
        Animal::Shrimp => "🦐",
        Animal::Deer => "🦌",
        Animal::Rooster => "🐓",
        Animal::Gourd => "🍐",
    }
}

/// Truncates to `width` terminal cells, marking the cut with an ellipsis.
fn fit(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            if out.pop().is_some() {
                out.push('…');
            }
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyEvent,
        MouseEvent,
    };

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn digits_tap_cards() {
        let mut state = UiState::default();
        match translate(&mut state, key(KeyCode::Char('6'))) {
            Some(UserEvent::Tap { zone: None, card }) => assert_eq!(card, Some(6)),
            _ => panic!("expected card tap"),
        }
    }

    #[test]
    fn quit_needs_confirmation() {
        let mut state = UiState::default();
        assert!(matches!(
            translate(&mut state, key(KeyCode::Char('q'))),
            Some(UserEvent::Redraw)
        ));
        assert!(matches!(
            translate(&mut state, key(KeyCode::Char('r'))),
            None
        ));
        assert!(matches!(
            translate(&mut state, key(KeyCode::Char('y'))),
            Some(UserEvent::Quit)
        ));
    }

    #[test]
    fn clicks_map_to_zone_and_card() {
        let mut state = UiState::default();
        state.table_area = Rect::new(0, 0, 100, 40);
        state.card_areas[0] = Rect::new(0, 4, 33, 6);
        match translate(&mut state, click(5, 5)) {
            Some(UserEvent::Tap { zone, card }) => {
                assert_eq!(zone, Some(1));
                assert_eq!(card, Some(1));
            }
            _ => panic!("expected tap"),
        }
        match translate(&mut state, click(50, 20)) {
            Some(UserEvent::Tap { zone, card }) => {
                assert_eq!(zone, Some(2));
                assert_eq!(card, None);
            }
            _ => panic!("expected tap"),
        }
    }

    #[test]
    fn roll_button_click_carries_center_zone() {
        let mut state = UiState::default();
        state.table_area = Rect::new(0, 0, 100, 40);
        state.roll_area = Rect::new(39, 14, 22, 3);
        state.home_area = Rect::new(0, 0, 12, 4);

        match translate(&mut state, click(50, 15)) {
            Some(UserEvent::Roll { zone }) => assert_eq!(zone, Some(2)),
            _ => panic!("expected roll"),
        }
        match translate(&mut state, click(2, 1)) {
            Some(UserEvent::Reset { zone }) => assert_eq!(zone, Some(1)),
            _ => panic!("expected reset"),
        }
    }

    #[test]
    fn ctrl_c_quits_without_confirmation() {
        let mut state = UiState::default();
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(translate(&mut state, ev), Some(UserEvent::Quit)));
    }

    #[test]
    fn fit_truncates_by_cell_width() {
        assert_eq!(fit("abc", 5), "abc");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("🦀🦀🦀", 4), "🦀…");
    }
}
