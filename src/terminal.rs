// SPDX-License-Identifier: GPL-3.0-only

//! Terminal kiosk
//!
//! Full-screen check-in flow drawn with ratatui over a drifting backdrop.
//! Scan ticks are driven from the input loop: whenever the active scan's
//! next tick is due, the session gets a `Tick` before the frame is drawn.

use crate::backdrop::Backdrop;
use crate::backends::camera::{CameraBackendManager, SessionPhase};
use crate::checkin::{CheckInSession, SessionEvent};
use crate::config::Config;
use crate::constants::{APP_NAME, TAGLINE, timing};
use crate::errors::AppResult;
use crate::recognition::MockRecognitionService;
use crate::wizard::{WizardFlow, WizardStep};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Gauge, Paragraph, Widget, Wrap},
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const ACCENT: Color = Color::Rgb(111, 226, 204);
const ERROR: Color = Color::Rgb(239, 83, 80);

/// Run the kiosk on `start` until the user quits
pub fn run(config: Config, manager: CameraBackendManager, start: WizardStep) -> AppResult<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, manager, start);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    manager: CameraBackendManager,
    start: WizardStep,
) -> AppResult<()> {
    let backdrop = match config.backdrop_seed {
        Some(seed) => Backdrop::generate(seed),
        None => Backdrop::random(),
    };
    info!(seed = backdrop.seed, "Kiosk started");

    let mut session = CheckInSession::starting_at(
        manager,
        Arc::new(MockRecognitionService::new()),
        config.clone(),
        start,
    );
    let launched = Instant::now();
    let mut next_tick: Option<Instant> = None;

    loop {
        if let Some(due) = next_tick
            && Instant::now() >= due
        {
            session.handle(SessionEvent::Tick);
            next_tick = session.next_tick_delay().map(|delay| due + delay);
        }

        let view = KioskView {
            session: &session,
            backdrop: &backdrop,
            config: &config,
            elapsed: launched.elapsed().as_secs_f32(),
        };
        terminal.draw(|f| view.render(f))?;

        if event::poll(timing::UI_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C to quit
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if key.code == KeyCode::Char('q') {
                break;
            }

            let Some(event) = map_key(key.code) else {
                continue;
            };
            session.handle(event);

            next_tick = match (session.next_tick_delay(), next_tick) {
                (None, _) => None,
                (Some(delay), None) => Some(Instant::now() + delay),
                (Some(_), pending) => pending,
            };
        }
    }

    info!(session = %session.id(), "Kiosk closed");
    Ok(())
}

fn map_key(code: KeyCode) -> Option<SessionEvent> {
    match code {
        KeyCode::Enter | KeyCode::Char('y') => Some(SessionEvent::Confirm),
        KeyCode::Char('n') => Some(SessionEvent::Deny),
        KeyCode::Char('s') | KeyCode::Char(' ') => Some(SessionEvent::Start),
        KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => Some(SessionEvent::Back),
        KeyCode::Char('r') => Some(SessionEvent::Restart),
        _ => None,
    }
}

/// One frame's worth of read-only state
struct KioskView<'a> {
    session: &'a CheckInSession,
    backdrop: &'a Backdrop,
    config: &'a Config,
    elapsed: f32,
}

impl KioskView<'_> {
    fn render(&self, f: &mut Frame) {
        let area = f.area();
        let body = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };

        f.render_widget(
            BackdropWidget {
                backdrop: self.backdrop,
                elapsed: self.elapsed,
                particles: self.config.show_particles,
                orbs: self.config.show_orbs,
            },
            body,
        );

        let panel = centered(body, 70, 26);
        f.render_widget(Clear, panel);

        let step = self.session.step();
        let block = Block::bordered()
            .title(format!(" {} ", APP_NAME))
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(panel);
        f.render_widget(block, panel);

        let [indicator, heading, content, gauge, notice] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner);

        f.render_widget(
            Paragraph::new(step_indicator(self.session.flow())).alignment(Alignment::Center),
            indicator,
        );
        f.render_widget(
            Paragraph::new(vec![
                Line::styled(step.title(), Style::default().add_modifier(Modifier::BOLD)),
                Line::styled(step.description(), Style::default().fg(Color::Gray)),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
            heading,
        );
        f.render_widget(
            Paragraph::new(self.content_lines())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            content,
        );

        if step.uses_camera() {
            let scan = self.session.scan();
            f.render_widget(
                Gauge::default()
                    .block(Block::bordered())
                    .gauge_style(Style::default().fg(ACCENT))
                    .percent(u16::from(scan.progress()))
                    .label(format!("{}%  {}", scan.progress(), scan.message())),
                gauge,
            );
        }

        if let Some(message) = self.session.notice() {
            f.render_widget(
                Paragraph::new(Line::styled(message, Style::default().fg(ERROR)))
                    .alignment(Alignment::Center),
                notice,
            );
        }

        let status_area = Rect {
            x: area.x,
            y: area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        f.render_widget(
            StatusBar {
                message: &key_help(self.session),
            },
            status_area,
        );
    }

    fn content_lines(&self) -> Vec<Line<'static>> {
        let session = self.session;
        let mut lines = Vec::new();

        match session.step() {
            WizardStep::Home => {
                lines.push(Line::styled(TAGLINE, Style::default().fg(ACCENT)));
                lines.push(Line::default());
                lines.push(Line::from("Press Enter to start your check-in"));
            }
            WizardStep::FaceCheckIn => {
                lines.push(camera_line(session));
                if let Some(identity) = session.identity() {
                    lines.push(Line::default());
                    lines.push(Line::styled(
                        format!("Welcome back, {}", identity.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                    lines.push(Line::from(format!("Patient ID: {}", identity.id)));
                    lines.push(Line::from(format!(
                        "Last check-in: {}",
                        identity.last_check_in.format("%b %d, %Y")
                    )));
                    lines.push(Line::default());
                    lines.push(Line::from("Is this you? Enter for yes, n for no"));
                }
            }
            WizardStep::PatientVerification => {
                lines.push(camera_line(session));
                if let Some(identity) = session.identity() {
                    lines.push(Line::from(format!("Verifying ID for {}", identity.name)));
                }
                if let Some(verification) = session.verification() {
                    lines.push(Line::default());
                    let text = if verification.verified {
                        format!("ID verified for patient {}", verification.patient_id)
                    } else {
                        "ID could not be verified".to_string()
                    };
                    lines.push(Line::styled(text, Style::default().add_modifier(Modifier::BOLD)));
                    lines.push(Line::from("Press Enter to continue to your vitals"));
                }
            }
            WizardStep::VitalsResults => {
                lines.push(camera_line(session));
                if let Some(report) = session.vitals() {
                    lines.push(Line::default());
                    let readings = [
                        ("Heart rate", format!("{} bpm", report.heart_rate)),
                        ("Blood pressure", format!("{} mmHg", report.blood_pressure)),
                        ("Respiratory rate", format!("{} breaths/min", report.respiratory_rate)),
                        ("Stress level", report.stress_level.to_string()),
                        ("BMI", format!("{:.1}", report.bmi)),
                        ("Oxygen saturation", format!("{}%", report.oxygen_saturation)),
                    ];
                    for (label, value) in readings {
                        lines.push(Line::from(vec![
                            Span::styled(format!("{label:>18}: "), Style::default().fg(Color::Gray)),
                            Span::styled(format!("{value:<16}"), Style::default().fg(Color::White)),
                        ]));
                    }
                    lines.push(Line::default());
                    lines.push(Line::styled(report.summary(), Style::default().fg(ACCENT)));
                    for insight in report.insights() {
                        lines.push(Line::styled(insight, Style::default().fg(Color::Yellow)));
                    }
                    for recommendation in report.recommendations() {
                        lines.push(Line::from(format!("- {recommendation}")));
                    }
                    lines.push(Line::default());
                    match session.completed_on() {
                        Some(date) => {
                            lines.push(Line::styled(
                                "Check-in Complete \u{2713}",
                                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                            ));
                            lines.push(Line::from(format!(
                                "Next check-in: {}",
                                report.next_check_in().format("%b %d, %Y")
                            )));
                            lines.push(Line::from(format!(
                                "Checked in on {}. Press Enter to start over",
                                date.format("%b %d, %Y")
                            )));
                        }
                        None => lines.push(Line::from("Press Enter to complete your check-in")),
                    }
                }
            }
        }

        lines
    }
}

fn camera_line(session: &CheckInSession) -> Line<'static> {
    let text = match (session.camera_phase(), session.camera_device()) {
        (SessionPhase::Acquired, Some(device)) => format!("Camera: {}", device.name),
        (SessionPhase::Acquiring, _) => "Camera: connecting...".to_string(),
        _ => "Camera: off".to_string(),
    };
    Line::styled(text, Style::default().fg(Color::DarkGray))
}

fn step_indicator(flow: &WizardFlow) -> Line<'static> {
    let current = flow.current_step();
    let mut spans = Vec::new();
    for step in WizardStep::ALL {
        let (symbol, style) = if step == current {
            ("●", Style::default().fg(ACCENT))
        } else if flow.has_visited(step) {
            ("●", Style::default().fg(Color::Gray))
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(format!("{symbol} "), style));
    }
    spans.push(Span::raw(format!(
        " Step {} of {}",
        current.number(),
        WizardStep::total_steps()
    )));
    Line::from(spans)
}

fn key_help(session: &CheckInSession) -> String {
    let mut parts = Vec::new();
    if session.step().uses_camera() && session.scan().is_idle() {
        parts.push("'s' start");
    }
    if session.is_complete() {
        parts.push("Enter start over");
    } else if session.can_confirm() {
        parts.push(if session.step().is_last() {
            "Enter complete check-in"
        } else {
            "Enter confirm"
        });
    }
    if session.scan().is_complete() && !session.is_complete() {
        parts.push("'n' retry");
    }
    if session.flow().can_go_back() {
        parts.push("'b' back");
    }
    if !session.step().is_first() {
        parts.push("'r' restart");
    }
    parts.push("'q' quit");
    parts.join(" | ")
}

/// Rect of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn dim((r, g, b): (u8, u8, u8), factor: f32) -> Color {
    let scale = |c: u8| (c as f32 * factor.clamp(0.0, 1.0)) as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

/// Particles and orbs behind the check-in panel
struct BackdropWidget<'a> {
    backdrop: &'a Backdrop,
    elapsed: f32,
    particles: bool,
    orbs: bool,
}

impl Widget for BackdropWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let to_cell = |x: f32, y: f32| {
            let cx = area.x + ((x / 100.0) * (area.width - 1) as f32) as u16;
            let cy = area.y + ((y / 100.0) * (area.height - 1) as f32) as u16;
            (cx, cy)
        };

        if self.orbs {
            for orb in &self.backdrop.orbs {
                let (cx, cy) = to_cell(orb.x, orb.y);
                let radius = (orb.size / 20.0) as i32;
                let color = dim(orb.color(), orb.glow / 60.0);
                for dy in -radius..=radius {
                    for dx in -radius * 2..=radius * 2 {
                        // Cells are about twice as tall as wide
                        let dist = ((dx as f32 / 2.0).powi(2) + (dy as f32).powi(2)).sqrt();
                        if dist > radius as f32 {
                            continue;
                        }
                        let x = cx as i32 + dx;
                        let y = cy as i32 + dy;
                        if x < area.x as i32 || y < area.y as i32 {
                            continue;
                        }
                        let position = (x as u16, y as u16);
                        if area.contains(position.into())
                            && let Some(cell) = buf.cell_mut(position)
                        {
                            cell.set_char('░');
                            cell.set_fg(color);
                        }
                    }
                }
            }
        }

        if self.particles {
            for particle in &self.backdrop.particles {
                let (x, y) = particle.position_at(self.elapsed);
                let (cx, cy) = to_cell(x, y);
                if let Some(cell) = buf.cell_mut((cx, cy)) {
                    cell.set_char(if particle.size > 15.0 { '•' } else { '·' });
                    cell.set_fg(dim(particle.color(), particle.opacity * 2.5));
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::VirtualBackend;

    fn session() -> CheckInSession {
        CheckInSession::new(
            CameraBackendManager::with_backend(Box::new(VirtualBackend::new())),
            Arc::new(MockRecognitionService::new()),
            Config::default(),
        )
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(KeyCode::Enter), Some(SessionEvent::Confirm));
        assert_eq!(map_key(KeyCode::Char('n')), Some(SessionEvent::Deny));
        assert_eq!(map_key(KeyCode::Char(' ')), Some(SessionEvent::Start));
        assert_eq!(map_key(KeyCode::Esc), Some(SessionEvent::Back));
        assert_eq!(map_key(KeyCode::Char('r')), Some(SessionEvent::Restart));
        assert_eq!(map_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered(area, 70, 26), area);
        assert_eq!(centered(Rect::new(0, 0, 100, 40), 70, 26), Rect::new(15, 7, 70, 26));
    }

    #[test]
    fn test_key_help_follows_state() {
        let mut session = session();
        assert_eq!(key_help(&session), "Enter confirm | 'q' quit");
        session.handle(SessionEvent::Confirm);
        assert_eq!(
            key_help(&session),
            "'s' start | 'b' back | 'r' restart | 'q' quit"
        );
    }

    #[test]
    fn test_step_indicator_marks_visited() {
        let flow = WizardFlow::starting_at(WizardStep::PatientVerification);
        let symbols: Vec<String> = step_indicator(&flow)
            .spans
            .iter()
            .take(WizardStep::total_steps())
            .map(|span| span.content.trim().to_string())
            .collect();
        assert_eq!(symbols, ["○", "○", "●", "○"]);
    }

    #[test]
    fn test_renders_every_step() {
        let backend = ratatui::backend::TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let backdrop = Backdrop::generate(5);
        let config = Config::default();
        let mut session = session();

        for _ in WizardStep::ALL {
            session.handle(SessionEvent::Start);
            while session.next_tick_delay().is_some() {
                session.handle(SessionEvent::Tick);
            }
            let view = KioskView {
                session: &session,
                backdrop: &backdrop,
                config: &config,
                elapsed: 12.0,
            };
            terminal.draw(|f| view.render(f)).unwrap();

            let buffer = terminal.backend().buffer();
            let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
            assert!(text.contains(session.step().title()));

            session.handle(SessionEvent::Confirm);
        }
        assert_eq!(session.step(), WizardStep::VitalsResults);
        assert!(session.is_complete());
        assert_eq!(
            key_help(&session),
            "Enter start over | 'b' back | 'r' restart | 'q' quit"
        );
    }
}
