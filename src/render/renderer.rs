use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameMode, GameState, Position};
use crate::metrics::GameMetrics;
use crate::modes::Screen;
use crate::session::StoreSnapshot;

/// Everything a frame is drawn from
pub struct RenderView<'a> {
    pub screen: Screen,
    pub state: &'a GameState,
    pub metrics: &'a GameMetrics,
    pub history: &'a StoreSnapshot,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &RenderView<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Center the body horizontally
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match view.screen {
            Screen::Intro => {
                frame.render_widget(self.render_title(), chunks[0]);
                frame.render_widget(self.render_intro(), body);
            }
            Screen::Game => {
                frame.render_widget(self.render_hud(view.state, view.metrics), chunks[0]);
                frame.render_widget(self.render_grid(view.state), body);
                if view.state.game_over {
                    let overlay = centered(body, 44, 9);
                    frame.render_widget(Clear, overlay);
                    frame.render_widget(self.render_game_over(view.state, view.metrics), overlay);
                }
            }
            Screen::Stats => {
                frame.render_widget(self.render_title(), chunks[0]);
                frame.render_widget(self.render_stats(view.history), body);
            }
        }

        frame.render_widget(self.render_controls(view.screen, view.state), chunks[2]);
    }

    fn render_title(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            "S N A K E",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
    }

    fn render_intro(&self) -> Paragraph<'_> {
        let option = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(
                    key,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(label, Style::default().fg(Color::White)),
            ])
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome! Get ready to play Snake.",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            option("Enter", "  Start game (last mode)"),
            option("C", "      Start classic game"),
            option("T", "      Start timed game"),
            option("S", "      Stats"),
            option("Q", "      Quit"),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" Snake - {} ", state.mode.as_str())),
            )
            .alignment(Alignment::Center)
    }

    fn render_hud(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
        let value = |text: String| Span::styled(text, Style::default().fg(Color::White));

        let mut spans = vec![
            label("Score: "),
            Span::styled(
                state.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            label("Moves: "),
            value(state.moves.to_string()),
            Span::raw("    "),
            label("Time: "),
            value(metrics.format_time()),
        ];

        if state.mode == GameMode::Timed {
            spans.extend([
                Span::raw("    "),
                label("Get: "),
                value(state.round.food_target.to_string()),
                label(" Blocks in Time: "),
                value(state.round.format_remaining()),
            ]);
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.best_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "M",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" for the menu", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_stats(&self, history: &StoreSnapshot) -> Paragraph<'_> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Player Statistics",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if !history.loaded {
            lines.push(Line::from(Span::styled(
                "Loading session history...",
                Style::default().fg(Color::Gray),
            )));
        }

        for section in history.analytics_or_default().report() {
            lines.push(Line::from(Span::styled(
                section.title,
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            )));
            for (label, value) in section.rows {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {label}: "), Style::default().fg(Color::Gray)),
                    Span::styled(value, Style::default().fg(Color::White)),
                ]));
            }
            lines.push(Line::from(""));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }

    fn render_controls(&self, screen: Screen, state: &GameState) -> Paragraph<'_> {
        let key = |text: &'static str, color: Color| Span::styled(text, Style::default().fg(color));

        let spans = match screen {
            Screen::Intro => vec![
                key("Enter", Color::Cyan),
                Span::raw(" play | "),
                key("C", Color::Cyan),
                Span::raw(" classic | "),
                key("T", Color::Cyan),
                Span::raw(" timed | "),
                key("S", Color::Cyan),
                Span::raw(" stats | "),
                key("Q", Color::Red),
                Span::raw(" to quit"),
            ],
            Screen::Game if state.game_over => vec![
                key("R", Color::Green),
                Span::raw(" restart | "),
                key("M", Color::Cyan),
                Span::raw(" menu | "),
                key("Q", Color::Red),
                Span::raw(" to quit"),
            ],
            Screen::Game => vec![
                key("↑↓←→", Color::Cyan),
                Span::raw(" or "),
                key("WASD", Color::Cyan),
                Span::raw(" to move | "),
                key("Q", Color::Red),
                Span::raw(" to quit"),
            ],
            Screen::Stats => vec![
                key("B", Color::Cyan),
                Span::raw(" back | "),
                key("X", Color::Red),
                Span::raw(" reset history | "),
                key("Q", Color::Red),
                Span::raw(" to quit"),
            ],
        };

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rect centered in `area`, clipped to it
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
