//! Terminal rendering of the dashboard.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};
use studyspace_occupancy::{FleetSummary, NodeStatus, NodeSummary};

use crate::state::{DashboardState, DashboardView};

/// Height of one node card, borders included.
const CARD_HEIGHT: u16 = 6;

/// Narrowest a node card is laid out.
const CARD_MIN_WIDTH: u16 = 28;

/// Height of the row of stat cards.
const STATS_HEIGHT: u16 = 4;

/// Scroll position of the node grid
#[derive(Debug, Default)]
pub struct UiState {
    /// Card rows scrolled past
    pub scroll: usize,
    /// Largest useful scroll, set during render
    pub max_scroll: usize,
}

impl UiState {
    /// Create a new UI state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scroll: 0,
            max_scroll: 0,
        }
    }

    /// Scroll the node grid up one row
    pub const fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Scroll the node grid down one row
    pub fn scroll_down(&mut self) {
        self.scroll = (self.scroll + 1).min(self.max_scroll);
    }

    /// Forget the scroll position while no node grid is shown
    pub const fn reset_scroll(&mut self) {
        self.scroll = 0;
        self.max_scroll = 0;
    }
}

/// Render the whole dashboard
pub fn render_ui(frame: &mut Frame, state: &DashboardState, ui_state: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);

    let view = state.view();
    if !matches!(view, DashboardView::Populated(_)) {
        ui_state.reset_scroll();
    }

    match view {
        DashboardView::Loading => {
            render_status_text(frame, chunks[1], "Loading…", Style::default());
        }
        DashboardView::Failed(message) => {
            render_status_text(frame, chunks[1], message, Style::default().fg(Color::Red));
        }
        DashboardView::Empty => {
            render_status_text(
                frame,
                chunks[1],
                "No readings yet. Waiting for nodes…",
                Style::default(),
            );
        }
        DashboardView::Populated(nodes) => {
            render_populated(frame, chunks[1], nodes, ui_state);
        }
    }

    render_footer(frame, chunks[2], ui_state);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header_text = vec![
        Line::from(vec![Span::styled(
            "Study Space Scanner",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![Span::styled(
            "Live occupancy from all scanner nodes.",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let paragraph = Paragraph::new(header_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_status_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(1)));

    frame.render_widget(paragraph, area);
}

fn render_populated(frame: &mut Frame, area: Rect, nodes: &[NodeStatus], ui_state: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STATS_HEIGHT), Constraint::Min(0)])
        .split(area);

    render_stats(frame, chunks[0], &FleetSummary::from_nodes(nodes));

    let cards: Vec<NodeSummary> = nodes.iter().map(NodeSummary::from_status).collect();
    render_node_grid(frame, chunks[1], &cards, ui_state);
}

fn render_stats(frame: &mut Frame, area: Rect, fleet: &FleetSummary) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    render_stat_card(frame, columns[0], "Nodes Online", fleet.total_nodes.to_string());
    render_stat_card(frame, columns[1], "Total Seats", fleet.total_seats.to_string());
    render_stat_card(frame, columns[2], "Free Seats", fleet.total_free.to_string());

    let percent = u16::try_from(fleet.overall_occupancy.clamp(0, 100)).unwrap_or_default();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Overall Occupancy ")
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .percent(percent)
        .label(format!("{}%", fleet.overall_occupancy));

    frame.render_widget(gauge, columns[3]);
}

fn render_stat_card(frame: &mut Frame, area: Rect, label: &str, value: String) {
    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL);

    let paragraph = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);

    frame.render_widget(paragraph, area);
}

fn render_node_grid(frame: &mut Frame, area: Rect, cards: &[NodeSummary], ui_state: &mut UiState) {
    let columns = usize::from((area.width / CARD_MIN_WIDTH).max(1));
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let total_rows = cards.len().div_ceil(columns);

    ui_state.max_scroll = total_rows.saturating_sub(visible_rows);
    ui_state.scroll = ui_state.scroll.min(ui_state.max_scroll);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (row_area, row) in row_areas
        .iter()
        .zip(cards.chunks(columns).skip(ui_state.scroll))
    {
        let ratio = u32::try_from(columns).unwrap_or(1);
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, ratio); columns])
            .split(*row_area);

        for (cell_area, card) in cell_areas.iter().zip(row) {
            render_node_card(frame, *cell_area, card);
        }
    }
}

fn render_node_card(frame: &mut Frame, area: Rect, card: &NodeSummary) {
    let accent = if card.is_full() {
        Color::Red
    } else {
        Color::Green
    };

    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", card.node_id),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .title(
            Line::from(Span::styled(
                format!(" {} ", card.availability),
                Style::default().fg(accent),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let lines = vec![
        Line::from(card.used_label()),
        Line::from(vec![
            Span::raw("Free seats: "),
            Span::styled(
                card.free_seats_label(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("{}% occupancy", card.occupancy)),
        Line::from(vec![
            Span::styled("Last update: ", Style::default().fg(Color::Gray)),
            Span::raw(card.last_update.clone()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let mut spans = vec![
        Span::styled(
            "Keys: ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::styled(":quit ", Style::default()),
    ];

    if ui_state.max_scroll > 0 {
        spans.extend(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!(":scroll ({}/{}) ", ui_state.scroll + 1, ui_state.max_scroll + 1),
                Style::default(),
            ),
        ]);
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
