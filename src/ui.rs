use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph, Row, Table,
        TableState, Widget,
    },
    Frame,
};

use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::MapLayers;
use crate::stats::{format_count, format_delta, MetricKind};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Dashboard
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26), // Selector
            Constraint::Min(30),    // Summary and map
            Constraint::Length(38), // Table and graph
        ])
        .split(chunks[0]);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(columns[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(6)])
        .split(columns[2]);

    render_selector(frame, app, columns[0]);
    render_info_boxes(frame, app, center[0]);
    render_map(frame, app, center[1]);
    render_table(frame, app, right[0]);
    render_graph(frame, app, right[1]);
    render_status_bar(frame, app, chunks[1]);
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn render_selector(frame: &mut Frame, app: &App, area: Rect) {
    let selection = app.dashboard.selection();
    let items: Vec<ListItem> = app
        .dashboard
        .selector_options()
        .iter()
        .map(|option| {
            let style = if &option.key == selection {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(option.label.as_str()).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(titled_block("Countries"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selector_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Today and total for each metric; the active one is outlined in its colour
fn render_info_boxes(frame: &mut Frame, app: &App, area: Rect) {
    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let counters = app.dashboard.summary().map(|summary| summary.counters).unwrap_or_default();
    let active = app.dashboard.metric();

    for (metric, area) in MetricKind::ALL.into_iter().zip(boxes.iter()) {
        let (today, total) = counters.pair(metric);
        let border = if metric == active {
            Style::default().fg(metric.color()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(metric.title(), Style::default().fg(metric.color())));
        let text = vec![
            Line::from(Span::styled(format_delta(today), Style::default().fg(metric.color()))),
            Line::from(vec![
                Span::styled(format_count(total), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(" Total", Style::default().fg(Color::DarkGray)),
            ]),
        ];
        frame.render_widget(Paragraph::new(text).block(block), *area);
    }
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("{} - {}", app.dashboard.selection_label(), app.dashboard.metric().title());
    let block = titled_block(&title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let markers = app.markers();
    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        app.dashboard.viewport(),
        &markers,
    );

    frame.render_widget(
        MapWidget {
            layers,
            marker_color: app.dashboard.metric().color(),
        },
        inner,
    );
}

/// Braille map layers with text labels overlaid
struct MapWidget {
    layers: MapLayers,
    marker_color: Color,
}

impl MapWidget {
    /// Copy the lit cells of one layer into the buffer in `color`
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                if let Some(ch) = canvas.glyph(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        Self::render_layer(&self.layers.borders, Color::DarkGray, area, buf);
        Self::render_layer(&self.layers.markers, self.marker_color, area, buf);
        Self::render_layer(&self.layers.selected, Color::Yellow, area, buf);

        let label_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let max_len = (area.width - lx) as usize;
            buf.set_stringn(area.x + lx, area.y + ly, text, max_len, label_style);
        }
    }
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["Country", "Cases"]).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = app.dashboard.table().iter().map(|record| {
        Row::new([
            Cell::from(record.name.as_str()),
            Cell::from(format_count(record.counters.cases)),
        ])
    });

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(13)])
        .header(header)
        .block(titled_block("Cases by Country"));
    let mut state = TableState::default().with_offset(app.table_offset());
    frame.render_stateful_widget(table, area, &mut state);
}

/// Worldwide new values per day for the active metric
fn render_graph(frame: &mut Frame, app: &App, area: Rect) {
    let metric = app.dashboard.metric();
    let points = app.dashboard.graph_points();
    let title = format!("Worldwide new {}", metric.label());
    let block = titled_block(&title);

    if points.is_empty() {
        let empty = Paragraph::new(Span::styled("no history", Style::default().fg(Color::DarkGray))).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.value as f64))
        .collect();
    let max = points.iter().map(|point| point.value).max().unwrap_or(0);
    let last_x = (points.len() - 1).max(1) as f64;

    let first_date = points[0].date.format("%b %d").to_string();
    let last_date = points[points.len() - 1].date.format("%b %d").to_string();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(metric.color()))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, last_x])
                .labels([first_date, last_date]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, max.max(1) as f64])
                .labels(["0".to_string(), format_count(Some(max))]),
        );
    frame.render_widget(chart, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool, on_text: &'static str, off_text: &'static str| {
        Span::styled(
            if on { on_text } else { off_text },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let state = match (app.dashboard.last_error(), app.dashboard.pending()) {
        (Some(message), _) => Span::styled(format!(" {message} "), Style::default().fg(Color::Red)),
        (None, 0) => Span::styled(" ready ", Style::default().fg(Color::Green)),
        (None, pending) => Span::styled(format!(" loading ({pending}) "), Style::default().fg(Color::Yellow)),
    };

    let status = Line::from(vec![
        state,
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        toggle(settings.show_borders, "[B]order ", "[b]order "),
        toggle(settings.show_markers, "[M]arkers ", "[m]arkers "),
        toggle(settings.show_labels, "[L]abels ", "[l]abels "),
        Span::styled(
            "| j/k:move enter:select w:world 1-3/tab:metric pgup/pgdn:table q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
