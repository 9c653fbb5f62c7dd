use crate::analysis::metrics::{total_travel_time, volume_capacity_ratio};
use crate::tui::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Row, Table};
use ratatui::Frame;

/// Iterations listed in the history table.
const HISTORY: usize = 12;

pub fn draw_app(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length((HISTORY + 3) as u16),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(build_header(app), chunks[0]);
    frame.render_widget(build_iteration_table(app), chunks[2]);
    frame.render_widget(build_link_table(app), chunks[4]);
    frame.render_widget(build_footer(), chunks[5]);
}

fn util_style(ratio: f64) -> Style {
    if ratio < 0.8 {
        Style::default().fg(Color::Green)
    } else if ratio <= 1.0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn build_header<'a>(app: &'a App<'a>) -> Block<'a> {
    let solver = &app.solver;
    let dim = Style::default().add_modifier(Modifier::DIM);
    let status = match solver.status() {
        Some(status) => format!("{:?}", status),
        None if app.running => "Running".to_string(),
        None => "Paused".to_string(),
    };

    Block::new()
        .title(Line::from(vec![
            Span::raw(" Trafficflow ").style(Style::default().bold().cyan()),
            Span::raw(format!("[{}]", app.scenario())).style(dim),
            Span::raw(" Iteration: ").style(dim),
            Span::raw(format!("{}/{}", solver.log().len(), solver.params().max_iterations))
                .style(Style::default().bold()),
            Span::raw(" Gap: ").style(dim),
            Span::raw(
                solver
                    .log()
                    .final_gap()
                    .map_or("-".to_string(), |g| format!("{:.3e}", g)),
            )
            .style(Style::default().bold()),
            Span::raw(" Total time: ").style(dim),
            Span::raw(format!("{:.1}", total_travel_time(solver.graph(), solver.flows())))
                .style(Style::default().bold()),
            Span::raw(" Demand: ").style(dim),
            Span::raw(format!("{:.0}", solver.total_demand())).style(Style::default().bold()),
            Span::raw(" "),
            Span::raw(status).style(Style::default().bold().yellow()),
            Span::raw(" "),
        ]))
        .title_alignment(Alignment::Center)
}

fn build_iteration_table<'a>(app: &'a App<'a>) -> Table<'a> {
    let records = app.solver.log().records();
    let recent = &records[records.len().saturating_sub(HISTORY)..];

    Table::new(
        recent.iter().rev().map(|record| {
            Row::new(vec![
                Cell::from(format!("{:>5}", record.iteration)),
                Cell::from(format!("{:>11.3e}", record.relative_gap)),
                Cell::from(format!("{:>12.2}", record.total_travel_time)),
                Cell::from(format!("{:>8.4}", record.step_size)),
            ])
        }),
        [
            Constraint::Length(7),
            Constraint::Length(13),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new([
            Cell::from(" Iter"),
            Cell::from("  Rel. gap"),
            Cell::from("  Total time"),
            Cell::from("  Step"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::from(" Iterations ").style(Style::default().bold()),
            ]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_link_table<'a>(app: &'a App<'a>) -> Table<'a> {
    let graph = app.solver.graph();
    let flows = app.solver.flows();

    let mut rows = graph
        .links()
        .iter()
        .map(|l| (l, volume_capacity_ratio(l, flows.get(l.id()))))
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    Table::new(
        rows.into_iter().map(|(link, ratio)| {
            let flow = flows.get(link.id());
            Row::new(vec![
                Cell::from(link.id().index().to_string()),
                Cell::from(graph.link_label(link.id())),
                Cell::from(format!("{:>6.2}", ratio)).style(util_style(ratio)),
                Cell::from(format!("{:>8.1}", flow)),
                Cell::from(format!("{:>8.1}", link.capacity())),
                Cell::from(format!("{:>7.2}", link.travel_time(flow) * 60.0)),
            ])
        }),
        [
            Constraint::Length(4),
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new([
            Cell::from("ID"),
            Cell::from("Link"),
            Cell::from("   v/c"),
            Cell::from("    Flow"),
            Cell::from("     Cap"),
            Cell::from("Time min"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::from(" Links ").style(Style::default().bold()),
            ]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_footer() -> Line<'static> {
    Line::from(" space: step  r: run/pause  q: quit ")
        .style(Style::default().add_modifier(Modifier::DIM))
}
