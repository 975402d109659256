//! Rendering for the order entry demo.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::Frame;

use crate::screens::{CatalogView, StatusView, SummaryView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Catalog,
    Summary,
}

pub fn draw(
    frame: &mut Frame,
    catalog: &CatalogView,
    summary: &SummaryView,
    status: &StatusView,
    focus: Focus,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    draw_catalog(frame, panes[0], catalog, focus == Focus::Catalog);
    draw_summary(frame, panes[1], summary, focus == Focus::Summary);
    frame.render_widget(Paragraph::new(status.text()), rows[1]);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

fn selection_style(selected: bool) -> Style {
    if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn draw_catalog(frame: &mut Frame, area: Rect, catalog: &CatalogView, focused: bool) {
    let block = pane_block("Catalog", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = catalog
        .products()
        .iter()
        .enumerate()
        .map(|(index, product)| {
            Line::styled(
                format!("{:<20} ${:>8.2}", product.name, product.unit_price),
                selection_style(index == catalog.selected()),
            )
        })
        .collect();
    render_list_with_button(frame, inner, lines, catalog);
}

fn draw_summary(frame: &mut Frame, area: Rect, summary: &SummaryView, focused: bool) {
    let block = pane_block("Order", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = summary
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            Line::styled(
                format!(
                    "{}x {:<18} ${:>8.2}",
                    line.quantity,
                    line.product.name,
                    line.subtotal()
                ),
                selection_style(Some(index) == summary.selected()),
            )
        })
        .collect();
    let total: f64 = summary.lines().iter().map(|l| l.subtotal()).sum();
    lines.push(Line::raw(format!("{:<21} ${total:>8.2}", "Total")));
    render_list_with_button(frame, inner, lines, summary);
}

/// List body with the pane's button pinned to the bottom row.
fn render_list_with_button(frame: &mut Frame, area: Rect, lines: Vec<Line>, pane: &dyn Pane) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    frame.render_widget(Paragraph::new(lines), rows[0]);
    pane.render_button(rows[1], frame);
}

trait Pane {
    fn render_button(&self, area: Rect, frame: &mut Frame);
}

impl Pane for CatalogView {
    fn render_button(&self, area: Rect, frame: &mut Frame) {
        (&*self.add_button()).render(area, frame.buffer_mut());
    }
}

impl Pane for SummaryView {
    fn render_button(&self, area: Rect, frame: &mut Frame) {
        (&*self.remove_button()).render(area, frame.buffer_mut());
    }
}
