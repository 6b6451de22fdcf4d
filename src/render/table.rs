//! Tabular output
//!
//! A small column-aligned table supporting multi-line cells, plus the renderer that
//! lays out one table per in-scope kind.

use owo_colors::OwoColorize;
use std::fmt::Write as _;

use super::ViewRenderer;
use crate::domain::{HealthStatus, ResourceKind};
use crate::errors::Result;
use crate::filter::FilterParams;
use crate::view::ConfigView;

const COLUMN_GAP: &str = "  ";

/// Emphasis applied to a cell when color is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellStyle {
    #[default]
    Plain,
    Good,
    Bad,
}

impl CellStyle {
    fn for_health(status: &str) -> Self {
        match HealthStatus::from_envoy(status) {
            HealthStatus::Healthy => CellStyle::Good,
            HealthStatus::Unhealthy => CellStyle::Bad,
            HealthStatus::Unknown => CellStyle::Plain,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Cell {
    text: String,
    style: CellStyle,
}

/// Column-aligned table; a cell containing newlines spans several lines of its row.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self { headers: headers.to_vec(), rows: Vec::new() }
    }

    /// Append a row of plain cells. Missing trailing cells render empty.
    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.add_styled_row(cells.into_iter().map(|text| (text, CellStyle::Plain)));
    }

    pub fn add_styled_row<S: Into<String>>(
        &mut self,
        cells: impl IntoIterator<Item = (S, CellStyle)>,
    ) {
        let row = cells.into_iter().map(|(text, style)| Cell { text: text.into(), style }).collect();
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate().take(widths.len()) {
                let widest = cell.text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
                widths[index] = widths[index].max(widest);
            }
        }
        widths
    }

    /// Render the header, a separator line and every row
    pub fn render(&self, color: bool) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header: Vec<String> =
            self.headers.iter().zip(&widths).map(|(h, w)| format!("{:<w$}", h, w = w)).collect();
        let header = header.join(COLUMN_GAP);
        if color {
            let _ = writeln!(out, "{}", header.trim_end().bold());
        } else {
            let _ = writeln!(out, "{}", header.trim_end());
        }

        let total = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);
        let _ = writeln!(out, "{}", "-".repeat(total));

        for row in &self.rows {
            let cell_lines: Vec<Vec<&str>> = (0..widths.len())
                .map(|index| row.get(index).map(|cell| cell.text.lines().collect()).unwrap_or_default())
                .collect();
            let height = cell_lines.iter().map(Vec::len).max().unwrap_or(0).max(1);

            for line_index in 0..height {
                let mut line = String::new();
                for (index, width) in widths.iter().enumerate() {
                    if index > 0 {
                        line.push_str(COLUMN_GAP);
                    }
                    let text = cell_lines[index].get(line_index).copied().unwrap_or_default();
                    let style = row.get(index).map(|cell| cell.style).unwrap_or_default();
                    line.push_str(&paint(text, style, color));
                    line.push_str(&" ".repeat(width.saturating_sub(text.chars().count())));
                }
                let _ = writeln!(out, "{}", line.trim_end());
            }
        }

        out
    }
}

fn paint(text: &str, style: CellStyle, color: bool) -> String {
    if !color || text.is_empty() {
        return text.to_string();
    }
    match style {
        CellStyle::Plain => text.to_string(),
        CellStyle::Good => text.green().to_string(),
        CellStyle::Bad => text.red().to_string(),
    }
}

/// Renders every in-scope kind as its own headed table.
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    /// Line printed above everything else, typically naming the inspected proxy
    pub title: Option<String>,

    /// Predicates that were applied, summarized before the tables
    pub filters: FilterParams,

    pub color: bool,
}

impl TableRenderer {
    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn filter_summary(&self, out: &mut String) {
        if !self.filters.is_active() {
            return;
        }

        let _ = writeln!(out, "{}", self.heading("Filters applied"));
        if let Some(fqdn) = &self.filters.fqdn {
            let _ = writeln!(out, "  Fully qualified domain names must contain `{}`", fqdn);
        }
        if let Some(address) = &self.filters.address {
            let _ = writeln!(out, "  Endpoint addresses must contain `{}`", address);
        }
        if let Some(port) = self.filters.port {
            let _ = writeln!(out, "  Endpoint addresses must have the port `{}`", port);
        }
        out.push('\n');
    }

    fn table_for(&self, kind: ResourceKind, view: &ConfigView) -> Table {
        match kind {
            ResourceKind::Clusters => {
                let mut table = Table::new(&["Name", "FQDN", "Endpoints", "Type", "Last Updated"]);
                for cluster in view.clusters.iter().flatten() {
                    table.add_row([
                        cluster.name.clone(),
                        cluster.fully_qualified_name.clone(),
                        cluster.endpoints.join(", "),
                        cluster.cluster_type.clone(),
                        cluster.last_updated.clone(),
                    ]);
                }
                table
            }
            ResourceKind::Endpoints => {
                let mut table = Table::new(&["Address:Port", "Cluster", "Weight", "Status"]);
                for endpoint in view.endpoints.iter().flatten() {
                    table.add_styled_row([
                        (endpoint.address.clone(), CellStyle::Plain),
                        (endpoint.cluster.clone(), CellStyle::Plain),
                        (format!("{:.2}", endpoint.weight), CellStyle::Plain),
                        (endpoint.status.clone(), CellStyle::for_health(&endpoint.status)),
                    ]);
                }
                table
            }
            ResourceKind::Listeners => {
                let mut table = Table::new(&[
                    "Name",
                    "Address:Port",
                    "Direction",
                    "Filter Chain Match",
                    "Filters",
                    "Last Updated",
                ]);
                for listener in view.listeners.iter().flatten() {
                    if listener.filter_chain.is_empty() {
                        table.add_row([
                            listener.name.clone(),
                            listener.address.clone(),
                            listener.direction.to_string(),
                            String::new(),
                            String::new(),
                            listener.last_updated.clone(),
                        ]);
                        continue;
                    }
                    for (index, chain) in listener.filter_chain.iter().enumerate() {
                        let filters = chain.filters.join("\n");
                        if index == 0 {
                            table.add_row([
                                listener.name.clone(),
                                listener.address.clone(),
                                listener.direction.to_string(),
                                chain.filter_chain_match.clone(),
                                filters,
                                listener.last_updated.clone(),
                            ]);
                        } else {
                            table.add_row([
                                String::new(),
                                String::new(),
                                String::new(),
                                chain.filter_chain_match.clone(),
                                filters,
                            ]);
                        }
                    }
                }
                table
            }
            ResourceKind::Routes => {
                let mut table = Table::new(&["Name", "Destination Cluster", "Last Updated"]);
                for route in view.routes.iter().flatten() {
                    table.add_row([
                        route.name.clone(),
                        route.destination_cluster.clone(),
                        route.last_updated.clone(),
                    ]);
                }
                table
            }
            ResourceKind::Secrets => {
                let mut table = Table::new(&[
                    "Name",
                    "Type",
                    "Status",
                    "Valid",
                    "Valid From",
                    "Valid To",
                    "Last Updated",
                ]);
                for secret in view.secrets.iter().flatten() {
                    let validity = match secret.valid.as_str() {
                        "true" => CellStyle::Good,
                        "false" => CellStyle::Bad,
                        _ => CellStyle::Plain,
                    };
                    table.add_styled_row([
                        (secret.name.clone(), CellStyle::Plain),
                        (secret.secret_type.clone(), CellStyle::Plain),
                        (secret.status.clone(), CellStyle::Plain),
                        (secret.valid.clone(), validity),
                        (secret.valid_from.clone(), CellStyle::Plain),
                        (secret.valid_to.clone(), CellStyle::Plain),
                        (secret.last_updated.clone(), CellStyle::Plain),
                    ]);
                }
                table
            }
        }
    }
}

impl ViewRenderer for TableRenderer {
    fn render(&self, view: &ConfigView) -> Result<String> {
        let mut out = String::new();

        if let Some(title) = &self.title {
            let _ = writeln!(out, "{}\n", title);
        }
        self.filter_summary(&mut out);

        for kind in view.kinds() {
            let count = view.len(kind).unwrap_or_default();
            let _ = writeln!(out, "{}", self.heading(&format!("{} ({})", kind.title(), count)));
            out.push_str(&self.table_for(kind, view).render(self.color));
            out.push('\n');
        }

        Ok(out)
    }
}
