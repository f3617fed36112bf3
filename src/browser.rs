use ratatui::{
    layout::{Constraint, Layout},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::fmt::money;
use crate::models::SalesRecord;
use crate::tui::{self, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE};

const PAGE_SIZE: usize = 20;

enum BrowseMode {
    Normal,
    Search(String),
}

pub enum BrowseAction {
    Continue,
    Close,
}

/// Paginated view over the derived sales table with incremental text
/// search (`/`) against product and category.
pub struct SalesBrowser {
    records: Vec<SalesRecord>,
    query: String,
    offset: usize,
    visible_count: usize,
    selected: usize,
    mode: BrowseMode,
    table_state: TableState,
}

impl SalesBrowser {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self {
            records,
            query: String::new(),
            offset: 0,
            visible_count: PAGE_SIZE,
            selected: 0,
            mode: BrowseMode::Normal,
            table_state: TableState::default(),
        }
    }

    /// Indices of records matching the current query (all when empty).
    fn filtered(&self) -> Vec<usize> {
        if self.query.is_empty() {
            return (0..self.records.len()).collect();
        }
        let q = self.query.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.product.to_lowercase().contains(&q)
                    || r.category
                        .as_deref()
                        .map(|c| c.to_lowercase().contains(&q))
                        .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub fn draw(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let [title_area, table_area, keys_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let visible = self.filtered();
        let total: f64 = visible
            .iter()
            .map(|&i| self.records[i].revenue)
            .sum();

        let title = if self.query.is_empty() {
            format!(
                " Registros de Vendas — {} linhas, faturamento {}",
                visible.len(),
                money(total)
            )
        } else {
            format!(
                " Registros de Vendas — filtro '{}': {} linhas, faturamento {}",
                self.query,
                visible.len(),
                money(total)
            )
        };
        frame.render_widget(Paragraph::new(title).style(HEADER_STYLE), title_area);

        // Clamp scroll state to the filtered set
        if self.offset >= visible.len() {
            self.offset = visible.len().saturating_sub(1);
        }
        let available = table_area.height.saturating_sub(2) as usize; // header + margin
        self.visible_count = available.max(1);
        if self.selected >= self.visible_count {
            self.selected = self.visible_count - 1;
        }

        // Product column gets whatever width the fixed columns leave over
        let fixed_cols: u16 = 10 + 16 + 14 + 5 + 8 + 14;
        let spacing = 6u16;
        let product_width = table_area
            .width
            .saturating_sub(fixed_cols + spacing)
            .max(10) as usize;

        let rows: Vec<Row> = visible
            .iter()
            .skip(self.offset)
            .take(self.visible_count)
            .map(|&i| {
                let r = &self.records[i];
                let (wrapped_product, line_count) = tui::wrap_text(&r.product, product_width);
                let stock = r
                    .stock_level
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "\u{2014}".to_string());
                Row::new(vec![
                    Cell::from(r.date.format("%Y-%m-%d").to_string()),
                    Cell::from(wrapped_product),
                    Cell::from(r.category.clone().unwrap_or_default()),
                    Cell::from(money(r.unit_price)),
                    Cell::from(r.quantity_sold.to_string()),
                    Cell::from(stock),
                    Cell::from(tui::money_span(r.revenue)),
                ])
                .height(line_count)
            })
            .collect();

        let widths = vec![
            Constraint::Length(10),
            Constraint::Fill(1),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(14),
        ];
        let header = Row::new(vec![
            "Data",
            "Produto",
            "Categoria",
            "Preço Unit.",
            "Qtd",
            "Estoque",
            "Faturamento",
        ])
        .style(HEADER_STYLE)
        .bottom_margin(1);

        let sel = self.selected.min(rows.len().saturating_sub(1));
        self.table_state.select(Some(sel));
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(table, table_area, &mut self.table_state);

        let hint = match &self.mode {
            BrowseMode::Search(buf) => format!(" Busca: {buf}_  (Enter=aplicar  Esc=cancelar)"),
            BrowseMode::Normal => {
                " Up/Down=navegar  PgUp/PgDn=página  /=buscar  Esc=limpar/voltar".to_string()
            }
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, FOOTER_STYLE)),
            keys_area,
        );
    }

    pub fn handle_key(&mut self, code: crossterm::event::KeyCode) -> BrowseAction {
        use crossterm::event::KeyCode;

        if let BrowseMode::Search(ref mut buf) = self.mode {
            match code {
                KeyCode::Esc => {
                    self.mode = BrowseMode::Normal;
                }
                KeyCode::Enter => {
                    self.query = std::mem::take(buf);
                    self.offset = 0;
                    self.selected = 0;
                    self.mode = BrowseMode::Normal;
                }
                KeyCode::Backspace => {
                    buf.pop();
                }
                KeyCode::Char(c) => {
                    buf.push(c);
                }
                _ => {}
            }
            return BrowseAction::Continue;
        }

        let count = self.filtered().len();
        match code {
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                } else if self.offset > 0 {
                    self.offset -= 1;
                }
            }
            KeyCode::Down => {
                let last_visible = (count.saturating_sub(self.offset)).min(self.visible_count);
                if self.selected + 1 < last_visible {
                    self.selected += 1;
                } else if self.offset + self.visible_count < count {
                    self.offset += 1;
                }
            }
            KeyCode::PageUp => {
                self.offset = self.offset.saturating_sub(self.visible_count);
            }
            KeyCode::PageDown => {
                if self.offset + self.visible_count < count {
                    self.offset = (self.offset + self.visible_count)
                        .min(count.saturating_sub(1));
                }
            }
            KeyCode::Home => {
                self.offset = 0;
                self.selected = 0;
            }
            KeyCode::End => {
                self.offset = count.saturating_sub(self.visible_count);
                self.selected = count.saturating_sub(self.offset).saturating_sub(1);
            }
            KeyCode::Char('/') => {
                self.mode = BrowseMode::Search(self.query.clone());
            }
            KeyCode::Esc => {
                if self.query.is_empty() {
                    return BrowseAction::Close;
                }
                self.query.clear();
                self.offset = 0;
                self.selected = 0;
            }
            KeyCode::Char('q') => return BrowseAction::Close,
            _ => {}
        }
        BrowseAction::Continue
    }
}
