use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::seq::SliceRandom;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::browser::{BrowseAction, SalesBrowser};
use crate::error::{Result, VendasError};
use crate::fmt::{money, number, percent};
use crate::loader;
use crate::metrics;
use crate::models::{LowStockItem, SalesRecord, SummaryTotals};
use crate::settings::{load_settings, save_settings};
use crate::tui::{
    money_span, FOOTER_STYLE, GROWTH_NEG_STYLE, GROWTH_POS_STYLE, HEADER_STYLE, WARNING_STYLE,
};

const TIPS: &[&str] = &[
    "Dica: use / na aba de registros para filtrar por produto ou categoria.",
    "Dica: r recarrega o arquivo sem sair do painel.",
    "Dica: vendas template gera um CSV modelo para preencher.",
    "Dica: vendas report insights imprime as conclusões sem abrir o painel.",
    "Dica: arquivos XLSX também são aceitos.",
];

enum Screen {
    Overview,
    Records(SalesBrowser),
    Insights,
}

enum Source {
    File(PathBuf),
    Sample,
}

impl Source {
    fn label(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Sample => "dados de exemplo".to_string(),
        }
    }
}

/// Everything the dashboard shows, recomputed in full on every (re)load.
struct DashboardData {
    records: Vec<SalesRecord>,
    totals: SummaryTotals,
    month_labels: Vec<String>,
    month_values: Vec<u64>,
    growth: std::result::Result<f64, VendasError>,
    top_product: Option<String>,
    low_stock: Vec<LowStockItem>,
    skipped: usize,
}

struct Dashboard {
    screen: Screen,
    source: Source,
    data: DashboardData,
    stock_threshold: i64,
    status_message: Option<String>,
    tip: String,
}

fn month_label(month_key: &str) -> String {
    let Some((year, month)) = month_key.split_once('-') else {
        return month_key.to_string();
    };
    let name = match month {
        "01" => "Jan",
        "02" => "Fev",
        "03" => "Mar",
        "04" => "Abr",
        "05" => "Mai",
        "06" => "Jun",
        "07" => "Jul",
        "08" => "Ago",
        "09" => "Set",
        "10" => "Out",
        "11" => "Nov",
        "12" => "Dez",
        _ => return month_key.to_string(),
    };
    format!("{name}/{}", &year[2..])
}

fn compute_data(source: &Source, threshold: i64) -> Result<DashboardData> {
    let (records, skipped) = match source {
        Source::File(path) => {
            let report = loader::load(path)?;
            (report.records, report.skipped)
        }
        Source::Sample => (super::sample::generate_records(super::sample::DEFAULT_ROWS), 0),
    };

    let totals = metrics::summary_totals(&records);
    let months = metrics::monthly_revenue(&records);
    let growth = metrics::period_growth(&months);
    let top_product = metrics::top_product(&records).ok();
    let low_stock = metrics::low_stock_items(&records, threshold);

    let month_labels = months.iter().map(|m| month_label(&m.month_key)).collect();
    let month_values = months
        .iter()
        .map(|m| m.total_revenue.max(0.0) as u64)
        .collect();

    Ok(DashboardData {
        records,
        totals,
        month_labels,
        month_values,
        growth,
        top_product,
        low_stock,
        skipped,
    })
}

impl Dashboard {
    fn new(source: Source, threshold: i64) -> Result<Self> {
        let data = compute_data(&source, threshold)?;
        let mut rng = rand::thread_rng();
        let tip = TIPS.choose(&mut rng).unwrap_or(&TIPS[0]).to_string();
        Ok(Self {
            screen: Screen::Overview,
            source,
            data,
            stock_threshold: threshold,
            status_message: None,
            tip,
        })
    }

    fn reload(&mut self) {
        match compute_data(&self.source, self.stock_threshold) {
            Ok(data) => {
                self.data = data;
                self.status_message = Some("Dados recarregados.".to_string());
            }
            Err(e) => {
                self.status_message = Some(format!("Falha ao recarregar: {e}"));
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if let Screen::Records(ref mut browser) = self.screen {
            browser.draw(frame, area);
            return;
        }

        let [header_area, sep1, kpi_area, sep2, body_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(
                " Painel de Performance Comercial — {}",
                self.source.label()
            ))
            .style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        let sep_widget =
            Paragraph::new(sep_line.as_str()).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget, sep2);

        if self.data.records.is_empty() {
            self.draw_empty(frame, kpi_area, body_area);
        } else {
            self.draw_kpis(frame, kpi_area);
            match self.screen {
                Screen::Insights => self.draw_insights(frame, body_area),
                _ => self.draw_chart(frame, body_area),
            }
        }

        let hint = if let Some(msg) = &self.status_message {
            Span::styled(format!(" {msg}"), WARNING_STYLE)
        } else {
            let tabs = match self.screen {
                Screen::Insights => " [1]Gráfico  [2]Registros  [3]Conclusões*",
                _ => " [1]Gráfico*  [2]Registros  [3]Conclusões",
            };
            Span::styled(
                format!("{tabs}  r=recarregar  q=sair   {}", self.tip),
                FOOTER_STYLE,
            )
        };
        frame.render_widget(Paragraph::new(Line::from(hint)), hints_area);
    }

    fn draw_empty(&self, frame: &mut Frame, kpi_area: Rect, body_area: Rect) {
        // Zeroed KPIs, never a crash
        let lines = vec![
            Line::from(format!(" Faturamento Acumulado   {}", money(0.0))),
            Line::from(format!(" Volume de Itens         {}", number(0))),
            Line::from(" Preço Médio Unitário    \u{2014}".to_string()),
        ];
        frame.render_widget(Paragraph::new(lines), kpi_area);
        let placeholder = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Aguardando carregamento de dados...",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Nenhuma venda no arquivo. Gere um modelo com: vendas template",
                FOOTER_STYLE,
            )),
        ];
        frame.render_widget(Paragraph::new(placeholder), body_area);
    }

    fn draw_kpis(&self, frame: &mut Frame, kpi_area: Rect) {
        let [left, mid, right] = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .areas(kpi_area);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let kpi = |title: &str, value: Span<'static>| {
            Paragraph::new(vec![
                Line::from(Span::styled(format!(" {title}"), bold)),
                Line::from(vec![Span::raw(" "), value]),
            ])
        };

        frame.render_widget(
            kpi(
                "Faturamento Acumulado",
                money_span(self.data.totals.total_revenue),
            ),
            left,
        );
        frame.render_widget(
            kpi(
                "Volume de Itens",
                Span::raw(number(self.data.totals.total_units)),
            ),
            mid,
        );
        let avg = self
            .data
            .totals
            .average_unit_price
            .map(money)
            .unwrap_or_else(|| "\u{2014}".to_string());
        frame.render_widget(kpi("Preço Médio Unitário", Span::raw(avg)), right);

        if self.data.skipped > 0 {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {} linha(s) inválida(s) ignorada(s)", self.data.skipped),
                    WARNING_STYLE,
                )),
                Rect {
                    y: kpi_area.y + 3,
                    height: 1,
                    ..kpi_area
                },
            );
        }
    }

    fn draw_chart(&self, frame: &mut Frame, body_area: Rect) {
        if self.data.month_labels.is_empty() {
            return;
        }
        let max_val = self
            .data
            .month_values
            .iter()
            .copied()
            .max()
            .unwrap_or(1) as f64;
        let (top_tick, mid_tick) = y_axis_ticks(max_val);
        let top_label = format_k(top_tick);
        let mid_label = format_k(mid_tick);
        let y_label_width = top_label.len().max(mid_label.len()) as u16 + 1;

        let [y_axis_area, bar_area] =
            Layout::horizontal([Constraint::Length(y_label_width), Constraint::Fill(1)])
                .areas(body_area);

        // Y-axis labels: top tick near top, mid tick at middle
        let inner_height = bar_area.height.saturating_sub(2); // title + month labels
        let mid_row = inner_height / 2;
        let mut y_lines: Vec<Line> = vec![Line::from("")]; // title row
        for row in 0..inner_height {
            if row == 0 {
                y_lines.push(Line::from(Span::styled(
                    format!("{:>width$}", top_label, width = y_label_width as usize),
                    FOOTER_STYLE,
                )));
            } else if row == mid_row {
                y_lines.push(Line::from(Span::styled(
                    format!("{:>width$}", mid_label, width = y_label_width as usize),
                    FOOTER_STYLE,
                )));
            } else {
                y_lines.push(Line::from(""));
            }
        }
        frame.render_widget(Paragraph::new(y_lines), y_axis_area);

        let bar_style = Style::default().fg(Color::Rgb(0, 123, 255));
        let groups: Vec<BarGroup> = self
            .data
            .month_labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let val = self.data.month_values.get(i).copied().unwrap_or(0);
                let bars = vec![Bar::default().value(val).style(bar_style)];
                BarGroup::default()
                    .label(Line::from(label.as_str()))
                    .bars(&bars)
            })
            .collect();

        let block = Block::default()
            .title("Evolução Mensal — Faturamento")
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::NONE);

        let mut chart = BarChart::default()
            .block(block)
            .bar_width(6)
            .bar_gap(1)
            .group_gap(1);
        for group in &groups {
            chart = chart.data(group.clone());
        }
        frame.render_widget(chart, bar_area);
    }

    fn draw_insights(&self, frame: &mut Frame, body_area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                " Conclusões do Sistema",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        match &self.data.growth {
            Ok(delta) if *delta > 0.0 => lines.push(Line::from(Span::styled(
                format!(
                    " Crescimento positivo de {} detectado no período.",
                    percent(*delta)
                ),
                GROWTH_POS_STYLE,
            ))),
            Ok(delta) => lines.push(Line::from(Span::styled(
                format!(
                    " Queda de faturamento de {}. Recomenda-se revisão de estoque.",
                    percent(delta.abs())
                ),
                WARNING_STYLE,
            ))),
            Err(VendasError::InsufficientData) => lines.push(Line::from(
                " Período único de dados — sem comparação de crescimento.",
            )),
            Err(VendasError::DivisionByZero) => lines.push(Line::from(
                " Faturamento inicial zerado — crescimento indefinido.",
            )),
            Err(e) => lines.push(Line::from(format!(" Erro: {e}"))),
        }

        if let Some(product) = &self.data.top_product {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw(" Produto com maior faturamento: "),
                Span::styled(product.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]));
        }

        lines.push(Line::from(""));
        if self.data.low_stock.is_empty() {
            lines.push(Line::from(format!(
                " Nenhum alerta de estoque (limite {}).",
                self.stock_threshold
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!(
                    " Alerta de Estoque — {} produto(s) com até {} unidade(s):",
                    self.data.low_stock.len(),
                    self.stock_threshold
                ),
                WARNING_STYLE,
            )));
            for item in &self.data.low_stock {
                let style = if item.stock_level == 0 {
                    GROWTH_NEG_STYLE
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("   {:<24} {:>3} un.", item.product, item.stock_level),
                    style,
                )));
            }
        }
        frame.render_widget(Paragraph::new(lines), body_area);
    }

    /// Returns true when the dashboard should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Screen::Records(ref mut browser) = self.screen {
            if let BrowseAction::Close = browser.handle_key(code) {
                self.screen = Screen::Overview;
            }
            return false;
        }

        self.status_message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('1') => self.screen = Screen::Overview,
            KeyCode::Char('2') => {
                self.screen = Screen::Records(SalesBrowser::new(self.data.records.clone()));
            }
            KeyCode::Char('3') => self.screen = Screen::Insights,
            KeyCode::Tab => {
                self.screen = match self.screen {
                    Screen::Overview => {
                        Screen::Records(SalesBrowser::new(self.data.records.clone()))
                    }
                    Screen::Records(_) => Screen::Insights,
                    Screen::Insights => Screen::Overview,
                };
            }
            _ => {}
        }
        false
    }
}

/// Pick nice round y-axis tick values (top and mid) given a max data value.
fn y_axis_ticks(max_val: f64) -> (f64, f64) {
    let steps = [
        1000.0, 2500.0, 5000.0, 10000.0, 25000.0, 50000.0, 100000.0, 250000.0, 500000.0,
        1000000.0, 2500000.0, 5000000.0, 10000000.0,
    ];
    let top = steps
        .iter()
        .copied()
        .find(|&s| s >= max_val)
        .unwrap_or(max_val);
    let mid = top / 2.0;
    (top, mid)
}

/// Compact currency for axis labels: "R$ 25k", "R$ 1,5M".
fn format_k(val: f64) -> String {
    if val >= 1_000_000.0 {
        let m = val / 1_000_000.0;
        if m == m.floor() {
            format!("R$ {}M", m as u64)
        } else {
            format!("R$ {:.1}M", m).replace('.', ",")
        }
    } else if val >= 1000.0 {
        let k = val / 1000.0;
        if k == k.floor() {
            format!("R$ {}k", k as u64)
        } else {
            format!("R$ {:.1}k", k).replace('.', ",")
        }
    } else {
        format!("R$ {}", val as u64)
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(file: Option<&str>, sample: bool) -> Result<()> {
    let mut settings = load_settings();

    let source = if sample {
        Source::Sample
    } else {
        let path = match file {
            Some(f) => PathBuf::from(f),
            None if !settings.last_file.is_empty() => PathBuf::from(&settings.last_file),
            None => {
                return Err(VendasError::Other(
                    "Nenhum arquivo informado. Use: vendas dashboard <arquivo> (ou --sample)"
                        .into(),
                ))
            }
        };
        if !path.exists() {
            return Err(VendasError::Other(format!(
                "Arquivo não encontrado: {}",
                path.display()
            )));
        }
        Source::File(path)
    };

    let mut dashboard = Dashboard::new(source, settings.low_stock_threshold)?;

    // Remember the file for argument-less restarts
    if let Source::File(path) = &dashboard.source {
        settings.last_file = path.display().to_string();
        save_settings(&settings)?;
    }

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                if dashboard.handle_key(key.code) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}
