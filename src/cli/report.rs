use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::{Result, VendasError};
use crate::fmt::{money, number, percent};
use crate::loader::{self, LoadReport};
use crate::metrics;
use crate::models::SalesRecord;

fn load_for_report(file: &str) -> Result<Vec<SalesRecord>> {
    let LoadReport { records, skipped } = loader::load(Path::new(file))?;
    if skipped > 0 {
        eprintln!(
            "{}",
            format!("Aviso: {skipped} linha(s) inválida(s) ignorada(s)").yellow()
        );
    }
    Ok(records)
}

pub fn summary(file: &str) -> Result<()> {
    let records = load_for_report(file)?;
    let totals = metrics::summary_totals(&records);

    let mut table = Table::new();
    table.set_header(vec!["Indicador", "Valor"]);
    table.add_row(vec![
        Cell::new("Faturamento Acumulado"),
        Cell::new(money(totals.total_revenue)),
    ]);
    table.add_row(vec![
        Cell::new("Volume de Itens"),
        Cell::new(number(totals.total_units)),
    ]);
    table.add_row(vec![
        Cell::new("Preço Médio Unitário"),
        Cell::new(
            totals
                .average_unit_price
                .map(money)
                .unwrap_or_else(|| "\u{2014}".to_string()),
        ),
    ]);
    println!("Resumo de Vendas\n{table}");
    Ok(())
}

pub fn monthly(file: &str) -> Result<()> {
    let records = load_for_report(file)?;
    let months = metrics::monthly_revenue(&records);

    if months.is_empty() {
        println!("Nenhum registro de venda encontrado.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Mês", "Faturamento"]);
    for m in &months {
        table.add_row(vec![Cell::new(&m.month_key), Cell::new(money(m.total_revenue))]);
    }
    let total: f64 = months.iter().map(|m| m.total_revenue).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(total)),
    ]);
    println!("Evolução Mensal\n{table}");
    Ok(())
}

pub fn stock(file: &str, threshold: i64) -> Result<()> {
    let records = load_for_report(file)?;
    let items = metrics::low_stock_items(&records, threshold);

    if items.is_empty() {
        println!("Nenhum produto com estoque até {threshold} unidades.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Produto", "Estoque"]);
    for item in &items {
        let stock_cell = if item.stock_level == 0 {
            Cell::new(item.stock_level.to_string().red().to_string())
        } else {
            Cell::new(item.stock_level)
        };
        table.add_row(vec![Cell::new(&item.product), stock_cell]);
    }
    println!("Alerta de Estoque (≤ {threshold})\n{table}");
    Ok(())
}

pub fn top(file: &str) -> Result<()> {
    let records = load_for_report(file)?;
    let product = metrics::top_product(&records)?;
    let total: f64 = records
        .iter()
        .filter(|r| r.product == product)
        .map(|r| r.revenue)
        .sum();
    println!(
        "Produto destaque: {} ({})",
        product.bold(),
        money(total)
    );
    Ok(())
}

pub fn insights(file: &str, threshold: i64) -> Result<()> {
    let records = load_for_report(file)?;

    if records.is_empty() {
        println!("Nenhum registro de venda encontrado.");
        return Ok(());
    }

    println!("Conclusões do Sistema\n");

    // Growth between first and last month
    let months = metrics::monthly_revenue(&records);
    match metrics::period_growth(&months) {
        Ok(delta) if delta > 0.0 => {
            println!(
                "{}",
                format!(
                    "Crescimento positivo de {} detectado no período.",
                    percent(delta)
                )
                .green()
            );
        }
        Ok(delta) => {
            println!(
                "{}",
                format!(
                    "Queda de faturamento de {}. Recomenda-se revisão de estoque.",
                    percent(delta.abs())
                )
                .yellow()
            );
        }
        Err(VendasError::InsufficientData) => {
            println!("Período único de dados — sem comparação de crescimento.");
        }
        Err(VendasError::DivisionByZero) => {
            println!("Faturamento inicial zerado — crescimento indefinido.");
        }
        Err(e) => return Err(e),
    }

    // Top product
    let product = metrics::top_product(&records)?;
    println!("Produto com maior faturamento: {}", product.bold());

    // Stock alerts
    let items = metrics::low_stock_items(&records, threshold);
    if items.is_empty() {
        println!("Nenhum alerta de estoque (limite {threshold}).");
    } else {
        println!(
            "{}",
            format!("{} produto(s) com estoque baixo:", items.len()).yellow()
        );
        for item in &items {
            println!("  {} — {} unidade(s)", item.product, item.stock_level);
        }
    }
    Ok(())
}

pub fn records(file: &str, search: Option<&str>) -> Result<()> {
    let all = load_for_report(file)?;

    let rows: Vec<&SalesRecord> = match search {
        Some(q) => {
            let q = q.to_lowercase();
            all.iter()
                .filter(|r| {
                    r.product.to_lowercase().contains(&q)
                        || r.category
                            .as_deref()
                            .map(|c| c.to_lowercase().contains(&q))
                            .unwrap_or(false)
                })
                .collect()
        }
        None => all.iter().collect(),
    };

    if rows.is_empty() {
        println!("Nenhum registro encontrado.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Data",
        "Produto",
        "Categoria",
        "Preço Unit.",
        "Qtd",
        "Estoque",
        "Faturamento",
    ]);
    for r in &rows {
        table.add_row(vec![
            Cell::new(r.date.format("%Y-%m-%d")),
            Cell::new(&r.product),
            Cell::new(r.category.as_deref().unwrap_or("")),
            Cell::new(money(r.unit_price)),
            Cell::new(r.quantity_sold),
            Cell::new(
                r.stock_level
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "\u{2014}".to_string()),
            ),
            Cell::new(money(r.revenue)),
        ]);
    }
    let total: f64 = rows.iter().map(|r| r.revenue).sum();
    println!(
        "Base de Dados ({} registros, faturamento {})\n{table}",
        rows.len(),
        money(total)
    );
    Ok(())
}
