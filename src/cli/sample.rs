use std::path::Path;

use chrono::{Duration, NaiveDate};

use crate::error::Result;
use crate::metrics::compute_revenue;
use crate::models::{ParsedRow, SalesRecord};

pub const DEFAULT_OUTPUT: &str = "vendas_exemplo.csv";
pub const DEFAULT_ROWS: usize = 500;

/// Product catalog used for sample data.
const PRODUCTS: &[(&str, &str)] = &[
    ("Notebook", "Eletrônicos"),
    ("Smartphone", "Eletrônicos"),
    ("Mouse", "Periféricos"),
    ("Teclado", "Periféricos"),
    ("Monitor", "Eletrônicos"),
    ("Cadeira Gamer", "Móveis"),
    ("Mesa Escritório", "Móveis"),
    ("Fone de Ouvido", "Periféricos"),
];

const START: (i32, u32, u32) = (2024, 1, 1);

/// Deterministic scatter over [0, modulus) — same output on every run so
/// the sample file and the `--sample` dashboard agree.
fn scatter(i: usize, mult: usize, modulus: usize) -> usize {
    (i.wrapping_mul(mult).wrapping_add(17)) % modulus
}

/// Build `n` sample sales spread over one year from 2024-01-01.
pub fn generate_rows(n: usize) -> Vec<ParsedRow> {
    let start = NaiveDate::from_ymd_opt(START.0, START.1, START.2).unwrap();
    (0..n)
        .map(|i| {
            let (product, category) = PRODUCTS[scatter(i, 13, PRODUCTS.len())];
            let date = start + Duration::days(scatter(i, 7919, 366) as i64);
            // Prices from R$ 50,00 up to ~R$ 5.000,00 with varying cents
            let price = 50.0 + scatter(i, 263, 4951) as f64 + (scatter(i, 97, 100) as f64) / 100.0;
            let quantity = 1 + scatter(i, 31, 5) as i64;
            let stock = scatter(i, 37, 201) as i64;
            ParsedRow {
                date,
                product: product.to_string(),
                category: Some(category.to_string()),
                unit_price: (price * 100.0).round() / 100.0,
                quantity_sold: quantity,
                stock_level: Some(stock),
            }
        })
        .collect()
}

/// Sample data as ready-to-use records (the dashboard's `--sample` path).
pub fn generate_records(n: usize) -> Vec<SalesRecord> {
    compute_revenue(generate_rows(n))
}

pub fn write(output: Option<&str>, rows: usize) -> Result<String> {
    let path = output.unwrap_or(DEFAULT_OUTPUT);
    let mut wtr = csv::Writer::from_path(Path::new(path))?;
    wtr.write_record([
        "data_vendas",
        "produto",
        "categoria",
        "preco_unitario",
        "quantidade_vendida",
        "estoque",
    ])?;
    for row in generate_rows(rows) {
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.product.clone(),
            row.category.clone().unwrap_or_default(),
            format!("{:.2}", row.unit_price),
            row.quantity_sold.to_string(),
            row.stock_level.unwrap_or_default().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(path.to_string())
}

pub fn run(output: Option<&str>, rows: usize) -> Result<()> {
    let path = write(output, rows)?;
    println!("Base de exemplo gravada em {path} ({rows} vendas)");
    println!("Experimente: vendas dashboard {path}");
    Ok(())
}
