use std::path::Path;

use crate::error::Result;

pub const DEFAULT_OUTPUT: &str = "vendas_modelo.csv";

const HEADER: &[&str] = &[
    "data_vendas",
    "produto",
    "categoria",
    "preco_unitario",
    "quantidade_vendida",
    "estoque",
];

const EXAMPLE_ROWS: &[&[&str]] = &[
    &["2024-01-15", "Notebook", "Eletrônicos", "3499.90", "2", "18"],
    &["2024-01-22", "Mouse", "Periféricos", "89.90", "5", "42"],
    &["2024-02-03", "Monitor", "Eletrônicos", "1299.00", "1", "7"],
];

/// Write the example/template CSV with the canonical column header.
pub fn write(output: Option<&str>) -> Result<String> {
    let path = output.unwrap_or(DEFAULT_OUTPUT);
    let mut wtr = csv::Writer::from_path(Path::new(path))?;
    wtr.write_record(HEADER)?;
    for row in EXAMPLE_ROWS {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(path.to_string())
}

pub fn run(output: Option<&str>) -> Result<()> {
    let path = write(output)?;
    println!("Modelo gravado em {path}");
    println!("Preencha as colunas e abra com: vendas dashboard {path}");
    Ok(())
}
