use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Result, VendasError};
use crate::metrics::compute_revenue;
use crate::models::{ParsedRow, SalesRecord};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a unit price. Accepts an optional "R$" prefix, surrounding quotes,
/// and either pt-BR ("1.234,56") or en ("1,234.56") separators.
pub fn parse_price(raw: &str) -> Option<f64> {
    let s = raw.replace("R$", "").replace('"', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let dot = s.rfind('.');
    let comma = s.rfind(',');
    let normalized = match (dot, comma) {
        // Both present: the later one is the decimal mark
        (Some(d), Some(c)) if c > d => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        // Comma only: decimal mark in pt-BR
        (None, Some(_)) => s.replace(',', "."),
        _ => s.to_string(),
    };
    normalized.parse().ok()
}

/// Parse a sale date. Accepts ISO dates, pandas datetime serialization,
/// and DD/MM/YYYY.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(d);
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

/// Parse a quantity. XLSX cells often carry integers as floats ("3.0").
fn parse_quantity(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(q) = s.parse::<i64>() {
        return Some(q);
    }
    let f: f64 = s.parse().ok()?;
    if f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(feature = "xlsx")]
pub fn excel_serial_to_date(serial: f64) -> NaiveDate {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    base + chrono::Duration::days(serial as i64)
}

/// Column indices resolved from the header row.
struct ColumnMap {
    date: usize,
    product: usize,
    unit_price: usize,
    quantity: usize,
    category: Option<usize>,
    stock: Option<usize>,
}

impl ColumnMap {
    fn from_header<'a, I: Iterator<Item = &'a str>>(header: I) -> Result<Self> {
        let mut date = None;
        let mut product = None;
        let mut unit_price = None;
        let mut quantity = None;
        let mut category = None;
        let mut stock = None;
        for (i, field) in header.enumerate() {
            match field.trim() {
                "data_vendas" => date = Some(i),
                "produto" => product = Some(i),
                "preco_unitario" => unit_price = Some(i),
                "quantidade_vendida" => quantity = Some(i),
                "categoria" => category = Some(i),
                "estoque" => stock = Some(i),
                _ => {}
            }
        }
        Ok(Self {
            date: date.ok_or_else(|| VendasError::InvalidSchema("data_vendas".into()))?,
            product: product.ok_or_else(|| VendasError::InvalidSchema("produto".into()))?,
            unit_price: unit_price
                .ok_or_else(|| VendasError::InvalidSchema("preco_unitario".into()))?,
            quantity: quantity
                .ok_or_else(|| VendasError::InvalidSchema("quantidade_vendida".into()))?,
            category,
            stock,
        })
    }

    /// Build a typed row from raw cell text; None skips the row.
    fn parse_row(&self, cells: &[String]) -> Option<ParsedRow> {
        let date = parse_date(cells.get(self.date)?)?;
        let product = cells.get(self.product)?.trim().to_string();
        if product.is_empty() {
            return None;
        }
        let unit_price = parse_price(cells.get(self.unit_price)?)?;
        let quantity_sold = parse_quantity(cells.get(self.quantity)?)?;
        // Validation policy: non-positive price/quantity never reaches totals
        if unit_price <= 0.0 || quantity_sold <= 0 {
            return None;
        }
        let category = self
            .category
            .and_then(|i| cells.get(i))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let stock_level = self
            .stock
            .and_then(|i| cells.get(i))
            .and_then(|c| parse_quantity(c))
            .filter(|s| *s >= 0);
        Some(ParsedRow {
            date,
            product,
            category,
            unit_price,
            quantity_sold,
            stock_level,
        })
    }
}

// ---------------------------------------------------------------------------
// Loader kinds — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoaderKind {
    Csv,
    #[cfg(feature = "xlsx")]
    Xlsx,
}

impl LoaderKind {
    pub fn for_path(path: &Path) -> LoaderKind {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            #[cfg(feature = "xlsx")]
            "xlsx" | "xls" => LoaderKind::Xlsx,
            _ => LoaderKind::Csv,
        }
    }

    fn parse(&self, path: &Path) -> Result<(Vec<ParsedRow>, usize)> {
        match self {
            LoaderKind::Csv => parse_csv(path),
            #[cfg(feature = "xlsx")]
            LoaderKind::Xlsx => parse_xlsx(path),
        }
    }
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct LoadReport {
    pub records: Vec<SalesRecord>,
    /// Rows dropped because a cell failed to parse or a price/quantity was
    /// not positive.
    pub skipped: usize,
}

pub fn load(path: &Path) -> Result<LoadReport> {
    let (rows, skipped) = LoaderKind::for_path(path).parse(path)?;
    Ok(LoadReport {
        records: compute_revenue(rows),
        skipped,
    })
}

fn parse_csv(path: &Path) -> Result<(Vec<ParsedRow>, usize)> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut columns: Option<ColumnMap> = None;

    for result in rdr.records() {
        let record = result?;
        let Some(cols) = &columns else {
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            columns = Some(ColumnMap::from_header(record.iter())?);
            continue;
        };
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let cells: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        match cols.parse_row(&cells) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if columns.is_none() {
        return Err(VendasError::Unparseable(format!(
            "{}: no header row found",
            path.display()
        )));
    }
    Ok((rows, skipped))
}

#[cfg(feature = "xlsx")]
fn parse_xlsx(path: &Path) -> Result<(Vec<ParsedRow>, usize)> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| VendasError::Unparseable(format!("failed to open workbook: {e}")))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| VendasError::Unparseable("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| VendasError::Unparseable(format!("failed to read sheet: {e}")))?;

    let mut row_iter = range.rows();
    let header = row_iter
        .next()
        .ok_or_else(|| VendasError::Unparseable(format!("{}: empty sheet", path.display())))?;
    let header_cells: Vec<String> = header.iter().map(cell_text).collect();
    let columns = ColumnMap::from_header(header_cells.iter().map(|s| s.as_str()))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for row in row_iter {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        match columns.parse_row(&cells) {
            Some(parsed) => rows.push(parsed),
            None => skipped += 1,
        }
    }
    Ok((rows, skipped))
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Serial dates arrive as floats; format integral values plainly
            // and let the column parser decide what they mean.
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .format("%Y-%m-%d")
            .to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
