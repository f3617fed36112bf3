use chrono::NaiveDate;

/// Raw row as parsed from the CSV/XLSX loader, before revenue derivation.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub date: NaiveDate,
    pub product: String,
    pub category: Option<String>,
    pub unit_price: f64,
    pub quantity_sold: i64,
    pub stock_level: Option<i64>,
}

/// One sale with its derived revenue. Ephemeral — recomputed from the
/// source file on every load, never written back anywhere.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product: String,
    pub category: Option<String>,
    pub unit_price: f64,
    pub quantity_sold: i64,
    pub stock_level: Option<i64>,
    pub revenue: f64,
}

/// Total revenue for one calendar month present in the data.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    /// YYYY-MM
    pub month_key: String,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LowStockItem {
    pub product: String,
    pub stock_level: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTotals {
    pub total_revenue: f64,
    pub total_units: i64,
    /// None for empty input — an average over zero records is undefined,
    /// callers render a placeholder instead.
    pub average_unit_price: Option<f64>,
}
