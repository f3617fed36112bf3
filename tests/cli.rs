use assert_cmd::Command;
use predicates::prelude::*;

fn vendas() -> Command {
    Command::cargo_bin("vendas").unwrap()
}

fn write_fixture(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("vendas.csv");
    std::fs::write(&path, content).unwrap();
    path
}

const TWO_MONTHS: &str = "\
data_vendas,produto,categoria,preco_unitario,quantidade_vendida,estoque
2024-01-10,Notebook,Eletrônicos,100.00,1,12
2024-02-15,Mouse,Periféricos,150.00,1,3
";

#[test]
fn summary_prints_kpis() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), TWO_MONTHS);
    vendas()
        .args(["report", "summary", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Faturamento Acumulado"))
        .stdout(predicate::str::contains("R$ 250,00"))
        .stdout(predicate::str::contains("R$ 125,00")); // average unit price
}

#[test]
fn monthly_is_chronological() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), TWO_MONTHS);
    let output = vendas()
        .args(["report", "monthly", path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let jan = text.find("2024-01").expect("january row");
    let feb = text.find("2024-02").expect("february row");
    assert!(jan < feb, "months must be ascending");
}

#[test]
fn insights_reports_positive_growth() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), TWO_MONTHS);
    vendas()
        .args(["report", "insights", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crescimento positivo de 50,00%"));
}

#[test]
fn insights_reports_decline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "data_vendas,produto,preco_unitario,quantidade_vendida\n\
         2024-01-10,Notebook,100.00,1\n\
         2024-02-15,Mouse,50.00,1\n",
    );
    vendas()
        .args(["report", "insights", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queda de faturamento de 50,00%"));
}

#[test]
fn insights_single_month_is_informational_not_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "data_vendas,produto,preco_unitario,quantidade_vendida\n\
         2024-01-10,Notebook,100.00,1\n",
    );
    vendas()
        .args(["report", "insights", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Período único de dados"));
}

#[test]
fn missing_column_fails_with_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "data_vendas,produto,quantidade_vendida\n2024-01-10,Mouse,2\n",
    );
    vendas()
        .args(["report", "summary", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing required column: preco_unitario",
        ));
}

#[test]
fn stock_lists_low_stock_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), TWO_MONTHS);
    vendas()
        .args(["report", "stock", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mouse"))
        .stdout(predicate::str::contains("Notebook").not());
}

#[test]
fn stock_without_column_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "data_vendas,produto,preco_unitario,quantidade_vendida\n\
         2024-01-10,Mouse,80.00,2\n",
    );
    vendas()
        .args(["report", "stock", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhum produto"));
}

#[test]
fn top_product_groups_revenue() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "data_vendas,produto,preco_unitario,quantidade_vendida\n\
         2024-01-10,A,100.00,1\n\
         2024-01-11,B,250.00,1\n\
         2024-01-12,A,50.00,1\n",
    );
    vendas()
        .args(["report", "top", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Produto destaque: B"));
}

#[test]
fn records_search_filters_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), TWO_MONTHS);
    vendas()
        .args([
            "report",
            "records",
            path.to_str().unwrap(),
            "--search",
            "mouse",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mouse"))
        .stdout(predicate::str::contains("Notebook").not())
        .stdout(predicate::str::contains("1 registros"));
}

#[test]
fn malformed_rows_are_reported_not_included() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "data_vendas,produto,preco_unitario,quantidade_vendida\n\
         2024-01-10,Mouse,80.00,2\n\
         bogus,Mouse,80.00,2\n",
    );
    vendas()
        .args(["report", "summary", path.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 linha(s) inválida(s)"))
        .stdout(predicate::str::contains("R$ 160,00"));
}

#[test]
fn template_roundtrips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("modelo.csv");
    vendas()
        .args(["template", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Modelo gravado"));
    vendas()
        .args(["report", "summary", out.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn sample_generates_loadable_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exemplo.csv");
    vendas()
        .args(["sample", "--output", out.to_str().unwrap(), "--rows", "60"])
        .assert()
        .success();
    vendas()
        .args(["report", "records", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("60 registros"));
}

#[test]
fn unreadable_file_fails_cleanly() {
    vendas()
        .args(["report", "summary", "/nonexistent/vendas.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
