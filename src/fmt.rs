/// Format a float as Brazilian currency with thousands separators: R$ 1.234,56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let grouped = group_thousands(val.abs());
    if negative {
        format!("-R$ {grouped}")
    } else {
        format!("R$ {grouped}")
    }
}

/// Format an integer with pt-BR thousands separators: 1.234.567
pub fn number(val: i64) -> String {
    let digits = val.abs().to_string();
    let mut with_dots = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();
    if val < 0 {
        format!("-{with_dots}")
    } else {
        with_dots
    }
}

/// Format a percentage with two decimals: 12,34%
pub fn percent(val: f64) -> String {
    format!("{:.2}%", val).replace('.', ",")
}

fn group_thousands(abs: f64) -> String {
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();
    format!("{with_dots},{dec_part}")
}
