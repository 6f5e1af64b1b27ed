/// Parse German-formatted numeric text (`1.234,56`, `12,3%`) into a float.
///
/// Total: anything that does not parse to a finite number yields `0.0`.
pub fn parse_number(text: &str) -> f64 {
    let cleaned = text.replace('%', "").replace('.', "").replace(',', ".");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
