use serde_json::Value;

/// Headline field for each calculator, checked in order.
const HEADLINE_KEYS: [&str; 12] = [
    "display",
    "result",
    "final_balance",
    "payment",
    "bmi",
    "z_score",
    "p_a_and_b",
    "mean",
    "area",
    "converted",
    "periodic_payment_amount",
    "total_interest",
];

/// Print just the key answer value from the output.
///
/// The loan calculator nests its headline under `summary`, so nested
/// objects are searched one level down when no top-level key matches.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(found) = headline(result_obj) {
        println!("{}", format_minimal(found));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn headline(value: &Value) -> Option<&Value> {
    let map = value.as_object()?;
    let direct = HEADLINE_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null() && !v.is_object() && !v.is_array());
    direct.or_else(|| {
        map.values()
            .filter(|v| v.is_object())
            .find_map(|nested| headline(nested))
    })
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
