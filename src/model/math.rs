//! Equation-text helpers.
//!
//! Equations are plain-text assignment lines, `lhs = expression`. Numeric
//! literals may carry a units annotation, `0.5{millivolt}`, the textual
//! analogue of a unit-tagged constant in the source modules.

/// Unique units names annotated on numeric literals, in order of first
/// appearance.
pub fn referenced_units(math: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut chars = math.char_indices();
    let bytes = math.as_bytes();
    while let Some((idx, ch)) = chars.next() {
        if ch != '{' {
            continue;
        }
        // only annotations attached to a numeric literal count
        let attached_to_literal = idx > 0 && {
            let prev = bytes[idx - 1] as char;
            prev.is_ascii_digit() || prev == '.'
        };
        let mut name = String::new();
        let mut closed = false;
        for (_, inner) in chars.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            name.push(inner);
        }
        let name = name.trim();
        if attached_to_literal && closed && !name.is_empty() && !found.iter().any(|n| n == name) {
            found.push(name.to_string());
        }
    }
    found
}

/// The assigned variable name of an equation line, when it is a plain
/// assignment to an identifier.
pub fn assigned_variable(equation: &str) -> Option<&str> {
    let (lhs, _) = equation.split_once('=')?;
    let lhs = lhs.trim();
    is_identifier(lhs).then_some(lhs)
}

/// Whether `text` is a valid variable identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build the aggregation equation: the output equals the sum of the
/// operands, in registration order.
pub fn sum_equation(output: &str, operands: &[String]) -> String {
    format!("{output} = {}", operands.join(" + "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_units() {
        let math = "pressure = 2.5{mmHg} + offset\nflow = 1{ml_per_s} * 3{mmHg}";
        assert_eq!(referenced_units(math), vec!["mmHg", "ml_per_s"]);
    }

    #[test]
    fn test_braces_without_literal_are_ignored() {
        assert!(referenced_units("x = f{second}").is_empty());
        assert!(referenced_units("x = 3{").is_empty());
        assert!(referenced_units("x = 3{}").is_empty());
    }

    #[test]
    fn test_assigned_variable() {
        assert_eq!(assigned_variable("flow = r * p"), Some("flow"));
        assert_eq!(assigned_variable("  v_1 = 2{volt}"), Some("v_1"));
        assert_eq!(assigned_variable("a + b"), None);
        assert_eq!(assigned_variable("a + b = c"), None);
    }

    #[test]
    fn test_sum_equation() {
        let ops = vec!["op_a".to_string(), "op_b".to_string(), "op_c".to_string()];
        assert_eq!(sum_equation("total", &ops), "total = op_a + op_b + op_c");
        assert_eq!(sum_equation("total", &ops[..1].to_vec()), "total = op_a");
    }
}
