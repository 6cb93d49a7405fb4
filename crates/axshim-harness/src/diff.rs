//! Line-oriented expected/actual diff rendering.

/// Render a compact diff between expected and actual text.
///
/// Equal lines are skipped; differing lines show as `-` (expected) and `+`
/// (actual) pairs prefixed with their line number.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::new();
    }

    let exp: Vec<&str> = expected.lines().collect();
    let act: Vec<&str> = actual.lines().collect();
    let mut out = String::new();

    for i in 0..exp.len().max(act.len()) {
        let e = exp.get(i).copied();
        let a = act.get(i).copied();
        if e == a {
            continue;
        }
        if let Some(e) = e {
            out.push_str(&format!("{:>4} - {e}\n", i + 1));
        }
        if let Some(a) = a {
            out.push_str(&format!("{:>4} + {a}\n", i + 1));
        }
    }

    if out.is_empty() {
        // Only trailing-newline differences.
        out.push_str("(whitespace-only difference)\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_inputs_render_nothing() {
        assert_eq!(render_diff("[1,2]", "[1,2]"), "");
    }

    #[test]
    fn single_line_mismatch() {
        assert_eq!(
            render_diff("terminated", "returned"),
            "   1 - terminated\n   1 + returned\n"
        );
    }

    #[test]
    fn missing_lines_show_one_side() {
        assert_eq!(render_diff("a\nb", "a"), "   2 - b\n");
    }

    #[test]
    fn trailing_newline_only() {
        assert_eq!(render_diff("a\n", "a"), "(whitespace-only difference)\n");
    }
}
