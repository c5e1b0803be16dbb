use std::collections::BTreeSet;

use crate::{
    diff::DiffResult,
    group::GroupedFailures,
    term::{green, red, yellow},
};

const RULE_WIDTH: usize = 50;

type Paint = fn(&str) -> String;

struct Painter {
    color: bool,
}

impl Painter {
    fn line(&self, out: &mut String, paint: Paint, line: String) {
        if self.color {
            out.push_str(&paint(&line));
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
}

fn section_header(out: &mut String, title: &str) {
    out.push_str(&format!("{}\n{}\n", title, "-".repeat(RULE_WIDTH)));
}

fn only_section(
    out: &mut String,
    painter: &Painter,
    grouped: Option<&GroupedFailures>,
    marker: char,
    paint: Paint,
) {
    for (key, values) in grouped.into_iter().flat_map(|g| g.iter()) {
        painter.line(out, paint, format!("{} {}", marker, key));
        for value in values {
            painter.line(out, paint, format!("{} \t{}", marker, value));
        }
    }
}

/// Render a diff as three sections: keys only in A, keys only in B, and the per-key value diff.
/// Section headers are printed even when a section is empty.
pub fn format_diff(diff: &DiffResult, color: bool) -> String {
    let painter = Painter { color };
    let mut out = String::new();

    section_header(&mut out, "A-only");
    only_section(&mut out, &painter, diff.only_in_a.as_ref(), '+', green);

    section_header(&mut out, "B-only");
    only_section(&mut out, &painter, diff.only_in_b.as_ref(), '-', red);

    section_header(&mut out, "Diff");
    for (key, key_diff) in diff.per_key_diff.iter().flatten() {
        out.push_str(&format!("{}\n", key));
        let groups: [(&Option<BTreeSet<String>>, char, Paint); 3] = [
            (&key_diff.values_only_in_a, '+', green),
            (&key_diff.values_only_in_b, '-', red),
            (&key_diff.values_common, '=', yellow),
        ];
        for (values, marker, paint) in groups {
            for value in values.iter().flatten() {
                painter.line(&mut out, paint, format!("{} \t{}", marker, value));
            }
        }
    }

    out
}

/// Render grouped failures of a single build: the key, then each value indented under it.
pub fn format_grouped(grouped: &GroupedFailures) -> String {
    let mut out = String::new();
    for (key, values) in grouped.iter() {
        out.push_str(&format!("{}\n", key));
        for value in values {
            out.push_str(&format!("\t{}\n", value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use pretty_assertions::assert_eq;

    fn grouped(entries: &[(&str, &[&str])]) -> GroupedFailures {
        entries
            .iter()
            .map(|(key, values)| (*key, values.to_vec()))
            .collect()
    }

    fn rule() -> String {
        "-".repeat(RULE_WIDTH)
    }

    #[test]
    fn test_format_diff_plain() {
        let a = grouped(&[("f1", &["c1", "c2"]), ("f2", &["c1"])]);
        let b = grouped(&[("f1", &["c2", "c3"]), ("f3", &["c1"])]);

        let output = format_diff(&diff(&a, &b), false);

        assert_eq!(
            output,
            format!(
                "A-only\n{r}\n+ f2\n+ \tc1\nB-only\n{r}\n- f3\n- \tc1\nDiff\n{r}\nf1\n+ \tc1\n- \tc3\n= \tc2\n",
                r = rule()
            )
        );
    }

    #[test]
    fn test_format_diff_prints_headers_of_empty_sections() {
        let output = format_diff(&DiffResult::default(), false);
        assert_eq!(
            output,
            format!("A-only\n{r}\nB-only\n{r}\nDiff\n{r}\n", r = rule())
        );
    }

    #[test]
    fn test_format_diff_colored() {
        let a = grouped(&[("f1", &["c1", "c2"]), ("f2", &["c1"])]);
        let b = grouped(&[("f1", &["c2"])]);

        let output = format_diff(&diff(&a, &b), true);

        assert!(output.contains(&green("+ f2")));
        assert!(output.contains(&green("+ \tc1")));
        assert!(output.contains(&yellow("= \tc2")));
        assert!(output.contains("\nf1\n"));
        assert!(!output.contains("\x1b[31m"));
    }

    #[test]
    fn test_format_grouped() {
        let output = format_grouped(&grouped(&[
            ("test1", &["case1", "case2"]),
            ("test2", &["case1"]),
        ]));
        assert_eq!(output, "test1\n\tcase1\n\tcase2\ntest2\n\tcase1\n");
    }
}
