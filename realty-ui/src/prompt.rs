//! Line-oriented property entry.
//!
//! Each field is shown with its current value in brackets; an empty line
//! keeps it. A rejected form is re-prompted with the values just typed.
//! End of input stops entry without adding the property in progress.

use std::io::{self, BufRead, Write};

use crate::models::PropertyForm;
use crate::state::Session;

/// Reads one line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Walks every field of `form`, replacing those the user types.
///
/// Returns `false` if input ended before the last field.
pub fn fill_form<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    form: &mut PropertyForm,
) -> io::Result<bool> {
    for (label, value) in form.entries_mut() {
        write!(output, "{label} [{value}]: ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(output)?;
            return Ok(false);
        };
        if !line.trim().is_empty() {
            *value = line.trim().to_string();
        }
    }
    Ok(true)
}

/// Asks a yes/no question; anything but `y`/`yes` is no.
fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{question} [y/N]: ")?;
    output.flush()?;
    Ok(read_line(input)?
        .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
}

/// Prompts for properties until the user declines another or input ends.
///
/// Every new form starts from `defaults`. Returns how many were added.
pub fn run_interactive<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    session: &mut Session,
    defaults: &PropertyForm,
) -> io::Result<usize> {
    let mut added = 0;

    loop {
        let mut form = defaults.clone();
        writeln!(output, "Add a property (press Enter to keep a value)")?;

        loop {
            if !fill_form(&mut input, &mut output, &mut form)? {
                return Ok(added);
            }
            match session.add_from_form(&form) {
                Ok(index) => {
                    writeln!(output, "Added '{}' as property #{}.", form.name.trim(), index + 1)?;
                    added += 1;
                    break;
                }
                Err(e) => {
                    for message in &e.messages {
                        writeln!(output, "  - {message}")?;
                    }
                    writeln!(output, "Please correct the values above.")?;
                }
            }
        }

        if !confirm(&mut input, &mut output, "Add another property?")? {
            return Ok(added);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const FIELD_COUNT: usize = 17;

    fn keep_all() -> String {
        "\n".repeat(FIELD_COUNT)
    }

    fn run(script: &str) -> (Session, usize, String) {
        let mut session = Session::new("ROI");
        let mut output = Vec::new();
        let added = run_interactive(
            script.as_bytes(),
            &mut output,
            &mut session,
            &PropertyForm::default(),
        )
        .expect("in-memory I/O");
        (session, added, String::from_utf8(output).expect("utf-8"))
    }

    #[test]
    fn fill_form_keeps_defaults_on_blank_lines() {
        let mut form = PropertyForm::default();
        let mut output = Vec::new();

        let complete = fill_form(&mut keep_all().as_bytes(), &mut output, &mut form).unwrap();

        assert!(complete);
        assert_eq!(form, PropertyForm::default());
        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.starts_with("Property name [Property A]: Address [123 Main St]: "));
    }

    #[test]
    fn fill_form_replaces_typed_values() {
        let mut form = PropertyForm::default();
        let script = format!("Duplex\r\n\n\n\n  250000  \n{}", "\n".repeat(FIELD_COUNT - 5));

        fill_form(&mut script.as_bytes(), &mut Vec::new(), &mut form).unwrap();

        assert_eq!(form.name, "Duplex");
        assert_eq!(form.purchase_price, "250000");
        assert_eq!(form.down_payment, "40000");
    }

    #[test]
    fn fill_form_reports_end_of_input() {
        let mut form = PropertyForm::default();

        let complete = fill_form(&mut "Duplex\n".as_bytes(), &mut Vec::new(), &mut form).unwrap();

        assert!(!complete);
        assert_eq!(form.name, "Duplex");
    }

    #[test]
    fn run_adds_one_property_and_stops_on_no() {
        let script = format!("{}n\n", keep_all());

        let (session, added, output) = run(&script);

        assert_eq!(added, 1);
        assert_eq!(session.collection().len(), 1);
        assert!(output.contains("Added 'Property A' as property #1."));
    }

    #[test]
    fn run_adds_several_until_input_ends() {
        let second = format!("Property B\n{}", "\n".repeat(FIELD_COUNT - 1));
        let script = format!("{}y\n{second}yes\n", keep_all());

        let (session, added, _) = run(&script);

        assert_eq!(added, 2);
        let names: Vec<_> = session.collection().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Property A", "Property B"]);
    }

    #[test]
    fn run_reprompts_after_invalid_input() {
        // vacancy is the twelfth field
        let mut bad = vec![""; FIELD_COUNT];
        bad[11] = "35";
        let mut fixed = vec![""; FIELD_COUNT];
        fixed[11] = "10";
        let script = format!("{}\n{}\nn\n", bad.join("\n"), fixed.join("\n"));

        let (session, added, output) = run(&script);

        assert_eq!(added, 1);
        assert!(output.contains("  - vacancy_percent must be between 0 and 20, got 35\n"));
        assert!(output.contains("Vacancy rate (%, 0-20) [35]: "));
        assert_eq!(
            session.collection().get(0).map(|p| p.vacancy_rate),
            Some(dec!(0.10))
        );
    }

    #[test]
    fn run_with_no_input_adds_nothing() {
        let (session, added, _) = run("");

        assert_eq!(added, 0);
        assert!(session.collection().is_empty());
    }
}
