//! `fitplan options`: the onboarding choices accepted by `generate`.

use std::fmt::Write as _;

use fitplan_core::catalog::{Catalog, catalog};

pub fn run_options() {
    print!("{}", render_options(catalog()));
}

fn render_options(catalog: &Catalog) -> String {
    let options = catalog.options();
    let mut out = String::new();

    let _ = writeln!(out, "Goals (--goal) and focus options (--focus):");
    for goal in &options.goals {
        let _ = writeln!(out, "  {:<14} {}", goal.id, goal.title);
        for focus in &goal.focus_options {
            let _ = writeln!(out, "      {:<16} {}", focus.id, focus.description);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Equipment (--equipment):");
    for choice in &options.equipment {
        let _ = writeln!(out, "  {:<14} {}", choice.id, choice.label);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Experience (--experience):");
    for choice in &options.experience {
        let _ = writeln!(out, "  {:<14} {}", choice.id, choice.label);
    }

    let days: Vec<String> = options.days_per_week.iter().map(u8::to_string).collect();
    let m = options.minutes_per_workout;
    let _ = writeln!(out);
    let _ = writeln!(out, "Days per week (--days): {}", days.join(", "));
    let _ = writeln!(
        out,
        "Minutes per workout (--minutes): {}-{} in steps of {}",
        m.min, m.max, m.step
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_choice() {
        let text = render_options(catalog());
        for id in ["lose-weight", "get-stronger", "get-athletic", "build-muscle"] {
            assert!(text.contains(id), "missing goal {id}");
        }
        assert!(text.contains("powerlifting"));
        assert!(text.contains("  none           No Equipment"));
        assert!(text.contains("  advanced       Advanced"));
        assert!(text.contains("Days per week (--days): 2, 3, 4, 5, 6"));
        assert!(text.contains("20-90 in steps of 5"));
    }
}
