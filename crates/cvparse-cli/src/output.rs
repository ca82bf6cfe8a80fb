use std::io::Write;

use cvparse_core::{
    CERTIFICATIONS_LABEL, CvRecord, PROJECTS_LABEL, PersonalInfo, SKILLS_LABEL,
    WORK_EXPERIENCE_LABEL,
};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Write the record as pretty-printed JSON.
pub fn write_json(w: &mut dyn Write, record: &CvRecord) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, record)?;
    writeln!(w)?;
    Ok(())
}

/// Print the record as a human-readable report.
pub fn print_record(w: &mut dyn Write, record: &CvRecord, color: ColorMode) -> std::io::Result<()> {
    print_personal_info(w, &record.personal_info, color)?;
    print_section(w, "Education", &record.education, color)?;
    print_section(w, "Qualifications", &record.qualifications, color)?;
    print_section(w, "Experience", &record.projects, color)?;
    Ok(())
}

fn print_personal_info(
    w: &mut dyn Write,
    info: &PersonalInfo,
    color: ColorMode,
) -> std::io::Result<()> {
    let fields = [
        ("Name", info.name.as_deref()),
        ("Email", info.email.as_deref()),
        ("Phone", info.phone.as_deref()),
    ];
    for (label, value) in fields {
        let label = format!("{:<6}", format!("{}:", label));
        match (value, color.enabled()) {
            (Some(v), true) => writeln!(w, "{} {}", label.bold(), v)?,
            (Some(v), false) => writeln!(w, "{} {}", label, v)?,
            (None, true) => writeln!(w, "{} {}", label.bold(), "(not found)".dimmed())?,
            (None, false) => writeln!(w, "{} (not found)", label)?,
        }
    }
    writeln!(w)?;
    Ok(())
}

fn print_section(
    w: &mut dyn Write,
    title: &str,
    lines: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold().cyan())?;
    } else {
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", "=".repeat(title.chars().count()))?;
    }

    if lines.is_empty() {
        if color.enabled() {
            writeln!(w, "  {}", "(none)".dimmed())?;
        } else {
            writeln!(w, "  (none)")?;
        }
        writeln!(w)?;
        return Ok(());
    }

    for line in lines {
        if line.is_empty() {
            writeln!(w)?;
        } else if is_group_label(line) {
            if color.enabled() {
                writeln!(w, "  {}", line.yellow())?;
            } else {
                writeln!(w, "  {}", line)?;
            }
        } else {
            // Multi-line entries keep their shape under the bullet.
            let mut parts = line.lines();
            if let Some(first) = parts.next() {
                writeln!(w, "    - {}", first)?;
            }
            for rest in parts {
                writeln!(w, "      {}", rest)?;
            }
        }
    }
    writeln!(w)?;
    Ok(())
}

fn is_group_label(line: &str) -> bool {
    line.strip_suffix(':').is_some_and(|label| {
        [
            SKILLS_LABEL,
            CERTIFICATIONS_LABEL,
            WORK_EXPERIENCE_LABEL,
            PROJECTS_LABEL,
        ]
        .contains(&label)
    })
}
