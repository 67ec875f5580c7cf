use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::{Column, Department, RiskBand, RiskEntry, WorkStepRecord};
use crate::util::unicode::{display_width, fit_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct WorkStepJson {
    /// 1-based position in the listed view
    pub row: usize,
    pub group: String,
    pub activity: String,
    pub position: String,
}

#[derive(Serialize)]
pub struct WorkStepListJson {
    pub filter: String,
    pub rows: Vec<WorkStepJson>,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub group: String,
    pub rows: usize,
}

#[derive(Serialize)]
pub struct RiskEntryJson {
    pub activity: String,
    pub hazard: String,
    pub controls: String,
    pub likelihood: u8,
    pub consequence: u8,
    pub score: u32,
    pub band: RiskBand,
}

#[derive(Serialize)]
pub struct DepartmentJson {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<RiskEntryJson>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn work_step_to_json(index: usize, record: &WorkStepRecord) -> WorkStepJson {
    WorkStepJson {
        row: index + 1,
        group: record.group.clone(),
        activity: record.activity.clone(),
        position: record.position.clone(),
    }
}

pub fn risk_entry_to_json(entry: &RiskEntry) -> RiskEntryJson {
    RiskEntryJson {
        activity: entry.activity.clone(),
        hazard: entry.hazard.clone(),
        controls: entry.controls.clone(),
        likelihood: entry.likelihood,
        consequence: entry.consequence,
        score: entry.score(),
        band: entry.band(),
    }
}

pub fn department_to_json(department: &Department, with_entries: bool) -> DepartmentJson {
    DepartmentJson {
        name: department.name.clone(),
        entries: if with_entries {
            department.entries.iter().map(risk_entry_to_json).collect()
        } else {
            Vec::new()
        },
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

const MAX_COLUMN_WIDTH: usize = 40;

/// Lay out `rows` under `headers` as space-separated columns sized to the
/// widest cell (capped), measured in terminal cells.
fn format_columns(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell)).min(MAX_COLUMN_WIDTH);
        }
    }
    let line = |cells: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == last {
                    truncate_to_width(c, widths[i])
                } else {
                    fit_to_width(c, widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out
}

/// The work-step table with a leading 1-based row number
pub fn format_work_steps(records: &[WorkStepRecord]) -> Vec<String> {
    let headers = ["#", Column::Group.label(), Column::Activity.label(), Column::Position.label()];
    let rows: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.group.clone(),
                r.activity.clone(),
                r.position.clone(),
            ]
        })
        .collect();
    format_columns(&headers, &rows)
}

pub fn format_risk_table(department: &Department) -> Vec<String> {
    let headers = ["Activity", "Hazard", "Controls", "L", "C", "Score", "Band"];
    let rows: Vec<Vec<String>> = department
        .entries
        .iter()
        .map(|e| {
            vec![
                e.activity.clone(),
                e.hazard.clone(),
                e.controls.clone(),
                e.likelihood.to_string(),
                e.consequence.to_string(),
                e.score().to_string(),
                e.band().label().to_string(),
            ]
        })
        .collect();
    let mut out = vec![department.name.clone(), String::new()];
    out.extend(format_columns(&headers, &rows));
    out
}

pub fn format_recovery_entries(entries: &[RecoveryEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_display_markdown())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_departments;
    use pretty_assertions::assert_eq;

    #[test]
    fn work_steps_align_in_columns() {
        let lines = format_work_steps(&[
            WorkStepRecord::new("T001", "Lift boxes", "Operator"),
            WorkStepRecord::new("T10", "Weld", "Welder"),
        ]);
        assert_eq!(
            lines,
            vec![
                "#  Group  Work step / activity  Position",
                "1  T001   Lift boxes            Operator",
                "2  T10    Weld                  Welder",
            ]
        );
    }

    #[test]
    fn empty_table_prints_header_only() {
        assert_eq!(format_work_steps(&[]).len(), 1);
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(60);
        let lines = format_work_steps(&[WorkStepRecord::new("A", long.as_str(), "p")]);
        assert!(lines[1].contains('…'));
        assert!(!lines[1].contains(&long));
    }

    #[test]
    fn risk_json_carries_score_and_band() {
        let dept = &sample_departments()[0];
        let json = serde_json::to_value(department_to_json(dept, true)).unwrap();
        assert_eq!(json["entries"][0]["score"], 12);
        assert_eq!(json["entries"][0]["band"], "high");
        let bare = serde_json::to_value(department_to_json(dept, false)).unwrap();
        assert!(bare.get("entries").is_none());
    }

    #[test]
    fn risk_table_lists_every_entry() {
        let dept = &sample_departments()[1];
        let lines = format_risk_table(dept);
        assert_eq!(lines[0], "Accounting");
        assert_eq!(lines.len(), 3 + dept.entries.len());
        assert!(lines[3].ends_with("high"));
    }
}
