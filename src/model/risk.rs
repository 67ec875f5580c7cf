use serde::{Deserialize, Serialize};

/// Risk band derived from a likelihood x consequence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskBand {
    /// Threshold map: >= 15 extreme, >= 8 high, >= 4 medium, else low
    pub fn from_score(score: u32) -> RiskBand {
        if score >= 15 {
            RiskBand::Extreme
        } else if score >= 8 {
            RiskBand::High
        } else if score >= 4 {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
            RiskBand::Extreme => "extreme",
        }
    }
}

/// One assessed activity in a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub activity: String,
    pub hazard: String,
    pub controls: String,
    /// L, 1..=5
    pub likelihood: u8,
    /// C, 1..=5
    pub consequence: u8,
}

impl RiskEntry {
    pub fn score(&self) -> u32 {
        u32::from(self.likelihood) * u32::from(self.consequence)
    }

    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.score())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub name: String,
    pub entries: Vec<RiskEntry>,
}

fn entry(activity: &str, hazard: &str, controls: &str, l: u8, c: u8) -> RiskEntry {
    RiskEntry {
        activity: activity.to_string(),
        hazard: hazard.to_string(),
        controls: controls.to_string(),
        likelihood: l,
        consequence: c,
    }
}

/// Hard-coded sample assessments shown on the risk screen
pub fn sample_departments() -> Vec<Department> {
    vec![
        Department {
            name: "Production".into(),
            entries: vec![
                entry(
                    "Lifting heavy boxes",
                    "Back / muscle injury",
                    "Use a trolley or a two-person lift",
                    3,
                    4,
                ),
                entry(
                    "Operating the drilling machine",
                    "Caught fingers / flying metal chips",
                    "Gloves and safety glasses, machine guard fitted",
                    2,
                    5,
                ),
            ],
        },
        Department {
            name: "Accounting".into(),
            entries: vec![entry(
                "Prolonged computer work",
                "Eye strain / back pain / office syndrome",
                "20-20-20 eye breaks, ergonomic chair",
                4,
                2,
            )],
        },
    ]
}
