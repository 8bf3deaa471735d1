use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EquipmentStatus {
    Active,
    Missing,
    RunToFailure,
}

impl EquipmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "Active",
            EquipmentStatus::Missing => "Missing",
            EquipmentStatus::RunToFailure => "Run to Failure",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "active",
            EquipmentStatus::Missing => "missing",
            EquipmentStatus::RunToFailure => "run_to_failure",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EquipmentStatus::Active),
            "missing" => Some(EquipmentStatus::Missing),
            "run_to_failure" => Some(EquipmentStatus::RunToFailure),
            _ => None,
        }
    }

    /// Helper: convert CLI / catalog input (any case, spaces allowed).
    /// An empty string means Active, matching catalogs that leave it blank.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "" | "active" => Some(EquipmentStatus::Active),
            "missing" | "cannotfind" => Some(EquipmentStatus::Missing),
            "runtofailure" | "rtf" => Some(EquipmentStatus::RunToFailure),
            _ => None,
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
