use serde::Serialize;

/// A maintenance cycle: the three recurring PM intervals plus the two
/// terminal pseudo-cycles that change equipment status instead of PM dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CycleType {
    Monthly,
    SixMonth,
    Annual,
    CannotFind,
    RunToFailure,
}

impl CycleType {
    /// The recurring cycles, in selection-priority order.
    pub const NORMAL: [CycleType; 3] = [CycleType::Monthly, CycleType::SixMonth, CycleType::Annual];

    pub fn is_normal(&self) -> bool {
        matches!(
            self,
            CycleType::Monthly | CycleType::SixMonth | CycleType::Annual
        )
    }

    /// Cycle length in days (`None` for pseudo-cycles).
    pub fn length_days(&self) -> Option<i64> {
        match self {
            CycleType::Monthly => Some(30),
            CycleType::SixMonth => Some(180),
            CycleType::Annual => Some(365),
            CycleType::CannotFind | CycleType::RunToFailure => None,
        }
    }

    /// Minimum distance between two completions of the same cycle.
    pub fn min_interval_days(&self) -> Option<i64> {
        match self {
            CycleType::Monthly => Some(25),
            CycleType::SixMonth => Some(150),
            CycleType::Annual => Some(300),
            CycleType::CannotFind | CycleType::RunToFailure => None,
        }
    }

    /// Label used in reports and accepted on input.
    pub fn label(&self) -> &'static str {
        match self {
            CycleType::Monthly => "Monthly",
            CycleType::SixMonth => "Six Month",
            CycleType::Annual => "Annual",
            CycleType::CannotFind => "CANNOT FIND",
            CycleType::RunToFailure => "Run to Failure",
        }
    }

    /// Parse user / import input. Case and separators (` `, `-`, `_`) are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "monthly" | "m" => Some(CycleType::Monthly),
            "sixmonth" | "sixmonths" | "semiannual" | "6month" | "s" => Some(CycleType::SixMonth),
            "annual" | "yearly" | "a" => Some(CycleType::Annual),
            "cannotfind" => Some(CycleType::CannotFind),
            "runtofailure" | "rtf" => Some(CycleType::RunToFailure),
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CycleType::Monthly => "monthly",
            CycleType::SixMonth => "six_month",
            CycleType::Annual => "annual",
            CycleType::CannotFind => "cannot_find",
            CycleType::RunToFailure => "run_to_failure",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(CycleType::Monthly),
            "six_month" => Some(CycleType::SixMonth),
            "annual" => Some(CycleType::Annual),
            "cannot_find" => Some(CycleType::CannotFind),
            "run_to_failure" => Some(CycleType::RunToFailure),
            _ => None,
        }
    }
}

impl std::fmt::Display for CycleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_labels() {
        assert_eq!(CycleType::parse("Monthly"), Some(CycleType::Monthly));
        assert_eq!(CycleType::parse("Six Month"), Some(CycleType::SixMonth));
        assert_eq!(CycleType::parse("Annual"), Some(CycleType::Annual));
        assert_eq!(CycleType::parse("CANNOT FIND"), Some(CycleType::CannotFind));
        assert_eq!(
            CycleType::parse("Run to Failure"),
            Some(CycleType::RunToFailure)
        );
        assert_eq!(CycleType::parse("weekly"), None);
    }

    #[test]
    fn pseudo_cycles_have_no_length() {
        assert_eq!(CycleType::CannotFind.length_days(), None);
        assert_eq!(CycleType::RunToFailure.min_interval_days(), None);
        assert!(!CycleType::RunToFailure.is_normal());
    }
}
