use std::fmt;

//==============================================================================
// Flat Records
//==============================================================================

/// One (benefit, coverage, category, plan) combination with a non-empty value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    /// Label of the closest marker row above (empty before the first one)
    pub benefit: String,
    /// Most recent non-null primary-column value at or above this row
    pub coverage: String,
    /// Secondary-column value of this row
    pub category: String,
    /// Synthesized `Plan <k>` label
    pub plan_name: String,
    /// Normalized plan cell value, never empty
    pub coverage_value: String,
}

impl FlatRecord {
    pub fn new(
        benefit: impl Into<String>,
        coverage: impl Into<String>,
        category: impl Into<String>,
        plan_name: impl Into<String>,
        coverage_value: impl Into<String>,
    ) -> Self {
        Self {
            benefit: benefit.into(),
            coverage: coverage.into(),
            category: category.into(),
            plan_name: plan_name.into(),
            coverage_value: coverage_value.into(),
        }
    }

    /// Label for the plan column at 1-based `ordinal`
    pub fn plan_label(ordinal: u32) -> String {
        format!("Plan {}", ordinal)
    }
}

/// Reference rendering: `benefit, coverage, category, plan, =value`
///
/// The `=` before the value is consumed by a formula-import step downstream
/// and must stay as is.
impl fmt::Display for FlatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, ={}",
            self.benefit, self.coverage, self.category, self.plan_name, self.coverage_value
        )
    }
}

//==============================================================================
// Group Summaries
//==============================================================================

/// Record and coverage-line counts for one benefit group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenefitSummary {
    pub benefit: String,
    pub coverage_lines: usize,
    pub records: usize,
}

impl BenefitSummary {
    pub fn new(benefit: impl Into<String>) -> Self {
        Self {
            benefit: benefit.into(),
            coverage_lines: 0,
            records: 0,
        }
    }
}
