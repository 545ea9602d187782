//! Capacity planning against the backend's free daily quotas.
//!
//! A pure model, fed by planning sliders rather than live telemetry. One
//! modelled day: every student session loads once and saves `saves` times;
//! each save is a dual write (canonical plus roster mirror) whose echo is
//! read back by the student's own watcher; the teacher's roster watcher
//! reads the full list once at open and one member per save after that.

use strum::Display;

/// Free-tier daily document-read budget.
pub const FREE_READS_PER_DAY: u64 = 50_000;

/// Free-tier daily document-write budget.
pub const FREE_WRITES_PER_DAY: u64 = 20_000;

/// Planning inputs for one modelled day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuotaParams {
    /// Active students on the roster.
    pub students: u64,
    /// Debounced persists per student over the day.
    pub saves_per_student_per_day: u64,
}

/// How close the modelled day comes to a budget.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord)]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Under 80% of both budgets.
    Low,
    /// At or past 80% of a budget.
    Elevated,
    /// At or past a budget.
    Exceeded,
}

/// Result of [`estimate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuotaEstimate {
    pub daily_reads: u64,
    pub daily_writes: u64,
    /// Budget usage, rounded, capped at 100.
    pub reads_pct: u8,
    pub writes_pct: u8,
    /// The worse of the two budgets' tiers.
    pub risk: RiskLevel,
}

impl QuotaEstimate {
    /// One-line guidance matching the risk tier.
    pub fn advice(&self) -> &'static str {
        match self.risk {
            RiskLevel::Low => "Comfortably within the free tier.",
            RiskLevel::Elevated => {
                "Approaching free daily limits; reduce autosave frequency or concurrent dashboards."
            }
            RiskLevel::Exceeded => {
                "Beyond free daily limits; operations may fail once the quota is spent."
            }
        }
    }
}

/// Model one day of traffic for the given parameters.
pub fn estimate(params: QuotaParams) -> QuotaEstimate {
    let QuotaParams { students, saves_per_student_per_day: saves } = params;

    // Each save writes the canonical record and the roster mirror.
    let daily_writes = students * saves * 2;

    // Student sessions: one initial load plus one echoed snapshot per save.
    let student_reads = students * (1 + saves);
    // Teacher session: full roster at open, then one member per save.
    let teacher_reads = students + students * saves;
    let daily_reads = student_reads + teacher_reads;

    let reads_pct = pct(daily_reads, FREE_READS_PER_DAY);
    let writes_pct = pct(daily_writes, FREE_WRITES_PER_DAY);
    QuotaEstimate {
        daily_reads,
        daily_writes,
        reads_pct,
        writes_pct,
        risk: tier(reads_pct).max(tier(writes_pct)),
    }
}

fn pct(used: u64, budget: u64) -> u8 {
    (((used as f64 / budget as f64) * 100.0).round().min(100.0)) as u8
}

// Risk follows the rounded, capped percentage, so 99.5%+ of a budget
// already reads as exceeded.
fn tier(pct: u8) -> RiskLevel {
    if pct >= 100 {
        RiskLevel::Exceeded
    } else if pct >= 80 {
        RiskLevel::Elevated
    } else {
        RiskLevel::Low
    }
}

// ============================================================================
// Tests
// ============================================================================
