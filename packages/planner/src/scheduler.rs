// ABOUTME: Monthly capacity scheduler - greedy first-fit-in-order bucketing of modules
// ABOUTME: Pure, deterministic partitioning with single-split carry-over across month boundaries

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// A module may be split into the current month when more than this share of
/// the month's capacity is still free; otherwise it moves wholly to the next
/// month.
pub const SPLIT_THRESHOLD_RATIO: f64 = 0.2;

/// How split-module hours are charged against monthly capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarryMode {
    /// The partial assignment keeps the module's full hours as a label, the
    /// continuation entry is unsized, and the next month's counter restarts
    /// at zero. The carried remainder is not charged against any month.
    /// Kept as the default for compatibility with previously generated
    /// timelines.
    #[default]
    Legacy,
    /// The partial assignment carries exactly the free hours of the current
    /// month, the continuation carries the remainder (the two sum to the
    /// module's total), and the remainder is charged to the next month.
    Proportional,
}

/// Scheduler input: a module with its rolled-up hours
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulableModule {
    pub id: String,
    pub name: String,
    pub hours: f64,
}

/// A module placed (fully or partially) in a month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAssignment {
    pub module_id: String,
    pub module_name: String,
    /// Hours represented by this assignment. For a partial assignment this is
    /// the module's full hours in legacy mode and the month's free hours in
    /// proportional mode.
    pub hours: f64,
    /// This month holds only part of the module's work
    pub is_partial: bool,
    /// The remainder appears on the following month
    pub continues_next_month: bool,
}

/// A module carried into this month from the previous one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    pub module_id: String,
    pub module_name: String,
    /// Hours carried into this month; None in legacy mode, where the
    /// continuation is an unsized narrative label
    pub carried_hours: Option<f64>,
}

/// One month of the delivery plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// 1-based, contiguous
    pub month_number: u32,
    pub assignments: Vec<ModuleAssignment>,
    pub continued: Vec<Continuation>,
}

impl MonthBucket {
    fn new(month_number: u32) -> Self {
        Self {
            month_number,
            assignments: Vec::new(),
            continued: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.continued.is_empty()
    }

    /// Hours of modules fully assigned to this month (partial assignments
    /// excluded); never exceeds the monthly capacity
    pub fn committed_hours(&self) -> f64 {
        self.assignments
            .iter()
            .filter(|a| !a.is_partial)
            .map(|a| a.hours)
            .sum()
    }

    /// All module IDs active in this month, continuations first then
    /// assignments, without duplicates
    pub fn active_module_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for c in &self.continued {
            ids.push(c.module_id.clone());
        }
        for a in &self.assignments {
            if !ids.contains(&a.module_id) {
                ids.push(a.module_id.clone());
            }
        }
        ids
    }
}

/// The full scheduling result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    pub months: Vec<MonthBucket>,
    pub total_hours: f64,
    /// ceil(total_hours / monthly_capacity)
    pub estimated_months: u32,
    /// True when the greedy walk needed more months than the estimate
    pub exceeded_estimate: bool,
    pub monthly_capacity: f64,
    pub carry_mode: CarryMode,
}

/// Partition an ordered module list into monthly buckets under a fixed
/// capacity. Deterministic single pass; modules are never reordered.
pub fn build_schedule(
    modules: &[SchedulableModule],
    monthly_capacity: f64,
    carry_mode: CarryMode,
) -> Result<SchedulePlan> {
    if !monthly_capacity.is_finite() || monthly_capacity <= 0.0 {
        return Err(PlannerError::InvalidCapacity(monthly_capacity));
    }
    for module in modules {
        if !module.hours.is_finite() || module.hours < 0.0 {
            return Err(PlannerError::InvalidHours {
                module_id: module.id.clone(),
                hours: module.hours,
            });
        }
    }

    let total_hours: f64 = modules.iter().map(|m| m.hours).sum();
    let estimated_months = (total_hours / monthly_capacity).ceil() as u32;

    let mut months: Vec<MonthBucket> = Vec::with_capacity(estimated_months as usize);
    let mut current: usize = 0;
    let mut used: f64 = 0.0;

    for module in modules {
        if used + module.hours <= monthly_capacity {
            bucket_at(&mut months, current).assignments.push(ModuleAssignment {
                module_id: module.id.clone(),
                module_name: module.name.clone(),
                hours: module.hours,
                is_partial: false,
                continues_next_month: false,
            });
            used += module.hours;
            continue;
        }

        let remaining = monthly_capacity - used;
        if remaining > SPLIT_THRESHOLD_RATIO * monthly_capacity {
            // Split: part of the module lands in this month, the remainder
            // is carried into the next.
            let (assigned_hours, carried) = match carry_mode {
                CarryMode::Legacy => (module.hours, None),
                CarryMode::Proportional => (remaining, Some(module.hours - remaining)),
            };
            bucket_at(&mut months, current).assignments.push(ModuleAssignment {
                module_id: module.id.clone(),
                module_name: module.name.clone(),
                hours: assigned_hours,
                is_partial: true,
                continues_next_month: true,
            });
            bucket_at(&mut months, current + 1).continued.push(Continuation {
                module_id: module.id.clone(),
                module_name: module.name.clone(),
                carried_hours: carried,
            });
            current += 1;
            used = carried.unwrap_or(0.0);
        } else {
            // Too little of the month left; start the module on a fresh month
            current += 1;
            bucket_at(&mut months, current).assignments.push(ModuleAssignment {
                module_id: module.id.clone(),
                module_name: module.name.clone(),
                hours: module.hours,
                is_partial: false,
                continues_next_month: false,
            });
            used = module.hours;
        }
    }

    // A month with zero work assigned is never produced
    while months.last().is_some_and(|b| b.is_empty()) {
        months.pop();
    }

    let exceeded_estimate = months.len() as u32 > estimated_months;

    Ok(SchedulePlan {
        months,
        total_hours,
        estimated_months,
        exceeded_estimate,
        monthly_capacity,
        carry_mode,
    })
}

fn bucket_at(months: &mut Vec<MonthBucket>, index: usize) -> &mut MonthBucket {
    while months.len() <= index {
        let month_number = months.len() as u32 + 1;
        months.push(MonthBucket::new(month_number));
    }
    &mut months[index]
}
