// ABOUTME: Narrative synthesis adapter - turns month buckets into client-facing prose
// ABOUTME: Prompt shaping, generative call, and schema validation of the returned plan

use serde::{Deserialize, Serialize};
use tracing::info;

use planora_ai::GenerativeService;
use planora_core::Project;

use crate::error::{PlannerError, Result};
use crate::prompts;
use crate::scheduler::SchedulePlan;
use crate::types::ModuleDetail;

/// Validated narrative content for a timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativePlan {
    pub summary: String,
    pub timeline_items: Vec<NarrativeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeItem {
    pub month_number: u32,
    pub title: String,
    pub summary: String,
    /// Stable module IDs echoed from the prompt; persistence resolves these
    /// directly, never by name matching
    #[serde(default)]
    pub module_ids: Vec<String>,
}

/// Shapes the schedule into a prompt and validates the generative response
pub struct NarrativeSynthesizer;

impl NarrativeSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Invoke the generative service and validate the returned shape.
    /// Tolerates fewer or reordered months; rejects out-of-range or
    /// duplicated month numbers and empty text fields.
    pub async fn synthesize(
        &self,
        service: &GenerativeService,
        project: &Project,
        plan: &SchedulePlan,
        modules: &[ModuleDetail],
    ) -> Result<NarrativePlan> {
        let prompt = prompts::timeline_narrative_prompt(project, plan, modules);
        let response = service
            .generate_structured::<NarrativePlan>(
                prompt,
                Some(prompts::NARRATIVE_SYSTEM_PROMPT.to_string()),
            )
            .await?;

        let narrative = response.data;
        Self::validate(&narrative, plan)?;

        info!(
            "Synthesized narrative for project {}: {} timeline items ({} tokens)",
            project.id,
            narrative.timeline_items.len(),
            response.usage.total_tokens()
        );
        Ok(narrative)
    }

    fn validate(narrative: &NarrativePlan, plan: &SchedulePlan) -> Result<()> {
        if narrative.summary.trim().is_empty() {
            return Err(PlannerError::InvalidNarrative(
                "summary is empty".to_string(),
            ));
        }
        if !plan.months.is_empty() && narrative.timeline_items.is_empty() {
            return Err(PlannerError::InvalidNarrative(
                "no timeline items for a non-empty schedule".to_string(),
            ));
        }

        let month_count = plan.months.len() as u32;
        let mut seen: Vec<u32> = Vec::new();
        for item in &narrative.timeline_items {
            if item.month_number < 1 || item.month_number > month_count {
                return Err(PlannerError::InvalidNarrative(format!(
                    "month number {} outside scheduled range 1..={}",
                    item.month_number, month_count
                )));
            }
            if seen.contains(&item.month_number) {
                return Err(PlannerError::InvalidNarrative(format!(
                    "duplicate month number {}",
                    item.month_number
                )));
            }
            seen.push(item.month_number);

            if item.title.trim().is_empty() || item.summary.trim().is_empty() {
                return Err(PlannerError::InvalidNarrative(format!(
                    "month {} has empty title or summary",
                    item.month_number
                )));
            }
        }
        Ok(())
    }
}

impl Default for NarrativeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{build_schedule, CarryMode, SchedulableModule};

    fn plan_of(hours: &[f64]) -> SchedulePlan {
        let modules: Vec<SchedulableModule> = hours
            .iter()
            .enumerate()
            .map(|(i, h)| SchedulableModule {
                id: format!("m{}", i),
                name: format!("Module {}", i),
                hours: *h,
            })
            .collect();
        build_schedule(&modules, 160.0, CarryMode::Legacy).unwrap()
    }

    fn item(month: u32) -> NarrativeItem {
        NarrativeItem {
            month_number: month,
            title: format!("Month {}", month),
            summary: "Work happens.".to_string(),
            module_ids: vec![],
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_plan() {
        let narrative = NarrativePlan {
            summary: "Two months of work.".to_string(),
            timeline_items: vec![item(1), item(2)],
        };
        assert!(NarrativeSynthesizer::validate(&narrative, &plan_of(&[100.0, 100.0, 100.0])).is_ok());
    }

    #[test]
    fn test_validate_tolerates_fewer_and_reordered_months() {
        let narrative = NarrativePlan {
            summary: "Partial narration.".to_string(),
            timeline_items: vec![item(2)],
        };
        assert!(NarrativeSynthesizer::validate(&narrative, &plan_of(&[100.0, 100.0, 100.0])).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_summary() {
        let narrative = NarrativePlan {
            summary: "   ".to_string(),
            timeline_items: vec![item(1)],
        };
        let err =
            NarrativeSynthesizer::validate(&narrative, &plan_of(&[100.0])).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidNarrative(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range_month() {
        let narrative = NarrativePlan {
            summary: "Overshoot.".to_string(),
            timeline_items: vec![item(5)],
        };
        let err =
            NarrativeSynthesizer::validate(&narrative, &plan_of(&[100.0])).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidNarrative(_)));
    }

    #[test]
    fn test_validate_rejects_duplicate_months() {
        let narrative = NarrativePlan {
            summary: "Twice month one.".to_string(),
            timeline_items: vec![item(1), item(1)],
        };
        let err = NarrativeSynthesizer::validate(&narrative, &plan_of(&[100.0, 100.0]))
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidNarrative(_)));
    }
}
