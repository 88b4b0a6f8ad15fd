// ABOUTME: Generative prompts for module generation, estimation, and timeline narration
// ABOUTME: Structured prompts that pin the response schemas and round-trip stable module IDs

use planora_core::Project;

use crate::scheduler::SchedulePlan;
use crate::types::ModuleDetail;

/// System prompt for module generation
pub const GENERATION_SYSTEM_PROMPT: &str = r#"You are an expert software architect and delivery planner.

Your role is to:
- Decompose a product description into coherent software modules
- Break each module into small, independently testable functionalities
- Write concrete, verifiable acceptance criteria
- Order modules by delivery priority (foundations first)

Always respond in valid JSON matching the requested structure. Do not invent
modules the description gives no evidence for."#;

/// Prompt for decomposing a product description into modules
pub fn module_generation_prompt(project: &Project) -> String {
    format!(
        r#"Decompose this product into software modules and functionalities.

Product name: {}

Product description:
{}

Objective:
{}

Return JSON in this format:

{{
  "modules": [
    {{
      "name": "Module name",
      "description": "What this module covers",
      "notes": "Optional free-text notes, or null",
      "functionalities": [
        {{
          "name": "Functionality name",
          "description": "What it does",
          "category": "feature | integration | infrastructure | ux",
          "acceptance_criteria": ["2-4 concrete, verifiable criteria"]
        }}
      ]
    }}
  ]
}}

Guidelines:
- 3-8 modules, ordered by delivery priority
- 2-6 functionalities per module
- Keep names short; put detail in descriptions"#,
        project.name,
        project.description,
        project.objective.as_deref().unwrap_or("(not stated)")
    )
}

/// System prompt for the effort estimation pass
pub const ESTIMATION_SYSTEM_PROMPT: &str = r#"You are an experienced engineering lead estimating implementation effort.

Score every functionality on each complexity criterion from 0 (trivial) to 10
(extreme): technical_difficulty, integration_surface, uncertainty,
testing_burden. Estimate hours assuming one mid-level engineer.

Always respond in valid JSON matching the requested structure. Echo each
functionality's id exactly as given."#;

/// Prompt estimating hours and complexity sub-scores for one module
pub fn estimation_prompt(module: &ModuleDetail) -> String {
    let functionality_list = module
        .functionalities
        .iter()
        .map(|f| format!("- id: {} | {} — {}", f.id, f.name, f.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Estimate effort for the functionalities of this module.

Module: {} — {}

Functionalities:
{}

Return JSON in this format:

{{
  "functionalities": [
    {{
      "id": "functionality id, echoed exactly",
      "estimated_hours": 12.0,
      "criteria": {{
        "technical_difficulty": 5.0,
        "integration_surface": 3.0,
        "uncertainty": 4.0,
        "testing_burden": 2.0
      }}
    }}
  ]
}}

Include every functionality exactly once."#,
        module.module.name, module.module.description, functionality_list
    )
}

/// System prompt for timeline narration
pub const NARRATIVE_SYSTEM_PROMPT: &str = r#"You are a delivery planner writing a client-facing project timeline.

Your role is to:
- Summarize the overall delivery plan in a short paragraph
- Give each month a concise title and a summary of the work scheduled there
- Mention when a module's work continues from the previous month

Always respond in valid JSON matching the requested structure. Echo module ids
exactly as given; never invent ids."#;

/// Prompt turning the schedule into narrative month summaries.
/// Module IDs are round-tripped through the response so downstream
/// persistence never has to match by name.
pub fn timeline_narrative_prompt(
    project: &Project,
    plan: &SchedulePlan,
    modules: &[ModuleDetail],
) -> String {
    let mut month_sections = String::new();
    for bucket in &plan.months {
        month_sections.push_str(&format!("Month {}:\n", bucket.month_number));
        for c in &bucket.continued {
            month_sections.push_str(&format!(
                "  - [continued from previous month] {} (id: {})\n",
                c.module_name, c.module_id
            ));
        }
        for a in &bucket.assignments {
            let marker = if a.is_partial {
                ", partial — continues next month"
            } else {
                ""
            };
            month_sections.push_str(&format!(
                "  - {} (id: {}, {}h{})\n",
                a.module_name, a.module_id, a.hours, marker
            ));
        }
    }

    let mut module_sections = String::new();
    for detail in modules {
        let functionality_names = detail
            .functionalities
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        module_sections.push_str(&format!(
            "- {} (id: {}): {}. Functionalities: {}\n",
            detail.module.name, detail.module.id, detail.module.description, functionality_names
        ));
    }

    format!(
        r#"Write the narrative for this project delivery timeline.

Project: {}
Description: {}
Objective: {}

Total estimated hours: {}
Monthly capacity: {} hours
Planned months: {}

Schedule:
{}
Modules:
{}
Return JSON in this format:

{{
  "summary": "3-5 sentence overview of the whole delivery plan",
  "timeline_items": [
    {{
      "month_number": 1,
      "title": "Short month title",
      "summary": "2-3 sentences on the month's work",
      "module_ids": ["ids of the modules active that month, echoed exactly"]
    }}
  ]
}}

Produce one timeline item per scheduled month, in month order."#,
        project.name,
        project.description,
        project.objective.as_deref().unwrap_or("(not stated)"),
        plan.total_hours,
        plan.monthly_capacity,
        plan.months.len(),
        month_sections,
        module_sections
    )
}
