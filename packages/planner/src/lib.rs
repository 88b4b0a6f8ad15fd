// ABOUTME: Planora planner library - plan synthesis from product description to delivery timeline
// ABOUTME: Generation, estimation, effort aggregation, monthly scheduling, narrative synthesis, persistence

pub mod effort;
pub mod error;
pub mod estimator;
pub mod generator;
pub mod manager;
pub mod narrative;
pub mod prompts;
pub mod scheduler;
pub mod storage;
pub mod timeline;
pub mod types;
pub mod weights;

pub use effort::{EffortAggregator, ModuleEffort, ModuleRollup};
pub use error::{PlannerError, Result};
pub use estimator::EffortEstimator;
pub use generator::ModuleGenerator;
pub use manager::{GenerateTimelineOptions, TimelineManager};
pub use narrative::{NarrativeItem, NarrativePlan, NarrativeSynthesizer};
pub use scheduler::{
    build_schedule, CarryMode, Continuation, ModuleAssignment, MonthBucket, SchedulableModule,
    SchedulePlan, SPLIT_THRESHOLD_RATIO,
};
pub use storage::ModuleStorage;
pub use timeline::{PersistedTimeline, PersistedTimelineItem, TimelineWriter, WriteOutcome};
pub use types::{
    CreateFunctionalityInput, CreateModuleInput, Functionality, ModuleDetail, ProjectModule,
};
pub use weights::{ComplexityCriterion, ComplexityWeights, CriterionScores};
