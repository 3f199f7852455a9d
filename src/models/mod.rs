//! Tool parameter and result models
//!
//! DTOs deserialized from tool arguments and serialized back as tool results.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    ActivateWorkflowParams, ExecuteWorkflowParams, GetExecutionParams, GetWorkflowParams,
    ListExecutionsParams, ListWorkflowsParams, DEFAULT_EXECUTION_LIMIT,
};
pub use responses::{
    ActivationResult, ExecutionDetails, ExecutionStarted, ExecutionStatus, ExecutionSummary,
    HealthReport, ToolErrorResponse, WorkflowDetails, WorkflowSummary,
};
