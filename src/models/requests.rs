//! Tool parameter DTOs
//!
//! Arguments accepted by each tool. Absent optional fields take the
//! documented defaults.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default page size for `list_executions`
pub const DEFAULT_EXECUTION_LIMIT: i64 = 10;

fn default_true() -> bool {
    true
}

fn default_limit() -> i64 {
    DEFAULT_EXECUTION_LIMIT
}

/// Arguments for `list_workflows`
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ListWorkflowsParams {
    /// Only return workflows that are currently active
    #[serde(default)]
    pub active_only: bool,
}

/// Arguments for `get_workflow_details`
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GetWorkflowParams {
    /// Workflow ID
    pub workflow_id: String,
}

/// Arguments for `execute_workflow`
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ExecuteWorkflowParams {
    /// Workflow ID
    pub workflow_id: String,
    /// Optional JSON object passed to the workflow as input data
    #[serde(default)]
    pub input_data: Option<Map<String, Value>>,
}

/// Arguments for `get_execution_status`
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GetExecutionParams {
    /// Execution ID
    pub execution_id: String,
}

/// Arguments for `activate_workflow`
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ActivateWorkflowParams {
    /// Workflow ID
    pub workflow_id: String,
    /// true to activate, false to deactivate
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Arguments for `list_executions`
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ListExecutionsParams {
    /// Restrict to one workflow; all workflows when omitted
    #[serde(default)]
    pub workflow_id: Option<String>,
    /// Maximum number of executions to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for ListExecutionsParams {
    fn default() -> Self {
        Self {
            workflow_id: None,
            limit: DEFAULT_EXECUTION_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_object() {
        let p: ListWorkflowsParams = serde_json::from_value(json!({})).unwrap();
        assert!(!p.active_only);

        let p: ListExecutionsParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.limit, 10);
        assert!(p.workflow_id.is_none());
    }

    #[test]
    fn test_activate_defaults_to_true() {
        let p: ActivateWorkflowParams =
            serde_json::from_value(json!({"workflow_id": "wf1"})).unwrap();
        assert!(p.active);

        let p: ActivateWorkflowParams =
            serde_json::from_value(json!({"workflow_id": "wf1", "active": false})).unwrap();
        assert!(!p.active);
    }

    #[test]
    fn test_execute_input_data_must_be_object() {
        let p: ExecuteWorkflowParams =
            serde_json::from_value(json!({"workflow_id": "wf1", "input_data": {"x": 1}})).unwrap();
        assert_eq!(p.input_data.unwrap()["x"], 1);

        assert!(serde_json::from_value::<ExecuteWorkflowParams>(
            json!({"workflow_id": "wf1", "input_data": [1, 2]})
        )
        .is_err());
    }

    #[test]
    fn test_missing_required_id() {
        assert!(serde_json::from_value::<GetWorkflowParams>(json!({})).is_err());
        assert!(serde_json::from_value::<GetExecutionParams>(json!({"id": "1"})).is_err());
    }
}
