//! JIRA tool set.
//!
//! Exposes project, issue, sprint, board, user, and field operations
//! from [`JiraClient`] as MCP tools.

use async_trait::async_trait;
use forgelink_jira::JiraClient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::dispatch::{parse_args, render, ArgumentError, ToolSet};
use crate::protocol::ToolDefinition;

/// JIRA tools backed by a [`JiraClient`].
pub struct JiraTools {
    client: JiraClient,
}

impl JiraTools {
    pub fn new(client: JiraClient) -> Self {
        Self { client }
    }
}

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

// ==================== Argument records ====================

fn default_project_type() -> String {
    "software".to_string()
}

fn default_max_results() -> u32 {
    50
}

#[derive(Deserialize)]
struct ProjectArgs {
    project_key: String,
}

#[derive(Deserialize)]
struct CreateProjectArgs {
    key: String,
    name: String,
    #[serde(default = "default_project_type")]
    project_type_key: String,
    lead_account_id: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct SearchIssuesArgs {
    jql: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
    #[serde(default)]
    start_at: u32,
}

#[derive(Deserialize)]
struct IssueArgs {
    issue_key: String,
}

#[derive(Deserialize)]
struct CreateIssueArgs {
    project_key: String,
    summary: String,
    issue_type: String,
    description: Option<String>,
    priority: Option<String>,
    assignee_id: Option<String>,
    labels: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct UpdateIssueArgs {
    issue_key: String,
    summary: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    assignee_id: Option<String>,
    labels: Option<Vec<String>>,
    story_points: Option<f64>,
    sprint: Option<Vec<String>>,
    acceptance_criteria: Option<String>,
    technical_requirements: Option<String>,
}

#[derive(Deserialize)]
struct AssignIssueArgs {
    issue_key: String,
    assignee_id: String,
}

#[derive(Deserialize)]
struct TransitionIssueArgs {
    issue_key: String,
    transition_id: Option<String>,
    transition_name: Option<String>,
}

#[derive(Deserialize)]
struct AddCommentArgs {
    issue_key: String,
    comment: String,
}

#[derive(Deserialize)]
struct DeleteCommentArgs {
    issue_key: String,
    comment_id: String,
}

#[derive(Deserialize)]
struct BoardArgs {
    board_id: u64,
}

#[derive(Deserialize)]
struct SprintArgs {
    sprint_id: u64,
}

#[derive(Deserialize)]
struct CreateSprintArgs {
    board_id: u64,
    name: String,
    start_date: Option<String>,
    end_date: Option<String>,
    goal: Option<String>,
}

#[derive(Deserialize)]
struct MoveIssuesArgs {
    sprint_id: u64,
    issue_keys: Vec<String>,
}

#[derive(Deserialize)]
struct SearchUsersArgs {
    query: String,
}

#[async_trait]
impl ToolSet for JiraTools {
    fn server_name(&self) -> &'static str {
        "jira-mcp"
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![
            // ==================== Project Tools ====================
            tool(
                "list_projects",
                "List all accessible projects",
                json!({
                    "type": "object",
                    "properties": {},
                }),
            ),
            tool(
                "get_project",
                "Get detailed information about a specific project",
                json!({
                    "type": "object",
                    "properties": {
                        "project_key": {"type": "string", "description": "Project key (e.g., 'PROJ')"},
                    },
                    "required": ["project_key"],
                }),
            ),
            tool(
                "create_project",
                "Create a new project",
                json!({
                    "type": "object",
                    "properties": {
                        "key": {"type": "string", "description": "Project key (e.g., 'PROJ')"},
                        "name": {"type": "string", "description": "Project name"},
                        "project_type_key": {
                            "type": "string",
                            "enum": ["software", "business", "service_desk"],
                            "description": "Project type",
                            "default": "software",
                        },
                        "lead_account_id": {"type": "string", "description": "Account ID of project lead"},
                        "description": {"type": "string", "description": "Project description"},
                    },
                    "required": ["key", "name"],
                }),
            ),
            // ==================== Issue Tools ====================
            tool(
                "search_issues",
                "Search for issues using JQL (JIRA Query Language)",
                json!({
                    "type": "object",
                    "properties": {
                        "jql": {"type": "string", "description": "JQL query string"},
                        "max_results": {"type": "integer", "description": "Maximum number of results", "default": 50},
                        "start_at": {"type": "integer", "description": "Starting index for pagination", "default": 0},
                    },
                    "required": ["jql"],
                }),
            ),
            tool(
                "get_issue",
                "Get detailed information about a specific issue",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key (e.g., 'PROJ-123')"},
                    },
                    "required": ["issue_key"],
                }),
            ),
            tool(
                "create_issue",
                "Create a new issue",
                json!({
                    "type": "object",
                    "properties": {
                        "project_key": {"type": "string", "description": "Project key"},
                        "summary": {"type": "string", "description": "Issue summary"},
                        "issue_type": {"type": "string", "description": "Issue type (e.g., 'Bug', 'Task', 'Story')"},
                        "description": {"type": "string", "description": "Issue description"},
                        "priority": {"type": "string", "description": "Priority (e.g., 'High', 'Medium', 'Low')"},
                        "assignee_id": {"type": "string", "description": "Account ID of assignee"},
                        "labels": {"type": "array", "items": {"type": "string"}, "description": "List of labels"},
                    },
                    "required": ["project_key", "summary", "issue_type"],
                }),
            ),
            tool(
                "update_issue",
                "Update an existing issue",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key"},
                        "summary": {"type": "string", "description": "New summary"},
                        "description": {"type": "string", "description": "New description"},
                        "priority": {"type": "string", "description": "New priority"},
                        "assignee_id": {"type": "string", "description": "New assignee account ID"},
                        "labels": {"type": "array", "items": {"type": "string"}, "description": "New labels"},
                        "story_points": {"type": "number", "description": "Story points (e.g., 1, 2, 3, 5, 8)"},
                        "sprint": {"type": "array", "items": {"type": "string"}, "description": "Sprint labels"},
                        "acceptance_criteria": {"type": "string", "description": "Acceptance criteria text"},
                        "technical_requirements": {"type": "string", "description": "Technical requirements text"},
                    },
                    "required": ["issue_key"],
                }),
            ),
            tool(
                "delete_issue",
                "Delete an issue",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key"},
                    },
                    "required": ["issue_key"],
                }),
            ),
            tool(
                "assign_issue",
                "Assign an issue to a user",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key"},
                        "assignee_id": {"type": "string", "description": "Account ID of assignee"},
                    },
                    "required": ["issue_key", "assignee_id"],
                }),
            ),
            tool(
                "transition_issue",
                "Transition an issue to a new status",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key"},
                        "transition_id": {"type": "string", "description": "Transition ID (if known)"},
                        "transition_name": {"type": "string", "description": "Transition name (e.g., 'Done', 'In Progress')"},
                    },
                    "required": ["issue_key"],
                }),
            ),
            tool(
                "add_comment",
                "Add a comment to an issue",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key"},
                        "comment": {"type": "string", "description": "Comment text"},
                    },
                    "required": ["issue_key", "comment"],
                }),
            ),
            tool(
                "delete_comment",
                "Delete a comment from an issue",
                json!({
                    "type": "object",
                    "properties": {
                        "issue_key": {"type": "string", "description": "Issue key"},
                        "comment_id": {"type": "string", "description": "Comment ID to delete"},
                    },
                    "required": ["issue_key", "comment_id"],
                }),
            ),
            // ==================== Sprint Tools ====================
            tool(
                "list_sprints",
                "List sprints for a board",
                json!({
                    "type": "object",
                    "properties": {
                        "board_id": {"type": "integer", "description": "Board ID"},
                    },
                    "required": ["board_id"],
                }),
            ),
            tool(
                "get_sprint",
                "Get detailed information about a specific sprint",
                json!({
                    "type": "object",
                    "properties": {
                        "sprint_id": {"type": "integer", "description": "Sprint ID"},
                    },
                    "required": ["sprint_id"],
                }),
            ),
            tool(
                "create_sprint",
                "Create a new sprint",
                json!({
                    "type": "object",
                    "properties": {
                        "board_id": {"type": "integer", "description": "Board ID"},
                        "name": {"type": "string", "description": "Sprint name"},
                        "start_date": {"type": "string", "description": "Start date (ISO 8601 format)"},
                        "end_date": {"type": "string", "description": "End date (ISO 8601 format)"},
                        "goal": {"type": "string", "description": "Sprint goal"},
                    },
                    "required": ["board_id", "name"],
                }),
            ),
            tool(
                "move_issues_to_sprint",
                "Move issues to a sprint",
                json!({
                    "type": "object",
                    "properties": {
                        "sprint_id": {"type": "integer", "description": "Sprint ID"},
                        "issue_keys": {"type": "array", "items": {"type": "string"}, "description": "List of issue keys"},
                    },
                    "required": ["sprint_id", "issue_keys"],
                }),
            ),
            // ==================== Board Tools ====================
            tool(
                "list_boards",
                "List all boards",
                json!({
                    "type": "object",
                    "properties": {},
                }),
            ),
            tool(
                "get_board",
                "Get detailed information about a specific board",
                json!({
                    "type": "object",
                    "properties": {
                        "board_id": {"type": "integer", "description": "Board ID"},
                    },
                    "required": ["board_id"],
                }),
            ),
            // ==================== User Tools ====================
            tool(
                "search_users",
                "Search for users",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search query"},
                    },
                    "required": ["query"],
                }),
            ),
            tool(
                "get_current_user",
                "Get current user information",
                json!({
                    "type": "object",
                    "properties": {},
                }),
            ),
            // ==================== Field Tools ====================
            tool(
                "get_custom_fields",
                "Get all custom fields with their names, IDs, and metadata",
                json!({
                    "type": "object",
                    "properties": {},
                }),
            ),
        ]
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> Result<String, ArgumentError> {
        let text = match name {
            // Project tools
            "list_projects" => render(self.client.list_projects().await),
            "get_project" => {
                let args: ProjectArgs = parse_args(arguments)?;
                render(self.client.get_project(&args.project_key).await)
            }
            "create_project" => {
                let args: CreateProjectArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_project(
                            &args.key,
                            &args.name,
                            &args.project_type_key,
                            args.lead_account_id.as_deref(),
                            args.description.as_deref(),
                        )
                        .await,
                )
            }

            // Issue tools
            "search_issues" => {
                let args: SearchIssuesArgs = parse_args(arguments)?;
                render(
                    self.client
                        .search_issues(&args.jql, args.max_results, args.start_at)
                        .await,
                )
            }
            "get_issue" => {
                let args: IssueArgs = parse_args(arguments)?;
                render(self.client.get_issue(&args.issue_key).await)
            }
            "create_issue" => {
                let args: CreateIssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_issue(
                            &args.project_key,
                            &args.summary,
                            &args.issue_type,
                            args.description.as_deref(),
                            args.priority.as_deref(),
                            args.assignee_id.as_deref(),
                            args.labels.as_deref(),
                        )
                        .await,
                )
            }
            "update_issue" => {
                let args: UpdateIssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .update_issue(
                            &args.issue_key,
                            args.summary.as_deref(),
                            args.description.as_deref(),
                            args.priority.as_deref(),
                            args.assignee_id.as_deref(),
                            args.labels.as_deref(),
                            args.story_points,
                            args.sprint.as_deref(),
                            args.acceptance_criteria.as_deref(),
                            args.technical_requirements.as_deref(),
                        )
                        .await,
                )
            }
            "delete_issue" => {
                let args: IssueArgs = parse_args(arguments)?;
                render(self.client.delete_issue(&args.issue_key).await)
            }
            "assign_issue" => {
                let args: AssignIssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .assign_issue(&args.issue_key, &args.assignee_id)
                        .await,
                )
            }
            "transition_issue" => {
                let args: TransitionIssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .transition_issue(
                            &args.issue_key,
                            args.transition_id.as_deref(),
                            args.transition_name.as_deref(),
                        )
                        .await,
                )
            }
            "add_comment" => {
                let args: AddCommentArgs = parse_args(arguments)?;
                render(self.client.add_comment(&args.issue_key, &args.comment).await)
            }
            "delete_comment" => {
                let args: DeleteCommentArgs = parse_args(arguments)?;
                render(
                    self.client
                        .delete_comment(&args.issue_key, &args.comment_id)
                        .await,
                )
            }

            // Sprint tools
            "list_sprints" => {
                let args: BoardArgs = parse_args(arguments)?;
                render(self.client.list_sprints(args.board_id).await)
            }
            "get_sprint" => {
                let args: SprintArgs = parse_args(arguments)?;
                render(self.client.get_sprint(args.sprint_id).await)
            }
            "create_sprint" => {
                let args: CreateSprintArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_sprint(
                            args.board_id,
                            &args.name,
                            args.start_date.as_deref(),
                            args.end_date.as_deref(),
                            args.goal.as_deref(),
                        )
                        .await,
                )
            }
            "move_issues_to_sprint" => {
                let args: MoveIssuesArgs = parse_args(arguments)?;
                render(
                    self.client
                        .move_issues_to_sprint(args.sprint_id, &args.issue_keys)
                        .await,
                )
            }

            // Board tools
            "list_boards" => render(self.client.list_boards().await),
            "get_board" => {
                let args: BoardArgs = parse_args(arguments)?;
                render(self.client.get_board(args.board_id).await)
            }

            // User tools
            "search_users" => {
                let args: SearchUsersArgs = parse_args(arguments)?;
                render(self.client.search_users(&args.query).await)
            }
            "get_current_user" => render(self.client.get_current_user().await),

            // Field tools
            "get_custom_fields" => render(self.client.get_custom_fields().await),

            _ => format!("Unknown tool: {}", name),
        };

        Ok(text)
    }
}
