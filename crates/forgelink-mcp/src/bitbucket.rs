//! Bitbucket tool set.
//!
//! Exposes repository, pull request, branch, commit, issue, and
//! workspace operations from [`BitbucketClient`] as MCP tools.

use async_trait::async_trait;
use forgelink_bitbucket::BitbucketClient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::dispatch::{parse_args, render, ArgumentError, ToolSet};
use crate::protocol::ToolDefinition;

/// Bitbucket tools backed by a [`BitbucketClient`].
pub struct BitbucketTools {
    client: BitbucketClient,
}

impl BitbucketTools {
    pub fn new(client: BitbucketClient) -> Self {
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

fn default_true() -> bool {
    true
}

fn default_merge_strategy() -> String {
    "merge_commit".to_string()
}

fn default_kind() -> String {
    "bug".to_string()
}

fn default_priority() -> String {
    "major".to_string()
}

#[derive(Deserialize)]
struct WorkspaceArgs {
    workspace: String,
}

#[derive(Deserialize)]
struct RepoArgs {
    workspace: String,
    repo_slug: String,
}

#[derive(Deserialize)]
struct CreateRepositoryArgs {
    workspace: String,
    repo_slug: String,
    #[serde(default = "default_true")]
    is_private: bool,
    description: Option<String>,
    project_key: Option<String>,
}

#[derive(Deserialize)]
struct SearchCodeArgs {
    workspace: String,
    repo_slug: String,
    search_query: String,
}

#[derive(Deserialize)]
struct ListPullRequestsArgs {
    workspace: String,
    repo_slug: String,
    state: Option<String>,
}

#[derive(Deserialize)]
struct PullRequestArgs {
    workspace: String,
    repo_slug: String,
    pr_id: u64,
}

#[derive(Deserialize)]
struct CreatePullRequestArgs {
    workspace: String,
    repo_slug: String,
    title: String,
    source_branch: String,
    destination_branch: String,
    description: Option<String>,
    #[serde(default)]
    close_source_branch: bool,
}

#[derive(Deserialize)]
struct UpdatePullRequestArgs {
    workspace: String,
    repo_slug: String,
    pr_id: u64,
    title: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct MergePullRequestArgs {
    workspace: String,
    repo_slug: String,
    pr_id: u64,
    #[serde(default = "default_merge_strategy")]
    merge_strategy: String,
    message: Option<String>,
}

#[derive(Deserialize)]
struct AddPrCommentArgs {
    workspace: String,
    repo_slug: String,
    pr_id: u64,
    content: String,
}

#[derive(Deserialize)]
struct BranchArgs {
    workspace: String,
    repo_slug: String,
    branch_name: String,
}

#[derive(Deserialize)]
struct CreateBranchArgs {
    workspace: String,
    repo_slug: String,
    branch_name: String,
    target: String,
}

#[derive(Deserialize)]
struct ListCommitsArgs {
    workspace: String,
    repo_slug: String,
    branch: Option<String>,
}

#[derive(Deserialize)]
struct CommitArgs {
    workspace: String,
    repo_slug: String,
    commit_hash: String,
}

#[derive(Deserialize)]
struct ListIssuesArgs {
    workspace: String,
    repo_slug: String,
    state: Option<String>,
}

#[derive(Deserialize)]
struct IssueArgs {
    workspace: String,
    repo_slug: String,
    issue_id: u64,
}

#[derive(Deserialize)]
struct CreateIssueArgs {
    workspace: String,
    repo_slug: String,
    title: String,
    description: Option<String>,
    #[serde(default = "default_kind")]
    kind: String,
    #[serde(default = "default_priority")]
    priority: String,
}

#[derive(Deserialize)]
struct UpdateIssueArgs {
    workspace: String,
    repo_slug: String,
    issue_id: u64,
    title: Option<String>,
    description: Option<String>,
    state: Option<String>,
    kind: Option<String>,
    priority: Option<String>,
}

#[async_trait]
impl ToolSet for BitbucketTools {
    fn server_name(&self) -> &'static str {
        "bitbucket-mcp"
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![
            // ==================== Repository Tools ====================
            tool(
                "get_repository",
                "Get detailed information about a specific repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                    },
                    "required": ["workspace", "repo_slug"],
                }),
            ),
            tool(
                "list_repositories",
                "List all repositories in a workspace",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                    },
                    "required": ["workspace"],
                }),
            ),
            tool(
                "create_repository",
                "Create a new repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "is_private": {"type": "boolean", "description": "Whether repository is private", "default": true},
                        "description": {"type": "string", "description": "Repository description"},
                        "project_key": {"type": "string", "description": "Project key to associate with"},
                    },
                    "required": ["workspace", "repo_slug"],
                }),
            ),
            tool(
                "search_code",
                "Search code in a repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "search_query": {"type": "string", "description": "Search query string"},
                    },
                    "required": ["workspace", "repo_slug", "search_query"],
                }),
            ),
            // ==================== Pull Request Tools ====================
            tool(
                "list_pull_requests",
                "List pull requests for a repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "state": {
                            "type": "string",
                            "enum": ["OPEN", "MERGED", "DECLINED"],
                            "description": "Filter by PR state",
                        },
                    },
                    "required": ["workspace", "repo_slug"],
                }),
            ),
            tool(
                "get_pull_request",
                "Get detailed information about a specific pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "create_pull_request",
                "Create a new pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "title": {"type": "string", "description": "PR title"},
                        "source_branch": {"type": "string", "description": "Source branch name"},
                        "destination_branch": {"type": "string", "description": "Destination branch name"},
                        "description": {"type": "string", "description": "PR description"},
                        "close_source_branch": {"type": "boolean", "description": "Close source branch after merge", "default": false},
                    },
                    "required": ["workspace", "repo_slug", "title", "source_branch", "destination_branch"],
                }),
            ),
            tool(
                "update_pull_request",
                "Update a pull request's title or description",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                        "title": {"type": "string", "description": "New title"},
                        "description": {"type": "string", "description": "New description"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "merge_pull_request",
                "Merge a pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                        "merge_strategy": {
                            "type": "string",
                            "enum": ["merge_commit", "squash", "fast_forward"],
                            "description": "Merge strategy",
                            "default": "merge_commit",
                        },
                        "message": {"type": "string", "description": "Merge commit message"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "decline_pull_request",
                "Decline a pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "approve_pull_request",
                "Approve a pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "unapprove_pull_request",
                "Remove approval from a pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "list_pr_comments",
                "List comments on a pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id"],
                }),
            ),
            tool(
                "add_pr_comment",
                "Add a comment to a pull request",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "pr_id": {"type": "integer", "description": "Pull request ID"},
                        "content": {"type": "string", "description": "Comment content"},
                    },
                    "required": ["workspace", "repo_slug", "pr_id", "content"],
                }),
            ),
            // ==================== Branch Tools ====================
            tool(
                "list_branches",
                "List all branches in a repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                    },
                    "required": ["workspace", "repo_slug"],
                }),
            ),
            tool(
                "get_branch",
                "Get detailed information about a specific branch",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "branch_name": {"type": "string", "description": "Branch name"},
                    },
                    "required": ["workspace", "repo_slug", "branch_name"],
                }),
            ),
            tool(
                "create_branch",
                "Create a new branch",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "branch_name": {"type": "string", "description": "New branch name"},
                        "target": {"type": "string", "description": "Target commit hash or branch name"},
                    },
                    "required": ["workspace", "repo_slug", "branch_name", "target"],
                }),
            ),
            tool(
                "delete_branch",
                "Delete a branch",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "branch_name": {"type": "string", "description": "Branch name to delete"},
                    },
                    "required": ["workspace", "repo_slug", "branch_name"],
                }),
            ),
            // ==================== Commit Tools ====================
            tool(
                "list_commits",
                "List commits in a repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "branch": {"type": "string", "description": "Optional branch name to filter commits"},
                    },
                    "required": ["workspace", "repo_slug"],
                }),
            ),
            tool(
                "get_commit",
                "Get detailed information about a specific commit",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "commit_hash": {"type": "string", "description": "Commit hash"},
                    },
                    "required": ["workspace", "repo_slug", "commit_hash"],
                }),
            ),
            tool(
                "get_commit_diff",
                "Get the diff for a specific commit",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "commit_hash": {"type": "string", "description": "Commit hash"},
                    },
                    "required": ["workspace", "repo_slug", "commit_hash"],
                }),
            ),
            // ==================== Issue Tools ====================
            tool(
                "list_issues",
                "List issues in a repository",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "state": {
                            "type": "string",
                            "enum": ["new", "open", "resolved", "on hold", "invalid", "duplicate", "wontfix", "closed"],
                            "description": "Filter by issue state",
                        },
                    },
                    "required": ["workspace", "repo_slug"],
                }),
            ),
            tool(
                "get_issue",
                "Get detailed information about a specific issue",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "issue_id": {"type": "integer", "description": "Issue ID"},
                    },
                    "required": ["workspace", "repo_slug", "issue_id"],
                }),
            ),
            tool(
                "create_issue",
                "Create a new issue",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "title": {"type": "string", "description": "Issue title"},
                        "description": {"type": "string", "description": "Issue description"},
                        "kind": {
                            "type": "string",
                            "enum": ["bug", "enhancement", "proposal", "task"],
                            "description": "Issue kind",
                            "default": "bug",
                        },
                        "priority": {
                            "type": "string",
                            "enum": ["trivial", "minor", "major", "critical", "blocker"],
                            "description": "Issue priority",
                            "default": "major",
                        },
                    },
                    "required": ["workspace", "repo_slug", "title"],
                }),
            ),
            tool(
                "update_issue",
                "Update an existing issue",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                        "repo_slug": {"type": "string", "description": "Repository slug"},
                        "issue_id": {"type": "integer", "description": "Issue ID"},
                        "title": {"type": "string", "description": "New title"},
                        "description": {"type": "string", "description": "New description"},
                        "state": {"type": "string", "description": "New state"},
                        "kind": {"type": "string", "description": "New kind"},
                        "priority": {"type": "string", "description": "New priority"},
                    },
                    "required": ["workspace", "repo_slug", "issue_id"],
                }),
            ),
            // ==================== Workspace Tools ====================
            tool(
                "list_workspaces",
                "List all accessible workspaces",
                json!({
                    "type": "object",
                    "properties": {},
                }),
            ),
            tool(
                "get_workspace",
                "Get detailed information about a specific workspace",
                json!({
                    "type": "object",
                    "properties": {
                        "workspace": {"type": "string", "description": "Workspace ID"},
                    },
                    "required": ["workspace"],
                }),
            ),
        ]
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> Result<String, ArgumentError> {
        let text = match name {
            // Repository tools
            "get_repository" => {
                let args: RepoArgs = parse_args(arguments)?;
                render(
                    self.client
                        .get_repository(&args.workspace, &args.repo_slug)
                        .await,
                )
            }
            "list_repositories" => {
                let args: WorkspaceArgs = parse_args(arguments)?;
                render(self.client.list_repositories(&args.workspace).await)
            }
            "create_repository" => {
                let args: CreateRepositoryArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_repository(
                            &args.workspace,
                            &args.repo_slug,
                            args.is_private,
                            args.description.as_deref(),
                            args.project_key.as_deref(),
                        )
                        .await,
                )
            }
            "search_code" => {
                let args: SearchCodeArgs = parse_args(arguments)?;
                render(
                    self.client
                        .search_code(&args.workspace, &args.repo_slug, &args.search_query)
                        .await,
                )
            }

            // Pull request tools
            "list_pull_requests" => {
                let args: ListPullRequestsArgs = parse_args(arguments)?;
                render(
                    self.client
                        .list_pull_requests(
                            &args.workspace,
                            &args.repo_slug,
                            args.state.as_deref(),
                        )
                        .await,
                )
            }
            "get_pull_request" => {
                let args: PullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .get_pull_request(&args.workspace, &args.repo_slug, args.pr_id)
                        .await,
                )
            }
            "create_pull_request" => {
                let args: CreatePullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_pull_request(
                            &args.workspace,
                            &args.repo_slug,
                            &args.title,
                            &args.source_branch,
                            &args.destination_branch,
                            args.description.as_deref(),
                            args.close_source_branch,
                        )
                        .await,
                )
            }
            "update_pull_request" => {
                let args: UpdatePullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .update_pull_request(
                            &args.workspace,
                            &args.repo_slug,
                            args.pr_id,
                            args.title.as_deref(),
                            args.description.as_deref(),
                        )
                        .await,
                )
            }
            "merge_pull_request" => {
                let args: MergePullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .merge_pull_request(
                            &args.workspace,
                            &args.repo_slug,
                            args.pr_id,
                            &args.merge_strategy,
                            args.message.as_deref(),
                        )
                        .await,
                )
            }
            "decline_pull_request" => {
                let args: PullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .decline_pull_request(&args.workspace, &args.repo_slug, args.pr_id)
                        .await,
                )
            }
            "approve_pull_request" => {
                let args: PullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .approve_pull_request(&args.workspace, &args.repo_slug, args.pr_id)
                        .await,
                )
            }
            "unapprove_pull_request" => {
                let args: PullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .unapprove_pull_request(&args.workspace, &args.repo_slug, args.pr_id)
                        .await,
                )
            }
            "list_pr_comments" => {
                let args: PullRequestArgs = parse_args(arguments)?;
                render(
                    self.client
                        .list_pr_comments(&args.workspace, &args.repo_slug, args.pr_id)
                        .await,
                )
            }
            "add_pr_comment" => {
                let args: AddPrCommentArgs = parse_args(arguments)?;
                render(
                    self.client
                        .add_pr_comment(
                            &args.workspace,
                            &args.repo_slug,
                            args.pr_id,
                            &args.content,
                        )
                        .await,
                )
            }

            // Branch tools
            "list_branches" => {
                let args: RepoArgs = parse_args(arguments)?;
                render(
                    self.client
                        .list_branches(&args.workspace, &args.repo_slug)
                        .await,
                )
            }
            "get_branch" => {
                let args: BranchArgs = parse_args(arguments)?;
                render(
                    self.client
                        .get_branch(&args.workspace, &args.repo_slug, &args.branch_name)
                        .await,
                )
            }
            "create_branch" => {
                let args: CreateBranchArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_branch(
                            &args.workspace,
                            &args.repo_slug,
                            &args.branch_name,
                            &args.target,
                        )
                        .await,
                )
            }
            "delete_branch" => {
                let args: BranchArgs = parse_args(arguments)?;
                render(
                    self.client
                        .delete_branch(&args.workspace, &args.repo_slug, &args.branch_name)
                        .await,
                )
            }

            // Commit tools
            "list_commits" => {
                let args: ListCommitsArgs = parse_args(arguments)?;
                render(
                    self.client
                        .list_commits(&args.workspace, &args.repo_slug, args.branch.as_deref())
                        .await,
                )
            }
            "get_commit" => {
                let args: CommitArgs = parse_args(arguments)?;
                render(
                    self.client
                        .get_commit(&args.workspace, &args.repo_slug, &args.commit_hash)
                        .await,
                )
            }
            "get_commit_diff" => {
                let args: CommitArgs = parse_args(arguments)?;
                render(
                    self.client
                        .get_commit_diff(&args.workspace, &args.repo_slug, &args.commit_hash)
                        .await,
                )
            }

            // Issue tools
            "list_issues" => {
                let args: ListIssuesArgs = parse_args(arguments)?;
                render(
                    self.client
                        .list_issues(&args.workspace, &args.repo_slug, args.state.as_deref())
                        .await,
                )
            }
            "get_issue" => {
                let args: IssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .get_issue(&args.workspace, &args.repo_slug, args.issue_id)
                        .await,
                )
            }
            "create_issue" => {
                let args: CreateIssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .create_issue(
                            &args.workspace,
                            &args.repo_slug,
                            &args.title,
                            args.description.as_deref(),
                            &args.kind,
                            &args.priority,
                        )
                        .await,
                )
            }
            "update_issue" => {
                let args: UpdateIssueArgs = parse_args(arguments)?;
                render(
                    self.client
                        .update_issue(
                            &args.workspace,
                            &args.repo_slug,
                            args.issue_id,
                            args.title.as_deref(),
                            args.description.as_deref(),
                            args.state.as_deref(),
                            args.kind.as_deref(),
                            args.priority.as_deref(),
                        )
                        .await,
                )
            }

            // Workspace tools
            "list_workspaces" => render(self.client.list_workspaces().await),
            "get_workspace" => {
                let args: WorkspaceArgs = parse_args(arguments)?;
                render(self.client.get_workspace(&args.workspace).await)
            }

            _ => format!("Unknown tool: {}", name),
        };

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn tools(server: &MockServer) -> BitbucketTools {
        BitbucketTools::new(BitbucketClient::with_base_url(
            server.base_url(),
            "dev",
            "app-password",
        ))
    }

    #[tokio::test]
    async fn test_unknown_tool_makes_no_request() {
        let server = MockServer::start_async().await;

        let text = tools(&server)
            .dispatch("get_teapot", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(text, "Unknown tool: get_teapot");
    }

    #[tokio::test]
    async fn test_missing_required_argument_is_err() {
        let server = MockServer::start_async().await;

        let err = tools(&server)
            .dispatch("get_repository", serde_json::json!({ "workspace": "acme" }))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("repo_slug"));
    }

    #[tokio::test]
    async fn test_remote_failure_renders_as_error_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repositories/acme/missing");
                then.status(404).body("Not Found");
            })
            .await;

        let text = tools(&server)
            .dispatch(
                "get_repository",
                serde_json::json!({ "workspace": "acme", "repo_slug": "missing" }),
            )
            .await
            .unwrap();

        assert!(text.starts_with("Error: "));
        assert!(text.contains("404"));
    }

    #[tokio::test]
    async fn test_get_repository_renders_pretty_json() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repositories/acme/web-app");
                then.status(200)
                    .json_body(serde_json::json!({ "slug": "web-app" }));
            })
            .await;

        let text = tools(&server)
            .dispatch(
                "get_repository",
                serde_json::json!({ "workspace": "acme", "repo_slug": "web-app" }),
            )
            .await
            .unwrap();

        assert!(text.contains("\"slug\": \"web-app\""));
    }

    #[tokio::test]
    async fn test_merge_pull_request_default_strategy() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/repositories/acme/web-app/pullrequests/7/merge")
                    .json_body(serde_json::json!({ "type": "merge_commit" }));
                then.status(200)
                    .json_body(serde_json::json!({ "state": "MERGED" }));
            })
            .await;

        tools(&server)
            .dispatch(
                "merge_pull_request",
                serde_json::json!({
                    "workspace": "acme",
                    "repo_slug": "web-app",
                    "pr_id": 7,
                }),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_issue_defaults() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/repositories/acme/web-app/issues")
                    .json_body(serde_json::json!({
                        "title": "Crash on load",
                        "kind": "bug",
                        "priority": "major",
                    }));
                then.status(201).json_body(serde_json::json!({ "id": 12 }));
            })
            .await;

        tools(&server)
            .dispatch(
                "create_issue",
                serde_json::json!({
                    "workspace": "acme",
                    "repo_slug": "web-app",
                    "title": "Crash on load",
                }),
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pr_id_must_be_integer() {
        let server = MockServer::start_async().await;

        let result = tools(&server)
            .dispatch(
                "get_pull_request",
                serde_json::json!({
                    "workspace": "acme",
                    "repo_slug": "web-app",
                    "pr_id": "seven",
                }),
            )
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_every_tool_is_dispatchable() {
        // tools/list and the dispatch table must stay in sync.
        let names: Vec<String> = BitbucketTools::new(BitbucketClient::new("u", "p"))
            .tool_definitions()
            .iter()
            .map(|t| t.name.clone())
            .collect();

        assert_eq!(names.len(), 27);
        for name in [
            "get_repository",
            "merge_pull_request",
            "create_branch",
            "get_commit_diff",
            "update_issue",
            "list_workspaces",
        ] {
            assert!(names.iter().any(|n| n == name), "missing tool: {}", name);
        }
    }
}
