//! Bitbucket API client implementation.

use forgelink_core::{Error, Result};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::DEFAULT_BITBUCKET_URL;

/// Client for the Bitbucket Cloud v2.0 API.
///
/// Holds one authenticated `reqwest::Client` and the credential pair;
/// stateless per call, safe to share across concurrent requests.
pub struct BitbucketClient {
    base_url: String,
    username: String,
    app_password: String,
    client: reqwest::Client,
}

impl BitbucketClient {
    /// Create a new Bitbucket client.
    pub fn new(username: impl Into<String>, app_password: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BITBUCKET_URL, username, app_password)
    }

    /// Create a client with a custom base URL (for testing with httpmock).
    pub fn with_base_url(
        base_url: impl Into<String>,
        username: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            app_password: app_password.into(),
            client: reqwest::Client::builder()
                .user_agent("forgelink")
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with auth, check status, parse the JSON body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .basic_auth(&self.username, Some(&self.app_password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "Bitbucket API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }

    /// Send a request where the response body carries no information.
    async fn send_expect_empty(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request
            .basic_auth(&self.username, Some(&self.app_password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "Bitbucket API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!(url = url, "Bitbucket GET request");
        self.send(self.client.get(url)).await
    }

    async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.url(path);
        debug!(url = url, query = ?query, "Bitbucket GET request");
        self.send(self.client.get(url).query(query)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!(url = url, "Bitbucket POST request");
        self.send(self.client.post(url).json(body)).await
    }

    async fn post_empty(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!(url = url, "Bitbucket POST request");
        self.send(self.client.post(url)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!(url = url, "Bitbucket PUT request");
        self.send(self.client.put(url).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!(url = url, "Bitbucket DELETE request");
        self.send_expect_empty(self.client.delete(url)).await
    }

    // ==================== Repository Operations ====================

    /// Get repository information.
    pub async fn get_repository(&self, workspace: &str, repo_slug: &str) -> Result<Value> {
        self.get(&format!("/repositories/{}/{}", workspace, repo_slug))
            .await
    }

    /// List repositories in a workspace.
    pub async fn list_repositories(&self, workspace: &str) -> Result<Value> {
        self.get(&format!("/repositories/{}", workspace)).await
    }

    /// Create a new repository.
    pub async fn create_repository(
        &self,
        workspace: &str,
        repo_slug: &str,
        is_private: bool,
        description: Option<&str>,
        project_key: Option<&str>,
    ) -> Result<Value> {
        let body = create_repository_body(is_private, description, project_key);
        self.post(&format!("/repositories/{}/{}", workspace, repo_slug), &body)
            .await
    }

    /// Search code in a repository.
    pub async fn search_code(
        &self,
        workspace: &str,
        repo_slug: &str,
        search_query: &str,
    ) -> Result<Value> {
        self.get_with_query(
            &format!("/repositories/{}/{}/search/code", workspace, repo_slug),
            &[("search_query", search_query)],
        )
        .await
    }

    // ==================== Pull Request Operations ====================

    /// List pull requests, optionally filtered by state (OPEN, MERGED, DECLINED).
    pub async fn list_pull_requests(
        &self,
        workspace: &str,
        repo_slug: &str,
        state: Option<&str>,
    ) -> Result<Value> {
        let path = format!("/repositories/{}/{}/pullrequests", workspace, repo_slug);
        match state {
            Some(state) => self.get_with_query(&path, &[("state", state)]).await,
            None => self.get(&path).await,
        }
    }

    /// Get pull request details.
    pub async fn get_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
    ) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/pullrequests/{}",
            workspace, repo_slug, pr_id
        ))
        .await
    }

    /// Create a new pull request.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        title: &str,
        source_branch: &str,
        destination_branch: &str,
        description: Option<&str>,
        close_source_branch: bool,
    ) -> Result<Value> {
        let body = create_pull_request_body(
            title,
            source_branch,
            destination_branch,
            description,
            close_source_branch,
        );
        self.post(
            &format!("/repositories/{}/{}/pullrequests", workspace, repo_slug),
            &body,
        )
        .await
    }

    /// Update a pull request's title or description.
    pub async fn update_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({});
        if let Some(title) = title {
            body["title"] = json!(title);
        }
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        self.put(
            &format!(
                "/repositories/{}/{}/pullrequests/{}",
                workspace, repo_slug, pr_id
            ),
            &body,
        )
        .await
    }

    /// Merge a pull request with the given strategy.
    pub async fn merge_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
        merge_strategy: &str,
        message: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({ "type": merge_strategy });
        if let Some(message) = message {
            body["message"] = json!(message);
        }
        self.post(
            &format!(
                "/repositories/{}/{}/pullrequests/{}/merge",
                workspace, repo_slug, pr_id
            ),
            &body,
        )
        .await
    }

    /// Decline a pull request.
    pub async fn decline_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
    ) -> Result<Value> {
        self.post_empty(&format!(
            "/repositories/{}/{}/pullrequests/{}/decline",
            workspace, repo_slug, pr_id
        ))
        .await
    }

    /// Approve a pull request.
    pub async fn approve_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
    ) -> Result<Value> {
        self.post_empty(&format!(
            "/repositories/{}/{}/pullrequests/{}/approve",
            workspace, repo_slug, pr_id
        ))
        .await
    }

    /// Remove approval from a pull request.
    ///
    /// The remote returns no usable body, so a fixed acknowledgment
    /// object is synthesized instead.
    pub async fn unapprove_pull_request(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
    ) -> Result<Value> {
        self.delete(&format!(
            "/repositories/{}/{}/pullrequests/{}/approve",
            workspace, repo_slug, pr_id
        ))
        .await?;
        Ok(json!({ "status": "approval removed" }))
    }

    /// List comments on a pull request.
    pub async fn list_pr_comments(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
    ) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/pullrequests/{}/comments",
            workspace, repo_slug, pr_id
        ))
        .await
    }

    /// Add a comment to a pull request.
    pub async fn add_pr_comment(
        &self,
        workspace: &str,
        repo_slug: &str,
        pr_id: u64,
        content: &str,
    ) -> Result<Value> {
        let body = json!({ "content": { "raw": content } });
        self.post(
            &format!(
                "/repositories/{}/{}/pullrequests/{}/comments",
                workspace, repo_slug, pr_id
            ),
            &body,
        )
        .await
    }

    // ==================== Branch Operations ====================

    /// List branches in a repository.
    pub async fn list_branches(&self, workspace: &str, repo_slug: &str) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/refs/branches",
            workspace, repo_slug
        ))
        .await
    }

    /// Get branch details.
    pub async fn get_branch(
        &self,
        workspace: &str,
        repo_slug: &str,
        branch_name: &str,
    ) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/refs/branches/{}",
            workspace, repo_slug, branch_name
        ))
        .await
    }

    /// Create a new branch pointing at a target commit or branch.
    pub async fn create_branch(
        &self,
        workspace: &str,
        repo_slug: &str,
        branch_name: &str,
        target: &str,
    ) -> Result<Value> {
        let body = json!({
            "name": branch_name,
            "target": { "hash": target },
        });
        self.post(
            &format!("/repositories/{}/{}/refs/branches", workspace, repo_slug),
            &body,
        )
        .await
    }

    /// Delete a branch; returns a synthesized acknowledgment object.
    pub async fn delete_branch(
        &self,
        workspace: &str,
        repo_slug: &str,
        branch_name: &str,
    ) -> Result<Value> {
        self.delete(&format!(
            "/repositories/{}/{}/refs/branches/{}",
            workspace, repo_slug, branch_name
        ))
        .await?;
        Ok(json!({ "status": "branch deleted" }))
    }

    // ==================== Commit Operations ====================

    /// List commits, optionally restricted to a branch.
    pub async fn list_commits(
        &self,
        workspace: &str,
        repo_slug: &str,
        branch: Option<&str>,
    ) -> Result<Value> {
        let mut path = format!("/repositories/{}/{}/commits", workspace, repo_slug);
        if let Some(branch) = branch {
            path.push('/');
            path.push_str(branch);
        }
        self.get(&path).await
    }

    /// Get commit details.
    pub async fn get_commit(
        &self,
        workspace: &str,
        repo_slug: &str,
        commit_hash: &str,
    ) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/commit/{}",
            workspace, repo_slug, commit_hash
        ))
        .await
    }

    /// Get the diff for a commit.
    pub async fn get_commit_diff(
        &self,
        workspace: &str,
        repo_slug: &str,
        commit_hash: &str,
    ) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/diff/{}",
            workspace, repo_slug, commit_hash
        ))
        .await
    }

    // ==================== Issue Operations ====================

    /// List issues, optionally filtered by state.
    pub async fn list_issues(
        &self,
        workspace: &str,
        repo_slug: &str,
        state: Option<&str>,
    ) -> Result<Value> {
        let path = format!("/repositories/{}/{}/issues", workspace, repo_slug);
        match state {
            Some(state) => self.get_with_query(&path, &[("state", state)]).await,
            None => self.get(&path).await,
        }
    }

    /// Get issue details.
    pub async fn get_issue(
        &self,
        workspace: &str,
        repo_slug: &str,
        issue_id: u64,
    ) -> Result<Value> {
        self.get(&format!(
            "/repositories/{}/{}/issues/{}",
            workspace, repo_slug, issue_id
        ))
        .await
    }

    /// Create a new issue.
    pub async fn create_issue(
        &self,
        workspace: &str,
        repo_slug: &str,
        title: &str,
        description: Option<&str>,
        kind: &str,
        priority: &str,
    ) -> Result<Value> {
        let body = create_issue_body(title, description, kind, priority);
        self.post(
            &format!("/repositories/{}/{}/issues", workspace, repo_slug),
            &body,
        )
        .await
    }

    /// Update an existing issue.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_issue(
        &self,
        workspace: &str,
        repo_slug: &str,
        issue_id: u64,
        title: Option<&str>,
        description: Option<&str>,
        state: Option<&str>,
        kind: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Value> {
        let body = update_issue_body(title, description, state, kind, priority);
        self.put(
            &format!("/repositories/{}/{}/issues/{}", workspace, repo_slug, issue_id),
            &body,
        )
        .await
    }

    // ==================== Workspace Operations ====================

    /// List accessible workspaces.
    pub async fn list_workspaces(&self) -> Result<Value> {
        self.get("/workspaces").await
    }

    /// Get workspace details.
    pub async fn get_workspace(&self, workspace: &str) -> Result<Value> {
        self.get(&format!("/workspaces/{}", workspace)).await
    }
}

// =============================================================================
// Request body builders
//
// Absent optional fields are omitted from the body entirely, never sent
// as null.
// =============================================================================

fn create_repository_body(
    is_private: bool,
    description: Option<&str>,
    project_key: Option<&str>,
) -> Value {
    let mut body = json!({
        "scm": "git",
        "is_private": is_private,
    });
    if let Some(description) = description {
        body["description"] = json!(description);
    }
    if let Some(project_key) = project_key {
        body["project"] = json!({ "key": project_key });
    }
    body
}

fn create_pull_request_body(
    title: &str,
    source_branch: &str,
    destination_branch: &str,
    description: Option<&str>,
    close_source_branch: bool,
) -> Value {
    let mut body = json!({
        "title": title,
        "source": { "branch": { "name": source_branch } },
        "destination": { "branch": { "name": destination_branch } },
        "close_source_branch": close_source_branch,
    });
    if let Some(description) = description {
        body["description"] = json!(description);
    }
    body
}

fn create_issue_body(title: &str, description: Option<&str>, kind: &str, priority: &str) -> Value {
    let mut body = json!({
        "title": title,
        "kind": kind,
        "priority": priority,
    });
    if let Some(description) = description {
        body["content"] = json!({ "raw": description });
    }
    body
}

fn update_issue_body(
    title: Option<&str>,
    description: Option<&str>,
    state: Option<&str>,
    kind: Option<&str>,
    priority: Option<&str>,
) -> Value {
    let mut body = json!({});
    if let Some(title) = title {
        body["title"] = json!(title);
    }
    if let Some(description) = description {
        body["content"] = json!({ "raw": description });
    }
    if let Some(state) = state {
        body["state"] = json!(state);
    }
    if let Some(kind) = kind {
        body["kind"] = json!(kind);
    }
    if let Some(priority) = priority {
        body["priority"] = json!(priority);
    }
    body
}

// =============================================================================
// Tests
// =============================================================================
