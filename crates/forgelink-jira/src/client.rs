//! JIRA API client implementation.

use forgelink_core::{Error, Result};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::adf;

/// Client for the JIRA Cloud API (v3 plus the agile 1.0 endpoints).
///
/// Holds one authenticated `reqwest::Client` and the credential pair;
/// stateless per call, safe to share across concurrent requests.
pub struct JiraClient {
    instance_url: String,
    email: String,
    api_token: String,
    client: reqwest::Client,
}

impl JiraClient {
    /// Create a new JIRA client for an instance URL like
    /// `https://your-domain.atlassian.net`.
    pub fn new(
        instance_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            email: email.into(),
            api_token: api_token.into(),
            client: reqwest::Client::builder()
                .user_agent("forgelink")
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3{}", self.instance_url, path)
    }

    fn agile_url(&self, path: &str) -> String {
        format!("{}/rest/agile/1.0{}", self.instance_url, path)
    }

    /// Send a request with auth, check status, parse the JSON body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .basic_auth(&self.email, Some(&self.api_token))
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
                "JIRA API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }

    /// Send a request where the response body carries no information
    /// (JIRA mutations mostly answer 204 No Content).
    async fn send_expect_empty(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request
            .basic_auth(&self.email, Some(&self.api_token))
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
                "JIRA API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        Ok(())
    }

    async fn get(&self, url: String) -> Result<Value> {
        debug!(url = url, "JIRA GET request");
        self.send(self.client.get(url)).await
    }

    async fn get_with_query(&self, url: String, query: &[(&str, &str)]) -> Result<Value> {
        debug!(url = url, query = ?query, "JIRA GET request");
        self.send(self.client.get(url).query(query)).await
    }

    async fn post(&self, url: String, body: &Value) -> Result<Value> {
        debug!(url = url, "JIRA POST request");
        self.send(self.client.post(url).json(body)).await
    }

    async fn post_expect_empty(&self, url: String, body: &Value) -> Result<()> {
        debug!(url = url, "JIRA POST request");
        self.send_expect_empty(self.client.post(url).json(body)).await
    }

    async fn put_expect_empty(&self, url: String, body: &Value) -> Result<()> {
        debug!(url = url, "JIRA PUT request");
        self.send_expect_empty(self.client.put(url).json(body)).await
    }

    async fn delete(&self, url: String) -> Result<()> {
        debug!(url = url, "JIRA DELETE request");
        self.send_expect_empty(self.client.delete(url)).await
    }

    // ==================== Project Operations ====================

    /// List all accessible projects.
    pub async fn list_projects(&self) -> Result<Value> {
        self.get(self.api_url("/project")).await
    }

    /// Get project details.
    pub async fn get_project(&self, project_key: &str) -> Result<Value> {
        self.get(self.api_url(&format!("/project/{}", project_key)))
            .await
    }

    /// Create a new project.
    pub async fn create_project(
        &self,
        key: &str,
        name: &str,
        project_type_key: &str,
        lead_account_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<Value> {
        let body = create_project_body(key, name, project_type_key, lead_account_id, description);
        self.post(self.api_url("/project"), &body).await
    }

    // ==================== Issue Operations ====================

    /// Search for issues using JQL.
    ///
    /// `start_at` is accepted for compatibility but never forwarded: the
    /// `/search/jql` endpoint is cursor-based and rejects offsets.
    pub async fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
        _start_at: u32,
    ) -> Result<Value> {
        let body = json!({
            "jql": jql,
            "maxResults": max_results,
        });
        self.post(self.api_url("/search/jql"), &body).await
    }

    /// Get issue details.
    ///
    /// If the issue carries a rich-text description, its flattened text
    /// is attached under `fields.description_text` alongside the
    /// original structured field.
    pub async fn get_issue(&self, issue_key: &str) -> Result<Value> {
        let mut issue = self
            .get(self.api_url(&format!("/issue/{}", issue_key)))
            .await?;

        let description_text = issue
            .pointer("/fields/description")
            .filter(|d| !d.is_null())
            .map(adf::extract_text);
        if let Some(text) = description_text {
            issue["fields"]["description_text"] = json!(text);
        }

        Ok(issue)
    }

    /// Create a new issue.
    pub async fn create_issue(
        &self,
        project_key: &str,
        summary: &str,
        issue_type: &str,
        description: Option<&str>,
        priority: Option<&str>,
        assignee_id: Option<&str>,
        labels: Option<&[String]>,
    ) -> Result<Value> {
        let fields = create_issue_fields(
            project_key,
            summary,
            issue_type,
            description,
            priority,
            assignee_id,
            labels,
        );
        self.post(self.api_url("/issue"), &json!({ "fields": fields }))
            .await
    }

    /// Update an issue; returns a synthesized status object since the
    /// remote answers 204 No Content.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_issue(
        &self,
        issue_key: &str,
        summary: Option<&str>,
        description: Option<&str>,
        priority: Option<&str>,
        assignee_id: Option<&str>,
        labels: Option<&[String]>,
        story_points: Option<f64>,
        sprint: Option<&[String]>,
        acceptance_criteria: Option<&str>,
        technical_requirements: Option<&str>,
    ) -> Result<Value> {
        let fields = update_issue_fields(
            summary,
            description,
            priority,
            assignee_id,
            labels,
            story_points,
            sprint,
            acceptance_criteria,
            technical_requirements,
        );
        self.put_expect_empty(
            self.api_url(&format!("/issue/{}", issue_key)),
            &json!({ "fields": fields }),
        )
        .await?;
        Ok(json!({ "status": "updated", "issue_key": issue_key }))
    }

    /// Delete an issue; returns a synthesized status object.
    pub async fn delete_issue(&self, issue_key: &str) -> Result<Value> {
        self.delete(self.api_url(&format!("/issue/{}", issue_key)))
            .await?;
        Ok(json!({ "status": "deleted", "issue_key": issue_key }))
    }

    /// Assign an issue to a user; returns a synthesized status object.
    pub async fn assign_issue(&self, issue_key: &str, assignee_id: &str) -> Result<Value> {
        self.put_expect_empty(
            self.api_url(&format!("/issue/{}/assignee", issue_key)),
            &json!({ "accountId": assignee_id }),
        )
        .await?;
        Ok(json!({
            "status": "assigned",
            "issue_key": issue_key,
            "assignee_id": assignee_id,
        }))
    }

    /// Transition an issue to a new status.
    ///
    /// When only a name is given, the available transitions are fetched
    /// and matched case-insensitively; the first match's ID is used. An
    /// unmatched name is a domain error naming the issue and the name.
    pub async fn transition_issue(
        &self,
        issue_key: &str,
        transition_id: Option<&str>,
        transition_name: Option<&str>,
    ) -> Result<Value> {
        let id = match (transition_id, transition_name) {
            (Some(id), _) => id.to_string(),
            (None, Some(name)) => self.resolve_transition_id(issue_key, name).await?,
            (None, None) => {
                return Err(Error::InvalidData(format!(
                    "No transition_id or transition_name provided for issue {}",
                    issue_key
                )))
            }
        };

        self.post_expect_empty(
            self.api_url(&format!("/issue/{}/transitions", issue_key)),
            &json!({ "transition": { "id": id } }),
        )
        .await?;
        Ok(json!({ "status": "transitioned", "issue_key": issue_key }))
    }

    /// Look up a transition ID by its human-readable name.
    async fn resolve_transition_id(&self, issue_key: &str, name: &str) -> Result<String> {
        let response = self
            .get(self.api_url(&format!("/issue/{}/transitions", issue_key)))
            .await?;

        let id = response
            .get("transitions")
            .and_then(Value::as_array)
            .and_then(|transitions| {
                transitions.iter().find(|t| {
                    t.get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|n| n.eq_ignore_ascii_case(name))
                })
            })
            .and_then(|t| t.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        id.ok_or_else(|| {
            Error::InvalidData(format!(
                "Transition '{}' not found for issue {}",
                name, issue_key
            ))
        })
    }

    /// Add a comment to an issue.
    pub async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<Value> {
        let body = json!({ "body": adf::paragraph_doc(comment) });
        self.post(
            self.api_url(&format!("/issue/{}/comment", issue_key)),
            &body,
        )
        .await
    }

    /// Delete a comment; returns a synthesized status object.
    pub async fn delete_comment(&self, issue_key: &str, comment_id: &str) -> Result<Value> {
        self.delete(self.api_url(&format!(
            "/issue/{}/comment/{}",
            issue_key, comment_id
        )))
        .await?;
        Ok(json!({
            "status": "deleted",
            "issue_key": issue_key,
            "comment_id": comment_id,
        }))
    }

    // ==================== Sprint Operations ====================

    /// List sprints for a board.
    pub async fn list_sprints(&self, board_id: u64) -> Result<Value> {
        self.get(self.agile_url(&format!("/board/{}/sprint", board_id)))
            .await
    }

    /// Get sprint details.
    pub async fn get_sprint(&self, sprint_id: u64) -> Result<Value> {
        self.get(self.agile_url(&format!("/sprint/{}", sprint_id)))
            .await
    }

    /// Create a new sprint.
    pub async fn create_sprint(
        &self,
        board_id: u64,
        name: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
        goal: Option<&str>,
    ) -> Result<Value> {
        let body = create_sprint_body(board_id, name, start_date, end_date, goal);
        self.post(self.agile_url("/sprint"), &body).await
    }

    /// Move issues to a sprint; returns a synthesized status object.
    pub async fn move_issues_to_sprint(
        &self,
        sprint_id: u64,
        issue_keys: &[String],
    ) -> Result<Value> {
        self.post_expect_empty(
            self.agile_url(&format!("/sprint/{}/issue", sprint_id)),
            &json!({ "issues": issue_keys }),
        )
        .await?;
        Ok(json!({
            "status": "moved",
            "sprint_id": sprint_id,
            "issue_count": issue_keys.len(),
        }))
    }

    // ==================== Board Operations ====================

    /// List all boards.
    pub async fn list_boards(&self) -> Result<Value> {
        self.get(self.agile_url("/board")).await
    }

    /// Get board details.
    pub async fn get_board(&self, board_id: u64) -> Result<Value> {
        self.get(self.agile_url(&format!("/board/{}", board_id)))
            .await
    }

    // ==================== User Operations ====================

    /// Search for users.
    pub async fn search_users(&self, query: &str) -> Result<Value> {
        self.get_with_query(self.api_url("/user/search"), &[("query", query)])
            .await
    }

    /// Get current user information.
    pub async fn get_current_user(&self) -> Result<Value> {
        self.get(self.api_url("/myself")).await
    }

    // ==================== Field Operations ====================

    /// Get all fields, with custom fields summarized for easier reading.
    pub async fn get_custom_fields(&self) -> Result<Value> {
        let fields = self.get(self.api_url("/field")).await?;
        Ok(summarize_custom_fields(fields))
    }
}

// =============================================================================
// Request body builders
//
// Absent optional fields are omitted from the body entirely, never sent
// as null. Free-text fields that JIRA requires in document form are
// wrapped via `adf::paragraph_doc`.
// =============================================================================

// Instance-specific custom field IDs, carried over from the tracked
// JIRA project this adapter was built against.
const FIELD_ACCEPTANCE_CRITERIA: &str = "customfield_10103";
const FIELD_TECHNICAL_REQUIREMENTS: &str = "customfield_10104";
const FIELD_STORY_POINTS: &str = "customfield_10105";
const FIELD_SPRINT_LABELS: &str = "customfield_10106";

fn create_project_body(
    key: &str,
    name: &str,
    project_type_key: &str,
    lead_account_id: Option<&str>,
    description: Option<&str>,
) -> Value {
    let mut body = json!({
        "key": key,
        "name": name,
        "projectTypeKey": project_type_key,
    });
    if let Some(lead_account_id) = lead_account_id {
        body["leadAccountId"] = json!(lead_account_id);
    }
    if let Some(description) = description {
        body["description"] = json!(description);
    }
    body
}

fn create_issue_fields(
    project_key: &str,
    summary: &str,
    issue_type: &str,
    description: Option<&str>,
    priority: Option<&str>,
    assignee_id: Option<&str>,
    labels: Option<&[String]>,
) -> Value {
    let mut fields = json!({
        "project": { "key": project_key },
        "summary": summary,
        "issuetype": { "name": issue_type },
    });
    if let Some(description) = description {
        fields["description"] = adf::paragraph_doc(description);
    }
    if let Some(priority) = priority {
        fields["priority"] = json!({ "name": priority });
    }
    if let Some(assignee_id) = assignee_id {
        fields["assignee"] = json!({ "id": assignee_id });
    }
    if let Some(labels) = labels {
        fields["labels"] = json!(labels);
    }
    fields
}

#[allow(clippy::too_many_arguments)]
fn update_issue_fields(
    summary: Option<&str>,
    description: Option<&str>,
    priority: Option<&str>,
    assignee_id: Option<&str>,
    labels: Option<&[String]>,
    story_points: Option<f64>,
    sprint: Option<&[String]>,
    acceptance_criteria: Option<&str>,
    technical_requirements: Option<&str>,
) -> Value {
    let mut fields = json!({});
    if let Some(summary) = summary {
        fields["summary"] = json!(summary);
    }
    if let Some(description) = description {
        fields["description"] = adf::paragraph_doc(description);
    }
    if let Some(priority) = priority {
        fields["priority"] = json!({ "name": priority });
    }
    if let Some(assignee_id) = assignee_id {
        fields["assignee"] = json!({ "id": assignee_id });
    }
    if let Some(labels) = labels {
        fields["labels"] = json!(labels);
    }
    if let Some(points) = story_points {
        fields[FIELD_STORY_POINTS] = json!(points);
    }
    if let Some(sprint) = sprint {
        // Sprint is a labels-style field; values can't contain spaces.
        fields[FIELD_SPRINT_LABELS] = json!(sprint);
    }
    if let Some(text) = acceptance_criteria {
        fields[FIELD_ACCEPTANCE_CRITERIA] = adf::paragraph_doc(text);
    }
    if let Some(text) = technical_requirements {
        fields[FIELD_TECHNICAL_REQUIREMENTS] = adf::paragraph_doc(text);
    }
    fields
}

fn create_sprint_body(
    board_id: u64,
    name: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    goal: Option<&str>,
) -> Value {
    let mut body = json!({
        "name": name,
        "originBoardId": board_id,
    });
    if let Some(start_date) = start_date {
        body["startDate"] = json!(start_date);
    }
    if let Some(end_date) = end_date {
        body["endDate"] = json!(end_date);
    }
    if let Some(goal) = goal {
        body["goal"] = json!(goal);
    }
    body
}

/// Build the `get_custom_fields` response: a summary of custom fields
/// plus the untouched full field list.
fn summarize_custom_fields(fields: Value) -> Value {
    let all_fields = fields.as_array().cloned().unwrap_or_default();

    let custom_fields: Vec<Value> = all_fields
        .iter()
        .filter(|f| f.get("custom").and_then(Value::as_bool).unwrap_or(false))
        .map(|f| {
            json!({
                "id": f.get("id").cloned().unwrap_or(Value::Null),
                "name": f.get("name").cloned().unwrap_or(Value::Null),
                "description": f
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or(""),
                "type": f
                    .pointer("/schema/type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown"),
                "custom": true,
            })
        })
        .collect();

    json!({
        "total_fields": all_fields.len(),
        "custom_fields_count": custom_fields.len(),
        "custom_fields": custom_fields,
        "all_fields": all_fields,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> JiraClient {
        JiraClient::new(server.base_url(), "dev@acme.io", "token")
    }

    #[tokio::test]
    async fn test_get_issue_attaches_description_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/issue/WEB-1");
                then.status(200).json_body(serde_json::json!({
                    "key": "WEB-1",
                    "fields": {
                        "summary": "Broken layout",
                        "description": {
                            "type": "doc",
                            "version": 1,
                            "content": [{
                                "type": "paragraph",
                                "content": [{ "type": "text", "text": "hello world" }],
                            }],
                        },
                    },
                }));
            })
            .await;

        let issue = client(&server).get_issue("WEB-1").await.unwrap();

        assert_eq!(issue["fields"]["description_text"], "hello world");
        // Original structured field stays in place.
        assert_eq!(issue["fields"]["description"]["type"], "doc");
    }

    #[tokio::test]
    async fn test_get_issue_without_description() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/issue/WEB-2");
                then.status(200).json_body(serde_json::json!({
                    "key": "WEB-2",
                    "fields": { "summary": "No description", "description": null },
                }));
            })
            .await;

        let issue = client(&server).get_issue("WEB-2").await.unwrap();
        assert!(issue["fields"].get("description_text").is_none());
    }

    #[tokio::test]
    async fn test_search_issues_ignores_start_at() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/api/3/search/jql")
                    .json_body(serde_json::json!({
                        "jql": "project = WEB",
                        "maxResults": 25,
                    }));
                then.status(200).json_body(serde_json::json!({ "issues": [] }));
            })
            .await;

        client(&server)
            .search_issues("project = WEB", 25, 10)
            .await
            .unwrap();

        // Exact body match above proves startAt was never forwarded.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transition_by_name_resolves_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/issue/WEB-1/transitions");
                then.status(200).json_body(serde_json::json!({
                    "transitions": [
                        { "id": "31", "name": "In Progress" },
                        { "id": "41", "name": "Done" },
                    ],
                }));
            })
            .await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/api/3/issue/WEB-1/transitions")
                    .json_body(serde_json::json!({ "transition": { "id": "41" } }));
                then.status(204);
            })
            .await;

        let result = client(&server)
            .transition_issue("WEB-1", None, Some("Done"))
            .await
            .unwrap();

        post.assert_async().await;
        assert_eq!(result["status"], "transitioned");
        assert_eq!(result["issue_key"], "WEB-1");
    }

    #[tokio::test]
    async fn test_transition_unknown_name_is_domain_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/issue/WEB-1/transitions");
                then.status(200).json_body(serde_json::json!({
                    "transitions": [
                        { "id": "31", "name": "In Progress" },
                        { "id": "41", "name": "Done" },
                    ],
                }));
            })
            .await;

        let err = client(&server)
            .transition_issue("WEB-1", None, Some("Unknown"))
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Unknown"));
        assert!(msg.contains("WEB-1"));
    }

    #[tokio::test]
    async fn test_transition_by_id_skips_lookup() {
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/api/3/issue/WEB-1/transitions")
                    .json_body(serde_json::json!({ "transition": { "id": "31" } }));
                then.status(204);
            })
            .await;

        client(&server)
            .transition_issue("WEB-1", Some("31"), Some("In Progress"))
            .await
            .unwrap();

        post.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_issue_synthesizes_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/rest/api/3/issue/WEB-1");
                then.status(204);
            })
            .await;

        let result = client(&server)
            .update_issue(
                "WEB-1",
                Some("New summary"),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            serde_json::json!({ "status": "updated", "issue_key": "WEB-1" })
        );
    }

    #[tokio::test]
    async fn test_move_issues_to_sprint_counts_issues() {
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/agile/1.0/sprint/7/issue")
                    .json_body(serde_json::json!({ "issues": ["WEB-1", "WEB-2"] }));
                then.status(204);
            })
            .await;

        let result = client(&server)
            .move_issues_to_sprint(7, &["WEB-1".to_string(), "WEB-2".to_string()])
            .await
            .unwrap();

        post.assert_async().await;
        assert_eq!(result["issue_count"], 2);
        assert_eq!(result["sprint_id"], 7);
    }

    #[tokio::test]
    async fn test_get_custom_fields_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/field");
                then.status(200).json_body(serde_json::json!([
                    { "id": "summary", "name": "Summary", "custom": false },
                    {
                        "id": "customfield_10105",
                        "name": "Story Points",
                        "custom": true,
                        "schema": { "type": "number" },
                    },
                ]));
            })
            .await;

        let result = client(&server).get_custom_fields().await.unwrap();

        assert_eq!(result["total_fields"], 2);
        assert_eq!(result["custom_fields_count"], 1);
        assert_eq!(result["custom_fields"][0]["id"], "customfield_10105");
        assert_eq!(result["custom_fields"][0]["type"], "number");
        assert_eq!(result["all_fields"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_create_issue_fields_omits_absent_optionals() {
        let fields = create_issue_fields("WEB", "Broken layout", "Bug", None, None, None, None);

        assert_eq!(fields["project"]["key"], "WEB");
        assert_eq!(fields["issuetype"]["name"], "Bug");
        assert!(fields.get("description").is_none());
        assert!(fields.get("priority").is_none());
        assert!(fields.get("assignee").is_none());
        assert!(fields.get("labels").is_none());
    }

    #[test]
    fn test_create_issue_fields_wraps_description() {
        let fields = create_issue_fields(
            "WEB",
            "Broken layout",
            "Bug",
            Some("steps to reproduce"),
            Some("High"),
            None,
            None,
        );

        assert_eq!(fields["description"]["type"], "doc");
        assert_eq!(
            fields["description"]["content"][0]["content"][0]["text"],
            "steps to reproduce"
        );
        assert_eq!(fields["priority"]["name"], "High");
    }

    #[test]
    fn test_update_issue_fields_custom_fields() {
        let sprint = vec!["sprint-12".to_string()];
        let fields = update_issue_fields(
            None,
            None,
            None,
            None,
            None,
            Some(5.0),
            Some(&sprint),
            Some("all tests green"),
            None,
        );

        assert_eq!(fields[FIELD_STORY_POINTS], 5.0);
        assert_eq!(fields[FIELD_SPRINT_LABELS][0], "sprint-12");
        assert_eq!(fields[FIELD_ACCEPTANCE_CRITERIA]["type"], "doc");
        assert!(fields.get(FIELD_TECHNICAL_REQUIREMENTS).is_none());
        assert!(fields.get("summary").is_none());
    }

    #[test]
    fn test_create_sprint_body() {
        let body = create_sprint_body(3, "Sprint 12", Some("2026-09-01"), None, None);
        assert_eq!(body["originBoardId"], 3);
        assert_eq!(body["startDate"], "2026-09-01");
        assert!(body.get("endDate").is_none());
        assert!(body.get("goal").is_none());
    }

    #[test]
    fn test_create_project_body() {
        let body = create_project_body("PROJ", "Project", "software", None, None);
        assert_eq!(
            body,
            serde_json::json!({
                "key": "PROJ",
                "name": "Project",
                "projectTypeKey": "software",
            })
        );
    }
}
