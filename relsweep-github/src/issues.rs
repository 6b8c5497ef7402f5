//! Issues closed by a pull request

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

/// An issue linked to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// GraphQL node id, used for project-item lookup
    pub node_id: String,
}

const LINKED_ISSUES_QUERY: &str = r#"
    query($owner: String!, $repo: String!, $pullNumber: Int!) {
        repository(owner: $owner, name: $repo) {
            pullRequest(number: $pullNumber) {
                closingIssuesReferences(first: 10) {
                    nodes {
                        number
                        id
                    }
                }
            }
        }
    }
"#;

#[derive(Debug, Deserialize)]
struct PullRequestQuery {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_request: Option<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    closing_issues_references: IssueConnection,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Vec<IssueNode>,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    number: u64,
    id: String,
}

impl GitHubClient {
    /// Fetch the issues a pull request is recorded as closing
    ///
    /// Returns up to 10 issues in API response order; pull requests closing
    /// more are truncated.
    pub async fn get_linked_issues(&self, pr_number: u64) -> Result<Vec<Issue>> {
        debug!(pr_number, "Fetching linked issues");

        let variables = json!({
            "owner": self.owner(),
            "repo": self.repo(),
            "pullNumber": pr_number,
        });

        let response = self
            .graphql::<PullRequestQuery>(LINKED_ISSUES_QUERY, variables)
            .await?;

        let pull_request = response
            .repository
            .and_then(|r| r.pull_request)
            .ok_or(Error::PrNotFound(pr_number))?;

        let issues: Vec<Issue> = pull_request
            .closing_issues_references
            .nodes
            .into_iter()
            .map(|n| Issue {
                number: n.number,
                node_id: n.id,
            })
            .collect();

        info!(pr_number, count = issues.len(), "Fetched linked issues");

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_issues_payload() {
        let payload = serde_json::json!({
            "repository": {
                "pullRequest": {
                    "closingIssuesReferences": {
                        "nodes": [
                            { "number": 41, "id": "I_41" },
                            { "number": 42, "id": "I_42" }
                        ]
                    }
                }
            }
        });

        let query: PullRequestQuery = serde_json::from_value(payload).unwrap();
        let nodes = query
            .repository
            .unwrap()
            .pull_request
            .unwrap()
            .closing_issues_references
            .nodes;

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].number, 41);
        assert_eq!(nodes[1].id, "I_42");
    }

    #[test]
    fn test_missing_pull_request_payload() {
        let payload = serde_json::json!({
            "repository": { "pullRequest": null }
        });

        let query: PullRequestQuery = serde_json::from_value(payload).unwrap();
        assert!(query.repository.unwrap().pull_request.is_none());
    }
}
