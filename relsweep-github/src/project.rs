//! Projects (v2) metadata, item lookup, and the status mutation

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

/// One option of a single-select project field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option node id, used in the status mutation
    pub id: String,
    /// Display name
    pub name: String,
}

/// A project field, normalized from the GraphQL fragments
///
/// Plain and single-select fields share this shape; a field is single-select
/// exactly when `options` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectField {
    /// Field node id
    pub id: String,
    /// Field name
    pub name: String,
    /// Selectable options, present only for single-select fields
    pub options: Option<Vec<SelectOption>>,
}

impl ProjectField {
    /// Whether this field carries selectable options
    pub fn is_single_select(&self) -> bool {
        self.options.is_some()
    }

    /// Look up an option by exact name
    pub fn option_named(&self, name: &str) -> Option<&SelectOption> {
        self.options
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find(|opt| opt.name == name)
    }

    /// Resolve the option for a status value, erring if it doesn't exist
    ///
    /// This runs before any mutation is issued, so an unknown status never
    /// reaches the API.
    pub fn select_option(&self, status: &str) -> Result<&SelectOption> {
        self.option_named(status)
            .ok_or_else(|| Error::StatusOptionNotFound {
                status: status.to_string(),
                field: self.name.clone(),
            })
    }
}

/// Project metadata fetched once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    /// Project node id
    pub id: String,
    /// Project number
    pub number: u64,
    /// Normalized fields (first 20)
    pub fields: Vec<ProjectField>,
}

impl ProjectDetails {
    /// Look up a field by exact name
    pub fn field(&self, name: &str) -> Option<&ProjectField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const ORG_PROJECT_QUERY: &str = r#"
    query($owner: String!, $number: Int!) {
        organization(login: $owner) {
            projectV2(number: $number) {
                id
                number
                fields(first: 20) {
                    nodes {
                        ... on ProjectV2Field {
                            id
                            name
                        }
                        ... on ProjectV2SingleSelectField {
                            id
                            name
                            options {
                                id
                                name
                            }
                        }
                    }
                }
            }
        }
    }
"#;

const USER_PROJECT_QUERY: &str = r#"
    query($owner: String!, $number: Int!) {
        user(login: $owner) {
            projectV2(number: $number) {
                id
                number
                fields(first: 20) {
                    nodes {
                        ... on ProjectV2Field {
                            id
                            name
                        }
                        ... on ProjectV2SingleSelectField {
                            id
                            name
                            options {
                                id
                                name
                            }
                        }
                    }
                }
            }
        }
    }
"#;

const PROJECT_ITEMS_QUERY: &str = r#"
    query($projectId: ID!) {
        node(id: $projectId) {
            ... on ProjectV2 {
                items(first: 100) {
                    nodes {
                        id
                        content {
                            ... on Issue {
                                id
                            }
                        }
                    }
                }
            }
        }
    }
"#;

const UPDATE_ITEM_STATUS_MUTATION: &str = r#"
    mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
        updateProjectV2ItemFieldValue(
            input: {
                projectId: $projectId
                itemId: $itemId
                fieldId: $fieldId
                value: {
                    singleSelectOptionId: $optionId
                }
            }
        ) {
            projectV2Item {
                id
            }
        }
    }
"#;

#[derive(Debug, Deserialize)]
struct ProjectQuery {
    organization: Option<ProjectOwner>,
    user: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectOwner {
    project_v2: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    id: String,
    number: u64,
    fields: FieldConnection,
}

#[derive(Debug, Deserialize)]
struct FieldConnection {
    nodes: Vec<FieldNode>,
}

// Field nodes matching neither inline fragment (e.g. iteration fields) come
// back as empty objects, so every member is optional here.
#[derive(Debug, Deserialize)]
struct FieldNode {
    id: Option<String>,
    name: Option<String>,
    options: Option<Vec<SelectOption>>,
}

impl From<ProjectNode> for ProjectDetails {
    fn from(node: ProjectNode) -> Self {
        let fields = node
            .fields
            .nodes
            .into_iter()
            .filter_map(|f| {
                Some(ProjectField {
                    id: f.id?,
                    name: f.name?,
                    options: f.options,
                })
            })
            .collect();

        ProjectDetails {
            id: node.id,
            number: node.number,
            fields,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemsQuery {
    node: Option<ItemsNode>,
}

#[derive(Debug, Deserialize)]
struct ItemsNode {
    items: ItemConnection,
}

#[derive(Debug, Deserialize)]
struct ItemConnection {
    nodes: Vec<ItemNode>,
}

#[derive(Debug, Deserialize)]
struct ItemNode {
    id: String,
    content: Option<ContentNode>,
}

// Content that isn't an issue deserializes as an empty object.
#[derive(Debug, Deserialize)]
struct ContentNode {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct UpdateItemMutation {
    update_project_v2_item_field_value: Option<UpdatedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct UpdatedItem {
    project_v2_item: Option<UpdatedItemId>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct UpdatedItemId {
    id: String,
}

impl GitHubClient {
    /// Fetch project metadata by number
    ///
    /// Queries the organization-scoped project when `organization` is given,
    /// otherwise the user-scoped project of the repository owner. Requests
    /// the first 20 fields; projects with more are truncated.
    pub async fn get_project_details(
        &self,
        number: u64,
        organization: Option<&str>,
    ) -> Result<ProjectDetails> {
        debug!(number, ?organization, "Fetching project details");

        let query = if organization.is_some() {
            ORG_PROJECT_QUERY
        } else {
            USER_PROJECT_QUERY
        };

        let variables = json!({
            "owner": organization.unwrap_or_else(|| self.owner()),
            "number": number,
        });

        let response = self.graphql::<ProjectQuery>(query, variables).await?;

        let owner_node = if organization.is_some() {
            response.organization
        } else {
            response.user
        };

        let project: ProjectDetails = owner_node
            .and_then(|o| o.project_v2)
            .ok_or(Error::ProjectNotFound(number))?
            .into();

        info!(
            project_id = %project.id,
            fields = project.fields.len(),
            "Fetched project details"
        );

        Ok(project)
    }

    /// Find the project item wrapping an issue, if any
    ///
    /// Scans the first 100 items of the project; larger projects are not
    /// paginated, so an item past that ceiling is reported as absent.
    pub async fn get_project_item_for_issue(
        &self,
        project_id: &str,
        issue_node_id: &str,
    ) -> Result<Option<String>> {
        debug!(project_id, issue_node_id, "Looking up project item");

        let variables = json!({ "projectId": project_id });

        let response = self
            .graphql::<ItemsQuery>(PROJECT_ITEMS_QUERY, variables)
            .await?;

        let items = response.node.map(|n| n.items.nodes).unwrap_or_default();

        let item_id = items
            .into_iter()
            .find(|item| {
                item.content
                    .as_ref()
                    .and_then(|c| c.id.as_deref())
                    .is_some_and(|id| id == issue_node_id)
            })
            .map(|item| item.id);

        Ok(item_id)
    }

    /// Move an issue's project item to a new status
    ///
    /// Resolves the project item, then the status option on `status_field`,
    /// and only then issues the single-select mutation. Success is implied
    /// by the absence of an error.
    pub async fn update_project_item_status(
        &self,
        project_id: &str,
        issue_node_id: &str,
        status_field: &ProjectField,
        new_status: &str,
    ) -> Result<()> {
        let item_id = self
            .get_project_item_for_issue(project_id, issue_node_id)
            .await?
            .ok_or_else(|| Error::ProjectItemNotFound(issue_node_id.to_string()))?;

        debug!(item_id = %item_id, "Found project item");

        let option = status_field.select_option(new_status)?;

        debug!(option_id = %option.id, option_name = %option.name, "Found status option");

        let variables = json!({
            "projectId": project_id,
            "itemId": item_id,
            "fieldId": status_field.id,
            "optionId": option.id,
        });

        self.graphql::<UpdateItemMutation>(UPDATE_ITEM_STATUS_MUTATION, variables)
            .await?;

        info!(item_id = %item_id, status = %new_status, "Updated project item status");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_field() -> ProjectField {
        ProjectField {
            id: "FID_1".to_string(),
            name: "Status".to_string(),
            options: Some(vec![
                SelectOption {
                    id: "OPT_todo".to_string(),
                    name: "Todo".to_string(),
                },
                SelectOption {
                    id: "OPT_done".to_string(),
                    name: "Done".to_string(),
                },
            ]),
        }
    }

    #[test]
    fn test_option_lookup() {
        let field = status_field();
        assert_eq!(field.option_named("Done").unwrap().id, "OPT_done");
        assert!(field.option_named("done").is_none());
        assert!(field.option_named("Shipped").is_none());
    }

    #[test]
    fn test_select_option_unknown_status_is_distinct_error() {
        match status_field().select_option("Shipped") {
            Err(Error::StatusOptionNotFound { status, field }) => {
                assert_eq!(status, "Shipped");
                assert_eq!(field, "Status");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_select_option_on_plain_field() {
        let field = ProjectField {
            id: "FID_2".to_string(),
            name: "Title".to_string(),
            options: None,
        };
        assert!(!field.is_single_select());
        assert!(field.select_option("Done").is_err());
    }

    #[test]
    fn test_field_lookup_by_name() {
        let details = ProjectDetails {
            id: "PVT_1".to_string(),
            number: 7,
            fields: vec![status_field()],
        };
        assert!(details.field("Status").is_some());
        assert!(details.field("Priority").is_none());
    }

    #[test]
    fn test_project_normalization_drops_unmatched_fragments() {
        // An iteration field matches neither fragment and arrives as `{}`.
        let payload = serde_json::json!({
            "id": "PVT_abc",
            "number": 3,
            "fields": {
                "nodes": [
                    { "id": "FID_title", "name": "Title" },
                    {},
                    {
                        "id": "FID_status",
                        "name": "Status",
                        "options": [
                            { "id": "OPT_1", "name": "Todo" },
                            { "id": "OPT_2", "name": "Done" }
                        ]
                    }
                ]
            }
        });

        let node: ProjectNode = serde_json::from_value(payload).unwrap();
        let details: ProjectDetails = node.into();

        assert_eq!(details.id, "PVT_abc");
        assert_eq!(details.number, 3);
        assert_eq!(details.fields.len(), 2);
        assert!(!details.fields[0].is_single_select());
        assert!(details.fields[1].is_single_select());
        assert_eq!(details.fields[1].option_named("Done").unwrap().id, "OPT_2");
    }

    #[test]
    fn test_items_payload_skips_non_issue_content() {
        let payload = serde_json::json!({
            "node": {
                "items": {
                    "nodes": [
                        { "id": "ITEM_pr", "content": {} },
                        { "id": "ITEM_none", "content": null },
                        { "id": "ITEM_issue", "content": { "id": "I_target" } }
                    ]
                }
            }
        });

        let query: ItemsQuery = serde_json::from_value(payload).unwrap();
        let items = query.node.unwrap().items.nodes;

        let found = items
            .into_iter()
            .find(|item| {
                item.content
                    .as_ref()
                    .and_then(|c| c.id.as_deref())
                    .is_some_and(|id| id == "I_target")
            })
            .map(|item| item.id);

        assert_eq!(found.as_deref(), Some("ITEM_issue"));
    }
}
