// HTML pages rendered with askama

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::AppState;
use crate::grouping::{Grouping, GroupingRule};

struct ContainerView {
    id: String,
    short_id: String,
    name: String,
    image: String,
    state: String,
    status: String,
    running: bool,
}

struct GroupView {
    name: String,
    status: &'static str,
    running_count: usize,
    total: usize,
    /// Group start/stop only reaches labeled members, so the fallback group has no buttons.
    actionable: bool,
    containers: Vec<ContainerView>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct DashboardTemplate {
    groups: Vec<GroupView>,
    container_count: usize,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate;

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

fn group_views(grouping: Grouping, rule: &GroupingRule) -> Vec<GroupView> {
    grouping
        .into_iter()
        .map(|(name, group)| {
            let actionable = group
                .containers
                .iter()
                .any(|c| c.label(&rule.label) == Some(name.as_str()));
            GroupView {
                status: group.status.as_str(),
                running_count: group.running_count,
                total: group.total,
                actionable,
                containers: group
                    .containers
                    .into_iter()
                    .map(|c| ContainerView {
                        short_id: c.id.chars().take(12).collect(),
                        running: c.state.is_running(),
                        state: c.state.to_string(),
                        id: c.id,
                        name: c.name,
                        image: c.image,
                        status: c.status,
                    })
                    .collect(),
                name,
            }
        })
        .collect()
}

fn render(template: &impl Template, status: StatusCode) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

/// GET / — grouped container overview.
pub(super) async fn dashboard(State(state): State<AppState>) -> Response {
    let containers = match state.engine.list_containers(true).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "listing containers for dashboard failed");
            let page = ErrorTemplate {
                message: e.to_string(),
            };
            return render(&page, StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let container_count = containers.len();
    let groups = group_views(state.grouping.group(containers), &state.grouping);
    render(
        &DashboardTemplate {
            groups,
            container_count,
        },
        StatusCode::OK,
    )
}

/// GET /login
pub(super) async fn login_page() -> Response {
    render(&LoginTemplate, StatusCode::OK)
}
