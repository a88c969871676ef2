//! User command handlers (admin surface).

use std::sync::Arc;

use tabled::Tabled;

use bandly_core::{
    CoreError, CreateUser, ListController, MutationController, Session, UpdateUser, User,
    UserLister,
};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            status: u.status.to_string(),
        }
    }
}

fn detail(u: &User) -> String {
    let mut lines = vec![
        format!("ID:      {}", u.id),
        format!("Name:    {}", u.name),
        format!("Email:   {}", u.email),
        format!("Role:    {}", u.role),
        format!("Status:  {}", u.status),
    ];
    if let Some(created) = u.created_at {
        lines.push(format!("Joined:  {}", created.format("%Y-%m-%d")));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::clone(session.client());

    match args.command {
        UsersCommand::List { opts, role, status } => {
            let controller =
                ListController::new(UserLister(client), util::page_size(&opts, session));
            util::apply_list_opts(&controller, &opts, |filters| {
                if let Some(ref role) = role {
                    filters.set("role", role.as_str());
                }
                if let Some(ref status) = status {
                    filters.set("status", status.as_str());
                }
            });

            let state = controller.settled().await;
            output::render_list_state(&state, "users", global, |u| UserRow::from(u), |u| {
                u.id.to_string()
            })
        }

        UsersCommand::Get { id } => {
            let user = client.get_user(id).await.map_err(CoreError::from)?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create { name, email, role } => {
            let mutations = MutationController::new(ListController::new(
                UserLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = CreateUser { name, email, role };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("User created", async move {
                    op_client.create_user(&body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            let state = mutations.list().settled().await;
            output::render_list_state(&state, "users", global, |u| UserRow::from(u), |u| {
                u.id.to_string()
            })
        }

        UsersCommand::Update {
            id,
            name,
            role,
            status,
        } => {
            let mutations = MutationController::new(ListController::new(
                UserLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = UpdateUser { name, role, status };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("User updated", async move {
                    op_client.update_user(id, &body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            let state = mutations.list().settled().await;
            output::render_list_state(&state, "users", global, |u| UserRow::from(u), |u| {
                u.id.to_string()
            })
        }

        UsersCommand::Delete { id } => {
            let mutations = MutationController::new(ListController::new(
                UserLister(Arc::clone(&client)),
                session.config().page_size,
            ));

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform_destructive(
                    &format!("Delete user {id}? This cannot be undone."),
                    &util::CliConfirm { yes: global.yes },
                    "User deleted",
                    async move { op_client.delete_user(id).await },
                )
                .await
                .map_err(CliError::from)?;

            let Some(outcome) = outcome else {
                util::note(global, "Aborted.");
                return Ok(());
            };

            util::outcome_to_result(outcome, global)?;
            let state = mutations.list().settled().await;
            output::render_list_state(&state, "users", global, |u| UserRow::from(u), |u| {
                u.id.to_string()
            })
        }
    }
}
