//! Reminder command handlers.

use std::sync::Arc;

use tabled::Tabled;

use bandly_core::{
    CoreError, CreateReminder, ListController, MutationController, Reminder, ReminderLister,
    Session, UpdateReminder,
};

use crate::cli::{GlobalOpts, RemindersArgs, RemindersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReminderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "At")]
    at: String,
    #[tabled(rename = "Repeat")]
    repeat: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
}

impl From<&Reminder> for ReminderRow {
    fn from(r: &Reminder) -> Self {
        Self {
            id: r.id.to_string(),
            message: r.message.clone(),
            at: r.remind_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            repeat: r.repeat.to_string(),
            enabled: r.enabled,
        }
    }
}

fn render(
    state: &bandly_core::ListState<Reminder>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    output::render_list_state(state, "reminders", global, |r| ReminderRow::from(r), |r| {
        r.id.to_string()
    })
}

pub async fn handle(
    session: &Session,
    args: RemindersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::clone(session.client());

    match args.command {
        RemindersCommand::List { opts, enabled } => {
            let controller =
                ListController::new(ReminderLister(client), util::page_size(&opts, session));
            util::apply_list_opts(&controller, &opts, |filters| {
                if let Some(ref enabled) = enabled {
                    filters.set("enabled", enabled.as_str());
                }
            });

            let state = controller.settled().await;
            render(&state, global)
        }

        RemindersCommand::Get { id } => {
            let reminder = client.get_reminder(id).await.map_err(CoreError::from)?;
            let out = output::render_single(
                &global.output,
                &reminder,
                |r| {
                    format!(
                        "ID:       {}\nMessage:  {}\nAt:       {}\nRepeat:   {}\nEnabled:  {}",
                        r.id,
                        r.message,
                        r.remind_at.format("%Y-%m-%d %H:%M UTC"),
                        r.repeat,
                        r.enabled
                    )
                },
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RemindersCommand::Create {
            message,
            remind_at,
            repeat,
        } => {
            let mutations = MutationController::new(ListController::new(
                ReminderLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = CreateReminder {
                message,
                remind_at,
                repeat,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Reminder created", async move {
                    op_client.create_reminder(&body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        RemindersCommand::Update {
            id,
            message,
            remind_at,
            enabled,
        } => {
            let mutations = MutationController::new(ListController::new(
                ReminderLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = UpdateReminder {
                message,
                remind_at,
                repeat: None,
                enabled,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Reminder updated", async move {
                    op_client.update_reminder(id, &body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        RemindersCommand::Delete { id } => {
            let mutations = MutationController::new(ListController::new(
                ReminderLister(Arc::clone(&client)),
                session.config().page_size,
            ));

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform_destructive(
                    &format!("Delete reminder {id}?"),
                    &util::CliConfirm { yes: global.yes },
                    "Reminder deleted",
                    async move { op_client.delete_reminder(id).await },
                )
                .await
                .map_err(CliError::from)?;

            let Some(outcome) = outcome else {
                util::note(global, "Aborted.");
                return Ok(());
            };

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }
    }
}
