//! Goal command handlers.

use std::sync::Arc;

use tabled::Tabled;

use bandly_core::{
    CoreError, CreateGoal, Goal, GoalLister, ListController, MutationController, Session,
    UpdateGoal,
};

use crate::cli::{GlobalOpts, GoalsArgs, GoalsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Skill")]
    skill: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Achieved")]
    achieved: bool,
}

impl From<&Goal> for GoalRow {
    fn from(g: &Goal) -> Self {
        Self {
            id: g.id.to_string(),
            skill: g
                .skill
                .map_or_else(|| "overall".to_owned(), |s| s.to_string()),
            target: format!("band {:.1}", g.target_band),
            deadline: g
                .deadline
                .map(|d| d.to_string())
                .unwrap_or_default(),
            progress: format!("{:.0}%", g.progress_pct),
            achieved: g.achieved,
        }
    }
}

fn render(state: &bandly_core::ListState<Goal>, global: &GlobalOpts) -> Result<(), CliError> {
    output::render_list_state(state, "goals", global, |g| GoalRow::from(g), |g| {
        g.id.to_string()
    })
}

pub async fn handle(
    session: &Session,
    args: GoalsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::clone(session.client());

    match args.command {
        GoalsCommand::List {
            opts,
            skill,
            achieved,
        } => {
            let controller =
                ListController::new(GoalLister(client), util::page_size(&opts, session));
            util::apply_list_opts(&controller, &opts, |filters| {
                if let Some(ref skill) = skill {
                    filters.set("skill", skill.as_str());
                }
                if let Some(ref achieved) = achieved {
                    filters.set("achieved", achieved.as_str());
                }
            });

            let state = controller.settled().await;
            render(&state, global)
        }

        GoalsCommand::Get { id } => {
            let goal = client.get_goal(id).await.map_err(CoreError::from)?;
            let out = output::render_single(
                &global.output,
                &goal,
                |g| {
                    format!(
                        "ID:        {}\nSkill:     {}\nTarget:    band {:.1}\n\
                         Deadline:  {}\nProgress:  {:.0}%\nAchieved:  {}",
                        g.id,
                        g.skill
                            .map_or_else(|| "overall".to_owned(), |s| s.to_string()),
                        g.target_band,
                        g.deadline.map(|d| d.to_string()).unwrap_or_default(),
                        g.progress_pct,
                        g.achieved
                    )
                },
                |g| g.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GoalsCommand::Create {
            skill,
            target_band,
            deadline,
        } => {
            if !(0.0..=9.0).contains(&target_band) {
                return Err(CliError::Validation {
                    field: "target-band".into(),
                    reason: "band scores run from 0.0 to 9.0".into(),
                });
            }

            let mutations = MutationController::new(ListController::new(
                GoalLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = CreateGoal {
                skill,
                target_band,
                deadline,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Goal created", async move {
                    op_client.create_goal(&body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        GoalsCommand::Update {
            id,
            target_band,
            deadline,
            achieved,
        } => {
            let mutations = MutationController::new(ListController::new(
                GoalLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = UpdateGoal {
                target_band,
                deadline,
                achieved,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Goal updated", async move {
                    op_client.update_goal(id, &body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        GoalsCommand::Delete { id } => {
            let mutations = MutationController::new(ListController::new(
                GoalLister(Arc::clone(&client)),
                session.config().page_size,
            ));

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform_destructive(
                    &format!("Delete goal {id}?"),
                    &util::CliConfirm { yes: global.yes },
                    "Goal deleted",
                    async move { op_client.delete_goal(id).await },
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
