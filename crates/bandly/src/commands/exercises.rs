//! Exercise command handlers (staff surface).

use std::sync::Arc;

use tabled::Tabled;

use bandly_core::{
    CoreError, CreateExercise, Exercise, ExerciseLister, ListController, MutationController,
    Session, UpdateExercise,
};

use crate::cli::{ExercisesArgs, ExercisesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Skill")]
    skill: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Questions")]
    questions: u32,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Exercise> for ExerciseRow {
    fn from(e: &Exercise) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.title.clone(),
            skill: e.skill.to_string(),
            level: e.level.clone(),
            questions: e.question_count,
            status: e.status.to_string(),
        }
    }
}

fn render(
    state: &bandly_core::ListState<Exercise>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    output::render_list_state(state, "exercises", global, |e| ExerciseRow::from(e), |e| {
        e.id.to_string()
    })
}

pub async fn handle(
    session: &Session,
    args: ExercisesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::clone(session.client());

    match args.command {
        ExercisesCommand::List {
            opts,
            skill,
            status,
            course,
        } => {
            let controller =
                ListController::new(ExerciseLister(client), util::page_size(&opts, session));
            util::apply_list_opts(&controller, &opts, |filters| {
                if let Some(ref skill) = skill {
                    filters.set("skill", skill.as_str());
                }
                if let Some(ref status) = status {
                    filters.set("status", status.as_str());
                }
                if let Some(course) = course {
                    filters.set("courseId", course.to_string());
                }
            });

            let state = controller.settled().await;
            render(&state, global)
        }

        ExercisesCommand::Get { id } => {
            let exercise = client.get_exercise(id).await.map_err(CoreError::from)?;
            let out = output::render_single(
                &global.output,
                &exercise,
                |e| {
                    format!(
                        "ID:        {}\nCourse:    {}\nTitle:     {}\nSkill:     {}\n\
                         Level:     band {}\nQuestions: {}\nStatus:    {}",
                        e.id, e.course_id, e.title, e.skill, e.level, e.question_count, e.status
                    )
                },
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExercisesCommand::Create {
            course,
            title,
            skill,
            level,
        } => {
            let mutations = MutationController::new(ListController::new(
                ExerciseLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = CreateExercise {
                course_id: course,
                title,
                skill,
                level,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Exercise created", async move {
                    op_client.create_exercise(&body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        ExercisesCommand::Update {
            id,
            title,
            level,
            status,
        } => {
            let mutations = MutationController::new(ListController::new(
                ExerciseLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = UpdateExercise {
                title,
                level,
                status,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Exercise updated", async move {
                    op_client.update_exercise(id, &body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        ExercisesCommand::Delete { id } => {
            let mutations = MutationController::new(ListController::new(
                ExerciseLister(Arc::clone(&client)),
                session.config().page_size,
            ));

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform_destructive(
                    &format!("Delete exercise {id}? This cannot be undone."),
                    &util::CliConfirm { yes: global.yes },
                    "Exercise deleted",
                    async move { op_client.delete_exercise(id).await },
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
