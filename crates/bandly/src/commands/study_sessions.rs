//! Study session command handlers.

use std::sync::Arc;

use tabled::Tabled;

use bandly_core::{
    CoreError, CreateStudySession, ListController, MutationController, Session, StudySession,
    StudySessionLister,
};

use crate::cli::{GlobalOpts, SessionsArgs, SessionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Skill")]
    skill: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Score")]
    score: String,
}

impl From<&StudySession> for SessionRow {
    fn from(s: &StudySession) -> Self {
        Self {
            id: s.id.to_string(),
            skill: s.skill.to_string(),
            started: s.started_at.format("%Y-%m-%d %H:%M").to_string(),
            minutes: s.duration_minutes,
            score: s
                .score
                .map(|score| format!("{score:.1}"))
                .unwrap_or_default(),
        }
    }
}

fn render(
    state: &bandly_core::ListState<StudySession>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    output::render_list_state(state, "study sessions", global, |s| SessionRow::from(s), |s| {
        s.id.to_string()
    })
}

pub async fn handle(
    session: &Session,
    args: SessionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::clone(session.client());

    match args.command {
        SessionsCommand::List {
            opts,
            skill,
            course,
        } => {
            let controller =
                ListController::new(StudySessionLister(client), util::page_size(&opts, session));
            util::apply_list_opts(&controller, &opts, |filters| {
                if let Some(ref skill) = skill {
                    filters.set("skill", skill.as_str());
                }
                if let Some(course) = course {
                    filters.set("courseId", course.to_string());
                }
            });

            let state = controller.settled().await;
            render(&state, global)
        }

        SessionsCommand::Get { id } => {
            let study = client.get_study_session(id).await.map_err(CoreError::from)?;
            let out = output::render_single(
                &global.output,
                &study,
                |s| {
                    format!(
                        "ID:       {}\nSkill:    {}\nStarted:  {}\nMinutes:  {}\nScore:    {}",
                        s.id,
                        s.skill,
                        s.started_at.format("%Y-%m-%d %H:%M UTC"),
                        s.duration_minutes,
                        s.score
                            .map(|score| format!("{score:.1}"))
                            .unwrap_or_else(|| "-".into())
                    )
                },
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionsCommand::Log {
            skill,
            course,
            started_at,
            minutes,
            score,
        } => {
            if minutes == 0 {
                return Err(CliError::Validation {
                    field: "minutes".into(),
                    reason: "a session must last at least one minute".into(),
                });
            }

            let mutations = MutationController::new(ListController::new(
                StudySessionLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = CreateStudySession {
                course_id: course,
                skill,
                started_at: started_at.unwrap_or_else(chrono::Utc::now),
                duration_minutes: minutes,
                score,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Session logged", async move {
                    op_client.create_study_session(&body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        SessionsCommand::Delete { id } => {
            let mutations = MutationController::new(ListController::new(
                StudySessionLister(Arc::clone(&client)),
                session.config().page_size,
            ));

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform_destructive(
                    &format!("Delete study session {id}?"),
                    &util::CliConfirm { yes: global.yes },
                    "Session deleted",
                    async move { op_client.delete_study_session(id).await },
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
