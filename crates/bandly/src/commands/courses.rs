//! Course command handlers (staff surface).

use std::sync::Arc;

use tabled::Tabled;

use bandly_core::{
    CoreError, Course, CourseLister, CreateCourse, ListController, MutationController, Session,
    UpdateCourse,
};

use crate::cli::{CoursesArgs, CoursesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Skill")]
    skill: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Lessons")]
    lessons: u32,
    #[tabled(rename = "Published")]
    published: bool,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id.to_string(),
            title: c.title.clone(),
            skill: c.skill.to_string(),
            level: c.level.clone(),
            lessons: c.lesson_count,
            published: c.published,
        }
    }
}

fn detail(c: &Course) -> String {
    let mut lines = vec![
        format!("ID:          {}", c.id),
        format!("Title:       {}", c.title),
        format!("Skill:       {}", c.skill),
        format!("Level:       band {}", c.level),
        format!("Lessons:     {}", c.lesson_count),
        format!("Published:   {}", c.published),
    ];
    if let Some(ref desc) = c.description {
        lines.push(format!("Description: {desc}"));
    }
    lines.join("\n")
}

fn render(
    state: &bandly_core::ListState<Course>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    output::render_list_state(state, "courses", global, |c| CourseRow::from(c), |c| {
        c.id.to_string()
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: CoursesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::clone(session.client());

    match args.command {
        CoursesCommand::List {
            opts,
            skill,
            level,
            published,
        } => {
            let controller =
                ListController::new(CourseLister(client), util::page_size(&opts, session));
            util::apply_list_opts(&controller, &opts, |filters| {
                if let Some(ref skill) = skill {
                    filters.set("skill", skill.as_str());
                }
                if let Some(ref level) = level {
                    filters.set("level", level.as_str());
                }
                if let Some(ref published) = published {
                    filters.set("published", published.as_str());
                }
            });

            let state = controller.settled().await;
            render(&state, global)
        }

        CoursesCommand::Get { id } => {
            let course = client.get_course(id).await.map_err(CoreError::from)?;
            let out = output::render_single(&global.output, &course, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CoursesCommand::Create {
            title,
            description,
            skill,
            level,
        } => {
            let mutations = MutationController::new(ListController::new(
                CourseLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = CreateCourse {
                title,
                description,
                skill,
                level,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Course created", async move {
                    op_client.create_course(&body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        CoursesCommand::Update {
            id,
            title,
            description,
            level,
            published,
        } => {
            let mutations = MutationController::new(ListController::new(
                CourseLister(Arc::clone(&client)),
                session.config().page_size,
            ));
            let body = UpdateCourse {
                title,
                description,
                level,
                published,
            };

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform("Course updated", async move {
                    op_client.update_course(id, &body).await.map(|_| ())
                })
                .await;

            util::outcome_to_result(outcome, global)?;
            render(&mutations.list().settled().await, global)
        }

        CoursesCommand::Delete { id } => {
            let mutations = MutationController::new(ListController::new(
                CourseLister(Arc::clone(&client)),
                session.config().page_size,
            ));

            let op_client = Arc::clone(&client);
            let outcome = mutations
                .perform_destructive(
                    &format!("Delete course {id}? Enrolled students lose access."),
                    &util::CliConfirm { yes: global.yes },
                    "Course deleted",
                    async move { op_client.delete_course(id).await },
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
