//! Clap derive structures for the `bandly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use bandly_core::{ExerciseStatus, Role, Skill, UserStatus};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bandly -- CLI for the Bandly IELTS learning platform
#[derive(Debug, Parser)]
#[command(
    name = "bandly",
    version,
    about = "Manage the Bandly learning platform from the command line",
    long_about = "Administer users, courses, exercises, goals, reminders and study\n\
        sessions on a Bandly backend, and watch live notifications.\n\n\
        Commands are role-gated: what your token's account may do on the web\n\
        app is exactly what it may do here.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "BANDLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "BANDLY_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Bearer token (overrides profile/keyring)
    #[arg(long, env = "BANDLY_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BANDLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default 30, profiles may override)
    #[arg(long, env = "BANDLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Credential placement on the notification stream
    #[arg(long, value_enum, global = true)]
    pub stream_auth: Option<StreamAuthArg>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StreamAuthArg {
    /// Authorization header (default)
    Header,
    /// `access_token` query parameter (proxy-compatibility fallback;
    /// the token ends up in URLs that logs may capture)
    Query,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage platform users (admin)
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage the course catalog (staff)
    #[command(alias = "c")]
    Courses(CoursesArgs),

    /// Manage the exercise bank (staff)
    #[command(alias = "ex")]
    Exercises(ExercisesArgs),

    /// Manage study goals
    #[command(alias = "g")]
    Goals(GoalsArgs),

    /// Manage study reminders
    #[command(alias = "rem")]
    Reminders(RemindersArgs),

    /// View and log study sessions
    #[command(alias = "sess")]
    Sessions(SessionsArgs),

    /// Show the actor behind the configured token
    Whoami,

    /// Stream live notifications
    #[command(alias = "w")]
    Watch,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination and search arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListOpts {
    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long, env = "BANDLY_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    List {
        #[command(flatten)]
        opts: ListOpts,

        /// Filter by role ("all" clears)
        #[arg(long)]
        role: Option<String>,

        /// Filter by account status ("all" clears)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one user
    Get { id: Uuid },

    /// Create a user
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "student")]
        role: Role,
    },

    /// Update a user
    Update {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        role: Option<Role>,

        /// Set account status (active / suspended)
        #[arg(long)]
        status: Option<UserStatus>,
    },

    /// Delete a user (asks for confirmation)
    Delete { id: Uuid },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COURSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub command: CoursesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoursesCommand {
    /// List courses
    List {
        #[command(flatten)]
        opts: ListOpts,

        /// Filter by skill ("all" clears)
        #[arg(long)]
        skill: Option<String>,

        /// Filter by band level, e.g. "6.5"
        #[arg(long)]
        level: Option<String>,

        /// Filter by publication state (true / false / all)
        #[arg(long)]
        published: Option<String>,
    },

    /// Show one course
    Get { id: Uuid },

    /// Create a course
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        skill: Skill,

        /// Target band level, e.g. "6.5"
        #[arg(long)]
        level: String,
    },

    /// Update a course
    Update {
        id: Uuid,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        level: Option<String>,

        /// Publish or unpublish
        #[arg(long)]
        published: Option<bool>,
    },

    /// Delete a course (asks for confirmation)
    Delete { id: Uuid },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXERCISES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExercisesArgs {
    #[command(subcommand)]
    pub command: ExercisesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExercisesCommand {
    /// List exercises
    List {
        #[command(flatten)]
        opts: ListOpts,

        /// Filter by skill ("all" clears)
        #[arg(long)]
        skill: Option<String>,

        /// Filter by status (draft / published / archived / all)
        #[arg(long)]
        status: Option<String>,

        /// Filter by parent course
        #[arg(long)]
        course: Option<Uuid>,
    },

    /// Show one exercise
    Get { id: Uuid },

    /// Create an exercise
    Create {
        /// Parent course id
        #[arg(long)]
        course: Uuid,

        #[arg(long)]
        title: String,

        #[arg(long)]
        skill: Skill,

        #[arg(long)]
        level: String,
    },

    /// Update an exercise
    Update {
        id: Uuid,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        level: Option<String>,

        #[arg(long)]
        status: Option<ExerciseStatus>,
    },

    /// Delete an exercise (asks for confirmation)
    Delete { id: Uuid },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GOALS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GoalsArgs {
    #[command(subcommand)]
    pub command: GoalsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GoalsCommand {
    /// List goals
    List {
        #[command(flatten)]
        opts: ListOpts,

        /// Filter by skill ("all" clears)
        #[arg(long)]
        skill: Option<String>,

        /// Filter by achievement (true / false / all)
        #[arg(long)]
        achieved: Option<String>,
    },

    /// Show one goal
    Get { id: Uuid },

    /// Create a goal
    Create {
        /// Skill the goal targets; omit for an overall-band goal
        #[arg(long)]
        skill: Option<Skill>,

        /// Target band score, e.g. 7.5
        #[arg(long)]
        target_band: f32,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<chrono::NaiveDate>,
    },

    /// Update a goal
    Update {
        id: Uuid,

        #[arg(long)]
        target_band: Option<f32>,

        #[arg(long)]
        deadline: Option<chrono::NaiveDate>,

        /// Mark achieved / unachieved
        #[arg(long)]
        achieved: Option<bool>,
    },

    /// Delete a goal (asks for confirmation)
    Delete { id: Uuid },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REMINDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RemindersArgs {
    #[command(subcommand)]
    pub command: RemindersCommand,
}

#[derive(Debug, Subcommand)]
pub enum RemindersCommand {
    /// List reminders
    List {
        #[command(flatten)]
        opts: ListOpts,

        /// Filter by enabled state (true / false / all)
        #[arg(long)]
        enabled: Option<String>,
    },

    /// Show one reminder
    Get { id: Uuid },

    /// Create a reminder
    Create {
        #[arg(long)]
        message: String,

        /// First fire time (RFC 3339, e.g. 2026-09-01T18:00:00Z)
        #[arg(long)]
        remind_at: chrono::DateTime<chrono::Utc>,

        /// Recurrence: none / daily / weekly
        #[arg(long)]
        repeat: Option<bandly_core::RepeatRule>,
    },

    /// Update a reminder
    Update {
        id: Uuid,

        #[arg(long)]
        message: Option<String>,

        #[arg(long)]
        remind_at: Option<chrono::DateTime<chrono::Utc>>,

        /// Enable or disable
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Delete a reminder (asks for confirmation)
    Delete { id: Uuid },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STUDY SESSIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub command: SessionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List study sessions
    List {
        #[command(flatten)]
        opts: ListOpts,

        /// Filter by skill ("all" clears)
        #[arg(long)]
        skill: Option<String>,

        /// Filter by course
        #[arg(long)]
        course: Option<Uuid>,
    },

    /// Show one study session
    Get { id: Uuid },

    /// Log a study session
    Log {
        #[arg(long)]
        skill: Skill,

        /// Course practiced, if any
        #[arg(long)]
        course: Option<Uuid>,

        /// Start time (RFC 3339); defaults to now
        #[arg(long)]
        started_at: Option<chrono::DateTime<chrono::Utc>>,

        /// Duration in minutes
        #[arg(long)]
        minutes: u32,

        /// Band score for scored practice
        #[arg(long)]
        score: Option<f32>,
    },

    /// Delete a study session (asks for confirmation)
    Delete { id: Uuid },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile
    Init {
        /// Backend base URL
        #[arg(long)]
        backend: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        profile: String,

        /// Environment variable the token will be read from
        #[arg(long)]
        token_env: Option<String>,
    },

    /// Print the effective configuration (tokens redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
