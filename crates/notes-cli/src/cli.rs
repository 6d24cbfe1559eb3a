use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Create, browse, and edit notes stored in a realtime database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use the local SQLite store instead of the realtime database
    #[arg(long, global = true)]
    pub local: bool,

    /// Path to the local database file (implies --local)
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note subject
        #[arg(long)]
        subject: String,
        /// Note type (e.g. lecture, exam, memo)
        #[arg(long = "type", value_name = "TYPE")]
        note_type: String,
        /// Note content
        #[arg(long)]
        content: String,
    },
    /// List all notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one note
    Show {
        /// Note id (push key)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overwrite fields of an existing note
    Edit {
        /// Note id (push key)
        id: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long = "type", value_name = "TYPE")]
        note_type: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id (push key)
        id: String,
    },
    /// Follow the collection and print every snapshot
    Watch,
    /// Manage the anonymous identity used to scope notes
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Replay recorded sensor samples through the gesture and theme filters
    Sensors {
        #[command(subcommand)]
        command: SensorCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in anonymously (or reuse the stored identity)
    Login,
    /// Show the stored identity
    Status,
    /// Forget the stored identity
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write or update the configuration file
    Init {
        /// Realtime database URL
        #[arg(long, value_name = "URL")]
        database_url: Option<String>,
        /// Web API key used for anonymous sign-in
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
        /// Collection name under the database root
        #[arg(long, value_name = "NAME")]
        collection: Option<String>,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand)]
pub enum SensorCommands {
    /// Replay `t_ms,x,y,z` accelerometer samples (m/s²)
    Shake {
        /// CSV file, `-` for stdin
        input: PathBuf,
        /// Delete this note on the first recognized shake, as the edit screen does
        #[arg(long, value_name = "ID")]
        note: Option<String>,
    },
    /// Replay `t_ms,lux` light samples
    Light {
        /// CSV file, `-` for stdin
        input: PathBuf,
        /// Start in dark mode
        #[arg(long)]
        dark: bool,
    },
}
