use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cms_console_core::models::{CommentStatus, ModerationDecision, ViewsPeriod};
use cms_console_core::ListParams;

#[derive(Parser)]
#[command(name = "cms-console")]
#[command(about = "Admin console for a headless CMS backend")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides CMS_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Store credentials in the OS keychain instead of the data directory
    #[arg(long, global = true)]
    pub keyring: bool,

    /// Also write logs to a daily file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        /// Username or email (defaults to the last one used)
        #[arg(long)]
        identifier: Option<String>,
    },

    /// Create an account and log in with it
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },

    /// Ask the backend to send a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Forget the persisted session
    Logout,

    /// Show the user behind the persisted session
    Whoami,

    /// Show whether a valid session exists
    Status,

    /// Totals for videos, comments and site analytics
    Dashboard,

    Videos {
        #[command(subcommand)]
        action: VideoCommands,
    },

    Categories {
        #[command(subcommand)]
        action: CrudCommands,
    },

    Tags {
        #[command(subcommand)]
        action: CrudCommands,
    },

    Playlists {
        #[command(subcommand)]
        action: CrudCommands,
    },

    Comments {
        #[command(subcommand)]
        action: CommentCommands,
    },

    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionCommands,
    },

    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommands,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Relations to populate, e.g. `*`
    #[arg(long)]
    pub populate: Option<String>,

    /// Sort expression, e.g. `createdAt:desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Equality filter as field=value (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long, default_value_t = 25)]
    pub page_size: u32,
}

impl ListArgs {
    pub fn to_params(&self) -> ListParams {
        let mut params = ListParams::new();
        if let Some(ref populate) = self.populate {
            params = params.populate(populate.as_str());
        }
        if let Some(ref sort) = self.sort {
            params = params.sort(sort.as_str());
        }
        for (field, value) in &self.filters {
            params = params.filter(field.as_str(), value.as_str());
        }
        if let Some(page) = self.page {
            params = params.page(page, self.page_size);
        }
        params
    }
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got: {}", s))?;
    if field.trim().is_empty() {
        return Err(format!("missing field name in filter: {}", s));
    }
    Ok((field.trim().to_string(), value.to_string()))
}

#[derive(Subcommand)]
pub enum VideoCommands {
    List(ListArgs),
    Get {
        id: String,
    },
    Create {
        /// JSON object with the video fields
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
    /// Upload a thumbnail or video file to the media library
    Upload {
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum CrudCommands {
    List,
    Get {
        id: String,
    },
    Create {
        /// JSON object with the record fields
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only show comments with this status
        #[arg(long)]
        status: Option<CommentStatus>,
    },
    Get {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
    /// Approve or reject a comment
    Moderate {
        id: String,
        /// approve or reject
        decision: ModerationDecision,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    List,
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum UserCommands {
    List,
    Get {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Get,
    Update {
        #[arg(long)]
        data: String,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsCommands {
    Stats,
    Views {
        /// day, week, month or year
        #[arg(default_value = "month")]
        period: ViewsPeriod,
    },
}
