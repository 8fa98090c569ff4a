//! Command dispatch: one arm per subcommand, each a thin call into the core.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use cms_console_core::models::{AnalyticsStats, Comment, Envelope, Video};
use cms_console_core::views::{comments_with_status, DashboardSummary, ModerationCounts};
use cms_console_core::{Config, ListParams, SessionManager, SessionState};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::cli::{
    AnalyticsCommands, Commands, CommentCommands, CrudCommands, SettingsCommands,
    SubscriptionCommands, UserCommands, VideoCommands,
};

/// Environment variable holding the password for non-interactive logins
const PASSWORD_ENV: &str = "CMS_PASSWORD";

/// Page size used when the dashboard pulls whole collections
const DASHBOARD_PAGE_SIZE: u32 = 100;

/// Commands that act on a restored session rather than creating or dropping one
pub fn needs_restored_session(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Login { .. }
            | Commands::Register { .. }
            | Commands::ForgotPassword { .. }
            | Commands::Logout
    )
}

fn parse_data(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("--data must be valid JSON")
}

fn prompt_identifier() -> Result<String> {
    print!("Username or email: ");
    io::stdout().flush()?;

    let mut identifier = String::new();
    io::stdin().read_line(&mut identifier)?;
    Ok(identifier.trim().to_string())
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

pub async fn execute(
    command: Commands,
    session: &SessionManager,
    config: &mut Config,
) -> Result<Value> {
    let api = session.api();

    let value = match command {
        // ===== Session =====
        Commands::Login { identifier } => {
            let identifier = match identifier.or_else(|| config.last_identifier.clone()) {
                Some(identifier) => identifier,
                None => prompt_identifier()?,
            };
            if identifier.is_empty() {
                bail!("Username or email required");
            }
            let password = read_password()?;

            let user = session.login(&identifier, &password).await?;

            config.last_identifier = Some(identifier);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            serde_json::to_value(user)?
        }
        Commands::Register { username, email } => {
            let password = read_password()?;
            let user = session.register(&username, &email, &password).await?;
            config.last_identifier = Some(username);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            serde_json::to_value(user)?
        }
        Commands::ForgotPassword { email } => {
            session.forgot_password(&email).await?;
            json!({ "sent": true, "email": email })
        }
        Commands::Logout => {
            session.logout();
            info!("Logged out");
            json!({ "state": "unauthenticated" })
        }
        Commands::Whoami => match session.user() {
            Some(user) => serde_json::to_value(user)?,
            None => bail!("Not logged in. Run `cms-console login` first."),
        },
        Commands::Status => {
            let user = session.user();
            let state = match session.state() {
                SessionState::Authenticated => "authenticated",
                SessionState::Restoring => "restoring",
                SessionState::Unauthenticated => "unauthenticated",
            };
            json!({
                "state": state,
                "api_url": api.base_url(),
                "username": user.as_ref().map(|u| u.username.as_str()),
                "role": user.as_ref().map(|u| u.role_name()),
            })
        }
        Commands::Dashboard => dashboard(session).await?,

        // ===== Resources =====
        Commands::Videos { action } => match action {
            VideoCommands::List(args) => api.videos().list(&args.to_params()).await?,
            VideoCommands::Get { id } => api.videos().get(&id).await?,
            VideoCommands::Create { data } => api.videos().create(&parse_data(&data)?).await?,
            VideoCommands::Update { id, data } => {
                api.videos().update(&id, &parse_data(&data)?).await?
            }
            VideoCommands::Delete { id } => api.videos().delete(&id).await?,
            VideoCommands::Upload { file } => upload(session, &file).await?,
        },
        Commands::Categories { action } => {
            let categories = api.categories();
            match action {
                CrudCommands::List => categories.list().await?,
                CrudCommands::Get { id } => categories.get(&id).await?,
                CrudCommands::Create { data } => categories.create(&parse_data(&data)?).await?,
                CrudCommands::Update { id, data } => {
                    categories.update(&id, &parse_data(&data)?).await?
                }
                CrudCommands::Delete { id } => categories.delete(&id).await?,
            }
        }
        Commands::Tags { action } => {
            let tags = api.tags();
            match action {
                CrudCommands::List => tags.list().await?,
                CrudCommands::Get { id } => tags.get(&id).await?,
                CrudCommands::Create { data } => tags.create(&parse_data(&data)?).await?,
                CrudCommands::Update { id, data } => tags.update(&id, &parse_data(&data)?).await?,
                CrudCommands::Delete { id } => tags.delete(&id).await?,
            }
        }
        Commands::Playlists { action } => {
            let playlists = api.playlists();
            match action {
                CrudCommands::List => playlists.list().await?,
                CrudCommands::Get { id } => playlists.get(&id).await?,
                CrudCommands::Create { data } => playlists.create(&parse_data(&data)?).await?,
                CrudCommands::Update { id, data } => {
                    playlists.update(&id, &parse_data(&data)?).await?
                }
                CrudCommands::Delete { id } => playlists.delete(&id).await?,
            }
        }
        Commands::Comments { action } => match action {
            CommentCommands::List { list, status } => {
                let body = api.comments().list(&list.to_params()).await?;
                match status {
                    Some(status) => {
                        let envelope = Envelope::<Vec<Comment>>::from_value(body)
                            .context("Failed to parse comments response")?;
                        let matching = comments_with_status(&envelope.data, status);
                        json!({ "data": matching, "meta": envelope.meta })
                    }
                    None => body,
                }
            }
            CommentCommands::Get { id } => api.comments().get(&id).await?,
            CommentCommands::Update { id, data } => {
                api.comments().update(&id, &parse_data(&data)?).await?
            }
            CommentCommands::Delete { id } => api.comments().delete(&id).await?,
            CommentCommands::Moderate { id, decision } => {
                api.comments().moderate(&id, decision).await?
            }
        },
        Commands::Subscriptions { action } => match action {
            SubscriptionCommands::List => api.subscriptions().list().await?,
            SubscriptionCommands::Delete { id } => api.subscriptions().delete(&id).await?,
        },
        Commands::Users { action } => match action {
            UserCommands::List => api.users().list().await?,
            UserCommands::Get { id } => api.users().get(&id).await?,
            UserCommands::Update { id, data } => api.users().update(&id, &parse_data(&data)?).await?,
            UserCommands::Delete { id } => api.users().delete(&id).await?,
        },
        Commands::Settings { action } => match action {
            SettingsCommands::Get => api.settings().get().await?,
            SettingsCommands::Update { data } => api.settings().update(&parse_data(&data)?).await?,
        },
        Commands::Analytics { action } => match action {
            AnalyticsCommands::Stats => api.analytics().stats().await?,
            AnalyticsCommands::Views { period } => api.analytics().views(period).await?,
        },
    };

    Ok(value)
}

async fn upload(session: &SessionManager, file: &Path) -> Result<Value> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", file.display()))?
        .to_string();
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    info!(file = %file_name, size = bytes.len(), "Uploading file");
    Ok(session.api().videos().upload_file(&file_name, bytes).await?)
}

async fn dashboard(session: &SessionManager) -> Result<Value> {
    let api = session.api();
    let page = ListParams::new().page(1, DASHBOARD_PAGE_SIZE);

    let videos = Envelope::<Vec<Video>>::from_value(api.videos().list(&page).await?)
        .context("Failed to parse videos response")?;
    let comments = Envelope::<Vec<Comment>>::from_value(api.comments().list(&page).await?)
        .context("Failed to parse comments response")?;

    // Analytics is a custom endpoint that not every backend has
    let stats = match api.analytics().stats().await {
        Ok(value) => serde_json::from_value::<AnalyticsStats>(value).ok(),
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Analytics unavailable");
            None
        }
    };

    Ok(json!({
        "videos": DashboardSummary::from_videos(&videos.data),
        "comments": ModerationCounts::from_comments(&comments.data),
        "analytics": stats,
    }))
}
