use clap::{Parser, Subcommand, ValueEnum};
use panel_console::client::redemption::UnitTime;
use panel_console::client::system::TrialTimeUnit;
use panel_console::screens::{AnnouncementKind, AnnouncementTab};
use panel_console::ConsoleConfig;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "panel")]
#[command(version, about = "Admin and user console for the subscription panel backend")]
#[command(long_about = r#"Admin and user console for the subscription panel backend.

Connection settings come from PANEL_* environment variables
(PANEL_API__URL, PANEL_API__TOKEN, PANEL_API__PREFIX, PANEL_LIST__PAGE_SIZE, ...)
and can be overridden with the global flags below.

EXAMPLES:
    panel codes list --unit month
    panel codes create --plan 1 --unit month --quantity 1 --total 10
    panel codes batch-delete 4 7 9
    panel codes records 4 --page 2
    panel register set --enable-trial true --trial-plan 3 --trial-time 2
    panel announcements latest popup
    panel redeem GIFT-2024

EXIT CODES:
    0 - Success
    1 - Configuration error or failed request
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, global = true, value_name = "TOKEN", env = "PANEL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path prefix in front of every endpoint
    #[arg(long, global = true, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply_overrides(&self, config: &mut ConsoleConfig) {
        if let Some(url) = &self.url {
            config.api.url = url.clone();
        }
        if let Some(token) = &self.token {
            config.api.token = token.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.api.prefix = prefix.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage redemption codes
    Codes {
        #[command(subcommand)]
        command: CodesCommand,
    },

    /// Show or change registration settings
    Register {
        #[command(subcommand)]
        command: RegisterCommand,
    },

    /// Browse announcements
    Announcements {
        #[command(subcommand)]
        command: AnnouncementsCommand,
    },

    /// Redeem a code for the current user
    Redeem {
        /// Redemption code
        code: String,
    },

    /// List subscribe plans
    Plans,
}

#[derive(Subcommand, Debug)]
pub enum CodesCommand {
    /// List redemption codes
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size (default: PANEL_LIST__PAGE_SIZE)
        #[arg(long)]
        size: Option<u32>,

        /// Only codes for this subscribe plan id
        #[arg(long)]
        plan: Option<i64>,

        /// Only codes with this unit (day, month, quarter, half_year, year)
        #[arg(long, value_parser = UnitTime::from_str)]
        unit: Option<UnitTime>,

        /// Only codes matching this text
        #[arg(long)]
        code: Option<String>,
    },

    /// Create one or more redemption codes
    Create {
        #[arg(long)]
        plan: i64,

        #[arg(long, value_parser = UnitTime::from_str)]
        unit: UnitTime,

        /// Number of units granted per redemption
        #[arg(long, default_value_t = 1)]
        quantity: i64,

        /// How many times each code can be redeemed
        #[arg(long)]
        total: i64,

        /// Custom code; generated when omitted
        #[arg(long)]
        code: Option<String>,

        /// Number of codes to generate
        #[arg(long)]
        batch: Option<i64>,
    },

    /// Update a redemption code
    Update {
        id: i64,

        #[arg(long)]
        plan: i64,

        #[arg(long, value_parser = UnitTime::from_str)]
        unit: UnitTime,

        #[arg(long)]
        quantity: i64,

        #[arg(long)]
        total: i64,
    },

    /// Delete a redemption code
    Delete { id: i64 },

    /// Delete several codes shown on one page
    BatchDelete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,

        /// Page the codes are listed on
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Enable a code, or disable it with --disable
    Toggle {
        id: i64,

        #[arg(long)]
        disable: bool,
    },

    /// Show the redemption history of a code
    Records {
        code_id: i64,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegisterCommand {
    /// Show registration settings
    Show,

    /// Change registration settings; unspecified fields keep their value
    Set {
        #[arg(long)]
        stop_register: Option<bool>,

        #[arg(long)]
        enable_trial: Option<bool>,

        /// Subscribe plan granted as trial
        #[arg(long)]
        trial_plan: Option<i64>,

        #[arg(long)]
        trial_time: Option<i64>,

        /// none, year, month, day, hour or minute
        #[arg(long)]
        trial_unit: Option<TrialTimeUnit>,

        #[arg(long)]
        enable_ip_limit: Option<bool>,

        /// Registrations allowed per IP
        #[arg(long)]
        ip_limit: Option<i64>,

        /// Window of the IP limit, in minutes
        #[arg(long)]
        ip_limit_duration: Option<i64>,

        #[arg(long)]
        device_limit: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AnnouncementsCommand {
    /// List announcements of a tab
    List {
        /// all, pinned or popup
        #[arg(long, default_value = "all")]
        tab: AnnouncementTab,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        size: Option<u32>,
    },

    /// Show the newest pinned or popup announcement
    Latest {
        #[arg(value_enum)]
        kind: LatestKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LatestKind {
    Pinned,
    Popup,
}

impl From<LatestKind> for AnnouncementKind {
    fn from(kind: LatestKind) -> Self {
        match kind {
            LatestKind::Pinned => AnnouncementKind::Pinned,
            LatestKind::Popup => AnnouncementKind::Popup,
        }
    }
}
