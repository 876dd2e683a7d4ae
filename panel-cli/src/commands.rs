use crate::cli::{AnnouncementsCommand, CodesCommand, Command, OutputFormat, RegisterCommand};
use crate::render;
use log::{debug, warn};
use panel_console::client::redemption::CodeFilter;
use panel_console::forms::{RedeemForm, RedemptionCodeForm, RegisterForm};
use panel_console::screens::{
    AnnouncementBoard, Notice, RedeemWidget, RedemptionScreen, RegisterSettings, ScreenError,
};
use panel_console::{ClientError, ConsoleClient, ConsoleConfig, PlanDirectory};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Screen(#[from] ScreenError),
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("code {0} is not listed on the requested page")]
    NotOnPage(i64),
}

/// Shared handles for one command invocation
pub struct Context {
    client: ConsoleClient,
    plans: PlanDirectory,
    page_size: u32,
    format: OutputFormat,
}

impl Context {
    pub fn new(config: &ConsoleConfig, format: OutputFormat) -> Result<Self, CliError> {
        let client = ConsoleClient::new(&config.api)?;
        let plans = PlanDirectory::new(client.clone(), &config.catalog);
        Ok(Self {
            client,
            plans,
            page_size: config.list.page_size,
            format,
        })
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => print!("{}", text()),
        }
        Ok(())
    }

    fn emit_notice(&self, notice: &Notice) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({"success": notice.is_success(), "message": notice.message})
            ),
            OutputFormat::Text => println!("{}", render::notice(notice)),
        }
        Ok(())
    }
}

pub async fn run(command: Command, ctx: &Context) -> Result<(), CliError> {
    debug!("Running {:?}", command);
    match command {
        Command::Codes { command } => codes(command, ctx).await,
        Command::Register { command } => register(command, ctx).await,
        Command::Announcements { command } => announcements(command, ctx).await,
        Command::Redeem { code } => {
            let widget = RedeemWidget::new(ctx.client.clone());
            let notice = widget.redeem(&mut RedeemForm::new(code)).await?;
            ctx.emit_notice(&notice)
        }
        Command::Plans => {
            let catalog = ctx.plans.catalog().await?;
            ctx.emit(&catalog.plans(), || render::plans(&catalog))
        }
    }
}

async fn codes(command: CodesCommand, ctx: &Context) -> Result<(), CliError> {
    let page_size = match &command {
        CodesCommand::List { size: Some(size), .. } => *size,
        _ => ctx.page_size,
    };
    let screen = RedemptionScreen::new(ctx.client.clone(), ctx.plans.clone(), page_size);

    match command {
        CodesCommand::List {
            page,
            plan,
            unit,
            code,
            ..
        } => {
            let filters = CodeFilter {
                subscribe_plan: plan,
                unit_time: unit,
                code,
            };
            let list = screen.list();
            list.update_filters(|f| *f = filters).await?;
            if page > 1 {
                list.set_page(page).await?;
            }
            let snapshot = list.snapshot().await;
            let rows = screen.rows().await;
            ctx.emit(&snapshot.items, || {
                render::codes(&rows, snapshot.page, snapshot.page_count, snapshot.total)
            })
        }
        CodesCommand::Create {
            plan,
            unit,
            quantity,
            total,
            code,
            batch,
        } => {
            let form = RedemptionCodeForm {
                id: None,
                code,
                batch_count: batch,
                total_count: total,
                subscribe_plan: plan,
                unit_time: Some(unit),
                quantity,
            };
            let notice = screen.create(form).await?;
            ctx.emit_notice(&notice)
        }
        CodesCommand::Update {
            id,
            plan,
            unit,
            quantity,
            total,
        } => {
            let form = RedemptionCodeForm {
                id: Some(id),
                code: None,
                batch_count: None,
                total_count: total,
                subscribe_plan: plan,
                unit_time: Some(unit),
                quantity,
            };
            let notice = screen.update(form).await?;
            ctx.emit_notice(&notice)
        }
        CodesCommand::Delete { id } => {
            let notice = screen.delete(id).await?;
            ctx.emit_notice(&notice)
        }
        CodesCommand::BatchDelete { ids, page } => {
            screen.list().set_page(page).await?;
            for id in &ids {
                if !screen.list().select(*id).await {
                    return Err(CliError::NotOnPage(*id));
                }
            }
            let notice = screen.batch_delete().await?;
            ctx.emit_notice(&notice)
        }
        CodesCommand::Toggle { id, disable } => {
            let notice = screen.toggle_status(id, !disable).await?;
            ctx.emit_notice(&notice)
        }
        CodesCommand::Records { code_id, page } => {
            let dialog = screen.records();
            dialog.open(code_id).await?;
            if page > 1 {
                dialog.go_to(page).await?;
            }
            let snapshot = dialog.snapshot().await;
            dialog.close();
            ctx.emit(&snapshot.items, || render::records(&snapshot))
        }
    }
}

async fn register(command: RegisterCommand, ctx: &Context) -> Result<(), CliError> {
    let settings = RegisterSettings::new(ctx.client.clone(), ctx.plans.clone());
    let catalog = match ctx.plans.catalog().await {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!("Subscribe plans unavailable: {}", err);
            Default::default()
        }
    };

    match command {
        RegisterCommand::Show => {
            let form = settings.load().await?;
            ctx.emit(&form, || render::register(&form, &catalog))
        }
        RegisterCommand::Set {
            stop_register,
            enable_trial,
            trial_plan,
            trial_time,
            trial_unit,
            enable_ip_limit,
            ip_limit,
            ip_limit_duration,
            device_limit,
        } => {
            let current = settings.load().await?;
            let form = RegisterForm {
                stop_register: stop_register.unwrap_or(current.stop_register),
                enable_trial: enable_trial.unwrap_or(current.enable_trial),
                trial_subscribe: trial_plan.or(current.trial_subscribe),
                trial_time: trial_time.unwrap_or(current.trial_time),
                trial_time_unit: trial_unit.unwrap_or(current.trial_time_unit),
                enable_ip_register_limit: enable_ip_limit
                    .unwrap_or(current.enable_ip_register_limit),
                ip_register_limit: ip_limit.unwrap_or(current.ip_register_limit),
                ip_register_limit_duration: ip_limit_duration
                    .unwrap_or(current.ip_register_limit_duration),
                device_limit: device_limit.unwrap_or(current.device_limit),
            };
            let (notice, saved) = settings.save(form).await?;
            ctx.emit_notice(&notice)?;
            if ctx.format == OutputFormat::Text {
                print!("{}", render::register(&saved, &catalog));
            }
            Ok(())
        }
    }
}

async fn announcements(command: AnnouncementsCommand, ctx: &Context) -> Result<(), CliError> {
    match command {
        AnnouncementsCommand::List { tab, page, size } => {
            let board = AnnouncementBoard::new(ctx.client.clone(), size.unwrap_or(ctx.page_size));
            let list = board.tab(tab);
            if page > 1 {
                list.set_page(page).await?;
            } else {
                board.load(tab).await?;
            }
            let snapshot = list.snapshot().await;
            ctx.emit(&snapshot.items, || {
                render::announcements(
                    &snapshot.items,
                    snapshot.page,
                    snapshot.page_count,
                    snapshot.total,
                )
            })
        }
        AnnouncementsCommand::Latest { kind } => {
            let board = AnnouncementBoard::new(ctx.client.clone(), ctx.page_size);
            let latest = board.latest(kind.into()).await?;
            ctx.emit(&latest, || match &latest {
                Some(item) => render::announcement(item),
                None => "No announcement\n".to_string(),
            })
        }
    }
}
