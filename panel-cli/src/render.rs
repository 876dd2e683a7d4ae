use panel_console::catalog::PlanCatalog;
use panel_console::client::announcement::Announcement;
use panel_console::client::redemption::{RecordFilter, RedemptionRecord};
use panel_console::forms::RegisterForm;
use panel_console::screens::{format_timestamp, CodeRow, Notice, NoticeLevel, EMPTY_CELL};
use panel_console::ListSnapshot;
use std::fmt::Write;

/// Left-aligned text table; the column width follows the widest cell
fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = line(headers, &widths);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells, &widths));
        out.push('\n');
    }
    out
}

fn line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn footer(page: u32, page_count: u32, total: u64) -> String {
    format!("Page {}/{} ({} total)", page, page_count.max(1), total)
}

pub fn codes(rows: &[CodeRow], page: u32, page_count: u32, total: u64) -> String {
    if rows.is_empty() {
        return "No redemption codes found\n".to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.code.clone(),
                row.plan.clone(),
                row.unit_time.clone(),
                row.quantity.to_string(),
                format!("{}/{}/{}", row.total, row.remaining, row.used),
                row.status.to_string(),
            ]
        })
        .collect();
    let mut out = table(
        &["ID", "CODE", "PLAN", "UNIT", "QTY", "TOTAL/LEFT/USED", "STATUS"],
        &cells,
    );
    out.push_str(&footer(page, page_count, total));
    out.push('\n');
    out
}

pub fn records(snapshot: &ListSnapshot<RedemptionRecord, RecordFilter>) -> String {
    if snapshot.items.is_empty() {
        return "No records found\n".to_string();
    }
    let cells: Vec<Vec<String>> = snapshot
        .items
        .iter()
        .map(|record| {
            vec![
                record.id.to_string(),
                record.user_id.to_string(),
                record.subscribe_id.to_string(),
                record.unit_time.label().to_string(),
                record.quantity.to_string(),
                format_timestamp(record.redeemed_at),
            ]
        })
        .collect();
    let mut out = table(
        &["ID", "USER", "SUBSCRIBE", "UNIT", "QTY", "REDEEMED AT"],
        &cells,
    );
    out.push_str(&footer(snapshot.page, snapshot.page_count, snapshot.total));
    out.push('\n');
    out
}

pub fn announcements(items: &[Announcement], page: u32, page_count: u32, total: u64) -> String {
    if items.is_empty() {
        return "No announcements\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&announcement(item));
        out.push('\n');
    }
    out.push_str(&footer(page, page_count, total));
    out.push('\n');
    out
}

pub fn announcement(item: &Announcement) -> String {
    let mut tags = Vec::new();
    if item.pinned {
        tags.push("pinned");
    }
    if item.popup {
        tags.push("popup");
    }

    let mut out = format!("# {}", item.title);
    if !tags.is_empty() {
        let _ = write!(out, " [{}]", tags.join(", "));
    }
    out.push('\n');
    let _ = writeln!(out, "{}", format_timestamp(item.created_at));
    let content = item.content.trim();
    if content.is_empty() {
        out.push_str(EMPTY_CELL);
    } else {
        out.push_str(content);
    }
    out.push('\n');
    out
}

pub fn register(form: &RegisterForm, catalog: &PlanCatalog) -> String {
    let trial_plan = form
        .trial_subscribe
        .map(|id| format!("{} ({})", catalog.name(id), id))
        .unwrap_or_else(|| EMPTY_CELL.to_string());
    let rows = vec![
        vec!["stop_register".to_string(), form.stop_register.to_string()],
        vec!["enable_trial".to_string(), form.enable_trial.to_string()],
        vec!["trial_subscribe".to_string(), trial_plan],
        vec![
            "trial_time".to_string(),
            format!("{} {}", form.trial_time, form.trial_time_unit),
        ],
        vec![
            "enable_ip_register_limit".to_string(),
            form.enable_ip_register_limit.to_string(),
        ],
        vec![
            "ip_register_limit".to_string(),
            format!(
                "{} per {} minute(s)",
                form.ip_register_limit, form.ip_register_limit_duration
            ),
        ],
        vec!["device_limit".to_string(), form.device_limit.to_string()],
    ];
    table(&["SETTING", "VALUE"], &rows)
}

pub fn plans(catalog: &PlanCatalog) -> String {
    if catalog.is_empty() {
        return "No subscribe plans\n".to_string();
    }
    let rows: Vec<Vec<String>> = catalog
        .options()
        .into_iter()
        .map(|(id, name)| vec![id.to_string(), name])
        .collect();
    table(&["ID", "NAME"], &rows)
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("✓ {}", notice.message),
        NoticeLevel::Info => notice.message.clone(),
        NoticeLevel::Error => format!("✗ {}", notice.message),
    }
}
