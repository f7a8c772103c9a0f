//! Command handlers
//!
//! Each handler drives the client operations and prints plain text to
//! stdout.

use std::sync::Arc;

use chrono::Local;
use stock_client::catalog::low_stock;
use stock_client::history::{DATETIME_DISPLAY_FORMAT, report_text};
use stock_client::{
    CatalogFilter, CatalogItem, CatalogService, ComposedReport, DateRange, DraftReport,
    ItemForm, LinePatch, ReportGateway, ReportHistory, ReportStore, RestClient, StaleViews,
};

use crate::{Command, LineArg};

pub async fn run(command: &Command, client: &RestClient) -> anyhow::Result<()> {
    let backend = Arc::new(client.clone());
    let views = StaleViews::new();
    let catalog = CatalogService::new(backend.clone(), views.clone());

    match command {
        Command::Items { query, tag } => {
            let items = catalog.items().await?;
            let filter = CatalogFilter {
                query: query.clone(),
                tag: tag.clone(),
            };
            for item in filter.apply(&items) {
                print_item(item);
            }
        }
        Command::LowStock => {
            let items = catalog.items().await?;
            let low = low_stock(&items);
            if low.is_empty() {
                println!("No items are low on stock");
            }
            for item in low {
                print_item(item);
            }
        }
        Command::Tags => {
            for tag in catalog.tags().await? {
                println!("{}", tag.name);
            }
        }
        Command::AddItem {
            name,
            sku,
            initial_stock,
            threshold,
            tags,
        } => {
            let mut form = ItemForm::new(name.clone());
            form.sku = sku.clone();
            form.initial_stock = initial_stock.clone();
            form.low_stock_threshold = threshold.clone();
            for tag in tags {
                form.add_tag(tag);
            }
            let id = catalog.create_item(&form).await?;
            println!("Created item {id}");
        }
        Command::Submit {
            lines,
            note,
            revenue,
        } => {
            let draft = draft_from_args(lines, note, revenue)?;
            let store = ReportStore::new();
            store.replace_lines(draft.lines);
            store.set_note(draft.note);
            store.set_total_revenue(draft.total_revenue);

            let refs = match catalog.item_refs().await {
                Ok(refs) => refs,
                Err(e) => {
                    tracing::warn!(error = %e, "Item names unavailable, showing ids");
                    Vec::new()
                }
            };
            let composed = ComposedReport::compose(&store.snapshot(), &refs);
            print_composed(&composed);

            let gateway = ReportGateway::new(backend, store, views);
            gateway.submit().await?;
            println!("Report submitted");
        }
        Command::Edit {
            report_id,
            lines,
            note,
            revenue,
        } => {
            let draft = draft_from_args(lines, note, revenue)?;
            let gateway = ReportGateway::new(backend, ReportStore::new(), views);
            gateway.edit_submit(report_id, &draft).await?;
            println!("Report {report_id} updated");
        }
        Command::Delete { report_id } => {
            let gateway = ReportGateway::new(backend, ReportStore::new(), views);
            gateway.delete_submit(report_id).await?;
            println!("Report {report_id} deleted");
        }
        Command::History {
            from,
            to,
            report,
            aggregate,
        } => {
            let range = history_range(from.as_deref(), to.as_deref())?;
            let history = match ReportHistory::load(backend.as_ref(), range).await {
                Ok(history) => history,
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    ReportHistory::empty(range)
                }
            };
            print_history(&history, report.as_deref(), *aggregate)?;
        }
        Command::Whoami => {
            let user = client.current_user().await?;
            let profile = client.profile(&user.id).await?;
            let email = profile.email.or(user.email).unwrap_or_default();
            println!("{email} ({})", profile.role);
        }
        Command::Signup => anyhow::bail!("signup does not take a session"),
    }

    Ok(())
}

pub async fn sign_up(client: &RestClient, email: &str, password: &str) -> anyhow::Result<()> {
    let response = client.sign_up(email, password).await?;
    match response.session() {
        Some(_) => println!("Account created for {email}"),
        None => println!("Account created for {email}; confirm the email address to sign in"),
    }
    Ok(())
}

/// Build a draft the same way the report form does: add each item, then
/// fill in its counts.
fn draft_from_args(lines: &[LineArg], note: &str, revenue: &str) -> anyhow::Result<DraftReport> {
    let mut draft = DraftReport::default();
    for line in lines {
        if !draft.add_item(&line.item_id) {
            anyhow::bail!("Item {} is listed more than once", line.item_id);
        }
        let index = draft.lines.len() - 1;
        draft.patch_line(
            index,
            LinePatch {
                start_count: Some(line.start.clone()),
                end_count: Some(line.end.clone()),
                ..LinePatch::default()
            },
        );
    }
    draft.note = note.to_string();
    draft.total_revenue = revenue.to_string();
    Ok(draft)
}

fn history_range(from: Option<&str>, to: Option<&str>) -> anyhow::Result<DateRange> {
    let month = DateRange::current_month(Local::now().date_naive());
    let from = from.map(str::to_string).unwrap_or_else(|| month.from.to_string());
    let to = to.map(str::to_string).unwrap_or_else(|| month.to.to_string());
    Ok(DateRange::parse(&from, &to)?)
}

fn print_item(item: &CatalogItem) {
    let low = if item.is_low { "  LOW" } else { "" };
    let tags = if item.tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", item.tags.join(", "))
    };
    println!(
        "{}  sku={}  stock={}/{}{}{}",
        item.name,
        item.sku.as_deref().unwrap_or("-"),
        item.current_stock,
        item.low_stock_threshold,
        low,
        tags
    );
}

fn print_composed(report: &ComposedReport) {
    for line in &report.lines {
        println!(
            "{}: {} -> {} (sold {})",
            line.name, line.start_count, line.end_count, line.sold
        );
    }
    println!("Total stock sold: {}", report.total_sold);
}

fn print_history(history: &ReportHistory, report: Option<&str>, aggregate: bool) -> anyhow::Result<()> {
    if let Some(id) = report {
        let record = history
            .report(id)
            .ok_or_else(|| anyhow::anyhow!("Report {id} is not in the selected range"))?;
        println!("{}", report_text(record, &Local));
        return Ok(());
    }
    if aggregate {
        println!("{}", history.aggregate_text());
        return Ok(());
    }

    if history.is_empty() {
        println!("No reports between {} and {}", history.range.from, history.range.to);
        return Ok(());
    }
    for record in &history.reports {
        println!(
            "{}  {}  sold {}  [{}]",
            record.created_at.with_timezone(&Local).format(DATETIME_DISPLAY_FORMAT),
            record.title(),
            record.total_sold(),
            record.report_id
        );
    }
    println!("Total stock sold: {}", history.total_sold);
    Ok(())
}
