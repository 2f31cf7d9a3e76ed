//! Subcommand implementations. Each one opens the store, does one thing,
//! and writes human-readable (or JSON) output.

use std::io::Write;
use std::path::Path;

use ordview::store::ItemStatus;
use ordview::{
    Dimension, ItemId, JsonFileStore, OrderStore, ReconcileChange, ReorderSession, ScreenConfig,
    SectionId, StoreSnapshot, project, reset_with_demo_data,
};
use serde_json::json;

use crate::cli::{DragArgs, ExportArgs, ShowArgs, StoreArgs};
use crate::error::{HarnessError, Result};

fn open(args: &StoreArgs) -> Result<JsonFileStore> {
    Ok(JsonFileStore::open(&args.store)?)
}

fn load_config(path: &Path) -> Result<ScreenConfig> {
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ScreenConfig::from_json_file(path)?,
        _ => ScreenConfig::from_toml_file(path)?,
    };
    Ok(config)
}

pub fn seed(args: &StoreArgs, out: &mut dyn Write) -> Result<()> {
    let store = open(args)?;
    reset_with_demo_data(&store)?;
    let count = store.sections()?.len();
    writeln!(out, "seeded {count} sections into {}", args.store.display())?;
    Ok(())
}

pub fn sections(args: &StoreArgs, out: &mut dyn Write) -> Result<()> {
    let store = open(args)?;
    for summary in store.sections()? {
        writeln!(
            out,
            "{}\t{}\t{} items\trevision {}",
            summary.id, summary.title, summary.item_count, summary.revision
        )?;
    }
    Ok(())
}

fn status_label(status: Option<ItemStatus>) -> &'static str {
    match status {
        Some(ItemStatus::Approved) => "approved",
        Some(ItemStatus::Review) => "review",
        Some(ItemStatus::Cancelled) => "cancelled",
        None => "-",
    }
}

pub fn show(args: &ShowArgs, out: &mut dyn Write) -> Result<()> {
    let store = open(&args.store)?;
    let section = SectionId::new(args.section.as_str());
    let record = store.section(&section)?;
    let full = record.full_order();
    let predicate = args.filter.predicate();
    let view = project(full.as_slice(), &record, &predicate);

    if args.json {
        let rows: Vec<_> = view
            .iter()
            .filter_map(|id| {
                let item = record.items.get(id)?;
                Some(json!({
                    "rank": full.rank_of(id),
                    "id": id,
                    "attributes": item.attributes,
                    "text": item.text,
                    "status": item.status,
                }))
            })
            .collect();
        let document = json!({
            "section": section,
            "filter": predicate.to_string(),
            "revision": record.revision,
            "items": rows,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} ({}) filter {} showing {}/{}",
        record.title,
        section,
        predicate,
        view.len(),
        full.len()
    )?;
    for id in &view {
        let Some(item) = record.items.get(id) else {
            continue;
        };
        let rank = full.rank_of(id).unwrap_or_default();
        let attributes = Dimension::ALL
            .iter()
            .filter_map(|dimension| item.attributes.value(*dimension))
            .collect::<Vec<_>>()
            .join(" / ");
        writeln!(
            out,
            "{rank:>3}  {:<16} {attributes:<28} {:<9} {}",
            id.as_str(),
            status_label(item.status),
            item.text.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

pub fn drag(args: &DragArgs, out: &mut dyn Write) -> Result<()> {
    let store = open(&args.store)?;
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ScreenConfig::default(),
    };
    if let Some(policy) = args.policy {
        config = config.with_policy(policy);
    }

    let section = SectionId::new(args.section.as_str());
    let dragged = ItemId::new(args.item.as_str());
    let target = ItemId::new(args.target.as_str());
    let catalog = store.catalog(&section)?;
    let mut session = ReorderSession::new(&store, catalog, config);
    session.set_predicate(args.filter.predicate());

    session.drag_start(dragged.clone(), section.clone())?;
    let mut step = session.drop_on(target.clone(), section.clone())?;
    if session.machine().awaiting_confirmation() {
        if !args.yes {
            session.cancel()?;
            return Err(HarnessError::ConfirmationRequired { dragged, target });
        }
        step = session.confirm()?;
    }

    let Some(report) = step.commit else {
        tracing::info!(target: "ordview.session", effect = ?step.transition.effect, "drop not committed");
        writeln!(out, "drop ignored: {}", serde_json::to_string(&step.transition.effect)?)?;
        return Ok(());
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }
    match &report.change {
        ReconcileChange::Applied {
            kind,
            from_rank,
            to_rank,
            ..
        } => writeln!(
            out,
            "{kind:?}: {} rank {from_rank} -> {to_rank} (revision {})",
            report.dragged, report.revision
        )?,
        ReconcileChange::Unchanged { reason } => writeln!(out, "unchanged: {reason}")?,
    }
    for (index, id) in report.after.iter().enumerate() {
        writeln!(out, "{:>3}  {id}", index + 1)?;
    }
    Ok(())
}

pub fn export(args: &ExportArgs, out: &mut dyn Write) -> Result<()> {
    let store = open(&args.store)?;
    let document = StoreSnapshot::capture(&store)?.to_json_pretty()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, document)?;
            writeln!(out, "wrote {}", path.display())?;
        }
        None => writeln!(out, "{document}")?,
    }
    Ok(())
}
