//! End-to-end use of the facade prelude against the demo fixtures.

use ordview::prelude::*;

fn ids(raw: &[&str]) -> Vec<ItemId> {
    raw.iter().copied().map(ItemId::from).collect()
}

#[test]
fn filtered_drop_on_demo_section() -> ordview::Result<()> {
    let store = MemoryOrderStore::with_sections(demo_sections()?);
    let section = SectionId::new("sec-1");
    let catalog = store.catalog(&section)?;
    let before = store.full_order(&section)?.into_vec();

    let mut session = ReorderSession::new(&store, catalog, ScreenConfig::default());
    session.set_predicate(FilterPredicate::ANY.with_participant("XY"));
    let view = session.view(&section)?;
    assert_eq!(view.len(), 5);

    let dragged = view[4].clone();
    let target = view[0].clone();
    session.drag_start(dragged.clone(), section.clone())?;
    session.drop_on(target.clone(), section.clone())?;
    assert_eq!(store.full_order(&section)?.into_vec(), before);

    let step = session.confirm()?;
    let report = step.commit.expect("confirmed drop commits");
    assert!(report.saved);

    let after = store.full_order(&section)?.into_vec();
    let changed: Vec<usize> = (0..before.len())
        .filter(|&i| before[i] != after[i])
        .collect();
    assert_eq!(changed.len(), 2, "swap touches two slots");
    assert_eq!(after[changed[0]], dragged);
    assert_eq!(after[changed[1]], target);
    Ok(())
}

#[test]
fn policies_differ_on_view_edits_but_not_on_direct_drops() {
    let full = ids(&["1", "2", "3", "4", "5"]);
    let new_view = ids(&["5", "1", "2", "3", "4"]);
    let swap = ordview::reconcile(ReconcilePolicy::Swap, &full, &full, &new_view);
    let shift = ordview::reconcile(ReconcilePolicy::ShiftInsert, &full, &full, &new_view);
    assert_eq!(swap.order, ids(&["5", "2", "3", "4", "1"]));
    assert_eq!(shift.order, new_view);

    let dragged = ItemId::new("5");
    let target = ItemId::new("1");
    let direct = ordview::apply_drop(ordview::DropMode::Direct, &full, &full, &dragged, &target);
    assert_eq!(direct.order, new_view);
}
