//! Demo fixtures: two sections of review questions.

use ordview_core::{Attributes, ItemId};

use crate::error::Result;
use crate::section::{ItemRecord, ItemStatus, SectionRecord};
use crate::store::OrderStore;

pub const DUE_DILIGENCE: &str = "Due Diligence";
pub const PERIODIC_REVIEW: &str = "Periodic Review";
pub const XY: &str = "XY";
pub const PQR: &str = "PQR";

const ONBOARDING_XY: [&str; 5] = [
    "Describe the current onboarding workflow.",
    "Which systems are used for onboarding?",
    "What is the average onboarding time?",
    "Who approves onboarding steps?",
    "List any onboarding bottlenecks.",
];

const ONBOARDING_PQR: [&str; 6] = [
    "What documentation is required for PQR onboarding?",
    "How is PQR identity verification performed?",
    "What is the approval hierarchy for PQR onboarding?",
    "What compliance checks are mandatory for PQR?",
    "How long does PQR onboarding typically take?",
    "What follow-up actions are required after PQR onboarding?",
];

const RISK_REVIEW: [&str; 4] = [
    "How often are risk reviews conducted?",
    "Who signs off on risk findings?",
    "What is the escalation path for risks?",
    "Which tools are used for risk tracking?",
];

fn questions(
    section: &str,
    prefix: &str,
    texts: &[&str],
    review: &str,
    participant: &str,
) -> Vec<(ItemId, ItemRecord)> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let status = if index % 2 == 0 {
                ItemStatus::Approved
            } else {
                ItemStatus::Review
            };
            (
                ItemId::new(format!("{section}-{prefix}-q{}", index + 1)),
                ItemRecord::new(Attributes::new(review, participant))
                    .with_text(*text)
                    .with_status(status),
            )
        })
        .collect()
}

fn section(id: &str, title: &str, items: &[(ItemId, ItemRecord)]) -> SectionRecord {
    items
        .iter()
        .cloned()
        .fold(SectionRecord::new(id, title), |record, (id, item)| {
            record.with_item(id, item)
        })
}

/// The two demo sections with their initial orders.
///
/// `sec-1` interleaves its XY and PQR questions (2 XY, 2 PQR, 1 XY, 1 PQR,
/// 2 PQR, 2 XY, remaining PQR) so a participant filter hides items between
/// visible ones. `sec-2` is in sequential order.
pub fn demo_sections() -> Result<Vec<SectionRecord>> {
    let xy = questions("sec-1", "xy", &ONBOARDING_XY, DUE_DILIGENCE, XY);
    let pqr = questions("sec-1", "pqr", &ONBOARDING_PQR, DUE_DILIGENCE, PQR);
    let ids = |items: &[(ItemId, ItemRecord)]| -> Vec<ItemId> {
        items.iter().map(|(id, _)| id.clone()).collect()
    };
    let (xy_ids, pqr_ids) = (ids(&xy), ids(&pqr));
    let onboarding_order = [
        &xy_ids[0..2],
        &pqr_ids[0..2],
        &xy_ids[2..3],
        &pqr_ids[2..3],
        &pqr_ids[3..5],
        &xy_ids[3..5],
        &pqr_ids[5..],
    ]
    .concat();

    let all: Vec<(ItemId, ItemRecord)> = xy.into_iter().chain(pqr).collect();
    let onboarding = section("sec-1", "Customer Onboarding", &all).with_order(onboarding_order)?;

    let risk = questions("sec-2", "pqr", &RISK_REVIEW, PERIODIC_REVIEW, PQR);
    let risk_order = ids(&risk);
    let risk = section("sec-2", "Risk Review", &risk).with_order(risk_order)?;

    Ok(vec![onboarding, risk])
}

/// Replace everything in `store` with [`demo_sections`].
pub fn reset_with_demo_data<S: OrderStore + ?Sized>(store: &S) -> Result<()> {
    let sections = demo_sections()?;
    tracing::info!(target: "ordview.store", sections = sections.len(), "store reset with demo data");
    store.replace_all(sections)
}
