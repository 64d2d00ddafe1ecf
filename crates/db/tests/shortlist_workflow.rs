//! Integration tests for the transactional shortlist workflow.
//!
//! Exercises `ShortlistWorkflow` against a real database:
//! - Send, edit, customer finalize and revise walkthrough
//! - Empty publish leaves no trace
//! - Draft edits blocked while pinned to a submitted version
//! - Version numbers never reused, including after rejected publishes
//! - Finalize on a superseded version does not move the shortlist
//! - Send back, procurement and delete rules
//! - Concurrent saves and publishes serialize on the shortlist lock

use assert_matches::assert_matches;
use frond_core::error::CoreError;
use frond_core::shortlist::ItemSource;
use frond_core::status::ShortlistStatus;
use frond_core::types::DbId;
use frond_db::models::customer::CreateCustomer;
use frond_db::models::plant::CreatePlant;
use frond_db::models::shortlist::{CreateShortlist, UpdateShortlist};
use frond_db::models::shortlist_item::{DraftItemInput, SaveDraft};
use frond_db::models::shortlist_version::{FinalizeItemEdit, FinalizeShortlist};
use frond_db::repositories::{CustomerRepo, PlantRepo, ShortlistVersionRepo};
use frond_db::workflow::{ShortlistWorkflow, WorkflowError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_item(plant_id: DbId, quantity: i32, position: i32) -> DraftItemInput {
    DraftItemInput {
        id: None,
        plant_id,
        quantity,
        note: None,
        why_picked: Some("Thrives in low light".to_string()),
        position,
    }
}

fn add_items(items: Vec<DraftItemInput>) -> SaveDraft {
    SaveDraft {
        items,
        ..Default::default()
    }
}

/// Create a customer, three catalog plants and an empty shortlist.
/// Returns (shortlist_id, plant_ids).
async fn setup(pool: &PgPool) -> (DbId, Vec<DbId>) {
    let customer = CustomerRepo::create(
        pool,
        &CreateCustomer {
            name: "Ada Fern".to_string(),
            email: Some("ada@example.com".to_string()),
        },
    )
    .await
    .unwrap();

    let mut plant_ids = Vec::new();
    for (name, scientific) in [
        ("Snake Plant", "Dracaena trifasciata"),
        ("Monstera", "Monstera deliciosa"),
        ("ZZ Plant", "Zamioculcas zamiifolia"),
    ] {
        let plant = PlantRepo::create(
            pool,
            &CreatePlant {
                name: name.to_string(),
                scientific_name: Some(scientific.to_string()),
                price_band: Some("$20-40".to_string()),
            },
        )
        .await
        .unwrap();
        plant_ids.push(plant.id);
    }

    let shortlist = ShortlistWorkflow::create(
        pool,
        customer.id,
        &CreateShortlist {
            title: "Living room refresh".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    (shortlist.id, plant_ids)
}

/// Scenario A: three draft items, then publish. Returns the share token.
async fn send_three_items(pool: &PgPool, shortlist_id: DbId, plants: &[DbId]) -> String {
    let items = plants
        .iter()
        .enumerate()
        .map(|(i, &plant_id)| new_item(plant_id, 2, i as i32))
        .collect();
    ShortlistWorkflow::save_draft(pool, shortlist_id, &add_items(items))
        .await
        .unwrap();

    ShortlistWorkflow::publish(pool, shortlist_id)
        .await
        .unwrap()
        .share_token
}

/// Finalize every item of the version behind `token`, doubling quantities.
async fn finalize_all(pool: &PgPool, token: &str) -> Result<(), WorkflowError> {
    let view = ShortlistWorkflow::view_public(pool, token).await?;
    let edits = view
        .items
        .iter()
        .map(|item| FinalizeItemEdit {
            item_id: item.id,
            quantity: item.quantity * 2,
            note: Some("Yes please".to_string()),
        })
        .collect();
    ShortlistWorkflow::finalize(pool, token, &FinalizeShortlist { items: edits }).await?;
    Ok(())
}

async fn bump_first_quantity(pool: &PgPool, shortlist_id: DbId, quantity: i32) {
    let view = ShortlistWorkflow::read(pool, shortlist_id).await.unwrap();
    let first = &view.items[0];
    let edit = DraftItemInput {
        id: Some(first.id),
        plant_id: first.plant_id,
        quantity,
        note: first.note.clone(),
        why_picked: first.why_picked.clone(),
        position: first.position,
    };
    ShortlistWorkflow::save_draft(pool, shortlist_id, &add_items(vec![edit]))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: Scenario A, publish creates version 1
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_creates_first_version(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;

    let items = plants
        .iter()
        .enumerate()
        .map(|(i, &plant_id)| new_item(plant_id, 2, i as i32))
        .collect();
    let saved = ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(items))
        .await
        .unwrap();
    assert_eq!(saved.current_version_number, 1);
    assert_eq!(saved.items.len(), 3);

    let published = ShortlistWorkflow::publish(&pool, shortlist_id).await.unwrap();
    assert_eq!(published.version_number, 1);
    assert_eq!(published.status, ShortlistStatus::SentToCustomer);
    assert_eq!(published.item_count, 3);
    assert_eq!(published.share_token.len(), 32);

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.status, ShortlistStatus::SentToCustomer);
    assert!(!view.has_unsent_changes);
    assert_eq!(view.current_version_number, 1);
    assert_eq!(view.latest_sent_version_number, 1);
    assert_eq!(view.latest_submitted_version_number, 0);
    assert_eq!(view.items.len(), 3);
    assert_eq!(view.items[0].plant_name.as_deref(), Some("Snake Plant"));
    assert_eq!(view.share_token.as_deref(), Some(published.share_token.as_str()));
}

// ---------------------------------------------------------------------------
// Test: Scenario B, editing after send shows unsent changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_after_send_marks_unsent_changes(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    send_three_items(&pool, shortlist_id, &plants).await;

    bump_first_quantity(&pool, shortlist_id, 7).await;

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.current_version_number, 2);
    assert!(view.has_unsent_changes);
    assert_eq!(view.item_source, ItemSource::Draft);
    assert!(!view.read_only);
    assert_eq!(view.items[0].quantity, 7);
    assert_eq!(view.status, ShortlistStatus::SentToCustomer);
}

// ---------------------------------------------------------------------------
// Test: Scenario C, customer finalize seals the version once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_seals_version_once(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;
    bump_first_quantity(&pool, shortlist_id, 7).await;

    finalize_all(&pool, &token).await.unwrap();

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.status, ShortlistStatus::CustomerSubmitted);
    assert_eq!(view.stored_status, ShortlistStatus::CustomerSubmitted);
    assert_eq!(view.latest_submitted_version_number, 1);

    let public = ShortlistWorkflow::view_public(&pool, &token).await.unwrap();
    assert_eq!(public.status, ShortlistStatus::CustomerSubmitted);
    assert!(!public.can_finalize);
    assert!(public.submitted_at.is_some());
    assert!(public.items.iter().all(|i| i.quantity == 4));

    let again = finalize_all(&pool, &token).await;
    assert_matches!(again, Err(WorkflowError::Core(CoreError::Forbidden(_))));
}

// ---------------------------------------------------------------------------
// Test: Scenario D, revise clones the submitted version
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn revise_clones_submitted_version(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;
    bump_first_quantity(&pool, shortlist_id, 7).await;
    finalize_all(&pool, &token).await.unwrap();

    let outcome = ShortlistWorkflow::revise(&pool, shortlist_id).await.unwrap();
    assert_eq!(outcome.new_version_number, 3);
    assert_eq!(outcome.source_version_number, 1);
    assert_eq!(outcome.status, ShortlistStatus::Draft);
    assert_eq!(outcome.item_count, 3);

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.status, ShortlistStatus::Draft);
    assert_eq!(view.current_version_number, 3);
    assert_eq!(view.item_source, ItemSource::Draft);

    let sealed = ShortlistWorkflow::get_version(&pool, shortlist_id, 1).await.unwrap();
    let draft: Vec<_> = view
        .items
        .iter()
        .map(|i| (i.plant_id, i.quantity, i.note.clone(), i.why_picked.clone(), i.position))
        .collect();
    let cloned_from: Vec<_> = sealed
        .items
        .iter()
        .map(|i| (i.plant_id, i.quantity, i.note.clone(), i.why_picked.clone(), i.position))
        .collect();
    assert_eq!(draft, cloned_from);

    // Staff edits before the revise are discarded in favour of the
    // customer's submission.
    assert!(view.items.iter().all(|i| i.quantity == 4));
}

// ---------------------------------------------------------------------------
// Test: Scenario E, empty publish has no effect
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_without_items_is_rejected(pool: PgPool) {
    let (shortlist_id, _plants) = setup(&pool).await;

    let result = ShortlistWorkflow::publish(&pool, shortlist_id).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Validation(_))));

    let versions = ShortlistWorkflow::list_versions(&pool, shortlist_id).await.unwrap();
    assert!(versions.is_empty());

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.current_version_number, 0);
    assert_eq!(view.status, ShortlistStatus::Draft);
}

// ---------------------------------------------------------------------------
// Test: draft edits are forbidden while the lineage is pinned to a
// submitted version
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_draft_forbidden_after_submission(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;
    finalize_all(&pool, &token).await.unwrap();

    let result =
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![new_item(plants[0], 1, 9)]))
            .await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Forbidden(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_draft_forbidden_when_stored_status_lags_history(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;
    finalize_all(&pool, &token).await.unwrap();

    // A stale stored status must not reopen a lineage that has not moved
    // past the submitted version.
    sqlx::query("UPDATE shortlists SET status_id = 1 WHERE id = $1")
        .bind(shortlist_id)
        .execute(&pool)
        .await
        .unwrap();

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.status, ShortlistStatus::CustomerSubmitted);
    assert_eq!(view.item_source, ItemSource::Version(1));
    assert!(view.read_only);

    let result =
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![new_item(plants[0], 1, 9)]))
            .await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Forbidden(_))));
}

// ---------------------------------------------------------------------------
// Test: save_draft batch rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_draft_rejects_stale_expected_version(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![new_item(plants[0], 1, 0)]))
        .await
        .unwrap();

    let stale = SaveDraft {
        expected_version_number: Some(0),
        items: vec![new_item(plants[1], 1, 1)],
        removed_item_ids: Vec::new(),
    };
    let result = ShortlistWorkflow::save_draft(&pool, shortlist_id, &stale).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Conflict(_))));

    let fresh = SaveDraft {
        expected_version_number: Some(1),
        ..stale
    };
    let saved = ShortlistWorkflow::save_draft(&pool, shortlist_id, &fresh).await.unwrap();
    assert_eq!(saved.current_version_number, 2);
    assert_eq!(saved.items.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_draft_rejects_unknown_items_and_plants(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;

    let mut unknown_item = new_item(plants[0], 1, 0);
    unknown_item.id = Some(999_999);
    let result =
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![unknown_item])).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Validation(_))));

    let result =
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![new_item(999_999, 1, 0)]))
            .await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Validation(_))));

    let result = ShortlistWorkflow::save_draft(&pool, shortlist_id, &SaveDraft::default()).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Validation(_))));

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.current_version_number, 0);
    assert!(view.items.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_draft_removes_items(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let saved = ShortlistWorkflow::save_draft(
        &pool,
        shortlist_id,
        &add_items(vec![new_item(plants[0], 1, 0), new_item(plants[1], 1, 1)]),
    )
    .await
    .unwrap();

    let removal = SaveDraft {
        removed_item_ids: vec![saved.items[0].id],
        ..Default::default()
    };
    let saved = ShortlistWorkflow::save_draft(&pool, shortlist_id, &removal).await.unwrap();
    assert_eq!(saved.current_version_number, 2);
    assert_eq!(saved.items.len(), 1);
    assert_eq!(saved.items[0].plant_id, plants[1]);
}

// ---------------------------------------------------------------------------
// Test: version numbers increase without reuse
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn version_numbers_never_reused(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    send_three_items(&pool, shortlist_id, &plants).await;

    // Nothing new to send.
    let result = ShortlistWorkflow::publish(&pool, shortlist_id).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::PreconditionFailed(_))));

    bump_first_quantity(&pool, shortlist_id, 5).await;
    let update = ShortlistWorkflow::publish(&pool, shortlist_id).await.unwrap();
    assert_eq!(update.version_number, 2);

    let numbers: Vec<_> = ShortlistWorkflow::list_versions(&pool, shortlist_id)
        .await
        .unwrap()
        .iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, vec![2, 1]);

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.latest_sent_version_number, 2);
    assert!(!view.has_unsent_changes);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revise_rejected_with_unsent_changes(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    send_three_items(&pool, shortlist_id, &plants).await;
    bump_first_quantity(&pool, shortlist_id, 5).await;

    let result = ShortlistWorkflow::revise(&pool, shortlist_id).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::PreconditionFailed(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revise_sent_shortlist_without_changes(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    send_three_items(&pool, shortlist_id, &plants).await;

    let outcome = ShortlistWorkflow::revise(&pool, shortlist_id).await.unwrap();
    assert_eq!(outcome.source_version_number, 1);
    assert_eq!(outcome.new_version_number, 2);

    let result = ShortlistWorkflow::revise(&pool, shortlist_id).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::PreconditionFailed(_))));
}

// ---------------------------------------------------------------------------
// Test: finalize edge cases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_superseded_version_keeps_shortlist_status(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let first_token = send_three_items(&pool, shortlist_id, &plants).await;
    bump_first_quantity(&pool, shortlist_id, 5).await;
    ShortlistWorkflow::publish(&pool, shortlist_id).await.unwrap();

    let view = ShortlistWorkflow::view_public(&pool, &first_token).await.unwrap();
    let edits = vec![FinalizeItemEdit {
        item_id: view.items[0].id,
        quantity: 1,
        note: None,
    }];
    let outcome = ShortlistWorkflow::finalize(&pool, &first_token, &FinalizeShortlist { items: edits })
        .await
        .unwrap();
    assert!(!outcome.shortlist_advanced);

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.stored_status, ShortlistStatus::SentToCustomer);
    assert_eq!(view.status, ShortlistStatus::SentToCustomer);
    assert_eq!(view.latest_submitted_version_number, 1);
    assert_eq!(view.latest_sent_version_number, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_rejects_bad_input_without_sealing(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;

    let empty = ShortlistWorkflow::finalize(&pool, &token, &FinalizeShortlist { items: vec![] }).await;
    assert_matches!(empty, Err(WorkflowError::Core(CoreError::Validation(_))));

    let unknown = FinalizeShortlist {
        items: vec![FinalizeItemEdit {
            item_id: 999_999,
            quantity: 1,
            note: None,
        }],
    };
    let result = ShortlistWorkflow::finalize(&pool, &token, &unknown).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::Validation(_))));

    let view = ShortlistWorkflow::view_public(&pool, &token).await.unwrap();
    assert!(view.can_finalize);
    assert_eq!(view.status, ShortlistStatus::SentToCustomer);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_accepts_declined_items(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;

    let view = ShortlistWorkflow::view_public(&pool, &token).await.unwrap();
    let edits = vec![FinalizeItemEdit {
        item_id: view.items[1].id,
        quantity: 0,
        note: Some("Not for us".to_string()),
    }];
    ShortlistWorkflow::finalize(&pool, &token, &FinalizeShortlist { items: edits })
        .await
        .unwrap();

    // A declined line survives a revise as a zero-quantity draft item.
    let outcome = ShortlistWorkflow::revise(&pool, shortlist_id).await.unwrap();
    assert_eq!(outcome.item_count, 3);
    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.items[1].quantity, 0);
    assert_eq!(view.items[1].note.as_deref(), Some("Not for us"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_without_note_keeps_staff_note(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let mut item = new_item(plants[0], 1, 0);
    item.note = Some("Repot in spring".to_string());
    ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![item]))
        .await
        .unwrap();
    let token = ShortlistWorkflow::publish(&pool, shortlist_id)
        .await
        .unwrap()
        .share_token;

    let view = ShortlistWorkflow::view_public(&pool, &token).await.unwrap();
    let edits = vec![FinalizeItemEdit {
        item_id: view.items[0].id,
        quantity: 3,
        note: None,
    }];
    ShortlistWorkflow::finalize(&pool, &token, &FinalizeShortlist { items: edits })
        .await
        .unwrap();

    let view = ShortlistWorkflow::view_public(&pool, &token).await.unwrap();
    assert_eq!(view.items[0].quantity, 3);
    assert_eq!(view.items[0].note.as_deref(), Some("Repot in spring"));

    // The note is carried into the revised draft as well.
    ShortlistWorkflow::revise(&pool, shortlist_id).await.unwrap();
    let draft = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(draft.items[0].note.as_deref(), Some("Repot in spring"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customer_edit_ignores_items_of_other_versions(pool: PgPool) {
    let (first_id, plants) = setup(&pool).await;
    let first_token = send_three_items(&pool, first_id, &plants).await;
    let (second_id, plants) = setup(&pool).await;
    let second_token = send_three_items(&pool, second_id, &plants).await;

    let foreign_item = ShortlistWorkflow::view_public(&pool, &second_token)
        .await
        .unwrap()
        .items[0]
        .id;

    let mut conn = pool.acquire().await.unwrap();
    let first_version = ShortlistVersionRepo::find_by_token(&mut conn, &first_token)
        .await
        .unwrap()
        .unwrap();
    let applied = ShortlistVersionRepo::apply_customer_edit(
        &mut conn,
        first_version.id,
        foreign_item,
        9,
        None,
    )
    .await
    .unwrap();
    assert!(!applied);
    drop(conn);

    let view = ShortlistWorkflow::view_public(&pool, &second_token).await.unwrap();
    assert_eq!(view.items[0].quantity, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_details_keeps_or_clears_description(pool: PgPool) {
    let (shortlist_id, _) = setup(&pool).await;

    let set = UpdateShortlist {
        description: Some(Some("North-facing, low light".to_string())),
        ..Default::default()
    };
    let shortlist = ShortlistWorkflow::update_details(&pool, shortlist_id, &set)
        .await
        .unwrap();
    assert_eq!(shortlist.description.as_deref(), Some("North-facing, low light"));

    let rename = UpdateShortlist {
        title: Some("Living room, phase two".to_string()),
        ..Default::default()
    };
    let shortlist = ShortlistWorkflow::update_details(&pool, shortlist_id, &rename)
        .await
        .unwrap();
    assert_eq!(shortlist.title, "Living room, phase two");
    assert_eq!(shortlist.description.as_deref(), Some("North-facing, low light"));

    let clear = UpdateShortlist {
        description: Some(None),
        ..Default::default()
    };
    let shortlist = ShortlistWorkflow::update_details(&pool, shortlist_id, &clear)
        .await
        .unwrap();
    assert_eq!(shortlist.description, None);
    assert_eq!(shortlist.current_version_number, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_or_unknown_token_is_not_found(pool: PgPool) {
    let malformed = ShortlistWorkflow::view_public(&pool, "not-a-token").await;
    assert_matches!(malformed, Err(WorkflowError::Core(CoreError::NotFoundByKey { .. })));

    let unknown = ShortlistWorkflow::view_public(&pool, &"a".repeat(32)).await;
    assert_matches!(unknown, Err(WorkflowError::Core(CoreError::NotFoundByKey { .. })));
}

// ---------------------------------------------------------------------------
// Test: send back, procurement, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_back_then_publish_resends(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;
    finalize_all(&pool, &token).await.unwrap();

    let outcome = ShortlistWorkflow::send_back(&pool, shortlist_id).await.unwrap();
    assert_eq!(outcome.status, ShortlistStatus::SentBackToCustomer);
    assert_eq!(outcome.new_version_number, 2);

    let published = ShortlistWorkflow::publish(&pool, shortlist_id).await.unwrap();
    assert_eq!(published.version_number, 2);
    assert_ne!(published.share_token, token);

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.status, ShortlistStatus::SentToCustomer);
    assert_eq!(view.share_token.as_deref(), Some(published.share_token.as_str()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_back_requires_submission(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    send_three_items(&pool, shortlist_id, &plants).await;

    let result = ShortlistWorkflow::send_back(&pool, shortlist_id).await;
    assert_matches!(result, Err(WorkflowError::Core(CoreError::PreconditionFailed(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn procured_shortlist_is_terminal(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    let token = send_three_items(&pool, shortlist_id, &plants).await;
    finalize_all(&pool, &token).await.unwrap();

    let procured = ShortlistWorkflow::mark_procured(&pool, shortlist_id).await.unwrap();
    assert_eq!(procured.status_id, ShortlistStatus::ToBeProcured.id());

    let view = ShortlistWorkflow::read(&pool, shortlist_id).await.unwrap();
    assert_eq!(view.status, ShortlistStatus::ToBeProcured);

    assert_matches!(
        ShortlistWorkflow::publish(&pool, shortlist_id).await,
        Err(WorkflowError::Core(CoreError::PreconditionFailed(_)))
    );
    assert_matches!(
        ShortlistWorkflow::revise(&pool, shortlist_id).await,
        Err(WorkflowError::Core(CoreError::PreconditionFailed(_)))
    );
    assert_matches!(
        ShortlistWorkflow::mark_procured(&pool, shortlist_id).await,
        Err(WorkflowError::Core(CoreError::PreconditionFailed(_)))
    );
    assert_matches!(
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &add_items(vec![new_item(plants[0], 1, 5)]))
            .await,
        Err(WorkflowError::Core(CoreError::Forbidden(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_only_before_first_send(pool: PgPool) {
    let (draft_id, plants) = setup(&pool).await;
    ShortlistWorkflow::save_draft(&pool, draft_id, &add_items(vec![new_item(plants[0], 1, 0)]))
        .await
        .unwrap();
    ShortlistWorkflow::delete(&pool, draft_id).await.unwrap();
    assert_matches!(
        ShortlistWorkflow::read(&pool, draft_id).await,
        Err(WorkflowError::Core(CoreError::NotFound { .. }))
    );

    let (sent_id, plants) = setup(&pool).await;
    send_three_items(&pool, sent_id, &plants).await;
    assert_matches!(
        ShortlistWorkflow::delete(&pool, sent_id).await,
        Err(WorkflowError::Core(CoreError::Forbidden(_)))
    );
}

// ---------------------------------------------------------------------------
// Test: concurrent writers serialize on the shortlist lock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_saves_each_advance_counter(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;

    let first = add_items(vec![new_item(plants[0], 1, 0)]);
    let second = add_items(vec![new_item(plants[1], 1, 1)]);
    let (a, b) = tokio::join!(
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &first),
        ShortlistWorkflow::save_draft(&pool, shortlist_id, &second),
    );
    let mut counters = vec![a.unwrap().current_version_number, b.unwrap().current_version_number];
    counters.sort_unstable();
    assert_eq!(counters, vec![1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_publishes_create_one_version(pool: PgPool) {
    let (shortlist_id, plants) = setup(&pool).await;
    send_three_items(&pool, shortlist_id, &plants).await;
    bump_first_quantity(&pool, shortlist_id, 5).await;

    let (a, b) = tokio::join!(
        ShortlistWorkflow::publish(&pool, shortlist_id),
        ShortlistWorkflow::publish(&pool, shortlist_id),
    );
    let succeeded = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(succeeded, 1);

    let versions = ShortlistVersionRepo::list_by_shortlist(&pool, shortlist_id)
        .await
        .unwrap();
    assert_eq!(versions.len(), 2);
}
