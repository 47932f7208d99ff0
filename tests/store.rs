use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use varmints::data::{EvolutionId, HomeObject, PetId, PetPatch};
use varmints::error::{GameError, PersistenceError};
use varmints::gateway::{GatewayCall, GatewayReply, GatewayResponse, RequestSeq};
use varmints::store::{AppState, Page, ResponseOutcome, SyncStatus};

mod common;
use common::{auth, hatched, logged_in, stored_waste, user, T0, USER_ID};

fn hatch_patch() -> PetPatch {
    PetPatch {
        evolution: Some(EvolutionId::new(1, 0)),
        ..Default::default()
    }
}

#[test]
fn test_login_lands_on_home() {
    let state = logged_in(user(vec![hatched(1, 0, None)], vec![]));

    assert_that(&state.navigation().page).is_equal_to(Page::Home);
    assert_that(&state.user().map(|user| user.id)).is_equal_to(Some(USER_ID));
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);
}

#[test]
fn test_updates_without_a_user_fail() {
    let mut state = AppState::new();
    let result = state.update_pet(PetId(1), &PetPatch::rename("x"));

    assert!(matches!(result, Err(GameError::Persistence(PersistenceError::NoUserData))));
}

#[test]
fn test_update_is_copy_on_write() {
    let mut pet = hatched(1, 0, None);
    pet.evolution = EvolutionId::new(0, 0);
    let mut state = logged_in(user(vec![pet], vec![]));
    let before = state.snapshot().unwrap();

    let request = state.update_pet(PetId(1), &hatch_patch()).unwrap();

    // Earlier snapshots are never mutated
    assert_that(&before.pets[0].evolution.stage).is_equal_to(0);
    assert_that(&state.user().unwrap().pets[0].evolution.stage).is_equal_to(1);
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Pending);

    match &request.call {
        GatewayCall::PutUserData { user_id, document } => {
            assert_that(user_id).is_equal_to(USER_ID);
            assert_that(&document.pets[0].evolution.stage).is_equal_to(1);
        }
        other => panic!("expected a document write, got {other:?}"),
    }
}

#[test]
fn test_update_missing_pet_is_rejected() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let result = state.update_pet(PetId(9), &hatch_patch());

    assert!(matches!(result, Err(GameError::MissingPet(PetId(9)))));
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);
}

#[test]
fn test_sequence_numbers_increase() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let first = state.update_pet(PetId(1), &PetPatch::rename("a")).unwrap();
    let second = state.update_pet(PetId(1), &PetPatch::rename("b")).unwrap();

    assert_that(&second.seq).is_greater_than(first.seq);
    assert_that(&second.session).is_equal_to(first.session);
}

#[test]
fn test_latest_response_is_applied() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let request = state.add_home_object(HomeObject::waste(1.0, 2.0)).unwrap();

    let mut server = state.user().unwrap().clone();
    server.id = 0;
    server.username.clear();
    server.home_objects[0].id = Some(55);

    let outcome = state.handle_response(GatewayResponse::to(&request, GatewayReply::UserData(server)));

    assert_that(&outcome).is_equal_to(ResponseOutcome::Applied);
    let local = state.user().unwrap();
    assert_that(&local.home_objects[0].id).is_equal_to(Some(55));
    // Account fields survive a response that omits them
    assert_that(&local.id).is_equal_to(USER_ID);
    assert_eq!(local.username, "tester");
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);
}

#[test]
fn test_superseded_response_is_ignored() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let first = state.update_pet(PetId(1), &PetPatch::rename("first")).unwrap();
    let _second = state.update_pet(PetId(1), &PetPatch::rename("second")).unwrap();

    let stale = match &first.call {
        GatewayCall::PutUserData { document, .. } => document.as_ref().clone(),
        other => panic!("unexpected call {other:?}"),
    };
    let outcome = state.handle_response(GatewayResponse::to(&first, GatewayReply::UserData(stale)));

    assert_that(&outcome).is_equal_to(ResponseOutcome::Stale);
    assert_eq!(state.user().unwrap().pets[0].name, "second");
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Pending);
}

#[test]
fn test_response_from_ended_session_is_dropped() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let request = state.update_pet(PetId(1), &PetPatch::rename("old")).unwrap();

    state.logout();
    state.login(auth(user(vec![hatched(2, 0, None)], vec![])));

    let outcome = state.handle_response(GatewayResponse::to(&request, GatewayReply::Failed("late".into())));
    assert_that(&outcome).is_equal_to(ResponseOutcome::WrongSession);
    assert_that(&state.user().unwrap().pet(PetId(2)).is_some()).is_true();
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);
}

#[test]
fn test_logout_clears_everything() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    state.navigate_to(Page::PetSummary, Some(PetId(1)));
    state.logout();

    assert_that(&state.user()).is_none();
    assert_that(&state.navigation().page).is_equal_to(Page::MainMenu);
    assert_that(&state.navigation().active_pet).is_none();
}

#[test]
fn test_failure_keeps_local_state_and_retries() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let request = state.update_pet(PetId(1), &PetPatch::rename("Optimist")).unwrap();

    let outcome = state.handle_response(GatewayResponse::to(&request, GatewayReply::Failed("HTTP 500".into())));
    assert_that(&outcome).is_equal_to(ResponseOutcome::Failed);
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Unconfirmed);
    assert_eq!(state.user().unwrap().pets[0].name, "Optimist");

    let retry = state.retry_unconfirmed();
    assert_that(&retry).has_length(1);
    assert_that(&retry[0].seq).is_greater_than(request.seq);
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Pending);

    let document = state.user().unwrap().clone();
    state.handle_response(GatewayResponse::to(&retry[0], GatewayReply::UserData(document)));
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);
}

#[test]
fn test_late_failure_of_superseded_write_is_ignored() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let first = state.update_pet(PetId(1), &PetPatch::rename("first")).unwrap();
    let second = state.update_pet(PetId(1), &PetPatch::rename("second")).unwrap();

    let document = state.user().unwrap().clone();
    let outcome = state.handle_response(GatewayResponse::to(&second, GatewayReply::UserData(document)));
    assert_that(&outcome).is_equal_to(ResponseOutcome::Applied);
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);

    let outcome = state.handle_response(GatewayResponse::to(&first, GatewayReply::Failed("timeout".into())));

    assert_that(&outcome).is_equal_to(ResponseOutcome::Stale);
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Confirmed);
    assert_that(&state.retry_unconfirmed()).is_empty();
    assert_eq!(state.user().unwrap().pets[0].name, "second");
}

#[test]
fn test_superseded_write_failing_while_newer_is_in_flight() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    let first = state.update_pet(PetId(1), &PetPatch::rename("first")).unwrap();
    let _second = state.update_pet(PetId(1), &PetPatch::rename("second")).unwrap();

    let outcome = state.handle_response(GatewayResponse::to(&first, GatewayReply::Failed("timeout".into())));

    assert_that(&outcome).is_equal_to(ResponseOutcome::Stale);
    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Pending);
}

#[test]
fn test_retry_without_failure_is_a_no_op() {
    let mut state = logged_in(user(vec![hatched(1, 0, None)], vec![]));
    assert_that(&state.retry_unconfirmed()).is_empty();
}

#[test]
fn test_delete_stored_object() {
    let mut state = logged_in(user(vec![], vec![stored_waste(4, 1.0, 1.0), stored_waste(5, 2.0, 2.0)]));

    let request = state.delete_home_object(&stored_waste(4, 1.0, 1.0)).unwrap().unwrap();

    assert_that(&request.call).is_equal_to(GatewayCall::DeleteHomeObject { id: 4 });
    assert_that(&state.user().unwrap().home_object(4)).is_none();
    assert_that(&state.user().unwrap().home_object(5).is_some()).is_true();
}

#[test]
fn test_delete_unstored_object_is_local_only() {
    let mut state = logged_in(user(vec![], vec![HomeObject::waste(3.0, -1.0)]));

    let request = state.delete_home_object(&HomeObject::waste(3.0, -1.0)).unwrap();

    assert_that(&request).is_none();
    assert_that(&state.user().unwrap().home_objects).is_empty();
}

#[test]
fn test_delete_unknown_object_fails() {
    let mut state = logged_in(user(vec![], vec![stored_waste(4, 1.0, 1.0)]));
    let result = state.delete_home_object(&stored_waste(8, 1.0, 1.0));

    assert!(matches!(result, Err(GameError::InvalidState(_))));
    assert_that(&state.user().unwrap().home_objects).has_length(1);
}

#[test]
fn test_pending_delete_is_filtered_from_late_documents() {
    let mut state = logged_in(user(vec![], vec![stored_waste(4, 1.0, 1.0)]));
    let put = state.update_user_data(|user| user.money += 10).unwrap();
    // The server answers the write with a document that still has the object
    let server = state.user().unwrap().clone();

    let delete = state.delete_home_object(&stored_waste(4, 1.0, 1.0)).unwrap().unwrap();
    let outcome = state.handle_response(GatewayResponse::to(&put, GatewayReply::UserData(server.clone())));
    assert_that(&outcome).is_equal_to(ResponseOutcome::Applied);
    assert_that(&state.user().unwrap().home_object(4)).is_none();
    assert_that(&state.user().unwrap().money).is_equal_to(10);

    state.handle_response(GatewayResponse::to(&delete, GatewayReply::Deleted));
    let put = state.update_user_data(|_| {}).unwrap();
    state.handle_response(GatewayResponse::to(&put, GatewayReply::UserData(server)));
    // Once the delete is confirmed the filter is lifted
    assert_that(&state.user().unwrap().home_object(4).is_some()).is_true();
}

#[test]
fn test_failed_delete_is_resent_on_retry() {
    let mut state = logged_in(user(vec![], vec![stored_waste(4, 1.0, 1.0)]));
    let delete = state.delete_home_object(&stored_waste(4, 1.0, 1.0)).unwrap().unwrap();

    state.handle_response(GatewayResponse::to(&delete, GatewayReply::Failed("offline".into())));
    let retry = state.retry_unconfirmed();

    assert_that(&retry).has_length(2);
    assert_that(&retry[0].call).is_equal_to(GatewayCall::DeleteHomeObject { id: 4 });
    assert!(matches!(retry[1].call, GatewayCall::PutUserData { .. }));
}

#[test]
fn test_failed_delete_blocks_confirmation() {
    let mut state = logged_in(user(vec![], vec![stored_waste(4, 1.0, 1.0)]));
    let delete = state.delete_home_object(&stored_waste(4, 1.0, 1.0)).unwrap().unwrap();
    state.handle_response(GatewayResponse::to(&delete, GatewayReply::Failed("offline".into())));

    let put = state.update_user_data(|_| {}).unwrap();
    let document = state.user().unwrap().clone();
    state.handle_response(GatewayResponse::to(&put, GatewayReply::UserData(document)));

    assert_that(&state.sync_status()).is_equal_to(SyncStatus::Unconfirmed);
}

#[test]
fn test_missing_active_pet_redirects_home() {
    let mut state = logged_in(user(vec![hatched(1, 0, Some(T0))], vec![]));
    state.navigate_to(Page::Minigame, Some(PetId(1)));
    assert_that(&state.resolve_active_pet()).is_equal_to(Some(PetId(1)));

    let put = state.update_user_data(|user| user.pets.clear()).unwrap();
    assert_that(&put.seq).is_equal_to(RequestSeq(1));

    assert_that(&state.resolve_active_pet()).is_none();
    assert_that(&state.navigation().page).is_equal_to(Page::Home);
}

#[test]
fn test_pages_without_a_pet_never_redirect() {
    let mut state = logged_in(user(vec![], vec![]));
    state.navigate_to(Page::MainMenu, None);

    assert_that(&state.resolve_active_pet()).is_none();
    assert_that(&state.navigation().page).is_equal_to(Page::MainMenu);
    assert_that(&Page::Home.needs_pet()).is_false();
    assert_that(&Page::PetSummary.needs_pet()).is_true();
}
