use pretty_assertions::assert_eq;
use serde_json::json;
use speculoos::prelude::*;
use varmints::data::{AuthResponse, Credentials, EvolutionId, HomeObject, Pet, PetId, PetPatch, UserData};
use varmints::error::{AuthError, GameError};
use varmints::gateway::{AuthCall, GatewayCall, Method};

mod common;
use common::{approx, hatched, user, HOUR_MS, T0};

#[test]
fn test_pet_reads_server_format() {
    let pet: Pet = serde_json::from_value(json!({
        "id": 12,
        "evolution_id": [1, 2],
        "name": "Mossy",
        "level": 3,
        "xp": 40,
        "hunger": 0.25,
        "happiness": 0.75,
        "abilities": "dig, swim,,",
        "createdAt": T0,
        "lastUpdate": T0 + 5,
    }))
    .unwrap();

    assert_that(&pet.id).is_equal_to(PetId(12));
    assert_that(&pet.evolution).is_equal_to(EvolutionId::new(1, 2));
    assert_eq!(pet.abilities, vec!["dig".to_string(), "swim".to_string()]);
    assert_that(&pet.created_at).is_equal_to(Some(T0));
    assert_that(&pet.last_update).is_equal_to(Some(T0 + 5));
}

#[test]
fn test_pet_fills_defaults() {
    let pet: Pet = serde_json::from_value(json!({ "id": 1, "abilities": ["fly"] })).unwrap();

    assert_that(&pet.evolution.is_egg()).is_true();
    assert_that(&pet.level).is_equal_to(1);
    assert_that(&approx(pet.hunger, 0.5)).is_true();
    assert_eq!(pet.abilities, vec!["fly".to_string()]);
    assert_that(&pet.last_update).is_none();
}

#[test]
fn test_pet_writes_server_format() {
    let value = serde_json::to_value(hatched(3, 1, Some(T0))).unwrap();

    assert_eq!(value["evolution_id"], json!([1, 1]));
    assert_eq!(value["lastUpdate"], json!(T0));
    assert_that(&value.get("evolution").is_none()).is_true();
}

#[test]
fn test_home_object_wire_format() {
    let unstored = serde_json::to_value(HomeObject::waste(1.5, -2.0)).unwrap();
    assert_eq!(unstored, json!({ "type": "temporary", "object_id": 1, "x": 1.5, "y": -2.0 }));

    let stored: HomeObject =
        serde_json::from_value(json!({ "id": 8, "type": "temporary", "object_id": 1, "x": 0.0, "y": 0.0 })).unwrap();
    assert_that(&stored.id).is_equal_to(Some(8));
    assert_that(&stored.is_waste()).is_true();
}

#[test]
fn test_same_object_matching() {
    let mut a = HomeObject::waste(1.0, 1.0);
    let b = HomeObject::waste(1.0, 1.0);
    assert_that(&a.same_object(&b)).is_true();
    assert_that(&a.same_object(&HomeObject::waste(1.0, 2.0))).is_false();

    a.id = Some(3);
    let mut c = HomeObject::waste(5.0, 5.0);
    c.id = Some(3);
    // Stored objects match on id alone
    assert_that(&a.same_object(&c)).is_true();
}

#[test]
fn test_auth_response_carries_account_fields() {
    let response: AuthResponse = serde_json::from_value(json!({
        "id": 7,
        "username": "tester",
        "data": { "money": 30, "pets": [], "home_objects": [] },
    }))
    .unwrap();

    let data = response.into_user_data();
    assert_that(&data.id).is_equal_to(7);
    assert_eq!(data.username, "tester");
    assert_that(&data.money).is_equal_to(30);
}

#[test]
fn test_reconcile_keeps_local_account_fields() {
    let local = user(vec![], vec![]);
    let server = UserData {
        money: 99,
        ..Default::default()
    };

    let merged = server.reconciled_with(&local);

    assert_that(&merged.id).is_equal_to(local.id);
    assert_eq!(merged.username, local.username);
    assert_that(&merged.money).is_equal_to(99);
}

#[test]
fn test_merge_never_moves_stage_backward() {
    let pet = hatched(1, 0, None);

    let back = pet.merged(&PetPatch {
        evolution: Some(EvolutionId::new(0, 0)),
        ..Default::default()
    });
    assert_that(&back.evolution.stage).is_equal_to(1);

    let other_line = pet.merged(&PetPatch {
        evolution: Some(EvolutionId::new(2, 5)),
        ..Default::default()
    });
    assert_that(&other_line.evolution).is_equal_to(EvolutionId::new(1, 0));
}

#[test]
fn test_merge_clamps_needs() {
    let pet = hatched(1, 0, None).merged(&PetPatch {
        hunger: Some(1.7),
        happiness: Some(-0.2),
        ..Default::default()
    });

    assert_that(&pet.hunger).is_equal_to(1.0);
    assert_that(&pet.happiness).is_equal_to(0.0);
}

#[test]
fn test_merge_leaves_original_untouched() {
    let pet = hatched(1, 0, None);
    let renamed = pet.merged(&PetPatch::rename("Noodle"));

    assert_eq!(renamed.name, "Noodle");
    assert_eq!(pet.name, "Pet 1");
    assert_that(&PetPatch::default().is_empty()).is_true();
    assert_that(&PetPatch::rename("x").is_empty()).is_false();
}

#[test]
fn test_age_labels() {
    let pet = Pet::egg(PetId(1), 0, "Age", T0);

    assert_eq!(pet.age_label(T0 + 59 * 60_000), "59m");
    assert_eq!(pet.age_label(T0 + HOUR_MS), "1h");
    assert_eq!(pet.age_label(T0 + 25 * HOUR_MS), "1d");
    assert_eq!(pet.age_label(T0 - 1_000), "0m");

    let unknown = Pet {
        created_at: None,
        ..pet
    };
    assert_eq!(unknown.age_label(T0), "0m");
}

#[test]
fn test_xp_progress() {
    let mut pet = hatched(1, 0, None);
    pet.xp = 50;
    assert_that(&pet.xp_progress()).is_equal_to(0.5);
    assert_that(&pet.xp_threshold_reached()).is_false();

    pet.xp = 150;
    assert_that(&pet.xp_progress()).is_equal_to(1.0);
    assert_that(&pet.xp_threshold_reached()).is_true();
}

#[test]
fn test_auth_error_mapping() {
    assert_that(&AuthError::from_status(401)).is_equal_to(AuthError::InvalidPassword);
    assert_that(&AuthError::from_status(404)).is_equal_to(AuthError::UserNotFound);
    assert_that(&AuthError::from_status(400)).is_equal_to(AuthError::UsernameTaken);
    assert_that(&AuthError::from_status(503)).is_equal_to(AuthError::Unexpected(503));
}

#[test]
fn test_auth_call_round_trip() {
    let call = AuthCall::Register(Credentials {
        username: "new".into(),
        password: "secret".into(),
    });
    assert_eq!(call.path(), "/register");
    assert_eq!(call.method().as_ref(), "POST");
    assert_eq!(call.body().unwrap(), r#"{"username":"new","password":"secret"}"#);

    let body = json!({ "id": 3, "username": "new", "data": {} }).to_string();
    let response = call.parse_response(201, &body).unwrap();
    assert_that(&response.id).is_equal_to(3);

    let failure = AuthCall::Login(Credentials {
        username: "new".into(),
        password: "wrong".into(),
    })
    .parse_response(401, "");
    assert!(matches!(failure, Err(GameError::Auth(AuthError::InvalidPassword))));
}

#[test]
fn test_gateway_calls() {
    let document = std::sync::Arc::new(user(vec![], vec![]));
    let put = GatewayCall::PutUserData {
        user_id: 7,
        document,
    };
    assert_that(&put.method()).is_equal_to(Method::Put);
    assert_eq!(put.method().as_ref(), "PUT");
    assert_eq!(put.path(), "/userdata/7");
    assert_that(&put.body().unwrap().is_some()).is_true();

    let delete = GatewayCall::DeleteHomeObject { id: 12 };
    assert_eq!(delete.method().as_ref(), "DELETE");
    assert_eq!(delete.path(), "/homeobject/12");
    assert_that(&delete.body().unwrap()).is_none();
}
