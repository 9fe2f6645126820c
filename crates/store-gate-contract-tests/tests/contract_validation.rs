//! Validates Portal wire-contract fixtures against frozen JSON schemas.

use jsonschema::JSONSchema;
use serde_json::Value;

fn load_json(path: &str) -> Value {
    let raw = std::fs::read_to_string(path).expect("json file should be readable");
    serde_json::from_str(&raw).expect("json file should be valid")
}

fn compile_validator(schema_path: &str) -> JSONSchema {
    let schema = load_json(schema_path);
    JSONSchema::compile(&schema).expect("schema should compile")
}

#[test]
fn handoff_user_fixture_matches_schema() {
    let validator = compile_validator(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/handoff-user.schema.json"
    ));
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/handoff-user.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "handoff user fixture should validate against schema"
    );
}

#[test]
fn handoff_user_invalid_fixture_is_rejected() {
    let validator = compile_validator(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/handoff-user.schema.json"
    ));
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/handoff-user.invalid.json"
    ));
    assert!(
        !validator.is_valid(&fixture),
        "fixture missing required fields must fail validation"
    );
}

#[test]
fn verify_response_fixture_matches_schema() {
    let validator = compile_validator(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/verify-response.schema.json"
    ));
    let fixture = load_json(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/verify-response.valid.json"
    ));
    assert!(
        validator.is_valid(&fixture),
        "verify response fixture should validate against schema"
    );
}
