#![allow(dead_code)]

use country_atlas::{Country, Session};
use serde_json::{json, Value};

pub const ANON_KEY: &str = "anon-key";

pub fn japan_json() -> Value {
    json!({
        "cca3": "JPN",
        "name": { "common": "Japan", "official": "Japan" },
        "capital": ["Tokyo"],
        "region": "Asia",
        "subregion": "Eastern Asia",
        "population": 125_836_021,
        "languages": { "jpn": "Japanese" },
        "flags": { "png": "https://flagcdn.com/w320/jp.png", "svg": "https://flagcdn.com/jp.svg" },
        "latlng": [36.0, 138.0],
        "borders": []
    })
}

pub fn usa_json() -> Value {
    json!({
        "cca3": "USA",
        "name": { "common": "United States", "official": "United States of America" },
        "capital": ["Washington, D.C."],
        "region": "Americas",
        "population": 329_484_123,
        "languages": { "eng": "English" },
        "flags": { "png": "https://flagcdn.com/w320/us.png", "svg": "https://flagcdn.com/us.svg" },
        "latlng": [38.0, -97.0],
        "borders": ["CAN", "MEX"]
    })
}

pub fn country(value: Value) -> Country {
    serde_json::from_value(value).unwrap()
}

pub fn user_json(id: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "created_at": "2022-01-01T12:00:00Z",
        "user_metadata": { "username": id },
        "identities": [{ "provider": "email" }]
    })
}

pub fn session_json(id: &str) -> Value {
    json!({
        "access_token": format!("access-{id}"),
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "refresh_token": format!("refresh-{id}"),
        "user": user_json(id)
    })
}

pub fn session(id: &str) -> Session {
    serde_json::from_value(session_json(id)).unwrap()
}
