// Fixture builders shaped like the API's responses, plus wiremock mounting.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{AcquireConfig, ThrottlePolicy};
use crate::fragments::Script;

pub fn chapter_name(id: u32) -> String {
    match id {
        1 => "Al-Fatihah".to_string(),
        2 => "Al-Baqarah".to_string(),
        3 => "Ali 'Imran".to_string(),
        114 => "An-Nas".to_string(),
        other => format!("Surah {other}"),
    }
}

pub fn chapter_json(id: u32, verses_count: u32) -> Value {
    let place = if id % 2 == 0 { "madinah" } else { "makkah" };
    json!({
        "id": id,
        "revelation_place": place,
        "revelation_order": 115 - id,
        "bismillah_pre": bismillah_pre(id),
        "name_simple": chapter_name(id),
        "name_complex": chapter_name(id),
        "name_arabic": "سورة",
        "verses_count": verses_count,
        "pages": [id, id + 1],
        "translated_name": {"language_name": "english", "name": format!("Chapter {id}")}
    })
}

fn bismillah_pre(id: u32) -> bool {
    id != 1 && id != 9
}

/// The canonical 114-chapter listing, three verses each.
pub fn chapters_listing() -> Value {
    json!({ "chapters": (1..=114).map(|id| chapter_json(id, 3)).collect::<Vec<_>>() })
}

pub fn script_verses(script: Script, chapter: u32, count: u32) -> Value {
    let field = match script {
        Script::Uthmani => "text_uthmani",
        Script::Imlaei => "text_imlaei",
        Script::Tajweed => "text_uthmani_tajweed",
    };
    let verses: Vec<Value> = (1..=count)
        .map(|n| {
            json!({
                "id": chapter * 1000 + n,
                "verse_key": format!("{chapter}:{n}"),
                field: format!("{} {chapter}:{n}", script.label()),
            })
        })
        .collect();
    json!({ "verses": verses, "meta": {"filters": {"chapter_number": chapter.to_string()}} })
}

/// `/verses/by_chapter` payload: three words plus an end marker per verse,
/// glosses tagged with `gloss_language`.
pub fn word_verses(chapter: u32, count: u32, gloss_language: &str) -> Value {
    let verses: Vec<Value> = (1..=count)
        .map(|n| {
            let mut words: Vec<Value> = (1..=3)
                .map(|p| {
                    json!({
                        "id": n * 10 + p,
                        "position": p,
                        "audio_url": format!("wbw/{chapter:03}_{n:03}_{p:03}.mp3"),
                        "char_type_name": "word",
                        "text_uthmani": format!("كلمة{p}"),
                        "translation": {"text": format!("{gloss_language} {chapter}:{n}:{p}"), "language_name": gloss_language},
                        "transliteration": {"text": format!("kalima{p}"), "language_name": "english"}
                    })
                })
                .collect();
            words.push(json!({
                "id": n * 10 + 4,
                "position": 4,
                "audio_url": null,
                "char_type_name": "end",
                "text_uthmani": "٣",
                "translation": {"text": format!("({n})"), "language_name": "english"},
                "transliteration": {"text": null, "language_name": "english"}
            }));
            json!({
                "id": chapter * 1000 + n,
                "verse_number": n,
                "verse_key": format!("{chapter}:{n}"),
                "hizb_number": 1,
                "rub_el_hizb_number": 1,
                "ruku_number": 1,
                "manzil_number": 1,
                "sajdah_number": null,
                "page_number": chapter,
                "juz_number": 1,
                "words": words,
                "translations": [
                    {"id": n, "resource_id": 20, "text": format!("Sahih {chapter}:{n}")},
                    {"id": n + 1, "resource_id": 33, "text": format!("Kemenag {chapter}:{n}")}
                ]
            })
        })
        .collect();
    json!({ "verses": verses, "pagination": {"per_page": 300, "current_page": 1, "total_records": count} })
}

/// Config pointing at a mock server, with throttling disabled.
pub fn test_config(server: &MockServer) -> AcquireConfig {
    AcquireConfig {
        base_url: server.uri(),
        throttle: ThrottlePolicy::none(),
        ..AcquireConfig::default()
    }
}

pub async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/chapters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chapters_listing()))
        .mount(server)
        .await;
}

/// Mount the five per-chapter endpoints, each with `count` verses.
pub async fn mount_chapter(server: &MockServer, chapter: u32, count: u32) {
    for script in Script::ALL {
        mount_script(server, script, chapter, script_verses(script, chapter, count)).await;
    }
    mount_words(server, chapter, "en", word_verses(chapter, count, "english")).await;
    mount_words(server, chapter, "id", word_verses(chapter, count, "indonesian")).await;
}

pub async fn mount_script(server: &MockServer, script: Script, chapter: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(script.path()))
        .and(query_param("chapter_number", chapter.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_words(server: &MockServer, chapter: u32, language: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/verses/by_chapter/{chapter}")))
        .and(query_param("language", language))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
