use serde_json::Value;
use tabled::Table;

use crate::{
    config::Settings,
    error,
    types::{FieldTableRow, Page, PlaylistTableRow, TrackTableRow},
    utils, warning,
};

pub async fn profile(token: String) {
    let service = super::service(&Settings::from_env());

    let pb = super::spinner("Fetching profile...");
    let result = service.fetch_profile(&token).await;
    pb.finish_and_clear();

    match result {
        Ok(profile) => {
            let rows = ["id", "display_name", "email", "country", "product"]
                .into_iter()
                .map(|field| FieldTableRow {
                    field: field.to_string(),
                    value: text(&profile[field]),
                })
                .collect::<Vec<_>>();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Failed to fetch profile. Err: {}", e),
    }
}

pub async fn playlists(token: String, limit: u32, offset: u32) {
    let service = super::service(&Settings::from_env());

    let pb = super::spinner("Fetching playlists...");
    let result = service.fetch_playlists(&token, limit, offset).await;
    pb.finish_and_clear();

    match result {
        Ok(page) => {
            let rows: Vec<PlaylistTableRow> = page
                .items
                .iter()
                .map(|p| PlaylistTableRow {
                    name: text(&p["name"]),
                    tracks: text(&p["tracks"]["total"]),
                    owner: text(&p["owner"]["display_name"]),
                    id: text(&p["id"]),
                })
                .collect();
            print_page(rows, &page);
        }
        Err(e) => error!("Failed to fetch playlists. Err: {}", e),
    }
}

pub async fn liked(token: String, limit: u32, offset: u32) {
    let service = super::service(&Settings::from_env());

    let pb = super::spinner("Fetching liked tracks...");
    let result = service.fetch_liked_tracks(&token, limit, offset).await;
    pb.finish_and_clear();

    match result {
        Ok(page) => print_page(track_rows(&page), &page),
        Err(e) => error!("Failed to fetch liked tracks. Err: {}", e),
    }
}

pub async fn tracks(token: String, playlist_id: String, limit: u32, offset: u32) {
    let service = super::service(&Settings::from_env());

    let pb = super::spinner("Fetching playlist tracks...");
    let result = service
        .fetch_playlist_tracks(&token, &playlist_id, limit, offset)
        .await;
    pb.finish_and_clear();

    match result {
        Ok(page) => print_page(track_rows(&page), &page),
        Err(e) => error!("Failed to fetch playlist tracks. Err: {}", e),
    }
}

pub async fn artist(token: String, artist_id: String) {
    let service = super::service(&Settings::from_env());

    let pb = super::spinner("Fetching artist...");
    let result = service.fetch_artist(&token, &artist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(artist) => {
            let genres = artist["genres"]
                .as_array()
                .map(|g| {
                    g.iter()
                        .filter_map(Value::as_str)
                        .take(3)
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .unwrap_or_default();

            let rows = vec![
                FieldTableRow {
                    field: "name".to_string(),
                    value: text(&artist["name"]),
                },
                FieldTableRow {
                    field: "genres".to_string(),
                    value: genres,
                },
                FieldTableRow {
                    field: "popularity".to_string(),
                    value: text(&artist["popularity"]),
                },
                FieldTableRow {
                    field: "followers".to_string(),
                    value: text(&artist["followers"]["total"]),
                },
            ];
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Failed to fetch artist. Err: {}", e),
    }
}

/// Saved-track and playlist-track items both nest the track under `track`.
fn track_rows(page: &Page) -> Vec<TrackTableRow> {
    page.items
        .iter()
        .map(|item| {
            let track = &item["track"];
            TrackTableRow {
                added: utils::format_added_at(item["added_at"].as_str()),
                name: text(&track["name"]),
                artists: utils::artist_names(track),
                id: text(&track["id"]),
            }
        })
        .collect()
}

fn print_page<T: tabled::Tabled>(rows: Vec<T>, page: &Page) {
    if rows.is_empty() {
        warning!("Nothing found.");
        return;
    }
    println!("{}", Table::new(rows));
    println!("{} of {} total", page.items.len(), page.total);
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
