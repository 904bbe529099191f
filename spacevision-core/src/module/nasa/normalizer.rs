//! Maps raw upstream JSON into `RemoteRecord`s
use serde_json::Value;
use spacevision_common::{
    DailyImage, MediaType, RemoteRecord, RoverPhoto, SearchResult, SourceKind,
};

/// Normalize one raw record.
///
/// Returns `None` only for search items without a usable image link.
pub fn normalize(raw: &Value, kind: SourceKind) -> Option<RemoteRecord> {
    match kind {
        SourceKind::DailyImage => Some(RemoteRecord::DailyImage(daily_image(first_data(raw)))),
        SourceKind::RoverPhoto => Some(RemoteRecord::RoverPhoto(rover_photo(first_data(raw)))),
        SourceKind::SearchResult => search_result(raw).map(RemoteRecord::SearchResult),
    }
}

/// Normalize a batch, keeping input order and dropping filtered items
pub fn normalize_all<'a, I>(items: I, kind: SourceKind) -> Vec<RemoteRecord>
where
    I: IntoIterator<Item = &'a Value>,
{
    items
        .into_iter()
        .filter_map(|item| normalize(item, kind))
        .collect()
}

/// Records from a media library search response (`collection.items`)
pub fn search_results(response: &Value) -> Vec<RemoteRecord> {
    let items = response
        .pointer("/collection/items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let records = normalize_all(items, SourceKind::SearchResult);
    tracing::debug!(
        "Search response: {} items, {} with images",
        items.len(),
        records.len()
    );
    records
}

/// Records from a rover photo response (`photos`)
pub fn rover_photos(response: &Value) -> Vec<RemoteRecord> {
    let photos = response
        .get("photos")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    normalize_all(photos, SourceKind::RoverPhoto)
}

/// Daily image records from a single object or an array of them
pub fn daily_images(response: &Value) -> Vec<RemoteRecord> {
    match response {
        Value::Array(items) => normalize_all(items, SourceKind::DailyImage),
        Value::Object(_) => normalize(response, SourceKind::DailyImage)
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

/// Flatten a NEO feed (`near_earth_objects`: date -> list) into one list
/// ordered by the first close approach date. Objects without a date sort last.
pub fn flatten_neo_feed(response: &Value) -> Vec<Value> {
    let mut objects: Vec<Value> = response
        .get("near_earth_objects")
        .and_then(Value::as_object)
        .map(|by_date| {
            by_date
                .values()
                .filter_map(Value::as_array)
                .flatten()
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    objects.sort_by(|a, b| match (close_approach_date(a), close_approach_date(b)) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    objects
}

fn close_approach_date(neo: &Value) -> Option<&str> {
    neo.pointer("/close_approach_data/0/close_approach_date")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
}

/// The first element of a `data` array when present, else the record itself
fn first_data(raw: &Value) -> &Value {
    raw.get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .unwrap_or(raw)
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn int_field(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => 0,
    }
}

/// `{"name": ..}` objects or plain strings
fn name_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(nested) => str_field(nested, "name"),
        None => String::new(),
    }
}

fn daily_image(raw: &Value) -> DailyImage {
    DailyImage {
        date: str_field(raw, "date"),
        title: str_field(raw, "title"),
        explanation: str_field(raw, "explanation"),
        url: str_field(raw, "url"),
        media_type: MediaType::from_upstream(&str_field(raw, "media_type")),
        hd_url: opt_str_field(raw, "hdurl"),
        copyright: opt_str_field(raw, "copyright").map(|c| c.trim().to_string()),
    }
}

fn rover_photo(raw: &Value) -> RoverPhoto {
    RoverPhoto {
        id: int_field(raw, "id"),
        sol: int_field(raw, "sol"),
        earth_date: str_field(raw, "earth_date"),
        img_src: str_field(raw, "img_src"),
        camera: name_field(raw, "camera"),
        rover: name_field(raw, "rover"),
    }
}

fn search_result(raw: &Value) -> Option<SearchResult> {
    let img_src = raw
        .pointer("/links/0/href")
        .and_then(Value::as_str)
        .filter(|href| !href.is_empty())?;
    let data = raw.pointer("/data/0");
    let field = |key: &str| data.map(|d| str_field(d, key)).unwrap_or_default();

    Some(SearchResult {
        nasa_id: field("nasa_id"),
        title: field("title"),
        description: field("description"),
        date_created: field("date_created"),
        img_src: img_src.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spacevision_common::IdentityKey;

    fn search_item(nasa_id: &str, href: Option<&str>) -> Value {
        let mut item = json!({
            "data": [{
                "nasa_id": nasa_id,
                "title": format!("Title {}", nasa_id),
                "description": "A description",
                "date_created": "1969-07-20T00:00:00Z"
            }]
        });
        if let Some(href) = href {
            item["links"] = json!([{ "href": href, "rel": "preview" }]);
        }
        item
    }

    #[test]
    fn test_search_drops_items_without_image_in_order() {
        let response = json!({
            "collection": {
                "items": [
                    search_item("a", Some("https://img/a.jpg")),
                    search_item("b", None),
                    search_item("c", Some("https://img/c.jpg")),
                    search_item("d", Some("")),
                    { "data": [{ "nasa_id": "e" }], "links": [] }
                ]
            }
        });

        let records = search_results(&response);
        let ids: Vec<_> = records.iter().map(|r| r.identity()).collect();
        assert_eq!(
            ids,
            vec![IdentityKey::Id("a".into()), IdentityKey::Id("c".into())]
        );

        match &records[0] {
            RemoteRecord::SearchResult(r) => {
                assert_eq!(r.title, "Title a");
                assert_eq!(r.img_src, "https://img/a.jpg");
                assert_eq!(r.date_created, "1969-07-20T00:00:00Z");
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_rover_photo_maps_nested_names() {
        let raw = json!({
            "id": 102693,
            "sol": 1000,
            "camera": { "id": 20, "name": "FHAZ", "full_name": "Front Hazard Avoidance Camera" },
            "img_src": "http://mars.jpl.nasa.gov/fhaz.jpg",
            "earth_date": "2015-05-30",
            "rover": { "id": 5, "name": "Curiosity" }
        });

        let record = normalize(&raw, SourceKind::RoverPhoto).unwrap();
        assert_eq!(
            record,
            RemoteRecord::RoverPhoto(RoverPhoto {
                id: 102693,
                sol: 1000,
                earth_date: "2015-05-30".into(),
                img_src: "http://mars.jpl.nasa.gov/fhaz.jpg".into(),
                camera: "FHAZ".into(),
                rover: "Curiosity".into(),
            })
        );
    }

    #[test]
    fn test_daily_image_and_data_wrapper() {
        let raw = json!({
            "date": "2023-05-01",
            "title": "Galaxy",
            "explanation": "Spiral arms",
            "url": "https://apod.nasa.gov/x.jpg",
            "hdurl": "https://apod.nasa.gov/x_hd.jpg",
            "media_type": "video",
            "copyright": "\nSomeone\n"
        });
        let wrapped = json!({ "data": [raw.clone()] });

        let direct = normalize(&raw, SourceKind::DailyImage).unwrap();
        assert_eq!(normalize(&wrapped, SourceKind::DailyImage).unwrap(), direct);

        match direct {
            RemoteRecord::DailyImage(image) => {
                assert_eq!(image.media_type, MediaType::Video);
                assert_eq!(image.hd_url.as_deref(), Some("https://apod.nasa.gov/x_hd.jpg"));
                assert_eq!(image.copyright.as_deref(), Some("Someone"));
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_are_total() {
        let record = normalize(&json!({}), SourceKind::RoverPhoto).unwrap();
        assert_eq!(record.identity(), IdentityKey::Unidentifiable);

        let record = normalize(&json!(null), SourceKind::DailyImage).unwrap();
        assert_eq!(record.identity(), IdentityKey::Unidentifiable);
    }

    #[test]
    fn test_daily_images_accepts_array_or_object() {
        let one = json!({ "date": "2024-02-02", "title": "One" });
        assert_eq!(daily_images(&one).len(), 1);
        assert_eq!(daily_images(&json!([one.clone(), one])).len(), 2);
        assert!(daily_images(&json!("oops")).is_empty());
    }

    #[test]
    fn test_rover_photos_from_response() {
        let response = json!({ "photos": [{ "id": 1 }, { "id": 2 }] });
        assert_eq!(rover_photos(&response).len(), 2);
        assert!(rover_photos(&json!({})).is_empty());
    }

    #[test]
    fn test_flatten_neo_feed_sorted_by_approach() {
        let neo = |name: &str, date: Option<&str>| {
            let approaches = match date {
                Some(d) => json!([{ "close_approach_date": d }]),
                None => json!([]),
            };
            json!({ "name": name, "close_approach_data": approaches })
        };
        let response = json!({
            "element_count": 4,
            "near_earth_objects": {
                "2023-01-03": [neo("c", Some("2023-01-03"))],
                "2023-01-01": [neo("a", Some("2023-01-01")), neo("x", None)],
                "2023-01-02": [neo("b", Some("2023-01-02"))]
            }
        });

        let names: Vec<_> = flatten_neo_feed(&response)
            .iter()
            .map(|n| n["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "x"]);
    }
}
