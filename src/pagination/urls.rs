use serde_json::{Value, json};

use super::iterator::PageRequest;

/// Build `base?params=<json>` as the scores API expects
pub fn build_params_url(base_url: &str, params: &Value) -> String {
    let separator = determine_separator(base_url);
    let encoded = urlencoding::encode(&params.to_string()).into_owned();
    format!("{}{}params={}", base_url, separator, encoded)
}

/// Copy of `params` with the page window applied
pub fn with_page(params: &Value, request: PageRequest) -> Value {
    let mut paged = match params {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    paged.insert("_skip".to_string(), json!(request.skip));
    paged.insert("_take".to_string(), json!(request.take));
    Value::Object(paged)
}

fn determine_separator(url: &str) -> char {
    if url.contains('?') { '&' } else { '?' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_url_encoded_json() {
        let url = build_params_url("http://api.smx.573.no/scores", &json!({"_take": 1}));

        assert_eq!(url, "http://api.smx.573.no/scores?params=%7B%22_take%22%3A1%7D");
    }

    #[test]
    fn test_page_window_overrides_existing_values() {
        let params = json!({"gamer.username": "Thaya", "_take": 3});

        let paged = with_page(&params, PageRequest { skip: 100, take: 50 });

        assert_eq!(paged["_skip"], 100);
        assert_eq!(paged["_take"], 50);
        assert_eq!(paged["gamer.username"], "Thaya");
    }
}
