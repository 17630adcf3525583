use serde::Deserialize;

/// Subset of the Custom Search JSON API response we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct CseResponse {
    #[serde(default)]
    pub items: Option<Vec<CseItem>>,
    #[serde(rename = "searchInformation")]
    pub search_information: Option<CseSearchInformation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CseItem {
    #[serde(default)]
    pub title: String,
    pub link: String,
    pub display_link: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CseSearchInformation {
    pub total_results: Option<String>,
    pub search_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_and_tolerates_missing_fields() {
        let raw = r#"{
            "kind": "customsearch#search",
            "searchInformation": { "searchTime": 0.21, "totalResults": "1340" },
            "items": [
                { "title": "Flu Vaccine | CDC", "link": "https://www.cdc.gov/flu", "displayLink": "www.cdc.gov" },
                { "link": "https://example.org/untitled" }
            ]
        }"#;
        let resp: CseResponse = serde_json::from_str(raw).unwrap();
        let items = resp.items.unwrap();
        assert_eq!(items[0].display_link.as_deref(), Some("www.cdc.gov"));
        assert_eq!(items[1].title, "");
        assert_eq!(
            resp.search_information.unwrap().total_results.as_deref(),
            Some("1340")
        );
    }

    #[test]
    fn empty_search_has_no_items() {
        let resp: CseResponse = serde_json::from_str(r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(resp.items.is_none());
    }
}
