use url::{Url, form_urlencoded};

pub const PAGE_PARAM: &str = "page";

/// Value of the `page` parameter in a full URL or a bare query string.
/// Missing or empty values yield `None`; the first occurrence wins.
pub fn page_key_from_query(input: &str) -> Option<String> {
    let input = input.trim();
    let pairs: Vec<(String, String)> = match Url::parse(input) {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(_) => {
            let query = input.split_once('?').map_or(input, |(_, q)| q);
            let query = query.split_once('#').map_or(query, |(q, _)| q);
            form_urlencoded::parse(query.as_bytes()).into_owned().collect()
        }
    };

    pairs
        .into_iter()
        .find(|(key, _)| key == PAGE_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_query() {
        assert_eq!(page_key_from_query("?page=projects").as_deref(), Some("projects"));
        assert_eq!(page_key_from_query("page=about&x=1").as_deref(), Some("about"));
    }

    #[test]
    fn test_full_url() {
        assert_eq!(
            page_key_from_query("https://example.com/index.html?x=1&page=contact#top").as_deref(),
            Some("contact")
        );
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(page_key_from_query("?page=my%20page").as_deref(), Some("my page"));
        assert_eq!(page_key_from_query("?page=a+b").as_deref(), Some("a b"));
    }

    #[test]
    fn test_missing_or_empty() {
        assert_eq!(page_key_from_query(""), None);
        assert_eq!(page_key_from_query("?other=1"), None);
        assert_eq!(page_key_from_query("?page="), None);
        assert_eq!(page_key_from_query("https://example.com/"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(page_key_from_query("?page=home&page=about").as_deref(), Some("home"));
    }
}
