use super::PageRequest;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Keys owned by the pagination half of the query
const RESERVED_KEYS: [&str; 2] = ["page", "size"];

/// Errors raised while flattening filters into query parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("filters must serialize to an object")]
    NotAnObject,
    #[error("filter `{0}` must be a scalar value")]
    NotScalar(String),
    #[error("filter `{0}` collides with a pagination parameter")]
    Reserved(String),
    #[error("failed to serialize filters: {0}")]
    Serialize(String),
}

/// Merge the page request and a filter set into flat query parameters.
///
/// The result starts with `page` and `size`, followed by the filter keys in key
/// order. Absent (`None`/null) filters and blank strings are left out entirely
/// so the backend sees "no constraint" rather than an empty value.
pub fn normalize_params<F: Serialize>(
    page: PageRequest,
    filters: &F,
) -> Result<Vec<(String, String)>, ParamsError> {
    let mut params = vec![
        ("page".to_string(), page.page().to_string()),
        ("size".to_string(), page.size().to_string()),
    ];

    let filters = serde_json::to_value(filters).map_err(|e| ParamsError::Serialize(e.to_string()))?;
    let filters = match filters {
        Value::Object(map) => map,
        Value::Null => return Ok(params),
        _ => return Err(ParamsError::NotAnObject),
    };

    for (key, value) in filters {
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ParamsError::Reserved(key));
        }
        let value = match value {
            Value::Null => continue,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    continue;
                }
                trimmed.to_string()
            }
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => return Err(ParamsError::NotScalar(key)),
        };
        params.push((key, value));
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Default)]
    struct CodeFilters {
        subscribe_plan: Option<i64>,
        unit_time: Option<String>,
        code: Option<String>,
    }

    fn keys(params: &[(String, String)]) -> Vec<&str> {
        params.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_absent_filters_are_omitted() {
        let params = normalize_params(PageRequest::first(10).unwrap(), &CodeFilters::default())
            .expect("Failed to normalize params");
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "1".to_string()),
                ("size".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_present_filters_are_flattened() {
        let filters = CodeFilters {
            subscribe_plan: Some(3),
            unit_time: Some("month".to_string()),
            code: None,
        };
        let params = normalize_params(PageRequest::new(2, 20).unwrap(), &filters)
            .expect("Failed to normalize params");
        assert_eq!(keys(&params), vec!["page", "size", "subscribe_plan", "unit_time"]);
        assert!(params.contains(&("subscribe_plan".to_string(), "3".to_string())));
        assert!(params.contains(&("page".to_string(), "2".to_string())));
    }

    #[test]
    fn test_blank_strings_are_omitted() {
        let filters = CodeFilters {
            code: Some("   ".to_string()),
            ..Default::default()
        };
        let params = normalize_params(PageRequest::first(10).unwrap(), &filters).unwrap();
        assert!(!keys(&params).contains(&"code"));
    }

    #[test]
    fn test_booleans_are_rendered() {
        let params = normalize_params(
            PageRequest::first(10).unwrap(),
            &json!({"pinned": true, "popup": false}),
        )
        .unwrap();
        assert!(params.contains(&("pinned".to_string(), "true".to_string())));
        assert!(params.contains(&("popup".to_string(), "false".to_string())));
    }

    #[test]
    fn test_unit_filters() {
        let params = normalize_params(PageRequest::first(5).unwrap(), &()).unwrap();
        assert_eq!(keys(&params), vec!["page", "size"]);
    }

    #[test]
    fn test_rejected_shapes() {
        let page = PageRequest::first(10).unwrap();
        assert_eq!(
            normalize_params(page, &json!({"ids": [1, 2]})),
            Err(ParamsError::NotScalar("ids".to_string()))
        );
        assert_eq!(
            normalize_params(page, &json!({"page": 4})),
            Err(ParamsError::Reserved("page".to_string()))
        );
        assert_eq!(normalize_params(page, &json!(7)), Err(ParamsError::NotAnObject));
    }
}
