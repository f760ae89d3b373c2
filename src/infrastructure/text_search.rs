// Weighted term-frequency scoring for text-index queries

use serde_json::Value;

use crate::core::document_path::get_path;
use crate::ent_framework::ent_schema::TextIndexDefinition;

/// Lowercased alphanumeric terms, deduplicated in first-seen order
pub fn tokenize_query(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in tokens(query) {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

/// Sum over indexed fields of weight x occurrences of each query term
pub fn score_document(doc: &Value, index: &TextIndexDefinition, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    index
        .fields
        .iter()
        .map(|(path, weight)| {
            let text = get_path(doc, path).map(field_text).unwrap_or_default();
            let hits = tokens(&text)
                .filter(|token| terms.iter().any(|term| term == token))
                .count();
            f64::from(*weight) * hits as f64
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index() -> TextIndexDefinition {
        TextIndexDefinition::new(&[("jobTitle", 10), ("requiredSkills", 3), ("description", 1)])
    }

    #[test]
    fn test_tokenize_query_dedupes_and_lowercases() {
        assert_eq!(tokenize_query("Data  data, SCIENCE!"), vec!["data", "science"]);
    }

    #[test]
    fn test_title_hits_outweigh_description_hits() {
        let terms = tokenize_query("data");
        let in_title = json!({"jobTitle": "Data Engineer", "requiredSkills": [], "description": ""});
        let in_description = json!({"jobTitle": "Nurse", "description": "works with data data"});
        assert_eq!(score_document(&in_title, &index(), &terms), 10.0);
        assert_eq!(score_document(&in_description, &index(), &terms), 2.0);
    }

    #[test]
    fn test_list_fields_are_searched() {
        let terms = tokenize_query("python");
        let doc = json!({"jobTitle": "Analyst", "requiredSkills": ["Python", "SQL"]});
        assert_eq!(score_document(&doc, &index(), &terms), 3.0);
    }

    #[test]
    fn test_no_terms_no_score() {
        assert_eq!(score_document(&json!({"jobTitle": "x"}), &index(), &[]), 0.0);
    }
}
