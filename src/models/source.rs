//! Source model representing one academic reference returned for a search term.

use serde::{Deserialize, Serialize};

/// One academic reference attached to a search result.
///
/// Field names follow the service's wire format (`titulo`, `autores`, ...)
/// while the Rust side uses English names. Everything except the
/// identifier and title may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Server-assigned identifier
    pub id: i64,

    /// Reference title
    #[serde(rename = "titulo")]
    pub title: String,

    /// Authors, free text as returned by the service
    #[serde(rename = "autores", default)]
    pub authors: Option<String>,

    /// Publishing or hosting institution
    #[serde(rename = "instituicao", default)]
    pub institution: Option<String>,

    /// Publication year
    #[serde(rename = "ano_publicacao", default)]
    pub year: Option<i32>,

    /// Link to the reference
    #[serde(default)]
    pub link: Option<String>,

    /// Short description or abstract
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,

    /// Free-text access hint, e.g. "PDF", "Full text", "Open access"
    #[serde(rename = "tipo_acesso", default)]
    pub access_type: Option<String>,
}

impl Source {
    /// Create a source with only the required fields
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            authors: None,
            institution: None,
            year: None,
            link: None,
            description: None,
            access_type: None,
        }
    }

    /// Author names, split on `;` or `,` and trimmed
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .as_deref()
            .map(|a| {
                a.split([';', ','])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Builder for constructing Source values
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    source: Source,
}

impl SourceBuilder {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            source: Source::new(id, title),
        }
    }

    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.source.authors = Some(authors.into());
        self
    }

    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.source.institution = Some(institution.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.source.year = Some(year);
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.source.link = Some(link.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.source.description = Some(description.into());
        self
    }

    pub fn access_type(mut self, access_type: impl Into<String>) -> Self {
        self.source.access_type = Some(access_type.into());
        self
    }

    pub fn build(self) -> Source {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_builder() {
        let source = SourceBuilder::new(7, "Quantum Error Correction")
            .authors("Alice Doe; Bob Roe")
            .institution("MIT")
            .year(2021)
            .link("https://example.com/paper.pdf")
            .access_type("PDF")
            .build();

        assert_eq!(source.id, 7);
        assert_eq!(source.title, "Quantum Error Correction");
        assert_eq!(source.year, Some(2021));
        assert_eq!(source.institution.as_deref(), Some("MIT"));
        assert!(source.description.is_none());
    }

    #[test]
    fn test_author_list() {
        let source = SourceBuilder::new(1, "Test")
            .authors("Alice Doe; Bob Roe, Carol Poe")
            .build();
        assert_eq!(source.author_list(), vec!["Alice Doe", "Bob Roe", "Carol Poe"]);

        assert!(Source::new(2, "No authors").author_list().is_empty());
    }

    #[test]
    fn test_deserialize_wire_names_with_nulls() {
        let json = r#"{
            "id": 3,
            "titulo": "Deep Learning",
            "autores": null,
            "instituicao": "Stanford",
            "ano_publicacao": 2016,
            "link": null,
            "descricao": null,
            "tipo_acesso": "Artigo"
        }"#;

        let source: Source = serde_json::from_str(json).unwrap();
        assert_eq!(source.title, "Deep Learning");
        assert_eq!(source.authors, None);
        assert_eq!(source.institution.as_deref(), Some("Stanford"));
        assert_eq!(source.year, Some(2016));
        assert_eq!(source.access_type.as_deref(), Some("Artigo"));
    }

    #[test]
    fn test_deserialize_missing_optionals() {
        let source: Source = serde_json::from_str(r#"{"id": 1, "titulo": "Bare"}"#).unwrap();
        assert_eq!(source, Source::new(1, "Bare"));
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let value = serde_json::to_value(SourceBuilder::new(1, "T").year(2020).build()).unwrap();
        assert_eq!(value["titulo"], "T");
        assert_eq!(value["ano_publicacao"], 2020);
        assert!(value.get("title").is_none());
    }
}
