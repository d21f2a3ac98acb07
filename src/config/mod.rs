//! Configuration loading and management
//!
//! Admin list pages that only need field-based search and filters describe
//! their table in YAML instead of wiring closures:
//!
//! ```yaml
//! tables:
//!   leads:
//!     items_per_page: 10
//!     initial_sort: createdAt:desc
//!     search_fields: [customer.name, partner.name]
//!     filters:
//!       status: { field: status }
//!       minBudget: { field: budget, match: min }
//! ```

use crate::core::{ConfigError, FilterSet, Record, SortSpec, TableError};
use crate::table::{DEFAULT_ITEMS_PER_PAGE, FilterMatch, TableEngine, search_fields};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How one named filter is evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Dot path of the field the filter inspects
    pub field: String,

    #[serde(default, rename = "match")]
    pub match_kind: FilterMatch,
}

/// Configuration of a single table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Sort expression (`field:asc` / `field:desc`)
    pub initial_sort: String,

    /// Paths searched case-insensitively by the free-text box
    #[serde(default)]
    pub search_fields: Vec<String>,

    #[serde(default)]
    pub filters: IndexMap<String, FilterRule>,

    /// Filter values applied when the table is first built
    #[serde(default)]
    pub initial_filters: IndexMap<String, String>,
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

impl TableConfig {
    /// Check the parts of the config that would make `build_engine` fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidItemsPerPage {
                value: self.items_per_page,
            });
        }
        SortSpec::parse(&self.initial_sort)?;
        for (key, rule) in &self.filters {
            if rule.field.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("filters.{}.field", key),
                    value: rule.field.clone(),
                    message: "field path is empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Compile the configuration into a table engine over `data`
    pub fn build_engine<T>(
        &self,
        data: impl Into<Option<Vec<T>>>,
    ) -> Result<TableEngine<T>, TableError>
    where
        T: Record + 'static,
    {
        self.validate()?;

        let mut builder = TableEngine::builder()
            .data(data)
            .items_per_page(self.items_per_page)
            .initial_sort(SortSpec::parse(&self.initial_sort)?)
            .initial_filters(
                self.initial_filters
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect::<FilterSet>(),
            );

        if !self.search_fields.is_empty() {
            builder = builder.search_fn(search_fields(self.search_fields.clone()));
        }
        for (key, rule) in &self.filters {
            builder = builder.filter_fn(
                key.as_str(),
                rule.match_kind.predicate(rule.field.as_str()),
            );
        }

        builder.build()
    }
}

/// Complete configuration for the back-office tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default)]
    pub tables: IndexMap<String, TableConfig>,
}

impl TablesConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: file.map(str::to_string),
            message: e.to_string(),
        })?;
        for table in config.tables.values() {
            table.validate()?;
        }
        tracing::debug!(tables = config.tables.len(), "table configuration loaded");
        Ok(config)
    }

    /// Look up a table by name
    pub fn get(&self, name: &str) -> Result<&TableConfig, ConfigError> {
        self.tables.get(name).ok_or_else(|| ConfigError::UnknownTable {
            name: name.to_string(),
        })
    }

    /// Merge several configurations; later tables replace earlier ones of the same name
    pub fn merge(configs: Vec<TablesConfig>) -> Self {
        let mut merged = TablesConfig::default();
        for config in configs {
            for (name, table) in config.tables {
                if merged.tables.contains_key(&name) {
                    tracing::debug!(table = %name, "table configuration overridden by merge");
                }
                merged.tables.insert(name, table);
            }
        }
        merged
    }

    /// Create a default configuration for the main back-office lists
    pub fn default_config() -> Self {
        let mut tables = IndexMap::new();

        tables.insert(
            "partners".to_string(),
            TableConfig {
                items_per_page: DEFAULT_ITEMS_PER_PAGE,
                initial_sort: "name.en:asc".to_string(),
                search_fields: vec!["name.en".to_string(), "name.ar".to_string()],
                filters: IndexMap::from([(
                    "type".to_string(),
                    FilterRule {
                        field: "type".to_string(),
                        match_kind: FilterMatch::Equals,
                    },
                )]),
                initial_filters: IndexMap::new(),
            },
        );

        tables.insert(
            "leads".to_string(),
            TableConfig {
                items_per_page: DEFAULT_ITEMS_PER_PAGE,
                initial_sort: "createdAt:desc".to_string(),
                search_fields: vec!["customerName".to_string(), "partner.name".to_string()],
                filters: IndexMap::from([(
                    "status".to_string(),
                    FilterRule {
                        field: "status".to_string(),
                        match_kind: FilterMatch::Equals,
                    },
                )]),
                initial_filters: IndexMap::new(),
            },
        );

        tables.insert(
            "properties".to_string(),
            TableConfig {
                items_per_page: 12,
                initial_sort: "createdAt:desc".to_string(),
                search_fields: vec!["title.en".to_string(), "location.city".to_string()],
                filters: IndexMap::from([
                    (
                        "immediate".to_string(),
                        FilterRule {
                            field: "delivery.isImmediate".to_string(),
                            match_kind: FilterMatch::Equals,
                        },
                    ),
                    (
                        "minPrice".to_string(),
                        FilterRule {
                            field: "price".to_string(),
                            match_kind: FilterMatch::Min,
                        },
                    ),
                    (
                        "maxPrice".to_string(),
                        FilterRule {
                            field: "price".to_string(),
                            match_kind: FilterMatch::Max,
                        },
                    ),
                ]),
                initial_filters: IndexMap::new(),
            },
        );

        Self { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_default_config() {
        let config = TablesConfig::default_config();

        assert_eq!(config.tables.len(), 3);
        assert!(config.get("leads").is_ok());
        assert!(matches!(
            config.get("brokers"),
            Err(ConfigError::UnknownTable { .. })
        ));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = TablesConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = TablesConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
tables:
  decorations:
    initial_sort: title.en
"#;
        let config = TablesConfig::from_yaml_str(yaml).unwrap();
        let table = config.get("decorations").unwrap();
        assert_eq!(table.items_per_page, DEFAULT_ITEMS_PER_PAGE);
        assert!(table.search_fields.is_empty());
        assert!(table.filters.is_empty());
    }

    #[test]
    fn test_invalid_sort_is_rejected() {
        let yaml = r#"
tables:
  leads:
    initial_sort: "createdAt:sideways"
"#;
        let err = TablesConfig::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SORT");
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let yaml = r#"
tables:
  leads:
    initial_sort: createdAt
    items_per_page: 0
"#;
        let err = TablesConfig::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ITEMS_PER_PAGE");
    }

    #[test]
    fn test_malformed_yaml() {
        let err = TablesConfig::from_yaml_str("tables: [oops").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { file: None, .. }));
    }

    #[test]
    fn test_build_engine_from_config() {
        let config = TablesConfig::default_config();
        let partners = vec![
            json!({"name": {"en": "Emaar"}, "type": "developer"}),
            json!({"name": {"en": "Bloom Interiors"}, "type": "finishing"}),
            json!({"name": {"en": "Atelier Nour"}, "type": "finishing"}),
        ];

        let mut table = config
            .get("partners")
            .unwrap()
            .build_engine::<Value>(partners)
            .unwrap();

        assert_eq!(table.total_items(), 3);
        table.set_filter("type", "finishing");
        let names: Vec<_> = table
            .paged_items()
            .iter()
            .map(|p| p["name"]["en"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Atelier Nour", "Bloom Interiors"]);

        table.set_search_term("BLOOM");
        assert_eq!(table.total_items(), 1);
    }

    #[test]
    fn test_initial_filters_scope_the_table() {
        let yaml = r#"
tables:
  finishing-partners:
    initial_sort: name
    search_fields: [name]
    filters:
      type: { field: type }
    initial_filters:
      type: finishing
"#;
        let config = TablesConfig::from_yaml_str(yaml).unwrap();
        let table = config
            .get("finishing-partners")
            .unwrap()
            .build_engine::<Value>(vec![
                json!({"name": "A", "type": "developer"}),
                json!({"name": "B", "type": "finishing"}),
            ])
            .unwrap();
        assert_eq!(table.total_items(), 1);
        assert_eq!(table.filters().active("type"), Some("finishing"));
    }
}
