use serde::Serialize;
use std::fmt;

/// Semantic role a CSV column can play in a yield export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Region,
    Crop,
    Yield,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 3] = [ColumnRole::Region, ColumnRole::Crop, ColumnRole::Yield];

    /// Canonical column name the role is exposed under after loading.
    pub fn canonical_name(self) -> &'static str {
        match self {
            ColumnRole::Region => "State",
            ColumnRole::Crop => "Crop",
            ColumnRole::Yield => "Yield",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A case-insensitive header pattern: every `contains` fragment present, no `excludes` fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPattern {
    pub contains: Vec<String>,
    pub excludes: Vec<String>,
}

impl ColumnPattern {
    pub fn containing(fragment: &str) -> Self {
        Self {
            contains: vec![fragment.to_ascii_lowercase()],
            excludes: Vec::new(),
        }
    }

    pub fn excluding(mut self, fragment: &str) -> Self {
        self.excludes.push(fragment.to_ascii_lowercase());
        self
    }

    pub fn matches(&self, header: &str) -> bool {
        let header = header.to_ascii_lowercase();
        self.contains.iter().all(|needle| header.contains(needle.as_str()))
            && !self.excludes.iter().any(|needle| header.contains(needle.as_str()))
    }
}

/// Declared header patterns per role, tried in order.
#[derive(Debug, Clone)]
pub struct SchemaMapping {
    rules: Vec<(ColumnRole, Vec<ColumnPattern>)>,
}

impl SchemaMapping {
    /// Patterns covering the state-wise crop production exports seen so far.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                (ColumnRole::Region, vec![ColumnPattern::containing("state")]),
                (
                    ColumnRole::Crop,
                    vec![ColumnPattern::containing("crop").excluding("year")],
                ),
                (ColumnRole::Yield, vec![ColumnPattern::containing("yield")]),
            ],
        }
    }

    /// Replace the patterns used for one role.
    pub fn with_patterns(mut self, role: ColumnRole, patterns: Vec<ColumnPattern>) -> Self {
        match self.rules.iter_mut().find(|(existing, _)| *existing == role) {
            Some((_, slot)) => *slot = patterns,
            None => self.rules.push((role, patterns)),
        }
        self
    }

    /// Map every role onto a header. Patterns are tried in declaration order and, within a
    /// pattern, the first header in file order wins. Other candidates are kept as ambiguities.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedSchema, SchemaError> {
        let mut columns = Vec::with_capacity(self.rules.len());
        let mut ambiguities = Vec::new();

        for (role, patterns) in &self.rules {
            let winner = patterns.iter().find_map(|pattern| {
                headers
                    .iter()
                    .position(|header| pattern.matches(header))
                    .map(|index| (index, pattern))
            });

            let Some((index, pattern)) = winner else {
                return Err(SchemaError {
                    role: *role,
                    headers: headers.to_vec(),
                });
            };

            for (other, header) in headers.iter().enumerate() {
                if other != index && pattern.matches(header) {
                    ambiguities.push(SchemaAmbiguity {
                        role: *role,
                        chosen: headers[index].clone(),
                        ignored: header.clone(),
                    });
                }
            }

            columns.push(ResolvedColumn {
                role: *role,
                index,
                header: headers[index].clone(),
            });
        }

        Ok(ResolvedSchema {
            columns,
            ambiguities,
        })
    }
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub role: ColumnRole,
    pub index: usize,
    pub header: String,
}

/// A header that matched a role but lost to an earlier column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaAmbiguity {
    pub role: ColumnRole,
    pub chosen: String,
    pub ignored: String,
}

/// Winning role to column assignment for one loaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    columns: Vec<ResolvedColumn>,
    ambiguities: Vec<SchemaAmbiguity>,
}

impl ResolvedSchema {
    pub fn column(&self, role: ColumnRole) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|column| column.role == role)
    }

    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    pub fn ambiguities(&self) -> &[SchemaAmbiguity] {
        &self.ambiguities
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub role: ColumnRole,
    pub headers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn standard_mapping_resolves_census_headers() {
        let headers = headers(&["State_Name", "District_Name", "Crop_Year", "Crop", "Yield"]);
        let schema = SchemaMapping::standard().resolve(&headers).expect("resolves");

        assert_eq!(schema.column(ColumnRole::Region).expect("region").header, "State_Name");
        let crop = schema.column(ColumnRole::Crop).expect("crop");
        assert_eq!(crop.header, "Crop");
        assert_eq!(crop.index, 3);
        assert_eq!(schema.column(ColumnRole::Yield).expect("yield").index, 4);
        assert!(schema.ambiguities().is_empty());
    }

    #[test]
    fn first_matching_header_wins_and_rest_are_reported() {
        let headers = headers(&["State", "Crop", "Yield", "Yield_Category"]);
        let schema = SchemaMapping::standard().resolve(&headers).expect("resolves");

        assert_eq!(schema.column(ColumnRole::Yield).expect("yield").header, "Yield");
        assert_eq!(
            schema.ambiguities(),
            &[SchemaAmbiguity {
                role: ColumnRole::Yield,
                chosen: "Yield".to_string(),
                ignored: "Yield_Category".to_string(),
            }]
        );
    }

    #[test]
    fn missing_role_is_an_error() {
        let headers = headers(&["State", "Crop", "Production"]);
        let err = SchemaMapping::standard()
            .resolve(&headers)
            .expect_err("no yield column");
        assert_eq!(err.role, ColumnRole::Yield);
        assert_eq!(err.headers.len(), 3);
    }

    #[test]
    fn custom_patterns_are_tried_in_order() {
        let mapping = SchemaMapping::standard().with_patterns(
            ColumnRole::Yield,
            vec![
                ColumnPattern::containing("yield").excluding("category"),
                ColumnPattern::containing("productivity"),
            ],
        );

        let schema = mapping
            .resolve(&headers(&["Yield_Category", "State", "Crop", "Yield"]))
            .expect("resolves");
        assert_eq!(schema.column(ColumnRole::Yield).expect("yield").header, "Yield");

        let schema = mapping
            .resolve(&headers(&["State", "Crop", "Productivity"]))
            .expect("falls through to second pattern");
        assert_eq!(
            schema.column(ColumnRole::Yield).expect("yield").header,
            "Productivity"
        );
    }
}
