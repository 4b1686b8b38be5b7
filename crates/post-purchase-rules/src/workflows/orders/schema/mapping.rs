use super::normalizer::normalize_header;
use super::{OrderField, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Explicit canonical-to-source column overrides supplied by the collaborator.
///
/// Fields without an override are matched against table headers by their canonical
/// name, ignoring case, surrounding whitespace, inner spacing and a leading BOM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    overrides: BTreeMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, canonical: impl Into<String>, source: impl Into<String>) -> Self {
        self.overrides.insert(canonical.into(), source.into());
        self
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |mapping, (canonical, source)| {
                mapping.with(canonical, source)
            })
    }

    /// Parses a `canonical=source` pair as accepted on the command line.
    pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
        let (canonical, source) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected canonical=source, got '{raw}'"))?;
        let canonical = canonical.trim();
        let source = source.trim();
        if canonical.is_empty() || source.is_empty() {
            return Err(format!("expected canonical=source, got '{raw}'"));
        }
        Ok((canonical.to_string(), source.to_string()))
    }

    /// Locates every schema field in `headers`. Any absent required column fails the
    /// whole batch.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, SchemaError> {
        let mut overrides = HashMap::with_capacity(self.overrides.len());
        for (canonical, source) in &self.overrides {
            let field = OrderField::from_name(&normalize_header(canonical))
                .ok_or_else(|| SchemaError::UnknownField(canonical.clone()))?;
            overrides.insert(field, source.as_str());
        }

        let mut by_normalized: HashMap<String, usize> = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            by_normalized.entry(normalize_header(header)).or_insert(index);
        }

        let lookup = |name: &str| -> Option<usize> {
            headers
                .iter()
                .position(|header| header == name)
                .or_else(|| by_normalized.get(&normalize_header(name)).copied())
        };

        let mut indices = BTreeMap::new();
        let mut missing = Vec::new();
        for field in OrderField::all() {
            let wanted = overrides.get(&field).copied().unwrap_or(field.name());
            match lookup(wanted) {
                Some(index) => {
                    indices.insert(field, index);
                }
                None if field.is_required() => missing.push(field),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }

        let passthrough = (0..headers.len())
            .filter(|index| !indices.values().any(|used| used == index))
            .collect();

        Ok(ResolvedColumns {
            headers: headers.to_vec(),
            indices,
            passthrough,
        })
    }
}

/// Column layout of one table: where each schema field lives and which extra
/// columns ride along untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    headers: Vec<String>,
    indices: BTreeMap<OrderField, usize>,
    passthrough: Vec<usize>,
}

impl ResolvedColumns {
    pub fn index_of(&self, field: OrderField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn has(&self, field: OrderField) -> bool {
        self.indices.contains_key(&field)
    }

    /// Source header of a resolved field.
    pub fn source_of(&self, field: OrderField) -> Option<&str> {
        self.index_of(field)
            .and_then(|index| self.headers.get(index))
            .map(String::as_str)
    }

    pub fn passthrough_headers(&self) -> Vec<&str> {
        self.passthrough
            .iter()
            .filter_map(|index| self.headers.get(*index))
            .map(String::as_str)
            .collect()
    }

    /// Extra column values of `row`, in table order.
    pub fn passthrough_values(&self, row: &[String]) -> Vec<(String, String)> {
        self.passthrough
            .iter()
            .filter_map(|index| {
                self.headers.get(*index).map(|header| {
                    let value = row.get(*index).cloned().unwrap_or_default();
                    (header.clone(), value)
                })
            })
            .collect()
    }
}
