//! The search body sent upstream.
//!
//! Every query has the same shape: a capped page of hits, a free-text match
//! narrowed by optional exact-match filters, one hit per owner, newest first.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::SearchError;
use crate::params::SearchParams;


pub const PAGE_SIZE: usize = 25;
pub const COLLAPSE_FIELD: &str = "ownerId.keyword";
pub const SORT_FIELD: &str = "time";
pub const ZONE_FIELD: &str = "warzone";
pub const LEVEL_FIELD: &str = "level";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub size: usize,
    pub query: Query,
    pub collapse: Collapse,
    pub sort: Vec<SortClause>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Query {
    #[serde(rename = "bool")]
    pub boolean: BoolQuery,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoolQuery {
    pub must: MustClause,
    pub filter: Vec<TermFilter>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MustClause {
    pub query_string: QueryString,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryString {
    pub query: String,
}

/// `{"term": {"<field>": "<value>"}}`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    pub term: BTreeMap<String, String>,
}

impl TermFilter {
    pub fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            term: BTreeMap::from([(field.to_string(), value.into())]),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Collapse {
    pub field: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Desc,
}

/// `{"<field>": "desc"}`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SortClause(BTreeMap<String, SortOrder>);

impl SortClause {
    pub fn new(field: &str, order: SortOrder) -> Self {
        Self(BTreeMap::from([(field.to_string(), order)]))
    }
}

impl SearchQuery {
    pub fn to_json(&self) -> Result<String, SearchError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub fn build_query(params: &SearchParams) -> Result<SearchQuery, SearchError> {
    let text = params.require_query()?;

    let mut filter = Vec::new();
    if let Some(zone) = &params.z {
        filter.push(TermFilter::new(ZONE_FIELD, zone.as_str()));
    }
    if let Some(level) = &params.l {
        filter.push(TermFilter::new(LEVEL_FIELD, level.as_str()));
    }

    Ok(SearchQuery {
        size: PAGE_SIZE,
        query: Query {
            boolean: BoolQuery {
                must: MustClause {
                    query_string: QueryString {
                        query: text.to_string(),
                    },
                },
                filter,
            },
        },
        collapse: Collapse {
            field: COLLAPSE_FIELD.to_string(),
        },
        sort: vec![SortClause::new(SORT_FIELD, SortOrder::Desc)],
    })
}
