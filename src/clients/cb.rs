use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::clients::pagination::{Page, Pagination, MAX_PAGE_SIZE};
use crate::error::{FilipError, Result};
use crate::ql::{IntoStatement, Query};

pub const ENTITIES_PATH: [&str; 2] = ["v2", "entities"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListOption {
    KeyValues,
    Values,
    Unique,
    Count,
}

impl ListOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListOption::KeyValues => "keyValues",
            ListOption::Values => "values",
            ListOption::Unique => "unique",
            ListOption::Count => "count",
        }
    }

    fn is_representation(&self) -> bool {
        !matches!(self, ListOption::Count)
    }
}

impl fmt::Display for ListOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a `GET /v2/entities` request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityListRequest {
    entity_ids: Vec<String>,
    entity_types: Vec<String>,
    id_pattern: Option<String>,
    type_pattern: Option<String>,
    q: Option<Query>,
    mq: Option<Query>,
    attrs: Vec<String>,
    metadata: Vec<String>,
    order_by: Option<String>,
    options: Vec<ListOption>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl EntityListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_ids.push(id.into());
        self
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_types.push(entity_type.into());
        self
    }

    pub fn id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = Some(pattern.into());
        self
    }

    pub fn type_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.type_pattern = Some(pattern.into());
        self
    }

    pub fn q(mut self, query: Query) -> Self {
        self.q = Some(query);
        self
    }

    pub fn mq(mut self, query: Query) -> Self {
        self.mq = Some(query);
        self
    }

    /// Adds one condition to `q`, creating the query on first use.
    pub fn filter<S: IntoStatement>(mut self, statement: S) -> Result<Self> {
        self.q.get_or_insert_with(Query::default).insert(statement)?;
        Ok(self)
    }

    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.attrs.push(name.into());
        self
    }

    pub fn metadata(mut self, name: impl Into<String>) -> Self {
        self.metadata.push(name.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn option(mut self, option: ListOption) -> Self {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
        self
    }

    /// A single request may ask for at most [`MAX_PAGE_SIZE`] entities;
    /// larger limits are walked with [`EntityListRequest::paginate`].
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn query(&self) -> Option<&Query> {
        self.q.as_ref()
    }

    fn validate(&self) -> Result<()> {
        if !self.entity_ids.is_empty() && self.id_pattern.is_some() {
            return Err(FilipError::Validation(
                "entity ids and an id pattern cannot be combined".to_string(),
            ));
        }
        if !self.entity_types.is_empty() && self.type_pattern.is_some() {
            return Err(FilipError::Validation(
                "entity types and a type pattern cannot be combined".to_string(),
            ));
        }
        if self.options.iter().filter(|o| o.is_representation()).count() > 1 {
            return Err(FilipError::Validation(
                "only one of keyValues, values and unique may be requested".to_string(),
            ));
        }
        match self.limit {
            Some(limit) if limit == 0 || limit > MAX_PAGE_SIZE => {
                Err(FilipError::Validation(format!(
                    "limit must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, limit
                )))
            }
            _ => Ok(()),
        }
    }

    /// Query string parameters in the order the broker documents them.
    pub fn params(&self) -> Result<Vec<(&'static str, String)>> {
        self.validate()?;
        let mut params = Vec::new();
        let mut push_list = |name: &'static str, values: &[String]| {
            if !values.is_empty() {
                params.push((name, values.join(",")));
            }
        };
        push_list("id", &self.entity_ids);
        push_list("type", &self.entity_types);
        push_list("attrs", &self.attrs);
        push_list("metadata", &self.metadata);

        if let Some(pattern) = &self.id_pattern {
            params.push(("idPattern", pattern.clone()));
        }
        if let Some(pattern) = &self.type_pattern {
            params.push(("typePattern", pattern.clone()));
        }
        if let Some(q) = self.q.as_ref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_str()));
        }
        if let Some(mq) = self.mq.as_ref().filter(|mq| !mq.is_empty()) {
            params.push(("mq", mq.to_str()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("orderBy", order_by.clone()));
        }
        if !self.options.is_empty() {
            let options: Vec<&str> = self.options.iter().map(ListOption::as_str).collect();
            params.push(("options", options.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        Ok(params)
    }

    /// Full request URL below `base`, e.g. `http://localhost:1026`.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let params = self.params()?;
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| FilipError::Config(format!("'{}' cannot be used as a base url", base)))?
            .pop_if_empty()
            .extend(ENTITIES_PATH);
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(name, value)| (*name, value.as_str())));
        }
        debug!("entity list request: {}", url);
        Ok(url)
    }

    /// Windows for fetching this request page by page. The request's own
    /// limit and offset bound the whole walk.
    pub fn paginate(&self, page_size: usize) -> Result<Pagination> {
        Ok(Pagination::new(self.limit, page_size)?.starting_at(self.offset.unwrap_or(0)))
    }

    /// Copy of this request restricted to one page. `count` is requested so
    /// the broker reports the total along with the page.
    pub fn with_page(&self, page: Page) -> Self {
        let mut request = self.clone().option(ListOption::Count);
        request.limit = Some(page.limit);
        request.offset = Some(page.offset);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:1026").unwrap()
    }

    #[test]
    fn empty_request() {
        let url = EntityListRequest::new().url(&base()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:1026/v2/entities");
    }

    #[test]
    fn params_test() {
        let request = EntityListRequest::new()
            .entity_type("Room")
            .q(Query::parse("temperature>40;color==black,red").unwrap())
            .attr("temperature")
            .attr("color")
            .option(ListOption::KeyValues)
            .limit(100);
        assert_eq!(
            request.params().unwrap(),
            vec![
                ("type", "Room".to_string()),
                ("attrs", "temperature,color".to_string()),
                ("q", "temperature>40;color==black,red".to_string()),
                ("options", "keyValues".to_string()),
                ("limit", "100".to_string()),
            ]
        );
    }

    #[test]
    fn url_encodes_query() {
        let err = EntityListRequest::new()
            .filter("temperature>=40")
            .unwrap()
            .filter(("name", ">", "abc"))
            .unwrap_err();
        assert!(matches!(err, FilipError::Validation(_)));

        let url = EntityListRequest::new()
            .filter("temperature>=40")
            .unwrap()
            .filter(("refRoom", "==", "urn:ngsi-ld:Room:1"))
            .unwrap()
            .url(&base())
            .unwrap();
        assert_eq!(
            url.query(),
            Some("q=temperature%3E%3D40%3BrefRoom%3D%3Durn%3Angsi-ld%3ARoom%3A1")
        );
        let (_, q) = url.query_pairs().next().unwrap();
        assert_eq!(q, "temperature>=40;refRoom==urn:ngsi-ld:Room:1");
    }

    #[test]
    fn base_path_is_kept() {
        let base = Url::parse("http://broker.example.org/orion/").unwrap();
        let url = EntityListRequest::new().url(&base).unwrap();
        assert_eq!(url.path(), "/orion/v2/entities");
    }

    #[test]
    fn conflicting_parameters() {
        assert!(EntityListRequest::new()
            .entity_id("Room1")
            .id_pattern("Room.*")
            .params()
            .is_err());
        assert!(EntityListRequest::new()
            .entity_type("Room")
            .type_pattern("R.*")
            .params()
            .is_err());
        assert!(EntityListRequest::new()
            .option(ListOption::KeyValues)
            .option(ListOption::Values)
            .params()
            .is_err());
        assert!(EntityListRequest::new().limit(0).params().is_err());
        assert!(EntityListRequest::new().limit(1001).params().is_err());
    }

    #[test]
    fn pages_carry_count() {
        let request = EntityListRequest::new().entity_type("Room").limit(250).offset(10);
        let pages: Vec<Page> = request.paginate(100).unwrap().collect();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], Page { offset: 10, limit: 100 });

        let last = request.with_page(pages[2]);
        let params = last.params().unwrap();
        assert!(params.contains(&("options", "count".to_string())));
        assert!(params.contains(&("limit", "50".to_string())));
        assert!(params.contains(&("offset", "210".to_string())));
    }

    #[test]
    fn paginate_from_largest_offset() {
        let mut pagination = EntityListRequest::new().offset(usize::MAX).paginate(10).unwrap();
        assert_eq!(pagination.next(), None);
        assert_eq!(pagination.next(), None);
    }

    #[test]
    fn empty_query_is_omitted() {
        let params = EntityListRequest::new().q(Query::default()).params().unwrap();
        assert!(params.is_empty());
    }
}
