//! The datalist query pipeline.
//!
//! [`Datalist::get_data`] runs one request through the stages:
//!
//! ```text
//! Start -> RequestFilterApplied -> Sorted -> SelectedComputed? -> Paged -> Projected -> Done
//! ```
//!
//! Request filtering picks one of two paths. When `ids` is non-empty only
//! those records are returned. Otherwise the selected ids are excluded,
//! `checkIds` restricts, additional filters apply, and text search ranks
//! what is left. The selected records are looked up separately, on the
//! first page only, and returned unpaged.

use std::fmt;
use std::sync::Arc;

use crate::cancel::{Cancellation, NeverCancel};
use crate::catalog::Catalog;
use crate::config::DatalistConfig;
use crate::data::{ResultSet, Row};
use crate::error::{DatalistError, Result};
use crate::filter::{self, AdditionalFilters};
use crate::key::KeyField;
use crate::ordering::{self, OrderBy, SortMode};
use crate::page::Page;
use crate::project;
use crate::record::Record;
use crate::request::FilterRequest;
use crate::search::{ScoredRecord, TextSearch};
use crate::source::RecordSource;

/// Derives a label or id from a record.
pub type Extractor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

type Records<'a, T> = Box<dyn Iterator<Item = &'a T> + 'a>;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    RequestFilterApplied,
    Sorted,
    SelectedComputed,
    Paged,
    Projected,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::RequestFilterApplied => "request_filter_applied",
            Stage::Sorted => "sorted",
            Stage::SelectedComputed => "selected_computed",
            Stage::Paged => "paged",
            Stage::Projected => "projected",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that passed request filtering.
///
/// `ranked` is set when text search scored and ordered them.
#[derive(Debug)]
pub struct Filtered<'a, T> {
    pub records: Vec<ScoredRecord<'a, T>>,
    pub ranked: bool,
}

impl<'a, T> Filtered<'a, T> {
    /// Wraps records that were not scored.
    pub fn unranked<I: IntoIterator<Item = &'a T>>(records: I) -> Self {
        Filtered {
            records: records.into_iter().map(ScoredRecord::unscored).collect(),
            ranked: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.records.iter().map(|scored| scored.record)
    }
}

/// A configured datalist over records of type `T`.
///
/// A datalist holds only immutable configuration and can serve concurrent
/// requests; every call owns its request and result set.
///
/// # Example
///
/// ```
/// use datalist::{Catalog, Column, Datalist, FieldDef, FieldKind, FieldType, FilterRequest, Record, Value};
/// use std::sync::Arc;
///
/// struct Product {
///     id: u32,
///     name: String,
/// }
///
/// impl Record for Product {
///     fn entity_name() -> &'static str {
///         "Product"
///     }
///
///     fn fields() -> &'static [FieldDef] {
///         const FIELDS: &[FieldDef] = &[
///             FieldDef::new("Id", FieldKind::U32),
///             FieldDef::new("Name", FieldKind::Text),
///         ];
///         FIELDS
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Id" => self.id.to_value(),
///             "Name" => self.name.to_value(),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let catalog = Catalog::builder().column(Column::new("Name")).build()?;
/// let datalist = Datalist::<Product>::new(Arc::new(catalog));
/// let products = vec![
///     Product { id: 1, name: "Bolt".into() },
///     Product { id: 2, name: "Nut".into() },
/// ];
///
/// let mut request = FilterRequest {
///     search: Some("bolt".into()),
///     ..FilterRequest::default()
/// };
/// let data = datalist.get_data(&products, &mut request)?;
///
/// assert_eq!(data.rows.len(), 1);
/// assert_eq!(data.rows[0].id(), "1");
/// assert_eq!(data.rows[0].label(), "Bolt");
/// # Ok::<(), datalist::DatalistError>(())
/// ```
pub struct Datalist<T> {
    catalog: Arc<Catalog>,
    config: DatalistConfig,
    label: Option<Extractor<T>>,
    id: Option<Extractor<T>>,
}

impl<T> Clone for Datalist<T> {
    fn clone(&self) -> Self {
        Datalist {
            catalog: Arc::clone(&self.catalog),
            config: self.config.clone(),
            label: self.label.clone(),
            id: self.id.clone(),
        }
    }
}

impl<T> fmt::Debug for Datalist<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datalist")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .field("custom_label", &self.label.is_some())
            .field("custom_id", &self.id.is_some())
            .finish()
    }
}

impl<T: Record> Datalist<T> {
    /// Creates a datalist over a shared catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Datalist {
            catalog,
            config: DatalistConfig::default(),
            label: None,
            id: None,
        }
    }

    /// Creates a datalist with the catalog declared by `T`.
    pub fn from_record() -> Result<Self> {
        Ok(Datalist::new(Catalog::shared::<T>()?))
    }

    pub fn with_config(mut self, config: DatalistConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default label (first visible column).
    pub fn with_label<F>(mut self, label: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.label = Some(Arc::new(label));
        self
    }

    /// Replaces the default id (text of the key field).
    pub fn with_id<F>(mut self, id: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.id = Some(Arc::new(id));
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &DatalistConfig {
        &self.config
    }

    /// Binds query-string pairs using this datalist's configuration.
    pub fn bind_request<I, K, V>(&self, pairs: I) -> Result<FilterRequest>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        FilterRequest::from_query_pairs(pairs, &self.config)
    }

    /// Runs a request against a record source.
    ///
    /// `request.offset` and `request.rows` are clamped in place.
    pub fn get_data<S>(&self, source: &S, request: &mut FilterRequest) -> Result<ResultSet>
    where
        S: RecordSource<T> + ?Sized,
    {
        self.get_data_with(source, request, &NeverCancel)
    }

    /// Runs a request, checking `cancel` before each stage.
    pub fn get_data_with<S>(
        &self,
        source: &S,
        request: &mut FilterRequest,
        cancel: &dyn Cancellation,
    ) -> Result<ResultSet>
    where
        S: RecordSource<T> + ?Sized,
    {
        let span = tracing::debug_span!("datalist", entity = T::entity_name());
        let _enter = span.enter();

        let result = self.run(source, request, cancel);
        if let Err(err) = &result {
            tracing::debug!(error = %err, class = ?err.class(), "datalist query failed");
        }
        result
    }

    fn run<S>(
        &self,
        source: &S,
        request: &mut FilterRequest,
        cancel: &dyn Cancellation,
    ) -> Result<ResultSet>
    where
        S: RecordSource<T> + ?Sized,
    {
        let page = Page::clamp_request(request);
        let order_by = OrderBy::resolve::<T>(request.sort.as_deref(), request.order)?;
        tracing::debug!(
            offset = page.offset,
            rows = page.rows,
            sort = ?order_by,
            ordered = source.is_ordered(),
            "request clamped"
        );

        checkpoint(cancel, Stage::RequestFilterApplied)?;
        let mut filtered = self.filter_by_request(source.records(), request)?;
        tracing::debug!(
            stage = %Stage::RequestFilterApplied,
            count = filtered.len(),
            ranked = filtered.ranked,
            "records filtered"
        );

        checkpoint(cancel, Stage::Sorted)?;
        let mode = self.sort(&mut filtered, order_by.as_ref(), source.is_ordered());
        tracing::debug!(stage = %Stage::Sorted, mode = mode.as_str(), "records sorted");

        let mut selected = Filtered::unranked(std::iter::empty());
        if request.offset == 0 && request.ids.is_empty() && !request.selected.is_empty() {
            checkpoint(cancel, Stage::SelectedComputed)?;
            selected = Filtered::unranked(self.filter_by_selected(source.records(), &request.selected)?);
            self.sort(&mut selected, order_by.as_ref(), source.is_ordered());
            tracing::debug!(stage = %Stage::SelectedComputed, count = selected.len(), "selected records found");
        }

        checkpoint(cancel, Stage::Paged)?;
        let rows: Vec<&T> = self.page(filtered.iter(), request).collect();
        tracing::trace!(stage = %Stage::Paged, count = rows.len(), "page sliced");

        checkpoint(cancel, Stage::Projected)?;
        let data = self.form_result_set(rows, selected.iter());
        tracing::debug!(
            stage = %Stage::Done,
            rows = data.rows.len(),
            selected = data.selected.len(),
            "result set formed"
        );
        Ok(data)
    }

    /// Applies the request's filters in priority order.
    ///
    /// Filters before text search are lazy; text search, when it runs,
    /// scores every remaining record.
    pub fn filter_by_request<'a, I>(
        &self,
        records: I,
        request: &FilterRequest,
    ) -> Result<Filtered<'a, T>>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T> + 'a,
        I::IntoIter: 'a,
    {
        if !request.ids.is_empty() {
            return Ok(Filtered::unranked(self.filter_by_ids(records, &request.ids)?));
        }

        let mut records: Records<'a, T> = Box::new(records.into_iter());

        if !request.selected.is_empty() {
            records = Box::new(self.filter_by_not_ids(records, &request.selected)?);
        }

        if !request.check_ids.is_empty() {
            records = Box::new(self.filter_by_check_ids(records, &request.check_ids)?);
        }

        if !request.additional_filters.is_empty() {
            records = Box::new(
                self.filter_by_additional_filters(records, &request.additional_filters)?,
            );
        }

        Ok(self.filter_by_search(records, request.search_text()))
    }

    /// Ranks records by text search, or passes them through unranked when
    /// the search is blank or no column is searchable.
    pub fn filter_by_search<'a, I>(&self, records: I, search: Option<&str>) -> Filtered<'a, T>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        match TextSearch::new::<T>(&self.catalog, search) {
            Some(search) => Filtered {
                records: search.rank(records),
                ranked: true,
            },
            None => Filtered::unranked(records),
        }
    }

    /// Keeps records matching every present additional filter.
    pub fn filter_by_additional_filters<'a, I>(
        &self,
        records: I,
        filters: &AdditionalFilters,
    ) -> Result<impl Iterator<Item = &'a T> + 'a>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T> + 'a,
        I::IntoIter: 'a,
    {
        let compiled = filter::compile::<T>(filters)?;
        Ok(filter::apply(compiled, records))
    }

    /// Keeps records whose key is one of `ids`.
    pub fn filter_by_ids<'a, I, S>(
        &self,
        records: I,
        ids: &[S],
    ) -> Result<impl Iterator<Item = &'a T> + 'a>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T> + 'a,
        I::IntoIter: 'a,
        S: AsRef<str>,
    {
        let set = KeyField::resolve::<T>()?.parse_ids(ids)?;
        Ok(set.keep(records))
    }

    /// Keeps records whose key is not one of `ids`.
    pub fn filter_by_not_ids<'a, I, S>(
        &self,
        records: I,
        ids: &[S],
    ) -> Result<impl Iterator<Item = &'a T> + 'a>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T> + 'a,
        I::IntoIter: 'a,
        S: AsRef<str>,
    {
        let set = KeyField::resolve::<T>()?.parse_ids(ids)?;
        Ok(set.exclude(records))
    }

    /// Restricts results to the client's `checkIds`.
    pub fn filter_by_check_ids<'a, I, S>(
        &self,
        records: I,
        ids: &[S],
    ) -> Result<impl Iterator<Item = &'a T> + 'a>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T> + 'a,
        I::IntoIter: 'a,
        S: AsRef<str>,
    {
        self.filter_by_ids(records, ids)
    }

    /// Looks up the selected records.
    pub fn filter_by_selected<'a, I, S>(
        &self,
        records: I,
        ids: &[S],
    ) -> Result<impl Iterator<Item = &'a T> + 'a>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T> + 'a,
        I::IntoIter: 'a,
        S: AsRef<str>,
    {
        self.filter_by_ids(records, ids)
    }

    /// Sorts filtered records in place.
    ///
    /// Without a sort key, records from an ordered source or from text
    /// search keep their order, and anything else keeps input order.
    pub fn sort(
        &self,
        filtered: &mut Filtered<'_, T>,
        order_by: Option<&OrderBy>,
        ordered: bool,
    ) -> SortMode {
        ordering::sort(&mut filtered.records, order_by, ordered, filtered.ranked)
    }

    /// Clamps the request's paging fields and slices the records.
    pub fn page<I: IntoIterator>(
        &self,
        records: I,
        request: &mut FilterRequest,
    ) -> impl Iterator<Item = I::Item> {
        Page::clamp_request(request).apply(records)
    }

    /// Projects one record into a row.
    pub fn form_data(&self, record: &T) -> Row {
        project::project(&self.catalog, record, self.label_of(record), self.id_of(record))
    }

    /// Builds the result set from the paged rows and the selected records.
    pub fn form_result_set<'a, R, S>(&self, rows: R, selected: S) -> ResultSet
    where
        T: 'a,
        R: IntoIterator<Item = &'a T>,
        S: IntoIterator<Item = &'a T>,
    {
        ResultSet {
            columns: Arc::clone(&self.catalog),
            rows: rows.into_iter().map(|record| self.form_data(record)).collect(),
            selected: selected.into_iter().map(|record| self.form_data(record)).collect(),
        }
    }

    /// Id of a record as sent to the client.
    pub fn id_of(&self, record: &T) -> String {
        match &self.id {
            Some(id) => id(record),
            None => project::default_id(record),
        }
    }

    /// Label of a record as sent to the client.
    pub fn label_of(&self, record: &T) -> String {
        match &self.label {
            Some(label) => label(record),
            None => project::default_label(&self.catalog, record),
        }
    }
}

fn checkpoint(cancel: &dyn Cancellation, stage: Stage) -> Result<()> {
    if cancel.is_cancelled() {
        tracing::debug!(stage = %stage, "datalist query cancelled");
        return Err(DatalistError::Cancelled {
            stage: stage.as_str(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Column;
    use crate::record::FieldDef;
    use crate::source::Ordered;
    use crate::value::{FieldKind, FieldType, Value};
    use std::sync::atomic::AtomicBool;

    #[derive(Debug)]
    struct Item {
        id: i64,
        name: String,
        group: Option<String>,
    }

    impl Record for Item {
        fn entity_name() -> &'static str {
            "Item"
        }

        fn fields() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef::new("Id", FieldKind::I64),
                FieldDef::new("Name", FieldKind::Text),
                FieldDef::new("Group", FieldKind::Text),
            ];
            FIELDS
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Id" => self.id.to_value(),
                "Name" => self.name.to_value(),
                "Group" => self.group.to_value(),
                _ => Value::None,
            }
        }
    }

    fn items() -> Vec<Item> {
        ["delta", "alpha", "charlie", "bravo", "alphabet"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| Item {
                id: i as i64 + 1,
                name: name.to_string(),
                group: (i % 2 == 0).then(|| "even".to_string()),
            })
            .collect()
    }

    fn datalist() -> Datalist<Item> {
        let catalog = Catalog::builder()
            .column(Column::new("Name").header("Name"))
            .column(Column::new("Group").filterable(false))
            .build()
            .unwrap();
        Datalist::new(Arc::new(catalog))
    }

    fn ids(data: &ResultSet) -> Vec<&str> {
        data.rows.iter().map(Row::id).collect()
    }

    #[test]
    fn no_filters_keep_input_order() {
        let mut request = FilterRequest::default();
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data), ["1", "2", "3", "4", "5"]);
        assert!(data.selected.is_empty());
    }

    #[test]
    fn sort_by_field_descending() {
        let mut request = FilterRequest {
            sort: Some("Name".into()),
            order: crate::SortOrder::Desc,
            ..FilterRequest::default()
        };
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data), ["1", "3", "4", "5", "2"]);
    }

    #[test]
    fn ordered_source_passes_through() {
        let mut items = items();
        items.reverse();
        let source = Ordered(items);
        let mut request = FilterRequest::default();
        let data = datalist().get_data(&source, &mut request).unwrap();
        assert_eq!(ids(&data), ["5", "4", "3", "2", "1"]);
    }

    #[test]
    fn search_ranks_best_first() {
        let mut request = FilterRequest {
            search: Some("alpha".into()),
            ..FilterRequest::default()
        };
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data)[..2], ["2", "5"]);
    }

    #[test]
    fn ids_take_priority_over_everything() {
        let mut request = FilterRequest {
            ids: vec!["3".into(), "4".into()],
            search: Some("zzz".into()),
            selected: vec!["3".into()],
            ..FilterRequest::default()
        };
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data), ["3", "4"]);
        assert!(data.selected.is_empty());
    }

    #[test]
    fn selected_excluded_and_returned_on_first_page() {
        let mut request = FilterRequest {
            selected: vec!["2".into(), "4".into()],
            sort: Some("Name".into()),
            ..FilterRequest::default()
        };
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data), ["5", "3", "1"]);
        let selected: Vec<&str> = data.selected.iter().map(Row::id).collect();
        assert_eq!(selected, ["2", "4"]);

        request.offset = 1;
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert!(data.selected.is_empty());
        assert_eq!(ids(&data), ["3", "1"]);
    }

    #[test]
    fn clamped_paging_is_echoed() {
        let mut request = FilterRequest {
            offset: -3,
            rows: 2,
            ..FilterRequest::default()
        };
        let data = datalist().get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data), ["1", "2"]);
        assert_eq!((request.offset, request.rows), (0, 2));
    }

    #[test]
    fn unknown_sort_field_fails_even_when_empty() {
        let mut request = FilterRequest {
            sort: Some("Nope".into()),
            ..FilterRequest::default()
        };
        let err = datalist().get_data(&Vec::<Item>::new(), &mut request).unwrap_err();
        assert!(matches!(err, DatalistError::UnknownSortField { .. }));
    }

    #[test]
    fn id_parse_error_aborts() {
        let mut request = FilterRequest {
            check_ids: vec!["one".into()],
            ..FilterRequest::default()
        };
        let err = datalist().get_data(&items(), &mut request).unwrap_err();
        assert!(matches!(err, DatalistError::IdParse { ref id, .. } if id == "one"));
    }

    #[test]
    fn custom_extractors() {
        let datalist = datalist()
            .with_label(|item: &Item| item.name.to_uppercase())
            .with_id(|_: &Item| String::new());
        let mut request = FilterRequest {
            rows: 1,
            ..FilterRequest::default()
        };
        let data = datalist.get_data(&items(), &mut request).unwrap();
        assert_eq!(data.rows[0].label(), "DELTA");
        assert_eq!(data.rows[0].get("Id"), Some(Some("")));
    }

    #[test]
    fn cancellation_between_stages() {
        let flag = AtomicBool::new(true);
        let mut request = FilterRequest::default();
        let err = datalist()
            .get_data_with(&items(), &mut request, &flag)
            .unwrap_err();
        assert!(matches!(err, DatalistError::Cancelled { stage: "request_filter_applied" }));

        let calls = std::cell::Cell::new(0);
        let after_filtering = || {
            calls.set(calls.get() + 1);
            calls.get() > 1
        };
        let err = datalist()
            .get_data_with(&items(), &mut request, &after_filtering)
            .unwrap_err();
        assert!(matches!(err, DatalistError::Cancelled { stage: "sorted" }));
    }

    #[test]
    fn bind_request_uses_config() {
        let datalist = datalist().with_config(DatalistConfig::default().additional_filter("Group"));
        let mut request = datalist
            .bind_request([("Group", "even"), ("rows", "10")])
            .unwrap();
        assert_eq!(request.rows, 10);
        let data = datalist.get_data(&items(), &mut request).unwrap();
        assert_eq!(ids(&data), ["1", "3", "5"]);
    }
}
