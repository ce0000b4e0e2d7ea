//! Grid request processor.
//!
//! The processor runs a request against an in-memory slice of records in a
//! fixed order: global search, column search, sort, paginate, serialize. Any
//! failure is turned into an error response carrying the request's draw
//! counter, so callers always get a [`Response`] back.

use tabula_proto::{Request, Response};
use tracing::{debug, instrument, warn};

use crate::config::ProcessorConfig;
use crate::error::Error;
use crate::model::{ModelRegistry, Record};

use super::page::page;
use super::search::SearchFilter;
use super::serialize::{serialize_row, RowHooks};
use super::sort::{resolve_sort_keys, sort_records};

/// Runs grid requests against record slices.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    config: ProcessorConfig,
}

impl Processor {
    /// Create a processor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with a validated configuration.
    pub fn with_config(config: ProcessorConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The processor's configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process a request, converting failures into an error response.
    ///
    /// # Panics
    ///
    /// Panics raised by caller code are not caught: a panicking row hook or
    /// field getter (including `Mappable::map_value`) unwinds through this call.
    #[instrument(skip_all, fields(draw = request.draw, records = records.len()))]
    pub fn process<T: Record, P>(
        &self,
        records: &[T],
        request: &Request<P>,
        hooks: &RowHooks<'_, T>,
    ) -> Response {
        match self.try_process(records, request, hooks) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, draw = request.draw, "Grid request failed");
                Response::error(request.draw, e.to_string())
            }
        }
    }

    /// Process a request, returning the first failure as an error.
    pub fn try_process<T: Record, P>(
        &self,
        records: &[T],
        request: &Request<P>,
        hooks: &RowHooks<'_, T>,
    ) -> Result<Response, Error> {
        let accessor = ModelRegistry::global().accessor::<T>();
        let total = records.len();

        let search = SearchFilter::compile(request, &self.config)?;
        let mut filtered: Vec<&T> = if search.has_global() {
            records
                .iter()
                .filter(|r| search.matches_global(*r, &accessor))
                .collect()
        } else {
            records.iter().collect()
        };
        debug!(total, remaining = filtered.len(), "Applied global search");

        if search.has_columns() {
            filtered.retain(|r| search.matches_columns(*r, &accessor));
            debug!(remaining = filtered.len(), "Applied column search");
        }
        let records_filtered = filtered.len();

        let keys = resolve_sort_keys(request)?;
        let ordered = sort_records(filtered, &keys, &accessor)?;
        debug!(keys = keys.len(), "Ordered records");

        let window = page(
            &ordered,
            request.start,
            request.length,
            self.config.allow_unbounded_length,
        )?;

        let data: Vec<_> = window
            .iter()
            .map(|record| serialize_row(*record, hooks, &accessor))
            .collect();
        debug!(
            total,
            filtered = records_filtered,
            returned = data.len(),
            "Processed grid request"
        );

        Ok(Response::ok(request.draw, data, total, records_filtered))
    }

    /// Parse a JSON request, process it and serialize the response.
    ///
    /// Only malformed request or response JSON is reported as an error;
    /// processing failures are encoded in the response.
    pub fn process_json<T: Record>(
        &self,
        records: &[T],
        request_json: &str,
        hooks: &RowHooks<'_, T>,
    ) -> Result<String, Error> {
        let request: Request = Request::from_json(request_json)?;
        let response = self.process(records, &request, hooks);
        Ok(response.to_json()?)
    }
}

/// Process a request with the default configuration and no row hooks.
pub fn process<T: Record, P>(records: &[T], request: &Request<P>) -> Response {
    Processor::default().process(records, request, &RowHooks::new())
}
