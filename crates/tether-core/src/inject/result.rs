use std::collections::{BTreeMap, HashMap};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use log::Level;
use serde_json::Value;

use crate::component::manager::ReturnValue;
use crate::inject::error::CallbackError;
use crate::kernel::constants::EXCEPTION_KEY;
use crate::kernel::logger::ComponentLogger;

/// One entry of a method result map
#[derive(Clone)]
pub enum ResultEntry {
    /// A property returned by the callback
    Value(Value),
    /// A failure captured at the dispatch boundary
    Exception(Arc<dyn StdError + Send + Sync + 'static>),
}

impl fmt::Debug for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultEntry::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ResultEntry::Exception(e) => f.debug_tuple("Exception").field(&e.to_string()).finish(),
        }
    }
}

/// Typed outcome of a dispatched callback.
///
/// A "void" result means the callback has no return value. A non-void
/// result may carry a map; failure templates carry an empty map the
/// dispatcher writes the captured error into.
#[derive(Debug, Clone)]
pub struct MethodResult {
    void: bool,
    result: Option<HashMap<String, ResultEntry>>,
}

impl MethodResult {
    /// Result of a callback without return value
    pub fn void() -> Self {
        Self { void: true, result: None }
    }

    pub fn new(void: bool, result: Option<HashMap<String, ResultEntry>>) -> Self {
        Self { void, result }
    }

    /// Template whose map receives the captured error on failure
    pub fn failure_template() -> Self {
        Self {
            void: false,
            result: Some(HashMap::new()),
        }
    }

    pub fn from_return_value(value: ReturnValue) -> Self {
        match value {
            ReturnValue::Void => Self::void(),
            ReturnValue::Value(map) => Self {
                void: false,
                result: map.map(into_entries),
            },
        }
    }

    pub fn is_void(&self) -> bool {
        self.void
    }

    pub fn result(&self) -> Option<&HashMap<String, ResultEntry>> {
        self.result.as_ref()
    }

    pub fn result_mut(&mut self) -> Option<&mut HashMap<String, ResultEntry>> {
        self.result.as_mut()
    }

    /// Returned property values, skipping captured errors
    pub fn properties(&self) -> BTreeMap<String, Value> {
        self.result
            .iter()
            .flatten()
            .filter_map(|(k, v)| match v {
                ResultEntry::Value(value) => Some((k.clone(), value.clone())),
                ResultEntry::Exception(_) => None,
            })
            .collect()
    }

    /// Error captured by the dispatcher, if any
    pub fn exception(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self.result.as_ref()?.get(EXCEPTION_KEY)? {
            ResultEntry::Exception(e) => Some(e.as_ref()),
            ResultEntry::Value(_) => None,
        }
    }

    /// Store `error` under the exception key. Returns false when there is no map.
    pub fn record_exception(&mut self, error: Arc<dyn StdError + Send + Sync + 'static>) -> bool {
        match self.result.as_mut() {
            Some(map) => {
                map.insert(EXCEPTION_KEY.to_string(), ResultEntry::Exception(error));
                true
            }
            None => false,
        }
    }
}

fn into_entries(map: BTreeMap<String, Value>) -> HashMap<String, ResultEntry> {
    map.into_iter().map(|(k, v)| (k, ResultEntry::Value(v))).collect()
}

/// Turn a callback outcome into what the caller receives.
pub(crate) fn complete(
    outcome: Result<ReturnValue, CallbackError>,
    failure: Option<MethodResult>,
    logger: &dyn ComponentLogger,
    kind: &dyn fmt::Display,
    name: &str,
) -> Option<MethodResult> {
    match outcome {
        Ok(value) => Some(MethodResult::from_return_value(value)),
        Err(error) => {
            let error: Arc<dyn StdError + Send + Sync + 'static> = Arc::from(error);
            logger.log(
                Level::Error,
                format_args!("The {} method '{}' has thrown an exception", kind, name),
                Some(error.as_ref()),
            );
            failure.map(|mut template| {
                template.record_exception(error);
                template
            })
        }
    }
}
