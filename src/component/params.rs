use crate::dispatch::{WebRequest, WebResponse};

/// What a handler may return; errors are absorbed and logged by the
/// dispatcher, never propagated past its boundary.
pub type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// The formal-parameter shape of a route handler, declared per position.
///
/// At dispatch time each spec is synthesized into one [`ArgValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// The live transport request object.
    Request,
    /// The live transport response object.
    Response,
    /// A textual value drawn from the request parameter map. The carried
    /// name is only consulted by the name-matching binding strategy; the
    /// default strategy ignores it (see `ParamBinding`).
    Text { name: Option<String> },
    /// Any other formal type; left absent.
    Other,
}

impl ParamSpec {
    pub fn text(name: &str) -> Self {
        Self::Text {
            name: Some(name.to_string()),
        }
    }

    pub fn text_unnamed() -> Self {
        Self::Text { name: None }
    }
}

/// One synthesized argument.
pub enum ArgValue<'a> {
    Request(&'a WebRequest),
    Response(&'a WebResponse),
    Text(Option<String>),
    Absent,
}

/// The positional arguments a handler receives, one per [`ParamSpec`].
pub struct Args<'a> {
    values: Vec<ArgValue<'a>>,
}

impl<'a> Args<'a> {
    pub fn new(values: Vec<ArgValue<'a>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The textual value at `index`, if that position is textual and bound.
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.values.get(index) {
            Some(ArgValue::Text(value)) => value.as_deref(),
            _ => None,
        }
    }

    pub fn request(&self, index: usize) -> Option<&'a WebRequest> {
        match self.values.get(index) {
            Some(ArgValue::Request(request)) => Some(request),
            _ => None,
        }
    }

    pub fn response(&self, index: usize) -> Option<&'a WebResponse> {
        match self.values.get(index) {
            Some(ArgValue::Response(response)) => Some(response),
            _ => None,
        }
    }
}
