//! Per-request declaration context.
//!
//! [`ParamContext`] borrows a request's [`ParamMap`] together with what the
//! host knows about the response (its content type and an optional JSON
//! encoder) and runs declarations against it.

use parmenides_core::{
    blank, coerce, present, validate, EngineSettings, JsonEncoder, ParamError, ParamOptions,
    ParamValue, TargetType,
};
use parmenides_telemetry::{log_param_accepted, log_param_rejected, log_params_exclusive};
use tracing::debug;

use crate::{is_json_compatible, ParamMap, Rejection};

/// Runs parameter declarations against one request's parameters.
///
/// Each successful [`param`](Self::param) call writes the normalized value
/// back into the map, so later declarations and the handler see it. A failed
/// call leaves the entry untouched and returns a [`Rejection`].
///
/// # Example
///
/// ```rust
/// use parmenides_core::{ParamOptions, ParamValue, TargetType};
/// use parmenides_extract::{ParamContext, ParamMap};
///
/// let mut params = ParamMap::from_urlencoded("limit=25").unwrap();
/// let mut ctx = ParamContext::new(&mut params).with_content_type("application/json");
///
/// ctx.param("limit", TargetType::Integer, &ParamOptions::new().within(1..=100)).unwrap();
///
/// let err = ctx
///     .param("page", TargetType::Integer, &ParamOptions::new().required())
///     .unwrap_err();
/// assert_eq!(err.body(), r#"{"message":"Parameter page is required."}"#);
///
/// assert_eq!(params.get("limit"), Some(&ParamValue::Integer(25)));
/// ```
pub struct ParamContext<'a> {
    params: &'a mut ParamMap,
    content_type: Option<String>,
    encoder: Option<&'a dyn JsonEncoder>,
    settings: EngineSettings,
}

impl<'a> ParamContext<'a> {
    /// Creates a context with default settings and no response content type.
    pub fn new(params: &'a mut ParamMap) -> Self {
        Self {
            params,
            content_type: None,
            encoder: None,
            settings: EngineSettings::default(),
        }
    }

    /// Sets the negotiated response content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the encoder used for JSON error bodies.
    #[must_use]
    pub fn with_json_encoder(mut self, encoder: &'a dyn JsonEncoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Replaces the engine settings.
    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The parameters, including values committed so far.
    #[must_use]
    pub fn params(&self) -> &ParamMap {
        self.params
    }

    /// Declares parameter `name` as `target` with `options`.
    ///
    /// Optional parameters that are missing and have no default are skipped
    /// without touching the map. Otherwise the value is coerced, defaulted,
    /// transformed and validated, then written back.
    pub fn param(
        &mut self,
        name: &str,
        target: TargetType,
        options: &ParamOptions,
    ) -> Result<(), Rejection> {
        if !self.is_eligible(name, options) {
            debug!(parameter = name, "skipping absent optional parameter");
            return Ok(());
        }

        match self.resolve(name, target, options) {
            Ok(value) => {
                log_param_accepted!(name, target);
                self.params.set(name, value);
                Ok(())
            }
            Err(error) => {
                log_param_rejected!(name, target, error.kind().as_str());
                Err(Rejection::from_param_error(
                    name,
                    &error,
                    self.renders_json(),
                    self.encoder,
                ))
            }
        }
    }

    /// Rejects the request when more than one of `names` is present.
    ///
    /// Missing and blank parameters do not count. The map is not modified.
    pub fn one_of(&self, names: &[&str]) -> Result<(), Rejection> {
        let mut count = 0usize;
        for name in names {
            if present(self.params.get(name)) {
                count += 1;
            }
            if count > 1 {
                log_params_exclusive!(names);
                return Err(Rejection::mutually_exclusive(
                    names,
                    self.renders_json(),
                    self.encoder,
                ));
            }
        }
        Ok(())
    }

    fn is_eligible(&self, name: &str, options: &ParamOptions) -> bool {
        self.params.contains(name) || present(options.default_value()) || options.is_required()
    }

    fn resolve(
        &self,
        name: &str,
        target: TargetType,
        options: &ParamOptions,
    ) -> Result<Option<ParamValue>, ParamError> {
        let mut value = coerce(self.params.get(name), target, options, &self.settings)?;

        if let Some(default) = options.default_value() {
            let substitute = value.is_none()
                || (self.settings.default_on_blank && blank(value.as_ref()));
            if substitute {
                debug!(parameter = name, "substituting default");
                value = Some(default.clone());
            }
        }

        if let Some(transform) = options.transform_op() {
            value = value.map(|current| transform.apply(current)).transpose()?;
        }

        validate(value.as_ref(), options)?;
        Ok(value)
    }

    fn renders_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| {
                is_json_compatible(content_type, &self.settings.json_content_types)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parmenides_core::NamedTransform;

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_absent_optional_is_untouched() {
        let mut map = ParamMap::new();
        let mut ctx = ParamContext::new(&mut map);
        ctx.param("q", TargetType::String, &ParamOptions::new()).unwrap();
        assert!(!map.contains("q"));
    }

    #[test]
    fn test_required_missing_json() {
        let mut map = ParamMap::new();
        let mut ctx = ParamContext::new(&mut map).with_content_type("application/json");
        let err = ctx
            .param("arg", TargetType::Integer, &ParamOptions::new().required())
            .unwrap_err();
        assert_eq!(err.body(), r#"{"message":"Parameter arg is required."}"#);
    }

    #[test]
    fn test_min_violation_text() {
        let mut map = params(&[("arg", "7")]);
        let mut ctx = ParamContext::new(&mut map);
        let err = ctx
            .param("arg", TargetType::Integer, &ParamOptions::new().min(12))
            .unwrap_err();
        assert_eq!(err.body(), "Parameter arg less than 12");
        assert_eq!(map.get("arg"), Some(&ParamValue::from("7")));
    }

    #[test]
    fn test_null_takes_default() {
        let mut map = ParamMap::new();
        map.insert_null("sort");
        let mut ctx = ParamContext::new(&mut map);
        ctx.param("sort", TargetType::String, &ParamOptions::new().default("title"))
            .unwrap();
        assert_eq!(map.get("sort"), Some(&ParamValue::from("title")));
    }

    #[test]
    fn test_empty_text_keeps_value_unless_configured() {
        let options = ParamOptions::new().default("title");

        let mut map = params(&[("sort", "")]);
        ParamContext::new(&mut map)
            .param("sort", TargetType::String, &options)
            .unwrap();
        assert_eq!(map.get("sort"), Some(&ParamValue::from("")));

        let settings = EngineSettings {
            default_on_blank: true,
            ..EngineSettings::default()
        };
        let mut map = params(&[("sort", "")]);
        ParamContext::new(&mut map)
            .with_settings(settings)
            .param("sort", TargetType::String, &options)
            .unwrap();
        assert_eq!(map.get("sort"), Some(&ParamValue::from("title")));
    }

    #[test]
    fn test_default_is_transformed() {
        let mut map = ParamMap::new();
        let options = ParamOptions::new()
            .default("asc")
            .transform(NamedTransform::Upcase)
            .in_set(["ASC", "DESC"]);
        ParamContext::new(&mut map)
            .param("order", TargetType::String, &options)
            .unwrap();
        assert_eq!(map.get("order"), Some(&ParamValue::from("ASC")));
    }

    #[test]
    fn test_false_default_is_applied() {
        let mut map = ParamMap::new();
        ParamContext::new(&mut map)
            .param("flag", TargetType::Boolean, &ParamOptions::new().default(false))
            .unwrap();
        assert_eq!(map.get("flag"), Some(&ParamValue::Boolean(false)));
    }

    #[test]
    fn test_writes_visible_to_later_declarations() {
        let mut map = params(&[("a", "3")]);
        let mut ctx = ParamContext::new(&mut map);
        ctx.param("a", TargetType::Integer, &ParamOptions::new()).unwrap();
        assert_eq!(ctx.params().get("a"), Some(&ParamValue::Integer(3)));
        ctx.param("a", TargetType::Float, &ParamOptions::new()).unwrap();
        assert_eq!(ctx.params().get("a"), Some(&ParamValue::Float(3.0)));
    }

    #[test]
    fn test_one_of() {
        let mut map = params(&[("a", "1"), ("b", ""), ("c", "")]);
        let ctx = ParamContext::new(&mut map);
        assert!(ctx.one_of(&["a", "b", "c"]).is_ok());

        let mut map = params(&[("a", "1"), ("b", "2")]);
        let ctx = ParamContext::new(&mut map);
        let err = ctx.one_of(&["a", "b", "c"]).unwrap_err();
        assert_eq!(err.body(), "Parameters a, b, c are mutually exclusive");
    }

    #[test]
    fn test_coerced_value_committed_without_transform() {
        let mut map = params(&[("arg", "1234"), ("tags", "a,b,c")]);
        let mut ctx = ParamContext::new(&mut map);
        ctx.param("arg", TargetType::Integer, &ParamOptions::new()).unwrap();
        let err = ctx
            .param("tags", TargetType::Array, &ParamOptions::new().max_length(2))
            .unwrap_err();
        assert_eq!(err.body(), "Parameter tags length more than 2");
        assert_eq!(map.get("arg"), Some(&ParamValue::Integer(1234)));
    }

    #[test]
    fn test_one_of_counts_false_as_present() {
        let mut map = ParamMap::new();
        map.insert("a", false);
        map.insert("b", true);
        let err = ParamContext::new(&mut map).one_of(&["a", "b"]).unwrap_err();
        assert_eq!(err.body(), "Parameters a, b are mutually exclusive");
    }

    #[test]
    fn test_one_of_none_present() {
        let mut map = ParamMap::new();
        assert!(ParamContext::new(&mut map).one_of(&["a", "b"]).is_ok());
    }
}
