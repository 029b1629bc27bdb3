//! `$(arg NAME)` and `$(env NAME)` expansion for URL templates

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Matches `$(kind name)`; a bare `$(kind)` is captured so it can be rejected
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\((\w+)(?:\s+([^)]*))?\)").expect("valid placeholder regex"));

/// Nested placeholders are expanded at most this many times
const MAX_PASSES: usize = 10;

/// Values available to placeholders in a launch file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionContext {
    /// Declared launch file arguments, after command-line overrides
    pub args: HashMap<String, String>,
    /// File-level environment, consulted before the process environment
    pub env: HashMap<String, String>,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn with_args(mut self, args: HashMap<String, String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn with_envs(mut self, envs: HashMap<String, String>) -> Self {
        self.env.extend(envs);
        self
    }

    /// Expand every placeholder in `input`, following nested references
    pub fn substitute(&self, input: &str) -> Result<String, SubstitutionError> {
        let mut current = input.to_string();

        for _ in 0..MAX_PASSES {
            if !PLACEHOLDER.is_match(&current) {
                return Ok(current);
            }
            current = self.expand_once(&current)?;
        }

        if PLACEHOLDER.is_match(&current) {
            return Err(SubstitutionError::TooDeep(input.to_string()));
        }
        Ok(current)
    }

    fn expand_once(&self, input: &str) -> Result<String, SubstitutionError> {
        let mut out = String::with_capacity(input.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(input) {
            let whole = caps.get(0).ok_or_else(|| SubstitutionError::Malformed(input.to_string()))?;
            out.push_str(&input[last..whole.start()]);

            let kind = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let name = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            if name.is_empty() {
                return Err(SubstitutionError::Malformed(whole.as_str().to_string()));
            }

            out.push_str(&self.lookup(kind, name)?);
            last = whole.end();
        }

        out.push_str(&input[last..]);
        Ok(out)
    }

    fn lookup(&self, kind: &str, name: &str) -> Result<String, SubstitutionError> {
        match kind {
            "arg" => self
                .args
                .get(name)
                .cloned()
                .ok_or_else(|| SubstitutionError::UndefinedArg(name.to_string())),
            "env" => match self.env.get(name) {
                Some(value) => Ok(value.clone()),
                None => std::env::var(name)
                    .map_err(|_| SubstitutionError::UndefinedEnv(name.to_string())),
            },
            other => Err(SubstitutionError::UnknownType(other.to_string())),
        }
    }
}

/// Errors that can occur during substitution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubstitutionError {
    #[error("Unknown substitution type: {0}")]
    UnknownType(String),

    #[error("Undefined argument: {0}")]
    UndefinedArg(String),

    #[error("Undefined environment variable: {0}")]
    UndefinedEnv(String),

    #[error("Malformed substitution: {0}")]
    Malformed(String),

    #[error("Substitution nested too deeply in: {0}")]
    TooDeep(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_in_url() {
        let ctx = SubstitutionContext::new().with_arg("port", "8081");
        let url = ctx.substitute("http://localhost:$(arg port)/").unwrap();
        assert_eq!(url, "http://localhost:8081/");
    }

    #[test]
    fn test_file_env_wins_over_process_env() {
        let ctx = SubstitutionContext::new().with_env("PATH", "overridden");
        assert_eq!(ctx.substitute("$(env PATH)").unwrap(), "overridden");
    }

    #[test]
    fn test_undefined_env() {
        let ctx = SubstitutionContext::new();
        let err = ctx
            .substitute("$(env BROWSER_LAUNCH_SURELY_UNSET_VARIABLE)")
            .unwrap_err();
        assert!(matches!(err, SubstitutionError::UndefinedEnv(_)));
    }

    #[test]
    fn test_unknown_kind_and_bare_placeholder() {
        let ctx = SubstitutionContext::new();
        assert!(matches!(
            ctx.substitute("$(timestamp x)"),
            Err(SubstitutionError::UnknownType(_))
        ));
        assert!(matches!(
            ctx.substitute("$(arg)"),
            Err(SubstitutionError::Malformed(_))
        ));
    }

    #[test]
    fn test_nested() {
        let ctx = SubstitutionContext::new()
            .with_arg("base", "http://$(arg host):$(arg port)")
            .with_arg("host", "127.0.0.1")
            .with_arg("port", "3000");
        assert_eq!(
            ctx.substitute("$(arg base)/health").unwrap(),
            "http://127.0.0.1:3000/health"
        );
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let ctx = SubstitutionContext::new().with_arg("loop", "$(arg loop)");
        assert!(matches!(
            ctx.substitute("$(arg loop)"),
            Err(SubstitutionError::TooDeep(_))
        ));
    }

    #[test]
    fn test_plain_text_untouched() {
        let ctx = SubstitutionContext::new().with_arg("p", "1");
        assert_eq!(ctx.substitute("http://a/").unwrap(), "http://a/");
        assert_eq!(ctx.substitute("http://b:$(arg p)").unwrap(), "http://b:1");
    }
}
