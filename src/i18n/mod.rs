//! Message formatting.
//!
//! # Design Decisions
//! - Formatting behavior is fixed at construction; nothing mutates a
//!   shared helper after the fact
//! - Named placeholders are an opt-in capability, not a runtime patch
//! - Template errors are typed, never silently swallowed

use crate::config::schema::I18nConfig;
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while rendering a message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// `format_named` was called on a formatter built without extended
    /// placeholders.
    #[error("named placeholders are disabled for this formatter")]
    ExtendedDisabled,

    /// A named placeholder has no entry in the argument map.
    #[error("unknown placeholder {name:?}")]
    UnknownPlaceholder { name: String },

    /// More `{}` placeholders than positional arguments.
    #[error("template needs at least {needed} positional arguments, got {got}")]
    MissingArgument { needed: usize, got: usize },

    /// A `{` or `}` without a partner.
    #[error("unbalanced braces in template")]
    UnbalancedBraces,
}

/// Construction options for [`MessageFormatter`].
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Allow `{name}` placeholders resolved from an argument map.
    pub extended_placeholders: bool,

    /// Locale tag attached to formatted output contexts.
    pub locale: String,
}

/// Renders message templates with positional and (optionally) named
/// placeholders.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    extended: bool,
    locale: String,
}

impl MessageFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            extended: options.extended_placeholders,
            locale: options.locale,
        }
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(FormatOptions {
            extended_placeholders: config.extended_placeholders,
            locale: config.locale.clone(),
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn extended_placeholders(&self) -> bool {
        self.extended
    }

    /// Render a template with positional `{}` placeholders. `{{` and `}}`
    /// escape literal braces.
    pub fn format(&self, template: &str, args: &[&str]) -> Result<String, FormatError> {
        self.render(template, args, None)
    }

    /// Render a template with named `{name}` placeholders. Only available
    /// when extended placeholders were enabled at construction.
    pub fn format_named(
        &self,
        template: &str,
        args: &HashMap<&str, String>,
    ) -> Result<String, FormatError> {
        if !self.extended {
            return Err(FormatError::ExtendedDisabled);
        }
        self.render(template, &[], Some(args))
    }

    fn render(
        &self,
        template: &str,
        positional: &[&str],
        named: Option<&HashMap<&str, String>>,
    ) -> Result<String, FormatError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        let mut next_positional = 0usize;

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        out.push('{');
                        continue;
                    }

                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(inner) => name.push(inner),
                            None => return Err(FormatError::UnbalancedBraces),
                        }
                    }

                    if name.is_empty() {
                        match positional.get(next_positional) {
                            Some(arg) => {
                                out.push_str(arg);
                                next_positional += 1;
                            }
                            None => {
                                return Err(FormatError::MissingArgument {
                                    needed: next_positional + 1,
                                    got: positional.len(),
                                });
                            }
                        }
                    } else {
                        let value = named
                            .and_then(|map| map.get(name.as_str()))
                            .ok_or(FormatError::UnknownPlaceholder { name })?;
                        out.push_str(value);
                    }
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        out.push('}');
                    } else {
                        return Err(FormatError::UnbalancedBraces);
                    }
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}
