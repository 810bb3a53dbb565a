//! Option bindings
//!
//! A binding ties one named flag to a storage cell owned by the command, plus
//! its default, the environment variable that may override that default, a
//! completion predictor and the usage text shown in help.

use crate::flags::duration::{format_duration, parse_bool, parse_duration};
use crate::flags::predict::Predictor;
use clap::{Arg, ArgAction, ArgMatches};
use std::env;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::trace;

/// Shared storage cell that parsing writes resolved values into
pub struct Target<T>(Arc<RwLock<T>>);

impl<T: Clone> Target<T> {
    pub fn new(value: T) -> Self {
        Target(Arc::new(RwLock::new(value)))
    }

    /// Current value
    pub fn get(&self) -> T {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, value: T) {
        match self.0.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl<T> Clone for Target<T> {
    fn clone(&self) -> Self {
        Target(Arc::clone(&self.0))
    }
}

impl<T: Clone + Default> Default for Target<T> {
    fn default() -> Self {
        Target::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Target").field(&self.get()).finish()
    }
}

/// Bindings that can show a placeholder in help, rendered as `-name=<example>`
pub trait FlagExample {
    fn example(&self) -> Option<&str>;
}

/// A string-valued flag
pub struct StringVar {
    name: String,
    target: Target<String>,
    default: String,
    env_var: String,
    example: Option<String>,
    completion: Predictor,
    usage: String,
}

impl StringVar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new(name: impl Into<String>, target: &Target<String>) -> Self {
        StringVar {
            name: name.into(),
            target: target.clone(),
            default: String::new(),
            env_var: String::new(),
            example: None,
            completion: Predictor::Anything,
            usage: String::new(),
        }
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }

    /// Environment variable consulted before the command line
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn completion(mut self, completion: Predictor) -> Self {
        self.completion = completion;
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

impl FlagExample for StringVar {
    fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }
}

/// A boolean flag; a bare `-name` means true
pub struct BoolVar {
    name: String,
    target: Target<bool>,
    default: bool,
    env_var: String,
    completion: Predictor,
    usage: String,
}

impl BoolVar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new(name: impl Into<String>, target: &Target<bool>) -> Self {
        BoolVar {
            name: name.into(),
            target: target.clone(),
            default: false,
            env_var: String::new(),
            completion: Predictor::Nothing,
            usage: String::new(),
        }
    }

    pub fn default(mut self, value: bool) -> Self {
        self.default = value;
        self
    }

    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    pub fn completion(mut self, completion: Predictor) -> Self {
        self.completion = completion;
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

/// A duration flag such as `30s` or `5m`
pub struct DurationVar {
    name: String,
    target: Target<Duration>,
    default: Duration,
    env_var: String,
    example: Option<String>,
    completion: Predictor,
    usage: String,
}

impl DurationVar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new(name: impl Into<String>, target: &Target<Duration>) -> Self {
        DurationVar {
            name: name.into(),
            target: target.clone(),
            default: Duration::ZERO,
            env_var: String::new(),
            example: None,
            completion: Predictor::Anything,
            usage: String::new(),
        }
    }

    pub fn default(mut self, value: Duration) -> Self {
        self.default = value;
        self
    }

    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env_var = var.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn completion(mut self, completion: Predictor) -> Self {
        self.completion = completion;
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

impl FlagExample for DurationVar {
    fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }
}

/// Value of an environment variable, if one is named and set
fn lookup_env(var: &str) -> Option<String> {
    if var.is_empty() {
        return None;
    }
    env::var(var).ok()
}

/// Typed storage behind a registered flag, holding the effective default
#[derive(Debug, Clone)]
pub(crate) enum FlagValue {
    String {
        target: Target<String>,
        default: String,
    },
    Bool {
        target: Target<bool>,
        default: bool,
    },
    Duration {
        target: Target<Duration>,
        default: Duration,
    },
}

/// A binding after registration: environment resolved, target seeded
#[derive(Debug, Clone)]
pub struct Flag {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) example: Option<String>,
    pub(crate) completion: Predictor,
    pub(crate) value: FlagValue,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn completion(&self) -> &Predictor {
        &self.completion
    }

    /// Whether the flag is a bare switch
    pub fn is_bool(&self) -> bool {
        matches!(self.value, FlagValue::Bool { .. })
    }

    pub(crate) fn from_string(var: StringVar) -> Self {
        let example = FlagExample::example(&var).map(str::to_string);
        let default = match lookup_env(&var.env_var) {
            Some(v) => {
                trace!(flag = %var.name, env = %var.env_var, "default taken from environment");
                v
            }
            None => var.default,
        };
        var.target.set(default.clone());

        Flag {
            name: var.name,
            usage: var.usage,
            example,
            completion: var.completion,
            value: FlagValue::String {
                target: var.target,
                default,
            },
        }
    }

    pub(crate) fn from_bool(var: BoolVar) -> Self {
        // Unparseable environment values leave the static default in place.
        let default = lookup_env(&var.env_var)
            .and_then(|v| parse_bool(&v).ok())
            .unwrap_or(var.default);
        var.target.set(default);

        Flag {
            name: var.name,
            usage: var.usage,
            example: None,
            completion: var.completion,
            value: FlagValue::Bool {
                target: var.target,
                default,
            },
        }
    }

    pub(crate) fn from_duration(var: DurationVar) -> Self {
        let example = FlagExample::example(&var).map(str::to_string);
        let default = lookup_env(&var.env_var)
            .and_then(|v| parse_duration(&v).ok())
            .unwrap_or(var.default);
        var.target.set(default);

        Flag {
            name: var.name,
            usage: var.usage,
            example,
            completion: var.completion,
            value: FlagValue::Duration {
                target: var.target,
                default,
            },
        }
    }

    /// The clap argument that parses this flag
    pub(crate) fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .value_name(self.name.clone())
            .help(self.usage.clone())
            .value_hint(self.completion.value_hint());

        match &self.value {
            FlagValue::String { default, .. } => arg
                .action(ArgAction::Set)
                .num_args(1)
                .default_value(default.clone()),
            FlagValue::Bool { default, .. } => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .default_value(if *default { "true" } else { "false" })
                .value_parser(parse_bool),
            FlagValue::Duration { default, .. } => arg
                .action(ArgAction::Set)
                .num_args(1)
                .default_value(format_duration(*default))
                .value_parser(parse_duration),
        }
    }

    /// Write the parsed value into the target
    pub(crate) fn apply(&self, matches: &ArgMatches) {
        match &self.value {
            FlagValue::String { target, default } => {
                let value = matches
                    .get_one::<String>(&self.name)
                    .cloned()
                    .unwrap_or_else(|| default.clone());
                target.set(value);
            }
            FlagValue::Bool { target, default } => {
                let value = matches.get_one::<bool>(&self.name).copied();
                target.set(value.unwrap_or(*default));
            }
            FlagValue::Duration { target, default } => {
                let value = matches.get_one::<Duration>(&self.name).copied();
                target.set(value.unwrap_or(*default));
            }
        }
    }
}
