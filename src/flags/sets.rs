//! Grouped flag sets
//!
//! A [`FlagSet`] is a named section of flags and holds configuration only.
//! [`FlagSets`] owns every registered section and performs the single parse
//! over all of them; sections never parse on their own.

use crate::error::{FlagError, FlagResult};
use crate::flags::binding::{BoolVar, DurationVar, Flag, StringVar};
use crate::flags::help::{write_flag_detail, write_flag_title};
use crate::flags::predict::Predictor;
use crate::ui::Ui;
use clap::{Arg, ArgAction, ColorChoice, Command};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Id of the catch-all positional argument
const POSITIONAL: &str = "__args";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A named section of flags, shown together in help
#[derive(Debug, Clone)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        FlagSet {
            name: name.into(),
            flags: Vec::new(),
        }
    }

    /// Section title used as the help heading
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flags in registration order
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn string_var(&mut self, var: StringVar) -> FlagResult<()> {
        self.check_unique(var.name())?;
        self.flags.push(Flag::from_string(var));
        Ok(())
    }

    pub fn bool_var(&mut self, var: BoolVar) -> FlagResult<()> {
        self.check_unique(var.name())?;
        self.flags.push(Flag::from_bool(var));
        Ok(())
    }

    pub fn duration_var(&mut self, var: DurationVar) -> FlagResult<()> {
        self.check_unique(var.name())?;
        self.flags.push(Flag::from_duration(var));
        Ok(())
    }

    fn check_unique(&self, name: &str) -> FlagResult<()> {
        if self.flags.iter().any(|f| f.name() == name) {
            return Err(FlagError::Redefined(name.to_string()));
        }
        Ok(())
    }
}

/// Forwards parser diagnostics to the UI error stream from a listener thread
struct Diagnostics {
    ui: Arc<dyn Ui>,
    sender: Mutex<Option<Sender<String>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Diagnostics {
    fn spawn(ui: Arc<dyn Ui>) -> Self {
        let (tx, rx) = mpsc::channel::<String>();
        let sink = Arc::clone(&ui);
        let spawned = thread::Builder::new()
            .name("flag-diagnostics".to_string())
            .spawn(move || {
                for line in rx {
                    sink.error(&line);
                }
            });

        match spawned {
            Ok(handle) => Diagnostics {
                ui,
                sender: Mutex::new(Some(tx)),
                listener: Mutex::new(Some(handle)),
            },
            Err(e) => {
                debug!("diagnostic listener unavailable, reporting inline: {}", e);
                Diagnostics {
                    ui,
                    sender: Mutex::new(None),
                    listener: Mutex::new(None),
                }
            }
        }
    }

    fn send(&self, line: &str) {
        let sender = lock(&self.sender);
        let delivered = match sender.as_ref() {
            Some(tx) => tx.send(line.to_string()).is_ok(),
            None => false,
        };
        if !delivered {
            self.ui.error(line);
        }
    }

    /// Close the channel and wait until every queued line has been written
    fn close(&self) {
        drop(lock(&self.sender).take());
        if let Some(handle) = lock(&self.listener).take() {
            if handle.join().is_err() {
                debug!("diagnostic listener panicked");
            }
        }
    }
}

impl Drop for Diagnostics {
    fn drop(&mut self) {
        self.close();
    }
}

/// Every flag section registered for one command, parsed together
pub struct FlagSets {
    flag_sets: Vec<FlagSet>,
    hidden: Mutex<BTreeSet<String>>,
    completions: BTreeMap<String, Predictor>,
    args: Mutex<Vec<String>>,
    diagnostics: Diagnostics,
}

impl FlagSets {
    /// Create an empty set whose parse errors are reported on `ui`
    pub fn new(ui: Arc<dyn Ui>) -> Self {
        FlagSets {
            flag_sets: Vec::with_capacity(6),
            hidden: Mutex::new(BTreeSet::new()),
            completions: BTreeMap::new(),
            args: Mutex::new(Vec::new()),
            diagnostics: Diagnostics::spawn(ui),
        }
    }

    /// Build a section with `register` and add it
    pub fn new_flag_set<F>(&mut self, name: &str, register: F) -> FlagResult<()>
    where
        F: FnOnce(&mut FlagSet) -> FlagResult<()>,
    {
        let mut set = FlagSet::new(name);
        register(&mut set)?;
        self.add_flag_set(set)
    }

    /// Register a section; flag names must be unique across all sections
    pub fn add_flag_set(&mut self, set: FlagSet) -> FlagResult<()> {
        for flag in set.flags() {
            if self.lookup(flag.name()).is_some() {
                return Err(FlagError::Redefined(flag.name().to_string()));
            }
        }
        for flag in set.flags() {
            self.completions
                .insert(format!("-{}", flag.name()), flag.completion().clone());
        }
        self.flag_sets.push(set);
        Ok(())
    }

    pub fn flag_sets(&self) -> &[FlagSet] {
        &self.flag_sets
    }

    /// Completion predictors keyed by `-name`
    pub fn completions(&self) -> &BTreeMap<String, Predictor> {
        &self.completions
    }

    fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flag_sets
            .iter()
            .flat_map(|set| set.flags())
            .find(|flag| flag.name() == name)
    }

    /// The clap command equivalent to these flags
    pub fn command(&self, name: &str) -> Command {
        let mut cmd = Command::new(name.to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .color(ColorChoice::Never)
            .arg(
                Arg::new(POSITIONAL)
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .hide(true),
            );

        for flag in self.flag_sets.iter().flat_map(|set| set.flags()) {
            let hidden = self.hidden_flag(flag.name());
            cmd = cmd.arg(flag.to_arg().hide(hidden));
        }
        cmd
    }

    /// Parse `args` into the bound targets
    ///
    /// On error the targets keep their previous values and the diagnostic is
    /// also written to the UI error stream.
    pub fn parse(&self, args: &[String]) -> FlagResult<()> {
        let normalized = self.normalize_args(args);
        debug!(?normalized, "parsing flags");

        let matches = match self.command("vault").try_get_matches_from(normalized) {
            Ok(matches) => matches,
            Err(err) => {
                let message = diagnostic_text(&err.to_string());
                for line in message.lines() {
                    self.diagnostics.send(line);
                }
                return Err(FlagError::Parse(message));
            }
        };

        for flag in self.flag_sets.iter().flat_map(|set| set.flags()) {
            flag.apply(&matches);
        }

        let positional = matches
            .get_many::<String>(POSITIONAL)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        *lock(&self.args) = positional;
        Ok(())
    }

    /// Positional arguments left after the last parse
    pub fn args(&self) -> Vec<String> {
        lock(&self.args).clone()
    }

    /// Exclude a flag from help while still accepting it
    pub fn hide_flag(&self, name: &str) {
        lock(&self.hidden).insert(name.to_string());
    }

    pub fn hidden_flag(&self, name: &str) -> bool {
        lock(&self.hidden).contains(name)
    }

    /// Flush pending diagnostics to the UI
    ///
    /// Returns once every line produced by earlier parses has been written.
    pub fn close(&self) {
        self.diagnostics.close();
    }

    /// Help text grouped by section, in registration order
    pub fn help(&self) -> String {
        let mut out = String::new();
        for set in &self.flag_sets {
            write_flag_title(&mut out, &format!("{}:", set.name()));
            for flag in set.flags() {
                if self.hidden_flag(flag.name()) {
                    continue;
                }
                write_flag_detail(&mut out, flag);
            }
        }
        out.trim_end_matches('\n').to_string()
    }

    /// Rewrite single-dash flags into the form clap expects
    ///
    /// Flags end at `--` or at the first non-flag token; everything after that
    /// is positional and is passed through behind `--`. Values given as a
    /// separate token are attached with `=` so that values starting with a
    /// dash are accepted.
    fn normalize_args(&self, args: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(args.len() + 1);
        let mut rest: &[String] = &[];

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg == "--" {
                rest = &args[i + 1..];
                break;
            }
            if arg == "-" || !arg.starts_with('-') {
                rest = &args[i..];
                break;
            }

            let body = arg.strip_prefix("--").unwrap_or(&arg[1..]);
            match body.split_once('=') {
                Some((name, value)) => out.push(format!("--{}={}", name, value)),
                None => {
                    let takes_value = self.lookup(body).is_some_and(|f| !f.is_bool());
                    if takes_value && i + 1 < args.len() {
                        out.push(format!("--{}={}", body, args[i + 1]));
                        i += 1;
                    } else {
                        out.push(format!("--{}", body));
                    }
                }
            }
            i += 1;
        }

        if !rest.is_empty() {
            out.push("--".to_string());
            out.extend(rest.iter().cloned());
        }
        out
    }
}

/// First paragraph of a clap error, spelled with single-dash flag names
fn diagnostic_text(rendered: &str) -> String {
    let text = rendered
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.strip_prefix("error: ").unwrap_or(&text);
    text.replace("'--", "'-")
}
