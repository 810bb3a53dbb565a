//! Main CLI application

use crate::command::{BaseCommand, Command, PrintConfigCommand, PrintTokenCommand};
use crate::token::{default_token_helper, TokenHelperFunc};
use crate::ui::Ui;
use clap_complete::Shell;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::sync::Arc;
use tracing::debug;

/// Exit code for an unknown command
pub const EXIT_UNKNOWN_COMMAND: i32 = 127;

type CommandFactory = Box<dyn Fn(Arc<dyn Ui>) -> Box<dyn Command> + Send + Sync>;

/// CLI application
pub struct App {
    ui: Arc<dyn Ui>,
    commands: BTreeMap<String, CommandFactory>,
}

impl App {
    /// Create an app with the built-in commands
    pub fn new(ui: Arc<dyn Ui>) -> Self {
        let token_helper: TokenHelperFunc = Arc::new(default_token_helper);
        Self::with_token_helper(ui, token_helper)
    }

    /// Create an app whose commands consult `token_helper`
    pub fn with_token_helper(ui: Arc<dyn Ui>, token_helper: TokenHelperFunc) -> Self {
        let mut app = App {
            ui,
            commands: BTreeMap::new(),
        };

        let helper = Arc::clone(&token_helper);
        app.register(
            "print token",
            Box::new(move |ui: Arc<dyn Ui>| -> Box<dyn Command> {
                let base = BaseCommand::new(ui).with_token_helper(Arc::clone(&helper));
                Box::new(PrintTokenCommand::new(base))
            }),
        );

        let helper = Arc::clone(&token_helper);
        app.register(
            "print config",
            Box::new(move |ui: Arc<dyn Ui>| -> Box<dyn Command> {
                let base = BaseCommand::new(ui).with_token_helper(Arc::clone(&helper));
                Box::new(PrintConfigCommand::new(base))
            }),
        );

        app
    }

    /// Add a command under a space-separated name such as `print token`
    pub fn register(&mut self, name: &str, factory: CommandFactory) {
        self.commands.insert(name.to_string(), factory);
    }

    /// Run with the arguments after the program name; returns the exit code
    pub fn run(&self, args: &[String]) -> i32 {
        let Some(first) = args.first() else {
            self.ui.error(&self.usage());
            return EXIT_UNKNOWN_COMMAND;
        };

        if is_help_flag(first) {
            self.ui.error(&self.usage());
            return 0;
        }

        if first == "completion" {
            return self.completion(&args[1..]);
        }

        let Some((name, rest)) = self.find_command(args) else {
            self.ui.error(&self.usage());
            return EXIT_UNKNOWN_COMMAND;
        };
        debug!(command = %name, "dispatching");

        let Some(factory) = self.commands.get(&name) else {
            return EXIT_UNKNOWN_COMMAND;
        };
        let command = factory(Arc::clone(&self.ui));

        if wants_help(rest) {
            self.ui.error(&command.help());
            return 0;
        }

        command.run(rest)
    }

    /// Longest registered name that prefixes `args`
    fn find_command<'a>(&self, args: &'a [String]) -> Option<(String, &'a [String])> {
        (1..=args.len()).rev().find_map(|n| {
            let name = args[..n].join(" ");
            self.commands
                .contains_key(&name)
                .then_some((name, &args[n..]))
        })
    }

    /// List of available commands
    pub fn usage(&self) -> String {
        let mut names: Vec<(String, String)> = self
            .commands
            .iter()
            .map(|(name, factory)| (name.clone(), factory(Arc::clone(&self.ui)).synopsis()))
            .collect();
        names.push((
            "completion".to_string(),
            "Generate a shell completion script".to_string(),
        ));
        names.sort();

        let width = names.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let mut out = String::from("Usage: vault <command> [args]\n\nAvailable commands:\n");
        for (name, synopsis) in names {
            out.push_str(&format!("    {:<width$}    {}\n", name, synopsis, width = width));
        }
        out.trim_end().to_string()
    }

    /// Clap command tree mirroring the registered commands and their flags
    pub fn clap_command(&self) -> clap::Command {
        let mut root = clap::Command::new("vault");
        for (name, factory) in &self.commands {
            let command = factory(Arc::clone(&self.ui));
            let words: Vec<&str> = name.split(' ').collect();
            let leaf_name = words.last().copied().unwrap_or_default();
            let leaf = match command.flags() {
                Some(flags) => flags.command(leaf_name).no_binary_name(false),
                None => clap::Command::new(leaf_name.to_string()),
            }
            .about(command.synopsis());
            root = insert_subcommand(root, &words[..words.len().saturating_sub(1)], leaf);
        }
        root
    }

    fn completion(&self, args: &[String]) -> i32 {
        let [shell_name] = args else {
            self.ui.error("Usage: vault completion <bash|elvish|fish|powershell|zsh>");
            return 1;
        };
        let shell: Shell = match shell_name.parse() {
            Ok(shell) => shell,
            Err(e) => {
                self.ui.error(&format!("Unknown shell {:?}: {}", shell_name, e));
                return 1;
            }
        };

        let mut cmd = self.clap_command();
        let mut script = Vec::new();
        clap_complete::generate(shell, &mut cmd, "vault", &mut script);
        self.ui.output_raw(&String::from_utf8_lossy(&script));
        0
    }
}

/// Command-line arguments as UTF-8, or the first argument that is not
pub fn utf8_args<I>(args: I) -> Result<Vec<String>, OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter().map(OsString::into_string).collect()
}

/// Nest `leaf` under the chain of parent command names
fn insert_subcommand(root: clap::Command, parents: &[&str], leaf: clap::Command) -> clap::Command {
    let Some((first, rest)) = parents.split_first() else {
        return root.subcommand(leaf);
    };

    if root.find_subcommand(first).is_some() {
        root.mut_subcommand(*first, |sub| insert_subcommand(sub, rest, leaf))
    } else {
        let parent = insert_subcommand(clap::Command::new(first.to_string()), rest, leaf);
        root.subcommand(parent)
    }
}

fn is_help_flag(arg: &str) -> bool {
    matches!(arg, "-h" | "-help" | "--help")
}

/// Help requested anywhere before a `--` terminator
fn wants_help(args: &[String]) -> bool {
    args.iter()
        .take_while(|a| a.as_str() != "--")
        .any(|a| is_help_flag(a))
}
