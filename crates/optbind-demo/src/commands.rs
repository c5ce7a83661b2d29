//! The demo's sub-commands. Each one parses its own arguments with an
//! [`Options`] container and prints to stdout.

use anyhow::{bail, Context, Result};
use optbind::command::CommandRegistry;
use optbind::{
    convert, help, ArgumentDescriptor, CommonOptions, Declaration, DefinitionError,
    OptionDescriptor, Options, TableInfo,
};
use tracing::info;

pub const PROGRAM: &str = "optbind-demo";

pub type Outcome = Result<()>;

pub fn registry() -> CommandRegistry<Outcome> {
    let mut registry = CommandRegistry::new();
    registry
        .register("greet", "Greet someone, possibly more than once", greet)
        .register("sum", "Add up numbers", sum)
        .register("describe", "Print a command's options as JSON", describe)
        .register("help", "Show help for a command", show_help);
    registry
}

/// Top-level usage, printed when no command is given.
pub fn overview() -> Vec<String> {
    let mut out = vec![
        format!("Usage: {PROGRAM} <COMMAND> [options]"),
        String::new(),
        "Commands:".to_string(),
    ];
    out.extend(registry().overview());
    out
}

// ── greet ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Greet {
    common: CommonOptions,
    times: u32,
    greeting: Option<String>,
    shout: bool,
    name: String,
}

impl Options for Greet {
    fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
        decl.include(|g| &mut g.common)?;
        decl.field("times", |g| &mut g.times)
            .option(OptionDescriptor::integer("-n")?.with_parameter_name("COUNT"))
            .option(OptionDescriptor::integer("--times")?.with_parameter_name("COUNT"))
            .describe("How many times to greet (default 1)");
        decl.field("greeting", |g| &mut g.greeting)
            .option(OptionDescriptor::string("--greeting")?.with_parameter_name("WORD"))
            .describe("Word to greet with");
        decl.field("shout", |g| &mut g.shout)
            .option(OptionDescriptor::boolean("-s")?)
            .option(OptionDescriptor::boolean("--shout")?)
            .describe("Upper-case the greeting");
        decl.field("name", |g| &mut g.name)
            .argument(ArgumentDescriptor::new(0).with_name("NAME"))
            .describe("Who to greet");
        Ok(())
    }
}

fn greet(args: Vec<String>) -> Outcome {
    // Options are applied before positionals are checked, so `--help` is
    // honoured even when NAME is missing.
    let mut opts = Greet::default();
    let parsed = optbind::parse_into(&mut opts, &args);
    if opts.common.show_help {
        return print_help::<Greet>("Greet someone.", "greet");
    }
    reject_leftovers(&parsed?)?;
    if opts.common.verbose {
        eprintln!("{opts:?}");
    }

    let word = opts.greeting.as_deref().unwrap_or("Hello");
    let mut line = format!("{word}, {}!", opts.name);
    if opts.shout {
        line = line.to_uppercase();
    }
    for _ in 0..opts.times.max(1) {
        println!("{line}");
    }
    Ok(())
}

// ── sum ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Sum {
    common: CommonOptions,
    average: bool,
    label: Option<String>,
    numbers: Vec<String>,
}

impl Options for Sum {
    fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
        decl.include(|s| &mut s.common)?;
        decl.field("average", |s| &mut s.average)
            .option(OptionDescriptor::boolean("-a")?)
            .option(OptionDescriptor::boolean("--average")?)
            .describe("Print the mean instead of the total");
        decl.field("label", |s| &mut s.label)
            .option(OptionDescriptor::string("-l")?.with_parameter_name("TEXT"))
            .option(OptionDescriptor::string("--label")?.with_parameter_name("TEXT"))
            .describe("Prefix for the result");
        decl.field("numbers", |s| &mut s.numbers).catch_all();
        Ok(())
    }
}

fn sum(args: Vec<String>) -> Outcome {
    let mut opts = Sum::default();
    let parsed = optbind::parse_into(&mut opts, &args);
    if opts.common.show_help {
        return print_help::<Sum>("Add up numbers.", "sum");
    }
    parsed?;

    let values = opts
        .numbers
        .iter()
        .map(|n| {
            convert::floating_point::<f64>(n, "f64")
                .with_context(|| format!("invalid number '{n}'"))
        })
        .collect::<Result<Vec<f64>>>()?;
    if opts.common.verbose {
        eprintln!("adding {} numbers", values.len());
    }

    let total: f64 = values.iter().sum();
    let result = if opts.average {
        if values.is_empty() {
            bail!("cannot average zero numbers");
        }
        total / values.len() as f64
    } else {
        total
    };

    match opts.label {
        Some(label) => println!("{label}: {result}"),
        None => println!("{result}"),
    }
    Ok(())
}

// ── describe / help ──────────────────────────────────────────────

#[derive(Debug, Default)]
struct Topic {
    command: Option<String>,
}

impl Options for Topic {
    fn declare(decl: &mut Declaration<Self>) -> Result<(), DefinitionError> {
        decl.field("command", |t| &mut t.command)
            .argument(ArgumentDescriptor::new(0).with_name("COMMAND").optional())
            .describe("Command to describe");
        Ok(())
    }
}

fn info_for(command: &str) -> Result<TableInfo> {
    let info = match command {
        "greet" => optbind::table::<Greet>()?.info(),
        "sum" => optbind::table::<Sum>()?.info(),
        "describe" | "help" => optbind::table::<Topic>()?.info(),
        other => bail!("unknown command: {other}"),
    };
    Ok(info)
}

fn describe(args: Vec<String>) -> Outcome {
    let (topic, rest) = optbind::parse::<Topic, _>(args)?;
    reject_leftovers(&rest)?;
    let Some(command) = topic.command else {
        bail!("missing required argument: COMMAND");
    };
    info!(command = %command, "describing");
    println!("{}", info_for(&command)?.to_json()?);
    Ok(())
}

fn show_help(args: Vec<String>) -> Outcome {
    let (topic, rest) = optbind::parse::<Topic, _>(args)?;
    reject_leftovers(&rest)?;
    match topic.command {
        Some(command) => {
            let title = registry()
                .commands()
                .find(|(name, _)| *name == command)
                .map(|(_, description)| description.to_string())
                .unwrap_or_default();
            let info = info_for(&command)?;
            for line in help::render(&title, &format!("{PROGRAM} {command}"), &info) {
                println!("{line}");
            }
        }
        None => {
            for line in overview() {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn print_help<T: Options>(title: &str, command: &str) -> Outcome {
    let info = optbind::table::<T>()?.info();
    for line in help::render(title, &format!("{PROGRAM} {command}"), &info) {
        println!("{line}");
    }
    Ok(())
}

fn reject_leftovers(rest: &[String]) -> Result<()> {
    if let Some(first) = rest.first() {
        bail!("unexpected argument: {first}");
    }
    Ok(())
}
