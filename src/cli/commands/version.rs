//! Version command implementation.

use rich_rust::prelude::*;
use serde::Serialize;

use crate::cli::VersionArgs;
use crate::output::{OutputContext, OutputMode};

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    os: &'a str,
    arch: &'a str,
    data_format: &'a str,
}

impl VersionOutput<'static> {
    fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build: if cfg!(debug_assertions) {
                "dev"
            } else {
                "release"
            },
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            data_format: "json-array",
        }
    }
}

/// Execute the version command.
pub fn execute(args: &VersionArgs, ctx: &OutputContext) {
    let info = VersionOutput::current();

    if args.short {
        println!("{}", info.version);
        return;
    }

    match ctx.mode() {
        OutputMode::Json => ctx.json(&info),
        OutputMode::Rich => render_version_rich(&info, ctx),
        OutputMode::Plain => println!(
            "td version {} ({}, {}-{})",
            info.version, info.build, info.os, info.arch
        ),
    }
}

/// Render version information with rich formatting.
fn render_version_rich(info: &VersionOutput<'_>, ctx: &OutputContext) {
    let console = Console::default();
    let theme = ctx.theme();

    let mut content = Text::new("");
    content.append_styled(&format!("td {}", info.version), theme.emphasis.clone());
    content.append_styled(&format!(" ({})", info.build), theme.dimmed.clone());
    content.append("\n\n");

    content.append_styled("Build Info:\n", theme.section.clone());
    let items = [
        ("OS", info.os),
        ("Arch", info.arch),
        ("Storage", info.data_format),
    ];
    let last_idx = items.len() - 1;
    for (idx, (label, value)) in items.iter().enumerate() {
        let prefix = if idx == last_idx { "└── " } else { "├── " };
        content.append_styled(prefix, theme.dimmed.clone());
        content.append_styled(&format!("{label:<8}"), theme.accent.clone());
        content.append(&format!("{value}\n"));
    }

    let panel = Panel::from_rich_text(&content, ctx.width())
        .title(Text::styled("td version", theme.panel_title.clone()));
    console.print_renderable(&panel);
}
