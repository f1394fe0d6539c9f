//! Stats command implementation.
//!
//! Headline metrics followed by bar charts for each breakdown the
//! aggregator produces.

use rich_rust::prelude::*;
use ticketdesk_lib::Summary;

use crate::cli::StatsArgs;
use crate::config::DeskContext;
use crate::error::Result;
use crate::format::{BarLine, bar_lines, count_entries};
use crate::output::{OutputContext, OutputMode};

/// How many days of the creation series are charted.
const DAILY_WINDOW: usize = 14;

/// One chart: a title plus its rendered rows.
struct Section {
    title: String,
    lines: Vec<BarLine>,
}

/// Execute the stats command.
///
/// # Errors
///
/// Never fails today: the ticket file loads fail-soft.
pub fn execute(args: &StatsArgs, desk: &DeskContext, ctx: &OutputContext) -> Result<()> {
    let store = desk.open_store();
    let filters = args.filters.to_filters(desk.labels());
    let tickets = store.list(&filters);
    let summary = Summary::compute(tickets.iter().copied(), desk.labels());

    match ctx.mode() {
        OutputMode::Json => ctx.json(&summary),
        OutputMode::Plain => print!("{}", render_plain(&summary, ctx.width())),
        OutputMode::Rich => render_rich(&summary, ctx),
    }
    Ok(())
}

fn headline(summary: &Summary) -> Vec<(&'static str, String)> {
    vec![
        (
            "Tickets",
            format!("{} ({} open)", summary.total_tickets, summary.open_tickets),
        ),
        (
            "Exchanges",
            format!(
                "{} ({} answered, {:.1}%)",
                summary.total_exchanges, summary.answered_exchanges, summary.response_rate
            ),
        ),
        (
            "Avg response",
            format!("{:.1}h", summary.average_response_hours),
        ),
        (
            "Avg first reply",
            format!("{:.1}h", summary.average_first_response_hours),
        ),
        (
            "Avg resolution",
            format!("{:.1}h", summary.average_resolution_hours),
        ),
    ]
}

fn sections(summary: &Summary, width: usize) -> Vec<Section> {
    let count = |v: f64| format!("{v:.0}");
    let percent = |v: f64| format!("{v:.1}%");
    let hours = |v: f64| format!("{v:.1}h");

    let daily: Vec<(String, f64)> = {
        let all = count_entries(&summary.created_per_day);
        let skip = all.len().saturating_sub(DAILY_WINDOW);
        all.into_iter().skip(skip).collect()
    };

    let mut sections = vec![
        Section {
            title: "By status".into(),
            lines: bar_lines(&count_entries(&summary.by_status), width, count),
        },
        Section {
            title: "By priority".into(),
            lines: bar_lines(&count_entries(&summary.by_priority), width, count),
        },
        Section {
            title: "By category".into(),
            lines: bar_lines(&count_entries(&summary.by_category), width, count),
        },
        Section {
            title: "Response rate by category".into(),
            lines: bar_lines(
                &float_entries(&summary.response_rate_by_category),
                width,
                percent,
            ),
        },
        Section {
            title: "Avg response time by priority".into(),
            lines: bar_lines(
                &float_entries(&summary.average_response_hours_by_priority),
                width,
                hours,
            ),
        },
        Section {
            title: format!("Created per day (last {DAILY_WINDOW})"),
            lines: bar_lines(&daily, width, count),
        },
    ];

    for (month, statuses) in &summary.status_per_month {
        sections.push(Section {
            title: format!("Status in {month}"),
            lines: bar_lines(&count_entries(statuses), width, count),
        });
    }

    sections.retain(|s| !s.lines.is_empty());
    sections
}

fn float_entries(values: &std::collections::BTreeMap<String, f64>) -> Vec<(String, f64)> {
    values.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

fn render_plain(summary: &Summary, width: usize) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    for (label, value) in headline(summary) {
        let _ = writeln!(out, "{label:<16}{value}");
    }
    for section in sections(summary, width) {
        let _ = writeln!(out, "\n{}", section.title);
        for line in &section.lines {
            let _ = writeln!(out, "  {}", line.to_plain());
        }
    }
    out
}

fn render_rich(summary: &Summary, ctx: &OutputContext) {
    let console = Console::default();
    let theme = ctx.theme();

    let mut header = Text::new("");
    header.append_styled("Ticket statistics\n", theme.panel_title.clone());
    for (label, value) in headline(summary) {
        header.append_styled(&format!("{label:<16}"), theme.accent.clone());
        header.append_styled(&format!("{value}\n"), theme.emphasis.clone());
    }
    console.print_renderable(&header);

    for section in sections(summary, ctx.width().saturating_sub(2)) {
        let mut title = Text::new("");
        title.append_styled(&section.title, theme.section.clone());
        console.print_renderable(&title);
        for line in &section.lines {
            let mut row = Text::new("");
            row.append(&format!("  {}  ", line.label));
            row.append_styled(&line.bar, theme.accent.clone());
            row.append_styled(&format!(" {}", line.value), theme.dimmed.clone());
            console.print_renderable(&row);
        }
        console.print("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketdesk_lib::{Exchange, LabelSettings, Ticket, Timestamp};

    fn ticket(id: u64, category: &str, created: &str, answered_after_hours: Option<i64>) -> Ticket {
        let asked = Timestamp::from_raw(created);
        let mut exchange = Exchange::question("help", asked.clone());
        if let Some(hours) = answered_after_hours {
            let at = asked.parse().unwrap() + chrono::Duration::hours(hours);
            exchange.response_at = Some(Timestamp::from_naive(at));
        }
        Ticket {
            id,
            title: format!("Ticket {id}"),
            description: "help".into(),
            category: category.into(),
            priority: "High".into(),
            status: "Open".into(),
            created_at: asked,
            tags: vec![],
            comments: vec![],
            exchanges: vec![exchange],
            support_response_at: None,
        }
    }

    #[test]
    fn plain_report_has_headline_and_charts() {
        crate::logging::init_test_logging();
        let tickets = vec![
            ticket(1, "Bug", "2026-04-01 08:00:00", Some(2)),
            ticket(2, "Bug", "2026-04-02 08:00:00", Some(4)),
            ticket(3, "Question", "2026-04-02 09:00:00", None),
        ];
        let summary = Summary::compute(&tickets, &LabelSettings::default());
        let text = render_plain(&summary, 60);

        assert!(text.contains("Tickets         3 (3 open)"));
        assert!(text.contains("Avg response    3.0h"));
        assert!(text.contains("Avg resolution  0.0h"));
        assert!(text.contains("Response rate by category"));
        assert!(text.contains("Status in 2026-04"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn empty_breakdowns_are_skipped() {
        let summary = Summary::compute(std::iter::empty(), &LabelSettings::default());
        let names: Vec<String> = sections(&summary, 80).into_iter().map(|s| s.title).collect();
        assert!(names.is_empty());
        assert!(render_plain(&summary, 80).contains("Avg response    0.0h"));
    }

    #[test]
    fn daily_chart_keeps_recent_days() {
        let tickets: Vec<Ticket> = (1..=20)
            .map(|day| ticket(day, "Bug", &format!("2026-05-{day:02} 10:00:00"), None))
            .collect();
        let summary = Summary::compute(&tickets, &LabelSettings::default());
        let daily = sections(&summary, 80)
            .into_iter()
            .find(|s| s.title.starts_with("Created per day"))
            .unwrap();
        assert_eq!(daily.lines.len(), DAILY_WINDOW);
        assert!(daily.lines[0].label.starts_with("2026-05-07"));
    }
}
