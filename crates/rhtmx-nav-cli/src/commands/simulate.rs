use anyhow::Result;
use colored::Colorize;
use rhtmx_nav::{Breadcrumb, Navigator, QueryParams, ScrollPosition, UserRole};
use serde::Serialize;
use std::path::Path;

use crate::step::Step;

#[derive(Debug, Serialize)]
struct StepReport {
    step: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct EntryReport {
    path: String,
    title: String,
    scroll: ScrollPosition,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct SessionReport {
    role: UserRole,
    current_path: String,
    history_index: usize,
    breadcrumbs: Vec<Breadcrumb>,
    steps: Vec<StepReport>,
    history: Vec<EntryReport>,
}

pub async fn execute(
    config: Option<&Path>,
    role: Option<UserRole>,
    steps: &[Step],
    json: bool,
) -> Result<()> {
    let navigator = super::build_navigator(config, role)?;

    let mut reports = Vec::with_capacity(steps.len());
    for step in steps {
        let report = run_step(&navigator, step).await;
        if !json {
            print_step(&report);
        }
        reports.push(report);
    }

    let session = SessionReport {
        role: navigator.current_role(),
        current_path: navigator.current_path(),
        history_index: navigator.history_index(),
        breadcrumbs: navigator.breadcrumbs(),
        steps: reports,
        history: navigator
            .history()
            .into_iter()
            .map(|entry| EntryReport {
                path: entry.path,
                title: entry.metadata.title,
                scroll: entry.scroll_position,
                timestamp: entry.timestamp.to_rfc3339(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_session(&session);
    }

    Ok(())
}

async fn run_step(navigator: &Navigator, step: &Step) -> StepReport {
    let outcome = match step {
        Step::Role(role) => {
            navigator.update_role(*role);
            return StepReport {
                step: step.to_string(),
                ok: true,
                path: None,
                history_index: None,
                error: None,
            };
        }
        Step::Back => navigator.go_back().await,
        Step::Forward => navigator.go_forward().await,
        Step::Static(route) => navigator.navigate_to_static(route, QueryParams::new()).await,
        Step::Dynamic { route, params } => {
            navigator
                .navigate_to_dynamic(route, params.clone(), QueryParams::new())
                .await
        }
    };

    match outcome {
        Ok(navigated) => StepReport {
            step: step.to_string(),
            ok: true,
            path: Some(navigated.path),
            history_index: Some(navigated.history_index),
            error: None,
        },
        Err(err) => StepReport {
            step: step.to_string(),
            ok: false,
            path: None,
            history_index: None,
            error: Some(err.to_string()),
        },
    }
}

fn print_step(report: &StepReport) {
    match (&report.path, &report.error) {
        (Some(path), _) => println!(
            "  {} {:<40} → {} {}",
            "✓".green(),
            report.step,
            path.cyan(),
            format!("[{}]", report.history_index.unwrap_or_default()).dimmed()
        ),
        (None, Some(error)) => println!("  {} {:<40} {}", "✗".red(), report.step, error.red()),
        (None, None) => println!("  {} {}", "•".yellow(), report.step),
    }
}

fn print_session(session: &SessionReport) {
    println!();
    println!(
        "{} {} (role: {})",
        "Current path:".green().bold(),
        session.current_path.cyan(),
        session.role
    );

    if !session.breadcrumbs.is_empty() {
        let trail: Vec<&str> = session.breadcrumbs.iter().map(|b| b.label.as_str()).collect();
        println!("{} {}", "Breadcrumbs:".green().bold(), trail.join(" › "));
    }

    println!();
    println!("{}", "History".green().bold());
    for (index, entry) in session.history.iter().enumerate() {
        let marker = if index == session.history_index { "→" } else { " " };
        println!(
            "  {} {:>2} {:<40} {} {}",
            marker.yellow(),
            index,
            entry.path,
            entry.title,
            format!("({}, {})", entry.scroll.x, entry.scroll.y).dimmed()
        );
    }
}
