use anyhow::Result;
use colored::Colorize;
use rhtmx_nav::UserRole;
use std::path::Path;

pub async fn execute(config: Option<&Path>, role: Option<UserRole>) -> Result<()> {
    let navigator = super::build_navigator(config, role)?;
    let role = navigator.current_role();

    println!("{}", format!("Static routes (role: {})", role).green().bold());
    println!();

    for route in navigator.available_routes().await {
        let line = format!("{:<24} {:<22} {}", route.route, route.path, route.title);
        if route.allowed {
            println!("  {} {}", "✓".green(), line);
        } else {
            println!("  {} {}", "✗".red(), line.dimmed());
        }
    }

    println!();
    println!("{}", "Dynamic routes".green().bold());
    println!();

    for (route, entry) in navigator.table().dynamic_routes() {
        let guards = entry.metadata.guard_names();
        let guards = if guards.is_empty() {
            String::new()
        } else {
            format!("[{}]", guards.join(", "))
        };
        println!(
            "  {:<24} {:<42} {}",
            route.to_string(),
            entry.pattern.as_str().cyan(),
            guards.yellow()
        );
    }

    Ok(())
}
