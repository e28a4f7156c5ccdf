// File: src/step.rs
// Purpose: Parse simulate steps from the command line

use rhtmx_nav::{Params, RouteRef, UserRole};
use std::fmt;
use std::str::FromStr;

/// One scripted action of a simulated session
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Back,
    Forward,
    Role(UserRole),
    Static(RouteRef),
    Dynamic { route: RouteRef, params: Params },
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s {
            "back" => return Ok(Step::Back),
            "forward" => return Ok(Step::Forward),
            _ => {}
        }

        if let Some(role) = s.strip_prefix("role=") {
            return Ok(Step::Role(role.parse()?));
        }

        let Some((route, pairs)) = s.split_once(':') else {
            return Ok(Step::Static(route_ref(s)?));
        };

        let mut params = Params::new();
        for pair in pairs.split(',').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    params.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => anyhow::bail!("Invalid parameter '{}' in step '{}' (expected key=value)", pair, s),
            }
        }

        Ok(Step::Dynamic {
            route: route_ref(route)?,
            params,
        })
    }
}

fn route_ref(s: &str) -> anyhow::Result<RouteRef> {
    s.parse()
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Back => f.write_str("back"),
            Step::Forward => f.write_str("forward"),
            Step::Role(role) => write!(f, "role={}", role),
            Step::Static(route) => write!(f, "{}", route),
            Step::Dynamic { route, params } => {
                let pairs: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, "{}:{}", route, pairs.join(","))
            }
        }
    }
}
